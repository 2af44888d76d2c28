use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A push event as delivered by the source-control webhook bridge.
///
/// shipwright tries hard to be *tolerant* when reading push events:
/// - Unknown fields are ignored.
/// - Optional fields may be absent.
///
/// The webhook bridge should enforce stricter schema compliance; shipwright's
/// job is to be useful with events "as found".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushEvent {
    pub repo: RepoRef,

    pub branch: String,

    /// SHA of the after-commit of the push.
    pub sha: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    /// Paths touched by the push, relative to the repo root. May be empty
    /// when the bridge did not compute a changeset.
    #[serde(default)]
    pub files_changed: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl PushEvent {
    pub fn slug(&self) -> String {
        format!("{}/{}", self.repo.owner, self.repo.name)
    }

    pub fn short_sha(&self) -> &str {
        match self.sha.char_indices().nth(7) {
            Some((idx, _)) => &self.sha[..idx],
            None => &self.sha,
        }
    }

    pub fn is_default_branch(&self) -> bool {
        self.branch == self.repo.default_branch
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,

    #[serde(default = "default_branch_name")]
    pub default_branch: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

fn default_branch_name() -> String {
    "main".to_string()
}
