//! Prerelease version computation.
//!
//! Every push gets a timestamped prerelease of the declared base version, so
//! build artifacts from different pushes never collide. The timestamp is
//! passed in by the caller; planning stays deterministic.

use crate::ports::RepoView;
use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};

/// Read the base version declared in package.json or pom.xml.
///
/// Returns None for repos that declare no version.
pub fn declared_base_version(repo: &dyn RepoView) -> anyhow::Result<Option<String>> {
    let package_json = Utf8PathBuf::from("package.json");
    if repo.exists(&package_json) {
        let contents = repo.read_to_string(&package_json)?;
        let value: serde_json::Value = serde_json::from_str(&contents)?;
        return Ok(value
            .get("version")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()));
    }

    let pom = Utf8PathBuf::from("pom.xml");
    if repo.exists(&pom) {
        let contents = repo.read_to_string(&pom)?;
        return Ok(first_pom_version(&contents));
    }

    Ok(None)
}

/// First `<version>` element of a pom. Maven conventionally puts the
/// project's own version before any dependency versions.
fn first_pom_version(pom: &str) -> Option<String> {
    let start = pom.find("<version>")? + "<version>".len();
    let end = pom[start..].find("</version>")? + start;
    let version = pom[start..end].trim();
    if version.is_empty() {
        None
    } else {
        Some(version.to_string())
    }
}

/// Compute the prerelease version for a push.
///
/// `<base>-<branch>.<yyyyMMddHHmmss>`, with the branch segment dropped on the
/// default branch.
pub fn prerelease_version(
    base: &str,
    branch: &str,
    default_branch: &str,
    timestamp: DateTime<Utc>,
) -> String {
    let stamp = timestamp.format("%Y%m%d%H%M%S");
    if branch == default_branch {
        format!("{base}-{stamp}")
    } else {
        format!("{base}-{}.{stamp}", sanitize_branch(branch))
    }
}

/// Lowercase the branch and collapse every run of non `[a-z0-9]` characters
/// to a single dash, trimming dashes at both ends.
pub fn sanitize_branch(branch: &str) -> String {
    let mut out = String::with_capacity(branch.len());
    let mut pending_dash = false;
    for c in branch.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else {
            pending_dash = true;
        }
    }
    out
}
