use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// A single code-review comment, typically produced by a lint tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewComment {
    #[serde(default)]
    pub severity: Severity,

    /// Broad grouping, e.g. the lint rule name.
    pub category: String,

    /// Finer grouping, e.g. the tool that produced the comment.
    #[serde(default)]
    pub subcategory: String,

    pub detail: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_location: Option<SourceLocation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warn,
    #[default]
    Info,
}

impl Severity {
    /// Sort rank: errors first.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Error => 0,
            Severity::Warn => 1,
            Severity::Info => 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceLocation {
    pub path: Utf8PathBuf,

    /// Character offset into the file.
    #[serde(default)]
    pub offset: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u64>,
}

/// Envelope for a lint report dropped into artifacts/<tool>/lint.json.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintReport {
    pub schema: String,

    pub tool: crate::plan::ToolInfo,

    #[serde(default)]
    pub comments: Vec<ReviewComment>,
}
