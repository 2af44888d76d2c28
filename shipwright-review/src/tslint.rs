use camino::Utf8PathBuf;
use serde::Deserialize;
use shipwright_types::plan::ToolInfo;
use shipwright_types::review::{LintReport, ReviewComment, Severity, SourceLocation};

/// One entry of tslint's `--format json` output.
///
/// Only the fields shipwright cares about; everything else is ignored.
#[derive(Debug, Deserialize)]
struct TslintEntry {
    #[serde(rename = "ruleSeverity", default)]
    rule_severity: Option<String>,

    #[serde(rename = "ruleName", default)]
    rule_name: Option<String>,

    #[serde(default)]
    failure: Option<String>,

    /// File path, tslint calls it `name`.
    #[serde(default)]
    name: Option<String>,

    #[serde(rename = "startPosition", default)]
    start_position: Option<TslintPosition>,
}

#[derive(Debug, Deserialize)]
struct TslintPosition {
    #[serde(default)]
    position: u64,
    #[serde(default)]
    line: u64,
    #[serde(default)]
    character: u64,
}

/// Adapt a raw tslint JSON array into a lint report envelope.
///
/// Returns an error only when the contents are not a JSON array of objects;
/// per-entry oddities degrade to defaults instead.
pub fn parse_tslint_output(tool_id: &str, contents: &str) -> serde_json::Result<LintReport> {
    let entries: Vec<TslintEntry> = serde_json::from_str(contents)?;

    let comments = entries.into_iter().map(to_comment).collect();
    Ok(LintReport {
        schema: shipwright_types::schema::LINT_REPORT_V1.to_string(),
        tool: ToolInfo {
            name: tool_id.to_string(),
            version: None,
            repo: None,
            commit: None,
        },
        comments,
    })
}

fn to_comment(entry: TslintEntry) -> ReviewComment {
    let severity = entry
        .rule_severity
        .map(|s| match s.to_ascii_uppercase().as_str() {
            "ERROR" => Severity::Error,
            "WARNING" | "WARN" => Severity::Warn,
            _ => Severity::Info,
        })
        .unwrap_or_default();

    let source_location = entry.name.map(|path| {
        let pos = entry.start_position.unwrap_or(TslintPosition {
            position: 0,
            line: 0,
            character: 0,
        });
        SourceLocation {
            path: Utf8PathBuf::from(path),
            offset: pos.position,
            line: Some(pos.line),
            column: Some(pos.character),
        }
    });

    ReviewComment {
        severity,
        category: entry.rule_name.unwrap_or_else(|| "unknown".to_string()),
        subcategory: "tslint".to_string(),
        detail: entry.failure.unwrap_or_default(),
        source_location,
    }
}
