use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use shipwright_types::review::LintReport;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct LoadedLintReport {
    pub path: Utf8PathBuf,
    /// Directory name under artifacts/... (best effort).
    pub tool_id: String,
    pub report: Result<LintReport, LintLoadError>,
}

#[derive(Debug, Error, Clone)]
pub enum LintLoadError {
    #[error("io error: {message}")]
    Io { message: String },

    #[error("json parse error: {message}")]
    Json { message: String },
}

/// Scan `<artifacts_dir>/*/lint.json` for lint reports.
///
/// Each file is either a `lint.report.v1` envelope or a raw tslint-style
/// array (adapted via [`crate::parse_tslint_output`]). Malformed JSON is
/// logged and surfaces as an `Err` record; callers decide whether that is a
/// warning or a failure.
pub fn load_lint_reports(artifacts_dir: &Utf8Path) -> anyhow::Result<Vec<LoadedLintReport>> {
    let pattern = artifacts_dir.join("*/lint.json");
    let pattern_str = pattern.as_str();

    debug!(pattern = %pattern_str, "scanning artifacts for lint reports");

    let mut out = Vec::new();
    for entry in glob::glob(pattern_str).context("glob artifacts/*/lint.json")? {
        let path = entry
            .map_err(|e| anyhow::anyhow!("glob error: {e}"))?
            .to_string_lossy()
            .to_string();

        let utf8_path = Utf8PathBuf::from(path);
        let tool_id = utf8_path
            .parent()
            .and_then(|p| p.file_name())
            .unwrap_or("unknown")
            .to_string();

        // Skip shipwright's own output directory.
        if tool_id == "shipwright" {
            debug!(path = %utf8_path, "skipping shipwright's own artifacts");
            continue;
        }

        let report = match fs::read_to_string(&utf8_path) {
            Ok(s) => parse_report(&tool_id, &s),
            Err(e) => Err(LintLoadError::Io {
                message: e.to_string(),
            }),
        };

        if let Err(e) = &report {
            warn!(path = %utf8_path, error = %e, "lint report failed to load; treating as no results");
        }

        out.push(LoadedLintReport {
            path: utf8_path,
            tool_id,
            report,
        });
    }

    // Deterministic order matters.
    out.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(out)
}

fn parse_report(tool_id: &str, contents: &str) -> Result<LintReport, LintLoadError> {
    // Envelope first; fall back to a raw tslint array.
    match serde_json::from_str::<LintReport>(contents) {
        Ok(report) => Ok(report),
        Err(envelope_err) => match crate::parse_tslint_output(tool_id, contents) {
            Ok(report) => Ok(report),
            Err(_) => Err(LintLoadError::Json {
                message: envelope_err.to_string(),
            }),
        },
    }
}
