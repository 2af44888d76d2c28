//! Builtin autofixes wired from the pure transforms.

use crate::apply::{Autofix, TransformOutcome};
use crate::header::{HeaderAction, upsert_header};
use crate::imports::rewrite_deep_imports;
use camino::Utf8Path;

/// Prepend the configured license header to source files that lack one.
/// Files with a *different* header are flagged for manual review.
#[derive(Debug, Clone)]
pub struct LicenseHeaderAutofix {
    header: String,
    extensions: Vec<String>,
}

impl LicenseHeaderAutofix {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            extensions: vec!["ts".to_string(), "js".to_string(), "java".to_string()],
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }
}

impl Autofix for LicenseHeaderAutofix {
    fn name(&self) -> &str {
        "license-header"
    }

    fn relevant(&self, path: &Utf8Path) -> bool {
        path.extension()
            .map(|ext| self.extensions.iter().any(|e| e == ext))
            .unwrap_or(false)
    }

    fn transform(&self, _path: &Utf8Path, content: &str) -> anyhow::Result<TransformOutcome> {
        Ok(match upsert_header(&self.header, content) {
            HeaderAction::UpToDate => TransformOutcome::Unchanged,
            HeaderAction::DifferentHeader => {
                TransformOutcome::Flagged("file carries a different header".to_string())
            }
            HeaderAction::Updated(updated) => TransformOutcome::Changed(updated),
        })
    }
}

/// Collapse deep imports of the configured modules to their package roots.
#[derive(Debug, Clone)]
pub struct ImportRewriteAutofix {
    modules: Vec<String>,
}

impl ImportRewriteAutofix {
    pub fn new(modules: Vec<String>) -> Self {
        Self { modules }
    }
}

impl Autofix for ImportRewriteAutofix {
    fn name(&self) -> &str {
        "import-rewrite"
    }

    fn relevant(&self, path: &Utf8Path) -> bool {
        matches!(path.extension(), Some("ts") | Some("js"))
    }

    fn transform(&self, _path: &Utf8Path, content: &str) -> anyhow::Result<TransformOutcome> {
        let mut current = content.to_string();
        for module in &self.modules {
            current = rewrite_deep_imports(&current, module);
        }
        Ok(if current == content {
            TransformOutcome::Unchanged
        } else {
            TransformOutcome::Changed(current)
        })
    }
}
