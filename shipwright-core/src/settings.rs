//! Clap-free settings for the plan and autofix pipelines.

use camino::Utf8PathBuf;
use shipwright_domain::AutofixOptions;

/// Run mode controls exit-code semantics.
///
/// In `Cockpit` mode, policy blocks (exit 2) are mapped to exit 0 because the
/// report still encodes the block in its verdict/data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunMode {
    #[default]
    Standalone,
    Cockpit,
}

/// Settings for the plan pipeline.
#[derive(Debug, Clone)]
pub struct PlanSettings {
    pub repo_root: Utf8PathBuf,
    pub artifacts_dir: Utf8PathBuf,
    pub out_dir: Utf8PathBuf,

    // Policy
    pub allow: Vec<String>,
    pub deny: Vec<String>,
    pub allow_dirty: bool,

    // Autofix previews
    pub autofix: AutofixOptions,

    // Mode
    pub mode: RunMode,
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            repo_root: Utf8PathBuf::from("."),
            artifacts_dir: Utf8PathBuf::from("artifacts"),
            out_dir: Utf8PathBuf::from("artifacts/shipwright"),
            allow: Vec::new(),
            deny: Vec::new(),
            allow_dirty: false,
            autofix: AutofixOptions::default(),
            mode: RunMode::default(),
        }
    }
}

/// Settings for the autofix pipeline.
#[derive(Debug, Clone)]
pub struct AutofixSettings {
    pub repo_root: Utf8PathBuf,

    // Apply behaviour
    pub dry_run: bool,
    pub allow_dirty: bool,

    pub autofix: AutofixOptions,

    // Backups
    pub backup_enabled: bool,
    pub backup_suffix: String,

    // Mode
    pub mode: RunMode,
}

impl Default for AutofixSettings {
    fn default() -> Self {
        Self {
            repo_root: Utf8PathBuf::from("."),
            dry_run: true,
            allow_dirty: false,
            autofix: AutofixOptions::default(),
            backup_enabled: true,
            backup_suffix: ".shipwright.bak".to_string(),
            mode: RunMode::default(),
        }
    }
}
