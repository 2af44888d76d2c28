//! Configuration file loading for shipwright.
//!
//! Discovers and loads `shipwright.toml` from the repository root.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::Utf8Path;
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "shipwright.toml";

/// Top-level configuration from shipwright.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShipwrightConfig {
    /// Policy settings (allow/deny lists, dirty-tree handling).
    pub policy: PolicyConfig,

    /// Autofix settings.
    pub autofix: AutofixConfig,
}

/// Policy section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Allowlist patterns for goal names.
    /// If non-empty, only allowlisted goals are runnable.
    pub allow: Vec<String>,

    /// Denylist patterns for goal names.
    pub deny: Vec<String>,

    /// Allow applying autofixes when the working tree is dirty.
    pub allow_dirty: bool,
}

/// Autofix section of the config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AutofixConfig {
    /// License header text; the builtin Apache header when absent.
    pub header: Option<String>,

    /// Modules whose deep imports get collapsed.
    pub import_modules: Option<Vec<String>>,

    /// Keep `.shipwright.bak` copies of modified files.
    pub backup_enabled: bool,

    pub backup_suffix: String,
}

impl Default for AutofixConfig {
    fn default() -> Self {
        Self {
            header: None,
            import_modules: None,
            backup_enabled: true,
            backup_suffix: ".shipwright.bak".to_string(),
        }
    }
}

/// Load shipwright.toml from the repo root, or defaults when absent.
pub fn load_or_default(repo_root: &Utf8Path) -> anyhow::Result<ShipwrightConfig> {
    let path = repo_root.join(CONFIG_FILE_NAME);
    if !path.exists() {
        debug!(path = %path, "no config file; using defaults");
        return Ok(ShipwrightConfig::default());
    }

    let contents = fs::read_to_string(&path).with_context(|| format!("read {}", path))?;
    let config: ShipwrightConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path))?;
    debug!(path = %path, "loaded config file");
    Ok(config)
}

/// Merged policy after folding CLI arguments over the config file.
#[derive(Debug, Clone)]
pub struct MergedPolicy {
    pub allow: Vec<String>,
    pub deny: Vec<String>,
    pub allow_dirty: bool,
}

/// Merges config file values with CLI arguments; CLI wins.
pub struct ConfigMerger {
    config: ShipwrightConfig,
}

impl ConfigMerger {
    pub fn new(config: ShipwrightConfig) -> Self {
        Self { config }
    }

    pub fn merge_policy(
        &self,
        cli_allow: &[String],
        cli_deny: &[String],
        cli_allow_dirty: bool,
    ) -> MergedPolicy {
        MergedPolicy {
            allow: if cli_allow.is_empty() {
                self.config.policy.allow.clone()
            } else {
                cli_allow.to_vec()
            },
            deny: if cli_deny.is_empty() {
                self.config.policy.deny.clone()
            } else {
                cli_deny.to_vec()
            },
            allow_dirty: cli_allow_dirty || self.config.policy.allow_dirty,
        }
    }

    pub fn autofix_options(&self) -> shipwright_domain::AutofixOptions {
        let mut opts = shipwright_domain::AutofixOptions::default();
        if let Some(header) = &self.config.autofix.header {
            opts.header = header.clone();
        }
        if let Some(modules) = &self.config.autofix.import_modules {
            opts.import_modules = modules.clone();
        }
        opts
    }

    pub fn backup_enabled(&self) -> bool {
        self.config.autofix.backup_enabled
    }

    pub fn backup_suffix(&self) -> String {
        self.config.autofix.backup_suffix.clone()
    }
}
