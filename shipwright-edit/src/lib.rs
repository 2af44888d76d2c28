//! Edit engine for shipwright autofixes and release transforms.
//!
//! Responsibilities:
//! - Pure text transforms: license headers, Dockerfile npm pins, package.json
//!   dependency bumps, deep-import rewriting, Homebrew formula updates.
//! - Apply registered autofixes to a repository (in-memory or to disk) with a
//!   unified diff preview and optional backups.

mod apply;
mod autofixes;
mod deps;
mod dockerfile;
mod formula;
mod header;
mod imports;

pub use apply::{
    ApplyOptions, Autofix, AutofixOutcome, FileChange, FlaggedFile, TransformOutcome,
    apply_autofixes, collect_candidates,
};
pub use autofixes::{ImportRewriteAutofix, LicenseHeaderAutofix};
pub use deps::update_dependency_version;
pub use dockerfile::update_npm_install;
pub use formula::update_formula;
pub use header::{HeaderAction, has_different_header, upsert_header};
pub use imports::rewrite_deep_imports;
