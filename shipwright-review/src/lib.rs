//! Lint-report ingestion and review-comment ordering.
//!
//! shipwright consumes review output produced by other tools. It intentionally
//! does not enforce strict schema validation here; malformed reports are
//! recorded and treated as "no results" so planning can still proceed.

mod load;
mod sort;
mod tslint;

pub use load::{LintLoadError, LoadedLintReport, load_lint_reports};
pub use sort::{compare_review_comments, sort_review_comments};
pub use tslint::parse_tslint_output;
