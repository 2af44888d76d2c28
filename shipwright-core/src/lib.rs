//! Embeddable shipwright pipeline.
//!
//! Everything here is clap-free and I/O-agnostic: filesystem, git, and
//! external process access go through the port traits so the pipeline can be
//! embedded and tested without a real repository.

mod adapters;
mod commands;
mod fingerprints;
mod pipeline;
mod ports;
mod settings;

pub use adapters::{
    FsPushSource, FsReviewSource, FsWritePort, InMemoryPushSource, InMemoryReviewSource,
    ShellGitPort, ShellProcessPort,
};
pub use commands::{
    DiskUsageEntry, DiskUsageReport, approve_goal, disk_usage, render_disk_usage_md, tag_repo,
};
pub use fingerprints::compute_fingerprints;
pub use pipeline::{
    AutofixRunOutcome, PlanOutcome, ToolError, run_autofix, run_plan, write_plan_artifacts,
};
pub use ports::{GitPort, ProcessOutput, ProcessPort, PushSource, ReviewSource, WritePort};
pub use settings::{AutofixSettings, PlanSettings, RunMode};
