//! Port traits abstracting all I/O away from the pipeline.

use camino::Utf8Path;
use shipwright_review::LoadedLintReport;
use shipwright_types::push::PushEvent;

/// Source of the push event being planned.
pub trait PushSource {
    fn load_push(&self) -> anyhow::Result<PushEvent>;
}

/// Source of lint reports considered during planning.
pub trait ReviewSource {
    fn load_lint_reports(&self) -> anyhow::Result<Vec<LoadedLintReport>>;
}

/// Git queries and tag creation.
pub trait GitPort {
    fn head_sha(&self, repo_root: &Utf8Path) -> anyhow::Result<Option<String>>;
    fn is_dirty(&self, repo_root: &Utf8Path) -> anyhow::Result<Option<bool>>;
    fn create_tag(&self, repo_root: &Utf8Path, name: &str, message: &str) -> anyhow::Result<()>;
}

/// Output of an external process run.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Exit code; -1 when the process was killed by a signal.
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Run external binaries (`du`, `npm`, `docker`, ...).
pub trait ProcessPort {
    fn run(&self, program: &str, args: &[&str], cwd: &Utf8Path) -> anyhow::Result<ProcessOutput>;
}

/// File-system write operations.
pub trait WritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()>;
}
