//! Default filesystem/shell-backed port implementations.

use crate::ports::{GitPort, ProcessOutput, ProcessPort, PushSource, ReviewSource, WritePort};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use shipwright_review::LoadedLintReport;
use shipwright_types::push::PushEvent;
use std::process::Command;
use tracing::debug;

/// Loads the push event from a JSON file.
#[derive(Debug, Clone)]
pub struct FsPushSource {
    pub path: Utf8PathBuf,
}

impl FsPushSource {
    pub fn new(path: Utf8PathBuf) -> Self {
        Self { path }
    }
}

impl PushSource for FsPushSource {
    fn load_push(&self) -> anyhow::Result<PushEvent> {
        let contents = fs_err::read_to_string(&self.path)
            .with_context(|| format!("read {}", self.path))?;
        serde_json::from_str(&contents).with_context(|| format!("parse {}", self.path))
    }
}

/// In-memory push source for embedding and testing.
#[derive(Debug, Clone)]
pub struct InMemoryPushSource {
    push: PushEvent,
}

impl InMemoryPushSource {
    pub fn new(push: PushEvent) -> Self {
        Self { push }
    }
}

impl PushSource for InMemoryPushSource {
    fn load_push(&self) -> anyhow::Result<PushEvent> {
        Ok(self.push.clone())
    }
}

/// Loads lint reports from the filesystem via
/// `shipwright_review::load_lint_reports`.
#[derive(Debug, Clone)]
pub struct FsReviewSource {
    pub artifacts_dir: Utf8PathBuf,
}

impl FsReviewSource {
    pub fn new(artifacts_dir: Utf8PathBuf) -> Self {
        Self { artifacts_dir }
    }
}

impl ReviewSource for FsReviewSource {
    fn load_lint_reports(&self) -> anyhow::Result<Vec<LoadedLintReport>> {
        shipwright_review::load_lint_reports(&self.artifacts_dir)
            .with_context(|| format!("load lint reports from {}", self.artifacts_dir))
    }
}

/// In-memory review source for embedding and testing.
///
/// Sorts by path on construction to match `FsReviewSource`'s deterministic
/// ordering and drops shipwright's own artifacts, mirroring the fs loader.
#[derive(Debug, Clone)]
pub struct InMemoryReviewSource {
    reports: Vec<LoadedLintReport>,
}

impl InMemoryReviewSource {
    pub fn new(mut reports: Vec<LoadedLintReport>) -> Self {
        reports.retain(|r| {
            let keep = r.tool_id != "shipwright";
            if !keep {
                debug!(path = r.path.as_str(), "skipping shipwright's own artifacts");
            }
            keep
        });
        reports.sort_by(|a, b| a.path.cmp(&b.path));
        Self { reports }
    }
}

impl ReviewSource for InMemoryReviewSource {
    fn load_lint_reports(&self) -> anyhow::Result<Vec<LoadedLintReport>> {
        Ok(self.reports.clone())
    }
}

/// Git operations via the `git` binary.
#[derive(Debug, Clone, Default)]
pub struct ShellGitPort;

impl ShellGitPort {
    fn git(&self, repo_root: &Utf8Path, args: &[&str]) -> anyhow::Result<ProcessOutput> {
        ShellProcessPort.run("git", args, repo_root)
    }
}

impl GitPort for ShellGitPort {
    fn head_sha(&self, repo_root: &Utf8Path) -> anyhow::Result<Option<String>> {
        let out = self.git(repo_root, &["rev-parse", "HEAD"])?;
        if out.success() {
            Ok(Some(out.stdout.trim().to_string()))
        } else {
            Ok(None)
        }
    }

    fn is_dirty(&self, repo_root: &Utf8Path) -> anyhow::Result<Option<bool>> {
        let out = self.git(repo_root, &["status", "--porcelain"])?;
        if out.success() {
            Ok(Some(!out.stdout.trim().is_empty()))
        } else {
            Ok(None)
        }
    }

    fn create_tag(&self, repo_root: &Utf8Path, name: &str, message: &str) -> anyhow::Result<()> {
        let out = self.git(repo_root, &["tag", "-a", name, "-m", message])?;
        if out.success() {
            Ok(())
        } else {
            anyhow::bail!("git tag failed: {}", out.stderr.trim())
        }
    }
}

/// Runs external binaries with captured output.
#[derive(Debug, Clone, Default)]
pub struct ShellProcessPort;

impl ProcessPort for ShellProcessPort {
    fn run(&self, program: &str, args: &[&str], cwd: &Utf8Path) -> anyhow::Result<ProcessOutput> {
        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .output()
            .with_context(|| format!("spawn {program}"))?;

        Ok(ProcessOutput {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Filesystem write operations.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {}", path))?;
        }
        std::fs::write(path, contents).with_context(|| format!("write {}", path))
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        std::fs::create_dir_all(path).with_context(|| format!("create_dir_all {}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipwright_review::LintLoadError;
    use shipwright_types::push::RepoRef;
    use tempfile::TempDir;

    fn make_report(path: &str, tool_id: &str) -> LoadedLintReport {
        LoadedLintReport {
            path: Utf8PathBuf::from(path),
            tool_id: tool_id.to_string(),
            report: Err(LintLoadError::Io {
                message: "stub".to_string(),
            }),
        }
    }

    #[test]
    fn in_memory_review_source_sorts_by_path() {
        let source = InMemoryReviewSource::new(vec![
            make_report("artifacts/z-tool/lint.json", "z-tool"),
            make_report("artifacts/a-tool/lint.json", "a-tool"),
        ]);
        let loaded = source.load_lint_reports().unwrap();
        let paths: Vec<&str> = loaded.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["artifacts/a-tool/lint.json", "artifacts/z-tool/lint.json"]
        );
    }

    #[test]
    fn in_memory_review_source_filters_own_artifacts() {
        let source = InMemoryReviewSource::new(vec![make_report(
            "artifacts/shipwright/lint.json",
            "shipwright",
        )]);
        assert!(source.load_lint_reports().unwrap().is_empty());
    }

    #[test]
    fn fs_push_source_parses_event() {
        let temp = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(temp.path().join("push.json")).expect("utf8");
        fs_err::write(
            &path,
            r#"{ "repo": { "owner": "o", "name": "r" }, "branch": "main", "sha": "abc" }"#,
        )
        .expect("write");

        let push = FsPushSource::new(path).load_push().expect("load");
        assert_eq!(push.repo.name, "r");
        assert_eq!(push.branch, "main");
    }

    #[test]
    fn in_memory_push_source_returns_clone() {
        let push = PushEvent {
            repo: RepoRef {
                owner: "o".into(),
                name: "r".into(),
                default_branch: "main".into(),
                provider: None,
            },
            branch: "main".into(),
            sha: "abc".into(),
            timestamp: None,
            files_changed: vec![],
            author: None,
        };
        let source = InMemoryPushSource::new(push);
        assert_eq!(source.load_push().expect("load").sha, "abc");
    }

    #[test]
    fn fs_write_port_writes_and_creates_dirs() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        let target = root.join("nested").join("file.txt");

        let port = FsWritePort;
        port.write_file(&target, b"hello").expect("write");

        let contents = std::fs::read_to_string(&target).expect("read");
        assert_eq!(contents, "hello");

        let extra_dir = root.join("extra");
        port.create_dir_all(&extra_dir).expect("mkdir");
        assert!(extra_dir.exists());
    }

    fn run_git(root: &Utf8Path, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(root)
            .status()
            .expect("run git");
        assert!(status.success(), "git {:?} failed", args);
    }

    #[test]
    fn shell_git_port_returns_none_outside_repo() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        let port = ShellGitPort;
        assert!(port.head_sha(&root).expect("head").is_none());
        assert!(port.is_dirty(&root).expect("dirty").is_none());
    }

    #[test]
    fn shell_git_port_reads_head_dirty_and_tags() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        std::fs::write(root.join("package.json"), "{}\n").expect("write");

        run_git(&root, &["init"]);
        run_git(&root, &["config", "user.email", "test@example.com"]);
        run_git(&root, &["config", "user.name", "Test User"]);
        run_git(&root, &["add", "."]);
        run_git(&root, &["commit", "-m", "init"]);

        let port = ShellGitPort;
        assert!(port.head_sha(&root).expect("head").is_some());
        assert_eq!(port.is_dirty(&root).expect("dirty"), Some(false));

        port.create_tag(&root, "v1.2.3", "Release v1.2.3")
            .expect("tag");
        let out = ShellProcessPort.run("git", &["tag", "-l"], &root).expect("list tags");
        assert!(out.stdout.contains("v1.2.3"));

        std::fs::write(root.join("package.json"), "{ }\n").expect("write");
        assert_eq!(port.is_dirty(&root).expect("dirty"), Some(true));
    }

    #[test]
    fn shell_process_port_captures_exit_code() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");

        let ok = ShellProcessPort.run("true", &[], &root).expect("run true");
        assert!(ok.success());

        let fail = ShellProcessPort.run("false", &[], &root).expect("run false");
        assert!(!fail.success());
    }
}
