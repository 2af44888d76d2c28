//! Operator command handlers: goal approval, release tagging, disk usage.

use crate::ports::{GitPort, ProcessPort};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use fs_err as fs;
use shipwright_domain::{FsRepoView, declared_base_version};
use shipwright_types::goal::{Approval, GoalState};
use shipwright_types::plan::ShipwrightPlan;
use shipwright_types::wire::PlanV1;
use tracing::{debug, info};

/// Approve a goal in a previously written plan artifact.
///
/// Flips `waiting_for_approval` to `approved`, records who approved and
/// when, and writes the plan back. Approving a goal that is not waiting is
/// an error.
pub fn approve_goal(
    plan_path: &Utf8Path,
    goal_name: &str,
    approved_by: &str,
    at: DateTime<Utc>,
) -> anyhow::Result<ShipwrightPlan> {
    let plan_str = fs::read_to_string(plan_path).with_context(|| format!("read {}", plan_path))?;

    let mut plan: ShipwrightPlan = match serde_json::from_str::<PlanV1>(&plan_str) {
        Ok(wire) => ShipwrightPlan::from(wire),
        Err(err) => {
            debug!("plan.json is not wire format: {}", err);
            serde_json::from_str(&plan_str).context("parse plan.json")?
        }
    };

    let goal = plan
        .goals
        .iter_mut()
        .find(|g| g.spec.name == goal_name)
        .with_context(|| format!("no goal named {goal_name} in {plan_path}"))?;

    if goal.state != GoalState::WaitingForApproval {
        anyhow::bail!(
            "goal {} is not waiting for approval (state: {:?})",
            goal_name,
            goal.state
        );
    }

    goal.state = GoalState::Approved;
    goal.approval = Some(Approval {
        approved_by: approved_by.to_string(),
        at,
    });

    let wire = PlanV1::try_from(&plan).context("convert plan to wire")?;
    let updated = serde_json::to_string_pretty(&wire).context("serialize plan")?;
    fs::write(plan_path, updated).with_context(|| format!("write {}", plan_path))?;

    info!(goal = goal_name, by = approved_by, "goal approved");
    Ok(plan)
}

/// Create the release tag for the repo's declared version.
///
/// Returns the tag name. An explicit `version` overrides the declared one.
pub fn tag_repo(
    repo_root: &Utf8Path,
    version: Option<String>,
    git: &dyn GitPort,
) -> anyhow::Result<String> {
    let version = match version {
        Some(v) => v,
        None => {
            let repo = FsRepoView::new(repo_root.to_path_buf());
            declared_base_version(&repo)
                .context("read declared version")?
                .context("repo declares no version; pass one explicitly")?
        }
    };

    let tag = format!("v{version}");
    git.create_tag(repo_root, &tag, &format!("Release {tag}"))
        .with_context(|| format!("create tag {tag}"))?;

    info!(%tag, "created release tag");
    Ok(tag)
}

#[derive(Debug, Clone)]
pub struct DiskUsageEntry {
    pub kilobytes: u64,
    pub path: Utf8PathBuf,
}

#[derive(Debug, Clone)]
pub struct DiskUsageReport {
    pub entries: Vec<DiskUsageEntry>,
}

/// Report the biggest directories under `path` via `du`.
///
/// Unparsable lines of `du` output are skipped; a failing `du` is an error
/// carrying its exit code.
pub fn disk_usage(
    path: &Utf8Path,
    depth: u32,
    top: usize,
    process: &dyn ProcessPort,
) -> anyhow::Result<DiskUsageReport> {
    let depth_arg = depth.to_string();
    let out = process
        .run("du", &["-k", "-d", &depth_arg, path.as_str()], path)
        .context("run du")?;

    if !out.success() {
        anyhow::bail!("du exited with status {}: {}", out.status, out.stderr.trim());
    }

    let mut entries: Vec<DiskUsageEntry> = out
        .stdout
        .lines()
        .filter_map(parse_du_line)
        .collect();

    entries.sort_by(|a, b| b.kilobytes.cmp(&a.kilobytes).then(a.path.cmp(&b.path)));
    entries.truncate(top);

    Ok(DiskUsageReport { entries })
}

fn parse_du_line(line: &str) -> Option<DiskUsageEntry> {
    let (size, path) = line.split_once('\t')?;
    let kilobytes = size.trim().parse().ok()?;
    Some(DiskUsageEntry {
        kilobytes,
        path: Utf8PathBuf::from(path.trim()),
    })
}

/// Markdown table of a disk usage report.
pub fn render_disk_usage_md(report: &DiskUsageReport) -> String {
    let mut out = String::new();
    out.push_str("# disk usage\n\n");
    if report.entries.is_empty() {
        out.push_str("_No entries._\n");
        return out;
    }
    out.push_str("| size (KB) | path |\n|---:|---|\n");
    for entry in &report.entries {
        out.push_str(&format!("| {} | `{}` |\n", entry.kilobytes, entry.path));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ProcessOutput;
    use chrono::TimeZone;
    use shipwright_types::goal::{GoalSpec, PlannedGoal};
    use shipwright_types::plan::{PlanPolicy, PushSummary, ToolInfo};
    use tempfile::TempDir;

    struct StubProcessPort {
        output: ProcessOutput,
    }

    impl ProcessPort for StubProcessPort {
        fn run(
            &self,
            _program: &str,
            _args: &[&str],
            _cwd: &Utf8Path,
        ) -> anyhow::Result<ProcessOutput> {
            Ok(self.output.clone())
        }
    }

    struct RecordingGitPort {
        tags: std::sync::Mutex<Vec<(String, String)>>,
    }

    impl RecordingGitPort {
        fn new() -> Self {
            Self {
                tags: std::sync::Mutex::new(vec![]),
            }
        }
    }

    impl GitPort for RecordingGitPort {
        fn head_sha(&self, _repo_root: &Utf8Path) -> anyhow::Result<Option<String>> {
            Ok(None)
        }

        fn is_dirty(&self, _repo_root: &Utf8Path) -> anyhow::Result<Option<bool>> {
            Ok(None)
        }

        fn create_tag(
            &self,
            _repo_root: &Utf8Path,
            name: &str,
            message: &str,
        ) -> anyhow::Result<()> {
            self.tags
                .lock()
                .expect("lock")
                .push((name.to_string(), message.to_string()));
            Ok(())
        }
    }

    fn write_plan_with_goal(dir: &Utf8Path, approval_required: bool) -> Utf8PathBuf {
        let mut plan = ShipwrightPlan::new(
            ToolInfo {
                name: "shipwright".into(),
                version: Some("0.0.0-test".into()),
                repo: None,
                commit: None,
            },
            PushSummary {
                owner: "o".into(),
                repo: "r".into(),
                branch: "main".into(),
                sha: "abc".into(),
                default_branch: true,
            },
            PlanPolicy::default(),
        );
        plan.goals.push(PlannedGoal::from_spec(GoalSpec {
            name: "deploy_production".into(),
            display_name: "deploy to production".into(),
            fulfillment: Some("k8s".into()),
            environment: Some("production".into()),
            depends_on: vec![],
            approval_required,
        }));

        let wire = PlanV1::try_from(&plan).expect("wire");
        let path = dir.join("plan.json");
        fs::write(&path, serde_json::to_string_pretty(&wire).expect("json")).expect("write");
        path
    }

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 7, 9, 0, 0).unwrap()
    }

    #[test]
    fn approve_flips_waiting_goal_and_persists() {
        let temp = TempDir::new().expect("temp dir");
        let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        let plan_path = write_plan_with_goal(&dir, true);

        let plan = approve_goal(&plan_path, "deploy_production", "alex", ts()).expect("approve");
        let goal = &plan.goals[0];
        assert_eq!(goal.state, GoalState::Approved);
        assert_eq!(
            goal.approval.as_ref().expect("approval").approved_by,
            "alex"
        );

        // Re-read from disk: the change persisted in wire format.
        let reread = fs::read_to_string(&plan_path).expect("read");
        let wire: PlanV1 = serde_json::from_str(&reread).expect("parse");
        assert_eq!(wire.goals[0].state, GoalState::Approved);
    }

    #[test]
    fn approve_rejects_non_waiting_goal() {
        let temp = TempDir::new().expect("temp dir");
        let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        let plan_path = write_plan_with_goal(&dir, false);

        let err = approve_goal(&plan_path, "deploy_production", "alex", ts())
            .expect_err("not waiting");
        assert!(err.to_string().contains("not waiting for approval"));
    }

    #[test]
    fn approve_rejects_unknown_goal() {
        let temp = TempDir::new().expect("temp dir");
        let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        let plan_path = write_plan_with_goal(&dir, true);

        let err = approve_goal(&plan_path, "nope", "alex", ts()).expect_err("unknown goal");
        assert!(err.to_string().contains("no goal named nope"));
    }

    #[test]
    fn tag_repo_uses_declared_version() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        fs::write(root.join("package.json"), r#"{ "version": "1.2.3" }"#).expect("write");

        let git = RecordingGitPort::new();
        let tag = tag_repo(&root, None, &git).expect("tag");
        assert_eq!(tag, "v1.2.3");
        let tags = git.tags.lock().expect("lock");
        assert_eq!(tags[0], ("v1.2.3".to_string(), "Release v1.2.3".to_string()));
    }

    #[test]
    fn tag_repo_prefers_explicit_version() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");

        let git = RecordingGitPort::new();
        let tag = tag_repo(&root, Some("9.9.9".into()), &git).expect("tag");
        assert_eq!(tag, "v9.9.9");
    }

    #[test]
    fn tag_repo_errors_without_any_version() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");

        let git = RecordingGitPort::new();
        let err = tag_repo(&root, None, &git).expect_err("no version");
        assert!(err.to_string().contains("declares no version"));
    }

    #[test]
    fn disk_usage_sorts_and_truncates() {
        let process = StubProcessPort {
            output: ProcessOutput {
                status: 0,
                stdout: "12\t./small\n900\t./big\n500\t./mid\nnot a du line\n".to_string(),
                stderr: String::new(),
            },
        };

        let report =
            disk_usage(&Utf8PathBuf::from("."), 2, 2, &process).expect("disk usage");
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.entries[0].path.as_str(), "./big");
        assert_eq!(report.entries[0].kilobytes, 900);
        assert_eq!(report.entries[1].path.as_str(), "./mid");
    }

    #[test]
    fn disk_usage_propagates_du_failure() {
        let process = StubProcessPort {
            output: ProcessOutput {
                status: 1,
                stdout: String::new(),
                stderr: "du: cannot access".to_string(),
            },
        };

        let err = disk_usage(&Utf8PathBuf::from("."), 2, 5, &process).expect_err("du failed");
        assert!(err.to_string().contains("status 1"));
    }

    #[test]
    fn disk_usage_renders_markdown_table() {
        let report = DiskUsageReport {
            entries: vec![DiskUsageEntry {
                kilobytes: 900,
                path: Utf8PathBuf::from("./big"),
            }],
        };
        let md = render_disk_usage_md(&report);
        assert!(md.contains("| 900 | `./big` |"));

        let empty = DiskUsageReport { entries: vec![] };
        assert!(render_disk_usage_md(&empty).contains("_No entries._"));
    }
}
