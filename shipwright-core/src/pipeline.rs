//! Core plan and autofix pipelines, extracted from the CLI.
//!
//! These entry points are I/O-agnostic: filesystem, git, and review-report
//! access go through the port traits.

use crate::fingerprints::compute_fingerprints;
use crate::ports::{GitPort, PushSource, ReviewSource, WritePort};
use crate::settings::{AutofixSettings, PlanSettings};
use anyhow::Context;
use chrono::Utc;
use shipwright_domain::{
    FsRepoView, PlanContext, Planner, PlannerConfig, builtin_autofix_registrations,
    select_autofixes,
};
use shipwright_edit::{ApplyOptions, Autofix, AutofixOutcome, apply_autofixes, collect_candidates};
use shipwright_render::{render_comment_slack, render_plan_md, render_review_md};
use shipwright_review::{LoadedLintReport, sort_review_comments};
use shipwright_types::fingerprint::FingerprintSet;
use shipwright_types::plan::{PlanInput, PlannedAutofix, ShipwrightPlan, ToolInfo};
use shipwright_types::push::PushEvent;
use shipwright_types::report::{
    ReportArtifacts, ReportCounts, ReportFinding, ReportRunInfo, ReportSeverity, ReportStatus,
    ReportToolInfo, ReportVerdict, ShipwrightReport,
};
use shipwright_types::review::{ReviewComment, Severity};
use shipwright_types::wire::{PlanV1, ReportV1};
use tracing::debug;

/// Error type for pipeline results. Exit code 2 = policy block, 1 = tool
/// error.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("policy block")]
    PolicyBlock,
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

/// Outcome of `run_plan`.
pub struct PlanOutcome {
    pub plan: ShipwrightPlan,
    pub report: ShipwrightReport,
    pub fingerprints: FingerprintSet,
    /// Sorted review comments from all loaded lint reports.
    pub review_comments: Vec<ReviewComment>,
    /// Dry-run patch of the registered autofixes.
    pub patch: String,
    pub policy_block: bool,
}

/// Run the plan pipeline: evaluate rules, preview autofixes, compute
/// fingerprints, fold in lint reports.
///
/// The caller is responsible for writing artifacts to disk (via `WritePort`)
/// or the convenience `write_plan_artifacts` helper.
pub fn run_plan(
    settings: &PlanSettings,
    push_source: &dyn PushSource,
    review_source: &dyn ReviewSource,
    git: &dyn GitPort,
    tool: ToolInfo,
) -> Result<PlanOutcome, ToolError> {
    let push = push_source.load_push().context("load push event")?;

    let planner_cfg = PlannerConfig {
        allow: settings.allow.clone(),
        deny: settings.deny.clone(),
        allow_dirty: settings.allow_dirty,
    };

    let planner = Planner::new();
    let ctx = PlanContext {
        repo_root: settings.repo_root.clone(),
        artifacts_dir: settings.artifacts_dir.clone(),
        config: planner_cfg,
    };
    let repo = FsRepoView::new(settings.repo_root.clone());

    let mut plan = planner
        .plan(&ctx, &push, &repo, tool.clone())
        .context("generate plan")?;

    // Dry-run the registered autofixes so the plan shows what they would do.
    let (planned_autofixes, patch) =
        preview_autofixes(settings, &push, &repo).context("preview autofixes")?;
    plan.summary.autofixes_total = planned_autofixes.len() as u64;
    plan.summary.patch_bytes = Some(patch.len() as u64);
    plan.autofixes = planned_autofixes;

    // Fold lint reports into inputs + sorted comments.
    let reports = review_source.load_lint_reports()?;
    plan.inputs = reports.iter().map(to_plan_input).collect();
    let review_comments = collect_comments(&reports);

    let fingerprints = compute_fingerprints(&repo, &push.sha).context("compute fingerprints")?;

    // Note the working tree state; a dirty tree is only a planning warning.
    if let Ok(Some(dirty)) = git.is_dirty(&settings.repo_root) {
        debug!(dirty, "working tree state at plan time");
    }

    let report = report_from_plan(&plan, tool, &reports, &review_comments);
    let policy_block = plan.goals.iter().any(|g| g.gated);

    Ok(PlanOutcome {
        plan,
        report,
        fingerprints,
        review_comments,
        patch,
        policy_block,
    })
}

fn preview_autofixes(
    settings: &PlanSettings,
    push: &PushEvent,
    repo: &FsRepoView,
) -> anyhow::Result<(Vec<PlannedAutofix>, String)> {
    let registrations = builtin_autofix_registrations(&settings.autofix);
    let selected = select_autofixes(&registrations, push, repo)?;

    let mut planned = Vec::new();
    let mut patch = String::new();

    for registration in selected {
        let candidates = collect_candidates(&settings.repo_root, &registration.candidates)?;
        let autofixes: [&dyn Autofix; 1] = [registration.autofix.as_ref()];
        let outcome = apply_autofixes(
            &settings.repo_root,
            &autofixes,
            &candidates,
            &ApplyOptions {
                dry_run: true,
                backup_enabled: false,
                backup_suffix: String::new(),
            },
        )?;

        patch.push_str(&outcome.patch);
        planned.push(PlannedAutofix {
            name: registration.name.clone(),
            selected_by: Some(registration.test.name().to_string()),
            files: outcome
                .changes
                .iter()
                .map(|c| c.path.to_string())
                .collect(),
        });
    }

    Ok((planned, patch))
}

fn to_plan_input(r: &LoadedLintReport) -> PlanInput {
    match &r.report {
        Ok(report) => PlanInput {
            path: r.path.to_string(),
            tool: Some(report.tool.name.clone()),
            error: None,
        },
        Err(e) => PlanInput {
            path: r.path.to_string(),
            tool: None,
            error: Some(e.to_string()),
        },
    }
}

fn collect_comments(reports: &[LoadedLintReport]) -> Vec<ReviewComment> {
    let mut comments: Vec<ReviewComment> = reports
        .iter()
        .filter_map(|r| r.report.as_ref().ok())
        .flat_map(|report| report.comments.iter().cloned())
        .collect();
    sort_review_comments(&mut comments);
    comments
}

/// Write all plan artifacts to the output directory.
pub fn write_plan_artifacts(
    outcome: &PlanOutcome,
    out_dir: &camino::Utf8Path,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    writer.create_dir_all(out_dir)?;

    let plan_wire = PlanV1::try_from(&outcome.plan).context("convert plan to wire")?;
    let plan_json = serde_json::to_string_pretty(&plan_wire).context("serialize plan")?;
    writer.write_file(&out_dir.join("plan.json"), plan_json.as_bytes())?;

    let plan_md = render_plan_md(&outcome.plan);
    writer.write_file(&out_dir.join("plan.md"), plan_md.as_bytes())?;

    let comment = render_comment_slack(&outcome.plan);
    writer.write_file(&out_dir.join("comment.md"), comment.as_bytes())?;

    writer.write_file(&out_dir.join("patch.diff"), outcome.patch.as_bytes())?;

    let review_md = render_review_md(&outcome.review_comments);
    writer.write_file(&out_dir.join("review.md"), review_md.as_bytes())?;

    let fingerprints_json =
        serde_json::to_string_pretty(&outcome.fingerprints).context("serialize fingerprints")?;
    writer.write_file(
        &out_dir.join("fingerprints.json"),
        fingerprints_json.as_bytes(),
    )?;

    let report_wire = ReportV1::from(&outcome.report);
    let report_json = serde_json::to_string_pretty(&report_wire).context("serialize report")?;
    writer.write_file(&out_dir.join("report.json"), report_json.as_bytes())?;

    // Deploy payloads as YAML, one file per k8s goal.
    for goal in &outcome.plan.goals {
        if goal.spec.fulfillment.as_deref() != Some("k8s") {
            continue;
        }
        let Some(data) = &goal.data else {
            continue;
        };
        let deployment: shipwright_k8s::DeploymentData =
            serde_json::from_value(data.clone()).context("parse deploy goal data")?;
        let yaml = shipwright_k8s::render_deployment_yaml(&deployment)
            .with_context(|| format!("render deploy yaml for {}", goal.spec.name))?;
        writer.write_file(
            &out_dir.join("deploy").join(format!("{}.yaml", goal.spec.name)),
            yaml.as_bytes(),
        )?;
    }

    Ok(())
}

/// Outcome of `run_autofix`.
pub struct AutofixRunOutcome {
    pub outcome: AutofixOutcome,
    pub report: ShipwrightReport,
    pub policy_block: bool,
}

/// Apply the registered autofixes to the working tree (dry-run by default).
pub fn run_autofix(
    settings: &AutofixSettings,
    push: &PushEvent,
    git: &dyn GitPort,
    tool: ToolInfo,
) -> Result<AutofixRunOutcome, ToolError> {
    // Block real application on a dirty working tree unless allowed.
    if !settings.dry_run
        && !settings.allow_dirty
        && let Ok(Some(true)) = git.is_dirty(&settings.repo_root)
    {
        let report = autofix_report(
            tool,
            &AutofixOutcome::default(),
            Some("dirty working tree".to_string()),
        );
        return Ok(AutofixRunOutcome {
            outcome: AutofixOutcome::default(),
            report,
            policy_block: true,
        });
    }

    let repo = FsRepoView::new(settings.repo_root.clone());
    let registrations = builtin_autofix_registrations(&settings.autofix);
    let selected = select_autofixes(&registrations, push, &repo).context("select autofixes")?;

    let opts = ApplyOptions {
        dry_run: settings.dry_run,
        backup_enabled: settings.backup_enabled,
        backup_suffix: settings.backup_suffix.clone(),
    };

    let mut combined = AutofixOutcome::default();
    for registration in selected {
        let candidates = collect_candidates(&settings.repo_root, &registration.candidates)?;
        let autofixes: [&dyn Autofix; 1] = [registration.autofix.as_ref()];
        let outcome = apply_autofixes(&settings.repo_root, &autofixes, &candidates, &opts)
            .with_context(|| format!("apply autofix {}", registration.name))?;
        combined.changes.extend(outcome.changes);
        combined.flagged.extend(outcome.flagged);
        combined.patch.push_str(&outcome.patch);
    }

    let report = autofix_report(tool, &combined, None);
    Ok(AutofixRunOutcome {
        outcome: combined,
        report,
        policy_block: false,
    })
}

// ── report helpers ───────────────────────────────────────────────────────

pub(crate) fn report_from_plan(
    plan: &ShipwrightPlan,
    tool: ToolInfo,
    reports: &[LoadedLintReport],
    comments: &[ReviewComment],
) -> ShipwrightReport {
    let failed_inputs: Vec<&LoadedLintReport> =
        reports.iter().filter(|r| r.report.is_err()).collect();

    let mut counts = ReportCounts::default();
    for comment in comments {
        match comment.severity {
            Severity::Error => counts.error += 1,
            Severity::Warn => counts.warn += 1,
            Severity::Info => counts.info += 1,
        }
    }
    counts.warn += failed_inputs.len() as u64 + plan.summary.goals_gated;

    let mut reasons = Vec::new();
    if !failed_inputs.is_empty() {
        reasons.push("partial_inputs".to_string());
    }
    if plan.summary.goals_gated > 0 {
        reasons.push("gated_goals".to_string());
    }
    if counts.error > 0 {
        reasons.push("review_errors".to_string());
    }

    let status = if counts.error > 0 {
        ReportStatus::Fail
    } else if counts.warn > 0 {
        ReportStatus::Warn
    } else {
        ReportStatus::Pass
    };

    let mut findings: Vec<ReportFinding> = Vec::new();
    for failure in &failed_inputs {
        let reason = failure
            .report
            .as_ref()
            .err()
            .map(|e| e.to_string())
            .unwrap_or_default();
        findings.push(ReportFinding {
            severity: ReportSeverity::Warn,
            check_id: Some("inputs".to_string()),
            code: "lint_report_load_failed".to_string(),
            message: format!("Lint report failed to load: {} ({})", failure.path, reason),
            location: None,
        });
    }

    ShipwrightReport {
        schema: shipwright_types::schema::SHIPWRIGHT_REPORT_V1.to_string(),
        tool: ReportToolInfo {
            name: tool.name,
            version: tool.version.unwrap_or_else(|| "unknown".to_string()),
            commit: tool.commit,
        },
        run: ReportRunInfo {
            started_at: Utc::now().to_rfc3339(),
            ended_at: Some(Utc::now().to_rfc3339()),
            duration_ms: Some(0),
        },
        verdict: ReportVerdict {
            status,
            counts,
            reasons,
        },
        findings,
        artifacts: Some(ReportArtifacts {
            plan: Some("plan.json".to_string()),
            patch: Some("patch.diff".to_string()),
            comment: Some("comment.md".to_string()),
            fingerprints: Some("fingerprints.json".to_string()),
        }),
        data: Some(serde_json::json!({
            "shipwright": {
                "plan": {
                    "goal_set_id": plan.goal_set_id,
                    "goals_total": plan.summary.goals_total,
                    "goals_gated": plan.summary.goals_gated,
                    "goals_waiting_for_approval": plan.summary.goals_waiting_for_approval,
                    "autofixes_total": plan.summary.autofixes_total,
                    "rules_matched": plan.rules_matched,
                }
            }
        })),
    }
}

fn autofix_report(
    tool: ToolInfo,
    outcome: &AutofixOutcome,
    blocked_reason: Option<String>,
) -> ShipwrightReport {
    let blocked = blocked_reason.is_some();
    let status = if blocked {
        ReportStatus::Warn
    } else if outcome.flagged.is_empty() {
        ReportStatus::Pass
    } else {
        ReportStatus::Warn
    };

    let mut findings: Vec<ReportFinding> = Vec::new();
    for flagged in &outcome.flagged {
        findings.push(ReportFinding {
            severity: ReportSeverity::Warn,
            check_id: Some(flagged.autofix.clone()),
            code: "needs_manual_review".to_string(),
            message: flagged.reason.clone(),
            location: Some(flagged.path.to_string()),
        });
    }

    let mut reasons = Vec::new();
    if let Some(reason) = blocked_reason {
        reasons.push(reason);
    }

    ShipwrightReport {
        schema: shipwright_types::schema::SHIPWRIGHT_REPORT_V1.to_string(),
        tool: ReportToolInfo {
            name: tool.name,
            version: tool.version.unwrap_or_else(|| "unknown".to_string()),
            commit: tool.commit,
        },
        run: ReportRunInfo {
            started_at: Utc::now().to_rfc3339(),
            ended_at: Some(Utc::now().to_rfc3339()),
            duration_ms: Some(0),
        },
        verdict: ReportVerdict {
            status,
            counts: ReportCounts {
                info: outcome.changes.len() as u64,
                warn: outcome.flagged.len() as u64 + reasons.len() as u64,
                error: 0,
            },
            reasons,
        },
        findings,
        artifacts: None,
        data: Some(serde_json::json!({
            "shipwright": {
                "autofix": {
                    "files_changed": outcome.changes.len(),
                    "files_flagged": outcome.flagged.len(),
                }
            }
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryPushSource, InMemoryReviewSource};
    use camino::{Utf8Path, Utf8PathBuf};
    use shipwright_review::LintLoadError;
    use shipwright_types::push::RepoRef;
    use shipwright_types::review::{LintReport, SourceLocation};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct StubGitPort {
        head: Option<String>,
        dirty: Option<bool>,
    }

    impl GitPort for StubGitPort {
        fn head_sha(&self, _repo_root: &Utf8Path) -> anyhow::Result<Option<String>> {
            Ok(self.head.clone())
        }

        fn is_dirty(&self, _repo_root: &Utf8Path) -> anyhow::Result<Option<bool>> {
            Ok(self.dirty)
        }

        fn create_tag(
            &self,
            _repo_root: &Utf8Path,
            _name: &str,
            _message: &str,
        ) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemWritePort {
        files: Mutex<HashMap<String, Vec<u8>>>,
    }

    impl WritePort for MemWritePort {
        fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
            self.files
                .lock()
                .expect("lock files")
                .insert(path.as_str().to_string(), contents.to_vec());
            Ok(())
        }

        fn create_dir_all(&self, _path: &Utf8Path) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn tool() -> ToolInfo {
        ToolInfo {
            name: "shipwright".into(),
            version: Some("0.0.0-test".into()),
            repo: None,
            commit: None,
        }
    }

    fn push_for(repo_name: &str, branch: &str) -> PushEvent {
        PushEvent {
            repo: RepoRef {
                owner: "shipwright-dev".into(),
                name: repo_name.into(),
                default_branch: "main".into(),
                provider: None,
            },
            branch: branch.into(),
            sha: "deadbeefcafebabe".into(),
            timestamp: None,
            files_changed: vec!["lib/index.ts".into()],
            author: None,
        }
    }

    fn node_repo() -> (TempDir, Utf8PathBuf) {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        std::fs::write(
            root.join("package.json"),
            r#"{ "name": "some-lib", "version": "1.2.3", "dependencies": { "lodash": "^4" } }"#,
        )
        .expect("write package.json");
        std::fs::create_dir_all(root.join("lib")).expect("mkdir lib");
        std::fs::write(root.join("lib").join("index.ts"), "let x = 1;\n")
            .expect("write index.ts");
        (temp, root)
    }

    fn settings_for(root: &Utf8Path) -> PlanSettings {
        PlanSettings {
            repo_root: root.to_path_buf(),
            artifacts_dir: root.join("artifacts"),
            out_dir: root.join("artifacts/shipwright"),
            ..PlanSettings::default()
        }
    }

    fn lint_report(comments: Vec<ReviewComment>) -> LoadedLintReport {
        LoadedLintReport {
            path: Utf8PathBuf::from("artifacts/tslint/lint.json"),
            tool_id: "tslint".to_string(),
            report: Ok(LintReport {
                schema: shipwright_types::schema::LINT_REPORT_V1.to_string(),
                tool: ToolInfo {
                    name: "tslint".to_string(),
                    version: None,
                    repo: None,
                    commit: None,
                },
                comments,
            }),
        }
    }

    #[test]
    fn run_plan_previews_autofixes_and_fingerprints() {
        let (_temp, root) = node_repo();
        let settings = settings_for(&root);
        let push_source = InMemoryPushSource::new(push_for("some-lib", "feature/x"));
        let review_source = InMemoryReviewSource::new(vec![]);
        let git = StubGitPort::default();

        let outcome = run_plan(&settings, &push_source, &review_source, &git, tool())
            .expect("run_plan");

        // The header autofix wants to prepend to lib/index.ts.
        assert_eq!(outcome.plan.summary.autofixes_total, 2);
        let header = outcome
            .plan
            .autofixes
            .iter()
            .find(|a| a.name == "license-header")
            .expect("header autofix");
        assert_eq!(header.files, vec!["lib/index.ts".to_string()]);
        assert!(outcome.patch.contains("+/*"));

        // Dry run: the tree is untouched.
        let on_disk = std::fs::read_to_string(root.join("lib/index.ts")).expect("read");
        assert_eq!(on_disk, "let x = 1;\n");

        assert!(outcome.fingerprints.entries.contains_key("npm-deps"));
        assert!(!outcome.policy_block);
        assert_eq!(outcome.report.verdict.status, ReportStatus::Pass);
    }

    #[test]
    fn run_plan_folds_in_sorted_review_comments() {
        let (_temp, root) = node_repo();
        let settings = settings_for(&root);
        let push_source = InMemoryPushSource::new(push_for("some-lib", "main"));
        let comments = vec![
            ReviewComment {
                severity: Severity::Info,
                category: "style".into(),
                subcategory: "tslint".into(),
                detail: "nit".into(),
                source_location: None,
            },
            ReviewComment {
                severity: Severity::Error,
                category: "no-any".into(),
                subcategory: "tslint".into(),
                detail: "no any".into(),
                source_location: Some(SourceLocation {
                    path: Utf8PathBuf::from("lib/index.ts"),
                    offset: 0,
                    line: Some(1),
                    column: None,
                }),
            },
        ];
        let review_source = InMemoryReviewSource::new(vec![lint_report(comments)]);
        let git = StubGitPort::default();

        let outcome = run_plan(&settings, &push_source, &review_source, &git, tool())
            .expect("run_plan");

        assert_eq!(outcome.review_comments.len(), 2);
        assert_eq!(outcome.review_comments[0].severity, Severity::Error);
        assert_eq!(outcome.report.verdict.status, ReportStatus::Fail);
        assert!(outcome
            .report
            .verdict
            .reasons
            .contains(&"review_errors".to_string()));
        assert_eq!(outcome.plan.inputs.len(), 1);
        assert_eq!(outcome.plan.inputs[0].tool.as_deref(), Some("tslint"));
    }

    #[test]
    fn run_plan_degrades_failed_inputs_to_warnings() {
        let (_temp, root) = node_repo();
        let settings = settings_for(&root);
        let push_source = InMemoryPushSource::new(push_for("some-lib", "feature/x"));
        let review_source = InMemoryReviewSource::new(vec![LoadedLintReport {
            path: Utf8PathBuf::from("artifacts/broken/lint.json"),
            tool_id: "broken".to_string(),
            report: Err(LintLoadError::Json {
                message: "bad json".to_string(),
            }),
        }]);
        let git = StubGitPort::default();

        let outcome = run_plan(&settings, &push_source, &review_source, &git, tool())
            .expect("run_plan");

        assert_eq!(outcome.report.verdict.status, ReportStatus::Warn);
        assert!(outcome
            .report
            .verdict
            .reasons
            .contains(&"partial_inputs".to_string()));
        assert_eq!(outcome.plan.inputs.len(), 1);
        assert!(outcome.plan.inputs[0].error.is_some());
        assert_eq!(outcome.report.findings.len(), 1);
        assert_eq!(outcome.report.findings[0].code, "lint_report_load_failed");
    }

    #[test]
    fn run_plan_marks_policy_block_when_goals_gated() {
        let (_temp, root) = node_repo();
        let mut settings = settings_for(&root);
        settings.deny = vec!["publish".to_string()];
        let push_source = InMemoryPushSource::new(push_for("some-lib", "main"));
        let review_source = InMemoryReviewSource::new(vec![]);
        let git = StubGitPort::default();

        let outcome = run_plan(&settings, &push_source, &review_source, &git, tool())
            .expect("run_plan");

        assert!(outcome.policy_block);
        assert!(outcome
            .report
            .verdict
            .reasons
            .contains(&"gated_goals".to_string()));
    }

    #[test]
    fn write_plan_artifacts_writes_expected_files() {
        let (_temp, root) = node_repo();
        let settings = settings_for(&root);
        let push_source = InMemoryPushSource::new(push_for("some-lib", "feature/x"));
        let review_source = InMemoryReviewSource::new(vec![]);
        let git = StubGitPort::default();

        let outcome = run_plan(&settings, &push_source, &review_source, &git, tool())
            .expect("run_plan");

        let writer = MemWritePort::default();
        let out_dir = Utf8PathBuf::from("out");
        write_plan_artifacts(&outcome, &out_dir, &writer).expect("write artifacts");

        let files = writer.files.lock().expect("files");
        for name in [
            "out/plan.json",
            "out/plan.md",
            "out/comment.md",
            "out/patch.diff",
            "out/review.md",
            "out/fingerprints.json",
            "out/report.json",
        ] {
            assert!(files.contains_key(name), "missing {name}");
        }

        let plan_json = files.get("out/plan.json").expect("plan json");
        let value: serde_json::Value = serde_json::from_slice(plan_json).expect("parse plan");
        assert_eq!(value["schema"], "shipwright.plan.v1");
    }

    #[test]
    fn write_plan_artifacts_renders_deploy_yaml_for_k8s_goals() {
        let (_temp, root) = node_repo();
        std::fs::write(root.join("Dockerfile"), "FROM node:22\n").expect("write Dockerfile");
        let settings = settings_for(&root);
        let push_source = InMemoryPushSource::new(push_for("card-automation", "main"));
        let review_source = InMemoryReviewSource::new(vec![]);
        let git = StubGitPort::default();

        let outcome = run_plan(&settings, &push_source, &review_source, &git, tool())
            .expect("run_plan");

        let writer = MemWritePort::default();
        let out_dir = Utf8PathBuf::from("out");
        write_plan_artifacts(&outcome, &out_dir, &writer).expect("write artifacts");

        let files = writer.files.lock().expect("files");
        let staging = files
            .get("out/deploy/deploy_staging.yaml")
            .expect("staging yaml");
        let yaml = String::from_utf8(staging.clone()).expect("utf8");
        assert!(yaml.contains("namespace: automation"));
        assert!(yaml.contains("host: pusher.services.atomist.com"));
        assert!(files.contains_key("out/deploy/deploy_production.yaml"));
    }

    #[test]
    fn run_autofix_blocks_on_dirty_tree() {
        let (_temp, root) = node_repo();
        let settings = AutofixSettings {
            repo_root: root.clone(),
            dry_run: false,
            ..AutofixSettings::default()
        };
        let git = StubGitPort {
            head: None,
            dirty: Some(true),
        };

        let outcome = run_autofix(&settings, &push_for("some-lib", "main"), &git, tool())
            .expect("run_autofix");

        assert!(outcome.policy_block);
        assert!(outcome.outcome.changes.is_empty());
        assert_eq!(outcome.report.verdict.status, ReportStatus::Warn);
        let on_disk = std::fs::read_to_string(root.join("lib/index.ts")).expect("read");
        assert_eq!(on_disk, "let x = 1;\n");
    }

    #[test]
    fn run_autofix_applies_header_when_clean() {
        let (_temp, root) = node_repo();
        let settings = AutofixSettings {
            repo_root: root.clone(),
            dry_run: false,
            backup_enabled: false,
            ..AutofixSettings::default()
        };
        let git = StubGitPort {
            head: None,
            dirty: Some(false),
        };

        let outcome = run_autofix(&settings, &push_for("some-lib", "main"), &git, tool())
            .expect("run_autofix");

        assert!(!outcome.policy_block);
        assert_eq!(outcome.outcome.changes.len(), 1);
        let on_disk = std::fs::read_to_string(root.join("lib/index.ts")).expect("read");
        assert!(on_disk.starts_with("/*"));
        assert!(on_disk.ends_with("let x = 1;\n"));
    }

    #[test]
    fn run_autofix_dry_run_ignores_dirty_tree() {
        let (_temp, root) = node_repo();
        let settings = AutofixSettings {
            repo_root: root.clone(),
            dry_run: true,
            ..AutofixSettings::default()
        };
        let git = StubGitPort {
            head: None,
            dirty: Some(true),
        };

        let outcome = run_autofix(&settings, &push_for("some-lib", "main"), &git, tool())
            .expect("run_autofix");

        assert!(!outcome.policy_block);
        assert_eq!(outcome.outcome.changes.len(), 1);
        let on_disk = std::fs::read_to_string(root.join("lib/index.ts")).expect("read");
        assert_eq!(on_disk, "let x = 1;\n");
    }
}
