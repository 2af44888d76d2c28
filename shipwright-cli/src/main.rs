use anyhow::Context;
use camino::Utf8PathBuf;
use chrono::Utc;
use clap::{Parser, Subcommand};
use fs_err as fs;
use shipwright_cli::config::{self, ConfigMerger};
use shipwright_cli::explain;
use shipwright_core::{
    AutofixSettings, FsPushSource, FsReviewSource, FsWritePort, PlanSettings, PushSource, RunMode,
    ShellGitPort, ShellProcessPort, approve_goal, disk_usage, render_disk_usage_md, run_autofix,
    run_plan, tag_repo, write_plan_artifacts,
};
use shipwright_domain::{FsRepoView, declared_base_version, goal_catalog, prerelease_version};
use shipwright_edit::{update_dependency_version, update_formula, update_npm_install};
use shipwright_render::render_review_md;
use shipwright_review::{parse_tslint_output, sort_review_comments};
use shipwright_types::plan::ToolInfo;
use shipwright_types::push::{PushEvent, RepoRef};
use shipwright_types::review::LintReport;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "shipwright",
    version,
    about = "Push-driven delivery machine: goal planning, autofixes, and release glue."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan the goal set for a push event.
    Plan(PlanArgs),
    /// Apply registered autofixes to the working tree (default: dry-run).
    Autofix(AutofixArgs),
    /// Parse, sort, and render a lint tool's output.
    Review(ReviewArgs),
    /// Create the release tag for the declared version.
    Tag(TagArgs),
    /// Approve a goal that is waiting for approval.
    Approve(ApproveArgs),
    /// Report the biggest directories under a path.
    DiskUsage(DiskUsageArgs),
    /// Print the timestamped prerelease version for the working tree.
    Version(VersionArgs),
    /// Rewrite an npm module pin in a Dockerfile.
    PinNpm(PinNpmArgs),
    /// Bump a package.json dependency to a new version.
    BumpDependency(BumpDependencyArgs),
    /// Update a Homebrew formula for a new release tarball.
    UpdateFormula(UpdateFormulaArgs),
    /// Explain what a goal or autofix does.
    Explain(ExplainArgs),
    /// List all goals in the catalog.
    ListGoals(ListGoalsArgs),
}

#[derive(Debug, Parser)]
struct PlanArgs {
    /// Repository root (default: current directory).
    #[arg(long, default_value = ".")]
    repo_root: Utf8PathBuf,

    /// Push event JSON file.
    #[arg(long)]
    push: Utf8PathBuf,

    /// Artifacts directory containing lint reports (default: <repo_root>/artifacts).
    #[arg(long)]
    artifacts_dir: Option<Utf8PathBuf>,

    /// Output directory for shipwright artifacts (default: <artifacts_dir>/shipwright).
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,

    /// Allowlist patterns for goal names.
    #[arg(long)]
    allow: Vec<String>,

    /// Denylist patterns for goal names.
    #[arg(long)]
    deny: Vec<String>,

    /// Map policy blocks (exit 2) to exit 0; the report still records them.
    #[arg(long, default_value_t = false)]
    cockpit: bool,
}

#[derive(Debug, Parser)]
struct AutofixArgs {
    /// Repository root (default: current directory).
    #[arg(long, default_value = ".")]
    repo_root: Utf8PathBuf,

    /// Push event JSON file; synthesized from the working tree when absent.
    #[arg(long)]
    push: Option<Utf8PathBuf>,

    /// Apply changes to disk. If omitted, runs a dry-run and prints the patch.
    #[arg(long, default_value_t = false)]
    apply: bool,

    /// Allow applying autofixes when the working tree has uncommitted changes.
    #[arg(long, default_value_t = false)]
    allow_dirty: bool,

    /// Map policy blocks (exit 2) to exit 0.
    #[arg(long, default_value_t = false)]
    cockpit: bool,
}

#[derive(Debug, Parser)]
struct ReviewArgs {
    /// Lint output file (lint.report.v1 envelope or raw tslint JSON array).
    input: Utf8PathBuf,

    /// Tool name recorded for raw tslint input.
    #[arg(long, default_value = "tslint")]
    tool: String,
}

#[derive(Debug, Parser)]
struct TagArgs {
    /// Repository root (default: current directory).
    #[arg(long, default_value = ".")]
    repo_root: Utf8PathBuf,

    /// Version to tag; the declared package version when omitted.
    #[arg(long)]
    version: Option<String>,
}

#[derive(Debug, Parser)]
struct ApproveArgs {
    /// Plan artifact to update (default: <repo_root>/artifacts/shipwright/plan.json).
    #[arg(long)]
    plan: Option<Utf8PathBuf>,

    /// Repository root (default: current directory).
    #[arg(long, default_value = ".")]
    repo_root: Utf8PathBuf,

    /// Goal name to approve.
    #[arg(long)]
    goal: String,

    /// Who is approving.
    #[arg(long)]
    by: String,
}

#[derive(Debug, Parser)]
struct DiskUsageArgs {
    /// Directory to inspect (default: current directory).
    #[arg(default_value = ".")]
    path: Utf8PathBuf,

    /// du depth.
    #[arg(long, default_value_t = 2)]
    depth: u32,

    /// How many entries to report.
    #[arg(long, default_value_t = 10)]
    top: usize,
}

#[derive(Debug, Parser)]
struct VersionArgs {
    /// Repository root (default: current directory).
    #[arg(long, default_value = ".")]
    repo_root: Utf8PathBuf,

    /// Branch the version is computed for.
    #[arg(long, default_value = "main")]
    branch: String,

    /// The repo's default branch.
    #[arg(long, default_value = "main")]
    default_branch: String,
}

#[derive(Debug, Parser)]
struct UpdateFormulaArgs {
    /// Formula file to rewrite.
    formula: Utf8PathBuf,

    /// Released version.
    #[arg(long)]
    version: String,

    /// sha256 of the release tarball.
    #[arg(long)]
    sha256: String,
}

#[derive(Debug, Parser)]
struct PinNpmArgs {
    /// Dockerfile to rewrite (default: ./Dockerfile).
    #[arg(long, default_value = "Dockerfile")]
    dockerfile: Utf8PathBuf,

    /// npm module name, e.g. "@atomist/cli".
    #[arg(long)]
    module: String,

    /// Version to pin.
    #[arg(long)]
    version: String,
}

#[derive(Debug, Parser)]
struct BumpDependencyArgs {
    /// package.json to rewrite (default: ./package.json).
    #[arg(long, default_value = "package.json")]
    manifest: Utf8PathBuf,

    /// Dependency name.
    #[arg(long)]
    name: String,

    /// New version range.
    #[arg(long)]
    version: String,
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    /// Goal or autofix key to explain (e.g. "deploy_production", "license-header").
    key: String,
}

#[derive(Debug, Parser)]
struct ListGoalsArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(1)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Plan(args) => cmd_plan(args),
        Command::Autofix(args) => cmd_autofix(args),
        Command::Review(args) => cmd_review(args),
        Command::Tag(args) => cmd_tag(args),
        Command::Approve(args) => cmd_approve(args),
        Command::DiskUsage(args) => cmd_disk_usage(args),
        Command::Version(args) => cmd_version(args),
        Command::PinNpm(args) => cmd_pin_npm(args),
        Command::BumpDependency(args) => cmd_bump_dependency(args),
        Command::UpdateFormula(args) => cmd_update_formula(args),
        Command::Explain(args) => cmd_explain(args),
        Command::ListGoals(args) => cmd_list_goals(args),
    }
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "shipwright".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
        repo: Some("shipwright-dev/shipwright".to_string()),
        commit: None,
    }
}

fn policy_exit(policy_block: bool, mode: RunMode) -> ExitCode {
    if policy_block && mode == RunMode::Standalone {
        ExitCode::from(2)
    } else {
        ExitCode::from(0)
    }
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<ExitCode> {
    let repo_root = args.repo_root;
    let artifacts_dir = args
        .artifacts_dir
        .unwrap_or_else(|| repo_root.join("artifacts"));
    let out_dir = args
        .out_dir
        .unwrap_or_else(|| artifacts_dir.join("shipwright"));

    let file_config = config::load_or_default(&repo_root).context("load shipwright.toml")?;
    let merger = ConfigMerger::new(file_config);
    let policy = merger.merge_policy(&args.allow, &args.deny, false);

    let settings = PlanSettings {
        repo_root: repo_root.clone(),
        artifacts_dir: artifacts_dir.clone(),
        out_dir: out_dir.clone(),
        allow: policy.allow,
        deny: policy.deny,
        allow_dirty: policy.allow_dirty,
        autofix: merger.autofix_options(),
        mode: if args.cockpit {
            RunMode::Cockpit
        } else {
            RunMode::Standalone
        },
    };

    let push_source = FsPushSource::new(args.push);
    let review_source = FsReviewSource::new(artifacts_dir);
    let git = ShellGitPort;

    let outcome = run_plan(&settings, &push_source, &review_source, &git, tool_info())?;
    write_plan_artifacts(&outcome, &out_dir, &FsWritePort)?;

    info!("wrote plan to {}", out_dir);
    Ok(policy_exit(outcome.policy_block, settings.mode))
}

fn cmd_autofix(args: AutofixArgs) -> anyhow::Result<ExitCode> {
    let repo_root = args.repo_root;
    let git = ShellGitPort;

    let file_config = config::load_or_default(&repo_root).context("load shipwright.toml")?;
    let merger = ConfigMerger::new(file_config);
    let policy = merger.merge_policy(&[], &[], args.allow_dirty);

    let push = match args.push {
        Some(path) => FsPushSource::new(path)
            .load_push()
            .context("load push event")?,
        None => synthesize_push(&repo_root, &git)?,
    };

    let settings = AutofixSettings {
        repo_root: repo_root.clone(),
        dry_run: !args.apply,
        allow_dirty: policy.allow_dirty,
        autofix: merger.autofix_options(),
        backup_enabled: merger.backup_enabled(),
        backup_suffix: merger.backup_suffix(),
        mode: if args.cockpit {
            RunMode::Cockpit
        } else {
            RunMode::Standalone
        },
    };

    let run = run_autofix(&settings, &push, &git, tool_info())?;

    if run.policy_block {
        error!("autofix blocked: dirty working tree (use --allow-dirty to override)");
        return Ok(policy_exit(true, settings.mode));
    }

    if settings.dry_run {
        print!("{}", run.outcome.patch);
    }
    for flagged in &run.outcome.flagged {
        info!(path = %flagged.path, autofix = %flagged.autofix, "needs manual review: {}", flagged.reason);
    }
    info!(
        changed = run.outcome.changes.len(),
        flagged = run.outcome.flagged.len(),
        dry_run = settings.dry_run,
        "autofix finished"
    );
    Ok(ExitCode::from(0))
}

/// Build a push event for the working tree when no webhook payload is at
/// hand: the repo name comes from the directory, the sha from git.
fn synthesize_push(
    repo_root: &camino::Utf8Path,
    git: &ShellGitPort,
) -> anyhow::Result<PushEvent> {
    use shipwright_core::GitPort;

    let name = repo_root
        .canonicalize_utf8()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string()))
        .unwrap_or_else(|| "workspace".to_string());
    let sha = git
        .head_sha(repo_root)?
        .unwrap_or_else(|| "0000000000000000".to_string());

    Ok(PushEvent {
        repo: RepoRef {
            owner: "local".to_string(),
            name,
            default_branch: "main".to_string(),
            provider: None,
        },
        branch: "main".to_string(),
        sha,
        timestamp: None,
        files_changed: vec![],
        author: None,
    })
}

fn cmd_review(args: ReviewArgs) -> anyhow::Result<ExitCode> {
    let contents =
        fs::read_to_string(&args.input).with_context(|| format!("read {}", args.input))?;

    let report = match serde_json::from_str::<LintReport>(&contents) {
        Ok(report) => report,
        Err(_) => parse_tslint_output(&args.tool, &contents)
            .with_context(|| format!("parse {} as lint report or tslint output", args.input))?,
    };

    let mut comments = report.comments;
    sort_review_comments(&mut comments);
    print!("{}", render_review_md(&comments));

    let errors = comments
        .iter()
        .filter(|c| c.severity == shipwright_types::review::Severity::Error)
        .count();
    if errors > 0 {
        info!(errors, "review found errors");
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::from(0))
}

fn cmd_tag(args: TagArgs) -> anyhow::Result<ExitCode> {
    let tag = tag_repo(&args.repo_root, args.version, &ShellGitPort)?;
    println!("{tag}");
    Ok(ExitCode::from(0))
}

fn cmd_approve(args: ApproveArgs) -> anyhow::Result<ExitCode> {
    let plan_path = args.plan.unwrap_or_else(|| {
        args.repo_root
            .join("artifacts")
            .join("shipwright")
            .join("plan.json")
    });

    let plan = approve_goal(&plan_path, &args.goal, &args.by, Utc::now())?;
    println!(
        "approved {} in goal set {}",
        args.goal, plan.goal_set_id
    );
    Ok(ExitCode::from(0))
}

fn cmd_disk_usage(args: DiskUsageArgs) -> anyhow::Result<ExitCode> {
    let report = disk_usage(&args.path, args.depth, args.top, &ShellProcessPort)?;
    print!("{}", render_disk_usage_md(&report));
    Ok(ExitCode::from(0))
}

fn cmd_version(args: VersionArgs) -> anyhow::Result<ExitCode> {
    let repo = FsRepoView::new(args.repo_root.clone());
    let base = declared_base_version(&repo)
        .context("read declared version")?
        .context("repo declares no version")?;
    let version = prerelease_version(&base, &args.branch, &args.default_branch, Utc::now());
    println!("{version}");
    Ok(ExitCode::from(0))
}

fn cmd_update_formula(args: UpdateFormulaArgs) -> anyhow::Result<ExitCode> {
    let contents =
        fs::read_to_string(&args.formula).with_context(|| format!("read {}", args.formula))?;
    let updated = update_formula(&contents, &args.version, &args.sha256);

    if updated == contents {
        info!("no url/sha256 stanzas found; nothing to do");
        return Ok(ExitCode::from(0));
    }

    fs::write(&args.formula, updated).with_context(|| format!("write {}", args.formula))?;
    info!(version = %args.version, "updated formula");
    Ok(ExitCode::from(0))
}

fn cmd_pin_npm(args: PinNpmArgs) -> anyhow::Result<ExitCode> {
    let contents =
        fs::read_to_string(&args.dockerfile).with_context(|| format!("read {}", args.dockerfile))?;
    let updated = update_npm_install(&contents, &args.module, &args.version);

    if updated == contents {
        info!(module = %args.module, "no matching npm install found; nothing to do");
        return Ok(ExitCode::from(0));
    }

    fs::write(&args.dockerfile, updated).with_context(|| format!("write {}", args.dockerfile))?;
    info!(module = %args.module, version = %args.version, "pinned npm module");
    Ok(ExitCode::from(0))
}

fn cmd_bump_dependency(args: BumpDependencyArgs) -> anyhow::Result<ExitCode> {
    let contents =
        fs::read_to_string(&args.manifest).with_context(|| format!("read {}", args.manifest))?;
    let updated = update_dependency_version(&contents, &args.name, &args.version);

    if updated == contents {
        info!(name = %args.name, "dependency not present; nothing to do");
        return Ok(ExitCode::from(0));
    }

    fs::write(&args.manifest, updated).with_context(|| format!("write {}", args.manifest))?;
    info!(name = %args.name, version = %args.version, "bumped dependency");
    Ok(ExitCode::from(0))
}

fn cmd_explain(args: ExplainArgs) -> anyhow::Result<ExitCode> {
    match explain::explain(&args.key) {
        Some(text) => {
            print!("{text}");
            Ok(ExitCode::from(0))
        }
        None => {
            anyhow::bail!(
                "unknown key {:?}; known keys: {}",
                args.key,
                explain::known_keys().join(", ")
            )
        }
    }
}

fn cmd_list_goals(args: ListGoalsArgs) -> anyhow::Result<ExitCode> {
    let catalog = goal_catalog();
    match args.format {
        OutputFormat::Text => {
            for goal in &catalog {
                let mut line = format!("{:<20} {}", goal.name, goal.display_name);
                if goal.approval_required {
                    line.push_str("  [approval]");
                }
                if !goal.depends_on.is_empty() {
                    line.push_str(&format!("  (after: {})", goal.depends_on.join(", ")));
                }
                println!("{line}");
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        }
    }
    Ok(ExitCode::from(0))
}
