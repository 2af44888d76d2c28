//! Rendering helpers (markdown and Slack mrkdwn) for human-readable
//! artifacts.

use shipwright_types::goal::GoalState;
use shipwright_types::plan::ShipwrightPlan;
use shipwright_types::review::{ReviewComment, Severity};

pub fn render_plan_md(plan: &ShipwrightPlan) -> String {
    let mut out = String::new();
    out.push_str("# shipwright plan\n\n");
    out.push_str(&format!(
        "- Push: `{}/{}@{}` on `{}`\n",
        plan.push.owner, plan.push.repo, plan.push.sha, plan.push.branch
    ));
    out.push_str(&format!(
        "- Goals: {} (gated {}, waiting for approval {})\n",
        plan.summary.goals_total, plan.summary.goals_gated, plan.summary.goals_waiting_for_approval
    ));
    out.push_str(&format!("- Autofixes: {}\n", plan.summary.autofixes_total));
    out.push_str(&format!("- Goal set: `{}`\n", plan.goal_set_id));
    if !plan.rules_matched.is_empty() {
        out.push_str(&format!("- Rules: {}\n", plan.rules_matched.join(", ")));
    }
    out.push('\n');

    out.push_str("## Goals\n\n");
    if plan.goals.is_empty() {
        out.push_str("_No goals planned._\n");
        return out;
    }

    for (i, goal) in plan.goals.iter().enumerate() {
        out.push_str(&format!("### {}. {}\n\n", i + 1, goal.spec.name));
        out.push_str(&format!("- State: `{}`\n", state_label(goal.state)));
        if let Some(fulfillment) = &goal.spec.fulfillment {
            out.push_str(&format!("- Fulfillment: `{}`\n", fulfillment));
        }
        if let Some(environment) = &goal.spec.environment {
            out.push_str(&format!("- Environment: `{}`\n", environment));
        }
        if !goal.spec.depends_on.is_empty() {
            out.push_str(&format!(
                "- Depends on: {}\n",
                goal.spec.depends_on.join(", ")
            ));
        }
        if goal.gated {
            let reason = goal.gated_reason.as_deref().unwrap_or("policy");
            out.push_str(&format!("- Gated: {}\n", reason));
        }
        if let Some(rule) = &goal.planned_by {
            out.push_str(&format!("- Planned by: {}\n", rule));
        }
        out.push('\n');
    }

    if !plan.autofixes.is_empty() {
        out.push_str("## Autofixes\n\n");
        for autofix in &plan.autofixes {
            out.push_str(&format!(
                "- `{}` ({} file{})\n",
                autofix.name,
                autofix.files.len(),
                if autofix.files.len() == 1 { "" } else { "s" }
            ));
        }
        out.push('\n');
    }

    out
}

/// Slack (mrkdwn) summary posted to the delivery channel.
pub fn render_comment_slack(plan: &ShipwrightPlan) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "*shipwright* planned {} goal{} for `{}/{}@{}` on `{}`\n",
        plan.summary.goals_total,
        if plan.summary.goals_total == 1 { "" } else { "s" },
        plan.push.owner,
        plan.push.repo,
        short_sha(&plan.push.sha),
        plan.push.branch
    ));

    if plan.goals.is_empty() {
        out.push_str("_Nothing to do for this push._\n");
        return out;
    }

    for goal in &plan.goals {
        out.push_str(&format!(
            "{} {}",
            state_emoji(goal.state, goal.gated),
            goal.spec.display_name
        ));
        if goal.gated {
            let reason = goal.gated_reason.as_deref().unwrap_or("policy");
            out.push_str(&format!(" _({reason})_"));
        } else if goal.spec.approval_required {
            out.push_str(" _(requires approval)_");
        }
        out.push('\n');
    }

    if plan.summary.goals_waiting_for_approval > 0 {
        out.push_str(&format!(
            "\nApprove with `shipwright approve --goal-set {}`\n",
            plan.goal_set_id
        ));
    }

    out
}

/// Sorted review comments grouped by severity.
///
/// The caller sorts; rendering preserves the given order.
pub fn render_review_md(comments: &[ReviewComment]) -> String {
    let mut out = String::new();
    out.push_str("# code review\n\n");
    if comments.is_empty() {
        out.push_str("_No review comments._\n");
        return out;
    }

    let mut current: Option<Severity> = None;
    for comment in comments {
        if current != Some(comment.severity) {
            current = Some(comment.severity);
            out.push_str(&format!("## {}\n\n", severity_label(comment.severity)));
        }
        let location = comment
            .source_location
            .as_ref()
            .map(|loc| format!("{}:{}", loc.path, loc.line.unwrap_or(0)))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "- `{}/{}` at {}: {}\n",
            comment.subcategory, comment.category, location, comment.detail
        ));
    }

    out
}

fn short_sha(sha: &str) -> &str {
    match sha.char_indices().nth(7) {
        Some((idx, _)) => &sha[..idx],
        None => sha,
    }
}

fn state_label(state: GoalState) -> &'static str {
    match state {
        GoalState::Planned => "planned",
        GoalState::Requested => "requested",
        GoalState::InProcess => "in_process",
        GoalState::Success => "success",
        GoalState::Failure => "failure",
        GoalState::WaitingForApproval => "waiting_for_approval",
        GoalState::Approved => "approved",
        GoalState::Skipped => "skipped",
        GoalState::Canceled => "canceled",
    }
}

fn state_emoji(state: GoalState, gated: bool) -> &'static str {
    if gated {
        return ":no_entry:";
    }
    match state {
        GoalState::Planned | GoalState::Requested => ":large_blue_circle:",
        GoalState::InProcess => ":hourglass:",
        GoalState::Success => ":white_check_mark:",
        GoalState::Failure => ":x:",
        GoalState::WaitingForApproval => ":lock:",
        GoalState::Approved => ":unlock:",
        GoalState::Skipped | GoalState::Canceled => ":heavy_minus_sign:",
    }
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "Errors",
        Severity::Warn => "Warnings",
        Severity::Info => "Info",
    }
}
