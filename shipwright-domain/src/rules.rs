use crate::goals;
use crate::ports::RepoView;
use crate::push_tests::{
    AllOf, HasDockerfile, IsMaven, IsNamed, IsNode, MaterialChange, Not, PushTest, ToDefaultBranch,
};
use anyhow::Context;
use camino::Utf8PathBuf;
use shipwright_types::goal::{GoalSpec, PlannedGoal};
use shipwright_types::plan::{PlanPolicy, PushSummary, ShipwrightPlan, ToolInfo};
use shipwright_types::push::PushEvent;
use std::collections::BTreeSet;
use std::str::FromStr;
use uuid::Uuid;

/// One goal-setting rule: when the push test matches, the goals join the set.
pub struct GoalSettingRule {
    pub name: String,
    pub test: Box<dyn PushTest>,
    pub goals: Vec<GoalSpec>,

    /// An exclusive rule stops evaluation once it matches.
    pub exclusive: bool,
}

impl GoalSettingRule {
    pub fn when(
        name: impl Into<String>,
        test: impl PushTest + 'static,
        goals: Vec<GoalSpec>,
    ) -> Self {
        Self {
            name: name.into(),
            test: Box::new(test),
            goals,
            exclusive: false,
        }
    }

    pub fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlannerConfig {
    pub allow: Vec<String>,
    pub deny: Vec<String>,
    pub allow_dirty: bool,
}

#[derive(Debug, Clone)]
pub struct PlanContext {
    pub repo_root: Utf8PathBuf,
    pub artifacts_dir: Utf8PathBuf,
    pub config: PlannerConfig,
}

/// The goal-setting machine: ordered rules evaluated against a push.
pub struct Planner {
    rules: Vec<GoalSettingRule>,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}

impl Planner {
    pub fn new() -> Self {
        Self {
            rules: builtin_rules(),
        }
    }

    pub fn with_rules(rules: Vec<GoalSettingRule>) -> Self {
        Self { rules }
    }

    pub fn plan(
        &self,
        ctx: &PlanContext,
        push: &PushEvent,
        repo: &dyn RepoView,
        tool: ToolInfo,
    ) -> anyhow::Result<ShipwrightPlan> {
        let policy = PlanPolicy {
            allow: ctx.config.allow.clone(),
            deny: ctx.config.deny.clone(),
            allow_dirty: ctx.config.allow_dirty,
        };

        let push_summary = PushSummary {
            owner: push.repo.owner.clone(),
            repo: push.repo.name.clone(),
            branch: push.branch.clone(),
            sha: push.sha.clone(),
            default_branch: push.is_default_branch(),
        };

        let mut plan = ShipwrightPlan::new(tool, push_summary, policy);

        let mut goals: Vec<PlannedGoal> = Vec::new();
        for rule in &self.rules {
            let matched = rule
                .test
                .matches(push, repo)
                .with_context(|| format!("push test for rule {:?}", rule.name))?;
            if !matched {
                continue;
            }
            tracing::debug!(rule = %rule.name, "goal-setting rule matched");
            plan.rules_matched.push(rule.name.clone());

            for spec in &rule.goals {
                if goals.iter().any(|g| g.spec.name == spec.name) {
                    // First definition wins.
                    continue;
                }
                let mut planned = PlannedGoal::from_spec(spec.clone());
                planned.planned_by = Some(rule.name.clone());
                goals.push(planned);
            }

            if rule.exclusive {
                break;
            }
        }

        restrict_dependencies(&mut goals);
        attach_deployment_data(push, &mut goals);
        apply_allow_deny(&ctx.config.allow, &ctx.config.deny, &mut goals);

        plan.goal_set_id = goal_set_id(push, &goals).to_string();
        plan.summary.goals_total = goals.len() as u64;
        plan.summary.goals_gated = goals.iter().filter(|g| g.gated).count() as u64;
        plan.summary.goals_waiting_for_approval = goals
            .iter()
            .filter(|g| g.spec.approval_required)
            .count() as u64;
        plan.goals = goals;
        Ok(plan)
    }
}

/// The delivery rules of this machine, in evaluation order.
pub fn builtin_rules() -> Vec<GoalSettingRule> {
    vec![
        GoalSettingRule::when(
            "immaterial change",
            Not::new(Box::new(MaterialChange::default_ignores())),
            vec![],
        )
        .exclusive(),
        GoalSettingRule::when(
            "base checks",
            MaterialChange::default_ignores(),
            vec![goals::autofix(), goals::version(), goals::review()],
        ),
        GoalSettingRule::when("node build", IsNode, vec![goals::build_npm(), goals::test()]),
        GoalSettingRule::when("maven build", IsMaven, vec![goals::build_maven()]),
        GoalSettingRule::when(
            "docker build",
            HasDockerfile,
            vec![goals::docker_build(), goals::fingerprint()],
        ),
        GoalSettingRule::when(
            "node release",
            AllOf::new(vec![Box::new(IsNode), Box::new(ToDefaultBranch)]),
            vec![goals::publish(), goals::tag(), goals::release()],
        ),
        GoalSettingRule::when(
            "service deploy",
            AllOf::new(vec![
                Box::new(HasDockerfile),
                Box::new(ToDefaultBranch),
                Box::new(IsNamed::repos(&["card-automation"])),
            ]),
            vec![goals::deploy_staging(), goals::deploy_production()],
        ),
    ]
}

/// Drop dependency edges pointing at goals that were not planned.
fn restrict_dependencies(goals: &mut [PlannedGoal]) {
    let planned: BTreeSet<String> = goals.iter().map(|g| g.spec.name.clone()).collect();
    for goal in goals.iter_mut() {
        goal.spec.depends_on.retain(|dep| planned.contains(dep));
    }
}

/// Attach namespace/ingress payloads to k8s-fulfilled goals.
fn attach_deployment_data(push: &PushEvent, goals: &mut [PlannedGoal]) {
    for goal in goals.iter_mut() {
        if goal.spec.fulfillment.as_deref() != Some("k8s") {
            continue;
        }
        let Some(env_str) = goal.spec.environment.as_deref() else {
            continue;
        };
        let Ok(env) = shipwright_k8s::Environment::from_str(env_str) else {
            continue;
        };
        let data = shipwright_k8s::deployment_data(&push.repo.name, env);
        goal.data = serde_json::to_value(&data).ok();
    }
}

fn apply_allow_deny(allow: &[String], deny: &[String], goals: &mut [PlannedGoal]) {
    for goal in goals {
        if goal.gated {
            continue;
        }

        let name = goal.spec.name.as_str();

        if deny.iter().any(|pat| glob_match(pat, name)) {
            goal.gated = true;
            goal.gated_reason = Some("denied by policy".to_string());
            continue;
        }

        if !allow.is_empty() && !allow.iter().any(|pat| glob_match(pat, name)) {
            goal.gated = true;
            goal.gated_reason = Some("not in allowlist".to_string());
        }
    }
}

/// Deterministic goal-set id: v5(namespace, repo|sha|goal names).
fn goal_set_id(push: &PushEvent, goals: &[PlannedGoal]) -> Uuid {
    const NAMESPACE: Uuid = Uuid::from_bytes([
        0x7a, 0x2e, 0x91, 0x4c, 0x3f, 0x10, 0x45, 0xe2, 0x9b, 0x6d, 0x5c, 0x08, 0xaa, 0x21, 0x7f,
        0x93,
    ]);

    let names: Vec<&str> = goals.iter().map(|g| g.spec.name.as_str()).collect();
    let stable_key = format!("{}|{}|{}", push.slug(), push.sha, names.join(","));
    Uuid::new_v5(&NAMESPACE, stable_key.as_bytes())
}

fn glob_match(pat: &str, text: &str) -> bool {
    let p = pat.as_bytes();
    let t = text.as_bytes();
    let mut dp = vec![vec![false; t.len() + 1]; p.len() + 1];
    dp[0][0] = true;

    for i in 1..=p.len() {
        if p[i - 1] == b'*' {
            dp[i][0] = dp[i - 1][0];
        }
    }

    for i in 1..=p.len() {
        for j in 1..=t.len() {
            dp[i][j] = match p[i - 1] {
                b'*' => dp[i - 1][j] || dp[i][j - 1],
                b'?' => dp[i - 1][j - 1],
                c => dp[i - 1][j - 1] && c == t[j - 1],
            };
        }
    }

    dp[p.len()][t.len()]
}
