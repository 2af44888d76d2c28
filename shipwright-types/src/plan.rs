use crate::goal::PlannedGoal;
use serde::{Deserialize, Serialize};

/// The goal-set plan produced for a push.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipwrightPlan {
    pub schema: String,
    pub tool: ToolInfo,
    pub push: PushSummary,

    /// Deterministic id for this goal set (stable across re-planning the
    /// same push with the same rules).
    pub goal_set_id: String,

    /// Names of the goal-setting rules that matched, in evaluation order.
    #[serde(default)]
    pub rules_matched: Vec<String>,

    pub policy: PlanPolicy,

    #[serde(default)]
    pub goals: Vec<PlannedGoal>,

    #[serde(default)]
    pub autofixes: Vec<PlannedAutofix>,

    /// Lint reports that were considered while planning.
    #[serde(default)]
    pub inputs: Vec<PlanInput>,

    pub summary: PlanSummary,
}

impl ShipwrightPlan {
    pub fn new(tool: ToolInfo, push: PushSummary, policy: PlanPolicy) -> Self {
        Self {
            schema: crate::schema::SHIPWRIGHT_PLAN_V1.to_string(),
            tool,
            push,
            goal_set_id: String::new(),
            rules_matched: vec![],
            policy,
            goals: vec![],
            autofixes: vec![],
            inputs: vec![],
            summary: PlanSummary::default(),
        }
    }
}

/// Tool provenance stamped into every artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

/// The slice of the push event that the plan records for traceability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushSummary {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub sha: String,

    #[serde(default)]
    pub default_branch: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanPolicy {
    /// If non-empty, only goals matching an allow pattern are runnable.
    #[serde(default)]
    pub allow: Vec<String>,

    /// Goals matching a deny pattern are gated.
    #[serde(default)]
    pub deny: Vec<String>,

    #[serde(default)]
    pub allow_dirty: bool,
}

/// An autofix that would run for this push, with its dry-run outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedAutofix {
    pub name: String,

    /// Name of the push test that selected the autofix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_by: Option<String>,

    /// Files the transform would change.
    #[serde(default)]
    pub files: Vec<String>,
}

/// A lint report consumed during planning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanInput {
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,

    /// Present when the input failed to load; the plan still proceeds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanSummary {
    pub goals_total: u64,
    pub goals_gated: u64,
    pub goals_waiting_for_approval: u64,
    pub autofixes_total: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch_bytes: Option<u64>,
}
