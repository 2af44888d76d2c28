use serde::{Deserialize, Serialize};

use crate::goal::PlannedGoal;
use crate::plan::{
    PlanInput, PlanPolicy, PlanSummary, PlannedAutofix, PushSummary, ShipwrightPlan, ToolInfo,
};
use crate::wire::{ToolInfoV1, WireError};

/// Schema-exact wire representation of shipwright.plan.v1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanV1 {
    pub schema: String,
    pub tool: ToolInfoV1,
    pub push: PushSummary,
    pub goal_set_id: String,

    #[serde(default)]
    pub rules_matched: Vec<String>,

    pub policy: PlanPolicy,

    #[serde(default)]
    pub goals: Vec<PlannedGoal>,

    #[serde(default)]
    pub autofixes: Vec<PlannedAutofix>,

    #[serde(default)]
    pub inputs: Vec<PlanInput>,

    pub summary: PlanSummary,
}

impl TryFrom<&ShipwrightPlan> for PlanV1 {
    type Error = WireError;

    fn try_from(plan: &ShipwrightPlan) -> Result<Self, Self::Error> {
        let version = plan
            .tool
            .version
            .clone()
            .ok_or(WireError::MissingToolVersion { context: "plan" })?;

        Ok(Self {
            schema: plan.schema.clone(),
            tool: ToolInfoV1 {
                name: plan.tool.name.clone(),
                version,
                commit: plan.tool.commit.clone(),
            },
            push: plan.push.clone(),
            goal_set_id: plan.goal_set_id.clone(),
            rules_matched: plan.rules_matched.clone(),
            policy: plan.policy.clone(),
            goals: plan.goals.clone(),
            autofixes: plan.autofixes.clone(),
            inputs: plan.inputs.clone(),
            summary: plan.summary.clone(),
        })
    }
}

impl From<PlanV1> for ShipwrightPlan {
    fn from(plan: PlanV1) -> Self {
        ShipwrightPlan {
            schema: plan.schema,
            tool: ToolInfo {
                name: plan.tool.name,
                version: Some(plan.tool.version),
                repo: None,
                commit: plan.tool.commit,
            },
            push: plan.push,
            goal_set_id: plan.goal_set_id,
            rules_matched: plan.rules_matched,
            policy: plan.policy,
            goals: plan.goals,
            autofixes: plan.autofixes,
            inputs: plan.inputs,
            summary: plan.summary,
        }
    }
}
