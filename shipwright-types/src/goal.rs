use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A delivery goal as declared by the catalog.
///
/// Goals are planned, never executed, by shipwright: the `depends_on` edges
/// and approval flags are data for whatever scheduler consumes the plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalSpec {
    /// Stable machine name, e.g. "docker_build".
    pub name: String,

    /// Human-facing name, e.g. "docker build".
    pub display_name: String,

    /// Which kind of worker fulfills the goal, e.g. "npm", "maven", "k8s".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fulfillment: Option<String>,

    /// Target environment for deploy-shaped goals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,

    /// Goal names that must complete before this goal may start.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    /// True when the goal must be explicitly approved before running.
    #[serde(default)]
    pub approval_required: bool,
}

/// Lifecycle states for a goal event record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalState {
    #[default]
    Planned,
    Requested,
    InProcess,
    Success,
    Failure,
    WaitingForApproval,
    Approved,
    Skipped,
    Canceled,
}

/// Approval audit record attached to an approved goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Approval {
    pub approved_by: String,
    pub at: DateTime<Utc>,
}

/// A goal as it appears in a plan: the spec plus planning outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedGoal {
    #[serde(flatten)]
    pub spec: GoalSpec,

    #[serde(default)]
    pub state: GoalState,

    /// True when policy kept the goal from being runnable.
    #[serde(default)]
    pub gated: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gated_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval: Option<Approval>,

    /// Name of the rule that contributed this goal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_by: Option<String>,

    /// Fulfillment-specific payload, e.g. Kubernetes deployment data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl PlannedGoal {
    pub fn from_spec(spec: GoalSpec) -> Self {
        let state = if spec.approval_required {
            GoalState::WaitingForApproval
        } else {
            GoalState::Planned
        };
        Self {
            spec,
            state,
            gated: false,
            gated_reason: None,
            approval: None,
            planned_by: None,
            data: None,
        }
    }
}
