//! Domain logic: turn a push event + repo state into a deterministic goal-set
//! plan.
//!
//! This crate owns *which* goals and autofixes apply and why. It does not own
//! execution: planned goals carry dependency edges and approval flags as data
//! for whatever scheduler consumes the plan, and autofix application lives in
//! `shipwright-edit`.

mod goals;
mod ports;
mod registrations;
mod rules;
mod versions;

pub use goals::{GoalExplanation, goal_catalog, goal_explanations};
pub use ports::{FsRepoView, RepoView};
pub use push_tests::{
    AllOf, AnyOf, HasDockerfile, HasFile, IsMaven, IsNamed, IsNode, MaterialChange, Not, PushTest,
    ToDefaultBranch,
};
pub use registrations::{
    AutofixOptions, AutofixRegistration, builtin_autofix_registrations, select_autofixes,
};
pub use rules::{GoalSettingRule, PlanContext, Planner, PlannerConfig, builtin_rules};
pub use versions::{declared_base_version, prerelease_version, sanitize_branch};
