//! Explanations for the `shipwright explain` and `shipwright list-goals`
//! commands.

use shipwright_domain::{GoalExplanation, goal_explanations};

/// Autofix explanations, kept alongside the goal registry so `explain`
/// covers both.
#[derive(Debug, Clone)]
pub struct AutofixExplanation {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub static AUTOFIX_REGISTRY: &[AutofixExplanation] = &[
    AutofixExplanation {
        key: "license-header",
        title: "License header",
        description: "Prepends the configured license header to source files that \
lack one, keeping an initial interpreter directive line first. Files that carry \
a *different* block comment are flagged for manual review rather than rewritten.",
    },
    AutofixExplanation {
        key: "import-rewrite",
        title: "Import rewrite",
        description: "Collapses deep imports of configured modules (e.g. \
`@atomist/sdm/lib/...`) to the package root, which is the supported API surface.",
    },
];

/// Look up an explanation by key. Goals first, then autofixes.
pub fn explain(key: &str) -> Option<String> {
    if let Some(goal) = goal_explanations().iter().find(|e| e.key == key) {
        return Some(render_goal(goal));
    }
    if let Some(autofix) = AUTOFIX_REGISTRY.iter().find(|e| e.key == key) {
        return Some(format!(
            "# {} (autofix)\n\n{}\n",
            autofix.title, autofix.description
        ));
    }
    None
}

/// All known keys, for the not-found hint.
pub fn known_keys() -> Vec<&'static str> {
    goal_explanations()
        .iter()
        .map(|e| e.key)
        .chain(AUTOFIX_REGISTRY.iter().map(|e| e.key))
        .collect()
}

fn render_goal(goal: &GoalExplanation) -> String {
    format!("# {} (goal)\n\n{}\n", goal.title, goal.description)
}
