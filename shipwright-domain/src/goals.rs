//! The goal catalog: every delivery goal this machine can plan, with its
//! dependency edges and approval gates.

use shipwright_types::goal::GoalSpec;

fn goal(
    name: &str,
    display_name: &str,
    fulfillment: Option<&str>,
    depends_on: &[&str],
    approval_required: bool,
) -> GoalSpec {
    GoalSpec {
        name: name.to_string(),
        display_name: display_name.to_string(),
        fulfillment: fulfillment.map(|f| f.to_string()),
        environment: None,
        depends_on: depends_on.iter().map(|d| d.to_string()).collect(),
        approval_required,
    }
}

pub fn autofix() -> GoalSpec {
    goal("autofix", "autofix", None, &[], false)
}

pub fn version() -> GoalSpec {
    goal("version", "version", None, &["autofix"], false)
}

pub fn review() -> GoalSpec {
    goal("review", "code review", None, &["autofix"], false)
}

pub fn build_npm() -> GoalSpec {
    goal("build", "build", Some("npm"), &["autofix", "version"], false)
}

pub fn build_maven() -> GoalSpec {
    goal("build", "build", Some("maven"), &["autofix", "version"], false)
}

pub fn test() -> GoalSpec {
    goal("test", "test", None, &["build"], false)
}

pub fn fingerprint() -> GoalSpec {
    goal("fingerprint", "fingerprint", None, &["build"], false)
}

pub fn docker_build() -> GoalSpec {
    goal("docker_build", "docker build", Some("docker"), &["build"], false)
}

pub fn tag() -> GoalSpec {
    goal("tag", "tag", None, &["build"], false)
}

pub fn publish() -> GoalSpec {
    goal("publish", "publish", Some("npm"), &["build", "test"], false)
}

pub fn deploy_staging() -> GoalSpec {
    let mut g = goal(
        "deploy_staging",
        "deploy to staging",
        Some("k8s"),
        &["docker_build"],
        false,
    );
    g.environment = Some("testing".to_string());
    g
}

pub fn deploy_production() -> GoalSpec {
    let mut g = goal(
        "deploy_production",
        "deploy to production",
        Some("k8s"),
        &["deploy_staging"],
        true,
    );
    g.environment = Some("production".to_string());
    g
}

pub fn release() -> GoalSpec {
    goal("release", "release", None, &["tag", "publish"], true)
}

/// Every goal this machine knows about, in catalog order.
pub fn goal_catalog() -> Vec<GoalSpec> {
    vec![
        autofix(),
        version(),
        review(),
        build_npm(),
        test(),
        fingerprint(),
        docker_build(),
        tag(),
        publish(),
        deploy_staging(),
        deploy_production(),
        release(),
    ]
}

/// Operator-facing explanation of a goal, for `shipwright explain`.
#[derive(Debug, Clone)]
pub struct GoalExplanation {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub fn goal_explanations() -> &'static [GoalExplanation] {
    GOAL_EXPLANATIONS
}

static GOAL_EXPLANATIONS: &[GoalExplanation] = &[
    GoalExplanation {
        key: "autofix",
        title: "Autofix",
        description: "Applies registered code transforms (license headers, import \
rewriting) to the pushed branch. Runs before anything else so later goals see \
the corrected tree.",
    },
    GoalExplanation {
        key: "version",
        title: "Version",
        description: "Computes the timestamped prerelease version for this push from \
the version declared in package.json or pom.xml.",
    },
    GoalExplanation {
        key: "review",
        title: "Code review",
        description: "Runs the configured lint tooling and publishes sorted review \
comments. Malformed tool output is treated as no results.",
    },
    GoalExplanation {
        key: "build",
        title: "Build",
        description: "Compiles and packages the project with its native toolchain \
(npm or Maven, selected by push test).",
    },
    GoalExplanation {
        key: "test",
        title: "Test",
        description: "Runs the project's test suite against the build output.",
    },
    GoalExplanation {
        key: "fingerprint",
        title: "Fingerprint",
        description: "Hashes the dependency map and Docker base image so dependency \
drift is visible across pushes.",
    },
    GoalExplanation {
        key: "docker_build",
        title: "Docker build",
        description: "Builds and pushes the service container image.",
    },
    GoalExplanation {
        key: "tag",
        title: "Tag",
        description: "Creates the release tag for the computed version.",
    },
    GoalExplanation {
        key: "publish",
        title: "Publish",
        description: "Publishes the package to its registry.",
    },
    GoalExplanation {
        key: "deploy_staging",
        title: "Deploy to staging",
        description: "Deploys the image to the testing namespace derived from the \
repository name, with ingress details when the service is exposed.",
    },
    GoalExplanation {
        key: "deploy_production",
        title: "Deploy to production",
        description: "Deploys to production after explicit approval. Namespace and \
ingress follow the same naming conventions as staging.",
    },
    GoalExplanation {
        key: "release",
        title: "Release",
        description: "Cuts the public release (GitHub release, Homebrew formula \
update) once tag and publish have completed. Requires approval.",
    },
];
