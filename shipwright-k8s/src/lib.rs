//! Kubernetes deployment data for deploy goals.
//!
//! Services deployed from this machine follow naming conventions; namespace
//! and ingress details are derived from static tables keyed by repository
//! name rather than per-repo configuration files.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Testing,
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Testing => write!(f, "testing"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown environment: {0}")]
pub struct ParseEnvironmentError(String);

impl FromStr for Environment {
    type Err = ParseEnvironmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "testing" => Ok(Environment::Testing),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ParseEnvironmentError(other.to_string())),
        }
    }
}

/// Ingress details for an exposed service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingress {
    pub host: String,
    pub path: String,
    pub tls_secret: String,
}

/// Full data payload attached to a deploy goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentData {
    pub environment: Environment,
    pub namespace: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingress: Option<Ingress>,
}

/// Services exposed through an ingress, keyed by repository name.
///
/// Production serves from the apex domain; testing serves from the
/// `.services` subdomain with the matching wildcard certificate.
const INGRESS_TABLE: &[(&str, &str)] = &[("card-automation", "pusher")];

/// Derive ingress details for a repository, or None when the service is not
/// exposed.
pub fn ingress_for_service(repo_name: &str, environment: Environment) -> Option<Ingress> {
    let (_, subdomain) = INGRESS_TABLE
        .iter()
        .find(|(name, _)| *name == repo_name)?;

    let (host, tls_secret) = match environment {
        Environment::Production => (
            format!("{subdomain}.atomist.com"),
            "star-atomist-com".to_string(),
        ),
        Environment::Testing => (
            format!("{subdomain}.services.atomist.com"),
            "star-services-atomist-com".to_string(),
        ),
    };

    Some(Ingress {
        host,
        path: "/".to_string(),
        tls_secret,
    })
}

/// Derive the target namespace from the repository naming convention.
pub fn namespace_for_repo(repo_name: &str) -> &'static str {
    if repo_name.ends_with("-sdm") {
        "sdm"
    } else if repo_name.ends_with("-lifecycle") {
        "lifecycle"
    } else if repo_name.ends_with("-automation") {
        "automation"
    } else {
        "default"
    }
}

/// Assemble the deploy-goal payload for a repository.
pub fn deployment_data(repo_name: &str, environment: Environment) -> DeploymentData {
    DeploymentData {
        environment,
        namespace: namespace_for_repo(repo_name).to_string(),
        ingress: ingress_for_service(repo_name, environment),
    }
}

/// Render the deployment data as YAML, the form the deploy fulfillment
/// passes to `kubectl`.
pub fn render_deployment_yaml(data: &DeploymentData) -> anyhow::Result<String> {
    Ok(serde_yaml::to_string(data)?)
}
