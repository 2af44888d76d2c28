use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Dependency/base-image fingerprints computed for a push.
///
/// Fingerprints let downstream tooling detect drift (e.g. a base image
/// changed without any code change) by comparing hashes across pushes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FingerprintSet {
    pub schema: String,

    pub sha: String,

    /// Fingerprint name → sha256 hex digest. BTreeMap keeps artifact output
    /// deterministic.
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
}

impl FingerprintSet {
    pub fn new(sha: impl Into<String>) -> Self {
        Self {
            schema: crate::schema::SHIPWRIGHT_FINGERPRINTS_V1.to_string(),
            sha: sha.into(),
            entries: BTreeMap::new(),
        }
    }
}
