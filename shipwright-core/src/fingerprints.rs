//! Dependency and base-image fingerprints.

use camino::Utf8PathBuf;
use sha2::{Digest, Sha256};
use shipwright_domain::RepoView;
use shipwright_types::fingerprint::FingerprintSet;
use std::collections::BTreeMap;

/// Compute the fingerprints available for the repo.
///
/// - `npm-deps`: hash of the sorted dependency map from package.json.
/// - `docker-base-image`: hash of the Dockerfile's FROM lines.
///
/// Repos without the corresponding file simply lack the entry.
pub fn compute_fingerprints(repo: &dyn RepoView, sha: &str) -> anyhow::Result<FingerprintSet> {
    let mut set = FingerprintSet::new(sha);

    let package_json = Utf8PathBuf::from("package.json");
    if repo.exists(&package_json) {
        let contents = repo.read_to_string(&package_json)?;
        if let Some(digest) = npm_deps_fingerprint(&contents) {
            set.entries.insert("npm-deps".to_string(), digest);
        }
    }

    let dockerfile = Utf8PathBuf::from("Dockerfile");
    if repo.exists(&dockerfile) {
        let contents = repo.read_to_string(&dockerfile)?;
        if let Some(digest) = docker_base_image_fingerprint(&contents) {
            set.entries.insert("docker-base-image".to_string(), digest);
        }
    }

    Ok(set)
}

/// Canonical `name@range` lines over dependencies + devDependencies, sorted,
/// then hashed. None when the manifest is unparsable.
fn npm_deps_fingerprint(package_json: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(package_json).ok()?;

    let mut deps: BTreeMap<String, String> = BTreeMap::new();
    for table in ["dependencies", "devDependencies"] {
        if let Some(map) = value.get(table).and_then(|v| v.as_object()) {
            for (name, range) in map {
                if let Some(range) = range.as_str() {
                    deps.insert(name.clone(), range.to_string());
                }
            }
        }
    }

    let canonical: String = deps
        .iter()
        .map(|(name, range)| format!("{name}@{range}\n"))
        .collect();
    Some(sha256_hex(canonical.as_bytes()))
}

/// Hash over the FROM lines only; comments and build steps do not count as
/// base-image drift.
fn docker_base_image_fingerprint(dockerfile: &str) -> Option<String> {
    let from_lines: Vec<&str> = dockerfile
        .lines()
        .map(str::trim)
        .filter(|line| line.to_ascii_uppercase().starts_with("FROM "))
        .collect();

    if from_lines.is_empty() {
        return None;
    }
    Some(sha256_hex(from_lines.join("\n").as_bytes()))
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
