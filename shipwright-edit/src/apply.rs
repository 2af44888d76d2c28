use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use sha2::{Digest, Sha256};
use tracing::debug;

/// Outcome of transforming one file's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutcome {
    /// Nothing to do.
    Unchanged,
    /// New content for the file.
    Changed(String),
    /// The file needs manual attention; it is reported, never rewritten.
    Flagged(String),
}

/// A single automatic code transform.
///
/// Transforms are pure: they see content and produce content. The apply
/// engine owns all filesystem access.
pub trait Autofix {
    /// Stable machine name, e.g. "license-header".
    fn name(&self) -> &str;

    /// Whether this autofix wants to look at the file at `path`.
    fn relevant(&self, path: &Utf8Path) -> bool;

    fn transform(&self, path: &Utf8Path, content: &str) -> anyhow::Result<TransformOutcome>;
}

#[derive(Debug, Clone)]
pub struct ApplyOptions {
    pub dry_run: bool,
    pub backup_enabled: bool,
    pub backup_suffix: String,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            dry_run: true,
            backup_enabled: false,
            backup_suffix: ".shipwright.bak".to_string(),
        }
    }
}

/// One changed file, with provenance.
#[derive(Debug, Clone)]
pub struct FileChange {
    pub path: Utf8PathBuf,
    /// Autofix names that touched the file, in application order.
    pub autofixes: Vec<String>,
    pub sha256_before: String,
    pub sha256_after: String,
}

/// One file flagged for manual review.
#[derive(Debug, Clone)]
pub struct FlaggedFile {
    pub path: Utf8PathBuf,
    pub autofix: String,
    pub reason: String,
}

/// Result of running a set of autofixes over candidate files.
#[derive(Debug, Clone, Default)]
pub struct AutofixOutcome {
    pub changes: Vec<FileChange>,
    pub flagged: Vec<FlaggedFile>,
    /// Unified diff of all changes.
    pub patch: String,
}

/// Run `autofixes` over `candidates` (paths relative to `repo_root`).
///
/// In dry-run mode nothing is written; the outcome carries the patch that
/// *would* be applied. Candidate order is preserved; autofix order within a
/// file follows registration order.
pub fn apply_autofixes(
    repo_root: &Utf8Path,
    autofixes: &[&dyn Autofix],
    candidates: &[Utf8PathBuf],
    opts: &ApplyOptions,
) -> anyhow::Result<AutofixOutcome> {
    let mut outcome = AutofixOutcome::default();

    for rel in candidates {
        let abs = abs_path(repo_root, rel);
        let original = fs::read_to_string(&abs).with_context(|| format!("read {}", abs))?;

        let mut current = original.clone();
        let mut applied: Vec<String> = Vec::new();

        for autofix in autofixes {
            if !autofix.relevant(rel) {
                continue;
            }
            match autofix
                .transform(rel, &current)
                .with_context(|| format!("autofix {} on {}", autofix.name(), rel))?
            {
                TransformOutcome::Unchanged => {}
                TransformOutcome::Changed(updated) => {
                    applied.push(autofix.name().to_string());
                    current = updated;
                }
                TransformOutcome::Flagged(reason) => {
                    debug!(path = %rel, autofix = autofix.name(), %reason, "flagged for manual review");
                    outcome.flagged.push(FlaggedFile {
                        path: rel.clone(),
                        autofix: autofix.name().to_string(),
                        reason,
                    });
                }
            }
        }

        if applied.is_empty() {
            continue;
        }

        outcome.patch.push_str(&file_patch(rel, &original, &current));

        if !opts.dry_run {
            if opts.backup_enabled {
                let backup = Utf8PathBuf::from(format!("{}{}", abs, opts.backup_suffix));
                fs::write(&backup, &original).with_context(|| format!("write {}", backup))?;
            }
            fs::write(&abs, &current).with_context(|| format!("write {}", abs))?;
        }

        outcome.changes.push(FileChange {
            path: rel.clone(),
            autofixes: applied,
            sha256_before: sha256_hex(original.as_bytes()),
            sha256_after: sha256_hex(current.as_bytes()),
        });
    }

    Ok(outcome)
}

/// Expand candidate files by glob patterns relative to the repo root.
pub fn collect_candidates(
    repo_root: &Utf8Path,
    patterns: &[String],
) -> anyhow::Result<Vec<Utf8PathBuf>> {
    let mut out = Vec::new();
    for pattern in patterns {
        let full = repo_root.join(pattern.as_str());
        for entry in glob::glob(full.as_str()).with_context(|| format!("glob {}", full))? {
            let path = entry.map_err(|e| anyhow::anyhow!("glob error: {e}"))?;
            if !path.is_file() {
                continue;
            }
            let utf8 = Utf8PathBuf::from_path_buf(path)
                .map_err(|p| anyhow::anyhow!("non-utf8 path: {}", p.display()))?;
            let rel = utf8
                .strip_prefix(repo_root)
                .map(|p| p.to_path_buf())
                .unwrap_or(utf8);
            out.push(rel);
        }
    }
    out.sort();
    out.dedup();
    Ok(out)
}

fn file_patch(rel: &Utf8Path, before: &str, after: &str) -> String {
    let patch = diffy::create_patch(before, after);
    let rendered = patch.to_string();

    let mut out = String::new();
    out.push_str(&format!("--- a/{}\n+++ b/{}\n", rel, rel));
    // Skip diffy's generic `--- original` / `+++ modified` header lines.
    for line in rendered.lines().skip(2) {
        out.push_str(line);
        out.push('\n');
    }
    out
}

fn abs_path(repo_root: &Utf8Path, rel: &Utf8Path) -> Utf8PathBuf {
    if rel.is_absolute() {
        rel.to_path_buf()
    } else {
        repo_root.join(rel)
    }
}

pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
