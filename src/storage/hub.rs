//! Model discovery in the HuggingFace hub cache
//!
//! Locates a downloaded model by probing a fixed list of candidate
//! directories and resolving the latest snapshot in the hub cache layout
//! (`models--{org}--{name}/snapshots/<revision>/`).

use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use thiserror::Error;

/// Errors from model discovery
#[derive(Debug, Error)]
pub enum HubError {
    #[error("model {repo} not found in any candidate location")]
    ModelNotFound {
        repo: String,
        /// Directories that were probed, for the error message
        candidates: Vec<PathBuf>,
    },
}

/// Hub cache directory name for a repo id: `org/name` -> `models--org--name`.
pub fn cache_dir_name(repo: &str) -> String {
    format!("models--{}", repo.replace('/', "--"))
}

/// Candidate locations for a model, probed in order.
pub fn candidate_roots(repo: &str) -> Vec<PathBuf> {
    let cache_name = cache_dir_name(repo);
    let mut roots = vec![PathBuf::from("/data/ml/models/huggingface").join(&cache_name)];

    if let Some(base) = BaseDirs::new() {
        roots.push(
            base.home_dir()
                .join(".cache/huggingface/hub")
                .join(&cache_name),
        );
    }

    roots.push(PathBuf::from("/data/ml/models").join(repo));
    roots
}

/// Find the model files for a repo.
///
/// Hub-cache candidates resolve through their `snapshots/` directory; the
/// plain `org/name` candidate is accepted as-is when it holds `config.json`.
pub fn find_model_path(repo: &str) -> Result<PathBuf, HubError> {
    let candidates = candidate_roots(repo);
    match find_in_roots(&candidates) {
        Some(path) => Ok(path),
        None => Err(HubError::ModelNotFound {
            repo: repo.to_string(),
            candidates,
        }),
    }
}

/// Probe the given roots in order and return the first usable model dir.
pub fn find_in_roots(roots: &[PathBuf]) -> Option<PathBuf> {
    for root in roots {
        if !root.exists() {
            continue;
        }

        let snapshots = root.join("snapshots");
        if snapshots.exists() {
            if let Some(snapshot) = latest_snapshot(&snapshots) {
                return Some(snapshot);
            }
            continue;
        }

        // Plain directory layout, model files live directly in the root
        if root.join("config.json").exists() {
            return Some(root.clone());
        }
    }
    None
}

/// Pick the lexicographically-latest snapshot that contains `config.json`.
///
/// Snapshots without a config are skipped so a partially-downloaded
/// revision never shadows an older complete one.
fn latest_snapshot(snapshots_dir: &Path) -> Option<PathBuf> {
    let mut names: Vec<String> = fs::read_dir(snapshots_dir)
        .ok()?
        .filter_map(|entry| {
            let entry = entry.ok()?;
            if entry.file_type().ok()?.is_dir() {
                Some(entry.file_name().to_string_lossy().into_owned())
            } else {
                None
            }
        })
        .collect();

    names.sort();

    for name in names.iter().rev() {
        let candidate = snapshots_dir.join(name);
        if candidate.join("config.json").exists() {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{create_dir_all, File};
    use tempfile::TempDir;

    fn make_snapshot(root: &Path, revision: &str, with_config: bool) {
        let snap = root.join("snapshots").join(revision);
        create_dir_all(&snap).unwrap();
        if with_config {
            File::create(snap.join("config.json")).unwrap();
        }
    }

    #[test]
    fn test_cache_dir_name() {
        assert_eq!(
            cache_dir_name("openai/gpt-oss-20b"),
            "models--openai--gpt-oss-20b"
        );
    }

    #[test]
    fn test_picks_latest_snapshot() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("models--openai--gpt-oss-20b");
        make_snapshot(&root, "aaaa1111", true);
        make_snapshot(&root, "bbbb2222", true);

        let found = find_in_roots(&[root.clone()]).expect("model found");
        assert_eq!(found, root.join("snapshots").join("bbbb2222"));
    }

    #[test]
    fn test_skips_snapshot_without_config() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("models--openai--gpt-oss-20b");
        make_snapshot(&root, "aaaa1111", true);
        make_snapshot(&root, "zzzz9999", false);

        let found = find_in_roots(&[root.clone()]).expect("model found");
        assert_eq!(found, root.join("snapshots").join("aaaa1111"));
    }

    #[test]
    fn test_plain_layout_requires_config() {
        let tmp = TempDir::new().unwrap();
        let plain = tmp.path().join("openai/gpt-oss-20b");
        create_dir_all(&plain).unwrap();

        assert!(find_in_roots(&[plain.clone()]).is_none());

        File::create(plain.join("config.json")).unwrap();
        assert_eq!(find_in_roots(&[plain.clone()]).unwrap(), plain);
    }

    #[test]
    fn test_probes_roots_in_order() {
        let tmp = TempDir::new().unwrap();
        let first = tmp.path().join("first");
        let second = tmp.path().join("second");
        make_snapshot(&first, "rev1", true);
        make_snapshot(&second, "rev1", true);

        let found = find_in_roots(&[first.clone(), second]).unwrap();
        assert!(found.starts_with(&first));
    }

    #[test]
    fn test_missing_model_reports_candidates() {
        let err = find_model_path("nobody/does-not-exist").unwrap_err();
        let HubError::ModelNotFound { repo, candidates } = err;
        assert_eq!(repo, "nobody/does-not-exist");
        assert!(!candidates.is_empty());
    }
}
