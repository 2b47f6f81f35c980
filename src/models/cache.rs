//! HuggingFace cache lookup for model artifacts
//!
//! Resolves artifacts already present in the local Hub cache so startup does
//! not touch the network when the model was downloaded before.
//! Cache structure:
//! ```text
//! {cache_dir}/
//! └── models--data-silence--fasttext-rus-news-classifier/
//!     ├── snapshots/
//!     │   └── {commit}/
//!     │       └── fasttext_news_classifier.bin
//!     └── refs/
//!         └── main
//! ```

use std::path::{Path, PathBuf};

/// Default cache directory when the config does not set one
///
/// Checks in order:
/// 1. `$HF_HOME/hub`
/// 2. `$XDG_CACHE_HOME/huggingface/hub`
/// 3. `~/.cache/huggingface/hub`
pub fn default_cache_dir() -> PathBuf {
    if let Ok(hf_home) = std::env::var("HF_HOME") {
        return PathBuf::from(hf_home).join("hub");
    }

    if let Ok(xdg_cache) = std::env::var("XDG_CACHE_HOME") {
        return PathBuf::from(xdg_cache).join("huggingface/hub");
    }

    dirs::home_dir()
        .map(|h| h.join(".cache/huggingface/hub"))
        .unwrap_or_else(|| PathBuf::from("./model_cache"))
}

/// Convert a repository ID to its cache directory name
///
/// e.g., "data-silence/fasttext-rus-news-classifier"
/// -> "models--data-silence--fasttext-rus-news-classifier"
pub fn repo_cache_name(repo_id: &str) -> String {
    format!("models--{}", repo_id.replace('/', "--"))
}

/// Resolve a revision to a snapshot commit
///
/// Branch and tag names are resolved through `refs/{revision}`. Anything
/// without a ref file is treated as a commit hash.
fn resolve_commit(repo_dir: &Path, revision: &str) -> String {
    let ref_file = repo_dir.join("refs").join(revision);
    match std::fs::read_to_string(&ref_file) {
        Ok(commit) if !commit.trim().is_empty() => commit.trim().to_string(),
        _ => revision.to_string(),
    }
}

/// Path of a cached artifact, if it has already been downloaded
pub fn cached_artifact(
    cache_dir: &Path,
    repo_id: &str,
    revision: &str,
    filename: &str,
) -> Option<PathBuf> {
    let repo_dir = cache_dir.join(repo_cache_name(repo_id));
    let commit = resolve_commit(&repo_dir, revision);
    let path = repo_dir.join("snapshots").join(commit).join(filename);

    path.is_file().then_some(path)
}

/// Size of an artifact on disk in bytes
pub fn artifact_size(path: &Path) -> Option<u64> {
    std::fs::metadata(path).ok().map(|m| m.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPO: &str = "data-silence/fasttext-rus-news-classifier";
    const FILE: &str = "fasttext_news_classifier.bin";

    fn write_snapshot(cache_dir: &Path, commit: &str, content: &str) -> PathBuf {
        let repo_dir = cache_dir.join(repo_cache_name(REPO));
        let snapshot = repo_dir.join("snapshots").join(commit);
        std::fs::create_dir_all(&snapshot).unwrap();
        let path = snapshot.join(FILE);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn write_ref(cache_dir: &Path, name: &str, commit: &str) {
        let refs = cache_dir.join(repo_cache_name(REPO)).join("refs");
        std::fs::create_dir_all(&refs).unwrap();
        std::fs::write(refs.join(name), commit).unwrap();
    }

    #[test]
    fn test_repo_cache_name() {
        assert_eq!(
            repo_cache_name(REPO),
            "models--data-silence--fasttext-rus-news-classifier"
        );
    }

    #[test]
    fn test_cached_artifact_via_ref() {
        let temp_dir = tempfile::tempdir().unwrap();
        let expected = write_snapshot(temp_dir.path(), "abc123", "model");
        write_ref(temp_dir.path(), "main", "abc123\n");

        let found = cached_artifact(temp_dir.path(), REPO, "main", FILE);
        assert_eq!(found, Some(expected));
    }

    #[test]
    fn test_cached_artifact_via_commit_hash() {
        let temp_dir = tempfile::tempdir().unwrap();
        let expected = write_snapshot(temp_dir.path(), "deadbeef", "model");

        let found = cached_artifact(temp_dir.path(), REPO, "deadbeef", FILE);
        assert_eq!(found, Some(expected));
    }

    #[test]
    fn test_cached_artifact_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_snapshot(temp_dir.path(), "abc123", "model");
        write_ref(temp_dir.path(), "main", "abc123");

        assert!(cached_artifact(temp_dir.path(), REPO, "main", "other.bin").is_none());
    }

    #[test]
    fn test_cached_artifact_stale_ref() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_snapshot(temp_dir.path(), "old", "model");
        write_ref(temp_dir.path(), "main", "new");

        assert!(cached_artifact(temp_dir.path(), REPO, "main", FILE).is_none());
    }

    #[test]
    fn test_cached_artifact_empty_cache() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(cached_artifact(temp_dir.path(), REPO, "main", FILE).is_none());
    }

    #[test]
    fn test_artifact_size() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write_snapshot(temp_dir.path(), "abc123", "hello world");
        assert_eq!(artifact_size(&path), Some(11));
        assert_eq!(artifact_size(&temp_dir.path().join("missing")), None);
    }
}
