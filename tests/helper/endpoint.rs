//! Update endpoint test utilities

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mockito::{Mock, ServerGuard};
use tempfile::TempDir;

use update_checker::version::cache::ResultCache;
use update_checker::version::checker::UpdateChecker;

/// Register a successful update response for `package_name` on `server`
pub fn mock_release(
    server: &mut ServerGuard,
    package_name: &str,
    version: &str,
    upload_time: &str,
) -> Mock {
    server
        .mock("PUT", "/check")
        .match_body(mockito::Matcher::PartialJsonString(format!(
            r#"{{"package_name": "{}"}}"#,
            package_name
        )))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"success": true, "data": {{"version": "{}", "upload_time": "{}"}}}}"#,
            version, upload_time
        ))
}

/// Temporary directory holding a cache file path
pub fn cache_file() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("update_checker_cache.json");
    (temp_dir, path)
}

/// Checker against `server` with its own cache file
pub fn create_test_checker(server: &ServerGuard, cache_path: &Path) -> UpdateChecker {
    let cache = Arc::new(ResultCache::open(cache_path));
    UpdateChecker::new(Some(format!("{}/check", server.url())), cache)
}
