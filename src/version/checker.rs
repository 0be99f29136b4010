//! Update checks: remote lookup, version comparison and result assembly

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::config::{CheckerConfig, DEFAULT_CACHE_TTL_SECS};
use crate::version::cache::ResultCache;
use crate::version::http::HttpReleaseSource;
use crate::version::key::parse_version;
use crate::version::source::ReleaseSource;
use crate::version::types::{
    CacheKey, CheckRequest, ExtraFields, Outcome, ReleaseInfo, UpdateResult,
};

/// Checks whether a newer release of a package is available.
///
/// Outcomes are memoized in the injected [`ResultCache`], so repeated checks
/// of the same package and version inside the TTL cost no network traffic.
/// Failures of any kind are reported as "no update".
pub struct UpdateChecker<S: ReleaseSource = HttpReleaseSource> {
    source: S,
    cache: Arc<ResultCache>,
    ttl: Duration,
}

impl UpdateChecker<HttpReleaseSource> {
    /// Checker against `url`, or the well-known endpoint when `None`
    pub fn new(url: Option<String>, cache: Arc<ResultCache>) -> Self {
        let source = url.map_or_else(HttpReleaseSource::default, HttpReleaseSource::new);
        Self::build(source, cache)
    }

    pub fn from_config(config: &CheckerConfig, cache: Arc<ResultCache>) -> Self {
        let source = HttpReleaseSource::with_timeout(
            config.url().to_string(),
            Duration::from_millis(config.timeout_ms),
        );
        Self::build(source, cache).with_ttl(Duration::from_secs(config.cache.ttl_secs))
    }
}

impl<S: ReleaseSource> UpdateChecker<S> {
    /// Build a checker with a custom release source
    pub fn build(source: S, cache: Arc<ResultCache>) -> Self {
        Self {
            source,
            cache,
            ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Return an [`UpdateResult`] if a version newer than `package_version` is advertised.
    pub async fn check(
        &self,
        package_name: &str,
        package_version: &str,
        extra: &ExtraFields,
    ) -> Option<UpdateResult> {
        let key = CacheKey::new(package_name, package_version);
        self.cache
            .get_or_compute(key, self.ttl, |key| self.fetch_update(key, extra))
            .await
    }

    /// Run [`check`](Self::check) and write a one-line notice to `out` if an
    /// update exists. Nothing is written otherwise; write errors are ignored.
    pub async fn notify<W: Write + ?Sized>(
        &self,
        package_name: &str,
        package_version: &str,
        extra: &ExtraFields,
        out: &mut W,
    ) -> Option<UpdateResult> {
        let result = self.check(package_name, package_version, extra).await?;
        let _ = writeln!(out, "{}", result)
            .inspect_err(|e| debug!("Failed to write update notice: {}", e));
        Some(result)
    }

    async fn fetch_update(&self, key: CacheKey, extra: &ExtraFields) -> Outcome {
        let request = CheckRequest::new(&key.package_name, &key.package_version, extra);

        match self.source.fetch_release(&request).await {
            Ok(info) => evaluate_release(&key, info),
            Err(e) => {
                debug!("Update check for {} failed: {}", key, e);
                None
            }
        }
    }
}

/// Turn an endpoint response into an outcome for the running version in `key`
fn evaluate_release(key: &CacheKey, info: ReleaseInfo) -> Outcome {
    if !info.success {
        debug!("Endpoint reported no release for {}", key.package_name);
        return None;
    }

    let Some(data) = info.data else {
        debug!("Endpoint response for {} has no release data", key.package_name);
        return None;
    };

    if parse_version(&data.version) <= parse_version(&key.package_version) {
        debug!("{} is up to date (advertised {})", key, data.version);
        return None;
    }

    Some(UpdateResult::new(
        &key.package_name,
        &key.package_version,
        &data.version,
        data.upload_time.as_deref(),
    ))
}
