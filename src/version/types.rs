use std::fmt;

use chrono::{NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::humanize::humanize;

/// Format of the upload time reported by the update endpoint
pub const UPLOAD_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Request fields owned by the checker; caller-supplied fields with these names are dropped
pub const RESERVED_FIELDS: &[&str] = &[
    "package_name",
    "package_version",
    "rust_version",
    "platform",
];

/// Additional caller metadata sent along with a check
pub type ExtraFields = IndexMap<String, serde_json::Value>;

/// Memoized result of a check: `None` means "no update"
pub type Outcome = Option<UpdateResult>;

/// Identifies a check: the package and the version currently running
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub package_name: String,
    pub package_version: String,
}

impl CacheKey {
    pub fn new(package_name: impl Into<String>, package_version: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            package_version: package_version.into(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.package_name, self.package_version)
    }
}

/// A memoized outcome with the time it was produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Milliseconds since UNIX epoch
    pub checked_at: i64,
    pub outcome: Outcome,
}

/// A package that has a newer version available
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResult {
    pub package_name: String,
    pub running_version: String,
    pub available_version: String,
    pub release_date: Option<NaiveDateTime>,
}

impl UpdateResult {
    /// Build a result; an absent or malformed upload time leaves `release_date` empty.
    pub fn new(
        package_name: &str,
        running_version: &str,
        available_version: &str,
        upload_time: Option<&str>,
    ) -> Self {
        Self {
            package_name: package_name.to_string(),
            running_version: running_version.to_string(),
            available_version: available_version.to_string(),
            release_date: upload_time.and_then(parse_upload_time),
        }
    }

    /// One-line notice, with the release date rendered relative to `now`
    pub fn describe(&self, now: NaiveDateTime) -> String {
        let mut line = format!(
            "Version {} of {} is outdated. Version {} ",
            self.running_version, self.package_name, self.available_version
        );
        match self.release_date {
            Some(released) => {
                line.push_str(&format!("was released {}.", humanize(now, released)))
            }
            None => line.push_str("is available."),
        }
        line
    }
}

impl fmt::Display for UpdateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe(Utc::now().naive_utc()))
    }
}

fn parse_upload_time(upload_time: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(upload_time, UPLOAD_TIME_FORMAT)
        .inspect_err(|e| debug!("Ignoring malformed upload time '{}': {}", upload_time, e))
        .ok()
}

/// Body of the update request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckRequest {
    pub package_name: String,
    pub package_version: String,
    pub rust_version: String,
    pub platform: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl CheckRequest {
    pub fn new(package_name: &str, package_version: &str, extra: &ExtraFields) -> Self {
        let mut extra = extra.clone();
        extra.retain(|key, _| !RESERVED_FIELDS.contains(&key.as_str()));

        Self {
            package_name: package_name.to_string(),
            package_version: package_version.to_string(),
            rust_version: rust_version().to_string(),
            platform: platform(),
            extra,
        }
    }
}

/// Version of the compiler this crate was built with
pub fn rust_version() -> &'static str {
    env!("UPDATE_CHECKER_RUSTC_VERSION")
}

/// Platform descriptor, e.g. "linux-x86_64-unix"
pub fn platform() -> String {
    format!(
        "{}-{}-{}",
        std::env::consts::OS,
        std::env::consts::ARCH,
        std::env::consts::FAMILY
    )
}

/// Update endpoint response
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReleaseInfo {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<ReleaseData>,
}

/// Latest release as advertised by the endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseData {
    pub version: String,
    #[serde(default)]
    pub upload_time: Option<String>,
}

impl ReleaseInfo {
    /// A successful response advertising `version`
    pub fn available(version: &str, upload_time: Option<&str>) -> Self {
        Self {
            success: true,
            data: Some(ReleaseData {
                version: version.to_string(),
                upload_time: upload_time.map(str::to_string),
            }),
        }
    }
}
