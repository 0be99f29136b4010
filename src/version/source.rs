//! Remote lookup of the latest advertised release

#[cfg(test)]
use mockall::automock;

use crate::version::error::SourceError;
use crate::version::types::{CheckRequest, ReleaseInfo};

/// Trait for asking a remote service about the latest release of a package
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Sends one update request
    ///
    /// # Returns
    /// * `Ok(ReleaseInfo)` - The decoded response, successful or not
    /// * `Err(SourceError)` - Transport failure, timeout or undecodable body
    async fn fetch_release(&self, request: &CheckRequest) -> Result<ReleaseInfo, SourceError>;
}
