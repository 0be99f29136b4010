//! Tell a host application when a newer release of a package is available.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use update_checker::config::cache_path;
//! use update_checker::version::cache::ResultCache;
//! use update_checker::version::checker::UpdateChecker;
//! use update_checker::version::types::ExtraFields;
//!
//! # async fn run() {
//! let cache = Arc::new(ResultCache::open(cache_path()));
//! let checker = UpdateChecker::new(None, cache);
//! checker
//!     .notify("my-package", "0.9", &ExtraFields::new(), &mut std::io::stdout())
//!     .await;
//! # }
//! ```

pub mod config;
pub mod humanize;
pub mod version;
