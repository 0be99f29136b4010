//! Update checking for a single package
//!
//! This module decides whether a newer release of a package is available,
//! memoizing every answer so the host application pays for at most one quick
//! network request per package version and TTL window.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Checker   │────▶│    Cache    │────▶│ Cache file  │
//! │  (check)    │     │  (memory)   │◀────│  (shared)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐     ┌─────────────┐
//! │   Source    │     │     Key     │
//! │   (HTTP)    │     │(version cmp)│
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: In-memory result cache reconciled with a shared file
//! - [`checker`]: Remote lookup, comparison and result assembly
//! - [`key`]: Comparable keys for loosely formatted version strings
//! - [`source`]: Trait for the remote lookup
//! - [`http`]: HTTP implementation of the remote lookup
//! - [`error`]: Error types for the cache file and the remote lookup
//! - [`types`]: Common types like `UpdateResult` and `CacheKey`

pub mod cache;
pub mod checker;
pub mod error;
pub mod http;
pub mod key;
pub mod source;
pub mod types;
