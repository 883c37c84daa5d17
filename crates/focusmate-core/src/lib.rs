//! focusmate-core library.
//!
//! The domain core behind the `fm` CLI: deadline items with a dense display
//! order, focus sessions bucketed into per-hour accumulators, badge rewards,
//! friends, badge-gated messages, and photo storage — all persisted in a
//! single SQLite store.
//!
//! # Conventions
//!
//! - **Errors**: operations return `anyhow::Result`; domain rejections are
//!   [`error::DomainError`] values so callers can map them to stable codes.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`).
//! - **Transactions**: every multi-row mutation runs inside one rusqlite
//!   transaction; partial writes are never observable.

pub mod config;
pub mod db;
pub mod deadline;
pub mod error;
pub mod focus;
pub mod friend;
pub mod message;
pub mod model;
pub mod picture;
pub mod user;

/// Current wall-clock time in microseconds since the Unix epoch.
///
/// All `*_at_us` columns store this representation.
#[must_use]
pub fn now_us() -> i64 {
    chrono::Utc::now().timestamp_micros()
}
