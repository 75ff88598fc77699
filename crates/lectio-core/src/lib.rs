//! lectio-core library.
//!
//! Tracks a user's progress through a fixed daily reading plan, persists
//! completion state and social activity (comments, completions) through a
//! document-store gateway, and assembles per-day reading views with
//! navigation.
//!
//! # Conventions
//!
//! - **Errors**: typed [`error::Error`]/[`store::StoreError`] in the
//!   library, `anyhow::Result` at file/config boundaries.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`).
//! - **Degradation**: gateway read failures degrade to safe defaults
//!   (empty feed, `error` progress status) rather than propagating.

pub mod comment;
pub mod config;
pub mod error;
pub mod feed;
pub mod model;
pub mod nav;
pub mod plan;
pub mod progress;
pub mod session;
pub mod store;
pub mod view;

pub use error::{Error, ErrorCode};
