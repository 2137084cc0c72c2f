//! # lookout-core
//!
//! Core types, validation, and error types for Lookout.
//!
//! This crate provides the foundational types shared across all Lookout crates:
//! - `Query` and `QueryKind` with superficial input validation
//! - `AuthorizationResult` produced by the remote gateway
//! - `SourceResult` and `SourceStatus` produced by source adapters
//! - `SearchSession`, the append-only aggregate of one search
//! - `HistoryRecord` as returned by the history store
//! - Cross-cutting error types

pub mod authorization;
pub mod errors;
pub mod history;
pub mod query;
pub mod session;
pub mod source;

pub use authorization::{AuthorizationResult, DenialKind};
pub use errors::CoreError;
pub use history::HistoryRecord;
pub use query::{Query, QueryKind};
pub use session::{ResultsSummary, SearchSession, SessionId};
pub use source::{SourceResult, SourceStatus};
