//! # lookout-search
//!
//! Search orchestration for Lookout.
//!
//! A search is authorized by the gateway exactly once, then fanned out to
//! every applicable source adapter concurrently. Results are delivered to a
//! [`ResultSink`] in arrival order. Once all adapters settle the session is
//! written to history on a best-effort basis.
//!
//! Authorization fails fast; sourcing fails soft. A slow or failing adapter
//! never holds up or fails the others.

mod dispatch;
mod error;
mod orchestrator;
pub mod sink;

pub use dispatch::{Deadlines, DispatchStream, dispatch};
pub use error::SearchError;
pub use orchestrator::{SearchOrchestrator, SearchOutcome};
pub use sink::{ChannelSink, CollectingSink, ResultSink, SinkEvent};
