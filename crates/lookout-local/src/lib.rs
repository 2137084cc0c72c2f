//! # lookout-local
//!
//! State kept on the user's machine:
//! - [`credentials`]: the session token, in the OS keyring or a private file
//! - [`classify`]: what a text selection looks like and which searches to offer
//! - [`handoff`]: one-shot delivery of a triggered search to the searcher

pub mod classify;
pub mod credentials;
pub mod handoff;

mod error;

pub use classify::{Classification, classify, truncate_label};
pub use credentials::{CredentialSource, CredentialStore, Credentials};
pub use error::LocalError;
pub use handoff::{CorrelationId, HandoffMailbox, PendingSearch};
