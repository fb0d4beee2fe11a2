//! Docket recurrence engine - integration test support.
//!
//! Re-exports the workspace crates under one root and provides the shared
//! fixtures the integration and property suites build their events from.

pub use docket_app as app;
pub use docket_core as settings;
pub use docket_recur as recur;

pub mod fixtures;
