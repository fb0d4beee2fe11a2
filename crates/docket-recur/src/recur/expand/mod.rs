//! Recurrence expansion.
//!
//! Turns a base event and its rule into the instances overlapping a window.
//! Expansion is a pure function of its inputs; it performs no I/O and keeps
//! no state between calls.

mod cursor;
mod expander;
mod options;
mod zone;

pub use cursor::Occurrence;
pub use expander::{RecurrenceExpander, expand};
pub use options::{BaseOccurrence, ExpansionOptions};

use crate::recur::core::{EventInstance, RuleError};

/// Error during recurrence expansion.
#[derive(Debug, thiserror::Error)]
pub enum ExpansionError {
    /// The rule failed structural validation; nothing was computed.
    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(#[from] RuleError),

    /// The base event ends before it starts.
    #[error("Invalid base event: {0}")]
    InvalidEvent(String),

    /// The iteration ceiling was reached without a natural stop.
    ///
    /// `partial` holds the instances materialized before the ceiling, so a
    /// caller can still show them alongside a warning.
    #[error("Recurrence expansion exceeded the limit of {ceiling} occurrences")]
    RecurrenceOverflow {
        ceiling: usize,
        partial: Vec<EventInstance>,
    },
}

impl ExpansionError {
    /// Instances computed before the error, if the error carries any.
    #[must_use]
    pub fn partial_instances(&self) -> &[EventInstance] {
        match self {
            Self::RecurrenceOverflow { partial, .. } => partial,
            Self::InvalidRule(_) | Self::InvalidEvent(_) => &[],
        }
    }
}
