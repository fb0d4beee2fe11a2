//! Recurring-event expansion for the docket practice-management suite.
//!
//! A [`BaseEvent`] plus a [`RecurrenceRule`] describe a series; the
//! [`RecurrenceExpander`] materializes the [`EventInstance`]s of that series
//! which overlap a requested [`TimeWindow`]. The [`recur::adapter`] module
//! turns stored event records into those model types.

pub mod error;
pub mod recur;

pub use recur::core::{
    BaseEvent, EndCondition, EventInstance, EventPayload, Frequency, InstanceId, RecurrenceRule,
    RuleError, TimeWindow, Weekday,
};
pub use recur::expand::{
    BaseOccurrence, ExpansionError, ExpansionOptions, Occurrence, RecurrenceExpander, expand,
};
