//! Recurrence data model: rules, events, instances and display windows.

mod event;
mod rule;
mod window;

pub use event::{BaseEvent, EventInstance, EventPayload, InstanceId};
pub use rule::{EndCondition, Frequency, RecurrenceRule, RuleError, Weekday};
pub use window::TimeWindow;
