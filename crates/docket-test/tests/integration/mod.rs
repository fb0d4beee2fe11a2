//! Scenario suites, one module per concern.

mod adapter;
mod agenda;
mod overflow;
mod rrule_oracle;
mod scenarios;
