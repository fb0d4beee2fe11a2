pub mod agenda;
pub mod error;
pub mod input;
