/// Upper bound on candidate occurrences considered by a single expansion.
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// Joins a base event id and an occurrence index in an instance id.
pub const INSTANCE_ID_SEPARATOR: char = '_';

/// Joins a caller-supplied prefix and the rest of an instance id.
pub const INSTANCE_PREFIX_SEPARATOR: char = '-';

/// Prefix of environment variables read by [`crate::config::Settings::load`].
pub const ENV_PREFIX: &str = "DOCKET";
