//! ID generation for process graph nodes.
//!
//! Generated IDs follow the `{LocalName}_{suffix}` convention, where the
//! suffix is an 8-character alphanumeric string. The suffix source is a
//! strategy trait so callers and tests can substitute a deterministic
//! implementation; the process graph retries generation on collision, which
//! stays observable through the injected source.

use rand::{Rng, distr::Alphanumeric};

/// Length of the random suffix in generated IDs.
pub const SUFFIX_LEN: usize = 8;

/// Strategy for producing ID suffixes.
pub trait IdSource: std::fmt::Debug {
    /// Produce the next suffix. Expected to be [`SUFFIX_LEN`] alphanumeric
    /// characters; the graph only requires that successive calls eventually
    /// yield a value not already in use.
    fn next_suffix(&mut self) -> String;
}

/// Default suffix source backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_suffix(&mut self) -> String {
        rand::rng()
            .sample_iter(Alphanumeric)
            .take(SUFFIX_LEN)
            .map(char::from)
            .collect()
    }
}
