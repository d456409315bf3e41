// SPDX-License-Identifier: MIT OR Apache-2.0
//! Identifier generation for elements created without an explicit id.

use uuid::Uuid;

/// Produces unique identifiers for new elements.
///
/// A project holds exactly one generator; every element created without
/// an explicit identifier asks it for one.
pub trait IdentifierGenerator {
    /// Produce an identifier that has never been produced before.
    fn make_unique_identifier(&mut self) -> String;
}

/// Default generator backed by random UUIDs.
#[derive(Debug, Default)]
pub struct UuidIdentifierGenerator;

impl IdentifierGenerator for UuidIdentifierGenerator {
    fn make_unique_identifier(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic generator, mainly for tests and reproducible builds.
#[derive(Debug)]
pub struct SequentialIdentifierGenerator {
    prefix: String,
    next: u64,
}

impl SequentialIdentifierGenerator {
    /// Create a generator yielding `prefix1`, `prefix2` and so on.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }
}

impl IdentifierGenerator for SequentialIdentifierGenerator {
    fn make_unique_identifier(&mut self) -> String {
        self.next += 1;
        format!("{}{}", self.prefix, self.next)
    }
}
