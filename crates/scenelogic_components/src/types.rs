// SPDX-License-Identifier: MIT OR Apache-2.0
//! Socket types and the type-acceptance graph.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// A named socket type.
///
/// Acceptance is a one-directional question answered against a directed
/// edge set: `a.accepts(b)` decides whether a value offered by a socket
/// of type `b` may flow into a socket declared as type `a`. The edge set
/// is hand-authored; no transitive closure is ever computed, so a single
/// hop is all `accepts` looks at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocketType {
    name: String,
    /// Names of types this type accepts besides itself.
    accepted: IndexSet<String>,
    signal: bool,
}

impl SocketType {
    /// Create a new value type with no combinations.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accepted: IndexSet::new(),
            signal: false,
        }
    }

    /// Create a signal type.
    ///
    /// Signal types carry control flow rather than values; an engine uses
    /// the marker to keep the two apart. A fresh signal type accepts only
    /// itself.
    pub fn signal(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accepted: IndexSet::new(),
            signal: true,
        }
    }

    /// The type name, unique within a registry.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is a signal type.
    pub fn is_signal(&self) -> bool {
        self.signal
    }

    /// Names of the types this type accepts, in registration order.
    pub fn accepted_types(&self) -> impl Iterator<Item = &str> {
        self.accepted.iter().map(String::as_str)
    }

    /// Register a one-directional edge: `self` will accept `other`.
    ///
    /// This is the primitive the built-in packages use to author
    /// asymmetric acceptance (e.g. `String` accepts `Number` but not the
    /// other way around).
    pub fn accept_type(&mut self, other: impl Into<String>) -> &mut Self {
        self.accepted.insert(other.into());
        self
    }

    /// Combine two types symmetrically: each accepts the other.
    pub fn combine_with(&mut self, other: &mut SocketType) -> &mut Self {
        self.accepted.insert(other.name.clone());
        other.accepted.insert(self.name.clone());
        self
    }

    /// Whether a value of type `other` may flow into a socket of this
    /// type. True iff `other` is the same type or a single-hop edge
    /// exists.
    pub fn accepts(&self, other: &SocketType) -> bool {
        self.name == other.name || self.accepted.contains(&other.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_type_accepts_only_itself() {
        let number = SocketType::new("Number");
        let string = SocketType::new("String");

        assert_eq!("Number", number.name());
        assert_eq!(0, number.accepted_types().count());
        assert!(number.accepts(&number));
        assert!(!number.accepts(&string));
    }

    #[test]
    fn test_combination_is_symmetric() {
        let mut any = SocketType::new("Any");
        let mut string = SocketType::new("String");

        string.combine_with(&mut any);

        assert!(string.accepts(&any));
        assert!(any.accepts(&string));
        assert!(string.accepted_types().any(|n| n == "Any"));
        assert!(any.accepted_types().any(|n| n == "String"));
    }

    #[test]
    fn test_directed_edge_is_one_way() {
        let mut string = SocketType::new("String");
        let number = SocketType::new("Number");

        string.accept_type("Number");

        assert!(string.accepts(&number));
        assert!(!number.accepts(&string));
    }

    #[test]
    fn test_no_transitive_closure() {
        let mut a = SocketType::new("A");
        let mut b = SocketType::new("B");
        let c = SocketType::new("C");

        a.accept_type("B");
        b.accept_type("C");

        assert!(a.accepts(&b));
        assert!(b.accepts(&c));
        // A combines with B and B with C, but A never accepts C.
        assert!(!a.accepts(&c));
    }

    #[test]
    fn test_serde_round_trip() {
        let mut string = SocketType::new("String");
        string.accept_type("Number").accept_type("Boolean");

        let text = ron::to_string(&string).unwrap();
        let back: SocketType = ron::from_str(&text).unwrap();
        assert_eq!(string, back);
    }
}
