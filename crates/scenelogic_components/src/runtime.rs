// SPDX-License-Identifier: MIT OR Apache-2.0
//! Contracts between executable components and an external engine.
//!
//! The engine owns evaluation; this module only fixes the interfaces a
//! component's update and signal handlers are called through.
//!
//! ## Exposed socket resolution order
//!
//! When an exposed socket is read from a parent scope, the engine
//! resolves its value in this order:
//!
//! - Input: connected value, then a node-specified override, then a
//!   value provider, then the component default, then none.
//! - Output: update the node, then a value provider, then the component
//!   default, then none.

use serde_json::Value;

/// Bitmask cache state the engine uses to avoid redundant re-evaluation.
///
/// States combine with `|`; `FOREVER` sets every bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateState(u8);

impl UpdateState {
    /// Updated for this node only; other nodes of the component still update.
    pub const NODE: UpdateState = UpdateState(1 << 0);
    /// Updated for the whole component.
    pub const COMPONENT: UpdateState = UpdateState(1 << 1);
    /// Holds for the current cycle and its child cycles.
    pub const CURRENT_CYCLE: UpdateState = UpdateState(1 << 2);
    /// Holds until the root cycle terminates.
    pub const ROOT_CYCLE: UpdateState = UpdateState(1 << 3);
    /// Holds until the engine terminates.
    pub const FOREVER: UpdateState = UpdateState(0xFF);

    /// The raw bitmask.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Whether every bit of `other` is set in `self`.
    pub fn contains(self, other: UpdateState) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for UpdateState {
    type Output = UpdateState;

    fn bitor(self, rhs: UpdateState) -> UpdateState {
        UpdateState(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for UpdateState {
    fn bitor_assign(&mut self, rhs: UpdateState) {
        self.0 |= rhs.0;
    }
}

/// State the engine provides a component while updating one node.
pub trait RuntimeContext {
    /// Identifier of the node currently being updated.
    fn node_identifier(&self) -> &str;

    /// Attributes of the current node, if any.
    fn node_attributes(&self) -> Option<&Value>;

    /// Name of the output socket whose value was requested, if the
    /// update was triggered by a specific read.
    fn requested_output_socket(&self) -> Option<&str>;

    /// Mark the current node or component as updated so the engine can
    /// skip further update calls according to the given state.
    fn mark_as_updated(&mut self, state: UpdateState);
}

/// Value transport between the engine and an updating node.
pub trait ValuesServer {
    /// Fetch the value at an input socket of the current node.
    fn fetch_input_value(&mut self, input_socket: &str) -> Option<Value>;

    /// Push processed data to an output socket of the current node.
    fn push_output_value(&mut self, output_socket: &str, value: Value);

    /// Make a value available to the parent scope.
    fn expose_value(&mut self, socket: &str, value: Value);
}

/// Signal transport for signal-triggered components.
pub trait SignalServer {
    /// Make a signal on the named socket visible to the parent scope.
    fn expose_signal(&mut self, socket: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_state_combines() {
        let state = UpdateState::NODE | UpdateState::CURRENT_CYCLE;
        assert!(state.contains(UpdateState::NODE));
        assert!(state.contains(UpdateState::CURRENT_CYCLE));
        assert!(!state.contains(UpdateState::COMPONENT));
    }

    #[test]
    fn test_forever_holds_everything() {
        assert!(UpdateState::FOREVER.contains(UpdateState::NODE));
        assert!(UpdateState::FOREVER.contains(UpdateState::COMPONENT));
        assert!(UpdateState::FOREVER.contains(UpdateState::ROOT_CYCLE));
        assert_eq!(0xFF, UpdateState::FOREVER.bits());
    }

    #[test]
    fn test_or_assign() {
        let mut state = UpdateState::default();
        assert_eq!(0, state.bits());
        state |= UpdateState::ROOT_CYCLE;
        assert!(state.contains(UpdateState::ROOT_CYCLE));
    }
}
