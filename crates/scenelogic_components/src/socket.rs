// SPDX-License-Identifier: MIT OR Apache-2.0
//! Socket descriptors for component inputs/outputs.

use serde::{Deserialize, Serialize};

/// Socket direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SocketDirection {
    /// Input socket (consumes a value)
    Input,
    /// Output socket (offers a value)
    Output,
}

/// A named, typed socket declared by a component.
///
/// The descriptor references its socket type by name; the type itself is
/// resolved against a registry when the graph is assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocketDescriptor {
    /// Socket name, unique across all sockets of one component
    pub name: String,
    /// Name of the socket type
    pub socket_type: String,
    /// Socket direction
    pub direction: SocketDirection,
    /// Whether the socket is visible to a parent scope at runtime
    pub exposed: bool,
    /// Default value used when nothing else resolves
    pub default_value: Option<serde_json::Value>,
    /// Whether multiple connections are allowed
    pub allows_multiple: bool,
}

impl SocketDescriptor {
    /// Create a new input socket.
    pub fn input(name: impl Into<String>, socket_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            socket_type: socket_type.into(),
            direction: SocketDirection::Input,
            exposed: false,
            default_value: None,
            allows_multiple: false,
        }
    }

    /// Create a new output socket.
    ///
    /// Outputs allow multiple connections by default.
    pub fn output(name: impl Into<String>, socket_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            socket_type: socket_type.into(),
            direction: SocketDirection::Output,
            exposed: false,
            default_value: None,
            allows_multiple: true,
        }
    }

    /// Mark the socket as exposed to the parent scope.
    pub fn exposed(mut self) -> Self {
        self.exposed = true;
        self
    }

    /// Set the default value.
    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Override whether multiple connections are allowed.
    pub fn with_multiple(mut self, allows_multiple: bool) -> Self {
        self.allows_multiple = allows_multiple;
        self
    }

    /// Whether this is an input socket.
    pub fn is_input(&self) -> bool {
        self.direction == SocketDirection::Input
    }

    /// Whether this is an output socket.
    pub fn is_output(&self) -> bool {
        self.direction == SocketDirection::Output
    }
}
