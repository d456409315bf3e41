// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node, socket and connection elements of the live graph.

use indexmap::IndexMap;
use scenelogic_components::{Component, SocketDescriptor, SocketDirection, SocketType};
use serde_json::Value;
use std::fmt;

use crate::project::ProjectError;

/// Addresses one socket of one node inside a scene.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SocketKey {
    /// The owning node's identifier.
    pub node: String,
    /// The socket name on that node.
    pub socket: String,
}

impl SocketKey {
    /// Address a socket by node identifier and socket name.
    pub fn new(node: impl Into<String>, socket: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            socket: socket.into(),
        }
    }
}

impl fmt::Display for SocketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.node, self.socket)
    }
}

impl From<(&str, &str)> for SocketKey {
    fn from((node, socket): (&str, &str)) -> Self {
        Self::new(node, socket)
    }
}

/// A socket instantiated on a node, with its type resolved.
#[derive(Debug, Clone)]
pub struct SocketElement {
    /// Socket name, unique on the owning node.
    pub name: String,
    /// Resolved socket type.
    pub socket_type: SocketType,
    /// Value flow direction relative to the node.
    pub direction: SocketDirection,
    /// Whether the socket participates in exposure.
    pub exposed: bool,
    /// Whether several connections may end on this socket.
    pub allows_multiple: bool,
}

impl SocketElement {
    /// Instantiate a descriptor against a resolved type.
    pub fn new(descriptor: &SocketDescriptor, socket_type: SocketType) -> Self {
        Self {
            name: descriptor.name.clone(),
            socket_type,
            direction: descriptor.direction,
            exposed: descriptor.exposed,
            allows_multiple: descriptor.allows_multiple,
        }
    }

    /// Whether this is an input-class socket.
    pub fn is_input(&self) -> bool {
        self.direction == SocketDirection::Input
    }

    /// Whether this is an output-class socket.
    pub fn is_output(&self) -> bool {
        self.direction == SocketDirection::Output
    }
}

/// A node instantiated from a component.
///
/// The node materializes one [`SocketElement`] per socket the component
/// declares, with every socket type resolved up front. Later changes to
/// the component do not propagate; rebuild the node instead.
#[derive(Debug, Clone)]
pub struct NodeElement {
    identifier: String,
    component_name: String,
    attributes: Option<Value>,
    inputs: IndexMap<String, SocketElement>,
    outputs: IndexMap<String, SocketElement>,
}

impl NodeElement {
    /// Build a node from a component, resolving socket types through
    /// `resolve_type`.
    ///
    /// Fails when the component's sockets do not resolve or when a
    /// declared socket type is unknown.
    pub fn from_component(
        identifier: impl Into<String>,
        component: &Component,
        attributes: Option<Value>,
        mut resolve_type: impl FnMut(&str) -> Result<SocketType, ProjectError>,
    ) -> Result<Self, ProjectError> {
        let tables = component.sockets()?;

        let mut build = |descriptors: &IndexMap<String, SocketDescriptor>| {
            descriptors
                .values()
                .map(|descriptor| {
                    let socket_type = resolve_type(&descriptor.socket_type)?;
                    Ok((
                        descriptor.name.clone(),
                        SocketElement::new(descriptor, socket_type),
                    ))
                })
                .collect::<Result<IndexMap<_, _>, ProjectError>>()
        };

        let inputs = build(tables.inputs())?;
        let outputs = build(tables.outputs())?;

        Ok(Self {
            identifier: identifier.into(),
            component_name: component.name().to_string(),
            attributes,
            inputs,
            outputs,
        })
    }

    /// The node's identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Name of the component the node was built from.
    pub fn component_name(&self) -> &str {
        &self.component_name
    }

    /// Free-form attributes attached to the node.
    pub fn attributes(&self) -> Option<&Value> {
        self.attributes.as_ref()
    }

    /// Input socket elements in declaration order.
    pub fn input_sockets(&self) -> &IndexMap<String, SocketElement> {
        &self.inputs
    }

    /// Output socket elements in declaration order.
    pub fn output_sockets(&self) -> &IndexMap<String, SocketElement> {
        &self.outputs
    }

    /// Look up a socket of either direction by name.
    pub fn socket(&self, name: &str) -> Option<&SocketElement> {
        self.inputs.get(name).or_else(|| self.outputs.get(name))
    }
}

/// A directed connection between an input socket and an output socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionElement {
    /// The consuming end.
    pub input: SocketKey,
    /// The producing end.
    pub output: SocketKey,
}

impl ConnectionElement {
    /// Connect an input socket to an output socket.
    pub fn new(input: SocketKey, output: SocketKey) -> Self {
        Self { input, output }
    }

    /// Whether either end of the connection sits on the given node.
    pub fn touches_node(&self, node: &str) -> bool {
        self.input.node == node || self.output.node == node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenelogic_components::package;

    fn resolve(name: &str) -> Result<SocketType, ProjectError> {
        package::basic_types()
            .socket_types()
            .find(|t| t.name() == name)
            .cloned()
            .ok_or_else(|| ProjectError::SocketTypeNotFound {
                socket_type: name.to_string(),
            })
    }

    fn test_component() -> Component {
        Component::new(
            "test",
            vec![
                SocketDescriptor::input("input", "Any"),
                SocketDescriptor::output("output", "String"),
            ],
        )
    }

    #[test]
    fn test_node_from_component() {
        let node =
            NodeElement::from_component("myNode", &test_component(), None, resolve).unwrap();

        assert_eq!("myNode", node.identifier());
        assert_eq!("test", node.component_name());
        assert_eq!(1, node.input_sockets().len());
        assert_eq!(1, node.output_sockets().len());

        let input = node.socket("input").unwrap();
        assert!(input.is_input());
        assert_eq!("Any", input.socket_type.name());
        let output = node.socket("output").unwrap();
        assert!(output.is_output());
        assert!(output.allows_multiple);
    }

    #[test]
    fn test_unknown_socket_type_fails() {
        let component = Component::new(
            "test",
            vec![SocketDescriptor::input("input", "Quaternion")],
        );
        let err = NodeElement::from_component("myNode", &component, None, resolve).unwrap_err();
        assert!(matches!(err, ProjectError::SocketTypeNotFound { .. }));
    }

    #[test]
    fn test_connection_touches_node() {
        let connection = ConnectionElement::new(
            SocketKey::new("myNode", "input"),
            SocketKey::new("yourNode", "output"),
        );
        assert!(connection.touches_node("myNode"));
        assert!(connection.touches_node("yourNode"));
        assert!(!connection.touches_node("otherNode"));
    }
}
