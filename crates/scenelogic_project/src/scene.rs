// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene elements: nodes plus the connections between their sockets.

use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;

use crate::element::{ConnectionElement, NodeElement, SocketElement, SocketKey};
use crate::project::ProjectError;

/// A scene of the live graph.
///
/// Owns its nodes and connections. Connection endpoints are resolved
/// against the scene's own nodes, so a connection can never span
/// scenes.
#[derive(Debug, Clone, Default)]
pub struct SceneElement {
    identifier: String,
    component_name: Option<String>,
    attributes: Option<Value>,
    nodes: IndexMap<String, NodeElement>,
    connections: Vec<ConnectionElement>,
    /// Last connection per non-multiple socket, replaced on reconnect.
    single_connections: HashMap<SocketKey, ConnectionElement>,
}

impl SceneElement {
    /// Create an empty scene.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    /// Attach the name of a component describing the scene itself.
    pub fn with_component_name(mut self, name: impl Into<String>) -> Self {
        self.component_name = Some(name.into());
        self
    }

    /// Attach free-form attributes.
    pub fn with_attributes(mut self, attributes: Option<Value>) -> Self {
        self.attributes = attributes;
        self
    }

    /// The scene's identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Name of the component describing the scene, if any.
    pub fn component_name(&self) -> Option<&str> {
        self.component_name.as_deref()
    }

    /// Free-form attributes attached to the scene.
    pub fn attributes(&self) -> Option<&Value> {
        self.attributes.as_ref()
    }

    /// Add a node, replacing any node with the same identifier.
    pub fn add_node(&mut self, node: NodeElement) {
        self.nodes.insert(node.identifier().to_string(), node);
    }

    /// Remove a node and every connection touching its sockets.
    pub fn remove_node(&mut self, identifier: &str) {
        if self.nodes.shift_remove(identifier).is_none() {
            return;
        }
        self.connections.retain(|c| !c.touches_node(identifier));
        self.single_connections
            .retain(|key, _| key.node != identifier);
        tracing::debug!(scene = %self.identifier, node = identifier, "removed node");
    }

    /// Look up a node by identifier.
    pub fn node(&self, identifier: &str) -> Option<&NodeElement> {
        self.nodes.get(identifier)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeElement> {
        self.nodes.values()
    }

    /// Connections in establishment order.
    pub fn connections(&self) -> &[ConnectionElement] {
        &self.connections
    }

    /// Connect two sockets, given in either order.
    ///
    /// Exactly one endpoint must resolve to an input socket and the
    /// other to an output socket of nodes in this scene. A non-multiple
    /// endpoint drops its previous connection first.
    pub fn connect(
        &mut self,
        first: impl Into<SocketKey>,
        second: impl Into<SocketKey>,
    ) -> Result<(), ProjectError> {
        let first = first.into();
        let second = second.into();
        let first_socket = self.resolve_socket(&first)?;
        let second_socket = self.resolve_socket(&second)?;

        let (input, output) = match (first_socket.is_input(), second_socket.is_input()) {
            (true, false) => (first, second),
            (false, true) => (second, first),
            _ => {
                return Err(ProjectError::InvalidConnection { first, second });
            }
        };

        self.add_connection(ConnectionElement::new(input, output));
        Ok(())
    }

    /// Register an already validated connection.
    fn add_connection(&mut self, connection: ConnectionElement) {
        for key in [connection.input.clone(), connection.output.clone()] {
            if let Some(previous) = self.single_connections.remove(&key) {
                self.remove_connection(&previous);
            }
            let allows_multiple = self
                .resolve_socket(&key)
                .map(|socket| socket.allows_multiple)
                .unwrap_or(true);
            if !allows_multiple {
                self.single_connections.insert(key, connection.clone());
            }
        }
        tracing::debug!(
            scene = %self.identifier,
            input = %connection.input,
            output = %connection.output,
            "connected"
        );
        self.connections.push(connection);
    }

    /// Remove a connection by value. Unknown connections are a no-op.
    pub fn remove_connection(&mut self, connection: &ConnectionElement) {
        self.connections.retain(|c| c != connection);
        self.single_connections.retain(|_, c| c != connection);
    }

    fn resolve_socket(&self, key: &SocketKey) -> Result<&SocketElement, ProjectError> {
        let Some(node) = self.nodes.get(&key.node) else {
            return Err(ProjectError::NodeNotFound {
                node: key.node.clone(),
            });
        };
        node.socket(&key.socket)
            .ok_or_else(|| ProjectError::SocketNotFound {
                node: key.node.clone(),
                socket: key.socket.clone(),
            })
    }
}
