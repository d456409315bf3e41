// SPDX-License-Identifier: MIT OR Apache-2.0
//! The data model consistency engine.

use crate::identifier::{Identifier, IdentifierError, SocketRef};
use crate::scene::{ConnectionData, GatewayData, NodeData, SceneData};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Error raised by data model mutations.
#[derive(Debug, thiserror::Error)]
pub enum DataModelError {
    /// An identifier is malformed
    #[error(transparent)]
    MalformedIdentifier(#[from] IdentifierError),

    /// The identifier already names a scene or node somewhere in the model
    #[error("identifier '{identifier}' already exists")]
    DuplicateIdentifier {
        /// The colliding identifier
        identifier: Identifier,
    },

    /// An operation referenced a scene that does not exist
    #[error("scene '{scene}' does not exist")]
    SceneNotFound {
        /// The missing scene reference
        scene: String,
    },

    /// An operation referenced a node that does not exist
    #[error("node '{node}' does not exist")]
    NodeNotFound {
        /// The missing node reference
        node: String,
    },

    /// Both connection endpoints exist but live in different scenes
    #[error("cannot connect '{input_node}' and '{output_node}': nodes are in different scenes")]
    InvalidPlacement {
        /// The input-side node
        input_node: Identifier,
        /// The output-side node
        output_node: Identifier,
    },
}

/// An entity found through the global identifier registry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DataEntry<'a> {
    /// The identifier names a scene
    Scene(&'a SceneData),
    /// The identifier names a node
    Node(&'a NodeData),
}

/// Identifier-keyed store of scenes, nodes, connections and gateways.
///
/// Scene and node identifiers share one global namespace; connections
/// are unnamed. Every mutation validates referential and placement
/// rules before it takes effect, and nothing is rolled back after an
/// error: callers re-validate or discard the model.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DataModel {
    scenes: IndexMap<Identifier, SceneData>,
    /// Nodes grouped by owning scene.
    nodes: IndexMap<Identifier, IndexMap<Identifier, NodeData>>,
    /// Connections grouped by owning scene.
    connections: IndexMap<Identifier, Vec<ConnectionData>>,
    /// Gateways grouped by destination scene, keyed by source node.
    gateways: IndexMap<Identifier, IndexMap<Identifier, GatewayData>>,
    /// Node identifier to owning scene identifier.
    node_scene: HashMap<Identifier, Identifier>,
}

impl DataModel {
    /// Create an empty data model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a scene or node with this identifier exists anywhere.
    pub fn has_identifier(&self, identifier: &str) -> bool {
        self.scenes.contains_key(identifier) || self.node_scene.contains_key(identifier)
    }

    /// Look up the entity registered under an identifier.
    pub fn entry(&self, identifier: &str) -> Option<DataEntry<'_>> {
        if let Some(scene) = self.scenes.get(identifier) {
            return Some(DataEntry::Scene(scene));
        }
        let scene = self.node_scene.get(identifier)?;
        self.nodes
            .get(scene)
            .and_then(|nodes| nodes.get(identifier))
            .map(DataEntry::Node)
    }

    /// Register a scene record.
    pub fn add_scene_data(&mut self, scene: SceneData) -> Result<(), DataModelError> {
        if self.has_identifier(scene.identifier.as_str()) {
            return Err(DataModelError::DuplicateIdentifier {
                identifier: scene.identifier,
            });
        }
        tracing::debug!(scene = %scene.identifier, "adding scene");
        self.scenes.insert(scene.identifier.clone(), scene);
        Ok(())
    }

    /// Add a scene by identifier with optional attributes.
    pub fn add_scene(
        &mut self,
        identifier: impl Into<String>,
        attributes: Option<Value>,
    ) -> Result<(), DataModelError> {
        let identifier = Identifier::new(identifier)?;
        self.add_scene_data(SceneData::new(identifier, attributes))
    }

    /// Remove a scene and everything it owns.
    ///
    /// Cascades: the scene's nodes and connections are dropped and their
    /// identifiers leave the global registry. Gateways *into* the scene
    /// are dropped with it. Unknown scenes are a no-op.
    pub fn remove_scene(&mut self, scene: &str) {
        if self.scenes.shift_remove(scene).is_none() {
            return;
        }
        if let Some(nodes) = self.nodes.shift_remove(scene) {
            for identifier in nodes.keys() {
                self.node_scene.remove(identifier);
            }
        }
        self.connections.shift_remove(scene);
        self.gateways.shift_remove(scene);
        tracing::debug!(scene, "removed scene");
    }

    /// All scene records in registration order.
    pub fn scenes(&self) -> impl Iterator<Item = &SceneData> {
        self.scenes.values()
    }

    /// Look up a scene record.
    pub fn scene(&self, identifier: &str) -> Option<&SceneData> {
        self.scenes.get(identifier)
    }

    /// Register a node record under a scene.
    pub fn add_node_data(&mut self, node: NodeData, scene: &str) -> Result<(), DataModelError> {
        if self.has_identifier(node.identifier.as_str()) {
            return Err(DataModelError::DuplicateIdentifier {
                identifier: node.identifier,
            });
        }
        let Some(scene) = self.scenes.get(scene).map(|s| s.identifier.clone()) else {
            return Err(DataModelError::SceneNotFound {
                scene: scene.to_string(),
            });
        };
        tracing::debug!(node = %node.identifier, scene = %scene, "adding node");
        self.node_scene.insert(node.identifier.clone(), scene.clone());
        self.nodes
            .entry(scene)
            .or_default()
            .insert(node.identifier.clone(), node);
        Ok(())
    }

    /// Add a node by identifier, component name and owning scene.
    pub fn add_node(
        &mut self,
        identifier: impl Into<String>,
        component_name: impl Into<String>,
        scene: &str,
        attributes: Option<Value>,
    ) -> Result<(), DataModelError> {
        let identifier = Identifier::new(identifier)?;
        self.add_node_data(NodeData::new(identifier, component_name, attributes), scene)
    }

    /// Remove a node and free its identifier.
    ///
    /// Connections referencing the node are *not* removed and stay
    /// queryable; see the module tests for the documented gap.
    pub fn remove_node(&mut self, node: &str) {
        let Some(scene) = self.node_scene.remove(node) else {
            return;
        };
        if let Some(nodes) = self.nodes.get_mut(&scene) {
            nodes.shift_remove(node);
        }
        tracing::debug!(node, scene = %scene, "removed node");
    }

    /// Look up a node record anywhere in the model.
    pub fn node(&self, identifier: &str) -> Option<&NodeData> {
        let scene = self.node_scene.get(identifier)?;
        self.nodes.get(scene)?.get(identifier)
    }

    /// The scene a node belongs to.
    pub fn scene_of_node(&self, node: &str) -> Option<&Identifier> {
        self.node_scene.get(node)
    }

    /// Nodes of a scene in registration order; empty for unknown scenes.
    pub fn nodes_in_scene(&self, scene: &str) -> impl Iterator<Item = &NodeData> {
        self.nodes
            .get(scene)
            .into_iter()
            .flat_map(IndexMap::values)
    }

    /// Register a connection record under a scene.
    ///
    /// Only the scene reference is checked here; [`DataModel::connect`]
    /// is the validating entry point.
    pub fn add_connection_data(
        &mut self,
        connection: ConnectionData,
        scene: &str,
    ) -> Result<(), DataModelError> {
        let Some(scene) = self.scenes.get(scene).map(|s| s.identifier.clone()) else {
            return Err(DataModelError::SceneNotFound {
                scene: scene.to_string(),
            });
        };
        self.connections.entry(scene).or_default().push(connection);
        Ok(())
    }

    /// Establish a connection between two node sockets.
    ///
    /// Both nodes are resolved through the node-to-scene map; either
    /// being unknown is an invalid reference, and the nodes resolving to
    /// different scenes is an invalid placement. The connection is
    /// registered under the shared scene.
    pub fn connect(
        &mut self,
        input_node: &str,
        input_socket: &str,
        output_node: &str,
        output_socket: &str,
    ) -> Result<(), DataModelError> {
        let Some(input_scene) = self.node_scene.get(input_node) else {
            return Err(DataModelError::NodeNotFound {
                node: input_node.to_string(),
            });
        };
        let Some(output_scene) = self.node_scene.get(output_node) else {
            return Err(DataModelError::NodeNotFound {
                node: output_node.to_string(),
            });
        };
        if input_scene != output_scene {
            return Err(DataModelError::InvalidPlacement {
                input_node: Identifier::new(input_node)?,
                output_node: Identifier::new(output_node)?,
            });
        }

        let scene = input_scene.clone();
        let connection = ConnectionData::new(
            Identifier::new(input_node)?,
            input_socket,
            Identifier::new(output_node)?,
            output_socket,
        );
        tracing::debug!(
            scene = %scene,
            input = %connection.input_node,
            output = %connection.output_node,
            "adding connection"
        );
        self.connections.entry(scene).or_default().push(connection);
        Ok(())
    }

    /// Remove a connection by value. Unknown connections are a no-op.
    pub fn remove_connection(&mut self, connection: &ConnectionData) {
        for connections in self.connections.values_mut() {
            connections.retain(|c| c != connection);
        }
    }

    /// Connections of a scene in registration order; empty for unknown
    /// scenes.
    pub fn connections_in_scene(&self, scene: &str) -> &[ConnectionData] {
        self.connections
            .get(scene)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Register a gateway from a source node into a destination scene.
    ///
    /// The destination scene and source node must exist; the socket map
    /// itself is not cross-validated against socket existence (that is
    /// compiler/engine territory). A second gateway from the same source
    /// node replaces the first.
    pub fn add_gateway(
        &mut self,
        destination_scene: &str,
        source_node: &str,
        socket_map: IndexMap<SocketRef, SocketRef>,
    ) -> Result<(), DataModelError> {
        let Some(scene) = self
            .scenes
            .get(destination_scene)
            .map(|s| s.identifier.clone())
        else {
            return Err(DataModelError::SceneNotFound {
                scene: destination_scene.to_string(),
            });
        };
        let Some(node) = self.node(source_node).map(|n| n.identifier.clone()) else {
            return Err(DataModelError::NodeNotFound {
                node: source_node.to_string(),
            });
        };
        tracing::debug!(destination = %scene, source = %node, "adding gateway");
        let gateway = GatewayData::new(scene.clone(), node.clone(), socket_map);
        self.gateways.entry(scene).or_default().insert(node, gateway);
        Ok(())
    }

    /// Gateways into a scene, keyed by source node; `None` when the
    /// scene has none.
    pub fn gateways_to_scene(&self, scene: &str) -> Option<&IndexMap<Identifier, GatewayData>> {
        self.gateways.get(scene)
    }

    /// Look up the gateway a source node declares into a scene.
    pub fn gateway(&self, destination_scene: &str, source_node: &str) -> Option<&GatewayData> {
        self.gateways.get(destination_scene)?.get(source_node)
    }
}
