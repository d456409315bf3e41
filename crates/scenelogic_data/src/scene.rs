// SPDX-License-Identifier: MIT OR Apache-2.0
//! Plain data records for scenes, nodes, connections and gateways.

use crate::identifier::{Identifier, SocketRef};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A scene record: an identifier plus optional free-form attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneData {
    /// Scene identifier, globally unique across the data model
    pub identifier: Identifier,
    /// Free-form attributes, opaque to the model
    pub attributes: Option<Value>,
}

impl SceneData {
    /// Create a scene record.
    pub fn new(identifier: Identifier, attributes: Option<Value>) -> Self {
        Self {
            identifier,
            attributes,
        }
    }
}

/// A node record: an identifier, the component it references and
/// optional attributes. A node belongs to exactly one scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    /// Node identifier, globally unique across the data model
    pub identifier: Identifier,
    /// Name of the component this node instantiates
    pub component_name: String,
    /// Free-form attributes, opaque to the model
    pub attributes: Option<Value>,
}

impl NodeData {
    /// Create a node record.
    pub fn new(
        identifier: Identifier,
        component_name: impl Into<String>,
        attributes: Option<Value>,
    ) -> Self {
        Self {
            identifier,
            component_name: component_name.into(),
            attributes,
        }
    }
}

/// A connection record between an input socket and an output socket of
/// two nodes in the same scene. Connections are unnamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionData {
    /// Node whose input socket consumes the value
    pub input_node: Identifier,
    /// Name of the consuming input socket
    pub input_socket: String,
    /// Node whose output socket offers the value
    pub output_node: Identifier,
    /// Name of the offering output socket
    pub output_socket: String,
}

impl ConnectionData {
    /// Create a connection record.
    pub fn new(
        input_node: Identifier,
        input_socket: impl Into<String>,
        output_node: Identifier,
        output_socket: impl Into<String>,
    ) -> Self {
        Self {
            input_node,
            input_socket: input_socket.into(),
            output_node,
            output_socket: output_socket.into(),
        }
    }
}

/// A gateway record linking sockets of a source node to exposed sockets
/// of a destination scene.
///
/// Keys of the socket map are qualified references on the gateway's own
/// side; values reference the destination scene's exposed side. By
/// convention every key resolves to an input-class socket and every
/// value to an output-class socket; this layer does not cross-validate
/// the map against actual socket existence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayData {
    /// Scene the gateway links into
    pub destination_scene: Identifier,
    /// Node the gateway originates from
    pub source_node: Identifier,
    /// Socket links, gateway side to destination side
    pub socket_map: IndexMap<SocketRef, SocketRef>,
}

impl GatewayData {
    /// Create a gateway record.
    pub fn new(
        destination_scene: Identifier,
        source_node: Identifier,
        socket_map: IndexMap<SocketRef, SocketRef>,
    ) -> Self {
        Self {
            destination_scene,
            source_node,
            socket_map,
        }
    }

    /// The socket links, gateway side to destination side.
    pub fn socket_map(&self) -> &IndexMap<SocketRef, SocketRef> {
        &self.socket_map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn id(text: &str) -> Identifier {
        Identifier::new(text).unwrap()
    }

    #[test]
    fn test_scene_record() {
        let scene = SceneData::new(id("myID"), Some(json!([1, 2, 3])));
        assert_eq!("myID", scene.identifier.as_str());
        assert_eq!(Some(json!([1, 2, 3])), scene.attributes);
    }

    #[test]
    fn test_gateway_socket_map() {
        let mut map = IndexMap::new();
        map.insert(
            "myNode:input".parse().unwrap(),
            "superNode:output".parse().unwrap(),
        );
        let gateway = GatewayData::new(id("myScene"), id("myNode"), map.clone());

        assert_eq!(&map, gateway.socket_map());
        assert_eq!("myScene", gateway.destination_scene.as_str());
    }

    #[test]
    fn test_connection_serde_round_trip() {
        let connection = ConnectionData::new(id("a"), "input", id("b"), "output");
        let text = ron::to_string(&connection).unwrap();
        let back: ConnectionData = ron::from_str(&text).unwrap();
        assert_eq!(connection, back);
    }
}
