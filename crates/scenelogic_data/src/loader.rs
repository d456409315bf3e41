// SPDX-License-Identifier: MIT OR Apache-2.0
//! Loading a [`DataModel`] from a JSON document.

use crate::identifier::SocketRef;
use crate::model::{DataModel, DataModelError};
use indexmap::IndexMap;
use serde_json::Value;

/// Top-level key holding the scene table.
pub const SCENES_KEY: &str = "scenes";
/// Scene key holding the node table.
pub const NODES_KEY: &str = "nodes";
/// Scene key holding the connection list.
pub const CONNECTIONS_KEY: &str = "connections";
/// Scene key flagging the entry scene.
pub const TOP_LEVEL_KEY: &str = "topLevel";
/// Record key holding the identifier.
pub const ID_KEY: &str = "id";
/// Node key holding the component name.
pub const NAME_KEY: &str = "name";
/// Record key holding free-form attributes.
pub const DATA_KEY: &str = "data";
/// Connection key naming the input-side node.
pub const CONNECTION_INPUT_NODE_KEY: &str = "src";
/// Connection key naming the input socket.
pub const CONNECTION_INPUT_KEY: &str = "input";
/// Connection key naming the output-side node.
pub const CONNECTION_OUTPUT_NODE_KEY: &str = "dst";
/// Connection key naming the output socket.
pub const CONNECTION_OUTPUT_KEY: &str = "output";
/// Node key naming the scene a gateway leads into.
pub const GATEWAY_DESTINATION_KEY: &str = "gatewayDestination";
/// Node key holding the gateway socket map.
pub const GATEWAY_SOCKET_MAP_KEY: &str = "gatewaySocketMap";

/// Error raised while translating a JSON document into a data model.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// The document is not valid JSON
    #[error("document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document root is not an object
    #[error("document root must be an object")]
    MalformedDocument,

    /// A record is missing its identifier
    #[error("missing identifier on {kind} record at index {index}")]
    MissingIdentifier {
        /// What kind of record lacked the identifier
        kind: &'static str,
        /// Position of the record in its collection
        index: usize,
    },

    /// A node record is missing its component name
    #[error("node '{node}' is missing a component name")]
    MissingComponentName {
        /// The offending node identifier
        node: String,
    },

    /// A connection record is missing a required key
    #[error("connection at index {index} is missing key '{key}'")]
    MalformedConnection {
        /// Position of the connection in its scene
        index: usize,
        /// The absent key
        key: &'static str,
    },

    /// A gateway socket map entry is not a valid socket reference
    #[error("node '{node}' has a malformed gateway socket map")]
    MalformedGateway {
        /// The node declaring the gateway
        node: String,
    },

    /// The data model rejected a record
    #[error(transparent)]
    Model(#[from] DataModelError),
}

/// Builds a [`DataModel`] from a JSON scene document.
///
/// The document shape is an object with a `scenes` collection; each
/// scene carries `nodes` and `connections` collections. Collections may
/// be arrays or objects; with [`JsonLoader::use_indices_as_identifiers`]
/// the array index or object key stands in for a missing `id`.
///
/// Recoverable oddities (no scenes at all, a scene without nodes) do
/// not fail the load; they are logged and collected as notices, and the
/// offending scene is skipped entirely.
#[derive(Debug, Default)]
pub struct JsonLoader {
    use_indices_as_identifiers: bool,
    notices: Vec<String>,
}

impl JsonLoader {
    /// Create a loader with strict identifier requirements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Let collection indices or object keys stand in for missing
    /// identifiers.
    pub fn use_indices_as_identifiers(mut self, enable: bool) -> Self {
        self.use_indices_as_identifiers = enable;
        self
    }

    /// Notices collected during the last load.
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    /// Parse a JSON document and load it.
    pub fn load_str(&mut self, text: &str) -> Result<DataModel, LoaderError> {
        let document: Value = serde_json::from_str(text)?;
        self.load_value(&document)
    }

    /// Load an already parsed JSON document.
    pub fn load_value(&mut self, document: &Value) -> Result<DataModel, LoaderError> {
        self.notices.clear();
        let mut model = DataModel::new();

        let Some(root) = document.as_object() else {
            return Err(LoaderError::MalformedDocument);
        };
        let Some(scenes) = root.get(SCENES_KEY) else {
            self.notice("document contains no scenes".to_string());
            return Ok(model);
        };

        // Gateways may link into scenes declared later in the document,
        // so they register only after every scene has loaded.
        let mut gateways = Vec::new();
        for (index, key, scene) in iter_collection(scenes) {
            self.load_scene(&mut model, &mut gateways, index, key, scene)?;
        }
        for (destination, source, map) in gateways {
            model.add_gateway(&destination, &source, map)?;
        }
        Ok(model)
    }

    fn load_scene(
        &mut self,
        model: &mut DataModel,
        gateways: &mut Vec<(String, String, IndexMap<SocketRef, SocketRef>)>,
        index: usize,
        key: Option<&str>,
        scene: &Value,
    ) -> Result<(), LoaderError> {
        let identifier = self.record_identifier("scene", index, key, scene)?;

        let Some(nodes) = scene.get(NODES_KEY) else {
            self.notice(format!(
                "scene '{identifier}' contains no nodes and was skipped"
            ));
            return Ok(());
        };

        model.add_scene(identifier.clone(), scene.get(DATA_KEY).cloned())?;

        for (node_index, node_key, node) in iter_collection(nodes) {
            let node_id = self.record_identifier("node", node_index, node_key, node)?;
            let Some(component_name) = node.get(NAME_KEY).and_then(Value::as_str) else {
                return Err(LoaderError::MissingComponentName { node: node_id });
            };
            model.add_node(
                node_id.clone(),
                component_name,
                &identifier,
                node.get(DATA_KEY).cloned(),
            )?;
            if let Some(destination) = node.get(GATEWAY_DESTINATION_KEY).and_then(Value::as_str) {
                let map = parse_socket_map(node.get(GATEWAY_SOCKET_MAP_KEY)).ok_or_else(|| {
                    LoaderError::MalformedGateway {
                        node: node_id.clone(),
                    }
                })?;
                gateways.push((destination.to_string(), node_id, map));
            }
        }

        if let Some(connections) = scene.get(CONNECTIONS_KEY) {
            for (connection_index, _, connection) in iter_collection(connections) {
                let field = |key: &'static str| {
                    connection.get(key).and_then(Value::as_str).ok_or(
                        LoaderError::MalformedConnection {
                            index: connection_index,
                            key,
                        },
                    )
                };
                model.connect(
                    field(CONNECTION_INPUT_NODE_KEY)?,
                    field(CONNECTION_INPUT_KEY)?,
                    field(CONNECTION_OUTPUT_NODE_KEY)?,
                    field(CONNECTION_OUTPUT_KEY)?,
                )?;
            }
        }
        Ok(())
    }

    fn record_identifier(
        &mut self,
        kind: &'static str,
        index: usize,
        key: Option<&str>,
        record: &Value,
    ) -> Result<String, LoaderError> {
        if let Some(id) = record.get(ID_KEY) {
            return Ok(stringify(id));
        }
        if self.use_indices_as_identifiers {
            return Ok(key.map(str::to_string).unwrap_or_else(|| index.to_string()));
        }
        Err(LoaderError::MissingIdentifier { kind, index })
    }

    fn notice(&mut self, message: String) {
        tracing::warn!("{message}");
        self.notices.push(message);
    }
}

/// Iterate a JSON collection that may be an array or an object, yielding
/// the index, the object key if any, and the value.
fn iter_collection(value: &Value) -> Box<dyn Iterator<Item = (usize, Option<&str>, &Value)> + '_> {
    match value {
        Value::Array(items) => Box::new(
            items
                .iter()
                .enumerate()
                .map(|(index, item)| (index, None, item)),
        ),
        Value::Object(items) => Box::new(
            items
                .iter()
                .enumerate()
                .map(|(index, (key, item))| (index, Some(key.as_str()), item)),
        ),
        _ => Box::new(std::iter::empty()),
    }
}

fn parse_socket_map(value: Option<&Value>) -> Option<IndexMap<SocketRef, SocketRef>> {
    let mut map = IndexMap::new();
    let Some(value) = value else {
        return Some(map);
    };
    for (from, to) in value.as_object()? {
        let from: SocketRef = from.parse().ok()?;
        let to: SocketRef = to.as_str()?.parse().ok()?;
        map.insert(from, to);
    }
    Some(map)
}

/// Render a JSON identifier value the way it reads in the document.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
