// SPDX-License-Identifier: MIT OR Apache-2.0
//! Building element graphs from records or from a validated data model.

use scenelogic_data::DataModel;
use serde_json::Value;

use crate::project::{Project, ProjectError};
use crate::scene::SceneElement;

/// Top-level key holding the scene collection.
pub const SCENES_KEY: &str = "scenes";
/// Scene key holding the node collection.
pub const NODES_KEY: &str = "nodes";
/// Scene key holding the connection list.
pub const CONNECTIONS_KEY: &str = "connections";
/// Scene key flagging the scene as top-level; defaults to true.
pub const TOP_LEVEL_KEY: &str = "topLevel";
/// Record key holding the identifier.
pub const ID_KEY: &str = "id";
/// Record key holding the component name.
pub const NAME_KEY: &str = "name";
/// Record key holding free-form attributes.
pub const DATA_KEY: &str = "data";
/// Connection key naming the producing node.
pub const CONNECTION_SRC_NODE_KEY: &str = "src";
/// Connection key naming the producing node's output socket.
pub const CONNECTION_OUTPUT_KEY: &str = "output";
/// Connection key naming the consuming node.
pub const CONNECTION_DST_NODE_KEY: &str = "dst";
/// Connection key naming the consuming node's input socket.
pub const CONNECTION_INPUT_KEY: &str = "input";

/// Builds scene elements into a [`Project`] from nested JSON records or
/// from an already validated [`DataModel`].
///
/// Structural failures (unknown component, unresolvable socket type)
/// error out; wiring failures (a connection record naming a socket the
/// node does not have) are advisory: logged, collected as notices, and
/// skipped.
#[derive(Debug, Default)]
pub struct ProjectLoader {
    notices: Vec<String>,
}

impl ProjectLoader {
    /// Create a loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices collected during the last load.
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    /// Build scene elements from a JSON document into the project.
    pub fn load_value(
        &mut self,
        project: &mut Project,
        document: &Value,
    ) -> Result<(), ProjectError> {
        self.notices.clear();

        let scenes = document.get(SCENES_KEY).and_then(Value::as_array);
        let Some(scenes) = scenes else {
            self.notice("no scenes found in data".to_string());
            return Ok(());
        };

        for record in scenes {
            let identifier = record_identifier(project, record);
            let mut scene =
                SceneElement::new(&identifier).with_attributes(record.get(DATA_KEY).cloned());
            if let Some(name) = record_component_name(record) {
                scene = scene.with_component_name(name);
            }

            if let Some(nodes) = record.get(NODES_KEY).and_then(Value::as_array) {
                for node_record in nodes {
                    let node_id = record_identifier(project, node_record);
                    let component_name =
                        record_component_name(node_record).ok_or_else(|| {
                            ProjectError::MissingComponentName {
                                node: node_id.clone(),
                            }
                        })?;
                    let node = project.build_node(
                        node_id,
                        &component_name,
                        node_record.get(DATA_KEY).cloned(),
                    )?;
                    scene.add_node(node);
                }
            }

            if let Some(connections) = record.get(CONNECTIONS_KEY).and_then(Value::as_array) {
                for connection in connections {
                    self.wire(&mut scene, connection);
                }
            }

            let top_level = record
                .get(TOP_LEVEL_KEY)
                .and_then(Value::as_bool)
                .unwrap_or(true);
            project.add_scene(scene, top_level);
        }
        Ok(())
    }

    /// Build scene elements from a validated data model.
    ///
    /// Every node's component must be registered in the project; model
    /// connections that do not resolve against the built nodes are
    /// advisory. All loaded scenes are top-level.
    pub fn load_data_model(
        &mut self,
        project: &mut Project,
        model: &DataModel,
    ) -> Result<(), ProjectError> {
        self.notices.clear();

        for scene_data in model.scenes() {
            let identifier = scene_data.identifier.as_str();
            let mut scene =
                SceneElement::new(identifier).with_attributes(scene_data.attributes.clone());

            for node_data in model.nodes_in_scene(identifier) {
                let node = project.build_node(
                    node_data.identifier.as_str(),
                    &node_data.component_name,
                    node_data.attributes.clone(),
                )?;
                scene.add_node(node);
            }

            for connection in model.connections_in_scene(identifier) {
                if let Err(error) = scene.connect(
                    (connection.input_node.as_str(), connection.input_socket.as_str()),
                    (connection.output_node.as_str(), connection.output_socket.as_str()),
                ) {
                    self.notice(format!(
                        "could not connect '{}:{}' and '{}:{}': {error}",
                        connection.input_node,
                        connection.input_socket,
                        connection.output_node,
                        connection.output_socket
                    ));
                }
            }

            project.add_scene(scene, true);
        }
        Ok(())
    }

    /// Resolve one connection record against the scene being built.
    fn wire(&mut self, scene: &mut SceneElement, connection: &Value) {
        let field = |key: &str| {
            connection
                .get(key)
                .map(stringify)
                .filter(|text| !text.is_empty())
        };
        let endpoints = (|| {
            let src = field(CONNECTION_SRC_NODE_KEY)?;
            let output = field(CONNECTION_OUTPUT_KEY)?;
            let dst = field(CONNECTION_DST_NODE_KEY)?;
            let input = field(CONNECTION_INPUT_KEY)?;
            Some(((dst, input), (src, output)))
        })();

        let Some((input, output)) = endpoints else {
            self.notice(format!("could not connect: malformed record {connection}"));
            return;
        };
        if let Err(error) = scene.connect(
            (input.0.as_str(), input.1.as_str()),
            (output.0.as_str(), output.1.as_str()),
        ) {
            self.notice(format!(
                "could not connect '{}:{}' and '{}:{}': {error}",
                input.0, input.1, output.0, output.1
            ));
        }
    }

    fn notice(&mut self, message: String) {
        tracing::warn!("{message}");
        self.notices.push(message);
    }
}

/// Component name from a record's `name` key, falling back to its `id`.
fn record_component_name(record: &Value) -> Option<String> {
    record
        .get(NAME_KEY)
        .or_else(|| record.get(ID_KEY))
        .map(stringify)
}

/// Identifier from a record's `id` key, else a generated one.
fn record_identifier(project: &mut Project, record: &Value) -> String {
    match record.get(ID_KEY) {
        Some(id) => stringify(id),
        None => project.make_identifier(),
    }
}

/// Render a JSON scalar the way it reads in the document.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idgen::SequentialIdentifierGenerator;
    use scenelogic_components::{package, Component, SocketDescriptor};
    use scenelogic_data::JsonLoader;
    use serde_json::json;

    fn test_project() -> Project {
        let mut project =
            Project::with_identifier_generator(Box::new(SequentialIdentifierGenerator::new("el")));
        project.add_package(&package::basic_types());
        project.add_component(Component::new(
            "test",
            vec![
                SocketDescriptor::input("input", "Any"),
                SocketDescriptor::output("output", "String"),
            ],
        ));
        project
    }

    fn test_document() -> Value {
        json!({
            "scenes": [
                {
                    "id": 1,
                    "name": "default",
                    "nodes": [
                        {"id": 2, "name": "test"},
                        {"id": 3, "name": "test"}
                    ],
                    "connections": [
                        {"src": 2, "output": "output", "dst": 3, "input": "input"}
                    ]
                }
            ]
        })
    }

    #[test]
    fn test_load_document() {
        let mut project = test_project();
        let mut loader = ProjectLoader::new();
        loader.load_value(&mut project, &test_document()).unwrap();

        assert!(loader.notices().is_empty());
        assert_eq!(1, project.scenes().count());
        let scene = project.scene("1").unwrap();
        assert_eq!(Some("default"), scene.component_name());
        assert!(project.is_top_level_scene("1"));
        assert_eq!(2, scene.nodes().count());

        let connections = scene.connections();
        assert_eq!(1, connections.len());
        assert_eq!("3", connections[0].input.node);
        assert_eq!("input", connections[0].input.socket);
        assert_eq!("2", connections[0].output.node);
        assert_eq!("output", connections[0].output.socket);
    }

    #[test]
    fn test_missing_identifiers_are_generated() {
        let mut project = test_project();
        let document = json!({
            "scenes": [
                {"nodes": [{"name": "test"}]}
            ]
        });

        ProjectLoader::new().load_value(&mut project, &document).unwrap();

        let scene = project.scene("el1").unwrap();
        assert!(scene.node("el2").is_some());
    }

    #[test]
    fn test_component_name_falls_back_to_id() {
        let mut project = test_project();
        let document = json!({
            "scenes": [
                {
                    "id": "main",
                    "nodes": [
                        {"id": "test"}
                    ]
                }
            ]
        });

        ProjectLoader::new().load_value(&mut project, &document).unwrap();

        let scene = project.scene("main").unwrap();
        // No `name` key: the scene's id doubles as its component name
        // and the node's id names its component.
        assert_eq!(Some("main"), scene.component_name());
        assert_eq!("test", scene.node("test").unwrap().component_name());
    }

    #[test]
    fn test_unknown_component_fails() {
        let mut project = test_project();
        let document = json!({
            "scenes": [
                {"id": "main", "nodes": [{"id": "n", "name": "ghost"}]}
            ]
        });

        let err = ProjectLoader::new()
            .load_value(&mut project, &document)
            .unwrap_err();
        assert!(matches!(err, ProjectError::ComponentNotFound { .. }));
    }

    #[test]
    fn test_unresolvable_connection_is_advisory() {
        let mut project = test_project();
        let document = json!({
            "scenes": [
                {
                    "id": "main",
                    "nodes": [
                        {"id": "a", "name": "test"},
                        {"id": "b", "name": "test"}
                    ],
                    "connections": [
                        {"src": "a", "output": "ghost", "dst": "b", "input": "input"}
                    ]
                }
            ]
        });

        let mut loader = ProjectLoader::new();
        loader.load_value(&mut project, &document).unwrap();

        assert_eq!(1, loader.notices().len());
        assert!(project.scene("main").unwrap().connections().is_empty());
    }

    #[test]
    fn test_non_top_level_scene() {
        let mut project = test_project();
        let document = json!({
            "scenes": [
                {"id": "sub", "topLevel": false, "nodes": []}
            ]
        });

        ProjectLoader::new().load_value(&mut project, &document).unwrap();
        assert!(!project.is_top_level_scene("sub"));
    }

    #[test]
    fn test_load_from_data_model() {
        let document = json!({
            "scenes": [
                {
                    "id": "myScene",
                    "nodes": [
                        {"id": "myNode", "name": "test", "data": [1, 2, 3]},
                        {"id": "yourNode", "name": "test"}
                    ],
                    "connections": [
                        {"src": "myNode", "input": "input",
                         "dst": "yourNode", "output": "output"}
                    ]
                }
            ]
        });
        let model = JsonLoader::new().load_value(&document).unwrap();

        let mut project = test_project();
        let mut loader = ProjectLoader::new();
        loader.load_data_model(&mut project, &model).unwrap();

        assert!(loader.notices().is_empty());
        let scene = project.scene("myScene").unwrap();
        assert_eq!(2, scene.nodes().count());
        assert_eq!(
            Some(&json!([1, 2, 3])),
            scene.node("myNode").unwrap().attributes()
        );
        assert_eq!(1, scene.connections().len());
        assert_eq!("myNode", scene.connections()[0].input.node);
    }
}
