// SPDX-License-Identifier: MIT OR Apache-2.0
//! The project: a live element graph resolved against a component model.

use indexmap::{IndexMap, IndexSet};
use scenelogic_components::{Component, ComponentError, Package, SocketType};
use serde_json::Value;

use crate::element::{NodeElement, SocketKey};
use crate::idgen::{IdentifierGenerator, UuidIdentifierGenerator};
use crate::scene::SceneElement;

/// Error raised while building or mutating the element graph.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// A component's socket layout did not resolve
    #[error(transparent)]
    Component(#[from] ComponentError),

    /// No component is registered under this name
    #[error("component '{component}' not found")]
    ComponentNotFound {
        /// The requested component name
        component: String,
    },

    /// A node record names no component at all
    #[error("node record '{node}' has no component name")]
    MissingComponentName {
        /// The node identifier the record carries or was assigned
        node: String,
    },

    /// No socket type is registered under this name
    #[error("socket type '{socket_type}' not found")]
    SocketTypeNotFound {
        /// The requested type name
        socket_type: String,
    },

    /// An operation referenced a scene that does not exist
    #[error("scene '{scene}' not found")]
    SceneNotFound {
        /// The requested scene identifier
        scene: String,
    },

    /// An operation referenced a node that does not exist
    #[error("node '{node}' not found")]
    NodeNotFound {
        /// The requested node identifier
        node: String,
    },

    /// A node exists but has no socket with this name
    #[error("node '{node}' has no socket '{socket}'")]
    SocketNotFound {
        /// The owning node identifier
        node: String,
        /// The requested socket name
        socket: String,
    },

    /// Two sockets do not form an input/output pair
    #[error("cannot connect '{first}' and '{second}': need one input and one output socket")]
    InvalidConnection {
        /// One endpoint as given
        first: SocketKey,
        /// The other endpoint as given
        second: SocketKey,
    },
}

/// A logic project.
///
/// Holds the vocabulary (socket types and components, keyed by name,
/// last registration wins) and the scene elements built against it.
/// Removing a type or component that live elements still reference does
/// not touch those elements; the graph is only revalidated on rebuild.
pub struct Project {
    identifier_generator: Box<dyn IdentifierGenerator>,
    socket_types: IndexMap<String, SocketType>,
    components: IndexMap<String, Component>,
    scenes: IndexMap<String, SceneElement>,
    top_level_scenes: IndexSet<String>,
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("socket_types", &self.socket_types.keys())
            .field("components", &self.components.keys())
            .field("scenes", &self.scenes.keys())
            .field("top_level_scenes", &self.top_level_scenes)
            .finish()
    }
}

impl Project {
    /// Create an empty project with the UUID identifier generator.
    pub fn new() -> Self {
        Self::with_identifier_generator(Box::new(UuidIdentifierGenerator))
    }

    /// Create an empty project with a custom identifier generator.
    pub fn with_identifier_generator(generator: Box<dyn IdentifierGenerator>) -> Self {
        Self {
            identifier_generator: generator,
            socket_types: IndexMap::new(),
            components: IndexMap::new(),
            scenes: IndexMap::new(),
            top_level_scenes: IndexSet::new(),
        }
    }

    /// Produce a fresh identifier for an element created without one.
    pub fn make_identifier(&mut self) -> String {
        self.identifier_generator.make_unique_identifier()
    }

    /// Register a socket type, replacing any type with the same name.
    pub fn add_socket_type(&mut self, socket_type: SocketType) {
        self.socket_types
            .insert(socket_type.name().to_string(), socket_type);
    }

    /// Remove a socket type by name; unknown names are a no-op.
    ///
    /// Sockets already instantiated with the type keep their copy.
    pub fn remove_socket_type(&mut self, name: &str) {
        self.socket_types.shift_remove(name);
    }

    /// Look up a socket type.
    pub fn socket_type(&self, name: &str) -> Result<&SocketType, ProjectError> {
        self.socket_types
            .get(name)
            .ok_or_else(|| ProjectError::SocketTypeNotFound {
                socket_type: name.to_string(),
            })
    }

    /// Registered socket types in registration order.
    pub fn socket_types(&self) -> impl Iterator<Item = &SocketType> {
        self.socket_types.values()
    }

    /// Register a component, replacing any component with the same name.
    pub fn add_component(&mut self, component: Component) {
        self.components
            .insert(component.name().to_string(), component);
    }

    /// Remove a component by name; unknown names are a no-op.
    ///
    /// Nodes already built from the component are unaffected.
    pub fn remove_component(&mut self, name: &str) {
        self.components.shift_remove(name);
    }

    /// Look up a component.
    pub fn component(&self, name: &str) -> Result<&Component, ProjectError> {
        self.components
            .get(name)
            .ok_or_else(|| ProjectError::ComponentNotFound {
                component: name.to_string(),
            })
    }

    /// Registered components in registration order.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    /// Register every type and component of a package.
    pub fn add_package(&mut self, package: &Package) {
        for socket_type in package.socket_types() {
            self.add_socket_type(socket_type.clone());
        }
        for component in package.components() {
            self.add_component(component.clone());
        }
    }

    /// Remove every type and component of a package by name.
    pub fn remove_package(&mut self, package: &Package) {
        for socket_type in package.socket_types() {
            self.remove_socket_type(socket_type.name());
        }
        for component in package.components() {
            self.remove_component(component.name());
        }
    }

    /// Add a scene, replacing any scene with the same identifier.
    pub fn add_scene(&mut self, scene: SceneElement, top_level: bool) {
        let identifier = scene.identifier().to_string();
        if top_level {
            self.top_level_scenes.insert(identifier.clone());
        }
        self.scenes.insert(identifier, scene);
    }

    /// Look up a scene.
    pub fn scene(&self, identifier: &str) -> Option<&SceneElement> {
        self.scenes.get(identifier)
    }

    /// Look up a scene for mutation.
    pub fn scene_mut(&mut self, identifier: &str) -> Option<&mut SceneElement> {
        self.scenes.get_mut(identifier)
    }

    /// Scenes in registration order.
    pub fn scenes(&self) -> impl Iterator<Item = &SceneElement> {
        self.scenes.values()
    }

    /// Remove a scene, or with `top_level_only` just demote it from the
    /// top level while keeping the element.
    pub fn remove_scene(&mut self, identifier: &str, top_level_only: bool) {
        self.top_level_scenes.shift_remove(identifier);
        if !top_level_only {
            self.scenes.shift_remove(identifier);
        }
    }

    /// Whether a scene is marked top-level.
    pub fn is_top_level_scene(&self, identifier: &str) -> bool {
        self.top_level_scenes.contains(identifier)
    }

    /// Build a node from a registered component and add it to a scene.
    pub fn add_node(
        &mut self,
        scene: &str,
        identifier: impl Into<String>,
        component_name: &str,
        attributes: Option<Value>,
    ) -> Result<(), ProjectError> {
        let node = self.build_node(identifier, component_name, attributes)?;
        let Some(scene) = self.scenes.get_mut(scene) else {
            return Err(ProjectError::SceneNotFound {
                scene: scene.to_string(),
            });
        };
        scene.add_node(node);
        Ok(())
    }

    /// Build a node element against the registered vocabulary without
    /// placing it in a scene.
    pub fn build_node(
        &self,
        identifier: impl Into<String>,
        component_name: &str,
        attributes: Option<Value>,
    ) -> Result<NodeElement, ProjectError> {
        let component = self.component(component_name)?;
        NodeElement::from_component(identifier, component, attributes, |type_name| {
            self.socket_type(type_name).cloned()
        })
    }

    /// Connect two sockets within a scene.
    pub fn connect(
        &mut self,
        scene: &str,
        first: impl Into<SocketKey>,
        second: impl Into<SocketKey>,
    ) -> Result<(), ProjectError> {
        let Some(scene) = self.scenes.get_mut(scene) else {
            return Err(ProjectError::SceneNotFound {
                scene: scene.to_string(),
            });
        };
        scene.connect(first, second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idgen::SequentialIdentifierGenerator;
    use scenelogic_components::{package, SocketDescriptor};

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

    #[test]
    fn test_vocabulary_registration() {
        let project = test_project();

        assert_eq!(5, project.socket_types().count());
        assert!(project.socket_type("Any").is_ok());
        assert!(project.component("test").is_ok());
        assert!(matches!(
            project.socket_type("Quaternion").unwrap_err(),
            ProjectError::SocketTypeNotFound { .. }
        ));
        assert!(matches!(
            project.component("ghost").unwrap_err(),
            ProjectError::ComponentNotFound { .. }
        ));
    }

    #[test]
    fn test_package_removal() {
        let mut project = test_project();
        project.remove_package(&package::basic_types());

        assert_eq!(0, project.socket_types().count());
        // Components outside the package survive.
        assert!(project.component("test").is_ok());
    }

    #[test]
    fn test_scene_top_level_handling() {
        let mut project = test_project();
        project.add_scene(SceneElement::new("main"), true);
        project.add_scene(SceneElement::new("sub"), false);

        assert!(project.is_top_level_scene("main"));
        assert!(!project.is_top_level_scene("sub"));

        project.remove_scene("main", true);
        assert!(!project.is_top_level_scene("main"));
        assert!(project.scene("main").is_some());

        project.remove_scene("main", false);
        assert!(project.scene("main").is_none());
    }

    #[test]
    fn test_add_node_and_connect() {
        let mut project = test_project();
        project.add_scene(SceneElement::new("main"), true);
        project.add_node("main", "myNode", "test", None).unwrap();
        project.add_node("main", "yourNode", "test", None).unwrap();

        project
            .connect("main", ("myNode", "input"), ("yourNode", "output"))
            .unwrap();

        let scene = project.scene("main").unwrap();
        assert_eq!(2, scene.nodes().count());
        assert_eq!(1, scene.connections().len());
    }

    #[test]
    fn test_add_node_failures() {
        let mut project = test_project();
        project.add_scene(SceneElement::new("main"), true);

        assert!(matches!(
            project.add_node("ghost", "myNode", "test", None).unwrap_err(),
            ProjectError::SceneNotFound { .. }
        ));
        assert!(matches!(
            project.add_node("main", "myNode", "ghost", None).unwrap_err(),
            ProjectError::ComponentNotFound { .. }
        ));
    }

    #[test]
    fn test_identifier_generation() {
        let mut project = test_project();
        assert_eq!("el1", project.make_identifier());
        assert_eq!("el2", project.make_identifier());
    }
}
