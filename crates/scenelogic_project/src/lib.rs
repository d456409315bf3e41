// SPDX-License-Identifier: MIT OR Apache-2.0
//! Live element graph for Scenelogic projects.
//!
//! A [`Project`] resolves the structural data model against a
//! registered component vocabulary and materializes it as elements:
//! - [`SceneElement`] owning nodes and connections
//! - [`NodeElement`] instantiated from a component, one socket element
//!   per declared socket with its type resolved
//! - [`ConnectionElement`] joining one input and one output socket in
//!   the same scene
//!
//! Loaders build the graph from nested JSON records or from a validated
//! `scenelogic_data::DataModel`. The executable contracts nodes run
//! against are re-exported from `scenelogic_components`.

pub mod element;
pub mod idgen;
pub mod loader;
pub mod project;
pub mod scene;

pub use element::{ConnectionElement, NodeElement, SocketElement, SocketKey};
pub use idgen::{IdentifierGenerator, SequentialIdentifierGenerator, UuidIdentifierGenerator};
pub use loader::ProjectLoader;
pub use project::{Project, ProjectError};
pub use scene::SceneElement;

pub use scenelogic_components::{RuntimeContext, SignalServer, UpdateState, ValuesServer};
