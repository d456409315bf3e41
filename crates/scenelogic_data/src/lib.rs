// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene/node/connection/gateway data model for Scenelogic.
//!
//! This crate is the structural half of the model:
//! - A validated identifier type and qualified socket references
//! - Plain data records for scenes, nodes, connections and gateways
//! - [`DataModel`], the consistency engine with a single global
//!   identifier namespace and placement-checked connections
//! - [`loader::JsonLoader`], building a validated model from nested
//!   JSON records
//!
//! Component-aware validation lives one layer up, in the element graph.

pub mod identifier;
pub mod loader;
pub mod model;
pub mod scene;

pub use identifier::{Identifier, IdentifierError, SocketRef};
pub use loader::{JsonLoader, LoaderError};
pub use model::{DataModel, DataModelError};
pub use scene::{ConnectionData, GatewayData, NodeData, SceneData};
