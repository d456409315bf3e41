// SPDX-License-Identifier: MIT OR Apache-2.0
//! Component and socket type registry for Scenelogic.
//!
//! This crate defines the vocabulary an engine or compiler resolves
//! nodes against:
//! - Socket types with a hand-authored acceptance graph
//! - Components describing a node's input/output socket layout
//! - Packages bundling types and components for bulk registration
//! - A priority-ordered registry with duplicate name protection
//!
//! ## Architecture
//!
//! Consumers treat every registry lookup as authoritative: priorities
//! and removals can change resolution between calls, so results are
//! never cached on the consumer side.

pub mod component;
pub mod package;
pub mod registry;
pub mod runtime;
pub mod socket;
pub mod types;

pub use component::{Component, ComponentError, SocketTables};
pub use package::{Package, PackageItem};
pub use registry::{ComponentRegistry, RegistryError};
pub use runtime::{RuntimeContext, SignalServer, UpdateState, ValuesServer};
pub use socket::{SocketDescriptor, SocketDirection};
pub use types::SocketType;
