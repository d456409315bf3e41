// SPDX-License-Identifier: MIT OR Apache-2.0
//! Priority-ordered component and socket type registry.

use crate::component::Component;
use crate::package::Package;
use crate::types::SocketType;
use std::collections::HashMap;

/// Error raised by registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A component or socket type with this name already exists anywhere
    /// in the registry
    #[error("name '{name}' already registered")]
    DuplicateName {
        /// The colliding name
        name: String,
    },

    /// No component is registered under this name
    #[error("no component '{name}' registered")]
    ComponentNotFound {
        /// The looked-up name
        name: String,
    },

    /// No socket type is registered under this name
    #[error("no socket type '{name}' registered")]
    SocketTypeNotFound {
        /// The looked-up name
        name: String,
    },
}

/// What kind of item occupies a name in the shared namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Component,
    SocketType,
}

/// An entry ordered by (priority, insertion sequence).
#[derive(Debug, Clone)]
struct Entry<T> {
    priority: i32,
    sequence: u64,
    item: T,
}

/// List kept sorted by ascending (priority, sequence) so equal priorities
/// preserve insertion order.
#[derive(Debug, Clone)]
struct PriorityList<T> {
    entries: Vec<Entry<T>>,
}

impl<T> Default for PriorityList<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> PriorityList<T> {
    fn insert(&mut self, priority: i32, sequence: u64, item: T) {
        let at = self
            .entries
            .partition_point(|e| (e.priority, e.sequence) <= (priority, sequence));
        self.entries.insert(
            at,
            Entry {
                priority,
                sequence,
                item,
            },
        );
    }

    fn remove_by(&mut self, mut matches: impl FnMut(&T) -> bool) -> Option<T> {
        let at = self.entries.iter().position(|e| matches(&e.item))?;
        Some(self.entries.remove(at).item)
    }

    fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.item)
    }

    fn find(&self, mut matches: impl FnMut(&T) -> bool) -> Option<&T> {
        self.entries.iter().map(|e| &e.item).find(|i| matches(i))
    }
}

/// Priority-ordered store of components and socket types.
///
/// Components and socket types share one flat namespace: a name may exist
/// at most once across the whole registry regardless of priority or kind.
/// Reads are ordered by ascending priority with stable insertion order
/// inside equal priorities.
///
/// Consumers must treat every lookup as authoritative and never cache
/// results; priorities and removals can change resolution between calls.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    components: PriorityList<Component>,
    socket_types: PriorityList<SocketType>,
    names: HashMap<String, EntryKind>,
    next_sequence: u64,
}

impl ComponentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn claim_name(&mut self, name: &str, kind: EntryKind) -> Result<(), RegistryError> {
        if self.names.contains_key(name) {
            return Err(RegistryError::DuplicateName {
                name: name.to_string(),
            });
        }
        self.names.insert(name.to_string(), kind);
        Ok(())
    }

    fn next_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        sequence
    }

    /// Register a component at the given priority.
    ///
    /// Fails with [`RegistryError::DuplicateName`] when any component or
    /// socket type of that name already exists in the registry.
    pub fn add_component(
        &mut self,
        component: Component,
        priority: i32,
    ) -> Result<(), RegistryError> {
        self.claim_name(component.name(), EntryKind::Component)?;
        let sequence = self.next_sequence();
        tracing::debug!(name = component.name(), priority, "registering component");
        self.components.insert(priority, sequence, component);
        Ok(())
    }

    /// Remove a component by name. Removing an unknown name is a no-op.
    ///
    /// After removal the name may be registered again; the new entry is
    /// appended at its own (priority, sequence) position rather than
    /// restoring the old one.
    pub fn remove_component(&mut self, name: &str) {
        if self.names.get(name) == Some(&EntryKind::Component) {
            self.components.remove_by(|c| c.name() == name);
            self.names.remove(name);
            tracing::debug!(name, "removed component");
        }
    }

    /// Look up a component by name.
    pub fn component(&self, name: &str) -> Result<&Component, RegistryError> {
        self.components
            .find(|c| c.name() == name)
            .ok_or_else(|| RegistryError::ComponentNotFound {
                name: name.to_string(),
            })
    }

    /// All components in priority order.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    /// Register a socket type at the given priority.
    ///
    /// Fails with [`RegistryError::DuplicateName`] when any component or
    /// socket type of that name already exists in the registry.
    pub fn add_socket_type(
        &mut self,
        socket_type: SocketType,
        priority: i32,
    ) -> Result<(), RegistryError> {
        self.claim_name(socket_type.name(), EntryKind::SocketType)?;
        let sequence = self.next_sequence();
        tracing::debug!(name = socket_type.name(), priority, "registering socket type");
        self.socket_types.insert(priority, sequence, socket_type);
        Ok(())
    }

    /// Remove a socket type by name. Removing an unknown name is a no-op.
    pub fn remove_socket_type(&mut self, name: &str) {
        if self.names.get(name) == Some(&EntryKind::SocketType) {
            self.socket_types.remove_by(|t| t.name() == name);
            self.names.remove(name);
            tracing::debug!(name, "removed socket type");
        }
    }

    /// Look up a socket type by name.
    pub fn socket_type(&self, name: &str) -> Result<&SocketType, RegistryError> {
        self.socket_types
            .find(|t| t.name() == name)
            .ok_or_else(|| RegistryError::SocketTypeNotFound {
                name: name.to_string(),
            })
    }

    /// All socket types in priority order.
    pub fn socket_types(&self) -> impl Iterator<Item = &SocketType> {
        self.socket_types.iter()
    }

    /// Register every socket type, then every component, of a package at
    /// one priority.
    ///
    /// Not atomic: the first duplicate name aborts with that name, and
    /// items registered before the failure stay registered. Callers
    /// needing all-or-nothing semantics snapshot and roll back
    /// externally.
    pub fn add_package(&mut self, package: &Package, priority: i32) -> Result<(), RegistryError> {
        for socket_type in package.socket_types() {
            self.add_socket_type(socket_type.clone(), priority)?;
        }
        for component in package.components() {
            self.add_component(component.clone(), priority)?;
        }
        Ok(())
    }

    /// Remove every socket type and component of a package. Idempotent.
    pub fn remove_package(&mut self, package: &Package) {
        for socket_type in package.socket_types() {
            self.remove_socket_type(socket_type.name());
        }
        for component in package.components() {
            self.remove_component(component.name());
        }
    }
}
