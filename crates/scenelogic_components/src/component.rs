// SPDX-License-Identifier: MIT OR Apache-2.0
//! Components: named descriptors of a node's socket layout.

use crate::runtime::{RuntimeContext, SignalServer, ValuesServer};
use crate::socket::{SocketDescriptor, SocketDirection};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Error raised while resolving or executing a component.
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    /// Two sockets of one component share a name
    #[error("socket '{name}' declared twice on component '{component}'")]
    DuplicateSocketName {
        /// Component whose socket list collided
        component: String,
        /// The colliding socket name
        name: String,
    },
}

/// Resolved socket layout of a component, split by direction, in
/// declaration order.
#[derive(Debug, Clone, Default)]
pub struct SocketTables {
    inputs: IndexMap<String, SocketDescriptor>,
    outputs: IndexMap<String, SocketDescriptor>,
}

impl SocketTables {
    fn resolve(component: &str, sockets: Vec<SocketDescriptor>) -> Result<Self, ComponentError> {
        let mut tables = SocketTables::default();
        for socket in sockets {
            let seen = tables.inputs.contains_key(&socket.name)
                || tables.outputs.contains_key(&socket.name);
            if seen {
                return Err(ComponentError::DuplicateSocketName {
                    component: component.to_string(),
                    name: socket.name,
                });
            }
            match socket.direction {
                SocketDirection::Input => tables.inputs.insert(socket.name.clone(), socket),
                SocketDirection::Output => tables.outputs.insert(socket.name.clone(), socket),
            };
        }
        Ok(tables)
    }

    /// Input sockets by name, in declaration order.
    pub fn inputs(&self) -> &IndexMap<String, SocketDescriptor> {
        &self.inputs
    }

    /// Output sockets by name, in declaration order.
    pub fn outputs(&self) -> &IndexMap<String, SocketDescriptor> {
        &self.outputs
    }

    /// Look up an input socket.
    pub fn input(&self, name: &str) -> Option<&SocketDescriptor> {
        self.inputs.get(name)
    }

    /// Look up an output socket.
    pub fn output(&self, name: &str) -> Option<&SocketDescriptor> {
        self.outputs.get(name)
    }
}

/// Where a component's sockets come from.
#[derive(Clone)]
enum SocketSource {
    /// Fixed list known at construction
    Static(Vec<SocketDescriptor>),
    /// Callback asked on every (re-)resolution; for dynamic components
    Dynamic(Rc<dyn Fn() -> Vec<SocketDescriptor>>),
}

/// Lazy resolution state of a component's socket tables.
#[derive(Clone)]
enum SocketState {
    Unresolved,
    Resolved(Rc<SocketTables>),
}

/// Handler called when the engine updates a node of this component.
pub type UpdateHandler = Rc<dyn Fn(&mut dyn ValuesServer, &mut dyn RuntimeContext)>;

/// Handler called when a signal arrives on an input socket.
pub type SignalHandler = Rc<dyn Fn(&str, &mut dyn SignalServer, &mut dyn RuntimeContext)>;

/// A named, reusable descriptor of a node's sockets and (optionally) its
/// evaluation behavior.
///
/// Sockets are resolved lazily on first access and cached; dynamic
/// components call [`Component::invalidate_sockets`] to request
/// re-resolution. Resolution fails when two sockets share a name.
#[derive(Clone)]
pub struct Component {
    name: String,
    source: SocketSource,
    state: RefCell<SocketState>,
    update_handler: Option<UpdateHandler>,
    signal_handler: Option<SignalHandler>,
}

impl Component {
    /// Create a component with a fixed socket list.
    pub fn new(name: impl Into<String>, sockets: Vec<SocketDescriptor>) -> Self {
        Self {
            name: name.into(),
            source: SocketSource::Static(sockets),
            state: RefCell::new(SocketState::Unresolved),
            update_handler: None,
            signal_handler: None,
        }
    }

    /// Create a dynamic component whose sockets are produced by a
    /// callback at resolution time.
    pub fn dynamic(
        name: impl Into<String>,
        sockets: impl Fn() -> Vec<SocketDescriptor> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            source: SocketSource::Dynamic(Rc::new(sockets)),
            state: RefCell::new(SocketState::Unresolved),
            update_handler: None,
            signal_handler: None,
        }
    }

    /// Attach a custom update handler.
    pub fn with_update_handler(
        mut self,
        handler: impl Fn(&mut dyn ValuesServer, &mut dyn RuntimeContext) + 'static,
    ) -> Self {
        self.update_handler = Some(Rc::new(handler));
        self
    }

    /// Attach a custom signal handler.
    pub fn with_signal_handler(
        mut self,
        handler: impl Fn(&str, &mut dyn SignalServer, &mut dyn RuntimeContext) + 'static,
    ) -> Self {
        self.signal_handler = Some(Rc::new(handler));
        self
    }

    /// The component name, unique within a registry.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved socket tables, computing and caching them on first call.
    pub fn sockets(&self) -> Result<Rc<SocketTables>, ComponentError> {
        if let SocketState::Resolved(tables) = &*self.state.borrow() {
            return Ok(Rc::clone(tables));
        }
        let raw = match &self.source {
            SocketSource::Static(sockets) => sockets.clone(),
            SocketSource::Dynamic(make) => make(),
        };
        let tables = Rc::new(SocketTables::resolve(&self.name, raw)?);
        *self.state.borrow_mut() = SocketState::Resolved(Rc::clone(&tables));
        Ok(tables)
    }

    /// Drop the cached socket tables so the next access re-resolves.
    ///
    /// Only meaningful for dynamic components; a static component
    /// resolves to the same layout again.
    pub fn invalidate_sockets(&self) {
        *self.state.borrow_mut() = SocketState::Unresolved;
    }

    /// Update a node of this component.
    ///
    /// With no custom handler the default behavior forwards exposed
    /// inputs to the parent scope: when the context names a requested
    /// socket only that socket is considered (an output match is allowed
    /// for gateways, which connect outputs back to inputs), otherwise
    /// every exposed input with an available value is exposed.
    pub fn update_node(
        &self,
        values: &mut dyn ValuesServer,
        context: &mut dyn RuntimeContext,
    ) -> Result<(), ComponentError> {
        if let Some(handler) = &self.update_handler {
            handler(values, context);
            return Ok(());
        }

        let tables = self.sockets()?;
        let mut expose = |socket: &SocketDescriptor, values: &mut dyn ValuesServer| {
            if socket.exposed {
                if let Some(value) = values.fetch_input_value(&socket.name) {
                    values.expose_value(&socket.name, value);
                }
            }
        };

        if let Some(requested) = context.requested_output_socket().map(str::to_owned) {
            if let Some(socket) = tables.input(&requested).or_else(|| tables.output(&requested)) {
                expose(socket, values);
            }
        } else {
            for socket in tables.inputs().values() {
                expose(socket, values);
            }
        }
        Ok(())
    }

    /// Handle a signal arriving on an input socket.
    ///
    /// With no custom handler, an exposed input forwards the signal to
    /// the parent scope.
    pub fn handle_signal_trigger(
        &self,
        on_input_socket: &str,
        signals: &mut dyn SignalServer,
        context: &mut dyn RuntimeContext,
    ) -> Result<(), ComponentError> {
        if let Some(handler) = &self.signal_handler {
            handler(on_input_socket, signals, context);
            return Ok(());
        }

        let tables = self.sockets()?;
        if tables.input(on_input_socket).is_some_and(|s| s.exposed) {
            signals.expose_signal(on_input_socket);
        }
        Ok(())
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let resolved = matches!(&*self.state.borrow(), SocketState::Resolved(_));
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("resolved", &resolved)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::UpdateState;
    use serde_json::{json, Value};
    use std::collections::HashMap;

    struct TestContext {
        node: String,
        requested: Option<String>,
    }

    impl RuntimeContext for TestContext {
        fn node_identifier(&self) -> &str {
            &self.node
        }

        fn node_attributes(&self) -> Option<&Value> {
            None
        }

        fn requested_output_socket(&self) -> Option<&str> {
            self.requested.as_deref()
        }

        fn mark_as_updated(&mut self, _state: UpdateState) {}
    }

    #[derive(Default)]
    struct TestValues {
        inputs: HashMap<String, Value>,
        exposed: HashMap<String, Value>,
        pushed: HashMap<String, Value>,
    }

    impl ValuesServer for TestValues {
        fn fetch_input_value(&mut self, input_socket: &str) -> Option<Value> {
            self.inputs.get(input_socket).cloned()
        }

        fn push_output_value(&mut self, output_socket: &str, value: Value) {
            self.pushed.insert(output_socket.to_string(), value);
        }

        fn expose_value(&mut self, socket: &str, value: Value) {
            self.exposed.insert(socket.to_string(), value);
        }
    }

    #[derive(Default)]
    struct TestSignals {
        exposed: Vec<String>,
    }

    impl SignalServer for TestSignals {
        fn expose_signal(&mut self, socket: &str) {
            self.exposed.push(socket.to_string());
        }
    }

    #[test]
    fn test_component_without_sockets() {
        let comp = Component::new("EMPTY", vec![]);
        let tables = comp.sockets().unwrap();
        assert!(tables.inputs().is_empty());
        assert!(tables.outputs().is_empty());
    }

    #[test]
    fn test_one_input_component() {
        let comp = Component::new("ONE_INPUT", vec![SocketDescriptor::input("input", "String")]);
        let tables = comp.sockets().unwrap();

        assert_eq!(1, tables.inputs().len());
        assert_eq!(0, tables.outputs().len());

        let input = tables.input("input").unwrap();
        assert_eq!("input", input.name);
        assert_eq!("String", input.socket_type);
    }

    #[test]
    fn test_mixed_component() {
        let comp = Component::new(
            "INPUT_OUTPUT",
            vec![
                SocketDescriptor::input("input", "String"),
                SocketDescriptor::output("output", "Boolean"),
            ],
        );
        let tables = comp.sockets().unwrap();

        assert_eq!("String", tables.input("input").unwrap().socket_type);
        assert_eq!("Boolean", tables.output("output").unwrap().socket_type);
    }

    #[test]
    fn test_duplicate_socket_name_fails_on_resolution() {
        // Two inputs named "input": construction succeeds, resolution fails.
        let comp = Component::new(
            "BROKEN",
            vec![
                SocketDescriptor::input("input", "String"),
                SocketDescriptor::input("input", "Number"),
            ],
        );
        let err = comp.sockets().unwrap_err();
        assert!(matches!(
            err,
            ComponentError::DuplicateSocketName { ref name, .. } if name == "input"
        ));
    }

    #[test]
    fn test_duplicate_across_directions_fails() {
        let comp = Component::new(
            "BROKEN",
            vec![
                SocketDescriptor::input("value", "String"),
                SocketDescriptor::output("value", "String"),
            ],
        );
        assert!(comp.sockets().is_err());
    }

    #[test]
    fn test_dynamic_component_re_resolves_after_invalidate() {
        use std::cell::Cell;

        let calls = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&calls);
        let comp = Component::dynamic("DYNAMIC", move || {
            counter.set(counter.get() + 1);
            vec![SocketDescriptor::input("input", "Any")]
        });

        comp.sockets().unwrap();
        comp.sockets().unwrap();
        assert_eq!(1, calls.get());

        comp.invalidate_sockets();
        comp.sockets().unwrap();
        assert_eq!(2, calls.get());
    }

    #[test]
    fn test_default_update_exposes_exposed_inputs() {
        let comp = Component::new(
            "OUT.STRING",
            vec![SocketDescriptor::input("input", "String").exposed()],
        );

        let mut values = TestValues::default();
        values.inputs.insert("input".into(), json!("hello"));
        let mut ctx = TestContext {
            node: "n1".into(),
            requested: None,
        };

        comp.update_node(&mut values, &mut ctx).unwrap();
        assert_eq!(Some(&json!("hello")), values.exposed.get("input"));
    }

    #[test]
    fn test_default_update_skips_unexposed_inputs() {
        let comp = Component::new("PLAIN", vec![SocketDescriptor::input("input", "String")]);

        let mut values = TestValues::default();
        values.inputs.insert("input".into(), json!("hello"));
        let mut ctx = TestContext {
            node: "n1".into(),
            requested: None,
        };

        comp.update_node(&mut values, &mut ctx).unwrap();
        assert!(values.exposed.is_empty());
    }

    #[test]
    fn test_custom_update_handler_wins() {
        let comp = Component::new("CUSTOM", vec![SocketDescriptor::output("output", "Number")])
            .with_update_handler(|values, _ctx| {
                values.push_output_value("output", json!(7));
            });

        let mut values = TestValues::default();
        let mut ctx = TestContext {
            node: "n1".into(),
            requested: None,
        };

        comp.update_node(&mut values, &mut ctx).unwrap();
        assert_eq!(Some(&json!(7)), values.pushed.get("output"));
    }

    #[test]
    fn test_default_signal_trigger_exposes_exposed_input() {
        let comp = Component::new(
            "SIG",
            vec![SocketDescriptor::input("fire", "Signal").exposed()],
        );

        let mut signals = TestSignals::default();
        let mut ctx = TestContext {
            node: "n1".into(),
            requested: None,
        };

        comp.handle_signal_trigger("fire", &mut signals, &mut ctx)
            .unwrap();
        assert_eq!(vec!["fire".to_string()], signals.exposed);

        comp.handle_signal_trigger("other", &mut signals, &mut ctx)
            .unwrap();
        assert_eq!(1, signals.exposed.len());
    }
}
