// SPDX-License-Identifier: MIT OR Apache-2.0
//! Packages: bundles of socket types and components registered as one unit.

use crate::component::Component;
use crate::socket::SocketDescriptor;
use crate::types::SocketType;
use indexmap::IndexMap;

/// Reference name of the built-in signal type.
pub const TYPE_SIGNAL: &str = "Signal";
/// Reference name of the catch-all value type.
pub const TYPE_ANY: &str = "Any";
/// Reference name of the string type.
pub const TYPE_STRING: &str = "String";
/// Reference name of the number type.
pub const TYPE_NUMBER: &str = "Number";
/// Reference name of the boolean type.
pub const TYPE_BOOLEAN: &str = "Boolean";

/// One item a package contributes to a registry.
///
/// The variant is fixed at construction; registries never inspect item
/// kinds at lookup time.
#[derive(Debug, Clone)]
pub enum PackageItem {
    /// A socket type
    SocketType(SocketType),
    /// A node component
    Component(Component),
}

impl From<SocketType> for PackageItem {
    fn from(value: SocketType) -> Self {
        PackageItem::SocketType(value)
    }
}

impl From<Component> for PackageItem {
    fn from(value: Component) -> Self {
        PackageItem::Component(value)
    }
}

/// A bundle of socket types and components, added to and removed from a
/// registry as one unit.
#[derive(Debug, Clone, Default)]
pub struct Package {
    socket_types: IndexMap<String, SocketType>,
    components: IndexMap<String, Component>,
}

impl Package {
    /// Build a package from its items, sorted into per-kind tables.
    pub fn new(items: impl IntoIterator<Item = PackageItem>) -> Self {
        let mut package = Package::default();
        for item in items {
            match item {
                PackageItem::SocketType(ty) => {
                    package.socket_types.insert(ty.name().to_string(), ty);
                }
                PackageItem::Component(component) => {
                    package
                        .components
                        .insert(component.name().to_string(), component);
                }
            }
        }
        package
    }

    /// Socket types in declaration order.
    pub fn socket_types(&self) -> impl Iterator<Item = &SocketType> {
        self.socket_types.values()
    }

    /// Components in declaration order.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }
}

/// The reference base types with their standard acceptance graph.
///
/// The graph is authored with directed edges, so acceptance is
/// deliberately asymmetric: `Any` accepts every value type but no value
/// type accepts `Any`, the value types accept each other per the matrix
/// below, and `Signal` accepts only itself.
///
/// | consumer \ offered | Any | String | Number | Boolean | Signal |
/// |--------------------|-----|--------|--------|---------|--------|
/// | Any                | yes | yes    | yes    | yes     | no     |
/// | String             | no  | yes    | yes    | yes     | no     |
/// | Number             | no  | no     | yes    | yes     | no     |
/// | Boolean            | no  | no     | yes    | yes     | no     |
/// | Signal             | no  | no     | no     | no      | yes    |
pub fn basic_types() -> Package {
    let mut any = SocketType::new(TYPE_ANY);
    any.accept_type(TYPE_STRING)
        .accept_type(TYPE_NUMBER)
        .accept_type(TYPE_BOOLEAN);

    let mut string = SocketType::new(TYPE_STRING);
    string.accept_type(TYPE_NUMBER).accept_type(TYPE_BOOLEAN);

    let mut number = SocketType::new(TYPE_NUMBER);
    number.accept_type(TYPE_BOOLEAN);

    let mut boolean = SocketType::new(TYPE_BOOLEAN);
    boolean.accept_type(TYPE_NUMBER);

    Package::new([
        SocketType::signal(TYPE_SIGNAL).into(),
        any.into(),
        string.into(),
        number.into(),
        boolean.into(),
    ])
}

/// Name prefix of generated input-side gateway components.
pub const IN_COMPONENT_PREFIX: &str = "IN.";
/// Name prefix of generated output-side gateway components.
pub const OUT_COMPONENT_PREFIX: &str = "OUT.";

/// Builder for a package of exposed-socket components.
///
/// For every type name `T` the built package contains an `IN.T` component
/// with one exposed output and an `OUT.T` component with one exposed
/// input, so parent scopes can feed values into and read values out of a
/// child scene.
#[derive(Debug, Clone)]
pub struct ExposedSockets {
    types: Vec<String>,
    input_key: String,
    output_key: String,
}

impl ExposedSockets {
    /// Create a builder over the given type names.
    pub fn new(types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            types: types.into_iter().map(Into::into).collect(),
            input_key: "input".to_string(),
            output_key: "output".to_string(),
        }
    }

    /// Rename the socket of the generated `OUT.*` components.
    pub fn with_input_key(mut self, key: impl Into<String>) -> Self {
        self.input_key = key.into();
        self
    }

    /// Rename the socket of the generated `IN.*` components.
    pub fn with_output_key(mut self, key: impl Into<String>) -> Self {
        self.output_key = key.into();
        self
    }

    /// Build the package.
    pub fn build(self) -> Package {
        let mut items = Vec::with_capacity(self.types.len() * 2);
        for ty in &self.types {
            let key = ty.to_uppercase();
            items.push(PackageItem::Component(Component::new(
                format!("{IN_COMPONENT_PREFIX}{key}"),
                vec![SocketDescriptor::output(&self.output_key, ty).exposed()],
            )));
            items.push(PackageItem::Component(Component::new(
                format!("{OUT_COMPONENT_PREFIX}{key}"),
                vec![SocketDescriptor::input(&self.input_key, ty).exposed()],
            )));
        }
        Package::new(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(package: &Package) -> IndexMap<String, SocketType> {
        package
            .socket_types()
            .map(|t| (t.name().to_string(), t.clone()))
            .collect()
    }

    #[test]
    fn test_basic_types_acceptance_matrix() {
        let types = types(&basic_types());
        let any = &types[TYPE_ANY];
        let string = &types[TYPE_STRING];
        let number = &types[TYPE_NUMBER];
        let boolean = &types[TYPE_BOOLEAN];
        let signal = &types[TYPE_SIGNAL];

        assert!(any.accepts(string));
        assert!(any.accepts(number));
        assert!(any.accepts(boolean));
        assert!(any.accepts(any));
        assert!(!any.accepts(signal));

        assert!(string.accepts(string));
        assert!(string.accepts(number));
        assert!(string.accepts(boolean));
        assert!(!string.accepts(any));
        assert!(!string.accepts(signal));

        assert!(!number.accepts(string));
        assert!(number.accepts(number));
        assert!(number.accepts(boolean));
        assert!(!number.accepts(any));
        assert!(!number.accepts(signal));

        assert!(!boolean.accepts(string));
        assert!(boolean.accepts(number));
        assert!(boolean.accepts(boolean));
        assert!(!boolean.accepts(any));
        assert!(!boolean.accepts(signal));

        assert!(signal.accepts(signal));
        assert!(!signal.accepts(string));
        assert!(!signal.accepts(number));
        assert!(!signal.accepts(boolean));
        assert!(!signal.accepts(any));
    }

    #[test]
    fn test_basic_types_contents() {
        let package = basic_types();
        assert_eq!(5, package.socket_types().count());
        assert_eq!(0, package.components().count());
        assert!(types(&package)[TYPE_SIGNAL].is_signal());
    }

    #[test]
    fn test_exposed_sockets_package() {
        let package = ExposedSockets::new([TYPE_STRING, TYPE_NUMBER]).build();
        assert_eq!(4, package.components().count());

        let names: Vec<_> = package.components().map(Component::name).collect();
        assert_eq!(["IN.STRING", "OUT.STRING", "IN.NUMBER", "OUT.NUMBER"], *names);

        let in_string = package
            .components()
            .find(|c| c.name() == "IN.STRING")
            .unwrap();
        let tables = in_string.sockets().unwrap();
        let output = tables.output("output").unwrap();
        assert!(output.exposed);
        assert_eq!(TYPE_STRING, output.socket_type);

        let out_number = package
            .components()
            .find(|c| c.name() == "OUT.NUMBER")
            .unwrap();
        let tables = out_number.sockets().unwrap();
        let input = tables.input("input").unwrap();
        assert!(input.exposed);
        assert_eq!(TYPE_NUMBER, input.socket_type);
    }

    #[test]
    fn test_exposed_sockets_custom_keys() {
        let package = ExposedSockets::new([TYPE_ANY])
            .with_input_key("value")
            .with_output_key("result")
            .build();

        let in_any = package.components().find(|c| c.name() == "IN.ANY").unwrap();
        assert!(in_any.sockets().unwrap().output("result").is_some());

        let out_any = package.components().find(|c| c.name() == "OUT.ANY").unwrap();
        assert!(out_any.sockets().unwrap().input("value").is_some());
    }
}
