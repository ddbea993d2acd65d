//! Object snapshots, script references and the other reference-like payloads.

use super::Variant;

/// Resource scheme every persisted script path must be rooted at.
pub const RESOURCE_SCHEME: &str = "res://";

/// Class name used when an object is reduced to its numeric identity.
pub const ENCODED_OBJECT_ID_CLASS: &str = "EncodedObjectAsID";

/// Name of the property that holds an object's attached script.
pub const SCRIPT_PROPERTY: &str = "script";

/// Reference to a script resource by path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScriptRef {
    pub path: String,
}

impl ScriptRef {
    pub fn new(path: impl Into<String>) -> Self {
        ScriptRef { path: path.into() }
    }

    /// A path is persistable when it is non-empty and rooted at the
    /// project's resource scheme.
    pub fn is_resource_path(&self) -> bool {
        !self.path.is_empty() && self.path.starts_with(RESOURCE_SCHEME)
    }
}

/// One entry of an object's property list.
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    pub name: String,
    pub value: Variant,
    /// Only storage properties take part in a full snapshot.
    pub storage: bool,
}

impl Property {
    pub fn stored(name: impl Into<String>, value: Variant) -> Self {
        Property {
            name: name.into(),
            value,
            storage: true,
        }
    }

    pub fn transient(name: impl Into<String>, value: Variant) -> Self {
        Property {
            name: name.into(),
            value,
            storage: false,
        }
    }
}

/// Detached snapshot of a live object.
///
/// Property order is significant: a full snapshot walks `properties` front
/// to back. A property named [`SCRIPT_PROPERTY`] is a placeholder; its
/// encoded value comes from `script`, not from `value`.
#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    pub class_name: String,
    pub instance_id: u64,
    /// Whether the receiving side can construct this class from scratch.
    pub instantiable: bool,
    pub script: Option<ScriptRef>,
    pub properties: Vec<Property>,
}

impl Object {
    pub fn new(class_name: impl Into<String>, instance_id: u64) -> Self {
        Object {
            class_name: class_name.into(),
            instance_id,
            instantiable: true,
            script: None,
            properties: Vec::new(),
        }
    }

    /// Stand-in produced when decoding an identity-only object.
    pub fn encoded_id(instance_id: u64) -> Self {
        Object::new(ENCODED_OBJECT_ID_CLASS, instance_id)
    }

    #[must_use]
    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    #[must_use]
    pub fn with_script(mut self, script: ScriptRef) -> Self {
        self.script = Some(script);
        self
    }

    /// Properties that take part in a full snapshot, in order.
    pub fn storage_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(|p| p.storage)
    }
}

/// Node path split into node names and property subnames.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodePath {
    pub names: Vec<String>,
    pub subnames: Vec<String>,
    pub absolute: bool,
}

impl NodePath {
    /// Parse the textual `a/b/c:prop:sub` form. A leading `/` marks the path
    /// absolute.
    pub fn parse(text: &str) -> Self {
        let (absolute, rest) = match text.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let mut parts = rest.split(':');
        let names = parts
            .next()
            .unwrap_or_default()
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect();
        let subnames = parts.filter(|s| !s.is_empty()).map(str::to_owned).collect();
        NodePath {
            names,
            subnames,
            absolute,
        }
    }
}

/// Named signal on a specific object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Signal {
    pub name: String,
    pub object_id: u64,
}
