//! RDF property graph nodes
//!
//! A decoded XMP packet is a tree of:
//! - `Node::Simple`: a text value
//! - `Node::Array`: the items of an `rdf:Seq`, `rdf:Bag` or `rdf:Alt`
//! - `Node::Structure`: named fields of an `rdf:Description`
//!
//! Field names are the property's namespace URI followed by its local name,
//! e.g. `http://purl.org/dc/elements/1.1/subject`.

use std::collections::HashMap;

/// Type of array node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayType {
    /// Ordered array (rdf:Seq)
    Ordered,
    /// Unordered array (rdf:Bag)
    Unordered,
    /// Alternative array (rdf:Alt)
    Alternative,
}

impl ArrayType {
    /// Map an RDF container's local name
    pub fn from_rdf_type(local: &str) -> Option<Self> {
        match local {
            "Seq" => Some(ArrayType::Ordered),
            "Bag" => Some(ArrayType::Unordered),
            "Alt" => Some(ArrayType::Alternative),
            _ => None,
        }
    }

    /// Get the RDF type name for this array type
    pub fn rdf_type(&self) -> &'static str {
        match self {
            ArrayType::Ordered => "Seq",
            ArrayType::Unordered => "Bag",
            ArrayType::Alternative => "Alt",
        }
    }
}

/// An array node containing multiple child nodes
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayNode {
    /// The items in document order
    pub items: Vec<Node>,
    /// The type of array
    pub array_type: ArrayType,
}

impl ArrayNode {
    /// Create a new array node
    pub fn new(array_type: ArrayType) -> Self {
        Self {
            items: Vec::new(),
            array_type,
        }
    }

    /// Get the number of items in the array
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the array is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get an item by index
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.items.get(index)
    }

    /// Append an item to the array
    pub fn append(&mut self, node: Node) {
        self.items.push(node);
    }
}

/// A structure node containing named fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructureNode {
    /// Fields keyed by namespace URI + local name
    pub fields: HashMap<String, Node>,
}

impl StructureNode {
    /// Create a new structure node
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a field by its full key
    pub fn get_field(&self, key: &str) -> Option<&Node> {
        self.fields.get(key)
    }

    /// Get a field by namespace URI and local name
    pub fn get_property(&self, namespace: &str, name: &str) -> Option<&Node> {
        self.fields.get(&property_key(namespace, name))
    }

    /// Set a field
    pub fn set_field(&mut self, key: impl Into<String>, node: Node) {
        self.fields.insert(key.into(), node);
    }

    /// Check if a field exists
    pub fn has_field(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Get all field keys
    pub fn field_names(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the structure has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Move every field of `other` into this structure
    ///
    /// Fields already present are kept.
    pub fn merge(&mut self, other: StructureNode) {
        for (key, node) in other.fields {
            self.fields.entry(key).or_insert(node);
        }
    }
}

/// A node in the RDF property graph
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A text value
    Simple(String),
    /// An array node
    Array(ArrayNode),
    /// A structure node
    Structure(StructureNode),
}

impl Node {
    /// Create a new simple node
    pub fn simple(value: impl Into<String>) -> Self {
        Node::Simple(value.into())
    }

    /// Get the text, if this is a simple node
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Simple(value) => Some(value),
            _ => None,
        }
    }

    /// Get the array node, if this is an array node
    pub fn as_array(&self) -> Option<&ArrayNode> {
        match self {
            Node::Array(node) => Some(node),
            _ => None,
        }
    }

    /// Get the structure node, if this is a structure node
    pub fn as_structure(&self) -> Option<&StructureNode> {
        match self {
            Node::Structure(node) => Some(node),
            _ => None,
        }
    }

    /// The node read as a list of strings
    ///
    /// A simple node counts as a one-element list. Non-text array items are
    /// left out; a structure gives `None`.
    pub fn to_string_list(&self) -> Option<Vec<String>> {
        match self {
            Node::Simple(value) => Some(vec![value.clone()]),
            Node::Array(array) => Some(
                array
                    .items
                    .iter()
                    .filter_map(Node::as_str)
                    .map(str::to_string)
                    .collect(),
            ),
            Node::Structure(_) => None,
        }
    }
}

/// Graph key for a property: namespace URI followed by local name
pub fn property_key(namespace: &str, name: &str) -> String {
    format!("{namespace}{name}")
}
