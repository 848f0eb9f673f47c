//! RDF/XML to property graph
//!
//! Only the plain XMP subset of RDF is understood: `rdf:Description`
//! elements on the implicit subject, property attributes, property elements
//! holding text, a nested Description, or an `rdf:Seq`/`rdf:Bag`/`rdf:Alt`
//! container. Anything else is reported and left out of the graph.

use crate::core::diagnostics::{Diagnostics, Stage};
use crate::xmp::namespace::{is_reserved, ns};
use crate::xmp::node::{property_key, ArrayNode, ArrayType, Node, StructureNode};
use crate::xmp::parser::XmlElement;

/// Builds the property graph from a parsed element tree
pub(crate) struct RdfDecoder<'d> {
    diag: &'d mut Diagnostics,
}

impl<'d> RdfDecoder<'d> {
    pub fn new(diag: &'d mut Diagnostics) -> Self {
        Self { diag }
    }

    /// Merge every top-level Description of every `rdf:RDF` into one graph
    pub fn decode(&mut self, roots: &[XmlElement]) -> StructureNode {
        let mut graph = StructureNode::new();
        for root in roots {
            self.find_rdf(root, &mut graph);
        }
        graph
    }

    fn find_rdf(&mut self, element: &XmlElement, graph: &mut StructureNode) {
        if !element.is(ns::RDF, "RDF") {
            for child in &element.children {
                self.find_rdf(child, graph);
            }
            return;
        }

        for child in &element.children {
            if !child.is(ns::RDF, "Description") {
                self.warn(format!("unexpected {} inside rdf:RDF, skipped", child.name()));
                continue;
            }
            match about(child) {
                Some(subject) if !subject.is_empty() => {
                    self.warn(format!("Description about '{subject}' skipped"));
                }
                _ => {
                    let fields = self.description(child);
                    graph.merge(fields);
                }
            }
        }
    }

    /// Properties of a Description, or of an element acting as one
    fn description(&mut self, element: &XmlElement) -> StructureNode {
        let mut fields = StructureNode::new();

        for attr in &element.attrs {
            if is_reserved(&attr.namespace) {
                continue;
            }
            if attr.namespace.is_empty() {
                if attr.local != "about" {
                    self.warn(format!("attribute {} has no namespace, skipped", attr.local));
                }
                continue;
            }
            fields.set_field(
                property_key(&attr.namespace, &attr.local),
                Node::simple(attr.value.clone()),
            );
        }

        for child in &element.children {
            let key = child.name();
            if let Some(node) = self.property(child, &key) {
                fields.set_field(key, node);
            }
        }
        fields
    }

    fn property(&mut self, element: &XmlElement, key: &str) -> Option<Node> {
        if is_resource(element) {
            return Some(Node::Structure(self.description(element)));
        }

        match element.children.as_slice() {
            [] => Some(Node::simple(element.text.clone())),
            [child] if child.namespace == ns::RDF => {
                if let Some(array_type) = ArrayType::from_rdf_type(&child.local) {
                    Some(Node::Array(self.list(child, array_type, key)))
                } else if child.local == "Description" {
                    Some(Node::Structure(self.description(child)))
                } else {
                    self.warn(format!("{key}: unexpected rdf:{}, skipped", child.local));
                    None
                }
            }
            [child] => {
                self.warn(format!("{key}: unexpected child {}, skipped", child.name()));
                None
            }
            children => {
                self.warn(format!("{key}: {} children, skipped", children.len()));
                None
            }
        }
    }

    fn list(&mut self, container: &XmlElement, array_type: ArrayType, key: &str) -> ArrayNode {
        let mut array = ArrayNode::new(array_type);

        for (index, item) in container.children.iter().enumerate() {
            if !item.is(ns::RDF, "li") {
                self.warn(format!("{key}[{index}]: {} is not rdf:li, skipped", item.name()));
                continue;
            }
            if is_resource(item) {
                let fields = self.description(item);
                array.append(Node::Structure(fields));
                continue;
            }
            match item.children.as_slice() {
                [] => array.append(Node::simple(item.text.clone())),
                [child] if child.is(ns::RDF, "Description") => {
                    let fields = self.description(child);
                    array.append(Node::Structure(fields));
                }
                children => self.warn(format!(
                    "{key}[{index}]: list item with {} children, skipped",
                    children.len()
                )),
            }
        }
        array
    }

    fn warn(&mut self, message: String) {
        self.diag.warn(Stage::Xmp, message);
    }
}

/// `rdf:about`, or the unqualified `about` older writers emit
fn about(element: &XmlElement) -> Option<&str> {
    element
        .attr(ns::RDF, "about")
        .or_else(|| element.attr("", "about"))
}

fn is_resource(element: &XmlElement) -> bool {
    element.attr(ns::RDF, "parseType") == Some("Resource")
}
