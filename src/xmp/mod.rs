//! XMP packet decoding
//!
//! - [`namespace`]: namespaces and the APP1 signature
//! - [`node`]: the RDF property graph
//! - [`packet`]: BOM detection, text decoding and property extraction
//!
//! The XML reader and the RDF layer are internal.

pub mod namespace;
pub mod node;
pub mod packet;
mod parser;
mod rdf;

pub use namespace::{ns, XMP_SIGNATURE};
pub use node::{ArrayNode, ArrayType, Node, StructureNode};
pub use packet::XmpPacket;
