//! Namespaces the XMP decoder knows about

/// Signature opening an APP1/XMP payload, followed by a NUL
pub const XMP_SIGNATURE: &str = "http://ns.adobe.com/xap/1.0/";

/// Built-in XMP namespaces
pub mod ns {
    /// XMP Basic namespace
    pub const XMP: &str = "http://ns.adobe.com/xap/1.0/";
    /// Dublin Core namespace
    pub const DC: &str = "http://purl.org/dc/elements/1.1/";
    /// Adobe Lightroom namespace
    pub const LIGHTROOM: &str = "http://ns.adobe.com/lightroom/1.0/";
    /// RDF namespace
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// XML namespace (for xml:lang, etc.)
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
    /// Namespace of `xmlns` declarations
    pub const XMLNS: &str = "http://www.w3.org/2000/xmlns/";
}

/// Whether attributes in `namespace` are RDF syntax rather than properties
pub fn is_reserved(namespace: &str) -> bool {
    matches!(namespace, ns::RDF | ns::XML | ns::XMLNS)
}
