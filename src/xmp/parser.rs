//! Namespace-aware XML reader for XMP packets
//!
//! Turns the packet text into a small owned element tree. Every element
//! carries its resolved namespace URI, so the RDF layer never deals with
//! prefixes. A parse error ends the read but keeps what was built so far.

use crate::core::diagnostics::{Diagnostics, Stage};
use crate::core::error::MetaError;
use crate::xmp::namespace::ns;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

/// An attribute with its namespace resolved
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct XmlAttribute {
    pub namespace: String,
    pub local: String,
    pub value: String,
}

/// An element with its namespace resolved
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct XmlElement {
    pub namespace: String,
    pub local: String,
    pub attrs: Vec<XmlAttribute>,
    pub children: Vec<XmlElement>,
    /// Character data directly inside this element, trimmed
    pub text: String,
}

impl XmlElement {
    /// Whether this element is `namespace` + `local`
    pub fn is(&self, namespace: &str, local: &str) -> bool {
        self.namespace == namespace && self.local == local
    }

    /// Value of the attribute `namespace` + `local`
    pub fn attr(&self, namespace: &str, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.namespace == namespace && a.local == local)
            .map(|a| a.value.as_str())
    }

    /// Expanded name, used in warnings
    pub fn name(&self) -> String {
        format!("{}{}", self.namespace, self.local)
    }
}

/// Parse `xml` into its top-level elements
///
/// Elements nested deeper than `max_depth` are dropped with one warning.
pub(crate) fn parse_document(
    xml: &str,
    max_depth: usize,
    diag: &mut Diagnostics,
) -> Vec<XmlElement> {
    let mut reader = NsReader::from_str(xml);
    let mut roots = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    // Open elements below the depth cap that are not being materialised.
    let mut skipped = 0usize;

    loop {
        let (resolved, event) = match reader.read_resolved_event() {
            Ok(pair) => pair,
            Err(e) => {
                let error = MetaError::from(e);
                diag.warn(Stage::Xmp, format!("{error}, keeping partial tree"));
                break;
            }
        };
        let namespace = namespace_uri(&resolved);

        match event {
            Event::Start(start) => {
                if skipped > 0 || stack.len() >= max_depth {
                    if skipped == 0 {
                        depth_warning(max_depth, diag);
                    }
                    skipped += 1;
                    continue;
                }
                let element = read_element(&reader, namespace, &start, diag);
                stack.push(element);
            }
            Event::Empty(start) => {
                if skipped > 0 || stack.len() >= max_depth {
                    if skipped == 0 {
                        depth_warning(max_depth, diag);
                    }
                    continue;
                }
                let element = read_element(&reader, namespace, &start, diag);
                close(element, &mut stack, &mut roots);
            }
            Event::End(_) => {
                if skipped > 0 {
                    skipped -= 1;
                    continue;
                }
                if let Some(element) = stack.pop() {
                    close(element, &mut stack, &mut roots);
                }
            }
            Event::Text(text) => {
                let raw = String::from_utf8_lossy(text.as_ref());
                let text = match unescape(&raw) {
                    Ok(unescaped) => unescaped.into_owned(),
                    Err(_) => raw.into_owned(),
                };
                push_text(&mut stack, skipped, &text);
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                push_text(&mut stack, skipped, &text);
            }
            Event::GeneralRef(reference) => {
                let name = String::from_utf8_lossy(reference.as_ref()).into_owned();
                match resolve_reference(&name) {
                    Some(text) => push_text(&mut stack, skipped, &text),
                    None => {
                        diag.warn(Stage::Xmp, format!("unknown entity &{name}; kept as is"));
                        push_text(&mut stack, skipped, &format!("&{name};"));
                    }
                }
            }
            Event::Eof => break,
            // Declarations, processing instructions, comments, DOCTYPE
            _ => {}
        }
    }

    // Unclosed elements after an error or early EOF still count.
    while let Some(element) = stack.pop() {
        close(element, &mut stack, &mut roots);
    }
    roots
}

fn depth_warning(max_depth: usize, diag: &mut Diagnostics) {
    diag.warn(
        Stage::Xmp,
        format!("element nesting deeper than {max_depth} dropped"),
    );
}

fn namespace_uri(resolved: &ResolveResult<'_>) -> String {
    match resolved {
        ResolveResult::Bound(Namespace(uri)) => String::from_utf8_lossy(uri).into_owned(),
        // `xml` is bound implicitly
        ResolveResult::Unknown(prefix) if prefix.as_slice() == b"xml" => ns::XML.to_string(),
        _ => String::new(),
    }
}

fn read_element(
    reader: &NsReader<&[u8]>,
    namespace: String,
    start: &BytesStart<'_>,
    diag: &mut Diagnostics,
) -> XmlElement {
    let local = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut attrs = Vec::new();

    for attr in start.attributes() {
        let attr = match attr {
            Ok(attr) => attr,
            Err(e) => {
                let error = MetaError::from(quick_xml::Error::from(e));
                diag.warn(Stage::Xmp, format!("bad attribute on {local}: {error}"));
                continue;
            }
        };
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let (resolved, attr_local) = reader.resolve_attribute(attr.key);
        let value = match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        attrs.push(XmlAttribute {
            namespace: namespace_uri(&resolved),
            local: String::from_utf8_lossy(attr_local.as_ref()).into_owned(),
            value,
        });
    }

    XmlElement {
        namespace,
        local,
        attrs,
        ..Default::default()
    }
}

fn push_text(stack: &mut [XmlElement], skipped: usize, text: &str) {
    if skipped > 0 {
        return;
    }
    if let Some(current) = stack.last_mut() {
        current.text.push_str(text);
    }
}

fn close(mut element: XmlElement, stack: &mut [XmlElement], roots: &mut Vec<XmlElement>) {
    let trimmed = element.text.trim();
    if trimmed.len() != element.text.len() {
        element.text = trimmed.to_string();
    }
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => roots.push(element),
    }
}

/// Text of a character or predefined entity reference
fn resolve_reference(name: &str) -> Option<String> {
    if let Some(code) = name.strip_prefix('#') {
        let value = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => code.parse().ok()?,
        };
        return char::from_u32(value).map(String::from);
    }
    resolve_predefined_entity(name).map(str::to_string)
}
