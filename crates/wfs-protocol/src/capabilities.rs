//! WFS GetCapabilities request and response parsing.

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

use crate::error::{CapabilitiesError, CapabilitiesResult};
use crate::layer::Layer;
use crate::namespaces::{OWS, WFS};
use crate::WFS_VERSION;

/// KVP parameters for a GetCapabilities request.
pub fn get_capabilities_kvp() -> Vec<(&'static str, String)> {
    vec![
        ("service", "WFS".to_string()),
        ("version", WFS_VERSION.to_string()),
        ("request", "GetCapabilities".to_string()),
    ]
}

/// Parse a WFS 1.1.0 capabilities document into layers.
///
/// Every `wfs:FeatureType` element becomes one layer, in document order.
/// Name and title come from the first direct `wfs:Name` / `wfs:Title` child,
/// as written in the document. The bbox is taken from the first
/// `ows:WGS84BoundingBox` child and is only set when both corners are present.
pub fn parse_capabilities(xml: &str) -> CapabilitiesResult<Vec<Layer>> {
    parse_capabilities_bytes(xml.as_bytes())
}

/// Parse a capabilities document from raw response bytes.
///
/// The character encoding comes from the BOM or the XML declaration
/// (UTF-8 when neither is present).
pub fn parse_capabilities_bytes(xml: &[u8]) -> CapabilitiesResult<Vec<Layer>> {
    let mut reader = NsReader::from_reader(xml);

    let mut buf = Vec::new();
    let mut stack: Vec<Node> = Vec::new();
    let mut feature_types: Vec<FeatureTypeBuilder> = Vec::new();
    let mut seen_root = false;
    let mut root_closed = false;

    loop {
        let (ns, event) = match reader.read_resolved_event_into(&mut buf) {
            Ok(resolved) => resolved,
            Err(source) => {
                return Err(CapabilitiesError::Xml {
                    position: reader.buffer_position(),
                    source,
                })
            }
        };

        match event {
            Event::Start(e) => {
                if root_closed {
                    return Err(junk_after_root());
                }
                seen_root = true;
                let node = classify(stack.last(), &ns, e.local_name().as_ref(), &mut feature_types);
                stack.push(node);
            }
            Event::Empty(e) => {
                if root_closed {
                    return Err(junk_after_root());
                }
                seen_root = true;
                root_closed = stack.is_empty();
                // Self-closing elements still count as "present", just without text.
                classify(stack.last(), &ns, e.local_name().as_ref(), &mut feature_types);
            }
            Event::Text(t) => {
                if stack.is_empty() {
                    let text = reader.decoder().decode(&t).map_err(|source| CapabilitiesError::Xml {
                        position: reader.buffer_position(),
                        source,
                    })?;
                    if !text.trim().is_empty() {
                        return Err(CapabilitiesError::Malformed(
                            "text outside the root element".to_string(),
                        ));
                    }
                } else if let Some(slot) = text_slot(stack.last(), &mut feature_types) {
                    let text = t.unescape().map_err(|source| CapabilitiesError::Xml {
                        position: reader.buffer_position(),
                        source,
                    })?;
                    slot.push_str(&text);
                }
            }
            Event::CData(t) => {
                if stack.is_empty() {
                    return Err(CapabilitiesError::Malformed(
                        "CDATA outside the root element".to_string(),
                    ));
                }
                if let Some(slot) = text_slot(stack.last(), &mut feature_types) {
                    let text = reader.decoder().decode(&t).map_err(|source| CapabilitiesError::Xml {
                        position: reader.buffer_position(),
                        source,
                    })?;
                    slot.push_str(&text);
                }
            }
            Event::End(_) => {
                stack.pop();
                root_closed = stack.is_empty();
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !seen_root {
        return Err(CapabilitiesError::Malformed(
            "no root element found".to_string(),
        ));
    }
    if !stack.is_empty() {
        return Err(CapabilitiesError::Malformed(format!(
            "document ended with {} unclosed element(s)",
            stack.len()
        )));
    }

    feature_types
        .into_iter()
        .map(FeatureTypeBuilder::finish)
        .collect()
}

fn junk_after_root() -> CapabilitiesError {
    CapabilitiesError::Malformed("content after the root element".to_string())
}

/// Role of an open element, carrying the index of the feature type it belongs to.
#[derive(Debug, Clone, Copy)]
enum Node {
    FeatureType(usize),
    Name(usize),
    Title(usize),
    BoundingBox(usize),
    LowerCorner(usize),
    UpperCorner(usize),
    Other,
}

/// Text collected for one `wfs:FeatureType`. `Some` marks a child as seen.
#[derive(Debug, Default)]
struct FeatureTypeBuilder {
    name: Option<String>,
    title: Option<String>,
    bbox_seen: bool,
    lower: Option<String>,
    upper: Option<String>,
}

impl FeatureTypeBuilder {
    fn finish(self) -> CapabilitiesResult<Layer> {
        // Empty elements have no text and map to null; other text is kept verbatim.
        let name = self.name.filter(|n| !n.is_empty());
        let title = self.title.filter(|t| !t.is_empty());

        let bbox = match (&self.lower, &self.upper) {
            (Some(lower), Some(upper)) => {
                let layer = name.as_deref().unwrap_or("<unnamed>");
                let [min_x, min_y] = parse_corner(lower, layer)?;
                let [max_x, max_y] = parse_corner(upper, layer)?;
                Some([min_x, min_y, max_x, max_y])
            }
            _ => None,
        };

        Ok(Layer { name, title, bbox })
    }
}

/// Parse an OWS corner ("lon lat"). Extra ordinates are ignored.
fn parse_corner(text: &str, layer: &str) -> CapabilitiesResult<[f64; 2]> {
    let invalid = || CapabilitiesError::InvalidCorner {
        layer: layer.to_string(),
        value: text.to_string(),
    };

    let mut parts = text.split_whitespace();
    let x = parts.next().ok_or_else(invalid)?;
    let y = parts.next().ok_or_else(invalid)?;

    Ok([
        x.parse().map_err(|_| invalid())?,
        y.parse().map_err(|_| invalid())?,
    ])
}

fn namespace_uri<'a>(ns: &ResolveResult<'a>) -> Option<&'a [u8]> {
    match ns {
        ResolveResult::Bound(Namespace(uri)) => Some(*uri),
        _ => None,
    }
}

/// Decide what a newly opened element means, given its parent.
fn classify(
    parent: Option<&Node>,
    ns: &ResolveResult,
    local_name: &[u8],
    feature_types: &mut Vec<FeatureTypeBuilder>,
) -> Node {
    let uri = namespace_uri(ns);
    let is_wfs = uri == Some(WFS.as_bytes());
    let is_ows = uri == Some(OWS.as_bytes());

    if is_wfs && local_name == b"FeatureType" {
        feature_types.push(FeatureTypeBuilder::default());
        return Node::FeatureType(feature_types.len() - 1);
    }

    match parent {
        Some(&Node::FeatureType(idx)) => {
            let ft = &mut feature_types[idx];
            match local_name {
                b"Name" if is_wfs && ft.name.is_none() => {
                    ft.name = Some(String::new());
                    Node::Name(idx)
                }
                b"Title" if is_wfs && ft.title.is_none() => {
                    ft.title = Some(String::new());
                    Node::Title(idx)
                }
                b"WGS84BoundingBox" if is_ows && !ft.bbox_seen => {
                    ft.bbox_seen = true;
                    Node::BoundingBox(idx)
                }
                _ => Node::Other,
            }
        }
        Some(&Node::BoundingBox(idx)) => {
            let ft = &mut feature_types[idx];
            match local_name {
                b"LowerCorner" if is_ows && ft.lower.is_none() => {
                    ft.lower = Some(String::new());
                    Node::LowerCorner(idx)
                }
                b"UpperCorner" if is_ows && ft.upper.is_none() => {
                    ft.upper = Some(String::new());
                    Node::UpperCorner(idx)
                }
                _ => Node::Other,
            }
        }
        _ => Node::Other,
    }
}

fn text_slot<'a>(
    node: Option<&Node>,
    feature_types: &'a mut [FeatureTypeBuilder],
) -> Option<&'a mut String> {
    match node? {
        Node::Name(idx) => feature_types[*idx].name.as_mut(),
        Node::Title(idx) => feature_types[*idx].title.as_mut(),
        Node::LowerCorner(idx) => feature_types[*idx].lower.as_mut(),
        Node::UpperCorner(idx) => feature_types[*idx].upper.as_mut(),
        Node::FeatureType(_) | Node::BoundingBox(_) | Node::Other => None,
    }
}
