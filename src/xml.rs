//! Element scanning over structured-text members.
//!
//! Parameter extraction and patching both need the same view of a document:
//! every element's tag name and attributes by key, plus where its start tag
//! sits in the source text so that a single attribute value can be rewritten
//! in place.

use std::ops::{ControlFlow, Range};

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// One start (or empty) tag with its decoded attributes.
#[derive(Debug, Clone)]
pub(crate) struct Element {
    /// Tag name without any namespace prefix.
    pub local_name: String,
    /// Byte range of the tag in the source, from `<` to `>` inclusive.
    pub span: Range<usize>,
    attributes: Vec<Attribute>,
}

#[derive(Debug, Clone)]
struct Attribute {
    key: String,
    raw: String,
    value: String,
}

impl Element {
    /// Returns the unescaped value of the attribute with exactly this key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.find(key).map(|a| a.value.as_str())
    }

    /// Returns the attribute value as written in the source, entities intact.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.find(key).map(|a| a.raw.as_str())
    }

    fn find(&self, key: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.key == key)
    }
}

/// Calls `visit` for every element in document order.
///
/// Stops early when `visit` returns [`ControlFlow::Break`]. Syntax errors
/// anywhere before that point are returned.
pub(crate) fn scan_elements(
    text: &str,
    mut visit: impl FnMut(Element) -> ControlFlow<()>,
) -> Result<(), quick_xml::Error> {
    let mut reader = Reader::from_str(text);

    loop {
        let before = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(tag) | Event::Empty(tag) => {
                let end = reader.buffer_position() as usize;
                let element = Element {
                    local_name: String::from_utf8_lossy(tag.local_name().as_ref()).into_owned(),
                    span: tag_span(text, before, end),
                    attributes: decode_attributes(&tag)?,
                };
                if visit(element).is_break() {
                    return Ok(());
                }
            }
            Event::Eof => return Ok(()),
            _ => {}
        }
    }
}

fn decode_attributes(tag: &BytesStart<'_>) -> Result<Vec<Attribute>, quick_xml::Error> {
    let mut attributes = Vec::new();
    for attr in tag.attributes() {
        let attr = attr?;
        attributes.push(Attribute {
            key: String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            raw: String::from_utf8_lossy(&attr.value).into_owned(),
            value: attr.unescape_value()?.into_owned(),
        });
    }
    Ok(attributes)
}

/// Locates the `<...>` of the tag that was just read.
///
/// The reader may or may not have consumed the opening `<` before reporting
/// the previous position, so both cases are accepted. Attribute values
/// cannot contain a literal `<`, so searching backwards from the end is the
/// fallback.
fn tag_span(text: &str, before: usize, end: usize) -> Range<usize> {
    let bytes = text.as_bytes();
    let end = end.min(bytes.len());
    let start = if bytes.get(before) == Some(&b'<') {
        before
    } else if before > 0 && bytes.get(before - 1) == Some(&b'<') {
        before - 1
    } else {
        text[..end].rfind('<').unwrap_or(before.min(end))
    };
    start..end
}
