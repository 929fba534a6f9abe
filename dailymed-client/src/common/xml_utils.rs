//! Reader-based XML helpers
//!
//! Thin wrappers around `quick_xml::Reader` patterns used by the SPL parser.
//! SPL documents use the HL7 v3 default namespace, so elements are matched on
//! their local name.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Create a configured `Reader` from a string slice.
///
/// `expand_empty_elements(true)` turns `<routeCode .../>` into `Start` + `End`
/// events so that element-stack bookkeeping stays uniform.
pub(crate) fn make_reader(content: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().expand_empty_elements = true;
    reader
}

/// Local (namespace-stripped) element name as an owned string
pub(crate) fn local_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

/// Read all text content inside the current element, stripping child tags.
///
/// The reader must have just consumed `Event::Start` for an element with
/// local name `parent`. Reads until the matching `Event::End` and returns the
/// concatenated text with whitespace collapsed.
pub(crate) fn read_text_content(
    reader: &mut Reader<&[u8]>,
    parent: &[u8],
    buf: &mut Vec<u8>,
) -> Result<String, quick_xml::Error> {
    let mut text = String::new();
    let mut depth: u32 = 1;

    loop {
        match reader.read_event_into(buf)? {
            Event::Start(ref e) => {
                if e.local_name().as_ref() == parent {
                    depth += 1;
                }
            }
            Event::Text(ref e) => {
                text.push_str(&e.unescape()?);
                text.push(' ');
            }
            Event::CData(ref e) => {
                text.push_str(&String::from_utf8_lossy(e));
                text.push(' ');
            }
            Event::End(ref e) => {
                if e.local_name().as_ref() == parent {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    buf.clear();

    Ok(text.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Extract an attribute value from a `BytesStart` event.
///
/// Returns `None` when the attribute is absent, malformed or blank.
pub(crate) fn get_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    let attr = e.try_get_attribute(name).ok()??;
    let value = attr
        .unescape_value()
        .map(|v| v.into_owned())
        .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
