//! Helpers for streaming XML with quick-xml

use quick_xml::events::BytesStart;

/// Get an attribute by its qualified name (`w:val`)
pub fn get_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Get an attribute by local name, whatever its namespace prefix
pub fn local_attr(e: &BytesStart, local: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.local_name().as_ref() == local)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Whether an on/off property element is switched on.
///
/// `<w:b/>` and `<w:b w:val="1"/>` are on; `0`, `false`, `off` and `none`
/// switch the property off.
pub fn toggle_on(e: &BytesStart) -> bool {
    match local_attr(e, b"val") {
        Some(v) => !matches!(v.as_str(), "0" | "false" | "off" | "none"),
        None => true,
    }
}
