//! Constants and small helpers shared by the decoder and the emitter.

/// Namespace of the Gramps 1.5.0 dialect.
///
/// The root `database` element must declare exactly this default namespace.
pub const GRAMPS_NAMESPACE: &str = "http://gramps-project.org/xml/1.5.0/";

/// DOCTYPE written after the XML declaration, preceded by a line break.
pub const GRAMPS_DOCTYPE: &str = "\n<!DOCTYPE database PUBLIC \"-//Gramps//DTD Gramps XML 1.5.0//EN\"\n\"http://gramps-project.org/xml/1.5.0/grampsxml.dtd\">";

/// Checks if every byte is XML whitespace.
pub fn is_whitespace(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .all(|b| matches!(b, b' ' | b'\n' | b'\r' | b'\t'))
}

/// Checks if an attribute name declares a namespace (`xmlns` or `xmlns:*`).
pub fn is_namespace_declaration(name: &str) -> bool {
    name == "xmlns" || name.starts_with("xmlns:")
}

/// Checks if an element name carries a namespace prefix.
pub fn is_prefixed(name: &str) -> bool {
    name.contains(':')
}
