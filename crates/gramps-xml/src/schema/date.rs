//! Date expressions.
//!
//! A node holds at most one of `<dateval>`, `<datestr>`, `<daterange>` and
//! `<datespan>`. A second one on the same node is not bound; it stays in the
//! catch-all and fails verification.

use std::fmt;
use std::io::Write;
use std::num::ParseIntError;

use quick_xml::events::BytesStart;

use crate::error::Result;
use crate::gramps_node;
use crate::xml::{Embedded, Node, Open, XmlDecoder, XmlEmitter};

gramps_node! {
    /// An exact (possibly qualified) date: `<dateval val="1920-05-01"/>`.
    pub struct DateVal {
        attr val: String = "val",
        attr kind: Option<String> = "type",
        attr quality: Option<String> = "quality",
        attr cformat: Option<String> = "cformat",
        attr dualdated: Option<String> = "dualdated",
        attr newyear: Option<String> = "newyear",
    }
}

gramps_node! {
    /// A date that could not be parsed, kept as free text.
    pub struct DateStr {
        attr val: String = "val",
    }
}

gramps_node! {
    /// The shared shape of `<daterange>` and `<datespan>`.
    pub struct DateRange {
        attr start: String = "start",
        attr stop: String = "stop",
        attr quality: Option<String> = "quality",
        attr cformat: Option<String> = "cformat",
        attr dualdated: Option<String> = "dualdated",
        attr newyear: Option<String> = "newyear",
    }
}

impl DateRange {
    pub fn new(start: impl Into<String>, stop: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            stop: stop.into(),
            ..Default::default()
        }
    }
}

/// One populated date variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Date {
    /// `<daterange>`: somewhere between two dates.
    Range(DateRange),
    /// `<datespan>`: lasting from one date to another.
    Span(DateRange),
    Value(DateVal),
    Text(DateStr),
}

impl Date {
    /// Element name of the variant.
    pub fn tag(&self) -> &'static str {
        match self {
            Date::Range(_) => "daterange",
            Date::Span(_) => "datespan",
            Date::Value(_) => "dateval",
            Date::Text(_) => "datestr",
        }
    }

    fn node(&self) -> &dyn Node {
        match self {
            Date::Range(range) | Date::Span(range) => range,
            Date::Value(value) => value,
            Date::Text(text) => text,
        }
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Date::Value(value) => f.write_str(&value.val),
            Date::Span(span) => write!(f, "from {} to {}", span.start, span.stop),
            Date::Range(range) => write!(f, "between {} and {}", range.start, range.stop),
            Date::Text(text) => f.write_str(&text.val),
        }
    }
}

/// The optional date of a node, inlined into its element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateField {
    pub value: Option<Date>,
}

impl DateField {
    pub fn new(date: Date) -> Self {
        Self { value: Some(date) }
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }
}

/// Renders the date, or nothing when no variant is set.
impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(date) => fmt::Display::fmt(date, f),
            None => Ok(()),
        }
    }
}

impl Embedded for DateField {
    fn bind_attribute(&mut self, _name: &str, _value: &str) -> std::result::Result<bool, ParseIntError> {
        Ok(false)
    }

    fn bind_child<'a>(&mut self, de: &mut XmlDecoder<'a>, open: &Open<'a>) -> Result<bool> {
        if self.value.is_some() {
            return Ok(false);
        }
        let date = match open.name.as_str() {
            "daterange" => Date::Range(de.decode_element(open)?),
            "datespan" => Date::Span(de.decode_element(open)?),
            "dateval" => Date::Value(de.decode_element(open)?),
            "datestr" => Date::Text(de.decode_element(open)?),
            _ => return Ok(false),
        };
        self.value = Some(date);
        Ok(true)
    }

    fn encode_attributes(&self, _start: &mut BytesStart<'_>) {}

    fn encode_children<W: Write>(&self, out: &mut XmlEmitter<W>) -> Result<()> {
        match &self.value {
            Some(Date::Range(range)) | Some(Date::Span(range)) => {
                out.element(self.tag(), range)
            }
            Some(Date::Value(value)) => out.element("dateval", value),
            Some(Date::Text(text)) => out.element("datestr", text),
            None => Ok(()),
        }
    }

    fn visit<'s>(&'s self, visitor: &mut dyn FnMut(&'static str, &'s dyn Node)) {
        if let Some(date) = &self.value {
            visitor(date.tag(), date.node());
        }
    }
}

impl DateField {
    fn tag(&self) -> &'static str {
        self.value.as_ref().map_or("", Date::tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::{decode_any, encode_node};

    gramps_node! {
        struct Dated {
            embed date: DateField,
            text description: Option<String> = "description",
        }
    }

    fn dated(inner: &str) -> Dated {
        decode_any(format!("<test>{inner}</test>").as_bytes()).unwrap()
    }

    #[test]
    fn test_date_rendering() {
        let cases = [
            (r#"<dateval val="1920-05-01"/>"#, "1920-05-01"),
            (r#"<datestr val="about Easter"/>"#, "about Easter"),
            (r#"<daterange start="1918" stop="1920"/>"#, "between 1918 and 1920"),
            (r#"<datespan start="C" stop="D"/>"#, "from C to D"),
            ("", ""),
        ];
        for (xml, expected) in cases {
            assert_eq!(dated(xml).date.to_string(), expected, "rendering {xml}");
        }
    }

    #[test]
    fn test_range_renders_its_own_bounds() {
        let field = DateField::new(Date::Range(DateRange::new("A", "B")));
        assert_eq!(field.to_string(), "between A and B");
    }

    #[test]
    fn test_second_date_is_not_bound() {
        let node = dated(r#"<dateval val="1900"/><datestr val="later"/>"#);
        assert_eq!(node.date.to_string(), "1900");
        assert_eq!(node.unparsed.elements.len(), 1);
        assert_eq!(node.unparsed.elements[0].name, "datestr");
    }

    #[test]
    fn test_date_is_written_in_place() {
        let node = dated(r#"<description>d</description><datespan start="1" stop="2" quality="estimated"/>"#);
        let xml = encode_node("test", &node).unwrap();
        assert_eq!(
            String::from_utf8(xml).unwrap(),
            "\n<test>\n\t<datespan start=\"1\" stop=\"2\" quality=\"estimated\"/>\n\t<description>d</description>\n</test>"
        );
    }

    #[test]
    fn test_visit_reports_variant_tag() {
        let node = dated(r#"<daterange start="1" stop="2"/>"#);
        let mut tags = Vec::new();
        node.visit_children(&mut |tag, _| tags.push(tag));
        assert_eq!(tags, vec!["daterange"]);
    }
}
