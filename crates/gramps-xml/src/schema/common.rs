//! Building blocks shared across entity kinds.

use std::io::Write;
use std::num::ParseIntError;

use chrono::{DateTime, Utc};
use quick_xml::events::BytesStart;

use crate::error::Result;
use crate::gramps_node;
use crate::schema::DateField;
use crate::xml::{AttrField, Embedded, Flag, Node, Open, XmlDecoder, XmlEmitter};

/// Attributes shared by every identifiable entity.
///
/// Written in the order `handle`, `change`, `id`, `priv`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityMeta {
    pub handle: String,
    /// Last change as Unix seconds, kept as written.
    pub change: String,
    pub id: Option<String>,
    pub private: Flag,
}

impl EntityMeta {
    /// The `change` attribute as a timestamp, if it holds valid Unix seconds.
    pub fn changed_at(&self) -> Option<DateTime<Utc>> {
        let seconds = self.change.trim().parse::<i64>().ok()?;
        DateTime::from_timestamp(seconds, 0)
    }
}

impl Embedded for EntityMeta {
    fn bind_attribute(&mut self, name: &str, value: &str) -> std::result::Result<bool, ParseIntError> {
        match name {
            "handle" => self.handle.bind(value)?,
            "change" => self.change.bind(value)?,
            "id" => self.id.bind(value)?,
            "priv" => self.private.bind(value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn bind_child<'a>(&mut self, _de: &mut XmlDecoder<'a>, _open: &Open<'a>) -> Result<bool> {
        Ok(false)
    }

    fn encode_attributes(&self, start: &mut BytesStart<'_>) {
        let fields: [(&str, &dyn AttrField); 4] = [
            ("handle", &self.handle),
            ("change", &self.change),
            ("id", &self.id),
            ("priv", &self.private),
        ];
        for (name, field) in fields {
            if let Some(value) = field.emit() {
                start.push_attribute((name, &*value));
            }
        }
    }

    fn encode_children<W: Write>(&self, _out: &mut XmlEmitter<W>) -> Result<()> {
        Ok(())
    }

    fn visit<'s>(&'s self, _visitor: &mut dyn FnMut(&'static str, &'s dyn Node)) {}
}

gramps_node! {
    /// A reference to another entity by handle (`noteref`, `citationref`,
    /// `tagref`, `childof`, `father`, ...).
    pub struct Link {
        attr hlink: String = "hlink",
    }
}

impl Link {
    pub fn new(hlink: impl Into<String>) -> Self {
        Self {
            hlink: hlink.into(),
            ..Default::default()
        }
    }
}

gramps_node! {
    /// A typed key/value pair attached to a record.
    pub struct Attribute {
        attr private: Flag = "priv",
        attr kind: String = "type",
        attr value: String = "value",
        many citation_refs: Vec<Link> = "citationref",
        many note_refs: Vec<Link> = "noteref",
    }
}

gramps_node! {
    pub struct Url {
        attr private: Flag = "priv",
        attr kind: Option<String> = "type",
        attr href: String = "href",
        attr description: Option<String> = "description",
    }
}

gramps_node! {
    /// A postal address, optionally dated.
    pub struct Address {
        attr private: Flag = "priv",
        embed date: DateField,
        text street: Option<String> = "street",
        text locality: Option<String> = "locality",
        text city: Option<String> = "city",
        text county: Option<String> = "county",
        text state: Option<String> = "state",
        text country: Option<String> = "country",
        text postal: Option<String> = "postal",
        text phone: Option<String> = "phone",
        many note_refs: Vec<Link> = "noteref",
        many citation_refs: Vec<Link> = "citationref",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::decode_any;

    #[test]
    fn test_entity_meta_attribute_order() {
        let mut start = BytesStart::new("event");
        let meta = EntityMeta {
            handle: "_e1".to_string(),
            change: "1400000000".to_string(),
            id: Some("E0001".to_string()),
            private: Flag::SET,
        };
        meta.encode_attributes(&mut start);
        let names: Vec<Vec<u8>> = start
            .attributes()
            .map(|attr| attr.unwrap().key.as_ref().to_vec())
            .collect();
        assert_eq!(
            names,
            vec![
                b"handle".to_vec(),
                b"change".to_vec(),
                b"id".to_vec(),
                b"priv".to_vec()
            ]
        );
    }

    #[test]
    fn test_changed_at() {
        let meta = EntityMeta {
            change: "1400000000".to_string(),
            ..Default::default()
        };
        let at = meta.changed_at().unwrap();
        assert_eq!(at.to_rfc3339(), "2014-05-13T16:53:20+00:00");

        let broken = EntityMeta {
            change: "yesterday".to_string(),
            ..Default::default()
        };
        assert_eq!(broken.changed_at(), None);
    }

    #[test]
    fn test_attribute_binding() {
        let attribute: Attribute = decode_any(
            br#"<attribute priv="1" type="Age" value="42"><noteref hlink="_n1"/></attribute>"#,
        )
        .unwrap();
        assert!(attribute.private.is_set());
        assert_eq!(attribute.kind, "Age");
        assert_eq!(attribute.value, "42");
        assert_eq!(attribute.note_refs, vec![Link::new("_n1")]);
    }

    #[test]
    fn test_address_with_date() {
        let address: Address = decode_any(
            b"<address><dateval val=\"1950\"/><city>Springfield</city><phone>555</phone></address>",
        )
        .unwrap();
        assert_eq!(address.city.as_deref(), Some("Springfield"));
        assert_eq!(address.phone.as_deref(), Some("555"));
        assert_eq!(address.date.to_string(), "1950");
        assert!(address.unparsed.is_empty());
    }
}
