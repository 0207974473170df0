//! Events and the references that attach them to people and families.

use crate::gramps_node;
use crate::schema::{Attribute, DateField, EntityMeta, HasHandle, HasLink, Link, ObjRef};
use crate::xml::Flag;

gramps_node! {
    pub struct Event {
        embed meta: EntityMeta,
        text kind: Option<String> = "type",
        embed date: DateField,
        maybe place: Option<Link> = "place",
        text description: Option<String> = "description",
        many attributes: Vec<Attribute> = "attribute",
        many note_refs: Vec<Link> = "noteref",
        many citation_refs: Vec<Link> = "citationref",
        many obj_refs: Vec<ObjRef> = "objref",
        many tag_refs: Vec<Link> = "tagref",
    }
}

gramps_node! {
    /// The role a person or family plays in an event.
    pub struct EventRef {
        attr hlink: String = "hlink",
        attr private: Flag = "priv",
        attr role: Option<String> = "role",
        many attributes: Vec<Attribute> = "attribute",
        many note_refs: Vec<Link> = "noteref",
    }
}

impl EventRef {
    /// Value of the first attribute of type `kind`, or an empty string.
    pub fn attribute(&self, kind: &str) -> &str {
        self.attributes
            .iter()
            .find(|attribute| attribute.kind == kind)
            .map_or("", |attribute| attribute.value.as_str())
    }

    /// Looks the referenced event up in `events`.
    pub fn resolve<'e>(&self, events: &'e [Event]) -> Option<&'e Event> {
        events.iter().find(|event| event.handle() == self.hlink())
    }
}
