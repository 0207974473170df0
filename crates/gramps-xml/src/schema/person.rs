//! People, their names and their personal references.

use std::fmt;

use crate::gramps_node;
use crate::schema::{Address, Attribute, DateField, EntityMeta, Event, EventRef, Link, ObjRef, Url};
use crate::schema::{HasHandle, HasLink};
use crate::xml::Flag;

gramps_node! {
    /// One part of a family name. The surname itself is the element text.
    pub struct Surname {
        attr prefix: Option<String> = "prefix",
        attr prim: Option<i32> = "prim",
        attr derivation: Option<String> = "derivation",
        attr connector: Option<String> = "connector",
        content value: String,
    }
}

gramps_node! {
    pub struct Name {
        attr alt: Flag = "alt",
        attr kind: Option<String> = "type",
        attr private: Flag = "priv",
        attr sort: Option<i32> = "sort",
        attr display: Option<i32> = "display",
        text first: Option<String> = "first",
        text call: Option<String> = "call",
        many surnames: Vec<Surname> = "surname",
        text suffix: Option<String> = "suffix",
        text title: Option<String> = "title",
        text nick: Option<String> = "nick",
        text familynick: Option<String> = "familynick",
        text group: Option<String> = "group",
        embed date: DateField,
        many note_refs: Vec<Link> = "noteref",
        many citation_refs: Vec<Link> = "citationref",
    }
}

impl Name {
    /// The first surname, or an empty string.
    pub fn surname(&self) -> &str {
        self.surnames.first().map_or("", |surname| surname.value.as_str())
    }

    /// The given names, or an empty string.
    pub fn first_name(&self) -> &str {
        self.first.as_deref().unwrap_or("")
    }

    /// Surname plus the first given name only: `"Smith, John"` for John Paul Smith.
    pub fn short(&self) -> String {
        let given = self.first_name().split(' ').next().unwrap_or("");
        format!("{}, {}", self.surname(), given)
    }
}

/// `"Surname, Given Names"`.
impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.surname(), self.first_name())
    }
}

gramps_node! {
    pub struct Temple {
        attr val: String = "val",
    }
}

gramps_node! {
    pub struct Status {
        attr val: String = "val",
    }
}

gramps_node! {
    /// A Latter-day Saints ordinance.
    pub struct LdsOrd {
        attr private: Flag = "priv",
        attr kind: Option<String> = "type",
        embed date: DateField,
        maybe temple: Option<Temple> = "temple",
        maybe place: Option<Link> = "place",
        maybe status: Option<Status> = "status",
        maybe sealed_to: Option<Link> = "sealed_to",
        many note_refs: Vec<Link> = "noteref",
        many citation_refs: Vec<Link> = "citationref",
    }
}

gramps_node! {
    /// An association with another person (godfather, witness, ...).
    pub struct PersonRef {
        attr hlink: String = "hlink",
        attr private: Flag = "priv",
        attr rel: String = "rel",
        many citation_refs: Vec<Link> = "citationref",
        many note_refs: Vec<Link> = "noteref",
    }
}

gramps_node! {
    pub struct Person {
        embed meta: EntityMeta,
        text gender: String = "gender",
        many names: Vec<Name> = "name",
        many event_refs: Vec<EventRef> = "eventref",
        many lds_ords: Vec<LdsOrd> = "lds_ord",
        many obj_refs: Vec<ObjRef> = "objref",
        many addresses: Vec<Address> = "address",
        many attributes: Vec<Attribute> = "attribute",
        many urls: Vec<Url> = "url",
        many child_of: Vec<Link> = "childof",
        many parent_in: Vec<Link> = "parentin",
        many person_refs: Vec<PersonRef> = "personref",
        many note_refs: Vec<Link> = "noteref",
        many citation_refs: Vec<Link> = "citationref",
        many tag_refs: Vec<Link> = "tagref",
    }
}

impl Person {
    /// The first name not marked as an alternate.
    pub fn preferred_name(&self) -> Option<&Name> {
        self.names.iter().find(|name| !name.alt.is_set())
    }

    /// The event reference pointing at `event`.
    pub fn find_event_ref(&self, event: &Event) -> Option<&EventRef> {
        self.event_refs.iter().find(|event_ref| event_ref.links_to(event))
    }
}

gramps_node! {
    /// The `<people>` section, with the optional home person.
    pub struct People {
        attr home: Option<String> = "home",
        many persons: Vec<Person> = "person",
    }
}

impl People {
    pub fn find(&self, handle: &str) -> Option<&Person> {
        self.persons.iter().find(|person| person.handle() == handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::decode_any;

    fn name(first: &str, surname: &str, alt: bool) -> Name {
        Name {
            alt: Flag::from(alt),
            first: Some(first.to_string()),
            surnames: vec![Surname {
                value: surname.to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn event(handle: &str) -> Event {
        Event {
            meta: EntityMeta {
                handle: handle.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn event_ref(hlink: &str) -> EventRef {
        EventRef {
            hlink: hlink.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_preferred_name_skips_alternates() {
        let person = Person {
            names: vec![
                name("Jack", "Doe", true),
                name("John Paul", "Smith", false),
                name("Johnny", "Smith", true),
            ],
            ..Default::default()
        };
        let preferred = person.preferred_name().unwrap();
        assert_eq!(preferred.first_name(), "John Paul");
        assert_eq!(preferred.to_string(), "Smith, John Paul");
        assert_eq!(preferred.short(), "Smith, John");
    }

    #[test]
    fn test_preferred_name_missing() {
        let person = Person {
            names: vec![name("Jack", "Doe", true)],
            ..Default::default()
        };
        assert!(person.preferred_name().is_none());
    }

    #[test]
    fn test_find_event_ref() {
        let person = Person {
            event_refs: vec![event_ref("_birth"), event_ref("_death")],
            ..Default::default()
        };
        let found = person.find_event_ref(&event("_death")).unwrap();
        assert_eq!(found.hlink, "_death");
        assert!(person.find_event_ref(&event("_burial")).is_none());
    }

    #[test]
    fn test_empty_name_accessors() {
        let empty = Name::default();
        assert_eq!(empty.surname(), "");
        assert_eq!(empty.first_name(), "");
        assert_eq!(empty.to_string(), ", ");
        assert_eq!(empty.short(), ", ");
    }

    #[test]
    fn test_person_binding() {
        let person: Person = decode_any(
            br#"<person handle="_p1" change="1" id="I0001">
                  <gender>F</gender>
                  <name type="Birth Name">
                    <first>Anna Maria</first>
                    <surname prim="1">Berg</surname>
                    <group>Bergs</group>
                  </name>
                  <childof hlink="_f1"/>
                </person>"#,
        )
        .unwrap();
        assert_eq!(person.handle(), "_p1");
        assert_eq!(person.meta.id.as_deref(), Some("I0001"));
        assert_eq!(person.gender, "F");
        assert_eq!(person.names[0].surnames[0].prim, Some(1));
        assert_eq!(person.names[0].group.as_deref(), Some("Bergs"));
        assert_eq!(person.child_of[0].hlink, "_f1");
        assert!(person.unparsed.is_empty());
    }
}
