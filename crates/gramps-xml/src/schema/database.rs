//! The document root and its small top-level records.

use crate::gramps_node;
use crate::schema::{
    Citation, Event, Family, HasHandle, Note, Object, People, Person, PlaceObj, Repository, Source,
};
use crate::xml::{Flag, RawElement};

gramps_node! {
    /// A custom name display format.
    pub struct NameFormat {
        attr number: String = "number",
        attr name: String = "name",
        attr fmt_str: String = "fmt_str",
        attr active: Flag = "active",
    }
}

gramps_node! {
    pub struct Tag {
        attr handle: String = "handle",
        attr name: String = "name",
        attr color: String = "color",
        attr priority: i32 = "priority",
        attr change: String = "change",
    }
}

gramps_node! {
    pub struct Bookmark {
        attr target: String = "target",
        attr hlink: String = "hlink",
    }
}

gramps_node! {
    /// A grouping rule mapping a surname to a group name.
    pub struct NameMap {
        attr kind: String = "type",
        attr key: String = "key",
        attr value: String = "value",
    }
}

gramps_node! {
    /// A whole Gramps XML file.
    ///
    /// The header is kept verbatim and is not audited by the verifier.
    pub struct Database {
        raw header: Option<RawElement> = "header",
        group name_formats: Vec<NameFormat> = "name-formats" > "format",
        group tags: Vec<Tag> = "tags" > "tag",
        group events: Vec<Event> = "events" > "event",
        maybe people: Option<People> = "people",
        group families: Vec<Family> = "families" > "family",
        group citations: Vec<Citation> = "citations" > "citation",
        group sources: Vec<Source> = "sources" > "source",
        group places: Vec<PlaceObj> = "places" > "placeobj",
        group objects: Vec<Object> = "objects" > "object",
        group repositories: Vec<Repository> = "repositories" > "repository",
        group notes: Vec<Note> = "notes" > "note",
        group bookmarks: Vec<Bookmark> = "bookmarks" > "bookmark",
        group name_maps: Vec<NameMap> = "namemaps" > "map",
    }
}

fn find<'a, T: HasHandle>(items: &'a [T], handle: &str) -> Option<&'a T> {
    items.iter().find(|item| item.handle() == handle)
}

impl Database {
    /// Element name of the root.
    pub const TAG: &'static str = "database";

    /// All people, in document order.
    pub fn persons(&self) -> &[Person] {
        match &self.people {
            Some(people) => &people.persons,
            None => &[],
        }
    }

    pub fn find_person(&self, handle: &str) -> Option<&Person> {
        find(self.persons(), handle)
    }

    pub fn find_family(&self, handle: &str) -> Option<&Family> {
        find(&self.families, handle)
    }

    pub fn find_event(&self, handle: &str) -> Option<&Event> {
        find(&self.events, handle)
    }

    pub fn find_citation(&self, handle: &str) -> Option<&Citation> {
        find(&self.citations, handle)
    }

    pub fn find_source(&self, handle: &str) -> Option<&Source> {
        find(&self.sources, handle)
    }

    pub fn find_place(&self, handle: &str) -> Option<&PlaceObj> {
        find(&self.places, handle)
    }

    pub fn find_object(&self, handle: &str) -> Option<&Object> {
        find(&self.objects, handle)
    }

    pub fn find_repository(&self, handle: &str) -> Option<&Repository> {
        find(&self.repositories, handle)
    }

    pub fn find_note(&self, handle: &str) -> Option<&Note> {
        find(&self.notes, handle)
    }

    pub fn find_tag(&self, handle: &str) -> Option<&Tag> {
        find(&self.tags, handle)
    }

    /// The person marked as home person, if it exists.
    pub fn home_person(&self) -> Option<&Person> {
        let home = self.people.as_ref()?.home.as_deref()?;
        self.find_person(home)
    }
}
