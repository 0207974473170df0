//! The typed Gramps 1.5.0 schema tree.
//!
//! Node types mirror the dialect's element grammar. Field declaration order
//! follows the DTD content models and is the order the encoder writes.
//!
//! Identifiable entities hold their shared attributes in an [`EntityMeta`];
//! nodes that may carry a date hold a [`DateField`]. Both are inlined into
//! the owning element.

mod common;
mod database;
mod date;
mod event;
mod family;
mod media;
mod note;
mod person;
mod place;
mod source;

pub use common::{Address, Attribute, EntityMeta, Link, Url};
pub use database::{Bookmark, Database, NameFormat, NameMap, Tag};
pub use date::{Date, DateField, DateRange, DateStr, DateVal};
pub use event::{Event, EventRef};
pub use family::{ChildRef, Family, FamilyRel};
pub use media::{File, ObjRef, Object, Region};
pub use note::{Note, Range, Style};
pub use person::{LdsOrd, Name, People, Person, PersonRef, Status, Surname, Temple};
pub use place::{Coord, Location, PlaceObj};
pub use source::{Citation, DataItem, RepoRef, Repository, Source, SrcAttribute};

/// An identifiable entity: anything other records can point at by handle.
pub trait HasHandle {
    fn handle(&self) -> &str;

    /// Element name the entity is written under.
    fn element_name(&self) -> &'static str;
}

/// A reference link: a node whose payload is the handle of another entity.
pub trait HasLink {
    fn hlink(&self) -> &str;

    /// Checks if this link points at `target`.
    fn links_to(&self, target: &dyn HasHandle) -> bool {
        self.hlink() == target.handle()
    }
}

/// A node that may carry a date expression.
pub trait HasDate {
    fn date(&self) -> &DateField;

    /// Human-readable rendering of the date, empty when no date is set.
    fn date_string(&self) -> String {
        self.date().to_string()
    }
}

macro_rules! impl_has_handle {
    ($($ty:ty => $tag:literal),* $(,)?) => {
        $(
            impl HasHandle for $ty {
                fn handle(&self) -> &str {
                    &self.meta.handle
                }

                fn element_name(&self) -> &'static str {
                    $tag
                }
            }
        )*
    };
}

impl_has_handle! {
    Person => "person",
    Family => "family",
    Event => "event",
    Citation => "citation",
    Source => "source",
    PlaceObj => "placeobj",
    Object => "object",
    Repository => "repository",
    Note => "note",
}

impl HasHandle for Tag {
    fn handle(&self) -> &str {
        &self.handle
    }

    fn element_name(&self) -> &'static str {
        "tag"
    }
}

macro_rules! impl_has_link {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HasLink for $ty {
                fn hlink(&self) -> &str {
                    &self.hlink
                }
            }
        )*
    };
}

impl_has_link!(Link, EventRef, PersonRef, ChildRef, ObjRef, RepoRef, Bookmark);

macro_rules! impl_has_date {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HasDate for $ty {
                fn date(&self) -> &DateField {
                    &self.date
                }
            }
        )*
    };
}

impl_has_date!(Event, Name, LdsOrd, Address, Citation, Object);
