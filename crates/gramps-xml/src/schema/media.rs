//! Media objects and references to them.

use crate::gramps_node;
use crate::schema::{Attribute, DateField, EntityMeta, Link};
use crate::xml::Flag;

gramps_node! {
    pub struct File {
        attr src: String = "src",
        attr mime: String = "mime",
        attr description: String = "description",
    }
}

gramps_node! {
    /// The part of an image a reference points at, in percent of width and height.
    pub struct Region {
        attr corner1_x: i32 = "corner1_x",
        attr corner1_y: i32 = "corner1_y",
        attr corner2_x: i32 = "corner2_x",
        attr corner2_y: i32 = "corner2_y",
    }
}

gramps_node! {
    pub struct ObjRef {
        attr hlink: String = "hlink",
        attr private: Flag = "priv",
        maybe region: Option<Region> = "region",
        many attributes: Vec<Attribute> = "attribute",
        many citation_refs: Vec<Link> = "citationref",
        many note_refs: Vec<Link> = "noteref",
    }
}

gramps_node! {
    pub struct Object {
        embed meta: EntityMeta,
        one file: File = "file",
        many attributes: Vec<Attribute> = "attribute",
        many note_refs: Vec<Link> = "noteref",
        embed date: DateField,
        many citation_refs: Vec<Link> = "citationref",
        many tag_refs: Vec<Link> = "tagref",
    }
}
