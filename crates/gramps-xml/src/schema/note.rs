use crate::gramps_node;
use crate::schema::{EntityMeta, Link};

gramps_node! {
    /// Character offsets a style applies to.
    pub struct Range {
        attr start: i32 = "start",
        attr end: i32 = "end",
    }
}

gramps_node! {
    /// Markup over parts of a note's text (bold, font, link, ...).
    pub struct Style {
        attr name: String = "name",
        attr value: Option<String> = "value",
        many ranges: Vec<Range> = "range",
    }
}

gramps_node! {
    pub struct Note {
        embed meta: EntityMeta,
        attr format: Option<String> = "format",
        attr kind: String = "type",
        text text: String = "text",
        many styles: Vec<Style> = "style",
        many tag_refs: Vec<Link> = "tagref",
    }
}
