//! Deterministic emitter from schema nodes to Gramps XML bytes.
//!
//! Layout rules:
//! - every element starts on its own line, indented one tab per level;
//! - elements with neither text nor children are self-closing;
//! - character data is written inline right after the start tag;
//! - catch-all attributes follow the bound ones, catch-all elements follow
//!   the bound children, each in stored order.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::Result;
use crate::xml::node::{CatchAll, Element, RawElement};
use crate::xml::utils::{GRAMPS_DOCTYPE, GRAMPS_NAMESPACE};

/// Streaming emitter over a quick-xml writer.
pub struct XmlEmitter<W: Write> {
    writer: Writer<W>,
    depth: usize,
    /// Start tag held back until we know whether the element has content.
    pending: Option<BytesStart<'static>>,
    /// One entry per open element: whether it has child elements so far.
    children: Vec<bool>,
}

impl<W: Write> XmlEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Writer::new(writer),
            depth: 0,
            pending: None,
            children: Vec::new(),
        }
    }

    /// Writes a whole document: declaration, DOCTYPE and the root element
    /// declaring the Gramps namespace.
    pub fn document<T: Element>(&mut self, tag: &str, root: &T) -> Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.writer.get_mut().write_all(GRAMPS_DOCTYPE.as_bytes())?;

        let mut start = BytesStart::new(tag.to_string());
        start.push_attribute(("xmlns", GRAMPS_NAMESPACE));
        self.node(tag, start, root)?;

        self.writer.get_mut().write_all(b"\n")?;
        Ok(())
    }

    /// Writes one node as `<tag>`.
    pub fn element<T: Element>(&mut self, tag: &str, node: &T) -> Result<()> {
        self.node(tag, BytesStart::new(tag.to_string()), node)
    }

    /// Writes `<tag>text</tag>`, or `<tag></tag>` for empty text.
    pub fn text_element(&mut self, tag: &str, text: &str) -> Result<()> {
        self.child()?;
        self.writer
            .write_event(Event::Start(BytesStart::new(tag)))?;
        if !text.is_empty() {
            self.writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        self.writer.write_event(Event::End(BytesEnd::new(tag)))?;
        Ok(())
    }

    /// Replays a captured element (or stray text) exactly as stored.
    pub fn raw(&mut self, element: &RawElement) -> Result<()> {
        self.child()?;
        self.writer.get_mut().write_all(element.raw.as_bytes())?;
        Ok(())
    }

    /// Writes a collapsed grouping element around `items`.
    ///
    /// Nothing is written when the group would be empty.
    pub fn group<T: Element>(
        &mut self,
        tag: &str,
        item: &str,
        items: &[T],
        unparsed: &CatchAll,
    ) -> Result<()> {
        let mut attributes = unparsed.attributes_in(Some(tag)).peekable();
        let mut stray = unparsed.elements_in(Some(tag)).peekable();
        if items.is_empty() && attributes.peek().is_none() && stray.peek().is_none() {
            return Ok(());
        }

        let mut start = BytesStart::new(tag.to_string());
        for attr in attributes {
            start.push_attribute((attr.name.as_str(), attr.value.as_str()));
        }
        self.begin(start)?;
        for node in items {
            self.element(item, node)?;
        }
        for element in stray {
            self.raw(element)?;
        }
        self.end(tag)
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn node<T: Element>(&mut self, tag: &str, mut start: BytesStart<'static>, node: &T) -> Result<()> {
        node.encode_attributes(&mut start);
        for attr in node.catch_all().attributes_in(None) {
            start.push_attribute((attr.name.as_str(), attr.value.as_str()));
        }
        self.begin(start)?;

        if let Some(text) = node.text_content().filter(|text| !text.is_empty()) {
            self.flush_pending()?;
            self.writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        node.encode_children(self)?;
        for element in node.catch_all().elements_in(None) {
            self.raw(element)?;
        }
        self.end(tag)
    }

    fn begin(&mut self, start: BytesStart<'static>) -> Result<()> {
        self.child()?;
        self.pending = Some(start);
        self.children.push(false);
        self.depth += 1;
        Ok(())
    }

    fn end(&mut self, tag: &str) -> Result<()> {
        self.depth = self.depth.saturating_sub(1);
        let has_children = self.children.pop().unwrap_or(false);
        if let Some(start) = self.pending.take() {
            self.writer.write_event(Event::Empty(start))?;
            return Ok(());
        }
        if has_children {
            self.newline()?;
        }
        self.writer.write_event(Event::End(BytesEnd::new(tag)))?;
        Ok(())
    }

    /// Prepares the line for a new child of the innermost open element.
    fn child(&mut self) -> Result<()> {
        self.flush_pending()?;
        if let Some(has_children) = self.children.last_mut() {
            *has_children = true;
        }
        self.newline()
    }

    fn flush_pending(&mut self) -> Result<()> {
        if let Some(start) = self.pending.take() {
            self.writer.write_event(Event::Start(start))?;
        }
        Ok(())
    }

    fn newline(&mut self) -> Result<()> {
        let out = self.writer.get_mut();
        out.write_all(b"\n")?;
        for _ in 0..self.depth {
            out.write_all(b"\t")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gramps_node;
    use crate::xml::node::RawAttribute;

    gramps_node! {
        struct Shelf {
            attr id: Option<String> = "id",
            attr size: Option<i32> = "size",
            text label: Option<String> = "label",
            many parts: Vec<Part> = "part",
            group extras: Vec<Part> = "extras" > "extra",
        }
    }

    gramps_node! {
        struct Part {
            attr kind: String = "kind",
            content value: String,
        }
    }

    fn render<T: Element>(tag: &str, node: &T) -> String {
        let mut out = XmlEmitter::new(Vec::new());
        out.element(tag, node).unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn test_childless_element_is_self_closing() {
        let node = Shelf {
            id: Some("B1".to_string()),
            ..Default::default()
        };
        assert_eq!(render("shelf", &node), "\n<shelf id=\"B1\"/>");
    }

    #[test]
    fn test_children_are_indented_in_declared_order() {
        let node = Shelf {
            size: Some(3),
            label: Some("a & b".to_string()),
            parts: vec![
                Part {
                    kind: "x".to_string(),
                    value: "one".to_string(),
                    ..Default::default()
                },
                Part::default(),
            ],
            ..Default::default()
        };
        assert_eq!(
            render("shelf", &node),
            "\n<shelf size=\"3\">\n\t<label>a &amp; b</label>\n\t<part kind=\"x\">one</part>\n\t<part kind=\"\"/>\n</shelf>"
        );
    }

    #[test]
    fn test_catch_all_follows_bound_content() {
        let mut node = Shelf::default();
        node.unparsed.attributes.push(RawAttribute::new("weight", "2"));
        node.unparsed
            .elements
            .push(RawElement::new("note", "<note  a='1'>kept</note>"));
        node.label = Some(String::new());
        assert_eq!(
            render("shelf", &node),
            "\n<shelf weight=\"2\">\n\t<label></label>\n\t<note  a='1'>kept</note>\n</shelf>"
        );
    }

    #[test]
    fn test_empty_group_is_omitted() {
        let mut node = Shelf::default();
        assert_eq!(render("shelf", &node), "\n<shelf/>");

        node.unparsed
            .elements
            .push(RawElement::new("junk", "<junk/>").within("extras"));
        assert_eq!(
            render("shelf", &node),
            "\n<shelf>\n\t<extras>\n\t\t<junk/>\n\t</extras>\n</shelf>"
        );
    }

    #[test]
    fn test_document_prologue() {
        let mut out = XmlEmitter::new(Vec::new());
        out.document("shelf", &Shelf::default()).unwrap();
        let xml = String::from_utf8(out.into_inner()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE database"));
        assert!(xml.ends_with(&format!("\n<shelf xmlns=\"{GRAMPS_NAMESPACE}\"/>\n")));
    }
}
