//! Single-pass decoder from Gramps XML bytes to schema nodes.
//!
//! The decoder walks quick-xml events over an in-memory document and hands
//! each element to the node type bound to it. Anything a node declines is
//! sliced out of the source bytes and stored in that node's catch-all, so
//! unknown content is replayed exactly as it was written.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesRef, BytesStart, Event};

use crate::error::{GrampsError, Result};
use crate::xml::node::{CatchAll, Element, RawAttribute, RawElement};
use crate::xml::utils::{GRAMPS_NAMESPACE, is_prefixed, is_whitespace};

/// An element whose start tag has just been read.
#[derive(Debug)]
pub struct Open<'a> {
    /// Qualified name as written in the source.
    pub name: String,
    /// True for a self-closing tag.
    pub empty: bool,
    start: BytesStart<'a>,
    /// Byte offset of the opening `<`.
    offset: usize,
    /// Nesting depth inside the element.
    level: usize,
}

/// Streaming decoder over a complete document held in memory.
pub struct XmlDecoder<'a> {
    source: &'a [u8],
    reader: Reader<&'a [u8]>,
    depth: usize,
    /// Byte offset where the last event read began.
    event_start: usize,
    /// Element names from the root to the current node, for error reporting.
    path: Vec<String>,
}

impl<'a> XmlDecoder<'a> {
    pub fn new(source: &'a [u8]) -> Self {
        Self {
            source,
            reader: Reader::from_reader(source),
            depth: 0,
            event_start: 0,
            path: Vec::new(),
        }
    }

    /// Decodes the whole document into `T`.
    ///
    /// When `root` is given, the root element must carry that name and
    /// declare the Gramps namespace as its default namespace. Only
    /// whitespace, comments and processing instructions may surround it.
    pub fn decode_document<T: Element>(&mut self, root: Option<&str>) -> Result<T> {
        let open = loop {
            match self.next_event()? {
                Event::Start(start) => break self.open(start, false)?,
                Event::Empty(start) => break self.open(start, true)?,
                Event::Decl(_) | Event::DocType(_) | Event::Comment(_) | Event::PI(_) => {}
                Event::Text(text) if is_whitespace(&text) => {}
                Event::Eof => return Err(self.syntax("document has no root element")),
                _ => return Err(self.syntax("character data before the root element")),
            }
        };

        if let Some(expected) = root {
            let namespace = self.namespace(&open)?.unwrap_or_default();
            if open.name != expected || namespace != GRAMPS_NAMESPACE {
                return Err(GrampsError::UnexpectedRoot {
                    expected: expected.to_string(),
                    found: open.name,
                    namespace,
                });
            }
        }

        let node = self.decode_element(&open)?;

        loop {
            match self.next_event()? {
                Event::Eof => break,
                Event::Comment(_) | Event::PI(_) => {}
                Event::Text(text) if is_whitespace(&text) => {}
                _ => return Err(self.syntax("content after the root element")),
            }
        }
        Ok(node)
    }

    /// Decodes one element, attributes and content, into a fresh node.
    pub fn decode_element<T: Element>(&mut self, open: &Open<'a>) -> Result<T> {
        let mut node = T::default();
        self.path.push(open.name.clone());
        self.bind_attributes(&mut node, open)?;
        if !open.empty {
            self.bind_content(&mut node, open)?;
        }
        self.path.pop();
        Ok(node)
    }

    /// Reads the character data of a text-only element.
    ///
    /// Returns `None` when the element carries attributes or child elements;
    /// the element is then left for [`capture`](Self::capture).
    pub fn read_text(&mut self, open: &Open<'a>) -> Result<Option<String>> {
        for attr in open.start.attributes() {
            let attr = attr.map_err(|e| self.syntax(e.to_string()))?;
            if attr.key.as_ref() != b"xmlns" {
                return Ok(None);
            }
        }

        let mut text = String::new();
        if open.empty {
            return Ok(Some(text));
        }
        loop {
            match self.next_event()? {
                Event::Text(chunk) => text.push_str(&self.unescape(&chunk)?),
                Event::CData(chunk) => text.push_str(self.utf8(&chunk)?),
                Event::GeneralRef(reference) => text.push_str(&self.resolve(&reference)?),
                Event::Comment(_) | Event::PI(_) => {}
                Event::End(_) => return Ok(Some(text)),
                Event::Start(_) | Event::Empty(_) => return Ok(None),
                Event::Eof => return Err(self.unterminated(open)),
                Event::Decl(_) | Event::DocType(_) => {
                    return Err(self.syntax("declaration inside an element"));
                }
            }
        }
    }

    /// Consumes the rest of an element and returns its exact source text.
    pub fn capture(&mut self, open: &Open<'a>) -> Result<RawElement> {
        while self.depth >= open.level {
            if let Event::Eof = self.next_event()? {
                return Err(self.unterminated(open));
            }
        }
        let end = self.reader.buffer_position() as usize;
        let raw = self.utf8(&self.source[open.offset..end])?;
        Ok(RawElement::new(open.name.clone(), raw))
    }

    /// Decodes a collapsed grouping element such as `<events>`.
    ///
    /// Children named `item` become nodes in `items`. Anything else found
    /// directly inside the group, attributes included, goes to `unparsed`
    /// tagged with the group's name.
    pub fn decode_group<T: Element>(
        &mut self,
        open: &Open<'a>,
        item: &'static str,
        items: &mut Vec<T>,
        unparsed: &mut CatchAll,
    ) -> Result<()> {
        let group = open.name.as_str();
        for attr in open.start.attributes() {
            let attr = attr.map_err(|e| self.syntax(e.to_string()))?;
            let name = self.utf8(attr.key.as_ref())?;
            let value = self.unescape(&attr.value)?;
            if name == "xmlns" && value == GRAMPS_NAMESPACE {
                continue;
            }
            unparsed
                .attributes
                .push(RawAttribute::new(name, value).within(group));
        }
        if open.empty {
            return Ok(());
        }

        self.path.push(open.name.clone());
        let mut text = String::new();
        loop {
            let child = match self.next_event()? {
                Event::Start(start) => self.open(start, false)?,
                Event::Empty(start) => self.open(start, true)?,
                Event::End(_) => break,
                Event::Text(chunk) => {
                    text.push_str(&self.unescape(&chunk)?);
                    continue;
                }
                Event::CData(chunk) => {
                    text.push_str(self.utf8(&chunk)?);
                    continue;
                }
                Event::GeneralRef(reference) => {
                    text.push_str(&self.resolve(&reference)?);
                    continue;
                }
                Event::Comment(_) | Event::PI(_) => continue,
                Event::Eof => return Err(self.unterminated(open)),
                Event::Decl(_) | Event::DocType(_) => {
                    return Err(self.syntax("declaration inside an element"));
                }
            };

            stray_text(unparsed, &text, Some(group));
            text.clear();
            if child.name == item && !self.is_foreign(&child)? {
                items.push(self.decode_element(&child)?);
            } else {
                unparsed.elements.push(self.capture(&child)?.within(group));
            }
        }
        stray_text(unparsed, &text, Some(group));
        self.path.pop();
        Ok(())
    }

    fn bind_attributes<T: Element>(&self, node: &mut T, open: &Open<'a>) -> Result<()> {
        for attr in open.start.attributes() {
            let attr = attr.map_err(|e| self.syntax(e.to_string()))?;
            let name = self.utf8(attr.key.as_ref())?;
            let value = self.unescape(&attr.value)?;
            if name == "xmlns" && value == GRAMPS_NAMESPACE {
                continue;
            }
            match node.bind_attribute(name, &value) {
                Ok(true) => {}
                Ok(false) => node
                    .catch_all_mut()
                    .attributes
                    .push(RawAttribute::new(name, value)),
                Err(source) => {
                    return Err(GrampsError::MalformedValue {
                        path: self.path.join("."),
                        attribute: name.to_string(),
                        value: value.into_owned(),
                        source,
                    });
                }
            }
        }
        Ok(())
    }

    fn bind_content<T: Element>(&mut self, node: &mut T, open: &Open<'a>) -> Result<()> {
        let mut seen = Vec::new();
        let mut text = String::new();
        let mut after_child = false;
        loop {
            let child = match self.next_event()? {
                Event::Start(start) => self.open(start, false)?,
                Event::Empty(start) => self.open(start, true)?,
                Event::End(_) => {
                    flush_text(node, &mut text, after_child);
                    return Ok(());
                }
                Event::Text(chunk) => {
                    text.push_str(&self.unescape(&chunk)?);
                    continue;
                }
                Event::CData(chunk) => {
                    text.push_str(self.utf8(&chunk)?);
                    continue;
                }
                Event::GeneralRef(reference) => {
                    text.push_str(&self.resolve(&reference)?);
                    continue;
                }
                Event::Comment(_) | Event::PI(_) => continue,
                Event::Eof => return Err(self.unterminated(open)),
                Event::Decl(_) | Event::DocType(_) => {
                    return Err(self.syntax("declaration inside an element"));
                }
            };

            flush_text(node, &mut text, true);
            after_child = true;
            if self.is_foreign(&child)? || !node.bind_child(self, &child, &mut seen)? {
                let raw = self.capture(&child)?;
                node.catch_all_mut().elements.push(raw);
            }
        }
    }

    fn next_event(&mut self) -> Result<Event<'a>> {
        self.event_start = self.reader.buffer_position() as usize;
        let event = self.reader.read_event().map_err(|e| GrampsError::Syntax {
            position: self.reader.error_position() as u64,
            message: e.to_string(),
        })?;
        match &event {
            Event::Start(start) | Event::Empty(start) if start.contains(&b'<') => {
                return Err(GrampsError::Syntax {
                    position: self.event_start as u64,
                    message: "'<' inside a start tag".to_string(),
                });
            }
            _ => {}
        }
        match &event {
            Event::Start(_) => self.depth += 1,
            Event::End(_) => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
        Ok(event)
    }

    /// Wraps the start tag just read. Call right after [`next_event`](Self::next_event).
    fn open(&self, start: BytesStart<'a>, empty: bool) -> Result<Open<'a>> {
        let name = self.utf8(start.name().as_ref())?.to_string();
        let level = if empty { self.depth + 1 } else { self.depth };
        Ok(Open {
            name,
            empty,
            start,
            offset: self.tag_offset()?,
            level,
        })
    }

    /// Offset of the `<` opening the tag just read. The reader leaves the
    /// position either on it or just past it, depending on the event before.
    fn tag_offset(&self) -> Result<usize> {
        let at = self.event_start;
        if self.source.get(at) == Some(&b'<') {
            return Ok(at);
        }
        match at.checked_sub(1) {
            Some(before) if self.source.get(before) == Some(&b'<') => Ok(before),
            _ => Err(self.syntax("start tag without '<'")),
        }
    }

    /// Value of the element's own `xmlns` declaration, if any.
    fn namespace(&self, open: &Open<'a>) -> Result<Option<String>> {
        for attr in open.start.attributes() {
            let attr = attr.map_err(|e| self.syntax(e.to_string()))?;
            if attr.key.as_ref() == b"xmlns" {
                return Ok(Some(self.unescape(&attr.value)?.into_owned()));
            }
        }
        Ok(None)
    }

    /// Foreign elements are never bound: prefixed names and elements that
    /// redeclare the default namespace to something else.
    fn is_foreign(&self, open: &Open<'a>) -> Result<bool> {
        if is_prefixed(&open.name) {
            return Ok(true);
        }
        Ok(self
            .namespace(open)?
            .is_some_and(|namespace| namespace != GRAMPS_NAMESPACE))
    }

    fn utf8<'b>(&self, bytes: &'b [u8]) -> Result<&'b str> {
        std::str::from_utf8(bytes).map_err(|e| self.syntax(format!("invalid UTF-8: {e}")))
    }

    fn unescape<'b>(&self, bytes: &'b [u8]) -> Result<Cow<'b, str>> {
        let raw = self.utf8(bytes)?;
        unescape(raw).map_err(|e| self.syntax(e.to_string()))
    }

    fn resolve(&self, reference: &BytesRef<'a>) -> Result<String> {
        let name = self.utf8(reference)?;
        unescape(&format!("&{name};"))
            .map(Cow::into_owned)
            .map_err(|e| self.syntax(e.to_string()))
    }

    fn syntax(&self, message: impl Into<String>) -> GrampsError {
        GrampsError::Syntax {
            position: self.reader.buffer_position() as u64,
            message: message.into(),
        }
    }

    fn unterminated(&self, open: &Open<'a>) -> GrampsError {
        self.syntax(format!("unexpected end of document inside <{}>", open.name))
    }
}

/// Hands pending character data to the node.
///
/// Text next to child elements is trimmed, so indentation never binds.
/// Text a node cannot hold is kept as a stray `#text` entry.
fn flush_text<T: Element>(node: &mut T, text: &mut String, adjacent: bool) {
    if text.is_empty() {
        return;
    }
    let segment = if adjacent { text.trim() } else { text.as_str() };
    if !segment.is_empty() && !node.bind_text(segment) {
        stray_text(node.catch_all_mut(), segment, None);
    }
    text.clear();
}

fn stray_text(unparsed: &mut CatchAll, text: &str, group: Option<&str>) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        let mut stray = RawElement::text(trimmed);
        stray.group = group.map(str::to_string);
        unparsed.elements.push(stray);
    }
}
