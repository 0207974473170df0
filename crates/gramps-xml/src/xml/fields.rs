//! Scalar field bindings for attributes and text-only child elements.

use std::borrow::Cow;
use std::io::Write;
use std::num::ParseIntError;

use crate::error::Result;
use crate::xml::ser::XmlEmitter;

/// A value stored in an attribute.
///
/// `emit` returning `None` means the attribute is left out of the output.
pub trait AttrField {
    fn bind(&mut self, value: &str) -> std::result::Result<(), ParseIntError>;

    fn emit(&self) -> Option<Cow<'_, str>>;
}

/// Required string attributes are always written, even when empty.
impl AttrField for String {
    fn bind(&mut self, value: &str) -> std::result::Result<(), ParseIntError> {
        *self = value.to_string();
        Ok(())
    }

    fn emit(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self))
    }
}

impl AttrField for Option<String> {
    fn bind(&mut self, value: &str) -> std::result::Result<(), ParseIntError> {
        *self = Some(value.to_string());
        Ok(())
    }

    fn emit(&self) -> Option<Cow<'_, str>> {
        self.as_deref().map(Cow::Borrowed)
    }
}

impl AttrField for i32 {
    fn bind(&mut self, value: &str) -> std::result::Result<(), ParseIntError> {
        *self = value.trim().parse()?;
        Ok(())
    }

    fn emit(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Owned(self.to_string()))
    }
}

impl AttrField for Option<i32> {
    fn bind(&mut self, value: &str) -> std::result::Result<(), ParseIntError> {
        *self = Some(value.trim().parse()?);
        Ok(())
    }

    fn emit(&self) -> Option<Cow<'_, str>> {
        self.map(|value| Cow::Owned(value.to_string()))
    }
}

/// An integer flag such as `priv`, `alt` or `active`.
///
/// The value is kept as written, so `priv="2"` and `active="0"` survive a
/// round trip. Absent flags are not written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flag(Option<i32>);

impl Flag {
    pub const SET: Flag = Flag(Some(1));

    /// True when the attribute is present and non-zero.
    pub fn is_set(&self) -> bool {
        self.0.is_some_and(|value| value != 0)
    }

    pub fn raw(&self) -> Option<i32> {
        self.0
    }
}

impl From<bool> for Flag {
    fn from(set: bool) -> Self {
        Flag(set.then_some(1))
    }
}

impl From<Option<i32>> for Flag {
    fn from(raw: Option<i32>) -> Self {
        Flag(raw)
    }
}

impl AttrField for Flag {
    fn bind(&mut self, value: &str) -> std::result::Result<(), ParseIntError> {
        self.0 = Some(value.trim().parse()?);
        Ok(())
    }

    fn emit(&self) -> Option<Cow<'_, str>> {
        self.0.map(|value| Cow::Owned(value.to_string()))
    }
}

/// A value stored as the text of a child element with no attributes.
pub trait TextField {
    fn bind(&mut self, text: String);

    fn emit<W: Write>(&self, tag: &str, out: &mut XmlEmitter<W>) -> Result<()>;
}

/// A required text element is always written, as `<tag></tag>` when empty.
impl TextField for String {
    fn bind(&mut self, text: String) {
        *self = text;
    }

    fn emit<W: Write>(&self, tag: &str, out: &mut XmlEmitter<W>) -> Result<()> {
        out.text_element(tag, self)
    }
}

impl TextField for Option<String> {
    fn bind(&mut self, text: String) {
        *self = Some(text);
    }

    fn emit<W: Write>(&self, tag: &str, out: &mut XmlEmitter<W>) -> Result<()> {
        match self {
            Some(text) => out.text_element(tag, text),
            None => Ok(()),
        }
    }
}
