//! Node capabilities, the catch-all collection and the binding macro.
//!
//! Every schema type is declared with [`gramps_node!`](crate::gramps_node), which
//! expands a list of one-line bindings into the struct, its decoder hooks, its
//! encoder hooks and the child walk used by the completeness verifier. The
//! declared field order is the emission order.

use std::io::Write;
use std::num::ParseIntError;

use quick_xml::events::BytesStart;

use crate::error::Result;
use crate::xml::de::{Open, XmlDecoder};
use crate::xml::ser::XmlEmitter;

/// An attribute that did not bind to a named field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAttribute {
    pub name: String,
    /// Unescaped value.
    pub value: String,
    /// Grouping element the attribute was found on, if any.
    pub group: Option<String>,
}

impl RawAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            group: None,
        }
    }

    pub fn within(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }
}

/// A child element (or stray text) that did not bind to a named field.
///
/// `raw` is the source text of the whole element, start tag to end tag,
/// exactly as it appeared in the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawElement {
    pub name: String,
    pub raw: String,
    /// Grouping element the child was found in, if any.
    pub group: Option<String>,
}

impl RawElement {
    /// Name used for stray character data.
    pub const TEXT: &'static str = "#text";

    pub fn new(name: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw: raw.into(),
            group: None,
        }
    }

    /// Stray character data, stored escaped so it can be replayed as markup.
    pub fn text(text: &str) -> Self {
        Self::new(Self::TEXT, quick_xml::escape::partial_escape(text).into_owned())
    }

    pub fn within(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    pub fn is_text(&self) -> bool {
        self.name == Self::TEXT
    }
}

/// Everything a node saw in the source that it has no field for, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatchAll {
    pub attributes: Vec<RawAttribute>,
    pub elements: Vec<RawElement>,
}

impl CatchAll {
    /// True when nothing was captured, namespace declarations aside.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
            && self
                .attributes
                .iter()
                .all(|attr| crate::xml::utils::is_namespace_declaration(&attr.name))
    }

    pub(crate) fn attributes_in<'s>(
        &'s self,
        group: Option<&'s str>,
    ) -> impl Iterator<Item = &'s RawAttribute> + 's {
        self.attributes
            .iter()
            .filter(move |attr| attr.group.as_deref() == group)
    }

    pub(crate) fn elements_in<'s>(
        &'s self,
        group: Option<&'s str>,
    ) -> impl Iterator<Item = &'s RawElement> + 's {
        self.elements
            .iter()
            .filter(move |element| element.group.as_deref() == group)
    }
}

/// The object-safe half of a schema node: its catch-all and its typed children.
pub trait Node: Send + Sync {
    fn catch_all(&self) -> &CatchAll;

    /// Calls `visitor` with the element name and value of every node-typed
    /// field, in declaration order. Embedded parts report their children as
    /// if they were declared on this node.
    fn visit_children<'s>(&'s self, visitor: &mut dyn FnMut(&'static str, &'s dyn Node));
}

/// The codec half of a schema node.
pub trait Element: Node + Default {
    fn catch_all_mut(&mut self) -> &mut CatchAll;

    /// Binds an attribute. `Ok(false)` means there is no such field.
    fn bind_attribute(&mut self, name: &str, value: &str) -> std::result::Result<bool, ParseIntError>;

    /// Binds a child element. `Ok(false)` means it belongs in the catch-all;
    /// the decoder captures whatever part of it was not consumed.
    fn bind_child<'a>(
        &mut self,
        de: &mut XmlDecoder<'a>,
        open: &Open<'a>,
        seen: &mut Vec<&'static str>,
    ) -> Result<bool>;

    /// Appends character data. `false` means the node holds no text.
    fn bind_text(&mut self, text: &str) -> bool;

    fn text_content(&self) -> Option<&str>;

    fn encode_attributes(&self, start: &mut BytesStart<'_>);

    fn encode_children<W: Write>(&self, out: &mut XmlEmitter<W>) -> Result<()>;
}

/// A group of fields shared by several node types and inlined into each of them.
pub trait Embedded {
    fn bind_attribute(&mut self, name: &str, value: &str) -> std::result::Result<bool, ParseIntError>;

    fn bind_child<'a>(&mut self, de: &mut XmlDecoder<'a>, open: &Open<'a>) -> Result<bool>;

    fn encode_attributes(&self, start: &mut BytesStart<'_>);

    fn encode_children<W: Write>(&self, out: &mut XmlEmitter<W>) -> Result<()>;

    fn visit<'s>(&'s self, visitor: &mut dyn FnMut(&'static str, &'s dyn Node));
}

/// Declares a schema node.
///
/// Each field is one binding: `<kind> <name>: <type> = "<tag>"`.
///
/// | Kind | Type | Binds |
/// |------|------|-------|
/// | `attr` | `String`, `Option<String>`, `i32`, `Option<i32>`, `Flag` | an attribute |
/// | `text` | `String`, `Option<String>` | a text-only child element |
/// | `one` | `T: Element` | a required child element |
/// | `maybe` | `Option<T>` | an optional child element |
/// | `many` | `Vec<T>` | a repeated child element |
/// | `group` | `Vec<T>`, tag `"wrapper" > "item"` | items inside a collapsed wrapper |
/// | `raw` | `Option<RawElement>` | a child kept verbatim and never audited |
/// | `embed` | `T: Embedded`, no tag | fields inlined from a shared part |
/// | `content` | `String`, no tag | the element's own character data |
///
/// ```
/// gramps_xml::gramps_node! {
///     /// Only the handles of the people in a file.
///     pub struct PersonHandle {
///         attr handle: String = "handle",
///     }
/// }
/// ```
#[macro_export]
macro_rules! gramps_node {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $kind:ident $field:ident : $ty:ty $(= $tag:literal $(> $item:literal)?)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field: $ty,
            )*
            /// Content that did not bind to a named field.
            pub unparsed: $crate::CatchAll,
        }

        impl $crate::Node for $name {
            fn catch_all(&self) -> &$crate::CatchAll {
                &self.unparsed
            }

            #[allow(unused_variables)]
            fn visit_children<'s>(
                &'s self,
                visitor: &mut dyn FnMut(&'static str, &'s dyn $crate::Node),
            ) {
                $( $crate::__gramps_field!(@visit $kind (&self.$field) [$($tag $(> $item)?)?] visitor); )*
            }
        }

        impl $crate::Element for $name {
            fn catch_all_mut(&mut self) -> &mut $crate::CatchAll {
                &mut self.unparsed
            }

            #[allow(unused_variables)]
            fn bind_attribute(
                &mut self,
                name: &str,
                value: &str,
            ) -> ::std::result::Result<bool, ::std::num::ParseIntError> {
                $( $crate::__gramps_field!(@bind_attr $kind (&mut self.$field) [$($tag $(> $item)?)?] name value); )*
                Ok(false)
            }

            #[allow(unused_variables)]
            fn bind_child<'a>(
                &mut self,
                de: &mut $crate::XmlDecoder<'a>,
                open: &$crate::Open<'a>,
                seen: &mut ::std::vec::Vec<&'static str>,
            ) -> $crate::Result<bool> {
                $( $crate::__gramps_field!(@bind_child $kind (&mut self.$field) [$($tag $(> $item)?)?] de open seen (&mut self.unparsed)); )*
                Ok(false)
            }

            #[allow(unused_variables, unreachable_code)]
            fn bind_text(&mut self, text: &str) -> bool {
                $( $crate::__gramps_field!(@bind_text $kind (&mut self.$field) text); )*
                false
            }

            #[allow(unreachable_code)]
            fn text_content(&self) -> ::std::option::Option<&str> {
                $( $crate::__gramps_field!(@text_content $kind (&self.$field)); )*
                None
            }

            #[allow(unused_variables)]
            fn encode_attributes(&self, start: &mut $crate::quick_xml::events::BytesStart<'_>) {
                $( $crate::__gramps_field!(@encode_attr $kind (&self.$field) [$($tag $(> $item)?)?] start); )*
            }

            #[allow(unused_variables)]
            fn encode_children<W: ::std::io::Write>(
                &self,
                out: &mut $crate::XmlEmitter<W>,
            ) -> $crate::Result<()> {
                $( $crate::__gramps_field!(@encode_child $kind (&self.$field) [$($tag $(> $item)?)?] out (&self.unparsed)); )*
                Ok(())
            }
        }
    };
}

/// Expands one operation for one field binding of [`gramps_node!`](crate::gramps_node).
#[doc(hidden)]
#[macro_export]
macro_rules! __gramps_field {
    // Child walk.
    (@visit one ($f:expr) [$tag:literal] $visitor:ident) => {
        $visitor($tag, $f as &dyn $crate::Node);
    };
    (@visit maybe ($f:expr) [$tag:literal] $visitor:ident) => {
        if let Some(child) = $f {
            $visitor($tag, child as &dyn $crate::Node);
        }
    };
    (@visit many ($f:expr) [$tag:literal] $visitor:ident) => {
        for child in $f {
            $visitor($tag, child as &dyn $crate::Node);
        }
    };
    (@visit group ($f:expr) [$tag:literal > $item:literal] $visitor:ident) => {
        for child in $f {
            $visitor(concat!($tag, ".", $item), child as &dyn $crate::Node);
        }
    };
    (@visit embed ($f:expr) [] $visitor:ident) => {
        $crate::Embedded::visit($f, $visitor);
    };
    (@visit $kind:ident $($rest:tt)*) => {};

    // Attributes.
    (@bind_attr attr ($f:expr) [$tag:literal] $name:ident $value:ident) => {
        if $name == $tag {
            $crate::AttrField::bind($f, $value)?;
            return Ok(true);
        }
    };
    (@bind_attr embed ($f:expr) [] $name:ident $value:ident) => {
        if $crate::Embedded::bind_attribute($f, $name, $value)? {
            return Ok(true);
        }
    };
    (@bind_attr $kind:ident $($rest:tt)*) => {};

    // Child elements.
    (@bind_child text ($f:expr) [$tag:literal] $de:ident $open:ident $seen:ident ($u:expr)) => {
        if $open.name == $tag {
            if $seen.contains(&$tag) {
                return Ok(false);
            }
            return match $de.read_text($open)? {
                Some(text) => {
                    $seen.push($tag);
                    $crate::TextField::bind($f, text);
                    Ok(true)
                }
                None => Ok(false),
            };
        }
    };
    (@bind_child one ($f:expr) [$tag:literal] $de:ident $open:ident $seen:ident ($u:expr)) => {
        if $open.name == $tag {
            if $seen.contains(&$tag) {
                return Ok(false);
            }
            $seen.push($tag);
            *$f = $de.decode_element($open)?;
            return Ok(true);
        }
    };
    (@bind_child maybe ($f:expr) [$tag:literal] $de:ident $open:ident $seen:ident ($u:expr)) => {
        if $open.name == $tag {
            if $seen.contains(&$tag) {
                return Ok(false);
            }
            $seen.push($tag);
            *$f = Some($de.decode_element($open)?);
            return Ok(true);
        }
    };
    (@bind_child many ($f:expr) [$tag:literal] $de:ident $open:ident $seen:ident ($u:expr)) => {
        if $open.name == $tag {
            $f.push($de.decode_element($open)?);
            return Ok(true);
        }
    };
    (@bind_child group ($f:expr) [$tag:literal > $item:literal] $de:ident $open:ident $seen:ident ($u:expr)) => {
        if $open.name == $tag {
            $de.decode_group($open, $item, $f, $u)?;
            return Ok(true);
        }
    };
    (@bind_child raw ($f:expr) [$tag:literal] $de:ident $open:ident $seen:ident ($u:expr)) => {
        if $open.name == $tag {
            if $seen.contains(&$tag) {
                return Ok(false);
            }
            $seen.push($tag);
            *$f = Some($de.capture($open)?);
            return Ok(true);
        }
    };
    (@bind_child embed ($f:expr) [] $de:ident $open:ident $seen:ident ($u:expr)) => {
        if $crate::Embedded::bind_child($f, $de, $open)? {
            return Ok(true);
        }
    };
    (@bind_child $kind:ident $($rest:tt)*) => {};

    // Character data.
    (@bind_text content ($f:expr) $text:ident) => {
        $f.push_str($text);
        return true;
    };
    (@bind_text $kind:ident $($rest:tt)*) => {};

    (@text_content content ($f:expr)) => {
        return Some($f.as_str());
    };
    (@text_content $kind:ident $($rest:tt)*) => {};

    // Encoding.
    (@encode_attr attr ($f:expr) [$tag:literal] $start:ident) => {
        if let Some(value) = $crate::AttrField::emit($f) {
            $start.push_attribute(($tag, &*value));
        }
    };
    (@encode_attr embed ($f:expr) [] $start:ident) => {
        $crate::Embedded::encode_attributes($f, $start);
    };
    (@encode_attr $kind:ident $($rest:tt)*) => {};

    (@encode_child text ($f:expr) [$tag:literal] $out:ident ($u:expr)) => {
        $crate::TextField::emit($f, $tag, $out)?;
    };
    (@encode_child one ($f:expr) [$tag:literal] $out:ident ($u:expr)) => {
        $out.element($tag, $f)?;
    };
    (@encode_child maybe ($f:expr) [$tag:literal] $out:ident ($u:expr)) => {
        if let Some(child) = $f {
            $out.element($tag, child)?;
        }
    };
    (@encode_child many ($f:expr) [$tag:literal] $out:ident ($u:expr)) => {
        for child in $f {
            $out.element($tag, child)?;
        }
    };
    (@encode_child group ($f:expr) [$tag:literal > $item:literal] $out:ident ($u:expr)) => {
        $out.group($tag, $item, $f, $u)?;
    };
    (@encode_child raw ($f:expr) [$tag:literal] $out:ident ($u:expr)) => {
        if let Some(raw) = $f {
            $out.raw(raw)?;
        }
    };
    (@encode_child embed ($f:expr) [] $out:ident ($u:expr)) => {
        $crate::Embedded::encode_children($f, $out)?;
    };
    (@encode_child $kind:ident $($rest:tt)*) => {};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catch_all_ignores_namespace_declarations() {
        let mut unparsed = CatchAll::default();
        assert!(unparsed.is_empty());
        unparsed
            .attributes
            .push(RawAttribute::new("xmlns:ext", "urn:example"));
        assert!(unparsed.is_empty());
        unparsed.attributes.push(RawAttribute::new("weight", "3"));
        assert!(!unparsed.is_empty());
    }

    #[test]
    fn test_grouped_entries_are_filtered() {
        let unparsed = CatchAll {
            attributes: vec![],
            elements: vec![
                RawElement::new("a", "<a/>"),
                RawElement::new("b", "<b/>").within("events"),
            ],
        };
        let top: Vec<_> = unparsed.elements_in(None).map(|e| e.name.as_str()).collect();
        let events: Vec<_> = unparsed
            .elements_in(Some("events"))
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(top, vec!["a"]);
        assert_eq!(events, vec!["b"]);
    }

    #[test]
    fn test_stray_text_is_escaped() {
        let text = RawElement::text("a < b & c");
        assert!(text.is_text());
        assert_eq!(text.raw, "a &lt; b &amp; c");
    }
}
