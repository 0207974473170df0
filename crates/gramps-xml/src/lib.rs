//! # gramps-xml
//!
//! A round-trip-safe codec for the Gramps 1.5.0 XML genealogy format.
//!
//! The dialect carries optional and vendor content that no fixed schema
//! models completely. This crate therefore:
//!
//! - binds every recognized element and attribute to a typed field of the
//!   [`schema`] tree;
//! - captures everything else verbatim in each node's [`CatchAll`], so an
//!   encode reproduces it unchanged;
//! - certifies after a [`parse`] that nothing fell into a catch-all, listing
//!   every offending location otherwise ([`GrampsError::SchemaCoverage`]).
//!
//! ## Quick start
//!
//! ```no_run
//! use gramps_xml::{HasDate, HasHandle};
//!
//! let database = gramps_xml::parse("family.gramps")?;
//! for person in database.persons() {
//!     if let Some(name) = person.preferred_name() {
//!         println!("{} {}", person.handle(), name);
//!     }
//!     for event_ref in &person.event_refs {
//!         if let Some(event) = event_ref.resolve(&database.events) {
//!             println!("  {}", event.date_string());
//!         }
//!     }
//! }
//! database.serialize("family-copy.gramps")?;
//! # Ok::<(), gramps_xml::GrampsError>(())
//! ```
//!
//! ## Layers
//!
//! | Module | Role |
//! |--------|------|
//! | [`schema`] | typed node hierarchy, lookups and capability traits |
//! | [`xml`] | catch-all, binding macro, decoder and encoder |
//! | [`verify`] | completeness verifier |
//! | [`stream`] | file and stream I/O with gzip framing |

pub mod error;
pub mod schema;
pub mod stream;
pub mod verify;
pub mod xml;

pub use error::{GrampsError, Result};
pub use schema::*;
pub use stream::{Gzip, Plain, StreamCodec, parse, parse_reader, parse_with, unmarshal, unmarshal_with};
pub use verify::{ensure_fully_parsed, verify, verify_node};
pub use xml::{
    AttrField, CatchAll, Element, Embedded, Flag, Node, Open, RawAttribute, RawElement, TextField,
    XmlDecoder, XmlEmitter, decode, decode_any, encode, encode_node,
};

#[doc(hidden)]
pub use quick_xml;
