//! XML codec for the Gramps 1.5.0 dialect.
//!
//! ## Architecture
//!
//! - **Binding**: every schema type is declared with
//!   [`gramps_node!`](crate::gramps_node), one line per attribute or child
//!   element. The macro generates the [`Element`] hooks the codec drives.
//! - **Decoding**: [`XmlDecoder`] reads quick-xml events over the whole
//!   document in memory. Unknown attributes, unknown child elements and stray
//!   text land in the node's [`CatchAll`], child elements sliced byte-for-byte
//!   from the source.
//! - **Encoding**: [`XmlEmitter`] writes fields in declared order, then the
//!   catch-all, one tab of indentation per level.
//!
//! ## Collapsed groups
//!
//! Some collections sit behind a wrapper element that is not modeled:
//!
//! ```xml
//! <events>
//!   <event handle="_e1" id="E0001">...</event>
//! </events>
//! ```
//!
//! binds to `Database::events: Vec<Event>`. Unknown content inside the
//! wrapper is kept in the parent's catch-all, tagged with the wrapper name.

pub mod de;
pub mod fields;
pub mod node;
pub mod ser;
pub mod utils;

pub use de::{Open, XmlDecoder};
pub use fields::{AttrField, Flag, TextField};
pub use node::{CatchAll, Element, Embedded, Node, RawAttribute, RawElement};
pub use ser::XmlEmitter;
pub use utils::{GRAMPS_DOCTYPE, GRAMPS_NAMESPACE};

use crate::error::Result;
use crate::schema::Database;

/// Decodes a Gramps XML document without running the completeness verifier.
///
/// The root must be `<database>` in the Gramps 1.5.0 namespace.
pub fn decode(xml: &[u8]) -> Result<Database> {
    XmlDecoder::new(xml).decode_document(Some(Database::TAG))
}

/// Decodes the root element of any document into `T`, whatever its name.
///
/// Useful with partial shapes that only declare the fields a caller needs.
pub fn decode_any<T: Element>(xml: &[u8]) -> Result<T> {
    XmlDecoder::new(xml).decode_document(None)
}

/// Encodes a database as a complete Gramps XML document.
///
/// The output is deterministic: the same tree always yields the same bytes.
pub fn encode(database: &Database) -> Result<Vec<u8>> {
    let mut out = XmlEmitter::new(Vec::new());
    out.document(Database::TAG, database)?;
    Ok(out.into_inner())
}

/// Encodes a single node as a fragment, without declaration or namespace.
pub fn encode_node<T: Element>(tag: &str, node: &T) -> Result<Vec<u8>> {
    let mut out = XmlEmitter::new(Vec::new());
    out.element(tag, node)?;
    Ok(out.into_inner())
}
