//! File and stream entry points, and the compression framing around them.
//!
//! Gramps stores its XML gzip-compressed. The framing is a [`StreamCodec`]:
//! [`Gzip`] for regular `.gramps` files and [`Plain`] for bare XML. This is
//! the only part of the crate that performs I/O.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use tracing::{debug, info};

use crate::error::{GrampsError, Result};
use crate::schema::Database;
use crate::verify::ensure_fully_parsed;
use crate::xml::{Element, decode, decode_any, encode};

/// Byte-stream framing applied to the XML text on disk.
///
/// Implementations must be deterministic: the same input yields the same
/// output bytes.
pub trait StreamCodec: Send + Sync {
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;

    fn compress(&self, xml: &[u8], out: &mut dyn Write) -> Result<()>;
}

/// Gzip framing with a fixed header (no file name, zero modification time).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gzip {
    /// Compression level, 0 (store) to 9 (best).
    pub level: u32,
}

impl Gzip {
    pub const DEFAULT_LEVEL: u32 = 6;

    pub fn new(level: u32) -> Self {
        Self {
            level: level.min(9),
        }
    }
}

impl Default for Gzip {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LEVEL)
    }
}

impl StreamCodec for Gzip {
    /// Reads every member of the stream, so concatenated gzip files decode whole.
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut xml = Vec::new();
        MultiGzDecoder::new(data)
            .read_to_end(&mut xml)
            .map_err(GrampsError::Decompression)?;
        Ok(xml)
    }

    fn compress(&self, xml: &[u8], out: &mut dyn Write) -> Result<()> {
        let mut encoder = GzEncoder::new(out, Compression::new(self.level));
        encoder.write_all(xml)?;
        encoder.finish()?;
        Ok(())
    }
}

/// No framing: the stream is the XML text itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Plain;

impl StreamCodec for Plain {
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn compress(&self, xml: &[u8], out: &mut dyn Write) -> Result<()> {
        out.write_all(xml)?;
        Ok(())
    }
}

/// Parses and verifies a gzip-compressed `.gramps` file.
pub fn parse(path: impl AsRef<Path>) -> Result<Database> {
    parse_with(path, &Gzip::default())
}

/// Parses and verifies a file using the given framing.
pub fn parse_with(path: impl AsRef<Path>, codec: &dyn StreamCodec) -> Result<Database> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Reading Gramps file");
    let file = File::open(path)?;
    parse_reader(BufReader::new(file), codec)
}

/// Parses and verifies a document read from any byte stream.
///
/// Fails with [`GrampsError::SchemaCoverage`] if any content did not bind
/// to a named field; no partial database is returned.
pub fn parse_reader<R: Read>(reader: R, codec: &dyn StreamCodec) -> Result<Database> {
    let xml = read_all(reader, codec)?;
    let database = decode(&xml)?;
    ensure_fully_parsed(&database)?;
    debug!(
        people = database.persons().len(),
        families = database.families.len(),
        events = database.events.len(),
        sources = database.sources.len(),
        notes = database.notes.len(),
        "Parsed database"
    );
    Ok(database)
}

/// Decodes the root of a gzip-compressed file into any node shape, without
/// the completeness check.
///
/// Useful for pulling a few fields out of a large file:
///
/// ```no_run
/// gramps_xml::gramps_node! {
///     pub struct Header {
///         raw header: Option<gramps_xml::RawElement> = "header",
///     }
/// }
///
/// let header: Header = gramps_xml::unmarshal("family.gramps")?;
/// # Ok::<(), gramps_xml::GrampsError>(())
/// ```
pub fn unmarshal<T: Element>(path: impl AsRef<Path>) -> Result<T> {
    unmarshal_with(path, &Gzip::default())
}

pub fn unmarshal_with<T: Element>(path: impl AsRef<Path>, codec: &dyn StreamCodec) -> Result<T> {
    let file = File::open(path.as_ref())?;
    let xml = read_all(BufReader::new(file), codec)?;
    decode_any(&xml)
}

fn read_all<R: Read>(mut reader: R, codec: &dyn StreamCodec) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    let xml = codec.decompress(&data)?;
    debug!(stored = data.len(), xml = xml.len(), "Read document");
    Ok(xml)
}

impl Database {
    /// Writes the database as a gzip-compressed `.gramps` file.
    pub fn serialize(&self, path: impl AsRef<Path>) -> Result<()> {
        self.serialize_with(path, &Gzip::default())
    }

    /// Writes the database to a file using the given framing.
    pub fn serialize_with(&self, path: impl AsRef<Path>, codec: &dyn StreamCodec) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.serialize_to(&mut writer, codec)?;
        writer.flush()?;
        info!(path = %path.display(), "Wrote Gramps file");
        Ok(())
    }

    /// Writes the database to any byte stream using the given framing.
    pub fn serialize_to<W: Write>(&self, writer: &mut W, codec: &dyn StreamCodec) -> Result<()> {
        let xml = encode(self)?;
        debug!(xml = xml.len(), "Encoded document");
        codec.compress(&xml, writer)
    }
}
