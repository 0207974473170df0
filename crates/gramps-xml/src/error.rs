//! Error types for decoding, verifying and encoding Gramps XML.
//!
//! Every error is terminal for the call that produced it: a parse either
//! returns a fully bound, fully verified [`Database`](crate::Database) or
//! nothing at all.
//!
//! | Variant | Raised by |
//! |---------|-----------|
//! | `Io` | opening, reading or writing a file or stream |
//! | `Decompression` | a corrupt gzip container |
//! | `Syntax` | the XML tokenizer (unbalanced tags, bad references, ...) |
//! | `UnexpectedRoot` | a root that is not `database` in the 1.5.0 namespace |
//! | `MalformedValue` | an integer-typed attribute that does not parse |
//! | `SchemaCoverage` | the completeness verifier |

use std::num::ParseIntError;

use thiserror::Error;

/// The error type for every fallible operation in this crate.
#[derive(Error, Debug)]
pub enum GrampsError {
    /// File or stream I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The compressed container could not be inflated.
    #[error("malformed compressed stream: {0}")]
    Decompression(#[source] std::io::Error),

    /// The document is not well-formed XML.
    #[error("XML syntax error at byte {position}: {message}")]
    Syntax { position: u64, message: String },

    /// The root element is not the dialect's `database` element.
    #[error("unexpected root element <{found}> in namespace {namespace:?}, expected <{expected}>")]
    UnexpectedRoot {
        expected: String,
        found: String,
        namespace: String,
    },

    /// An attribute declared as an integer held something else.
    #[error("malformed value {value:?} for attribute `{attribute}` at {path}: {source}")]
    MalformedValue {
        path: String,
        attribute: String,
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// The completeness verifier found content that did not bind to a named field.
    #[error("unparsed content at {} location(s): {}", .paths.len(), .paths.join(", "))]
    SchemaCoverage { paths: Vec<String> },
}

impl GrampsError {
    /// Violation paths carried by a [`GrampsError::SchemaCoverage`], empty otherwise.
    pub fn violations(&self) -> &[String] {
        match self {
            GrampsError::SchemaCoverage { paths } => paths,
            _ => &[],
        }
    }
}

/// Result type alias for Gramps XML operations.
pub type Result<T> = std::result::Result<T, GrampsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_coverage_lists_every_path() {
        let err = GrampsError::SchemaCoverage {
            paths: vec![
                "database.people.person.custom".to_string(),
                "database.tags.tag.@weight".to_string(),
            ],
        };
        let message = err.to_string();
        assert!(message.contains("2 location(s)"));
        assert!(message.contains("database.people.person.custom"));
        assert!(message.contains("database.tags.tag.@weight"));
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn test_malformed_value_keeps_source() {
        let source = "abc".parse::<i32>().unwrap_err();
        let err = GrampsError::MalformedValue {
            path: "database.people.person.name".to_string(),
            attribute: "sort".to_string(),
            value: "abc".to_string(),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("`sort`"));
        assert!(err.violations().is_empty());
    }
}
