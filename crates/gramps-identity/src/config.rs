//! Command line configuration for the identity tool.
//!
//! Every flag can also be set through the environment.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GRAMPS_INPUT` | | File to read |
//! | `GRAMPS_OUTPUT` | | File to write; omit to only parse and verify |
//! | `GRAMPS_LOG_LEVEL` | info | Log level |
//! | `GRAMPS_COMPRESSION_LEVEL` | 6 | Gzip level of the output (0-9) |
//! | `GRAMPS_UNCOMPRESSED` | false | Read and write plain XML |

use std::path::PathBuf;

use clap::Parser;
use gramps_xml::{Gzip, Plain, StreamCodec};

#[derive(Debug, Clone, Parser)]
#[command(name = "gramps-identity")]
#[command(about = "Reads a Gramps XML file and writes it back out unchanged")]
pub struct IdentityConfig {
    /// Gramps file to read.
    #[arg(long = "in", env = "GRAMPS_INPUT")]
    pub input: PathBuf,

    /// Where to write the re-encoded file.
    #[arg(long = "out", env = "GRAMPS_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "GRAMPS_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Gzip compression level of the output.
    #[arg(long, env = "GRAMPS_COMPRESSION_LEVEL", default_value = "6")]
    pub compression_level: u32,

    /// Treat both files as plain XML instead of gzip.
    #[arg(long, env = "GRAMPS_UNCOMPRESSED", default_value = "false")]
    pub uncompressed: bool,
}

impl IdentityConfig {
    /// Checks the configuration, returning every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.compression_level > 9 {
            errors.push(format!(
                "Compression level must be between 0 and 9, got {}",
                self.compression_level
            ));
        }

        if !matches!(
            self.log_level.to_ascii_lowercase().as_str(),
            "error" | "warn" | "info" | "debug" | "trace"
        ) {
            errors.push(format!("Unknown log level '{}'", self.log_level));
        }

        if self.output.as_ref() == Some(&self.input) {
            errors.push("Output must not overwrite the input file".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// The framing for both reading and writing.
    pub fn codec(&self) -> Box<dyn StreamCodec> {
        if self.uncompressed {
            Box::new(Plain)
        } else {
            Box::new(Gzip::new(self.compression_level))
        }
    }
}
