//! gramps-identity
//!
//! Parses a Gramps XML file, certifies that every element and attribute
//! bound to the schema, and writes it back out. Run without `--out` to only
//! check a file.

mod config;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use crate::config::IdentityConfig;

/// Installs the global subscriber. `RUST_LOG` wins over `level`.
fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("gramps_xml={level},gramps_identity={level}"))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

fn run(config: &IdentityConfig) -> anyhow::Result<()> {
    let codec = config.codec();

    let database = gramps_xml::parse_with(&config.input, codec.as_ref())
        .with_context(|| format!("Failed to parse {}", config.input.display()))?;
    info!(
        input = %config.input.display(),
        people = database.persons().len(),
        families = database.families.len(),
        events = database.events.len(),
        "Parsed database"
    );

    let Some(output) = &config.output else {
        info!("No output requested, parse check passed");
        return Ok(());
    };

    database
        .serialize_with(output, codec.as_ref())
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!(output = %output.display(), "Round trip complete");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let config = IdentityConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    run(&config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<database xmlns=\"http://gramps-project.org/xml/1.5.0/\">\n\t<tags>\n\t\t<tag handle=\"_t1\" name=\"ToDo\" color=\"#000000000000\" priority=\"0\" change=\"1\"/>\n\t</tags>\n</database>\n";

    fn config(dir: &std::path::Path, output: Option<&str>) -> IdentityConfig {
        let input = dir.join("in.xml");
        std::fs::write(&input, XML).unwrap();
        IdentityConfig {
            input,
            output: output.map(|name| dir.join(name)),
            log_level: "info".to_string(),
            compression_level: 6,
            uncompressed: true,
        }
    }

    #[test]
    fn test_run_writes_canonical_copy() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), Some("out.xml"));
        run(&config).unwrap();

        let written = std::fs::read_to_string(dir.path().join("out.xml")).unwrap();
        assert!(written.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE database"));
        assert!(written.contains("\n\t\t<tag handle=\"_t1\" name=\"ToDo\""));
    }

    #[test]
    fn test_run_without_output_only_checks() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), None);
        run(&config).unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_run_reports_unparsed_content() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), Some("out.xml"));
        std::fs::write(&config.input, XML.replace("<tags>", "<tags>\n\t\t<palette/>")).unwrap();

        let err = run(&config).unwrap_err();
        let source = err.downcast_ref::<gramps_xml::GrampsError>().unwrap();
        assert_eq!(source.violations(), ["database.tags.palette"]);
        assert!(!dir.path().join("out.xml").exists());
    }
}
