//! Biocompress CLI - shrink face images inside biometric records.
//!
//! Reads a JSON biometric record, compresses every face segment and writes
//! the status envelope as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Compress a record, writing the envelope to stdout
//! biocompress compress record.json
//!
//! # Override the compressor settings for one run
//! biocompress compress record.json -o out.json \
//!     --set bio.image.compressor.resize.factor.fx=0.5 \
//!     --set bio.image.compressor.resize.factor.fy=0.5 \
//!     --set bio.image.compressor.compression.ratio=80
//!
//! # View configuration
//! biocompress config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Biocompress - face biometric record compression.
#[derive(Parser, Debug)]
#[command(name = "biocompress")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compress the face segments of a biometric record
    Compress(cli::compress::CompressArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match biocompress_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `biocompress config path`."
            );
            biocompress_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Biocompress v{}", biocompress_core::VERSION);

    match cli.command {
        Commands::Compress(args) => cli::compress::execute(args, config),
        Commands::Config(args) => cli::config::execute(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_compress_with_overrides() {
        let cli = Cli::try_parse_from([
            "biocompress",
            "--verbose",
            "compress",
            "record.json",
            "--set",
            "a.b=1",
            "--set",
            "c.d=2",
            "--pretty",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Compress(args) => {
                assert_eq!(args.set.len(), 2);
                assert!(args.pretty);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
