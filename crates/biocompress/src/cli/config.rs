//! The `biocompress config` command for configuration management.

use std::path::Path;

use biocompress_core::config::{
    COMPRESSION_RATIO_KEY, RESIZE_FACTOR_FX_KEY, RESIZE_FACTOR_FY_KEY,
};
use biocompress_core::Config;
use clap::{Args, Subcommand};

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display current configuration
    Show {
        /// Print compressor settings as `--set` property keys instead of TOML
        #[arg(long)]
        keys: bool,
    },

    /// Show config file path
    Path,

    /// Initialize a new config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command.
pub fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show { keys } => {
            let config = Config::load()?;
            if keys {
                print!("{}", property_lines(&config));
            } else {
                println!("{}", config.to_toml()?);
            }
        }

        ConfigCommand::Path => {
            println!("{}", Config::default_path().display());
        }

        ConfigCommand::Init { force } => {
            let path = Config::default_path();
            write_default(&path, force)?;
            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

/// Compressor settings in the flat `key=value` form accepted by `--set`.
fn property_lines(config: &Config) -> String {
    format!(
        "{RESIZE_FACTOR_FX_KEY}={}\n{RESIZE_FACTOR_FY_KEY}={}\n{COMPRESSION_RATIO_KEY}={}\n",
        config.compressor.resize_factor_fx,
        config.compressor.resize_factor_fy,
        config.compressor.compression_ratio,
    )
}

fn write_default(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Config::default().to_toml()?)?;
    Ok(())
}
