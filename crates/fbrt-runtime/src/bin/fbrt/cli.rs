//! CLI definitions for fbrt.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "fbrt",
    version,
    about = "IEC 61499 function block runtime tools",
    after_help = "Examples:\n  fbrt types\n  fbrt describe E_RS\n  fbrt describe STRUCT_MUX_1POINT --config runtime.toml\n  fbrt check --config runtime.toml"
)]
pub struct Cli {
    /// Show debug logging.
    #[arg(long, short, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List registered function block types.
    Types {
        /// Runtime configuration providing user data types.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the interface of a function block type.
    Describe {
        /// Type name, e.g. E_RS or STRUCT_MUX_1POINT.
        type_name: String,
        /// Runtime configuration providing user data types.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Validate a runtime configuration file.
    Check {
        /// Path to runtime.toml.
        #[arg(long)]
        config: PathBuf,
    },
}

impl Command {
    pub fn config_path(&self) -> Option<&Path> {
        match self {
            Self::Types { config } | Self::Describe { config, .. } => config.as_deref(),
            Self::Check { config } => Some(config),
        }
    }
}
