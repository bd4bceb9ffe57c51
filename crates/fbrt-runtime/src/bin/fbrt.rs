//! CLI entrypoint for the function block runtime.

#[path = "fbrt/cli.rs"]
mod cli;
#[path = "fbrt/style.rs"]
mod style;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use fbrt_runtime::{logging, Resource, RuntimeConfig, TypeLibrary};
use fbrt_types::StringDictionary;
use tracing::Level;

use cli::{Cli, Command};

fn main() {
    if let Err(err) = run() {
        eprintln!("{}", style::error(format!("Error: {err:#}")));
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli
        .command
        .config_path()
        .map(|path| {
            RuntimeConfig::load(path).with_context(|| format!("load {}", path.display()))
        })
        .transpose()?;
    let level = match (&config, cli.verbose) {
        (_, true) => Level::DEBUG,
        (Some(config), false) => config.log_level,
        (None, false) => Level::WARN,
    };
    logging::init(level);

    let resource = config.as_ref().map(Resource::from_config).transpose()?;
    let library = match &resource {
        Some(resource) => Arc::clone(resource.library()),
        None => Arc::new(TypeLibrary::standard(StringDictionary::shared())),
    };
    match cli.command {
        Command::Types { .. } => {
            for name in library.fb_type_names() {
                println!("{}", style::accent(name));
            }
        }
        Command::Describe { type_name, .. } => {
            let spec = library
                .interface_of(&type_name)
                .with_context(|| format!("describe {type_name}"))?;
            println!("{}", style::accent(&type_name));
            print!("{}", spec.describe(library.dictionary()));
        }
        Command::Check { .. } => {
            let (Some(config), Some(resource)) = (&config, &resource) else {
                anyhow::bail!("check needs --config");
            };
            println!(
                "{}",
                style::success(format!(
                    "resource '{}': {} struct type(s), {} array type(s)",
                    resource.name(),
                    config.structs.len(),
                    config.arrays.len()
                ))
            );
        }
    }
    Ok(())
}
