// Copyright 2025 The Drasi Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Allow println! in main.rs for CLI user-facing output
#![allow(clippy::print_stdout)]

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use etcd_hydrator::{load_config_file, HydratorSettings, KeyPathResolver, KeyValueStore};

#[derive(Parser)]
#[command(name = "etcd-hydrator")]
#[command(about = "Inspect the etcd keys that configuration structures hydrate from")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the settings file
    #[arg(short, long, default_value = "config/hydrator.yaml", global = true)]
    config: PathBuf,

    /// Override the key folder
    #[arg(long, global = true)]
    folder: Option<String>,

    /// Override the key separator
    #[arg(long, global = true)]
    separator: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the key a field chain hydrates from
    Key {
        /// Field names from the outermost aggregate down, each optionally
        /// `name=key` to give its key override
        #[arg(required = true)]
        fields: Vec<String>,
    },

    /// Fetch the raw value a field chain hydrates from
    Get {
        /// Field names from the outermost aggregate down, each optionally
        /// `name=key` to give its key override
        #[arg(required = true)]
        fields: Vec<String>,
    },

    /// Validate a settings file, with any --folder/--separator overrides applied
    Validate {
        /// Show the resolved settings with environment variables expanded
        #[arg(long)]
        show_resolved: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(config_dir) = cli.config.parent() {
        let env_file = config_dir.join(".env");
        if env_file.exists() {
            if let Err(e) = dotenvy::from_path(&env_file) {
                eprintln!("Warning: Failed to load .env file: {e}");
            }
        }
    }

    match cli.command {
        Commands::Validate { show_resolved } => {
            validate_config(&cli.config, show_resolved, cli.folder, cli.separator)
        }
        Commands::Key { fields } => {
            let settings = load_settings(&cli.config, cli.folder, cli.separator)?;
            init_logging(&settings.log_level);
            println!("{}", resolve_key(&settings.resolver(), &fields)?);
            Ok(())
        }
        Commands::Get { fields } => {
            let settings = load_settings(&cli.config, cli.folder, cli.separator)?;
            init_logging(&settings.log_level);
            fetch_value(&settings, &fields).await
        }
    }
}

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load settings, falling back to defaults when the file does not exist
fn load_settings(
    path: &Path,
    folder: Option<String>,
    separator: Option<String>,
) -> Result<HydratorSettings> {
    let settings = if path.exists() {
        load_config_file(path)?
    } else {
        HydratorSettings::default()
    };

    apply_overrides(settings, folder, separator)
}

/// Apply command line overrides and validate the result
fn apply_overrides(
    mut settings: HydratorSettings,
    folder: Option<String>,
    separator: Option<String>,
) -> Result<HydratorSettings> {
    if let Some(folder) = folder {
        settings.folder = folder;
    }
    if let Some(separator) = separator {
        settings.separator = separator;
    }

    settings.validate()?;
    Ok(settings)
}

/// Split `name=key` into a field name and its key override
fn parse_field(field: &str) -> (&str, Option<&str>) {
    match field.split_once('=') {
        Some((name, key)) => (name, Some(key)),
        None => (field, None),
    }
}

fn resolve_key(resolver: &KeyPathResolver, fields: &[String]) -> Result<String> {
    let chain: Vec<_> = fields.iter().map(|f| parse_field(f)).collect();

    resolver
        .resolve_chain(&chain)
        .ok_or_else(|| anyhow!("At least one field name is required"))
}

async fn fetch_value(settings: &HydratorSettings, fields: &[String]) -> Result<()> {
    let hydrator = settings.build_hydrator()?;
    let key = resolve_key(hydrator.resolver(), fields)?;
    info!("Fetching key '{key}'");

    match hydrator.store().get(&key).await? {
        Some(value) => {
            println!("{value}");
            Ok(())
        }
        None => {
            eprintln!("Key '{key}' not found");
            std::process::exit(1);
        }
    }
}

fn validate_config(
    config_path: &Path,
    show_resolved: bool,
    folder: Option<String>,
    separator: Option<String>,
) -> Result<()> {
    println!("Validating settings: {}", config_path.display());
    println!();

    if !config_path.exists() {
        println!(
            "[ERROR] Settings file not found: {}",
            config_path.display()
        );
        std::process::exit(1);
    }

    let loaded = load_config_file(config_path)
        .map_err(anyhow::Error::from)
        .and_then(|settings| apply_overrides(settings, folder, separator));

    match loaded {
        Ok(settings) => {
            init_logging(&settings.log_level);
            println!("[OK] Settings file is valid");
            debug!("Resolved settings: {settings:?}");

            if show_resolved {
                println!();
                println!("Resolved settings:");
                println!("  Endpoints: {}", settings.endpoints.join(", "));
                println!("  Folder: {}", settings.folder);
                println!("  Separator: {}", settings.separator);
                println!("  Strict: {}", settings.strict);
                println!("  Debug: {}", settings.debug);
                println!("  Timeout: {}ms", settings.timeout_ms);
            }

            Ok(())
        }
        Err(e) => {
            println!("[ERROR] Settings are invalid:");
            println!("  {e}");
            std::process::exit(1);
        }
    }
}
