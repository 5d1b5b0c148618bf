//! Viewer Config CLI
//!
//! Inspect, create and check `viewer.toml` files.

use anyhow::Context;
use clap::{Parser, Subcommand};
use schema_viewer::ViewerConfig;

#[derive(Parser)]
#[command(name = "schema-viewer-config")]
#[command(about = "Inspect and create schema viewer configuration")]
struct Cli {
    /// Config file to load (optional)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective settings after files and VIEWER__* overrides
    Show {
        /// Print as TOML instead of a table
        #[arg(long, conflicts_with = "json")]
        toml: bool,

        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Write the default settings to a new file
    Init {
        #[arg(short, long, default_value = "viewer.toml")]
        output: String,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Load the configuration and check the schema directory exists
    Validate,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let load = || ViewerConfig::load_from(cli.config.as_deref()).context("loading configuration");

    match cli.command {
        Commands::Show { toml, json } => {
            let cfg = load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&cfg)?);
            } else if toml {
                print!("{}", ::toml::to_string_pretty(&cfg)?);
            } else {
                print_settings(&cfg);
            }
        }

        Commands::Init { output, force } => {
            if !force && std::path::Path::new(&output).exists() {
                anyhow::bail!("{} already exists (use --force to replace it)", output);
            }
            ViewerConfig::default()
                .save(&output)
                .with_context(|| format!("writing {}", output))?;
            println!("Wrote default configuration to {}", output);
        }

        Commands::Validate => {
            let cfg = load()?;
            let dir = cfg.schema_dir();
            if !dir.is_dir() {
                anyhow::bail!("schema directory {} does not exist", dir.display());
            }
            println!("Configuration is valid; documents load from {}", dir.display());
        }
    }

    Ok(())
}

fn print_settings(cfg: &ViewerConfig) {
    let settings = cfg.settings();
    let width = settings.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    for (key, value) in settings {
        println!("{:<width$}  {}", key, value, width = width);
    }
}
