//! Schema Viewer CLI
//!
//! Renders schema documents as expandable tables in the terminal.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use schema_viewer::{
    demo_store, expand_levels, format_json, CellId, DemoView, DocumentResolver, DocumentStore,
    ExpansionState, FileResolver, OutputFormat, Renderer, Row, ViewerConfig,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-viewer")]
#[command(about = "Render JSON Schema documents as nested, expandable tables")]
struct Cli {
    /// Config file to load (optional)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a document
    Render {
        /// Document id, relative to the schema directory
        document: String,

        /// Schema directory (overrides config)
        #[arg(short = 'd', long)]
        schema_dir: Option<PathBuf>,

        /// Reference cell to expand (repeatable), e.g. "#/properties/owner"
        #[arg(short, long = "expand")]
        expand: Vec<String>,

        /// Expand every reference this many levels deep
        #[arg(long)]
        depth: Option<usize>,

        /// Output format: table or json
        #[arg(short, long)]
        format: Option<String>,

        /// Fail on the first malformed subtree
        #[arg(long)]
        strict: bool,
    },

    /// List the reference cells that can be expanded
    Cells {
        /// Document id, relative to the schema directory
        document: String,

        /// Schema directory (overrides config)
        #[arg(short = 'd', long)]
        schema_dir: Option<PathBuf>,

        /// Cells already expanded (repeatable)
        #[arg(short, long = "expand")]
        expand: Vec<String>,
    },

    /// Walk through the embedded demo schemas
    Demo {
        /// View to show (example, default, array, object, ref, comb)
        #[arg(default_value = "example")]
        view: String,

        /// List the available views
        #[arg(long)]
        list: bool,

        /// Reference cell to expand (repeatable)
        #[arg(short, long = "expand")]
        expand: Vec<String>,

        /// Expand every reference this many levels deep
        #[arg(long)]
        depth: Option<usize>,
    },

    /// Find documents by id or title (fuzzy)
    Search {
        query: String,

        /// Schema directory (overrides config)
        #[arg(short = 'd', long)]
        schema_dir: Option<PathBuf>,

        /// Maximum results
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cfg = ViewerConfig::load_from(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Render {
            document,
            schema_dir,
            expand,
            depth,
            format,
            strict,
        } => {
            let resolver = FileResolver::new(schema_dir.unwrap_or_else(|| cfg.schema_dir()));
            let root = resolver.resolve(&document)?.into_owned();

            let mut state = initial_state(&expand);
            expand_levels(
                &resolver,
                &root,
                &document,
                &mut state,
                depth.unwrap_or(cfg.render.expand_depth),
            );

            let renderer = Renderer::new(&resolver, &state);
            let rows = if strict || cfg.render.strict {
                renderer.try_render(&root, &document)?
            } else {
                renderer.render(&root, &document)
            };

            let format = match format.as_deref() {
                None => cfg.output.format,
                Some("table") => OutputFormat::Table,
                Some("json") => OutputFormat::Json,
                Some(other) => anyhow::bail!("Invalid format '{}'. Use 'table' or 'json'", other),
            };
            print_rows(&rows, &cfg, format)?;
        }

        Commands::Cells {
            document,
            schema_dir,
            expand,
        } => {
            let resolver = FileResolver::new(schema_dir.unwrap_or_else(|| cfg.schema_dir()));
            let root = resolver.resolve(&document)?.into_owned();
            let state = initial_state(&expand);

            let cells = Renderer::new(&resolver, &state).reference_cells(&root, &document);
            if cells.is_empty() {
                println!("No collapsed references in {}", document);
            }
            for cell in cells {
                println!("{}", cell);
            }
        }

        Commands::Demo {
            view,
            list,
            expand,
            depth,
        } => {
            if list {
                for view in DemoView::all() {
                    println!("{:<8} {} - {}", view.key(), view.heading(), view.blurb());
                }
                return Ok(());
            }

            let view = DemoView::find(&view)?;
            let store = demo_store()?;

            println!("## {}", view.heading());
            println!("{}\n", view.blurb());

            for id in view.documents() {
                let root = store.resolve(id)?.into_owned();
                let mut state = initial_state(&expand);
                expand_levels(&store, &root, id, &mut state, depth.unwrap_or(cfg.render.expand_depth));

                let rows = Renderer::new(&store, &state).render(&root, id);
                println!("### {}", id);
                print_rows(&rows, &cfg, cfg.output.format)?;
                println!();
            }
        }

        Commands::Search {
            query,
            schema_dir,
            limit,
        } => {
            let dir = schema_dir.unwrap_or_else(|| cfg.schema_dir());
            let store = DocumentStore::from_directory(&dir, &cfg.load_config())?;

            let results = store.search(&query, limit);
            if results.is_empty() {
                println!("No documents match '{}'", query);
            }
            for hit in results {
                match hit.title {
                    Some(title) => println!("{:>4}  {}  ({})", hit.score, hit.id, title),
                    None => println!("{:>4}  {}", hit.score, hit.id),
                }
            }
        }
    }

    Ok(())
}

fn initial_state(expand: &[String]) -> ExpansionState {
    expand.iter().map(|c| CellId::from(c.as_str())).collect()
}

fn print_rows(rows: &[Row], cfg: &ViewerConfig, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => print!("{}", cfg.formatter().format(rows)),
        OutputFormat::Json => println!("{}", format_json(rows)?),
    }
    Ok(())
}
