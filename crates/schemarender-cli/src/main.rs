//! schemarender CLI - render schema YAML with Jinja2, deferring descriptions and filters

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;
mod error;
mod exit_codes;

use commands::render::{OutputFormat, RenderArgs};

#[derive(Parser)]
#[command(name = "schemarender")]
#[command(author = "schemarender Contributors")]
#[command(version)]
#[command(about = "Render schema YAML with Jinja2, leaving deferred fields verbatim", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a schema document (or a single resource) to stdout
    Render {
        /// Schema file (YAML, or JSON with a .json extension)
        file: PathBuf,

        /// Variables file(s) to merge, later files win
        #[arg(short = 'f', long = "vars")]
        vars: Vec<PathBuf>,

        /// Set variables on command line (key=value)
        #[arg(long = "set")]
        set: Vec<String>,

        /// Render the whole file as one resource of this category
        #[arg(short, long)]
        category: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
        output: OutputFormat,

        /// Render undefined variables as empty strings instead of failing
        #[arg(long)]
        lenient: bool,

        /// Report every failing entry instead of stopping at the first
        #[arg(long)]
        keep_going: bool,
    },

    /// Show the fields each category leaves unrendered
    Exclusions {
        /// Show a single category
        #[arg(short, long)]
        category: Option<String>,
    },
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_logging(cli.debug);

    let result = match cli.command {
        Commands::Render {
            file,
            vars,
            set,
            category,
            output,
            lenient,
            keep_going,
        } => commands::render::run(RenderArgs {
            file: &file,
            vars_files: &vars,
            set_values: &set,
            category: category.as_deref(),
            output,
            lenient,
            keep_going,
        }),
        Commands::Exclusions { category } => commands::exclusions::run(category.as_deref()),
    };

    if let Err(report) = result {
        eprintln!("{:?}", report);
        std::process::exit(error::exit_code(&report));
    }
}
