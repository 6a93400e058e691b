mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "roster",
    version,
    about = "Extract duty assignments from service roster PDFs"
)]
struct Cli {
    /// Log pipeline decisions (tables, services, cells) to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract assignment records from a roster PDF
    Extract {
        /// Path to the roster PDF
        input_file: PathBuf,

        /// Column resolution: auto (default), lines or geometric
        #[arg(short, long, default_value = "auto")]
        mode: String,

        /// Custom JSON layout file
        #[arg(short, long, value_name = "FILE", conflicts_with = "preset")]
        layout: Option<PathBuf>,

        /// Predefined layout (default: escala-semanal)
        #[arg(short, long, value_name = "NAME")]
        preset: Option<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write records as JSON to a file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Include the extraction trace (JSON output only)
        #[arg(long)]
        trace: bool,
    },
    /// Inspect and validate layout vocabularies
    Layout {
        #[command(subcommand)]
        action: LayoutAction,
    },
}

#[derive(Subcommand)]
enum LayoutAction {
    /// List predefined layouts
    List,
    /// Print a predefined layout as JSON
    Show {
        /// Preset name (e.g., "escala-semanal")
        preset: String,
    },
    /// Validate a custom layout file
    Validate {
        /// Path to JSON layout file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Commands::Extract {
            input_file,
            mode,
            layout,
            preset,
            output,
            out,
            trace,
        } => commands::extract::run(commands::extract::ExtractArgs {
            input_file,
            mode,
            layout,
            preset,
            output,
            out,
            trace,
        }),
        Commands::Layout { action } => match action {
            LayoutAction::List => commands::layout::list(),
            LayoutAction::Show { preset } => commands::layout::show(&preset),
            LayoutAction::Validate { file } => commands::layout::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
