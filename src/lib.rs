//! Flatlabel: flatten label-named image folders into a labels CSV.
//!
//! Many image classification datasets ship as `train/<label>/<image>.png`.
//! Flatlabel moves every image up into `train/`, removes the label folders,
//! and writes a `file,species` CSV mapping each image to its label.
//!
//! # Modules
//!
//! - [`flatten`]: Directory planning and the flatten operation itself
//! - [`manifest`]: The `file,species` CSV reader and writer
//! - [`error`]: Error types for flatlabel operations

pub mod error;
pub mod flatten;
pub mod manifest;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use error::FlatlabelError;
pub use flatten::{flatten, flatten_with_options, FlattenOptions, FlattenOutcome};

/// The flatlabel CLI application.
#[derive(Parser)]
#[command(name = "flatlabel")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Move images out of label folders and write a labels CSV.
    Flatten(FlattenArgs),
}

/// Arguments for the flatten subcommand.
#[derive(clap::Args)]
struct FlattenArgs {
    /// Training directory whose subdirectories are label names.
    train_path: PathBuf,

    /// Where to write the labels CSV. Nothing happens if it already exists.
    label_path: PathBuf,

    /// Show what would be moved without touching the filesystem.
    #[arg(long)]
    dry_run: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Run the flatlabel CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), FlatlabelError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Flatten(args)) => run_flatten(args),
        None => {
            println!("flatlabel {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Flatten label-named image folders into a labels CSV.");
            println!();
            println!("Run 'flatlabel --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the flatten subcommand.
fn run_flatten(args: FlattenArgs) -> Result<(), FlatlabelError> {
    // Reject a bad --output before anything on disk moves.
    let json = match args.output.as_str() {
        "text" => false,
        "json" => true,
        other => {
            return Err(FlatlabelError::UnsupportedFormat(format!(
                "'{}' (supported: text, json)",
                other
            )));
        }
    };

    let options = FlattenOptions {
        dry_run: args.dry_run,
    };
    let outcome = flatten_with_options(&args.train_path, &args.label_path, &options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", outcome);
    }

    Ok(())
}
