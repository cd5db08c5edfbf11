use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::thread;
use tracing::Level;

mod error;
mod normalize;
mod rename;
mod report;
mod resize;
mod utils;

use normalize::NormalizeConfig;
use rename::RenameConfig;
use resize::ResizeConfig;
use utils::files::expand_home;
use utils::images::ResizeMode;

const DEFAULT_RENAME_DIR: &str = "~/Website_Projects/elzalive/assets/images/restoration-projects";
const DEFAULT_RESIZE_DIR: &str = "assets/images/encaustic-paintings";

/// Maintenance tools for a static website's image assets
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Print debug diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replace spaces with hyphens in the file names of a folder
    Rename {
        /// Folder whose files should be renamed
        #[arg(default_value = DEFAULT_RENAME_DIR)]
        dir: PathBuf,

        /// Show what would be renamed without touching anything
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Write resized copies of every image in a folder into <folder>/resized
    Resize {
        /// Folder with the source images
        #[arg(default_value = DEFAULT_RESIZE_DIR)]
        dir: PathBuf,

        /// Target width in pixels
        #[arg(long, default_value_t = 800, value_parser = clap::value_parser!(u32).range(1..))]
        width: u32,

        /// Target height in pixels
        #[arg(long, default_value_t = 600, value_parser = clap::value_parser!(u32).range(1..))]
        height: u32,

        /// How to fit images into the width x height box
        #[arg(short, long, value_enum, default_value_t = ResizeMode::FitWithin)]
        mode: ResizeMode,

        /// Number of threads to use for resizing (defaults to number of CPU cores)
        #[arg(short, long, default_value_t = thread::available_parallelism().map_or(1, |p| p.get()))]
        threads: usize,
    },
    /// Lowercase one field of every object in a JSON array file
    Lowercase {
        /// JSON file to read
        #[arg(short, long, default_value = "encaustic.json")]
        input: PathBuf,

        /// JSON file to write
        #[arg(short, long, default_value = "encaustic_lower.json")]
        output: PathBuf,

        /// Field whose value gets lowercased
        #[arg(short, long, default_value = "src")]
        field: String,
    },
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Rename { dir, dry_run } => {
            let config = RenameConfig {
                dir: expand_home(&dir),
                dry_run,
            };

            let report = rename::rename_files(&config)
                .with_context(|| format!("Error accessing folder {}", config.dir.display()))?;

            if !dry_run {
                report.print_summary("files");
            }
        }
        Commands::Resize {
            dir,
            width,
            height,
            mode,
            threads,
        } => {
            let config = ResizeConfig {
                dir: expand_home(&dir),
                width,
                height,
                mode,
                threads: threads.max(1),
            };

            let report = resize::resize_images(&config)
                .with_context(|| format!("Error resizing images in {}", config.dir.display()))?;

            report.print_summary("images");
        }
        Commands::Lowercase {
            input,
            output,
            field,
        } => {
            let config = NormalizeConfig {
                input: expand_home(&input),
                output: expand_home(&output),
                field,
            };

            let summary = normalize::normalize_file(&config)
                .with_context(|| format!("Error normalizing {}", config.input.display()))?;

            println!(
                "Lowercased \"{}\" in {} of {} entries",
                config.field, summary.changed, summary.elements
            );
            println!("Written to: {}", config.output.display());
        }
    }

    Ok(())
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args.command) {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}
