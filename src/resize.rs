use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::debug;

use crate::error::{AssetError, ItemError};
use crate::report::RunReport;
use crate::utils::files;
use crate::utils::images::{self, ResizeMode};

/// Name of the folder created inside the target folder
pub const OUTPUT_DIR_NAME: &str = "resized";

/// Resize parameters
#[derive(Debug, Clone)]
pub struct ResizeConfig {
    /// Folder with the source images (not recursive)
    pub dir: PathBuf,
    pub width: u32,
    pub height: u32,
    pub mode: ResizeMode,
    /// Worker threads; 1 processes files on the calling thread
    pub threads: usize,
}

impl ResizeConfig {
    pub fn output_dir(&self) -> PathBuf {
        self.dir.join(OUTPUT_DIR_NAME)
    }
}

/// Supported images directly inside `dir`, plus image entries that could not be
/// inspected. The output folder and anything else is skipped silently.
fn collect_images(dir: &Path) -> Result<(Vec<PathBuf>, Vec<(String, ItemError)>), AssetError> {
    let listing = files::list_files(dir)?;

    let images = listing
        .files
        .into_iter()
        .filter(|path| {
            path.file_name().map_or(false, |name| name != OUTPUT_DIR_NAME)
                && images::is_supported_image(path)
        })
        .collect();

    let unreadable = listing
        .unreadable
        .into_iter()
        .filter(|(path, _)| path.as_deref().map_or(true, images::is_supported_image))
        .map(|(path, error)| (files::display_name(path.as_deref()), error))
        .collect();

    Ok((images, unreadable))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Write a resized copy of every supported image into `<dir>/resized`
pub fn resize_images(config: &ResizeConfig) -> Result<RunReport, AssetError> {
    files::ensure_directory(&config.dir)?;

    // Created once, before any worker can race on it
    let output_dir = config.output_dir();
    if files::ensure_output_dir(&output_dir)? {
        println!("Created output folder: {}", output_dir.display());
    }

    let (sources, unreadable) = collect_images(&config.dir)?;
    println!("Processing images in: {}...", config.dir.display());
    debug!(
        count = sources.len(),
        width = config.width,
        height = config.height,
        mode = ?config.mode,
        threads = config.threads,
        "resizing"
    );

    let bounds = (config.width, config.height);
    let pb = ProgressBar::new(sources.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let resize_one = |source: &PathBuf| -> (String, Result<(u32, u32), ItemError>) {
        let name = file_name(source);
        let result = images::resize_image(source, &output_dir.join(&name), bounds, config.mode);
        pb.inc(1);
        (name, result)
    };

    let results: Vec<_> = if config.threads > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()?;
        pool.install(|| sources.par_iter().map(resize_one).collect())
    } else {
        sources.iter().map(resize_one).collect()
    };

    pb.finish_and_clear();

    let mut report = RunReport::default();
    for (name, error) in unreadable {
        eprintln!("  [ERROR] {}: {}", name, error);
        report.record_failure(name, error);
    }

    for (name, result) in results {
        match result {
            Ok((width, height)) => {
                println!("  [OK] {}", name);
                debug!(file = %name, width, height, "resized");
                report.record_success();
            }
            Err(e) => {
                eprintln!("  [ERROR] {}: {}", name, e);
                report.record_failure(name, e);
            }
        }
    }

    println!("Done! Processed {} images.", report.processed);
    println!("New images are located in: {}", output_dir.display());

    Ok(report)
}
