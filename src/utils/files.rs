use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{AssetError, ItemError};

/// Expand a leading `~` or `~/` against the user's home directory
pub fn expand_home(path: &Path) -> PathBuf {
    let Some(raw) = path.to_str() else {
        return path.to_path_buf();
    };

    let rest = if raw == "~" {
        ""
    } else if let Some(rest) = raw.strip_prefix("~/") {
        rest
    } else {
        return path.to_path_buf();
    };

    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

/// Check that a target folder exists and is a directory
pub fn ensure_directory(dir: &Path) -> Result<(), AssetError> {
    match fs::metadata(dir) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(AssetError::NotADirectory(dir.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(AssetError::FolderNotFound(dir.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Create the output directory (and parents) if missing; returns true when it was created
pub fn ensure_output_dir(dir: &Path) -> io::Result<bool> {
    if dir.is_dir() {
        return Ok(false);
    }

    fs::create_dir_all(dir)?;
    debug!(dir = %dir.display(), "created output directory");
    Ok(true)
}

/// Result of scanning one folder
#[derive(Debug, Default)]
pub struct DirListing {
    /// Regular files directly inside the folder, sorted by path
    pub files: Vec<PathBuf>,
    /// Entries that could not be read or inspected. `path` is `None` when the
    /// entry itself could not be read.
    pub unreadable: Vec<(Option<PathBuf>, ItemError)>,
}

/// Scan `dir` once. Subdirectories are dropped; entries whose type cannot be
/// determined are kept in `unreadable` so callers can report them.
pub fn list_files(dir: &Path) -> io::Result<DirListing> {
    let mut listing = DirListing::default();

    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "unreadable directory entry");
                listing.unreadable.push((None, e.into()));
                continue;
            }
        };

        let path = entry.path();
        match fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => listing.files.push(path),
            Ok(_) => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot inspect entry");
                listing.unreadable.push((Some(path), e.into()));
            }
        }
    }

    listing.files.sort();
    Ok(listing)
}

/// Display name for an entry in a report line
pub fn display_name(path: Option<&Path>) -> String {
    path.and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "<unreadable entry>".to_string())
}

/// Whether two paths point at the same file, falling back to a literal comparison
/// when either side does not exist yet
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
