use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{AssetError, ItemError, ItemErrorKind};
use crate::report::RunReport;
use crate::utils::files;

/// Rename parameters
#[derive(Debug, Clone)]
pub struct RenameConfig {
    /// Folder whose files get renamed (not recursive)
    pub dir: PathBuf,
    /// Only print what would be renamed
    pub dry_run: bool,
}

/// One file that needs a new name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRename {
    pub from: PathBuf,
    pub to: PathBuf,
    /// Lossy forms of the names, for report lines only
    pub old_name: String,
    pub new_name: String,
}

/// Everything a rename run will touch
#[derive(Debug, Default)]
pub struct RenamePlan {
    pub renames: Vec<PlannedRename>,
    /// Candidates that could not be inspected
    pub unreadable: Vec<(String, ItemError)>,
}

fn has_space(name: &OsStr) -> bool {
    name.as_encoded_bytes().contains(&b' ')
}

/// Replace every space with a hyphen; `None` if the name has no spaces.
/// Works on the raw name so names that are not valid UTF-8 keep their other bytes.
pub fn hyphenate(name: &OsStr) -> Option<OsString> {
    if !has_space(name) {
        return None;
    }

    let bytes: Vec<u8> = name
        .as_encoded_bytes()
        .iter()
        .map(|&b| if b == b' ' { b'-' } else { b })
        .collect();

    // SAFETY: the bytes came from `as_encoded_bytes` and only the ASCII space was
    // swapped for another ASCII byte, which keeps the encoding valid.
    Some(unsafe { OsString::from_encoded_bytes_unchecked(bytes) })
}

/// Collect the renames for every regular file in `dir` whose name contains a space.
/// Sorted by original name so collisions resolve the same way every run.
pub fn plan_renames(dir: &Path) -> Result<RenamePlan, AssetError> {
    files::ensure_directory(dir)?;

    let listing = files::list_files(dir)?;

    let renames = listing
        .files
        .into_iter()
        .filter_map(|path| {
            let new_name = hyphenate(path.file_name()?)?;
            Some(PlannedRename {
                old_name: files::display_name(Some(&path)),
                new_name: new_name.to_string_lossy().into_owned(),
                to: dir.join(&new_name),
                from: path,
            })
        })
        .collect();

    // Only entries that would have been renamed count as failures
    let unreadable = listing
        .unreadable
        .into_iter()
        .filter(|(path, _)| {
            path.as_deref()
                .and_then(Path::file_name)
                .map_or(true, has_space)
        })
        .map(|(path, error)| (files::display_name(path.as_deref()), error))
        .collect();

    Ok(RenamePlan {
        renames,
        unreadable,
    })
}

/// Perform one rename. An existing file at the new name is never overwritten.
///
/// The new name is claimed with a hard link, which fails atomically when the
/// name is taken, and the old name is removed afterwards. Filesystems without
/// hard links fall back to an existence check followed by `fs::rename`; there a
/// file created between the two steps by another process would be replaced.
pub fn apply_rename(plan: &PlannedRename) -> Result<(), ItemError> {
    let taken = || {
        ItemError::new(
            ItemErrorKind::AlreadyExists,
            format!("{} already exists", plan.new_name),
        )
    };

    match fs::hard_link(&plan.from, &plan.to) {
        Ok(()) => {
            if let Err(e) = fs::remove_file(&plan.from) {
                // Undo the link so the file keeps a single name
                let _ = fs::remove_file(&plan.to);
                return Err(e.into());
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(taken()),
        Err(e) => {
            debug!(error = %e, file = %plan.old_name, "hard link failed, renaming in place");
            if plan.to.symlink_metadata().is_ok() {
                return Err(taken());
            }
            fs::rename(&plan.from, &plan.to)?;
            Ok(())
        }
    }
}

/// Rename every file with spaces in its name, continuing past individual failures
pub fn rename_files(config: &RenameConfig) -> Result<RunReport, AssetError> {
    let plan = plan_renames(&config.dir)?;
    debug!(dir = %config.dir.display(), count = plan.renames.len(), "planned renames");

    let mut report = RunReport::default();

    for (name, error) in plan.unreadable {
        eprintln!("Failed to rename {}: {}", name, error);
        report.record_failure(name, error);
    }

    for rename in &plan.renames {
        if config.dry_run {
            println!("Would rename: {} → {}", rename.old_name, rename.new_name);
            continue;
        }

        match apply_rename(rename) {
            Ok(()) => {
                println!("Renamed: {} → {}", rename.old_name, rename.new_name);
                report.record_success();
            }
            Err(e) => {
                eprintln!("Failed to rename {}: {}", rename.old_name, e);
                report.record_failure(rename.old_name.clone(), e);
            }
        }
    }

    Ok(report)
}
