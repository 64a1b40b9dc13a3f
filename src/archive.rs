// ABOUTME: Packages an application directory into an uploadable zip archive.
// ABOUTME: Existing .zip/.jar/.war files are uploaded as-is.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempPath;
use walkdir::{DirEntry, WalkDir};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

/// Names never included in an uploaded archive, at any depth.
const IGNORED_NAMES: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "_darcs",
    ".DS_Store",
    ".cfignore",
    ".gitignore",
];

/// Excluded only at the root of the application directory.
const IGNORED_AT_ROOT: &[&str] = &["manifest.yml"];

const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "jar", "war"];

/// Errors from packaging the application source.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("application path not found: {0}")]
    NotFound(PathBuf),

    #[error("{0} is neither a directory nor a zip archive")]
    NotAnArchive(PathBuf),

    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("failed to write archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error while packaging: {0}")]
    Io(#[from] io::Error),
}

/// A zip file ready for upload.
///
/// When the archive was built from a directory it lives in a temp file that
/// is deleted when the `Archive` is dropped.
#[derive(Debug)]
pub struct Archive {
    path: PathBuf,
    temp: Option<TempPath>,
}

impl Archive {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the archive was produced from a directory (and is temporary).
    pub fn is_generated(&self) -> bool {
        self.temp.is_some()
    }
}

/// Turn an application path into an uploadable archive.
///
/// # Errors
///
/// Returns `ArchiveError::NotFound` when `source` does not exist and
/// `ArchiveError::NotAnArchive` for plain files that are not zips.
pub fn package_source(source: &Path) -> Result<Archive, ArchiveError> {
    if !source.exists() {
        return Err(ArchiveError::NotFound(source.to_path_buf()));
    }

    if source.is_file() {
        let is_archive = source
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| ARCHIVE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
        if !is_archive {
            return Err(ArchiveError::NotAnArchive(source.to_path_buf()));
        }
        return Ok(Archive {
            path: source.to_path_buf(),
            temp: None,
        });
    }

    zip_directory(source)
}

fn zip_directory(dir: &Path) -> Result<Archive, ArchiveError> {
    let temp = tempfile::Builder::new()
        .prefix("v3push-")
        .suffix(".zip")
        .tempfile()?;

    let mut writer = zip::ZipWriter::new(temp.as_file());
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored(e));

    let mut files = 0usize;
    for entry in walker {
        let entry = entry.map_err(|source| ArchiveError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let Ok(relative) = entry.path().strip_prefix(dir) else {
            continue;
        };
        let name = archive_name(relative);
        let options = file_options(&entry)?;

        if entry.file_type().is_dir() {
            writer.add_directory(format!("{name}/"), options)?;
        } else if entry.file_type().is_file() {
            writer.start_file(name, options)?;
            let mut file = File::open(entry.path())?;
            io::copy(&mut file, &mut writer)?;
            files += 1;
        }
    }
    writer.finish()?;

    tracing::debug!(dir = %dir.display(), files, "packaged application directory");

    Ok(Archive {
        path: temp.path().to_path_buf(),
        temp: Some(temp.into_temp_path()),
    })
}

fn is_ignored(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    IGNORED_NAMES.contains(&name.as_ref())
        || (entry.depth() == 1 && IGNORED_AT_ROOT.contains(&name.as_ref()))
}

/// Zip entry names always use forward slashes.
fn archive_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn file_options(entry: &DirEntry) -> Result<SimpleFileOptions, ArchiveError> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = entry
            .metadata()
            .map_err(|source| ArchiveError::Walk {
                path: entry.path().to_path_buf(),
                source,
            })?
            .permissions()
            .mode();
        Ok(options.unix_permissions(mode))
    }

    #[cfg(not(unix))]
    {
        let _ = entry;
        Ok(options)
    }
}
