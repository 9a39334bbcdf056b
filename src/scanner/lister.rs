use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_directory: bool,
}

/// Lists a single directory level. Recursion is the caller's job.
///
/// An inaccessible or missing directory must be an error rather than an
/// empty list, so that callers can tell the two apart.
pub trait DirectoryLister {
    fn list(&self, dir: &Path) -> io::Result<Vec<ListedEntry>>;
}

pub struct FsLister;

impl DirectoryLister for FsLister {
    fn list(&self, dir: &Path) -> io::Result<Vec<ListedEntry>> {
        if !std::fs::metadata(dir)?.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", dir.display()),
            ));
        }

        let mut entries = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    log::debug!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };

            let path = entry.path();

            // Entries that can't be stat'ed (broken links, permissions) are skipped.
            let Ok(metadata) = std::fs::metadata(path) else {
                continue;
            };

            entries.push(ListedEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: path.to_path_buf(),
                is_directory: metadata.is_dir(),
            });
        }

        Ok(entries)
    }
}
