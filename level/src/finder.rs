//! Discovery of battleground descriptions on disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors produced while enumerating level files.
#[derive(Debug, Error)]
pub enum FindLevelError {
    /// The provided root path does not name a directory.
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    /// The directory could not be scanned.
    #[error("failed to scan {}: {source}", .path.display())]
    Scan {
        /// Directory whose scan failed.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
}

/// Name and location of a discovered level file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelEntry {
    name: String,
    path: PathBuf,
}

impl LevelEntry {
    /// Display name of the level, the file stem.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Location of the level file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Enumerates the TOML battleground descriptions inside one directory.
#[derive(Clone, Debug)]
pub struct DirectoryLevelFinder {
    root: PathBuf,
}

impl DirectoryLevelFinder {
    /// Creates a finder rooted at the provided directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, FindLevelError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(FindLevelError::NotADirectory(root));
        }
        Ok(Self { root })
    }

    /// Lists every `.toml` level under the root, sorted by name.
    pub fn all(&self) -> Result<Vec<LevelEntry>, FindLevelError> {
        let scan_failure = |source| FindLevelError::Scan {
            path: self.root.clone(),
            source,
        };

        let mut levels = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(scan_failure)? {
            let path = entry.map_err(scan_failure)?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|extension| extension.to_str()) != Some("toml") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            levels.push(LevelEntry {
                name: name.to_string(),
                path: path.clone(),
            });
        }

        levels.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(levels)
    }
}
