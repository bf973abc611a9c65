//! Game archive lookup
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! Game files are addressed by virtual path, `archive-name/relative/path`,
//! for example `Shared/Public/Shared/Lists/SpellLists.lsx`. An
//! [`ArchiveSource`] turns that into a real file on disk. Extraction and
//! conversion happen outside this crate; [`UnpackedArchives`] serves files
//! from a directory where each archive has already been unpacked into a
//! folder named after it.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Resolves virtual game paths to files on disk.
pub trait ArchiveSource {
    /// A filesystem path holding the current, decompressed file content.
    ///
    /// # Errors
    /// Returns an error if the path is malformed or the file does not exist.
    fn get_path(&self, virtual_path: &str) -> Result<PathBuf>;
}

/// A directory of unpacked archives, one sub-directory per archive.
#[derive(Debug, Clone)]
pub struct UnpackedArchives {
    root: PathBuf,
}

impl UnpackedArchives {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a virtual path under the root without touching the filesystem.
    ///
    /// # Errors
    /// Returns [`Error::InvalidVirtualPath`] for empty, absolute, or
    /// parent-relative paths.
    pub fn resolve(&self, virtual_path: &str) -> Result<PathBuf> {
        let invalid = || Error::InvalidVirtualPath(virtual_path.to_string());
        let normalized = virtual_path.replace('\\', "/");
        let relative = Path::new(&normalized);

        if normalized.is_empty() || normalized.starts_with('/') {
            return Err(invalid());
        }
        let mut segments = 0usize;
        for component in relative.components() {
            match component {
                Component::Normal(_) => segments += 1,
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid());
                }
            }
        }
        // An archive name alone does not address a file
        if segments < 2 {
            return Err(invalid());
        }

        Ok(self.root.join(relative))
    }
}

impl ArchiveSource for UnpackedArchives {
    fn get_path(&self, virtual_path: &str) -> Result<PathBuf> {
        let path = self.resolve(virtual_path)?;
        if !path.is_file() {
            return Err(Error::ArchiveFileNotFound {
                virtual_path: virtual_path.to_string(),
                path,
            });
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_resolves_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Shared/Public/Shared/Tags/a.lsx");
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(&file, "<save/>").unwrap();

        let archives = UnpackedArchives::new(dir.path());
        assert_eq!(archives.get_path("Shared/Public/Shared/Tags/a.lsx").unwrap(), file);
        assert_eq!(archives.get_path("Shared\\Public\\Shared\\Tags\\a.lsx").unwrap(), file);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let archives = UnpackedArchives::new(dir.path());
        assert!(matches!(
            archives.get_path("Shared/Public/missing.lsx"),
            Err(Error::ArchiveFileNotFound { .. })
        ));
    }

    #[test]
    fn test_rejects_escaping_paths() {
        let archives = UnpackedArchives::new("/data");
        for bad in ["", "/etc/passwd", "Shared/../../etc/passwd", "Shared", "./Shared"] {
            assert!(
                matches!(archives.resolve(bad), Err(Error::InvalidVirtualPath(_))),
                "{bad}"
            );
        }
    }
}
