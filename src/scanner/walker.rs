//! Directory walker for candidate discovery.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a source root
//! and collecting every regular file whose extension is in the configured
//! accepted set. Traversal is single-threaded [`walkdir`]; only the hashing
//! phase of the pipeline is parallel.
//!
//! Discovery is all-or-nothing. A traversal error anywhere in the tree
//! fails the whole discovery rather than returning a partial file set,
//! which would make the final "one copy per content" claim silently wrong.
//!
//! # Example
//!
//! ```no_run
//! use picuniq::scanner::Walker;
//! use std::collections::HashSet;
//! use std::path::Path;
//!
//! let exts: HashSet<String> = [".jpg".to_string(), ".png".to_string()].into();
//! let walker = Walker::new(Path::new("/photos"), exts);
//! for file in walker.discover().unwrap() {
//!     println!("{}: {} bytes", file.path.display(), file.size);
//! }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{FileEntry, ScanError};

/// Recursive file discovery under a source root.
///
/// Extension matching is exact and case-sensitive, including the leading
/// dot (`".jpg"` matches `photo.jpg` but not `photo.JPG`). Symlinked
/// directories are not followed.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Accepted extensions, each including the leading dot
    extensions: HashSet<String>,
}

impl Walker {
    /// Create a new walker for the given source root.
    #[must_use]
    pub fn new(root: &Path, extensions: HashSet<String>) -> Self {
        Self {
            root: root.to_path_buf(),
            extensions,
        }
    }

    /// Check whether a path carries one of the accepted extensions.
    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.contains(&format!(".{ext}")))
    }

    /// Collect all matching regular files under the root.
    ///
    /// Order is filesystem traversal order; callers must not depend on it
    /// beyond set membership.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] if the root is missing, not a directory, or
    /// any entry in the tree cannot be read. Partial results are discarded.
    pub fn discover(&self) -> Result<Vec<FileEntry>, ScanError> {
        match std::fs::metadata(&self.root) {
            Ok(meta) if !meta.is_dir() => {
                return Err(ScanError::NotADirectory(self.root.clone()));
            }
            Ok(_) => {}
            Err(e) => return Err(self.root_error(e)),
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = entry.map_err(Self::walk_error)?;

            if !entry.file_type().is_file() {
                continue;
            }
            if !self.matches_extension(entry.path()) {
                log::trace!("Skipping non-matching file: {}", entry.path().display());
                continue;
            }

            let size = entry
                .metadata()
                .map_err(Self::walk_error)?
                .len();
            files.push(FileEntry::new(entry.path().to_path_buf(), size));
        }

        log::debug!(
            "Discovered {} candidate files under {}",
            files.len(),
            self.root.display()
        );
        Ok(files)
    }

    fn root_error(&self, error: std::io::Error) -> ScanError {
        use std::io::ErrorKind;
        match error.kind() {
            ErrorKind::NotFound => ScanError::NotFound(self.root.clone()),
            ErrorKind::PermissionDenied => ScanError::PermissionDenied(self.root.clone()),
            _ => ScanError::Io {
                path: self.root.clone(),
                source: error,
            },
        }
    }

    fn walk_error(error: walkdir::Error) -> ScanError {
        use std::io::ErrorKind;
        let path = error
            .path()
            .map_or_else(PathBuf::new, Path::to_path_buf);
        match error.io_error().map(std::io::Error::kind) {
            Some(ErrorKind::NotFound) => ScanError::NotFound(path),
            Some(ErrorKind::PermissionDenied) => ScanError::PermissionDenied(path),
            _ => ScanError::Io {
                path,
                source: error.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn exts(list: &[&str]) -> HashSet<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    /// Create a test tree with images and a stray text file.
    fn create_test_tree() -> TempDir {
        let dir = TempDir::new().unwrap();

        let mut f = File::create(dir.path().join("cover.jpg")).unwrap();
        f.write_all(b"jpeg bytes").unwrap();

        let sub = dir.path().join("album");
        fs::create_dir(&sub).unwrap();
        let mut f = File::create(sub.join("track.png")).unwrap();
        f.write_all(b"png bytes").unwrap();

        let mut f = File::create(dir.path().join("notes.txt")).unwrap();
        f.write_all(b"not an image").unwrap();

        dir
    }

    #[test]
    fn test_discover_filters_by_extension() {
        let dir = create_test_tree();
        let walker = Walker::new(dir.path(), exts(&[".jpg", ".png"]));

        let files = walker.discover().unwrap();
        let names: HashSet<_> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_str().unwrap().to_string())
            .collect();

        assert_eq!(names, exts(&["cover.jpg", "track.png"]));
    }

    #[test]
    fn test_discover_excludes_non_image_files() {
        let dir = create_test_tree();
        let walker = Walker::new(dir.path(), exts(&[".jpg"]));

        let files = walker.discover().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path.file_name().unwrap(), "cover.jpg");
        assert_eq!(files[0].size, 10);
    }

    #[test]
    fn test_extension_match_is_case_sensitive() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("a.JPG")).unwrap();
        File::create(dir.path().join("b.jpg")).unwrap();

        let walker = Walker::new(dir.path(), exts(&[".jpg"]));
        let files = walker.discover().unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path.file_name().unwrap(), "b.jpg");
    }

    #[test]
    fn test_files_without_extension_are_skipped() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("README")).unwrap();

        let walker = Walker::new(dir.path(), exts(&[".jpg"]));
        assert!(walker.discover().unwrap().is_empty());
    }

    #[test]
    fn test_missing_root_fails_discovery() {
        let walker = Walker::new(Path::new("/nonexistent/path/12345"), exts(&[".jpg"]));

        let err = walker.discover().unwrap_err();
        assert!(matches!(err, ScanError::NotFound(_)));
    }

    #[test]
    fn test_root_that_is_a_file_fails_discovery() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain.jpg");
        File::create(&file).unwrap();

        let walker = Walker::new(&file, exts(&[".jpg"]));
        let err = walker.discover().unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory(_)));
    }

    #[test]
    fn test_empty_tree_yields_empty_set() {
        let dir = TempDir::new().unwrap();
        let walker = Walker::new(dir.path(), exts(&[".jpg"]));
        assert!(walker.discover().unwrap().is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn test_unreadable_subdirectory_fails_whole_discovery() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let readable = dir.path().join("readable");
        fs::create_dir(&readable).unwrap();
        let mut f = File::create(readable.join("ok.jpg")).unwrap();
        f.write_all(b"ok").unwrap();

        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged processes ignore permission bits; nothing to test then
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let walker = Walker::new(dir.path(), exts(&[".jpg"]));
        let result = walker.discover();

        // Restore so TempDir cleanup can remove the tree
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        // No partial file set: the readable half is discarded too
        assert!(matches!(result, Err(ScanError::PermissionDenied(_))));
    }

    #[test]
    #[cfg(unix)]
    fn test_symlinked_directories_are_not_followed() {
        let dir = TempDir::new().unwrap();
        let real = dir.path().join("real");
        fs::create_dir(&real).unwrap();
        let mut f = File::create(real.join("pic.jpg")).unwrap();
        f.write_all(b"pic").unwrap();
        std::os::unix::fs::symlink(&real, dir.path().join("alias")).unwrap();

        let walker = Walker::new(dir.path(), exts(&[".jpg"]));
        let files = walker.discover().unwrap();

        // Only the real path, not the symlinked alias
        assert_eq!(files.len(), 1);
        assert!(files[0].path.starts_with(&real));
    }
}
