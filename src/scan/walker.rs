use std::path::{Path, PathBuf};
use log::{debug, warn};
use walkdir::{DirEntry, WalkDir};
use crate::Result;

/// Names that are never traversed, wherever they appear below the root.
pub const DENY_LIST: &[&str] = &["$RECYCLE.BIN", "System Volume Information", ".Trashes"];

pub struct FileWalker;

impl FileWalker {
    /// Returns every regular file below `root`, depth-first and sorted by name
    /// within each directory.
    ///
    /// Deny-listed entries are pruned together with their contents. Symlinks
    /// and special files are skipped with a warning. Any read failure,
    /// including one in a nested directory, is returned as an error.
    pub fn walk(root: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let root = root.as_ref();
        let root = std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());

        let mut files = Vec::new();
        let walker = WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_denied(e));

        for entry in walker {
            let entry = entry?;
            let file_type = entry.file_type();
            if file_type.is_file() {
                files.push(entry.into_path());
            } else if file_type.is_dir() {
                debug!("Scanning {}", entry.path().display());
            } else if file_type.is_symlink() {
                warn!("Skipping symbolic link: {}", entry.path().display());
            } else {
                warn!("Skipping special file: {}", entry.path().display());
            }
        }

        Ok(files)
    }
}

fn is_denied(entry: &DirEntry) -> bool {
    let denied = entry
        .file_name()
        .to_str()
        .map_or(false, |name| DENY_LIST.contains(&name));
    if denied {
        debug!("Skipping reserved entry: {}", entry.path().display());
    }
    denied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OrganizeError;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn lists_nested_files_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        touch(&root.join("b.mp3"));
        touch(&root.join("a/2.flac"));
        touch(&root.join("a/1.mp3"));
        touch(&root.join("a/deeper/3.mp3"));
        fs::create_dir_all(root.join("empty")).unwrap();

        let files = FileWalker::walk(&root).unwrap();

        assert_eq!(
            files,
            vec![
                root.join("a/1.mp3"),
                root.join("a/2.flac"),
                root.join("a/deeper/3.mp3"),
                root.join("b.mp3"),
            ]
        );
    }

    #[test]
    fn prunes_deny_listed_entries_at_any_depth() {
        let dir = tempfile::tempdir().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        touch(&root.join("$RECYCLE.BIN/trashed.mp3"));
        touch(&root.join("music/$RECYCLE.BIN/deep/trashed.mp3"));
        touch(&root.join("music/System Volume Information"));
        touch(&root.join("music/kept.mp3"));

        let files = FileWalker::walk(&root).unwrap();

        assert_eq!(files, vec![root.join("music/kept.mp3")]);
    }

    #[test]
    fn deny_listed_root_is_still_scanned() {
        let dir = tempfile::tempdir().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap().join("$RECYCLE.BIN");
        touch(&root.join("song.mp3"));

        let files = FileWalker::walk(&root).unwrap();

        assert_eq!(files, vec![root.join("song.mp3")]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        let outside = tempfile::tempdir().unwrap();
        touch(&outside.path().join("elsewhere.mp3"));
        touch(&root.join("real.mp3"));
        std::os::unix::fs::symlink(outside.path(), root.join("linked-dir")).unwrap();
        std::os::unix::fs::symlink(root.join("real.mp3"), root.join("linked.mp3")).unwrap();

        let files = FileWalker::walk(&root).unwrap();

        assert_eq!(files, vec![root.join("real.mp3")]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileWalker::walk(dir.path().join("nope")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_is_fatal() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        touch(&root.join("ok.mp3"));
        let locked = root.join("locked");
        touch(&locked.join("hidden.mp3"));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not apply to root, nothing to check then.
        let readable = fs::read_dir(&locked).is_ok();
        let result = FileWalker::walk(&root);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        if !readable {
            assert!(matches!(result, Err(OrganizeError::Walk(_))));
        }
    }
}
