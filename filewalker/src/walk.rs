// SPDX-FileCopyrightText: Copyright © 2020-2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

use std::{
    ffi::OsStr,
    io,
    path::{Path, PathBuf},
};

use fs_err as fs;
use jwalk::{Parallelism, WalkDir};
use thiserror::Error;
use tracing::{debug, trace};

/// A regular file, or a symlink not pointing at a directory, discovered while walking a root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Directory containing the file, as walked (prefixed by the root)
    pub dir: PathBuf,
    pub file_name: String,
    pub extension: String,
}

impl FileEntry {
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

/// Recursively collect every file under `root` whose extension is `extension`
///
/// The walk is serial, depth first and sorted by file name within each
/// directory, so an unchanged tree always yields the same order. Hidden
/// files and symlinked files are included, symlinked directories are not
/// descended into. Any unreadable directory fails the whole walk.
#[tracing::instrument(level = "debug", skip(root), fields(root = %root.display()))]
pub fn files(root: &Path, extension: &str) -> Result<Vec<FileEntry>, Error> {
    let meta = fs::metadata(root).map_err(|source| Error::Root {
        path: root.to_owned(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(Error::NotADirectory(root.to_owned()));
    }

    let walk = WalkDir::new(root)
        .parallelism(Parallelism::Serial)
        .sort(true)
        .skip_hidden(false)
        .follow_links(false);

    let mut entries = vec![];

    for entry in walk {
        let mut entry = entry.map_err(|source| Error::Walk {
            root: root.to_owned(),
            source,
        })?;

        // jwalk yields unreadable directories as `Ok` and stashes the failure
        if let Some(source) = entry.read_children_error.take() {
            return Err(Error::Walk {
                root: root.to_owned(),
                source,
            });
        }

        let file_type = entry.file_type();
        if !file_type.is_file() && !file_type.is_symlink() {
            continue;
        }

        let file_name = entry.file_name();
        if !has_extension(file_name, extension) {
            trace!(path = %entry.path().display(), "Skipping");
            continue;
        }

        if file_type.is_symlink() && points_to_dir(&entry.path())? {
            continue;
        }

        let file_name = file_name
            .to_str()
            .ok_or_else(|| Error::NonUtf8Name(entry.path()))?
            .to_owned();

        entries.push(FileEntry {
            dir: entry.parent_path().to_path_buf(),
            file_name,
            extension: extension.to_owned(),
        });
    }

    debug!(count = entries.len(), "Walk complete");

    Ok(entries)
}

/// Name ends in `.<extension>`, so a file named just `.hpp` matches too
fn has_extension(file_name: &OsStr, extension: &str) -> bool {
    file_name.to_string_lossy().ends_with(&format!(".{extension}"))
}

/// Symlinked directories are neither descended into nor listed.
/// Dangling links are listed like any other file.
fn points_to_dir(path: &Path) -> Result<bool, Error> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.is_dir()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(Error::Stat {
            path: path.to_owned(),
            source,
        }),
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("reading root {path:?}")]
    Root { path: PathBuf, source: io::Error },
    #[error("root is not a directory: {0:?}")]
    NotADirectory(PathBuf),
    #[error("walking {root:?}")]
    Walk { root: PathBuf, source: jwalk::Error },
    #[error("reading metadata of {path:?}")]
    Stat { path: PathBuf, source: io::Error },
    #[error("non-utf8 file name: {0:?}")]
    NonUtf8Name(PathBuf),
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn names(entries: &[FileEntry], root: &Path) -> Vec<String> {
        entries
            .iter()
            .map(|e| e.path().strip_prefix(root).unwrap().to_str().unwrap().to_owned())
            .collect()
    }

    #[test]
    fn test_filters_by_extension() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a.hpp");
        touch(temp.path(), "a.cpp");
        touch(temp.path(), "notes.txt");
        touch(temp.path(), "sub/b.hpp");
        touch(temp.path(), "sub/b.hpp.orig");

        let entries = files(temp.path(), "hpp").unwrap();

        assert_eq!(names(&entries, temp.path()), vec!["a.hpp", "sub/b.hpp"]);
        assert!(entries.iter().all(|e| e.extension == "hpp"));
    }

    #[test]
    fn test_directory_is_never_an_entry() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("dir.hpp")).unwrap();
        touch(temp.path(), "dir.hpp/inner.hpp");

        let entries = files(temp.path(), "hpp").unwrap();

        assert_eq!(names(&entries, temp.path()), vec!["dir.hpp/inner.hpp"]);
    }

    #[test]
    fn test_includes_hidden_files() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), ".hidden/x.cpp");

        let entries = files(temp.path(), "cpp").unwrap();

        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_order_is_stable() {
        let temp = TempDir::new().unwrap();
        for name in ["z.cpp", "m/k.cpp", "a.cpp", "m/a.cpp", "b/c/d.cpp"] {
            touch(temp.path(), name);
        }

        let first = files(temp.path(), "cpp").unwrap();
        let second = files(temp.path(), "cpp").unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_entry_dir_is_prefixed_by_root() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "top.hpp");
        touch(temp.path(), "nested/inner.hpp");

        let entries = files(temp.path(), "hpp").unwrap();

        for entry in &entries {
            assert!(entry.dir.starts_with(temp.path()));
        }
        assert!(entries.iter().any(|e| e.dir == temp.path()));
    }

    #[test]
    fn test_missing_root() {
        let temp = TempDir::new().unwrap();

        let result = files(&temp.path().join("missing"), "hpp");

        assert!(matches!(result, Err(Error::Root { .. })));
    }

    #[test]
    fn test_root_is_a_file() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "file.hpp");

        let result = files(&temp.path().join("file.hpp"), "hpp");

        assert!(matches!(result, Err(Error::NotADirectory(_))));
    }

    #[test]
    fn test_file_named_only_extension() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), ".hpp");
        touch(temp.path(), "xhpp");

        let entries = files(temp.path(), "hpp").unwrap();

        assert_eq!(names(&entries, temp.path()), vec![".hpp"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_files_are_listed() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().unwrap();
        let root = temp.path().join("src");
        touch(&root, "real.txt");
        touch(temp.path(), "outside/hidden_away.cpp");
        symlink(root.join("real.txt"), root.join("link.cpp")).unwrap();
        symlink(root.join("missing.txt"), root.join("dangling.cpp")).unwrap();
        symlink(temp.path().join("outside"), root.join("linked_dir")).unwrap();
        symlink(temp.path().join("outside"), root.join("linked_dir.cpp")).unwrap();

        let entries = files(&root, "cpp").unwrap();

        assert_eq!(names(&entries, &root), vec!["dangling.cpp", "link.cpp"]);
    }

    /// Strips all permissions from `dir`, returning `false` if that didn't
    /// make it unreadable (e.g. running as root)
    #[cfg(unix)]
    fn lock(dir: &Path) -> bool {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(dir, std::fs::Permissions::from_mode(0o000)).unwrap();
        fs::read_dir(dir).is_err()
    }

    #[cfg(unix)]
    fn unlock(dir: &Path) {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(dir, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_root_fails() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("src");
        touch(&root, "a.cpp");

        if !lock(&root) {
            unlock(&root);
            return;
        }
        let result = files(&root, "cpp");
        unlock(&root);

        assert!(matches!(result, Err(Error::Walk { .. })), "{result:?}");
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_fails() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "b.cpp");
        touch(temp.path(), "locked/a.cpp");
        let locked = temp.path().join("locked");

        if !lock(&locked) {
            unlock(&locked);
            return;
        }
        let result = files(temp.path(), "cpp");
        unlock(&locked);

        assert!(matches!(result, Err(Error::Walk { .. })), "{result:?}");
    }
}
