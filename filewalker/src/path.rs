// SPDX-FileCopyrightText: Copyright © 2020-2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! Root-relative path mapping for walked files
//!
//! Every discovered file is anchored to the root of its walk. From that
//! anchor we derive the manifest entry, the include reference written into a
//! stub, and the mirrored location of the stub under another root.

use std::{
    io,
    path::{Path, PathBuf},
};

use camino::{Utf8Component, Utf8Path};
use fs_err as fs;
use thiserror::Error;

use crate::walk::FileEntry;

/// A walked file expressed relative to an anchor directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relative {
    /// Directory components between the anchor and the file.
    /// Empty when the file sits directly in the anchor.
    components: Vec<String>,
    file_name: String,
}

impl Relative {
    /// Map `entry` against `anchor`, which must be an ancestor of the entry's directory
    pub fn new(anchor: &Path, entry: &FileEntry) -> Result<Self, Error> {
        let components = relative_components(anchor, &entry.dir)?;

        Ok(Self {
            components,
            file_name: entry.file_name.clone(),
        })
    }

    /// True if the file lives directly in the anchor directory
    pub fn is_top_level(&self) -> bool {
        self.components.is_empty()
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// `/` separated path of the file, as listed in a manifest
    pub fn entry(&self) -> String {
        self.join(&self.file_name)
    }

    /// Reference used by `#include` directives
    ///
    /// Top-level headers are referenced by bare file name, nested headers
    /// by their root-relative path. Never contains the root itself.
    pub fn include_reference(&self) -> String {
        if self.is_top_level() {
            self.file_name.clone()
        } else {
            self.join(&self.file_name)
        }
    }

    /// The same relative directory re-rooted under `target_root`
    pub fn mirrored_dir(&self, target_root: &Path) -> PathBuf {
        self.components
            .iter()
            .fold(target_root.to_path_buf(), |dir, component| dir.join(component))
    }

    /// Creates [`Self::mirrored_dir`] and any missing parents
    pub fn ensure_mirrored_dir(&self, target_root: &Path) -> io::Result<PathBuf> {
        let dir = self.mirrored_dir(target_root);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    fn join(&self, file_name: &str) -> String {
        match self.components.as_slice() {
            [] => file_name.to_owned(),
            dirs => format!("{}/{file_name}", dirs.join("/")),
        }
    }
}

/// Swap the trailing `.<from>` of `file_name` for `.<to>`
///
/// Only the final extension is replaced, so `a.b.hpp` becomes `a.b.cpp`
/// and a file named just `.hpp` becomes `.cpp`.
pub fn swap_extension(file_name: &str, from: &str, to: &str) -> String {
    let stem = file_name
        .strip_suffix(from)
        .and_then(|rest| rest.strip_suffix('.'))
        .or_else(|| Path::new(file_name).file_stem().and_then(|stem| stem.to_str()))
        .unwrap_or(file_name);

    format!("{stem}.{to}")
}

/// Component-wise path of `dir` relative to `anchor`
fn relative_components(anchor: &Path, dir: &Path) -> Result<Vec<String>, Error> {
    let suffix = dir.strip_prefix(anchor).map_err(|_| Error::OutsideAnchor {
        path: dir.to_owned(),
        anchor: anchor.to_owned(),
    })?;

    let suffix = Utf8Path::from_path(suffix).ok_or_else(|| Error::NonUtf8Path { path: dir.to_owned() })?;

    suffix
        .components()
        .filter_map(|component| match component {
            Utf8Component::Normal(name) => Some(Ok(name.to_owned())),
            Utf8Component::CurDir => None,
            _ => Some(Err(Error::Unnormalized { path: dir.to_owned() })),
        })
        .collect()
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{path:?} is not inside {anchor:?}")]
    OutsideAnchor { path: PathBuf, anchor: PathBuf },
    #[error("non-utf8 path: {path:?}")]
    NonUtf8Path { path: PathBuf },
    #[error("path is not normalized: {path:?}")]
    Unnormalized { path: PathBuf },
}
