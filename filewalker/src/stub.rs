// SPDX-FileCopyrightText: Copyright © 2020-2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! Stub sources for headers without an implementation

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use fs_err as fs;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{Config, path, walk};

/// What a synthesis run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Stubs written by this run
    pub created: Vec<PathBuf>,
    /// Targets left alone because a file was already there
    pub skipped: Vec<PathBuf>,
}

/// Contents of the stub for a header referenced as `reference`
pub fn contents(reference: &str) -> String {
    format!("#include \"{reference}\"\n")
}

/// Create a stub under `config.sources_root` for every header that lacks one
///
/// Existing files are never overwritten, so re-running is safe once a
/// header has gained a real implementation.
#[tracing::instrument(
    skip_all,
    fields(headers = %config.headers_root.display(), sources = %config.sources_root.display())
)]
pub fn synthesize(config: &Config) -> Result<Report, Error> {
    let mut report = Report::default();

    for header in walk::files(&config.headers_root, &config.header_extension)? {
        let relative = path::Relative::new(&config.headers_root, &header)?;

        let dir = relative
            .ensure_mirrored_dir(&config.sources_root)
            .map_err(|source| Error::CreateDir {
                path: relative.mirrored_dir(&config.sources_root),
                source,
            })?;
        let target = dir.join(path::swap_extension(
            relative.file_name(),
            &config.header_extension,
            &config.source_extension,
        ));

        if create(&target, &relative.include_reference())? {
            info!(stub = %target.display(), header = %header.path().display(), "Created stub");
            report.created.push(target);
        } else {
            debug!(stub = %target.display(), "Stub target exists, skipping");
            report.skipped.push(target);
        }
    }

    Ok(report)
}

/// Returns `false` if `target` already existed
fn create(target: &Path, reference: &str) -> Result<bool, Error> {
    write_new(target, |file| file.write_all(contents(reference).as_bytes()))
}

/// Exclusively create `target` and fill it with `write`
///
/// A partially written file is removed again, so a failed run never leaves
/// behind a stub that later runs would skip.
fn write_new(target: &Path, write: impl FnOnce(&mut fs::File) -> io::Result<()>) -> Result<bool, Error> {
    let file = fs::OpenOptions::new().write(true).create_new(true).open(target);

    let mut file = match file {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(source) => {
            return Err(Error::Write {
                path: target.to_owned(),
                source,
            });
        }
    };

    if let Err(source) = write(&mut file) {
        drop(file);
        if let Err(e) = fs::remove_file(target) {
            warn!(error = %e, "Failed to remove incomplete stub");
        }
        return Err(Error::Write {
            path: target.to_owned(),
            source,
        });
    }

    Ok(true)
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("walk")]
    Walk(#[from] walk::Error),
    #[error("map path")]
    Path(#[from] path::Error),
    #[error("creating directory {path:?}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("writing stub {path:?}")]
    Write { path: PathBuf, source: io::Error },
}
