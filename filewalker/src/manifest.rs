// SPDX-FileCopyrightText: Copyright © 2020-2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! CMake fragment listing every source and header file
//!
//! ```text
//! set(SOURCES
//!     a.cpp
//!     x/b.cpp
//! )
//! set(HEADERS
//!     a.hpp
//! )
//! ```

use std::{
    fmt, io,
    path::{Path, PathBuf},
};

use fs_err as fs;
use strum::{Display, EnumIter, IntoEnumIterator};
use thiserror::Error;
use tracing::{debug, info};

use crate::{Config, path, walk};

const INDENT: &str = "    ";

/// Named group of entries in the fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Group {
    Sources,
    Headers,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    sources: Vec<String>,
    headers: Vec<String>,
}

impl Manifest {
    /// Walk both roots of `config` and collect their entries in walk order
    pub fn collect(config: &Config) -> Result<Self, Error> {
        let sources = entries(&config.sources_root, &config.source_extension, config.manifest_base.as_deref())?;
        let headers = entries(&config.headers_root, &config.header_extension, config.manifest_base.as_deref())?;

        Ok(Self { sources, headers })
    }

    pub fn entries(&self, group: Group) -> &[String] {
        match group {
            Group::Sources => &self.sources,
            Group::Headers => &self.headers,
        }
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for group in Group::iter() {
            writeln!(f, "set({group}")?;
            for entry in self.entries(group) {
                writeln!(f, "{INDENT}{entry}")?;
            }
            writeln!(f, ")")?;
        }
        Ok(())
    }
}

fn entries(root: &Path, extension: &str, base: Option<&Path>) -> Result<Vec<String>, Error> {
    let anchor = base.unwrap_or(root);

    walk::files(root, extension)?
        .iter()
        .map(|file| -> Result<String, Error> {
            let entry = path::Relative::new(anchor, file)?.entry();
            debug!(%entry, "Listing");
            Ok(entry)
        })
        .collect()
}

/// Render the fragment for `config` without touching the output file
pub fn generate(config: &Config) -> Result<String, Error> {
    Ok(Manifest::collect(config)?.to_string())
}

/// Render the fragment and overwrite `config.output_path` with it
///
/// The parent of the output path must already exist.
#[tracing::instrument(skip_all, fields(output = %config.output_path.display()))]
pub fn write(config: &Config) -> Result<(), Error> {
    let contents = generate(config)?;

    fs::write(&config.output_path, contents).map_err(|source| Error::Write {
        path: config.output_path.clone(),
        source,
    })?;

    info!("Manifest written");

    Ok(())
}

/// Compare the fragment for `config` against the existing output file
#[tracing::instrument(skip_all, fields(output = %config.output_path.display()))]
pub fn verify(config: &Config) -> Result<Verification, Error> {
    let expected = generate(config)?;

    let existing = match fs::read_to_string(&config.output_path) {
        Ok(existing) => existing,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Verification::Missing),
        Err(source) => {
            return Err(Error::Read {
                path: config.output_path.clone(),
                source,
            });
        }
    };

    let verification = if existing == expected {
        Verification::Match
    } else {
        Verification::Mismatch
    };

    debug!(?verification, "Manifest verified");

    Ok(verification)
}

/// Outcome of [`verify`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Output file is up to date
    Match,
    /// Output file differs from what would be generated
    Mismatch,
    /// Output file doesn't exist
    Missing,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("walk")]
    Walk(#[from] walk::Error),
    #[error("map path")]
    Path(#[from] path::Error),
    #[error("writing manifest {path:?}")]
    Write { path: PathBuf, source: io::Error },
    #[error("reading manifest {path:?}")]
    Read { path: PathBuf, source: io::Error },
}
