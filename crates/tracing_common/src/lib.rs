// SPDX-FileCopyrightText: Copyright © 2020-2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

use std::{io, path::PathBuf, str::FromStr, sync::Mutex};

use fs_err::OpenOptions;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    filter::Targets,
    fmt::{self, writer::BoxMakeWriter},
    layer::SubscriberExt as _,
    util::SubscriberInitExt as _,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputDestination {
    #[default]
    Stderr,
    File(PathBuf),
}

/// Parsed form of `<level>[:<format>][:<destination>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: LevelFilter,
    pub format: OutputFormat,
    pub destination: OutputDestination,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::WARN,
            format: OutputFormat::default(),
            destination: OutputDestination::default(),
        }
    }
}

impl FromStr for LogConfig {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Destination may itself contain `:`, so only split twice
        let mut parts = s.splitn(3, ':');

        let level = match parts.next().unwrap_or_default().to_lowercase().as_str() {
            "off" => LevelFilter::OFF,
            "trace" => LevelFilter::TRACE,
            "debug" => LevelFilter::DEBUG,
            "info" => LevelFilter::INFO,
            "warn" => LevelFilter::WARN,
            "error" => LevelFilter::ERROR,
            other => return Err(ParseError::Level(other.to_owned())),
        };

        let format = match parts.next().map(str::to_lowercase).as_deref() {
            None | Some("text") => OutputFormat::Text,
            Some("json") => OutputFormat::Json,
            Some(other) => return Err(ParseError::Format(other.to_owned())),
        };

        let destination = match parts.next() {
            None | Some("stderr") => OutputDestination::Stderr,
            Some("") => return Err(ParseError::Destination),
            Some(path) => OutputDestination::File(path.into()),
        };

        Ok(Self {
            level,
            format,
            destination,
        })
    }
}

/// Install the global subscriber described by `config`
///
/// Events from `target_crate` honour the configured level; everything else
/// is capped at `WARN` so dependencies stay quiet.
pub fn init(config: &LogConfig, target_crate: &str) -> Result<(), Error> {
    let filter = Targets::new()
        .with_default(config.level.min(LevelFilter::WARN))
        .with_target(target_crate, config.level);

    let (writer, ansi) = match &config.destination {
        OutputDestination::Stderr => (BoxMakeWriter::new(io::stderr), true),
        OutputDestination::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(Error::OpenLog)?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
    };

    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        OutputFormat::Text => registry
            .with(fmt::layer().with_ansi(ansi).with_writer(writer))
            .try_init()?,
        OutputFormat::Json => registry
            .with(fmt::layer().json().with_ansi(ansi).with_writer(writer))
            .try_init()?,
    }

    Ok(())
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid log level {0:?}, expected one of off, trace, debug, info, warn, error")]
    Level(String),
    #[error("invalid log format {0:?}, expected text or json")]
    Format(String),
    #[error("empty log destination, expected stderr or a file path")]
    Destination,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("opening log file")]
    OpenLog(#[source] io::Error),
    #[error("installing subscriber")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}
