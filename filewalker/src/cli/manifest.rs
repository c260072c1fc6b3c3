// SPDX-FileCopyrightText: Copyright © 2020-2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

use std::path::PathBuf;

use clap::Parser;
use crossterm::style::Stylize;
use filewalker::{
    Config,
    manifest::{self, Verification},
};
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(about = "Generate the SOURCES/HEADERS listing")]
pub struct Command {
    #[arg(
        long,
        default_value_t = false,
        help = "Fail if the listing on disk is missing or stale instead of writing it"
    )]
    check: bool,
}

pub fn handle(command: Command, config: &Config) -> Result<(), Error> {
    let Command { check } = command;

    if check {
        return match manifest::verify(config)? {
            Verification::Match => {
                println!("{} {}", "Up to date".green(), config.output_path.display());
                Ok(())
            }
            verification => Err(Error::Stale {
                path: config.output_path.clone(),
                verification,
            }),
        };
    }

    write(config)
}

pub fn write(config: &Config) -> Result<(), Error> {
    manifest::write(config)?;

    println!("{} {}", "Wrote".green(), config.output_path.display());

    Ok(())
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("generate manifest")]
    Manifest(#[from] manifest::Error),
    #[error("manifest {path:?} is not up to date ({verification:?})")]
    Stale { path: PathBuf, verification: Verification },
}
