// SPDX-FileCopyrightText: Copyright © 2020-2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

use clap::Parser;
use filewalker::Config;
use thiserror::Error;

use super::{manifest, stubs};

// Stubs are created first so they are listed in the same run
#[derive(Debug, Default, Parser)]
#[command(about = "Create missing stubs, then regenerate the listing (default)")]
pub struct Command {}

pub fn handle(_command: Command, config: &Config) -> Result<(), Error> {
    stubs::synthesize(config, false)?;
    manifest::write(config)?;

    Ok(())
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("stubs")]
    Stubs(#[from] stubs::Error),
    #[error("manifest")]
    Manifest(#[from] manifest::Error),
}
