// SPDX-FileCopyrightText: Copyright © 2020-2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

use clap::Parser;
use crossterm::style::Stylize;
use filewalker::{Config, stub};

pub use filewalker::stub::Error;

#[derive(Debug, Parser)]
#[command(about = "Create a stub source for every header without one")]
pub struct Command {
    #[arg(
        short,
        long,
        default_value_t = false,
        help = "Also list headers whose source already exists"
    )]
    all: bool,
}

pub fn handle(command: Command, config: &Config) -> Result<(), Error> {
    synthesize(config, command.all)
}

pub fn synthesize(config: &Config, list_skipped: bool) -> Result<(), Error> {
    let report = stub::synthesize(config)?;

    for path in &report.created {
        println!("{} {}", "Created".green(), path.display());
    }
    if list_skipped {
        for path in &report.skipped {
            println!("{} {}", "Exists".dim(), path.display());
        }
    }

    println!(
        "{} stubs created, {} already present",
        report.created.len(),
        report.skipped.len()
    );

    Ok(())
}
