// SPDX-FileCopyrightText: Copyright © 2020-2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

use std::path::{Path, PathBuf};

use clap::{Args, CommandFactory, Parser};
use clap_complete::{
    generate_to,
    shells::{Bash, Fish, Zsh},
};
use clap_mangen::Man;
use filewalker::{
    Config,
    config::{self, Overrides},
};
use fs_err::{self as fs, File};
use thiserror::Error;
use tracing::debug;
use tracing_common::LogConfig;

mod manifest;
mod stubs;
mod sync;

#[derive(Debug, Parser)]
#[command(
    name = "filewalker",
    version,
    about = "Generate a CMake source listing and stub sources for a C++ tree"
)]
pub struct Command {
    #[command(flatten)]
    pub global: Global,
    #[command(subcommand)]
    pub subcommand: Option<Subcommand>,
}

#[derive(Debug, Args)]
pub struct Global {
    #[arg(
        short = 'C',
        long,
        global = true,
        help = "Project directory, relative paths are resolved against it [default: .]"
    )]
    pub directory: Option<PathBuf>,
    #[arg(long, global = true, help = "Headers root [default: include]")]
    pub headers: Option<PathBuf>,
    #[arg(long, global = true, help = "Sources root [default: src]")]
    pub sources: Option<PathBuf>,
    #[arg(short, long, global = true, help = "Generated manifest [default: file_walker.cmake]")]
    pub output: Option<PathBuf>,
    #[arg(long = "header-ext", global = true, help = "Header file extension [default: hpp]")]
    pub header_extension: Option<String>,
    #[arg(long = "source-ext", global = true, help = "Source file extension [default: cpp]")]
    pub source_extension: Option<String>,
    #[arg(
        long,
        global = true,
        value_name = "DIR",
        help = "List manifest entries relative to DIR instead of their walk root"
    )]
    pub relative_to: Option<PathBuf>,
    #[arg(long, global = true, help = "Read this config file instead of the user and project ones")]
    pub config: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        default_value = "warn",
        value_name = "LEVEL[:FORMAT][:DEST]",
        help = "Logging, e.g. debug:json:/tmp/filewalker.log"
    )]
    pub log: LogConfig,
    #[arg(
        short,
        long = "verbose",
        help = "Prints the resolved configuration",
        default_value = "false",
        global = true
    )]
    pub verbose: bool,
    #[arg(long, global = true, hide = true)]
    pub generate_manpages: Option<PathBuf>,
    #[arg(long, global = true, hide = true)]
    pub generate_completions: Option<PathBuf>,
}

impl Global {
    fn overrides(&self) -> Overrides {
        Overrides {
            headers: self.headers.clone(),
            sources: self.sources.clone(),
            output: self.output.clone(),
            header_extension: self.header_extension.clone(),
            source_extension: self.source_extension.clone(),
            relative_to: self.relative_to.clone(),
        }
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum Subcommand {
    Manifest(manifest::Command),
    Stubs(stubs::Command),
    Sync(sync::Command),
}

pub fn process() -> Result<(), Error> {
    let Command { global, subcommand } = Command::parse();

    tracing_common::init(&global.log, env!("CARGO_CRATE_NAME"))?;

    if let Some(dir) = global.generate_manpages {
        fs::create_dir_all(&dir)?;
        let main_cmd = Command::command();
        let mut buffer = File::create(dir.join("filewalker.1"))?;
        Man::new(main_cmd.clone()).render(&mut buffer)?;

        for sub in main_cmd.get_subcommands() {
            let name = format!("filewalker-{}.1", sub.get_name());
            let mut buffer = File::create(dir.join(&name))?;
            Man::new(sub.clone()).render(&mut buffer)?;
        }
        return Ok(());
    }

    if let Some(dir) = global.generate_completions {
        fs::create_dir_all(&dir)?;
        let mut cmd = Command::command();
        generate_to(Bash, &mut cmd, "filewalker", &dir)?;
        generate_to(Fish, &mut cmd, "filewalker", &dir)?;
        generate_to(Zsh, &mut cmd, "filewalker", &dir)?;
        return Ok(());
    }

    let project_dir = std::path::absolute(global.directory.as_deref().unwrap_or(Path::new(".")))?;
    let overrides = config::load_layers(&project_dir, global.config.as_deref())?.merge(global.overrides());
    let config = Config::resolve(&project_dir, overrides);

    debug!(?config, "Resolved configuration");
    if global.verbose {
        println!("project directory: {project_dir:?}");
        println!("{config:#?}");
    }

    match subcommand {
        Some(Subcommand::Manifest(command)) => manifest::handle(command, &config)?,
        Some(Subcommand::Stubs(command)) => stubs::handle(command, &config)?,
        Some(Subcommand::Sync(command)) => sync::handle(command, &config)?,
        None => sync::handle(sync::Command::default(), &config)?,
    }

    Ok(())
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("manifest")]
    Manifest(#[from] manifest::Error),
    #[error("stubs")]
    Stubs(#[from] stubs::Error),
    #[error("sync")]
    Sync(#[from] sync::Error),
    #[error("config")]
    Config(#[from] ::config::Error),
    #[error("logging")]
    Logging(#[from] tracing_common::Error),
    #[error("io error")]
    Io(#[from] std::io::Error),
}
