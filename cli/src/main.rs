// This file is part of fpgaplat, a collection of FPGA board descriptions for gateware builds.
//
// Copyright 2025 Canonical Ltd.
//
// SPDX-License-Identifier: GPL-3.0-only
//
// fpgaplat is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License version 3, as published by the Free Software Foundation.
//
// fpgaplat is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranties of MERCHANTABILITY, SATISFACTORY QUALITY, or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with this program.  If not, see http://www.gnu.org/licenses/.

//! `fpgaplat` command line tool.
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (`trace`, `debug`, `info`, `warn`, `error`
//!   or `off`). Defaults to `info`

use clap::{Parser, Subcommand};
use fpgaplat::config;
use fpgaplat::platforms::platform::{Platform, PlatformOptions, platform_for_name};
use fpgaplat::platforms::register_platforms;
use log::debug;
use std::path::PathBuf;

mod build;
mod program;
mod show;

#[derive(Parser, Debug)]
#[command(name = "fpgaplat")]
#[command(bin_name = "fpgaplat")]
struct Cli {
    #[arg(
        long = "config",
        help = r#"extra TOML config file, layered over /etc/fpgaplat/config.toml
and /usr/lib/fpgaplat/config.toml.
        "#
    )]
    config: Option<PathBuf>,
    #[arg(
        long = "platform",
        short = 'p',
        help = "board to use, see `fpgaplat list`. Defaults to the configured platform"
    )]
    platform: Option<String>,
    #[arg(long = "toolchain", help = "vivado or ise")]
    toolchain: Option<String>,
    #[arg(
        long = "programmer",
        help = "programming tool (vivado, xc3sprog, openocd). Defaults to the board's choice"
    )]
    programmer: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the known boards
    List,
    /// Describe the board, or one of its resources given as `name` or `name:number`
    Show { resource: Option<String> },
    /// Write constraints and build scripts for a design
    Build {
        /// Top-level HDL sources and extra constraint files
        sources: Vec<PathBuf>,
        /// Resources used by the design, as `name` or `name:number`
        #[arg(long = "request", short = 'r')]
        requests: Vec<String>,
        #[arg(long)]
        top: Option<String>,
        #[arg(long = "build-dir")]
        build_dir: Option<PathBuf>,
        #[arg(long = "build-name")]
        build_name: Option<String>,
        /// Run the vendor tool after writing the files
        #[arg(long)]
        run: bool,
    },
    /// Load a bitstream into the FPGA (lost on power cycle)
    Load {
        file: PathBuf,
        /// Print the command instead of running it
        #[arg(long = "dry-run")]
        dry_run: bool,
    },
    /// Write an image to the board's SPI flash
    Flash {
        file: PathBuf,
        #[arg(long, default_value = "0", value_parser = program::parse_address)]
        address: u32,
        /// Print the command instead of running it
        #[arg(long = "dry-run")]
        dry_run: bool,
    },
}

impl Cli {
    fn board(&self) -> Result<Box<dyn Platform>, fpgaplat::error::PlatformError> {
        let settings = config::current()?;
        let name = self.platform.clone().unwrap_or(settings.platform);
        let options = PlatformOptions {
            toolchain: self.toolchain.clone().or(Some(settings.toolchain)),
            programmer: self.programmer.clone().or(settings.programmer),
        };
        platform_for_name(&name, &options)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    debug!("parsed cli command with {cli:?}");
    if let Some(path) = &cli.config {
        config::load_config_file(path)?;
    }
    register_platforms();

    let output = match &cli.command {
        Commands::List => show::list_handler()?,
        Commands::Show { resource } => {
            show::show_handler(cli.board()?.as_ref(), resource.as_deref())?
        }
        Commands::Build {
            sources,
            requests,
            top,
            build_dir,
            build_name,
            run,
        } => {
            let mut board = cli.board()?;
            let options = build::BuildOptions {
                sources: sources.clone(),
                requests: requests.clone(),
                top: top.clone(),
                build_dir: build_dir.clone(),
                build_name: build_name.clone(),
                run: *run,
            };
            build::build_handler(board.as_mut(), &options)?
        }
        Commands::Load { file, dry_run } => {
            program::load_handler(cli.board()?.as_ref(), file, *dry_run)?
        }
        Commands::Flash {
            file,
            address,
            dry_run,
        } => program::flash_handler(cli.board()?.as_ref(), file, *address, *dry_run)?,
    };
    println!("{output}");
    Ok(())
}
