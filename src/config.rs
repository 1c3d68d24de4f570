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

//! Configuration of default boards, build locations and external tool paths.
//!
//! Values are looked up in order:
//! 1. a file passed with [`load_config_file`] (the CLI's `--config`)
//! 2. `/etc/fpgaplat/config.toml`
//! 3. `/usr/lib/fpgaplat/config.toml`
//! 4. hardcoded defaults
//!
//! See [`config_files`] for the file format.

pub mod config_files;
pub mod system_config;

pub use system_config::{
    SystemConfig, current, ise_bin_dir, load_config_file, openocd_path, vivado_path,
    xc3sprog_path,
};
