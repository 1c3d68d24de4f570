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

pub mod boards {
    pub mod arty;
    pub mod arty_s7;
}

use fpgaplat::platforms::platform::{Platform, PlatformOptions, platform_for_name};
use fpgaplat::platforms::register_platforms;

/// Look a board up through the registry the way the command line tool does.
pub fn board(name: &str, toolchain: Option<&str>, programmer: Option<&str>) -> Box<dyn Platform> {
    register_platforms();
    let options = PlatformOptions {
        toolchain: toolchain.map(str::to_string),
        programmer: programmer.map(str::to_string),
    };
    platform_for_name(name, &options)
        .unwrap_or_else(|e| panic!("board: failed to construct {name}: {e}"))
}
