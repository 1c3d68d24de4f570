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

//! fpgaplat - board descriptions for Xilinx FPGA gateware builds.
//!
//! A board (see [`platforms`]) bundles a device part, its pin table, flash geometry and
//! the commands its build and programming flows need. From a board you can:
//! - request I/O resources and generate a constraint file and build script for Vivado or
//!   ISE ([`toolchain`])
//! - get a programmer adapter (Vivado hardware manager, xc3sprog or OpenOCD) to load or
//!   flash the result ([`programmer`])
//!
//! External tools are only run on request; everything else is plain data.
//!
//! # Configuration
//!
//! Default board, toolchain, build locations and tool paths come from TOML files, see
//! [`config`].

pub mod config;
pub mod error;
pub mod platforms;
pub mod programmer;
pub mod system_io;
pub mod toolchain;
pub mod tools;
