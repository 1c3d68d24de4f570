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

//! Board descriptions.
//!
//! - [`platform`]: the [`Platform`](platform::Platform) trait and the board registry
//! - [`xilinx`]: the generic Xilinx platform every board wraps
//! - [`resources`]: declarative I/O tables
//! - [`arty_s7`], [`arty`]: the boards themselves

pub mod arty;
pub mod arty_s7;
pub mod platform;
pub mod resources;
pub mod xilinx;

use crate::platforms::arty::ArtyPlatform;
use crate::platforms::arty_s7::ArtyS7Platform;

/// Register every built-in board. Safe to call more than once.
pub fn register_platforms() {
    ArtyS7Platform::register_platform();
    ArtyPlatform::register_platform();
}
