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

//! Programmer adapters: the tools that put a bitstream on a board.
//!
//! A board picks one of these in its `create_programmer`. Every adapter can describe what
//! it would run as a [`ToolInvocation`] without touching any hardware, and run it through
//! the provided [`Programmer::load_bitstream`] and [`Programmer::flash`] methods.
//!
//! Programming the SPI flash over JTAG needs a *flash proxy*, a small bitstream bridging
//! JTAG to the flash pins. Proxies are looked up by basename with [`find_flash_proxy`].

pub mod openocd;
pub mod vivado;
pub mod xc3sprog;

pub use openocd::OpenOcd;
pub use vivado::VivadoProgrammer;
pub use xc3sprog::Xc3sProg;

use crate::error::PlatformError;
use crate::tools::ToolInvocation;
use log::{info, trace};
use std::any::Any;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

pub trait Programmer: Any + Debug {
    /// Identifier used to select this programmer, e.g. `"vivado"`.
    fn name(&self) -> &'static str;

    /// Command that loads `bitstream` into the FPGA's configuration memory (volatile).
    ///
    /// # Returns: `Result<ToolInvocation, PlatformError>`
    /// * `Ok(ToolInvocation)` - What would be run
    /// * `Err(PlatformError::Internal)` - The tool path could not be read from the config
    fn load_bitstream_invocation(&self, bitstream: &Path)
    -> Result<ToolInvocation, PlatformError>;

    /// Command that writes `data` into the board's SPI flash at `address`.
    ///
    /// # Returns: `Result<ToolInvocation, PlatformError>`
    /// * `Ok(ToolInvocation)` - What would be run
    /// * `Err(PlatformError::Argument)` - The programmer cannot write at `address`, or it
    ///   needs a flash proxy that cannot be found
    fn flash_invocation(&self, address: u32, data: &Path) -> Result<ToolInvocation, PlatformError>;

    fn load_bitstream(&self, bitstream: &Path) -> Result<(), PlatformError> {
        require_file(bitstream)?;
        info!("{}: loading {bitstream:?}", self.name());
        self.load_bitstream_invocation(bitstream)?.run()?;
        Ok(())
    }

    fn flash(&self, address: u32, data: &Path) -> Result<(), PlatformError> {
        require_file(data)?;
        info!("{}: flashing {data:?} at 0x{address:x}", self.name());
        self.flash_invocation(address, data)?.run()?;
        Ok(())
    }
}

fn require_file(path: &Path) -> Result<(), PlatformError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(PlatformError::Argument(format!("{path:?} is not a file")))
    }
}

/// Directories searched for flash proxy bitstreams, highest priority first.
pub fn default_flash_proxy_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(home) = std::env::var_os("HOME") {
        dirs.push(Path::new(&home).join(".migen"));
        dirs.push(Path::new(&home).join(".mlabs"));
    }
    dirs.extend(
        [
            "/usr/local/share/migen",
            "/usr/share/migen",
            "/usr/local/share/mlabs",
            "/usr/share/mlabs",
        ]
        .map(PathBuf::from),
    );
    dirs
}

/// Locate a flash proxy.
///
/// A `basename` that already points at an existing file is used as is. Otherwise the first
/// directory in `dirs` containing it wins.
///
/// # Returns: `Result<PathBuf, PlatformError>`
/// * `Ok(PathBuf)` - Path to the proxy bitstream
/// * `Err(PlatformError::Argument)` - The proxy was not found anywhere
pub fn find_flash_proxy(basename: &str, dirs: &[PathBuf]) -> Result<PathBuf, PlatformError> {
    let direct = Path::new(basename);
    if direct.is_file() {
        return Ok(direct.to_path_buf());
    }
    for dir in dirs {
        let candidate = dir.join(basename);
        trace!("Looking for flash proxy at {candidate:?}");
        if candidate.is_file() {
            return Ok(candidate);
        }
    }
    Err(PlatformError::Argument(format!(
        "Failed to find flash proxy bitstream {basename} in {dirs:?}"
    )))
}
