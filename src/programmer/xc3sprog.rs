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

use crate::config;
use crate::error::PlatformError;
use crate::programmer::{Programmer, default_flash_proxy_dirs, find_flash_proxy};
use crate::tools::ToolInvocation;
use std::path::{Path, PathBuf};

/// JTAG programming through `xc3sprog`.
///
/// Loading works with just a cable. Flashing goes through a proxy bitstream that bridges
/// JTAG to the SPI flash, so it fails until one is set with [`Xc3sProg::with_flash_proxy`].
#[derive(Debug, Clone, PartialEq)]
pub struct Xc3sProg {
    /// xc3sprog cable (or board) name, passed as `-c`.
    pub cable: String,
    pub flash_proxy_basename: Option<String>,
    /// Position of the FPGA in the JTAG chain.
    pub position: u32,
    pub flash_proxy_dirs: Vec<PathBuf>,
}

impl Xc3sProg {
    pub fn new(cable: impl Into<String>) -> Self {
        Xc3sProg {
            cable: cable.into(),
            flash_proxy_basename: None,
            position: 0,
            flash_proxy_dirs: default_flash_proxy_dirs(),
        }
    }

    pub fn with_flash_proxy(mut self, basename: impl Into<String>) -> Self {
        self.flash_proxy_basename = Some(basename.into());
        self
    }

    pub fn with_flash_proxy_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.flash_proxy_dirs = dirs;
        self
    }

    fn base_invocation(&self) -> Result<ToolInvocation, PlatformError> {
        Ok(ToolInvocation::new(config::xc3sprog_path()?).args([
            "-v".to_string(),
            "-c".to_string(),
            self.cable.clone(),
            "-p".to_string(),
            self.position.to_string(),
        ]))
    }
}

impl Programmer for Xc3sProg {
    fn name(&self) -> &'static str {
        "xc3sprog"
    }

    fn load_bitstream_invocation(
        &self,
        bitstream: &Path,
    ) -> Result<ToolInvocation, PlatformError> {
        Ok(self
            .base_invocation()?
            .arg(bitstream.display().to_string()))
    }

    fn flash_invocation(&self, address: u32, data: &Path) -> Result<ToolInvocation, PlatformError> {
        let basename = self.flash_proxy_basename.as_deref().ok_or_else(|| {
            PlatformError::Argument(format!(
                "xc3sprog cable {} has no flash proxy configured",
                self.cable
            ))
        })?;
        let proxy = find_flash_proxy(basename, &self.flash_proxy_dirs)?;
        Ok(self
            .base_invocation()?
            .arg(format!("-I{}", proxy.display()))
            .arg(format!("{}:w:0x{address:x}:BIN", data.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system_io::fs_write;
    use googletest::prelude::*;

    #[gtest]
    fn load_targets_cable_and_position() {
        let invocation = Xc3sProg::new("nexys4")
            .load_bitstream_invocation(Path::new("build/top.bit"))
            .expect("invocation");
        expect_that!(
            invocation.args,
            elements_are![eq("-v"), eq("-c"), eq("nexys4"), eq("-p"), eq("0"), eq("build/top.bit")]
        );
    }

    #[gtest]
    fn flash_without_proxy_fails() {
        let result = Xc3sProg::new("nexys4").flash_invocation(0, Path::new("build/top.bin"));
        expect_that!(
            result,
            err(displays_as(contains_substring("no flash proxy configured")))
        );
    }

    #[gtest]
    fn flash_uses_proxy_and_address() {
        let dir = tempfile::tempdir().expect("tempdir");
        let proxy = dir.path().join("bscan_spi_xc7s50.bit");
        fs_write(&proxy, "proxy").expect("write proxy");

        let invocation = Xc3sProg::new("nexys4")
            .with_flash_proxy("bscan_spi_xc7s50.bit")
            .with_flash_proxy_dirs(vec![dir.path().to_path_buf()])
            .flash_invocation(0x220000, Path::new("top.bin"))
            .expect("invocation");
        expect_that!(
            invocation.args,
            contains(eq(&format!("-I{}", proxy.display())))
        );
        assert_eq!(
            invocation.args.last().map(String::as_str),
            Some("top.bin:w:0x220000:BIN")
        );
    }
}
