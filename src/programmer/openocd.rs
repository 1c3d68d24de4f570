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

/// JTAG programming through OpenOCD with a board config file.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenOcd {
    /// OpenOCD config, e.g. `board/digilent_arty.cfg`.
    pub config: String,
    pub flash_proxy_basename: Option<String>,
    pub flash_proxy_dirs: Vec<PathBuf>,
}

impl OpenOcd {
    pub fn new(config: impl Into<String>, flash_proxy_basename: Option<String>) -> Self {
        OpenOcd {
            config: config.into(),
            flash_proxy_basename,
            flash_proxy_dirs: default_flash_proxy_dirs(),
        }
    }

    pub fn with_flash_proxy_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.flash_proxy_dirs = dirs;
        self
    }

    fn invocation(&self, commands: &[String]) -> Result<ToolInvocation, PlatformError> {
        Ok(ToolInvocation::new(config::openocd_path()?)
            .args(["-f".to_string(), self.config.clone()])
            .arg("-c")
            .arg(commands.join("; ")))
    }
}

impl Programmer for OpenOcd {
    fn name(&self) -> &'static str {
        "openocd"
    }

    fn load_bitstream_invocation(
        &self,
        bitstream: &Path,
    ) -> Result<ToolInvocation, PlatformError> {
        self.invocation(&[
            "init".to_string(),
            format!("pld load 0 {{{}}}", bitstream.display()),
            "exit".to_string(),
        ])
    }

    fn flash_invocation(&self, address: u32, data: &Path) -> Result<ToolInvocation, PlatformError> {
        let basename = self.flash_proxy_basename.as_deref().ok_or_else(|| {
            PlatformError::Argument(format!(
                "openocd config {} has no flash proxy configured",
                self.config
            ))
        })?;
        let proxy = find_flash_proxy(basename, &self.flash_proxy_dirs)?;
        self.invocation(&[
            "init".to_string(),
            format!("jtagspi_init 0 {{{}}}", proxy.display()),
            format!("jtagspi_program {{{}}} 0x{address:x}", data.display()),
            "fpga_program".to_string(),
            "exit".to_string(),
        ])
    }
}
