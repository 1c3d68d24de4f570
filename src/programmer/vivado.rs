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

//! Programming through the Vivado hardware manager.
//!
//! Vivado is started in TCL mode and driven by a script written to its standard input.
//! Flashing goes through a Vivado "cfgmem" object, which needs the flash part name as
//! Vivado knows it (see `get_cfgmem_parts`).

use crate::config;
use crate::error::PlatformError;
use crate::programmer::Programmer;
use crate::tools::ToolInvocation;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VivadoProgrammer {
    pub flash_part: String,
    /// Index of the FPGA among the hardware devices of the target.
    pub device: u32,
}

impl VivadoProgrammer {
    pub fn new(flash_part: impl Into<String>) -> Self {
        VivadoProgrammer {
            flash_part: flash_part.into(),
            device: 0,
        }
    }

    fn invocation(&self, script: String) -> Result<ToolInvocation, PlatformError> {
        Ok(ToolInvocation::new(config::vivado_path()?)
            .args(["-nolog", "-nojournal", "-mode", "tcl"])
            .stdin(script))
    }

    pub fn program_script(&self, bitstream: &Path) -> String {
        let device = format!("[lindex [get_hw_devices] {}]", self.device);
        [
            "open_hw_manager".to_string(),
            "connect_hw_server".to_string(),
            "open_hw_target".to_string(),
            format!("set_property PROBES.FILE {{}} {device}"),
            format!("set_property PROGRAM.FILE {{{}}} {device}", bitstream.display()),
            format!("program_hw_devices {device}"),
            format!("refresh_hw_device {device}"),
            "quit".to_string(),
        ]
        .join("\n")
            + "\n"
    }

    pub fn flash_script(&self, data: &Path) -> String {
        let device = format!("[lindex [get_hw_devices] {}]", self.device);
        let cfgmem = format!("[get_property PROGRAM.HW_CFGMEM {device}]");
        let mut lines = vec![
            "open_hw_manager".to_string(),
            "connect_hw_server".to_string(),
            "open_hw_target".to_string(),
            format!(
                "create_hw_cfgmem -hw_device {device} -mem_dev [lindex [get_cfgmem_parts {{{}}}] 0]",
                self.flash_part
            ),
            format!("refresh_hw_device {device}"),
            format!("set_property PROGRAM.ADDRESS_RANGE {{use_file}} {cfgmem}"),
            format!("set_property PROGRAM.FILES [list \"{}\"] {cfgmem}", data.display()),
            format!("set_property PROGRAM.UNUSED_PIN_TERMINATION {{pull-none}} {cfgmem}"),
        ];
        for (property, value) in [
            ("BLANK_CHECK", 0),
            ("ERASE", 1),
            ("CFG_PROGRAM", 1),
            ("VERIFY", 1),
        ] {
            lines.push(format!("set_property PROGRAM.{property} {value} {cfgmem}"));
        }
        lines.extend([
            format!("startup_hw_device {device}"),
            format!(
                "create_hw_bitstream -hw_device {device} [get_property PROGRAM.HW_CFGMEM_BITFILE {device}]"
            ),
            format!("program_hw_devices {device}"),
            format!("program_hw_cfgmem -hw_cfgmem {cfgmem}"),
            "quit".to_string(),
        ]);
        lines.join("\n") + "\n"
    }
}

impl Programmer for VivadoProgrammer {
    fn name(&self) -> &'static str {
        "vivado"
    }

    fn load_bitstream_invocation(
        &self,
        bitstream: &Path,
    ) -> Result<ToolInvocation, PlatformError> {
        self.invocation(self.program_script(bitstream))
    }

    /// The cfgmem flow writes the whole image from the start of the flash, so only address 0
    /// is accepted.
    fn flash_invocation(&self, address: u32, data: &Path) -> Result<ToolInvocation, PlatformError> {
        if address != 0 {
            return Err(PlatformError::Argument(format!(
                "vivado can only flash at address 0, not 0x{address:x}"
            )));
        }
        self.invocation(self.flash_script(data))
    }
}
