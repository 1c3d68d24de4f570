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

//! ISE flow: UCF constraints, an XST project and a bash script running
//! xst, ngdbuild, map, par and bitgen.

use crate::config;
use crate::error::PlatformError;
use crate::platforms::resources::Signal;
use crate::platforms::xilinx::XilinxPlatform;
use crate::toolchain::{BuildRequest, SourceKind, XilinxToolchain, substitute_build_name};
use crate::tools::ToolInvocation;
use std::fmt::Write;
use std::path::{Path, PathBuf};

fn net(signal: &Signal, bit: usize) -> String {
    if signal.width() > 1 {
        format!("{}({bit})", signal.port)
    } else {
        signal.port.clone()
    }
}

pub fn constraints(platform: &XilinxPlatform) -> String {
    let mut ucf = String::new();
    for signal in platform.requested_signals() {
        for (bit, pin) in signal.pins.iter().enumerate() {
            let mut line = format!("NET \"{}\" LOC={pin}", net(signal, bit));
            for constraint in &signal.constraints {
                let (key, value) = constraint.key_value();
                line.push_str(" | ");
                line.push_str(key);
                if !value.is_empty() {
                    line.push('=');
                    line.push_str(value);
                }
            }
            let _ = writeln!(ucf, "{line}; # {}", signal.resource);
        }
    }
    if let Some((clock, period)) = platform.default_clock() {
        let port = &clock.port;
        let _ = writeln!(ucf, "NET \"{port}\" TNM_NET = \"PRD{port}\";");
        let _ = writeln!(
            ucf,
            "TIMESPEC \"TS{port}\" = PERIOD \"PRD{port}\" {period:?} ns HIGH 50%;"
        );
    }
    for command in platform.platform_commands() {
        let _ = writeln!(ucf, "{command}");
    }
    ucf
}

/// XST project file listing the HDL sources. Extra constraint files are not part of it.
pub fn project(sources: &[(SourceKind, PathBuf)]) -> String {
    sources
        .iter()
        .filter_map(|(kind, path)| {
            let language = match kind {
                SourceKind::Verilog | SourceKind::SystemVerilog => "verilog",
                SourceKind::Vhdl => "vhdl",
                SourceKind::Constraints => return None,
            };
            Some(format!("{language} work {}\n", path.display()))
        })
        .collect()
}

pub fn xst_script(platform: &XilinxPlatform, request: &BuildRequest) -> String {
    let name = &request.build_name;
    [
        "run".to_string(),
        format!("-ifn {name}.prj"),
        format!("-top {}", request.top),
        "-ifmt MIXED".to_string(),
        "-opt_mode SPEED".to_string(),
        "-reduce_control_sets auto".to_string(),
        format!("-ofn {name}.ngc"),
        format!("-p {}", platform.device()),
    ]
    .join("\n")
        + "\n"
}

/// `bitgen -g` option for a board bitstream command.
///
/// Vivado style `set_property BITSTREAM.CONFIG.<KEY> <VALUE> [current_design]` commands are
/// translated; anything else is taken as an already formed `KEY:VALUE` option.
pub fn bitgen_option(command: &str) -> String {
    let translated = command
        .strip_prefix("set_property BITSTREAM.")
        .and_then(|rest| {
            let mut words = rest.split_whitespace();
            let key = words.next()?;
            let value = words.next()?;
            let key = key.strip_prefix("CONFIG.").unwrap_or(key);
            Some(format!("{key}:{value}"))
        });
    translated.unwrap_or_else(|| command.to_string())
}

pub fn build_script(
    toolchain: &XilinxToolchain,
    request: &BuildRequest,
) -> Result<String, PlatformError> {
    let name = &request.build_name;
    let bin_dir = config::ise_bin_dir()?;
    let mut script = vec!["#!/usr/bin/env bash".to_string(), "set -e".to_string()];
    if !bin_dir.is_empty() {
        script.push(format!("export PATH=\"{bin_dir}:$PATH\""));
    }
    let bitgen_options: String = toolchain
        .bitstream_commands
        .iter()
        .map(|c| format!(" -g {}", bitgen_option(&substitute_build_name(c, name))))
        .collect();
    script.extend([
        format!("xst -ifn {name}.xst"),
        format!("ngdbuild -uc {name}.ucf {name}.ngc {name}.ngd"),
        format!("map -ol high -w -o {name}_map.ncd {name}.ngd {name}.pcf"),
        format!("par -ol high -w {name}_map.ncd {name}.ncd {name}.pcf"),
        format!("bitgen -g LCK_cycle:6 -g Binary:Yes{bitgen_options} -w {name}.ncd {name}.bit"),
    ]);
    script.extend(
        toolchain
            .additional_commands
            .iter()
            .map(|c| substitute_build_name(c, name)),
    );
    Ok(script.join("\n") + "\n")
}

pub fn invocation(request: &BuildRequest, script: &Path) -> ToolInvocation {
    let script_name = script
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| script.display().to_string());
    ToolInvocation::new("bash")
        .arg(script_name)
        .current_dir(&request.build_dir)
}
