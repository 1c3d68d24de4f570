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

//! Vivado flow: XDC constraints and a non-project batch TCL script.

use crate::config;
use crate::error::PlatformError;
use crate::platforms::resources::Signal;
use crate::platforms::xilinx::XilinxPlatform;
use crate::toolchain::{BuildRequest, SourceKind, XilinxToolchain, substitute_build_name};
use crate::tools::ToolInvocation;
use std::fmt::Write;
use std::path::PathBuf;

/// `[get_ports ...]` for one bit; bus bits need braces to keep TCL from evaluating `[i]`.
fn get_ports(signal: &Signal, bit: usize) -> String {
    if signal.width() > 1 {
        format!("[get_ports {{{}}}]", signal.bit_port(bit))
    } else {
        format!("[get_ports {}]", signal.port)
    }
}

fn write_signal(xdc: &mut String, signal: &Signal) {
    // Writing to a String cannot fail.
    let _ = writeln!(xdc, "## {}", signal.resource);
    for (bit, pin) in signal.pins.iter().enumerate() {
        let ports = get_ports(signal, bit);
        let _ = writeln!(xdc, "set_property LOC {pin} {ports}");
        for constraint in &signal.constraints {
            let (key, value) = constraint.key_value();
            let _ = writeln!(xdc, "set_property {key} {value} {ports}");
        }
    }
}

/// XDC for every requested resource, the default clock period, then the platform commands.
pub fn constraints(platform: &XilinxPlatform) -> String {
    let mut xdc = String::new();
    for signal in platform.requested_signals() {
        write_signal(&mut xdc, signal);
    }
    if let Some((clock, period)) = platform.default_clock() {
        let _ = writeln!(xdc, "\n# Clock");
        let _ = writeln!(
            xdc,
            "create_clock -name {} -period {period:?} {}",
            clock.port,
            get_ports(clock, 0)
        );
    }
    if !platform.platform_commands().is_empty() {
        let _ = writeln!(xdc, "\n# Platform commands");
        for command in platform.platform_commands() {
            let _ = writeln!(xdc, "{command}");
        }
    }
    xdc
}

/// Batch script: synthesis, implementation with reports, bitstream.
pub fn build_script(
    platform: &XilinxPlatform,
    toolchain: &XilinxToolchain,
    request: &BuildRequest,
    sources: &[(SourceKind, PathBuf)],
) -> String {
    let name = &request.build_name;
    let device = platform.device();
    let mut tcl = vec![format!("create_project -force -name {name} -part {device}")];
    for (kind, path) in sources {
        let path = path.display();
        tcl.push(match kind {
            SourceKind::Verilog => format!("read_verilog {{{path}}}"),
            SourceKind::SystemVerilog => format!("read_verilog -sv {{{path}}}"),
            SourceKind::Vhdl => format!("read_vhdl {{{path}}}"),
            SourceKind::Constraints => format!("read_xdc {{{path}}}"),
        });
    }
    tcl.extend([
        format!("read_xdc {name}.xdc"),
        format!("synth_design -top {} -part {device}", request.top),
        format!("report_timing_summary -file {name}_timing_synth.rpt"),
        format!("report_utilization -hierarchical -file {name}_utilization_hierarchical_synth.rpt"),
        format!("report_utilization -file {name}_utilization_synth.rpt"),
        "opt_design".to_string(),
        "place_design".to_string(),
        format!("report_utilization -file {name}_utilization_place.rpt"),
        format!("report_io -file {name}_io.rpt"),
        format!("report_control_sets -verbose -file {name}_control_sets.rpt"),
        format!("report_clock_utilization -file {name}_clock_utilization.rpt"),
        "route_design".to_string(),
        "phys_opt_design".to_string(),
        format!("write_checkpoint -force {name}_route.dcp"),
        format!("report_route_status -file {name}_route_status.rpt"),
        format!("report_drc -file {name}_drc.rpt"),
        format!("report_timing_summary -datasheet -max_paths 10 -file {name}_timing.rpt"),
        format!("report_power -file {name}_power.rpt"),
    ]);
    tcl.extend(
        toolchain
            .bitstream_commands
            .iter()
            .map(|c| substitute_build_name(c, name)),
    );
    tcl.push(format!("write_bitstream -force {name}.bit"));
    tcl.extend(
        toolchain
            .additional_commands
            .iter()
            .map(|c| substitute_build_name(c, name)),
    );
    tcl.push("quit".to_string());
    tcl.join("\n") + "\n"
}

pub fn invocation(request: &BuildRequest) -> Result<ToolInvocation, PlatformError> {
    Ok(ToolInvocation::new(config::vivado_path()?)
        .args(["-mode", "batch", "-source"])
        .arg(format!("{}.tcl", request.build_name))
        .current_dir(&request.build_dir))
}
