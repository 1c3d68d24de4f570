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

use fpgaplat::error::PlatformError;
use fpgaplat::platforms::platform::{Platform, list_platforms};
use fpgaplat::platforms::resources::{Constraint, Signal};
use std::fmt::Write;

/// Split `name` or `name:number` into its parts.
pub fn parse_resource(text: &str) -> Result<(&str, Option<u32>), PlatformError> {
    match text.split_once(':') {
        None => Ok((text, None)),
        Some((name, number)) => {
            let number = number.parse().map_err(|_| {
                PlatformError::Argument(format!("Invalid resource number in {text:?}"))
            })?;
            Ok((name, Some(number)))
        }
    }
}

fn constraint_text(constraints: &[Constraint]) -> String {
    constraints
        .iter()
        .map(|c| match *c {
            Constraint::IoStandard(standard) => standard.to_string(),
            Constraint::Misc(attribute) => attribute.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn signal_line(signal: &Signal) -> String {
    format!(
        "  {:<24} {:<40} {}",
        signal.port,
        signal.pins.join(" "),
        constraint_text(&signal.constraints)
    )
}

pub fn list_handler() -> Result<String, PlatformError> {
    Ok(list_platforms()?.join("\n"))
}

pub fn show_handler(board: &dyn Platform, resource: Option<&str>) -> Result<String, PlatformError> {
    let xilinx = board.xilinx();
    if let Some(text) = resource {
        let (name, number) = parse_resource(text)?;
        let signals = xilinx.lookup(name, number)?;
        return Ok(signals.iter().map(signal_line).collect::<Vec<_>>().join("\n"));
    }

    let info = xilinx.info();
    let flash = &info.spiflash;
    let mut out = String::new();
    let _ = writeln!(out, "{}: {}", board.name(), xilinx.device());
    let _ = writeln!(
        out,
        "toolchain: {}, programmer: {}",
        xilinx.toolchain().kind,
        board.programmer()
    );
    let _ = writeln!(
        out,
        "default clock: {} ({:?} ns)",
        info.default_clk_name, info.default_clk_period
    );
    let _ = writeln!(
        out,
        "flash: {} {} bytes, page {}, sector 0x{:x}, {} dummy bits, clock div {}",
        flash.model,
        flash.total_size,
        flash.page_size,
        flash.sector_size,
        flash.read_dummy_bits,
        flash.clock_div
    );
    let _ = writeln!(out, "gateware region: 0x0..0x{:x}", info.gateware_size);
    let _ = write!(out, "resources:");
    let io = xilinx.io();
    for entry in io.entries() {
        let _ = write!(out, "\n{entry}");
        for signal in io.signals(entry) {
            let _ = write!(out, "\n{}", signal_line(&signal));
        }
    }
    Ok(out)
}
