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

use crate::show::parse_resource;
use fpgaplat::error::PlatformError;
use fpgaplat::platforms::platform::Platform;
use fpgaplat::toolchain::BuildRequest;
use log::info;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub sources: Vec<PathBuf>,
    pub requests: Vec<String>,
    pub top: Option<String>,
    pub build_dir: Option<PathBuf>,
    pub build_name: Option<String>,
    pub run: bool,
}

/// Apply command line overrides on top of the configured build settings.
pub fn build_request(options: &BuildOptions) -> Result<BuildRequest, PlatformError> {
    let mut request = BuildRequest::from_config()?;
    if let Some(dir) = &options.build_dir {
        request.build_dir = dir.clone();
    }
    if let Some(name) = &options.build_name {
        request.build_name = name.clone();
        request.top = name.clone();
    }
    if let Some(top) = &options.top {
        request.top = top.clone();
    }
    request.sources = options.sources.clone();
    request.run = options.run;
    Ok(request)
}

pub fn build_handler(
    board: &mut dyn Platform,
    options: &BuildOptions,
) -> Result<String, PlatformError> {
    for text in &options.requests {
        let (name, number) = parse_resource(text)?;
        let signals = board.xilinx_mut().request(name, number)?;
        info!("Requested {text} ({} signals)", signals.len());
    }
    let request = build_request(options)?;
    let products = board.xilinx().build(&request)?;
    let mut lines = vec![
        format!("constraints: {}", products.constraints.display()),
        format!("script: {}", products.script.display()),
    ];
    if request.run {
        lines.push(format!("bitstream: {}", products.bitstream.display()));
    } else {
        lines.push(format!("run with: {}", products.invocation));
    }
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fpgaplat::platforms::arty_s7::ArtyS7Platform;
    use googletest::prelude::*;

    #[gtest]
    fn writes_files_without_running() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut board = ArtyS7Platform::new("vivado", "vivado").expect("board");
        let options = BuildOptions {
            requests: vec!["clk100".to_string(), "user_led:0".to_string()],
            build_dir: Some(dir.path().to_path_buf()),
            build_name: Some("blinky".to_string()),
            ..Default::default()
        };

        let out = build_handler(&mut board, &options).expect("build");
        expect_that!(out, contains_substring("blinky.xdc"));
        expect_that!(out, contains_substring("run with: vivado -mode batch -source blinky.tcl"));
        let xdc = std::fs::read_to_string(dir.path().join("blinky.xdc")).expect("xdc");
        expect_that!(xdc, contains_substring("create_clock -name clk100 -period 10.0"));
    }

    #[gtest]
    fn top_overrides_build_name() {
        let options = BuildOptions {
            build_name: Some("soc".to_string()),
            top: Some("soc_top".to_string()),
            ..Default::default()
        };
        let request = build_request(&options).expect("request");
        expect_that!(request.build_name, eq("soc"));
        expect_that!(request.top, eq("soc_top"));
    }

    #[gtest]
    fn unknown_resource_stops_the_build() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut board = ArtyS7Platform::new("vivado", "vivado").expect("board");
        let options = BuildOptions {
            requests: vec!["hdmi".to_string()],
            build_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        expect_that!(
            build_handler(&mut board, &options),
            err(displays_as(contains_substring("hdmi")))
        );
        assert!(!dir.path().join("top.xdc").exists());
    }
}
