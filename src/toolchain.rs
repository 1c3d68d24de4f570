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

//! Xilinx implementation toolchains.
//!
//! A [`XilinxToolchain`] turns a [`XilinxPlatform`] with requested resources into the files
//! a vendor tool needs (constraints and a build script) and the command that runs it. Boards
//! tune the flow through two command lists:
//! - `bitstream_commands`, applied just before the bitstream is written
//! - `additional_commands`, run after the bitstream is written
//!
//! Both may contain `{build_name}`, which is replaced with the build name.

pub mod ise;
pub mod vivado;

use crate::config;
use crate::error::PlatformError;
use crate::platforms::xilinx::XilinxPlatform;
use crate::system_io::{fs_create_dir, fs_write};
use crate::tools::ToolInvocation;
use log::info;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolchainKind {
    Vivado,
    Ise,
}

impl ToolchainKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolchainKind::Vivado => "vivado",
            ToolchainKind::Ise => "ise",
        }
    }
}

impl FromStr for ToolchainKind {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vivado" => Ok(ToolchainKind::Vivado),
            "ise" => Ok(ToolchainKind::Ise),
            other => Err(PlatformError::UnsupportedToolchain(other.to_string())),
        }
    }
}

impl fmt::Display for ToolchainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XilinxToolchain {
    pub kind: ToolchainKind,
    pub bitstream_commands: Vec<String>,
    pub additional_commands: Vec<String>,
}

/// Where and what to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub build_dir: PathBuf,
    /// Base name of every generated file.
    pub build_name: String,
    /// Top-level HDL module.
    pub top: String,
    /// HDL and extra constraint sources, by extension: `.v`, `.sv`, `.vhd`, `.vhdl`, `.xdc`.
    pub sources: Vec<PathBuf>,
    /// Run the vendor tool after writing the files.
    pub run: bool,
}

impl BuildRequest {
    pub fn new(build_dir: impl Into<PathBuf>, build_name: impl Into<String>) -> Self {
        let build_name = build_name.into();
        BuildRequest {
            build_dir: build_dir.into(),
            top: build_name.clone(),
            build_name,
            sources: Vec::new(),
            run: false,
        }
    }

    /// Request using the configured build directory and name.
    pub fn from_config() -> Result<Self, PlatformError> {
        let config = config::current()?;
        Ok(BuildRequest::new(config.build_dir, config.build_name))
    }

    pub fn file(&self, extension: &str) -> PathBuf {
        self.build_dir
            .join(format!("{}.{extension}", self.build_name))
    }
}

/// Files written by a build and the command that runs (or ran) the tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildProducts {
    pub constraints: PathBuf,
    pub script: PathBuf,
    /// Written by the tool, so only present after a successful run.
    pub bitstream: PathBuf,
    pub invocation: ToolInvocation,
}

/// HDL language of a source file, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Verilog,
    SystemVerilog,
    Vhdl,
    Constraints,
}

impl SourceKind {
    pub fn of(path: &Path) -> Result<Self, PlatformError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("v") => Ok(SourceKind::Verilog),
            Some("sv") => Ok(SourceKind::SystemVerilog),
            Some("vhd" | "vhdl") => Ok(SourceKind::Vhdl),
            Some("xdc" | "ucf") => Ok(SourceKind::Constraints),
            _ => Err(PlatformError::Argument(format!(
                "Cannot tell the language of source {path:?}"
            ))),
        }
    }
}

/// Replace `{build_name}` in a board command.
pub fn substitute_build_name(command: &str, build_name: &str) -> String {
    command.replace("{build_name}", build_name)
}

/// Sources as absolute paths, since the tools run from the build directory.
///
/// Extra constraint files must be in the toolchain's own format (`xdc` or `ucf`).
fn absolute_sources(
    request: &BuildRequest,
    constraints_extension: &str,
) -> Result<Vec<(SourceKind, PathBuf)>, PlatformError> {
    request
        .sources
        .iter()
        .map(|source| {
            let kind = SourceKind::of(source)?;
            if kind == SourceKind::Constraints
                && source.extension().and_then(|e| e.to_str()) != Some(constraints_extension)
            {
                return Err(PlatformError::Argument(format!(
                    "Constraint source {source:?} is not a .{constraints_extension} file"
                )));
            }
            let path = std::path::absolute(source).map_err(|e| {
                PlatformError::Argument(format!("Cannot resolve source {source:?}: {e}"))
            })?;
            Ok((kind, path))
        })
        .collect()
}

impl XilinxToolchain {
    pub fn new(kind: ToolchainKind) -> Self {
        XilinxToolchain {
            kind,
            bitstream_commands: Vec::new(),
            additional_commands: Vec::new(),
        }
    }

    pub fn constraints_extension(&self) -> &'static str {
        match self.kind {
            ToolchainKind::Vivado => "xdc",
            ToolchainKind::Ise => "ucf",
        }
    }

    pub fn constraints(&self, platform: &XilinxPlatform) -> String {
        match self.kind {
            ToolchainKind::Vivado => vivado::constraints(platform),
            ToolchainKind::Ise => ise::constraints(platform),
        }
    }

    /// Write the constraint file and build script(s) under `request.build_dir`, then run
    /// the tool when `request.run` is set.
    ///
    /// # Returns: `Result<BuildProducts, PlatformError>`
    /// * `Ok(BuildProducts)` - Paths of the generated files and the tool command
    /// * `Err(PlatformError::Argument)` - A source file has an unknown extension, or is a
    ///   constraint file in the other toolchain's format
    /// * `Err(PlatformError::IOCreate)` / `Err(PlatformError::IOWrite)` - Writing files failed
    /// * `Err(PlatformError::Tool)` - The tool failed
    pub fn build(
        &self,
        platform: &XilinxPlatform,
        request: &BuildRequest,
    ) -> Result<BuildProducts, PlatformError> {
        let sources = absolute_sources(request, self.constraints_extension())?;
        fs_create_dir(&request.build_dir)?;

        let constraints = request.file(self.constraints_extension());
        fs_write(&constraints, self.constraints(platform))?;

        let (script, invocation) = match self.kind {
            ToolchainKind::Vivado => {
                let script = request.file("tcl");
                fs_write(&script, vivado::build_script(platform, self, request, &sources))?;
                (script, vivado::invocation(request)?)
            }
            ToolchainKind::Ise => {
                fs_write(&request.file("prj"), ise::project(&sources))?;
                fs_write(&request.file("xst"), ise::xst_script(platform, request))?;
                let script = request
                    .build_dir
                    .join(format!("build_{}.sh", request.build_name));
                fs_write(&script, ise::build_script(self, request)?)?;
                let invocation = ise::invocation(request, &script);
                (script, invocation)
            }
        };

        let products = BuildProducts {
            constraints,
            script,
            bitstream: request.file("bit"),
            invocation,
        };
        info!(
            "Wrote {} build files for {} in {:?}",
            self.kind,
            platform.device(),
            request.build_dir
        );
        if request.run {
            products.invocation.run()?;
            info!("Bitstream written to {:?}", products.bitstream);
        }
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platforms::arty_s7::ArtyS7Platform;
    use crate::platforms::platform::Platform;
    use googletest::prelude::*;
    use rstest::*;

    #[gtest]
    #[rstest]
    #[case::vivado("vivado", ToolchainKind::Vivado)]
    #[case::ise("ise", ToolchainKind::Ise)]
    fn toolchain_names(#[case] name: &str, #[case] kind: ToolchainKind) {
        assert_eq!(name.parse::<ToolchainKind>().ok(), Some(kind));
        assert_eq!(kind.as_str(), name);
    }

    #[gtest]
    fn unknown_toolchain_message() {
        expect_that!(
            "yosys".parse::<ToolchainKind>(),
            err(displays_as(contains_substring("yosys toolchain is not supported")))
        );
    }

    #[gtest]
    #[rstest]
    #[case::verilog("rtl/top.v", SourceKind::Verilog)]
    #[case::systemverilog("rtl/top.sv", SourceKind::SystemVerilog)]
    #[case::vhdl("rtl/top.vhd", SourceKind::Vhdl)]
    #[case::long_vhdl("rtl/top.vhdl", SourceKind::Vhdl)]
    #[case::constraints("extra.xdc", SourceKind::Constraints)]
    fn source_kinds(#[case] path: &str, #[case] kind: SourceKind) {
        assert_eq!(SourceKind::of(Path::new(path)).ok(), Some(kind));
    }

    #[gtest]
    fn unknown_source_kind() {
        expect_that!(
            SourceKind::of(Path::new("top.scala")),
            err(displays_as(contains_substring("top.scala")))
        );
    }

    #[gtest]
    fn build_name_is_substituted_everywhere() {
        expect_that!(
            substitute_build_name(
                "-loadbit \"up 0x0 {build_name}.bit\" -file {build_name}.bin",
                "soc"
            ),
            eq("-loadbit \"up 0x0 soc.bit\" -file soc.bin")
        );
    }

    #[gtest]
    fn request_defaults_top_to_build_name() {
        let request = BuildRequest::new("out", "blinky");
        expect_that!(request.top, eq("blinky"));
        expect_that!(request.file("xdc"), eq(&PathBuf::from("out/blinky.xdc")));
    }

    fn board(toolchain: &str) -> XilinxPlatform {
        ArtyS7Platform::new(toolchain, "vivado")
            .expect("board")
            .xilinx()
            .clone()
    }

    #[gtest]
    fn ise_build_writes_script_and_invocation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let platform = board("ise");
        let request = BuildRequest::new(dir.path(), "blinky");

        let products = platform.build(&request).expect("ise build");
        expect_that!(products.script, eq(&dir.path().join("build_blinky.sh")));
        expect_that!(products.invocation.to_string(), starts_with("bash build_blinky.sh"));
        assert!(request.file("prj").is_file());
        assert!(request.file("xst").is_file());
        assert!(request.file("ucf").is_file());
    }

    #[gtest]
    #[rstest]
    #[case::ucf_for_vivado("vivado", "extra.ucf")]
    #[case::xdc_for_ise("ise", "extra.xdc")]
    fn foreign_constraint_sources_are_rejected(#[case] toolchain: &str, #[case] source: &str) {
        let dir = tempfile::tempdir().expect("tempdir");
        let platform = board(toolchain);
        let mut request = BuildRequest::new(dir.path(), "top");
        request.sources = vec![PathBuf::from(source)];

        let result = platform.build(&request);
        assert!(result.as_ref().is_err_and(|e| e.is_invalid_argument()));
        expect_that!(result, err(displays_as(contains_substring(source))));
        assert!(!request.file("tcl").exists());
    }

    #[gtest]
    fn own_constraint_sources_are_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        let platform = board("vivado");
        let mut request = BuildRequest::new(dir.path(), "top");
        request.sources = vec![PathBuf::from("extra.xdc")];

        platform.build(&request).expect("vivado build");
        let tcl = std::fs::read_to_string(request.file("tcl")).expect("tcl");
        expect_that!(tcl, contains_substring("extra.xdc}"));
    }
}
