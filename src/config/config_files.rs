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

//! TOML config file parsing.
//!
//! Every field is optional so that files can be layered: values from a higher priority file
//! win, missing values fall through to the next file and finally to the hardcoded defaults in
//! [`system_config`](super::system_config).
//!
//! ```toml
//! [defaults]
//! platform = "arty_s7"
//! toolchain = "vivado"
//! programmer = "xc3sprog"
//!
//! [build]
//! build_dir = "build/arty_s7"
//! build_name = "top"
//!
//! [tools]
//! vivado_path = "/opt/Xilinx/Vivado/2024.2/bin/vivado"
//! ise_bin_dir = "/opt/Xilinx/14.7/ISE_DS/ISE/bin/lin64"
//! xc3sprog_path = "xc3sprog"
//! openocd_path = "openocd"
//! ```

use crate::error::PlatformError;
use crate::system_io::fs_read;
use log::trace;
use serde::Deserialize;
use std::path::Path;

/// This is the top level struct which holds all sections
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub defaults: Option<Defaults>,
    pub build: Option<Build>,
    pub tools: Option<Tools>,
}

/// The `[defaults]` section: what to use when the command line doesn't say.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    pub platform: Option<String>,
    pub toolchain: Option<String>,
    pub programmer: Option<String>,
}

/// The `[build]` section.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Build {
    pub build_dir: Option<String>,
    pub build_name: Option<String>,
}

/// The `[tools]` section: where to find the external programs.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Tools {
    pub vivado_path: Option<String>,
    pub ise_bin_dir: Option<String>,
    pub xc3sprog_path: Option<String>,
    pub openocd_path: Option<String>,
}

impl Defaults {
    pub(crate) fn merge(self, fallback: Defaults) -> Defaults {
        Defaults {
            platform: self.platform.or(fallback.platform),
            toolchain: self.toolchain.or(fallback.toolchain),
            programmer: self.programmer.or(fallback.programmer),
        }
    }
}

impl Build {
    pub(crate) fn merge(self, fallback: Build) -> Build {
        Build {
            build_dir: self.build_dir.or(fallback.build_dir),
            build_name: self.build_name.or(fallback.build_name),
        }
    }
}

impl Tools {
    pub(crate) fn merge(self, fallback: Tools) -> Tools {
        Tools {
            vivado_path: self.vivado_path.or(fallback.vivado_path),
            ise_bin_dir: self.ise_bin_dir.or(fallback.ise_bin_dir),
            xc3sprog_path: self.xc3sprog_path.or(fallback.xc3sprog_path),
            openocd_path: self.openocd_path.or(fallback.openocd_path),
        }
    }
}

fn merge_section<T>(high: Option<T>, low: Option<T>, merge: fn(T, T) -> T) -> Option<T> {
    match (high, low) {
        (Some(high), Some(low)) => Some(merge(high, low)),
        (high, low) => high.or(low),
    }
}

impl TomlConfig {
    /// Layer `self` on top of `fallback`, field by field.
    pub fn merge(self, fallback: TomlConfig) -> TomlConfig {
        TomlConfig {
            defaults: merge_section(self.defaults, fallback.defaults, Defaults::merge),
            build: merge_section(self.build, fallback.build, Build::merge),
            tools: merge_section(self.tools, fallback.tools, Tools::merge),
        }
    }
}

pub(crate) fn toml_str_to_config(toml_string: &str) -> Result<TomlConfig, PlatformError> {
    let config: TomlConfig = match toml::from_str(toml_string) {
        Ok(config) => config,
        Err(e) => {
            return Err(PlatformError::TomlDe {
                toml_string: toml_string.into(),
                e,
            });
        }
    };
    Ok(config)
}

/// Read and parse a config file.
///
/// # Returns: `Result<TomlConfig, PlatformError>`
/// * `Ok(TomlConfig)` - Parsed file
/// * `Err(PlatformError::Internal)` - `file_path` is not a file
/// * `Err(PlatformError::IORead)` - The file could not be read
/// * `Err(PlatformError::TomlDe)` - The file is not valid config TOML
pub fn config_from_file(file_path: &Path) -> Result<TomlConfig, PlatformError> {
    if !file_path.is_file() {
        return Err(PlatformError::Internal(format!(
            "Config file not found in {file_path:?}"
        )));
    }
    let config = toml_str_to_config(&fs_read(file_path)?)?;
    trace!("Parsed {file_path:?}: {config:?}");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;
    use rstest::*;

    #[gtest]
    fn full_file_parses() {
        let config = toml_str_to_config(
            r#"
            [defaults]
            platform = "arty"
            programmer = "openocd"

            [build]
            build_name = "soc"

            [tools]
            vivado_path = "/opt/vivado/bin/vivado"
            "#,
        )
        .expect("valid config should parse");
        let defaults = config.defaults.expect("defaults section missing");
        expect_that!(defaults.platform, some(eq("arty")));
        expect_that!(defaults.toolchain, none());
        expect_that!(config.build.and_then(|b| b.build_name), some(eq("soc")));
    }

    #[gtest]
    #[rstest]
    #[case::unknown_section("[flash]\nsize = 1\n")]
    #[case::unknown_key("[defaults]\nboard = \"arty\"\n")]
    #[case::wrong_type("[defaults]\nplatform = 7\n")]
    fn bad_files_are_rejected(#[case] toml_string: &str) {
        expect_that!(
            toml_str_to_config(toml_string),
            err(displays_as(contains_substring("PlatformError::TomlDe")))
        );
    }

    #[gtest]
    fn user_values_win_and_missing_fall_through() {
        let user = toml_str_to_config("[defaults]\nprogrammer = \"xc3sprog\"\n")
            .expect("user config should parse");
        let vendor = toml_str_to_config(
            "[defaults]\nplatform = \"arty_s7\"\nprogrammer = \"vivado\"\n[tools]\nopenocd_path = \"/usr/bin/openocd\"\n",
        )
        .expect("vendor config should parse");

        let merged = user.merge(vendor);
        let defaults = merged.defaults.expect("defaults section missing");
        expect_that!(defaults.programmer, some(eq("xc3sprog")));
        expect_that!(defaults.platform, some(eq("arty_s7")));
        expect_that!(
            merged.tools.and_then(|t| t.openocd_path),
            some(eq("/usr/bin/openocd"))
        );
    }

    #[gtest]
    fn missing_file_is_reported() {
        expect_that!(
            config_from_file(Path::new("/nonexistent/fpgaplat.toml")),
            err(displays_as(contains_substring("Config file not found")))
        );
    }
}
