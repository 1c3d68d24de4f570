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

use crate::config::config_files::{TomlConfig, config_from_file};
use crate::error::PlatformError;
use log::{trace, warn};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};

// These are hardcoded backups used when no config file provides a value
pub static DEFAULT_PLATFORM: &str = "arty_s7";
pub static DEFAULT_TOOLCHAIN: &str = "vivado";
pub static DEFAULT_BUILD_DIR: &str = "build";
pub static DEFAULT_BUILD_NAME: &str = "top";
pub static DEFAULT_VIVADO_PATH: &str = "vivado";
pub static DEFAULT_XC3SPROG_PATH: &str = "xc3sprog";
pub static DEFAULT_OPENOCD_PATH: &str = "openocd";

pub static VENDOR_CONFIG_PATH: &str = "/usr/lib/fpgaplat/config.toml";
pub static USER_CONFIG_PATH: &str = "/etc/fpgaplat/config.toml";

/// Fully resolved configuration. Only the programmer has no hardcoded fallback since each
/// board picks its own.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemConfig {
    pub platform: String,
    pub toolchain: String,
    pub programmer: Option<String>,
    pub build_dir: PathBuf,
    pub build_name: String,
    pub vivado_path: String,
    /// Directory holding the ISE binaries. Empty means "rely on PATH".
    pub ise_bin_dir: String,
    pub xc3sprog_path: String,
    pub openocd_path: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

impl From<TomlConfig> for SystemConfig {
    fn from(value: TomlConfig) -> Self {
        trace!("Creating SystemConfig from {value:?}");
        let defaults = value.defaults.unwrap_or_default();
        let build = value.build.unwrap_or_default();
        let tools = value.tools.unwrap_or_default();
        SystemConfig {
            platform: defaults.platform.unwrap_or_else(|| {
                trace!("No platform provided. Using hardcoded value.");
                DEFAULT_PLATFORM.to_string()
            }),
            toolchain: defaults.toolchain.unwrap_or_else(|| {
                trace!("No toolchain provided. Using hardcoded value.");
                DEFAULT_TOOLCHAIN.to_string()
            }),
            programmer: defaults.programmer,
            build_dir: PathBuf::from(build.build_dir.unwrap_or_else(|| {
                trace!("No build_dir provided. Using hardcoded value.");
                DEFAULT_BUILD_DIR.to_string()
            })),
            build_name: build
                .build_name
                .unwrap_or_else(|| DEFAULT_BUILD_NAME.to_string()),
            vivado_path: tools
                .vivado_path
                .unwrap_or_else(|| DEFAULT_VIVADO_PATH.to_string()),
            ise_bin_dir: tools.ise_bin_dir.unwrap_or_default(),
            xc3sprog_path: tools
                .xc3sprog_path
                .unwrap_or_else(|| DEFAULT_XC3SPROG_PATH.to_string()),
            openocd_path: tools
                .openocd_path
                .unwrap_or_else(|| DEFAULT_OPENOCD_PATH.to_string()),
        }
    }
}

static CONFIG: OnceLock<Mutex<SystemConfig>> = OnceLock::new();

fn config_or_empty(path: &Path) -> TomlConfig {
    config_from_file(path).unwrap_or_else(|e| {
        warn!("Ignoring config {path:?} because loading it failed: {e}");
        TomlConfig::default()
    })
}

/// User config overrides vendor config and vendor config overrides hardcoded defaults
fn init_system_config() -> Mutex<SystemConfig> {
    let vendor_config = config_or_empty(Path::new(VENDOR_CONFIG_PATH));
    let user_config = config_or_empty(Path::new(USER_CONFIG_PATH));
    trace!("Merging user_config: {user_config:?} with vendor_config {vendor_config:?}");
    let merged = user_config.merge(vendor_config);
    let ret = Mutex::new(merged.into());
    trace!("Resulting config: {ret:?}");
    ret
}

pub fn system_config() -> &'static Mutex<SystemConfig> {
    CONFIG.get_or_init(init_system_config)
}

pub fn system_config_guard() -> Result<MutexGuard<'static, SystemConfig>, PlatformError> {
    system_config()
        .lock()
        .map_err(|e| PlatformError::Internal(format!("Failed when locking config: {e}")))
}

/// Layer an extra config file (e.g. one given on the command line) over the user and vendor
/// files. Unlike those, a missing or broken file here is an error.
pub fn load_config_file(path: &Path) -> Result<(), PlatformError> {
    let extra = config_from_file(path)?;
    let vendor_config = config_or_empty(Path::new(VENDOR_CONFIG_PATH));
    let user_config = config_or_empty(Path::new(USER_CONFIG_PATH));
    let merged: SystemConfig = extra.merge(user_config.merge(vendor_config)).into();
    trace!("Config after loading {path:?}: {merged:?}");
    *system_config_guard()? = merged;
    Ok(())
}

/// Snapshot of the current configuration.
pub fn current() -> Result<SystemConfig, PlatformError> {
    Ok(system_config_guard()?.clone())
}

pub fn vivado_path() -> Result<String, PlatformError> {
    Ok(system_config_guard()?.vivado_path.clone())
}

pub fn ise_bin_dir() -> Result<String, PlatformError> {
    Ok(system_config_guard()?.ise_bin_dir.clone())
}

pub fn xc3sprog_path() -> Result<String, PlatformError> {
    Ok(system_config_guard()?.xc3sprog_path.clone())
}

pub fn openocd_path() -> Result<String, PlatformError> {
    Ok(system_config_guard()?.openocd_path.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config_files::toml_str_to_config;
    use googletest::prelude::*;

    #[gtest]
    fn empty_config_uses_hardcoded_values() {
        let config = SystemConfig::default();
        expect_that!(config.platform, eq("arty_s7"));
        expect_that!(config.toolchain, eq("vivado"));
        expect_that!(config.programmer, none());
        expect_that!(config.build_dir, eq(&PathBuf::from("build")));
        expect_that!(config.build_name, eq("top"));
        expect_that!(config.ise_bin_dir, eq(""));
    }

    #[gtest]
    fn provided_values_are_kept() {
        let toml_config = toml_str_to_config(
            "[defaults]\nprogrammer = \"xc3sprog\"\n[build]\nbuild_dir = \"out\"\n[tools]\nvivado_path = \"/opt/v/vivado\"\n",
        )
        .expect("config should parse");
        let config = SystemConfig::from(toml_config);
        expect_that!(config.programmer, some(eq("xc3sprog")));
        expect_that!(config.build_dir, eq(&PathBuf::from("out")));
        expect_that!(config.vivado_path, eq("/opt/v/vivado"));
        expect_that!(config.openocd_path, eq("openocd"));
    }
}
