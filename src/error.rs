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

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("PlatformError::Argument: {0}")]
    Argument(String),
    #[error("PlatformError::UnsupportedProgrammer: {0} programmer is not supported")]
    UnsupportedProgrammer(String),
    #[error("PlatformError::UnsupportedToolchain: {0} toolchain is not supported")]
    UnsupportedToolchain(String),
    #[error("PlatformError::UnknownPlatform: no platform registered as {0:?}")]
    UnknownPlatform(String),
    #[error("PlatformError::DuplicateResource: {name}:{number} is declared more than once")]
    DuplicateResource { name: String, number: u32 },
    #[error("PlatformError::ResourceNotFound: {name}:{index} is not available on this platform", index = .number.map_or("*".to_string(), |n| n.to_string()))]
    ResourceNotFound { name: String, number: Option<u32> },
    #[error("PlatformError::ResourceAlreadyRequested: {name}:{number} has already been requested")]
    ResourceAlreadyRequested { name: String, number: u32 },
    #[error("PlatformError::PinConflict: pin {pin} of {requested} is already used by {owner}")]
    PinConflict {
        pin: String,
        requested: String,
        owner: String,
    },
    #[error("PlatformError::IORead: An IO error occurred when reading from {file:?}: {e}")]
    IORead { file: PathBuf, e: std::io::Error },
    #[error("PlatformError::IOWrite: An IO error occurred when writing to {file:?}: {e}")]
    IOWrite { file: PathBuf, e: std::io::Error },
    #[error("PlatformError::IOCreate: An IO error occurred when creating {file:?}: {e}")]
    IOCreate { file: PathBuf, e: std::io::Error },
    #[error("PlatformError::Tool: running {program:?} failed: {e}")]
    Tool { program: String, e: std::io::Error },
    #[error("PlatformError::TomlDe: Failed to parse {toml_string:?}: {e}")]
    TomlDe {
        toml_string: String,
        e: toml::de::Error,
    },
    #[error("PlatformError::Internal: An Internal error occurred: {0}")]
    Internal(String),
}

impl PlatformError {
    /// Whether the error was caused by a bad value passed in by the caller, as opposed to the
    /// environment (files, external tools) or a bug.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            PlatformError::Argument(..)
                | PlatformError::UnsupportedProgrammer(..)
                | PlatformError::UnsupportedToolchain(..)
                | PlatformError::UnknownPlatform(..)
                | PlatformError::ResourceNotFound { .. }
        )
    }
}
