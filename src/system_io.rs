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

//! Error Wrapping File System I/O Helpers
//!
//! Thin wrappers around std file operations which log at trace level and convert failures
//! into [`PlatformError`] variants carrying the offending path. Used for reading config
//! files and writing build products (constraint files, scripts).
//!
//! # Examples
//!
//! ```rust,no_run
//! # use fpgaplat::system_io::{fs_create_dir, fs_write};
//! # use std::path::Path;
//! # fn example() -> Result<(), fpgaplat::error::PlatformError> {
//! fs_create_dir(Path::new("build"))?;
//! fs_write(Path::new("build/top.xdc"), "set_property LOC E18 [get_ports user_led0]\n")?;
//! # Ok(())
//! # }
//! ```

use crate::error::PlatformError;
use log::trace;
use std::fs::{OpenOptions, create_dir_all};
use std::io::{Read, Write};
use std::path::Path;

/// Read the contents of a file to a String.
///
/// # Returns: `Result<String, PlatformError>`
/// * `Ok(String)` - The complete contents of the file
/// * `Err(PlatformError::IORead)` - If the file cannot be read (doesn't exist, permissions, etc.)
pub fn fs_read(file_path: &Path) -> Result<String, PlatformError> {
    trace!("Attempting to read from {file_path:?}");
    let mut buf: String = String::new();
    let result = OpenOptions::new()
        .read(true)
        .open(file_path)
        .and_then(|mut f| f.read_to_string(&mut buf));

    match result {
        Ok(_) => {
            trace!("Reading done");
            Ok(buf)
        }
        Err(e) => Err(PlatformError::IORead {
            file: file_path.into(),
            e,
        }),
    }
}

/// Write a string to a file, creating it if needed and replacing any previous content.
///
/// # Returns: `Result<(), PlatformError>`
/// * `Ok(())` - Write succeeded
/// * `Err(PlatformError::IOWrite)` - If the file cannot be opened or written
pub fn fs_write(file_path: &Path, value: impl AsRef<str>) -> Result<(), PlatformError> {
    trace!(
        "Attempting to write {} bytes to {:?}",
        value.as_ref().len(),
        file_path
    );
    let result = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(file_path)
        .and_then(|mut f| f.write_all(value.as_ref().as_bytes()));
    match result {
        Ok(_) => {
            trace!("Write done.");
            Ok(())
        }
        Err(e) => Err(PlatformError::IOWrite {
            file: file_path.into(),
            e,
        }),
    }
}

/// Recursively create directories up to the specified path.
///
/// # Returns: `Result<(), PlatformError>`
/// * `Ok(())` - Directory created (or already existed)
/// * `Err(PlatformError::IOCreate)` - If directory creation fails
pub fn fs_create_dir(path: &Path) -> Result<(), PlatformError> {
    trace!("Attempting to Create '{path:?}'");
    match create_dir_all(path) {
        Ok(_) => {
            trace!("Directory created at {path:?}.");
            Ok(())
        }
        Err(e) => Err(PlatformError::IOCreate {
            file: path.into(),
            e,
        }),
    }
}

/// Size of a file in bytes.
///
/// # Returns: `Result<u64, PlatformError>`
/// * `Ok(u64)` - Length reported by the file's metadata
/// * `Err(PlatformError::IORead)` - If the metadata cannot be read
pub fn fs_file_size(file_path: &Path) -> Result<u64, PlatformError> {
    trace!("Reading metadata of {file_path:?}");
    std::fs::metadata(file_path)
        .map(|m| m.len())
        .map_err(|e| PlatformError::IORead {
            file: file_path.into(),
            e,
        })
}
