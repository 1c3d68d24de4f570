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
use fpgaplat::platforms::platform::Platform;
use fpgaplat::system_io::fs_file_size;
use std::path::Path;

/// Flash address as decimal or `0x` prefixed hex.
pub fn parse_address(value: &str) -> Result<u32, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|e| format!("invalid flash address {value:?}: {e}"))
}

pub fn load_handler(
    board: &dyn Platform,
    file: &Path,
    dry_run: bool,
) -> Result<String, PlatformError> {
    let programmer = board.create_programmer()?;
    if dry_run {
        return Ok(programmer.load_bitstream_invocation(file)?.to_string());
    }
    programmer.load_bitstream(file)?;
    Ok(format!("{} loaded with {}", file.display(), programmer.name()))
}

pub fn flash_handler(
    board: &dyn Platform,
    file: &Path,
    address: u32,
    dry_run: bool,
) -> Result<String, PlatformError> {
    let length = fs_file_size(file)?;
    board.xilinx().check_flash_region(address, length)?;
    let programmer = board.create_programmer()?;
    if dry_run {
        return Ok(programmer.flash_invocation(address, file)?.to_string());
    }
    programmer.flash(address, file)?;
    Ok(format!(
        "{} ({length} bytes) written to flash at 0x{address:x} with {}",
        file.display(),
        programmer.name()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fpgaplat::platforms::arty_s7::ArtyS7Platform;
    use googletest::prelude::*;
    use rstest::*;
    use std::io::Write;

    #[gtest]
    #[rstest]
    #[case::decimal("4096", 4096)]
    #[case::hex("0x220000", 0x220000)]
    #[case::upper_hex("0X10", 16)]
    fn addresses(#[case] value: &str, #[case] expected: u32) {
        assert_eq!(parse_address(value), Ok(expected));
    }

    #[gtest]
    fn bad_address() {
        expect_that!(parse_address("0xzz"), err(contains_substring("invalid flash address")));
    }

    #[gtest]
    fn dry_run_load_prints_the_command() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(b"bits").expect("write");
        let board = ArtyS7Platform::new("vivado", "xc3sprog").expect("board");
        let out = load_handler(&board, file.path(), true).expect("dry run");
        expect_that!(out, contains_substring("-c nexys4"));
    }

    #[gtest]
    fn unaligned_flash_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(&[0u8; 16]).expect("write");
        let board = ArtyS7Platform::new("vivado", "vivado").expect("board");
        let result = flash_handler(&board, file.path(), 0x100, true);
        assert!(result.as_ref().is_err_and(|e| e.is_invalid_argument()));
    }

    #[gtest]
    fn unsupported_programmer_fails_before_running() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(b"bits").expect("write");
        let board = ArtyS7Platform::new("vivado", "openocd").expect("board");
        expect_that!(
            load_handler(&board, file.path(), true),
            err(displays_as(ends_with("openocd programmer is not supported")))
        );
    }
}
