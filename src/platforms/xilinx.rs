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

//! Generic Xilinx platform.
//!
//! [`XilinxPlatform`] holds everything a gateware build needs to know about a board that is
//! not specific to one board: the device part, the I/O table, the toolchain with its
//! command lists, and the extra platform commands for the constraint file. Designs
//! *request* resources from it; only requested resources end up constrained.

use crate::error::PlatformError;
use crate::platforms::resources::{IoEntry, IoTable, Signal};
use crate::toolchain::{BuildProducts, BuildRequest, ToolchainKind, XilinxToolchain};
use log::{debug, trace, warn};

/// Geometry and timing of the board's configuration SPI flash.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiFlash {
    pub model: &'static str,
    pub read_dummy_bits: u32,
    pub clock_div: u32,
    /// Bytes.
    pub total_size: u32,
    pub page_size: u32,
    pub sector_size: u32,
}

impl SpiFlash {
    /// Check that `length` bytes written at `address` start on a sector boundary and stay
    /// inside the flash.
    pub fn check_region(&self, address: u32, length: u64) -> Result<(), PlatformError> {
        if address % self.sector_size != 0 {
            return Err(PlatformError::Argument(format!(
                "Flash address 0x{address:x} is not aligned to the {} sector size 0x{:x}",
                self.model, self.sector_size
            )));
        }
        let end = u64::from(address) + length;
        if end > u64::from(self.total_size) {
            return Err(PlatformError::Argument(format!(
                "{length} bytes at 0x{address:x} do not fit in the {} ({} bytes)",
                self.model, self.total_size
            )));
        }
        Ok(())
    }
}

/// Fixed per-board values that are not part of the I/O table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardInfo {
    /// Resource constrained as the main clock when requested.
    pub default_clk_name: &'static str,
    /// Nanoseconds.
    pub default_clk_period: f64,
    /// Bytes of flash reserved for the bitstream, from address 0.
    pub gateware_size: u32,
    pub spiflash: SpiFlash,
}

#[derive(Debug, Clone)]
struct RequestedResource {
    entry: &'static IoEntry,
    signals: Vec<Signal>,
}

#[derive(Debug, Clone)]
pub struct XilinxPlatform {
    device: &'static str,
    io: IoTable,
    info: BoardInfo,
    toolchain: XilinxToolchain,
    platform_commands: Vec<String>,
    requested: Vec<RequestedResource>,
}

impl XilinxPlatform {
    /// # Returns: `Result<XilinxPlatform, PlatformError>`
    /// * `Ok(XilinxPlatform)` - Platform with empty command lists and no requested resources
    /// * `Err(PlatformError::DuplicateResource)` - `io` declares a `(name, number)` twice
    /// * `Err(PlatformError::UnsupportedToolchain)` - `toolchain` is not `vivado` or `ise`
    pub fn new(
        device: &'static str,
        io: IoTable,
        info: BoardInfo,
        toolchain: &str,
    ) -> Result<Self, PlatformError> {
        if let Some(duplicate) = io.first_duplicate() {
            return Err(PlatformError::DuplicateResource {
                name: duplicate.name.to_string(),
                number: duplicate.number,
            });
        }
        let kind: ToolchainKind = toolchain.parse()?;
        debug!(
            "Creating {device} platform with {} I/O entries and the {kind} toolchain",
            io.len()
        );
        Ok(XilinxPlatform {
            device,
            io,
            info,
            toolchain: XilinxToolchain::new(kind),
            platform_commands: Vec::new(),
            requested: Vec::new(),
        })
    }

    pub fn device(&self) -> &'static str {
        self.device
    }

    pub fn io(&self) -> IoTable {
        self.io
    }

    pub fn info(&self) -> &BoardInfo {
        &self.info
    }

    pub fn toolchain(&self) -> &XilinxToolchain {
        &self.toolchain
    }

    pub fn toolchain_mut(&mut self) -> &mut XilinxToolchain {
        &mut self.toolchain
    }

    pub fn platform_commands(&self) -> &[String] {
        &self.platform_commands
    }

    /// Append a raw command to the end of the generated constraint file.
    pub fn add_platform_command(&mut self, command: impl Into<String>) {
        let command = command.into();
        trace!("Adding platform command: {command}");
        self.platform_commands.push(command);
    }

    fn is_requested(&self, entry: &IoEntry) -> bool {
        self.requested
            .iter()
            .any(|r| r.entry.name == entry.name && r.entry.number == entry.number)
    }

    fn resolve(&self, name: &str, number: Option<u32>) -> Result<&'static IoEntry, PlatformError> {
        let not_found = || PlatformError::ResourceNotFound {
            name: name.to_string(),
            number,
        };
        match number {
            Some(number) => self.io.find(name, number).ok_or_else(not_found),
            None => {
                let mut candidates = self.io.named(name).peekable();
                let first = *candidates.peek().ok_or_else(not_found)?;
                Ok(candidates.find(|e| !self.is_requested(e)).unwrap_or(first))
            }
        }
    }

    /// Resolve a resource to its signals without reserving it.
    ///
    /// `number = None` picks the first entry with that name not requested yet, or the first
    /// entry when all are taken.
    pub fn lookup(&self, name: &str, number: Option<u32>) -> Result<Vec<Signal>, PlatformError> {
        let entry = self.resolve(name, number)?;
        Ok(self.io.signals(entry))
    }

    /// Reserve a resource for the design and return its signals.
    ///
    /// # Returns: `Result<Vec<Signal>, PlatformError>`
    /// * `Ok(Vec<Signal>)` - Signals of the resource, which will be constrained by builds
    /// * `Err(PlatformError::ResourceNotFound)` - No such resource on this board
    /// * `Err(PlatformError::ResourceAlreadyRequested)` - The resource (or, with
    ///   `number = None`, every resource of that name) is already reserved
    /// * `Err(PlatformError::PinConflict)` - One of its pins belongs to another reserved
    ///   resource
    pub fn request(
        &mut self,
        name: &str,
        number: Option<u32>,
    ) -> Result<Vec<Signal>, PlatformError> {
        let entry = self.resolve(name, number)?;
        if self.is_requested(entry) {
            return Err(PlatformError::ResourceAlreadyRequested {
                name: entry.name.to_string(),
                number: entry.number,
            });
        }
        for pin in entry.all_pins() {
            if let Some(owner) = self
                .requested
                .iter()
                .find(|r| r.entry.all_pins().contains(&pin))
            {
                return Err(PlatformError::PinConflict {
                    pin: pin.to_string(),
                    requested: entry.to_string(),
                    owner: owner.entry.to_string(),
                });
            }
        }

        let signals = self.io.signals(entry);
        trace!(
            "Requested {entry}: {:?}",
            signals.iter().map(|s| &s.port).collect::<Vec<_>>()
        );
        self.requested.push(RequestedResource {
            entry,
            signals: signals.clone(),
        });
        Ok(signals)
    }

    /// Signals of every requested resource, in request order.
    pub fn requested_signals(&self) -> impl Iterator<Item = &Signal> {
        self.requested.iter().flat_map(|r| r.signals.iter())
    }

    /// The default clock signal with its period in ns, if it was requested.
    pub fn default_clock(&self) -> Option<(&Signal, f64)> {
        self.requested
            .iter()
            .find(|r| r.entry.name == self.info.default_clk_name)
            .and_then(|r| r.signals.first())
            .map(|signal| (signal, self.info.default_clk_period))
    }

    /// Check a flash write against the board's SPI flash geometry.
    pub fn check_flash_region(&self, address: u32, length: u64) -> Result<(), PlatformError> {
        self.info.spiflash.check_region(address, length)?;
        if address == 0 && length > u64::from(self.info.gateware_size) {
            warn!(
                "{length} byte image at 0x0 is larger than the 0x{:x} byte gateware region",
                self.info.gateware_size
            );
        }
        Ok(())
    }

    /// Constraint file contents for the selected toolchain.
    pub fn constraints(&self) -> String {
        self.toolchain.constraints(self)
    }

    /// Write the build files for the selected toolchain and optionally run it.
    pub fn build(&self, request: &BuildRequest) -> Result<BuildProducts, PlatformError> {
        self.toolchain.build(self, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platforms::resources::IoItem::*;
    use googletest::prelude::*;
    use rstest::*;

    static IO: &[IoEntry] = &[
        IoEntry::new("user_led", 0, &[Pins(&["E18"]), IoStandard("LVCMOS33")]),
        IoEntry::new("user_led", 1, &[Pins(&["F13"]), IoStandard("LVCMOS33")]),
        IoEntry::new("clk100", 0, &[Pins(&["R2"]), IoStandard("SSTL135")]),
        IoEntry::new(
            "spiflash_4x",
            0,
            &[
                Subsignal("cs_n", &[Pins(&["M13"])]),
                Subsignal("dq", &[Pins(&["K17", "K18", "L14", "M15"])]),
                IoStandard("LVCMOS33"),
            ],
        ),
        IoEntry::new(
            "spiflash_1x",
            0,
            &[
                Subsignal("cs_n", &[Pins(&["M13"])]),
                Subsignal("mosi", &[Pins(&["K17"])]),
                IoStandard("LVCMOS33"),
            ],
        ),
    ];

    const INFO: BoardInfo = BoardInfo {
        default_clk_name: "clk100",
        default_clk_period: 10.0,
        gateware_size: 0x220000,
        spiflash: SpiFlash {
            model: "S25FL128S",
            read_dummy_bits: 10,
            clock_div: 4,
            total_size: 16777216,
            page_size: 256,
            sector_size: 0x10000,
        },
    };

    #[fixture]
    fn platform() -> XilinxPlatform {
        XilinxPlatform::new("xc7s50csga324-1", IoTable::new(IO), INFO, "vivado")
            .expect("valid platform")
    }

    #[gtest]
    fn duplicate_entries_are_rejected() {
        static DUPLICATED: &[IoEntry] = &[
            IoEntry::new("user_led", 0, &[Pins(&["E18"])]),
            IoEntry::new("user_led", 0, &[Pins(&["F13"])]),
        ];
        let result =
            XilinxPlatform::new("xc7s50csga324-1", IoTable::new(DUPLICATED), INFO, "vivado");
        expect_that!(
            result.err().map(|e| e.to_string()),
            some(contains_substring("user_led:0 is declared more than once"))
        );
    }

    #[gtest]
    #[rstest]
    #[case::quartus("quartus")]
    #[case::capitalized("Vivado")]
    #[case::empty("")]
    fn unknown_toolchains_are_rejected(#[case] toolchain: &str) {
        let result = XilinxPlatform::new("xc7s50csga324-1", IoTable::new(IO), INFO, toolchain);
        assert!(matches!(result, Err(PlatformError::UnsupportedToolchain(_))));
    }

    #[gtest]
    #[rstest]
    fn request_without_number_takes_next_free(mut platform: XilinxPlatform) {
        let first = platform.request("user_led", None).expect("first led");
        let second = platform.request("user_led", None).expect("second led");
        expect_that!(first[0].port, eq("user_led0"));
        expect_that!(second[0].port, eq("user_led1"));
        expect_that!(
            platform.request("user_led", None).err().map(|e| e.to_string()),
            some(contains_substring("has already been requested"))
        );
    }

    #[gtest]
    #[rstest]
    fn request_twice_fails(mut platform: XilinxPlatform) {
        platform.request("clk100", Some(0)).expect("clk100");
        let result = platform.request("clk100", Some(0));
        assert!(matches!(
            result,
            Err(PlatformError::ResourceAlreadyRequested { number: 0, .. })
        ));
    }

    #[gtest]
    #[rstest]
    fn shared_pins_conflict(mut platform: XilinxPlatform) {
        platform.request("spiflash_4x", None).expect("spiflash_4x");
        let result = platform.request("spiflash_1x", None);
        expect_that!(
            result.err().map(|e| e.to_string()),
            some(contains_substring("pin M13 of spiflash_1x:0 is already used by spiflash_4x:0"))
        );
    }

    #[gtest]
    #[rstest]
    #[case::wrong_number("user_led", Some(7))]
    #[case::wrong_name("user_btn", None)]
    fn missing_resources(
        mut platform: XilinxPlatform,
        #[case] name: &str,
        #[case] number: Option<u32>,
    ) {
        let result = platform.request(name, number);
        assert!(result.as_ref().is_err_and(|e| e.is_invalid_argument()));
        expect_that!(
            result.err().map(|e| e.to_string()),
            some(contains_substring(name))
        );
    }

    #[gtest]
    #[rstest]
    fn lookup_does_not_reserve(mut platform: XilinxPlatform) {
        platform.lookup("clk100", None).expect("lookup");
        assert!(platform.default_clock().is_none());
        platform.request("clk100", None).expect("request after lookup");
        let (signal, period) = platform.default_clock().expect("clock requested");
        expect_that!(signal.port, eq("clk100"));
        assert_eq!(period, 10.0);
    }

    #[gtest]
    #[rstest]
    fn platform_commands_keep_order(mut platform: XilinxPlatform) {
        platform.add_platform_command("set_property INTERNAL_VREF 0.675 [get_iobanks 34]");
        platform.add_platform_command("set_property CFGBVS VCCO [current_design]");
        assert_eq!(
            platform.platform_commands(),
            [
                "set_property INTERNAL_VREF 0.675 [get_iobanks 34]",
                "set_property CFGBVS VCCO [current_design]"
            ]
        );
    }

    #[gtest]
    #[rstest]
    #[case::whole_flash(0, 16777216)]
    #[case::after_gateware(0x220000, 4096)]
    #[case::last_sector(0xff0000, 0x10000)]
    fn flash_regions_that_fit(platform: XilinxPlatform, #[case] address: u32, #[case] length: u64) {
        expect_that!(platform.check_flash_region(address, length), ok(anything()));
    }

    #[gtest]
    #[rstest]
    #[case::unaligned(0x1000, 16, "not aligned")]
    #[case::too_long(0xff0000, 0x10001, "do not fit")]
    fn flash_regions_that_do_not_fit(
        platform: XilinxPlatform,
        #[case] address: u32,
        #[case] length: u64,
        #[case] message: &str,
    ) {
        expect_that!(
            platform.check_flash_region(address, length),
            err(displays_as(contains_substring(message)))
        );
    }
}
