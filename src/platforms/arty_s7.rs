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

//! Digilent Arty S7-50 (Spartan-7 `xc7s50csga324-1`).
//!
//! # Examples
//!
//! ```rust,no_run
//! # use fpgaplat::platforms::arty_s7::ArtyS7Platform;
//! # use fpgaplat::platforms::platform::Platform;
//! # fn example() -> Result<(), fpgaplat::error::PlatformError> {
//! let mut board = ArtyS7Platform::new("vivado", "xc3sprog")?;
//! board.xilinx_mut().request("user_led", Some(0))?;
//! board.xilinx_mut().request("clk100", None)?;
//! println!("{}", board.xilinx().constraints());
//! let programmer = board.create_programmer()?;
//! # Ok(())
//! # }
//! ```

use crate::error::PlatformError;
use crate::platforms::platform::{Platform, PlatformOptions};
use crate::platforms::resources::{IoEntry, IoItem::*, IoTable};
use crate::platforms::xilinx::{BoardInfo, SpiFlash, XilinxPlatform};
use crate::programmer::{Programmer, VivadoProgrammer, Xc3sProg};
use fpgaplat_macros::platform;

pub const DEVICE: &str = "xc7s50csga324-1";
pub const DEFAULT_TOOLCHAIN: &str = "vivado";
pub const DEFAULT_PROGRAMMER: &str = "vivado";

/// 17536096 configuration bits (UG470) rounded up to a flash sector.
pub const GATEWARE_SIZE: u32 = 0x220000;

/// Cypress S25FL128S, 128 Mbit.
pub const SPIFLASH: SpiFlash = SpiFlash {
    model: "S25FL128S",
    read_dummy_bits: 10,
    clock_div: 4,
    total_size: 16777216,
    page_size: 256,
    sector_size: 0x10000,
};

pub const BOARD_INFO: BoardInfo = BoardInfo {
    default_clk_name: "clk100",
    default_clk_period: 10.0,
    gateware_size: GATEWARE_SIZE,
    spiflash: SPIFLASH,
};

pub const BITSTREAM_COMMAND: &str = "set_property BITSTREAM.CONFIG.SPI_BUSWIDTH 4 [current_design]";
pub const CFGMEM_COMMAND: &str = "write_cfgmem -force -format bin -interface spix4 -size 16 -loadbit \"up 0x0 {build_name}.bit\" -file {build_name}.bin";
pub const VREF_COMMAND: &str = "set_property INTERNAL_VREF 0.675 [get_iobanks 34]";

/// Cable name xc3sprog uses for this board.
pub const XC3SPROG_CABLE: &str = "nexys4";
/// Flash part name as Vivado's hardware manager knows it.
pub const VIVADO_FLASH_PART: &str = "n25q128-3.3v-spi-x1_x2_x4";

static IO: &[IoEntry] = &[
    IoEntry::new("user_led", 0, &[Pins(&["E18"]), IoStandard("LVCMOS33")]),
    IoEntry::new("user_led", 1, &[Pins(&["F13"]), IoStandard("LVCMOS33")]),
    IoEntry::new("user_led", 2, &[Pins(&["E13"]), IoStandard("LVCMOS33")]),
    IoEntry::new("user_led", 3, &[Pins(&["H15"]), IoStandard("LVCMOS33")]),
    IoEntry::new(
        "rgb_leds",
        0,
        &[
            Subsignal("r", &[Pins(&["J15 E15"])]),
            Subsignal("g", &[Pins(&["G17 F18"])]),
            Subsignal("b", &[Pins(&["F15 E14"])]),
            IoStandard("LVCMOS33"),
        ],
    ),
    IoEntry::new("user_sw", 0, &[Pins(&["H14"]), IoStandard("LVCMOS33")]),
    IoEntry::new("user_sw", 1, &[Pins(&["H18"]), IoStandard("LVCMOS33")]),
    IoEntry::new("user_sw", 2, &[Pins(&["G18"]), IoStandard("LVCMOS33")]),
    IoEntry::new("user_sw", 3, &[Pins(&["M5"]), IoStandard("LVCMOS33")]),
    IoEntry::new("user_btn", 0, &[Pins(&["G15"]), IoStandard("LVCMOS33")]),
    IoEntry::new("user_btn", 1, &[Pins(&["K16"]), IoStandard("LVCMOS33")]),
    IoEntry::new("user_btn", 2, &[Pins(&["J16"]), IoStandard("LVCMOS33")]),
    IoEntry::new("user_btn", 3, &[Pins(&["H13"]), IoStandard("LVCMOS33")]),
    // Bank 34 runs at 1.35V for the DDR3L, hence SSTL135.
    IoEntry::new("clk100", 0, &[Pins(&["R2"]), IoStandard("SSTL135")]),
    IoEntry::new("cpu_reset", 0, &[Pins(&["C18"]), IoStandard("LVCMOS33")]),
    IoEntry::new(
        "serial",
        0,
        &[
            Subsignal("tx", &[Pins(&["R12"])]),
            Subsignal("rx", &[Pins(&["V12"])]),
            IoStandard("LVCMOS33"),
        ],
    ),
    IoEntry::new(
        "spi",
        0,
        &[
            Subsignal("clk", &[Pins(&["G16"])]),
            Subsignal("cs_n", &[Pins(&["H16"])]),
            Subsignal("mosi", &[Pins(&["H17"])]),
            Subsignal("miso", &[Pins(&["K14"])]),
            IoStandard("LVCMOS33"),
        ],
    ),
    // The flash clock is only reachable through STARTUPE2.
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
            Subsignal("miso", &[Pins(&["K18"])]),
            Subsignal("wp", &[Pins(&["L14"])]),
            Subsignal("hold", &[Pins(&["M15"])]),
            IoStandard("LVCMOS33"),
        ],
    ),
    IoEntry::new(
        "ddram",
        0,
        &[
            Subsignal(
                "a",
                &[
                    Pins(&["U2 R4 V2 V4 T3 R7 V6 T6", "U7 V7 P6 T5 R6 U6"]),
                    IoStandard("SSTL135"),
                ],
            ),
            Subsignal("ba", &[Pins(&["V5 T1 U3"]), IoStandard("SSTL135")]),
            Subsignal("ras_n", &[Pins(&["U1"]), IoStandard("SSTL135")]),
            Subsignal("cas_n", &[Pins(&["V3"]), IoStandard("SSTL135")]),
            Subsignal("we_n", &[Pins(&["P7"]), IoStandard("SSTL135")]),
            Subsignal("cs_n", &[Pins(&["R3"]), IoStandard("SSTL135")]),
            Subsignal("dm", &[Pins(&["K4 M3"]), IoStandard("SSTL135")]),
            Subsignal(
                "dq",
                &[
                    Pins(&["K2 K3 L4 M6 K6 M4 L5 L6", "N4 R1 N1 N5 M2 P1 M1 P2"]),
                    IoStandard("SSTL135"),
                    Misc("IN_TERM=UNTUNED_SPLIT_40"),
                ],
            ),
            Subsignal("dqs_p", &[Pins(&["K1 N3"]), IoStandard("DIFF_SSTL135")]),
            Subsignal("dqs_n", &[Pins(&["L1 N2"]), IoStandard("DIFF_SSTL135")]),
            Subsignal("clk_p", &[Pins(&["R5"]), IoStandard("DIFF_SSTL135")]),
            Subsignal("clk_n", &[Pins(&["T4"]), IoStandard("DIFF_SSTL135")]),
            Subsignal("cke", &[Pins(&["T2"]), IoStandard("SSTL135")]),
            Subsignal("odt", &[Pins(&["P5"]), IoStandard("SSTL135")]),
            Subsignal("reset_n", &[Pins(&["J6"]), IoStandard("SSTL135")]),
            Misc("SLEW=FAST"),
        ],
    ),
    IoEntry::new(
        "pmoda",
        0,
        &[Pins(&["L17 L18 M14 N14 M16 M17 M18 N18"]), IoStandard("LVCMOS33")],
    ),
    IoEntry::new(
        "pmodb",
        0,
        &[Pins(&["P17 P18 R18 T18 P14 P15 N15 P16"]), IoStandard("LVCMOS33")],
    ),
    IoEntry::new(
        "pmodc",
        0,
        &[Pins(&["U15 V16 U17 U18 U16 P13 R13 V14"]), IoStandard("LVCMOS33")],
    ),
    IoEntry::new(
        "pmodd",
        0,
        &[Pins(&["V15 U12 V13 T12 T13 R11 T11 U11"]), IoStandard("LVCMOS33")],
    ),
];

/// The board's full I/O table.
pub fn io() -> IoTable {
    IoTable::new(IO)
}

#[platform(name = "arty_s7")]
#[derive(Debug, Clone)]
pub struct ArtyS7Platform {
    base: XilinxPlatform,
    programmer: String,
}

impl ArtyS7Platform {
    /// # Returns: `Result<ArtyS7Platform, PlatformError>`
    /// * `Ok(ArtyS7Platform)` - Board with its bitstream, cfgmem and VREF commands applied
    /// * `Err(PlatformError::UnsupportedToolchain)` - `toolchain` is not `vivado` or `ise`
    pub fn new(toolchain: &str, programmer: &str) -> Result<Self, PlatformError> {
        let mut base = XilinxPlatform::new(DEVICE, io(), BOARD_INFO, toolchain)?;
        base.toolchain_mut().bitstream_commands = vec![BITSTREAM_COMMAND.to_string()];
        base.toolchain_mut().additional_commands = vec![CFGMEM_COMMAND.to_string()];
        base.add_platform_command(VREF_COMMAND);
        Ok(ArtyS7Platform {
            base,
            programmer: programmer.to_string(),
        })
    }

    pub fn from_options(options: &PlatformOptions) -> Result<Self, PlatformError> {
        ArtyS7Platform::new(
            options.toolchain.as_deref().unwrap_or(DEFAULT_TOOLCHAIN),
            options.programmer.as_deref().unwrap_or(DEFAULT_PROGRAMMER),
        )
    }
}

impl Platform for ArtyS7Platform {
    fn name(&self) -> &'static str {
        Self::PLATFORM_NAME
    }

    fn xilinx(&self) -> &XilinxPlatform {
        &self.base
    }

    fn xilinx_mut(&mut self) -> &mut XilinxPlatform {
        &mut self.base
    }

    fn programmer(&self) -> &str {
        &self.programmer
    }

    /// The xc3sprog adapter has no flash proxy for this board, so it can load bitstreams
    /// but not flash them. Use `vivado` to write the SPI flash.
    fn create_programmer(&self) -> Result<Box<dyn Programmer>, PlatformError> {
        match self.programmer.as_str() {
            "xc3sprog" => Ok(Box::new(Xc3sProg::new(XC3SPROG_CABLE))),
            "vivado" => Ok(Box::new(VivadoProgrammer::new(VIVADO_FLASH_PART))),
            other => Err(PlatformError::UnsupportedProgrammer(other.to_string())),
        }
    }
}
