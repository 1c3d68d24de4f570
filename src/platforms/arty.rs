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

//! Digilent Arty A7-35 (Artix-7 `xc7a35t-csg324-1`).
//!
//! Same layout as the [Arty S7](super::arty_s7) apart from the pinout, the DDR3 (1.5V, so
//! SSTL15), the Micron flash and a 10/100 Ethernet PHY. Programmed with OpenOCD by default.

use crate::error::PlatformError;
use crate::platforms::platform::{Platform, PlatformOptions};
use crate::platforms::resources::{IoEntry, IoItem::*, IoTable};
use crate::platforms::xilinx::{BoardInfo, SpiFlash, XilinxPlatform};
use crate::programmer::{OpenOcd, Programmer, VivadoProgrammer, Xc3sProg};
use fpgaplat_macros::platform;

pub const DEVICE: &str = "xc7a35t-csg324-1";
pub const DEFAULT_TOOLCHAIN: &str = "vivado";
pub const DEFAULT_PROGRAMMER: &str = "openocd";

pub const OPENOCD_CONFIG: &str = "board/digilent_arty.cfg";

/// Micron N25Q128A13, 128 Mbit.
pub const SPIFLASH: SpiFlash = SpiFlash {
    model: "n25q128a13",
    read_dummy_bits: 10,
    clock_div: 4,
    total_size: 16777216,
    page_size: 256,
    sector_size: 0x10000,
};

pub const BOARD_INFO: BoardInfo = BoardInfo {
    default_clk_name: "clk100",
    default_clk_period: 10.0,
    gateware_size: 0x220000,
    spiflash: SPIFLASH,
};

pub const VREF_COMMAND: &str = "set_property INTERNAL_VREF 0.750 [get_iobanks 34]";

static IO: &[IoEntry] = &[
    IoEntry::new("user_led", 0, &[Pins(&["H5"]), IoStandard("LVCMOS33")]),
    IoEntry::new("user_led", 1, &[Pins(&["J5"]), IoStandard("LVCMOS33")]),
    IoEntry::new("user_led", 2, &[Pins(&["T9"]), IoStandard("LVCMOS33")]),
    IoEntry::new("user_led", 3, &[Pins(&["T10"]), IoStandard("LVCMOS33")]),
    IoEntry::new(
        "rgb_leds",
        0,
        &[
            Subsignal("r", &[Pins(&["G6 G3 J3 K1"])]),
            Subsignal("g", &[Pins(&["F6 J4 J2 H6"])]),
            Subsignal("b", &[Pins(&["E1 G4 H4 K2"])]),
            IoStandard("LVCMOS33"),
        ],
    ),
    IoEntry::new("user_sw", 0, &[Pins(&["A8"]), IoStandard("LVCMOS33")]),
    IoEntry::new("user_sw", 1, &[Pins(&["C11"]), IoStandard("LVCMOS33")]),
    IoEntry::new("user_sw", 2, &[Pins(&["C10"]), IoStandard("LVCMOS33")]),
    IoEntry::new("user_sw", 3, &[Pins(&["A10"]), IoStandard("LVCMOS33")]),
    IoEntry::new("user_btn", 0, &[Pins(&["D9"]), IoStandard("LVCMOS33")]),
    IoEntry::new("user_btn", 1, &[Pins(&["C9"]), IoStandard("LVCMOS33")]),
    IoEntry::new("user_btn", 2, &[Pins(&["B9"]), IoStandard("LVCMOS33")]),
    IoEntry::new("user_btn", 3, &[Pins(&["B8"]), IoStandard("LVCMOS33")]),
    IoEntry::new("clk100", 0, &[Pins(&["E3"]), IoStandard("LVCMOS33")]),
    IoEntry::new("cpu_reset", 0, &[Pins(&["C2"]), IoStandard("LVCMOS33")]),
    IoEntry::new(
        "serial",
        0,
        &[
            Subsignal("tx", &[Pins(&["D10"])]),
            Subsignal("rx", &[Pins(&["A9"])]),
            IoStandard("LVCMOS33"),
        ],
    ),
    IoEntry::new(
        "spiflash_4x",
        0,
        &[
            Subsignal("cs_n", &[Pins(&["L13"])]),
            Subsignal("dq", &[Pins(&["K17", "K18", "L14", "M14"])]),
            IoStandard("LVCMOS33"),
        ],
    ),
    IoEntry::new(
        "spiflash_1x",
        0,
        &[
            Subsignal("cs_n", &[Pins(&["L13"])]),
            Subsignal("mosi", &[Pins(&["K17"])]),
            Subsignal("miso", &[Pins(&["K18"])]),
            Subsignal("wp", &[Pins(&["L14"])]),
            Subsignal("hold", &[Pins(&["M14"])]),
            IoStandard("LVCMOS33"),
        ],
    ),
    IoEntry::new("eth_ref_clk", 0, &[Pins(&["G18"]), IoStandard("LVCMOS33")]),
    IoEntry::new(
        "ddram",
        0,
        &[
            Subsignal(
                "a",
                &[
                    Pins(&["R2 M6 N4 T1 N6 R7 V6 U7", "R8 V7 R6 U6 T6 T8"]),
                    IoStandard("SSTL15"),
                ],
            ),
            Subsignal("ba", &[Pins(&["R1 P4 P2"]), IoStandard("SSTL15")]),
            Subsignal("ras_n", &[Pins(&["P3"]), IoStandard("SSTL15")]),
            Subsignal("cas_n", &[Pins(&["M4"]), IoStandard("SSTL15")]),
            Subsignal("we_n", &[Pins(&["P5"]), IoStandard("SSTL15")]),
            Subsignal("cs_n", &[Pins(&["U8"]), IoStandard("SSTL15")]),
            Subsignal("dm", &[Pins(&["L1 U1"]), IoStandard("SSTL15")]),
            Subsignal(
                "dq",
                &[
                    Pins(&["K5 L3 K3 L6 M3 M1 L4 M2", "V4 T5 U4 V5 V1 T3 U3 R3"]),
                    IoStandard("SSTL15"),
                    Misc("IN_TERM=UNTUNED_SPLIT_40"),
                ],
            ),
            Subsignal("dqs_p", &[Pins(&["N2 U2"]), IoStandard("DIFF_SSTL15")]),
            Subsignal("dqs_n", &[Pins(&["N1 V2"]), IoStandard("DIFF_SSTL15")]),
            Subsignal("clk_p", &[Pins(&["U9"]), IoStandard("DIFF_SSTL15")]),
            Subsignal("clk_n", &[Pins(&["V9"]), IoStandard("DIFF_SSTL15")]),
            Subsignal("cke", &[Pins(&["N5"]), IoStandard("SSTL15")]),
            Subsignal("odt", &[Pins(&["R5"]), IoStandard("SSTL15")]),
            Subsignal("reset_n", &[Pins(&["K6"]), IoStandard("SSTL15")]),
            Misc("SLEW=FAST"),
        ],
    ),
    IoEntry::new(
        "eth_clocks",
        0,
        &[
            Subsignal("tx", &[Pins(&["H16"])]),
            Subsignal("rx", &[Pins(&["F15"])]),
            IoStandard("LVCMOS33"),
        ],
    ),
    IoEntry::new(
        "eth",
        0,
        &[
            Subsignal("rst_n", &[Pins(&["C16"])]),
            Subsignal("mdio", &[Pins(&["K13"])]),
            Subsignal("mdc", &[Pins(&["F16"])]),
            Subsignal("dv", &[Pins(&["G16"])]),
            Subsignal("rx_er", &[Pins(&["C17"])]),
            Subsignal("rx_data", &[Pins(&["D18 E17 E18 G17"])]),
            Subsignal("tx_en", &[Pins(&["H15"])]),
            Subsignal("tx_data", &[Pins(&["H14 J14 J13 H17"])]),
            Subsignal("col", &[Pins(&["D17"])]),
            Subsignal("crs", &[Pins(&["G14"])]),
            IoStandard("LVCMOS33"),
        ],
    ),
];

pub fn io() -> IoTable {
    IoTable::new(IO)
}

/// Basename of the JTAG to SPI bridge bitstream for `device`, e.g.
/// `bscan_spi_xc7a35t.bit` for `xc7a35t-csg324-1`.
pub fn flash_proxy_basename(device: &str) -> String {
    let family = device.split('-').next().unwrap_or(device);
    format!("bscan_spi_{family}.bit")
}

#[platform(name = "arty")]
#[derive(Debug, Clone)]
pub struct ArtyPlatform {
    base: XilinxPlatform,
    programmer: String,
}

impl ArtyPlatform {
    pub fn new(toolchain: &str, programmer: &str) -> Result<Self, PlatformError> {
        let mut base = XilinxPlatform::new(DEVICE, io(), BOARD_INFO, toolchain)?;
        // Same flash layout as the S7, so the same bitstream and cfgmem commands.
        base.toolchain_mut().bitstream_commands =
            vec![crate::platforms::arty_s7::BITSTREAM_COMMAND.to_string()];
        base.toolchain_mut().additional_commands =
            vec![crate::platforms::arty_s7::CFGMEM_COMMAND.to_string()];
        base.add_platform_command(VREF_COMMAND);
        Ok(ArtyPlatform {
            base,
            programmer: programmer.to_string(),
        })
    }

    pub fn from_options(options: &PlatformOptions) -> Result<Self, PlatformError> {
        ArtyPlatform::new(
            options.toolchain.as_deref().unwrap_or(DEFAULT_TOOLCHAIN),
            options.programmer.as_deref().unwrap_or(DEFAULT_PROGRAMMER),
        )
    }
}

impl Platform for ArtyPlatform {
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

    fn create_programmer(&self) -> Result<Box<dyn Programmer>, PlatformError> {
        match self.programmer.as_str() {
            "openocd" => Ok(Box::new(OpenOcd::new(
                OPENOCD_CONFIG,
                Some(flash_proxy_basename(self.base.device())),
            ))),
            "xc3sprog" => Ok(Box::new(Xc3sProg::new(
                crate::platforms::arty_s7::XC3SPROG_CABLE,
            ))),
            "vivado" => Ok(Box::new(VivadoProgrammer::new(
                crate::platforms::arty_s7::VIVADO_FLASH_PART,
            ))),
            other => Err(PlatformError::UnsupportedProgrammer(other.to_string())),
        }
    }
}
