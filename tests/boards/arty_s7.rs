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

use crate::board;
use fpgaplat::platforms::arty_s7::ArtyS7Platform;
use fpgaplat::platforms::platform::{Platform, PlatformOptions, platform_for_name};
use fpgaplat::programmer::{Programmer, VivadoProgrammer, Xc3sProg};
use fpgaplat::toolchain::{BuildRequest, ToolchainKind};
use googletest::prelude::*;
use rstest::*;
use std::any::Any;
use std::path::Path;

fn programmer_as<T: 'static>(programmer: &dyn Programmer) -> Option<&T> {
    (programmer as &dyn Any).downcast_ref::<T>()
}

#[gtest]
fn board_description() {
    let board = board("arty_s7", None, None);
    let xilinx = board.xilinx();
    let flash = &xilinx.info().spiflash;

    assert_eq!(board.name(), "arty_s7");
    assert_eq!(xilinx.device(), "xc7s50csga324-1");
    assert_eq!(flash.model, "S25FL128S");
    assert_eq!(flash.read_dummy_bits, 10);
    assert_eq!(flash.clock_div, 4);
    assert_eq!(flash.total_size, 16777216);
    assert_eq!(flash.page_size, 256);
    assert_eq!(flash.sector_size, 0x10000);
    assert_eq!(xilinx.info().gateware_size, 0x220000);
    assert_eq!(xilinx.info().default_clk_name, "clk100");
    assert_eq!(xilinx.info().default_clk_period, 10.0);
}

#[gtest]
fn defaults_are_vivado() {
    let board = board("arty_s7", None, None);
    assert_eq!(board.xilinx().toolchain().kind, ToolchainKind::Vivado);
    assert_eq!(board.programmer(), "vivado");
}

#[gtest]
fn construction_registers_board_commands() {
    let board = board("arty_s7", None, None);
    let toolchain = board.xilinx().toolchain();
    expect_that!(
        toolchain.bitstream_commands,
        elements_are![eq("set_property BITSTREAM.CONFIG.SPI_BUSWIDTH 4 [current_design]")]
    );
    expect_that!(
        toolchain.additional_commands,
        elements_are![starts_with("write_cfgmem -force -format bin -interface spix4 -size 16")]
    );
    assert_eq!(
        board.xilinx().platform_commands(),
        ["set_property INTERNAL_VREF 0.675 [get_iobanks 34]"]
    );
}

#[gtest]
fn xc3sprog_uses_the_nexys4_cable() {
    let board = board("arty_s7", None, Some("xc3sprog"));
    let programmer = board.create_programmer().expect("xc3sprog");
    let xc3sprog = programmer_as::<Xc3sProg>(programmer.as_ref()).expect("an Xc3sProg");
    assert_eq!(xc3sprog.cable, "nexys4");
}

#[gtest]
fn xc3sprog_loads_but_cannot_flash_without_a_proxy() {
    let board = board("arty_s7", None, Some("xc3sprog"));
    let programmer = board.create_programmer().expect("xc3sprog");
    let load = programmer
        .load_bitstream_invocation(Path::new("top.bit"))
        .expect("load command");
    expect_that!(load.to_string(), ends_with("-c nexys4 -p 0 top.bit"));
    let flash = programmer.flash_invocation(0, Path::new("top.bin"));
    assert!(flash.as_ref().is_err_and(|e| e.is_invalid_argument()));
    expect_that!(
        flash.map(|i| i.to_string()),
        err(displays_as(contains_substring("no flash proxy configured")))
    );
}

#[gtest]
fn vivado_uses_the_n25q128_part() {
    let board = board("arty_s7", None, Some("vivado"));
    let programmer = board.create_programmer().expect("vivado");
    let vivado =
        programmer_as::<VivadoProgrammer>(programmer.as_ref()).expect("a VivadoProgrammer");
    assert_eq!(vivado.flash_part, "n25q128-3.3v-spi-x1_x2_x4");
}

#[gtest]
#[rstest]
#[case::openocd("openocd")]
#[case::empty("")]
#[case::capitalised("Vivado")]
fn other_programmers_are_rejected(#[case] programmer: &str) {
    let board = ArtyS7Platform::new("vivado", programmer).expect("board");
    let result = board.create_programmer();
    assert!(result.as_ref().is_err_and(|e| e.is_invalid_argument()));
    expect_that!(
        result.map(|p| p.name()),
        err(displays_as(ends_with(format!("{programmer} programmer is not supported"))))
    );
}

#[gtest]
fn unknown_toolchain_fails_construction() {
    let options = PlatformOptions {
        toolchain: Some("quartus".to_string()),
        programmer: None,
    };
    let result = platform_for_name("arty_s7", &options);
    assert!(result.as_ref().is_err_and(|e| e.is_invalid_argument()));
}

#[gtest]
fn resources_can_only_be_requested_once() {
    let mut board = board("arty_s7", None, None);
    board.xilinx_mut().request("user_led", Some(2)).expect("first request");
    expect_that!(
        board.xilinx_mut().request("user_led", Some(2)),
        err(displays_as(contains_substring("user_led:2")))
    );
}

#[gtest]
fn spiflash_modes_share_pins() {
    let mut board = board("arty_s7", None, None);
    board.xilinx_mut().request("spiflash_4x", None).expect("quad flash");
    expect_that!(
        board.xilinx_mut().request("spiflash_1x", None),
        err(displays_as(contains_substring("is already used by spiflash_4x:0")))
    );
}

#[gtest]
fn vivado_build_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut board = board("arty_s7", None, None);
    board.xilinx_mut().request("clk100", None).expect("clk100");
    board.xilinx_mut().request("ddram", None).expect("ddram");
    let request = BuildRequest::new(dir.path(), "soc");

    let products = board.xilinx().build(&request).expect("build");
    let xdc = std::fs::read_to_string(&products.constraints).expect("xdc");
    let tcl = std::fs::read_to_string(&products.script).expect("tcl");

    expect_that!(
        xdc,
        contains_substring("set_property IN_TERM UNTUNED_SPLIT_40 [get_ports {ddram_dq[15]}]")
    );
    expect_that!(
        xdc,
        contains_substring("create_clock -name clk100 -period 10.0 [get_ports clk100]")
    );
    expect_that!(xdc, ends_with("set_property INTERNAL_VREF 0.675 [get_iobanks 34]\n"));

    let buswidth = tcl.find("SPI_BUSWIDTH 4").expect("buswidth command");
    let bitstream = tcl.find("write_bitstream -force soc.bit").expect("write_bitstream");
    let cfgmem = tcl.find("write_cfgmem").expect("write_cfgmem");
    assert!(buswidth < bitstream && bitstream < cfgmem);
    expect_that!(tcl, contains_substring("-loadbit \"up 0x0 soc.bit\" -file soc.bin"));
    expect_that!(tcl, ends_with("quit\n"));
}

#[gtest]
fn ise_build_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut board = board("arty_s7", Some("ise"), None);
    board.xilinx_mut().request("user_led", Some(0)).expect("led");
    let request = BuildRequest::new(dir.path(), "blinky");

    let products = board.xilinx().build(&request).expect("build");
    assert_eq!(products.constraints.extension().and_then(|e| e.to_str()), Some("ucf"));
    let ucf = std::fs::read_to_string(&products.constraints).expect("ucf");
    expect_that!(ucf, contains_substring("NET \"user_led0\" LOC=E18 | IOSTANDARD=LVCMOS33;"));
    let script = std::fs::read_to_string(&products.script).expect("script");
    expect_that!(script, contains_substring("-g SPI_BUSWIDTH:4"));
}
