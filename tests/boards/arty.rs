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
use fpgaplat::platforms::arty::flash_proxy_basename;
use fpgaplat::programmer::OpenOcd;
use googletest::prelude::*;
use std::any::Any;

#[gtest]
fn registered_next_to_the_s7() {
    let board = board("arty", None, None);
    assert_eq!(board.xilinx().device(), "xc7a35t-csg324-1");
    assert_eq!(board.programmer(), "openocd");
}

#[gtest]
fn openocd_gets_the_bscan_proxy() {
    let board = board("arty", None, None);
    let programmer = board.create_programmer().expect("openocd");
    let openocd = (programmer.as_ref() as &dyn Any)
        .downcast_ref::<OpenOcd>()
        .expect("an OpenOcd");
    assert_eq!(openocd.config, "board/digilent_arty.cfg");
    expect_that!(openocd.flash_proxy_basename, some(eq("bscan_spi_xc7a35t.bit")));
    expect_that!(flash_proxy_basename("xc7s50csga324-1"), eq("bscan_spi_xc7s50csga324.bit"));
}

#[gtest]
fn unknown_programmer_message() {
    let board = board("arty", None, Some("iceprog"));
    expect_that!(
        board.create_programmer().map(|p| p.name()),
        err(displays_as(ends_with("iceprog programmer is not supported")))
    );
}
