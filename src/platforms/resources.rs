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

//! Declarative I/O resource tables.
//!
//! Boards describe their I/O as a `static` slice of [`IoEntry`]. An entry is identified by
//! `(name, number)` and holds a list of [`IoItem`]s: pins, an I/O standard, vendor
//! attributes, or named subsignals which carry their own items.
//!
//! ```rust
//! use fpgaplat::platforms::resources::IoEntry;
//! use fpgaplat::platforms::resources::IoItem::*;
//!
//! static IO: &[IoEntry] = &[
//!     IoEntry::new("user_led", 0, &[Pins(&["E18"]), IoStandard("LVCMOS33")]),
//!     IoEntry::new("serial", 0, &[
//!         Subsignal("tx", &[Pins(&["R12"])]),
//!         Subsignal("rx", &[Pins(&["V12"])]),
//!         IoStandard("LVCMOS33"),
//!     ]),
//! ];
//! ```
//!
//! An entry is resolved into [`Signal`]s, one per subsignal (or one for the whole entry when
//! it has no subsignals). Entry-level constraints are appended after the subsignal's own, so
//! an entry-wide I/O standard or `Misc("SLEW=FAST")` applies to every subsignal.

use std::fmt;

/// One element of an I/O declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoItem {
    /// Package pin locators. Each string may hold several whitespace-separated pins.
    Pins(&'static [&'static str]),
    /// Electrical I/O standard, e.g. `LVCMOS33` or `DIFF_SSTL135`.
    IoStandard(&'static str),
    /// Vendor attribute in `KEY=VALUE` form, e.g. `SLEW=FAST`.
    Misc(&'static str),
    /// Named group of related pins with their own items.
    Subsignal(&'static str, &'static [IoItem]),
}

/// A top-level I/O declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoEntry {
    pub name: &'static str,
    pub number: u32,
    pub items: &'static [IoItem],
}

/// A constraint other than pin placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    IoStandard(&'static str),
    Misc(&'static str),
}

impl Constraint {
    /// Split a constraint into a vendor property key and value.
    ///
    /// `Misc` attributes without a `=` are returned with an empty value.
    pub fn key_value(&self) -> (&'static str, &'static str) {
        match *self {
            Constraint::IoStandard(standard) => ("IOSTANDARD", standard),
            Constraint::Misc(attribute) => attribute.split_once('=').unwrap_or((attribute, "")),
        }
    }
}

/// A resolved port: where its bits go and which electrical constraints apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    /// Top-level port name, e.g. `serial_tx` or `user_led2`.
    pub port: String,
    /// Human readable origin, e.g. `serial:0.tx`.
    pub resource: String,
    /// One package pin per bit, LSB first.
    pub pins: Vec<&'static str>,
    pub constraints: Vec<Constraint>,
}

impl Signal {
    pub fn width(&self) -> usize {
        self.pins.len()
    }

    /// Port name of bit `index`, or the bare port name for single bit signals.
    pub fn bit_port(&self, index: usize) -> String {
        if self.width() == 1 {
            self.port.clone()
        } else {
            format!("{}[{index}]", self.port)
        }
    }
}

impl IoEntry {
    pub const fn new(name: &'static str, number: u32, items: &'static [IoItem]) -> Self {
        IoEntry {
            name,
            number,
            items,
        }
    }

    /// Pins declared directly on the entry, split on whitespace.
    pub fn pins(&self) -> Vec<&'static str> {
        collect_pins(self.items)
    }

    /// `(name, items)` of each subsignal, in declaration order.
    pub fn subsignals(&self) -> impl Iterator<Item = (&'static str, &'static [IoItem])> + use<> {
        let items: &'static [IoItem] = self.items;
        items.iter().filter_map(|item| match *item {
            IoItem::Subsignal(name, items) => Some((name, items)),
            _ => None,
        })
    }

    /// Constraints declared at entry level, inherited by every subsignal.
    pub fn constraints(&self) -> Vec<Constraint> {
        collect_constraints(self.items)
    }

    /// Every pin this entry occupies, including those of its subsignals.
    pub fn all_pins(&self) -> Vec<&'static str> {
        let mut all = self.pins();
        for (_, items) in self.subsignals() {
            all.extend(collect_pins(items));
        }
        all
    }

    /// Resolve the entry into ports.
    ///
    /// `port_base` is the name the ports are derived from, which the owning table decides
    /// (see [`IoTable`]).
    pub fn signals(&self, port_base: &str) -> Vec<Signal> {
        let resource = self.to_string();
        let inherited = self.constraints();
        let mut signals: Vec<Signal> = self
            .subsignals()
            .map(|(name, items)| {
                let mut constraints = collect_constraints(items);
                constraints.extend(inherited.iter().copied());
                Signal {
                    port: format!("{port_base}_{name}"),
                    resource: format!("{resource}.{name}"),
                    pins: collect_pins(items),
                    constraints,
                }
            })
            .collect();

        let own_pins = self.pins();
        if !own_pins.is_empty() {
            signals.insert(
                0,
                Signal {
                    port: port_base.to_string(),
                    resource,
                    pins: own_pins,
                    constraints: inherited,
                },
            );
        }
        signals
    }
}

impl fmt::Display for IoEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.number)
    }
}

fn collect_pins(items: &[IoItem]) -> Vec<&'static str> {
    items
        .iter()
        .filter_map(|item| match *item {
            IoItem::Pins(p) => Some(p),
            _ => None,
        })
        .flat_map(|groups| groups.iter().flat_map(|group| group.split_whitespace()))
        .collect()
}

fn collect_constraints(items: &[IoItem]) -> Vec<Constraint> {
    items
        .iter()
        .filter_map(|item| match *item {
            IoItem::IoStandard(s) => Some(Constraint::IoStandard(s)),
            IoItem::Misc(m) => Some(Constraint::Misc(m)),
            _ => None,
        })
        .collect()
}

/// The full set of I/O declarations of a board.
#[derive(Debug, Clone, Copy)]
pub struct IoTable {
    entries: &'static [IoEntry],
}

impl IoTable {
    pub const fn new(entries: &'static [IoEntry]) -> Self {
        IoTable { entries }
    }

    pub fn entries(&self) -> &'static [IoEntry] {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, name: &str, number: u32) -> Option<&'static IoEntry> {
        self.entries
            .iter()
            .find(|e| e.name == name && e.number == number)
    }

    /// All entries declared under `name`, in declaration order.
    pub fn named<'a>(&self, name: &'a str) -> impl Iterator<Item = &'static IoEntry> + use<'a> {
        let entries: &'static [IoEntry] = self.entries;
        entries.iter().filter(move |e| e.name == name)
    }

    /// First `(name, number)` pair declared more than once, if any.
    pub fn first_duplicate(&self) -> Option<&'static IoEntry> {
        self.entries.iter().enumerate().find_map(|(i, entry)| {
            self.entries[..i]
                .iter()
                .any(|e| e.name == entry.name && e.number == entry.number)
                .then_some(entry)
        })
    }

    /// Port base name of an entry: the bare name if it is the only entry with that name,
    /// otherwise the name suffixed with the entry number.
    pub fn port_base(&self, entry: &IoEntry) -> String {
        if self.named(entry.name).count() > 1 {
            format!("{}{}", entry.name, entry.number)
        } else {
            entry.name.to_string()
        }
    }

    pub fn signals(&self, entry: &IoEntry) -> Vec<Signal> {
        entry.signals(&self.port_base(entry))
    }
}
