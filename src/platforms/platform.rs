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

//! Board abstraction and the registry of known boards.
//!
//! A board is a [`Platform`]: a fixed description of a device, its I/O and flash, wrapped
//! around a [`XilinxPlatform`] that does the generic work (resource requests, constraint
//! and script generation). Each board also knows which programming tools can reach it,
//! see [`Platform::create_programmer`].
//!
//! # Platform Registration
//!
//! Boards are declared with the `#[platform(name = "...")]` macro and added to the registry
//! by [`register_platforms`](crate::platforms::register_platforms), which every front end
//! calls once at startup. They are then constructed by name:
//!
//! ```rust,no_run
//! # use fpgaplat::platforms::platform::{PlatformOptions, platform_for_name};
//! # fn example() -> Result<(), fpgaplat::error::PlatformError> {
//! fpgaplat::platforms::register_platforms();
//! let options = PlatformOptions {
//!     programmer: Some("xc3sprog".to_string()),
//!     ..Default::default()
//! };
//! let board = platform_for_name("arty_s7", &options)?;
//! let programmer = board.create_programmer()?;
//! # Ok(())
//! # }
//! ```

use crate::error::PlatformError;
use crate::platforms::xilinx::XilinxPlatform;
use crate::programmer::Programmer;
use log::trace;
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

/// Construction parameters shared by every board. `None` selects the board's default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformOptions {
    pub toolchain: Option<String>,
    pub programmer: Option<String>,
}

/// Type alias for platform constructor functions stored in the registry.
pub type PlatformConstructor = fn(&PlatformOptions) -> Result<Box<dyn Platform>, PlatformError>;

/// Global registry of boards, keyed by the name given to `#[platform]`.
pub static PLATFORM_REGISTRY: OnceLock<Mutex<HashMap<&'static str, PlatformConstructor>>> =
    OnceLock::new();

/// A concrete board.
///
/// The trait extends `Any` so callers can downcast to the board type for board-specific
/// constants.
pub trait Platform: Any {
    /// Registry name, e.g. `"arty_s7"`.
    fn name(&self) -> &'static str;

    /// The generic Xilinx configuration the board was built from.
    fn xilinx(&self) -> &XilinxPlatform;

    fn xilinx_mut(&mut self) -> &mut XilinxPlatform;

    /// Identifier of the selected programmer, as given at construction.
    fn programmer(&self) -> &str;

    /// Build the programmer adapter matching [`Platform::programmer`].
    ///
    /// # Returns: `Result<Box<dyn Programmer>, PlatformError>`
    /// * `Ok(Box<dyn Programmer>)` - Adapter configured for this board
    /// * `Err(PlatformError::UnsupportedProgrammer)` - The board cannot be programmed with
    ///   the selected tool
    fn create_programmer(&self) -> Result<Box<dyn Programmer>, PlatformError>;
}

/// Initialize the platform registry.
pub fn init_platform_registry() -> Mutex<HashMap<&'static str, PlatformConstructor>> {
    Mutex::new(HashMap::new())
}

fn registry_guard()
-> Result<MutexGuard<'static, HashMap<&'static str, PlatformConstructor>>, PlatformError> {
    PLATFORM_REGISTRY
        .get()
        .ok_or(PlatformError::Internal(String::from(
            "couldn't get PLATFORM_REGISTRY, were the platforms registered?",
        )))?
        .lock()
        .map_err(|_| PlatformError::Internal(String::from("couldn't lock PLATFORM_REGISTRY")))
}

/// Register a board constructor under `name`. Registering a name again replaces the
/// previous constructor.
pub fn register_platform(name: &'static str, constructor: PlatformConstructor) {
    let mut registry = PLATFORM_REGISTRY
        .get_or_init(init_platform_registry)
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    trace!("Registering platform {name}");
    registry.insert(name, constructor);
}

/// Construct the board registered as `name`.
///
/// # Returns: `Result<Box<dyn Platform>, PlatformError>`
/// * `Ok(Box<dyn Platform>)` - Newly constructed board
/// * `Err(PlatformError::UnknownPlatform)` - Nothing is registered under `name`
/// * `Err(PlatformError::UnsupportedToolchain)` - The board's constructor rejected the toolchain
/// * `Err(PlatformError::Internal)` - Registry not initialized or lock failure
pub fn platform_for_name(
    name: &str,
    options: &PlatformOptions,
) -> Result<Box<dyn Platform>, PlatformError> {
    let constructor = *registry_guard()?
        .get(name)
        .ok_or_else(|| PlatformError::UnknownPlatform(name.to_string()))?;
    trace!("Constructing platform {name} with {options:?}");
    constructor(options)
}

/// Names of all registered boards, sorted.
pub fn list_platforms() -> Result<Vec<&'static str>, PlatformError> {
    let mut names: Vec<&'static str> = registry_guard()?.keys().copied().collect();
    names.sort_unstable();
    Ok(names)
}
