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

//! Procedural macros for fpgaplat.
//!
//! The only macro for now is [`platform`], which attaches a registry name to a board
//! struct and generates the code needed to add it to the platform registry.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{ItemStruct, LitStr, parse_macro_input};

/// Mark a struct as a board platform.
///
/// ```rust,ignore
/// #[platform(name = "arty_s7")]
/// pub struct ArtyS7Platform { /* ... */ }
/// ```
///
/// expands to the struct itself plus:
/// - `PLATFORM_NAME`, the name given to the macro
/// - `register_platform()`, which registers a constructor calling
///   `Self::from_options(&PlatformOptions)` under `PLATFORM_NAME`
///
/// The struct must provide
/// `fn from_options(&PlatformOptions) -> Result<Self, PlatformError>` and implement
/// `Platform`.
#[proc_macro_attribute]
pub fn platform(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut name: Option<LitStr> = None;
    let name_parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("name") {
            name = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported platform property, expected `name`"))
        }
    });
    parse_macro_input!(attr with name_parser);
    let input = parse_macro_input!(item as ItemStruct);

    let Some(name) = name else {
        return syn::Error::new(
            Span::call_site(),
            "#[platform] requires a name, e.g. #[platform(name = \"arty_s7\")]",
        )
        .to_compile_error()
        .into();
    };
    if name.value().is_empty() {
        return syn::Error::new(name.span(), "platform name must not be empty")
            .to_compile_error()
            .into();
    }

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    quote! {
        #input

        impl #impl_generics #ident #ty_generics #where_clause {
            /// Name this platform is registered under.
            pub const PLATFORM_NAME: &'static str = #name;

            /// Add this platform to the global platform registry.
            pub fn register_platform() {
                crate::platforms::platform::register_platform(#name, |options| {
                    let platform: ::std::boxed::Box<dyn crate::platforms::platform::Platform> =
                        ::std::boxed::Box::new(#ident::from_options(options)?);
                    Ok(platform)
                });
            }
        }
    }
    .into()
}
