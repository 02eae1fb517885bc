//! Derive macros for the `based` crate.
//!
//! Provides:
//! - `#[derive(Error)]` - `Display`, `Error` and `From` boilerplate for fault and
//!   checker error enums (thiserror replacement)

mod error;

use proc_macro::TokenStream;

/// Implements `Display` and `Error` for error types, plus `From` for `#[from]` fields.
#[proc_macro_derive(Error, attributes(error, from, source))]
pub fn derive_error(input: TokenStream) -> TokenStream {
    error::derive_error(input)
}
