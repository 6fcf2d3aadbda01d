//! Common utilities for the registry client crates.

#![deny(missing_docs)]

#[macro_use]
extern crate log;

pub mod testing;

mod errors;
pub use errors::Fallible;

/// Commonly used imports for error handling.
pub mod prelude_errors {
    pub use crate::errors::prelude::*;
}
