//! Asynchronous client for the Docker Registry HTTP API v2.
//!
//! Only the read side needed to inspect a repository is covered: listing
//! tags and fetching manifests. Every response body is checked for the
//! registry error envelope before its payload is trusted.

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

mod errors;
pub use crate::errors::{ApiError, Error, ErrorKind, RequestError, Result};

pub mod v2;
