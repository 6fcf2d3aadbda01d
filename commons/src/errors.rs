/// Result type carrying any error.
pub type Fallible<T> = anyhow::Result<T>;

/// Error handling imports.
pub mod prelude {
    pub use super::Fallible;
    pub use anyhow::{anyhow, bail, ensure, format_err, Context, Error};
}
