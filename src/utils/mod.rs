//! Utility modules for the governance layer
//!
//! - **clock**: Wall-clock helpers
//! - **error**: Error types and HTTP error rendering
//! - **logging**: Tracing subscriber setup

pub mod clock;
pub mod error;
pub mod logging;

pub use error::{GovernorError, Result};
