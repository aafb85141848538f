//! Core functionality for the governance layer
//!
//! This module contains the admission-control logic.

pub mod rate_limiter;
