//! Core types for Aurelia.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod attributes;
pub mod id;

pub use attributes::*;
pub use id::*;
