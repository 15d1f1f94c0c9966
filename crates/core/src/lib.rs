//! Aurelia Core - Shared types library.
//!
//! This crate provides common types used across all Aurelia components:
//! - `studio` - AI design studio backend service
//! - `client` - Session store / API client for frontend integration
//! - `cli` - Command-line tools for migrations and maintenance
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs plus the jewelry design
//!   attribute enums shared by the API surface and the database layer

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
