//! Domain models for the design studio.

pub mod session;

pub use session::{DesignMessage, DesignSession};
