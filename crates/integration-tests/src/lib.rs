//! Integration tests for Aurelia.
//!
//! # Test Categories
//!
//! - `lifecycle` - Expiration/favorite policy invariants
//! - `session_store` - Client-side store transitions against a scripted transport
//! - `wire_format` - Studio responses parse with the client crate's types
//!
//! Tests that need a live database or the generation backends are out of
//! scope here; repository and orchestration behavior against real services
//! is exercised in staging.
