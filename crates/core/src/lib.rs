//! CeyCan Core - Shared types library.
//!
//! This crate provides common types used across all CeyCan components:
//! - `server` - REST API for the storefront and admin panel
//! - `client` - Typed API client used by tooling and tests
//! - `cli` - Command-line tools for migrations and provisioning
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
