//! TezWeb Core - Shared types and deterministic site algorithms.
//!
//! This crate provides everything the TezWeb components agree on:
//! - `server` - HTTP API, document store backends and the publish allocator
//! - `cli` - Command-line tools for migrations and operations
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. Everything here is reproducible from its inputs.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, statuses and the stored document shapes
//! - [`random`] - Seeded 32-bit PRNG
//! - [`design`] - Design configuration generator
//! - [`subdomain`] - Public name normalization
//! - [`templates`] - Built-in template catalog
//! - [`starter`] - Starter content for new websites

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod design;
pub mod random;
pub mod starter;
pub mod subdomain;
pub mod templates;
pub mod types;

pub use design::{DesignConfig, SiteSeed, generate_design_config};
pub use subdomain::{
    Subdomain, SubdomainError, normalize_subdomain, public_url, subdomain_from_host,
};
pub use types::*;
