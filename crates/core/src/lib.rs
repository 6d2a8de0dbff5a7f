//! Storeboard Core - Shared types library.
//!
//! This crate provides common types used across all Storeboard components:
//! - `api` - Store-scoped REST backend for the admin dashboard
//! - `cli` - Command-line tools for migrations and store management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere,
//! including dashboard clients.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, caller identity, prices,
//!   and the optimistic toggle state machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
