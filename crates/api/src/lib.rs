//! Storeboard API library.
//!
//! Store-scoped REST backend for an e-commerce admin dashboard. Store owners
//! manage billboards, categories, sizes, colors, products and orders; every
//! mutation is checked against the store's owner, every read is public.
//!
//! The crate is a library so the binary, the CLI and the integration tests
//! share one router and one set of services.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;
