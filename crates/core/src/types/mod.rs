//! Core types for Storeboard.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod toggle;
pub mod user;

pub use id::*;
pub use price::{Price, PriceError};
pub use toggle::{OptimisticToggle, ToggleError, TogglePhase};
pub use user::{UserId, UserIdError};
