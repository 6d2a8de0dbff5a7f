//! Business logic for the store-scoped resources.
//!
//! # Services
//!
//! - `guard` - Ownership check run before every mutation
//! - `resource` - Generic CRUD over any [`Resource`] kind
//! - `stores` - Store creation, listing, renaming and deletion
//! - `orders` - The order "sent" flag

pub mod guard;
pub mod orders;
pub mod resource;
pub mod stores;

pub use guard::{Access, authorize, require_owner};
pub use resource::{Resource, ResourceError, ResourceService};
pub use stores::StoreService;
