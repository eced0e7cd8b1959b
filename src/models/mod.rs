//! Data models for the inventory

pub mod equipment;
pub mod user;

// Re-export commonly used types
pub use equipment::{Catalog, CatalogEntry, Equipment};
pub use user::{Holding, HoldingEntry, Role, SessionClaims, UserAccount, UserDirectory};
