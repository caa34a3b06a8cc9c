//! JSON-file user store

pub mod store;

// Re-exports for convenience
pub use store::{ensure_parent_dir, SharedStore, Store, UserRecord};
