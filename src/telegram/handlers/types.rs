//! Handler types and shared dependencies

use std::sync::Arc;

use crate::core::supervisor::RuntimeStatus;
use crate::delivery::Asset;
use crate::storage::SharedStore;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers.
///
/// One context object constructed at startup and cloned into every
/// handler; there is no global mutable state.
#[derive(Clone)]
pub struct HandlerDeps {
    pub store: SharedStore,
    pub asset: Arc<Asset>,
    pub runtime: Arc<RuntimeStatus>,
}

impl HandlerDeps {
    pub fn new(store: SharedStore, asset: Arc<Asset>, runtime: Arc<RuntimeStatus>) -> Self {
        Self { store, asset, runtime }
    }
}
