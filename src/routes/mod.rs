/**
 * Routes Module
 * API route handlers and the state they share
 */
pub mod blog;
pub mod contact;
pub mod extract;
pub mod health;

use std::sync::Arc;

use crate::config::EnvPresence;
use crate::db::{DocumentStore, StoreError};

/// State handed to every handler. Holds the one store handle built at
/// startup, or nothing when the initial connection failed.
#[derive(Clone)]
pub struct AppState {
    store: Option<Arc<dyn DocumentStore>>,
    env: EnvPresence,
}

impl AppState {
    pub fn new(store: Option<Arc<dyn DocumentStore>>, env: EnvPresence) -> Self {
        Self { store, env }
    }

    /// The store, or `StoreError::Unavailable` when none was connected.
    pub fn store(&self) -> Result<&dyn DocumentStore, StoreError> {
        self.store.as_deref().ok_or(StoreError::Unavailable)
    }

    pub fn env_presence(&self) -> EnvPresence {
        self.env
    }
}
