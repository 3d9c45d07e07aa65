//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use std::sync::Arc;
use text_forge_core::ports::{HumanizerService, StorageService};

/// The shared application state, created once at startup and passed to all handlers.
///
/// `guest_user_id` is the id of the bootstrapped guest account; every stored
/// record is attached to it regardless of caller identity. There is no
/// per-user isolation.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn StorageService>,
    pub humanizer: Arc<dyn HumanizerService>,
    pub config: Arc<Config>,
    pub guest_user_id: i32,
}
