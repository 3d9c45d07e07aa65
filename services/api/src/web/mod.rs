//! services/api/src/web/mod.rs
//!
//! The web layer: shared state plus the REST handlers.

pub mod rest;
pub mod state;

pub use rest::{
    convert_handler, download_handler, humanize_handler, list_conversions_handler,
    list_humanized_handler, preview_handler, upload_handler,
};
pub use state::AppState;
