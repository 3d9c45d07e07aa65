//! services/api/src/lib.rs
//!
//! The library crate behind the `api` and `openapi` binaries. It wires the
//! pure domain logic from `text_forge_core` to the outside world: the
//! database adapter, the humanizer adapters, the file-conversion pipeline,
//! and the Axum route handlers.

pub mod adapters;
pub mod config;
pub mod convert;
pub mod error;
pub mod web;
