//! crates/text_forge_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;

use crate::domain::{
    ConvertedFile, HumanizationOptions, HumanizeOutcome, HumanizedText, NewConvertedFile,
    NewHumanizedText, User,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait StorageService: Send + Sync {
    // --- User Management ---
    /// Returns the user with the given name, creating it with the supplied
    /// password hash when it does not exist yet.
    async fn get_or_create_user(&self, username: &str, hashed_password: &str) -> PortResult<User>;

    // --- Humanization Records ---
    async fn create_humanized_text(&self, record: NewHumanizedText) -> PortResult<HumanizedText>;

    async fn humanized_texts_for_user(&self, user_id: i32) -> PortResult<Vec<HumanizedText>>;

    // --- Conversion Records ---
    async fn create_converted_file(&self, record: NewConvertedFile) -> PortResult<ConvertedFile>;

    async fn converted_files_for_user(&self, user_id: i32) -> PortResult<Vec<ConvertedFile>>;
}

#[async_trait]
pub trait HumanizerService: Send + Sync {
    /// Rewrites `text` according to `options` and reports detection scores.
    async fn humanize(
        &self,
        text: &str,
        options: &HumanizationOptions,
    ) -> PortResult<HumanizeOutcome>;
}
