//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `StorageService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use text_forge_core::domain::{
    ConvertedFile, FileOperation, HumanizedText, NewConvertedFile, NewHumanizedText, User,
};
use text_forge_core::ports::{PortError, PortResult, StorageService};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `StorageService` port.
#[derive(Clone)]
pub struct DbStorage {
    pool: PgPool,
}

impl DbStorage {
    /// Creates a new `DbStorage`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: i32,
    username: String,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: self.id,
            username: self.username,
        }
    }
}

#[derive(FromRow)]
struct HumanizedTextRecord {
    id: i32,
    user_id: i32,
    original_text: String,
    humanized_text: String,
    options: serde_json::Value,
    plagiarism_score: Option<serde_json::Value>,
    ai_detection: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
}
impl HumanizedTextRecord {
    fn to_domain(self) -> PortResult<HumanizedText> {
        Ok(HumanizedText {
            id: self.id,
            user_id: self.user_id,
            original_text: self.original_text,
            humanized_text: self.humanized_text,
            options: serde_json::from_value(self.options)
                .map_err(|e| PortError::Unexpected(format!("Corrupt options column: {}", e)))?,
            plagiarism_score: self
                .plagiarism_score
                .map(serde_json::from_value)
                .transpose()
                .map_err(|e| PortError::Unexpected(format!("Corrupt score column: {}", e)))?,
            ai_detection: self
                .ai_detection
                .map(serde_json::from_value)
                .transpose()
                .map_err(|e| PortError::Unexpected(format!("Corrupt detection column: {}", e)))?,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct ConvertedFileRecord {
    id: i32,
    user_id: i32,
    original_filename: String,
    converted_filename: String,
    original_format: String,
    converted_format: String,
    operation: String,
    file_size: i64,
    download_url: String,
    created_at: DateTime<Utc>,
}
impl ConvertedFileRecord {
    fn to_domain(self) -> PortResult<ConvertedFile> {
        let operation = FileOperation::parse(&self.operation).ok_or_else(|| {
            PortError::Unexpected(format!("Unknown operation in row: {}", self.operation))
        })?;
        Ok(ConvertedFile {
            id: self.id,
            user_id: self.user_id,
            original_filename: self.original_filename,
            converted_filename: self.converted_filename,
            original_format: self.original_format,
            converted_format: self.converted_format,
            operation,
            file_size: self.file_size,
            download_url: self.download_url,
            created_at: self.created_at,
        })
    }
}

//=========================================================================================
// `StorageService` Trait Implementation
//=========================================================================================

#[async_trait]
impl StorageService for DbStorage {
    async fn get_or_create_user(&self, username: &str, hashed_password: &str) -> PortResult<User> {
        sqlx::query(
            "INSERT INTO users (username, password) VALUES ($1, $2) ON CONFLICT (username) DO NOTHING",
        )
        .bind(username)
        .bind(hashed_password)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("User {} not found", username))
            }
            _ => PortError::Unexpected(e.to_string()),
        })?;

        Ok(record.to_domain())
    }

    async fn create_humanized_text(&self, record: NewHumanizedText) -> PortResult<HumanizedText> {
        let options = serde_json::to_value(&record.options)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let plagiarism = serde_json::to_value(record.plagiarism_score)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let detection = serde_json::to_value(record.ai_detection)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let row = sqlx::query_as::<_, HumanizedTextRecord>(
            "INSERT INTO humanized_texts \
             (user_id, original_text, humanized_text, options, plagiarism_score, ai_detection) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, user_id, original_text, humanized_text, options, plagiarism_score, \
                       ai_detection, created_at",
        )
        .bind(record.user_id)
        .bind(&record.original_text)
        .bind(&record.humanized_text)
        .bind(options)
        .bind(plagiarism)
        .bind(detection)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        row.to_domain()
    }

    async fn humanized_texts_for_user(&self, user_id: i32) -> PortResult<Vec<HumanizedText>> {
        let rows = sqlx::query_as::<_, HumanizedTextRecord>(
            "SELECT id, user_id, original_text, humanized_text, options, plagiarism_score, \
                    ai_detection, created_at \
             FROM humanized_texts WHERE user_id = $1 ORDER BY created_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        rows.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn create_converted_file(&self, record: NewConvertedFile) -> PortResult<ConvertedFile> {
        let row = sqlx::query_as::<_, ConvertedFileRecord>(
            "INSERT INTO converted_files \
             (user_id, original_filename, converted_filename, original_format, converted_format, \
              operation, file_size, download_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING id, user_id, original_filename, converted_filename, original_format, \
                       converted_format, operation, file_size, download_url, created_at",
        )
        .bind(record.user_id)
        .bind(&record.original_filename)
        .bind(&record.converted_filename)
        .bind(&record.original_format)
        .bind(&record.converted_format)
        .bind(record.operation.as_str())
        .bind(record.file_size)
        .bind(&record.download_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        row.to_domain()
    }

    async fn converted_files_for_user(&self, user_id: i32) -> PortResult<Vec<ConvertedFile>> {
        let rows = sqlx::query_as::<_, ConvertedFileRecord>(
            "SELECT id, user_id, original_filename, converted_filename, original_format, \
                    converted_format, operation, file_size, download_url, created_at \
             FROM converted_files WHERE user_id = $1 ORDER BY created_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        rows.into_iter().map(|r| r.to_domain()).collect()
    }
}
