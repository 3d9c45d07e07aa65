//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.
//!
//! Request bodies are deserialized from `serde_json::Value` by hand instead
//! of through the `Json` extractor's rejection, so malformed payloads
//! produce 400 rather than 422.

use crate::convert::{self, template};
use crate::web::state::AppState;
use axum::{
    body::Body,
    extract::{Multipart, Path as UrlPath, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use text_forge_core::domain::{
    AiDetection, ConversionOptions, ConvertedFile, FileOperation, HumanizationOptions,
    HumanizedText, NewConvertedFile, NewHumanizedText, PlagiarismScore,
};
use tokio_util::io::ReaderStream;
use tracing::{error, warn};
use utoipa::{IntoParams, OpenApi, ToSchema};
use uuid::Uuid;

/// Maximum accepted humanize input, in characters.
const MAX_HUMANIZE_CHARS: usize = 5000;

/// Uploads smaller than this are assumed to be empty or invalid and are
/// replaced with synthetic placeholder content before conversion.
const MIN_UPLOAD_BYTES: usize = 100;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        humanize_handler,
        upload_handler,
        convert_handler,
        download_handler,
        preview_handler,
        list_humanized_handler,
        list_conversions_handler,
    ),
    components(
        schemas(
            HumanizeRequest,
            HumanizeResponse,
            UploadResponse,
            ConvertRequest,
            ConvertResponse,
            HumanizedTextView,
            ConvertedFileView,
        )
    ),
    tags(
        (name = "Text Alchemist & File Forge API", description = "Text humanization and placeholder file conversion.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Request/Response Structs
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct HumanizeRequest {
    pub text: String,
    #[schema(value_type = Object)]
    pub options: HumanizationOptions,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HumanizeResponse {
    humanized_text: String,
    #[schema(value_type = Object)]
    plagiarism_score: PlagiarismScore,
    #[schema(value_type = Object)]
    ai_detection: AiDetection,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    message: String,
    file_ids: Vec<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConvertRequest {
    pub file_ids: Vec<String>,
    #[schema(value_type = Object)]
    pub options: ConversionOptions,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    message: String,
    download_urls: Vec<String>,
    preview_content: String,
}

#[derive(Deserialize, IntoParams)]
pub struct DownloadQuery {
    /// Extension used for the attachment filename. Defaults to `txt`.
    format: Option<String>,
}

/// A stored humanization record, as returned by the history endpoint.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HumanizedTextView {
    id: i32,
    original_text: String,
    humanized_text: String,
    #[schema(value_type = Object)]
    options: HumanizationOptions,
    #[schema(value_type = Option<Object>)]
    plagiarism_score: Option<PlagiarismScore>,
    #[schema(value_type = Option<Object>)]
    ai_detection: Option<AiDetection>,
    created_at: DateTime<Utc>,
}

impl From<HumanizedText> for HumanizedTextView {
    fn from(record: HumanizedText) -> Self {
        Self {
            id: record.id,
            original_text: record.original_text,
            humanized_text: record.humanized_text,
            options: record.options,
            plagiarism_score: record.plagiarism_score,
            ai_detection: record.ai_detection,
            created_at: record.created_at,
        }
    }
}

/// A stored conversion record, as returned by the history endpoint.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedFileView {
    id: i32,
    original_filename: String,
    converted_filename: String,
    original_format: String,
    converted_format: String,
    operation: String,
    file_size: i64,
    download_url: String,
    created_at: DateTime<Utc>,
}

impl From<ConvertedFile> for ConvertedFileView {
    fn from(record: ConvertedFile) -> Self {
        Self {
            id: record.id,
            original_filename: record.original_filename,
            converted_filename: record.converted_filename,
            original_format: record.original_format,
            converted_format: record.converted_format,
            operation: record.operation.as_str().to_string(),
            file_size: record.file_size,
            download_url: record.download_url,
            created_at: record.created_at,
        }
    }
}

//=========================================================================================
// Small Helpers
//=========================================================================================

fn bad_request(message: impl Into<String>) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, message.into())
}

/// File ids are server-generated names inside `uploads/`; anything that
/// could escape that directory is rejected outright.
fn safe_file_id(id: &str) -> bool {
    !id.is_empty() && !id.contains('/') && !id.contains('\\') && !id.contains("..")
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string()
}

/// The bytes actually persisted for an upload: verbatim when the file is
/// large enough to be a real document, synthetic placeholder content
/// otherwise.
fn upload_payload(data: &[u8], original_name: &str, from_format: &str, to_format: &str) -> Vec<u8> {
    if data.len() >= MIN_UPLOAD_BYTES {
        return data.to_vec();
    }
    let stem = Path::new(original_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("upload");
    template::synthetic_document(
        from_format,
        &format!(
            "Content from {} for testing conversion to {}.",
            stem, to_format
        ),
    )
    .into_bytes()
}

//=========================================================================================
// Humanization
//=========================================================================================

/// Humanize a block of text.
///
/// The rewrite is simulated (sentence shuffle plus a style suffix) and the
/// reported scores are fabricated; see the humanizer adapters.
#[utoipa::path(
    post,
    path = "/api/humanize",
    request_body = HumanizeRequest,
    responses(
        (status = 200, description = "Text humanized", body = HumanizeResponse),
        (status = 400, description = "Invalid request data"),
        (status = 500, description = "Processing or persistence error")
    )
)]
pub async fn humanize_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let req: HumanizeRequest = serde_json::from_value(body)
        .map_err(|e| bad_request(format!("Invalid request data: {}", e)))?;

    if req.text.is_empty() {
        return Err(bad_request("text must not be empty"));
    }
    if req.text.chars().count() > MAX_HUMANIZE_CHARS {
        return Err(bad_request(format!(
            "text must be at most {} characters",
            MAX_HUMANIZE_CHARS
        )));
    }

    let outcome = state
        .humanizer
        .humanize(&req.text, &req.options)
        .await
        .map_err(|e| {
            error!("Humanization failed: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error processing humanization request".to_string(),
            )
        })?;

    state
        .db
        .create_humanized_text(NewHumanizedText {
            user_id: state.guest_user_id,
            original_text: req.text,
            humanized_text: outcome.humanized_text.clone(),
            options: req.options,
            plagiarism_score: outcome.plagiarism_score,
            ai_detection: outcome.ai_detection,
        })
        .await
        .map_err(|e| {
            error!("Failed to store humanized text: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error processing request".to_string(),
            )
        })?;

    Ok(Json(HumanizeResponse {
        humanized_text: outcome.humanized_text,
        plagiarism_score: outcome.plagiarism_score,
        ai_detection: outcome.ai_detection,
    }))
}

//=========================================================================================
// File Upload
//=========================================================================================

/// Upload one or more files for later conversion.
///
/// Accepts multipart/form-data with any number of file parts, plus optional
/// `fromFormat`/`toFormat` text fields. Returns the server-assigned file
/// ids to pass to the convert endpoint.
#[utoipa::path(
    post,
    path = "/api/files/upload",
    request_body(content_type = "multipart/form-data", description = "The files to upload."),
    responses(
        (status = 200, description = "Files uploaded", body = UploadResponse),
        (status = 400, description = "No files in the request"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn upload_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut staged: Vec<(String, bytes::Bytes)> = Vec::new();
    let mut from_format = "unknown".to_string();
    let mut to_format = "unknown".to_string();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to read multipart data: {}", e),
        )
    })? {
        let file_name = field.file_name().map(|s| s.to_string());
        let field_name = field.name().map(|s| s.to_string());

        if let Some(original_name) = file_name {
            let data = field.bytes().await.map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to read file bytes: {}", e),
                )
            })?;
            staged.push((original_name, data));
        } else if let Some(name) = field_name {
            let value = field.text().await.unwrap_or_default();
            match name.as_str() {
                "fromFormat" => from_format = value,
                "toFormat" => to_format = value,
                _ => {}
            }
        }
    }

    if staged.is_empty() {
        return Err(bad_request("No files uploaded"));
    }

    let mut file_ids = Vec::with_capacity(staged.len());
    for (original_name, data) in staged {
        let file_id = Uuid::new_v4().to_string();
        let path = state.config.uploads_dir.join(&file_id);

        if data.len() < MIN_UPLOAD_BYTES {
            warn!(
                "File {} is too small ({} bytes), creating placeholder content",
                original_name,
                data.len()
            );
        }
        let payload = upload_payload(&data, &original_name, &from_format, &to_format);
        tokio::fs::write(&path, payload).await.map_err(|e| {
            error!("Failed to store upload {}: {}", original_name, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error uploading files".to_string(),
            )
        })?;

        file_ids.push(file_id);
    }

    Ok(Json(UploadResponse {
        message: "Files uploaded successfully".to_string(),
        file_ids,
    }))
}

//=========================================================================================
// File Conversion
//=========================================================================================

/// Convert previously uploaded files.
///
/// `merge` + `pdf` merges every input into one artifact; `split` + `pdf`
/// splits the first input into a fixed number of pages; any other
/// combination converts each file independently and concurrently. A file
/// whose conversion fails is replaced by a descriptive fallback artifact so
/// the caller always gets something downloadable.
#[utoipa::path(
    post,
    path = "/api/files/convert",
    request_body = ConvertRequest,
    responses(
        (status = 200, description = "Files converted", body = ConvertResponse),
        (status = 400, description = "Invalid request data"),
        (status = 500, description = "Conversion or persistence error")
    )
)]
pub async fn convert_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let req: ConvertRequest = serde_json::from_value(body)
        .map_err(|e| bad_request(format!("Invalid request data: {}", e)))?;

    if req.file_ids.is_empty() {
        return Err(bad_request("No files to convert"));
    }
    if let Some(bad) = req.file_ids.iter().find(|id| !safe_file_id(id)) {
        return Err(bad_request(format!("Invalid file id: {}", bad)));
    }

    let uploads_dir = state.config.uploads_dir.clone();
    let converted_dir = state.config.converted_dir();
    let options = req.options;

    // Resolve the ids that actually exist on disk; missing ones are skipped
    // with a warning, matching the upload/convert demo flow.
    let mut inputs: Vec<PathBuf> = Vec::new();
    for id in &req.file_ids {
        let path = uploads_dir.join(id);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            inputs.push(path);
        } else {
            warn!("File not found: {}", path.display());
        }
    }

    let produced = run_conversion(&inputs, &converted_dir, &options).await?;

    let mut download_urls = Vec::with_capacity(produced.len());
    let mut first_output: Option<PathBuf> = None;

    for (input, output) in &produced {
        let download_id = display_name(output);
        let download_path = uploads_dir.join(&download_id);
        if *output != download_path {
            tokio::fs::copy(output, &download_path).await.map_err(|e| {
                error!("Failed to copy converted file for download: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error converting files".to_string(),
                )
            })?;
        }

        let download_url = format!(
            "/api/files/download/{}?format={}",
            download_id, options.to_format
        );
        let file_size = tokio::fs::metadata(output)
            .await
            .map(|m| m.len() as i64)
            .unwrap_or(0);

        state
            .db
            .create_converted_file(NewConvertedFile {
                user_id: state.guest_user_id,
                original_filename: display_name(input),
                converted_filename: download_id,
                original_format: options.from_format.clone(),
                converted_format: options.to_format.clone(),
                operation: options.operation,
                file_size,
                download_url: download_url.clone(),
            })
            .await
            .map_err(|e| {
                error!("Failed to store conversion record: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error converting files".to_string(),
                )
            })?;

        download_urls.push(download_url);
        if first_output.is_none() {
            first_output = Some(output.clone());
        }
    }

    let preview_content = match &first_output {
        Some(path) => match tokio::fs::read(path).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                warn!("Error reading file for preview: {}", e);
                String::new()
            }
        },
        None => String::new(),
    };

    Ok(Json(ConvertResponse {
        message: "Files converted successfully".to_string(),
        download_urls,
        preview_content,
    }))
}

/// Routes the batch to merge, split, or per-file conversion and returns
/// `(input, output)` pairs.
async fn run_conversion(
    inputs: &[PathBuf],
    converted_dir: &Path,
    options: &ConversionOptions,
) -> Result<Vec<(PathBuf, PathBuf)>, (StatusCode, String)> {
    let conversion_failed = |e: convert::ConvertError| {
        error!("Conversion error: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error during file conversion: {}", e),
        )
    };

    if options.operation == FileOperation::Merge && options.from_format == "pdf" {
        let Some(first) = inputs.first() else {
            return Ok(Vec::new());
        };
        let merged = convert::merge_files(inputs, converted_dir)
            .await
            .map_err(conversion_failed)?;
        return Ok(vec![(first.clone(), merged)]);
    }

    if options.operation == FileOperation::Split && options.from_format == "pdf" {
        let Some(first) = inputs.first() else {
            return Ok(Vec::new());
        };
        let pages = convert::split_file(first, converted_dir)
            .await
            .map_err(conversion_failed)?;
        return Ok(pages.into_iter().map(|p| (first.clone(), p)).collect());
    }

    // Standard conversion: each file independently, concurrently. A failure
    // in one does not cancel its siblings; it becomes a fallback artifact.
    let conversions = inputs.iter().map(|input| {
        let options = options.clone();
        let converted_dir = converted_dir.to_path_buf();
        async move {
            match convert::convert_file(input, &converted_dir, &options).await {
                Ok(output) => Ok((input.clone(), output)),
                Err(e) => {
                    error!("Conversion failed for {}: {}", input.display(), e);
                    let fallback = converted_dir.join(format!(
                        "converted_{}.{}",
                        Uuid::new_v4(),
                        options.to_format
                    ));
                    let content = format!(
                        "File conversion attempted but failed.\nOriginal file: {}\nRequested format: {}",
                        display_name(input),
                        options.to_format
                    );
                    tokio::fs::write(&fallback, content)
                        .await
                        .map(|_| (input.clone(), fallback))
                }
            }
        }
    });

    let mut pairs = Vec::with_capacity(inputs.len());
    for result in futures::future::join_all(conversions).await {
        match result {
            Ok(pair) => pairs.push(pair),
            Err(e) => {
                // Even the fallback write failed; nothing left to hand out.
                error!("Failed to write fallback artifact: {}", e);
                return Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Error during file conversion: {}", e),
                ));
            }
        }
    }
    Ok(pairs)
}

//=========================================================================================
// Download and Preview
//=========================================================================================

/// Download a converted file as an attachment.
#[utoipa::path(
    get,
    path = "/api/files/download/{file_id}",
    params(
        ("file_id" = String, Path, description = "The server-assigned file id."),
        DownloadQuery
    ),
    responses(
        (status = 200, description = "The file content"),
        (status = 404, description = "File not found")
    )
)]
pub async fn download_handler(
    State(state): State<Arc<AppState>>,
    UrlPath(file_id): UrlPath<String>,
    Query(query): Query<DownloadQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if !safe_file_id(&file_id) {
        return Err(bad_request("Invalid file id"));
    }

    let path = state.config.uploads_dir.join(&file_id);
    let meta = tokio::fs::metadata(&path)
        .await
        .map_err(|_| (StatusCode::NOT_FOUND, "File not found".to_string()))?;
    if !meta.is_file() {
        return Err((StatusCode::NOT_FOUND, "Not a valid file".to_string()));
    }

    let file = tokio::fs::File::open(&path).await.map_err(|e| {
        error!("Error downloading file: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error downloading file".to_string(),
        )
    })?;

    let format = query.format.unwrap_or_else(|| "txt".to_string());
    let headers = [
        (header::CONTENT_TYPE, "application/octet-stream".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"converted_file.{}\"", format),
        ),
    ];
    Ok((headers, Body::from_stream(ReaderStream::new(file))))
}

/// Return a converted file's content as plain text for in-browser preview.
#[utoipa::path(
    get,
    path = "/api/files/preview/{file_id}",
    params(
        ("file_id" = String, Path, description = "The server-assigned file id.")
    ),
    responses(
        (status = 200, description = "The file content as text/plain"),
        (status = 404, description = "File not found"),
        (status = 500, description = "Error reading the file")
    )
)]
pub async fn preview_handler(
    State(state): State<Arc<AppState>>,
    UrlPath(file_id): UrlPath<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if !safe_file_id(&file_id) {
        return Err(bad_request("Invalid file id"));
    }

    let path = state.config.uploads_dir.join(&file_id);
    let meta = tokio::fs::metadata(&path)
        .await
        .map_err(|_| (StatusCode::NOT_FOUND, "File not found".to_string()))?;
    if !meta.is_file() {
        return Err((StatusCode::NOT_FOUND, "Not a valid file".to_string()));
    }

    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        error!("Error previewing file: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error previewing file".to_string(),
        )
    })?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        String::from_utf8_lossy(&bytes).into_owned(),
    ))
}

//=========================================================================================
// History
//=========================================================================================

/// List the guest user's stored humanization records.
#[utoipa::path(
    get,
    path = "/api/history/humanized",
    responses(
        (status = 200, description = "Stored humanization records", body = [HumanizedTextView]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_humanized_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<HumanizedTextView>>, (StatusCode, String)> {
    let records = state
        .db
        .humanized_texts_for_user(state.guest_user_id)
        .await
        .map_err(|e| {
            error!("Failed to list humanized texts: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error fetching history".to_string(),
            )
        })?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

/// List the guest user's stored conversion records.
#[utoipa::path(
    get,
    path = "/api/history/conversions",
    responses(
        (status = 200, description = "Stored conversion records", body = [ConvertedFileView]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_conversions_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ConvertedFileView>>, (StatusCode, String)> {
    let records = state
        .db
        .converted_files_for_user(state.guest_user_id)
        .await
        .map_err(|e| {
            error!("Failed to list converted files: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error fetching history".to_string(),
            )
        })?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_ids_with_path_components_are_rejected() {
        assert!(safe_file_id("6c0f2a1e-converted.txt"));
        assert!(!safe_file_id(""));
        assert!(!safe_file_id("../etc/passwd"));
        assert!(!safe_file_id("nested/name"));
        assert!(!safe_file_id(r"nested\name"));
    }

    #[test]
    fn convert_request_accepts_the_camel_case_wire_shape() {
        let body = serde_json::json!({
            "fileIds": ["abc"],
            "options": {
                "fromFormat": "pdf",
                "toFormat": "txt",
                "operation": "split"
            }
        });
        let req: ConvertRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.file_ids, vec!["abc"]);
        assert_eq!(req.options.operation, FileOperation::Split);
    }

    #[test]
    fn tiny_uploads_are_replaced_with_synthetic_content() {
        let payload = upload_payload(b"tiny", "essay.pdf", "pdf", "txt");
        let text = String::from_utf8(payload).unwrap();
        assert!(text.starts_with("%PDF-1.4"));
        assert!(text.contains("Content from essay for testing conversion to txt."));

        let payload = upload_payload(b"0123456789", "notes.txt", "txt", "html");
        assert_eq!(
            String::from_utf8(payload).unwrap(),
            "Content from notes for testing conversion to html."
        );
    }

    #[test]
    fn full_size_uploads_are_stored_verbatim() {
        let data = vec![b'x'; 120];
        assert_eq!(upload_payload(&data, "essay.txt", "txt", "pdf"), data);
    }

    #[tokio::test]
    async fn merge_attributes_the_artifact_to_the_first_input() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("alpha.pdf");
        let b = dir.path().join("beta.pdf");
        tokio::fs::write(&a, "%PDF-1.4 (alpha body) Tj").await.unwrap();
        tokio::fs::write(&b, "%PDF-1.4 (beta body) Tj").await.unwrap();

        let options = ConversionOptions {
            from_format: "pdf".to_string(),
            to_format: "pdf".to_string(),
            operation: FileOperation::Merge,
        };
        let pairs = run_conversion(&[a.clone(), b], dir.path(), &options)
            .await
            .unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, a);
    }

    #[test]
    fn unknown_operation_fails_deserialization() {
        let body = serde_json::json!({
            "fileIds": ["abc"],
            "options": {
                "fromFormat": "pdf",
                "toFormat": "txt",
                "operation": "rotate"
            }
        });
        assert!(serde_json::from_value::<ConvertRequest>(body).is_err());
    }
}
