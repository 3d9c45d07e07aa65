//! services/api/src/convert/dispatch.rs
//!
//! The conversion dispatcher: validates inputs, runs extraction and
//! templating, and writes the output artifacts. Merge and split are
//! PDF-shaped placeholders - merge concatenates extracted content, split
//! always produces a fixed number of page files.

use chrono::Utc;
use std::path::{Path, PathBuf};
use text_forge_core::domain::ConversionOptions;
use tracing::{info, warn};

use crate::convert::{extract, template};

/// Split always produces this many pages, regardless of the real page count.
pub const SPLIT_PAGE_COUNT: usize = 3;

/// Errors surfaced by the dispatcher. The route layer decides whether to
/// replace them with a fallback artifact or report them.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Input file does not exist: {0}")]
    Missing(String),
    #[error("Empty file: {0}")]
    Empty(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn file_stem(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("document")
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|s| s.to_str()).unwrap_or("document")
}

/// Checks that the input exists, is a regular file, and is non-empty.
/// Returns its size in bytes.
async fn validate_input(path: &Path) -> Result<u64, ConvertError> {
    let meta = match tokio::fs::metadata(path).await {
        Ok(meta) => meta,
        Err(_) => return Err(ConvertError::Missing(path.display().to_string())),
    };
    if !meta.is_file() {
        return Err(ConvertError::Missing(path.display().to_string()));
    }
    if meta.len() == 0 {
        return Err(ConvertError::Empty(path.display().to_string()));
    }
    Ok(meta.len())
}

/// Converts a single file, writing `{stem}_converted.{to}` into
/// `output_dir` and returning its path.
pub async fn convert_file(
    input: &Path,
    output_dir: &Path,
    options: &ConversionOptions,
) -> Result<PathBuf, ConvertError> {
    validate_input(input).await?;

    let stem = file_stem(input);
    let output = output_dir.join(format!("{}_converted.{}", stem, options.to_format));
    info!(
        from = %options.from_format,
        to = %options.to_format,
        input = %input.display(),
        output = %output.display(),
        "converting file"
    );

    let text = extract::extract_text(input, &options.from_format).await;
    let content = template::render(&text, &options.to_format, stem, &options.from_format);
    tokio::fs::write(&output, content).await?;

    Ok(output)
}

/// Merges the extracted content of every input into one placeholder PDF
/// artifact named `merged_{timestamp}.pdf`.
pub async fn merge_files(inputs: &[PathBuf], output_dir: &Path) -> Result<PathBuf, ConvertError> {
    let output = output_dir.join(format!("merged_{}.pdf", Utc::now().timestamp_millis()));

    // Extraction never fails by contract, so the sections can run
    // concurrently without partial-failure handling.
    let sections = futures::future::join_all(inputs.iter().enumerate().map(|(i, path)| async move {
        let content = extract::extract_text(path, "pdf").await;
        format!("--- Document {}: {} ---\n\n{}\n", i + 1, file_name(path), content)
    }))
    .await;

    let combined = format!(
        "=================================================================\n\
         MERGED PDF DOCUMENT\n\
         =================================================================\n\
         Created with: Text Alchemist & File Forge\n\
         Number of source documents: {}\n\
         =================================================================\n\n\
         {}\n\
         =================================================================\n\
         End of merged document\n\
         =================================================================\n",
        inputs.len(),
        sections.join("\n")
    );

    tokio::fs::write(&output, combined).await?;
    Ok(output)
}

/// Splits a PDF into exactly `SPLIT_PAGE_COUNT` placeholder page files,
/// distributing whatever text the parenthesis scrape recovered evenly
/// across them.
pub async fn split_file(input: &Path, output_dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    let size = validate_input(input).await?;
    let size_kb = size as f64 / 1024.0;
    let stem = file_stem(input);

    let extracted = match tokio::fs::read(input).await {
        Ok(bytes) => extract::scrape_parenthesized(&String::from_utf8_lossy(&bytes)),
        Err(e) => {
            warn!("text extraction for split failed: {}", e);
            String::new()
        }
    };
    let chars: Vec<char> = extracted.chars().collect();
    let per_page = chars.len().div_ceil(SPLIT_PAGE_COUNT);

    let mut outputs = Vec::with_capacity(SPLIT_PAGE_COUNT);
    for page in 1..=SPLIT_PAGE_COUNT {
        let page_text = if chars.is_empty() {
            format!(
                "This page was extracted from the PDF document.\n\
                 Due to the limitations of our current text extraction, we're providing this\n\
                 simplified representation of page {page}.\n\n\
                 For better PDF splitting capabilities, specialized PDF tools would be needed."
            )
        } else {
            let start = (page - 1) * per_page;
            let end = (start + per_page).min(chars.len());
            chars.get(start..end).unwrap_or(&[]).iter().collect()
        };

        let content = format!(
            "=================================================================\n\
             PDF PAGE {page} of {SPLIT_PAGE_COUNT}\n\
             =================================================================\n\
             Original file: {}\n\
             File size: {size_kb:.0} KB\n\
             Extracted with: Text Alchemist & File Forge\n\
             =================================================================\n\n\
             {page_text}\n\n\
             =================================================================\n\
             End of page {page}\n\
             =================================================================\n",
            file_name(input)
        );

        let page_path = output_dir.join(format!("{}_page_{}.txt", stem, page));
        tokio::fs::write(&page_path, content).await?;
        outputs.push(page_path);
    }

    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use text_forge_core::domain::FileOperation;

    fn options(from: &str, to: &str) -> ConversionOptions {
        ConversionOptions {
            from_format: from.to_string(),
            to_format: to.to_string(),
            operation: FileOperation::Convert,
        }
    }

    #[tokio::test]
    async fn convert_to_txt_yields_the_banner_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.md");
        tokio::fs::write(&input, "# A heading\nand a body line")
            .await
            .unwrap();

        let output = convert_file(&input, dir.path(), &options("md", "txt"))
            .await
            .unwrap();

        assert_eq!(output.file_name().unwrap(), "notes_converted.txt");
        let content = tokio::fs::read_to_string(&output).await.unwrap();
        assert!(content.starts_with("CONVERTED DOCUMENT: notes"));
        assert!(content.contains("and a body line"));
    }

    #[tokio::test]
    async fn convert_rejects_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = convert_file(&dir.path().join("ghost.txt"), dir.path(), &options("txt", "txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::Missing(_)));
    }

    #[tokio::test]
    async fn convert_rejects_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.txt");
        tokio::fs::write(&input, "").await.unwrap();
        let err = convert_file(&input, dir.path(), &options("txt", "txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::Empty(_)));
    }

    #[tokio::test]
    async fn split_always_yields_exactly_three_pages() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("report.pdf");
        tokio::fs::write(&input, b"%PDF-1.4 (some visible words here) Tj %%EOF")
            .await
            .unwrap();

        let pages = split_file(&input, dir.path()).await.unwrap();
        assert_eq!(pages.len(), SPLIT_PAGE_COUNT);
        for (i, page) in pages.iter().enumerate() {
            let name = page.file_name().unwrap().to_str().unwrap();
            assert_eq!(name, format!("report_page_{}.txt", i + 1));
            let content = tokio::fs::read_to_string(page).await.unwrap();
            assert!(content.contains(&format!("PDF PAGE {} of 3", i + 1)));
        }
    }

    #[tokio::test]
    async fn merge_names_every_source_document() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("alpha.pdf");
        let b = dir.path().join("beta.pdf");
        tokio::fs::write(&a, "%PDF-1.4 (alpha body) Tj").await.unwrap();
        tokio::fs::write(&b, "%PDF-1.4 (beta body) Tj").await.unwrap();

        let merged = merge_files(&[a, b], dir.path()).await.unwrap();
        let content = tokio::fs::read_to_string(&merged).await.unwrap();
        assert!(content.contains("MERGED PDF DOCUMENT"));
        assert!(content.contains("Number of source documents: 2"));
        assert!(content.contains("Document 1: alpha.pdf"));
        assert!(content.contains("Document 2: beta.pdf"));
    }
}
