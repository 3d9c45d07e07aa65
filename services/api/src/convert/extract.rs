//! services/api/src/convert/extract.rs
//!
//! Text extraction for the conversion pipeline. By contract this module
//! never fails: read errors come back as an error-description string so a
//! conversion always has something to format.

use regex::Regex;
use std::path::Path;

/// Formats whose bytes are decoded directly as text.
const TEXT_FORMATS: [&str; 6] = ["txt", "html", "css", "js", "json", "md"];

/// A scrape shorter than this is treated as noise and discarded in favor of
/// the descriptive placeholder.
const MIN_SCRAPED_LEN: usize = 100;

pub fn is_text_format(format: &str) -> bool {
    TEXT_FORMATS.contains(&format)
}

/// Extracts text from `path` according to the declared source format.
///
/// - text-like formats: lossy UTF-8 decode of the raw bytes
/// - `pdf`: the parenthesis heuristic below, or a descriptive placeholder
/// - anything else: a binary-content placeholder
pub async fn extract_text(path: &Path, from_format: &str) -> String {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => return format!("Error extracting text: {}", e),
    };

    if from_format == "pdf" {
        extract_pdf(path, &bytes)
    } else if is_text_format(from_format) {
        String::from_utf8_lossy(&bytes).into_owned()
    } else {
        format!("[Binary content from {} file]", from_format)
    }
}

/// Scrapes parenthesized tokens out of raw PDF bytes. Literal text in PDF
/// content streams is written as `(text) Tj`, so this picks up whatever
/// happens to be stored uncompressed. It won't work for all PDFs -
/// compressed streams and encoded fonts produce nothing usable.
pub fn scrape_parenthesized(raw: &str) -> String {
    let paren = Regex::new(r"\(([^)]+)\)").unwrap();
    let escapes = Regex::new(r"\\\\|\\r|\\n|\\t").unwrap();
    let whitespace = Regex::new(r"\s+").unwrap();

    let joined = paren
        .captures_iter(raw)
        .map(|c| c[1].to_string())
        .collect::<Vec<_>>()
        .join(" ");

    let cleaned = escapes.replace_all(&joined, " ");
    whitespace.replace_all(&cleaned, " ").trim().to_string()
}

fn extract_pdf(path: &Path, bytes: &[u8]) -> String {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document.pdf");
    let size_kb = bytes.len() as f64 / 1024.0;

    let scraped = scrape_parenthesized(&String::from_utf8_lossy(bytes));
    if scraped.len() > MIN_SCRAPED_LEN {
        return format!(
            "CONVERTED PDF: {file_name}\n\
             File Size: {size_kb:.2} KB\n\
             Converted with: Text Alchemist & File Forge\n\
             ------------------------------------------\n\n\
             {scraped}"
        );
    }

    // Nothing readable in the raw bytes. Describe the file instead of
    // emitting gibberish.
    format!(
        "PDF Document Analysis\n\
         =====================\n\
         Filename: {file_name}\n\
         Size: {size_kb:.2} KB\n\
         Type: PDF Document\n\n\
         This PDF document contains {size_kb:.0} KB of data.\n\
         The content appears to be binary and would require specialized PDF parsing libraries\n\
         for full content extraction.\n\n\
         For a proper conversion, we recommend using a specialized PDF library or online service\n\
         that can extract the text content properly."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn text_format_membership() {
        assert!(is_text_format("txt"));
        assert!(is_text_format("md"));
        assert!(!is_text_format("pdf"));
        assert!(!is_text_format("xlsx"));
    }

    #[test]
    fn scrape_collects_parenthesized_tokens() {
        let raw = "stream BT (Hello) Tj (world from a PDF) Tj ET endstream";
        assert_eq!(scrape_parenthesized(raw), "Hello world from a PDF");
    }

    #[test]
    fn scrape_strips_escape_sequences_and_collapses_whitespace() {
        let raw = r"(line one\nline two)   (and\tmore)";
        assert_eq!(scrape_parenthesized(raw), "line one line two and more");
    }

    #[test]
    fn scrape_of_binary_garbage_is_empty() {
        assert_eq!(scrape_parenthesized("%PDF-1.4 \x02\x03\x04 endobj"), "");
    }

    #[tokio::test]
    async fn text_files_are_decoded_verbatim() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "plain contents").unwrap();
        let text = extract_text(file.path(), "txt").await;
        assert_eq!(text, "plain contents");
    }

    #[tokio::test]
    async fn unknown_binary_formats_get_a_placeholder() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0u8, 159, 146, 150]).unwrap();
        let text = extract_text(file.path(), "xlsx").await;
        assert_eq!(text, "[Binary content from xlsx file]");
    }

    #[tokio::test]
    async fn missing_file_yields_error_description_not_panic() {
        let text = extract_text(Path::new("/definitely/not/here.txt"), "txt").await;
        assert!(text.starts_with("Error extracting text:"));
    }

    #[tokio::test]
    async fn opaque_pdf_yields_descriptive_analysis() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"%PDF-1.4\nbinary soup without text\n%%EOF")
            .unwrap();
        let text = extract_text(file.path(), "pdf").await;
        assert!(text.starts_with("PDF Document Analysis"));
        assert!(text.contains("KB of data"));
    }

    #[tokio::test]
    async fn pdf_with_enough_literal_text_is_scraped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let body = "(The quick brown fox jumps over the lazy dog and keeps going) Tj \
                    (until this stream finally has more than one hundred characters of text) Tj";
        write!(file, "%PDF-1.4 stream {} endstream", body).unwrap();
        let text = extract_text(file.path(), "pdf").await;
        assert!(text.starts_with("CONVERTED PDF:"));
        assert!(text.contains("quick brown fox"));
    }
}
