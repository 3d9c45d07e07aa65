//! services/api/src/convert/template.rs
//!
//! Pure string templates for the conversion pipeline. No round-trip
//! fidelity is attempted: a "docx" output is a plain-text representation,
//! not a real Office document. These are placeholders by design.

const FOOTER: &str = "Converted with Text Alchemist & File Forge";
const RULE: &str = "=============================================";

/// Renders extracted text into the target format.
pub fn render(text: &str, to_format: &str, source_stem: &str, from_format: &str) -> String {
    match to_format {
        "txt" => format!(
            "CONVERTED DOCUMENT: {source_stem}\n\
             ORIGINAL FORMAT: {from_format}\n\
             CONVERTED FORMAT: TXT\n\
             {RULE}\n\n\
             {text}\n\n\
             {RULE}\n\
             {FOOTER}\n\
             {RULE}\n"
        ),
        "html" => render_html(text, source_stem, from_format),
        "docx" | "doc" => format!(
            "CONVERTED DOCUMENT: {source_stem}\n\
             ORIGINAL FORMAT: {from_format}\n\
             CONVERTED FORMAT: {}\n\n\
             {text}\n\n\
             {FOOTER}",
            to_format.to_uppercase()
        ),
        _ => format!(
            "CONVERTED DOCUMENT: {source_stem}\n\
             ORIGINAL FORMAT: {from_format}\n\
             CONVERTED FORMAT: {}\n\n\
             {text}\n\n\
             {FOOTER}\n",
            to_format.to_uppercase()
        ),
    }
}

fn render_html(text: &str, source_stem: &str, from_format: &str) -> String {
    let body = text
        .lines()
        .map(|line| format!("<p>{}</p>", line))
        .collect::<String>();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <title>Converted Document: {source_stem}</title>
  <style>
    body {{ font-family: Arial, sans-serif; margin: 40px; line-height: 1.6; }}
    .header {{ background: #f4f4f4; padding: 20px; border-bottom: 1px solid #ddd; }}
    .content {{ padding: 20px; white-space: pre-wrap; }}
    .footer {{ text-align: center; margin-top: 40px; font-size: 0.8em; color: #777; }}
  </style>
</head>
<body>
  <div class="header">
    <h1>Converted Document: {source_stem}</h1>
    <p>Original format: {from_format} | Converted to: HTML</p>
  </div>

  <div class="content">
    {body}
  </div>

  <div class="footer">
    <p>{FOOTER}</p>
  </div>
</body>
</html>"#
    )
}

/// Generates a minimal stand-in document for uploads too small to convert
/// meaningfully (under 100 bytes). For `pdf` this is a tiny single-page PDF
/// skeleton carrying `content` as its only text; other formats get the
/// content as-is.
pub fn synthetic_document(format: &str, content: &str) -> String {
    if format != "pdf" {
        return content.to_string();
    }

    format!(
        "%PDF-1.4\n\
         1 0 obj\n\
         << /Type /Catalog\n   /Pages 2 0 R\n>>\n\
         endobj\n\
         2 0 obj\n\
         << /Type /Pages\n   /Kids [3 0 R]\n   /Count 1\n>>\n\
         endobj\n\
         3 0 obj\n\
         << /Type /Page\n   /Parent 2 0 R\n   /Resources << /Font << /F1 4 0 R >> >>\n   /MediaBox [0 0 612 792]\n   /Contents 5 0 R\n>>\n\
         endobj\n\
         4 0 obj\n\
         << /Type /Font\n   /Subtype /Type1\n   /BaseFont /Helvetica\n>>\n\
         endobj\n\
         5 0 obj\n\
         << /Length 68 >>\n\
         stream\n\
         BT\n\
         /F1 12 Tf\n\
         100 700 Td\n\
         ({content}) Tj\n\
         ET\n\
         endstream\n\
         endobj\n\
         xref\n\
         0 6\n\
         0000000000 65535 f\n\
         0000000009 00000 n\n\
         0000000058 00000 n\n\
         0000000115 00000 n\n\
         0000000234 00000 n\n\
         0000000302 00000 n\n\
         trailer\n\
         << /Size 6\n   /Root 1 0 R\n>>\n\
         startxref\n\
         372\n\
         %%EOF"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn txt_output_starts_with_the_banner() {
        let out = render("body text", "txt", "report", "pdf");
        assert!(out.starts_with(
            "CONVERTED DOCUMENT: report\nORIGINAL FORMAT: pdf\nCONVERTED FORMAT: TXT"
        ));
        assert!(out.contains("body text"));
        assert!(out.contains(FOOTER));
    }

    #[test]
    fn html_output_is_a_document_with_one_paragraph_per_line() {
        let out = render("first line\nsecond line", "html", "notes", "md");
        assert!(out.starts_with("<!DOCTYPE html>"));
        assert!(out.contains("<p>first line</p><p>second line</p>"));
        assert!(out.contains("Converted Document: notes"));
    }

    #[test]
    fn docx_and_doc_share_the_text_representation() {
        let docx = render("x", "docx", "a", "txt");
        let doc = render("x", "doc", "a", "txt");
        assert!(docx.contains("CONVERTED FORMAT: DOCX"));
        assert!(doc.contains("CONVERTED FORMAT: DOC"));
    }

    #[test]
    fn unknown_targets_fall_back_to_the_uppercased_banner() {
        let out = render("x", "rtf", "a", "txt");
        assert!(out.starts_with("CONVERTED DOCUMENT: a"));
        assert!(out.contains("CONVERTED FORMAT: RTF"));
    }

    #[test]
    fn synthetic_pdf_embeds_the_content_as_a_text_operator() {
        let doc = synthetic_document("pdf", "Hello placeholder");
        assert!(doc.starts_with("%PDF-1.4"));
        assert!(doc.contains("(Hello placeholder) Tj"));
        assert!(doc.ends_with("%%EOF"));
    }

    #[test]
    fn synthetic_text_formats_pass_content_through() {
        assert_eq!(synthetic_document("txt", "abc"), "abc");
        assert_eq!(synthetic_document("docx", "abc"), "abc");
    }
}
