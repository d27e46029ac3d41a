//! Format-specific text extraction.
//!
//! `extract` is a pure function over the input bytes: dispatch is by the
//! file's declared extension (case-insensitive), each format is a single
//! linear pass, and underlying parser failures are mapped to
//! [`DocChatError::Extraction`] rather than crashing the session.

use crate::core::error::DocChatError;
use serde::{Deserialize, Serialize};
use std::fmt;

mod docx;
mod pdf;
mod sheet;

pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md", "pdf", "docx", "xlsx", "xls", "csv"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Txt,
    Md,
    Pdf,
    Docx,
    Xlsx,
    Xls,
    Csv,
}

impl DocumentFormat {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "txt" => Some(DocumentFormat::Txt),
            "md" => Some(DocumentFormat::Md),
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            "xlsx" => Some(DocumentFormat::Xlsx),
            "xls" => Some(DocumentFormat::Xls),
            "csv" => Some(DocumentFormat::Csv),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Txt => "txt",
            DocumentFormat::Md => "md",
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Xlsx => "xlsx",
            DocumentFormat::Xls => "xls",
            DocumentFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extract normalized text from a document's bytes.
pub fn extract(bytes: &[u8], extension: &str) -> Result<String, DocChatError> {
    let format = DocumentFormat::from_extension(extension)
        .ok_or_else(|| DocChatError::UnsupportedFormat(extension.to_lowercase()))?;
    extract_as(bytes, format)
}

pub fn extract_as(bytes: &[u8], format: DocumentFormat) -> Result<String, DocChatError> {
    match format {
        DocumentFormat::Txt | DocumentFormat::Md => String::from_utf8(bytes.to_vec())
            .map_err(|e| DocChatError::Decode(format!("Invalid UTF-8: {}", e))),
        DocumentFormat::Pdf => pdf::extract(bytes),
        DocumentFormat::Docx => docx::extract(bytes),
        DocumentFormat::Xlsx | DocumentFormat::Xls => sheet::extract_workbook(bytes),
        DocumentFormat::Csv => sheet::extract_csv(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn plain_text_decodes_utf8() {
        let text = extract("hello world".as_bytes(), "txt").unwrap();
        assert_eq!(text, "hello world");
    }

    #[test]
    fn invalid_utf8_is_a_decode_error() {
        let err = extract(&[0xff, 0xfe, 0x41], "txt").unwrap_err();
        assert!(matches!(err, DocChatError::Decode(_)));
    }

    #[test]
    fn dispatch_is_case_insensitive() {
        let text = extract("# notes".as_bytes(), "MD").unwrap();
        assert_eq!(text, "# notes");
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let err = extract(b"...", "exe").unwrap_err();
        match err {
            DocChatError::UnsupportedFormat(ext) => assert_eq!(ext, "exe"),
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
    }

    #[test]
    fn extraction_is_deterministic() {
        let bytes = "name,age\nAlice,30\n".as_bytes();
        let first = extract(bytes, "csv").unwrap();
        let second = extract(bytes, "csv").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn csv_renders_all_cells() {
        let text = extract("name,age\nAlice,30\n".as_bytes(), "csv").unwrap();
        assert!(text.contains("Alice"));
        assert!(text.contains("30"));
        assert_eq!(text, "name\tage\nAlice\t30\n");
    }

    #[test]
    fn csv_handles_quoted_fields() {
        let text = extract("name,quote\nAda,\"Hello, world\"\n".as_bytes(), "csv").unwrap();
        assert!(text.contains("Hello, world"));
    }

    #[test]
    fn corrupt_pdf_is_an_extraction_error() {
        let err = extract(b"not a pdf at all", "pdf").unwrap_err();
        assert!(matches!(err, DocChatError::Extraction(_)));
    }

    #[test]
    fn corrupt_workbook_is_an_extraction_error() {
        let err = extract(b"not a workbook", "xlsx").unwrap_err();
        assert!(matches!(err, DocChatError::Extraction(_)));
    }

    #[test]
    fn docx_paragraphs_come_out_in_order() {
        let document_xml = r#"<?xml version="1.0"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>First paragraph</w:t></w:r></w:p>
    <w:p><w:r><w:t>Second &amp; third</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let text = extract(&bytes, "docx").unwrap();
        assert_eq!(text, "First paragraph\nSecond & third\n");
    }

    #[test]
    fn docx_without_document_xml_is_an_extraction_error() {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        writer
            .start_file("something_else.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<x/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let err = extract(&bytes, "docx").unwrap_err();
        assert!(matches!(err, DocChatError::Extraction(_)));
    }
}
