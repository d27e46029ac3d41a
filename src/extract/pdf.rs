use crate::core::error::DocChatError;

/// Text per page in page order, one trailing newline per page. Pages with
/// no extractable text contribute an empty string, not an error.
pub(super) fn extract(bytes: &[u8]) -> Result<String, DocChatError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| DocChatError::Extraction(format!("PDF: {}", e)))?;

    let mut text = String::new();
    for page in pages {
        text.push_str(&page);
        text.push('\n');
    }
    Ok(text)
}
