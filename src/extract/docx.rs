use crate::core::error::DocChatError;
use std::io::{Cursor, Read};

/// Pull the main document part out of the OOXML container and flatten it
/// to one line of text per paragraph, in document order.
pub(super) fn extract(bytes: &[u8]) -> Result<String, DocChatError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| DocChatError::Extraction(format!("DOCX container: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| DocChatError::Extraction(format!("DOCX document part: {}", e)))?
        .read_to_string(&mut xml)
        .map_err(|e| DocChatError::Extraction(format!("DOCX document part: {}", e)))?;

    Ok(document_xml_to_text(&xml))
}

fn document_xml_to_text(xml: &str) -> String {
    // Paragraph ends, explicit breaks, and tabs carry layout; everything
    // else textual lives in <w:t> runs.
    let with_breaks = xml
        .replace("</w:p>", "\n")
        .replace("<w:br/>", "\n")
        .replace("<w:tab/>", "\t");

    let mut stripped = String::with_capacity(with_breaks.len());
    let mut in_tag = false;
    for ch in with_breaks.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => stripped.push(ch),
            _ => {}
        }
    }

    let mut text = String::new();
    for paragraph in stripped.lines().map(str::trim).filter(|l| !l.is_empty()) {
        text.push_str(&decode_xml_entities(paragraph));
        text.push('\n');
    }
    text
}

fn decode_xml_entities(text: &str) -> String {
    // `&amp;` last, so a literal `&amp;lt;` decodes to `&lt;` and no further.
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tabs_and_breaks_are_preserved() {
        let xml = "<w:p><w:r><w:t>a</w:t></w:r><w:tab/><w:r><w:t>b</w:t></w:r></w:p>";
        assert_eq!(document_xml_to_text(xml), "a\tb\n");
    }

    #[test]
    fn entities_decode_once() {
        assert_eq!(decode_xml_entities("Fish &amp; chips &amp;lt;"), "Fish & chips &lt;");
    }
}
