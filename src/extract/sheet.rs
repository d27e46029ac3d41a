use crate::core::error::DocChatError;
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;

/// One `# Sheet:` header per sheet in workbook order, then every row
/// tab-separated. No truncation, no numeric reformatting.
pub(super) fn extract_workbook(bytes: &[u8]) -> Result<String, DocChatError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| DocChatError::Extraction(format!("Workbook: {}", e)))?;

    let mut text = String::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| DocChatError::Extraction(format!("Sheet {}: {}", name, e)))?;

        text.push_str("# Sheet: ");
        text.push_str(&name);
        text.push('\n');
        for row in range.rows() {
            let cells: Vec<String> = row.iter().map(render_cell).collect();
            text.push_str(&cells.join("\t"));
            text.push('\n');
        }
    }
    Ok(text)
}

fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Tab-separated rendering of every row; single-sheet semantics, so no
/// header line and no column inference.
pub(super) fn extract_csv(bytes: &[u8]) -> Result<String, DocChatError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut text = String::new();
    for record in reader.records() {
        let record = record.map_err(|e| DocChatError::Extraction(format!("CSV: {}", e)))?;
        let cells: Vec<&str> = record.iter().collect();
        text.push_str(&cells.join("\t"));
        text.push('\n');
    }
    Ok(text)
}
