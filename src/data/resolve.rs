use super::model::{CellValue, Classified, Row};

/// Display token for the empty sentinel ("none").
pub const EMPTY_TOKEN: &str = "无";

static NULL: CellValue = CellValue::Null;

/// Look up a logical field in `row`, trying each candidate column in order.
///
/// The first candidate whose cell is not the empty sentinel wins. A missing
/// column counts as empty; when no candidate has a value the result is
/// `CellValue::Null`.
pub fn resolve<'a>(row: &'a Row, candidates: &[&str]) -> &'a CellValue {
    candidates
        .iter()
        .filter_map(|col| row.get(col))
        .find(|cell| !cell.is_empty())
        .unwrap_or(&NULL)
}

/// Render a cell for display: [`EMPTY_TOKEN`] for the sentinel, otherwise
/// the cell's literal text.
pub fn format(value: &CellValue) -> String {
    match value.classify() {
        Classified::Empty => EMPTY_TOKEN.to_string(),
        _ => value.to_string(),
    }
}

/// Like [`format`], but substitute `placeholder` when the value is empty.
pub fn format_or(value: &CellValue, placeholder: &str) -> String {
    match value.classify() {
        Classified::Empty => placeholder.to_string(),
        _ => value.to_string(),
    }
}

/// Whether the formatted value carries information.
///
/// A cell whose text is literally [`EMPTY_TOKEN`] counts as absent too.
pub fn is_present(value: &CellValue) -> bool {
    format(value) != EMPTY_TOKEN
}
