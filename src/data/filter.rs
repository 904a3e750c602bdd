use super::model::{Classified, Dataset, Row};
use super::record::{CLASS_NAME, NAME, STUDENT_ID};
use super::resolve::resolve;

// ---------------------------------------------------------------------------
// Filtered view: rows matching the active search term
// ---------------------------------------------------------------------------

/// The ordered subsequence of dataset rows matching a search term.
///
/// Recomputed from scratch whenever the term or the dataset changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredView {
    pub term: String,
    /// Dataset row indices, in dataset order.
    pub indices: Vec<usize>,
}

impl FilteredView {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Position of dataset row `row` inside this view.
    pub fn position_of(&self, row: usize) -> Option<usize> {
        self.indices.iter().position(|&i| i == row)
    }
}

/// Columns the search term is matched against (OR semantics).
const SEARCH_FIELDS: [&[&str]; 3] = [NAME, STUDENT_ID, CLASS_NAME];

/// Return the rows whose name, student ID or class contains `term`
/// (case-insensitive substring).
///
/// A blank (empty or whitespace-only) term selects every row. Any other term
/// is matched as typed, surrounding spaces included. Empty cells never match.
pub fn filter(dataset: &Dataset, term: &str) -> FilteredView {
    let needle = term.to_lowercase();

    let indices = if needle.trim().is_empty() {
        (0..dataset.len()).collect()
    } else {
        dataset
            .iter()
            .enumerate()
            .filter(|(_, row)| row_matches(row, &needle))
            .map(|(i, _)| i)
            .collect()
    };

    FilteredView {
        term: term.to_string(),
        indices,
    }
}

fn row_matches(row: &Row, needle: &str) -> bool {
    SEARCH_FIELDS.iter().any(|columns| {
        let cell = resolve(row, columns);
        match cell.classify() {
            Classified::Empty => false,
            _ => cell.to_string().to_lowercase().contains(needle),
        }
    })
}
