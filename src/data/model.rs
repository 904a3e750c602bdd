use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the loaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed spreadsheet cell mirroring common Pandas dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            // Shortest round-trip form: no implicit rounding.
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Classified – the one place where "is this cell empty / numeric" is decided
// ---------------------------------------------------------------------------

/// Result of classifying a raw cell.
///
/// Every consumer (resolver, normaliser, search) goes through
/// [`CellValue::classify`] instead of checking sentinels on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classified<'a> {
    /// Absent, null, NaN, or exactly one of the "" / "nan" / "none" text forms.
    Empty,
    /// Non-empty text that does not coerce to a finite number.
    Text(&'a str),
    /// Anything coercible to a number (numeric cells, numeric text, bools).
    Number(f64),
}

/// Text values that collapse to the empty sentinel (compared case-insensitively).
const EMPTY_TEXT: [&str; 3] = ["", "nan", "none"];

impl CellValue {
    pub fn classify(&self) -> Classified<'_> {
        match self {
            CellValue::Null => Classified::Empty,
            CellValue::Float(v) if v.is_nan() => Classified::Empty,
            CellValue::Float(v) => Classified::Number(*v),
            CellValue::Integer(i) => Classified::Number(*i as f64),
            CellValue::Bool(b) => Classified::Number(if *b { 1.0 } else { 0.0 }),
            CellValue::String(s) => {
                // Sentinels match the whole cell; padded text such as "  " stays text.
                if EMPTY_TEXT.iter().any(|sentinel| s.eq_ignore_ascii_case(sentinel)) {
                    return Classified::Empty;
                }
                match s.trim().parse::<f64>() {
                    Ok(v) if v.is_finite() => Classified::Number(v),
                    _ => Classified::Text(s),
                }
            }
        }
    }

    /// `true` when the cell classifies as the empty sentinel.
    pub fn is_empty(&self) -> bool {
        matches!(self.classify(), Classified::Empty)
    }

    /// Try to interpret the value as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self.classify() {
            Classified::Number(v) => Some(v),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Row – one student record as loaded
// ---------------------------------------------------------------------------

/// A single row of the source table: column_name → value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub cells: BTreeMap<String, CellValue>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }
}

impl<K: Into<String>> FromIterator<(K, CellValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, CellValue)>>(iter: I) -> Self {
        Row {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table. Row order is the spreadsheet's row order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    rows: Vec<Row>,
    /// Column names in header order.
    column_names: Vec<String>,
}

impl Dataset {
    /// Build a dataset, padding every row so all rows share the header's
    /// column set (cells missing from a row become `Null`).
    pub fn new(column_names: Vec<String>, mut rows: Vec<Row>) -> Self {
        for row in &mut rows {
            for col in &column_names {
                row.cells.entry(col.clone()).or_insert(CellValue::Null);
            }
        }
        Dataset { rows, column_names }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_names.iter().any(|c| c == column)
    }

    /// The subset of `expected` this table has no column for.
    pub fn missing_columns<'a>(&self, expected: &[&'a str]) -> Vec<&'a str> {
        expected
            .iter()
            .copied()
            .filter(|col| !self.has_column(col))
            .collect()
    }
}
