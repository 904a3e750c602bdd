use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use calamine::{open_workbook_auto, Data, Reader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Dataset, Row};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a student table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xls` – first worksheet, first row is the header
/// * `.csv`     – first row is the header (UTF-8, as exported from Excel)
/// * `.json`    – `[{ "姓名": "...", "学号": 2023001, ... }, ...]`
/// * `.parquet` – one column per field (e.g. `df.to_parquet()`)
///
/// Either the whole file loads or an error is returned; no partial dataset
/// is ever produced.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" | "xls" | "xlsm" => load_excel(path),
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Rename repeated headers the way Pandas does: `a, a, a` → `a, a.1, a.2`.
fn dedupe_headers(headers: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .into_iter()
        .map(|h| {
            let count = seen.entry(h.clone()).or_insert(0);
            let name = if *count == 0 { h } else { format!("{h}.{count}") };
            *count += 1;
            name
        })
        .collect()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers = dedupe_headers(
        reader
            .headers()
            .context("reading CSV headers")?
            .iter()
            .map(|h| h.trim().to_string()),
    );

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let row: Row = headers
            .iter()
            .enumerate()
            .map(|(col_idx, col)| {
                let value = record.get(col_idx).map_or(CellValue::Null, csv_cell);
                (col.clone(), value)
            })
            .collect();
        rows.push(row);
    }

    Ok(Dataset::new(headers, rows))
}

/// CSV cells keep their literal text (`"1.0"`, `"3.50"`, `"00042"`).
/// Numbers are recovered when the cell is classified, not here.
fn csv_cell(s: &str) -> CellValue {
    if s.is_empty() {
        CellValue::Null
    } else {
        CellValue::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Excel loader
// ---------------------------------------------------------------------------

/// Load the first worksheet of an `.xlsx` / `.xls` workbook.
fn load_excel(path: &Path) -> Result<Dataset> {
    let mut workbook = open_workbook_auto(path).context("opening Excel workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .context("reading first worksheet")?;

    let mut sheet_rows = range.rows();
    let Some(header_row) = sheet_rows.next() else {
        return Ok(Dataset::new(Vec::new(), Vec::new()));
    };
    let headers = dedupe_headers(header_row.iter().enumerate().map(|(i, cell)| {
        let name = cell.to_string().trim().to_string();
        if name.is_empty() {
            format!("Unnamed: {i}")
        } else {
            name
        }
    }));

    let rows = sheet_rows
        .map(|cells| {
            headers
                .iter()
                .enumerate()
                .map(|(col_idx, col)| {
                    let value = cells.get(col_idx).map_or(CellValue::Null, excel_cell);
                    (col.clone(), value)
                })
                .collect::<Row>()
        })
        .collect();

    Ok(Dataset::new(headers, rows))
}

/// Excel stores every number as a float; whole values come back as
/// integers so `2023001` does not display as `2023001.0`.
fn excel_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Null,
        Data::String(s) => csv_cell(s),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => CellValue::Integer(*f as i64),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "姓名": "张三", "学号": 2023001, "德育": 13.5 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut cells = BTreeMap::new();
        for (key, val) in obj {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
            cells.insert(key.clone(), json_to_cell(val));
        }
        rows.push(Row { cells });
    }

    Ok(Dataset::new(headers, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        for row in 0..batch.num_rows() {
            let mut cells = BTreeMap::new();
            for (col_idx, col_name) in headers.iter().enumerate() {
                let value = extract_cell_value(batch.column(col_idx), row)
                    .with_context(|| format!("Row {row}: failed to read '{col_name}'"))?;
                cells.insert(col_name.clone(), value);
            }
            rows.push(Row { cells });
        }
    }

    Ok(Dataset::new(headers, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell_value(col: &Arc<dyn Array>, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        _ => CellValue::String(array_value_to_string(col.as_ref(), row)?),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::resolve::{format, resolve};
    use std::path::PathBuf;

    /// A fixture file in the temp dir, removed on drop.
    struct Fixture(PathBuf);

    impl Fixture {
        fn new(name: &str, contents: &str) -> Self {
            let path = std::env::temp_dir()
                .join(format!("student_lens_{}_{name}", std::process::id()));
            std::fs::write(&path, contents).unwrap();
            Fixture(path)
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    #[test]
    fn csv_loads_ragged_rows_and_types() {
        let f = Fixture::new(
            "ragged.csv",
            "姓名,学号,德育,助学金,助学金\n张三,2023001,13.5,,国家助学金\n李四,00042\n",
        );
        let ds = load_file(&f.0).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(
            ds.column_names(),
            ["姓名", "学号", "德育", "助学金", "助学金.1"]
        );
        let first = ds.row(0).unwrap();
        assert_eq!(first.get("学号").and_then(CellValue::as_f64), Some(2023001.0));
        assert_eq!(first.get("德育").and_then(CellValue::as_f64), Some(13.5));
        assert_eq!(first.get("助学金"), Some(&CellValue::Null));
        assert_eq!(
            first.get("助学金.1"),
            Some(&CellValue::String("国家助学金".into()))
        );

        let second = ds.row(1).unwrap();
        assert_eq!(second.get("学号"), Some(&CellValue::String("00042".into())));
        assert_eq!(second.get("德育"), Some(&CellValue::Null));
    }

    #[test]
    fn csv_numbers_keep_their_literal_text() {
        let f = Fixture::new("literal.csv", "人民奖学金,奖项,德育\n1.0,3.50,  \n");
        let ds = load_file(&f.0).unwrap();
        let row = ds.row(0).unwrap();

        assert_eq!(format(resolve(row, &["人民奖学金"])), "1.0");
        assert_eq!(format(resolve(row, &["奖项"])), "3.50");
        assert_eq!(row.get("奖项").and_then(CellValue::as_f64), Some(3.5));
        assert_eq!(row.get("德育"), Some(&CellValue::String("  ".into())));
    }

    #[test]
    fn json_records_load() {
        let f = Fixture::new(
            "records.json",
            r#"[{"姓名": "王五", "学号": 7, "第一学期绩点": 3.5, "奖项": null},
                {"姓名": "赵六", "性别": "女"}]"#,
        );
        let ds = load_file(&f.0).unwrap();

        assert_eq!(ds.len(), 2);
        assert!(ds.has_column("性别"));
        assert_eq!(ds.row(0).unwrap().get("第一学期绩点"), Some(&CellValue::Float(3.5)));
        assert_eq!(ds.row(0).unwrap().get("奖项"), Some(&CellValue::Null));
        assert_eq!(ds.row(1).unwrap().get("学号"), Some(&CellValue::Null));
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        let f = Fixture::new("bad.json", r#"{"姓名": "王五"}"#);
        assert!(load_file(&f.0).is_err());

        let f = Fixture::new("bad_row.json", r#"[1, 2]"#);
        assert!(load_file(&f.0).is_err());
    }

    #[test]
    fn parquet_columns_map_to_cells() {
        use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("姓名", DataType::Utf8, false),
            Field::new("学号", DataType::Int64, false),
            Field::new("德育", DataType::Float64, true),
            Field::new("困难保障人群", DataType::Boolean, false),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(vec!["张三", "李四"])),
            Arc::new(Int64Array::from(vec![2023001, 2023002])),
            Arc::new(Float64Array::from(vec![Some(13.5), None])),
            Arc::new(BooleanArray::from(vec![true, false])),
        ];
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

        let f = Fixture::new("students.parquet", "");
        let file = std::fs::File::create(&f.0).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&f.0).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.column_names(), ["姓名", "学号", "德育", "困难保障人群"]);

        let first = ds.row(0).unwrap();
        assert_eq!(first.get("姓名"), Some(&CellValue::String("张三".into())));
        assert_eq!(first.get("学号"), Some(&CellValue::Integer(2023001)));
        assert_eq!(first.get("德育"), Some(&CellValue::Float(13.5)));
        assert_eq!(first.get("困难保障人群"), Some(&CellValue::Bool(true)));

        let second = ds.row(1).unwrap();
        assert_eq!(second.get("德育"), Some(&CellValue::Null));
        assert_eq!(second.get("困难保障人群"), Some(&CellValue::Bool(false)));
    }

    #[test]
    fn excel_cells_map_like_pandas() {
        assert_eq!(excel_cell(&Data::Empty), CellValue::Null);
        assert_eq!(excel_cell(&Data::String(String::new())), CellValue::Null);
        assert_eq!(excel_cell(&Data::Float(2023001.0)), CellValue::Integer(2023001));
        assert_eq!(excel_cell(&Data::Float(13.5)), CellValue::Float(13.5));
        assert_eq!(excel_cell(&Data::Int(7)), CellValue::Integer(7));
        assert_eq!(excel_cell(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(
            excel_cell(&Data::String("国家助学金".into())),
            CellValue::String("国家助学金".into())
        );
    }

    #[test]
    fn excel_extensions_are_read_as_workbooks() {
        let f = Fixture::new("broken.xlsx", "not a workbook");
        let err = load_file(&f.0).unwrap_err();
        assert!(!err.to_string().contains("Unsupported"), "{err:#}");
    }

    #[test]
    fn unsupported_extension_fails() {
        let err = load_file(Path::new("students.txt")).unwrap_err();
        assert!(err.to_string().contains(".txt"));
    }

    #[test]
    fn missing_file_fails() {
        assert!(load_file(Path::new("/definitely/not/here.csv")).is_err());
    }

    #[test]
    fn header_dedupe_matches_pandas() {
        let headers = dedupe_headers(["a", "b", "a", "a"].map(String::from));
        assert_eq!(headers, ["a", "b", "a.1", "a.2"]);
    }

    #[test]
    fn csv_cells_stay_text() {
        assert_eq!(csv_cell(""), CellValue::Null);
        assert_eq!(csv_cell("0"), CellValue::String("0".into()));
        assert_eq!(csv_cell("00042"), CellValue::String("00042".into()));
        assert_eq!(csv_cell("nan"), CellValue::String("nan".into()));
    }
}
