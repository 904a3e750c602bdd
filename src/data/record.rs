//! Builds the per-student display record from a raw row.
//!
//! All column names live in the static tables below; each logical field
//! lists its candidate columns in priority order.

use crate::error::Result;

use super::model::{Classified, Row};
use super::normalize::{normalize, raw_display};
use super::resolve::{format, format_or, is_present, resolve, EMPTY_TOKEN};

// ---------------------------------------------------------------------------
// Field mapping table
// ---------------------------------------------------------------------------

pub const NAME: &[&str] = &["姓名"];
pub const STUDENT_ID: &[&str] = &["学号"];
pub const CLASS_NAME: &[&str] = &["班级_基本信息"];
pub const MAJOR: &[&str] = &["分流专业", "原专业"];
pub const COUNSELOR: &[&str] = &["辅导员"];
pub const POLITICAL_STATUS: &[&str] = &["政治面貌"];
pub const ETHNICITY: &[&str] = &["民族"];
pub const GENDER: &[&str] = &["性别"];

pub const HELP_NEEDED: &[&str] = &["有无需要学院协助解决的困难"];
pub const HELP_DETAIL: &[&str] = &["有何困难"];
pub const PSYCH_LEVEL: &[&str] = &["最新心理等级"];
pub const HELP_DETAIL_PLACEHOLDER: &str = "未详述";
pub const PSYCH_LEVEL_PLACEHOLDER: &str = "未评估";

/// A labelled status entry backed by candidate columns.
#[derive(Debug, Clone, Copy)]
pub struct ItemSpec {
    pub label: &'static str,
    pub columns: &'static [&'static str],
}

pub const CONSULTATION_ITEMS: [ItemSpec; 3] = [
    ItemSpec {
        label: "第一学年困难等级",
        columns: &["第一学年困难等级"],
    },
    ItemSpec {
        label: "第二学年困难等级",
        columns: &["第二学年困难等级"],
    },
    ItemSpec {
        label: "困难保障人群",
        columns: &["困难保障人群"],
    },
];

pub const SCHOLARSHIP_ITEMS: [ItemSpec; 3] = [
    ItemSpec {
        label: "人民奖学金",
        columns: &["人民奖学金"],
    },
    ItemSpec {
        label: "助学金",
        columns: &["助学金", "助学金.1"],
    },
    ItemSpec {
        label: "获得奖项",
        columns: &["奖项"],
    },
];

/// One composite-quality axis: its columns and raw-value domain.
#[derive(Debug, Clone, Copy)]
pub struct AxisSpec {
    pub label: &'static str,
    pub columns: &'static [&'static str],
    pub min: f64,
    pub max: f64,
}

pub const QUALITY_AXES: [AxisSpec; 5] = [
    AxisSpec {
        label: "德育",
        columns: &["德育"],
        min: 12.0,
        max: 15.0,
    },
    AxisSpec {
        label: "智育",
        columns: &["智育"],
        min: 50.0,
        max: 100.0,
    },
    AxisSpec {
        label: "体测",
        columns: &["体测成绩"],
        min: 60.0,
        max: 120.0,
    },
    AxisSpec {
        label: "附加分",
        columns: &["附加分", "23-24附加分"],
        min: -1.0,
        max: 6.0,
    },
    AxisSpec {
        label: "总分",
        columns: &["测评总分"],
        min: 50.0,
        max: 110.0,
    },
];

pub const GPA_COLUMNS: [&str; 3] = ["第一学期绩点", "第二学期绩点", "第三学期绩点"];
const GPA_SUFFIX: &str = "绩点";

/// Every column the record builder reads, for the missing-column report.
pub fn expected_columns() -> Vec<&'static str> {
    let identity = [
        NAME,
        STUDENT_ID,
        CLASS_NAME,
        MAJOR,
        COUNSELOR,
        POLITICAL_STATUS,
        ETHNICITY,
        GENDER,
        HELP_NEEDED,
        HELP_DETAIL,
        PSYCH_LEVEL,
    ];
    identity
        .into_iter()
        .flatten()
        .copied()
        .chain(
            CONSULTATION_ITEMS
                .iter()
                .chain(SCHOLARSHIP_ITEMS.iter())
                .flat_map(|item| item.columns.iter().copied()),
        )
        .chain(QUALITY_AXES.iter().flat_map(|axis| axis.columns.iter().copied()))
        .chain(GPA_COLUMNS)
        .collect()
}

// ---------------------------------------------------------------------------
// Display record
// ---------------------------------------------------------------------------

/// Visual treatment selector for consultation / scholarship entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTag {
    HasValue,
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusItem {
    pub label: &'static str,
    /// Formatted value ([`EMPTY_TOKEN`] when absent).
    pub text: String,
    pub tag: StatusTag,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HelpStatus {
    pub needs_help: bool,
    /// Only filled in when help is needed.
    pub detail: Option<String>,
    pub psych_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QualityAxis {
    pub label: &'static str,
    /// Normalised score in `[0, 100]`.
    pub score: f64,
    /// Coerced raw value (0 when missing or non-numeric).
    pub raw: f64,
}

impl QualityAxis {
    pub fn raw_text(&self) -> String {
        if self.raw == 0.0 {
            "0".to_string()
        } else {
            self.raw.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GpaEntry {
    /// Semester label, e.g. "第一学期".
    pub semester: String,
    pub gpa: f64,
}

/// Everything the front end needs to render one student.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentDisplayRecord {
    pub name: String,
    pub student_id: String,
    pub class_name: String,
    pub major: String,
    pub counselor: String,
    pub political_status: String,
    pub ethnicity: String,
    pub gender: String,
    pub help: HelpStatus,
    pub consultation: Vec<StatusItem>,
    pub scholarships: Vec<StatusItem>,
    pub quality: Vec<QualityAxis>,
    /// Only semesters with a numeric value, in semester order.
    pub gpa: Vec<GpaEntry>,
    pub gpa_average: Option<f64>,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Build the display record for `row`. Pure: the same row always yields an
/// equal record.
///
/// Only a misconfigured axis domain can fail; missing or ragged cells never do.
pub fn build(row: &Row) -> Result<StudentDisplayRecord> {
    let field = |columns: &[&str]| format(resolve(row, columns));

    let quality = QUALITY_AXES
        .iter()
        .map(|axis| -> Result<QualityAxis> {
            let value = resolve(row, axis.columns);
            Ok(QualityAxis {
                label: axis.label,
                score: normalize(value, axis.min, axis.max)?,
                raw: raw_display(value),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let gpa = gpa_series(row);

    Ok(StudentDisplayRecord {
        name: field(NAME),
        student_id: field(STUDENT_ID),
        class_name: field(CLASS_NAME),
        major: field(MAJOR),
        counselor: field(COUNSELOR),
        political_status: field(POLITICAL_STATUS),
        ethnicity: field(ETHNICITY),
        gender: field(GENDER),
        help: help_status(row),
        consultation: status_items(row, &CONSULTATION_ITEMS),
        scholarships: status_items(row, &SCHOLARSHIP_ITEMS),
        quality,
        gpa_average: average_gpa(&gpa),
        gpa,
    })
}

fn help_status(row: &Row) -> HelpStatus {
    let needs_help = is_present(resolve(row, HELP_NEEDED));
    if !needs_help {
        return HelpStatus {
            needs_help,
            detail: None,
            psych_level: None,
        };
    }
    HelpStatus {
        needs_help,
        detail: Some(format_or(resolve(row, HELP_DETAIL), HELP_DETAIL_PLACEHOLDER)),
        psych_level: Some(format_or(resolve(row, PSYCH_LEVEL), PSYCH_LEVEL_PLACEHOLDER)),
    }
}

fn status_items(row: &Row, specs: &[ItemSpec]) -> Vec<StatusItem> {
    specs
        .iter()
        .map(|spec| {
            let text = format(resolve(row, spec.columns));
            StatusItem {
                label: spec.label,
                tag: classify_status(&text),
                text,
            }
        })
        .collect()
}

/// Tag a formatted value: anything but the empty token "has value".
pub fn classify_status(formatted: &str) -> StatusTag {
    if formatted == EMPTY_TOKEN {
        StatusTag::None
    } else {
        StatusTag::HasValue
    }
}

fn gpa_series(row: &Row) -> Vec<GpaEntry> {
    GPA_COLUMNS
        .into_iter()
        .filter_map(|col| {
            let Classified::Number(gpa) = resolve(row, &[col]).classify() else {
                return None;
            };
            Some(GpaEntry {
                semester: col.trim_end_matches(GPA_SUFFIX).to_string(),
                gpa,
            })
        })
        .collect()
}

/// Mean of the available semesters; `None` when there are none.
pub fn average_gpa(series: &[GpaEntry]) -> Option<f64> {
    if series.is_empty() {
        return None;
    }
    Some(series.iter().map(|e| e.gpa).sum::<f64>() / series.len() as f64)
}

/// Name, student ID and class as shown in the student picker.
pub fn picker_fields(row: &Row) -> [String; 3] {
    [NAME, STUDENT_ID, CLASS_NAME].map(|columns| format(resolve(row, columns)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn text(s: &str) -> CellValue {
        CellValue::String(s.to_string())
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn sample_row() -> Row {
        [
            ("姓名", text("李四")),
            ("学号", CellValue::Integer(2023010203)),
            ("班级_基本信息", text("计科2301")),
            ("分流专业", text("nan")),
            ("原专业", text("计算机科学")),
            ("辅导员", text("王老师")),
            ("政治面貌", text("共青团员")),
            ("民族", text("汉族")),
            ("性别", text("男")),
            ("有无需要学院协助解决的困难", text("是")),
            ("有何困难", CellValue::Null),
            ("最新心理等级", text("B")),
            ("第一学年困难等级", text("一般困难")),
            ("人民奖学金", text("二等")),
            ("助学金", CellValue::Null),
            ("助学金.1", text("国家助学金")),
            ("德育", CellValue::Float(13.5)),
            ("智育", CellValue::Float(85.0)),
            ("体测成绩", text("不及格")),
            ("23-24附加分", CellValue::Float(2.5)),
            ("测评总分", CellValue::Float(130.0)),
            ("第一学期绩点", CellValue::Float(3.5)),
            ("第二学期绩点", CellValue::Float(3.8)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn identity_fields_resolve_with_fallbacks() {
        let rec = build(&sample_row()).unwrap();
        assert_eq!(rec.name, "李四");
        assert_eq!(rec.student_id, "2023010203");
        assert_eq!(rec.major, "计算机科学");
        assert_eq!(rec.gender, "男");
    }

    #[test]
    fn empty_row_degrades_to_empty_tokens() {
        let rec = build(&Row::default()).unwrap();
        assert_eq!(rec.name, EMPTY_TOKEN);
        assert_eq!(rec.major, EMPTY_TOKEN);
        assert!(!rec.help.needs_help);
        assert!(rec.consultation.iter().all(|i| i.tag == StatusTag::None));
        assert!(rec.quality.iter().all(|a| a.score == 0.0 && a.raw == 0.0));
        assert!(rec.gpa.is_empty());
        assert_eq!(rec.gpa_average, None);
    }

    #[test]
    fn help_status_uses_placeholders() {
        let rec = build(&sample_row()).unwrap();
        assert!(rec.help.needs_help);
        assert_eq!(rec.help.detail.as_deref(), Some(HELP_DETAIL_PLACEHOLDER));
        assert_eq!(rec.help.psych_level.as_deref(), Some("B"));
    }

    #[test]
    fn help_not_needed_for_sentinel_answers() {
        for answer in ["无", "none", "", "NaN"] {
            let row: Row = [("有无需要学院协助解决的困难", text(answer))]
                .into_iter()
                .collect();
            let rec = build(&row).unwrap();
            assert!(!rec.help.needs_help, "{answer:?}");
            assert_eq!(rec.help.detail, None);
        }

        let row: Row = [("有无需要学院协助解决的困难", text("0"))]
            .into_iter()
            .collect();
        assert!(build(&row).unwrap().help.needs_help);
    }

    #[test]
    fn status_items_are_tagged() {
        let rec = build(&sample_row()).unwrap();

        let labels: Vec<_> = rec.consultation.iter().map(|i| i.label).collect();
        assert_eq!(labels, ["第一学年困难等级", "第二学年困难等级", "困难保障人群"]);
        assert_eq!(rec.consultation[0].tag, StatusTag::HasValue);
        assert_eq!(rec.consultation[1].text, EMPTY_TOKEN);
        assert_eq!(rec.consultation[1].tag, StatusTag::None);

        assert_eq!(rec.scholarships[0].text, "二等");
        assert_eq!(rec.scholarships[1].text, "国家助学金");
        assert_eq!(rec.scholarships[2].label, "获得奖项");
        assert_eq!(rec.scholarships[2].tag, StatusTag::None);
    }

    #[test]
    fn quality_axes_normalise_and_clamp() {
        let rec = build(&sample_row()).unwrap();
        let axis = |label: &str| rec.quality.iter().find(|a| a.label == label).unwrap();

        assert_eq!(axis("德育").score, 50.0);
        assert_eq!(axis("德育").raw_text(), "13.5");
        assert!(approx_eq(axis("智育").score, 70.0));
        assert_eq!(axis("体测").score, 0.0);
        assert_eq!(axis("体测").raw_text(), "0");
        assert!(approx_eq(axis("附加分").score, 50.0));
        assert_eq!(axis("总分").score, 100.0);
        assert_eq!(axis("总分").raw, 130.0);
    }

    #[test]
    fn gpa_series_skips_missing_semesters() {
        let rec = build(&sample_row()).unwrap();
        assert_eq!(
            rec.gpa,
            vec![
                GpaEntry {
                    semester: "第一学期".into(),
                    gpa: 3.5,
                },
                GpaEntry {
                    semester: "第二学期".into(),
                    gpa: 3.8,
                },
            ]
        );
        assert!(approx_eq(rec.gpa_average.unwrap(), 3.65));
    }

    #[test]
    fn gpa_series_ignores_text_and_keeps_order() {
        let row: Row = [
            ("第一学期绩点", text("缺")),
            ("第二学期绩点", CellValue::Null),
            ("第三学期绩点", text("3.2")),
        ]
        .into_iter()
        .collect();
        let rec = build(&row).unwrap();
        assert_eq!(rec.gpa.len(), 1);
        assert_eq!(rec.gpa[0].semester, "第三学期");
        assert_eq!(rec.gpa_average, Some(3.2));
    }

    #[test]
    fn build_is_deterministic() {
        let row = sample_row();
        assert_eq!(build(&row).unwrap(), build(&row).unwrap());
    }

    #[test]
    fn picker_fields_format_each_part() {
        let row: Row = [("姓名", text("张三")), ("学号", CellValue::Integer(42))]
            .into_iter()
            .collect();
        assert_eq!(picker_fields(&row), ["张三", "42", "无"]);
    }

    #[test]
    fn expected_columns_cover_the_table() {
        let cols = expected_columns();
        assert!(cols.contains(&"原专业"));
        assert!(cols.contains(&"助学金.1"));
        assert!(cols.contains(&"23-24附加分"));
        assert!(cols.contains(&"第三学期绩点"));
    }
}
