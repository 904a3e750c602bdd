use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const STUDENTS: usize = 60;

const SURNAMES: [&str; 10] = ["张", "李", "王", "赵", "刘", "陈", "杨", "黄", "周", "吴"];
const GIVEN: [&str; 12] = [
    "伟", "芳", "娜", "敏", "静", "磊", "洋", "艳", "勇", "杰", "涛", "明",
];
const CLASSES: [&str; 4] = ["计科2301", "计科2302", "软工2301", "电子2301"];
const MAJORS: [&str; 3] = ["计算机科学与技术", "软件工程", "电子信息工程"];
const COUNSELORS: [&str; 2] = ["王老师", "刘老师"];
const POLITICAL: [&str; 3] = ["共青团员", "群众", "中共预备党员"];
const ETHNICITY: [&str; 3] = ["汉族", "回族", "壮族"];
const DIFFICULTIES: [&str; 3] = ["家庭经济困难", "学业压力大", "身体原因"];
const PSYCH: [&str; 3] = ["A", "B", "C"];
const HARDSHIP: [&str; 2] = ["一般困难", "特别困难"];
const SCHOLARSHIP: [&str; 3] = ["一等", "二等", "三等"];
const GRANTS: [&str; 2] = ["国家助学金", "校级助学金"];
const AWARDS: [&str; 2] = ["优秀学生干部", "数学建模省二等奖"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Uniform value in `[lo, hi)` rounded to `decimals`.
    fn range(&mut self, lo: f64, hi: f64, decimals: i32) -> f64 {
        let scale = 10f64.powi(decimals);
        ((lo + (hi - lo) * self.next_f64()) * scale).round() / scale
    }
}

/// Text column: name + one optional value per student.
struct TextColumn {
    name: &'static str,
    values: Vec<Option<String>>,
}

/// Numeric column: name + one optional value per student.
struct NumberColumn {
    name: &'static str,
    values: Vec<Option<f64>>,
}

fn text_column(
    name: &'static str,
    rng: &mut SimpleRng,
    mut f: impl FnMut(&mut SimpleRng, usize) -> Option<String>,
) -> TextColumn {
    TextColumn {
        name,
        values: (0..STUDENTS).map(|i| f(rng, i)).collect(),
    }
}

fn number_column(
    name: &'static str,
    rng: &mut SimpleRng,
    mut f: impl FnMut(&mut SimpleRng) -> Option<f64>,
) -> NumberColumn {
    NumberColumn {
        name,
        values: (0..STUDENTS).map(|_| f(rng)).collect(),
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let ids: Vec<i64> = (0..STUDENTS as i64).map(|i| 2023010001 + i).collect();

    // Help status drives the two dependent columns.
    let needs_help: Vec<bool> = (0..STUDENTS).map(|_| rng.chance(0.25)).collect();

    // Picks a value with probability `p`, otherwise leaves the cell blank.
    let maybe = |items: &'static [&'static str], p: f64| {
        move |r: &mut SimpleRng, _: usize| r.chance(p).then(|| r.pick(items).to_string())
    };
    let always = |items: &'static [&'static str]| maybe(items, 1.0);

    let text = vec![
        text_column("姓名", &mut rng, |r, _| {
            Some(format!("{}{}", r.pick(&SURNAMES), r.pick(&GIVEN)))
        }),
        text_column("班级_基本信息", &mut rng, always(&CLASSES)),
        // Half the cohort has not been assigned a major yet.
        text_column("分流专业", &mut rng, maybe(&MAJORS, 0.5)),
        text_column("原专业", &mut rng, always(&MAJORS)),
        text_column("辅导员", &mut rng, always(&COUNSELORS)),
        text_column("政治面貌", &mut rng, always(&POLITICAL)),
        text_column("民族", &mut rng, always(&ETHNICITY)),
        text_column("性别", &mut rng, always(&["男", "女"])),
        text_column("有无需要学院协助解决的困难", &mut rng, |_, i| {
            Some(if needs_help[i] { "是" } else { "无" }.to_string())
        }),
        text_column("有何困难", &mut rng, |r, i| {
            (needs_help[i] && r.chance(0.7)).then(|| r.pick(&DIFFICULTIES).to_string())
        }),
        text_column("最新心理等级", &mut rng, maybe(&PSYCH, 0.6)),
        text_column("第一学年困难等级", &mut rng, maybe(&HARDSHIP, 0.2)),
        text_column("第二学年困难等级", &mut rng, |r, _| {
            if r.chance(0.1) {
                Some("nan".to_string())
            } else {
                r.chance(0.2).then(|| r.pick(&HARDSHIP).to_string())
            }
        }),
        text_column("困难保障人群", &mut rng, maybe(&["是"], 0.1)),
        text_column("人民奖学金", &mut rng, maybe(&SCHOLARSHIP, 0.3)),
        text_column("助学金", &mut rng, maybe(&GRANTS, 0.15)),
        text_column("助学金.1", &mut rng, maybe(&GRANTS, 0.15)),
        text_column("奖项", &mut rng, |r, _| {
            if r.chance(0.1) {
                Some("None".to_string())
            } else {
                r.chance(0.2).then(|| r.pick(&AWARDS).to_string())
            }
        }),
    ];

    let numbers = vec![
        number_column("德育", &mut rng, |r| Some(r.range(12.0, 15.0, 1))),
        number_column("智育", &mut rng, |r| Some(r.range(55.0, 98.0, 2))),
        number_column("体测成绩", &mut rng, |r| {
            r.chance(0.9).then(|| r.range(55.0, 118.0, 1))
        }),
        number_column("23-24附加分", &mut rng, |r| {
            r.chance(0.8).then(|| r.range(-1.0, 6.0, 1))
        }),
        number_column("测评总分", &mut rng, |r| Some(r.range(60.0, 112.0, 2))),
        number_column("第一学期绩点", &mut rng, |r| Some(r.range(2.0, 4.0, 2))),
        number_column("第二学期绩点", &mut rng, |r| {
            r.chance(0.95).then(|| r.range(2.0, 4.0, 2))
        }),
        number_column("第三学期绩点", &mut rng, |r| {
            r.chance(0.5).then(|| r.range(2.0, 4.0, 2))
        }),
    ];

    // ---- Parquet ----
    let mut fields = vec![Field::new("学号", DataType::Int64, false)];
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(Int64Array::from(ids.clone()))];
    for col in &text {
        fields.push(Field::new(col.name, DataType::Utf8, true));
        arrays.push(Arc::new(StringArray::from(
            col.values.iter().map(|v| v.as_deref()).collect::<Vec<_>>(),
        )));
    }
    for col in &numbers {
        fields.push(Field::new(col.name, DataType::Float64, true));
        arrays.push(Arc::new(Float64Array::from(col.values.clone())));
    }
    let schema = Arc::new(Schema::new(fields));
    let batch =
        RecordBatch::try_new(schema.clone(), arrays).expect("Failed to create RecordBatch");

    let parquet_path = "sample_students.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    // ---- CSV ----
    let csv_path = "sample_students.csv";
    let mut out = csv::Writer::from_path(csv_path).expect("Failed to create CSV");
    let header: Vec<&str> = std::iter::once("学号")
        .chain(text.iter().map(|c| c.name))
        .chain(numbers.iter().map(|c| c.name))
        .collect();
    out.write_record(&header).expect("Failed to write CSV header");
    for (i, id) in ids.iter().enumerate() {
        let record: Vec<String> = std::iter::once(id.to_string())
            .chain(text.iter().map(|c| c.values[i].clone().unwrap_or_default()))
            .chain(
                numbers
                    .iter()
                    .map(|c| c.values[i].map(|v| v.to_string()).unwrap_or_default()),
            )
            .collect();
        out.write_record(&record).expect("Failed to write CSV row");
    }
    out.flush().expect("Failed to flush CSV");

    println!("Wrote {STUDENTS} students to {parquet_path} and {csv_path}");
}
