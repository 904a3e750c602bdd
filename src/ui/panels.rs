use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::{self, help_badge, item_badge, Badge, ItemKind, GPA_PURPLE, RADAR_BLUE};
use crate::data::record::{StatusItem, StudentDisplayRecord};
use crate::state::{AppState, View};
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("文件", |ui: &mut Ui| {
            if ui.button("打开…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if state.dataset().is_some() {
            ui.label(format!("总学生数 {}", state.total()));
            ui.label(format!("筛选结果 {}", state.matches()));
        }

        if !state.missing_columns.is_empty() {
            ui.separator();
            let missing = format!("缺少 {} 列", state.missing_columns.len());
            ui.label(RichText::new(missing).color(color::SCHOLARSHIP_AMBER))
                .on_hover_text(state.missing_columns.join("、"));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – search and student list
// ---------------------------------------------------------------------------

/// Render the search box, navigation buttons and the filtered student list.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("学生选择器");
    ui.separator();

    if state.dataset().is_none() {
        ui.label("尚未加载数据。");
        return;
    }

    let mut term = state.search_term().to_string();
    let search = egui::TextEdit::singleline(&mut term)
        .hint_text("输入姓名、学号或班级进行搜索...")
        .desired_width(f32::INFINITY);
    if ui.add(search).changed() {
        state.set_search_term(&term);
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui
            .add_enabled(state.selection().can_prev(), egui::Button::new("⬅ 上一个"))
            .clicked()
        {
            state.prev();
        }
        if ui
            .add_enabled(state.selection().can_next(), egui::Button::new("下一个 ➡"))
            .clicked()
        {
            state.next();
        }
    });
    ui.separator();

    let view: &AppState = state;
    let selected = view.selection().index();
    let mut clicked = None;

    TableBuilder::new(ui)
        .striped(true)
        .sense(egui::Sense::click())
        .column(Column::auto().at_least(56.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in ["姓名", "学号", "班级"] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(20.0, view.matches(), |mut row| {
                let i = row.index();
                row.set_selected(selected == Some(i));
                for field in view.picker_row(i).unwrap_or_default() {
                    row.col(|ui: &mut Ui| {
                        ui.label(field);
                    });
                }
                if row.response().clicked() {
                    clicked = Some(i);
                }
            });
        });

    if let Some(i) = clicked {
        if let Err(e) = state.select(i) {
            log::error!("{e}");
        }
    }
}

// ---------------------------------------------------------------------------
// Central panel – student profile
// ---------------------------------------------------------------------------

/// Render whatever the current view calls for.
pub fn profile_panel(ui: &mut Ui, state: &AppState) {
    let view = match state.view() {
        Ok(view) => view,
        Err(e) => {
            ui.label(RichText::new(e.to_string()).color(Color32::RED));
            return;
        }
    };

    match view {
        View::NoDataset => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("请上传数据文件开始分析学生数据  (文件 → 打开…)");
            });
        }
        View::NoResults { .. } => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading(
                    RichText::new("未找到匹配的学生，请调整搜索条件")
                        .color(color::SCHOLARSHIP_AMBER),
                );
            });
        }
        View::Student { record, index, matches, .. } => {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.label(format!("第 {} / {} 名", index + 1, matches));
                    student_cards(ui, &record, state.config.gpa_decimals);
                });
        }
    }
}

fn student_cards(ui: &mut Ui, rec: &StudentDisplayRecord, gpa_decimals: usize) {
    card(ui, "个人信息", |ui| identity_grid(ui, rec));
    card(ui, "帮助需求", |ui| help_card(ui, rec));
    card(ui, "咨询问题", |ui| status_list(ui, &rec.consultation, ItemKind::Consultation));
    card(ui, "奖学金信息", |ui| status_list(ui, &rec.scholarships, ItemKind::Scholarship));
    card(ui, "综合素质雷达图", |ui| {
        plot::quality_radar(ui, &rec.quality);
        ui.columns(rec.quality.len(), |cols| {
            for (col, axis) in cols.iter_mut().zip(&rec.quality) {
                metric_tile(col, axis.label, &axis.raw_text(), RADAR_BLUE);
            }
        });
    });
    card(ui, "学期成绩趋势", |ui| gpa_card(ui, rec, gpa_decimals));
}

fn card(ui: &mut Ui, title: &str, add_contents: impl FnOnce(&mut Ui)) {
    ui.group(|ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.heading(title);
        ui.separator();
        add_contents(ui);
    });
    ui.add_space(8.0);
}

fn identity_grid(ui: &mut Ui, rec: &StudentDisplayRecord) {
    let fields = [
        ("姓名", &rec.name, "辅导员", &rec.counselor),
        ("学号", &rec.student_id, "政治面貌", &rec.political_status),
        ("班级", &rec.class_name, "民族", &rec.ethnicity),
        ("专业", &rec.major, "性别", &rec.gender),
    ];
    egui::Grid::new("identity")
        .num_columns(4)
        .spacing([24.0, 6.0])
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            for (left_label, left, right_label, right) in fields {
                ui.label(format!("{left_label}："));
                ui.strong(left.as_str());
                ui.label(format!("{right_label}："));
                ui.strong(right.as_str());
                ui.end_row();
            }
        });
}

fn help_card(ui: &mut Ui, rec: &StudentDisplayRecord) {
    let badge = help_badge(rec.help.needs_help);
    if !rec.help.needs_help {
        badge_label(ui, "● 无需帮助", badge);
        return;
    }
    badge_label(ui, "● 需要帮助", badge);
    if let Some(detail) = &rec.help.detail {
        ui.label(RichText::new(format!("困难详情: {detail}")).color(badge.fg));
    }
    if let Some(level) = &rec.help.psych_level {
        ui.label(RichText::new(format!("心理状态: {level}")).color(color::NEUTRAL_GRAY));
    }
}

fn status_list(ui: &mut Ui, items: &[StatusItem], kind: ItemKind) {
    for item in items {
        ui.horizontal(|ui: &mut Ui| {
            ui.label(format!("{}：", item.label));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
                badge_label(ui, &item.text, item_badge(kind, item.tag));
            });
        });
    }
}

fn gpa_card(ui: &mut Ui, rec: &StudentDisplayRecord, decimals: usize) {
    let Some(average) = rec.gpa_average else {
        ui.label("暂无绩点数据");
        return;
    };
    plot::gpa_trend(ui, &rec.gpa);
    ui.columns(rec.gpa.len() + 1, |cols| {
        for (col, entry) in cols.iter_mut().zip(&rec.gpa) {
            metric_tile(col, &entry.semester, &format!("{:.*}", decimals, entry.gpa), GPA_PURPLE);
        }
        if let Some(last) = cols.last_mut() {
            metric_tile(last, "平均绩点", &format!("{:.*}", decimals, average), GPA_PURPLE);
        }
    });
}

fn badge_label(ui: &mut Ui, text: &str, badge: Badge) {
    ui.label(
        RichText::new(format!(" {text} "))
            .color(badge.fg)
            .background_color(badge.bg)
            .strong(),
    );
}

/// One "label over big number" tile under a chart.
fn metric_tile(ui: &mut Ui, label: &str, value: &str, color: Color32) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(label).strong());
        ui.label(RichText::new(value).color(color).size(20.0).strong());
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("选择学生数据文件")
        .add_filter(
            "Supported files",
            &["xlsx", "xls", "xlsm", "csv", "json", "parquet", "pq"],
        )
        .add_filter("Excel", &["xlsx", "xls", "xlsm"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        // Failures are logged and surfaced through `status_message`.
        let _ = state.load_path(&path);
    }
}
