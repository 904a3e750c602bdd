use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{RichText, Stroke, Ui};
use egui_plot::{Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::color::{translucent, GPA_PURPLE, NEUTRAL_GRAY, RADAR_BLUE};
use crate::config::{GPA_AXIS_MAX, GPA_HEIGHT, RADAR_HEIGHT};
use crate::data::record::{GpaEntry, QualityAxis};

// ---------------------------------------------------------------------------
// Radar geometry
// ---------------------------------------------------------------------------

/// Unit direction of spoke `i` out of `n`, starting at the top and going
/// clockwise.
fn spoke(i: usize, n: usize) -> [f64; 2] {
    let angle = FRAC_PI_2 - TAU * i as f64 / n as f64;
    [angle.cos(), angle.sin()]
}

/// Vertices of the radar polygon for 0–100 scores, on a unit circle.
pub fn radar_vertices(scores: &[f64]) -> Vec<[f64; 2]> {
    let n = scores.len();
    scores
        .iter()
        .enumerate()
        .map(|(i, score)| {
            let [x, y] = spoke(i, n);
            let r = score.clamp(0.0, 100.0) / 100.0;
            [x * r, y * r]
        })
        .collect()
}

/// Closed ring at radius `r` through all spokes.
fn ring(r: f64, n: usize) -> Vec<[f64; 2]> {
    (0..=n)
        .map(|i| {
            let [x, y] = spoke(i % n, n);
            [x * r, y * r]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Composite-quality radar chart
// ---------------------------------------------------------------------------

/// Render the five normalised axes as a filled radar chart.
pub fn quality_radar(ui: &mut Ui, axes: &[QualityAxis]) {
    let n = axes.len();
    if n < 3 {
        return;
    }
    let grid = Stroke::new(1.0, translucent(NEUTRAL_GRAY, 0.35));
    let vertices = radar_vertices(&axes.iter().map(|a| a.score).collect::<Vec<_>>());

    Plot::new("quality_radar")
        .height(RADAR_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_x(-1.35)
        .include_x(1.35)
        .include_y(-1.25)
        .include_y(1.25)
        .show(ui, |plot_ui| {
            for step in 1..=5 {
                let r = step as f64 / 5.0;
                plot_ui.line(Line::new(PlotPoints::from(ring(r, n))).stroke(grid));
            }
            for i in 0..n {
                let tip = spoke(i, n);
                plot_ui.line(Line::new(PlotPoints::from(vec![[0.0, 0.0], tip])).stroke(grid));
            }

            plot_ui.polygon(
                Polygon::new(PlotPoints::from(vertices.clone()))
                    .name("综合评分")
                    .fill_color(translucent(RADAR_BLUE, 0.3))
                    .stroke(Stroke::new(2.0, RADAR_BLUE)),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(vertices.clone()))
                    .radius(3.5)
                    .color(RADAR_BLUE),
            );

            for (i, axis) in axes.iter().enumerate() {
                let [x, y] = spoke(i, n);
                plot_ui.text(Text::new(
                    PlotPoint::new(x * 1.15, y * 1.12),
                    RichText::new(format!("{}\n{:.0}", axis.label, axis.score)).strong(),
                ));
            }
        });
}

// ---------------------------------------------------------------------------
// GPA trend chart
// ---------------------------------------------------------------------------

/// Render the per-semester GPA line. Caller handles the empty series.
pub fn gpa_trend(ui: &mut Ui, series: &[GpaEntry]) {
    let labels: Vec<String> = series.iter().map(|e| e.semester.clone()).collect();
    let points: Vec<[f64; 2]> = series
        .iter()
        .enumerate()
        .map(|(i, e)| [i as f64, e.gpa])
        .collect();

    Plot::new("gpa_trend")
        .height(GPA_HEIGHT)
        .x_axis_label("学期")
        .y_axis_label("绩点")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_x(-0.5)
        .include_x(series.len() as f64 - 0.5)
        .include_y(0.0)
        .include_y(GPA_AXIS_MAX)
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > f64::EPSILON || i < 0.0 {
                return String::new();
            }
            labels.get(i as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .name("绩点")
                    .color(GPA_PURPLE)
                    .width(3.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(points.clone()))
                    .radius(5.0)
                    .color(GPA_PURPLE),
            );
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f64; 2], b: [f64; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-9 && (a[1] - b[1]).abs() < 1e-9
    }

    #[test]
    fn first_spoke_points_up() {
        let v = radar_vertices(&[100.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(close(v[0], [0.0, 1.0]));
        assert!(close(v[1], [0.0, 0.0]));
    }

    #[test]
    fn half_score_is_half_radius() {
        let v = radar_vertices(&[50.0; 4]);
        // Four spokes: up, right, down, left.
        assert!(close(v[0], [0.0, 0.5]));
        assert!(close(v[1], [0.5, 0.0]));
        assert!(close(v[2], [0.0, -0.5]));
        assert!(close(v[3], [-0.5, 0.0]));
    }

    #[test]
    fn ring_is_closed() {
        let r = ring(1.0, 5);
        assert_eq!(r.len(), 6);
        assert!(close(r[0], r[5]));
    }
}
