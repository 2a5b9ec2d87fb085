//! Chart Plotter Module
//! Interactive load charts, course metrics and tables using egui_plot.

use crate::stats::{DepartmentAggregate, InstructorAggregate, LoadStatus};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

/// Enrollment bars
pub const ENROLLED_COLOR: Color32 = Color32::from_rgb(70, 130, 180); // Steel blue
/// Seat limit rules
pub const LIMIT_COLOR: Color32 = Color32::from_rgb(220, 53, 69); // Red
pub const UNDER_COLOR: Color32 = Color32::from_rgb(40, 167, 69); // Green

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(121, 85, 72),   // Brown
    Color32::from_rgb(96, 125, 139),  // Blue Grey
];

const BAR_WIDTH: f64 = 0.6;

/// One category of a load chart: summed enrollment and each row's limit.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadBar {
    pub label: String,
    pub enrolled: i64,
    pub limits: Vec<i64>,
    pub courses: Vec<String>,
}

/// Group instructor rows into bars by `key`, keeping first-seen order.
///
/// Rows sharing a category stack into one bar; each keeps its own limit rule.
pub fn load_bars<F>(rows: &[InstructorAggregate], key: F) -> Vec<LoadBar>
where
    F: Fn(&InstructorAggregate) -> &str,
{
    let mut bars: Vec<LoadBar> = Vec::new();
    for row in rows {
        let label = key(row);
        match bars.iter_mut().find(|b| b.label == label) {
            Some(bar) => {
                bar.enrolled += row.total_enrolled;
                bar.limits.push(row.total_limit);
                bar.courses.push(row.identifier.clone());
            }
            None => bars.push(LoadBar {
                label: label.to_string(),
                enrolled: row.total_enrolled,
                limits: vec![row.total_limit],
                courses: vec![row.identifier.clone()],
            }),
        }
    }
    bars
}

/// Color used for a load status.
pub fn status_color(status: LoadStatus) -> Color32 {
    match status {
        LoadStatus::Over => LIMIT_COLOR,
        LoadStatus::Under => UNDER_COLOR,
        LoadStatus::At => Color32::GRAY,
    }
}

/// Draws the dashboard charts.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn department_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Bar per department, colored and listed in the legend.
    pub fn draw_department_chart(ui: &mut egui::Ui, departments: &[DepartmentAggregate]) {
        Plot::new("department_load")
            .height(320.0)
            .legend(Legend::default())
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_label("Department")
            .y_axis_label("Total Enrollment")
            // Department names live in the legend
            .x_axis_formatter(|_mark, _range| String::new())
            .show(ui, |plot_ui| {
                for (i, dept) in departments.iter().enumerate() {
                    let color = Self::department_color(i);
                    let bar = Bar::new(i as f64, dept.total_enrolled as f64)
                        .width(0.8)
                        .fill(color)
                        .name(&dept.department_desc);
                    plot_ui.bar_chart(
                        BarChart::new(vec![bar])
                            .color(color)
                            .name(&dept.department_desc),
                    );
                }
            });
    }

    /// Enrollment bars with a red rule at each row's seat limit.
    pub fn draw_load_chart(ui: &mut egui::Ui, id: &str, x_label: &str, bars: &[LoadBar]) {
        let labels: Vec<String> = bars.iter().map(|b| b.label.clone()).collect();

        Plot::new(id)
            .height(280.0)
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_label(x_label)
            .y_axis_label("Enrollment")
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() < 1e-6 && idx >= 0.0 {
                    labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                let enrolled: Vec<Bar> = bars
                    .iter()
                    .enumerate()
                    .map(|(i, bar)| {
                        Bar::new(i as f64, bar.enrolled as f64)
                            .width(BAR_WIDTH)
                            .fill(ENROLLED_COLOR)
                            .name(format!("{} ({})", bar.label, bar.courses.join(", ")))
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(enrolled).color(ENROLLED_COLOR).name("Enrolled"));

                for (i, bar) in bars.iter().enumerate() {
                    let x = i as f64;
                    for &limit in &bar.limits {
                        let rule = PlotPoints::from_iter([
                            [x - BAR_WIDTH / 2.0, limit as f64],
                            [x + BAR_WIDTH / 2.0, limit as f64],
                        ]);
                        plot_ui.line(Line::new(rule).color(LIMIT_COLOR).width(2.0).name("Limit"));
                    }
                }
            });
    }

    /// Course metric: enrolled value with its over/under caption.
    pub fn draw_metric_card(ui: &mut egui::Ui, row: &InstructorAggregate) {
        let delta = row.load_delta();
        let color = status_color(delta.status);

        egui::Frame::none()
            .rounding(6.0)
            .stroke(egui::Stroke::new(1.5, color))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.set_min_width(180.0);
                ui.vertical(|ui| {
                    ui.label(
                        RichText::new(format!("{} ({})", row.identifier, row.instruction_type))
                            .size(12.0),
                    );
                    ui.label(RichText::new(row.total_enrolled.to_string()).size(24.0).strong());
                    ui.label(RichText::new(delta.describe()).size(12.0).color(color));
                });
            });
    }

    /// Striped table of an instructor's rows.
    pub fn draw_instructor_table(ui: &mut egui::Ui, rows: &[InstructorAggregate]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("instructor_table")
                    .striped(true)
                    .min_col_width(70.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        for header in ["Instructor", "Identifier", "Campus", "Type", "Enrolled", "Limit"] {
                            ui.label(RichText::new(header).strong().size(11.0));
                        }
                        ui.end_row();

                        for row in rows {
                            ui.label(RichText::new(&row.instructor).size(11.0));
                            ui.label(RichText::new(&row.identifier).size(11.0));
                            ui.label(RichText::new(&row.campus).size(11.0));
                            ui.label(RichText::new(&row.instruction_type).size(11.0));
                            ui.label(RichText::new(row.total_enrolled.to_string()).size(11.0));
                            ui.label(RichText::new(row.total_limit.to_string()).size(11.0));
                            ui.end_row();
                        }
                    });
            });
    }
}
