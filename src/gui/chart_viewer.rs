//! Chart Viewer Widget
//! Central scrollable dashboard: department load, instructor load charts,
//! course metrics and the instructor table.

use crate::auth::Access;
use crate::charts::{load_bars, ChartPlotter};
use crate::stats::{Campus, InstructorAggregate, LoadReport, TermFilter, TermLabels};
use egui::{Color32, RichText, ScrollArea};

/// Metric cards per row
const METRICS_PER_ROW: usize = 4;

/// Actions triggered from the dashboard itself
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerAction {
    None,
    Login,
    DownloadCsv,
}

/// Dashboard for the current selection.
#[derive(Default)]
pub struct ChartViewer {
    pub report: Option<LoadReport>,
    pub instructor: Option<String>,
    pub instructor_rows: Vec<InstructorAggregate>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.report = None;
        self.instructor = None;
        self.instructor_rows.clear();
    }

    pub fn set_report(&mut self, report: LoadReport) {
        self.report = Some(report);
    }

    /// Select an instructor and cache their rows.
    pub fn select_instructor(&mut self, instructor: Option<String>) {
        self.instructor_rows = match (&self.report, &instructor) {
            (Some(report), Some(name)) => report.rows_for(name),
            _ => Vec::new(),
        };
        self.instructor = instructor;
    }

    pub fn show(&self, ui: &mut egui::Ui, access: &Access, labels: &TermLabels) -> ViewerAction {
        let display_name = match access {
            Access::Restricted => return Self::show_restricted(ui),
            Access::Granted { display_name } => display_name,
        };

        let mut action = ViewerAction::None;

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(RichText::new(format!("Welcome, {}", display_name)).size(20.0));
                ui.add_space(4.0);
                ui.label(RichText::new("Faculty Loading Insights").size(26.0).strong());
                ui.add_space(6.0);

                let Some(report) = &self.report else {
                    ui.label(RichText::new("No Data").size(20.0));
                    return;
                };

                Self::show_selection(ui, report.campus, report.term, labels);
                ui.add_space(10.0);

                // Departmental load
                ui.label(RichText::new("Department Load").size(18.0).strong());
                ui.label(
                    RichText::new(format!(
                        "{} sections, {} enrolled",
                        report.selected_rows,
                        report.department_total()
                    ))
                    .size(11.0)
                    .color(Color32::GRAY),
                );
                ChartPlotter::draw_department_chart(ui, &report.departments);

                ui.add_space(15.0);
                ui.separator();

                let Some(instructor) = &self.instructor else {
                    ui.label(
                        RichText::new("No instructors match this selection")
                            .size(14.0)
                            .color(Color32::GRAY),
                    );
                    return;
                };

                ui.label(
                    RichText::new(format!("Instructor Course Load: {}", instructor))
                        .size(18.0)
                        .strong(),
                );
                ui.add_space(6.0);

                let width = (ui.available_width() - 20.0) / 2.0;
                ui.horizontal_top(|ui| {
                    ui.vertical(|ui| {
                        ui.set_width(width);
                        let by_course = load_bars(&self.instructor_rows, |r| r.identifier.as_str());
                        ChartPlotter::draw_load_chart(ui, "load_by_course", "Course", &by_course);
                        ui.label(
                            RichText::new(
                                "⚠ This graph includes all types of course delivery methods. \
                                 Instructors may include students teaching classes in their capacity as TAs.",
                            )
                            .size(11.0),
                        );
                    });

                    ui.add_space(20.0);

                    ui.vertical(|ui| {
                        ui.set_width(width);
                        ui.label(
                            RichText::new("Enrollment and Limits by Instruction Type")
                                .size(14.0)
                                .strong(),
                        );
                        let by_type =
                            load_bars(&self.instructor_rows, |r| r.instruction_type.as_str());
                        ChartPlotter::draw_load_chart(ui, "load_by_type", "Instruction Type", &by_type);
                        ui.label(
                            RichText::new(
                                "⚠ Total load includes all available instruction types for a course.",
                            )
                            .size(11.0),
                        );
                    });
                });

                ui.add_space(15.0);
                ui.label(RichText::new("Enrollment by Course").size(14.0).strong());
                ui.add_space(5.0);
                for chunk in self.instructor_rows.chunks(METRICS_PER_ROW) {
                    ui.horizontal(|ui| {
                        for row in chunk {
                            ChartPlotter::draw_metric_card(ui, row);
                            ui.add_space(8.0);
                        }
                    });
                    ui.add_space(8.0);
                }

                ui.add_space(15.0);
                ui.label(
                    RichText::new(format!("Tabular data for {}", instructor))
                        .size(18.0)
                        .strong(),
                );
                ui.add_space(5.0);
                ChartPlotter::draw_instructor_table(ui, &self.instructor_rows);

                ui.add_space(10.0);
                let download = egui::Button::new(RichText::new("⬇ Download Instructor data").size(14.0))
                    .min_size(egui::vec2(200.0, 30.0));
                if ui.add(download).clicked() {
                    action = ViewerAction::DownloadCsv;
                }
                ui.add_space(20.0);
            });

        action
    }

    fn show_restricted(ui: &mut egui::Ui) -> ViewerAction {
        let mut action = ViewerAction::None;
        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            ui.label(
                RichText::new("This application is private, you must log in to access it.")
                    .size(18.0),
            );
            ui.add_space(12.0);
            if ui.button(RichText::new("Log in").size(16.0)).clicked() {
                action = ViewerAction::Login;
            }
            ui.add_space(30.0);
            ui.label(
                RichText::new("Access Restricted")
                    .size(24.0)
                    .strong()
                    .color(Color32::from_rgb(220, 53, 69)),
            );
        });
        action
    }

    fn show_selection(
        ui: &mut egui::Ui,
        campus: Option<Campus>,
        term: Option<TermFilter>,
        labels: &TermLabels,
    ) {
        let campus = campus.map(|c| c.label()).unwrap_or("None");
        let term = term.map(|t| t.label(labels)).unwrap_or("None");
        ui.horizontal(|ui| {
            ui.label(RichText::new("Selected filter").size(11.0).color(Color32::GRAY));
            ui.label(RichText::new(campus).size(11.0).strong());
            ui.label(RichText::new("·").size(11.0).color(Color32::GRAY));
            ui.label(RichText::new(term).size(11.0).strong());
        });
    }
}
