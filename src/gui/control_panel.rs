//! Control Panel Widget
//! Left side panel with session, filter and export controls.

use crate::auth::Access;
use crate::stats::{Campus, TermFilter, TermLabels};
use egui::{Color32, ComboBox, RichText};

const LABEL_WIDTH: f32 = 80.0;
const COMBO_WIDTH: f32 = 190.0;

/// Current filter selection
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FilterSettings {
    pub campus: Option<Campus>,
    pub term: Option<TermFilter>,
    pub instructor: Option<String>,
}

/// Left side control panel.
pub struct ControlPanel {
    pub settings: FilterSettings,
    pub term_labels: TermLabels,
    pub instructors: Vec<String>,
    pub progress: f32,
    pub status: String,
    pub data_ready: bool,
}

impl ControlPanel {
    pub fn new(term_labels: TermLabels) -> Self {
        Self {
            settings: FilterSettings::default(),
            term_labels,
            instructors: Vec::new(),
            progress: 0.0,
            status: "Ready".to_string(),
            data_ready: false,
        }
    }

    /// Replace the instructor options, keeping the current choice when it
    /// is still present and otherwise selecting the first name.
    pub fn update_instructors(&mut self, instructors: Vec<String>) {
        let keep = self
            .settings
            .instructor
            .as_ref()
            .is_some_and(|current| instructors.contains(current));
        if !keep {
            self.settings.instructor = instructors.first().cloned();
        }
        self.instructors = instructors;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, access: &Access) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Faculty Loadings")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(RichText::new("Course Load Insights").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Session Section =====
        ui.horizontal(|ui| {
            match access {
                Access::Granted { display_name } => {
                    ui.label(RichText::new(format!("👤 {}", display_name)).size(12.0));
                }
                Access::Restricted => {
                    ui.label(RichText::new("Not signed in").size(12.0).color(Color32::GRAY));
                }
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Log out").clicked() {
                    action = ControlPanelAction::Logout;
                }
            });
        });

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filter Section =====
        ui.label(RichText::new("🔧 Filter Options").size(14.0).strong());
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new("Campus:"));
            let selected = self
                .settings
                .campus
                .map(|c| c.label().to_string())
                .unwrap_or_else(|| "Select a campus location".to_string());
            ComboBox::from_id_salt("campus")
                .width(COMBO_WIDTH)
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    for campus in Campus::ALL {
                        if ui
                            .selectable_label(self.settings.campus == Some(campus), campus.label())
                            .clicked()
                        {
                            self.settings.campus = Some(campus);
                            action = ControlPanelAction::FiltersChanged;
                        }
                    }
                });
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new("Semester:"));
            let selected = self
                .settings
                .term
                .map(|t| t.label(&self.term_labels).to_string())
                .unwrap_or_else(|| "Select a semester".to_string());
            ComboBox::from_id_salt("term")
                .width(COMBO_WIDTH)
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    for term in TermFilter::ALL {
                        if ui
                            .selectable_label(
                                self.settings.term == Some(term),
                                term.label(&self.term_labels),
                            )
                            .clicked()
                        {
                            self.settings.term = Some(term);
                            action = ControlPanelAction::FiltersChanged;
                        }
                    }
                });
        });

        ui.add_space(5.0);
        if ui.small_button("Clear filters").clicked() {
            self.settings.campus = None;
            self.settings.term = None;
            action = ControlPanelAction::FiltersChanged;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Instructor Section =====
        // Roster data, signed-in viewers only
        let signed_in = matches!(access, Access::Granted { .. });
        if signed_in {
            self.show_instructor_search(ui, &mut action);
        }

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            let charts_enabled = self.data_ready && signed_in;
            ui.add_enabled_ui(charts_enabled, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Save Charts").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::SaveCharts;
                }
            });

            ui.add_space(8.0);

            if ui.button("⟳ Reload rosters").clicked() {
                action = ControlPanelAction::Reload;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        if signed_in {
            let status_color = if self.status.contains("Error") {
                Color32::from_rgb(220, 53, 69)
            } else if self.status.contains("Loaded") {
                Color32::from_rgb(40, 167, 69)
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(&self.status).size(11.0).color(status_color));
        } else {
            ui.label(RichText::new("Sign in to see roster details").size(11.0).color(Color32::GRAY));
        }

        action
    }

    fn show_instructor_search(&mut self, ui: &mut egui::Ui, action: &mut ControlPanelAction) {
        ui.label(RichText::new("🔍 Instructor Search").size(14.0).strong());
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new("Instructor:"));
            let selected = self.settings.instructor.clone().unwrap_or_default();
            ComboBox::from_id_salt("instructor")
                .width(COMBO_WIDTH)
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    for name in &self.instructors {
                        let is_selected = self.settings.instructor.as_deref() == Some(name);
                        if ui.selectable_label(is_selected, name).clicked() {
                            self.settings.instructor = Some(name.clone());
                            *action = ControlPanelAction::InstructorChanged;
                        }
                    }
                });
        });
        if self.instructors.is_empty() && self.data_ready {
            ui.label(RichText::new("No instructors in this selection").size(11.0).color(Color32::GRAY));
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    Logout,
    FiltersChanged,
    InstructorChanged,
    SaveCharts,
    Reload,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_panel() -> ControlPanel {
        let mut panel = ControlPanel::new(TermLabels::default());
        panel.update_instructors(vec!["Adams, Pat".to_string(), "Smith, Jane".to_string()]);
        panel.data_ready = true;
        panel.set_progress(100.0, "Loaded 2 Fall and 1 Spring sections");
        panel
    }

    fn collect_text(shape: &egui::Shape, out: &mut Vec<String>) {
        match shape {
            egui::Shape::Text(text) => out.push(text.galley.text().to_string()),
            egui::Shape::Vec(shapes) => shapes.iter().for_each(|s| collect_text(s, out)),
            _ => {}
        }
    }

    /// Every text run painted by one frame of the panel.
    fn rendered_text(panel: &mut ControlPanel, access: &Access) -> Vec<String> {
        let ctx = egui::Context::default();
        let output = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                panel.show(ui, access);
            });
        });

        let mut texts = Vec::new();
        for clipped in &output.shapes {
            collect_text(&clipped.shape, &mut texts);
        }
        texts
    }

    #[test]
    fn test_restricted_panel_hides_roster_data() {
        let mut panel = loaded_panel();
        let texts = rendered_text(&mut panel, &Access::Restricted);

        assert!(texts.iter().any(|t| t == "Not signed in"));
        for text in &texts {
            assert!(!text.contains("Adams") && !text.contains("Smith"), "{text}");
            assert!(!text.contains("Loaded"), "{text}");
            assert!(!text.contains("Instructor"), "{text}");
        }
    }

    #[test]
    fn test_granted_panel_shows_instructor_and_status() {
        let mut panel = loaded_panel();
        let access = Access::Granted {
            display_name: "Dana".to_string(),
        };
        let texts = rendered_text(&mut panel, &access);

        assert!(texts.iter().any(|t| t == "Adams, Pat"));
        assert!(texts.iter().any(|t| t.starts_with("Loaded 2 Fall")));
    }

    #[test]
    fn test_first_instructor_selected_by_default() {
        let mut panel = ControlPanel::new(TermLabels::default());
        panel.update_instructors(vec!["Adams".to_string(), "Smith".to_string()]);
        assert_eq!(panel.settings.instructor.as_deref(), Some("Adams"));
    }

    #[test]
    fn test_current_instructor_kept_when_still_listed() {
        let mut panel = ControlPanel::new(TermLabels::default());
        panel.update_instructors(vec!["Adams".to_string(), "Smith".to_string()]);
        panel.settings.instructor = Some("Smith".to_string());

        panel.update_instructors(vec!["Lee".to_string(), "Smith".to_string()]);
        assert_eq!(panel.settings.instructor.as_deref(), Some("Smith"));

        panel.update_instructors(vec!["Lee".to_string()]);
        assert_eq!(panel.settings.instructor.as_deref(), Some("Lee"));

        panel.update_instructors(Vec::new());
        assert_eq!(panel.settings.instructor, None);
    }
}
