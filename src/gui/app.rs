//! Faculty Loadings Main Application
//! Main window with control panel and dashboard.

use crate::auth::{Access, IdentityProvider};
use crate::charts::{load_bars, StaticChartRenderer};
use crate::config::AppConfig;
use crate::data::{load_terms, CsvCache, InstructorCsv, NormalizeCache, TermTables};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, ViewerAction};
use crate::stats::LoadReport;
use egui::SidePanel;
use std::fs;
use std::path::Path;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;
use tracing::{error, info, warn};

/// Exported chart size
const CHART_PNG_WIDTH: u32 = 1400;
const CHART_PNG_HEIGHT: u32 = 900;

/// Roster loading result from background thread
enum LoadResult {
    Progress(f32, String),
    Complete(TermTables),
    Error(String),
}

/// Main application window.
pub struct LoadingsApp {
    config: AppConfig,
    identity: Box<dyn IdentityProvider>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    tables: Option<TermTables>,
    normalize_cache: Arc<NormalizeCache>,
    csv_cache: CsvCache,

    // Async roster loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl LoadingsApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        identity: Box<dyn IdentityProvider>,
    ) -> Self {
        let mut app = Self {
            control_panel: ControlPanel::new(config.data.term_labels()),
            chart_viewer: ChartViewer::new(),
            config,
            identity,
            tables: None,
            normalize_cache: Arc::new(NormalizeCache::new()),
            csv_cache: CsvCache::new(),
            load_rx: None,
            is_loading: false,
        };
        // Rosters load at startup whether or not anyone is signed in
        app.start_loading();
        app
    }

    /// Load and normalize both rosters in a background thread.
    fn start_loading(&mut self) {
        if self.is_loading {
            return;
        }

        let fall_path = self.config.data.fall_path.clone();
        let spring_path = self.config.data.spring_path.clone();
        let cache = Arc::clone(&self.normalize_cache);

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        self.is_loading = true;
        self.control_panel.data_ready = false;
        self.control_panel.set_progress(5.0, "Loading rosters...");

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress(
                20.0,
                "Reading and normalizing term rosters...".to_string(),
            ));

            match load_terms(&fall_path, &spring_path, &cache) {
                Ok(tables) => {
                    let _ = tx.send(LoadResult::Complete(tables));
                }
                Err(e) => {
                    error!(error = %e, "failed to load rosters");
                    let _ = tx.send(LoadResult::Error(e.to_string()));
                }
            }
        });
    }

    /// Check for roster loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(progress, status) => {
                        self.control_panel.set_progress(progress, &status);
                    }
                    LoadResult::Complete(tables) => {
                        self.control_panel.set_progress(
                            100.0,
                            &format!(
                                "Loaded {} Fall and {} Spring sections",
                                tables.fall.height(),
                                tables.spring.height()
                            ),
                        );
                        self.tables = Some(tables);
                        self.control_panel.data_ready = true;
                        self.is_loading = false;
                        should_keep_receiver = false;
                        self.refresh_report();
                    }
                    LoadResult::Error(error) => {
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {}", error));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Recompute selection and aggregates for the current filters.
    fn refresh_report(&mut self) {
        let Some(tables) = &self.tables else {
            return;
        };
        let settings = &self.control_panel.settings;

        match LoadReport::build(tables, settings.campus, settings.term) {
            Ok(report) => {
                self.control_panel.update_instructors(report.instructors.clone());
                self.chart_viewer.set_report(report);
                self.chart_viewer
                    .select_instructor(self.control_panel.settings.instructor.clone());
            }
            Err(e) => {
                error!(error = %e, "failed to aggregate selection");
                self.chart_viewer.clear();
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", e));
            }
        }
    }

    /// Save the selected instructor's rows as CSV.
    fn handle_download_csv(&mut self) {
        let Some(instructor) = self.chart_viewer.instructor.clone() else {
            return;
        };
        let settings = &self.control_panel.settings;
        let file_name = InstructorCsv::file_name(
            &instructor,
            settings.campus,
            settings.term,
            &self.control_panel.term_labels,
        );

        let bytes = match self.csv_cache.get_or_encode(&self.chart_viewer.instructor_rows) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = %e, "failed to encode instructor csv");
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", e));
                return;
            }
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(&file_name)
            .save_file()
        else {
            return; // User cancelled
        };

        match fs::write(&path, bytes.as_slice()) {
            Ok(()) => {
                info!(path = %path.display(), rows = self.chart_viewer.instructor_rows.len(), "saved instructor csv");
                self.control_panel
                    .set_progress(100.0, &format!("Saved {}", file_name));
                self.open_if_configured(&path);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to save instructor csv");
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", e));
            }
        }
    }

    /// Render the department and instructor charts to PNG files.
    fn handle_save_charts(&mut self) {
        let Some(report) = &self.chart_viewer.report else {
            self.control_panel.set_progress(0.0, "No charts to save");
            return;
        };

        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return; // User cancelled
        };

        self.control_panel.set_progress(10.0, "Rendering charts...");

        let mut images: Vec<(String, Vec<u8>)> = Vec::new();
        match StaticChartRenderer::render_department_png(
            &report.departments,
            CHART_PNG_WIDTH,
            CHART_PNG_HEIGHT,
        ) {
            Ok(png) => images.push(("department-load.png".to_string(), png)),
            Err(e) => {
                self.control_panel
                    .set_progress(0.0, &format!("Render error: {}", e));
                return;
            }
        }

        if let Some(instructor) = &self.chart_viewer.instructor {
            let bars = load_bars(&self.chart_viewer.instructor_rows, |r| r.identifier.as_str());
            let title = format!("Instructor Course Load: {}", instructor);
            match StaticChartRenderer::render_load_png(&title, &bars, CHART_PNG_WIDTH, CHART_PNG_HEIGHT) {
                Ok(png) => images.push((format!("{}-load.png", instructor.replace(['/', '\\'], "_")), png)),
                Err(e) => {
                    self.control_panel
                        .set_progress(0.0, &format!("Render error: {}", e));
                    return;
                }
            }
        }

        self.control_panel.set_progress(60.0, "Writing images...");

        for (name, png) in &images {
            let path = dir.join(name);
            if let Err(e) = fs::write(&path, png) {
                warn!(path = %path.display(), error = %e, "failed to write chart image");
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", e));
                return;
            }
            info!(path = %path.display(), "saved chart image");
        }

        self.control_panel
            .set_progress(100.0, &format!("Saved {} charts", images.len()));
        self.open_if_configured(&dir);
    }

    fn open_if_configured(&self, path: &Path) {
        if self.config.export.open_after_export {
            if let Err(e) = open::that(path) {
                warn!(path = %path.display(), error = %e, "failed to open export");
            }
        }
    }
}

impl eframe::App for LoadingsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        let access = Access::of(self.identity.as_ref());

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui, &access);

                    match action {
                        ControlPanelAction::Logout => self.identity.logout(),
                        ControlPanelAction::FiltersChanged => self.refresh_report(),
                        ControlPanelAction::InstructorChanged => {
                            self.chart_viewer
                                .select_instructor(self.control_panel.settings.instructor.clone());
                        }
                        ControlPanelAction::SaveCharts => self.handle_save_charts(),
                        ControlPanelAction::Reload => self.start_loading(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            let action = self
                .chart_viewer
                .show(ui, &access, &self.control_panel.term_labels);

            match action {
                ViewerAction::Login => self.identity.login(),
                ViewerAction::DownloadCsv => self.handle_download_csv(),
                ViewerAction::None => {}
            }
        });
    }
}
