//! GUI module - User interface components

mod app;
mod chart_viewer;
mod control_panel;

pub use app::LoadingsApp;
pub use chart_viewer::{ChartViewer, ViewerAction};
pub use control_panel::{ControlPanel, ControlPanelAction};
