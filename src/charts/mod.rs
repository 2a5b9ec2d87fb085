//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::{load_bars, ChartPlotter};
pub use renderer::StaticChartRenderer;
