//! Static Chart Renderer
//! Renders the department and instructor load charts to PNG with plotters.
//!
//! Layout matches the interactive view: colored department bars, and
//! enrollment bars with a red rule at each seat limit.

use crate::charts::plotter::LoadBar;
use crate::stats::DepartmentAggregate;
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use std::io::Cursor;
use thiserror::Error;

const STEEL_BLUE: RGBColor = RGBColor(70, 130, 180);
const LIMIT_RED: RGBColor = RGBColor(220, 53, 69);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to draw chart: {0}")]
    Draw(String),
    #[error("Failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Pixel buffer does not match {0}x{1}")]
    Buffer(u32, u32),
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Department load bar chart as PNG bytes.
    pub fn render_department_png(
        departments: &[DepartmentAggregate],
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let mut buffer = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;

            let n = departments.len().max(1);
            let y_max = departments
                .iter()
                .map(|d| d.total_enrolled)
                .max()
                .unwrap_or(0);
            let y_top = Self::y_top(y_max);

            let mut chart = ChartBuilder::on(&root)
                .caption("Department Load", ("sans-serif", 24))
                .margin(20)
                .x_label_area_size(30)
                .y_label_area_size(60)
                .build_cartesian_2d((0..n).into_segmented(), 0i64..y_top)
                .map_err(draw_err)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(0)
                .x_desc("Department")
                .y_desc("Total Enrollment")
                .draw()
                .map_err(draw_err)?;

            for (i, dept) in departments.iter().enumerate() {
                let color = Palette99::pick(i).to_rgba();
                chart
                    .draw_series(std::iter::once({
                        let mut bar = Rectangle::new(
                            [
                                (SegmentValue::Exact(i), 0),
                                (SegmentValue::Exact(i + 1), dept.total_enrolled),
                            ],
                            color.filled(),
                        );
                        bar.set_margin(0, 0, 4, 4);
                        bar
                    }))
                    .map_err(draw_err)?
                    .label(dept.department_desc.clone())
                    .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
            }

            if !departments.is_empty() {
                chart
                    .configure_series_labels()
                    .position(SeriesLabelPosition::UpperRight)
                    .background_style(WHITE.mix(0.8))
                    .border_style(BLACK)
                    .draw()
                    .map_err(draw_err)?;
            }

            root.present().map_err(draw_err)?;
        }

        Self::encode_png(buffer, width, height)
    }

    /// Enrollment-versus-limit chart as PNG bytes.
    pub fn render_load_png(
        title: &str,
        bars: &[LoadBar],
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let mut buffer = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;

            let n = bars.len().max(1);
            let y_max = bars
                .iter()
                .flat_map(|b| b.limits.iter().copied().chain(std::iter::once(b.enrolled)))
                .max()
                .unwrap_or(0);
            let y_top = Self::y_top(y_max);
            let labels: Vec<String> = bars.iter().map(|b| b.label.clone()).collect();

            let mut chart = ChartBuilder::on(&root)
                .caption(title, ("sans-serif", 22))
                .margin(20)
                .x_label_area_size(40)
                .y_label_area_size(60)
                .build_cartesian_2d((0..n).into_segmented(), 0i64..y_top)
                .map_err(draw_err)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .y_desc("Enrollment")
                .x_label_formatter(&|v| match v {
                    SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
                    _ => String::new(),
                })
                .draw()
                .map_err(draw_err)?;

            chart
                .draw_series(bars.iter().enumerate().map(|(i, bar)| {
                    let mut rect = Rectangle::new(
                        [
                            (SegmentValue::Exact(i), 0),
                            (SegmentValue::Exact(i + 1), bar.enrolled),
                        ],
                        STEEL_BLUE.filled(),
                    );
                    rect.set_margin(0, 0, 12, 12);
                    rect
                }))
                .map_err(draw_err)?;

            chart
                .draw_series(bars.iter().enumerate().flat_map(|(i, bar)| {
                    bar.limits.iter().map(move |&limit| {
                        PathElement::new(
                            vec![
                                (SegmentValue::Exact(i), limit),
                                (SegmentValue::Exact(i + 1), limit),
                            ],
                            LIMIT_RED.stroke_width(2),
                        )
                    })
                }))
                .map_err(draw_err)?;

            root.present().map_err(draw_err)?;
        }

        Self::encode_png(buffer, width, height)
    }

    /// Upper bound of the y axis with 10% headroom.
    fn y_top(max: i64) -> i64 {
        (max + max / 10).max(10) + 1
    }

    fn encode_png(buffer: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        let img = RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer(width, height))?;
        let mut png = Cursor::new(Vec::new());
        img.write_to(&mut png, ImageFormat::Png)?;
        Ok(png.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_y_top_leaves_headroom() {
        assert_eq!(StaticChartRenderer::y_top(0), 11);
        assert_eq!(StaticChartRenderer::y_top(200), 221);
    }

    #[test]
    fn test_encode_png_rejects_short_buffer() {
        assert!(matches!(
            StaticChartRenderer::encode_png(vec![0u8; 10], 4, 4),
            Err(RenderError::Buffer(4, 4))
        ));
    }

    #[test]
    fn test_encode_png_writes_signature() {
        let png = StaticChartRenderer::encode_png(vec![255u8; 4 * 4 * 3], 4, 4).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
