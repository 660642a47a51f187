use crate::geometry::Point;
use crate::layout::AnnularSection;
use crate::text::{TextMeasure, TextPlacement};
use palette::Srgba;
use thiserror::Error;

pub mod cairo_surface;
pub mod recording;
pub mod theme;
pub mod wheel;

pub use cairo_surface::CairoSurface;
pub use recording::{DrawCommand, RecordingSurface};
pub use theme::ThemeColors;
pub use wheel::{RenderView, WheelRenderer};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),
    #[error("Failed to write PNG: {0}")]
    Png(#[from] cairo::IoError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Surface has no raster output")]
    NotRaster,
}

/// A drawing target. Sections arrive in canvas angles, rotation already applied.
pub trait Surface: TextMeasure {
    fn fill_background(&mut self, color: Srgba<f64>) -> Result<(), RenderError>;

    fn fill_sector(
        &mut self,
        center: Point,
        section: &AnnularSection,
        color: Srgba<f64>,
    ) -> Result<(), RenderError>;

    fn fill_circle(&mut self, center: Point, radius: f64, color: Srgba<f64>)
    -> Result<(), RenderError>;

    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f64,
        line_width: f64,
        color: Srgba<f64>,
        dash: Option<[f64; 2]>,
    ) -> Result<(), RenderError>;

    /// Draws `placement.text` centred on `placement.position`, baseline turned by
    /// `placement.angle`.
    fn draw_text(&mut self, placement: &TextPlacement, color: Srgba<f64>) -> Result<(), RenderError>;
}
