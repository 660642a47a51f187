use crate::geometry::Point;
use crate::layout::AnnularSection;
use crate::render::{RenderError, Surface};
use crate::text::{TextMeasure, TextPlacement};
use cairo::{Context, Format, ImageSurface, SvgSurface};
use palette::Srgba;
use std::f64::consts::TAU;
use std::path::Path;

const FONT_FAMILY: &str = "Sans";
const FALLBACK_ADVANCE: f64 = 0.6;

/// Width guess for text cairo could not measure.
fn estimated_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * FALLBACK_ADVANCE
}

enum Target {
    Raster(ImageSurface),
    Vector(SvgSurface),
}

/// Cairo backed surface, either an in-memory image or an SVG file.
pub struct CairoSurface {
    context: Context,
    target: Target,
}

impl CairoSurface {
    pub fn raster(size: i32) -> Result<Self, RenderError> {
        let surface = ImageSurface::create(Format::ARgb32, size, size)?;
        let context = Context::new(&surface)?;
        Ok(Self {
            context,
            target: Target::Raster(surface),
        })
    }

    pub fn svg(size: f64, path: &Path) -> Result<Self, RenderError> {
        let surface = SvgSurface::new(size, size, Some(path))?;
        let context = Context::new(&surface)?;
        Ok(Self {
            context,
            target: Target::Vector(surface),
        })
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn write_png(&self, path: &Path) -> Result<(), RenderError> {
        let Target::Raster(surface) = &self.target else {
            return Err(RenderError::NotRaster);
        };
        surface.flush();
        let mut file = fs_err::File::create(path)?;
        surface.write_to_png(&mut file)?;
        Ok(())
    }

    /// Flushes vector output to disk. Raster surfaces only need [`Self::write_png`].
    pub fn finish(self) -> Result<(), RenderError> {
        self.context.status()?;
        if let Target::Vector(surface) = &self.target {
            surface.finish();
            surface.status()?;
        }
        Ok(())
    }

    fn set_color(&self, color: Srgba<f64>) {
        let (r, g, b, a) = color.into_components();
        self.context.set_source_rgba(r, g, b, a);
    }

    fn set_font(&self, font_size: f64) {
        self.context.select_font_face(
            FONT_FAMILY,
            cairo::FontSlant::Normal,
            cairo::FontWeight::Bold,
        );
        self.context.set_font_size(font_size);
    }
}

impl TextMeasure for CairoSurface {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        self.set_font(font_size);
        self.context
            .text_extents(text)
            .map(|ext| ext.x_advance())
            .inspect_err(|e| log::warn!("Failed to measure {:?}, estimating width: {}", text, e))
            .unwrap_or_else(|_| estimated_width(text, font_size))
    }
}

impl Surface for CairoSurface {
    fn fill_background(&mut self, color: Srgba<f64>) -> Result<(), RenderError> {
        self.set_color(color);
        self.context.paint()?;
        Ok(())
    }

    fn fill_sector(
        &mut self,
        center: Point,
        section: &AnnularSection,
        color: Srgba<f64>,
    ) -> Result<(), RenderError> {
        let cr = &self.context;
        cr.new_path();
        if section.span() >= TAU {
            cr.arc(center.x, center.y, section.outer_radius, 0.0, TAU);
            cr.new_sub_path();
            cr.arc_negative(center.x, center.y, section.inner_radius, TAU, 0.0);
        } else {
            cr.arc(
                center.x,
                center.y,
                section.outer_radius,
                section.start_angle,
                section.end_angle,
            );
            cr.arc_negative(
                center.x,
                center.y,
                section.inner_radius,
                section.end_angle,
                section.start_angle,
            );
        }
        cr.close_path();
        self.set_color(color);
        self.context.fill()?;
        Ok(())
    }

    fn fill_circle(
        &mut self,
        center: Point,
        radius: f64,
        color: Srgba<f64>,
    ) -> Result<(), RenderError> {
        self.context.new_path();
        self.context.arc(center.x, center.y, radius, 0.0, TAU);
        self.set_color(color);
        self.context.fill()?;
        Ok(())
    }

    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f64,
        line_width: f64,
        color: Srgba<f64>,
        dash: Option<[f64; 2]>,
    ) -> Result<(), RenderError> {
        let cr = &self.context;
        cr.save()?;
        cr.new_path();
        cr.arc(center.x, center.y, radius, 0.0, TAU);
        cr.set_line_width(line_width);
        if let Some(pattern) = dash {
            cr.set_dash(&pattern, 0.0);
        }
        self.set_color(color);
        cr.stroke()?;
        cr.restore()?;
        Ok(())
    }

    fn draw_text(&mut self, placement: &TextPlacement, color: Srgba<f64>) -> Result<(), RenderError> {
        let cr = &self.context;
        self.set_font(placement.font_size);
        let ext = cr.text_extents(&placement.text)?;

        cr.save()?;
        cr.translate(placement.position.x, placement.position.y);
        cr.rotate(placement.angle);
        cr.move_to(
            -(ext.x_bearing() + ext.width() / 2.0),
            -(ext.y_bearing() + ext.height() / 2.0),
        );
        self.set_color(color);
        cr.show_text(&placement.text)?;
        cr.restore()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width_grows_with_text_and_size() {
        let surface = CairoSurface::raster(200).unwrap();
        let cases = vec![("Q1", "Q1 campaign", 12.0), ("Mars", "Mars 2025", 20.0)];

        for (short, long, font_size) in cases {
            let narrow = surface.text_width(short, font_size);
            assert!(narrow > 0.0, "{}", short);
            assert!(surface.text_width(long, font_size) > narrow, "{}", long);
            assert!(surface.text_width(short, font_size * 2.0) > narrow, "{}", short);
        }
    }

    #[test]
    fn test_estimated_width() {
        let cases = vec![("", 12.0, 0.0), ("abc", 10.0, 18.0), ("Mars", 20.0, 48.0)];

        for (text, font_size, expected) in cases {
            assert!((estimated_width(text, font_size) - expected).abs() < 1e-9, "{}", text);
        }
    }
}
