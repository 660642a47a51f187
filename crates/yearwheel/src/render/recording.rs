use crate::geometry::{Point, Polar, polar_to_cartesian};
use crate::layout::AnnularSection;
use crate::render::{RenderError, Surface};
use crate::text::{TextMeasure, TextPlacement};
use palette::Srgba;
use std::f64::consts::{PI, TAU};
use std::fmt;

// Average glyph advance relative to the font size
const GLYPH_ADVANCE: f64 = 0.6;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Background(Srgba<f64>),
    Sector {
        center: Point,
        section: AnnularSection,
        color: Srgba<f64>,
    },
    FillCircle {
        center: Point,
        radius: f64,
        color: Srgba<f64>,
    },
    StrokeCircle {
        center: Point,
        radius: f64,
        line_width: f64,
        color: Srgba<f64>,
        dash: Option<[f64; 2]>,
    },
    Text {
        placement: TextPlacement,
        color: Srgba<f64>,
    },
}

/// Keeps every drawing call in order. Text is measured with a fixed glyph advance so
/// results do not depend on installed fonts.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    size: f64,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(size: f64) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextPlacement> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { placement, .. } => Some(placement),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Replays the recording as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        SvgDocument(self).to_string()
    }

    pub fn write_svg<W: fmt::Write>(&self, svg: &mut W) -> fmt::Result {
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{0}" height="{0}" viewBox="0 0 {0} {0}">"#,
            self.size
        )?;
        for command in &self.commands {
            write_command(svg, command)?;
        }
        writeln!(svg, "</svg>")
    }
}

fn write_command<W: fmt::Write>(svg: &mut W, command: &DrawCommand) -> fmt::Result {
    match command {
        DrawCommand::Background(color) => writeln!(
            svg,
            r#"<rect width="100%" height="100%" fill="{}"/>"#,
            css_color(*color)
        ),
        DrawCommand::Sector {
            center,
            section,
            color,
        } => writeln!(
            svg,
            r#"<path d="{}" fill="{}" fill-rule="evenodd"/>"#,
            sector_path(*center, section),
            css_color(*color)
        ),
        DrawCommand::FillCircle {
            center,
            radius,
            color,
        } => writeln!(
            svg,
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}"/>"#,
            center.x,
            center.y,
            radius,
            css_color(*color)
        ),
        DrawCommand::StrokeCircle {
            center,
            radius,
            line_width,
            color,
            dash,
        } => writeln!(
            svg,
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="none" stroke="{}" stroke-width="{:.2}"{}/>"#,
            center.x,
            center.y,
            radius,
            css_color(*color),
            line_width,
            dash.map(|[on, off]| format!(r#" stroke-dasharray="{:.2} {:.2}""#, on, off))
                .unwrap_or_default()
        ),
        DrawCommand::Text { placement, color } => writeln!(
            svg,
            r#"<text x="{x:.2}" y="{y:.2}" font-size="{:.2}" font-family="sans-serif" font-weight="bold" text-anchor="middle" dominant-baseline="central" fill="{}" transform="rotate({:.3} {x:.2} {y:.2})">{}</text>"#,
            placement.font_size,
            css_color(*color),
            placement.angle * 180.0 / PI,
            escape(&placement.text),
            x = placement.position.x,
            y = placement.position.y,
        ),
    }
}

/// [`RecordingSurface::write_svg`] as a `Display` value.
pub struct SvgDocument<'a>(pub &'a RecordingSurface);

impl fmt::Display for SvgDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.write_svg(f)
    }
}

fn css_color(color: Srgba<f64>) -> String {
    let (r, g, b, a) = color.into_components();
    let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({},{},{},{:.3})",
        channel(r),
        channel(g),
        channel(b),
        a.clamp(0.0, 1.0)
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn sector_path(center: Point, section: &AnnularSection) -> String {
    let at = |radius: f64, angle: f64| polar_to_cartesian(center, Polar { radius, angle });
    let (ro, ri) = (section.outer_radius, section.inner_radius);

    if section.span() >= TAU {
        // two half circles each, SVG arcs cannot close on themselves
        let ring = |r: f64| {
            let (a, b) = (at(r, 0.0), at(r, PI));
            format!(
                "M{:.2},{:.2} A{r:.2},{r:.2} 0 1 1 {:.2},{:.2} A{r:.2},{r:.2} 0 1 1 {:.2},{:.2} Z",
                a.x, a.y, b.x, b.y, a.x, a.y
            )
        };
        return format!("{} {}", ring(ro), ring(ri));
    }

    let large = if section.span() > PI { 1 } else { 0 };
    let (os, oe) = (at(ro, section.start_angle), at(ro, section.end_angle));
    let (is, ie) = (at(ri, section.start_angle), at(ri, section.end_angle));
    format!(
        "M{:.2},{:.2} A{ro:.2},{ro:.2} 0 {large} 1 {:.2},{:.2} L{:.2},{:.2} A{ri:.2},{ri:.2} 0 {large} 0 {:.2},{:.2} Z",
        os.x, os.y, oe.x, oe.y, ie.x, ie.y, is.x, is.y
    )
}

impl TextMeasure for RecordingSurface {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * font_size * GLYPH_ADVANCE
    }
}

impl Surface for RecordingSurface {
    fn fill_background(&mut self, color: Srgba<f64>) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::Background(color));
        Ok(())
    }

    fn fill_sector(
        &mut self,
        center: Point,
        section: &AnnularSection,
        color: Srgba<f64>,
    ) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::Sector {
            center,
            section: *section,
            color,
        });
        Ok(())
    }

    fn fill_circle(
        &mut self,
        center: Point,
        radius: f64,
        color: Srgba<f64>,
    ) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
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
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            line_width,
            color,
            dash,
        });
        Ok(())
    }

    fn draw_text(&mut self, placement: &TextPlacement, color: Srgba<f64>) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::Text {
            placement: placement.clone(),
            color,
        });
        Ok(())
    }
}
