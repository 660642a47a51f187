use crate::geometry::constants::{
    FONT_SEARCH_ITERATIONS, MAX_FONT_DISPLAY, MIN_FONT_DISPLAY, TRUNCATION_SUFFIX,
};
use crate::geometry::{GeometryConstants, Point, Polar, normalize_radians, polar_to_cartesian};
use crate::layout::AnnularSection;
use crate::model::Orientation;
use std::f64::consts::{FRAC_PI_2, PI};

// Share of the section's extent text may use
const TEXT_FILL_RATIO: f64 = 0.85;
const CROSS_FILL_RATIO: f64 = 0.8;

pub trait TextMeasure {
    fn text_width(&self, text: &str, font_size: f64) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextOrientation {
    /// Along the arc.
    #[default]
    Tangential,
    /// Along the radius, reading outwards.
    Radial,
}

impl From<Orientation> for TextOrientation {
    fn from(value: Orientation) -> Self {
        match value {
            Orientation::Horizontal => Self::Tangential,
            Orientation::Vertical => Self::Radial,
        }
    }
}

/// Whether text sits on the section fill or next to it on the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTone {
    OnFill,
    OnBackground,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextPlacement {
    pub text: String,
    pub position: Point,
    /// Canvas rotation of the baseline.
    pub angle: f64,
    pub font_size: f64,
    /// Turned half a revolution to keep the text upright.
    pub rotated: bool,
    pub truncated: bool,
    pub tone: TextTone,
    pub orientation: TextOrientation,
}

#[derive(Debug, Clone)]
pub struct TextFitter<'a> {
    constants: &'a GeometryConstants,
    center: Point,
    zoom_percent: f64,
    rotation: f64,
}

impl<'a> TextFitter<'a> {
    pub fn new(constants: &'a GeometryConstants, zoom_percent: f64, rotation: f64) -> Self {
        Self {
            constants,
            center: constants.center(),
            zoom_percent: if zoom_percent > 0.0 { zoom_percent } else { 100.0 },
            rotation,
        }
    }

    fn zoom_factor(&self) -> f64 {
        self.zoom_percent / 100.0
    }

    /// Fits `text` into `section`. Returns `None` for empty text or sections too small to
    /// carry legible text at the current zoom.
    pub fn place<M: TextMeasure + ?Sized>(
        &self,
        measure: &M,
        text: &str,
        section: &AnnularSection,
        orientation: TextOrientation,
        font_hint: f64,
    ) -> Option<TextPlacement> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let arc = section.mid_arc_length();
        let height = section.width();
        let zoom = self.zoom_factor();
        if arc < self.constants.arc_threshold() / zoom
            || height < self.constants.radial_threshold() / zoom
        {
            return None;
        }

        let (along, across) = match orientation {
            TextOrientation::Tangential => (arc, height),
            TextOrientation::Radial => (height, arc),
        };
        let available = along * TEXT_FILL_RATIO;
        let upper = font_hint
            .min(across * CROSS_FILL_RATIO)
            .clamp(MIN_FONT_DISPLAY, MAX_FONT_DISPLAY);

        let fits = |size: f64| measure.text_width(text, size) <= available;

        if fits(upper) {
            return Some(self.placement(section, orientation, text.to_string(), upper, false));
        }

        if !fits(MIN_FONT_DISPLAY) {
            let truncated = truncate_to_fit(measure, text, MIN_FONT_DISPLAY, available);
            return Some(self.placement(section, orientation, truncated, MIN_FONT_DISPLAY, true));
        }

        // lo always fits, hi never does
        let (mut lo, mut hi) = (MIN_FONT_DISPLAY, upper);
        for _ in 0..FONT_SEARCH_ITERATIONS {
            let mid = (lo + hi) / 2.0;
            if fits(mid) {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Some(self.placement(section, orientation, text.to_string(), lo, false))
    }

    fn placement(
        &self,
        section: &AnnularSection,
        orientation: TextOrientation,
        text: String,
        font_size: f64,
        truncated: bool,
    ) -> TextPlacement {
        let theta = normalize_radians(section.mid_angle() + self.rotation);
        let position = polar_to_cartesian(
            self.center,
            Polar {
                radius: section.mid_radius(),
                angle: theta,
            },
        );
        let (angle, rotated) = upright_angle(theta, orientation);

        TextPlacement {
            text,
            position,
            angle,
            font_size,
            rotated,
            truncated,
            tone: TextTone::OnFill,
            orientation,
        }
    }
}

/// Baseline rotation for text centred at canvas angle `theta`, and whether it had to be
/// flipped to stay readable.
pub fn upright_angle(theta: f64, orientation: TextOrientation) -> (f64, bool) {
    match orientation {
        // lower half reads along the clockwise tangent turned around
        TextOrientation::Tangential if theta > 0.0 && theta < PI => (theta - FRAC_PI_2, true),
        TextOrientation::Tangential => (theta + FRAC_PI_2, false),
        TextOrientation::Radial if theta > FRAC_PI_2 && theta < 3.0 * FRAC_PI_2 => (theta + PI, true),
        TextOrientation::Radial => (theta, false),
    }
}

fn truncate_to_fit<M: TextMeasure + ?Sized>(
    measure: &M,
    text: &str,
    font_size: f64,
    available: f64,
) -> String {
    let chars: Vec<char> = text.chars().collect();
    (1..chars.len())
        .rev()
        .map(|len| {
            let prefix: String = chars[..len].iter().collect();
            format!("{}{}", prefix.trim_end(), TRUNCATION_SUFFIX)
        })
        .find(|candidate| measure.text_width(candidate, font_size) <= available)
        .unwrap_or_else(|| TRUNCATION_SUFFIX.to_string())
}
