use crate::geometry::Point;
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

pub const MIN_FONT_DISPLAY: f64 = 8.0;
pub const MAX_FONT_DISPLAY: f64 = 50.0;
pub const FONT_SEARCH_ITERATIONS: usize = 10;
pub const TRUNCATION_SUFFIX: &str = "…";

// Fractions of size below which a section gets no text
pub const MIN_ARC_THRESHOLD: f64 = 0.003;
pub const MIN_RADIAL_THRESHOLD: f64 = 0.002;

pub const CLICK_THRESHOLD_PX: f64 = 5.0;
pub const CLICK_TIMEOUT_MS: u64 = 300;
pub const DRAG_ZONE_PIXELS: f64 = 15.0;
pub const HOVER_THROTTLE_MS: u64 = 16;
pub const SUPPRESS_AFTER_DRAG_MS: u64 = 300;

pub const DEFAULT_INIT_ANGLE_DEG: f64 = -105.0;
pub const DEFAULT_ITEM_SPACING_DEG: f64 = 0.2;
pub const MIN_ITEM_SPAN_DEG: f64 = 3.0;
/// One week of the year, the smallest span a resize may leave behind.
pub const MIN_RESIZE_SPAN_DEG: f64 = (7.0 / 365.0) * 360.0;

/// Every size-relative measurement of the wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumCount)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Proportion {
    MinRadius,
    StandardGap,
    RingGap,
    OuterPadding,
    MonthRingWidth,
    WeekRingWidth,
    OuterRingWidth,
    RingNameBand,
    TrackGap,
    ItemPadding,
    FontBase,
    FontMonth,
    FontWeek,
    FontYear,
    FontTitle,
    FontSmall,
    FontTiny,
    FontDependency,
    LineThin,
    LineMedium,
    LineThick,
    DashLong,
    DashMedium,
    DashShort,
    ArrowSize,
    IconSize,
    CurveOffset,
}

impl Proportion {
    pub fn fraction(&self) -> f64 {
        match self {
            Self::MinRadius => 1.0 / 12.0,
            Self::StandardGap => 1.0 / 150.0,
            Self::RingGap => 1.0 / 300.0,
            Self::OuterPadding => 1.0 / 50.0,
            Self::MonthRingWidth => 1.0 / 25.0,
            Self::WeekRingWidth => 1.0 / 35.0,
            Self::OuterRingWidth => 1.0 / 23.0,
            Self::RingNameBand => 1.0 / 70.0,
            Self::TrackGap => 1.0 / 2000.0,
            Self::ItemPadding => 1.0 / 300.0,
            Self::FontBase => 1.0 / 75.0,
            Self::FontMonth => 1.0 / 40.0,
            Self::FontWeek => 1.0 / 70.0,
            Self::FontYear => 1.0 / 30.0,
            Self::FontTitle => 1.0 / 35.0,
            Self::FontSmall => 1.0 / 80.0,
            Self::FontTiny => 1.0 / 120.0,
            Self::FontDependency => 1.0 / 70.0,
            Self::LineThin => 1.0 / 400.0,
            Self::LineMedium => 1.0 / 200.0,
            Self::LineThick => 1.0 / 100.0,
            Self::DashLong => 1.0 / 150.0,
            Self::DashMedium => 1.0 / 200.0,
            Self::DashShort => 1.0 / 250.0,
            Self::ArrowSize => 1.0 / 100.0,
            Self::IconSize => 1.0 / 140.0,
            Self::CurveOffset => 1.0 / 20.0,
        }
    }
}

/// Measurements derived from the canvas size. Build one per render context and pass it
/// along instead of recomputing fractions at draw time.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryConstants {
    size: f64,
    values: [f64; Proportion::COUNT],
}

impl GeometryConstants {
    pub fn derive(size: f64) -> Self {
        let mut values = [0.0; Proportion::COUNT];
        for proportion in Proportion::iter() {
            values[proportion as usize] = size * proportion.fraction();
        }
        Self { size, values }
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn center(&self) -> Point {
        Point::new(self.size / 2.0, self.size / 2.0)
    }

    pub fn get(&self, proportion: Proportion) -> f64 {
        self.values[proportion as usize]
    }

    /// Font size for `proportion` at the given zoom, kept legible at every zoom level.
    pub fn font_size(&self, proportion: Proportion, zoom_percent: f64) -> f64 {
        let zoom = if zoom_percent > 0.0 { zoom_percent } else { 100.0 };
        (self.get(proportion) * 100.0 / zoom).clamp(MIN_FONT_DISPLAY, MAX_FONT_DISPLAY)
    }

    pub fn arc_threshold(&self) -> f64 {
        self.size * MIN_ARC_THRESHOLD
    }

    pub fn radial_threshold(&self) -> f64 {
        self.size * MIN_RADIAL_THRESHOLD
    }

    pub fn dash_pattern(&self) -> [f64; 2] {
        [self.get(Proportion::DashLong), self.get(Proportion::DashShort)]
    }
}
