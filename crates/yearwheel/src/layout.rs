use crate::cache::RenderSetCache;
use crate::color::HexColor;
use crate::geometry::constants::{DEFAULT_INIT_ANGLE_DEG, DEFAULT_ITEM_SPACING_DEG, MIN_ITEM_SPAN_DEG};
use crate::geometry::{GeometryConstants, MonthLocale, Point, Proportion, YearCalendar};
use crate::interaction::ItemRegion;
use crate::model::{Item, ItemId, Orientation, Ring, RingId, RingType};
use std::f64::consts::TAU;

const MONTH_CELL_SPACING_DEG: f64 = 0.5;
const RING_CELL_SPACING_DEG: f64 = 0.4;
// share of the remaining radial budget taken by each ring but the last
const RING_BUDGET_BIAS: f64 = 1.1;

pub const DEFAULT_PALETTE: [HexColor; 4] = [
    HexColor::rgb(0xF5, 0xE6, 0xD3),
    HexColor::rgb(0xA8, 0xDC, 0xD1),
    HexColor::rgb(0xF4, 0xA8, 0x96),
    HexColor::rgb(0xB8, 0xD4, 0xE8),
];

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub year: i32,
    pub init_angle_deg: f64,
    pub item_spacing_deg: f64,
    pub min_item_span_deg: f64,
    pub show_month_ring: bool,
    pub show_week_ring: bool,
    pub show_ring_names: bool,
    pub month_locale: MonthLocale,
    pub palette: Vec<HexColor>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            year: 2025,
            init_angle_deg: DEFAULT_INIT_ANGLE_DEG,
            item_spacing_deg: DEFAULT_ITEM_SPACING_DEG,
            min_item_span_deg: MIN_ITEM_SPAN_DEG,
            show_month_ring: true,
            show_week_ring: true,
            show_ring_names: true,
            month_locale: MonthLocale::default(),
            palette: DEFAULT_PALETTE.to_vec(),
        }
    }
}

impl LayoutOptions {
    pub fn calendar(&self) -> YearCalendar {
        YearCalendar::new(self.year, self.init_angle_deg)
    }

    fn palette_color(&self, index: usize) -> HexColor {
        match self.palette.len() {
            0 => DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()],
            len => self.palette[index % len],
        }
    }
}

/// A polar rectangle. Angles are radians in the unrotated wheel frame with
/// `start_angle <= end_angle`; either may lie outside `[0, 2π)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnularSection {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl AnnularSection {
    pub fn full_ring(inner_radius: f64, outer_radius: f64) -> Self {
        Self {
            inner_radius,
            outer_radius,
            start_angle: 0.0,
            end_angle: TAU,
        }
    }

    pub fn from_degrees(inner_radius: f64, outer_radius: f64, start_deg: f64, end_deg: f64) -> Self {
        Self {
            inner_radius,
            outer_radius,
            start_angle: start_deg.to_radians(),
            end_angle: end_deg.to_radians(),
        }
    }

    pub fn width(&self) -> f64 {
        self.outer_radius - self.inner_radius
    }

    pub fn mid_radius(&self) -> f64 {
        (self.inner_radius + self.outer_radius) / 2.0
    }

    pub fn span(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }

    pub fn arc_length_at(&self, radius: f64) -> f64 {
        radius * self.span()
    }

    pub fn mid_arc_length(&self) -> f64 {
        self.arc_length_at(self.mid_radius())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BandCell {
    pub section: AnnularSection,
    pub text: String,
    /// `None` leaves the fill to the theme.
    pub color: Option<HexColor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandKind {
    Month,
    Week,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecorativeBand {
    pub kind: BandKind,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub cells: Vec<BandCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RingBand {
    pub ring_id: RingId,
    pub name: String,
    pub kind: RingType,
    pub orientation: Orientation,
    pub inner_radius: f64,
    pub outer_radius: f64,
    /// Outer edge of the item area, below the name band when there is one.
    pub content_outer_radius: f64,
    pub name_band: Option<AnnularSection>,
    pub cells: Vec<BandCell>,
    pub track_count: usize,
}

impl RingBand {
    pub fn contains_radius(&self, radius: f64) -> bool {
        radius >= self.inner_radius && radius <= self.outer_radius
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemSection {
    pub item_id: ItemId,
    pub ring_id: RingId,
    pub name: String,
    pub color: HexColor,
    pub track: usize,
    pub section: AnnularSection,
}

impl ItemSection {
    pub fn region(&self) -> ItemRegion {
        ItemRegion {
            item_id: self.item_id.clone(),
            ring_id: self.ring_id.clone(),
            start_radius: self.section.inner_radius,
            end_radius: self.section.outer_radius,
            start_angle: self.section.start_angle,
            end_angle: self.section.end_angle,
        }
    }
}

/// Geometry of one paint: every band and item section of the wheel.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionPlan {
    pub size: f64,
    pub center: Point,
    pub year: i32,
    pub min_radius: f64,
    pub max_radius: f64,
    pub ring_bands: Vec<RingBand>,
    pub outer_bands: Vec<RingBand>,
    pub week_band: Option<DecorativeBand>,
    pub month_band: Option<DecorativeBand>,
    pub items: Vec<ItemSection>,
}

impl SectionPlan {
    /// Clickable regions, narrowest spans first so short items win over long ones.
    pub fn item_regions(&self) -> Vec<ItemRegion> {
        let mut sections: Vec<&ItemSection> = self.items.iter().collect();
        sections.sort_by(|a, b| a.section.span().total_cmp(&b.section.span()));
        sections.into_iter().map(ItemSection::region).collect()
    }

    pub fn ring_band_at(&self, radius: f64) -> Option<&RingBand> {
        self.ring_bands
            .iter()
            .chain(&self.outer_bands)
            .find(|band| band.contains_radius(radius))
    }

    pub fn band_for_ring(&self, ring_id: &RingId) -> Option<&RingBand> {
        self.ring_bands
            .iter()
            .chain(&self.outer_bands)
            .find(|band| &band.ring_id == ring_id)
    }

    pub fn item_section(&self, item_id: &ItemId) -> Option<&ItemSection> {
        self.items.iter().find(|s| &s.item_id == item_id)
    }
}

/// Splits `total` radial units starting at `start` into `count` bands separated by `gap`.
///
/// Each band takes `1.1 / (count - i)` of what is left, the last one takes the rest, so
/// the widths plus the gaps always add up to `total`.
pub fn allocate_radial_budget(start: f64, total: f64, count: usize, gap: f64) -> Vec<(f64, f64)> {
    if count == 0 {
        return Vec::new();
    }

    let mut remaining = (total - gap * (count - 1) as f64).max(0.0);
    let mut cursor = start;
    let mut bands = Vec::with_capacity(count);
    for i in 0..count {
        let width = if i == count - 1 {
            remaining
        } else {
            remaining * (1.0 / (count - i) as f64) * RING_BUDGET_BIAS
        };
        remaining -= width;
        bands.push((cursor, cursor + width));
        cursor += width + gap;
    }
    bands
}

/// Greedy lane assignment over `(start, end)` spans. Returns the lane of each span, in
/// input order, and the number of lanes used.
fn assign_tracks(spans: &[(f64, f64)]) -> (Vec<usize>, usize) {
    let mut order: Vec<usize> = (0..spans.len()).collect();
    order.sort_by(|&a, &b| {
        spans[a]
            .0
            .total_cmp(&spans[b].0)
            .then(spans[a].1.total_cmp(&spans[b].1))
    });

    let mut lane_ends: Vec<f64> = Vec::new();
    let mut tracks = vec![0; spans.len()];
    for index in order {
        let (start, end) = spans[index];
        let lane = match lane_ends.iter().position(|&lane_end| lane_end <= start) {
            Some(lane) => lane,
            None => {
                lane_ends.push(f64::NEG_INFINITY);
                lane_ends.len() - 1
            }
        };
        lane_ends[lane] = end;
        tracks[index] = lane;
    }
    (tracks, lane_ends.len())
}

pub struct RadialLayoutEngine<'a> {
    constants: &'a GeometryConstants,
    options: &'a LayoutOptions,
    calendar: YearCalendar,
}

impl<'a> RadialLayoutEngine<'a> {
    pub fn new(constants: &'a GeometryConstants, options: &'a LayoutOptions) -> Self {
        Self {
            constants,
            options,
            calendar: options.calendar(),
        }
    }

    pub fn layout(&self, cache: &RenderSetCache) -> SectionPlan {
        let c = self.constants;
        let gap = c.get(Proportion::StandardGap);
        let outer_rings = cache.visible_rings(Some(RingType::Outer));
        let inner_rings = cache.visible_rings(Some(RingType::Inner));

        let outer_width = c.get(Proportion::OuterRingWidth);
        let max_radius = c.size() / 2.0
            - c.get(Proportion::OuterPadding)
            - outer_rings.len() as f64 * (outer_width + gap);
        let min_radius = c.get(Proportion::MinRadius);

        let outer_bands: Vec<RingBand> = outer_rings
            .iter()
            .enumerate()
            .map(|(i, ring)| {
                let inner = max_radius + gap + i as f64 * (outer_width + gap);
                self.ring_band(ring, inner, inner + outer_width, inner_rings.len() + i)
            })
            .collect();

        let mut cursor = max_radius;
        let month_band = self.options.show_month_ring.then(|| {
            let band = self.month_band(cursor - c.get(Proportion::MonthRingWidth), cursor);
            cursor = band.inner_radius - gap;
            band
        });
        let week_band = self.options.show_week_ring.then(|| {
            let band = self.week_band(cursor - c.get(Proportion::WeekRingWidth), cursor);
            cursor = band.inner_radius - gap;
            band
        });

        let budget = (cursor - min_radius).max(0.0);
        let ring_bands: Vec<RingBand> = allocate_radial_budget(
            min_radius,
            budget,
            inner_rings.len(),
            c.get(Proportion::RingGap),
        )
        .into_iter()
        .zip(inner_rings.iter())
        .enumerate()
        .map(|(i, ((inner, outer), ring))| self.ring_band(ring, inner, outer, i))
        .collect();

        log::debug!(
            "Layout {}: {} inner and {} outer rings, data radius {:.1}..{:.1}",
            self.calendar.year(),
            ring_bands.len(),
            outer_bands.len(),
            min_radius,
            cursor
        );

        let mut plan = SectionPlan {
            size: c.size(),
            center: c.center(),
            year: self.calendar.year(),
            min_radius,
            max_radius,
            ring_bands,
            outer_bands,
            week_band,
            month_band,
            items: Vec::new(),
        };

        let mut items = Vec::new();
        for band in plan.ring_bands.iter_mut().chain(plan.outer_bands.iter_mut()) {
            let ring_items = cache.items_for_ring(&band.ring_id);
            items.extend(self.item_sections(cache, band, &ring_items));
        }
        plan.items = items;
        plan
    }

    fn ring_band(&self, ring: &Ring, inner: f64, outer: f64, index: usize) -> RingBand {
        let name_width = self.constants.get(Proportion::RingNameBand);
        let name_band = (self.options.show_ring_names && outer - inner > name_width * 2.0)
            .then(|| AnnularSection::full_ring(outer - name_width, outer));
        let content_outer = name_band.map_or(outer, |band| band.inner_radius);

        let color = ring.color.unwrap_or(self.options.palette_color(index));
        let cells = self
            .month_sections(inner, content_outer, RING_CELL_SPACING_DEG)
            .into_iter()
            .enumerate()
            .map(|(month, section)| BandCell {
                section,
                text: ring.month_text(month).to_string(),
                color: Some(color),
            })
            .collect();

        RingBand {
            ring_id: ring.id.clone(),
            name: ring.name.clone(),
            kind: ring.kind,
            orientation: ring.orientation.unwrap_or_default(),
            inner_radius: inner,
            outer_radius: outer,
            content_outer_radius: content_outer,
            name_band,
            cells,
            track_count: 0,
        }
    }

    fn month_sections(&self, inner: f64, outer: f64, spacing_deg: f64) -> Vec<AnnularSection> {
        let init = self.calendar.init_angle_deg();
        (0..12)
            .map(|month| {
                let start = init + month as f64 * 30.0;
                AnnularSection::from_degrees(
                    inner,
                    outer,
                    start + spacing_deg / 2.0,
                    start + 30.0 - spacing_deg / 2.0,
                )
            })
            .collect()
    }

    fn month_band(&self, inner: f64, outer: f64) -> DecorativeBand {
        let names = self.options.month_locale.month_names();
        let cells = self
            .month_sections(inner, outer, MONTH_CELL_SPACING_DEG)
            .into_iter()
            .zip(names)
            .map(|(section, name)| BandCell {
                section,
                text: name.to_string(),
                color: None,
            })
            .collect();

        DecorativeBand {
            kind: BandKind::Month,
            inner_radius: inner,
            outer_radius: outer,
            cells,
        }
    }

    fn week_band(&self, inner: f64, outer: f64) -> DecorativeBand {
        let cells = self
            .calendar
            .week_segments()
            .into_iter()
            .map(|week| BandCell {
                section: AnnularSection::from_degrees(
                    inner,
                    outer,
                    week.start_angle_deg,
                    week.end_angle_deg,
                ),
                text: week.week.to_string(),
                color: None,
            })
            .collect();

        DecorativeBand {
            kind: BandKind::Week,
            inner_radius: inner,
            outer_radius: outer,
            cells,
        }
    }

    /// Angular span of an item in degrees, or `None` when it lies outside the year.
    pub fn item_span_deg(&self, item: &Item) -> Option<(f64, f64)> {
        let calendar = &self.calendar;
        let (first, last) = if item.start_date <= item.end_date {
            (item.start_date, item.end_date)
        } else {
            (item.end_date, item.start_date)
        };
        if last < calendar.first_day() || first > calendar.last_day() {
            return None;
        }

        let spacing = self.options.item_spacing_deg;
        let mut start = calendar.date_to_angle(calendar.clamp(first)) + spacing;
        let mut end = calendar.date_end_angle(calendar.clamp(last)) - spacing;

        let min_span = self.options.min_item_span_deg;
        if end - start < min_span {
            let mid = (start + end) / 2.0;
            start = mid - min_span / 2.0;
            end = mid + min_span / 2.0;
        }
        Some((start, end))
    }

    fn item_sections(
        &self,
        cache: &RenderSetCache,
        band: &mut RingBand,
        items: &[Item],
    ) -> Vec<ItemSection> {
        let placed: Vec<(&Item, (f64, f64))> = items
            .iter()
            .filter_map(|item| self.item_span_deg(item).map(|span| (item, span)))
            .collect();
        if placed.is_empty() {
            return Vec::new();
        }

        let spans: Vec<(f64, f64)> = placed.iter().map(|(_, span)| *span).collect();
        let (tracks, track_count) = assign_tracks(&spans);
        band.track_count = track_count;

        let padding = self.constants.get(Proportion::ItemPadding);
        let (inner, outer) = if band.content_outer_radius - band.inner_radius > padding * 4.0 {
            (band.inner_radius + padding, band.content_outer_radius - padding)
        } else {
            (band.inner_radius, band.content_outer_radius)
        };
        let track_gap = self.constants.get(Proportion::TrackGap);
        let track_height =
            ((outer - inner - track_gap * (track_count - 1) as f64) / track_count as f64).max(0.0);

        placed
            .into_iter()
            .zip(tracks)
            .map(|((item, (start, end)), track)| {
                let track_inner = inner + track as f64 * (track_height + track_gap);
                let color = cache
                    .activity_group_by_id(&item.activity_id)
                    .map(|group| group.color)
                    .unwrap_or(self.options.palette_color(0));
                ItemSection {
                    item_id: item.id.clone(),
                    ring_id: band.ring_id.clone(),
                    name: item.name.clone(),
                    color,
                    track,
                    section: AnnularSection::from_degrees(
                        track_inner,
                        track_inner + track_height,
                        start,
                        end,
                    ),
                }
            })
            .collect()
    }
}
