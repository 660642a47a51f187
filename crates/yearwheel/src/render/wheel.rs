use crate::color::HexColor;
use crate::geometry::{GeometryConstants, Point, Proportion};
use crate::interaction::{DragPreview, ItemRegion};
use crate::layout::{AnnularSection, BandKind, DecorativeBand, ItemSection, RingBand, SectionPlan};
use crate::model::{ItemId, RingType};
use crate::render::theme::ThemeColors;
use crate::render::{RenderError, Surface};
use crate::text::{TextFitter, TextOrientation, TextPlacement, TextTone};
use palette::Srgba;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_3};

/// Per-paint state that does not belong to the layout.
#[derive(Debug, Clone, Copy)]
pub struct RenderView<'a> {
    pub zoom_percent: f64,
    pub rotation: f64,
    pub hovered: Option<&'a ItemId>,
    pub drag_preview: Option<&'a DragPreview>,
    pub title: Option<&'a str>,
    pub show_item_labels: bool,
}

impl Default for RenderView<'_> {
    fn default() -> Self {
        Self {
            zoom_percent: 100.0,
            rotation: 0.0,
            hovered: None,
            drag_preview: None,
            title: None,
            show_item_labels: true,
        }
    }
}

fn rotated(section: &AnnularSection, rotation: f64) -> AnnularSection {
    AnnularSection {
        start_angle: section.start_angle + rotation,
        end_angle: section.end_angle + rotation,
        ..*section
    }
}

pub struct WheelRenderer<'a> {
    constants: &'a GeometryConstants,
    theme: &'a ThemeColors,
}

impl<'a> WheelRenderer<'a> {
    pub fn new(constants: &'a GeometryConstants, theme: &'a ThemeColors) -> Self {
        Self { constants, theme }
    }

    /// Paints the whole wheel and returns the clickable regions of this paint.
    pub fn render<S: Surface + ?Sized>(
        &self,
        plan: &SectionPlan,
        view: &RenderView<'_>,
        surface: &mut S,
    ) -> Result<Vec<ItemRegion>, RenderError> {
        let fitter = TextFitter::new(self.constants, view.zoom_percent, view.rotation);

        surface.fill_background(self.theme.background)?;

        for band in plan.ring_bands.iter().chain(&plan.outer_bands) {
            self.draw_ring_band(plan, band, view, &fitter, surface)?;
        }
        for section in &plan.items {
            self.draw_item(plan, section, view, &fitter, surface)?;
        }
        if let Some(preview) = view.drag_preview {
            self.draw_drag_preview(plan, preview, view, surface)?;
        }
        for band in plan.ring_bands.iter().chain(&plan.outer_bands) {
            self.draw_ring_name(plan, band, view, &fitter, surface)?;
        }
        for band in [&plan.week_band, &plan.month_band].into_iter().flatten() {
            self.draw_decorative_band(plan, band, view, &fitter, surface)?;
        }
        self.draw_center(plan, view, surface)?;

        let regions = plan.item_regions();
        log::debug!("Painted {} items", regions.len());
        Ok(regions)
    }

    fn font(&self, proportion: Proportion, view: &RenderView<'_>) -> f64 {
        self.constants.font_size(proportion, view.zoom_percent)
    }

    fn text_color(&self, placement: &TextPlacement, fill: Option<HexColor>) -> Srgba<f64> {
        match (placement.tone, fill) {
            (TextTone::OnFill, Some(fill)) => fill.contrast_text().opaque(),
            _ => self.theme.text_default,
        }
    }

    fn draw_ring_band<S: Surface + ?Sized>(
        &self,
        plan: &SectionPlan,
        band: &RingBand,
        view: &RenderView<'_>,
        fitter: &TextFitter<'_>,
        surface: &mut S,
    ) -> Result<(), RenderError> {
        let alpha = match band.kind {
            RingType::Inner => self.theme.inner_cell_alpha,
            RingType::Outer => 1.0,
        };
        let orientation = TextOrientation::from(band.orientation);
        let font_hint = self.font(Proportion::FontSmall, view);

        for cell in &band.cells {
            let Some(color) = cell.color else { continue };
            let fill = color.with_alpha(alpha);
            surface.fill_sector(plan.center, &rotated(&cell.section, view.rotation), fill)?;

            // inner ring text would sit under the items
            if band.kind == RingType::Inner && band.track_count > 0 {
                continue;
            }
            if let Some(placement) = fitter.place(
                &*surface,
                &cell.text,
                &cell.section,
                orientation,
                font_hint,
            ) {
                // faint inner cells read like the background
                let text_fill = (band.kind == RingType::Outer).then_some(color);
                surface.draw_text(&placement, self.text_color(&placement, text_fill))?;
            }
        }
        Ok(())
    }

    fn draw_item<S: Surface + ?Sized>(
        &self,
        plan: &SectionPlan,
        item: &ItemSection,
        view: &RenderView<'_>,
        fitter: &TextFitter<'_>,
        surface: &mut S,
    ) -> Result<(), RenderError> {
        let dragged = view
            .drag_preview
            .is_some_and(|preview| preview.item_id == item.item_id);
        let hovered = view.hovered == Some(&item.item_id);

        let color = if hovered && !dragged {
            item.color.hover()
        } else {
            item.color
        };
        let fill = color.with_alpha(if dragged { self.theme.ghost_alpha } else { 1.0 });
        surface.fill_sector(plan.center, &rotated(&item.section, view.rotation), fill)?;

        if !view.show_item_labels || dragged {
            return Ok(());
        }
        let orientation = plan
            .band_for_ring(&item.ring_id)
            .map(|band| TextOrientation::from(band.orientation))
            .unwrap_or_default();
        if let Some(placement) = fitter.place(
            &*surface,
            &item.name,
            &item.section,
            orientation,
            self.font(Proportion::FontBase, view),
        ) {
            surface.draw_text(&placement, self.text_color(&placement, Some(color)))?;
        }
        Ok(())
    }

    fn draw_drag_preview<S: Surface + ?Sized>(
        &self,
        plan: &SectionPlan,
        preview: &DragPreview,
        view: &RenderView<'_>,
        surface: &mut S,
    ) -> Result<(), RenderError> {
        let Some(item) = plan.item_section(&preview.item_id) else {
            return Ok(());
        };
        // a ring switch draws the ghost across the target ring's item area
        let (inner, outer) = match plan.band_for_ring(&preview.ring_id) {
            Some(band) if band.ring_id != item.ring_id => {
                (band.inner_radius, band.content_outer_radius)
            }
            _ => (item.section.inner_radius, item.section.outer_radius),
        };
        let section = AnnularSection {
            inner_radius: inner,
            outer_radius: outer,
            start_angle: preview.start_angle,
            end_angle: preview.end_angle,
        };
        surface.fill_sector(
            plan.center,
            &rotated(&section, view.rotation),
            item.color.opaque(),
        )
    }

    fn draw_ring_name<S: Surface + ?Sized>(
        &self,
        plan: &SectionPlan,
        band: &RingBand,
        view: &RenderView<'_>,
        fitter: &TextFitter<'_>,
        surface: &mut S,
    ) -> Result<(), RenderError> {
        let Some(name_band) = band.name_band else {
            return Ok(());
        };
        surface.fill_sector(
            plan.center,
            &rotated(&name_band, view.rotation),
            self.theme.ring_name_bg,
        )?;

        // the name reads across the top of the wheel whatever the rotation
        let top = -FRAC_PI_2 - view.rotation;
        let label = AnnularSection {
            start_angle: top - FRAC_PI_3 / 2.0,
            end_angle: top + FRAC_PI_3 / 2.0,
            ..name_band
        };
        if let Some(placement) = fitter.place(
            &*surface,
            &band.name,
            &label,
            TextOrientation::Tangential,
            self.font(Proportion::FontTiny, view),
        ) {
            surface.draw_text(&placement, self.theme.ring_name_text)?;
        }
        Ok(())
    }

    fn draw_decorative_band<S: Surface + ?Sized>(
        &self,
        plan: &SectionPlan,
        band: &DecorativeBand,
        view: &RenderView<'_>,
        fitter: &TextFitter<'_>,
        surface: &mut S,
    ) -> Result<(), RenderError> {
        let font_hint = match band.kind {
            BandKind::Month => self.font(Proportion::FontMonth, view),
            BandKind::Week => self.font(Proportion::FontWeek, view),
        };

        for (index, cell) in band.cells.iter().enumerate() {
            let (fill, text) = match band.kind {
                BandKind::Month => (self.theme.month_fill(index), self.theme.month_text),
                BandKind::Week => (self.theme.week_ring, self.theme.week_text),
            };
            let fill = cell.color.map_or(fill, |c| c.opaque());
            surface.fill_sector(plan.center, &rotated(&cell.section, view.rotation), fill)?;

            if let Some(placement) = fitter.place(
                &*surface,
                &cell.text,
                &cell.section,
                TextOrientation::Tangential,
                font_hint,
            ) {
                surface.draw_text(&placement, text)?;
            }
        }
        Ok(())
    }

    fn draw_center<S: Surface + ?Sized>(
        &self,
        plan: &SectionPlan,
        view: &RenderView<'_>,
        surface: &mut S,
    ) -> Result<(), RenderError> {
        surface.fill_circle(plan.center, plan.min_radius, self.theme.center_circle)?;
        surface.stroke_circle(
            plan.center,
            plan.min_radius,
            self.constants.get(Proportion::LineThin),
            self.theme.outline,
            Some(self.constants.dash_pattern()),
        )?;

        let year_size = self.font(Proportion::FontYear, view);
        let centered = |text: String, font_size: f64, dy: f64| TextPlacement {
            text,
            position: Point::new(plan.center.x, plan.center.y + dy),
            angle: 0.0,
            font_size,
            rotated: false,
            truncated: false,
            tone: TextTone::OnBackground,
            orientation: TextOrientation::Tangential,
        };

        surface.draw_text(
            &centered(plan.year.to_string(), year_size, 0.0),
            self.theme.text_default,
        )?;
        if let Some(title) = view.title.filter(|t| !t.trim().is_empty()) {
            let title_size = self.font(Proportion::FontTitle, view);
            surface.draw_text(
                &centered(title.trim().to_string(), title_size, -(year_size + title_size) / 2.0),
                self.theme.text_default,
            )?;
        }
        Ok(())
    }
}
