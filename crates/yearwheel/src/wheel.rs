use crate::cache::RenderSetCache;
use crate::config::WheelConfig;
use crate::geometry::{GeometryConstants, YearCalendar};
use crate::interaction::{
    InteractionController, InteractionFrame, InteractionSink, ItemRegion, PointerEvent,
    PointerUpOutcome,
};
use crate::layout::{LayoutOptions, RadialLayoutEngine, SectionPlan};
use crate::model::{ItemId, WheelStructure};
use crate::render::{RenderError, RenderView, Surface, ThemeColors, WheelRenderer};

/// One wheel on one canvas: owns the cached structure, the current layout and the
/// pointer state, and keeps them in step.
pub struct YearWheel {
    config: WheelConfig,
    options: LayoutOptions,
    constants: GeometryConstants,
    theme: ThemeColors,
    cache: RenderSetCache,
    calendar: YearCalendar,
    plan: SectionPlan,
    regions: Vec<ItemRegion>,
    controller: InteractionController,
}

impl YearWheel {
    pub fn new(structure: WheelStructure, year: i32, size: f64, config: WheelConfig) -> Self {
        let options = config.layout_options(year);
        let constants = GeometryConstants::derive(size);
        let cache = RenderSetCache::new(structure);
        let plan = RadialLayoutEngine::new(&constants, &options).layout(&cache);
        let regions = plan.item_regions();

        Self {
            calendar: options.calendar(),
            controller: InteractionController::new(config.interaction),
            theme: ThemeColors::default(),
            config,
            options,
            constants,
            cache,
            plan,
            regions,
        }
    }

    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    pub fn structure(&self) -> &WheelStructure {
        self.cache.structure()
    }

    pub fn cache(&self) -> &RenderSetCache {
        &self.cache
    }

    pub fn calendar(&self) -> &YearCalendar {
        &self.calendar
    }

    pub fn plan(&self) -> &SectionPlan {
        &self.plan
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn set_theme(&mut self, theme: ThemeColors) {
        self.theme = theme;
    }

    /// Replaces the structure. Returns whether anything changed; the layout is only
    /// recomputed when it did.
    pub fn update_structure(&mut self, structure: WheelStructure) -> bool {
        let changed = self.cache.update_structure(structure);
        if changed {
            self.relayout();
        }
        changed
    }

    pub fn set_year(&mut self, year: i32) {
        self.options.year = year;
        self.calendar = self.options.calendar();
        self.relayout();
    }

    pub fn relayout(&mut self) {
        self.plan = RadialLayoutEngine::new(&self.constants, &self.options).layout(&self.cache);
        self.regions = self.plan.item_regions();
    }

    /// Paints the wheel with the current hover, drag preview and rotation.
    pub fn render<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        title: Option<&str>,
    ) -> Result<(), RenderError> {
        let view = RenderView {
            zoom_percent: self.config.zoom_percent(),
            rotation: self.controller.rotation(),
            hovered: self.controller.hovered(),
            drag_preview: self.controller.drag_preview(),
            title,
            show_item_labels: self.config.show_item_labels,
        };
        self.regions =
            WheelRenderer::new(&self.constants, &self.theme).render(&self.plan, &view, surface)?;
        Ok(())
    }

    /// Regions of the last paint in hit-test order.
    pub fn clickable_items(&self) -> &[ItemRegion] {
        &self.regions
    }

    pub fn pointer_down(&mut self, event: PointerEvent, sink: &mut dyn InteractionSink) {
        let frame = InteractionFrame {
            plan: &self.plan,
            regions: &self.regions,
            cache: &self.cache,
            calendar: &self.calendar,
        };
        self.controller.pointer_down(&frame, event, sink);
    }

    pub fn pointer_move(&mut self, event: PointerEvent, sink: &mut dyn InteractionSink) {
        let frame = InteractionFrame {
            plan: &self.plan,
            regions: &self.regions,
            cache: &self.cache,
            calendar: &self.calendar,
        };
        self.controller.pointer_move(&frame, event, sink);
    }

    pub fn pointer_up(
        &mut self,
        event: PointerEvent,
        sink: &mut dyn InteractionSink,
    ) -> PointerUpOutcome {
        let frame = InteractionFrame {
            plan: &self.plan,
            regions: &self.regions,
            cache: &self.cache,
            calendar: &self.calendar,
        };
        self.controller.pointer_up(&frame, event, sink)
    }

    pub fn click(&mut self, event: PointerEvent, sink: &mut dyn InteractionSink) -> Option<ItemId> {
        let frame = InteractionFrame {
            plan: &self.plan,
            regions: &self.regions,
            cache: &self.cache,
            calendar: &self.calendar,
        };
        self.controller.click(&frame, event, sink)
    }

    pub fn pointer_leave(&mut self, sink: &mut dyn InteractionSink) {
        self.controller.pointer_leave(sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::HexColor;
    use crate::geometry::{Polar, polar_to_cartesian};
    use crate::model::{ActivityGroup, Item, Ring, RingType};
    use crate::render::RecordingSurface;
    use chrono::NaiveDate;

    #[derive(Default)]
    struct Commits(Vec<Item>);

    impl InteractionSink for Commits {
        fn on_item_drag_committed(&mut self, proposed: &Item) {
            self.0.push(proposed.clone());
        }
    }

    fn structure() -> WheelStructure {
        WheelStructure {
            rings: vec![Ring {
                id: "r1".into(),
                name: "Campaigns".into(),
                kind: RingType::Inner,
                visible: true,
                orientation: None,
                color: None,
                data: Vec::new(),
            }],
            activity_groups: vec![ActivityGroup {
                id: "g1".into(),
                name: "Marketing".into(),
                color: HexColor::rgb(0x3b, 0x82, 0xf6),
                visible: true,
            }],
            labels: Vec::new(),
            items: vec![Item {
                id: "i1".into(),
                name: "Spring".into(),
                start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
                ring_id: "r1".into(),
                activity_id: "g1".into(),
                label_id: None,
                description: None,
                time: None,
            }],
        }
    }

    #[test]
    fn test_drag_commit_round_trip() {
        let mut wheel = YearWheel::new(structure(), 2025, 1000.0, WheelConfig::default());
        let mut surface = RecordingSurface::new(1000.0);
        wheel.render(&mut surface, None).unwrap();

        let region = wheel.clickable_items()[0].clone();
        let center = wheel.plan().center;
        let at = |angle: f64| {
            polar_to_cartesian(
                center,
                Polar {
                    radius: region.mid_radius(),
                    angle,
                },
            )
        };
        let mid = (region.start_angle + region.end_angle) / 2.0;
        let day = std::f64::consts::TAU / 365.0;

        let mut sink = Commits::default();
        let start = at(mid);
        let end = at(mid + 10.0 * day);
        wheel.pointer_down(PointerEvent::new(start.x, start.y, 0), &mut sink);
        wheel.pointer_move(PointerEvent::new(end.x, end.y, 50), &mut sink);
        assert!(wheel.controller().is_dragging());
        wheel.pointer_up(PointerEvent::new(end.x, end.y, 100), &mut sink);

        let proposed = sink.0.pop().unwrap();
        assert_eq!(proposed.start_date, NaiveDate::from_ymd_opt(2025, 3, 11).unwrap());

        let mut next = wheel.structure().clone();
        next.items[0] = proposed;
        assert!(wheel.update_structure(next.clone()));
        assert!(!wheel.update_structure(next));
        assert!(wheel.clickable_items()[0].start_angle > region.start_angle);
    }

    #[test]
    fn test_hidden_ring_removes_regions() {
        let mut wheel = YearWheel::new(structure(), 2025, 1000.0, WheelConfig::default());
        assert_eq!(wheel.clickable_items().len(), 1);

        let mut next = structure();
        next.rings[0].visible = false;
        wheel.update_structure(next);
        assert!(wheel.clickable_items().is_empty());
        assert!(wheel.plan().ring_bands.is_empty());
    }

    #[test]
    fn test_year_change_skips_items() {
        let mut wheel = YearWheel::new(structure(), 2025, 1000.0, WheelConfig::default());
        wheel.set_year(2026);
        assert_eq!(wheel.calendar().year(), 2026);
        assert!(wheel.clickable_items().is_empty());
    }
}
