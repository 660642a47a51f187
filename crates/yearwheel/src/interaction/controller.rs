use crate::cache::RenderSetCache;
use crate::geometry::constants::{
    CLICK_THRESHOLD_PX, CLICK_TIMEOUT_MS, DRAG_ZONE_PIXELS, HOVER_THROTTLE_MS,
    MIN_RESIZE_SPAN_DEG, SUPPRESS_AFTER_DRAG_MS,
};
use crate::geometry::{
    Point, Polar, YearCalendar, angle_difference, cartesian_to_polar, normalize_radians,
};
use crate::interaction::hit_test::{
    Cursor, DragMode, ItemRegion, detect_drag_zone, hit_test, to_wheel_polar,
};
use crate::layout::SectionPlan;
use crate::model::{Item, ItemId, RingId};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    pub click_threshold_px: f64,
    pub click_timeout_ms: u64,
    pub drag_zone_px: f64,
    pub hover_throttle_ms: u64,
    pub suppress_after_drag_ms: u64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            click_threshold_px: CLICK_THRESHOLD_PX,
            click_timeout_ms: CLICK_TIMEOUT_MS,
            drag_zone_px: DRAG_ZONE_PIXELS,
            hover_throttle_ms: HOVER_THROTTLE_MS,
            suppress_after_drag_ms: SUPPRESS_AFTER_DRAG_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Point,
    pub timestamp_ms: u64,
}

impl PointerEvent {
    pub fn new(x: f64, y: f64, timestamp_ms: u64) -> Self {
        Self {
            position: Point::new(x, y),
            timestamp_ms,
        }
    }
}

/// Host callbacks. Every method defaults to doing nothing.
pub trait InteractionSink {
    fn on_item_click(&mut self, _item: &Item, _event: &PointerEvent) {}
    fn on_hover_change(&mut self, _item: Option<&Item>) {}
    /// `proposed` is the dragged item with its new dates and ring. Persisting it is up to
    /// the host.
    fn on_item_drag_committed(&mut self, _proposed: &Item) {}
    fn on_rotation_change(&mut self, _rotation: f64) {}
    fn set_cursor(&mut self, _cursor: Cursor) {}
    fn request_redraw(&mut self) {}
}

/// What the controller needs to know about the last paint.
#[derive(Clone, Copy)]
pub struct InteractionFrame<'a> {
    pub plan: &'a SectionPlan,
    pub regions: &'a [ItemRegion],
    pub cache: &'a RenderSetCache,
    pub calendar: &'a YearCalendar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragPreview {
    pub item_id: ItemId,
    pub mode: DragMode,
    pub ring_id: RingId,
    pub start_angle: f64,
    pub end_angle: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointerUpOutcome {
    Click(ItemId),
    DragCommitted(Item),
    DragUnchanged(ItemId),
    Rotated(f64),
    Suppressed,
    Ignored,
}

#[derive(Debug, Clone)]
struct DragTarget {
    item: Item,
    region: ItemRegion,
    mode: DragMode,
}

#[derive(Debug, Clone)]
struct PointerDown {
    event: PointerEvent,
    polar: Polar,
    target: Option<DragTarget>,
}

#[derive(Debug, Clone)]
struct DragState {
    target: DragTarget,
    preview: DragPreview,
    // accumulated so drags past half a turn keep their direction
    delta: f64,
    last_angle: f64,
}

#[derive(Debug, Clone, Default)]
enum Session {
    #[default]
    Idle,
    Armed(PointerDown),
    Dragging(DragState),
    Rotating { last_angle: f64 },
}

/// Independent reasons to swallow the next click. Any one of them is enough.
#[derive(Debug, Clone, Default)]
struct ClickSuppression {
    drag_completed: bool,
    skip_next: bool,
    quiet_until_ms: Option<u64>,
}

impl ClickSuppression {
    fn finish_drag(&mut self, now: u64, quiet_ms: u64) {
        self.drag_completed = true;
        self.quiet_until_ms = Some(now + quiet_ms);
    }

    fn take(&mut self, now: u64) -> bool {
        let quiet = self.quiet_until_ms.is_some_and(|until| now < until);
        let blocked = self.drag_completed || self.skip_next || quiet;
        self.skip_next = false;
        blocked
    }
}

fn shift(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days))
        .unwrap_or(date)
}

/// Pointer session state machine: `Idle -> Armed -> Dragging | Rotating -> Idle`, or
/// `Armed -> click -> Idle`.
///
/// The controller never touches the wheel structure. Clicks, hovers and proposed item
/// changes leave through the [`InteractionSink`].
#[derive(Debug, Default)]
pub struct InteractionController {
    settings: InteractionSettings,
    session: Session,
    suppression: ClickSuppression,
    hovered: Option<ItemId>,
    cursor: Cursor,
    last_hover_ms: Option<u64>,
    rotation: f64,
}

impl InteractionController {
    pub fn new(settings: InteractionSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &InteractionSettings {
        &self.settings
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f64) {
        self.rotation = normalize_radians(rotation);
    }

    pub fn hovered(&self) -> Option<&ItemId> {
        self.hovered.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.session, Session::Dragging(_))
    }

    pub fn drag_preview(&self) -> Option<&DragPreview> {
        match &self.session {
            Session::Dragging(drag) => Some(&drag.preview),
            _ => None,
        }
    }

    /// Makes the next click a no-op, whatever else happens.
    pub fn skip_next_click(&mut self) {
        self.suppression.skip_next = true;
    }

    pub fn pointer_down(
        &mut self,
        frame: &InteractionFrame<'_>,
        event: PointerEvent,
        _sink: &mut dyn InteractionSink,
    ) {
        self.suppression.drag_completed = false;

        let polar = to_wheel_polar(event.position, frame.plan.center, self.rotation);
        if polar.radius < frame.plan.min_radius {
            self.session = Session::Idle;
            return;
        }

        let target = hit_test(event.position, frame.plan.center, self.rotation, frame.regions)
            .and_then(|region| {
                let item = frame.cache.item_by_id(&region.item_id)?;
                Some(DragTarget {
                    item: item.clone(),
                    region: region.clone(),
                    mode: detect_drag_zone(polar, region, self.settings.drag_zone_px),
                })
            });

        if let Some(target) = &target {
            log::debug!("Pointer down on {} ({})", target.item.id, target.mode);
        }
        self.session = Session::Armed(PointerDown {
            event,
            polar,
            target,
        });
    }

    pub fn pointer_move(
        &mut self,
        frame: &InteractionFrame<'_>,
        event: PointerEvent,
        sink: &mut dyn InteractionSink,
    ) {
        match std::mem::take(&mut self.session) {
            Session::Idle => self.update_hover(frame, event, sink),
            Session::Armed(down) => {
                let moved = down.event.position.distance(event.position);
                if moved <= self.settings.click_threshold_px {
                    self.session = Session::Armed(down);
                    return;
                }

                match down.target {
                    Some(target) => {
                        let mut drag = DragState {
                            preview: DragPreview {
                                item_id: target.item.id.clone(),
                                mode: target.mode,
                                ring_id: target.item.ring_id.clone(),
                                start_angle: target.region.start_angle,
                                end_angle: target.region.end_angle,
                            },
                            delta: 0.0,
                            last_angle: down.polar.angle,
                            target,
                        };
                        self.set_cursor(
                            match drag.target.mode {
                                DragMode::Move => Cursor::Grabbing,
                                mode => Cursor::from(mode),
                            },
                            sink,
                        );
                        self.drag_to(frame, &mut drag, event);
                        self.session = Session::Dragging(drag);
                        sink.request_redraw();
                    }
                    None => {
                        let last_angle =
                            cartesian_to_polar(frame.plan.center, down.event.position).angle;
                        self.session = Session::Rotating {
                            last_angle: self.rotate_to(frame, last_angle, event, sink),
                        };
                    }
                }
            }
            Session::Dragging(mut drag) => {
                self.drag_to(frame, &mut drag, event);
                self.session = Session::Dragging(drag);
                sink.request_redraw();
            }
            Session::Rotating { last_angle } => {
                self.session = Session::Rotating {
                    last_angle: self.rotate_to(frame, last_angle, event, sink),
                };
            }
        }
    }

    pub fn pointer_up(
        &mut self,
        frame: &InteractionFrame<'_>,
        event: PointerEvent,
        sink: &mut dyn InteractionSink,
    ) -> PointerUpOutcome {
        match std::mem::take(&mut self.session) {
            Session::Idle => PointerUpOutcome::Ignored,
            Session::Armed(down) => {
                if self.suppression.take(event.timestamp_ms) {
                    log::debug!("Click suppressed");
                    return PointerUpOutcome::Suppressed;
                }

                let moved = down.event.position.distance(event.position);
                let elapsed = event.timestamp_ms.saturating_sub(down.event.timestamp_ms);
                match down.target {
                    Some(target)
                        if moved <= self.settings.click_threshold_px
                            && elapsed <= self.settings.click_timeout_ms =>
                    {
                        // the item under the down position, not the up position
                        sink.on_item_click(&target.item, &down.event);
                        PointerUpOutcome::Click(target.item.id)
                    }
                    _ => PointerUpOutcome::Ignored,
                }
            }
            Session::Dragging(drag) => {
                self.suppression
                    .finish_drag(event.timestamp_ms, self.settings.suppress_after_drag_ms);
                self.set_cursor(Cursor::from(drag.target.mode), sink);
                sink.request_redraw();

                let proposed = self.propose(frame.calendar, &drag);
                if proposed == drag.target.item {
                    log::debug!("Drag of {} left it unchanged", proposed.id);
                    PointerUpOutcome::DragUnchanged(proposed.id)
                } else {
                    log::debug!(
                        "Drag of {} proposes {}..{} on {}",
                        proposed.id,
                        proposed.start_date,
                        proposed.end_date,
                        proposed.ring_id
                    );
                    sink.on_item_drag_committed(&proposed);
                    PointerUpOutcome::DragCommitted(proposed)
                }
            }
            Session::Rotating { .. } => {
                self.suppression
                    .finish_drag(event.timestamp_ms, self.settings.suppress_after_drag_ms);
                PointerUpOutcome::Rotated(self.rotation)
            }
        }
    }

    /// A click delivered by the host outside of a pointer session.
    pub fn click(
        &mut self,
        frame: &InteractionFrame<'_>,
        event: PointerEvent,
        sink: &mut dyn InteractionSink,
    ) -> Option<ItemId> {
        if self.suppression.take(event.timestamp_ms) {
            return None;
        }
        let region = hit_test(event.position, frame.plan.center, self.rotation, frame.regions)?;
        let item = frame.cache.item_by_id(&region.item_id)?;
        sink.on_item_click(item, &event);
        Some(item.id.clone())
    }

    /// Pointer left the canvas: abandons any drag without committing and clears hover.
    pub fn pointer_leave(&mut self, sink: &mut dyn InteractionSink) {
        if !matches!(std::mem::take(&mut self.session), Session::Idle) {
            log::debug!("Pointer session abandoned");
            sink.request_redraw();
        }

        if self.hovered.take().is_some() {
            sink.on_hover_change(None);
            sink.request_redraw();
        }
        self.set_cursor(Cursor::Default, sink);
    }

    fn set_cursor(&mut self, cursor: Cursor, sink: &mut dyn InteractionSink) {
        if self.cursor != cursor {
            self.cursor = cursor;
            sink.set_cursor(cursor);
        }
    }

    fn update_hover(
        &mut self,
        frame: &InteractionFrame<'_>,
        event: PointerEvent,
        sink: &mut dyn InteractionSink,
    ) {
        if self.last_hover_ms.is_some_and(|last| {
            event.timestamp_ms.saturating_sub(last) < self.settings.hover_throttle_ms
        }) {
            return;
        }
        self.last_hover_ms = Some(event.timestamp_ms);

        let polar = to_wheel_polar(event.position, frame.plan.center, self.rotation);
        let hit = hit_test(event.position, frame.plan.center, self.rotation, frame.regions);

        let cursor = hit
            .map(|region| Cursor::from(detect_drag_zone(polar, region, self.settings.drag_zone_px)))
            .unwrap_or_default();
        self.set_cursor(cursor, sink);

        let next = hit.map(|region| region.item_id.clone());
        if next != self.hovered {
            self.hovered = next;
            let item = self
                .hovered
                .as_ref()
                .and_then(|id| frame.cache.item_by_id(id));
            sink.on_hover_change(item);
            sink.request_redraw();
        }
    }

    fn drag_to(&self, frame: &InteractionFrame<'_>, drag: &mut DragState, event: PointerEvent) {
        let polar = to_wheel_polar(event.position, frame.plan.center, self.rotation);
        drag.delta += angle_difference(polar.angle, drag.last_angle);
        drag.last_angle = polar.angle;

        let region = &drag.target.region;
        let min_span = MIN_RESIZE_SPAN_DEG.to_radians();
        let preview = &mut drag.preview;
        match drag.target.mode {
            DragMode::Move => {
                preview.start_angle = region.start_angle + drag.delta;
                preview.end_angle = region.end_angle + drag.delta;
                if let Some(band) = frame.plan.ring_band_at(polar.radius) {
                    preview.ring_id = band.ring_id.clone();
                }
            }
            // an update that would leave less than a week keeps the previous preview
            DragMode::ResizeStart => {
                let start = region.start_angle + drag.delta;
                if region.end_angle - start >= min_span {
                    preview.start_angle = start;
                }
            }
            DragMode::ResizeEnd => {
                let end = region.end_angle + drag.delta;
                if end - region.start_angle >= min_span {
                    preview.end_angle = end;
                }
            }
        }
    }

    fn rotate_to(
        &mut self,
        frame: &InteractionFrame<'_>,
        last_angle: f64,
        event: PointerEvent,
        sink: &mut dyn InteractionSink,
    ) -> f64 {
        let angle = cartesian_to_polar(frame.plan.center, event.position).angle;
        self.rotation = normalize_radians(self.rotation + angle_difference(angle, last_angle));
        sink.on_rotation_change(self.rotation);
        sink.request_redraw();
        angle
    }

    /// Turns the preview back into whole-day moves of the dragged item's dates.
    fn propose(&self, calendar: &YearCalendar, drag: &DragState) -> Item {
        let item = &drag.target.item;
        let region = &drag.target.region;
        let preview = &drag.preview;
        let start_shift =
            calendar.degrees_to_days((preview.start_angle - region.start_angle).to_degrees());
        let end_shift = calendar.degrees_to_days((preview.end_angle - region.end_angle).to_degrees());

        let (start, end) = match drag.target.mode {
            DragMode::Move => (
                shift(item.start_date, start_shift),
                shift(item.end_date, start_shift),
            ),
            DragMode::ResizeStart => (shift(item.start_date, start_shift), item.end_date),
            DragMode::ResizeEnd => (item.start_date, shift(item.end_date, end_shift)),
        };

        let (start, end) = (calendar.clamp(start), calendar.clamp(end));
        let (start, end) = if start <= end { (start, end) } else { (end, start) };

        Item {
            start_date: start,
            end_date: end,
            ring_id: preview.ring_id.clone(),
            ..item.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::HexColor;
    use crate::geometry::GeometryConstants;
    use crate::layout::{LayoutOptions, RadialLayoutEngine};
    use crate::model::{ActivityGroup, Ring, RingType, WheelStructure};

    #[derive(Default)]
    struct Recorder {
        clicks: Vec<ItemId>,
        hovers: Vec<Option<ItemId>>,
        commits: Vec<Item>,
        rotations: Vec<f64>,
        cursors: Vec<Cursor>,
        redraws: usize,
    }

    impl InteractionSink for Recorder {
        fn on_item_click(&mut self, item: &Item, _event: &PointerEvent) {
            self.clicks.push(item.id.clone());
        }

        fn on_hover_change(&mut self, item: Option<&Item>) {
            self.hovers.push(item.map(|i| i.id.clone()));
        }

        fn on_item_drag_committed(&mut self, proposed: &Item) {
            self.commits.push(proposed.clone());
        }

        fn on_rotation_change(&mut self, rotation: f64) {
            self.rotations.push(rotation);
        }

        fn set_cursor(&mut self, cursor: Cursor) {
            self.cursors.push(cursor);
        }

        fn request_redraw(&mut self) {
            self.redraws += 1;
        }
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn ring(id: &str) -> Ring {
        Ring {
            id: id.into(),
            name: id.to_string(),
            kind: RingType::Inner,
            visible: true,
            orientation: None,
            color: None,
            data: Vec::new(),
        }
    }

    struct Fixture {
        cache: RenderSetCache,
        plan: SectionPlan,
        regions: Vec<ItemRegion>,
        calendar: YearCalendar,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_item(date(3, 1), date(3, 31))
        }

        fn with_item(start_date: NaiveDate, end_date: NaiveDate) -> Self {
            let structure = WheelStructure {
                rings: vec![ring("r1"), ring("r2")],
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
                    start_date,
                    end_date,
                    ring_id: "r1".into(),
                    activity_id: "g1".into(),
                    label_id: None,
                    description: None,
                    time: None,
                }],
            };
            let options = LayoutOptions::default();
            let constants = GeometryConstants::derive(1000.0);
            let cache = RenderSetCache::new(structure);
            let plan = RadialLayoutEngine::new(&constants, &options).layout(&cache);
            let regions = plan.item_regions();
            Self {
                cache,
                plan,
                regions,
                calendar: options.calendar(),
            }
        }

        fn frame(&self) -> InteractionFrame<'_> {
            InteractionFrame {
                plan: &self.plan,
                regions: &self.regions,
                cache: &self.cache,
                calendar: &self.calendar,
            }
        }

        fn point(&self, radius: f64, angle: f64) -> Point {
            let center = self.plan.center;
            Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        }

        fn item_point(&self, fraction: f64) -> Point {
            let region = &self.regions[0];
            let angle = region.start_angle + (region.end_angle - region.start_angle) * fraction;
            self.point(region.mid_radius(), angle)
        }

        fn empty_point(&self) -> Point {
            // opposite side of the r1 ring from the item
            let region = &self.regions[0];
            self.point(region.mid_radius(), region.start_angle + std::f64::consts::PI)
        }
    }

    fn at(point: Point, ms: u64) -> PointerEvent {
        PointerEvent::new(point.x, point.y, ms)
    }

    #[test]
    fn test_tap_fires_one_click() {
        let fixture = Fixture::new();
        let mut controller = InteractionController::default();
        let mut sink = Recorder::default();
        let p = fixture.item_point(0.5);

        controller.pointer_down(&fixture.frame(), at(p, 1000), &mut sink);
        let outcome = controller.pointer_up(&fixture.frame(), at(p, 1100), &mut sink);

        assert_eq!(outcome, PointerUpOutcome::Click("i1".into()));
        assert_eq!(sink.clicks, vec![ItemId::from("i1")]);
        assert!(sink.commits.is_empty());
    }

    #[test]
    fn test_slow_press_is_not_a_click() {
        let fixture = Fixture::new();
        let mut controller = InteractionController::default();
        let mut sink = Recorder::default();
        let p = fixture.item_point(0.5);

        controller.pointer_down(&fixture.frame(), at(p, 1000), &mut sink);
        let outcome = controller.pointer_up(&fixture.frame(), at(p, 1500), &mut sink);
        assert_eq!(outcome, PointerUpOutcome::Ignored);
        assert!(sink.clicks.is_empty());
    }

    #[test]
    fn test_drag_fires_no_click_and_one_evaluation() {
        let fixture = Fixture::new();
        let mut controller = InteractionController::default();
        let mut sink = Recorder::default();
        let region = fixture.regions[0].clone();
        let mid = (region.start_angle + region.end_angle) / 2.0;
        let p = fixture.item_point(0.5);
        // 20px along the ring, about a week of travel
        let moved = Point::new(p.x - 20.0 * mid.sin(), p.y + 20.0 * mid.cos());

        controller.pointer_down(&fixture.frame(), at(p, 1000), &mut sink);
        controller.pointer_move(&fixture.frame(), at(moved, 1050), &mut sink);
        assert!(controller.is_dragging());
        let outcome = controller.pointer_up(&fixture.frame(), at(moved, 1100), &mut sink);

        assert!(sink.clicks.is_empty());
        assert!(matches!(outcome, PointerUpOutcome::DragCommitted(_)));
        assert_eq!(sink.commits.len(), 1);
        assert!(sink.commits[0].start_date > date(3, 1));
        assert!(controller.drag_preview().is_none());
    }

    #[test]
    fn test_move_drag_shifts_both_dates() {
        let fixture = Fixture::new();
        let mut controller = InteractionController::default();
        let mut sink = Recorder::default();
        let region = fixture.regions[0].clone();
        let radius = region.mid_radius();
        let mid = (region.start_angle + region.end_angle) / 2.0;
        let ten_days = (10.0 / 365.0) * std::f64::consts::TAU;

        let start = fixture.point(radius, mid);
        let end = fixture.point(radius, mid + ten_days);
        controller.pointer_down(&fixture.frame(), at(start, 0), &mut sink);
        controller.pointer_move(&fixture.frame(), at(end, 40), &mut sink);
        let outcome = controller.pointer_up(&fixture.frame(), at(end, 80), &mut sink);

        let PointerUpOutcome::DragCommitted(item) = outcome else {
            panic!("expected a commit, got {:?}", outcome);
        };
        assert_eq!(item.start_date, date(3, 11));
        assert_eq!(item.end_date, date(4, 10));
        assert_eq!(item.ring_id, RingId::from("r1"));
        assert_eq!(sink.commits, vec![item]);
    }

    #[test]
    fn test_move_drag_switches_ring() {
        let fixture = Fixture::new();
        let mut controller = InteractionController::default();
        let mut sink = Recorder::default();
        let region = fixture.regions[0].clone();
        let mid = (region.start_angle + region.end_angle) / 2.0;
        let r2 = fixture.plan.band_for_ring(&"r2".into()).unwrap();
        let target_radius = (r2.inner_radius + r2.content_outer_radius) / 2.0;

        controller.pointer_down(&fixture.frame(), at(fixture.point(region.mid_radius(), mid), 0), &mut sink);
        controller.pointer_move(&fixture.frame(), at(fixture.point(target_radius, mid), 20), &mut sink);
        assert_eq!(controller.drag_preview().unwrap().ring_id, RingId::from("r2"));

        let outcome = controller.pointer_up(&fixture.frame(), at(fixture.point(target_radius, mid), 40), &mut sink);
        let PointerUpOutcome::DragCommitted(item) = outcome else {
            panic!("expected a commit, got {:?}", outcome);
        };
        assert_eq!(item.ring_id, RingId::from("r2"));
        assert_eq!(item.start_date, date(3, 1));
    }

    #[test]
    fn test_resize_keeps_a_week() {
        let fixture = Fixture::new();
        let mut controller = InteractionController::default();
        let mut sink = Recorder::default();
        let region = fixture.regions[0].clone();
        let radius = region.mid_radius();
        let day = std::f64::consts::TAU / 365.0;

        // pull the end edge back three weeks, then far past the start
        let edge = fixture.point(radius, region.end_angle - 0.002);
        let shorter = fixture.point(radius, region.end_angle - 0.002 - 21.0 * day);
        let back = fixture.point(radius, region.start_angle - 0.3);
        controller.pointer_down(&fixture.frame(), at(edge, 0), &mut sink);
        controller.pointer_move(&fixture.frame(), at(shorter, 20), &mut sink);
        let accepted = controller.drag_preview().unwrap().end_angle;
        controller.pointer_move(&fixture.frame(), at(back, 40), &mut sink);

        let preview = controller.drag_preview().unwrap().clone();
        assert_eq!(preview.mode, DragMode::ResizeEnd);
        assert_eq!(preview.end_angle, accepted);
        assert_eq!(preview.start_angle, region.start_angle);
        assert!(preview.end_angle - preview.start_angle >= MIN_RESIZE_SPAN_DEG.to_radians());

        let outcome = controller.pointer_up(&fixture.frame(), at(back, 60), &mut sink);
        let PointerUpOutcome::DragCommitted(item) = outcome else {
            panic!("expected a commit, got {:?}", outcome);
        };
        assert_eq!(item.start_date, date(3, 1));
        assert_eq!(item.end_date, date(3, 10));
        assert!(sink.cursors.contains(&Cursor::EwResize));
    }

    #[test]
    fn test_resize_start_moves_only_the_start() {
        let fixture = Fixture::new();
        let mut controller = InteractionController::default();
        let mut sink = Recorder::default();
        let region = fixture.regions[0].clone();
        let radius = region.mid_radius();
        let day = std::f64::consts::TAU / 365.0;

        let edge = fixture.point(radius, region.start_angle + 0.002);
        let later = fixture.point(radius, region.start_angle + 0.002 + 5.0 * day);
        controller.pointer_down(&fixture.frame(), at(edge, 0), &mut sink);
        controller.pointer_move(&fixture.frame(), at(later, 20), &mut sink);

        let preview = controller.drag_preview().unwrap().clone();
        assert_eq!(preview.mode, DragMode::ResizeStart);
        assert_eq!(preview.end_angle, region.end_angle);

        let outcome = controller.pointer_up(&fixture.frame(), at(later, 40), &mut sink);
        let PointerUpOutcome::DragCommitted(item) = outcome else {
            panic!("expected a commit, got {:?}", outcome);
        };
        assert_eq!(item.start_date, date(3, 6));
        assert_eq!(item.end_date, date(3, 31));
        assert_eq!(sink.commits, vec![item]);
    }

    #[test]
    fn test_short_item_resize_is_rejected() {
        // five days is already under a week, so shrinking it never takes
        let cases = vec![
            (DragMode::ResizeStart, 0.002, 3.0),
            (DragMode::ResizeEnd, -0.002, -3.0),
        ];

        for (mode, offset, days) in cases {
            let fixture = Fixture::with_item(date(3, 1), date(3, 5));
            let mut controller = InteractionController::default();
            let mut sink = Recorder::default();
            let region = fixture.regions[0].clone();
            let radius = region.mid_radius();
            let grab_angle = match mode {
                DragMode::ResizeStart => region.start_angle,
                _ => region.end_angle,
            } + offset;
            let day = std::f64::consts::TAU / 365.0;

            let edge = fixture.point(radius, grab_angle);
            let inward = fixture.point(radius, grab_angle + days * day);
            controller.pointer_down(&fixture.frame(), at(edge, 0), &mut sink);
            controller.pointer_move(&fixture.frame(), at(inward, 20), &mut sink);

            let preview = controller.drag_preview().unwrap().clone();
            assert_eq!(preview.mode, mode);
            assert_eq!(preview.start_angle, region.start_angle);
            assert_eq!(preview.end_angle, region.end_angle);

            let outcome = controller.pointer_up(&fixture.frame(), at(inward, 40), &mut sink);
            assert_eq!(outcome, PointerUpOutcome::DragUnchanged("i1".into()), "{}", mode);
            assert!(sink.commits.is_empty());
        }
    }

    #[test]
    fn test_clicks_after_a_drag_are_suppressed() {
        let fixture = Fixture::new();
        let mut controller = InteractionController::default();
        let mut sink = Recorder::default();
        let region = fixture.regions[0].clone();
        let mid = (region.start_angle + region.end_angle) / 2.0;
        let p = fixture.item_point(0.5);
        // 20px along the ring, about a week of travel
        let moved = Point::new(p.x - 20.0 * mid.sin(), p.y + 20.0 * mid.cos());

        controller.pointer_down(&fixture.frame(), at(p, 0), &mut sink);
        controller.pointer_move(&fixture.frame(), at(moved, 10), &mut sink);
        controller.pointer_up(&fixture.frame(), at(moved, 20), &mut sink);

        // host-delivered click right after the drag
        assert!(controller.click(&fixture.frame(), at(moved, 25), &mut sink).is_none());

        // a fresh tap inside the quiet window
        controller.pointer_down(&fixture.frame(), at(p, 100), &mut sink);
        let outcome = controller.pointer_up(&fixture.frame(), at(p, 150), &mut sink);
        assert_eq!(outcome, PointerUpOutcome::Suppressed);

        // and one after it
        controller.pointer_down(&fixture.frame(), at(p, 1000), &mut sink);
        let outcome = controller.pointer_up(&fixture.frame(), at(p, 1050), &mut sink);
        assert_eq!(outcome, PointerUpOutcome::Click("i1".into()));
        assert_eq!(sink.clicks.len(), 1);
    }

    #[test]
    fn test_skip_next_click_is_consumed_once() {
        let fixture = Fixture::new();
        let mut controller = InteractionController::default();
        let mut sink = Recorder::default();
        let p = fixture.item_point(0.5);

        controller.skip_next_click();
        controller.pointer_down(&fixture.frame(), at(p, 0), &mut sink);
        assert_eq!(
            controller.pointer_up(&fixture.frame(), at(p, 10), &mut sink),
            PointerUpOutcome::Suppressed
        );
        controller.pointer_down(&fixture.frame(), at(p, 20), &mut sink);
        assert_eq!(
            controller.pointer_up(&fixture.frame(), at(p, 30), &mut sink),
            PointerUpOutcome::Click("i1".into())
        );
    }

    #[test]
    fn test_leave_abandons_drag() {
        let fixture = Fixture::new();
        let mut controller = InteractionController::default();
        let mut sink = Recorder::default();
        let p = fixture.item_point(0.5);
        let moved = Point::new(p.x + 30.0, p.y);

        controller.pointer_down(&fixture.frame(), at(p, 0), &mut sink);
        controller.pointer_move(&fixture.frame(), at(moved, 10), &mut sink);
        controller.pointer_leave(&mut sink);
        let outcome = controller.pointer_up(&fixture.frame(), at(moved, 20), &mut sink);

        assert_eq!(outcome, PointerUpOutcome::Ignored);
        assert!(sink.commits.is_empty());
        assert!(controller.drag_preview().is_none());
    }

    #[test]
    fn test_hover_is_throttled() {
        let fixture = Fixture::new();
        let mut controller = InteractionController::default();
        let mut sink = Recorder::default();
        let on_item = fixture.item_point(0.5);
        let off_item = fixture.empty_point();

        controller.pointer_move(&fixture.frame(), at(on_item, 0), &mut sink);
        // inside the frame budget, dropped
        controller.pointer_move(&fixture.frame(), at(off_item, 5), &mut sink);
        assert_eq!(controller.hovered(), Some(&ItemId::from("i1")));

        controller.pointer_move(&fixture.frame(), at(off_item, 20), &mut sink);
        assert_eq!(controller.hovered(), None);
        assert_eq!(sink.hovers, vec![Some(ItemId::from("i1")), None]);
        assert_eq!(sink.cursors, vec![Cursor::Grab, Cursor::Default]);
    }

    #[test]
    fn test_empty_area_drag_rotates() {
        let fixture = Fixture::new();
        let mut controller = InteractionController::default();
        let mut sink = Recorder::default();
        let region = &fixture.regions[0];
        let radius = region.mid_radius();
        let base = region.start_angle + std::f64::consts::PI;

        controller.pointer_down(&fixture.frame(), at(fixture.point(radius, base), 0), &mut sink);
        controller.pointer_move(&fixture.frame(), at(fixture.point(radius, base + 0.2), 20), &mut sink);
        let outcome = controller.pointer_up(&fixture.frame(), at(fixture.point(radius, base + 0.2), 40), &mut sink);

        let PointerUpOutcome::Rotated(rotation) = outcome else {
            panic!("expected a rotation, got {:?}", outcome);
        };
        assert!((rotation - 0.2).abs() < 1e-9);
        assert_eq!(sink.rotations.len(), 1);
        assert!(sink.clicks.is_empty());
    }

    #[test]
    fn test_center_circle_is_ignored() {
        let fixture = Fixture::new();
        let mut controller = InteractionController::default();
        let mut sink = Recorder::default();
        let center = fixture.plan.center;

        controller.pointer_down(&fixture.frame(), at(center, 0), &mut sink);
        controller.pointer_move(&fixture.frame(), at(Point::new(center.x + 30.0, center.y), 10), &mut sink);
        let outcome = controller.pointer_up(&fixture.frame(), at(center, 20), &mut sink);
        assert_eq!(outcome, PointerUpOutcome::Ignored);
        assert!(sink.rotations.is_empty());
    }
}
