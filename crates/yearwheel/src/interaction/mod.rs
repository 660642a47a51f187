pub mod controller;

pub use controller::{
    DragPreview, InteractionController, InteractionFrame, InteractionSettings, InteractionSink,
    PointerEvent, PointerUpOutcome,
};
pub use hit_test::{Cursor, DragMode, ItemRegion, angle_in_span, detect_drag_zone, hit_test};
