mod macros;

pub mod cache;
pub mod color;
pub mod config;
pub mod geometry;
pub mod interaction;
pub mod layout;
pub mod model;
pub mod render;
pub mod text;
pub mod wheel;

pub use cache::RenderSetCache;
pub use color::HexColor;
pub use config::WheelConfig;
pub use geometry::{GeometryConstants, YearCalendar};
pub use interaction::{InteractionController, InteractionSink, ItemRegion, PointerEvent};
pub use layout::{LayoutOptions, RadialLayoutEngine, SectionPlan};
pub use model::WheelStructure;
pub use render::{CairoSurface, RecordingSurface, WheelRenderer};
pub use wheel::YearWheel;
