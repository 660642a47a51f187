use crate::color::HexColor;
use palette::Srgba;

pub const TEXT_DEFAULT: HexColor = HexColor::rgb(0x37, 0x41, 0x51);
pub const RING_NAME_BG: HexColor = HexColor::rgb(0xFF, 0xFF, 0xFF);
pub const RING_NAME_TEXT: HexColor = HexColor::rgb(0x0F, 0x17, 0x2A);
pub const MONTH_RING: [HexColor; 2] = [
    HexColor::rgb(0x33, 0x41, 0x55),
    HexColor::rgb(0x3B, 0x42, 0x52),
];
pub const WEEK_RING: HexColor = HexColor::rgb(0x94, 0xA3, 0xB8);

// Inner ring cells sit under the items and are kept faint
const INNER_CELL_ALPHA: f64 = 0.3;
const GHOST_ALPHA: f64 = 0.35;

#[derive(Debug, Clone, PartialEq)]
pub struct ThemeColors {
    pub background: Srgba<f64>,
    pub text_default: Srgba<f64>,
    pub ring_name_bg: Srgba<f64>,
    pub ring_name_text: Srgba<f64>,
    pub month_ring: [Srgba<f64>; 2],
    pub month_text: Srgba<f64>,
    pub week_ring: Srgba<f64>,
    pub week_text: Srgba<f64>,
    pub center_circle: Srgba<f64>,
    pub outline: Srgba<f64>,
    pub inner_cell_alpha: f64,
    pub ghost_alpha: f64,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            background: HexColor::white().opaque(),
            text_default: TEXT_DEFAULT.opaque(),
            ring_name_bg: RING_NAME_BG.opaque(),
            ring_name_text: RING_NAME_TEXT.opaque(),
            month_ring: [MONTH_RING[0].opaque(), MONTH_RING[1].opaque()],
            month_text: HexColor::white().opaque(),
            week_ring: WEEK_RING.opaque(),
            week_text: WEEK_RING.contrast_text().opaque(),
            center_circle: Srgba::new(0.2, 0.2, 0.2, 0.08),
            outline: Srgba::new(0.2, 0.2, 0.2, 0.25),
            inner_cell_alpha: INNER_CELL_ALPHA,
            ghost_alpha: GHOST_ALPHA,
        }
    }
}

impl ThemeColors {
    pub fn month_fill(&self, month: usize) -> Srgba<f64> {
        self.month_ring[month % self.month_ring.len()]
    }
}
