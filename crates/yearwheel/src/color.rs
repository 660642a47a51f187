use palette::{Srgb, Srgba};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

/// An opaque sRGB colour written as `#rrggbb` in wheel data and config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, DeserializeFromStr, SerializeDisplay)]
pub struct HexColor(Srgb<u8>);

#[derive(Debug, Error)]
#[error("Invalid hex color '{0}'")]
pub struct ColorParseError(String);

impl HexColor {
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self(Srgb::new(red, green, blue))
    }

    pub const fn white() -> Self {
        Self::rgb(0xFF, 0xFF, 0xFF)
    }

    /// Text colour used on light fills and outside of sections.
    pub const fn dark_text() -> Self {
        Self::rgb(0x0F, 0x17, 0x2A)
    }

    pub fn components(&self) -> (u8, u8, u8) {
        (self.0.red, self.0.green, self.0.blue)
    }

    /// Perceived brightness in `[0, 1]`.
    pub fn luminance(&self) -> f64 {
        let (r, g, b) = self.components();
        (0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64) / 255.0
    }

    pub fn contrast_text(&self) -> Self {
        if self.luminance() > 0.5 {
            Self::dark_text()
        } else {
            Self::white()
        }
    }

    /// Light colours darken by 20%, dark colours lighten by 30%.
    pub fn hover(&self) -> Self {
        let factor = if self.luminance() > 0.5 { 0.8 } else { 1.3 };
        let scale = |c: u8| (c as f64 * factor).round().min(255.0) as u8;
        let (r, g, b) = self.components();
        Self::rgb(scale(r), scale(g), scale(b))
    }

    pub fn with_alpha(&self, alpha: f64) -> Srgba<f64> {
        let c: Srgb<f64> = self.0.into_format();
        Srgba::new(c.red, c.green, c.blue, alpha)
    }

    pub fn opaque(&self) -> Srgba<f64> {
        self.with_alpha(1.0)
    }
}

impl Hash for HexColor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.components().hash(state);
    }
}

impl FromStr for HexColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.trim_start_matches('#');
        if digits.len() != 6 {
            return Err(ColorParseError(s.to_string()));
        }
        trimmed
            .parse::<Srgb<u8>>()
            .map(Self)
            .map_err(|_| ColorParseError(s.to_string()))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = self.components();
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        let cases = vec![
            ("#3b82f6", (0x3b, 0x82, 0xf6)),
            ("3B82F6", (0x3b, 0x82, 0xf6)),
            (" #000000 ", (0, 0, 0)),
        ];

        for (input, expected) in cases {
            let color: HexColor = input.parse().unwrap();
            assert_eq!(color.components(), expected);
        }

        assert!("#fff".parse::<HexColor>().is_err());
        assert!("not a color".parse::<HexColor>().is_err());
    }

    #[test]
    fn test_contrast_text() {
        assert_eq!(HexColor::white().contrast_text(), HexColor::dark_text());
        assert_eq!(HexColor::rgb(0, 0, 0).contrast_text(), HexColor::white());
    }

    #[test]
    fn test_hover_darkens_light_and_lightens_dark() {
        assert_eq!(HexColor::white().hover(), HexColor::rgb(0xCC, 0xCC, 0xCC));
        assert_eq!(HexColor::rgb(100, 0, 0).hover(), HexColor::rgb(130, 0, 0));
        assert_eq!(HexColor::rgb(10, 10, 200).hover(), HexColor::rgb(13, 13, 255));
    }

    #[test]
    fn test_serde_uses_hex_strings() {
        let color: HexColor = serde_json::from_str("\"#F5E6D3\"").unwrap();
        assert_eq!(color.to_string(), "#f5e6d3");
        assert_eq!(serde_json::to_string(&color).unwrap(), "\"#f5e6d3\"");
    }
}
