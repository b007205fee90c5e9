use serde::{Deserialize, Serialize};

use crate::assets::color::Rgb8;

/// Typeface choice offered by the editor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    /// Script face ("Dancing Script").
    #[default]
    Handwritten,
    /// Geometric sans-serif ("Poppins").
    #[serde(alias = "sans-serif")]
    Sans,
    /// Display serif ("Playfair Display").
    Serif,
}

/// Generic CSS-style fallback family used when the named face is not installed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GenericFamily {
    Cursive,
    SansSerif,
    Serif,
}

impl FontFamily {
    pub const ALL: [FontFamily; 3] = [FontFamily::Handwritten, FontFamily::Sans, FontFamily::Serif];

    pub fn face_name(self) -> &'static str {
        match self {
            Self::Handwritten => "Dancing Script",
            Self::Sans => "Poppins",
            Self::Serif => "Playfair Display",
        }
    }

    pub fn generic(self) -> GenericFamily {
        match self {
            Self::Handwritten => GenericFamily::Cursive,
            Self::Sans => GenericFamily::SansSerif,
            Self::Serif => GenericFamily::Serif,
        }
    }

    /// Semibold for the sans family, bold for the others.
    pub fn caption_weight(self) -> u16 {
        match self {
            Self::Sans => 600,
            Self::Handwritten | Self::Serif => 700,
        }
    }
}

impl std::fmt::Display for FontFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Handwritten => "handwritten",
            Self::Sans => "sans",
            Self::Serif => "serif",
        })
    }
}

impl std::str::FromStr for FontFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "handwritten" | "cursive" | "script" => Ok(Self::Handwritten),
            "sans" | "sans-serif" => Ok(Self::Sans),
            "serif" => Ok(Self::Serif),
            other => Err(format!(
                "unknown font family '{other}' (expected handwritten, sans or serif)"
            )),
        }
    }
}

/// Caption styling for one render.
///
/// `font_size` is expressed in editor units; the rasterized glyphs are twice that size on the
/// 1080-wide output. None of the fields are clamped against the editor ranges
/// ([`FONT_SIZE_RANGE`](Self::FONT_SIZE_RANGE), [`VERTICAL_OFFSET_RANGE`](Self::VERTICAL_OFFSET_RANGE)):
/// the engine renders whatever it is given.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleParameters {
    pub text: String,
    pub font_family: FontFamily,
    pub font_size: i32,
    pub vertical_offset: i32,
    pub color: Rgb8,
    pub shadow: bool,
}

impl Default for StyleParameters {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_family: FontFamily::Handwritten,
            font_size: 40,
            vertical_offset: 0,
            color: Rgb8::WHITE,
            shadow: true,
        }
    }
}

impl StyleParameters {
    pub const FONT_SIZE_RANGE: std::ops::RangeInclusive<i32> = 20..=80;
    pub const VERTICAL_OFFSET_RANGE: std::ops::RangeInclusive<i32> = -400..=100;

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Font size with non-positive values lifted to 1 so layout never degenerates into an error.
    pub fn effective_font_size(&self) -> i32 {
        self.font_size.max(1)
    }

    /// Glyph size in surface pixels.
    pub fn font_px(&self) -> f32 {
        (self.effective_font_size() as f32) * 2.0
    }

    /// Distance between consecutive caption lines, in surface pixels.
    pub fn line_height(&self) -> f64 {
        f64::from(self.effective_font_size()) * 1.75
    }

    pub fn caption_weight(&self) -> u16 {
        self.font_family.caption_weight()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/style.rs"]
mod tests;
