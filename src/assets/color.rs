use serde::{Deserialize, Serialize};

/// Opaque sRGB caption color.
///
/// Deserializes from `"#RRGGBB"` (the `#` is optional, hex digits are case-insensitive) or from
/// an `[r, g, b]` byte array; always serializes back to lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Rgb8 = Rgb8::new(0xff, 0xff, 0xff);
    pub const BLACK: Rgb8 = Rgb8::new(0x00, 0x00, 0x00);
    pub const GOLD: Rgb8 = Rgb8::new(0xff, 0xd7, 0x00);
    pub const PINK: Rgb8 = Rgb8::new(0xff, 0x69, 0xb4);
    pub const DARK_SLATE: Rgb8 = Rgb8::new(0x1e, 0x29, 0x3b);

    /// Swatches offered by the editor. The engine itself accepts any color.
    pub const PALETTE: [Rgb8; 5] = [
        Rgb8::WHITE,
        Rgb8::BLACK,
        Rgb8::GOLD,
        Rgb8::PINK,
        Rgb8::DARK_SLATE,
    ];

    pub fn parse_hex(s: &str) -> Result<Self, String> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 || !s.is_ascii() {
            return Err("hex color must be #RRGGBB (case-insensitive)".to_owned());
        }

        fn hex_byte(pair: &str) -> Result<u8, String> {
            u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
        }

        Ok(Self::new(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        ))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub(crate) fn to_cpu(self) -> vello_cpu::peniko::Color {
        vello_cpu::peniko::Color::from_rgba8(self.r, self.g, self.b, 255)
    }
}

impl Default for Rgb8 {
    fn default() -> Self {
        Self::WHITE
    }
}

impl std::str::FromStr for Rgb8 {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl Serialize for Rgb8 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Arr([u8; 3]),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => Self::parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::Arr([r, g, b]) => Ok(Self::new(r, g, b)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
