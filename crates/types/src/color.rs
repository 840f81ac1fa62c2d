use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(value: u8) -> Self {
        Self::rgb(value, value, value)
    }

    /// Parses a color value as it appears in style definitions and inline markup.
    ///
    /// Accepts `#RGB`, `#RRGGBB` and the small set of named colors the worksheets
    /// use. Surrounding quotes are ignored, so `'red'` and `red` are the same.
    pub fn parse(s: &str) -> Result<Color, String> {
        let s = s.trim().trim_matches(|c| c == '\'' || c == '"').trim();
        if s.starts_with('#') {
            return Self::parse_hex(s);
        }
        Self::named(s).ok_or_else(|| format!("Unknown color name: {}", s))
    }

    /// Looks up a named color, case-insensitively.
    pub fn named(name: &str) -> Option<Color> {
        let color = match name.to_ascii_lowercase().as_str() {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "red" => Self::rgb(255, 0, 0),
            "green" => Self::rgb(0, 128, 0),
            "blue" => Self::rgb(0, 0, 255),
            "grey" | "gray" => Self::gray(128),
            "lightgrey" | "lightgray" => Self::gray(211),
            "darkgrey" | "darkgray" => Self::gray(169),
            "darkblue" => Self::rgb(0, 0, 139),
            "darkred" => Self::rgb(139, 0, 0),
            "darkgreen" => Self::rgb(0, 100, 0),
            "navy" => Self::rgb(0, 0, 128),
            "orange" => Self::rgb(255, 165, 0),
            _ => return None,
        };
        Some(color)
    }

    /// Components scaled to the 0.0..=1.0 range PDF color operators expect.
    pub fn to_unit_rgb(&self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// Parses `#RGB` or `#RRGGBB`.
    fn parse_hex(s: &str) -> Result<Color, String> {
        let hex = &s[1..];
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            n => return Err(format!("Invalid hex color length: expected 3 or 6, got {}", n)),
        };
        let channel = |i: usize| {
            expanded
                .get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| format!("Invalid hex color: {}", s))
        };
        Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b))
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum ColorDef {
            Str(String),
            Map { r: u8, g: u8, b: u8 },
        }

        match ColorDef::deserialize(deserializer)? {
            ColorDef::Str(raw) => Color::parse(&raw).map_err(de::Error::custom),
            ColorDef::Map { r, g, b } => Ok(Color::rgb(r, g, b)),
        }
    }
}
