//! Page size and margin primitives, in PDF points.
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    /// The same margin on every side; worksheets use 72 (one inch) or 50.
    pub fn all(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// Paper size. Everything printed for the course is A4.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    Custom { width: f32, height: f32 },
}

impl PageSize {
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_is_the_default() {
        assert_eq!(PageSize::default().dimensions_pt(), (595.28, 841.89));
        assert_eq!(serde_json::to_string(&PageSize::A4).unwrap(), "\"a4\"");
    }

    #[test]
    fn letter_is_us_paper() {
        let size: PageSize = serde_json::from_str("\"letter\"").unwrap();
        assert_eq!(size, PageSize::Letter);
        assert_eq!(size.dimensions_pt(), (612.0, 792.0));
    }

    #[test]
    fn custom_size_keeps_dimensions() {
        let size: PageSize =
            serde_json::from_str(r#"{"custom": {"width": 300, "height": 400}}"#).unwrap();
        assert_eq!(size.dimensions_pt(), (300.0, 400.0));
        assert_eq!(Margins::all(50.0).horizontal(), 100.0);
    }
}
