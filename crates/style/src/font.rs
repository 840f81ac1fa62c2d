use serde::{Deserialize, Serialize};

/// Weight requested by inline markup. Style sheets select bold faces by font
/// name (`Helvetica-Bold`), so only the two weights markup can express exist.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

impl FontWeight {
    pub fn is_bold(&self) -> bool {
        matches!(self, FontWeight::Bold)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl FontStyle {
    pub fn is_italic(&self) -> bool {
        matches!(self, FontStyle::Italic)
    }
}
