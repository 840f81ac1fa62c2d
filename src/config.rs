use crate::assets::{FontAsset, FontSetup};
use std::path::{Path, PathBuf};

/// Installed families tried when the downloaded font is unavailable, in order.
pub const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "Klee One",
    "Noto Sans CJK JP",
    "Noto Sans JP",
    "IPAGothic",
    "IPAexGothic",
    "TakaoGothic",
];

/// Settings for one generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    /// Directory the worksheet PDFs are written to.
    pub output_dir: PathBuf,
    pub font: FontAsset,
    pub system_candidates: Vec<String>,
    /// Render fallback-tolerant worksheets with Helvetica when no Japanese font is found.
    pub allow_fallback: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            font: FontAsset::klee_one("."),
            system_candidates: SYSTEM_FONT_CANDIDATES.iter().map(|s| s.to_string()).collect(),
            allow_fallback: true,
        }
    }
}

impl GenerationConfig {
    /// Writes into `dir` and keeps the downloaded font there too.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            output_dir: dir.to_path_buf(),
            font: FontAsset::klee_one(dir),
            ..Self::default()
        }
    }

    pub fn with_font(mut self, font: FontAsset) -> Self {
        self.font = font;
        self
    }

    pub fn with_fallback(mut self, allow: bool) -> Self {
        self.allow_fallback = allow;
        self
    }

    pub fn font_setup(&self) -> FontSetup {
        FontSetup {
            allow_fallback: self.allow_fallback,
            system_candidates: self.system_candidates.clone(),
        }
    }

    pub fn output_path(&self, filename: &str) -> PathBuf {
        self.output_dir.join(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::FONT_FILENAME;

    #[test]
    fn default_uses_the_working_directory() {
        let config = GenerationConfig::default();
        assert_eq!(config.font.path, Path::new(".").join(FONT_FILENAME));
        assert!(config.font.url.is_some());
        assert!(config.font_setup().allow_fallback);
        assert_eq!(config.output_path("a.pdf"), Path::new(".").join("a.pdf"));
    }

    #[test]
    fn in_dir_moves_font_and_output_together() {
        let config = GenerationConfig::in_dir("/tmp/sheets").with_fallback(false);
        assert_eq!(config.font.path, Path::new("/tmp/sheets").join(FONT_FILENAME));
        assert_eq!(config.output_path("x.pdf"), Path::new("/tmp/sheets/x.pdf"));
        assert!(!config.font_setup().allow_fallback);
        assert_eq!(config.font_setup().system_candidates.len(), SYSTEM_FONT_CANDIDATES.len());
    }
}
