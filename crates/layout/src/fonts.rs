//! Font library for the layout and rendering pipeline.
//!
//! `FontLibrary` knows two kinds of faces:
//! - the builtin Helvetica family, which needs no font data and is always available
//! - TrueType faces registered under a family alias (e.g. `JapaneseFont`)
//!
//! With the `system-fonts` feature, installed fonts can be looked up with fontdb
//! and registered the same way.

use crate::afm;
use sheets_style::{FontStyle, FontWeight};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Family used when a style names no font, and for the builtin fallback.
pub const DEFAULT_FONT: &str = "Helvetica";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FontError {
    #[error("Font '{0}' is not registered and no fallback is configured")]
    NotRegistered(String),
    #[error("Font data for '{family}' could not be used: {reason}")]
    InvalidFont { family: String, reason: String },
    #[error("No installed TrueType font matches any of: {0}")]
    SystemFontNotFound(String),
}

/// The standard PDF Helvetica faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
}

impl BuiltinFont {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "helvetica" => Some(BuiltinFont::Helvetica),
            "helvetica-bold" => Some(BuiltinFont::HelveticaBold),
            "helvetica-oblique" => Some(BuiltinFont::HelveticaOblique),
            "helvetica-boldoblique" => Some(BuiltinFont::HelveticaBoldOblique),
            _ => None,
        }
    }

    pub fn base_name(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::HelveticaBold => "Helvetica-Bold",
            BuiltinFont::HelveticaOblique => "Helvetica-Oblique",
            BuiltinFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
        }
    }

    pub fn is_bold(&self) -> bool {
        matches!(self, BuiltinFont::HelveticaBold | BuiltinFont::HelveticaBoldOblique)
    }

    pub fn is_oblique(&self) -> bool {
        matches!(self, BuiltinFont::HelveticaOblique | BuiltinFont::HelveticaBoldOblique)
    }

    fn from_flags(bold: bool, oblique: bool) -> Self {
        match (bold, oblique) {
            (false, false) => BuiltinFont::Helvetica,
            (true, false) => BuiltinFont::HelveticaBold,
            (false, true) => BuiltinFont::HelveticaOblique,
            (true, true) => BuiltinFont::HelveticaBoldOblique,
        }
    }

    /// The face to use once inline bold or italic is applied on top of this one.
    pub fn styled(self, weight: FontWeight, style: FontStyle) -> Self {
        Self::from_flags(
            self.is_bold() || weight.is_bold(),
            self.is_oblique() || style.is_italic(),
        )
    }

    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text
            .chars()
            .map(|c| afm::advance(c, self.is_bold()) as u32)
            .sum();
        units as f32 * size / 1000.0
    }
}

/// Global metrics of a TrueType face, in font units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceMetrics {
    pub units_per_em: u16,
    pub ascender: i16,
    pub descender: i16,
    pub cap_height: i16,
    pub bbox: [i16; 4],
    pub glyph_count: u16,
}

/// A glyph as the renderer needs it: id, advance in font units, source char.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappedGlyph {
    pub id: u16,
    pub advance: u16,
    pub ch: char,
}

/// A registered TrueType face.
pub struct TrueTypeFace {
    family: String,
    postscript_name: String,
    data: Arc<Vec<u8>>,
    metrics: FaceMetrics,
}

impl fmt::Debug for TrueTypeFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrueTypeFace")
            .field("family", &self.family)
            .field("postscript_name", &self.postscript_name)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl TrueTypeFace {
    /// Validates `data` as an embeddable TrueType font.
    pub fn parse(family: &str, data: Vec<u8>) -> Result<Self, FontError> {
        let invalid = |reason: String| FontError::InvalidFont {
            family: family.to_string(),
            reason,
        };
        let face = ttf_parser::Face::parse(&data, 0).map_err(|e| invalid(e.to_string()))?;
        if face.tables().glyf.is_none() {
            return Err(invalid("only fonts with TrueType outlines can be embedded".into()));
        }

        let postscript_name = extract_postscript_name(&face).unwrap_or_else(|| {
            log::warn!("Font '{}' has no usable name record; using the family alias", family);
            family.replace(' ', "")
        });
        let bbox = face.global_bounding_box();
        let metrics = FaceMetrics {
            units_per_em: face.units_per_em(),
            ascender: face.ascender(),
            descender: face.descender(),
            cap_height: face.capital_height().unwrap_or_else(|| face.ascender()),
            bbox: [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max],
            glyph_count: face.number_of_glyphs(),
        };
        drop(face);

        Ok(Self {
            family: family.to_string(),
            postscript_name,
            data: Arc::new(data),
            metrics,
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn postscript_name(&self) -> &str {
        &self.postscript_name
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn metrics(&self) -> &FaceMetrics {
        &self.metrics
    }

    fn face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, 0).ok()
    }

    /// Maps each char of `text` to a glyph. Missing glyphs map to `.notdef`,
    /// except no-break space, which borrows the space glyph.
    pub fn map_text(&self, text: &str) -> Vec<MappedGlyph> {
        let Some(face) = self.face() else {
            return Vec::new();
        };
        text.chars()
            .map(|ch| {
                let glyph = face
                    .glyph_index(ch)
                    .or_else(|| (ch == '\u{a0}').then(|| face.glyph_index(' ')).flatten())
                    .unwrap_or(ttf_parser::GlyphId(0));
                MappedGlyph {
                    id: glyph.0,
                    advance: face.glyph_hor_advance(glyph).unwrap_or(0),
                    ch,
                }
            })
            .collect()
    }

    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = self.map_text(text).iter().map(|g| g.advance as u32).sum();
        self.to_points(units as f32, size)
    }

    /// Converts a length in font units to points at `size`.
    pub fn to_points(&self, units: f32, size: f32) -> f32 {
        units * size / self.metrics.units_per_em.max(1) as f32
    }
}

fn extract_postscript_name(face: &ttf_parser::Face<'_>) -> Option<String> {
    let find = |id: u16| {
        face.names()
            .into_iter()
            .filter(|n| n.name_id == id)
            .find_map(|n| n.to_string())
    };

    if let Some(ps_name) = find(ttf_parser::name_id::POST_SCRIPT_NAME) {
        log::debug!("Found PostScript name (ID 6): {}", ps_name);
        return Some(ps_name);
    }
    find(ttf_parser::name_id::FULL_NAME)
        .or_else(|| find(ttf_parser::name_id::FAMILY))
        .map(|name| name.replace(' ', ""))
}

/// A font resolved for a run of text.
#[derive(Debug, Clone)]
pub enum FontHandle {
    Builtin(BuiltinFont),
    Embedded(Arc<TrueTypeFace>),
}

impl PartialEq for FontHandle {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FontHandle::Builtin(a), FontHandle::Builtin(b)) => a == b,
            (FontHandle::Embedded(a), FontHandle::Embedded(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl FontHandle {
    pub fn is_embedded(&self) -> bool {
        matches!(self, FontHandle::Embedded(_))
    }

    /// The name the font carries in the output document.
    pub fn base_name(&self) -> &str {
        match self {
            FontHandle::Builtin(font) => font.base_name(),
            FontHandle::Embedded(face) => face.postscript_name(),
        }
    }

    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        match self {
            FontHandle::Builtin(font) => font.text_width(text, size),
            FontHandle::Embedded(face) => face.text_width(text, size),
        }
    }

    /// Distance from the baseline to the top of the tallest glyphs.
    pub fn ascent(&self, size: f32) -> f32 {
        match self {
            FontHandle::Builtin(_) => 0.718 * size,
            FontHandle::Embedded(face) => face.to_points(face.metrics().ascender as f32, size),
        }
    }

    /// Distance from the baseline to the bottom of descenders, as a positive number.
    pub fn descent(&self, size: f32) -> f32 {
        match self {
            FontHandle::Builtin(_) => 0.207 * size,
            FontHandle::Embedded(face) => {
                face.to_points(-(face.metrics().descender as f32), size)
            }
        }
    }
}

/// What to do when a style names a font that was never registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Fail with `FontError::NotRegistered`.
    #[default]
    Strict,
    /// Warn once per family and render with Helvetica.
    Builtin,
}

#[derive(Debug, Default)]
pub struct FontLibrary {
    faces: HashMap<String, Arc<TrueTypeFace>>,
    fallback: FallbackPolicy,
    warned: Mutex<HashSet<String>>,
}

impl FontLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback(mut self, policy: FallbackPolicy) -> Self {
        self.fallback = policy;
        self
    }

    pub fn set_fallback(&mut self, policy: FallbackPolicy) {
        self.fallback = policy;
    }

    pub fn fallback(&self) -> FallbackPolicy {
        self.fallback
    }

    /// Registers TrueType `data` under `family`, replacing any earlier face.
    pub fn register_truetype(
        &mut self,
        family: &str,
        data: Vec<u8>,
    ) -> Result<Arc<TrueTypeFace>, FontError> {
        let face = Arc::new(TrueTypeFace::parse(family, data)?);
        log::debug!(
            "Registered font '{}' as family '{}' ({} glyphs)",
            face.postscript_name(),
            family,
            face.metrics().glyph_count
        );
        self.faces.insert(family.to_lowercase(), face.clone());
        Ok(face)
    }

    /// True if `family` resolves without falling back.
    pub fn is_available(&self, family: &str) -> bool {
        BuiltinFont::from_name(family).is_some() || self.faces.contains_key(&family.to_lowercase())
    }

    pub fn registered_faces(&self) -> impl Iterator<Item = &Arc<TrueTypeFace>> {
        self.faces.values()
    }

    pub fn resolve(
        &self,
        family: &str,
        weight: FontWeight,
        style: FontStyle,
    ) -> Result<FontHandle, FontError> {
        if let Some(builtin) = BuiltinFont::from_name(family) {
            return Ok(FontHandle::Builtin(builtin.styled(weight, style)));
        }
        if let Some(face) = self.faces.get(&family.to_lowercase()) {
            return Ok(FontHandle::Embedded(face.clone()));
        }
        match self.fallback {
            FallbackPolicy::Strict => Err(FontError::NotRegistered(family.to_string())),
            FallbackPolicy::Builtin => {
                self.warn_fallback(family);
                Ok(FontHandle::Builtin(BuiltinFont::Helvetica.styled(weight, style)))
            }
        }
    }

    fn warn_fallback(&self, family: &str) {
        let mut warned = match self.warned.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if warned.insert(family.to_lowercase()) {
            log::warn!(
                "Font '{}' is not registered; rendering with {} instead",
                family,
                DEFAULT_FONT
            );
        }
    }

    /// Finds the first installed TrueType font among `candidates` (family names)
    /// and registers it under `family`.
    #[cfg(feature = "system-fonts")]
    pub fn register_system_font(
        &mut self,
        family: &str,
        candidates: &[&str],
    ) -> Result<Arc<TrueTypeFace>, FontError> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        log::debug!("Loaded {} system font faces", db.len());

        for candidate in candidates {
            let query = fontdb::Query {
                families: &[fontdb::Family::Name(*candidate)],
                ..fontdb::Query::default()
            };
            let Some(info) = db.query(&query).and_then(|id| db.face(id)) else {
                continue;
            };
            let fontdb::Source::File(path) = &info.source else {
                continue;
            };
            let is_ttf = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("ttf"));
            if info.index != 0 || !is_ttf {
                log::debug!("Skipping '{}' at {}: not a standalone .ttf", candidate, path.display());
                continue;
            }
            let data = match std::fs::read(path) {
                Ok(data) => data,
                Err(e) => {
                    log::warn!("Could not read {}: {}", path.display(), e);
                    continue;
                }
            };
            match self.register_truetype(family, data) {
                Ok(face) => {
                    log::info!("Using system font '{}' for '{}'", candidate, family);
                    return Ok(face);
                }
                Err(e) => log::debug!("System font '{}' rejected: {}", candidate, e),
            }
        }
        Err(FontError::SystemFontNotFound(candidates.join(", ")))
    }
}
