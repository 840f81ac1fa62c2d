//! Font resources of a document.
//!
//! Builtin fonts are referenced as standard Type1 fonts with WinAnsiEncoding.
//! TrueType faces are embedded whole as a Type0/CIDFontType2 pair with
//! Identity-H encoding, so text is written as two-byte glyph ids. The glyphs
//! actually shown are tracked to build the `W` array and the ToUnicode CMap.

use crate::error::RenderError;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use sheets_layout::afm::encode_win_ansi;
use sheets_layout::{BuiltinFont, FontHandle, TrueTypeFace};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::Write;
use std::sync::Arc;

const BFCHAR_BLOCK: usize = 100;

struct EmbeddedUsage {
    face: Arc<TrueTypeFace>,
    /// gid -> (advance in font units, first char shown with it)
    glyphs: BTreeMap<u16, (u16, char)>,
}

enum FontEntry {
    Builtin(BuiltinFont),
    Embedded(EmbeddedUsage),
}

impl FontEntry {
    fn matches(&self, font: &FontHandle) -> bool {
        match (self, font) {
            (FontEntry::Builtin(a), FontHandle::Builtin(b)) => a == b,
            (FontEntry::Embedded(usage), FontHandle::Embedded(face)) => Arc::ptr_eq(&usage.face, face),
            _ => false,
        }
    }
}

/// Assigns resource names (`F1`, `F2`, ...) to fonts in first-use order.
#[derive(Default)]
pub struct FontResources {
    entries: Vec<(String, FontEntry)>,
}

impl FontResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_index(&mut self, font: &FontHandle) -> usize {
        if let Some(index) = self.entries.iter().position(|(_, e)| e.matches(font)) {
            return index;
        }
        let name = format!("F{}", self.entries.len() + 1);
        let entry = match font {
            FontHandle::Builtin(builtin) => FontEntry::Builtin(*builtin),
            FontHandle::Embedded(face) => FontEntry::Embedded(EmbeddedUsage {
                face: face.clone(),
                glyphs: BTreeMap::new(),
            }),
        };
        log::debug!("Font '{}' is resource /{}", font.base_name(), name);
        self.entries.push((name, entry));
        self.entries.len() - 1
    }

    /// Returns the resource name for `font` and `text` encoded as a show-text operand.
    pub fn encode(&mut self, font: &FontHandle, text: &str) -> (String, Object) {
        let index = self.entry_index(font);
        let (name, entry) = &mut self.entries[index];
        let operand = match entry {
            FontEntry::Builtin(_) => Object::String(encode_win_ansi(text), StringFormat::Literal),
            FontEntry::Embedded(usage) => {
                let glyphs = usage.face.map_text(text);
                let mut bytes = Vec::with_capacity(glyphs.len() * 2);
                for glyph in glyphs {
                    usage.glyphs.entry(glyph.id).or_insert((glyph.advance, glyph.ch));
                    bytes.extend_from_slice(&glyph.id.to_be_bytes());
                }
                Object::String(bytes, StringFormat::Hexadecimal)
            }
        };
        (name.clone(), operand)
    }

    /// Adds the font objects to `doc` and returns the `/Font` resource dictionary.
    pub fn build(self, doc: &mut Document) -> Result<Dictionary, RenderError> {
        let mut fonts = Dictionary::new();
        for (name, entry) in self.entries {
            let id = match entry {
                FontEntry::Builtin(font) => doc.add_object(dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => font.base_name(),
                    "Encoding" => "WinAnsiEncoding",
                }),
                FontEntry::Embedded(usage) => embed_truetype(doc, &usage)?,
            };
            fonts.set(name.as_bytes(), id);
        }
        Ok(fonts)
    }
}

fn embed_truetype(doc: &mut Document, usage: &EmbeddedUsage) -> Result<ObjectId, RenderError> {
    let face = &usage.face;
    let metrics = face.metrics();
    let base_font = face.postscript_name().to_string();
    let upem = metrics.units_per_em.max(1) as f32;
    let scale = |units: f32| (units * 1000.0 / upem).round() as i64;

    let data = face.data();
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| RenderError::Font(base_font.clone(), e.to_string()))?;
    let compressed = encoder
        .finish()
        .map_err(|e| RenderError::Font(base_font.clone(), e.to_string()))?;
    let file_id = doc.add_object(Stream::new(
        dictionary! {
            "Filter" => "FlateDecode",
            "Length1" => data.len() as i64,
        },
        compressed,
    ));

    let [x_min, y_min, x_max, y_max] = metrics.bbox;
    let descriptor_id = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => base_font.clone(),
        "Flags" => 4,
        "FontBBox" => vec![
            scale(x_min as f32).into(),
            scale(y_min as f32).into(),
            scale(x_max as f32).into(),
            scale(y_max as f32).into(),
        ],
        "ItalicAngle" => 0,
        "Ascent" => scale(metrics.ascender as f32),
        "Descent" => scale(metrics.descender as f32),
        "CapHeight" => scale(metrics.cap_height as f32),
        "StemV" => 80,
        "FontFile2" => file_id,
    });

    let widths = usage
        .glyphs
        .iter()
        .map(|(&gid, &(advance, _))| (gid, scale(advance as f32)))
        .collect::<Vec<_>>();
    let cid_font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => base_font.clone(),
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0,
        },
        "FontDescriptor" => descriptor_id,
        "DW" => 1000,
        "W" => width_array(&widths),
        "CIDToGIDMap" => "Identity",
    });

    let cmap = to_unicode_cmap(&usage.glyphs);
    let to_unicode_id = doc.add_object(Stream::new(Dictionary::new(), cmap.into_bytes()));

    log::debug!(
        "Embedded '{}' ({} bytes, {} glyphs used)",
        base_font,
        data.len(),
        usage.glyphs.len()
    );
    Ok(doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => base_font,
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::Reference(cid_font_id)],
        "ToUnicode" => to_unicode_id,
    }))
}

/// Groups consecutive glyph ids: `[first [w1 w2 ...] first [...] ...]`.
fn width_array(widths: &[(u16, i64)]) -> Vec<Object> {
    let mut array = Vec::new();
    let mut run_start: Option<u16> = None;
    let mut run: Vec<Object> = Vec::new();
    let mut last_gid = 0u16;

    for &(gid, width) in widths {
        match run_start {
            Some(_) if gid == last_gid.wrapping_add(1) => run.push(width.into()),
            _ => {
                if let Some(start) = run_start {
                    array.push((start as i64).into());
                    array.push(Object::Array(std::mem::take(&mut run)));
                }
                run_start = Some(gid);
                run.push(width.into());
            }
        }
        last_gid = gid;
    }
    if let Some(start) = run_start {
        array.push((start as i64).into());
        array.push(Object::Array(run));
    }
    array
}

fn to_unicode_cmap(glyphs: &BTreeMap<u16, (u16, char)>) -> String {
    let mappings: Vec<(u16, char)> = glyphs
        .iter()
        .filter(|(gid, _)| **gid != 0)
        .map(|(&gid, &(_, ch))| (gid, ch))
        .collect();

    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );
    for block in mappings.chunks(BFCHAR_BLOCK) {
        let _ = writeln!(cmap, "{} beginbfchar", block.len());
        for (gid, ch) in block {
            let mut units = [0u16; 2];
            let utf16: String = ch
                .encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{u:04X}"))
                .collect();
            let _ = writeln!(cmap, "<{gid:04X}> <{utf16}>");
        }
        cmap.push_str("endbfchar\n");
    }
    cmap.push_str(
        "endcmap\n\
         CMapName currentdict /CMap defineresource pop\n\
         end\n\
         end\n",
    );
    cmap
}
