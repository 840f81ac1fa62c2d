use crate::content::PageContext;
use crate::error::RenderError;
use crate::fonts::FontResources;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use sheets_layout::Page;
use sheets_types::Size;
use std::io::Write;

const PRODUCER: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

/// An in-memory PDF renderer using the `lopdf` library.
/// Pages are added one at a time; fonts and the page tree are written by `finish`.
pub struct PdfRenderer {
    document: Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    page_ids: Vec<ObjectId>,
    fonts: FontResources,
    title: Option<String>,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfRenderer {
    pub fn new() -> Self {
        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();
        let resources_id = document.new_object_id();
        Self {
            document,
            pages_id,
            resources_id,
            page_ids: Vec::new(),
            fonts: FontResources::new(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    pub fn render_page(&mut self, page: &Page, size: Size) -> Result<ObjectId, RenderError> {
        let mut ctx = PageContext::new(size.height, &mut self.fonts);
        for element in &page.elements {
            ctx.draw_element(element);
        }
        let content = ctx.finish();

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&content.encode()?)?;
        let compressed = encoder.finish()?;
        let content_id = self.document.add_object(Stream::new(
            dictionary! { "Filter" => "FlateDecode" },
            compressed,
        ));

        let page_id = self.document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.0.into(), 0.0.into(), size.width.into(), size.height.into()],
            "Contents" => content_id,
            "Resources" => self.resources_id,
        });
        self.page_ids.push(page_id);
        log::trace!("Rendered page {} ({} elements)", self.page_ids.len(), page.elements.len());
        Ok(page_id)
    }

    /// Writes the finished document to `writer`.
    pub fn finish<W: Write>(mut self, writer: &mut W) -> Result<(), RenderError> {
        if self.page_ids.is_empty() {
            return Err(RenderError::NoPages);
        }

        let font_dict = self.fonts.build(&mut self.document)?;
        self.document.objects.insert(
            self.resources_id,
            Object::Dictionary(dictionary! { "Font" => font_dict }),
        );

        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => self.page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<Object>>(),
            "Count" => self.page_ids.len() as i64,
        };
        self.document
            .objects
            .insert(self.pages_id, Object::Dictionary(pages_dict));

        let catalog_id = self
            .document
            .add_object(dictionary! { "Type" => "Catalog", "Pages" => self.pages_id });
        self.document.trailer.set("Root", catalog_id);

        let info_id = self.document.add_object(info_dictionary(self.title.as_deref()));
        self.document.trailer.set("Info", info_id);

        self.document.save_to(writer)?;
        Ok(())
    }
}

fn info_dictionary(title: Option<&str>) -> Dictionary {
    let created = chrono::Local::now().format("D:%Y%m%d%H%M%S").to_string();
    let mut info = dictionary! {
        "Producer" => Object::string_literal(PRODUCER),
        "CreationDate" => Object::string_literal(created),
    };
    if let Some(title) = title {
        info.set("Title", text_string(title));
    }
    info
}

/// A PDF text string: literal when ASCII, otherwise UTF-16BE with a byte order mark.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Renders `pages` at `size` and writes the document to `writer`.
pub fn render_document<W: Write>(
    pages: &[Page],
    size: Size,
    title: Option<&str>,
    writer: &mut W,
) -> Result<(), RenderError> {
    let mut renderer = PdfRenderer::new();
    if let Some(title) = title {
        renderer = renderer.with_title(title);
    }
    for page in pages {
        renderer.render_page(page, size)?;
    }
    renderer.finish(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheets_layout::{
        BuiltinFont, FontHandle, LayoutElement, PositionedElement, TextElement, TrueTypeFace,
    };
    use sheets_types::Color;
    use std::sync::Arc;

    #[test]
    fn non_ascii_titles_are_utf16() {
        match text_string("敬語") {
            Object::String(bytes, StringFormat::Hexadecimal) => {
                assert_eq!(bytes, vec![0xFE, 0xFF, 0x65, 0x6C, 0x8A, 0x9E]);
            }
            other => panic!("unexpected title object {other:?}"),
        }
    }

    fn system_truetype() -> Option<Vec<u8>> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        db.faces().find_map(|face| match &face.source {
            fontdb::Source::File(path)
                if face.index == 0 && path.extension().is_some_and(|e| e == "ttf") =>
            {
                std::fs::read(path).ok()
            }
            _ => None,
        })
    }

    fn page_with_text(font: FontHandle, text: &str) -> Page {
        Page {
            elements: vec![PositionedElement {
                x: 72.0,
                y: 72.0,
                width: 100.0,
                height: 12.0,
                block_index: 0,
                element: LayoutElement::Text(TextElement {
                    content: text.to_string(),
                    font,
                    font_size: 10.0,
                    color: Color::BLACK,
                    baseline: 81.0,
                    synthetic_bold: false,
                    synthetic_italic: false,
                }),
            }],
        }
    }

    #[test]
    fn builtin_document_loads_back() {
        let page = page_with_text(FontHandle::Builtin(BuiltinFont::Helvetica), "Hello");
        let mut out = Vec::new();
        render_document(&[page.clone(), page], Size::new(595.28, 841.89), Some("Test"), &mut out)
            .unwrap();
        assert!(out.starts_with(b"%PDF-1.7"));
        let doc = Document::load_mem(&out).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn truetype_fonts_are_embedded_as_type0() {
        let Some(data) = system_truetype() else {
            eprintln!("no system TrueType font found; skipping");
            return;
        };
        let face = match TrueTypeFace::parse("Embedded", data) {
            Ok(face) => Arc::new(face),
            Err(e) => {
                eprintln!("system font unusable ({e}); skipping");
                return;
            }
        };
        let page = page_with_text(FontHandle::Embedded(face), "abc");
        let mut out = Vec::new();
        render_document(&[page], Size::new(595.28, 841.89), None, &mut out).unwrap();

        let doc = Document::load_mem(&out).unwrap();
        let type0 = doc.objects.values().any(|obj| {
            obj.as_dict()
                .ok()
                .and_then(|d| d.get(b"Subtype").ok())
                .and_then(|s| s.as_name().ok())
                == Some(b"Type0".as_slice())
        });
        assert!(type0);
    }

    #[test]
    fn finishing_without_pages_fails() {
        let mut out = Vec::new();
        assert!(matches!(
            PdfRenderer::new().finish(&mut out),
            Err(RenderError::NoPages)
        ));
    }
}
