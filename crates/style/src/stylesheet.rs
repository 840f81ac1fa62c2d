//! The immutable registry of named paragraph styles, and page geometry.

use crate::dimension::{Margins, PageSize};
use crate::paragraph::ParagraphStyle;
use serde::{Deserialize, Serialize};
use sheets_types::{Rect, Size};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleError {
    #[error("Unknown paragraph style '{0}'")]
    UnknownStyle(String),
    #[error("Style '{style}' inherits from unknown style '{parent}'")]
    UnknownParent { style: String, parent: String },
    #[error("Style '{0}' is part of an inheritance cycle")]
    InheritanceCycle(String),
    #[error("Style '{0}' is defined more than once")]
    DuplicateStyle(String),
}

/// Named paragraph styles, validated once and never mutated afterwards.
///
/// Share it as `Arc<StyleRegistry>`; nothing in the rendering path holds
/// style state of its own.
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
    styles: HashMap<String, Arc<ParagraphStyle>>,
}

impl StyleRegistry {
    pub fn builder() -> StyleRegistryBuilder {
        StyleRegistryBuilder::default()
    }

    /// A builder pre-seeded with the base sheet: `Normal`, `Heading1`, `Heading2`.
    pub fn sample() -> StyleRegistryBuilder {
        Self::builder()
            .add(
                ParagraphStyle::new("Normal")
                    .font_name("Helvetica")
                    .font_size(10.0)
                    .leading(12.0),
            )
            .add(
                ParagraphStyle::new("Heading1")
                    .parent("Normal")
                    .font_name("Helvetica-Bold")
                    .font_size(18.0)
                    .leading(22.0)
                    .space_after(6.0),
            )
            .add(
                ParagraphStyle::new("Heading2")
                    .parent("Normal")
                    .font_name("Helvetica-Bold")
                    .font_size(14.0)
                    .leading(18.0)
                    .space_before(12.0)
                    .space_after(6.0),
            )
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ParagraphStyle>> {
        self.styles.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }

    pub fn require(&self, name: &str) -> Result<&Arc<ParagraphStyle>, StyleError> {
        self.get(name)
            .ok_or_else(|| StyleError::UnknownStyle(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// The inheritance chain of `name`, root ancestor first and `name` last.
    pub fn lineage(&self, name: &str) -> Result<Vec<&ParagraphStyle>, StyleError> {
        let mut chain = Vec::new();
        let mut current = Some(name);
        while let Some(style_name) = current {
            let style = self.require(style_name)?;
            if chain.len() > self.styles.len() {
                return Err(StyleError::InheritanceCycle(name.to_string()));
            }
            chain.push(style.as_ref());
            current = style.parent.as_deref();
        }
        chain.reverse();
        Ok(chain)
    }
}

#[derive(Debug, Default)]
pub struct StyleRegistryBuilder {
    styles: Vec<ParagraphStyle>,
}

impl StyleRegistryBuilder {
    pub fn add(mut self, style: ParagraphStyle) -> Self {
        self.styles.push(style);
        self
    }

    pub fn build(self) -> Result<StyleRegistry, StyleError> {
        let mut styles = HashMap::with_capacity(self.styles.len());
        for style in self.styles {
            if styles.contains_key(&style.name) {
                return Err(StyleError::DuplicateStyle(style.name));
            }
            styles.insert(style.name.clone(), Arc::new(style));
        }

        for style in styles.values() {
            if let Some(parent) = &style.parent {
                if !styles.contains_key(parent) {
                    return Err(StyleError::UnknownParent {
                        style: style.name.clone(),
                        parent: parent.clone(),
                    });
                }
            }
        }

        let registry = StyleRegistry { styles };
        for name in registry.styles.keys() {
            registry.lineage(name)?;
        }
        Ok(registry)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageLayout {
    #[serde(default)]
    pub size: PageSize,
    #[serde(default)]
    pub margins: Margins,
}

impl PageLayout {
    pub fn new(size: PageSize, margins: Margins) -> Self {
        Self { size, margins }
    }

    /// An A4 page with the same margin on every side.
    pub fn a4(margin: f32) -> Self {
        Self::new(PageSize::A4, Margins::all(margin))
    }

    pub fn page_size(&self) -> Size {
        let (width, height) = self.size.dimensions_pt();
        Size::new(width, height)
    }

    /// The frame content flows into, measured from the top-left page corner.
    pub fn content_rect(&self) -> Rect {
        let page = self.page_size();
        Rect::new(
            self.margins.left,
            self.margins.top,
            (page.width - self.margins.horizontal()).max(0.0),
            (page.height - self.margins.vertical()).max(0.0),
        )
    }
}
