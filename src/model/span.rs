//! Text spans and bounding boxes as supplied by the layout extractor.

use serde::{Deserialize, Serialize};

/// An axis-aligned box in page coordinates.
///
/// `y` is the top edge in a top-down coordinate space; spans supplied in a
/// bottom-up space are flipped on ingest (see [`YAxis`](crate::YAxis)).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl BBox {
    /// Create a new bounding box.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        BBox::new(x, y, right - x, bottom - y)
    }
}

/// A text span with position and style information.
///
/// Spans are produced by an external extractor and never mutated by the
/// pipeline; the normalizer only groups them into [`Line`](super::Line)s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// Font size in points; `None` when the extractor lost font metadata
    #[serde(default, alias = "font_size", alias = "size")]
    pub font_size: Option<f32>,
    /// Whether the span is set in a bold face
    #[serde(default, alias = "is_bold", alias = "bold")]
    pub is_bold: bool,
    /// Font name (e.g., "Helvetica-Bold"), used as a boldness hint
    #[serde(default, alias = "font_name", alias = "font", skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,
    /// Page number as supplied by the extractor
    pub page: u32,
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width of the text
    #[serde(default)]
    pub width: f32,
    /// Height of the text
    #[serde(default)]
    pub height: f32,
}

impl TextSpan {
    /// Create a new text span without width or height.
    pub fn new(text: impl Into<String>, page: u32, x: f32, y: f32, font_size: f32) -> Self {
        Self {
            text: text.into(),
            font_size: Some(font_size),
            is_bold: false,
            font_name: None,
            page,
            x,
            y,
            width: 0.0,
            height: font_size,
        }
    }

    /// Mark the span as bold.
    pub fn bold(mut self) -> Self {
        self.is_bold = true;
        self
    }

    /// Set the span extent.
    pub fn with_extent(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the font name; bold, black and heavy faces mark the span bold.
    pub fn with_font_name(mut self, name: impl Into<String>) -> Self {
        self.font_name = Some(name.into());
        self
    }

    /// Drop font size metadata (as a degraded extractor would).
    pub fn without_font_size(mut self) -> Self {
        self.font_size = None;
        self
    }

    /// Whether the span uses a bold face, either flagged or implied by the font name.
    pub fn is_bold_face(&self) -> bool {
        if self.is_bold {
            return true;
        }
        self.font_name.as_deref().is_some_and(|name| {
            let name = name.to_lowercase();
            name.contains("bold") || name.contains("black") || name.contains("heavy")
        })
    }

    /// Usable font size, if the metadata is present and sane.
    pub fn usable_font_size(&self) -> Option<f32> {
        self.font_size.filter(|s| s.is_finite() && *s > 0.0)
    }

    /// Whether all coordinates are finite.
    pub fn has_finite_geometry(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Effective height, falling back to the font size.
    pub fn effective_height(&self) -> f32 {
        if self.height > 0.0 {
            self.height
        } else {
            self.usable_font_size().unwrap_or(0.0)
        }
    }

    /// Effective width, estimated from the character count when missing.
    pub fn effective_width(&self) -> f32 {
        if self.width > 0.0 {
            self.width
        } else {
            self.text.chars().count() as f32 * self.nominal_size() * 0.5
        }
    }

    /// Font size for geometric estimates; degraded spans use their height.
    pub fn nominal_size(&self) -> f32 {
        self.usable_font_size()
            .unwrap_or(if self.height > 0.0 { self.height } else { 10.0 })
    }

    /// Bounding box of the span.
    pub fn bbox(&self) -> BBox {
        BBox::new(self.x, self.y, self.effective_width(), self.effective_height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_from_font_name() {
        let span = TextSpan::new("Test", 1, 0.0, 0.0, 12.0).with_font_name("Helvetica-Bold");
        assert!(span.is_bold_face());

        let span = TextSpan::new("Test", 1, 0.0, 0.0, 12.0).with_font_name("Helvetica-Oblique");
        assert!(!span.is_bold_face());
    }

    #[test]
    fn test_usable_font_size() {
        let span = TextSpan::new("Test", 1, 0.0, 0.0, 12.0);
        assert_eq!(span.usable_font_size(), Some(12.0));
        assert_eq!(span.clone().without_font_size().usable_font_size(), None);

        let mut zero = span;
        zero.font_size = Some(0.0);
        assert_eq!(zero.usable_font_size(), None);
    }

    #[test]
    fn test_deserialize_camel_and_snake_case() {
        let json = r#"{"text":"Intro","fontSize":18,"isBold":true,"page":1,"x":72,"y":90}"#;
        let span: TextSpan = serde_json::from_str(json).unwrap();
        assert_eq!(span.font_size, Some(18.0));
        assert!(span.is_bold);

        let json = r#"{"text":"Intro","font_size":18,"page":1,"x":72,"y":90}"#;
        let span: TextSpan = serde_json::from_str(json).unwrap();
        assert_eq!(span.font_size, Some(18.0));
        assert_eq!(span.width, 0.0);
    }

    #[test]
    fn test_bbox_union() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(5.0, 5.0, 10.0, 10.0);
        let u = a.union(&b);
        assert_eq!(u, BBox::new(0.0, 0.0, 15.0, 15.0));
    }
}
