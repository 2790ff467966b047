//! # PDF Serializer
//!
//! Writes a [`PageModel`] as a single-page PDF through `printpdf`.
//!
//! ## Op Mapping
//! ```text
//! ┌───────────────┬──────────────────────────────────────────────────────┐
//! │ DrawOp        │ printpdf                                             │
//! ├───────────────┼──────────────────────────────────────────────────────┤
//! │ Text          │ fill colour → use_text(builtin font, size, x, y)     │
//! │ Line          │ outline colour + thickness → add_line                │
//! │ Rect          │ fill / outline colour → add_polygon (4-point ring)   │
//! │               │   fill only → Fill, stroke only → Stroke, both →     │
//! │               │   FillStroke, neither → nothing drawn                │
//! └───────────────┴──────────────────────────────────────────────────────┘
//! ```
//!
//! Page model coordinates are PDF points; printpdf takes millimetres, so
//! every coordinate goes through [`Pt`] → [`Mm`]. Each op runs inside its
//! own saved graphics state.
//!
//! Fonts are the standard Type1 faces, referenced by name and never
//! embedded. All draw ops are checked by [`PdfWriter::validate`] before a
//! document is created.

use std::borrow::Cow;
use std::io::BufWriter;

use chrono::NaiveDateTime;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon, Pt,
};
use time::OffsetDateTime;

use crate::error::{SerializationError, SerializationResult};
use crate::layout::{DrawOp, FontFace, PageModel, Rgb};

const LAYER_NAME: &str = "Quotation";

// =============================================================================
// Writer
// =============================================================================

/// Serializes pages with a fixed set of registered fonts.
#[derive(Debug, Clone)]
pub struct PdfWriter {
    fonts: Vec<FontFace>,
    title: String,
    created_at: Option<NaiveDateTime>,
}

impl Default for PdfWriter {
    /// Helvetica and Helvetica-Bold, which is all the quotation layout uses.
    fn default() -> Self {
        PdfWriter::new([FontFace::Helvetica, FontFace::HelveticaBold])
    }
}

impl PdfWriter {
    /// Creates a writer that can set text in `fonts`. Duplicates are ignored.
    pub fn new(fonts: impl IntoIterator<Item = FontFace>) -> Self {
        let mut registered = Vec::new();
        for font in fonts {
            if !registered.contains(&font) {
                registered.push(font);
            }
        }
        PdfWriter {
            fonts: registered,
            title: String::new(),
            created_at: None,
        }
    }

    /// Sets the document title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the creation and modification dates. printpdf stamps the
    /// current time when never set.
    pub fn created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn fonts(&self) -> &[FontFace] {
        &self.fonts
    }

    /// Checks every op without producing output.
    ///
    /// ## Errors
    /// The first [`SerializationError`] found, in op order.
    pub fn validate(&self, ops: &[DrawOp]) -> SerializationResult<()> {
        for (index, op) in ops.iter().enumerate() {
            match op {
                DrawOp::Text {
                    x,
                    y,
                    size,
                    font,
                    color,
                    ..
                } => {
                    finite(index, "x", *x)?;
                    finite(index, "y", *y)?;
                    finite(index, "size", *size)?;
                    if *size <= 0.0 {
                        return Err(SerializationError::InvalidFontSize { index, size: *size });
                    }
                    if !self.fonts.contains(font) {
                        return Err(SerializationError::UnembeddedFont(*font));
                    }
                    in_range(index, color)?;
                }
                DrawOp::Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    thickness,
                    color,
                } => {
                    finite(index, "x1", *x1)?;
                    finite(index, "y1", *y1)?;
                    finite(index, "x2", *x2)?;
                    finite(index, "y2", *y2)?;
                    finite(index, "thickness", *thickness)?;
                    in_range(index, color)?;
                }
                DrawOp::Rect {
                    x,
                    y,
                    width,
                    height,
                    fill,
                    stroke,
                } => {
                    finite(index, "x", *x)?;
                    finite(index, "y", *y)?;
                    finite(index, "width", *width)?;
                    finite(index, "height", *height)?;
                    if let Some(fill) = fill {
                        in_range(index, fill)?;
                    }
                    if let Some(stroke) = stroke {
                        finite(index, "stroke width", stroke.width)?;
                        in_range(index, &stroke.color)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Serializes one page.
    ///
    /// ## Errors
    /// - whatever [`PdfWriter::validate`] reports, before printpdf is touched
    /// - [`SerializationError::Pdf`] when printpdf fails to load a font or
    ///   to save the document
    pub fn write(&self, page: &PageModel) -> SerializationResult<Vec<u8>> {
        self.validate(&page.ops)?;
        finite(0, "page width", page.size.width)?;
        finite(0, "page height", page.size.height)?;

        let (doc, page_index, layer_index) = PdfDocument::new(
            self.title.as_str(),
            mm(page.size.width),
            mm(page.size.height),
            LAYER_NAME,
        );
        let doc = match self.created_at.and_then(to_offset) {
            Some(stamp) => doc.with_creation_date(stamp).with_mod_date(stamp),
            None => doc,
        };

        let fonts = self.load_fonts(&doc)?;
        let layer = doc.get_page(page_index).get_layer(layer_index);
        for op in &page.ops {
            layer.save_graphics_state();
            draw(&layer, &fonts, op);
            layer.restore_graphics_state();
        }

        let mut out = BufWriter::new(Vec::new());
        doc.save(&mut out)
            .map_err(|e| SerializationError::Pdf(e.to_string()))?;
        out.into_inner()
            .map_err(|e| SerializationError::Pdf(e.to_string()))
    }

    fn load_fonts(
        &self,
        doc: &PdfDocumentReference,
    ) -> SerializationResult<Vec<(FontFace, IndirectFontRef)>> {
        self.fonts
            .iter()
            .map(|face| {
                doc.add_builtin_font(builtin(*face))
                    .map(|font| (*face, font))
                    .map_err(|e| SerializationError::Pdf(e.to_string()))
            })
            .collect()
    }
}

/// Serializes a page with the default fonts.
pub fn serialize_page(
    page: &PageModel,
    title: &str,
    created_at: NaiveDateTime,
) -> SerializationResult<Vec<u8>> {
    PdfWriter::default()
        .title(title)
        .created_at(created_at)
        .write(page)
}

// =============================================================================
// Drawing
// =============================================================================

fn draw(layer: &PdfLayerReference, fonts: &[(FontFace, IndirectFontRef)], op: &DrawOp) {
    match op {
        DrawOp::Text {
            text,
            x,
            y,
            size,
            font,
            color,
        } => {
            // validate() has already rejected unregistered fonts.
            let Some((_, font)) = fonts.iter().find(|(face, _)| face == font) else {
                return;
            };
            layer.set_fill_color(color_of(color));
            layer.use_text(winansi(text), *size as f32, mm(*x), mm(*y), font);
        }
        DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            thickness,
            color,
        } => {
            layer.set_outline_color(color_of(color));
            layer.set_outline_thickness(*thickness as f32);
            layer.add_line(Line {
                points: vec![(point(*x1, *y1), false), (point(*x2, *y2), false)],
                is_closed: false,
            });
        }
        DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
        } => {
            let mode = match (fill, stroke) {
                (Some(_), Some(_)) => PaintMode::FillStroke,
                (Some(_), None) => PaintMode::Fill,
                (None, Some(_)) => PaintMode::Stroke,
                (None, None) => return,
            };
            if let Some(fill) = fill {
                layer.set_fill_color(color_of(fill));
            }
            if let Some(stroke) = stroke {
                layer.set_outline_color(color_of(&stroke.color));
                layer.set_outline_thickness(stroke.width as f32);
            }
            layer.add_polygon(Polygon {
                rings: vec![vec![
                    (point(*x, *y), false),
                    (point(x + width, *y), false),
                    (point(x + width, y + height), false),
                    (point(*x, y + height), false),
                ]],
                mode,
                winding_order: WindingOrder::NonZero,
            });
        }
    }
}

fn builtin(face: FontFace) -> BuiltinFont {
    match face {
        FontFace::Helvetica => BuiltinFont::Helvetica,
        FontFace::HelveticaBold => BuiltinFont::HelveticaBold,
        FontFace::Courier => BuiltinFont::Courier,
    }
}

fn mm(points: f64) -> Mm {
    Mm::from(Pt(points as f32))
}

fn point(x: f64, y: f64) -> Point {
    Point::new(mm(x), mm(y))
}

fn color_of(color: &Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(
        color.r as f32,
        color.g as f32,
        color.b as f32,
        None,
    ))
}

fn to_offset(created_at: NaiveDateTime) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(created_at.and_utc().timestamp()).ok()
}

/// Replaces characters WinAnsiEncoding cannot hold with `?`.
///
/// The builtin faces are set in WinAnsi, which covers printable ASCII and
/// the Latin-1 block.
fn winansi(text: &str) -> Cow<'_, str> {
    let encodable = |ch: char| matches!(ch, ' '..='~' | '\u{a0}'..='\u{ff}');
    if text.chars().all(encodable) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(
            text.chars()
                .map(|ch| if encodable(ch) { ch } else { '?' })
                .collect(),
        )
    }
}

// =============================================================================
// Validation Helpers
// =============================================================================

fn finite(index: usize, field: &'static str, value: f64) -> SerializationResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SerializationError::NonFiniteValue { index, field })
    }
}

fn in_range(index: usize, color: &Rgb) -> SerializationResult<()> {
    match color
        .channels()
        .into_iter()
        .find(|c| !(0.0..=1.0).contains(c))
    {
        Some(value) => Err(SerializationError::ColorOutOfRange { index, value }),
        None => Ok(()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
