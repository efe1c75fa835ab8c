// ============================================================================
// PDF Encoding
// ============================================================================
//
// Replays a display list onto printpdf layers. The display list is top-left
// origin in points; printpdf wants bottom-left origin in millimetres.

use std::io::{BufWriter, Cursor, Write};

use chrono::{DateTime, Utc};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color as PdfColor, IndirectFontRef, Line, Mm, OffsetDateTime, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point as PdfPoint, Polygon, Rgb,
};
use uuid::Uuid;

use crate::display::{DisplayList, DrawOp, Shape, TextRun};
use crate::draw::{corners, Color, Font, Point, Surface};
use crate::error::{DocError, Result};
use crate::metrics;

const PT_TO_MM: f32 = 25.4 / 72.0;

/// Identity written into the file metadata. Derived from the request, so the
/// same input always gets the same document id and dates. printpdf still
/// draws fresh instance ids on every save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentStamp {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

impl DocumentStamp {
    pub fn derive(key: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes())
                .simple()
                .to_string(),
            created_at,
        }
    }
}

struct Fonts {
    helvetica: IndirectFontRef,
    helvetica_bold: IndirectFontRef,
    times_bold: IndirectFontRef,
    times_italic: IndirectFontRef,
    times_bold_italic: IndirectFontRef,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> Result<Self> {
        let add = |font: BuiltinFont| {
            doc.add_builtin_font(font)
                .map_err(|e| DocError::Pdf(e.to_string()))
        };
        Ok(Self {
            helvetica: add(BuiltinFont::Helvetica)?,
            helvetica_bold: add(BuiltinFont::HelveticaBold)?,
            times_bold: add(BuiltinFont::TimesBold)?,
            times_italic: add(BuiltinFont::TimesItalic)?,
            times_bold_italic: add(BuiltinFont::TimesBoldItalic)?,
        })
    }

    fn get(&self, font: Font) -> &IndirectFontRef {
        match font {
            Font::Helvetica => &self.helvetica,
            Font::HelveticaBold => &self.helvetica_bold,
            Font::TimesBold => &self.times_bold,
            Font::TimesItalic => &self.times_italic,
            Font::TimesBoldItalic => &self.times_bold_italic,
        }
    }
}

/// Encode every page of `list` into a PDF file held in memory.
pub fn encode(list: &DisplayList, title: &str, stamp: &DocumentStamp) -> Result<Vec<u8>> {
    let pages = list.pages();
    if pages.is_empty() {
        return Err(DocError::Render("document has no pages".to_string()));
    }

    let size = list.page_size();
    let (width_mm, height_mm) = (Mm(size.width * PT_TO_MM), Mm(size.height * PT_TO_MM));
    let date = OffsetDateTime::from_unix_timestamp(stamp.created_at.timestamp())
        .map_err(|e| DocError::Pdf(e.to_string()))?;
    let (doc, page1, layer1) = PdfDocument::new(title, width_mm, height_mm, "Layer 1");
    let doc = doc
        .with_document_id(stamp.id.clone())
        .with_creation_date(date)
        .with_mod_date(date)
        .with_metadata_date(date);
    let fonts = Fonts::load(&doc)?;

    for (idx, page) in pages.iter().enumerate() {
        let layer = if idx == 0 {
            doc.get_page(page1).get_layer(layer1)
        } else {
            let (new_page, new_layer) = doc.add_page(width_mm, height_mm, "Layer 1");
            doc.get_page(new_page).get_layer(new_layer)
        };
        let painter = Painter {
            layer: &layer,
            fonts: &fonts,
            page_height: size.height,
        };
        for op in &page.ops {
            painter.draw(op);
        }
    }

    let mut buf = Vec::new();
    {
        let mut writer = BufWriter::new(Cursor::new(&mut buf));
        doc.save(&mut writer)
            .map_err(|e| DocError::Pdf(e.to_string()))?;
        writer.flush()?;
    }
    Ok(buf)
}

struct Painter<'a> {
    layer: &'a PdfLayerReference,
    fonts: &'a Fonts,
    page_height: f32,
}

impl Painter<'_> {
    fn point(&self, p: Point) -> PdfPoint {
        let (x, y) = to_pdf_mm(p, self.page_height);
        PdfPoint::new(Mm(x), Mm(y))
    }

    fn outline(&self, points: &[Point]) -> Vec<(PdfPoint, bool)> {
        points.iter().map(|p| (self.point(*p), false)).collect()
    }

    fn shape_points(&self, shape: &Shape) -> Vec<(PdfPoint, bool)> {
        match shape {
            Shape::Rect(rect) => self.outline(&corners(rect)),
            Shape::Polygon(points) => self.outline(points),
            Shape::Line(from, to) => self.outline(&[*from, *to]),
        }
    }

    fn draw(&self, op: &DrawOp) {
        match op {
            DrawOp::Fill { shape, color } => {
                self.layer.set_fill_color(pdf_color(*color));
                self.layer.add_polygon(Polygon {
                    rings: vec![self.shape_points(shape)],
                    mode: PaintMode::Fill,
                    winding_order: WindingOrder::NonZero,
                });
            }
            DrawOp::Stroke {
                shape,
                line_width,
                color,
            } => {
                self.layer.set_outline_color(pdf_color(*color));
                self.layer.set_outline_thickness(*line_width);
                self.layer.add_line(Line {
                    points: self.shape_points(shape),
                    is_closed: !matches!(shape, Shape::Line(..)),
                });
            }
            DrawOp::Text(run) => self.text(run),
        }
    }

    fn text(&self, run: &TextRun) {
        let baseline = Point::from_xy(
            run.origin.x,
            run.origin.y + run.size * metrics::ascent(run.font),
        );
        let (x, y) = to_pdf_mm(baseline, self.page_height);
        self.layer.set_fill_color(pdf_color(run.color));
        self.layer.set_character_spacing(run.letter_spacing);
        self.layer.use_text(
            run.content.as_str(),
            run.size,
            Mm(x),
            Mm(y),
            self.fonts.get(run.font),
        );
    }
}

/// Top-left points to bottom-left millimetres.
fn to_pdf_mm(p: Point, page_height: f32) -> (f32, f32) {
    (p.x * PT_TO_MM, (page_height - p.y) * PT_TO_MM)
}

fn pdf_color(color: Color) -> PdfColor {
    let (r, g, b) = color.to_unit();
    PdfColor::Rgb(Rgb::new(r, g, b, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{rect, TextStyle, A4_LANDSCAPE};
    use chrono::TimeZone;

    fn stamp() -> DocumentStamp {
        DocumentStamp::derive("test", Utc.with_ymd_and_hms(2025, 7, 26, 4, 30, 0).unwrap())
    }

    #[test]
    fn empty_list_is_rejected() {
        let list = DisplayList::new(A4_LANDSCAPE);
        assert!(matches!(encode(&list, "x", &stamp()), Err(DocError::Render(_))));
    }

    #[test]
    fn encodes_a_pdf_header_and_every_page() {
        let mut list = DisplayList::new(A4_LANDSCAPE);
        for _ in 0..3 {
            list.begin_page().unwrap();
            list.fill_rect(rect(30.0, 30.0, 750.0, 25.0).unwrap(), Color::hex(0xcbd5e1))
                .unwrap();
            list.draw_text(
                "S.No",
                Point::from_xy(35.0, 38.0),
                &TextStyle::new(Font::HelveticaBold, 10.0),
            )
            .unwrap();
        }

        let bytes = encode(&list, "Test", &stamp()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn stamp_depends_only_on_its_key() {
        let at = Utc.with_ymd_and_hms(2025, 7, 26, 4, 30, 0).unwrap();
        let a = DocumentStamp::derive("certificate:r1:0:0", at);
        assert_eq!(a, DocumentStamp::derive("certificate:r1:0:0", at));
        assert_ne!(a.id, DocumentStamp::derive("certificate:r1:0:1", at).id);
        assert_eq!(a.id.len(), 32);
    }

    #[test]
    fn y_axis_is_flipped() {
        let (x, y) = to_pdf_mm(Point::from_xy(72.0, 0.0), A4_LANDSCAPE.height);
        assert!((x - 25.4).abs() < 1e-4);
        assert!((y - 210.0).abs() < 0.01);

        let (_, bottom) = to_pdf_mm(Point::from_xy(0.0, A4_LANDSCAPE.height), A4_LANDSCAPE.height);
        assert_eq!(bottom, 0.0);
    }
}
