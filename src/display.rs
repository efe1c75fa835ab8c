// ============================================================================
// Display List
// ============================================================================
//
// The request-local page buffer. Renderers draw into it, then the PDF
// encoder replays it. Text is resolved here (ellipsis, alignment) so two
// renders of the same input compare equal op for op.

use tracing::trace;

use crate::cancel::CancelToken;
use crate::draw::{
    corners, is_axis_aligned, Align, Color, Font, Point, Rect, Size, Surface, TextStyle, Transform,
};
use crate::error::{DocError, Result};
use crate::metrics;

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect(Rect),
    /// Closed outline, used for rectangles under a non-quarter-turn rotation.
    Polygon(Vec<Point>),
    Line(Point, Point),
}

/// A single positioned run of text, already fitted and aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub content: String,
    /// Top-left corner of the run.
    pub origin: Point,
    pub font: Font,
    pub size: f32,
    pub color: Color,
    pub letter_spacing: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Fill { shape: Shape, color: Color },
    Stroke { shape: Shape, line_width: f32, color: Color },
    Text(TextRun),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(run) => Some(run),
            _ => None,
        })
    }

    pub fn find_text(&self, content: &str) -> Option<&TextRun> {
        self.texts().find(|run| run.content == content)
    }

    /// Filled axis-aligned rectangles with their colors, in drawing order.
    pub fn filled_rects(&self) -> impl Iterator<Item = (&Rect, Color)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Fill {
                shape: Shape::Rect(rect),
                color,
            } => Some((rect, *color)),
            _ => None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct DisplayList {
    size: Size,
    pages: Vec<Page>,
    transforms: Vec<Transform>,
    cancel: Option<CancelToken>,
}

impl PartialEq for DisplayList {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.pages == other.pages
    }
}

impl DisplayList {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            pages: Vec::new(),
            transforms: Vec::new(),
            cancel: None,
        }
    }

    /// Stop accepting new pages once `token` is cancelled.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn transform_depth(&self) -> usize {
        self.transforms.len()
    }

    fn current_transform(&self) -> Transform {
        self.transforms.last().copied().unwrap_or_default()
    }

    fn push_op(&mut self, op: DrawOp) -> Result<()> {
        let page = self
            .pages
            .last_mut()
            .ok_or_else(|| DocError::Render("drawing before the first page".to_string()))?;
        page.ops.push(op);
        Ok(())
    }

    fn map_rect(&self, rect: Rect) -> Result<Shape> {
        let transform = self.current_transform();
        let mut points = corners(&rect);
        transform.map_points(&mut points);
        if !points.iter().all(|p| p.x.is_finite() && p.y.is_finite()) {
            return Err(DocError::Render(format!("non-finite rectangle {:?}", rect)));
        }
        if !is_axis_aligned(&transform) {
            return Ok(Shape::Polygon(points.to_vec()));
        }
        let min_x = points.iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
        let min_y = points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let max_x = points.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max);
        let max_y = points.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
        Rect::from_ltrb(min_x, min_y, max_x, max_y)
            .map(Shape::Rect)
            .ok_or_else(|| DocError::Render(format!("degenerate rectangle {:?}", rect)))
    }

    fn map_point(&self, p: Point) -> Result<Point> {
        if !(p.x.is_finite() && p.y.is_finite()) {
            return Err(DocError::Render(format!("non-finite point {:?}", p)));
        }
        let mut mapped = p;
        self.current_transform().map_point(&mut mapped);
        Ok(mapped)
    }
}

impl Surface for DisplayList {
    fn page_size(&self) -> Size {
        self.size
    }

    fn begin_page(&mut self) -> Result<()> {
        if self.cancel.as_ref().map_or(false, CancelToken::is_cancelled) {
            return Err(DocError::Cancelled(0));
        }
        self.pages.push(Page::default());
        trace!(page = self.pages.len(), "began page");
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()> {
        let shape = self.map_rect(rect)?;
        self.push_op(DrawOp::Fill { shape, color })
    }

    fn stroke_rect(&mut self, rect: Rect, line_width: f32, color: Color) -> Result<()> {
        let shape = self.map_rect(rect)?;
        self.push_op(DrawOp::Stroke {
            shape,
            line_width,
            color,
        })
    }

    fn stroke_line(&mut self, from: Point, to: Point, line_width: f32, color: Color) -> Result<()> {
        let shape = Shape::Line(self.map_point(from)?, self.map_point(to)?);
        self.push_op(DrawOp::Stroke {
            shape,
            line_width,
            color,
        })
    }

    fn draw_text(&mut self, content: &str, origin: Point, style: &TextStyle) -> Result<()> {
        if !(style.size.is_finite() && style.size > 0.0) {
            return Err(DocError::Render(format!("invalid font size {}", style.size)));
        }

        let fitted = match style.width {
            Some(width) if style.ellipsis => metrics::fit_with_ellipsis(
                content,
                style.font,
                style.size,
                style.letter_spacing,
                width,
            ),
            _ => content.into(),
        };
        let text_width =
            metrics::text_width(&fitted, style.font, style.size, style.letter_spacing);

        let x = match (style.align, style.width) {
            (Align::Center, Some(width)) => origin.x + (width - text_width) / 2.0,
            (Align::Right, Some(width)) => origin.x + width - text_width,
            _ => origin.x,
        };
        let top_left = self.map_point(Point::from_xy(x, origin.y))?;

        if style.underline {
            let baseline = origin.y + style.size * metrics::ascent(style.font);
            let rule_y = baseline + style.size * 0.1;
            let from = self.map_point(Point::from_xy(x, rule_y))?;
            let to = self.map_point(Point::from_xy(x + text_width, rule_y))?;
            self.push_op(DrawOp::Stroke {
                shape: Shape::Line(from, to),
                line_width: (style.size / 18.0).max(0.5),
                color: style.color,
            })?;
        }

        self.push_op(DrawOp::Text(TextRun {
            content: fitted.into_owned(),
            origin: top_left,
            font: style.font,
            size: style.size,
            color: style.color,
            letter_spacing: style.letter_spacing,
        }))
    }

    fn push_transform(&mut self, transform: Transform) {
        let combined = self.current_transform().pre_concat(transform);
        self.transforms.push(combined);
    }

    fn pop_transform(&mut self) {
        self.transforms.pop();
    }
}
