// ============================================================================
// Drawing Primitives
// ============================================================================
//
// A page-sized, top-left-origin drawing surface measured in points. Nothing
// here knows about registrations.

use std::ops::{Deref, DerefMut};

pub use tiny_skia_path::{Point, Rect, Transform};

use crate::error::{DocError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// A4 in landscape orientation, in points.
pub const A4_LANDSCAPE: Size = Size {
    width: 841.89,
    height: 595.28,
};

/// Rectangle from its top-left corner and size. Negative or non-finite
/// extents are a render fault.
pub fn rect(x: f32, y: f32, width: f32, height: f32) -> Result<Rect> {
    Rect::from_xywh(x, y, width, height)
        .ok_or_else(|| DocError::Render(format!("invalid rectangle {x},{y} {width}x{height}")))
}

/// Corners clockwise from the top-left.
pub fn corners(rect: &Rect) -> [Point; 4] {
    [
        Point::from_xy(rect.left(), rect.top()),
        Point::from_xy(rect.right(), rect.top()),
        Point::from_xy(rect.right(), rect.bottom()),
        Point::from_xy(rect.left(), rect.bottom()),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// `0x1e293b` style literal.
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        }
    }

    pub const BLACK: Color = Color::hex(0x000000);
    pub const WHITE: Color = Color::hex(0xffffff);

    /// Components scaled to 0.0..=1.0.
    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }
}

/// The built-in PDF faces used by the documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Helvetica,
    HelveticaBold,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Box width used for alignment and ellipsis. `None` means unbounded.
    pub width: Option<f32>,
    pub align: Align,
    pub font: Font,
    pub size: f32,
    pub color: Color,
    pub letter_spacing: f32,
    pub underline: bool,
    /// Cut overlong text to the box width with a trailing marker.
    pub ellipsis: bool,
}

impl TextStyle {
    pub fn new(font: Font, size: f32) -> Self {
        Self {
            width: None,
            align: Align::Left,
            font,
            size,
            color: Color::BLACK,
            letter_spacing: 0.0,
            underline: false,
            ellipsis: false,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn centered(mut self, width: f32) -> Self {
        self.width = Some(width);
        self.align = Align::Center;
        self
    }

    pub fn letter_spacing(mut self, spacing: f32) -> Self {
        self.letter_spacing = spacing;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn ellipsis(mut self) -> Self {
        self.ellipsis = true;
        self
    }
}

/// Rotation in degrees, clockwise as seen on the page (y grows downward).
///
/// Quarter turns are built from exact terms so rotated boxes stay
/// axis-aligned; `Transform::from_rotate` leaves `cos(90)` at about 1e-8.
pub fn rotation(degrees: f32) -> Transform {
    let (sin, cos) = match degrees.rem_euclid(360.0) {
        d if d == 0.0 => return Transform::identity(),
        d if d == 90.0 => (1.0, 0.0),
        d if d == 180.0 => (0.0, -1.0),
        d if d == 270.0 => (-1.0, 0.0),
        _ => return Transform::from_rotate(degrees),
    };
    Transform::from_row(cos, sin, -sin, cos, 0.0, 0.0)
}

/// True when rectangles stay rectangles: no rotation, or a quarter turn.
pub fn is_axis_aligned(ts: &Transform) -> bool {
    (ts.kx == 0.0 && ts.ky == 0.0) || (ts.sx == 0.0 && ts.sy == 0.0)
}

/// A drawing surface. All coordinates pass through the current transform.
pub trait Surface {
    fn page_size(&self) -> Size;

    /// Start a new page; subsequent calls draw onto it.
    fn begin_page(&mut self) -> Result<()>;

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()>;
    fn stroke_rect(&mut self, rect: Rect, line_width: f32, color: Color) -> Result<()>;
    fn stroke_line(&mut self, from: Point, to: Point, line_width: f32, color: Color) -> Result<()>;

    /// `origin` is the top-left corner of the text box.
    fn draw_text(&mut self, content: &str, origin: Point, style: &TextStyle) -> Result<()>;

    fn push_transform(&mut self, transform: Transform);
    fn pop_transform(&mut self);

    /// Apply `transform` until the returned guard is dropped.
    fn scoped(&mut self, transform: Transform) -> ScopedTransform<'_, Self>
    where
        Self: Sized,
    {
        self.push_transform(transform);
        ScopedTransform { surface: self }
    }
}

/// Restores the previous transform on drop, including on `?` returns and
/// unwinding.
pub struct ScopedTransform<'a, S: Surface> {
    surface: &'a mut S,
}

impl<S: Surface> Deref for ScopedTransform<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: Surface> DerefMut for ScopedTransform<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: Surface> Drop for ScopedTransform<'_, S> {
    fn drop(&mut self) {
        self.surface.pop_transform();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_color_components() {
        let c = Color::hex(0xd4af37);
        assert_eq!((c.r, c.g, c.b), (0xd4, 0xaf, 0x37));
    }

    #[test]
    fn quarter_turn_is_exact_and_clockwise() {
        let t = rotation(90.0);
        // +x points right; a clockwise quarter turn on a y-down page sends it down.
        let mut p = Point::from_xy(1.0, 0.0);
        t.map_point(&mut p);
        assert_eq!(p, Point::from_xy(0.0, 1.0));
        assert!(is_axis_aligned(&t));
        assert!(is_axis_aligned(&rotation(-90.0)));
        assert!(!is_axis_aligned(&rotation(45.0)));
    }

    #[test]
    fn translate_then_rotate_rotates_about_new_origin() {
        let t = Transform::from_translate(100.0, 50.0).pre_concat(rotation(180.0));
        let mut p = Point::from_xy(10.0, 5.0);
        t.map_point(&mut p);
        assert_eq!(p, Point::from_xy(90.0, 45.0));
    }

    #[test]
    fn invalid_rectangles_are_render_errors() {
        assert!(matches!(rect(f32::NAN, 0.0, 1.0, 1.0), Err(DocError::Render(_))));
        assert!(matches!(rect(0.0, 0.0, -5.0, 1.0), Err(DocError::Render(_))));
        let r = rect(5.0, 5.0, 30.0, 30.0).unwrap();
        assert_eq!(corners(&r)[2], Point::from_xy(35.0, 35.0));
    }

    #[test]
    fn style_builder() {
        let style = TextStyle::new(Font::TimesBold, 48.0)
            .centered(800.0)
            .letter_spacing(6.0);
        assert_eq!(style.align, Align::Center);
        assert_eq!(style.width, Some(800.0));
        assert!(!style.ellipsis);
    }
}
