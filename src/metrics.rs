// ============================================================================
// Built-in Font Metrics
// ============================================================================

use std::borrow::Cow;

use crate::draw::Font;

/// Marker appended to text cut to fit a column.
pub const ELLIPSIS: &str = "...";

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

const FALLBACK_WIDTH: u16 = 556;

// Other faces are scaled from Helvetica. Close enough for centering and
// column fitting; exact AFM tables would only matter for justified text.
fn face_scale(font: Font) -> f32 {
    match font {
        Font::Helvetica => 1.0,
        Font::HelveticaBold => 1.07,
        Font::TimesBold => 0.95,
        Font::TimesItalic => 0.87,
        Font::TimesBoldItalic => 0.93,
    }
}

/// Height of the ascender above the baseline, as a fraction of font size.
pub fn ascent(font: Font) -> f32 {
    match font {
        Font::Helvetica | Font::HelveticaBold => 0.718,
        Font::TimesBold | Font::TimesItalic | Font::TimesBoldItalic => 0.683,
    }
}

fn char_width(c: char) -> u16 {
    let code = c as u32;
    if (32..=126).contains(&code) {
        HELVETICA_WIDTHS[(code - 32) as usize]
    } else {
        FALLBACK_WIDTH
    }
}

/// Rendered width of `text` in points, including letter spacing after every
/// glyph.
pub fn text_width(text: &str, font: Font, size: f32, letter_spacing: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c))).sum();
    let glyphs = text.chars().count() as f32;
    units as f32 / 1000.0 * size * face_scale(font) + glyphs * letter_spacing
}

/// Return `text` unchanged if it fits `max_width`, otherwise the longest
/// prefix that fits together with [`ELLIPSIS`].
pub fn fit_with_ellipsis(
    text: &str,
    font: Font,
    size: f32,
    letter_spacing: f32,
    max_width: f32,
) -> Cow<'_, str> {
    if text_width(text, font, size, letter_spacing) <= max_width {
        return Cow::Borrowed(text);
    }

    let budget = max_width - text_width(ELLIPSIS, font, size, letter_spacing);
    let mut used = 0.0;
    let mut cut = 0;
    for (idx, c) in text.char_indices() {
        let w = f32::from(char_width(c)) / 1000.0 * size * face_scale(font) + letter_spacing;
        if used + w > budget {
            break;
        }
        used += w;
        cut = idx + c.len_utf8();
    }

    Cow::Owned(format!("{}{}", text[..cut].trim_end(), ELLIPSIS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helvetica_digits_are_half_em() {
        let w = text_width("0000", Font::Helvetica, 10.0, 0.0);
        assert!((w - 22.24).abs() < 1e-3);
    }

    #[test]
    fn letter_spacing_adds_per_glyph() {
        let plain = text_width("CERT", Font::Helvetica, 10.0, 0.0);
        let spaced = text_width("CERT", Font::Helvetica, 10.0, 2.0);
        assert!((spaced - plain - 8.0).abs() < 1e-3);
    }

    #[test]
    fn short_text_is_untouched() {
        let fitted = fit_with_ellipsis("Asha Rao", Font::Helvetica, 9.0, 0.0, 170.0);
        assert!(matches!(fitted, Cow::Borrowed("Asha Rao")));
    }

    #[test]
    fn long_text_is_cut_with_marker() {
        let long = "International Institute of Information Technology and Management Studies";
        let fitted = fit_with_ellipsis(long, Font::Helvetica, 9.0, 0.0, 170.0);
        assert!(fitted.ends_with("..."));
        assert!(fitted.is_ascii());
        assert!(fitted.len() < long.len());
        assert!(long.starts_with(fitted.trim_end_matches(ELLIPSIS)));
        assert!(text_width(&fitted, Font::Helvetica, 9.0, 0.0) <= 170.0);
    }

    #[test]
    fn non_ascii_uses_fallback_width() {
        let w = text_width("é", Font::Helvetica, 10.0, 0.0);
        assert!((w - 5.56).abs() < 1e-3);
    }
}
