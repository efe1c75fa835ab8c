// ============================================================================
// Pagination Planning
// ============================================================================
//
// Decides where table rows fall on pages without touching a drawing surface.
// Every page begins with a table header row; rows are never split.

use std::ops::Range;

/// Vertical page geometry in points, measured from the top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub page_height: f32,
    /// Rows may not extend into this band at the bottom of the page.
    pub bottom_margin: f32,
    /// Where the header row sits on continuation pages.
    pub top_offset: f32,
    pub row_height: f32,
}

impl PageGeometry {
    pub fn safe_bottom(&self) -> f32 {
        self.page_height - self.bottom_margin
    }

    /// Whether a row starting at `cursor_y` would cross the safe bottom edge.
    pub fn overflows(&self, cursor_y: f32) -> bool {
        cursor_y + self.row_height > self.safe_bottom()
    }

    /// Data rows that fit below a header placed at `header_y`.
    pub fn capacity_below(&self, header_y: f32) -> usize {
        let usable = self.safe_bottom() - header_y - self.row_height;
        if usable <= 0.0 {
            return 0;
        }
        (usable / self.row_height).floor() as usize
    }
}

/// Placement of one page's worth of table rows.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    /// Indices into the row sequence drawn on this page.
    pub rows: Range<usize>,
    /// True when this page was opened by a break and needs a fresh header.
    pub redraw_header: bool,
    pub header_y: f32,
    row_height: f32,
}

impl PageLayout {
    /// The cursor position after the last row on this page.
    pub fn cursor_y(&self) -> f32 {
        self.header_y + self.row_height * (1 + self.rows.len()) as f32
    }

    /// `(row index, top y)` for every row on the page, in order.
    pub fn row_positions(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        let first_y = self.header_y + self.row_height;
        self.rows
            .clone()
            .enumerate()
            .map(move |(slot, idx)| (idx, first_y + slot as f32 * self.row_height))
    }
}

/// Single forward pass: before each row, break if it would overflow.
///
/// The first page's header sits at `header_y`; continuation pages put it at
/// `geometry.top_offset`. Zero rows still yield one header-only page.
pub fn plan_pages(row_count: usize, header_y: f32, geometry: &PageGeometry) -> Vec<PageLayout> {
    let mut pages = vec![PageLayout {
        rows: 0..0,
        redraw_header: false,
        header_y,
        row_height: geometry.row_height,
    }];
    let mut cursor_y = header_y + geometry.row_height;

    for idx in 0..row_count {
        if geometry.overflows(cursor_y) && !is_fresh(&pages) {
            pages.push(PageLayout {
                rows: idx..idx,
                redraw_header: true,
                header_y: geometry.top_offset,
                row_height: geometry.row_height,
            });
            cursor_y = geometry.top_offset + geometry.row_height;
        }
        if let Some(page) = pages.last_mut() {
            page.rows.end = idx + 1;
        }
        cursor_y += geometry.row_height;
    }

    pages
}

// A continuation page that has not received a row yet. Breaking again would
// only produce another empty page.
fn is_fresh(pages: &[PageLayout]) -> bool {
    pages
        .last()
        .map_or(false, |p| p.redraw_header && p.rows.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // A4 landscape height with the attendance report's margins.
    fn a4() -> PageGeometry {
        PageGeometry {
            page_height: 595.28,
            bottom_margin: 30.0,
            top_offset: 40.0,
            row_height: 25.0,
        }
    }

    #[test]
    fn zero_rows_yields_header_only_page() {
        let pages = plan_pages(0, 100.0, &a4());
        assert_eq!(pages.len(), 1);
        assert!(pages[0].rows.is_empty());
        assert!(!pages[0].redraw_header);
        assert_eq!(pages[0].cursor_y(), 125.0);
    }

    #[test]
    fn exact_fill_does_not_add_blank_page() {
        let geometry = a4();
        let capacity = geometry.capacity_below(geometry.top_offset);
        assert_eq!(capacity, 20);

        let pages = plan_pages(capacity, geometry.top_offset, &geometry);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].rows, 0..capacity);
    }

    #[test]
    fn overflow_moves_row_to_new_page_with_header() {
        let geometry = a4();
        let first = geometry.capacity_below(100.0);
        let pages = plan_pages(first + 1, 100.0, &geometry);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].rows, 0..first);
        assert_eq!(pages[1].rows, first..first + 1);
        assert!(pages[1].redraw_header);
        assert_eq!(pages[1].header_y, 40.0);

        let (idx, y) = pages[1].row_positions().next().unwrap();
        assert_eq!(idx, first);
        assert_eq!(y, 65.0);
    }

    #[test]
    fn rows_never_cross_safe_bottom() {
        let geometry = a4();
        for page in plan_pages(97, 100.0, &geometry) {
            for (_, y) in page.row_positions() {
                assert!(y + geometry.row_height <= geometry.safe_bottom());
            }
        }
    }

    #[test]
    fn header_past_bottom_does_not_loop_on_empty_pages() {
        let geometry = a4();
        let pages = plan_pages(3, 590.0, &geometry);
        assert_eq!(pages.len(), 2);
        assert!(pages[0].rows.is_empty());
        assert_eq!(pages[1].rows, 0..3);
    }

    proptest! {
        #[test]
        fn page_count_is_ceil_of_rows_over_capacity(n in 0usize..400) {
            let geometry = a4();
            let capacity = geometry.capacity_below(geometry.top_offset);
            let pages = plan_pages(n, geometry.top_offset, &geometry);

            let expected = if n == 0 { 1 } else { (n + capacity - 1) / capacity };
            prop_assert_eq!(pages.len(), expected);

            // Every row is placed exactly once, in order.
            let mut next = 0;
            for page in &pages {
                prop_assert_eq!(page.rows.start, next);
                prop_assert!(page.rows.len() <= capacity);
                next = page.rows.end;
            }
            prop_assert_eq!(next, n);
        }
    }
}
