// ============================================================================
// Attendance Report
// ============================================================================
//
// One section per event: title, participant count, then a five column
// table (S.No, name, team, organization, blank signature cell) that repeats
// its header on every continuation page. Contact details are never printed.

use tracing::debug;

use crate::aggregate::{EventGroup, EventGroups};
use crate::draw::{rect, Color, Font, Point, Rect, Size, Surface, TextStyle, A4_LANDSCAPE};
use crate::error::{DocError, Result};
use crate::paginate::{plan_pages, PageGeometry, PageLayout};

/// Left edge of each column, in points from the page's left edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnOffsets {
    pub sno: f32,
    pub name: f32,
    pub team: f32,
    pub org: f32,
    pub sig: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    pub page: Size,
    pub margin: f32,
    pub table_width: f32,
    pub row_height: f32,
    pub columns: ColumnOffsets,
    /// Horizontal and vertical inset of text inside a cell.
    pub cell_padding: f32,
    pub text_offset: f32,
    /// Widest a name, team or organization cell may render before ellipsis.
    pub truncate_width: f32,
    pub bottom_margin: f32,
    /// Header position on continuation pages.
    pub continuation_top: f32,
    pub title_y: f32,
    pub count_y: f32,
    pub first_header_y: f32,
    pub title_color: Color,
    pub header_fill: Color,
    pub row_fills: [Color; 2],
    pub row_border: Color,
    pub text_color: Color,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            page: A4_LANDSCAPE,
            margin: 30.0,
            table_width: 750.0,
            row_height: 25.0,
            columns: ColumnOffsets {
                sno: 30.0,
                name: 70.0,
                team: 250.0,
                org: 430.0,
                sig: 610.0,
            },
            cell_padding: 5.0,
            text_offset: 8.0,
            truncate_width: 170.0,
            bottom_margin: 25.0,
            continuation_top: 40.0,
            title_y: 30.0,
            count_y: 52.0,
            first_header_y: 75.0,
            title_color: Color::hex(0x1e293b),
            header_fill: Color::hex(0xcbd5e1),
            row_fills: [Color::hex(0xf8fafc), Color::hex(0xffffff)],
            row_border: Color::hex(0xe2e8f0),
            text_color: Color::hex(0x333333),
        }
    }
}

impl TableLayout {
    pub fn geometry(&self) -> PageGeometry {
        PageGeometry {
            page_height: self.page.height,
            bottom_margin: self.bottom_margin,
            top_offset: self.continuation_top,
            row_height: self.row_height,
        }
    }

    fn row_rect(&self, y: f32) -> Result<Rect> {
        rect(self.margin, y, self.table_width, self.row_height)
    }
}

const HEADER_LABELS: [&str; 5] = [
    "S.No",
    "Participant Name",
    "Team Name",
    "Organization",
    "Signature",
];

/// Draw every event group, each starting on a fresh page. Returns the number
/// of pages emitted.
pub fn render_attendance_report<S: Surface>(
    groups: &EventGroups,
    layout: &TableLayout,
    surface: &mut S,
) -> Result<usize> {
    if groups.is_empty() {
        return Err(DocError::NoData("no paid registrations to report".to_string()));
    }

    let mut pages = 0;
    for group in groups {
        pages += render_event_section(group, layout, surface)?;
    }
    Ok(pages)
}

fn render_event_section<S: Surface>(
    group: &EventGroup,
    layout: &TableLayout,
    surface: &mut S,
) -> Result<usize> {
    surface.begin_page()?;

    let title = format!("Event: {}", group.event_name.to_uppercase());
    let title_style = TextStyle::new(Font::HelveticaBold, 18.0)
        .color(layout.title_color)
        .underline();
    surface.draw_text(&title, Point::from_xy(layout.margin, layout.title_y), &title_style)?;

    let count_style = TextStyle::new(Font::Helvetica, 10.0).color(layout.title_color);
    surface.draw_text(
        &format!("Total Participants: {}", group.participants.len()),
        Point::from_xy(layout.margin, layout.count_y),
        &count_style,
    )?;

    let plan = plan_pages(
        group.participants.len(),
        layout.first_header_y,
        &layout.geometry(),
    );
    debug!(
        event = %group.event_name,
        rows = group.participants.len(),
        pages = plan.len(),
        "planned event section"
    );

    for page in &plan {
        if page.redraw_header {
            surface.begin_page()?;
        }
        draw_table_page(group, page, layout, surface)?;
    }

    Ok(plan.len())
}

fn draw_table_page<S: Surface>(
    group: &EventGroup,
    page: &PageLayout,
    layout: &TableLayout,
    surface: &mut S,
) -> Result<()> {
    draw_header_row(page.header_y, layout, surface)?;
    for (idx, y) in page.row_positions() {
        draw_participant_row(group, idx, y, layout, surface)?;
    }
    Ok(())
}

fn draw_header_row<S: Surface>(y: f32, layout: &TableLayout, surface: &mut S) -> Result<()> {
    surface.fill_rect(layout.row_rect(y)?, layout.header_fill)?;

    let style = TextStyle::new(Font::HelveticaBold, 10.0).color(Color::BLACK);
    let c = &layout.columns;
    for (label, col_x) in HEADER_LABELS.iter().zip([c.sno, c.name, c.team, c.org, c.sig]) {
        surface.draw_text(
            label,
            Point::from_xy(col_x + layout.cell_padding, y + layout.text_offset),
            &style,
        )?;
    }
    Ok(())
}

fn draw_participant_row<S: Surface>(
    group: &EventGroup,
    idx: usize,
    y: f32,
    layout: &TableLayout,
    surface: &mut S,
) -> Result<()> {
    let participant = &group.participants[idx];
    let row = layout.row_rect(y)?;

    // Parity follows the row's position in the event, not on the page.
    surface.fill_rect(row, layout.row_fills[idx % 2])?;
    surface.stroke_rect(row, 0.5, layout.row_border)?;

    let text_y = y + layout.text_offset;
    let pad = layout.cell_padding;
    let c = &layout.columns;
    let plain = TextStyle::new(Font::Helvetica, 9.0).color(layout.text_color);
    let fitted = plain.width(layout.truncate_width).ellipsis();

    surface.draw_text(&(idx + 1).to_string(), Point::from_xy(c.sno + pad, text_y), &plain)?;
    surface.draw_text(&participant.name, Point::from_xy(c.name + pad, text_y), &fitted)?;
    surface.draw_text(&participant.team_name, Point::from_xy(c.team + pad, text_y), &fitted)?;
    surface.draw_text(
        &participant.organization_name,
        Point::from_xy(c.org + pad, text_y),
        &fitted,
    )?;
    // Signature cell stays blank for signing on paper.
    Ok(())
}
