// ============================================================================
// Participation Certificate
// ============================================================================

use chrono::FixedOffset;
use tracing::debug;

use crate::draw::{rect, rotation, Color, Font, Point, Surface, TextStyle, Transform};
use crate::error::{DocError, Result};
use crate::model::{Member, Registration, Team};

const PARCHMENT: Color = Color::hex(0xfffef2);
const NAVY: Color = Color::hex(0x1e293b);
const GOLD: Color = Color::hex(0xd4af37);
const SLATE: Color = Color::hex(0x64748b);
const SLATE_DARK: Color = Color::hex(0x475569);
const INK: Color = Color::hex(0x0f172a);

/// Border insets from the page edge: thick outer, thin inner, hairline.
const BORDER_INSETS: [(f32, f32, Color); 3] = [(20.0, 12.0, NAVY), (40.0, 1.0, GOLD), (45.0, 0.5, GOLD)];

const SIGNATURE_Y: f32 = 500.0;
const SIGNATURE_WIDTH: f32 = 180.0;
const SIGNATURE_SIDE_MARGIN: f32 = 90.0;

/// Wording and locale settings for the certificate.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateOptions {
    pub brand: String,
    pub headline: String,
    pub subtitle: String,
    pub presentation: String,
    pub participation: String,
    /// Left, center and right signature labels.
    pub signatures: [String; 3],
    /// Offset applied to the registration timestamp before printing the date.
    pub utc_offset_minutes: i32,
}

impl Default for CertificateOptions {
    fn default() -> Self {
        Self {
            brand: "PROJECT JULY 26".to_string(),
            headline: "CERTIFICATE".to_string(),
            subtitle: "OF EXCELLENCE & PARTICIPATION".to_string(),
            presentation: "This is proudly presented to".to_string(),
            participation: "for their active and successful participation in".to_string(),
            signatures: [
                "EVENT HEAD".to_string(),
                "FOUNDER".to_string(),
                "CO-FOUNDER".to_string(),
            ],
            // India Standard Time.
            utc_offset_minutes: 330,
        }
    }
}

/// Resolve a team/member pair by position, or fail with `NotFound`.
pub fn select_recipient(
    registration: &Registration,
    team_index: usize,
    member_index: usize,
) -> Result<(&Team, &Member)> {
    let team = registration.teams.get(team_index).ok_or_else(|| {
        DocError::NotFound(format!(
            "team {} in registration {}",
            team_index, registration.id
        ))
    })?;
    let member = team.members.get(member_index).ok_or_else(|| {
        DocError::NotFound(format!(
            "member {} of team {} in registration {}",
            member_index, team_index, registration.id
        ))
    })?;
    Ok((team, member))
}

/// "26 July 2025" in the configured offset.
pub fn format_issue_date(registration: &Registration, options: &CertificateOptions) -> Result<String> {
    let offset = FixedOffset::east_opt(options.utc_offset_minutes * 60).ok_or_else(|| {
        DocError::Render(format!("invalid UTC offset {} minutes", options.utc_offset_minutes))
    })?;
    Ok(registration
        .created_at
        .with_timezone(&offset)
        .format("%-d %B %Y")
        .to_string())
}

/// Draw one certificate page. Indices are checked before anything is drawn.
pub fn render_certificate<S: Surface>(
    registration: &Registration,
    team_index: usize,
    member_index: usize,
    options: &CertificateOptions,
    surface: &mut S,
) -> Result<()> {
    let (team, member) = select_recipient(registration, team_index, member_index)?;
    let date = format_issue_date(registration, options)?;

    surface.begin_page()?;
    let size = surface.page_size();
    let (width, height) = (size.width, size.height);

    // Background and borders
    surface.fill_rect(rect(0.0, 0.0, width, height)?, PARCHMENT)?;
    for (inset, line_width, color) in BORDER_INSETS {
        let border = rect(inset, inset, width - 2.0 * inset, height - 2.0 * inset)?;
        surface.stroke_rect(border, line_width, color)?;
    }

    let corners = [
        (20.0, 20.0, 0.0),
        (width - 20.0, 20.0, 90.0),
        (width - 20.0, height - 20.0, 180.0),
        (20.0, height - 20.0, 270.0),
    ];
    for (x, y, degrees) in corners {
        draw_corner_ornament(surface, x, y, degrees)?;
    }

    // Title block
    let centered = |font: Font, size: f32, color: Color| {
        TextStyle::new(font, size).color(color).centered(width)
    };
    surface.draw_text(
        &options.brand,
        Point::from_xy(0.0, 60.0),
        &centered(Font::HelveticaBold, 32.0, NAVY).letter_spacing(4.0),
    )?;
    surface.draw_text(
        &options.headline,
        Point::from_xy(0.0, 115.0),
        &centered(Font::TimesBold, 48.0, NAVY).letter_spacing(6.0),
    )?;
    surface.draw_text(
        &options.subtitle,
        Point::from_xy(0.0, 175.0),
        &centered(Font::HelveticaBold, 14.0, SLATE).letter_spacing(3.0),
    )?;
    surface.draw_text(
        &options.presentation,
        Point::from_xy(0.0, 225.0),
        &centered(Font::TimesItalic, 18.0, SLATE_DARK),
    )?;

    // Recipient, kept inside the inner border
    let name_style = TextStyle::new(Font::TimesBoldItalic, 45.0)
        .color(INK)
        .centered(width - 100.0)
        .ellipsis();
    surface.draw_text(&member.name, Point::from_xy(50.0, 270.0), &name_style)?;
    surface.stroke_line(
        Point::from_xy(width * 0.2, 330.0),
        Point::from_xy(width * 0.8, 330.0),
        1.0,
        GOLD,
    )?;

    // Event details
    surface.draw_text(
        &options.participation,
        Point::from_xy(0.0, 360.0),
        &centered(Font::Helvetica, 14.0, SLATE_DARK),
    )?;
    surface.draw_text(
        &team.event_label().to_uppercase(),
        Point::from_xy(0.0, 390.0),
        &centered(Font::HelveticaBold, 25.0, NAVY),
    )?;
    surface.draw_text(
        &format!(
            "Representing Team: {} | {}",
            team.team_name, registration.organization.name
        ),
        Point::from_xy(0.0, 435.0),
        &centered(Font::HelveticaBold, 14.0, SLATE),
    )?;

    // Signatures: left carries the date
    let columns = [
        SIGNATURE_SIDE_MARGIN,
        width / 2.0 - SIGNATURE_WIDTH / 2.0,
        width - SIGNATURE_SIDE_MARGIN - SIGNATURE_WIDTH,
    ];
    let label_style = TextStyle::new(Font::TimesBold, 10.0)
        .color(NAVY)
        .centered(SIGNATURE_WIDTH);
    for (slot, (x, label)) in columns.iter().zip(&options.signatures).enumerate() {
        surface.stroke_line(
            Point::from_xy(*x, SIGNATURE_Y),
            Point::from_xy(x + SIGNATURE_WIDTH, SIGNATURE_Y),
            1.5,
            NAVY,
        )?;
        surface.draw_text(label, Point::from_xy(*x, SIGNATURE_Y + 12.0), &label_style)?;
        if slot == 0 {
            let date_style = TextStyle::new(Font::Helvetica, 8.0)
                .color(SLATE)
                .centered(SIGNATURE_WIDTH);
            surface.draw_text(
                &format!("Date: {}", date),
                Point::from_xy(*x, SIGNATURE_Y + 28.0),
                &date_style,
            )?;
        }
    }

    debug!(registration = %registration.id, team_index, member_index, "drew certificate");
    Ok(())
}

/// Two nested squares centred on the corner, rotated with the page corner.
fn draw_corner_ornament<S: Surface>(surface: &mut S, x: f32, y: f32, degrees: f32) -> Result<()> {
    let placement = Transform::from_translate(x, y).pre_concat(rotation(degrees));
    let mut scoped = surface.scoped(placement);
    scoped.fill_rect(rect(-15.0, -15.0, 30.0, 30.0)?, NAVY)?;
    scoped.fill_rect(rect(-8.0, -8.0, 16.0, 16.0)?, GOLD)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{DisplayList, DrawOp, Shape};
    use crate::draw::{Rect, A4_LANDSCAPE};
    use crate::model::{Organization, PaymentStatus};
    use chrono::{TimeZone, Utc};

    fn registration() -> Registration {
        Registration {
            id: "reg-1".into(),
            organization: Organization {
                name: "Acme Univ".into(),
                ..Default::default()
            },
            teams: vec![
                Team {
                    team_name: "Alpha".into(),
                    event_name: Some("Hack Day".into()),
                    event_value: "hackday".into(),
                    members: vec![Member {
                        name: "Asha Rao".into(),
                        ..Default::default()
                    }],
                },
                Team {
                    team_name: "Empty".into(),
                    ..Default::default()
                },
            ],
            sub_total: 0.0,
            convenience_fee: 0.0,
            grand_total: 0.0,
            payment_status: PaymentStatus::Successful,
            order_id: None,
            payment_id: None,
            // 20:00 UTC is already the next day in India.
            created_at: Utc.with_ymd_and_hms(2025, 7, 25, 20, 0, 0).unwrap(),
        }
    }

    #[test]
    fn out_of_range_indices_are_not_found() {
        let reg = registration();
        assert!(matches!(select_recipient(&reg, 5, 0), Err(DocError::NotFound(_))));
        assert!(matches!(select_recipient(&reg, 1, 0), Err(DocError::NotFound(_))));
        assert!(matches!(select_recipient(&reg, 0, 1), Err(DocError::NotFound(_))));
    }

    #[test]
    fn not_found_draws_nothing() {
        let mut list = DisplayList::new(A4_LANDSCAPE);
        let result = render_certificate(&registration(), 1, 0, &CertificateOptions::default(), &mut list);
        assert!(result.is_err());
        assert_eq!(list.page_count(), 0);
    }

    #[test]
    fn issue_date_uses_configured_offset() {
        let reg = registration();
        let options = CertificateOptions::default();
        assert_eq!(format_issue_date(&reg, &options).unwrap(), "26 July 2025");

        let utc = CertificateOptions {
            utc_offset_minutes: 0,
            ..CertificateOptions::default()
        };
        assert_eq!(format_issue_date(&reg, &utc).unwrap(), "25 July 2025");
    }

    #[test]
    fn corner_ornaments_sit_on_the_outer_border() {
        let mut list = DisplayList::new(A4_LANDSCAPE);
        render_certificate(&registration(), 0, 0, &CertificateOptions::default(), &mut list).unwrap();
        assert_eq!(list.transform_depth(), 0);

        let page = &list.pages()[0];
        let navy: Vec<Rect> = page
            .filled_rects()
            .filter(|(_, c)| *c == NAVY)
            .map(|(r, _)| *r)
            .collect();
        assert_eq!(navy.len(), 4);
        assert_eq!(navy[0], rect(5.0, 5.0, 30.0, 30.0).unwrap());
        let w = A4_LANDSCAPE.width;
        let h = A4_LANDSCAPE.height;
        assert!((navy[2].x() - (w - 35.0)).abs() < 1e-3);
        assert!((navy[2].y() - (h - 35.0)).abs() < 1e-3);
    }

    #[test]
    fn only_left_signature_has_a_date() {
        let mut list = DisplayList::new(A4_LANDSCAPE);
        render_certificate(&registration(), 0, 0, &CertificateOptions::default(), &mut list).unwrap();
        let page = &list.pages()[0];

        let dates: Vec<_> = page.texts().filter(|t| t.content.starts_with("Date: ")).collect();
        assert_eq!(dates.len(), 1);
        assert!(dates[0].origin.x < A4_LANDSCAPE.width / 3.0);

        let signature_rules = page
            .ops
            .iter()
            .filter(|op| {
                matches!(op, DrawOp::Stroke { shape: Shape::Line(a, b), .. }
                    if a.y == SIGNATURE_Y && b.y == SIGNATURE_Y)
            })
            .count();
        assert_eq!(signature_rules, 3);
    }
}
