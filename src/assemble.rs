// ============================================================================
// Document Assembly
// ============================================================================
//
// Picks the renderer for a request, checks its input before any page buffer
// exists, renders into a request-local display list, encodes it and streams
// the bytes to the caller's sink in page order.

use std::io::Write;

use tracing::{debug, info, info_span};

use crate::aggregate::group_by_event;
use crate::certificate::{render_certificate, select_recipient, CertificateOptions};
use crate::display::DisplayList;
use crate::draw::A4_LANDSCAPE;
use crate::error::{DocError, Result};
use crate::model::Registration;
use crate::pdf::{self, DocumentStamp};
use crate::report::{render_attendance_report, TableLayout};

pub use crate::cancel::CancelToken;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const REPORT_FILENAME: &str = "Event_Attendance_List.pdf";

/// Bytes handed to the sink per write.
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

#[derive(Debug, Clone, Copy)]
pub enum DocumentRequest<'a> {
    /// Tabular attendance list over every paid registration given.
    AttendanceReport { registrations: &'a [Registration] },
    /// One certificate for the member at the given positions.
    Certificate {
        registration: &'a Registration,
        team_index: usize,
        member_index: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    pub content_type: &'static str,
    pub filename: String,
    pub pages: usize,
    pub bytes_written: usize,
}

/// A rendered but not yet encoded document.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub title: String,
    pub filename: String,
    pub stamp: DocumentStamp,
    pub pages: DisplayList,
}

#[derive(Debug, Clone)]
pub struct Assembler {
    table: TableLayout,
    certificate: CertificateOptions,
    chunk_size: usize,
}

impl Default for Assembler {
    fn default() -> Self {
        Self {
            table: TableLayout::default(),
            certificate: CertificateOptions::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table_layout(mut self, layout: TableLayout) -> Self {
        self.table = layout;
        self
    }

    pub fn with_certificate_options(mut self, options: CertificateOptions) -> Self {
        self.certificate = options;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Lay out the request into a fresh display list.
    pub fn render(&self, request: &DocumentRequest<'_>, cancel: &CancelToken) -> Result<RenderedDocument> {
        match *request {
            DocumentRequest::AttendanceReport { registrations } => {
                let groups = group_by_event(registrations);
                if groups.is_empty() {
                    return Err(DocError::NoData(
                        "no paid registrations to report".to_string(),
                    ));
                }
                let mut pages = DisplayList::new(self.table.page).with_cancel(cancel.clone());
                render_attendance_report(&groups, &self.table, &mut pages)?;
                debug!(
                    events = groups.len(),
                    participants = groups.total_participants(),
                    "rendered attendance report"
                );
                Ok(RenderedDocument {
                    title: "Event Attendance List".to_string(),
                    filename: REPORT_FILENAME.to_string(),
                    stamp: report_stamp(registrations),
                    pages,
                })
            }
            DocumentRequest::Certificate {
                registration,
                team_index,
                member_index,
            } => {
                let (_, member) = select_recipient(registration, team_index, member_index)?;
                let filename = certificate_filename(&member.name);
                let mut pages = DisplayList::new(A4_LANDSCAPE).with_cancel(cancel.clone());
                render_certificate(
                    registration,
                    team_index,
                    member_index,
                    &self.certificate,
                    &mut pages,
                )?;
                let key = format!(
                    "certificate:{}:{}:{}",
                    registration.id, team_index, member_index
                );
                Ok(RenderedDocument {
                    title: "Certificate of Participation".to_string(),
                    filename,
                    stamp: DocumentStamp::derive(&key, registration.created_at),
                    pages,
                })
            }
        }
    }

    /// Render, encode and stream one document into `sink`.
    ///
    /// Missing input fails before a single byte is written. A cancelled
    /// token stops rendering or streaming at the next page or chunk boundary.
    ///
    /// printpdf can only serialize a finished document, so every page is laid
    /// out and the whole file encoded in memory before the first chunk
    /// reaches `sink`. Peak memory grows with the page count.
    pub fn generate<W: Write>(
        &self,
        request: &DocumentRequest<'_>,
        sink: &mut W,
        cancel: &CancelToken,
    ) -> Result<DocumentInfo> {
        let span = info_span!("generate", kind = request.kind());
        let _enter = span.enter();

        if cancel.is_cancelled() {
            return Err(DocError::Cancelled(0));
        }
        let document = self.render(request, cancel)?;
        let bytes = pdf::encode(&document.pages, &document.title, &document.stamp)?;
        let bytes_written = stream_chunks(&bytes, sink, self.chunk_size, cancel)?;

        info!(
            filename = %document.filename,
            pages = document.pages.page_count(),
            bytes = bytes_written,
            "document generated"
        );
        Ok(DocumentInfo {
            content_type: PDF_CONTENT_TYPE,
            filename: document.filename,
            pages: document.pages.page_count(),
            bytes_written,
        })
    }
}

impl DocumentRequest<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            DocumentRequest::AttendanceReport { .. } => "attendance_report",
            DocumentRequest::Certificate { .. } => "certificate",
        }
    }
}

/// Generate the attendance list with default layout.
pub fn generate_report<W: Write>(
    registrations: &[Registration],
    sink: &mut W,
    cancel: &CancelToken,
) -> Result<DocumentInfo> {
    Assembler::new().generate(&DocumentRequest::AttendanceReport { registrations }, sink, cancel)
}

/// Generate one certificate with default wording.
pub fn generate_certificate<W: Write>(
    registration: &Registration,
    team_index: usize,
    member_index: usize,
    sink: &mut W,
    cancel: &CancelToken,
) -> Result<DocumentInfo> {
    let request = DocumentRequest::Certificate {
        registration,
        team_index,
        member_index,
    };
    Assembler::new().generate(&request, sink, cancel)
}

/// Keyed on the paid registrations in the report and dated by the newest.
fn report_stamp(registrations: &[Registration]) -> DocumentStamp {
    let paid = || registrations.iter().filter(|r| r.is_paid());
    let ids: Vec<&str> = paid().map(|r| r.id.as_str()).collect();
    let newest = paid().map(|r| r.created_at).max().unwrap_or_default();
    DocumentStamp::derive(&format!("attendance:{}", ids.join(",")), newest)
}

/// Write `bytes` in order, checking for cancellation before each chunk.
/// Bytes already written are left as they are.
fn stream_chunks<W: Write>(
    bytes: &[u8],
    sink: &mut W,
    chunk_size: usize,
    cancel: &CancelToken,
) -> Result<usize> {
    let mut written = 0;
    for chunk in bytes.chunks(chunk_size) {
        if cancel.is_cancelled() {
            return Err(DocError::Cancelled(written));
        }
        sink.write_all(chunk)?;
        written += chunk.len();
    }
    sink.flush()?;
    Ok(written)
}

/// `Certificate_Asha_Rao.pdf`; anything but ASCII letters and digits
/// becomes an underscore.
pub fn certificate_filename(member_name: &str) -> String {
    let sanitized = member_name
        .split_whitespace()
        .map(|word| {
            word.chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("_");
    if sanitized.is_empty() {
        "Certificate.pdf".to_string()
    } else {
        format!("Certificate_{}.pdf", sanitized)
    }
}
