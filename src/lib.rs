//! event-docs: attendance lists and participation certificates for event
//! registrations, rendered to PDF.
//!
//! Registrations (organization, teams, members) come from a
//! [`store::RegistrationStore`]. [`aggregate`] groups paid participants by
//! event, [`paginate`] decides page breaks, and the [`report`] and
//! [`certificate`] renderers draw onto a [`draw::Surface`]. The
//! [`assemble::Assembler`] ties them together and streams the encoded PDF to
//! any `std::io::Write` sink.

pub mod aggregate;
pub mod assemble;
pub mod cancel;
pub mod certificate;
pub mod display;
pub mod draw;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod paginate;
pub mod pdf;
pub mod report;
pub mod store;

pub use assemble::{
    generate_certificate, generate_report, Assembler, CancelToken, DocumentInfo, DocumentRequest,
    PDF_CONTENT_TYPE, REPORT_FILENAME,
};
pub use error::{DocError, ErrorKind, Result};
pub use model::{Member, Organization, PaymentStatus, Registration, Team};
