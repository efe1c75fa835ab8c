// ============================================================================
// Error Handling
// ============================================================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocError {
    #[error("No data: {0}")]
    NoData(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Failed to render document: {0}")]
    Render(String),
    #[error("Failed to create PDF: {0}")]
    Pdf(String),
    #[error("Failed to read registrations: {0}")]
    Store(String),
    #[error("Output cancelled after {0} bytes")]
    Cancelled(usize),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// How a failure should be surfaced to whoever asked for the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Nothing to render, or the requested team/member does not exist.
    InputMissing,
    /// Drawing, encoding or writing the document failed.
    RenderingFault,
    /// The persistence collaborator failed; never retried here.
    UpstreamFault,
}

impl DocError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DocError::NoData(_) | DocError::NotFound(_) => ErrorKind::InputMissing,
            DocError::Store(_) => ErrorKind::UpstreamFault,
            DocError::Render(_) | DocError::Pdf(_) | DocError::Cancelled(_) | DocError::Io(_) => {
                ErrorKind::RenderingFault
            }
        }
    }

    /// HTTP-equivalent status for callers that sit behind a web layer.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::InputMissing => 404,
            ErrorKind::RenderingFault | ErrorKind::UpstreamFault => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, DocError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_missing_maps_to_404() {
        assert_eq!(DocError::NoData("x".into()).status_code(), 404);
        assert_eq!(DocError::NotFound("x".into()).kind(), ErrorKind::InputMissing);
    }

    #[test]
    fn faults_map_to_500() {
        assert_eq!(DocError::Store("db down".into()).kind(), ErrorKind::UpstreamFault);
        assert_eq!(DocError::Cancelled(0).kind(), ErrorKind::RenderingFault);
        assert_eq!(DocError::Pdf("bad".into()).status_code(), 500);
    }
}
