// ============================================================================
// Registration Store
// ============================================================================
//
// Read-only access to registrations already persisted elsewhere. Document
// generation never writes through this interface.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{DocError, Result};
use crate::model::{PaymentStatus, Registration};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationFilter {
    pub payment_status: Option<PaymentStatus>,
    /// Sort by creation time, newest first. Otherwise stored order is kept.
    pub newest_first: bool,
}

impl RegistrationFilter {
    /// The filter used for every report: paid registrations in stored order.
    pub fn successful() -> Self {
        Self {
            payment_status: Some(PaymentStatus::Successful),
            newest_first: false,
        }
    }

    pub fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    fn matches(&self, reg: &Registration) -> bool {
        self.payment_status
            .map_or(true, |status| reg.payment_status == status)
    }
}

pub trait RegistrationStore {
    fn find(&self, filter: &RegistrationFilter) -> Result<Vec<Registration>>;
    fn get(&self, id: &str) -> Result<Option<Registration>>;
}

fn apply_filter(records: &[Registration], filter: &RegistrationFilter) -> Vec<Registration> {
    let mut found: Vec<Registration> = records
        .iter()
        .filter(|reg| filter.matches(reg))
        .cloned()
        .collect();
    if filter.newest_first {
        // Stable, so equal timestamps keep stored order.
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }
    found
}

/// In-memory store, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<Registration>,
}

impl MemoryStore {
    pub fn new(records: Vec<Registration>) -> Self {
        Self { records }
    }
}

impl RegistrationStore for MemoryStore {
    fn find(&self, filter: &RegistrationFilter) -> Result<Vec<Registration>> {
        Ok(apply_filter(&self.records, filter))
    }

    fn get(&self, id: &str) -> Result<Option<Registration>> {
        Ok(self.records.iter().find(|r| r.id == id).cloned())
    }
}

/// Registrations exported as a JSON array. The file is re-read on every call
/// so each request sees a fresh snapshot.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<Registration>> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| DocError::Store(format!("{}: {}", self.path.display(), e)))?;
        let records: Vec<Registration> = serde_json::from_str(&content)
            .map_err(|e| DocError::Store(format!("Invalid JSON: {}", e)))?;
        debug!(path = %self.path.display(), count = records.len(), "loaded registrations");
        Ok(records)
    }
}

impl RegistrationStore for JsonFileStore {
    fn find(&self, filter: &RegistrationFilter) -> Result<Vec<Registration>> {
        Ok(apply_filter(&self.load()?, filter))
    }

    fn get(&self, id: &str) -> Result<Option<Registration>> {
        Ok(self.load()?.into_iter().find(|r| r.id == id))
    }
}
