use serde::Serialize;

use super::domain::{Folder, FolderId};

/// Storage abstraction so the folder service can be exercised in isolation.
/// Implementations must apply each call atomically (row-level locking or an
/// equivalent transactional boundary).
pub trait FolderRepository: Send + Sync {
    fn insert(&self, folder: Folder) -> Result<Folder, RepositoryError>;
    fn update(&self, folder: Folder) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &FolderId) -> Result<Option<Folder>, RepositoryError>;
    fn find_by_applicant(&self, applicant_id: &str) -> Result<Option<Folder>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Sanitized representation of a folder's exposed state.
#[derive(Debug, Clone, Serialize)]
pub struct FolderStatusView {
    pub folder_id: FolderId,
    pub applicant_id: String,
    pub visa_type: String,
    pub status: &'static str,
    pub documents: Vec<DocumentView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentView {
    pub requirement: String,
    pub version: u32,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl Folder {
    pub fn status_view(&self) -> FolderStatusView {
        FolderStatusView {
            folder_id: self.id.clone(),
            applicant_id: self.applicant_id.clone(),
            visa_type: self.visa_type.0.clone(),
            status: self.status().label(),
            documents: self
                .documents()
                .map(|record| DocumentView {
                    requirement: record.requirement.clone(),
                    version: record.version,
                    status: record.status.label(),
                    rejection_reason: record.rejection_reason.clone(),
                })
                .collect(),
            outcome_reason: self.outcome_reason().map(str::to_string),
        }
    }
}
