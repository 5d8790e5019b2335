use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Identifier wrapper for document folders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FolderId(pub String);

/// Visa type as configured in the requirement catalog. Values are normalized
/// to lowercase so catalog lookups are case-insensitive at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisaType(pub String);

impl VisaType {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_ascii_lowercase())
    }
}

/// Review lifecycle of a single requirement's document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Requirement assigned, nothing uploaded yet.
    Missing,
    /// Current version awaits review; re-upload is locked.
    Pending,
    /// Current version approved by a reviewer.
    Approved,
    /// Current version rejected; a corrected version may be uploaded.
    Rejected,
}

impl DocumentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            DocumentStatus::Missing => "missing",
            DocumentStatus::Pending => "pending_review",
            DocumentStatus::Approved => "approved",
            DocumentStatus::Rejected => "rejected",
        }
    }
}

/// Current state of one requirement inside a folder. The version counts
/// successful uploads for this (folder, requirement) pair and never resets:
/// 0 means nothing was ever uploaded, the first upload is version 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub requirement: String,
    pub version: u32,
    pub status: DocumentStatus,
    pub file_ref: Option<String>,
    pub rejection_reason: Option<String>,
}

impl DocumentRecord {
    fn missing(requirement: &str) -> Self {
        Self {
            requirement: requirement.to_string(),
            version: 0,
            status: DocumentStatus::Missing,
            file_ref: None,
            rejection_reason: None,
        }
    }
}

/// Aggregate status of a folder, derived from its document records plus the
/// final visa-outcome event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FolderStatus {
    OpenIncomplete,
    OpenForReview,
    Approved,
    ClosedAccepted,
    ClosedRejected,
}

impl FolderStatus {
    pub const fn label(self) -> &'static str {
        match self {
            FolderStatus::OpenIncomplete => "open_incomplete",
            FolderStatus::OpenForReview => "open_for_review",
            FolderStatus::Approved => "approved",
            FolderStatus::ClosedAccepted => "closed_accepted",
            FolderStatus::ClosedRejected => "closed_rejected",
        }
    }

    pub const fn is_closed(self) -> bool {
        matches!(
            self,
            FolderStatus::ClosedAccepted | FolderStatus::ClosedRejected
        )
    }
}

/// Reviewer verdict on one pending document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject { reason: Option<String> },
}

/// Error raised by folder state-machine transitions.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FolderError {
    #[error("visa type '{0}' is not configured in the requirement catalog")]
    UnknownVisaType(String),
    #[error("requirement '{0}' is not part of this folder")]
    UnknownRequirement(String),
    #[error("document '{0}' has a version pending review; wait for the review outcome before uploading again")]
    UploadLocked(String),
    #[error("invalid folder state for this operation: {0}")]
    InvalidState(String),
    #[error("a rejection requires a reason")]
    MissingReason,
    #[error("no document was uploaded for requirement '{0}'")]
    DocumentNotFound(String),
}

/// Per-applicant document folder. One folder exists per visa application;
/// the required set is fixed at assignment time from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub applicant_id: String,
    pub visa_type: VisaType,
    documents: BTreeMap<String, DocumentRecord>,
    status: FolderStatus,
    outcome_reason: Option<String>,
}

impl Folder {
    /// Opens a folder with every required document Missing.
    pub fn open(
        id: FolderId,
        applicant_id: &str,
        visa_type: VisaType,
        requirements: &BTreeSet<String>,
    ) -> Self {
        let documents = requirements
            .iter()
            .map(|name| (name.clone(), DocumentRecord::missing(name)))
            .collect();
        Self {
            id,
            applicant_id: applicant_id.to_string(),
            visa_type,
            documents,
            status: FolderStatus::OpenIncomplete,
            outcome_reason: None,
        }
    }

    pub fn status(&self) -> FolderStatus {
        self.status
    }

    pub fn outcome_reason(&self) -> Option<&str> {
        self.outcome_reason.as_deref()
    }

    pub fn documents(&self) -> impl Iterator<Item = &DocumentRecord> {
        self.documents.values()
    }

    pub fn document(&self, requirement: &str) -> Option<&DocumentRecord> {
        self.documents.get(requirement)
    }

    /// Registers a new version for `requirement`. First upload creates
    /// version 1; later uploads increment the version, reset the status to
    /// Pending, and clear any earlier rejection reason.
    pub fn upload(&mut self, requirement: &str, file_ref: &str) -> Result<&DocumentRecord, FolderError> {
        if self.status.is_closed() {
            return Err(FolderError::InvalidState(
                "the folder is closed; no further uploads are accepted".to_string(),
            ));
        }
        let record = self
            .documents
            .get_mut(requirement)
            .ok_or_else(|| FolderError::UnknownRequirement(requirement.to_string()))?;
        match record.status {
            DocumentStatus::Pending => {
                return Err(FolderError::UploadLocked(requirement.to_string()))
            }
            DocumentStatus::Approved => {
                return Err(FolderError::InvalidState(format!(
                    "document '{requirement}' was already approved; new versions are not accepted"
                )))
            }
            DocumentStatus::Missing | DocumentStatus::Rejected => {}
        }

        record.version += 1;
        record.status = DocumentStatus::Pending;
        record.file_ref = Some(file_ref.to_string());
        record.rejection_reason = None;
        self.refold();
        Ok(self.documents.get(requirement).expect("record exists"))
    }

    /// Applies a reviewer decision to the pending document of `requirement`.
    /// Reviewing anything but a Pending version fails, so a second review of
    /// the same version is rejected rather than absorbed.
    pub fn review(
        &mut self,
        requirement: &str,
        decision: ReviewDecision,
    ) -> Result<&DocumentRecord, FolderError> {
        if self.status.is_closed() {
            return Err(FolderError::InvalidState(
                "the folder is closed; reviews are no longer accepted".to_string(),
            ));
        }
        let record = self
            .documents
            .get_mut(requirement)
            .ok_or_else(|| FolderError::UnknownRequirement(requirement.to_string()))?;
        if record.version == 0 {
            return Err(FolderError::DocumentNotFound(requirement.to_string()));
        }
        if record.status != DocumentStatus::Pending {
            return Err(FolderError::InvalidState(format!(
                "document '{requirement}' is {}; only pending documents can be reviewed",
                record.status.label()
            )));
        }

        match decision {
            ReviewDecision::Approve => {
                record.status = DocumentStatus::Approved;
                record.rejection_reason = None;
            }
            ReviewDecision::Reject { reason } => {
                let reason = reason
                    .map(|value| value.trim().to_string())
                    .filter(|value| !value.is_empty())
                    .ok_or(FolderError::MissingReason)?;
                record.status = DocumentStatus::Rejected;
                record.rejection_reason = Some(reason);
            }
        }
        self.refold();
        Ok(self.documents.get(requirement).expect("record exists"))
    }

    /// Records the final visa outcome. Only an Approved folder can be closed,
    /// and a rejection must carry a reason.
    pub fn record_outcome(
        &mut self,
        accepted: bool,
        reason: Option<String>,
    ) -> Result<FolderStatus, FolderError> {
        if self.status != FolderStatus::Approved {
            return Err(FolderError::InvalidState(format!(
                "visa outcomes apply to approved folders only; this folder is {}",
                self.status.label()
            )));
        }
        if accepted {
            self.status = FolderStatus::ClosedAccepted;
            self.outcome_reason = None;
        } else {
            let reason = reason
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(FolderError::MissingReason)?;
            self.status = FolderStatus::ClosedRejected;
            self.outcome_reason = Some(reason);
        }
        Ok(self.status)
    }

    /// Recomputes the folder status as a pure fold over document statuses.
    /// Closed states are terminal and never refolded.
    fn refold(&mut self) {
        if self.status.is_closed() {
            return;
        }
        self.status = derived_status(self.documents.values());
    }
}

fn derived_status<'a>(documents: impl Iterator<Item = &'a DocumentRecord>) -> FolderStatus {
    let mut any_missing = false;
    let mut all_approved = true;
    for record in documents {
        match record.status {
            DocumentStatus::Missing => {
                any_missing = true;
                all_approved = false;
            }
            DocumentStatus::Approved => {}
            DocumentStatus::Pending | DocumentStatus::Rejected => all_approved = false,
        }
    }
    if any_missing {
        FolderStatus::OpenIncomplete
    } else if all_approved {
        FolderStatus::Approved
    } else {
        FolderStatus::OpenForReview
    }
}
