use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::warn;

use super::catalog::RequirementCatalog;
use super::domain::{Folder, FolderError, FolderId, FolderStatus, ReviewDecision, VisaType};
use super::repository::{FolderRepository, RepositoryError};
use crate::workflows::notify::{ApplicantNotice, NotifierPublisher};

/// Service composing the requirement catalog, folder repository, and
/// notifier into the review workflow.
pub struct FolderService<R, N> {
    catalog: Arc<RequirementCatalog>,
    repository: Arc<R>,
    notifier: Arc<N>,
    /// Folder mutations are check-then-act sequences against the repository;
    /// this gate makes each one an exclusive critical section so concurrent
    /// uploads or reviews cannot race past the state checks. No blocking I/O
    /// happens while it is held.
    gate: Mutex<()>,
}

static FOLDER_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_folder_id() -> FolderId {
    let id = FOLDER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    FolderId(format!("fld-{id:06}"))
}

/// Error raised by the folder service.
#[derive(Debug, thiserror::Error)]
pub enum FolderServiceError {
    #[error(transparent)]
    State(#[from] FolderError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl<R, N> FolderService<R, N>
where
    R: FolderRepository + 'static,
    N: NotifierPublisher + 'static,
{
    pub fn new(catalog: Arc<RequirementCatalog>, repository: Arc<R>, notifier: Arc<N>) -> Self {
        Self {
            catalog,
            repository,
            notifier,
            gate: Mutex::new(()),
        }
    }

    /// Opens a folder for the applicant with every catalog requirement for
    /// the visa type set to Missing. One folder per applicant.
    pub fn assign_requirements(
        &self,
        applicant_id: &str,
        visa_type: VisaType,
    ) -> Result<Folder, FolderServiceError> {
        let requirements = self.catalog.requirements_for(&visa_type)?.clone();

        let folder = {
            let _guard = self.gate.lock().expect("folder gate poisoned");
            if self.repository.find_by_applicant(applicant_id)?.is_some() {
                return Err(RepositoryError::Conflict.into());
            }
            let folder = Folder::open(next_folder_id(), applicant_id, visa_type, &requirements);
            self.repository.insert(folder)?
        };

        self.notify(
            ApplicantNotice::new("folder_opened", applicant_id)
                .with_detail("folder_id", folder.id.0.clone())
                .with_detail("visa_type", folder.visa_type.0.clone())
                .with_detail("requirements", requirements.len().to_string()),
        );
        Ok(folder)
    }

    /// Stores a new version for a requirement and refolds the folder status.
    pub fn upload(
        &self,
        folder_id: &FolderId,
        requirement: &str,
        file_ref: &str,
    ) -> Result<Folder, FolderServiceError> {
        let (folder, version) = {
            let _guard = self.gate.lock().expect("folder gate poisoned");
            let mut folder = self
                .repository
                .fetch(folder_id)?
                .ok_or(RepositoryError::NotFound)?;
            let version = folder.upload(requirement, file_ref)?.version;
            self.repository.update(folder.clone())?;
            (folder, version)
        };

        self.notify(
            ApplicantNotice::new("document_uploaded", &folder.applicant_id)
                .with_detail("requirement", requirement)
                .with_detail("version", version.to_string())
                .with_detail("folder_status", folder.status().label()),
        );
        Ok(folder)
    }

    /// Applies a reviewer decision and refolds the folder status.
    pub fn review(
        &self,
        folder_id: &FolderId,
        requirement: &str,
        decision: ReviewDecision,
    ) -> Result<Folder, FolderServiceError> {
        let template = match &decision {
            ReviewDecision::Approve => "document_approved",
            ReviewDecision::Reject { .. } => "document_rejected",
        };

        let (folder, reason) = {
            let _guard = self.gate.lock().expect("folder gate poisoned");
            let mut folder = self
                .repository
                .fetch(folder_id)?
                .ok_or(RepositoryError::NotFound)?;
            let reason = folder
                .review(requirement, decision)?
                .rejection_reason
                .clone();
            self.repository.update(folder.clone())?;
            (folder, reason)
        };

        let mut notice = ApplicantNotice::new(template, &folder.applicant_id)
            .with_detail("requirement", requirement)
            .with_detail("folder_status", folder.status().label());
        if let Some(reason) = reason {
            notice = notice.with_detail("reason", reason);
        }
        self.notify(notice);
        Ok(folder)
    }

    /// Records the final visa outcome on an approved folder, closing it.
    pub fn record_visa_outcome(
        &self,
        folder_id: &FolderId,
        accepted: bool,
        reason: Option<String>,
    ) -> Result<Folder, FolderServiceError> {
        let folder = {
            let _guard = self.gate.lock().expect("folder gate poisoned");
            let mut folder = self
                .repository
                .fetch(folder_id)?
                .ok_or(RepositoryError::NotFound)?;
            folder.record_outcome(accepted, reason)?;
            self.repository.update(folder.clone())?;
            folder
        };

        let template = match folder.status() {
            FolderStatus::ClosedAccepted => "visa_accepted",
            _ => "visa_rejected",
        };
        let mut notice = ApplicantNotice::new(template, &folder.applicant_id)
            .with_detail("folder_id", folder.id.0.clone());
        if let Some(reason) = folder.outcome_reason() {
            notice = notice.with_detail("reason", reason);
        }
        self.notify(notice);
        Ok(folder)
    }

    /// Fetch a folder for API responses.
    pub fn get(&self, folder_id: &FolderId) -> Result<Folder, FolderServiceError> {
        let folder = self
            .repository
            .fetch(folder_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(folder)
    }

    pub fn find_by_applicant(&self, applicant_id: &str) -> Result<Option<Folder>, FolderServiceError> {
        Ok(self.repository.find_by_applicant(applicant_id)?)
    }

    /// Published after the repository update commits; a failed publish never
    /// rolls the transition back.
    fn notify(&self, notice: ApplicantNotice) {
        let template = notice.template.clone();
        if let Err(err) = self.notifier.publish(notice) {
            warn!(%err, template, "applicant notification failed");
        }
    }
}
