use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::workflows::folders::catalog::RequirementCatalog;
use crate::workflows::folders::domain::{Folder, FolderId, VisaType};
use crate::workflows::folders::repository::{FolderRepository, RepositoryError};
use crate::workflows::folders::service::FolderService;
use crate::workflows::notify::{ApplicantNotice, NotifierPublisher, NotifyError};

pub(super) fn work_visa() -> VisaType {
    VisaType::new("trabajo")
}

/// Catalog with a two-requirement work visa so aggregate transitions are easy
/// to drive: {ci, oferta_laboral}.
pub(super) fn small_catalog() -> Arc<RequirementCatalog> {
    let csv = "visa_type,requirement\n\
               trabajo,ci\n\
               trabajo,oferta_laboral\n";
    Arc::new(RequirementCatalog::from_reader(csv.as_bytes()).expect("catalog parses"))
}

pub(super) fn build_service(
    catalog: Arc<RequirementCatalog>,
) -> (
    Arc<FolderService<MemoryFolderRepository, MemoryNotifier>>,
    Arc<MemoryFolderRepository>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(MemoryFolderRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = Arc::new(FolderService::new(
        catalog,
        repository.clone(),
        notifier.clone(),
    ));
    (service, repository, notifier)
}

#[derive(Default, Clone)]
pub(super) struct MemoryFolderRepository {
    records: Arc<Mutex<HashMap<FolderId, Folder>>>,
}

impl FolderRepository for MemoryFolderRepository {
    fn insert(&self, folder: Folder) -> Result<Folder, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&folder.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(folder.id.clone(), folder.clone());
        Ok(folder)
    }

    fn update(&self, folder: Folder) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&folder.id) {
            guard.insert(folder.id.clone(), folder);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &FolderId) -> Result<Option<Folder>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_by_applicant(&self, applicant_id: &str) -> Result<Option<Folder>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|folder| folder.applicant_id == applicant_id)
            .cloned())
    }
}

pub(super) struct UnavailableRepository;

impl FolderRepository for UnavailableRepository {
    fn insert(&self, _folder: Folder) -> Result<Folder, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _folder: Folder) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &FolderId) -> Result<Option<Folder>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_by_applicant(&self, _applicant_id: &str) -> Result<Option<Folder>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<ApplicantNotice>>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<ApplicantNotice> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl NotifierPublisher for MemoryNotifier {
    fn publish(&self, notice: ApplicantNotice) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(notice);
        Ok(())
    }
}

/// Notifier whose transport always fails; folder transitions must survive it.
pub(super) struct OfflineNotifier;

impl NotifierPublisher for OfflineNotifier {
    fn publish(&self, _notice: ApplicantNotice) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp relay offline".to_string()))
    }
}
