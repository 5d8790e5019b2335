use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;
use migradesk::workflows::folders::domain::{Folder, FolderId};
use migradesk::workflows::folders::repository::{FolderRepository, RepositoryError};
use migradesk::workflows::notify::{ApplicantNotice, NotifierPublisher, NotifyError};
use migradesk::workflows::scheduling::domain::{Agent, AgentId};
use tracing::info;

pub(crate) use migradesk::workflows::scheduling::parse_slot;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Default advisory roster until agent administration grows an API surface.
pub(crate) fn default_agents() -> Vec<Agent> {
    [
        ("aguilar", "Sofia Aguilar"),
        ("benitez", "Marco Benitez"),
        ("castillo", "Lucia Castillo"),
    ]
    .into_iter()
    .map(|(id, name)| Agent {
        id: AgentId(id.to_string()),
        name: name.to_string(),
    })
    .collect()
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryFolderRepository {
    records: Arc<Mutex<HashMap<FolderId, Folder>>>,
}

impl FolderRepository for InMemoryFolderRepository {
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

/// Notifier adapter that records deliveries in the service log until a real
/// mail or SMS transport is wired in.
#[derive(Default, Clone)]
pub(crate) struct LoggingNotifier;

impl NotifierPublisher for LoggingNotifier {
    fn publish(&self, notice: ApplicantNotice) -> Result<(), NotifyError> {
        info!(
            template = %notice.template,
            applicant_id = %notice.applicant_id,
            details = ?notice.details,
            "applicant notification dispatched"
        );
        Ok(())
    }
}

/// Notifier adapter that keeps deliveries in memory so the CLI demo can list
/// them at the end of a run.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNotifier {
    events: Arc<Mutex<Vec<ApplicantNotice>>>,
}

impl InMemoryNotifier {
    pub(crate) fn events(&self) -> Vec<ApplicantNotice> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl NotifierPublisher for InMemoryNotifier {
    fn publish(&self, notice: ApplicantNotice) -> Result<(), NotifyError> {
        let mut guard = self.events.lock().expect("notifier mutex poisoned");
        guard.push(notice);
        Ok(())
    }
}
