use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveDateTime};

use crate::workflows::notify::{ApplicantNotice, NotifierPublisher, NotifyError};
use crate::workflows::scheduling::domain::{Agent, AgentId, ApplicantId};
use crate::workflows::scheduling::service::SchedulingService;

pub(super) fn applicant(id: &str) -> ApplicantId {
    ApplicantId(id.to_string())
}

pub(super) fn agent(id: &str) -> Agent {
    Agent {
        id: AgentId(id.to_string()),
        name: format!("Agent {id}"),
    }
}

pub(super) fn agent_id(id: &str) -> AgentId {
    AgentId(id.to_string())
}

/// A valid in-hours slot `days` days after [`now`], at `hour` o'clock.
pub(super) fn slot(days: i64, hour: u32) -> NaiveDateTime {
    let base = NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date");
    base.checked_add_days(chrono::Days::new(days as u64))
        .expect("date in range")
        .and_hms_opt(hour, 0, 0)
        .expect("valid time")
}

/// Fixed evaluation instant all scenarios share: Monday 2026-03-02 at 09:00.
pub(super) fn now() -> NaiveDateTime {
    slot(0, 9)
}

pub(super) fn build_service(
    agents: Vec<Agent>,
) -> (Arc<SchedulingService<MemoryNotifier>>, Arc<MemoryNotifier>) {
    let notifier = Arc::new(MemoryNotifier::default());
    let service = Arc::new(SchedulingService::new(agents, notifier.clone()));
    (service, notifier)
}

pub(super) fn two_agent_service() -> (Arc<SchedulingService<MemoryNotifier>>, Arc<MemoryNotifier>)
{
    build_service(vec![agent("ana"), agent("bruno")])
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

/// Notifier whose transport always fails; state transitions must survive it.
pub(super) struct OfflineNotifier;

impl NotifierPublisher for OfflineNotifier {
    fn publish(&self, _notice: ApplicantNotice) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp relay offline".to_string()))
    }
}
