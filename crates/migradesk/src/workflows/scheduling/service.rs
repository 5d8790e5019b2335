use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::NaiveDateTime;
use tracing::warn;

use super::domain::{
    Agent, AgentId, ApplicantId, Appointment, AppointmentId, AppointmentStatus,
};
use super::hours::{sufficient_lead_time, within_business_hours, MIN_LEAD_DAYS};
use super::pool::AgentPool;
use crate::workflows::notify::{ApplicantNotice, NotifierPublisher};

/// Error raised by scheduling operations. Every variant is a business-rule
/// rejection the caller can recover from; none are retried internally.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchedulingError {
    #[error("applicant already has a pending appointment")]
    ActiveAppointmentExists,
    #[error("appointments must start between 08:00 and 12:00")]
    OutsideBusinessHours,
    #[error("the booked appointment is {MIN_LEAD_DAYS} days away or less and can no longer be disturbed")]
    InsufficientLeadTime,
    #[error("no agent is available for the requested slot")]
    NoAgentAvailable,
    #[error("applicant has no pending appointment")]
    AppointmentNotFound,
    #[error("agent '{0}' is not registered")]
    AgentNotFound(String),
}

static APPOINTMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Upper bound on retained history entries; older ones are dropped. Durable
/// archival is the persistence collaborator's job, not the board's.
pub(crate) const HISTORY_LIMIT: usize = 1024;

fn next_appointment_id() -> AppointmentId {
    let id = APPOINTMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AppointmentId(format!("apt-{id:06}"))
}

/// Mutable scheduling state: the active-appointment index (pending
/// appointments keyed by applicant) plus the agent pool. All operations
/// validate every rule before touching state, so a rejected call leaves the
/// board untouched — appointment and counter mutations are applied together
/// or not at all.
#[derive(Debug, Default)]
pub struct ScheduleBoard {
    active: HashMap<ApplicantId, Appointment>,
    pool: AgentPool,
    history: Vec<Appointment>,
}

impl ScheduleBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_agent(&mut self, agent: Agent) {
        self.pool.register(agent);
    }

    pub fn pool(&self) -> &AgentPool {
        &self.pool
    }

    pub fn active(&self, applicant: &ApplicantId) -> Option<&Appointment> {
        self.active.get(applicant)
    }

    /// Completed and cancelled appointments, oldest first. Only the most
    /// recent entries are kept.
    pub fn history(&self) -> &[Appointment] {
        &self.history
    }

    /// Keeps the retained history bounded so a long-lived board cannot grow
    /// without limit.
    fn archive(&mut self, appointment: Appointment) {
        self.history.push(appointment);
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }
    }

    /// Agents free at `slot`: those without a pending appointment at exactly
    /// that slot. Computed from the index on every call rather than kept as a
    /// stored flag.
    pub fn available_agents(&self, slot: NaiveDateTime) -> Vec<AgentId> {
        self.available_agents_excluding(slot, None)
    }

    fn available_agents_excluding(
        &self,
        slot: NaiveDateTime,
        except: Option<&ApplicantId>,
    ) -> Vec<AgentId> {
        let busy: HashSet<AgentId> = self
            .active
            .values()
            .filter(|appointment| appointment.slot == slot)
            .filter(|appointment| Some(&appointment.applicant_id) != except)
            .map(|appointment| appointment.agent_id.clone())
            .collect();
        self.pool.available(&busy)
    }

    pub fn schedule(
        &mut self,
        applicant: &ApplicantId,
        slot: NaiveDateTime,
        _now: NaiveDateTime,
    ) -> Result<Appointment, SchedulingError> {
        if self.active.contains_key(applicant) {
            return Err(SchedulingError::ActiveAppointmentExists);
        }
        if !within_business_hours(slot) {
            return Err(SchedulingError::OutsideBusinessHours);
        }

        let candidates = self.available_agents(slot);
        let agent_id = self
            .pool
            .least_loaded(&candidates)
            .ok_or(SchedulingError::NoAgentAvailable)?;

        let appointment = Appointment {
            id: next_appointment_id(),
            applicant_id: applicant.clone(),
            agent_id: agent_id.clone(),
            slot,
            status: AppointmentStatus::Pending,
        };
        self.pool.increment(&agent_id)?;
        self.active.insert(applicant.clone(), appointment.clone());
        Ok(appointment)
    }

    pub fn reschedule(
        &mut self,
        applicant: &ApplicantId,
        new_slot: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Result<Appointment, SchedulingError> {
        let existing = self
            .active
            .get(applicant)
            .ok_or(SchedulingError::AppointmentNotFound)?;
        // The lead-time window protects the booking being disturbed, so it is
        // evaluated against the current slot, not the requested one.
        if !sufficient_lead_time(now, existing.slot) {
            return Err(SchedulingError::InsufficientLeadTime);
        }
        if !within_business_hours(new_slot) {
            return Err(SchedulingError::OutsideBusinessHours);
        }

        let current_agent = existing.agent_id.clone();
        // The applicant's own booking must not make its agent look busy when
        // the new slot collides with the old one.
        let candidates = self.available_agents_excluding(new_slot, Some(applicant));
        let reassigned = if candidates.contains(&current_agent) {
            // The booked agent is free at the new slot; keep them rather than
            // rebalancing load.
            None
        } else {
            Some(
                self.pool
                    .least_loaded(&candidates)
                    .ok_or(SchedulingError::NoAgentAvailable)?,
            )
        };

        if let Some(new_agent) = &reassigned {
            self.pool.decrement(&current_agent)?;
            self.pool.increment(new_agent)?;
        }

        let appointment = self
            .active
            .get_mut(applicant)
            .expect("appointment checked above");
        appointment.slot = new_slot;
        if let Some(new_agent) = reassigned {
            appointment.agent_id = new_agent;
        }
        Ok(appointment.clone())
    }

    pub fn cancel(
        &mut self,
        applicant: &ApplicantId,
        now: NaiveDateTime,
    ) -> Result<Appointment, SchedulingError> {
        let existing = self
            .active
            .get(applicant)
            .ok_or(SchedulingError::AppointmentNotFound)?;
        if !sufficient_lead_time(now, existing.slot) {
            return Err(SchedulingError::InsufficientLeadTime);
        }

        let mut appointment = self
            .active
            .remove(applicant)
            .expect("appointment checked above");
        appointment.status = AppointmentStatus::Cancelled;
        self.pool.decrement(&appointment.agent_id)?;
        self.archive(appointment.clone());
        Ok(appointment)
    }

    /// Marks the pending appointment completed once the review workflow has
    /// registered the applicant's requisites. The appointment leaves the
    /// active index so a later visit can be booked.
    pub fn complete(&mut self, applicant: &ApplicantId) -> Result<Appointment, SchedulingError> {
        let mut appointment = self
            .active
            .remove(applicant)
            .ok_or(SchedulingError::AppointmentNotFound)?;
        appointment.status = AppointmentStatus::Completed;
        self.pool.decrement(&appointment.agent_id)?;
        self.archive(appointment.clone());
        Ok(appointment)
    }
}

/// Service wrapping the board in one exclusive critical section per operation
/// and publishing best-effort notifications after each committed transition.
pub struct SchedulingService<N> {
    board: Mutex<ScheduleBoard>,
    notifier: Arc<N>,
}

impl<N> SchedulingService<N>
where
    N: NotifierPublisher + 'static,
{
    pub fn new(agents: Vec<Agent>, notifier: Arc<N>) -> Self {
        let mut board = ScheduleBoard::new();
        for agent in agents {
            board.register_agent(agent);
        }
        Self {
            board: Mutex::new(board),
            notifier,
        }
    }

    pub fn schedule(
        &self,
        applicant: &ApplicantId,
        slot: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Result<Appointment, SchedulingError> {
        let appointment = {
            let mut board = self.board.lock().expect("schedule board mutex poisoned");
            board.schedule(applicant, slot, now)?
        };
        self.notify("appointment_scheduled", &appointment);
        Ok(appointment)
    }

    pub fn reschedule(
        &self,
        applicant: &ApplicantId,
        new_slot: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Result<Appointment, SchedulingError> {
        let appointment = {
            let mut board = self.board.lock().expect("schedule board mutex poisoned");
            board.reschedule(applicant, new_slot, now)?
        };
        self.notify("appointment_rescheduled", &appointment);
        Ok(appointment)
    }

    pub fn cancel(
        &self,
        applicant: &ApplicantId,
        now: NaiveDateTime,
    ) -> Result<Appointment, SchedulingError> {
        let appointment = {
            let mut board = self.board.lock().expect("schedule board mutex poisoned");
            board.cancel(applicant, now)?
        };
        self.notify("appointment_cancelled", &appointment);
        Ok(appointment)
    }

    pub fn complete(&self, applicant: &ApplicantId) -> Result<Appointment, SchedulingError> {
        let appointment = {
            let mut board = self.board.lock().expect("schedule board mutex poisoned");
            board.complete(applicant)?
        };
        self.notify("appointment_completed", &appointment);
        Ok(appointment)
    }

    pub fn active(&self, applicant: &ApplicantId) -> Option<Appointment> {
        let board = self.board.lock().expect("schedule board mutex poisoned");
        board.active(applicant).cloned()
    }

    pub fn pending_count(&self, agent: &AgentId) -> Option<u32> {
        let board = self.board.lock().expect("schedule board mutex poisoned");
        board.pool().pending_count(agent)
    }

    /// Published outside the critical section; a failed publish never rolls
    /// back the committed transition.
    fn notify(&self, template: &str, appointment: &Appointment) {
        let notice = ApplicantNotice::new(template, &appointment.applicant_id.0)
            .with_detail("appointment_id", appointment.id.0.clone())
            .with_detail("agent_id", appointment.agent_id.0.clone())
            .with_detail("slot", appointment.slot.format("%Y-%m-%d %H:%M").to_string());
        if let Err(err) = self.notifier.publish(notice) {
            warn!(%err, template, "applicant notification failed");
        }
    }
}
