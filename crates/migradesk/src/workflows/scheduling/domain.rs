use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for applicants (external identity, e.g. a national ID).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicantId(pub String);

/// Identifier wrapper for advisory agents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub String);

/// Identifier wrapper for appointments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppointmentId(pub String);

/// Roster entry for an advisory agent. Availability is never stored here; it
/// is derived from the appointment index for a given slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
}

/// High level status tracked for each appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

/// A booked advisory appointment between one applicant and one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub applicant_id: ApplicantId,
    pub agent_id: AgentId,
    pub slot: NaiveDateTime,
    pub status: AppointmentStatus,
}

impl Appointment {
    pub fn view(&self) -> AppointmentView {
        AppointmentView {
            appointment_id: self.id.clone(),
            applicant_id: self.applicant_id.clone(),
            agent_id: self.agent_id.clone(),
            slot: self.slot,
            status: self.status.label(),
        }
    }
}

/// Sanitized representation of an appointment for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentView {
    pub appointment_id: AppointmentId,
    pub applicant_id: ApplicantId,
    pub agent_id: AgentId,
    pub slot: NaiveDateTime,
    pub status: &'static str,
}
