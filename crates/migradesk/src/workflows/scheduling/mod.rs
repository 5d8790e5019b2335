//! Advisory-appointment scheduling engine.
//!
//! The scheduler owns the active-appointment index (one pending appointment
//! per applicant) and an agent pool with per-agent pending counts. Temporal
//! admissibility is decided by the pure helpers in [`hours`]; every operation
//! receives the caller's `now` so the engine never reads the wall clock.

pub mod domain;
pub mod hours;
pub mod pool;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Agent, AgentId, ApplicantId, Appointment, AppointmentId, AppointmentStatus, AppointmentView,
};
pub use hours::{sufficient_lead_time, within_business_hours, MIN_LEAD_DAYS};
pub use pool::AgentPool;
pub use router::{appointment_router, parse_slot};
pub use service::{ScheduleBoard, SchedulingError, SchedulingService};
