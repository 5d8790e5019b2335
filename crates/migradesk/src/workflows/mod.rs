//! Workflow modules for the two halves of the case-management core.
//!
//! `scheduling` owns the advisory-appointment engine (business hours, lead
//! time, agent load balancing); `folders` owns the document folder state
//! machine (requirement catalogs, document versions, review outcomes).
//! `notify` is the shared outbound-notification seam both services publish to.

pub mod folders;
pub mod notify;
pub mod scheduling;
