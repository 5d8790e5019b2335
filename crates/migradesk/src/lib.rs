//! Case-management core for a migration advisory agency.
//!
//! Two linked workflows live under [`workflows`]: appointment scheduling
//! (business-hours and lead-time rules, least-loaded agent assignment) and
//! document folder tracking (visa-type requirement lists, document
//! versioning, review outcomes). Everything else here is plumbing: env-driven
//! configuration, tracing setup, and the error surface the HTTP service maps
//! to responses.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
