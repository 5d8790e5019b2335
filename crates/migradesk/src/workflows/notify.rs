use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Trait describing outbound applicant notifications (e-mail, SMS, or push
/// adapters live behind it). Delivery is best-effort from the core's
/// perspective: services log a failed publish and keep the committed state.
pub trait NotifierPublisher: Send + Sync {
    fn publish(&self, notice: ApplicantNotice) -> Result<(), NotifyError>;
}

/// Notification payload so routes/tests can assert integration boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantNotice {
    pub template: String,
    pub applicant_id: String,
    pub details: BTreeMap<String, String>,
}

impl ApplicantNotice {
    pub fn new(template: &str, applicant_id: &str) -> Self {
        Self {
            template: template.to_string(),
            applicant_id: applicant_id.to_string(),
            details: BTreeMap::new(),
        }
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<String>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
