//! Document folder workflow: requirement assignment, upload/review
//! lifecycle, and the visa-outcome event that closes a folder.
//!
//! Folder status is never stored authoritatively next to document state; it
//! is refolded from the document records after every mutation so the two can
//! never drift apart.

pub mod catalog;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, RequirementCatalog};
pub use domain::{
    DocumentRecord, DocumentStatus, Folder, FolderError, FolderId, FolderStatus, ReviewDecision,
    VisaType,
};
pub use repository::{DocumentView, FolderRepository, FolderStatusView, RepositoryError};
pub use router::folder_router;
pub use service::{FolderService, FolderServiceError};
