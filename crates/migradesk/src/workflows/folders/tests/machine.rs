use std::collections::BTreeSet;

use crate::workflows::folders::domain::{
    DocumentStatus, Folder, FolderError, FolderId, FolderStatus, ReviewDecision, VisaType,
};

fn two_requirement_folder() -> Folder {
    let requirements: BTreeSet<String> = ["ci", "oferta_laboral"]
        .iter()
        .map(|name| name.to_string())
        .collect();
    Folder::open(
        FolderId("fld-test".to_string()),
        "1712000001",
        VisaType::new("trabajo"),
        &requirements,
    )
}

fn approve(folder: &mut Folder, requirement: &str) {
    folder
        .review(requirement, ReviewDecision::Approve)
        .expect("approval succeeds");
}

#[test]
fn opening_a_folder_marks_every_requirement_missing() {
    let folder = two_requirement_folder();
    assert_eq!(folder.status(), FolderStatus::OpenIncomplete);
    assert!(folder
        .documents()
        .all(|record| record.status == DocumentStatus::Missing && record.version == 0));
}

#[test]
fn partial_upload_keeps_the_folder_incomplete() {
    let mut folder = two_requirement_folder();
    folder.upload("ci", "s3://docs/ci-v1.pdf").expect("upload");

    assert_eq!(folder.status(), FolderStatus::OpenIncomplete);
    let pending = folder.document("ci").expect("record exists");
    assert_eq!(pending.status, DocumentStatus::Pending);
    assert_eq!(pending.version, 1);
    let missing = folder.document("oferta_laboral").expect("record exists");
    assert_eq!(missing.status, DocumentStatus::Missing);
}

#[test]
fn uploading_the_last_requirement_moves_to_review() {
    let mut folder = two_requirement_folder();
    folder.upload("ci", "s3://docs/ci-v1.pdf").expect("upload");
    folder
        .upload("oferta_laboral", "s3://docs/oferta-v1.pdf")
        .expect("upload");

    assert_eq!(folder.status(), FolderStatus::OpenForReview);
}

#[test]
fn unknown_requirement_is_rejected() {
    let mut folder = two_requirement_folder();
    match folder.upload("acta_nacimiento", "s3://docs/x.pdf") {
        Err(FolderError::UnknownRequirement(name)) => assert_eq!(name, "acta_nacimiento"),
        other => panic!("expected unknown requirement, got {other:?}"),
    }
}

#[test]
fn pending_documents_lock_reupload_until_reviewed() {
    let mut folder = two_requirement_folder();
    folder.upload("ci", "s3://docs/ci-v1.pdf").expect("upload");

    match folder.upload("ci", "s3://docs/ci-v2.pdf") {
        Err(FolderError::UploadLocked(name)) => assert_eq!(name, "ci"),
        other => panic!("expected upload locked, got {other:?}"),
    }
    assert_eq!(folder.document("ci").expect("record").version, 1);
}

#[test]
fn rejection_stores_the_reason_and_reopens_upload() {
    let mut folder = two_requirement_folder();
    folder.upload("ci", "s3://docs/ci-v1.pdf").expect("upload");
    folder
        .upload("oferta_laboral", "s3://docs/oferta-v1.pdf")
        .expect("upload");

    let rejected = folder
        .review(
            "ci",
            ReviewDecision::Reject {
                reason: Some("ilegible".to_string()),
            },
        )
        .expect("rejection succeeds");
    assert_eq!(rejected.status, DocumentStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("ilegible"));
    assert_eq!(folder.status(), FolderStatus::OpenForReview);

    // A corrected version increments the lineage and clears the reason.
    let corrected = folder
        .upload("ci", "s3://docs/ci-v2.pdf")
        .expect("reupload succeeds");
    assert_eq!(corrected.version, 2);
    assert_eq!(corrected.status, DocumentStatus::Pending);
    assert!(corrected.rejection_reason.is_none());
}

#[test]
fn rejection_without_reason_is_refused() {
    let mut folder = two_requirement_folder();
    folder.upload("ci", "s3://docs/ci-v1.pdf").expect("upload");

    assert_eq!(
        folder.review("ci", ReviewDecision::Reject { reason: None }),
        Err(FolderError::MissingReason)
    );
    assert_eq!(
        folder.review(
            "ci",
            ReviewDecision::Reject {
                reason: Some("   ".to_string())
            }
        ),
        Err(FolderError::MissingReason)
    );
    // The document is still pending and reviewable.
    assert_eq!(
        folder.document("ci").expect("record").status,
        DocumentStatus::Pending
    );
}

#[test]
fn reviewing_the_same_version_twice_fails() {
    let mut folder = two_requirement_folder();
    folder.upload("ci", "s3://docs/ci-v1.pdf").expect("upload");
    approve(&mut folder, "ci");

    match folder.review("ci", ReviewDecision::Approve) {
        Err(FolderError::InvalidState(_)) => {}
        other => panic!("expected invalid state, got {other:?}"),
    }
}

#[test]
fn reviewing_a_never_uploaded_requirement_is_not_found() {
    let mut folder = two_requirement_folder();
    match folder.review("ci", ReviewDecision::Approve) {
        Err(FolderError::DocumentNotFound(name)) => assert_eq!(name, "ci"),
        other => panic!("expected document not found, got {other:?}"),
    }
}

#[test]
fn approving_every_document_approves_the_folder() {
    let mut folder = two_requirement_folder();
    folder.upload("ci", "s3://docs/ci-v1.pdf").expect("upload");
    folder
        .upload("oferta_laboral", "s3://docs/oferta-v1.pdf")
        .expect("upload");
    approve(&mut folder, "ci");
    assert_eq!(folder.status(), FolderStatus::OpenForReview);
    approve(&mut folder, "oferta_laboral");
    assert_eq!(folder.status(), FolderStatus::Approved);
}

#[test]
fn approved_documents_do_not_accept_new_versions() {
    let mut folder = two_requirement_folder();
    folder.upload("ci", "s3://docs/ci-v1.pdf").expect("upload");
    approve(&mut folder, "ci");

    match folder.upload("ci", "s3://docs/ci-v2.pdf") {
        Err(FolderError::InvalidState(_)) => {}
        other => panic!("expected invalid state, got {other:?}"),
    }
}

#[test]
fn accepted_outcome_closes_the_folder() {
    let mut folder = two_requirement_folder();
    folder.upload("ci", "s3://docs/ci-v1.pdf").expect("upload");
    folder
        .upload("oferta_laboral", "s3://docs/oferta-v1.pdf")
        .expect("upload");
    approve(&mut folder, "ci");
    approve(&mut folder, "oferta_laboral");

    let status = folder.record_outcome(true, None).expect("outcome recorded");
    assert_eq!(status, FolderStatus::ClosedAccepted);
    assert!(folder.outcome_reason().is_none());
}

#[test]
fn rejected_outcome_requires_and_stores_a_reason() {
    let mut folder = two_requirement_folder();
    folder.upload("ci", "s3://docs/ci-v1.pdf").expect("upload");
    folder
        .upload("oferta_laboral", "s3://docs/oferta-v1.pdf")
        .expect("upload");
    approve(&mut folder, "ci");
    approve(&mut folder, "oferta_laboral");

    assert_eq!(
        folder.record_outcome(false, None),
        Err(FolderError::MissingReason)
    );
    let status = folder
        .record_outcome(false, Some("antecedentes incompletos".to_string()))
        .expect("outcome recorded");
    assert_eq!(status, FolderStatus::ClosedRejected);
    assert_eq!(folder.outcome_reason(), Some("antecedentes incompletos"));
}

#[test]
fn outcomes_apply_to_approved_folders_only() {
    let mut folder = two_requirement_folder();
    assert_eq!(
        folder.record_outcome(true, None),
        Err(FolderError::InvalidState(
            "visa outcomes apply to approved folders only; this folder is open_incomplete"
                .to_string()
        ))
    );
}

#[test]
fn closed_folders_refuse_uploads_and_reviews() {
    let mut folder = two_requirement_folder();
    folder.upload("ci", "s3://docs/ci-v1.pdf").expect("upload");
    folder
        .upload("oferta_laboral", "s3://docs/oferta-v1.pdf")
        .expect("upload");
    approve(&mut folder, "ci");
    approve(&mut folder, "oferta_laboral");
    folder.record_outcome(true, None).expect("closed");

    assert!(matches!(
        folder.upload("ci", "s3://docs/ci-v2.pdf"),
        Err(FolderError::InvalidState(_))
    ));
    assert!(matches!(
        folder.review("ci", ReviewDecision::Approve),
        Err(FolderError::InvalidState(_))
    ));
}
