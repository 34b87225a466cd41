//! Integration tests for dossier-store
//!
//! These tests verify the full CRUD cycle for claims, evidence links,
//! and issues, including the cascade and upsert guarantees the
//! synthesis engine relies on.

use dossier_domain::traits::ClaimStore;
use dossier_domain::{
    Claim, ClaimId, ClaimIssue, ClaimType, EvidenceId, EvidenceLink, IssueId, IssueType,
    LinkStrength, Severity,
};
use dossier_store::SqliteStore;

fn claim_for(user: &str, claim_type: ClaimType, label: &str) -> Claim {
    Claim::new(
        ClaimId::new(),
        user.to_string(),
        claim_type,
        label.to_string(),
        None,
        0.6,
        vec![0.25; 8],
        1_700_000_000,
    )
}

fn issue_for(claim_id: ClaimId, related: Option<ClaimId>) -> ClaimIssue {
    ClaimIssue {
        id: IssueId::new(),
        claim_id,
        issue_type: if related.is_some() {
            IssueType::Duplicate
        } else {
            IssueType::MissingField
        },
        severity: if related.is_some() {
            Severity::Warning
        } else {
            Severity::Error
        },
        message: "test finding".to_string(),
        related_claim_id: related,
        created_at: 1_700_000_100,
        dismissed_at: None,
    }
}

#[test]
fn test_store_initialization() {
    let store = SqliteStore::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
}

#[test]
fn test_store_initialization_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("claims.db");

    {
        let mut store = SqliteStore::new(&path).unwrap();
        store
            .create_claim(claim_for("user-1", ClaimType::Skill, "Rust"))
            .unwrap();
    }

    // Reopening sees the persisted claim
    let store = SqliteStore::new(&path).unwrap();
    let claims = store.claims_for_user("user-1").unwrap();
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0].label, "Rust");
}

#[test]
fn test_create_and_get_claim() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let claim = Claim::new(
        ClaimId::new(),
        "user-1".to_string(),
        ClaimType::Skill,
        "Kubernetes".to_string(),
        Some("Container orchestration".to_string()),
        0.6,
        vec![0.1, 0.2, 0.3],
        1_700_000_000,
    );

    let id = store.create_claim(claim.clone()).unwrap();
    assert_eq!(id, claim.id);

    let retrieved = store.get_claim(id).unwrap().unwrap();
    assert_eq!(retrieved.user_id, claim.user_id);
    assert_eq!(retrieved.claim_type, claim.claim_type);
    assert_eq!(retrieved.label, claim.label);
    assert_eq!(retrieved.description, claim.description);
    assert_eq!(retrieved.confidence, claim.confidence);
    assert_eq!(retrieved.embedding, claim.embedding);
    assert_eq!(retrieved.created_at, claim.created_at);
    assert_eq!(retrieved.updated_at, claim.updated_at);
}

#[test]
fn test_duplicate_id_rejected() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let claim = claim_for("user-1", ClaimType::Skill, "Rust");
    store.create_claim(claim.clone()).unwrap();

    assert!(store.create_claim(claim).is_err());
}

#[test]
fn test_get_missing_claim() {
    let store = SqliteStore::new(":memory:").unwrap();
    assert!(store.get_claim(ClaimId::new()).unwrap().is_none());
}

#[test]
fn test_find_claim_by_type_and_label() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let claim = claim_for("user-1", ClaimType::Skill, "Rust");
    store.create_claim(claim.clone()).unwrap();
    store
        .create_claim(claim_for("user-1", ClaimType::Achievement, "Rust"))
        .unwrap();

    let found = store
        .find_claim("user-1", ClaimType::Skill, "Rust")
        .unwrap()
        .unwrap();
    assert_eq!(found.id, claim.id);

    // Untrimmed input still matches the stored trimmed label
    let found = store
        .find_claim("user-1", ClaimType::Skill, "  Rust  ")
        .unwrap();
    assert!(found.is_some());

    // Label comparison ignores case
    let found = store.find_claim("user-1", ClaimType::Skill, "rust").unwrap();
    assert!(found.is_some());

    // Other users see nothing
    assert!(store
        .find_claim("user-2", ClaimType::Skill, "Rust")
        .unwrap()
        .is_none());
}

#[test]
fn test_claims_scoped_to_user() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    store
        .create_claim(claim_for("user-1", ClaimType::Skill, "Rust"))
        .unwrap();
    store
        .create_claim(claim_for("user-1", ClaimType::Skill, "Go"))
        .unwrap();
    store
        .create_claim(claim_for("user-2", ClaimType::Skill, "Python"))
        .unwrap();

    assert_eq!(store.claims_for_user("user-1").unwrap().len(), 2);
    assert_eq!(store.claims_for_user("user-2").unwrap().len(), 1);
    assert!(store.claims_for_user("user-3").unwrap().is_empty());
}

#[test]
fn test_link_upsert_is_idempotent() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let claim = claim_for("user-1", ClaimType::Skill, "Rust");
    store.create_claim(claim.clone()).unwrap();

    let evidence_id = EvidenceId::new();
    store
        .upsert_link(EvidenceLink::new(claim.id, evidence_id, LinkStrength::Weak))
        .unwrap();
    store
        .upsert_link(EvidenceLink::new(claim.id, evidence_id, LinkStrength::Strong))
        .unwrap();

    // One row, last strength wins
    let links = store.links_for_claim(claim.id).unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].strength, LinkStrength::Strong);

    let by_evidence = store.links_for_evidence(evidence_id).unwrap();
    assert_eq!(by_evidence.len(), 1);
    assert_eq!(by_evidence[0].claim_id, claim.id);
}

#[test]
fn test_update_confidence() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let claim = claim_for("user-1", ClaimType::Skill, "Rust");
    store.create_claim(claim.clone()).unwrap();

    store
        .update_confidence(claim.id, 0.84, 1_700_000_500)
        .unwrap();

    let updated = store.get_claim(claim.id).unwrap().unwrap();
    assert_eq!(updated.confidence, 0.84);
    assert_eq!(updated.updated_at, 1_700_000_500);

    assert!(store
        .update_confidence(ClaimId::new(), 0.5, 1_700_000_500)
        .is_err());
}

#[test]
fn test_edit_claim_clears_issues() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let edited = claim_for("user-1", ClaimType::Skill, "Rust");
    let other = claim_for("user-1", ClaimType::Skill, "Rust Programming");
    store.create_claim(edited.clone()).unwrap();
    store.create_claim(other.clone()).unwrap();

    store.insert_issue(issue_for(edited.id, None)).unwrap();
    store
        .insert_issue(issue_for(other.id, Some(edited.id)))
        .unwrap();

    store
        .edit_claim(
            edited.id,
            "Rust (systems)".to_string(),
            Some("Edited by user".to_string()),
            1_700_001_000,
        )
        .unwrap();

    let updated = store.get_claim(edited.id).unwrap().unwrap();
    assert_eq!(updated.label, "Rust (systems)");
    assert_eq!(updated.description.as_deref(), Some("Edited by user"));
    assert_eq!(updated.updated_at, 1_700_001_000);

    // Both the claim's own issue and the pair naming it are gone
    assert!(store.issues_for_user("user-1").unwrap().is_empty());
}

#[test]
fn test_edit_missing_claim() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    assert!(store
        .edit_claim(ClaimId::new(), "x".to_string(), None, 1000)
        .is_err());
}

#[test]
fn test_delete_claim_cascades() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let doomed = claim_for("user-1", ClaimType::Skill, "Rust");
    let survivor = claim_for("user-1", ClaimType::Skill, "Go");
    store.create_claim(doomed.clone()).unwrap();
    store.create_claim(survivor.clone()).unwrap();

    store
        .upsert_link(EvidenceLink::new(
            doomed.id,
            EvidenceId::new(),
            LinkStrength::Medium,
        ))
        .unwrap();
    store.insert_issue(issue_for(doomed.id, None)).unwrap();
    store
        .insert_issue(issue_for(survivor.id, Some(doomed.id)))
        .unwrap();

    store.delete_claim(doomed.id).unwrap();

    assert!(store.get_claim(doomed.id).unwrap().is_none());
    assert!(store.links_for_claim(doomed.id).unwrap().is_empty());
    // Issues naming the deleted claim on either side are gone
    assert!(store.issues_for_user("user-1").unwrap().is_empty());
    // The other claim is untouched
    assert!(store.get_claim(survivor.id).unwrap().is_some());
}

#[test]
fn test_issue_roundtrip_and_dismissal() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let a = claim_for("user-1", ClaimType::Skill, "Rust");
    let b = claim_for("user-1", ClaimType::Skill, "Rust Programming");
    store.create_claim(a.clone()).unwrap();
    store.create_claim(b.clone()).unwrap();

    let issue = issue_for(b.id, Some(a.id));
    let issue_id = store.insert_issue(issue.clone()).unwrap();

    let issues = store.issues_for_user("user-1").unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].id, issue_id);
    assert_eq!(issues[0].claim_id, b.id);
    assert_eq!(issues[0].related_claim_id, Some(a.id));
    assert_eq!(issues[0].issue_type, IssueType::Duplicate);
    assert_eq!(issues[0].severity, Severity::Warning);
    assert!(!issues[0].is_dismissed());

    store.dismiss_issue(issue_id, 1_700_002_000).unwrap();

    let issues = store.issues_for_user("user-1").unwrap();
    assert_eq!(issues[0].dismissed_at, Some(1_700_002_000));
    assert!(issues[0].is_dismissed());

    assert!(store.dismiss_issue(IssueId::new(), 1_700_002_000).is_err());
}

#[test]
fn test_audit_claims_view() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let linked = claim_for("user-1", ClaimType::Skill, "Rust");
    let orphan = claim_for("user-1", ClaimType::Achievement, "Shipped v1");
    store.create_claim(linked.clone()).unwrap();
    store.create_claim(orphan.clone()).unwrap();

    store
        .upsert_link(EvidenceLink::new(
            linked.id,
            EvidenceId::new(),
            LinkStrength::Strong,
        ))
        .unwrap();
    store
        .upsert_link(EvidenceLink::new(
            linked.id,
            EvidenceId::new(),
            LinkStrength::Weak,
        ))
        .unwrap();

    let mut rows = store.audit_claims("user-1").unwrap();
    rows.sort_by_key(|r| r.label.clone());

    assert_eq!(rows.len(), 2);

    let linked_row = rows.iter().find(|r| r.id == linked.id).unwrap();
    assert_eq!(linked_row.claim_type, Some(ClaimType::Skill));
    assert_eq!(linked_row.evidence_count, Some(2));
    assert_eq!(linked_row.created_at, Some(linked.created_at));

    let orphan_row = rows.iter().find(|r| r.id == orphan.id).unwrap();
    assert_eq!(orphan_row.evidence_count, Some(0));
}
