//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and
//! infrastructure. Infrastructure implementations live in other crates.

use crate::{AuditClaim, Claim, ClaimId, ClaimIssue, ClaimType, EvidenceId, EvidenceLink, IssueId};

/// Trait for storing claims, evidence links, and issues
///
/// Implemented by the infrastructure layer (dossier-store)
pub trait ClaimStore {
    /// Error type for store operations
    type Error;

    /// Persist a new claim
    fn create_claim(&mut self, claim: Claim) -> Result<ClaimId, Self::Error>;

    /// Get a claim by ID
    fn get_claim(&self, id: ClaimId) -> Result<Option<Claim>, Self::Error>;

    /// Find a user's claim by `(type, label)`, label compared trimmed and
    /// case-insensitively
    fn find_claim(
        &self,
        user_id: &str,
        claim_type: ClaimType,
        label: &str,
    ) -> Result<Option<Claim>, Self::Error>;

    /// List all claims owned by a user
    fn claims_for_user(&self, user_id: &str) -> Result<Vec<Claim>, Self::Error>;

    /// Apply a user edit to a claim's label and description
    ///
    /// A user correction outranks inferred findings, so this clears the
    /// claim's open issues.
    fn edit_claim(
        &mut self,
        id: ClaimId,
        label: String,
        description: Option<String>,
        updated_at: u64,
    ) -> Result<(), Self::Error>;

    /// Write back a recalculated confidence with a fresh update timestamp
    fn update_confidence(
        &mut self,
        id: ClaimId,
        confidence: f64,
        updated_at: u64,
    ) -> Result<(), Self::Error>;

    /// Delete a claim, cascading its evidence links and issues
    fn delete_claim(&mut self, id: ClaimId) -> Result<(), Self::Error>;

    /// Insert or update an evidence link (last strength wins, never a
    /// duplicate row)
    fn upsert_link(&mut self, link: EvidenceLink) -> Result<(), Self::Error>;

    /// All links currently attached to a claim
    fn links_for_claim(&self, claim_id: ClaimId) -> Result<Vec<EvidenceLink>, Self::Error>;

    /// All links referencing an evidence item
    fn links_for_evidence(&self, evidence_id: EvidenceId) -> Result<Vec<EvidenceLink>, Self::Error>;

    /// Record an audit finding
    fn insert_issue(&mut self, issue: ClaimIssue) -> Result<IssueId, Self::Error>;

    /// All issues (open and dismissed) attached to a user's claims
    fn issues_for_user(&self, user_id: &str) -> Result<Vec<ClaimIssue>, Self::Error>;

    /// Mark an issue as dismissed by the user
    fn dismiss_issue(&mut self, id: IssueId, dismissed_at: u64) -> Result<(), Self::Error>;

    /// The raw row view of a user's claims for the quality rule engine
    fn audit_claims(&self, user_id: &str) -> Result<Vec<AuditClaim>, Self::Error>;
}

/// A claim retrieved as a plausible match for new evidence
///
/// Transient: exists only within one synthesis call, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateClaim {
    /// The candidate claim's ID
    pub id: ClaimId,

    /// Its claim type
    pub claim_type: ClaimType,

    /// Its label
    pub label: String,

    /// Its description, if any
    pub description: Option<String>,

    /// Its current confidence
    pub confidence: f64,

    /// Cosine similarity to the query embedding
    pub similarity: f32,
}

/// Trait for nearest-neighbor candidate retrieval scoped to a user
///
/// Implementations return at most `count` candidates, ranked descending by
/// similarity.
pub trait CandidateRetriever {
    /// Error type for retrieval operations
    type Error;

    /// Retrieve candidate claims for new evidence
    fn retrieve(
        &self,
        user_id: &str,
        embedding: &[f32],
        count: usize,
    ) -> Result<Vec<CandidateClaim>, Self::Error>;
}

/// Trait for the LLM oracle that makes synthesis decisions
///
/// Implemented by the infrastructure layer (dossier-llm). The request is
/// free text; the response is free text expected to contain JSON.
pub trait LlmOracle {
    /// Error type for oracle operations
    type Error;

    /// Send a prompt and return the raw completion
    fn complete(&self, prompt: &str) -> Result<String, Self::Error>;
}
