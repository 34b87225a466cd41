//! Dossier Domain Layer
//!
//! This crate contains the core business logic and domain model for Dossier.
//! It has near-zero external dependencies and defines the fundamental
//! concepts, value objects, and trait interfaces that all other layers depend
//! upon.
//!
//! ## Key Concepts
//!
//! - **Claim**: a scored, labeled assertion about a person (skill,
//!   achievement, attribute, education, certification)
//! - **Evidence**: a short text snippet (with embedding) supporting zero or
//!   more claims
//! - **Evidence link**: a weighted (weak/medium/strong) join between one
//!   evidence item and one claim
//! - **Confidence**: a scalar in [0, 0.95] derived purely from a claim's
//!   current link set
//! - **Issue**: a quality-audit finding (duplicate or missing field) produced
//!   by the rule engine
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture:
//! - Pure business logic only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod audit;
pub mod claim;
pub mod evidence;
pub mod issue;
pub mod link;
pub mod scoring;
pub mod traits;

// Re-exports for convenience
pub use audit::AuditClaim;
pub use claim::{Claim, ClaimId, ClaimType};
pub use evidence::{EvidenceId, EvidenceItem, EvidenceSource, EvidenceType, MAX_EVIDENCE_TEXT_CHARS};
pub use issue::{ClaimIssue, IssueId, IssueKey, IssueType, Severity};
pub use link::{EvidenceLink, LinkStrength};
