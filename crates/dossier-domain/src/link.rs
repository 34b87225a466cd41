//! Evidence link module - the weighted join between evidence and claims

use crate::claim::ClaimId;
use crate::evidence::EvidenceId;
use std::fmt;

/// Qualitative weight of one evidence-to-claim link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkStrength {
    /// Tangential or indirect support
    Weak,

    /// Ordinary support
    Medium,

    /// Direct, explicit support
    Strong,
}

impl LinkStrength {
    /// Get the strength name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStrength::Weak => "weak",
            LinkStrength::Medium => "medium",
            LinkStrength::Strong => "strong",
        }
    }

    /// Parse a strength from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "weak" => Some(LinkStrength::Weak),
            "medium" => Some(LinkStrength::Medium),
            "strong" => Some(LinkStrength::Strong),
            _ => None,
        }
    }
}

impl fmt::Display for LinkStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A many-to-many join row between a claim and an evidence item
///
/// Re-submitting the same `(claim_id, evidence_id)` pair upserts: last
/// strength wins, never a duplicate row. A claim's confidence is a pure
/// function of its current link set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvidenceLink {
    /// The supported claim
    pub claim_id: ClaimId,

    /// The supporting evidence item
    pub evidence_id: EvidenceId,

    /// How strongly this evidence supports the claim
    pub strength: LinkStrength,
}

impl EvidenceLink {
    /// Create a new link
    pub fn new(claim_id: ClaimId, evidence_id: EvidenceId, strength: LinkStrength) -> Self {
        Self {
            claim_id,
            evidence_id,
            strength,
        }
    }
}
