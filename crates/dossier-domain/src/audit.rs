//! Audit view - the raw row shape the rule engine inspects
//!
//! The typed [`Claim`](crate::Claim) cannot represent a malformed row (a null
//! type, a missing timestamp), but the rule engine's whole job is to find
//! such rows. Stores therefore expose this looser view for auditing.

use crate::claim::{ClaimId, ClaimType};

/// One claim row as seen by the quality rule engine
#[derive(Debug, Clone, PartialEq)]
pub struct AuditClaim {
    /// Unique identifier
    pub id: ClaimId,

    /// Claim type; `None` when the stored value is null or unrecognized
    pub claim_type: Option<ClaimType>,

    /// Stored label, untrimmed
    pub label: String,

    /// Creation timestamp; `None` sorts as oldest
    pub created_at: Option<u64>,

    /// Number of evidence links; `None` is treated as zero
    pub evidence_count: Option<usize>,
}

impl AuditClaim {
    /// Whether the label is empty or whitespace-only
    pub fn label_is_blank(&self) -> bool {
        self.label.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_labels() {
        let mut claim = AuditClaim {
            id: ClaimId::from_value(1),
            claim_type: Some(ClaimType::Skill),
            label: "Rust".to_string(),
            created_at: Some(1000),
            evidence_count: Some(2),
        };
        assert!(!claim.label_is_blank());

        claim.label = "   ".to_string();
        assert!(claim.label_is_blank());

        claim.label = String::new();
        assert!(claim.label_is_blank());
    }
}
