//! Issue module - quality-audit findings produced by the rule engine

use crate::claim::ClaimId;
use std::fmt;

/// Unique identifier for an issue based on UUIDv7
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IssueId(u128);

impl IssueId {
    /// Generate a new UUIDv7-based IssueId
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create an IssueId from a raw u128 value (storage deserialization)
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for IssueId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Category of an audit finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueType {
    /// Two claims of the same type look like duplicates
    Duplicate,

    /// A claim is missing a required field
    MissingField,
}

impl IssueType {
    /// Get the issue type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Duplicate => "duplicate",
            IssueType::MissingField => "missing_field",
        }
    }

    /// Parse an issue type from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "duplicate" => Some(IssueType::Duplicate),
            "missing_field" => Some(IssueType::MissingField),
            _ => None,
        }
    }
}

/// How serious an audit finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The claim is structurally broken
    Error,

    /// The claim needs review but may be fine
    Warning,
}

impl Severity {
    /// Get the severity name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }

    /// Parse a severity from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "error" => Some(Severity::Error),
            "warning" => Some(Severity::Warning),
            _ => None,
        }
    }
}

/// The identity of a finding for dismissal suppression
///
/// A user dismissal suppresses re-flagging of the identical
/// `(claim, related claim, issue type)` tuple on subsequent audit runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IssueKey {
    /// The flagged claim
    pub claim_id: ClaimId,

    /// The other claim in a duplicate pair, if any
    pub related_claim_id: Option<ClaimId>,

    /// Category of the finding
    pub issue_type: IssueType,
}

/// A quality-audit finding attached to a claim
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimIssue {
    /// Unique identifier
    pub id: IssueId,

    /// The flagged claim
    pub claim_id: ClaimId,

    /// Category of the finding
    pub issue_type: IssueType,

    /// How serious the finding is
    pub severity: Severity,

    /// Human-readable explanation
    pub message: String,

    /// The other claim in a duplicate pair, if any
    pub related_claim_id: Option<ClaimId>,

    /// When the finding was produced (seconds since Unix epoch)
    pub created_at: u64,

    /// When the user dismissed the finding, if they did
    pub dismissed_at: Option<u64>,
}

impl ClaimIssue {
    /// The dismissal-suppression identity of this issue
    pub fn key(&self) -> IssueKey {
        IssueKey {
            claim_id: self.claim_id,
            related_claim_id: self.related_claim_id,
            issue_type: self.issue_type,
        }
    }

    /// Whether the user has dismissed this finding
    pub fn is_dismissed(&self) -> bool {
        self.dismissed_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_type_roundtrip() {
        assert_eq!(IssueType::parse("duplicate"), Some(IssueType::Duplicate));
        assert_eq!(IssueType::parse("missing_field"), Some(IssueType::MissingField));
        assert_eq!(IssueType::parse("stale"), None);
    }

    #[test]
    fn test_severity_roundtrip() {
        assert_eq!(Severity::parse("error"), Some(Severity::Error));
        assert_eq!(Severity::parse("warning"), Some(Severity::Warning));
        assert_eq!(Severity::parse("info"), None);
    }

    #[test]
    fn test_issue_key_identity() {
        let a = ClaimId::from_value(1);
        let b = ClaimId::from_value(2);

        let issue = ClaimIssue {
            id: IssueId::new(),
            claim_id: a,
            issue_type: IssueType::Duplicate,
            severity: Severity::Warning,
            message: "looks like a duplicate".to_string(),
            related_claim_id: Some(b),
            created_at: 1000,
            dismissed_at: None,
        };

        assert_eq!(
            issue.key(),
            IssueKey {
                claim_id: a,
                related_claim_id: Some(b),
                issue_type: IssueType::Duplicate,
            }
        );
        assert!(!issue.is_dismissed());
    }
}
