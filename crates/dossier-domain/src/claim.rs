//! Claim module - the scored assertions Dossier synthesizes from evidence

use std::fmt;

/// Unique identifier for a claim based on UUIDv7
///
/// UUIDv7 provides:
/// - Chronological sortability for temporal queries
/// - 128-bit uniqueness
/// - RFC 9562-standard format with broad ecosystem support
/// - No coordination required for distributed generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClaimId(u128);

impl ClaimId {
    /// Generate a new UUIDv7-based ClaimId
    ///
    /// # Examples
    ///
    /// ```
    /// use dossier_domain::ClaimId;
    ///
    /// let id = ClaimId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a ClaimId from a raw u128 value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a ClaimId from a UUIDv7 string
    ///
    /// # Examples
    ///
    /// ```
    /// use dossier_domain::ClaimId;
    ///
    /// let id = ClaimId::new();
    /// let parsed = ClaimId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid UUIDv7 string: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Get the timestamp component of the UUIDv7 (milliseconds since Unix epoch)
    pub fn timestamp(&self) -> u64 {
        // UUIDv7: top 48 bits are Unix millisecond timestamp
        (self.0 >> 80) as u64
    }
}

impl Default for ClaimId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Category of a claim
///
/// `Education` and `Certification` claims are only ever created from explicit
/// user input or document metadata; the synthesis oracle may not propose them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimType {
    /// A skill the person has (e.g. "Rust", "Distributed Systems")
    Skill,

    /// Something the person accomplished (e.g. "Led migration to Kubernetes")
    Achievement,

    /// A personal attribute or trait (e.g. "Detail-oriented")
    Attribute,

    /// A degree or formal education entry
    Education,

    /// A professional certification
    Certification,
}

impl ClaimType {
    /// Get the claim type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimType::Skill => "skill",
            ClaimType::Achievement => "achievement",
            ClaimType::Attribute => "attribute",
            ClaimType::Education => "education",
            ClaimType::Certification => "certification",
        }
    }

    /// Parse a claim type from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "skill" => Some(ClaimType::Skill),
            "achievement" => Some(ClaimType::Achievement),
            "attribute" => Some(ClaimType::Attribute),
            "education" => Some(ClaimType::Education),
            "certification" => Some(ClaimType::Certification),
            _ => None,
        }
    }

    /// Whether the synthesis oracle is allowed to propose new claims of this
    /// type
    pub fn oracle_proposable(&self) -> bool {
        matches!(
            self,
            ClaimType::Skill | ClaimType::Achievement | ClaimType::Attribute
        )
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A claim - a confidence-scored assertion about a person
///
/// Claims are created by the synthesis engine and mutated only by confidence
/// recalculation and explicit user edits. Confidence is a pure function of
/// the claim's current evidence link set, capped at 0.95.
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,

    /// Owning user
    pub user_id: String,

    /// Category of the claim
    pub claim_type: ClaimType,

    /// Short human-readable label (non-empty, trimmed)
    pub label: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Confidence in [0.0, 0.95]
    pub confidence: f64,

    /// Embedding of the label, used for candidate retrieval
    pub embedding: Vec<f32>,

    /// When this claim was created (seconds since Unix epoch)
    pub created_at: u64,

    /// When this claim was last updated (seconds since Unix epoch)
    pub updated_at: u64,
}

impl Claim {
    /// Create a new claim with a freshly trimmed label
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ClaimId,
        user_id: String,
        claim_type: ClaimType,
        label: String,
        description: Option<String>,
        confidence: f64,
        embedding: Vec<f32>,
        created_at: u64,
    ) -> Self {
        Self {
            id,
            user_id,
            claim_type,
            label: label.trim().to_string(),
            description,
            confidence,
            embedding,
            created_at,
            updated_at: created_at,
        }
    }
}
