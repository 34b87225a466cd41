//! Evidence module - the raw snippets claims are synthesized from

use std::fmt;

/// Maximum evidence text length accepted by the synthesis engine, in
/// characters. Oversized items are skipped without any collaborator calls.
pub const MAX_EVIDENCE_TEXT_CHARS: usize = 5000;

/// Unique identifier for an evidence item based on UUIDv7
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EvidenceId(u128);

impl EvidenceId {
    /// Generate a new UUIDv7-based EvidenceId
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create an EvidenceId from a raw u128 value (storage deserialization)
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for EvidenceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EvidenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// What kind of signal an evidence snippet carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvidenceType {
    /// Describes something the person accomplished
    Accomplishment,

    /// A skill explicitly listed (e.g. in a resume skills section)
    SkillListed,

    /// Indicates a personal trait
    TraitIndicator,

    /// An education entry
    Education,

    /// A certification entry
    Certification,
}

impl EvidenceType {
    /// Get the evidence type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceType::Accomplishment => "accomplishment",
            EvidenceType::SkillListed => "skill_listed",
            EvidenceType::TraitIndicator => "trait_indicator",
            EvidenceType::Education => "education",
            EvidenceType::Certification => "certification",
        }
    }

    /// Parse an evidence type from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "accomplishment" => Some(EvidenceType::Accomplishment),
            "skill_listed" => Some(EvidenceType::SkillListed),
            "trait_indicator" => Some(EvidenceType::TraitIndicator),
            "education" => Some(EvidenceType::Education),
            "certification" => Some(EvidenceType::Certification),
            _ => None,
        }
    }
}

impl fmt::Display for EvidenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an evidence item originated, used for reliability weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvidenceSource {
    /// Verified certification records (most reliable)
    Certification,

    /// Resume or CV text
    Resume,

    /// Free-form personal story
    Story,

    /// Inferred by the system rather than stated
    Inferred,
}

impl EvidenceSource {
    /// Get the source name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceSource::Certification => "certification",
            EvidenceSource::Resume => "resume",
            EvidenceSource::Story => "story",
            EvidenceSource::Inferred => "inferred",
        }
    }

    /// Parse a source from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "certification" => Some(EvidenceSource::Certification),
            "resume" => Some(EvidenceSource::Resume),
            "story" => Some(EvidenceSource::Story),
            "inferred" => Some(EvidenceSource::Inferred),
            _ => None,
        }
    }
}

/// One evidence snippet, immutable once created
///
/// Evidence is owned by the document or story that produced it; the synthesis
/// engine only reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceItem {
    /// Unique identifier
    pub id: EvidenceId,

    /// The snippet text (at most [`MAX_EVIDENCE_TEXT_CHARS`] characters)
    pub text: String,

    /// What kind of signal this snippet carries
    pub evidence_type: EvidenceType,

    /// Fixed-dimension embedding of the text
    pub embedding: Vec<f32>,

    /// Where the snippet originated, if known
    pub source: Option<EvidenceSource>,

    /// When the underlying event occurred (seconds since Unix epoch), if known
    pub occurred_at: Option<u64>,
}

impl EvidenceItem {
    /// Whether the text fits within the synthesis engine's size limit
    pub fn within_size_limit(&self) -> bool {
        self.text.chars().count() <= MAX_EVIDENCE_TEXT_CHARS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(text: &str) -> EvidenceItem {
        EvidenceItem {
            id: EvidenceId::new(),
            text: text.to_string(),
            evidence_type: EvidenceType::SkillListed,
            embedding: vec![0.0; 8],
            source: None,
            occurred_at: None,
        }
    }

    #[test]
    fn test_evidence_type_roundtrip() {
        for et in [
            EvidenceType::Accomplishment,
            EvidenceType::SkillListed,
            EvidenceType::TraitIndicator,
            EvidenceType::Education,
            EvidenceType::Certification,
        ] {
            assert_eq!(EvidenceType::parse(et.as_str()), Some(et));
        }
        assert_eq!(EvidenceType::parse("other"), None);
    }

    #[test]
    fn test_evidence_source_roundtrip() {
        for src in [
            EvidenceSource::Certification,
            EvidenceSource::Resume,
            EvidenceSource::Story,
            EvidenceSource::Inferred,
        ] {
            assert_eq!(EvidenceSource::parse(src.as_str()), Some(src));
        }
    }

    #[test]
    fn test_size_limit_boundary() {
        assert!(item(&"a".repeat(MAX_EVIDENCE_TEXT_CHARS)).within_size_limit());
        assert!(!item(&"a".repeat(MAX_EVIDENCE_TEXT_CHARS + 1)).within_size_limit());
    }

    #[test]
    fn test_size_limit_counts_chars_not_bytes() {
        // Multibyte characters count once each
        let text = "é".repeat(MAX_EVIDENCE_TEXT_CHARS);
        assert!(text.len() > MAX_EVIDENCE_TEXT_CHARS);
        assert!(item(&text).within_size_limit());
    }
}
