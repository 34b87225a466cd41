//! Confidence scoring module
//!
//! Implements the deterministic confidence model: a claim's confidence is a
//! pure function of its current evidence link set, combining an evidence-count
//! tier with the mean strength multiplier, capped at [`CONFIDENCE_CEILING`].
//!
//! Recency decay and source weighting are provided as standalone primitives
//! for callers to compose; they are not folded into
//! [`confidence_from_links`].

use crate::claim::ClaimType;
use crate::evidence::EvidenceSource;
use crate::link::LinkStrength;

/// Hard ceiling on any claim's confidence. Synthesis never asserts certainty.
pub const CONFIDENCE_CEILING: f64 = 0.95;

/// Seconds in one year (365.25 days), used for half-life decay
pub const SECS_PER_YEAR: f64 = 365.25 * 86_400.0;

/// Base confidence from evidence count alone
///
/// Tiered rather than continuous: each additional corroborating item matters
/// less than the last.
pub fn base_confidence(evidence_count: usize) -> f64 {
    match evidence_count {
        n if n >= 4 => 0.9,
        3 => 0.8,
        2 => 0.7,
        _ => 0.5,
    }
}

/// Multiplier applied for the qualitative strength of one link
pub fn strength_multiplier(strength: LinkStrength) -> f64 {
    match strength {
        LinkStrength::Strong => 1.2,
        LinkStrength::Medium => 1.0,
        LinkStrength::Weak => 0.7,
    }
}

/// Reliability weight for an evidence source
pub fn source_weight(source: EvidenceSource) -> f64 {
    match source {
        EvidenceSource::Certification => 1.5,
        EvidenceSource::Resume => 1.0,
        EvidenceSource::Story => 0.8,
        EvidenceSource::Inferred => 0.6,
    }
}

/// Half-life in years for evidence supporting a claim type
///
/// `None` means the type does not decay (education and certifications stay
/// earned).
pub fn half_life_years(claim_type: ClaimType) -> Option<f64> {
    match claim_type {
        ClaimType::Skill => Some(4.0),
        ClaimType::Achievement => Some(7.0),
        ClaimType::Attribute => Some(15.0),
        ClaimType::Education | ClaimType::Certification => None,
    }
}

/// Compute a claim's confidence from its current link strengths
///
/// `confidence = min(ceiling, base_confidence(n) * mean(strength_multiplier))`,
/// floored at zero. An empty link set scores as a single-evidence claim with
/// a neutral multiplier.
pub fn confidence_from_links(strengths: &[LinkStrength]) -> f64 {
    let base = base_confidence(strengths.len());

    let mean_multiplier = if strengths.is_empty() {
        1.0
    } else {
        strengths.iter().map(|&s| strength_multiplier(s)).sum::<f64>() / strengths.len() as f64
    };

    (base * mean_multiplier).clamp(0.0, CONFIDENCE_CEILING)
}

/// Confidence for a freshly created claim with exactly one link
pub fn initial_confidence(strength: LinkStrength) -> f64 {
    (base_confidence(1) * strength_multiplier(strength)).clamp(0.0, CONFIDENCE_CEILING)
}

/// Exponential decay of evidence value with age
///
/// `0.5^(age_years / half_life)`. Returns 1.0 when the date is unknown, in
/// the future, or the claim type has no half-life.
pub fn recency_decay(evidence_at: Option<u64>, claim_type: ClaimType, now: u64) -> f64 {
    let Some(evidence_at) = evidence_at else {
        return 1.0;
    };

    let Some(half_life) = half_life_years(claim_type) else {
        return 1.0;
    };

    if evidence_at >= now {
        return 1.0;
    }

    let age_years = (now - evidence_at) as f64 / SECS_PER_YEAR;
    0.5_f64.powf(age_years / half_life)
}
