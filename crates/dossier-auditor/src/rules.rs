//! Quality rules over a user's claim set
//!
//! Pure functions from audit rows to findings. Suppression against
//! existing issues and persistence happen in the [`crate::Auditor`];
//! everything here is deterministic and store-free.

use crate::similarity::{distinct_trailing_tokens, jaro_winkler};
use dossier_domain::{AuditClaim, ClaimId};

/// A possible-duplicate pair
///
/// `claim_id` is the newer claim of the pair; a claim with no creation
/// timestamp counts as the oldest.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateFinding {
    /// The newer claim, which carries the issue
    pub claim_id: ClaimId,

    /// The older claim it appears to duplicate
    pub related_claim_id: ClaimId,

    /// Label similarity that triggered the finding
    pub similarity: f64,

    /// Label of the older claim, for the issue message
    pub related_label: String,
}

/// Fields a claim can be missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    /// The claim has no type
    ClaimType,

    /// The claim's label is blank
    Label,
}

impl MissingField {
    /// Field name for issue messages
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingField::ClaimType => "type",
            MissingField::Label => "label",
        }
    }
}

/// A missing-field finding
#[derive(Debug, Clone, PartialEq)]
pub struct MissingFieldFinding {
    /// The broken claim
    pub claim_id: ClaimId,

    /// Which field is missing
    pub field: MissingField,
}

/// Find possible-duplicate pairs among same-type claims
///
/// Two claims are flagged when their types match and their labels are
/// equal ignoring case, or score above `threshold` on Jaro-Winkler
/// without ending in distinguishing tokens. Claims with no type are
/// left to the missing-field rule.
pub fn find_duplicates(claims: &[AuditClaim], threshold: f64) -> Vec<DuplicateFinding> {
    let mut findings = Vec::new();

    for (i, a) in claims.iter().enumerate() {
        let Some(a_type) = a.claim_type else {
            continue;
        };

        for b in claims.iter().skip(i + 1) {
            if b.claim_type != Some(a_type) {
                continue;
            }

            let label_a = a.label.trim();
            let label_b = b.label.trim();
            if label_a.is_empty() || label_b.is_empty() {
                continue;
            }

            let exact = label_a.eq_ignore_ascii_case(label_b);
            let similarity = if exact {
                1.0
            } else {
                jaro_winkler(&label_a.to_lowercase(), &label_b.to_lowercase())
            };

            if !exact {
                if similarity <= threshold {
                    continue;
                }
                if distinct_trailing_tokens(label_a, label_b) {
                    continue;
                }
            }

            let (newer, older) = if is_newer(a, b) { (a, b) } else { (b, a) };
            findings.push(DuplicateFinding {
                claim_id: newer.id,
                related_claim_id: older.id,
                similarity,
                related_label: older.label.trim().to_string(),
            });
        }
    }

    findings
}

/// Whether `a` was created after `b`; a missing timestamp sorts oldest
fn is_newer(a: &AuditClaim, b: &AuditClaim) -> bool {
    match (a.created_at, b.created_at) {
        (Some(ta), Some(tb)) if ta != tb => ta > tb,
        (Some(_), None) => true,
        (None, Some(_)) => false,
        // Equal or both unknown; UUIDv7 ids are time-ordered
        _ => a.id > b.id,
    }
}

/// Find claims missing a type or a label
///
/// The two checks are independent; one claim can produce both findings.
pub fn find_missing_fields(claims: &[AuditClaim]) -> Vec<MissingFieldFinding> {
    let mut findings = Vec::new();

    for claim in claims {
        if claim.claim_type.is_none() {
            findings.push(MissingFieldFinding {
                claim_id: claim.id,
                field: MissingField::ClaimType,
            });
        }
        if claim.label_is_blank() {
            findings.push(MissingFieldFinding {
                claim_id: claim.id,
                field: MissingField::Label,
            });
        }
    }

    findings
}

/// Every finding the rule set produced for one claim set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleFindings {
    /// Possible-duplicate pairs
    pub duplicates: Vec<DuplicateFinding>,

    /// Claims missing a type or label
    pub missing_fields: Vec<MissingFieldFinding>,
}

/// Run every quality rule over one user's claim set
pub fn run_rule_checks(claims: &[AuditClaim], duplicate_threshold: f64) -> RuleFindings {
    RuleFindings {
        duplicates: find_duplicates(claims, duplicate_threshold),
        missing_fields: find_missing_fields(claims),
    }
}

/// Pick the claims most in need of review
///
/// Orders by evidence count ascending (least-supported first), breaking
/// ties newest first, and returns at most `max_count`. An unknown
/// evidence count sorts as zero; an unknown creation time sorts oldest.
pub fn sample_claims_for_eval(claims: &[AuditClaim], max_count: usize) -> Vec<AuditClaim> {
    let mut sorted: Vec<AuditClaim> = claims.to_vec();
    sorted.sort_by(|a, b| {
        let count_a = a.evidence_count.unwrap_or(0);
        let count_b = b.evidence_count.unwrap_or(0);
        count_a
            .cmp(&count_b)
            .then_with(|| b.created_at.unwrap_or(0).cmp(&a.created_at.unwrap_or(0)))
    });
    sorted.truncate(max_count);
    sorted
}
