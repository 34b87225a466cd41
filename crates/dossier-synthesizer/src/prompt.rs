//! Prompt engineering for synthesis decisions

use dossier_domain::traits::CandidateClaim;
use dossier_domain::EvidenceType;

/// Builds the decision prompt for one evidence item
pub struct DecisionPromptBuilder {
    evidence_text: String,
    evidence_type: EvidenceType,
    candidates: Vec<CandidateClaim>,
}

impl DecisionPromptBuilder {
    /// Create a new prompt builder for an evidence snippet
    pub fn new(evidence_text: String, evidence_type: EvidenceType) -> Self {
        Self {
            evidence_text,
            evidence_type,
            candidates: Vec::new(),
        }
    }

    /// Add the retrieved candidate claims
    pub fn with_candidates(mut self, candidates: Vec<CandidateClaim>) -> Self {
        self.candidates = candidates;
        self
    }

    /// Build the complete decision prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(DECISION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str(&format!("Evidence type: {}\n\n", self.evidence_type));

        if self.candidates.is_empty() {
            prompt.push_str("Existing claims: none\n\n");
        } else {
            prompt.push_str("Existing claims (candidates for a match):\n");
            for candidate in &self.candidates {
                let description = candidate.description.as_deref().unwrap_or("-");
                prompt.push_str(&format!(
                    "- \"{}\" ({}) | {}\n",
                    candidate.label, candidate.claim_type, description,
                ));
            }
            prompt.push('\n');
        }

        prompt.push_str("Evidence to assess:\n");
        prompt.push_str("---\n");
        prompt.push_str(&self.evidence_text);
        prompt.push_str("\n---\n\n");

        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

const DECISION_INSTRUCTIONS: &str = r#"You are assessing one piece of evidence about a person.
Decide whether it supports one of the existing claims listed below, justifies a brand new claim, or neither.

Rules:
- Prefer matching an existing claim over proposing a new one; only propose a new claim when no candidate covers the same skill, achievement, or attribute
- A match must refer to the same underlying fact, not merely a related topic
- New claims may only be of type "skill", "achievement", or "attribute"
- Labels must be short noun phrases (e.g. "Rust", "Led Kubernetes migration"), never full sentences
- Strength reflects how directly the evidence supports the claim:
  - "strong": the evidence states or demonstrates it outright
  - "medium": the evidence clearly implies it
  - "weak": the evidence only hints at it
- If the evidence carries no claim-worthy signal, answer "none""#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Answer with a single JSON object and no additional text, in one of these three shapes:

Match an existing claim (use its exact label from the candidate list):
{"match": "<candidate label>", "strength": "strong|medium|weak", "new_claim": null}

Propose a new claim:
{"match": null, "strength": "strong|medium|weak", "new_claim": {"type": "skill|achievement|attribute", "label": "...", "description": "... or null"}}

No claim-worthy signal:
{"match": null, "strength": "weak", "new_claim": null}"#;

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_domain::{ClaimId, ClaimType};

    fn candidate(label: &str) -> CandidateClaim {
        CandidateClaim {
            id: ClaimId::new(),
            claim_type: ClaimType::Skill,
            label: label.to_string(),
            description: None,
            confidence: 0.7,
            similarity: 0.9,
        }
    }

    #[test]
    fn test_prompt_contains_evidence_and_format() {
        let prompt = DecisionPromptBuilder::new(
            "Built the ingestion pipeline in Rust".to_string(),
            EvidenceType::Accomplishment,
        )
        .build();

        assert!(prompt.contains("Built the ingestion pipeline in Rust"));
        assert!(prompt.contains("Evidence type: accomplishment"));
        assert!(prompt.contains("\"match\": null"));
        assert!(prompt.contains("Existing claims: none"));
    }

    #[test]
    fn test_prompt_lists_candidate_labels() {
        let prompt = DecisionPromptBuilder::new(
            "Shipped a Rust service".to_string(),
            EvidenceType::SkillListed,
        )
        .with_candidates(vec![candidate("Rust"), candidate("Go")])
        .build();

        assert!(prompt.contains("\"Rust\" (skill)"));
        assert!(prompt.contains("\"Go\" (skill)"));
        assert!(!prompt.contains("Existing claims: none"));
    }
}
