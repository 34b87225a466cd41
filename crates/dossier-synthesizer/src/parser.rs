//! Parse oracle output into a synthesis decision

use crate::error::SynthesizerError;
use dossier_domain::{ClaimType, LinkStrength};
use serde_json::Value;
use tracing::warn;

/// A proposed new claim from the oracle
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimProposal {
    /// Proposed claim type (always an oracle-proposable type)
    pub claim_type: ClaimType,

    /// Proposed label, trimmed and non-empty
    pub label: String,

    /// Proposed description, if any
    pub description: Option<String>,
}

/// The oracle's verdict on one evidence item
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// The evidence supports an existing claim, named by its label
    Match {
        /// Label of the matched candidate
        label: String,
        /// How directly the evidence supports it
        strength: LinkStrength,
    },

    /// The evidence justifies a new claim
    New {
        /// The proposed claim
        proposal: ClaimProposal,
        /// How directly the evidence supports it
        strength: LinkStrength,
    },

    /// No claim-worthy signal
    NoOp,
}

/// Parse an oracle response into a [`Decision`]
///
/// The response must contain JSON (optionally wrapped in a markdown code
/// block) of the shape
/// `{"match": string|null, "strength": "weak"|"medium"|"strong",
/// "new_claim": {"type", "label", "description"}|null}`.
///
/// Non-JSON responses are an error so the caller can retry; valid JSON
/// with a malformed or disallowed decision degrades to
/// [`Decision::NoOp`] with a warning, since retrying would reproduce the
/// same judgment.
pub fn parse_decision(response: &str) -> Result<Decision, SynthesizerError> {
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(&json_str)
        .map_err(|e| SynthesizerError::InvalidFormat(format!("JSON parse error: {}", e)))?;

    let Some(obj) = json.as_object() else {
        warn!("Oracle decision is not a JSON object, treating as no-op");
        return Ok(Decision::NoOp);
    };

    // A non-null match takes priority over a proposal
    match obj.get("match") {
        Some(Value::String(label)) if !label.trim().is_empty() => {
            return parse_match(label, obj);
        }
        Some(Value::Null) | None => {}
        Some(Value::String(_)) => {
            warn!("Match decision has a blank label, treating as no-op");
            return Ok(Decision::NoOp);
        }
        Some(_) => {
            warn!("'match' field is not a string, treating as no-op");
            return Ok(Decision::NoOp);
        }
    }

    match obj.get("new_claim") {
        Some(Value::Object(claim_obj)) => parse_new(claim_obj, obj),
        Some(Value::Null) | None => Ok(Decision::NoOp),
        Some(_) => {
            warn!("'new_claim' field is not an object, treating as no-op");
            Ok(Decision::NoOp)
        }
    }
}

fn parse_match(
    label: &str,
    obj: &serde_json::Map<String, Value>,
) -> Result<Decision, SynthesizerError> {
    let Some(strength) = parse_strength(obj) else {
        return Ok(Decision::NoOp);
    };

    Ok(Decision::Match {
        label: label.trim().to_string(),
        strength,
    })
}

fn parse_new(
    claim_obj: &serde_json::Map<String, Value>,
    obj: &serde_json::Map<String, Value>,
) -> Result<Decision, SynthesizerError> {
    let type_str = claim_obj.get("type").and_then(|v| v.as_str()).unwrap_or("");
    let Some(claim_type) = ClaimType::parse(type_str) else {
        warn!("New-claim decision has unknown type '{}'", type_str);
        return Ok(Decision::NoOp);
    };

    if !claim_type.oracle_proposable() {
        warn!(
            "Oracle proposed a '{}' claim, which only user input may create",
            claim_type
        );
        return Ok(Decision::NoOp);
    }

    let label = claim_obj
        .get("label")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .trim()
        .to_string();
    if label.is_empty() {
        warn!("New-claim decision has a blank label, treating as no-op");
        return Ok(Decision::NoOp);
    }

    let description = match claim_obj.get("description") {
        Some(Value::String(s)) => Some(s.to_string()),
        Some(Value::Null) | None => None,
        Some(_) => {
            warn!("New-claim description is not a string, treating as no-op");
            return Ok(Decision::NoOp);
        }
    };

    let Some(strength) = parse_strength(obj) else {
        return Ok(Decision::NoOp);
    };

    Ok(Decision::New {
        proposal: ClaimProposal {
            claim_type,
            label,
            description,
        },
        strength,
    })
}

fn parse_strength(obj: &serde_json::Map<String, Value>) -> Option<LinkStrength> {
    let strength_str = obj.get("strength").and_then(|v| v.as_str()).unwrap_or("");
    let strength = LinkStrength::parse(strength_str);
    if strength.is_none() {
        warn!("Decision has invalid strength '{}'", strength_str);
    }
    strength
}

/// Extract JSON from the response, handling markdown code blocks
fn extract_json(response: &str) -> Result<String, SynthesizerError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```json") || trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(SynthesizerError::InvalidFormat(
                "Empty code block".to_string(),
            ));
        }

        // Skip the opening fence and the closing fence
        let json_lines = &lines[1..lines.len().saturating_sub(1)];
        Ok(json_lines.join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}
