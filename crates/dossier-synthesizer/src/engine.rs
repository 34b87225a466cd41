//! Core synthesis engine
//!
//! Turns a batch of evidence into claim creations and confidence updates.
//! Each evidence item is processed independently: retrieval finds the
//! user's nearest existing claims, the oracle decides between matching
//! one, proposing a new one, or neither, and the store applies the
//! outcome. One bad item never poisons the rest of the batch.

use crate::config::SynthesizerConfig;
use crate::error::SynthesizerError;
use crate::parser::{parse_decision, Decision};
use crate::prompt::DecisionPromptBuilder;
use dossier_domain::scoring;
use dossier_domain::traits::{CandidateClaim, CandidateRetriever, ClaimStore, LlmOracle};
use dossier_domain::{Claim, ClaimId, EvidenceItem, EvidenceLink, LinkStrength};
use dossier_store::embedding::EmbeddingModel;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Counts returned by one synthesis batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SynthesisOutcome {
    /// Claims newly created from this batch
    pub claims_created: usize,

    /// Existing claims that gained evidence from this batch
    pub claims_updated: usize,
}

/// The synthesis engine
///
/// Generic over the oracle, retriever, embedding model, and store so
/// tests can wire in deterministic mocks.
pub struct Synthesizer<O, R, E, S>
where
    O: LlmOracle,
    R: CandidateRetriever,
    E: EmbeddingModel,
    S: ClaimStore,
{
    oracle: Arc<O>,
    retriever: R,
    embedder: E,
    store: Arc<Mutex<S>>,
    config: SynthesizerConfig,
}

impl<O, R, E, S> Synthesizer<O, R, E, S>
where
    O: LlmOracle + Send + Sync + 'static,
    O::Error: std::fmt::Display,
    R: CandidateRetriever,
    R::Error: std::fmt::Display,
    E: EmbeddingModel,
    S: ClaimStore,
    S::Error: std::fmt::Display,
{
    /// Create a new synthesizer
    pub fn new(
        oracle: Arc<O>,
        retriever: R,
        embedder: E,
        store: Arc<Mutex<S>>,
        config: SynthesizerConfig,
    ) -> Self {
        Self {
            oracle,
            retriever,
            embedder,
            store,
            config,
        }
    }

    /// Synthesize a batch of evidence for one user
    ///
    /// Items are processed sequentially. An item that fails (oracle
    /// exhausted its retries, store error) is logged and skipped; the
    /// returned counts cover only the items that landed.
    pub async fn synthesize(
        &self,
        user_id: &str,
        evidence: &[EvidenceItem],
    ) -> Result<SynthesisOutcome, SynthesizerError> {
        let mut outcome = SynthesisOutcome::default();

        if evidence.is_empty() {
            return Ok(outcome);
        }

        info!(
            "Starting synthesis for user '{}', {} evidence items",
            user_id,
            evidence.len()
        );

        for item in evidence {
            match self.process_item(user_id, item).await {
                Ok(ItemOutcome::Created) => outcome.claims_created += 1,
                Ok(ItemOutcome::Updated) => outcome.claims_updated += 1,
                Ok(ItemOutcome::Skipped) => {}
                Err(e) => {
                    warn!("Evidence item {} failed: {}", item.id, e);
                }
            }
        }

        info!(
            "Synthesis complete for user '{}': {} created, {} updated",
            user_id, outcome.claims_created, outcome.claims_updated
        );

        Ok(outcome)
    }

    /// Process one evidence item end to end
    async fn process_item(
        &self,
        user_id: &str,
        item: &EvidenceItem,
    ) -> Result<ItemOutcome, SynthesizerError> {
        if item.text.chars().count() > self.config.max_evidence_chars {
            warn!(
                "Evidence item {} exceeds {} characters, skipping",
                item.id, self.config.max_evidence_chars
            );
            return Ok(ItemOutcome::Skipped);
        }

        // Re-submitted evidence is already linked; a second pass must not
        // create or strengthen anything.
        let already_linked = {
            let store = self
                .store
                .lock()
                .map_err(|_| SynthesizerError::Store("lock poisoned".to_string()))?;
            !store
                .links_for_evidence(item.id)
                .map_err(|e| SynthesizerError::Store(e.to_string()))?
                .is_empty()
        };
        if already_linked {
            debug!("Evidence item {} already linked, skipping", item.id);
            return Ok(ItemOutcome::Skipped);
        }

        let candidates = self
            .retriever
            .retrieve(user_id, &item.embedding, self.config.candidate_count)
            .map_err(|e| SynthesizerError::Retrieval(e.to_string()))?;

        debug!(
            "Retrieved {} candidates for evidence item {}",
            candidates.len(),
            item.id
        );

        let prompt = DecisionPromptBuilder::new(item.text.clone(), item.evidence_type)
            .with_candidates(candidates.clone())
            .build();

        let decision = self.decide_with_retries(&prompt).await?;

        match decision {
            Decision::Match { label, strength } => {
                // The oracle may only pick from the candidates it was shown;
                // it echoes labels as prose, so compare trimmed and
                // case-insensitively
                let matched = candidates
                    .iter()
                    .find(|c| c.label.trim().eq_ignore_ascii_case(label.trim()));

                let Some(candidate) = matched else {
                    warn!(
                        "Oracle matched label '{}' not in the candidate set, ignoring",
                        label
                    );
                    return Ok(ItemOutcome::Skipped);
                };

                self.apply_match(candidate.id, item, strength)?;
                Ok(ItemOutcome::Updated)
            }
            Decision::New { proposal, strength } => {
                // An exact (type, label) hit means the retriever missed an
                // existing claim; strengthen it instead of duplicating.
                let existing = {
                    let store = self
                        .store
                        .lock()
                        .map_err(|_| SynthesizerError::Store("lock poisoned".to_string()))?;
                    store
                        .find_claim(user_id, proposal.claim_type, &proposal.label)
                        .map_err(|e| SynthesizerError::Store(e.to_string()))?
                };

                if let Some(existing) = existing {
                    debug!(
                        "Proposed claim '{}' already exists as {}, linking instead",
                        proposal.label, existing.id
                    );
                    self.apply_match(existing.id, item, strength)?;
                    return Ok(ItemOutcome::Updated);
                }

                let embedding = self
                    .embedder
                    .embed(&proposal.label)
                    .map_err(|e| SynthesizerError::Embedding(e.to_string()))?;

                let now = now_secs();
                let claim = Claim::new(
                    ClaimId::new(),
                    user_id.to_string(),
                    proposal.claim_type,
                    proposal.label,
                    proposal.description,
                    scoring::initial_confidence(strength),
                    embedding,
                    now,
                );

                {
                    let mut store = self
                        .store
                        .lock()
                        .map_err(|_| SynthesizerError::Store("lock poisoned".to_string()))?;
                    let claim_id = store
                        .create_claim(claim)
                        .map_err(|e| SynthesizerError::Store(e.to_string()))?;
                    store
                        .upsert_link(EvidenceLink::new(claim_id, item.id, strength))
                        .map_err(|e| SynthesizerError::Store(e.to_string()))?;
                }

                Ok(ItemOutcome::Created)
            }
            Decision::NoOp => {
                debug!("No claim-worthy signal in evidence item {}", item.id);
                Ok(ItemOutcome::Skipped)
            }
        }
    }

    /// Link evidence to an existing claim and recompute its confidence
    fn apply_match(
        &self,
        claim_id: ClaimId,
        item: &EvidenceItem,
        strength: LinkStrength,
    ) -> Result<(), SynthesizerError> {
        let mut store = self
            .store
            .lock()
            .map_err(|_| SynthesizerError::Store("lock poisoned".to_string()))?;

        store
            .upsert_link(EvidenceLink::new(claim_id, item.id, strength))
            .map_err(|e| SynthesizerError::Store(e.to_string()))?;

        let strengths: Vec<LinkStrength> = store
            .links_for_claim(claim_id)
            .map_err(|e| SynthesizerError::Store(e.to_string()))?
            .iter()
            .map(|l| l.strength)
            .collect();

        let confidence = scoring::confidence_from_links(&strengths);
        store
            .update_confidence(claim_id, confidence, now_secs())
            .map_err(|e| SynthesizerError::Store(e.to_string()))?;

        debug!(
            "Claim {} now has {} links, confidence {:.3}",
            claim_id,
            strengths.len(),
            confidence
        );

        Ok(())
    }

    /// Call the oracle and parse its answer, retrying on transient failures
    ///
    /// Timeouts, oracle errors, and non-JSON responses are retried with
    /// backoff up to the configured limit. A structurally invalid decision
    /// inside valid JSON is not retried; the parser already degraded it to
    /// a no-op.
    async fn decide_with_retries(&self, prompt: &str) -> Result<Decision, SynthesizerError> {
        let mut last_error = SynthesizerError::Oracle("No attempts made".to_string());

        for attempt in 0..=self.config.max_oracle_retries {
            if attempt > 0 {
                tokio::time::sleep(self.config.retry_delay(attempt - 1)).await;
            }

            match timeout(self.config.oracle_timeout(), self.call_oracle(prompt)).await {
                Ok(Ok(response)) => match parse_decision(&response) {
                    Ok(decision) => return Ok(decision),
                    Err(e) => {
                        warn!("Oracle response unparseable (attempt {}): {}", attempt, e);
                        last_error = e;
                    }
                },
                Ok(Err(e)) => {
                    warn!("Oracle call failed (attempt {}): {}", attempt, e);
                    last_error = e;
                }
                Err(_) => {
                    warn!("Oracle call timed out (attempt {})", attempt);
                    last_error = SynthesizerError::Timeout;
                }
            }
        }

        Err(last_error)
    }

    /// Call the oracle on a blocking thread
    async fn call_oracle(&self, prompt: &str) -> Result<String, SynthesizerError> {
        let oracle = Arc::clone(&self.oracle);
        let prompt = prompt.to_string();

        tokio::task::spawn_blocking(move || {
            oracle
                .complete(&prompt)
                .map_err(|e| SynthesizerError::Oracle(e.to_string()))
        })
        .await
        .map_err(|e| SynthesizerError::Oracle(format!("Task join error: {}", e)))?
    }
}

/// Outcome of one evidence item
enum ItemOutcome {
    Created,
    Updated,
    Skipped,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_domain::{ClaimType, EvidenceId, EvidenceType, MAX_EVIDENCE_TEXT_CHARS};
    use dossier_llm::MockOracle;
    use dossier_store::embedding::MockEmbeddingModel;
    use dossier_store::{ClaimRetriever, SqliteStore, VectorIndex};

    const DIM: usize = 64;

    struct Harness {
        oracle: MockOracle,
        engine: Synthesizer<MockOracle, ClaimRetriever, MockEmbeddingModel, SqliteStore>,
        store: Arc<Mutex<SqliteStore>>,
        retriever: ClaimRetriever,
        model: MockEmbeddingModel,
    }

    fn harness(oracle: MockOracle) -> Harness {
        let store = Arc::new(Mutex::new(SqliteStore::new(":memory:").unwrap()));
        let index = Arc::new(VectorIndex::new(DIM));
        let retriever = ClaimRetriever::new(Arc::clone(&index), Arc::clone(&store));
        let engine_retriever = ClaimRetriever::new(index, Arc::clone(&store));

        let mut config = SynthesizerConfig::default();
        config.max_oracle_retries = 0;
        config.retry_base_delay_ms = 1;

        let engine = Synthesizer::new(
            Arc::new(oracle.clone()),
            engine_retriever,
            MockEmbeddingModel::new(DIM),
            Arc::clone(&store),
            config,
        );

        Harness {
            oracle,
            engine,
            store,
            retriever,
            model: MockEmbeddingModel::new(DIM),
        }
    }

    fn evidence(text: &str) -> EvidenceItem {
        let model = MockEmbeddingModel::new(DIM);
        EvidenceItem {
            id: EvidenceId::new(),
            text: text.to_string(),
            evidence_type: EvidenceType::Accomplishment,
            embedding: model.embed(text).unwrap(),
            source: None,
            occurred_at: None,
        }
    }

    fn new_decision(claim_type: &str, label: &str, strength: &str) -> String {
        format!(
            r#"{{"match": null, "strength": "{}", "new_claim": {{"type": "{}", "label": "{}", "description": null}}}}"#,
            strength, claim_type, label
        )
    }

    fn match_decision(label: &str, strength: &str) -> String {
        format!(
            r#"{{"match": "{}", "strength": "{}", "new_claim": null}}"#,
            label, strength
        )
    }

    #[tokio::test]
    async fn test_empty_batch_makes_no_calls() {
        let h = harness(MockOracle::default());

        let outcome = h.engine.synthesize("user-1", &[]).await.unwrap();

        assert_eq!(outcome, SynthesisOutcome::default());
        assert_eq!(h.oracle.call_count(), 0);
    }

    #[tokio::test]
    async fn test_new_claim_created_with_initial_confidence() {
        let mut oracle = MockOracle::default();
        oracle.push_scripted(new_decision("skill", "Rust", "strong"));
        let h = harness(oracle);

        let outcome = h
            .engine
            .synthesize("user-1", &[evidence("Built a parser in Rust")])
            .await
            .unwrap();

        assert_eq!(outcome.claims_created, 1);
        assert_eq!(outcome.claims_updated, 0);

        let store = h.store.lock().unwrap();
        let claims = store.claims_for_user("user-1").unwrap();
        assert_eq!(claims.len(), 1);
        assert_eq!(claims[0].label, "Rust");
        assert_eq!(claims[0].claim_type, ClaimType::Skill);
        // One strong link: 0.5 * 1.2
        assert!((claims[0].confidence - 0.6).abs() < 1e-9);

        let links = store.links_for_claim(claims[0].id).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].strength, LinkStrength::Strong);
    }

    #[tokio::test]
    async fn test_match_strengthens_existing_claim() {
        let h = harness(MockOracle::default());

        // Seed a claim with one strong link
        let claim = Claim::new(
            ClaimId::new(),
            "user-1".to_string(),
            ClaimType::Skill,
            "Rust".to_string(),
            None,
            0.6,
            h.model.embed("Rust").unwrap(),
            1_700_000_000,
        );
        {
            let mut store = h.store.lock().unwrap();
            store.create_claim(claim.clone()).unwrap();
            store
                .upsert_link(EvidenceLink::new(
                    claim.id,
                    EvidenceId::new(),
                    LinkStrength::Strong,
                ))
                .unwrap();
        }
        h.retriever.rebuild_index().unwrap();

        let mut oracle = h.oracle.clone();
        oracle.push_scripted(match_decision("Rust", "strong"));

        let outcome = h
            .engine
            .synthesize("user-1", &[evidence("Rust")])
            .await
            .unwrap();

        assert_eq!(outcome.claims_updated, 1);
        assert_eq!(outcome.claims_created, 0);

        let store = h.store.lock().unwrap();
        let updated = store.get_claim(claim.id).unwrap().unwrap();
        // Two strong links: base(2) = 0.7, mean multiplier 1.2
        assert!((updated.confidence - 0.84).abs() < 1e-9);
        assert_eq!(store.links_for_claim(claim.id).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_oversized_evidence_skipped_without_oracle_call() {
        let h = harness(MockOracle::default());

        let mut item = evidence("placeholder");
        item.text = "a".repeat(MAX_EVIDENCE_TEXT_CHARS + 1);

        let outcome = h.engine.synthesize("user-1", &[item]).await.unwrap();

        assert_eq!(outcome, SynthesisOutcome::default());
        assert_eq!(h.oracle.call_count(), 0);
    }

    #[tokio::test]
    async fn test_already_linked_evidence_is_idempotent() {
        let mut oracle = MockOracle::default();
        oracle.push_scripted(new_decision("skill", "Rust", "strong"));
        let h = harness(oracle);

        let item = evidence("Built a parser in Rust");
        let first = h
            .engine
            .synthesize("user-1", std::slice::from_ref(&item))
            .await
            .unwrap();
        assert_eq!(first.claims_created, 1);
        assert_eq!(h.oracle.call_count(), 1);

        // Second pass with the identical item touches nothing
        let second = h
            .engine
            .synthesize("user-1", std::slice::from_ref(&item))
            .await
            .unwrap();
        assert_eq!(second, SynthesisOutcome::default());
        assert_eq!(h.oracle.call_count(), 1);
        assert_eq!(h.store.lock().unwrap().claims_for_user("user-1").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_item_does_not_poison_batch() {
        let mut oracle = MockOracle::default();
        oracle.push_scripted_error();
        oracle.push_scripted(new_decision("skill", "Go", "medium"));
        let h = harness(oracle);

        let outcome = h
            .engine
            .synthesize(
                "user-1",
                &[evidence("first item fails"), evidence("Shipped a Go service")],
            )
            .await
            .unwrap();

        assert_eq!(outcome.claims_created, 1);
        let store = h.store.lock().unwrap();
        assert_eq!(store.claims_for_user("user-1").unwrap()[0].label, "Go");
    }

    #[tokio::test]
    async fn test_match_outside_candidate_set_ignored() {
        let mut oracle = MockOracle::default();
        oracle.push_scripted(match_decision("Quantum Computing", "strong"));
        let h = harness(oracle);

        let outcome = h
            .engine
            .synthesize("user-1", &[evidence("anything")])
            .await
            .unwrap();

        assert_eq!(outcome, SynthesisOutcome::default());
    }

    #[tokio::test]
    async fn test_duplicate_proposal_links_existing_claim() {
        let h = harness(MockOracle::default());

        let claim = Claim::new(
            ClaimId::new(),
            "user-1".to_string(),
            ClaimType::Skill,
            "Rust".to_string(),
            None,
            0.6,
            h.model.embed("Rust").unwrap(),
            1_700_000_000,
        );
        h.store.lock().unwrap().create_claim(claim.clone()).unwrap();
        // Index deliberately not rebuilt; the retriever cannot see the claim

        let mut oracle = h.oracle.clone();
        oracle.push_scripted(new_decision("skill", "Rust", "medium"));

        let outcome = h
            .engine
            .synthesize("user-1", &[evidence("More Rust work")])
            .await
            .unwrap();

        assert_eq!(outcome.claims_created, 0);
        assert_eq!(outcome.claims_updated, 1);

        let store = h.store.lock().unwrap();
        assert_eq!(store.claims_for_user("user-1").unwrap().len(), 1);
        assert_eq!(store.links_for_claim(claim.id).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_noop_decision_changes_nothing() {
        let h = harness(MockOracle::default());

        let outcome = h
            .engine
            .synthesize("user-1", &[evidence("The weather was nice")])
            .await
            .unwrap();

        assert_eq!(outcome, SynthesisOutcome::default());
        assert_eq!(h.oracle.call_count(), 1);
        assert!(h.store.lock().unwrap().claims_for_user("user-1").unwrap().is_empty());
    }
}
