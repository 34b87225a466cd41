//! Candidate retrieval over the vector index and SQLite store
//!
//! Joins nearest-neighbor hits back to their full claim rows so the
//! synthesis engine sees labels and descriptions, not bare ids.

use crate::vector_index::{VectorIndex, VectorIndexError};
use crate::{SqliteStore, StoreError};
use dossier_domain::traits::{CandidateClaim, CandidateRetriever, ClaimStore};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Search quality parameter passed to the HNSW index
const EF_SEARCH: usize = 64;

/// Errors that can occur during candidate retrieval
#[derive(Error, Debug)]
pub enum RetrieverError {
    /// Vector index failure
    #[error("Index error: {0}")]
    Index(#[from] VectorIndexError),

    /// Claim store failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Store lock poisoned by a panicking thread
    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Retrieves a user's nearest claims for a piece of evidence
///
/// Index hits whose claim row has since been deleted are skipped rather
/// than surfaced as errors; the index lags the store until its next
/// rebuild.
pub struct ClaimRetriever {
    index: Arc<VectorIndex>,
    store: Arc<Mutex<SqliteStore>>,
}

impl ClaimRetriever {
    /// Create a retriever over a shared index and store
    pub fn new(index: Arc<VectorIndex>, store: Arc<Mutex<SqliteStore>>) -> Self {
        Self { index, store }
    }

    /// Rebuild the vector index from every claim in the store
    ///
    /// Called on startup, and periodically to reclaim tombstoned vectors.
    pub fn rebuild_index(&self) -> Result<usize, RetrieverError> {
        let claims = {
            let store = self.store.lock().map_err(|_| RetrieverError::LockPoisoned)?;
            store.all_claims()?
        };

        self.index.clear()?;
        let mut indexed = 0;
        for claim in &claims {
            self.index.add(&claim.user_id, claim.id, &claim.embedding)?;
            indexed += 1;
        }

        Ok(indexed)
    }
}

impl CandidateRetriever for ClaimRetriever {
    type Error = RetrieverError;

    fn retrieve(
        &self,
        user_id: &str,
        embedding: &[f32],
        count: usize,
    ) -> Result<Vec<CandidateClaim>, Self::Error> {
        let hits = self.index.search(user_id, embedding, count, EF_SEARCH)?;

        let store = self.store.lock().map_err(|_| RetrieverError::LockPoisoned)?;

        let mut candidates = Vec::with_capacity(hits.len());
        for (claim_id, similarity) in hits {
            let Some(claim) = store.get_claim(claim_id)? else {
                continue;
            };

            candidates.push(CandidateClaim {
                id: claim.id,
                claim_type: claim.claim_type,
                label: claim.label,
                description: claim.description,
                confidence: claim.confidence,
                similarity,
            });
        }

        Ok(candidates)
    }
}
