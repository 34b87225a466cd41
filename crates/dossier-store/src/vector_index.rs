//! HNSW vector index for user-scoped candidate retrieval
//!
//! Wraps the HNSW algorithm for nearest-neighbor search over claim
//! embeddings. The index is in-memory and rebuildable from the SQLite
//! store on startup.
//!
//! Retrieval is always scoped to one user: search oversamples the raw
//! k-NN results and filters by owner, so one user's claims never appear
//! as candidates for another's evidence.
//!
//! # HNSW Parameters
//!
//! - **M**: bi-directional links per node (16)
//! - **efConstruction**: candidate list size during build (200)
//! - **efSearch**: candidate list size during queries (caller-supplied)

use dossier_domain::ClaimId;
use hnsw_rs::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

const DEFAULT_M: usize = 16;
const DEFAULT_EF_CONSTRUCTION: usize = 200;
const DEFAULT_MAX_ELEMENTS: usize = 1_000_000;

/// Oversampling factor applied before the owner filter
const SCOPE_OVERSAMPLE: usize = 4;

/// Errors that can occur during vector index operations
#[derive(Error, Debug)]
pub enum VectorIndexError {
    /// Invalid embedding dimension
    #[error("Invalid embedding dimension: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension provided
        actual: usize,
    },

    /// Internal lock poisoned by a panicking thread
    #[error("Index lock poisoned")]
    LockPoisoned,
}

/// Entry recorded for each indexed vector
#[derive(Debug, Clone)]
struct IndexEntry {
    user_id: String,
    claim_id: ClaimId,
}

/// User-scoped similarity index over claim embeddings
///
/// Removal is tombstone-based: HNSW does not support deletion, so
/// removing a claim drops its id-map entry and search skips the orphaned
/// vector. A periodic [`VectorIndex::clear`] and rebuild from the store
/// reclaims the space.
///
/// # Examples
///
/// ```no_run
/// use dossier_store::vector_index::VectorIndex;
/// use dossier_domain::ClaimId;
///
/// let index = VectorIndex::new(384);
/// let claim_id = ClaimId::new();
/// index.add("user-1", claim_id, &vec![0.1; 384]).unwrap();
///
/// let hits = index.search("user-1", &vec![0.1; 384], 5, 64).unwrap();
/// ```
pub struct VectorIndex {
    dimension: usize,

    // hnsw_rs owns the inserted data, hence no borrowed lifetime
    hnsw: Arc<Mutex<Hnsw<'static, f32, DistCosine>>>,

    /// Internal HNSW id -> owning user and claim
    id_map: Arc<Mutex<HashMap<usize, IndexEntry>>>,

    next_id: Arc<Mutex<usize>>,
}

impl VectorIndex {
    /// Create a new index for vectors of the given dimension
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            hnsw: Arc::new(Mutex::new(Self::build_hnsw())),
            id_map: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(Mutex::new(0)),
        }
    }

    fn build_hnsw() -> Hnsw<'static, f32, DistCosine> {
        let nb_layer = 16.min((DEFAULT_MAX_ELEMENTS as f32).ln().trunc() as usize);
        Hnsw::<'static, f32, DistCosine>::new(
            DEFAULT_M,
            DEFAULT_MAX_ELEMENTS,
            nb_layer,
            DEFAULT_EF_CONSTRUCTION,
            DistCosine {},
        )
    }

    /// Add a claim embedding owned by `user_id`
    pub fn add(
        &self,
        user_id: &str,
        claim_id: ClaimId,
        embedding: &[f32],
    ) -> Result<(), VectorIndexError> {
        if embedding.len() != self.dimension {
            return Err(VectorIndexError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }

        let internal_id = {
            let mut next_id = self
                .next_id
                .lock()
                .map_err(|_| VectorIndexError::LockPoisoned)?;
            let id = *next_id;
            *next_id += 1;
            id
        };

        {
            let mut id_map = self
                .id_map
                .lock()
                .map_err(|_| VectorIndexError::LockPoisoned)?;
            id_map.insert(
                internal_id,
                IndexEntry {
                    user_id: user_id.to_string(),
                    claim_id,
                },
            );
        }

        let embedding_vec = embedding.to_vec();
        let hnsw = self
            .hnsw
            .lock()
            .map_err(|_| VectorIndexError::LockPoisoned)?;
        hnsw.insert((&embedding_vec, internal_id));

        Ok(())
    }

    /// Remove a claim from the index
    ///
    /// The underlying vector stays in the graph as a tombstone but is no
    /// longer returned by search.
    pub fn remove(&self, claim_id: ClaimId) -> Result<(), VectorIndexError> {
        let mut id_map = self
            .id_map
            .lock()
            .map_err(|_| VectorIndexError::LockPoisoned)?;
        id_map.retain(|_, entry| entry.claim_id != claim_id);
        Ok(())
    }

    /// Search the `k` nearest claims owned by `user_id`
    ///
    /// Returns `(claim_id, similarity)` pairs sorted descending by
    /// similarity, where similarity is `1 - cosine_distance`.
    pub fn search(
        &self,
        user_id: &str,
        query: &[f32],
        k: usize,
        ef_search: usize,
    ) -> Result<Vec<(ClaimId, f32)>, VectorIndexError> {
        if query.len() != self.dimension {
            return Err(VectorIndexError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let hnsw = self
            .hnsw
            .lock()
            .map_err(|_| VectorIndexError::LockPoisoned)?;
        let id_map = self
            .id_map
            .lock()
            .map_err(|_| VectorIndexError::LockPoisoned)?;

        // Oversample so the owner filter still leaves k results
        let raw_k = k.saturating_mul(SCOPE_OVERSAMPLE).max(k);
        let results = hnsw.search(query, raw_k, ef_search.max(raw_k));

        let mut scoped: Vec<(ClaimId, f32)> = results
            .into_iter()
            .filter_map(|neighbour| {
                id_map
                    .get(&neighbour.d_id)
                    .filter(|entry| entry.user_id == user_id)
                    .map(|entry| (entry.claim_id, 1.0 - neighbour.distance))
            })
            .collect();
        scoped.truncate(k);

        Ok(scoped)
    }

    /// Number of live vectors in the index
    pub fn len(&self) -> usize {
        self.id_map.lock().map(|m| m.len()).unwrap_or(0)
    }

    /// Check if the index holds no live vectors
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every vector, ready for a rebuild from the store
    pub fn clear(&self) -> Result<(), VectorIndexError> {
        let mut hnsw = self
            .hnsw
            .lock()
            .map_err(|_| VectorIndexError::LockPoisoned)?;
        *hnsw = Self::build_hnsw();
        drop(hnsw);

        let mut id_map = self
            .id_map
            .lock()
            .map_err(|_| VectorIndexError::LockPoisoned)?;
        id_map.clear();
        drop(id_map);

        let mut next_id = self
            .next_id
            .lock()
            .map_err(|_| VectorIndexError::LockPoisoned)?;
        *next_id = 0;

        Ok(())
    }
}
