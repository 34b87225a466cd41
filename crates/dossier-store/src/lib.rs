//! Dossier Storage Layer
//!
//! Implements the ClaimStore trait using SQLite, with an HNSW vector index
//! for candidate retrieval.
//!
//! # Architecture
//!
//! - SQLite for structured claim data (claims, evidence links, issues)
//! - HNSW for user-scoped vector similarity search
//! - Local embedding model for label vectorization
//!
//! # Examples
//!
//! ```no_run
//! use dossier_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for claim operations
//! ```

#![warn(missing_docs)]

pub mod embedding;
pub mod retriever;
pub mod vector_index;

use dossier_domain::traits::ClaimStore;
use dossier_domain::{
    AuditClaim, Claim, ClaimId, ClaimIssue, ClaimType, EvidenceId, EvidenceLink, IssueId,
    IssueType, LinkStrength, Severity,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;

pub use retriever::ClaimRetriever;
pub use vector_index::VectorIndex;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Claim or issue not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Duplicate claim id
    #[error("Duplicate claim id")]
    Duplicate,
}

/// SQLite-based implementation of ClaimStore
///
/// Provides persistent storage for claims, evidence links, and issues.
/// Evidence link upserts and claim deletions carry the data-model guarantees
/// the synthesis engine relies on: a `(claim, evidence)` pair is stored at
/// most once, and deleting a claim cascades its links and issues.
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Callers share a store across
/// tasks by wrapping it in a mutex, which also serializes the
/// read-links-then-write-confidence sequence against racing updates.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Convert a 128-bit id to bytes for storage
    fn id_to_bytes(value: u128) -> Vec<u8> {
        value.to_be_bytes().to_vec()
    }

    /// Convert stored bytes back to a 128-bit id
    fn bytes_to_id(bytes: &[u8]) -> Result<u128, StoreError> {
        if bytes.len() != 16 {
            return Err(StoreError::InvalidData(format!(
                "Expected 16 bytes for id, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 16];
        arr.copy_from_slice(bytes);
        Ok(u128::from_be_bytes(arr))
    }

    /// Serialize an embedding for its TEXT column
    fn embedding_to_json(embedding: &[f32]) -> Result<String, StoreError> {
        serde_json::to_string(embedding)
            .map_err(|e| StoreError::InvalidData(format!("Embedding serialization: {}", e)))
    }

    /// Map a full claim row (id, user_id, claim_type, label, description,
    /// confidence, embedding, created_at, updated_at) to a typed Claim
    fn map_claim_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Claim> {
        let id_bytes: Vec<u8> = row.get(0)?;
        let id = Self::bytes_to_id(&id_bytes).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Blob, Box::new(e))
        })?;

        let type_str: Option<String> = row.get(2)?;
        let claim_type = type_str
            .as_deref()
            .and_then(ClaimType::parse)
            .ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    2,
                    rusqlite::types::Type::Text,
                    Box::new(StoreError::InvalidData(format!(
                        "Unknown claim type: {:?}",
                        type_str
                    ))),
                )
            })?;

        let embedding_json: String = row.get(6)?;
        let embedding: Vec<f32> = serde_json::from_str(&embedding_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Claim {
            id: ClaimId::from_value(id),
            user_id: row.get(1)?,
            claim_type,
            label: row.get(3)?,
            description: row.get(4)?,
            confidence: row.get(5)?,
            embedding,
            created_at: row.get::<_, Option<i64>>(7)?.unwrap_or(0) as u64,
            updated_at: row.get::<_, Option<i64>>(8)?.unwrap_or(0) as u64,
        })
    }

    /// Map an evidence link row (claim_id, evidence_id, strength)
    fn map_link_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EvidenceLink> {
        let claim_bytes: Vec<u8> = row.get(0)?;
        let evidence_bytes: Vec<u8> = row.get(1)?;
        let strength_str: String = row.get(2)?;

        let claim_id = Self::bytes_to_id(&claim_bytes).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Blob, Box::new(e))
        })?;
        let evidence_id = Self::bytes_to_id(&evidence_bytes).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Blob, Box::new(e))
        })?;
        let strength = LinkStrength::parse(&strength_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                Box::new(StoreError::InvalidData(format!(
                    "Unknown strength: {}",
                    strength_str
                ))),
            )
        })?;

        Ok(EvidenceLink {
            claim_id: ClaimId::from_value(claim_id),
            evidence_id: EvidenceId::from_value(evidence_id),
            strength,
        })
    }

    /// Map an issue row (id, claim_id, issue_type, severity, message,
    /// related_claim_id, created_at, dismissed_at)
    fn map_issue_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ClaimIssue> {
        let conv = |idx: usize, e: StoreError| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        };

        let id_bytes: Vec<u8> = row.get(0)?;
        let claim_bytes: Vec<u8> = row.get(1)?;
        let type_str: String = row.get(2)?;
        let severity_str: String = row.get(3)?;
        let related_bytes: Option<Vec<u8>> = row.get(5)?;

        let id = Self::bytes_to_id(&id_bytes).map_err(|e| conv(0, e))?;
        let claim_id = Self::bytes_to_id(&claim_bytes).map_err(|e| conv(1, e))?;
        let issue_type = IssueType::parse(&type_str).ok_or_else(|| {
            conv(2, StoreError::InvalidData(format!("Unknown issue type: {}", type_str)))
        })?;
        let severity = Severity::parse(&severity_str).ok_or_else(|| {
            conv(3, StoreError::InvalidData(format!("Unknown severity: {}", severity_str)))
        })?;
        let related_claim_id = match related_bytes {
            Some(bytes) => Some(ClaimId::from_value(
                Self::bytes_to_id(&bytes).map_err(|e| conv(5, e))?,
            )),
            None => None,
        };

        Ok(ClaimIssue {
            id: IssueId::from_value(id),
            claim_id: ClaimId::from_value(claim_id),
            issue_type,
            severity,
            message: row.get(4)?,
            related_claim_id,
            created_at: row.get::<_, i64>(6)? as u64,
            dismissed_at: row.get::<_, Option<i64>>(7)?.map(|t| t as u64),
        })
    }

    /// All claims in the store, regardless of owner
    ///
    /// Used to rebuild the vector index on startup.
    pub fn all_claims(&self) -> Result<Vec<Claim>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, claim_type, label, description, confidence, embedding, created_at, updated_at
             FROM claims",
        )?;
        let claims = stmt
            .query_map([], Self::map_claim_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(claims)
    }
}

impl ClaimStore for SqliteStore {
    type Error = StoreError;

    fn create_claim(&mut self, claim: Claim) -> Result<ClaimId, Self::Error> {
        let id_bytes = Self::id_to_bytes(claim.id.value());

        let exists: bool = self
            .conn
            .query_row("SELECT 1 FROM claims WHERE id = ?1", params![&id_bytes], |_| Ok(true))
            .optional()?
            .unwrap_or(false);

        if exists {
            return Err(StoreError::Duplicate);
        }

        self.conn.execute(
            "INSERT INTO claims (id, user_id, claim_type, label, description, confidence, embedding, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                &id_bytes,
                &claim.user_id,
                claim.claim_type.as_str(),
                &claim.label,
                &claim.description,
                claim.confidence,
                Self::embedding_to_json(&claim.embedding)?,
                claim.created_at as i64,
                claim.updated_at as i64,
            ],
        )?;

        Ok(claim.id)
    }

    fn get_claim(&self, id: ClaimId) -> Result<Option<Claim>, Self::Error> {
        let id_bytes = Self::id_to_bytes(id.value());

        let claim = self
            .conn
            .query_row(
                "SELECT id, user_id, claim_type, label, description, confidence, embedding, created_at, updated_at
                 FROM claims WHERE id = ?1",
                params![&id_bytes],
                Self::map_claim_row,
            )
            .optional()?;

        Ok(claim)
    }

    fn find_claim(
        &self,
        user_id: &str,
        claim_type: ClaimType,
        label: &str,
    ) -> Result<Option<Claim>, Self::Error> {
        let claim = self
            .conn
            .query_row(
                "SELECT id, user_id, claim_type, label, description, confidence, embedding, created_at, updated_at
                 FROM claims WHERE user_id = ?1 AND claim_type = ?2 AND label = ?3 COLLATE NOCASE",
                params![user_id, claim_type.as_str(), label.trim()],
                Self::map_claim_row,
            )
            .optional()?;

        Ok(claim)
    }

    fn claims_for_user(&self, user_id: &str) -> Result<Vec<Claim>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, claim_type, label, description, confidence, embedding, created_at, updated_at
             FROM claims WHERE user_id = ?1",
        )?;
        let claims = stmt
            .query_map(params![user_id], Self::map_claim_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(claims)
    }

    fn edit_claim(
        &mut self,
        id: ClaimId,
        label: String,
        description: Option<String>,
        updated_at: u64,
    ) -> Result<(), Self::Error> {
        let id_bytes = Self::id_to_bytes(id.value());

        let changed = self.conn.execute(
            "UPDATE claims SET label = ?2, description = ?3, updated_at = ?4 WHERE id = ?1",
            params![&id_bytes, label.trim(), &description, updated_at as i64],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }

        // The user's correction outranks inferred findings
        self.conn.execute(
            "DELETE FROM issues WHERE claim_id = ?1 OR related_claim_id = ?1",
            params![&id_bytes],
        )?;

        Ok(())
    }

    fn update_confidence(
        &mut self,
        id: ClaimId,
        confidence: f64,
        updated_at: u64,
    ) -> Result<(), Self::Error> {
        let id_bytes = Self::id_to_bytes(id.value());

        let changed = self.conn.execute(
            "UPDATE claims SET confidence = ?2, updated_at = ?3 WHERE id = ?1",
            params![&id_bytes, confidence, updated_at as i64],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }

        Ok(())
    }

    fn delete_claim(&mut self, id: ClaimId) -> Result<(), Self::Error> {
        let id_bytes = Self::id_to_bytes(id.value());

        // Issues naming this claim as the related half of a pair do not
        // cascade via the foreign key, so clear them explicitly.
        self.conn.execute(
            "DELETE FROM issues WHERE related_claim_id = ?1",
            params![&id_bytes],
        )?;

        let changed = self
            .conn
            .execute("DELETE FROM claims WHERE id = ?1", params![&id_bytes])?;

        if changed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }

        Ok(())
    }

    fn upsert_link(&mut self, link: EvidenceLink) -> Result<(), Self::Error> {
        self.conn.execute(
            "INSERT INTO evidence_links (claim_id, evidence_id, strength)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(claim_id, evidence_id) DO UPDATE SET
             strength = excluded.strength",
            params![
                Self::id_to_bytes(link.claim_id.value()),
                Self::id_to_bytes(link.evidence_id.value()),
                link.strength.as_str(),
            ],
        )?;

        Ok(())
    }

    fn links_for_claim(&self, claim_id: ClaimId) -> Result<Vec<EvidenceLink>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT claim_id, evidence_id, strength FROM evidence_links WHERE claim_id = ?1",
        )?;
        let links = stmt
            .query_map(params![Self::id_to_bytes(claim_id.value())], Self::map_link_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(links)
    }

    fn links_for_evidence(&self, evidence_id: EvidenceId) -> Result<Vec<EvidenceLink>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT claim_id, evidence_id, strength FROM evidence_links WHERE evidence_id = ?1",
        )?;
        let links = stmt
            .query_map(params![Self::id_to_bytes(evidence_id.value())], Self::map_link_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(links)
    }

    fn insert_issue(&mut self, issue: ClaimIssue) -> Result<IssueId, Self::Error> {
        self.conn.execute(
            "INSERT INTO issues (id, claim_id, issue_type, severity, message, related_claim_id, created_at, dismissed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                Self::id_to_bytes(issue.id.value()),
                Self::id_to_bytes(issue.claim_id.value()),
                issue.issue_type.as_str(),
                issue.severity.as_str(),
                &issue.message,
                issue.related_claim_id.map(|id| Self::id_to_bytes(id.value())),
                issue.created_at as i64,
                issue.dismissed_at.map(|t| t as i64),
            ],
        )?;

        Ok(issue.id)
    }

    fn issues_for_user(&self, user_id: &str) -> Result<Vec<ClaimIssue>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT i.id, i.claim_id, i.issue_type, i.severity, i.message, i.related_claim_id, i.created_at, i.dismissed_at
             FROM issues i JOIN claims c ON c.id = i.claim_id
             WHERE c.user_id = ?1",
        )?;
        let issues = stmt
            .query_map(params![user_id], Self::map_issue_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(issues)
    }

    fn dismiss_issue(&mut self, id: IssueId, dismissed_at: u64) -> Result<(), Self::Error> {
        let changed = self.conn.execute(
            "UPDATE issues SET dismissed_at = ?2 WHERE id = ?1",
            params![Self::id_to_bytes(id.value()), dismissed_at as i64],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }

        Ok(())
    }

    fn audit_claims(&self, user_id: &str) -> Result<Vec<AuditClaim>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT c.id, c.claim_type, c.label, c.created_at, COUNT(l.evidence_id)
             FROM claims c LEFT JOIN evidence_links l ON l.claim_id = c.id
             WHERE c.user_id = ?1
             GROUP BY c.id",
        )?;

        let claims = stmt
            .query_map(params![user_id], |row| {
                let id_bytes: Vec<u8> = row.get(0)?;
                let id = Self::bytes_to_id(&id_bytes).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        0,
                        rusqlite::types::Type::Blob,
                        Box::new(e),
                    )
                })?;

                // Unknown or null type strings surface as None for the rule
                // engine to flag, never as a hard error.
                let type_str: Option<String> = row.get(1)?;
                let claim_type = type_str.as_deref().and_then(ClaimType::parse);

                Ok(AuditClaim {
                    id: ClaimId::from_value(id),
                    claim_type,
                    label: row.get(2)?,
                    created_at: row.get::<_, Option<i64>>(3)?.map(|t| t as u64),
                    evidence_count: Some(row.get::<_, i64>(4)? as usize),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(claims)
    }
}
