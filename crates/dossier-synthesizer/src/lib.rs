//! Dossier Synthesizer
//!
//! Turns raw evidence about a person into confidence-scored claims.
//!
//! # Overview
//!
//! The synthesizer is the only component that creates claims from
//! evidence. For each evidence item it retrieves the user's most similar
//! existing claims, asks the oracle whether the evidence matches one of
//! them or justifies a new claim, and applies the outcome: a new
//! evidence link plus a deterministic confidence recalculation.
//!
//! # Architecture
//!
//! ```text
//! Evidence → Retriever → Oracle → Decision → ClaimStore
//!                                     ↓
//!                          confidence recalculation
//! ```
//!
//! # Key Features
//!
//! - **Match-first synthesis**: prefer strengthening an existing claim
//!   over creating a near-duplicate
//! - **Deterministic scoring**: confidence is a pure function of the
//!   claim's link set; the oracle only decides relevance and strength
//! - **Idempotent ingestion**: re-submitted evidence never double-counts
//! - **Item isolation**: one failing item never poisons the batch
//!
//! # Example Usage
//!
//! ```no_run
//! use dossier_synthesizer::{Synthesizer, SynthesizerConfig};
//! use dossier_llm::MockOracle;
//! use dossier_store::embedding::MockEmbeddingModel;
//! use dossier_store::{ClaimRetriever, SqliteStore, VectorIndex};
//! use std::sync::{Arc, Mutex};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(Mutex::new(SqliteStore::new(":memory:")?));
//! let index = Arc::new(VectorIndex::new(384));
//! let retriever = ClaimRetriever::new(index, Arc::clone(&store));
//!
//! let synthesizer = Synthesizer::new(
//!     Arc::new(MockOracle::default()),
//!     retriever,
//!     MockEmbeddingModel::new(384),
//!     store,
//!     SynthesizerConfig::default(),
//! );
//!
//! let outcome = synthesizer.synthesize("user-1", &[]).await?;
//! println!("Created: {}, updated: {}", outcome.claims_created, outcome.claims_updated);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod engine;
mod error;
mod parser;
mod prompt;

pub use config::SynthesizerConfig;
pub use engine::{SynthesisOutcome, Synthesizer};
pub use error::SynthesizerError;
pub use parser::{ClaimProposal, Decision};
pub use prompt::DecisionPromptBuilder;
