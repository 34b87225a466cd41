//! Dossier Auditor
//!
//! Background quality service for a user's claim set: duplicate detection,
//! missing-field checks, and evaluation sampling.
//!
//! # Overview
//!
//! The Auditor is responsible for:
//! - **Duplicate detection**: Flagging same-type claim pairs whose labels are
//!   near-identical, while standing down when the labels end in distinguishing
//!   entity names ("Worked at TechCorp" vs "Worked at StartupXYZ")
//! - **Missing-field checks**: Flagging claims with no type or a blank label
//! - **Dismissal suppression**: Never re-raising a finding the user dismissed,
//!   and never double-recording one that is already open
//! - **Evaluation sampling**: Picking the least-supported claims for manual
//!   review
//!
//! Findings are recorded as issues against the flagged claim. Duplicate
//! findings attach to the newer claim of the pair and carry a warning
//! severity; missing-field findings are errors.
//!
//! # Usage
//!
//! ## One-time Audit
//!
//! ```no_run
//! use dossier_auditor::{Auditor, AuditorConfig};
//! use dossier_store::SqliteStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = SqliteStore::new("dossier.db")?;
//! let mut auditor = Auditor::default_config();
//!
//! let report = auditor.audit(&mut store, "user-1")?;
//! println!(
//!     "{} duplicates, {} missing fields, {} suppressed",
//!     report.duplicates_found, report.missing_fields_found, report.suppressed
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Background Worker
//!
//! ```no_run
//! use dossier_auditor::{AuditWorker, AuditorConfig};
//! use dossier_store::SqliteStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut store = SqliteStore::new("dossier.db")?;
//!     let mut worker = AuditWorker::new(AuditorConfig::default());
//!
//!     // Run indefinitely (until Ctrl+C)
//!     worker.run(&mut store, vec!["user-1".to_string()]).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration Presets
//!
//! ```
//! use dossier_auditor::AuditorConfig;
//!
//! // Default: flag above 0.85 label similarity, sample 10 claims
//! let config = AuditorConfig::default();
//!
//! // Strict: lower similarity bar, larger evaluation samples
//! let config = AuditorConfig::strict();
//!
//! // Lenient: only near-identical labels are flagged
//! let config = AuditorConfig::lenient();
//! ```
//!
//! # Configuration
//!
//! The Auditor can be configured via TOML:
//!
//! ```toml
//! duplicate_threshold = 0.85
//! eval_sample_size = 10
//! audit_interval_minutes = 60
//! dry_run = false
//! ```

#![warn(missing_docs)]

mod auditor;
mod config;
mod error;
mod metrics;
pub mod rules;
pub mod similarity;
mod worker;

pub use auditor::{AuditReport, Auditor};
pub use config::AuditorConfig;
pub use error::AuditorError;
pub use metrics::AuditMetrics;
pub use worker::AuditWorker;
