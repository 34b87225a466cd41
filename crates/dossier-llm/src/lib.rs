//! Dossier Oracle Layer
//!
//! Pluggable implementations of the `LlmOracle` trait from
//! `dossier-domain`. The oracle makes the one judgment call synthesis
//! cannot make deterministically: does this evidence support an existing
//! claim, a new claim, or neither.
//!
//! # Oracles
//!
//! - `MockOracle`: deterministic mock for testing
//! - `OllamaOracle`: local Ollama API integration
//!
//! # Examples
//!
//! ```
//! use dossier_llm::MockOracle;
//! use dossier_domain::traits::LlmOracle;
//!
//! let oracle = MockOracle::new(r#"{"match": null, "new_claim": null}"#);
//! let result = oracle.complete("evidence prompt").unwrap();
//! assert!(result.contains("\"match\": null"));
//! ```

#![warn(missing_docs)]

pub mod ollama;

use dossier_domain::traits::LlmOracle;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use ollama::OllamaOracle;

/// Errors that can occur during oracle operations
#[derive(Error, Debug)]
pub enum OracleError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the model
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("Oracle error: {0}")]
    Other(String),
}

/// Mock oracle for deterministic testing
///
/// Returns pre-configured responses without any network calls. Three
/// lookup layers, checked in order: a scripted queue (one response per
/// call, in sequence), per-prompt responses, then the default.
///
/// # Examples
///
/// ```
/// use dossier_llm::MockOracle;
/// use dossier_domain::traits::LlmOracle;
///
/// let mut oracle = MockOracle::default();
/// oracle.push_scripted(r#"{"match": null, "new_claim": null}"#);
/// oracle.add_response("prompt-a", "response-a");
///
/// assert!(oracle.complete("anything").unwrap().contains("\"match\": null"));
/// assert_eq!(oracle.complete("prompt-a").unwrap(), "response-a");
/// ```
#[derive(Debug, Clone)]
pub struct MockOracle {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, String>>>,
    scripted: Arc<Mutex<VecDeque<String>>>,
    call_count: Arc<Mutex<usize>>,
}

/// Sentinel value that makes the mock return an error
const ERROR_SENTINEL: &str = "__MOCK_ERROR__";

impl MockOracle {
    /// Create a mock returning a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            scripted: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), response.into());
    }

    /// Queue a response consumed by the next call, regardless of prompt
    ///
    /// Scripted responses take priority over per-prompt responses and let
    /// tests drive a sequence of decisions through the synthesis engine.
    pub fn push_scripted(&mut self, response: impl Into<String>) {
        self.scripted.lock().unwrap().push_back(response.into());
    }

    /// Queue an error consumed by the next call
    pub fn push_scripted_error(&mut self) {
        self.scripted
            .lock()
            .unwrap()
            .push_back(ERROR_SENTINEL.to_string());
    }

    /// Number of times `complete` was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap() = 0;
    }

    /// Configure an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), ERROR_SENTINEL.to_string());
    }
}

impl Default for MockOracle {
    fn default() -> Self {
        Self::new(r#"{"match": null, "new_claim": null}"#)
    }
}

impl LlmOracle for MockOracle {
    type Error = OracleError;

    fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        *self.call_count.lock().unwrap() += 1;

        if let Some(response) = self.scripted.lock().unwrap().pop_front() {
            if response == ERROR_SENTINEL {
                return Err(OracleError::Other("Mock error".to_string()));
            }
            return Ok(response);
        }

        let responses = self.responses.lock().unwrap();
        if let Some(response) = responses.get(prompt) {
            if response == ERROR_SENTINEL {
                return Err(OracleError::Other("Mock error".to_string()));
            }
            return Ok(response.clone());
        }

        Ok(self.default_response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_oracle_default() {
        let oracle = MockOracle::new("fixed");
        assert_eq!(oracle.complete("any prompt").unwrap(), "fixed");
    }

    #[test]
    fn test_mock_oracle_specific_responses() {
        let mut oracle = MockOracle::default();
        oracle.add_response("hello", "world");
        oracle.add_response("foo", "bar");

        assert_eq!(oracle.complete("hello").unwrap(), "world");
        assert_eq!(oracle.complete("foo").unwrap(), "bar");
        assert_eq!(oracle.complete("unknown").unwrap(), r#"{"match": null, "new_claim": null}"#);
    }

    #[test]
    fn test_mock_oracle_scripted_sequence() {
        let mut oracle = MockOracle::new("default");
        oracle.push_scripted("first");
        oracle.push_scripted("second");

        assert_eq!(oracle.complete("whatever").unwrap(), "first");
        assert_eq!(oracle.complete("whatever").unwrap(), "second");
        // Queue exhausted, falls through to the default
        assert_eq!(oracle.complete("whatever").unwrap(), "default");
    }

    #[test]
    fn test_mock_oracle_call_count() {
        let oracle = MockOracle::new("x");
        assert_eq!(oracle.call_count(), 0);

        oracle.complete("a").unwrap();
        oracle.complete("b").unwrap();
        assert_eq!(oracle.call_count(), 2);

        oracle.reset_call_count();
        assert_eq!(oracle.call_count(), 0);
    }

    #[test]
    fn test_mock_oracle_errors() {
        let mut oracle = MockOracle::default();
        oracle.add_error("bad prompt");
        oracle.push_scripted_error();

        assert!(matches!(
            oracle.complete("anything"),
            Err(OracleError::Other(_))
        ));
        assert!(oracle.complete("bad prompt").is_err());
    }

    #[test]
    fn test_mock_oracle_clone_shares_state() {
        let oracle1 = MockOracle::new("x");
        let oracle2 = oracle1.clone();

        oracle1.complete("p").unwrap();

        assert_eq!(oracle1.call_count(), 1);
        assert_eq!(oracle2.call_count(), 1);
    }
}
