//! Oracle seam
//!
//! The classifier and the transformer talk to the language model through
//! this trait only, so the pipeline can run against a deterministic stub.

use async_trait::async_trait;
use thiserror::Error;

/// Transport-level oracle failures. Always fatal for a run.
#[derive(Error, Debug, Clone)]
pub enum OracleError {
    /// Request could not be sent or timed out
    #[error("request failed: {0}")]
    Request(String),

    /// Endpoint answered with a non-success status
    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },

    /// Response body was not the expected shape
    #[error("failed to parse response: {0}")]
    Decode(String),
}

/// A single completion request
#[derive(Debug, Clone, PartialEq)]
pub struct OracleRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Black-box text oracle.
///
/// Returns the raw completion text, which may be empty when the model
/// produced nothing usable. Callers decide what an empty answer means.
#[async_trait]
pub trait TextOracle: Send + Sync {
    async fn complete(&self, request: &OracleRequest) -> Result<String, OracleError>;
}
