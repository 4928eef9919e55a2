//! Shared HTTP Client Module
//!
//! Provides a global, lazy-initialized HTTP client for oracle calls.
//! A batch run issues one or two requests per document, so reusing the
//! pooled connection avoids a TLS handshake per file.

use once_cell::sync::Lazy;
use reqwest::Client;
use std::time::Duration;

/// Global HTTP client for OpenAI-compatible API calls
///
/// - 120s timeout: rewrites of long notes can take a while
/// - small idle pool, the pipeline is sequential
pub static OPENAI_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(120))
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .tcp_nodelay(true)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to default HTTP client");
            Client::new()
        })
});

/// Get the global OpenAI HTTP client
#[inline]
pub fn openai_client() -> &'static Client {
    &OPENAI_CLIENT
}
