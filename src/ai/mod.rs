pub mod classifier;
pub mod client;
pub mod credentials;
pub mod http_client;
pub mod oracle;
pub mod prompts;
pub mod transformer;

pub use classifier::{classify, guard_label};
pub use client::OpenAiClient;
pub use credentials::CredentialManager;
pub use oracle::{OracleError, OracleRequest, TextOracle};
pub use transformer::{rewrite, RewriteOutcome};
