//! Classifier adapter
//!
//! `classify` asks the oracle for a label; `guard_label` forces anything
//! outside the vocabulary onto the fallback category. The guard is kept
//! separate so it can be tested without an oracle.

use super::oracle::{OracleError, OracleRequest, TextOracle};
use super::prompts;
use crate::config::CategorySet;

/// Short answer expected: a single category name
const CLASSIFY_MAX_TOKENS: u32 = 50;

/// Map a raw oracle answer onto the vocabulary.
///
/// The answer is trimmed and must match a category exactly; anything else,
/// including an empty or absent answer, becomes the fallback.
pub fn guard_label(raw: Option<&str>, categories: &CategorySet) -> String {
    match raw.map(str::trim) {
        Some(label) if !label.is_empty() && categories.contains(label) => label.to_string(),
        _ => categories.fallback().to_string(),
    }
}

/// Build the zero-temperature classification request
pub fn classification_request(content: &str, categories: &CategorySet) -> OracleRequest {
    OracleRequest {
        system: prompts::CLASSIFY_SYSTEM_PROMPT.to_string(),
        prompt: prompts::build_classify_prompt(content, categories.names(), categories.fallback()),
        max_tokens: CLASSIFY_MAX_TOKENS,
        temperature: 0.0,
    }
}

/// Classify `content` into one of `categories` (or the fallback).
///
/// Transport errors propagate; they are fatal for the run.
pub async fn classify(
    oracle: &dyn TextOracle,
    content: &str,
    categories: &CategorySet,
) -> Result<String, OracleError> {
    let request = classification_request(content, categories);
    let answer = oracle.complete(&request).await?;
    let category = guard_label(Some(&answer), categories);

    if category != answer.trim() {
        tracing::debug!(
            answer = %answer.trim(),
            category = %category,
            "Label outside vocabulary, using fallback"
        );
    }

    Ok(category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::oracle::stub::StubOracle;

    fn vocab() -> CategorySet {
        CategorySet::parse("Python,DevOps,Etc")
    }

    #[test]
    fn test_guard_accepts_member() {
        assert_eq!(guard_label(Some("Python"), &vocab()), "Python");
        assert_eq!(guard_label(Some("  DevOps \n"), &vocab()), "DevOps");
    }

    #[test]
    fn test_guard_rejects_out_of_vocabulary() {
        assert_eq!(guard_label(Some("Go"), &vocab()), "Etc");
        assert_eq!(guard_label(Some("python"), &vocab()), "Etc");
        assert_eq!(guard_label(Some("Category: Python"), &vocab()), "Etc");
    }

    #[test]
    fn test_guard_empty_or_missing() {
        assert_eq!(guard_label(Some(""), &vocab()), "Etc");
        assert_eq!(guard_label(Some("   "), &vocab()), "Etc");
        assert_eq!(guard_label(None, &vocab()), "Etc");
    }

    #[test]
    fn test_guard_always_returns_member() {
        let set = vocab();
        for raw in ["Python", "Go", "", "Etc", "DEVOPS", "DevOps."] {
            let label = guard_label(Some(raw), &set);
            assert!(set.contains(&label), "{} -> {}", raw, label);
        }
    }

    #[test]
    fn test_request_is_deterministic() {
        let a = classification_request("same", &vocab());
        let b = classification_request("same", &vocab());
        assert_eq!(a, b);
        assert_eq!(a.temperature, 0.0);
        assert_eq!(a.max_tokens, CLASSIFY_MAX_TOKENS);
    }

    #[tokio::test]
    async fn test_classify_out_of_vocabulary_label() {
        let oracle = StubOracle::new(["Go"]);
        let category = classify(&oracle, "# Goroutines", &vocab()).await.unwrap();
        assert_eq!(category, "Etc");
        assert_eq!(oracle.request_count(), 1);
    }

    #[tokio::test]
    async fn test_classify_propagates_transport_error() {
        let oracle = StubOracle::default();
        oracle.push_error(OracleError::Request("timeout".to_string()));
        let result = classify(&oracle, "text", &vocab()).await;
        assert!(matches!(result, Err(OracleError::Request(_))));
    }
}
