//! Content transformer
//!
//! Rewrites an archived note into the structured study format. The result is
//! only accepted when it is non-empty and still carries every media
//! reference of the original.

use once_cell::sync::Lazy;
use regex::Regex;

use super::oracle::{OracleError, OracleRequest, TextOracle};
use super::prompts;

/// Long notes need room for the restructured body plus key points/questions
const REWRITE_MAX_TOKENS: u32 = 4096;

/// `![alt](target "title")`
static MARKDOWN_MEDIA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"!\[[^\]]*\]\(\s*<?([^)\s>]+)>?(?:\s+"[^"]*")?\s*\)"#)
        .expect("markdown media pattern is valid")
});

/// `<img src="...">`, `<video src=...>`, `<source src=...>` and friends
static HTML_MEDIA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<(?:img|video|audio|source|iframe|embed)\b[^>]*?\bsrc\s*=\s*["']([^"']+)["']"#)
        .expect("html media pattern is valid")
});

/// Result of a rewrite attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// Accepted rewrite, ready to replace the archived copy
    Rewritten(String),
    /// The oracle returned nothing usable
    Empty,
    /// The rewrite dropped these media references
    LostMedia(Vec<String>),
}

/// Media references in document order, duplicates removed
pub fn media_references(content: &str) -> Vec<String> {
    let mut refs: Vec<String> = Vec::new();
    let mut found: Vec<(usize, String)> = MARKDOWN_MEDIA
        .captures_iter(content)
        .chain(HTML_MEDIA.captures_iter(content))
        .filter_map(|c| c.get(1).map(|m| (m.start(), m.as_str().to_string())))
        .collect();
    found.sort_by_key(|(pos, _)| *pos);

    for (_, target) in found {
        if !refs.contains(&target) {
            refs.push(target);
        }
    }
    refs
}

/// Media references of `original` that do not appear verbatim in `rewritten`
pub fn missing_media(original: &str, rewritten: &str) -> Vec<String> {
    media_references(original)
        .into_iter()
        .filter(|target| !rewritten.contains(target.as_str()))
        .collect()
}

pub fn rewrite_request(content: &str) -> OracleRequest {
    OracleRequest {
        system: prompts::REWRITE_SYSTEM_PROMPT.to_string(),
        prompt: prompts::build_rewrite_prompt(content),
        max_tokens: REWRITE_MAX_TOKENS,
        temperature: 0.0,
    }
}

/// Ask the oracle to restructure `content`.
///
/// Transport errors propagate. Unusable output is reported through
/// `RewriteOutcome` so the caller can keep the original.
pub async fn rewrite(oracle: &dyn TextOracle, content: &str) -> Result<RewriteOutcome, OracleError> {
    let answer = oracle.complete(&rewrite_request(content)).await?;

    if answer.trim().is_empty() {
        return Ok(RewriteOutcome::Empty);
    }

    let missing = missing_media(content, &answer);
    if !missing.is_empty() {
        return Ok(RewriteOutcome::LostMedia(missing));
    }

    let mut rewritten = answer.trim().to_string();
    rewritten.push('\n');
    Ok(RewriteOutcome::Rewritten(rewritten))
}
