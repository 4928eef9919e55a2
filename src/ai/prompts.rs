/// System prompt for classification
pub const CLASSIFY_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that categorizes content into one of the specified categories.";

/// Build user prompt for classification
pub fn build_classify_prompt(content: &str, categories: &[String], fallback: &str) -> String {
    format!(
        r#"Please read the following Markdown content and choose exactly one of the categories below:
Categories: {}

Content:
---
{}
---

If the content does not fit any category, choose '{}'.
Return only the category name, nothing else."#,
        categories.join(", "),
        content,
        fallback
    )
}

/// System prompt for restructuring a note
pub const REWRITE_SYSTEM_PROMPT: &str = r#"You are a technical editor. You reorganize Markdown notes into a consistent, structured study document without changing what they say.

RULES:
1. Keep the meaning and every fact of the original. Change structure and phrasing only.
2. Write in the same language as the original. Never translate.
3. Keep every image, video and media reference exactly as written: same URL or path, same Markdown or HTML syntax.
4. Keep code blocks verbatim.
5. Output Markdown only. No preamble, no closing remarks."#;

/// Build user prompt for restructuring a note
pub fn build_rewrite_prompt(content: &str) -> String {
    format!(
        r#"Rewrite the following Markdown note into this structure:

# <concise title>

Tags: #keyword1 #keyword2 #keyword3

> <one to two sentence summary>

## Content
<the original content, reorganized with clear headings>

## Key Points
- <key point>

## Discussion Questions
1. <question>
(3 to 5 follow-up questions)

NOTE:
---
{}
---

Respond with ONLY the rewritten Markdown."#,
        content
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_prompt_lists_categories_and_content() {
        let categories = vec!["Python".to_string(), "Etc".to_string()];
        let prompt = build_classify_prompt("# Decorators", &categories, "Etc");
        assert!(prompt.contains("Categories: Python, Etc"));
        assert!(prompt.contains("---\n# Decorators\n---"));
        assert!(prompt.contains("choose 'Etc'"));
    }

    #[test]
    fn test_rewrite_prompt_embeds_note() {
        let prompt = build_rewrite_prompt("body text");
        assert!(prompt.contains("NOTE:\n---\nbody text\n---"));
        assert!(prompt.contains("Discussion Questions"));
    }
}
