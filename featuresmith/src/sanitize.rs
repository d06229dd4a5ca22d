//! Text sanitization for rich-text fields and model output.
//!
//! Two pure, total transformations live here: [`strip_markup`] reduces a
//! rich-text (HTML) acceptance-criteria field to its plain text content, and
//! [`strip_code_fence`] unwraps model output that arrived inside a markdown
//! code block despite instructions to the contrary.

use scraper::Html;

/// Strip HTML markup, returning only the concatenated text nodes.
///
/// Tags and attributes never appear in the output. Empty input yields an
/// empty string; input with no markup passes through as-is. Never fails.
pub fn strip_markup(markup: &str) -> String {
    if markup.is_empty() {
        return String::new();
    }
    let fragment = Html::parse_fragment(markup);
    fragment.root_element().text().collect()
}

/// Remove at most one leading and one trailing ``` fence from model output.
///
/// The leading fence may carry a language tag (```` ```gherkin ````); the
/// whole fence line is dropped. A trailing fence is only recognized on its
/// own line. The result is trimmed of surrounding whitespace. Unfenced input
/// passes through unchanged, so the operation is idempotent.
pub fn strip_code_fence(output: &str) -> String {
    let mut text = output.trim();

    if text.starts_with("```")
        && let Some(newline) = text.find('\n')
    {
        text = &text[newline + 1..];
    }

    let end_trimmed = text.trim_end();
    if let Some(rest) = end_trimmed.strip_suffix("```")
        && (rest.is_empty() || rest.ends_with('\n'))
    {
        text = rest;
    }

    text.trim().to_string()
}
