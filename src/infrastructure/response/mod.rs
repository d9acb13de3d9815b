use once_cell::sync::Lazy;
use regex::Regex;

static THINK_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<think>[\s\S]*?</think>|<think\s*/>").unwrap());

static REASONING_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<reasoning>[\s\S]*?</reasoning>").unwrap());

static INTERNAL_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<internal>[\s\S]*?</internal>").unwrap());

/// Removes reasoning blocks some models prepend to their answer so that a
/// `Component:` line or table fragment inside them is never picked up.
/// Everything outside those blocks is returned unchanged.
pub fn clean_llm_response(response: &str) -> String {
    let mut cleaned = THINK_TAG_PATTERN.replace_all(response, "").into_owned();
    cleaned = REASONING_TAG_PATTERN.replace_all(&cleaned, "").into_owned();
    cleaned = INTERNAL_TAG_PATTERN.replace_all(&cleaned, "").into_owned();
    cleaned
}
