use crate::domain::model::FortuneResult;
use crate::utils::error::{FortuneError, Result};

const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Splits a fortune into one paragraph per card followed by the overall
/// fortune. `expected_count` includes the overall paragraph.
pub fn split_fortune_text(text: &str, expected_count: usize) -> Result<FortuneResult> {
    let normalized = text.replace("\r\n", "\n");
    let mut paragraphs: Vec<String> = normalized
        .trim()
        .split(PARAGRAPH_SEPARATOR)
        .map(|paragraph| paragraph.trim().to_string())
        .collect();

    if expected_count == 0 || paragraphs.len() != expected_count {
        return Err(FortuneError::FortuneFormatMismatch {
            expected: expected_count,
            actual: paragraphs.len(),
        });
    }

    let overall = paragraphs.pop().unwrap_or_default();
    Ok(FortuneResult {
        card_fortunes: paragraphs,
        overall,
    })
}
