//! Prompt assembly
//!
//! Spread templates are stored with positional `{}` slots. Binding them to the
//! spread's `prompt_terms` yields a named template (`{age}`, `{card-0}`, ...)
//! which is rendered against a [`PromptContext`] for each reading.

use crate::domain::model::Spread;
use crate::utils::error::{FortuneError, Result};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_-]*)\}").expect("placeholder pattern is valid")
});

static TERM_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").expect("term name pattern is valid")
});

/// Whether `name` can appear as a `{name}` placeholder and be rendered.
pub fn is_term_name(name: &str) -> bool {
    TERM_NAME.is_match(name)
}

/// Ordered variable name → value mapping for one reading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptContext {
    entries: Vec<(String, String)>,
}

impl PromptContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every declared term starts empty; `age`, `sign`, `desire` and
    /// `card-<i>` are then filled in.
    pub fn assemble(
        terms: &[String],
        age: u32,
        sign: &str,
        desire: &str,
        card_names: &[&str],
    ) -> Self {
        let mut context = Self::new();
        for term in terms {
            context.set(term, "");
        }
        context.set("age", age.to_string());
        context.set("sign", sign);
        context.set("desire", desire);
        for (position, name) in card_names.iter().enumerate() {
            context.set(&format!("card-{}", position), *name);
        }

        tracing::debug!("Prompt sequence: {:?}", context.entries);
        context
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Replaces positional `{}` slots with `{term}` in declaration order.
pub fn bind_prompt_terms(spread: &Spread) -> Result<String> {
    let pieces: Vec<&str> = spread.prompt_template.split("{}").collect();
    let slots = pieces.len() - 1;
    if slots > spread.prompt_terms.len() {
        return Err(FortuneError::InvalidSpread {
            message: format!(
                "spread '{}' has {} prompt slots but only {} prompt terms",
                spread.name,
                slots,
                spread.prompt_terms.len()
            ),
        });
    }

    let mut bound = String::with_capacity(spread.prompt_template.len());
    for (index, piece) in pieces.iter().enumerate() {
        bound.push_str(piece);
        if index < slots {
            bound.push('{');
            bound.push_str(&spread.prompt_terms[index]);
            bound.push('}');
        }
    }
    Ok(bound)
}

/// Substitutes every `{name}` in `template`. Values are inserted verbatim and
/// never scanned for further placeholders.
pub fn render_prompt(template: &str, context: &PromptContext) -> Result<String> {
    if let Some(missing) = PLACEHOLDER
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .find(|name| context.get(name).is_none())
    {
        return Err(FortuneError::MissingPromptVariable { name: missing });
    }

    let rendered = PLACEHOLDER.replace_all(template, |caps: &Captures| {
        context.get(&caps[1]).unwrap_or_default().to_string()
    });
    Ok(rendered.into_owned())
}
