use crate::core::prompt::{bind_prompt_terms, is_term_name};
use crate::core::zodiac::ZodiacTable;
use crate::domain::model::{Card, Spread};
use crate::domain::ports::Storage;
use crate::utils::error::{FortuneError, Result};
use std::collections::HashSet;

pub const DECK_FILE: &str = "tarot_deck_numbered.json";
pub const SPREADS_FILE: &str = "tarot_spreads.json";
pub const ASTROLOGY_FILE: &str = "astrology.json";

pub const DECK_SIZE: usize = 78;

/// Static data shared by every reading: the deck, the chosen spread and the
/// zodiac table. Built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct Catalog {
    deck: Vec<Card>,
    spread: Spread,
    prompt_template: String,
    zodiac: ZodiacTable,
}

impl Catalog {
    pub async fn load<S: Storage>(storage: &S, spread_index: usize) -> Result<Self> {
        let deck: Vec<Card> = parse_file(DECK_FILE, &storage.read_file(DECK_FILE).await?)?;
        let spreads: Vec<Spread> =
            parse_file(SPREADS_FILE, &storage.read_file(SPREADS_FILE).await?)?;
        let zodiac = ZodiacTable::from_json(&storage.read_file(ASTROLOGY_FILE).await?)
            .map_err(|e| match e {
                FortuneError::SerializationError(e) => FortuneError::CatalogError {
                    file: ASTROLOGY_FILE.to_string(),
                    message: e.to_string(),
                },
                other => other,
            })?;

        tracing::info!(
            "Loaded {} cards, {} spreads and {} zodiac signs",
            deck.len(),
            spreads.len(),
            zodiac.len()
        );

        Self::from_parts(deck, spreads, zodiac, spread_index)
    }

    pub fn from_parts(
        deck: Vec<Card>,
        spreads: Vec<Spread>,
        zodiac: ZodiacTable,
        spread_index: usize,
    ) -> Result<Self> {
        validate_deck(&deck)?;

        let spread_count = spreads.len();
        let spread = spreads
            .into_iter()
            .nth(spread_index)
            .ok_or_else(|| FortuneError::InvalidSpread {
                message: format!(
                    "spread index {} out of range ({} spreads available)",
                    spread_index, spread_count
                ),
            })?;
        validate_spread(&spread, deck.len())?;

        if zodiac.is_empty() {
            return Err(FortuneError::CatalogError {
                file: ASTROLOGY_FILE.to_string(),
                message: "no zodiac signs defined".to_string(),
            });
        }

        let prompt_template = bind_prompt_terms(&spread)?;
        tracing::info!("Spread chosen: {}", spread.name);
        tracing::debug!("Prompt chosen: {}", prompt_template);

        Ok(Self {
            deck,
            spread,
            prompt_template,
            zodiac,
        })
    }

    pub fn deck(&self) -> &[Card] {
        &self.deck
    }

    pub fn spread(&self) -> &Spread {
        &self.spread
    }

    /// The spread's template with its positional slots bound to term names.
    pub fn prompt_template(&self) -> &str {
        &self.prompt_template
    }

    pub fn zodiac(&self) -> &ZodiacTable {
        &self.zodiac
    }
}

fn parse_file<T: serde::de::DeserializeOwned>(file: &str, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| FortuneError::CatalogError {
        file: file.to_string(),
        message: e.to_string(),
    })
}

/// Orderings must be exactly `0..DECK_SIZE`, each stored at its own index.
pub fn validate_deck(deck: &[Card]) -> Result<()> {
    if deck.len() != DECK_SIZE {
        return Err(FortuneError::CatalogError {
            file: DECK_FILE.to_string(),
            message: format!("expected {} cards, found {}", DECK_SIZE, deck.len()),
        });
    }

    for (index, card) in deck.iter().enumerate() {
        if card.ordering as usize != index {
            return Err(FortuneError::CatalogError {
                file: DECK_FILE.to_string(),
                message: format!(
                    "card '{}' has ordering {} at position {}",
                    card.name, card.ordering, index
                ),
            });
        }
    }

    Ok(())
}

pub fn validate_spread(spread: &Spread, deck_size: usize) -> Result<()> {
    let invalid = |message: String| FortuneError::InvalidSpread {
        message: format!("{}: {}", spread.name, message),
    };

    if spread.card_count == 0 {
        return Err(invalid("spread_count must be at least 1".to_string()));
    }
    if spread.positions.len() != spread.card_count {
        return Err(invalid(format!(
            "spread_count is {} but {} positions are described",
            spread.card_count,
            spread.positions.len()
        )));
    }
    if spread.card_count > deck_size {
        return Err(invalid(format!(
            "spread_count {} exceeds deck size {}",
            spread.card_count, deck_size
        )));
    }

    if let Some(term) = spread.prompt_terms.iter().find(|term| !is_term_name(term)) {
        return Err(invalid(format!("prompt term '{}' is not a valid name", term)));
    }

    let mut ids = HashSet::new();
    for position in &spread.positions {
        if !ids.insert(position.id) {
            return Err(invalid(format!("duplicate position id {}", position.id)));
        }
    }

    Ok(())
}
