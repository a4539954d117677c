use crate::domain::model::{Card, DrawResult, DrawnCard, Spread};
use crate::utils::error::{FortuneError, Result};
use rand::seq::index;
use rand::Rng;

/// Samples `count` distinct indices from `0..deck_size`. The first index drawn
/// fills the first spread position.
pub fn draw_cards<R: Rng + ?Sized>(rng: &mut R, deck_size: usize, count: usize) -> Result<Vec<usize>> {
    if count > deck_size {
        return Err(FortuneError::InvalidSpread {
            message: format!("cannot draw {} cards from a deck of {}", count, deck_size),
        });
    }
    Ok(index::sample(rng, deck_size, count).into_vec())
}

/// `<assets>/cardfaces/fullimages/<ordering>_<Name_With_Underscores>.jpg`
pub fn card_image_path(assets_dir: &str, card: &Card) -> String {
    format!(
        "{}/cardfaces/fullimages/{}_{}.jpg",
        assets_dir.trim_end_matches('/'),
        card.ordering,
        card.name.replace(' ', "_")
    )
}

pub fn draw_spread<R: Rng + ?Sized>(
    rng: &mut R,
    deck: &[Card],
    spread: &Spread,
    assets_dir: &str,
) -> Result<DrawResult> {
    let indices = draw_cards(rng, deck.len(), spread.card_count)?;

    let cards = indices
        .into_iter()
        .map(|index| {
            let card = deck[index].clone();
            DrawnCard {
                index,
                image_path: card_image_path(assets_dir, &card),
                card,
            }
        })
        .collect();

    Ok(DrawResult { cards })
}
