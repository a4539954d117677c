//! Presentation state for a single reading.
//!
//! Each transition takes the current view and returns the next one; the
//! engine decides which transition applies, a front end only renders.

use crate::domain::model::{DrawResult, DrawnCard, FortuneResult, Spread, SpreadPosition};
use crate::utils::error::FortuneError;
use serde::Serialize;

pub const BUTTON_PHRASE: &str = "Tell Me My Fortune!";
pub const DIVINING: &str = "Divining...";
pub const TOLD: &str = "Fortune below...refresh for a new chance";
pub const UNKNOWN_CARD: &str = "Fortune is unknown...";
pub const UNKNOWN_OVERALL: &str = "Fortune is unknown... to say";
pub const COMPLICATED: &str = "A complex fortune...scroll to the very bottom.";
pub const COMPLICATED_CARD: &str = "Fortune is complicated...scroll down...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonState {
    pub label: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardSlot {
    pub position: SpreadPosition,
    pub card: Option<DrawnCard>,
    pub fortune: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FortuneView {
    pub button: ButtonState,
    pub slots: Vec<CardSlot>,
    pub overall: String,
}

impl FortuneView {
    pub fn initial(spread: &Spread) -> Self {
        Self {
            button: ButtonState {
                label: BUTTON_PHRASE.to_string(),
                enabled: true,
            },
            slots: spread
                .positions
                .iter()
                .map(|position| CardSlot {
                    position: position.clone(),
                    card: None,
                    fortune: String::new(),
                })
                .collect(),
            overall: "Your future fortune".to_string(),
        }
    }

    /// Control disabled while the request is outstanding.
    pub fn divining(self) -> Self {
        self.with_button(DIVINING, false)
    }

    /// Input was rejected before anything was drawn.
    pub fn rejected(self, error: &FortuneError) -> Self {
        self.with_button(&error.user_friendly_message(), true)
    }

    pub fn with_draw(mut self, draw: &DrawResult) -> Self {
        for (slot, drawn) in self.slots.iter_mut().zip(&draw.cards) {
            slot.card = Some(drawn.clone());
        }
        self
    }

    /// Something after the draw failed; the cards stay on the table.
    pub fn unknown_fortune(mut self, error: &FortuneError) -> Self {
        for slot in &mut self.slots {
            slot.fortune = UNKNOWN_CARD.to_string();
        }
        self.overall = UNKNOWN_OVERALL.to_string();
        self.with_button(&error.user_friendly_message(), true)
    }

    /// The reply did not have one paragraph per card plus the overall one.
    pub fn complicated_fortune(mut self, raw: &str) -> Self {
        for slot in &mut self.slots {
            slot.fortune = COMPLICATED_CARD.to_string();
        }
        self.overall = raw.to_string();
        self.with_button(COMPLICATED, true)
    }

    pub fn fortune_told(mut self, result: FortuneResult) -> Self {
        for (slot, fortune) in self.slots.iter_mut().zip(result.card_fortunes) {
            slot.fortune = fortune;
        }
        self.overall = result.overall;
        self.with_button(TOLD, false)
    }

    fn with_button(mut self, label: &str, enabled: bool) -> Self {
        self.button = ButtonState {
            label: label.to_string(),
            enabled,
        };
        self
    }
}
