pub mod catalog;
pub mod draw;
pub mod engine;
pub mod memory;
pub mod prompt;
pub mod splitter;
pub mod view;
pub mod zodiac;

pub use crate::domain::model::{
    Arcana, BirthProfile, Card, DrawResult, DrawnCard, FortuneResult, LastInputs, Spread,
    SpreadPosition, ZodiacRange,
};
pub use crate::domain::ports::{FortuneTeller, Storage};
pub use crate::utils::error::Result;
