pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{filler::FillerTeller, llm::OpenAiTeller, storage::LocalStorage};
pub use config::AppConfig;
pub use crate::core::{
    catalog::Catalog,
    engine::{FortuneEngine, FortuneRequest, ReadingSettings},
    view::FortuneView,
};
pub use utils::error::{FortuneError, Result};
