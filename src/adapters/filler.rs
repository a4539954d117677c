use crate::domain::ports::FortuneTeller;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Offline stand-in used when AI is switched off: numbered placeholder
/// paragraphs, one per card plus the overall fortune.
#[derive(Debug, Clone)]
pub struct FillerTeller {
    paragraphs: usize,
}

impl FillerTeller {
    pub fn new(card_count: usize) -> Self {
        Self {
            paragraphs: card_count + 1,
        }
    }
}

#[async_trait]
impl FortuneTeller for FillerTeller {
    async fn tell(&self, _prompt: &str) -> Result<String> {
        let text = (1..=self.paragraphs)
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join("\n\n");
        Ok(text)
    }
}
