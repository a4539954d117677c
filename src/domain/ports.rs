use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// The text-generation service behind a reading. One prompt in, one blob out.
#[async_trait]
pub trait FortuneTeller: Send + Sync {
    async fn tell(&self, prompt: &str) -> Result<String>;
}
