use anyhow::Result;
use async_trait::async_trait;

/// Source of the bearer token used to talk to the investors API.
/// `Ok(None)` means there is no token at all, so the user has to log in.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn get_token(&self) -> Result<Option<String>>;
}
