use anyhow::Result;
use async_trait::async_trait;

use super::token_provider::TokenProvider;

pub struct StaticTokenProvider {
    token: Option<String>,
}

impl StaticTokenProvider {
    pub fn new(token: Option<String>) -> StaticTokenProvider {
        StaticTokenProvider { token }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_token(&self) -> Result<Option<String>> {
        Ok(self.token.to_owned())
    }
}
