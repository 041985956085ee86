use crate::file_state::FileState;
use anyhow::Result;
use async_trait::async_trait;

use super::token_provider::TokenProvider;

pub struct FileTokenProvider {
    file_state: FileState,
    server: String,
}

impl FileTokenProvider {
    pub fn new(file_state: FileState, server: String) -> FileTokenProvider {
        FileTokenProvider { file_state, server }
    }
}

#[async_trait]
impl TokenProvider for FileTokenProvider {
    async fn get_token(&self) -> Result<Option<String>> {
        let session = self.file_state.read_session(&self.server).await?;

        match session {
            Some(session) if !session.token.is_empty() => Ok(Some(session.token)),
            Some(_) => {
                log::debug!("Stored token for {} is empty", self.server);
                Ok(None)
            }
            None => {
                log::debug!("No stored session for {}", self.server);
                Ok(None)
            }
        }
    }
}
