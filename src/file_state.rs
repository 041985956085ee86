use anyhow::{Context, Result};
use base64::Engine;
use base64::prelude::BASE64_URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

type Server = String;

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct SessionInfo {
    pub token: String,

    /// Claims carried by the token (user id, email, role...), when it is a JWT
    pub user: Option<Value>,
}

impl SessionInfo {
    pub fn from_token(token: String) -> SessionInfo {
        let user = jwt_claims(&token);

        SessionInfo { token, user }
    }
}

fn jwt_claims(token: &str) -> Option<Value> {
    let payload = token.split('.').nth(1)?;
    let bytes = BASE64_URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(claims @ Value::Object(_)) => Some(claims),
        _ => None,
    }
}

#[derive(Deserialize, Serialize)]
struct KaiaState {
    version: u32,
    data: HashMap<Server, SessionInfo>,
}

impl Default for KaiaState {
    fn default() -> Self {
        KaiaState {
            version: 1,
            data: HashMap::new(),
        }
    }
}

pub struct FileState {
    file_path: PathBuf,
}

impl FileState {
    pub fn new() -> Result<FileState> {
        let mut home_dir = home::home_dir().context("Couldn't access $HOME_DIR")?;
        home_dir.push(".kaia.json");

        Ok(FileState {
            file_path: home_dir,
        })
    }

    pub fn from(file_path: PathBuf) -> FileState {
        FileState { file_path }
    }

    /// A missing file is a fresh state and a corrupted one is started over.
    /// Any other I/O failure is reported.
    async fn read(&self) -> Result<KaiaState> {
        log::debug!("Reading the state file");
        let text = match fs::read_to_string(&self.file_path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(KaiaState::default()),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!(
                        "Failed to read the state file {}",
                        &self.file_path.to_string_lossy()
                    )
                });
            }
        };

        Ok(serde_json::from_str::<KaiaState>(&text).unwrap_or_else(|e| {
            log::warn!(
                "Ignoring corrupted state file {}. Error: {}",
                &self.file_path.to_string_lossy(),
                e
            );
            KaiaState::default()
        }))
    }

    async fn write(&self, state: &KaiaState) -> Result<()> {
        log::debug!("Writing the state file");
        let state_str = serde_json::to_string(state).context("Failed to serialize the state")?;

        fs::write(&self.file_path, state_str)
            .await
            .with_context(|| {
                format!(
                    "Failed to write to {} file",
                    &self.file_path.as_os_str().to_string_lossy()
                )
            })?;

        Ok(())
    }

    pub async fn read_session(&self, server: &str) -> Result<Option<SessionInfo>> {
        log::debug!("Reading session for server: {} from the state", server);
        let state = self.read().await?;

        Ok(state.data.get(server).cloned())
    }

    pub async fn upsert_session(&self, server: String, session: SessionInfo) -> Result<()> {
        log::debug!("Saving session for server: {} to the state", server);
        let mut state = self.read().await?;

        state.data.insert(server, session);

        self.write(&state).await
    }

    pub async fn clear_session(&self, server: String) -> Result<()> {
        log::debug!("Clearing session for server: {} in the state", server);
        let mut state = self.read().await?;

        if state.data.remove(&server).is_none() {
            log::debug!("No session stored for server: {}", server);
        }

        self.write(&state).await
    }
}
