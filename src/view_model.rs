use crate::investor::Investor;
use crate::investor_service::InvestorFetcher;
use crate::token_providers::token_provider::TokenProvider;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub const TOKEN_NOT_FOUND: &str = "Token não encontrado. Faça login novamente.";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Token não encontrado. Faça login novamente.")]
    AuthenticationRequired,

    #[error("{0:#}")]
    TokenLookupFailed(anyhow::Error),

    #[error("{0:#}")]
    FetchFailed(anyhow::Error),
}

/// What a view renders: the last loaded investors, whether a load is in
/// flight and the message of the last failed load.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    pub investors: Vec<Investor>,

    pub is_loading: bool,

    pub error: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn() + Send + Sync>;

/// Holds the investors list state for a view and notifies listeners on every
/// change. Listeners get no payload, they read the state back through the
/// accessors.
pub struct InvestorViewModel {
    token_provider: Arc<dyn TokenProvider>,
    fetcher: Arc<dyn InvestorFetcher>,
    state: Mutex<ViewState>,
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
    next_listener_id: AtomicU64,
}

impl InvestorViewModel {
    pub fn new(
        token_provider: Arc<dyn TokenProvider>,
        fetcher: Arc<dyn InvestorFetcher>,
    ) -> InvestorViewModel {
        InvestorViewModel {
            token_provider,
            fetcher,
            state: Mutex::new(ViewState::default()),
            listeners: Mutex::new(Vec::new()),
            next_listener_id: AtomicU64::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn listeners(&self) -> MutexGuard<'_, Vec<(ListenerId, Listener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn investors(&self) -> Vec<Investor> {
        self.state().investors.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    pub fn snapshot(&self) -> ViewState {
        self.state().clone()
    }

    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener_id.fetch_add(1, Ordering::Relaxed));
        self.listeners().push((id, Arc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    fn notify_listeners(&self) {
        // Called without holding any lock so listeners can read the state
        // and (un)subscribe.
        let listeners: Vec<Listener> = self
            .listeners()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in listeners {
            listener();
        }
    }

    /// Loads the investors with the current token. Never fails: a failure
    /// ends up as the `error` message and leaves `investors` as they were.
    ///
    /// Overlapping calls are not serialized, the last one to finish wins.
    pub async fn load_investors(&self) {
        {
            let mut state = self.state();
            state.is_loading = true;
            state.error = None;
        }
        self.notify_listeners();

        let result = self.fetch().await;

        {
            let mut state = self.state();
            match result {
                Ok(investors) => {
                    log::debug!("Loaded {} investors", investors.len());
                    state.investors = investors;
                }
                Err(e) => {
                    log::warn!("Failed to load investors: {}", e);
                    state.error = Some(e.to_string());
                }
            }
            state.is_loading = false;
        }
        self.notify_listeners();
    }

    async fn fetch(&self) -> Result<Vec<Investor>, LoadError> {
        log::debug!("Retrieving token...");
        let token = self
            .token_provider
            .get_token()
            .await
            .map_err(LoadError::TokenLookupFailed)?
            .ok_or(LoadError::AuthenticationRequired)?;

        log::debug!("Fetching investors...");
        self.fetcher
            .fetch_investors(&token)
            .await
            .map_err(LoadError::FetchFailed)
    }
}
