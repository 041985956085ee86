#![deny(warnings)]

use crate::args::Arguments;
use crate::file_state::{FileState, SessionInfo};
use crate::investor::Investor;
use crate::investor_service::InvestorService;
use crate::token_providers::file_token_provider::FileTokenProvider;
use crate::token_providers::static_token_provider::StaticTokenProvider;
use crate::token_providers::token_provider::TokenProvider;
use crate::view_model::{InvestorViewModel, LoadError, ViewState};
use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;

pub mod args;
mod config_file;
pub mod file_state;
pub mod investor;
pub mod investor_service;
pub mod token_providers;
pub mod view_model;

fn file_state(args: &Arguments) -> Result<FileState> {
    match &args.state_file {
        Some(path) => Ok(FileState::from(path.to_owned())),
        None => FileState::new(),
    }
}

fn token_provider(args: &Arguments) -> Result<Arc<dyn TokenProvider>> {
    if args.token.is_some() {
        log::debug!("Using the token given in arguments");
        return Ok(Arc::new(StaticTokenProvider::new(args.token.to_owned())));
    }

    Ok(Arc::new(FileTokenProvider::new(
        file_state(args)?,
        args.server(),
    )))
}

/// Builds the view model for the selected server, wired with the stored
/// (or given) token and the HTTP investor service.
pub fn investor_view_model(args: &Arguments) -> Result<InvestorViewModel> {
    let service = InvestorService::new(args.base_url(), args.timeout())?;

    Ok(InvestorViewModel::new(
        token_provider(args)?,
        Arc::new(service),
    ))
}

pub async fn load_investors(args: &Arguments) -> Result<ViewState> {
    let view_model = Arc::new(investor_view_model(args)?);

    let weak = Arc::downgrade(&view_model);
    view_model.subscribe(move || {
        if let Some(view_model) = weak.upgrade() {
            log::debug!(
                "View state changed: loading={} error={:?}",
                view_model.is_loading(),
                view_model.error()
            );
        }
    });

    view_model.load_investors().await;

    Ok(view_model.snapshot())
}

pub async fn get_investor(args: &Arguments, id: i64) -> Result<Investor> {
    let token = token_provider(args)?
        .get_token()
        .await?
        .ok_or(LoadError::AuthenticationRequired)?;

    InvestorService::new(args.base_url(), args.timeout())?
        .get_by_id(&token, id)
        .await
        .with_context(|| format!("Failed to get investor {}", id))
}

pub async fn save_token(args: &Arguments, token: String) -> Result<()> {
    file_state(args)?
        .upsert_session(args.server(), SessionInfo::from_token(token))
        .await
        .context("Failed to store the token")
}

/// Claims of the stored token, if any
pub async fn stored_user(args: &Arguments) -> Result<Option<Value>> {
    let session = file_state(args)?.read_session(&args.server()).await?;

    Ok(session.and_then(|session| session.user))
}

pub async fn clear_token(args: &Arguments) -> Result<()> {
    file_state(args)?
        .clear_session(args.server())
        .await
        .context("Failed to clear the stored token")
}
