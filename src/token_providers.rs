pub mod file_token_provider;
pub mod static_token_provider;
pub mod token_provider;
