#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod feed;
pub mod generator;
pub mod history;
pub mod infra;
pub mod media;
pub mod scores;
pub mod services;
pub mod store;

// Re-exports for public API
pub use config::GameConfig;
pub use error::AppError;
pub use errors::DomainError;
pub use infra::state::{build_context, build_memory_context, ContextBuilder, GameContext};
pub use services::host::{HostCommand, HostGame, HostUpdate};
pub use services::player::{AgentChange, PlayerAgent};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    engine_test_support::test_logging::init();
}
