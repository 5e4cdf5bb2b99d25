//! Role services: session lifecycle, the host orchestrator, and the
//! player agent.

pub mod host;
pub mod player;
pub mod sessions;
