//! Error handling for the game engine.

pub mod domain;

pub use domain::DomainError;
