//! Domain-level error type used across services and adapters.
//!
//! This error type is transport- and storage-agnostic. The simulator
//! binary converts it at the edge via `From<DomainError> for
//! crate::error::AppError`.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Infra error kinds to distinguish operational failures.
///
/// All of these are transient from the caller's point of view: the same
/// step may be retried manually, never in a silent loop.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Timeout,
    StorageUnavailable,
    FeedClosed,
    Other(String),
}

/// Domain-level not found entities (minimal set; extend as needed)
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Session,
    Round,
    Player,
    Other(String),
}

/// Domain-level conflict kinds (extend as needed)
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    /// A session row with the same join code already exists.
    JoinCode,
    /// Rounds were already generated for this session by another writer.
    RoundsExist,
    /// A vote for this (round, player) pair already exists.
    DuplicateVote,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input validation or business rule violation (e.g. voting twice
    /// in the same round from the same agent).
    Validation(String),
    /// Semantic conflict
    Conflict(ConflictKind, String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
    /// Infrastructure/operational failures
    Infra(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(d) => write!(f, "validation error: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation(detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }

    /// True when the failure is operational and the same step may be
    /// retried (as opposed to a semantic NotFound/Conflict/Validation).
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::Infra(_, _))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_infra_errors_are_transient() {
        assert!(DomainError::infra(InfraErrorKind::Timeout, "slow storage").is_transient());
        assert!(DomainError::infra(InfraErrorKind::FeedClosed, "feed ended").is_transient());
        assert!(!DomainError::validation("bad input").is_transient());
        assert!(!DomainError::conflict(ConflictKind::DuplicateVote, "dup").is_transient());
        assert!(!DomainError::not_found(NotFoundKind::Session, "gone").is_transient());
    }
}
