//! Domain-level error type used across the arbiter, store, and services.
//!
//! This error type is HTTP-agnostic. Handlers should return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Rule violations that make a proposal illegal (non-fatal; the client
/// re-fetches and retries or surfaces the reason).
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    /// A participant acted outside their turn.
    OutOfTurn,
    /// The move does not belong to the room's current phase.
    PhaseMismatch,
    /// Proposed token is not in the room's palette.
    UnknownColor,
    /// Palette smaller than the minimum.
    PaletteTooSmall,
    /// Palette contains a repeated token.
    DuplicateColor,
    /// The caller is not a participant of the room.
    NotAParticipant,
    Other(String),
}

/// Semantic conflicts between the client's view and the authoritative record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    /// Proposal submitted against a round/position the room has moved past.
    StaleProposal,
    /// Lock version supplied by the client no longer matches.
    OptimisticLock,
    /// Both seats are already taken.
    RoomFull,
    /// Operation only valid for a still-Waiting room.
    AlreadyStarted,
    Other(String),
}

/// Missing resources in domain terms.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Room,
    Other(String),
}

/// Central domain error type.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    Validation(ValidationKind, String),
    Conflict(ConflictKind, String),
    NotFound(NotFoundKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation {kind:?}: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }

    /// Stale-proposal rejections are expected under concurrent polling and
    /// are resolved by a re-fetch; callers use this to pick log levels.
    pub fn is_stale(&self) -> bool {
        matches!(
            self,
            DomainError::Conflict(ConflictKind::StaleProposal, _)
                | DomainError::Conflict(ConflictKind::OptimisticLock, _)
        )
    }
}
