//! Error codes for the backend API.
//!
//! This module defines all error codes used throughout the application.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request validation
    /// A participant acted outside their turn
    OutOfTurn,
    /// Move does not belong to the room's current phase
    PhaseMismatch,
    /// Proposed color is not in the room's palette
    UnknownColor,
    /// Palette smaller than the minimum size
    PaletteTooSmall,
    /// Palette contains a repeated color
    DuplicateColor,
    /// Caller is not a participant of the room
    NotAParticipant,
    /// Invalid or missing HTTP header
    InvalidHeader,
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,

    // Resource not found
    /// Room not found
    RoomNotFound,
    /// General not found error
    NotFound,

    // Business logic conflicts
    /// Proposal submitted against a round the room has moved past
    StaleProposal,
    /// Optimistic lock conflict
    OptimisticLock,
    /// Both seats already taken
    RoomFull,
    /// Operation only valid for a still-Waiting room
    AlreadyStarted,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System errors
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Canonical SCREAMING_SNAKE_CASE string for HTTP responses.
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::OutOfTurn => "OUT_OF_TURN",
            ErrorCode::PhaseMismatch => "PHASE_MISMATCH",
            ErrorCode::UnknownColor => "UNKNOWN_COLOR",
            ErrorCode::PaletteTooSmall => "PALETTE_TOO_SMALL",
            ErrorCode::DuplicateColor => "DUPLICATE_COLOR",
            ErrorCode::NotAParticipant => "NOT_A_PARTICIPANT",
            ErrorCode::InvalidHeader => "INVALID_HEADER",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::RoomNotFound => "ROOM_NOT_FOUND",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::StaleProposal => "STALE_PROPOSAL",
            ErrorCode::OptimisticLock => "OPTIMISTIC_LOCK",
            ErrorCode::RoomFull => "ROOM_FULL",
            ErrorCode::AlreadyStarted => "ALREADY_STARTED",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::Internal => "INTERNAL",
            ErrorCode::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
