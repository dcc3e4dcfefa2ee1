//! ETag helpers for optimistic concurrency control.
//!
//! The snapshot endpoint tags each response with the room's lock version so
//! polling clients can cheaply ask "anything new?" via `If-None-Match` and
//! guard proposals via `If-Match`.

use crate::domain::state::RoomId;
use crate::error::AppError;
use crate::errors::ErrorCode;

/// Generate an ETag for a room resource.
///
/// Format: `"room-{id}-v{version}"` (with quotes, as required by HTTP spec).
pub fn room_etag(room_id: RoomId, version: i64) -> String {
    format!(r#""room-{room_id}-v{version}""#)
}

/// Parse the lock version from a room ETag value.
pub fn parse_room_version_from_etag(s: &str) -> Result<i64, AppError> {
    let s = s.trim_matches('"');

    let version_prefix = "-v";
    let version_start = s
        .rfind(version_prefix)
        .ok_or_else(|| {
            AppError::bad_request(
                ErrorCode::InvalidHeader,
                format!(
                    "Invalid ETag format: missing version marker. Expected \"room-{{id}}-v{{version}}\", got \"{s}\""
                ),
            )
        })?
        + version_prefix.len();

    s[version_start..].parse::<i64>().map_err(|_| {
        AppError::bad_request(
            ErrorCode::InvalidHeader,
            format!(
                "Invalid ETag format: version must be an integer, got \"{}\"",
                &s[version_start..]
            ),
        )
    })
}
