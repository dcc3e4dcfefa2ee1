//! The client's view of the engine's external interface.
//!
//! [`GameApi`] abstracts the fetch/propose/leave operations so the sync
//! loop and sentinel run identically over HTTP ([`HttpGameApi`]) and
//! in-process against an embedded engine ([`InProcessGameApi`]).

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::snapshot::{snapshot, GameSnapshot};
use crate::domain::state::{PlayerId, RoomId};
use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::http::etag::room_etag;
use crate::protocol::{LeaveRequest, MoveKind, MoveRequest};
use crate::state::app_state::AppState;

/// Client-side failure taxonomy.
///
/// `Transport` failures are recovered by retrying on the next poll tick;
/// `Rejected` carries the server's reason code and is resolved by
/// re-fetching (stale proposals) or surfacing the reason (illegal moves).
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("rejected ({code}): {detail}")]
    Rejected { code: String, detail: String },
}

impl ApiError {
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}

/// Result of one poll: `snapshot` is `None` when the server answered
/// `304 Not Modified` for the ETag we sent.
#[derive(Debug, Clone)]
pub struct StateFetch {
    pub snapshot: Option<GameSnapshot>,
    pub etag: Option<String>,
}

#[async_trait]
pub trait GameApi: Send + Sync {
    /// Poll the authoritative snapshot, conditionally on `etag`.
    async fn fetch_state(
        &self,
        room_id: RoomId,
        etag: Option<&str>,
    ) -> Result<StateFetch, ApiError>;

    /// Propose one move; the only mutation entry point.
    async fn propose_move(
        &self,
        room_id: RoomId,
        request: &MoveRequest,
    ) -> Result<GameSnapshot, ApiError>;

    /// Disconnect path.
    async fn notify_leave(&self, room_id: RoomId, player: PlayerId) -> Result<(), ApiError>;
}

/// HTTP implementation over the backend's routes.
pub struct HttpGameApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGameApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    async fn rejection_from(response: reqwest::Response) -> ApiError {
        let status = response.status();
        match response.json::<serde_json::Value>().await {
            Ok(body) => ApiError::Rejected {
                code: body
                    .get("code")
                    .and_then(|c| c.as_str())
                    .unwrap_or("UNKNOWN")
                    .to_string(),
                detail: body
                    .get("detail")
                    .and_then(|d| d.as_str())
                    .unwrap_or_default()
                    .to_string(),
            },
            Err(_) => ApiError::Rejected {
                code: "UNKNOWN".to_string(),
                detail: format!("HTTP {status} with unreadable body"),
            },
        }
    }
}

#[async_trait]
impl GameApi for HttpGameApi {
    async fn fetch_state(
        &self,
        room_id: RoomId,
        etag: Option<&str>,
    ) -> Result<StateFetch, ApiError> {
        let mut request = self
            .client
            .get(self.url(&format!("/api/games/{room_id}/state")));
        if let Some(etag) = etag {
            request = request.header(reqwest::header::IF_NONE_MATCH, etag);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let response_etag = response
            .headers()
            .get(reqwest::header::ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if response.status() == reqwest::StatusCode::NOT_MODIFIED {
            return Ok(StateFetch {
                snapshot: None,
                etag: response_etag,
            });
        }
        if !response.status().is_success() {
            return Err(Self::rejection_from(response).await);
        }

        let snapshot = response
            .json::<GameSnapshot>()
            .await
            .map_err(|e| ApiError::Transport(format!("malformed snapshot: {e}")))?;
        Ok(StateFetch {
            snapshot: Some(snapshot),
            etag: response_etag,
        })
    }

    async fn propose_move(
        &self,
        room_id: RoomId,
        request: &MoveRequest,
    ) -> Result<GameSnapshot, ApiError> {
        let response = self
            .client
            .post(self.url(&format!("/api/games/{room_id}/move")))
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::rejection_from(response).await);
        }
        response
            .json::<GameSnapshot>()
            .await
            .map_err(|e| ApiError::Transport(format!("malformed snapshot: {e}")))
    }

    async fn notify_leave(&self, room_id: RoomId, player: PlayerId) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url(&format!("/api/games/{room_id}/leave")))
            .json(&LeaveRequest { player_id: player })
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::rejection_from(response).await);
        }
        Ok(())
    }
}

/// In-process implementation over an embedded engine. Used by tests and by
/// deployments that co-locate a bot client with the backend.
pub struct InProcessGameApi {
    app: AppState,
}

impl InProcessGameApi {
    pub fn new(app: AppState) -> Self {
        Self { app }
    }

    fn rejection(e: DomainError) -> ApiError {
        let app_error: AppError = e.into();
        ApiError::Rejected {
            code: app_error.code().to_string(),
            detail: app_error.to_string(),
        }
    }
}

#[async_trait]
impl GameApi for InProcessGameApi {
    async fn fetch_state(
        &self,
        room_id: RoomId,
        etag: Option<&str>,
    ) -> Result<StateFetch, ApiError> {
        let versioned = self
            .app
            .store
            .read(room_id)
            .await
            .map_err(Self::rejection)?;
        let current_etag = room_etag(room_id, versioned.lock_version);
        if etag == Some(current_etag.as_str()) {
            return Ok(StateFetch {
                snapshot: None,
                etag: Some(current_etag),
            });
        }
        Ok(StateFetch {
            snapshot: Some(snapshot(&versioned.state, versioned.lock_version)),
            etag: Some(current_etag),
        })
    }

    async fn propose_move(
        &self,
        room_id: RoomId,
        request: &MoveRequest,
    ) -> Result<GameSnapshot, ApiError> {
        let flow = &self.app.flow;
        let outcome = match request.kind.clone() {
            MoveKind::FirstColor { color } => {
                flow.submit_first_color(
                    room_id,
                    request.player_id,
                    color,
                    request.expected_round,
                    None,
                )
                .await
            }
            MoveKind::BeginReplay => {
                flow.begin_replay(room_id, request.player_id, request.expected_round, None)
                    .await
            }
            MoveKind::Replay { position, color } => {
                flow.submit_replay_token(
                    room_id,
                    request.player_id,
                    position,
                    color,
                    request.expected_round,
                    None,
                )
                .await
            }
            MoveKind::Extend { color } => {
                flow.extend_sequence(
                    room_id,
                    request.player_id,
                    color,
                    request.expected_round,
                    None,
                )
                .await
            }
        }
        .map_err(Self::rejection)?;

        Ok(snapshot(&outcome.state, outcome.lock_version))
    }

    async fn notify_leave(&self, room_id: RoomId, player: PlayerId) -> Result<(), ApiError> {
        self.app
            .flow
            .leave(room_id, player)
            .await
            .map(|_| ())
            .map_err(Self::rejection)
    }
}

/// Convenience for sharing one API among loop, sentinel, and app code.
pub type SharedGameApi = Arc<dyn GameApi>;
