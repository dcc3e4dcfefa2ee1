//! The polling sync loop.
//!
//! Periodically fetches the authoritative snapshot, recomputes the local
//! view purely from that fetch, and publishes it. The loop never carries
//! locally mutated copies of the sequence or turn across polls; whatever
//! optimism the UI paints is overwritten by the next authoritative fetch.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::api::{ApiError, GameApi};
use crate::domain::snapshot::{GameSnapshot, PhaseSnapshot};
use crate::domain::state::{FinishReason, GameStatus, PlayerId, PlayerRole, RoomId};
use crate::domain::ColorToken;

/// Poll tuning. The Waiting interval is tighter so the creator notices the
/// join quickly; once playing, the pace relaxes.
#[derive(Debug, Clone)]
pub struct SyncLoopConfig {
    pub waiting_poll: Duration,
    pub active_poll: Duration,
    /// Consecutive transport failures tolerated before the loop gives up.
    pub failure_budget: u32,
}

impl Default for SyncLoopConfig {
    fn default() -> Self {
        Self {
            waiting_poll: Duration::from_millis(1000),
            active_poll: Duration::from_millis(2500),
            failure_budget: 8,
        }
    }
}

/// Terminal result, surfaced exactly once when the loop observes Finished.
#[derive(Debug, Clone, PartialEq)]
pub struct GameOutcome {
    pub winner: Option<PlayerId>,
    pub reason: Option<FinishReason>,
    pub scores: [u32; 2],
}

/// Locally derived flags: a pure function of the last authoritative fetch
/// (plus the transport health marker), never independently mutable state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalView {
    pub status: Option<GameStatus>,
    pub my_role: Option<PlayerRole>,
    pub my_turn: bool,
    /// Set while the creator must pick the opening color.
    pub picking_first_color: bool,
    /// The just-revealed color the current mover must memorize.
    pub revealed: Option<ColorToken>,
    /// (matched, total) while replaying.
    pub replay_progress: Option<(usize, usize)>,
    /// Set when the replay is complete and one color must be appended.
    pub extending: bool,
    pub round: usize,
    pub scores: [u32; 2],
    pub finished: Option<GameOutcome>,
    /// True while fetches are failing; the UI shows "reconnecting".
    pub reconnecting: bool,
}

/// Compute the local view for `me` from an authoritative snapshot.
pub fn derive_view(snap: &GameSnapshot, me: PlayerId) -> LocalView {
    let my_role = snap.role_of(me);
    let my_turn = my_role == Some(snap.turn) && snap.status == GameStatus::Playing;

    let mut view = LocalView {
        status: Some(snap.status),
        my_role,
        my_turn,
        round: snap.current_round,
        scores: snap.scores,
        ..LocalView::default()
    };

    match &snap.phase {
        PhaseSnapshot::WaitingForSecondPlayer => {}
        PhaseSnapshot::AwaitingFirstColor { to_act } => {
            view.picking_first_color = my_role == Some(*to_act);
        }
        PhaseSnapshot::ShowingLastMove { to_act, revealed } => {
            if my_role == Some(*to_act) {
                view.revealed = Some(revealed.clone());
            }
        }
        PhaseSnapshot::AwaitingReplay { to_act, matched, total } => {
            if my_role == Some(*to_act) {
                view.replay_progress = Some((*matched, *total));
            }
        }
        PhaseSnapshot::AwaitingNewColor { to_act } => {
            view.extending = my_role == Some(*to_act);
        }
        PhaseSnapshot::Finished { winner, reason } => {
            view.finished = Some(GameOutcome {
                winner: *winner,
                reason: *reason,
                scores: snap.scores,
            });
        }
    }

    view
}

pub struct ClientSyncLoop {
    api: Arc<dyn GameApi>,
    room_id: RoomId,
    me: PlayerId,
    config: SyncLoopConfig,
}

impl ClientSyncLoop {
    pub fn new(
        api: Arc<dyn GameApi>,
        room_id: RoomId,
        me: PlayerId,
        config: SyncLoopConfig,
    ) -> Self {
        Self {
            api,
            room_id,
            me,
            config,
        }
    }

    /// Spawn the loop; views arrive on the watch channel, and the join
    /// handle resolves with the terminal outcome (or exhausted transport).
    pub fn spawn(self) -> (JoinHandle<Result<GameOutcome, ApiError>>, watch::Receiver<LocalView>) {
        let (tx, rx) = watch::channel(LocalView::default());
        let handle = tokio::spawn(self.run(tx));
        (handle, rx)
    }

    async fn run(self, tx: watch::Sender<LocalView>) -> Result<GameOutcome, ApiError> {
        let mut etag: Option<String> = None;
        let mut last_snapshot: Option<GameSnapshot> = None;
        let mut failures: u32 = 0;

        loop {
            match self.api.fetch_state(self.room_id, etag.as_deref()).await {
                Ok(fetch) => {
                    failures = 0;
                    if let Some(snap) = fetch.snapshot {
                        etag = fetch.etag;
                        let view = derive_view(&snap, self.me);
                        let finished = view.finished.clone();
                        tx.send_replace(view);
                        if let Some(outcome) = finished {
                            // Terminal: stop polling, surface exactly once.
                            debug!(
                                room_id = %self.room_id,
                                winner = ?outcome.winner,
                                "Sync loop observed Finished"
                            );
                            return Ok(outcome);
                        }
                        last_snapshot = Some(snap);
                    }
                    // 304: nothing changed, keep the published view as-is.
                }
                Err(e) if e.is_transport() => {
                    failures += 1;
                    warn!(
                        room_id = %self.room_id,
                        failures,
                        error = %e,
                        "Poll failed, will retry"
                    );
                    if failures >= self.config.failure_budget {
                        return Err(e);
                    }
                    let mut view = last_snapshot
                        .as_ref()
                        .map(|snap| derive_view(snap, self.me))
                        .unwrap_or_default();
                    view.reconnecting = true;
                    tx.send_replace(view);
                }
                // A rejected fetch (room gone, not a participant) cannot be
                // healed by retrying.
                Err(e) => return Err(e),
            }

            let period = match last_snapshot.as_ref().map(|s| s.status) {
                Some(GameStatus::Waiting) | None => self.config.waiting_poll,
                _ => self.config.active_poll,
            };
            tokio::time::sleep(period).await;
        }
    }
}
