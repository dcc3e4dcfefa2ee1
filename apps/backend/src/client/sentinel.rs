//! Disconnect detection: converting abandonment into a terminal state.
//!
//! The sentinel wraps `notify_leave` behind a one-shot flag so that an
//! explicit leave button, a page-unload hook, and the guard's drop can all
//! race without producing redundant terminal writes. The store's terminate
//! path is idempotent anyway; the flag just keeps the client from spamming
//! it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::client::api::GameApi;
use crate::domain::state::{PlayerId, RoomId};

pub struct DisconnectSentinel {
    api: Arc<dyn GameApi>,
    room_id: RoomId,
    player: PlayerId,
    fired: AtomicBool,
}

impl DisconnectSentinel {
    pub fn new(api: Arc<dyn GameApi>, room_id: RoomId, player: PlayerId) -> Arc<Self> {
        Arc::new(Self {
            api,
            room_id,
            player,
            fired: AtomicBool::new(false),
        })
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Fire the leave notification at most once. Returns whether this call
    /// was the one that fired.
    pub async fn fire(&self) -> bool {
        if self.fired.swap(true, Ordering::SeqCst) {
            debug!(room_id = %self.room_id, player = self.player, "Leave already notified");
            return false;
        }
        if let Err(e) = self.api.notify_leave(self.room_id, self.player).await {
            // The server side may never learn about this departure (the
            // original relied on an unload hook with the same gap); the
            // opponent's poll loop still sees the room once the lobby
            // expires it.
            warn!(
                room_id = %self.room_id,
                player = self.player,
                error = %e,
                "Leave notification failed"
            );
        }
        true
    }

    /// Fire from a synchronous context (drop hooks). No-op outside a tokio
    /// runtime.
    pub fn fire_detached(self: &Arc<Self>) {
        let sentinel = Arc::clone(self);
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                sentinel.fire().await;
            });
        }
    }
}

/// RAII guard: leaving scope (page teardown, task abort, panic unwind)
/// triggers the sentinel if nothing else has.
pub struct LeaveGuard {
    sentinel: Arc<DisconnectSentinel>,
}

impl LeaveGuard {
    pub fn new(sentinel: Arc<DisconnectSentinel>) -> Self {
        Self { sentinel }
    }

    /// The session ended through normal game completion; nobody "left".
    pub fn disarm(self) {
        self.sentinel.fired.store(true, Ordering::SeqCst);
    }
}

impl Drop for LeaveGuard {
    fn drop(&mut self) {
        self.sentinel.fire_detached();
    }
}
