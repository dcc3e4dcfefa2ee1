//! Client-side components: the polling sync loop and its collaborators.
//!
//! Nothing in this module holds authoritative state. Local flags are pure
//! functions of the last fetched snapshot, and proposals go through the
//! same mutation entry point every other client uses.

pub mod api;
pub mod sentinel;
pub mod sync_loop;

pub use api::{ApiError, GameApi, HttpGameApi, InProcessGameApi, StateFetch};
pub use sentinel::{DisconnectSentinel, LeaveGuard};
pub use sync_loop::{derive_view, ClientSyncLoop, GameOutcome, LocalView, SyncLoopConfig};
