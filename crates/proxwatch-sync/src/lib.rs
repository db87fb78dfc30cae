//! Data synchronization layer for the proxwatch dashboard.
//!
//! Keeps a client-side view eventually consistent with a remote cluster
//! whose state changes continuously, over an unreliable network. Two
//! pieces:
//!
//! - [`FetchController`]: tracks `{data, loading, error}` for one logical
//!   resource, supports manual refetch, and arbitrates overlapping
//!   attempts so a slow stale response can never clobber a newer one.
//! - [`PollController`]: drives a fetch controller on a fixed wall-clock
//!   period and guarantees the timer dies with the controller.
//!
//! Presentation and transport live elsewhere; this layer only moves typed
//! values and typed errors between them.

pub mod fetch;
pub mod poll;

pub use fetch::{FetchController, FetchState};
pub use poll::PollController;
