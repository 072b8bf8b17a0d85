//! Application layer: the use cases of one menu invocation.
//!
//! # What use cases does powermenu have?
//!
//! - **`platform`** – the [`DisplayPlatform`](platform::DisplayPlatform)
//!   trait every display backend implements, plus the window and event types
//!   that cross it.
//!
//! - **`placement`** – the two fullscreen placement strategies (overlay and
//!   windowed) and the selection rule with its fallback.
//!
//! - **`display_session`** – the controller that creates the primary window,
//!   waits for a trustworthy monitor association, covers the other monitors
//!   with blockers, routes input, and tears everything down.
//!
//! - **`handoff`** – runs the chosen command once the session has
//!   terminated.
//!
//! **Dependency rule**: nothing here imports `infrastructure` outside of
//! tests.

pub mod display_session;
pub mod handoff;
pub mod placement;
pub mod platform;
