//! Session run state for one invocation of the menu.
//!
//! # Lifecycle (for beginners)
//!
//! ```text
//! Unstarted ──► AwaitingRenderConfirmation ──► Enumerated ──► Active
//!                        │                         │            │
//!                        └─────────────────────────┴────────────┴──► Closing ──► Terminated
//! ```
//!
//! - `Unstarted`: nothing has been shown yet.
//! - `AwaitingRenderConfirmation`: the primary window exists; the display
//!   server has not yet drawn it twice.
//! - `Enumerated`: the second render confirmation arrived; the hosting
//!   monitor can now be trusted and monitors may be enumerated.
//! - `Active`: blocker windows (if any) are up.
//! - `Closing`: the user chose an action or cancelled; windows are being
//!   destroyed.
//! - `Terminated`: every window is gone and the event loop has exited.
//!
//! # Why two render confirmations?
//!
//! Immediately after a window is mapped, display servers report a monitor
//! association that is frequently wrong.  It only settles once the window has
//! completed two draw passes, so enumeration waits for the second
//! confirmation.

use thiserror::Error;

/// Render confirmations required before the hosting monitor is trusted.
pub const REQUIRED_RENDER_CONFIRMATIONS: u32 = 2;

/// Lifecycle state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unstarted,
    AwaitingRenderConfirmation,
    Enumerated,
    Active,
    Closing,
    Terminated,
}

/// Errors raised on an illegal state transition.
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("illegal session transition from {from:?} to {to:?}")]
    IllegalTransition { from: SessionState, to: SessionState },
}

/// Outcome of feeding one render confirmation into the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderProgress {
    /// More confirmations are needed.
    Waiting { remaining: u32 },
    /// This confirmation moved the session to `Enumerated`.
    ReadyToEnumerate,
    /// The session is past the point where confirmations matter.
    Ignored,
}

/// Process-wide run state, owned by the display session controller.
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
    render_confirmations: u32,
    pending_command: Option<String>,
    primary_monitor: Option<usize>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn render_confirmations(&self) -> u32 {
        self.render_confirmations
    }

    /// The command chosen by the user, if any.
    pub fn pending_command(&self) -> Option<&str> {
        self.pending_command.as_deref()
    }

    /// Index of the monitor hosting the primary window, once enumerated.
    pub fn primary_monitor(&self) -> Option<usize> {
        self.primary_monitor
    }

    /// Returns `true` while user input may still close the session.
    pub fn is_open(&self) -> bool {
        matches!(
            self.state,
            SessionState::AwaitingRenderConfirmation
                | SessionState::Enumerated
                | SessionState::Active
        )
    }

    /// `Unstarted → AwaitingRenderConfirmation`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::IllegalTransition`] from any other state.
    pub fn primary_window_created(&mut self) -> Result<(), SessionError> {
        self.transition(
            SessionState::Unstarted,
            SessionState::AwaitingRenderConfirmation,
        )
    }

    /// Counts one render confirmation of the primary window.
    ///
    /// Only the [`REQUIRED_RENDER_CONFIRMATIONS`]th confirmation received in
    /// `AwaitingRenderConfirmation` advances the session; confirmations in
    /// any other state are ignored and not counted.
    pub fn confirm_render(&mut self) -> RenderProgress {
        if self.state != SessionState::AwaitingRenderConfirmation {
            return RenderProgress::Ignored;
        }
        self.render_confirmations += 1;
        if self.render_confirmations >= REQUIRED_RENDER_CONFIRMATIONS {
            self.state = SessionState::Enumerated;
            RenderProgress::ReadyToEnumerate
        } else {
            RenderProgress::Waiting {
                remaining: REQUIRED_RENDER_CONFIRMATIONS - self.render_confirmations,
            }
        }
    }

    /// `Enumerated → Active`, recording the detected primary monitor.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::IllegalTransition`] from any other state.
    pub fn activate(&mut self, primary_monitor: Option<usize>) -> Result<(), SessionError> {
        self.transition(SessionState::Enumerated, SessionState::Active)?;
        self.primary_monitor = primary_monitor;
        Ok(())
    }

    /// Moves an open session to `Closing`, recording the chosen command
    /// (`None` for a cancel).
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::IllegalTransition`] if the session is not open,
    /// which guarantees at most one command is ever recorded.
    pub fn begin_closing(&mut self, command: Option<String>) -> Result<(), SessionError> {
        if !self.is_open() {
            return Err(SessionError::IllegalTransition {
                from: self.state,
                to: SessionState::Closing,
            });
        }
        self.state = SessionState::Closing;
        self.pending_command = command;
        Ok(())
    }

    /// `Closing → Terminated`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::IllegalTransition`] from any other state.
    pub fn terminate(&mut self) -> Result<(), SessionError> {
        self.transition(SessionState::Closing, SessionState::Terminated)
    }

    /// Consumes the session, yielding the chosen command.
    pub fn into_pending_command(self) -> Option<String> {
        self.pending_command
    }

    fn transition(&mut self, from: SessionState, to: SessionState) -> Result<(), SessionError> {
        if self.state != from {
            return Err(SessionError::IllegalTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
