//! The display-platform seam used by the session controller.
//!
//! The controller never talks to a display server directly.  Everything it
//! needs (window creation, placement, monitor queries, and the event stream)
//! goes through [`DisplayPlatform`], which the infrastructure layer
//! implements for X11 and for tests.
//!
//! # Event model (for beginners)
//!
//! A platform turns its native events into [`PlatformEvent`]s:
//!
//! - `RenderConfirmed`: a window finished a draw pass.  Only confirmations
//!   for the primary window matter to the controller.
//! - `KeyPressed` / `PointerPressed`: user input, tagged with the window it
//!   was delivered to.  Pointer presses are already hit-tested against the
//!   button grid, so the controller only sees a [`PointerTarget`].
//! - `Disconnected`: the platform can deliver no more events.  The controller
//!   treats this as a cancel.

use powermenu_core::{GridSpec, Key, Monitor, PointerTarget, WindowRole};
use thiserror::Error;

/// Identifier of a window created by a [`DisplayPlatform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub u64);

/// Error type for display platform operations.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// No display server could be reached.
    #[error("display unavailable: {0}")]
    Unavailable(String),

    /// A window could not be created, placed, or shown.
    #[error("window operation failed: {0}")]
    Window(String),

    /// The operation is not supported by this platform build.
    #[error("unsupported by this platform: {0}")]
    Unsupported(&'static str),

    /// The window id does not belong to this platform.
    #[error("unknown window {0:?}")]
    UnknownWindow(WindowId),
}

/// One event delivered by the platform's event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformEvent {
    RenderConfirmed { window: WindowId },
    KeyPressed { window: WindowId, key: Key },
    PointerPressed { window: WindowId, target: PointerTarget },
    Disconnected,
}

/// Stacking layer for an overlay surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayLayer {
    /// Above every normal and panel window.
    Overlay,
}

/// Surface parameters for overlay placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlaySurface {
    pub layer: OverlayLayer,
    /// Name other tools may use to identify the surface.
    pub namespace: &'static str,
    /// `-1` means the surface ignores space reserved by panels.
    pub exclusive_zone: i32,
    /// Stretch to all four edges of the output.
    pub anchor_all_edges: bool,
    /// Target monitor; `None` lets the platform choose.
    pub monitor: Option<usize>,
    /// Whether the surface receives keyboard focus.
    pub keyboard_interactive: bool,
}

/// One button as the platform should draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonView {
    /// Style identifier (the button's label).
    pub label: String,
    /// Text drawn on the button, if any.
    pub caption: Option<String>,
    pub xalign: f32,
    pub yalign: f32,
    pub circular: bool,
}

/// What a window displays.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowContent {
    /// The interactive button grid.
    Menu { buttons: Vec<ButtonView>, grid: GridSpec },
    /// An empty surface (blocker windows).
    Blank,
}

/// Display-server operations needed by the session controller.
///
/// Implementations own every native resource behind the [`WindowId`]s they
/// hand out.  A window passed to [`destroy_window`](Self::destroy_window)
/// must not be used again.
pub trait DisplayPlatform {
    /// Whether overlay placement is available in this build and session.
    fn supports_overlay(&self) -> bool;

    /// Connected monitors, in platform order.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the monitor list cannot be queried.
    fn monitors(&mut self) -> Result<Vec<Monitor>, PlatformError>;

    /// Creates an unmapped window for `role`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Window`] if the display server refuses.
    fn create_window(&mut self, role: WindowRole) -> Result<WindowId, PlatformError>;

    /// Configures `window` as an overlay surface.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Unsupported`] when overlays are unavailable.
    fn configure_overlay(
        &mut self,
        window: WindowId,
        surface: &OverlaySurface,
    ) -> Result<(), PlatformError>;

    /// Requests fullscreen for `window`, on `monitor` when given.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the request cannot be issued.
    fn fullscreen(&mut self, window: WindowId, monitor: Option<usize>) -> Result<(), PlatformError>;

    /// Maps `window` with `content`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the window cannot be shown.
    fn show(&mut self, window: WindowId, content: WindowContent) -> Result<(), PlatformError>;

    /// Index of the monitor currently hosting `window`, if known.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the window geometry cannot be queried.
    fn hosting_monitor(&mut self, window: WindowId) -> Result<Option<usize>, PlatformError>;

    /// Destroys `window`.  Unknown ids are ignored.
    fn destroy_window(&mut self, window: WindowId);

    /// Blocks until the next event.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event stream fails.
    fn next_event(&mut self) -> Result<PlatformEvent, PlatformError>;
}
