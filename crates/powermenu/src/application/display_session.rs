//! DisplaySessionController: drives one menu session from the first window
//! to the last teardown.
//!
//! # Flow (for beginners)
//!
//! 1. Create the primary window, place it, and show the button grid.
//! 2. Feed platform events into the [`Session`].  The second render
//!    confirmation of the primary window means its monitor association can
//!    be trusted, so the controller asks which monitor hosts it and covers
//!    every *other* monitor with a blocker window (unless spanning is off).
//! 3. Route key and pointer events through the [`InputDispatcher`].  The
//!    first cancel or activation moves the session to `Closing`.
//! 4. Destroy every window exactly once and return a
//!    [`TerminatedSession`] carrying the chosen command, if any.
//!
//! Only [`DisplaySessionController::run`] can produce a
//! [`TerminatedSession`], and it does so only after teardown.  That is what
//! lets the handoff run the command knowing no menu window is left.

use powermenu_core::{
    caption, ButtonRegistry, GridSpec, InputDispatcher, InputEvent, RenderProgress, Session,
    SessionError, WindowRole,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::placement::FullscreenPlacement;
use super::platform::{
    ButtonView, DisplayPlatform, PlatformError, PlatformEvent, WindowContent, WindowId,
};

/// Error type for a display session.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The primary window could not be created or shown, or the event
    /// stream failed.
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// The session rejected a transition.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Session options that do not come from the layout file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionOptions {
    /// Do not create blocker windows.
    pub no_span: bool,
    /// Monitor requested for the primary window.
    pub primary_monitor: Option<usize>,
    /// Append `[k]` to captions of buttons with a keybind.
    pub show_binds: bool,
    pub grid: GridSpec,
}

/// A session whose windows are all gone.
#[derive(Debug, PartialEq, Eq)]
pub struct TerminatedSession {
    command: Option<String>,
}

impl TerminatedSession {
    /// The command chosen by the user; `None` after a cancel.
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    pub fn into_command(self) -> Option<String> {
        self.command
    }
}

/// Owns every window of one session.
pub struct DisplaySessionController<'a> {
    platform: &'a mut dyn DisplayPlatform,
    placement: Box<dyn FullscreenPlacement>,
    registry: &'a ButtonRegistry,
    options: SessionOptions,
    session: Session,
    primary: Option<WindowId>,
    /// (monitor index, window) per blocker.
    blockers: Vec<(usize, WindowId)>,
}

impl<'a> DisplaySessionController<'a> {
    pub fn new(
        platform: &'a mut dyn DisplayPlatform,
        placement: Box<dyn FullscreenPlacement>,
        registry: &'a ButtonRegistry,
        options: SessionOptions,
    ) -> Self {
        Self {
            platform,
            placement,
            registry,
            options,
            session: Session::new(),
            primary: None,
            blockers: Vec::new(),
        }
    }

    /// Runs the session to completion.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError`] if the primary window cannot be brought
    /// up or the platform's event stream fails.  Windows created before the
    /// failure are destroyed before returning.
    pub fn run(mut self) -> Result<TerminatedSession, ControllerError> {
        let outcome = self.open_primary().and_then(|()| self.event_loop());
        self.teardown();
        outcome?;

        self.session.terminate()?;
        info!(
            command = self.session.pending_command().unwrap_or("<none>"),
            "menu session terminated"
        );
        Ok(TerminatedSession {
            command: self.session.into_pending_command(),
        })
    }

    fn open_primary(&mut self) -> Result<(), ControllerError> {
        let window = self.platform.create_window(WindowRole::Primary)?;
        self.primary = Some(window);
        self.session.primary_window_created()?;

        self.placement
            .place(&mut *self.platform, window, self.options.primary_monitor, true)?;
        self.platform.show(window, self.menu_content())?;
        debug!(
            placement = self.placement.name(),
            buttons = self.registry.len(),
            "primary window shown"
        );
        Ok(())
    }

    fn menu_content(&self) -> WindowContent {
        let buttons = self
            .registry
            .iter()
            .map(|button| ButtonView {
                label: button.label.clone(),
                caption: caption(button, self.options.show_binds),
                xalign: button.xalign,
                yalign: button.yalign,
                circular: button.circular,
            })
            .collect();
        WindowContent::Menu {
            buttons,
            grid: self.options.grid,
        }
    }

    fn event_loop(&mut self) -> Result<(), ControllerError> {
        let mut dispatcher = InputDispatcher::new(self.registry);

        while self.session.is_open() {
            let event = self.platform.next_event()?;
            match event {
                PlatformEvent::RenderConfirmed { window } => {
                    if Some(window) != self.primary {
                        continue;
                    }
                    match self.session.confirm_render() {
                        RenderProgress::ReadyToEnumerate => self.enumerate()?,
                        RenderProgress::Waiting { remaining } => {
                            debug!(remaining, "waiting for render confirmation");
                        }
                        RenderProgress::Ignored => {}
                    }
                }
                PlatformEvent::KeyPressed { window, key } => {
                    if let Some(role) = self.role_of(window) {
                        dispatcher.handle(&InputEvent::KeyPressed { role, key }, &mut self.session)?;
                    }
                }
                PlatformEvent::PointerPressed { window, target } => {
                    if let Some(role) = self.role_of(window) {
                        dispatcher.handle(
                            &InputEvent::PointerPressed { role, target },
                            &mut self.session,
                        )?;
                    }
                }
                PlatformEvent::Disconnected => {
                    warn!("display connection closed; cancelling menu");
                    self.session.begin_closing(None)?;
                }
            }
        }
        Ok(())
    }

    fn role_of(&self, window: WindowId) -> Option<WindowRole> {
        if Some(window) == self.primary {
            Some(WindowRole::Primary)
        } else if self.blockers.iter().any(|(_, w)| *w == window) {
            Some(WindowRole::Blocker)
        } else {
            None
        }
    }

    /// Records the hosting monitor and covers the others with blockers.
    fn enumerate(&mut self) -> Result<(), ControllerError> {
        let Some(primary) = self.primary else {
            return Ok(());
        };

        let monitors = self.platform.monitors().unwrap_or_else(|e| {
            warn!("monitor enumeration failed: {e}");
            Vec::new()
        });
        let detected = self.platform.hosting_monitor(primary).unwrap_or_else(|e| {
            warn!("could not query the primary window's monitor: {e}");
            None
        });
        let hosting = detected.or(self.options.primary_monitor);
        self.session.activate(hosting)?;
        info!(monitors = monitors.len(), primary_monitor = ?hosting, "monitors enumerated");

        if self.options.no_span {
            debug!("spanning disabled; no blocker windows");
            return Ok(());
        }
        let Some(hosting) = hosting else {
            warn!("primary monitor unknown; not covering other monitors");
            return Ok(());
        };

        for monitor in monitors.iter().filter(|m| m.index != hosting) {
            match self.open_blocker(monitor.index) {
                Ok(window) => self.blockers.push((monitor.index, window)),
                Err(e) => warn!(monitor = monitor.index, "skipping blocker window: {e}"),
            }
        }
        debug!(blockers = self.blockers.len(), "blocker windows shown");
        Ok(())
    }

    fn open_blocker(&mut self, monitor: usize) -> Result<WindowId, PlatformError> {
        let window = self.platform.create_window(WindowRole::Blocker)?;
        let shown = self
            .placement
            .place(&mut *self.platform, window, Some(monitor), false)
            .and_then(|()| self.platform.show(window, WindowContent::Blank));
        if let Err(e) = shown {
            self.platform.destroy_window(window);
            return Err(e);
        }
        Ok(window)
    }

    /// Destroys every window this controller still owns.
    fn teardown(&mut self) {
        for (monitor, window) in self.blockers.drain(..) {
            debug!(monitor, "destroying blocker window");
            self.platform.destroy_window(window);
        }
        if let Some(window) = self.primary.take() {
            debug!("destroying primary window");
            self.platform.destroy_window(window);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
