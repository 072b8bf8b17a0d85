//! Mock display platform for unit and integration testing.
//!
//! # Why a mock platform?
//!
//! The real X11 backend needs a running display server, grabs the keyboard,
//! and covers every monitor of the test machine.  `MockPlatform` replaces all
//! of that with in-memory bookkeeping so tests can:
//!
//! - declare the monitor layout and which monitor hosts the primary window;
//! - script the events the "user" produces;
//! - inspect every window created, placed, shown, and destroyed.
//!
//! # Scripted events
//!
//! Window ids are handed out at run time, so scripts address windows by role
//! instead: [`ScriptedEvent::ClickBlocker`] targets the blocker placed on a
//! given monitor.  An event whose target window does not exist (or no longer
//! exists) is skipped.  Once the script is exhausted the platform reports
//! [`PlatformEvent::Disconnected`].
//!
//! # Failure injection
//!
//! `fail_primary` makes primary-window creation fail, `fail_blockers_on`
//! makes blocker creation fail on specific monitors, and `fail_monitors`
//! makes monitor enumeration fail.

use std::collections::{HashMap, HashSet, VecDeque};

use powermenu_core::{Key, Monitor, PointerTarget, Rect, WindowRole};

use crate::application::platform::{
    DisplayPlatform, OverlaySurface, PlatformError, PlatformEvent, WindowContent, WindowId,
};

/// One step of a test script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedEvent {
    /// The primary window completes a draw pass.
    RenderPrimary,
    /// A key press on the primary window.
    KeyOnPrimary(Key),
    /// A pointer press on the primary window.
    ClickPrimary(PointerTarget),
    /// A key press on the blocker covering `monitor`.
    KeyOnBlocker { monitor: usize, key: Key },
    /// A pointer press on the blocker covering `monitor`.
    ClickBlocker { monitor: usize },
}

/// A placement request observed by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementRecord {
    Overlay {
        window: WindowId,
        surface: OverlaySurface,
    },
    Fullscreen {
        window: WindowId,
        monitor: Option<usize>,
    },
}

/// An in-memory [`DisplayPlatform`].
#[derive(Debug)]
pub struct MockPlatform {
    /// Monitors returned by `monitors()`.
    pub monitors: Vec<Monitor>,
    /// Answer returned by `hosting_monitor()` for the primary window.
    pub hosting: Option<usize>,
    /// Answer returned by `supports_overlay()`.
    pub overlay_supported: bool,
    /// Remaining scripted events.
    pub script: VecDeque<ScriptedEvent>,
    /// Every window ever created, with its role, in creation order.
    pub created: Vec<(WindowId, WindowRole)>,
    /// Every placement request, in order.
    pub placements: Vec<PlacementRecord>,
    /// Every window shown, with its content.
    pub shown: Vec<(WindowId, WindowContent)>,
    /// Every `destroy_window` call, in order (including repeats).
    pub destroyed: Vec<WindowId>,
    /// When `true`, creating the primary window fails.
    pub fail_primary: bool,
    /// Monitors on which blocker creation fails.
    pub fail_blockers_on: HashSet<usize>,
    /// When `true`, `monitors()` fails.
    pub fail_monitors: bool,
    next_id: u64,
    live: HashMap<WindowId, WindowRole>,
    window_monitor: HashMap<WindowId, Option<usize>>,
}

impl MockPlatform {
    /// A single 1920×1080 monitor hosting the primary window, overlay
    /// supported, empty script.
    pub fn new() -> Self {
        Self::with_monitors(vec![Monitor::new(0, Rect::new(0, 0, 1920, 1080))], Some(0))
    }

    /// `count` side-by-side 1920×1080 monitors with the primary on `hosting`.
    pub fn side_by_side(count: usize, hosting: Option<usize>) -> Self {
        let monitors = (0..count)
            .map(|i| Monitor::new(i, Rect::new(i as i32 * 1920, 0, 1920, 1080)))
            .collect();
        Self::with_monitors(monitors, hosting)
    }

    pub fn with_monitors(monitors: Vec<Monitor>, hosting: Option<usize>) -> Self {
        Self {
            monitors,
            hosting,
            overlay_supported: true,
            script: VecDeque::new(),
            created: Vec::new(),
            placements: Vec::new(),
            shown: Vec::new(),
            destroyed: Vec::new(),
            fail_primary: false,
            fail_blockers_on: HashSet::new(),
            fail_monitors: false,
            next_id: 1,
            live: HashMap::new(),
            window_monitor: HashMap::new(),
        }
    }

    /// Appends events to the script.
    pub fn push_events(&mut self, events: impl IntoIterator<Item = ScriptedEvent>) {
        self.script.extend(events);
    }

    /// Windows created but not yet destroyed.
    pub fn live_windows(&self) -> usize {
        self.live.len()
    }

    /// Number of windows created with `role`.
    pub fn created_count(&self, role: WindowRole) -> usize {
        self.created.iter().filter(|(_, r)| *r == role).count()
    }

    /// Monitors that received a blocker placement, in placement order.
    pub fn blocker_monitors(&self) -> Vec<usize> {
        self.created
            .iter()
            .filter(|(_, role)| *role == WindowRole::Blocker)
            .filter_map(|(id, _)| self.window_monitor.get(id).copied().flatten())
            .collect()
    }

    fn live_window(&self, role: WindowRole, monitor: Option<usize>) -> Option<WindowId> {
        self.live
            .iter()
            .filter(|(_, r)| **r == role)
            .map(|(id, _)| *id)
            .find(|id| {
                monitor.is_none() || self.window_monitor.get(id).copied().flatten() == monitor
            })
    }

    fn check_live(&self, window: WindowId) -> Result<WindowRole, PlatformError> {
        self.live
            .get(&window)
            .copied()
            .ok_or(PlatformError::UnknownWindow(window))
    }

    fn resolve(&self, event: ScriptedEvent) -> Option<PlatformEvent> {
        match event {
            ScriptedEvent::RenderPrimary => self
                .live_window(WindowRole::Primary, None)
                .map(|window| PlatformEvent::RenderConfirmed { window }),
            ScriptedEvent::KeyOnPrimary(key) => self
                .live_window(WindowRole::Primary, None)
                .map(|window| PlatformEvent::KeyPressed { window, key }),
            ScriptedEvent::ClickPrimary(target) => self
                .live_window(WindowRole::Primary, None)
                .map(|window| PlatformEvent::PointerPressed { window, target }),
            ScriptedEvent::KeyOnBlocker { monitor, key } => self
                .live_window(WindowRole::Blocker, Some(monitor))
                .map(|window| PlatformEvent::KeyPressed { window, key }),
            ScriptedEvent::ClickBlocker { monitor } => self
                .live_window(WindowRole::Blocker, Some(monitor))
                .map(|window| PlatformEvent::PointerPressed {
                    window,
                    target: PointerTarget::Background,
                }),
        }
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPlatform for MockPlatform {
    fn supports_overlay(&self) -> bool {
        self.overlay_supported
    }

    fn monitors(&mut self) -> Result<Vec<Monitor>, PlatformError> {
        if self.fail_monitors {
            return Err(PlatformError::Unavailable("mock monitor query failure".into()));
        }
        Ok(self.monitors.clone())
    }

    fn create_window(&mut self, role: WindowRole) -> Result<WindowId, PlatformError> {
        if role == WindowRole::Primary && self.fail_primary {
            return Err(PlatformError::Window("mock primary creation failure".into()));
        }
        let id = WindowId(self.next_id);
        self.next_id += 1;
        self.created.push((id, role));
        self.live.insert(id, role);
        Ok(id)
    }

    fn configure_overlay(
        &mut self,
        window: WindowId,
        surface: &OverlaySurface,
    ) -> Result<(), PlatformError> {
        let role = self.check_live(window)?;
        if !self.overlay_supported {
            return Err(PlatformError::Unsupported("overlay placement"));
        }
        if let (WindowRole::Blocker, Some(monitor)) = (role, surface.monitor) {
            if self.fail_blockers_on.contains(&monitor) {
                return Err(PlatformError::Window(format!(
                    "mock blocker failure on monitor {monitor}"
                )));
            }
        }
        self.window_monitor.insert(window, surface.monitor);
        self.placements.push(PlacementRecord::Overlay {
            window,
            surface: surface.clone(),
        });
        Ok(())
    }

    fn fullscreen(&mut self, window: WindowId, monitor: Option<usize>) -> Result<(), PlatformError> {
        let role = self.check_live(window)?;
        if let (WindowRole::Blocker, Some(index)) = (role, monitor) {
            if self.fail_blockers_on.contains(&index) {
                return Err(PlatformError::Window(format!(
                    "mock blocker failure on monitor {index}"
                )));
            }
        }
        self.window_monitor.insert(window, monitor);
        self.placements
            .push(PlacementRecord::Fullscreen { window, monitor });
        Ok(())
    }

    fn show(&mut self, window: WindowId, content: WindowContent) -> Result<(), PlatformError> {
        self.check_live(window)?;
        self.shown.push((window, content));
        Ok(())
    }

    fn hosting_monitor(&mut self, window: WindowId) -> Result<Option<usize>, PlatformError> {
        match self.check_live(window)? {
            WindowRole::Primary => Ok(self.hosting),
            WindowRole::Blocker => Ok(self.window_monitor.get(&window).copied().flatten()),
        }
    }

    fn destroy_window(&mut self, window: WindowId) {
        self.destroyed.push(window);
        self.live.remove(&window);
    }

    fn next_event(&mut self) -> Result<PlatformEvent, PlatformError> {
        while let Some(scripted) = self.script.pop_front() {
            if let Some(event) = self.resolve(scripted) {
                return Ok(event);
            }
        }
        Ok(PlatformEvent::Disconnected)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_platform_tracks_live_windows() {
        let mut platform = MockPlatform::new();
        let a = platform.create_window(WindowRole::Primary).expect("a");
        let b = platform.create_window(WindowRole::Blocker).expect("b");
        assert_ne!(a, b);
        assert_eq!(platform.live_windows(), 2);

        platform.destroy_window(a);
        assert_eq!(platform.live_windows(), 1);
        assert_eq!(platform.destroyed, vec![a]);
    }

    #[test]
    fn test_mock_platform_resolves_blocker_events_by_monitor() {
        // Arrange
        let mut platform = MockPlatform::side_by_side(2, Some(0));
        let blocker = platform.create_window(WindowRole::Blocker).expect("blocker");
        platform.fullscreen(blocker, Some(1)).expect("place");
        platform.push_events([
            ScriptedEvent::ClickBlocker { monitor: 0 },
            ScriptedEvent::ClickBlocker { monitor: 1 },
        ]);

        // Act
        let event = platform.next_event().expect("event");

        // Assert: the click on monitor 0 had no window and was skipped
        assert_eq!(
            event,
            PlatformEvent::PointerPressed {
                window: blocker,
                target: PointerTarget::Background,
            }
        );
    }

    #[test]
    fn test_mock_platform_disconnects_when_script_is_exhausted() {
        let mut platform = MockPlatform::new();
        platform.push_events([ScriptedEvent::RenderPrimary]);
        assert_eq!(platform.next_event().expect("event"), PlatformEvent::Disconnected);
    }

    #[test]
    fn test_mock_platform_injects_failures() {
        let mut platform = MockPlatform::side_by_side(2, Some(0));
        platform.fail_primary = true;
        platform.fail_monitors = true;
        platform.fail_blockers_on.insert(1);

        assert!(platform.create_window(WindowRole::Primary).is_err());
        assert!(platform.monitors().is_err());
        let blocker = platform.create_window(WindowRole::Blocker).expect("blocker");
        assert!(platform.fullscreen(blocker, Some(1)).is_err());
    }
}
