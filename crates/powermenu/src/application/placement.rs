//! Fullscreen placement strategies.
//!
//! A window can be made to cover a monitor in two ways:
//!
//! - **Overlay**: the window becomes an overlay surface that sits above every
//!   other window, anchored to all four edges, ignoring panel reservations.
//!   Only the primary window takes keyboard focus.
//! - **Windowed**: the window asks the window manager for ordinary
//!   fullscreen, on a specific monitor when one is given.
//!
//! [`select_placement`] picks the strategy once per session.  When overlay
//! placement is requested but unavailable it falls back to windowed
//! placement with a warning.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::platform::{DisplayPlatform, OverlayLayer, OverlaySurface, PlatformError, WindowId};

/// Namespace advertised by overlay surfaces.
pub const OVERLAY_NAMESPACE: &str = "logout_dialog";

/// The placement protocol requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlacementProtocol {
    #[default]
    #[serde(alias = "layer-shell")]
    Overlay,
    #[serde(alias = "xdg")]
    Windowed,
}

impl fmt::Display for PlacementProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overlay => f.write_str("overlay"),
            Self::Windowed => f.write_str("windowed"),
        }
    }
}

impl FromStr for PlacementProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overlay" | "layer-shell" => Ok(Self::Overlay),
            "windowed" | "xdg" => Ok(Self::Windowed),
            other => Err(format!(
                "unknown protocol {other:?} (expected overlay, layer-shell, windowed or xdg)"
            )),
        }
    }
}

/// A way of making one window cover one monitor.
pub trait FullscreenPlacement {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Places `window` on `monitor` (platform's choice when `None`).
    ///
    /// `keyboard` is `true` only for the primary window.
    ///
    /// # Errors
    ///
    /// Propagates the platform's [`PlatformError`].
    fn place(
        &self,
        platform: &mut dyn DisplayPlatform,
        window: WindowId,
        monitor: Option<usize>,
        keyboard: bool,
    ) -> Result<(), PlatformError>;
}

/// Overlay-layer placement.
#[derive(Debug, Default, Clone, Copy)]
pub struct OverlayPlacement;

impl OverlayPlacement {
    /// Surface parameters for a window on `monitor`.
    pub fn surface(monitor: Option<usize>, keyboard: bool) -> OverlaySurface {
        OverlaySurface {
            layer: OverlayLayer::Overlay,
            namespace: OVERLAY_NAMESPACE,
            exclusive_zone: -1,
            anchor_all_edges: true,
            monitor,
            keyboard_interactive: keyboard,
        }
    }
}

impl FullscreenPlacement for OverlayPlacement {
    fn name(&self) -> &'static str {
        "overlay"
    }

    fn place(
        &self,
        platform: &mut dyn DisplayPlatform,
        window: WindowId,
        monitor: Option<usize>,
        keyboard: bool,
    ) -> Result<(), PlatformError> {
        platform.configure_overlay(window, &Self::surface(monitor, keyboard))
    }
}

/// Window-manager fullscreen placement.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowedPlacement;

impl FullscreenPlacement for WindowedPlacement {
    fn name(&self) -> &'static str {
        "windowed"
    }

    fn place(
        &self,
        platform: &mut dyn DisplayPlatform,
        window: WindowId,
        monitor: Option<usize>,
        _keyboard: bool,
    ) -> Result<(), PlatformError> {
        platform.fullscreen(window, monitor)
    }
}

/// Chooses the placement strategy for a session.
pub fn select_placement(
    requested: PlacementProtocol,
    overlay_supported: bool,
) -> Box<dyn FullscreenPlacement> {
    match requested {
        PlacementProtocol::Overlay if overlay_supported => Box::new(OverlayPlacement),
        PlacementProtocol::Overlay => {
            warn!("overlay placement is not available; falling back to windowed fullscreen");
            Box::new(WindowedPlacement)
        }
        PlacementProtocol::Windowed => Box::new(WindowedPlacement),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
