//! Command-line flags.
//!
//! Every flag is optional: a flag that is not given leaves the value from
//! the settings file (or the built-in default) alone.  `--margin` sets all
//! four sides first, then any per-side flag overrides its own side.

use std::path::PathBuf;

use clap::Parser;

use super::storage::settings::Settings;
use crate::application::placement::PlacementProtocol;

/// Full-screen action menu for X11 desktops.
#[derive(Debug, Parser)]
#[command(
    name = "powermenu",
    about = "Full-screen menu of actions (lock, log out, reboot, ...) across every monitor",
    version
)]
pub struct Cli {
    /// Layout file to load instead of searching the standard locations.
    #[arg(short, long, value_name = "PATH")]
    pub layout: Option<PathBuf>,

    /// Settings file to load instead of the default location.
    #[arg(long, value_name = "PATH", env = "POWERMENU_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Buttons per row.
    #[arg(short = 'b', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub buttons_per_row: Option<u32>,

    /// Space between columns, in pixels.
    #[arg(short = 'c', long)]
    pub column_spacing: Option<u32>,

    /// Space between rows, in pixels.
    #[arg(short = 'r', long)]
    pub row_spacing: Option<u32>,

    /// Margin on all four sides, in pixels.
    #[arg(short = 'm', long)]
    pub margin: Option<u32>,

    /// Top margin, in pixels.
    #[arg(short = 'T', long)]
    pub margin_top: Option<u32>,

    /// Bottom margin, in pixels.
    #[arg(short = 'B', long)]
    pub margin_bottom: Option<u32>,

    /// Left margin, in pixels.
    #[arg(short = 'L', long)]
    pub margin_left: Option<u32>,

    /// Right margin, in pixels.
    #[arg(short = 'R', long)]
    pub margin_right: Option<u32>,

    /// Placement protocol: overlay (alias layer-shell) or windowed (alias xdg).
    #[arg(short = 'p', long, value_name = "PROTOCOL")]
    pub protocol: Option<PlacementProtocol>,

    /// Show each button's keybind next to its caption.
    #[arg(short = 's', long)]
    pub show_binds: bool,

    /// Do not cover the other monitors.
    #[arg(short = 'n', long)]
    pub no_span: bool,

    /// Monitor to open the menu on.
    #[arg(short = 'P', long, value_name = "INDEX")]
    pub primary_monitor: Option<usize>,

    /// Log filter used when RUST_LOG is unset (e.g. "info", "powermenu=debug").
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,
}

impl Cli {
    /// Overlays the flags that were given onto `settings`.
    pub fn apply_to(&self, settings: &mut Settings) {
        let grid = &mut settings.grid;
        if let Some(n) = self.buttons_per_row {
            grid.buttons_per_row = n;
        }
        if let Some(px) = self.column_spacing {
            grid.column_spacing = px;
        }
        if let Some(px) = self.row_spacing {
            grid.row_spacing = px;
        }
        if let Some(px) = self.margin {
            grid.margin_top = px;
            grid.margin_bottom = px;
            grid.margin_left = px;
            grid.margin_right = px;
        }
        if let Some(px) = self.margin_top {
            grid.margin_top = px;
        }
        if let Some(px) = self.margin_bottom {
            grid.margin_bottom = px;
        }
        if let Some(px) = self.margin_left {
            grid.margin_left = px;
        }
        if let Some(px) = self.margin_right {
            grid.margin_right = px;
        }

        if let Some(protocol) = self.protocol {
            settings.display.protocol = protocol;
        }
        if self.no_span {
            settings.display.no_span = true;
        }
        if self.primary_monitor.is_some() {
            settings.display.primary_monitor = self.primary_monitor;
        }

        if let Some(layout) = &self.layout {
            settings.menu.layout = Some(layout.clone());
        }
        if self.show_binds {
            settings.menu.show_binds = true;
        }
        if let Some(level) = &self.log_level {
            settings.menu.log_level = level.clone();
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
