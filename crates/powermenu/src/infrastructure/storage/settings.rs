//! TOML settings file for powermenu.
//!
//! Settings are layered, later layers winning:
//!
//! 1. built-in defaults,
//! 2. `settings.toml` in the user config directory (optional),
//! 3. command-line flags (see [`crate::infrastructure::cli`]).
//!
//! Example file:
//!
//! ```toml
//! [menu]
//! show_binds = true
//! log_level = "info"
//!
//! [grid]
//! buttons_per_row = 6
//! margin_top = 300
//! margin_bottom = 300
//!
//! [display]
//! protocol = "windowed"
//! no_span = false
//! ```
//!
//! Every field has a serde default, so a file only needs to name what it
//! changes, and an absent file means "all defaults".

use std::path::{Path, PathBuf};

use powermenu_core::{GridSpec, Margins, Spacing, DEFAULT_BUTTON_CAPACITY};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::user_config_dir;
use crate::application::display_session::SessionOptions;
use crate::application::placement::PlacementProtocol;

/// File name of the settings file inside the user config directory.
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Error type for settings operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid setting {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

// ── Settings schema types ─────────────────────────────────────────────────────

/// Top-level settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub menu: MenuSettings,
    #[serde(default)]
    pub grid: GridSettings,
    #[serde(default)]
    pub display: DisplaySettings,
}

/// What the menu shows and how it logs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuSettings {
    /// Layout file; searched for in the standard locations when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<PathBuf>,
    /// Append the keybind to each caption (`Lock[l]`).
    #[serde(default)]
    pub show_binds: bool,
    /// Maximum number of buttons the layout may define.
    #[serde(default = "default_max_buttons")]
    pub max_buttons: usize,
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Grid geometry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GridSettings {
    #[serde(default = "default_buttons_per_row")]
    pub buttons_per_row: u32,
    #[serde(default)]
    pub column_spacing: u32,
    #[serde(default)]
    pub row_spacing: u32,
    #[serde(default = "default_margin")]
    pub margin_top: u32,
    #[serde(default = "default_margin")]
    pub margin_bottom: u32,
    #[serde(default = "default_margin")]
    pub margin_left: u32,
    #[serde(default = "default_margin")]
    pub margin_right: u32,
}

/// Window placement.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DisplaySettings {
    #[serde(default)]
    pub protocol: PlacementProtocol,
    /// Do not cover the other monitors.
    #[serde(default)]
    pub no_span: bool,
    /// Monitor to open the menu on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_monitor: Option<usize>,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_max_buttons() -> usize {
    DEFAULT_BUTTON_CAPACITY
}
fn default_log_level() -> String {
    "warn".to_string()
}
fn default_buttons_per_row() -> u32 {
    3
}
fn default_margin() -> u32 {
    230
}

impl Default for MenuSettings {
    fn default() -> Self {
        Self {
            layout: None,
            show_binds: false,
            max_buttons: default_max_buttons(),
            log_level: default_log_level(),
        }
    }
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            buttons_per_row: default_buttons_per_row(),
            column_spacing: 0,
            row_spacing: 0,
            margin_top: default_margin(),
            margin_bottom: default_margin(),
            margin_left: default_margin(),
            margin_right: default_margin(),
        }
    }
}

impl GridSettings {
    pub fn grid_spec(&self) -> GridSpec {
        GridSpec {
            margins: Margins {
                top: self.margin_top,
                bottom: self.margin_bottom,
                left: self.margin_left,
                right: self.margin_right,
            },
            spacing: Spacing {
                row: self.row_spacing,
                column: self.column_spacing,
            },
            buttons_per_row: self.buttons_per_row,
        }
    }
}

impl Settings {
    /// Rejects values the menu cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] naming the offending field.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.grid.buttons_per_row == 0 {
            return Err(SettingsError::Invalid {
                field: "buttons_per_row",
                reason: "must be at least 1",
            });
        }
        if self.menu.max_buttons == 0 {
            return Err(SettingsError::Invalid {
                field: "max_buttons",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// The options handed to the display session controller.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            no_span: self.display.no_span,
            primary_monitor: self.display.primary_monitor,
            show_binds: self.menu.show_binds,
            grid: self.grid.grid_spec(),
        }
    }
}

// ── Settings repository ───────────────────────────────────────────────────────

/// Default location of the settings file, if a user config directory exists.
pub fn settings_file_path() -> Option<PathBuf> {
    user_config_dir().map(|dir| dir.join(SETTINGS_FILE_NAME))
}

/// Loads settings from `path`, or from the default location when `None`.
///
/// A missing file at the default location yields [`Settings::default`]; a
/// missing file that was asked for explicitly is an error.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] for file-system errors and
/// [`SettingsError::Parse`] if the TOML is malformed.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, SettingsError> {
    match path {
        Some(path) => read_settings(path),
        None => match settings_file_path() {
            Some(path) => match read_settings(&path) {
                Err(SettingsError::Io { source, .. })
                    if source.kind() == std::io::ErrorKind::NotFound =>
                {
                    Ok(Settings::default())
                }
                other => other,
            },
            None => Ok(Settings::default()),
        },
    }
}

fn read_settings(path: &Path) -> Result<Settings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
