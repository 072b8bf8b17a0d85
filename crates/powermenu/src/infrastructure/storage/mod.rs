//! File-system storage: the settings file and the layout file.
//!
//! Both live in the same per-user directory:
//!
//! - `$XDG_CONFIG_HOME/powermenu/` when `XDG_CONFIG_HOME` is set,
//! - `~/.config/powermenu/` otherwise.

pub mod layout_file;
pub mod settings;

use std::path::{Path, PathBuf};

/// Name of the per-application directory under every config base.
pub const APP_DIR: &str = "powermenu";

/// Resolves the per-user config directory, if `XDG_CONFIG_HOME` or `HOME`
/// is set.
pub fn user_config_dir() -> Option<PathBuf> {
    user_config_dir_from(
        std::env::var_os("XDG_CONFIG_HOME").as_deref().map(Path::new),
        std::env::var_os("HOME").as_deref().map(Path::new),
    )
}

/// [`user_config_dir`] with the environment passed in explicitly.
pub fn user_config_dir_from(xdg_config_home: Option<&Path>, home: Option<&Path>) -> Option<PathBuf> {
    let base = xdg_config_home
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .or_else(|| home.map(|h| h.join(".config")))?;
    Some(base.join(APP_DIR))
}
