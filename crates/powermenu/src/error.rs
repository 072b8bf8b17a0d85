//! Top-level error type and its exit codes.
//!
//! | Exit code | Meaning                                              |
//! |-----------|------------------------------------------------------|
//! | 0         | Success, cancel, `--help`/`--version`, or bad flags  |
//! | 1         | No layout file found, no display, or bad settings    |
//! | 2         | Layout file could not be read                        |
//! | 3         | Layout file could not be parsed                      |

use std::path::PathBuf;

use powermenu_core::ParseError;
use thiserror::Error;

use crate::application::display_session::ControllerError;
use crate::application::platform::PlatformError;
use crate::infrastructure::storage::layout_file::LayoutFileError;
use crate::infrastructure::storage::settings::SettingsError;

/// Anything that stops the menu before or while it is shown.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    LayoutFile(#[from] LayoutFileError),

    #[error("invalid layout file {path}: {source}")]
    Layout {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Display(#[from] PlatformError),

    #[error("menu session failed: {0}")]
    Session(#[from] ControllerError),
}

impl AppError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::LayoutFile(LayoutFileError::NotFound { .. }) => 1,
            Self::LayoutFile(LayoutFileError::Unreadable { .. }) => 2,
            Self::Layout { .. } => 3,
            Self::Settings(_) | Self::Display(_) | Self::Session(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_follow_failure_kind() {
        let not_found = AppError::from(LayoutFileError::NotFound {
            searched: vec![PathBuf::from("/etc/powermenu/layout")],
        });
        let unreadable = AppError::from(LayoutFileError::Unreadable {
            path: PathBuf::from("/etc/powermenu/layout"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        });
        let invalid = AppError::Layout {
            path: PathBuf::from("layout"),
            source: ParseError::InvalidKey("foo".to_string()),
        };
        let display = AppError::from(PlatformError::Unavailable("no DISPLAY".to_string()));

        assert_eq!(not_found.exit_code(), 1);
        assert_eq!(unreadable.exit_code(), 2);
        assert_eq!(invalid.exit_code(), 3);
        assert_eq!(display.exit_code(), 1);
    }

    #[test]
    fn test_layout_error_names_the_file() {
        let err = AppError::Layout {
            path: PathBuf::from("/home/u/.config/powermenu/layout"),
            source: ParseError::InvalidKey("foo".to_string()),
        };
        assert!(err.to_string().contains("/home/u/.config/powermenu/layout"));
    }
}
