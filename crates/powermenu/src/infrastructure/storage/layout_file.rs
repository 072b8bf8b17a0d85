//! Locating and reading the layout file.
//!
//! An explicit path always wins.  Otherwise the first existing file among
//! these is used:
//!
//! 1. `<user config dir>/powermenu/layout`
//! 2. `/etc/powermenu/layout`
//! 3. `/usr/local/etc/powermenu/layout`

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::{user_config_dir, APP_DIR};

/// File name of the layout file inside each config directory.
pub const LAYOUT_FILE_NAME: &str = "layout";

/// System-wide config bases searched after the user directory.
pub const SYSTEM_CONFIG_BASES: [&str; 2] = ["/etc", "/usr/local/etc"];

/// Error type for layout file operations.
#[derive(Debug, Error)]
pub enum LayoutFileError {
    /// No candidate location holds a layout file.
    #[error("no layout file found; searched {}", display_paths(.searched))]
    NotFound { searched: Vec<PathBuf> },

    /// The layout file exists but could not be read.
    #[error("failed to read layout file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Candidate locations in search order, given the user config directory.
pub fn candidate_paths(user_dir: Option<&Path>) -> Vec<PathBuf> {
    user_dir
        .map(|dir| dir.join(LAYOUT_FILE_NAME))
        .into_iter()
        .chain(
            SYSTEM_CONFIG_BASES
                .iter()
                .map(|base| Path::new(base).join(APP_DIR).join(LAYOUT_FILE_NAME)),
        )
        .collect()
}

/// Returns `explicit` if given, else the first existing candidate.
///
/// # Errors
///
/// Returns [`LayoutFileError::NotFound`] when no candidate exists.
pub fn locate_layout(explicit: Option<&Path>) -> Result<PathBuf, LayoutFileError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    first_existing(candidate_paths(user_config_dir().as_deref()))
}

/// Picks the first path in `candidates` that is an existing file.
///
/// # Errors
///
/// Returns [`LayoutFileError::NotFound`] listing every candidate.
pub fn first_existing(candidates: Vec<PathBuf>) -> Result<PathBuf, LayoutFileError> {
    match candidates.iter().position(|p| p.is_file()) {
        Some(index) => {
            let found = candidates[index].clone();
            debug!(path = %found.display(), "layout file found");
            Ok(found)
        }
        None => Err(LayoutFileError::NotFound {
            searched: candidates,
        }),
    }
}

/// Reads the layout file at `path` into memory.
///
/// # Errors
///
/// Returns [`LayoutFileError::Unreadable`] for any I/O failure, including
/// an explicitly named file that does not exist.
pub fn read_layout(path: &Path) -> Result<String, LayoutFileError> {
    std::fs::read_to_string(path).map_err(|source| LayoutFileError::Unreadable {
        path: path.to_path_buf(),
        source,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("powermenu_layout_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    #[test]
    fn test_candidate_paths_order() {
        let paths = candidate_paths(Some(Path::new("/home/u/.config/powermenu")));
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/home/u/.config/powermenu/layout"),
                PathBuf::from("/etc/powermenu/layout"),
                PathBuf::from("/usr/local/etc/powermenu/layout"),
            ]
        );
    }

    #[test]
    fn test_candidate_paths_without_user_dir() {
        assert_eq!(candidate_paths(None).len(), 2);
    }

    #[test]
    fn test_first_existing_skips_missing_candidates() {
        // Arrange
        let dir = scratch_dir();
        let missing = dir.join("nope").join(LAYOUT_FILE_NAME);
        let present = dir.join(LAYOUT_FILE_NAME);
        std::fs::write(&present, "{}").expect("write");

        // Act
        let found = first_existing(vec![missing, present.clone()]).expect("found");

        // Assert
        assert_eq!(found, present);
    }

    #[test]
    fn test_first_existing_reports_every_searched_path() {
        let dir = scratch_dir();
        let a = dir.join("a");
        let b = dir.join("b");

        let err = first_existing(vec![a.clone(), b.clone()]).expect_err("none exist");

        match err {
            LayoutFileError::NotFound { searched } => assert_eq!(searched, vec![a, b]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_explicit_path_is_returned_unchecked() {
        let path = Path::new("/does/not/exist/layout");
        assert_eq!(locate_layout(Some(path)).expect("explicit"), path);
    }

    #[test]
    fn test_read_layout_of_missing_file_is_unreadable() {
        let path = scratch_dir().join("missing");
        assert!(matches!(
            read_layout(&path),
            Err(LayoutFileError::Unreadable { .. })
        ));
    }

    #[test]
    fn test_read_layout_returns_contents() {
        let path = scratch_dir().join(LAYOUT_FILE_NAME);
        std::fs::write(&path, "{ \"action\": \"true\" }").expect("write");
        assert_eq!(read_layout(&path).expect("read"), "{ \"action\": \"true\" }");
    }
}
