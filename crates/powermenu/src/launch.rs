//! One menu run, from validated settings to the command handoff.
//!
//! The display backend is opened through a factory so the layout is fully
//! loaded and parsed before any connection (and so any window) exists: a
//! broken layout exits without ever touching the display.

use tracing::info;

use powermenu_core::load_registry;

use crate::application::display_session::DisplaySessionController;
use crate::application::handoff::{self, CommandRunner, HandoffOutcome};
use crate::application::placement::select_placement;
use crate::application::platform::{DisplayPlatform, PlatformError};
use crate::error::AppError;
use crate::infrastructure::storage::layout_file::{locate_layout, read_layout};
use crate::infrastructure::storage::settings::Settings;

/// Loads the layout, shows the menu, and hands the chosen command to `runner`.
///
/// `open_platform` is called only after the layout has parsed.  The platform
/// is dropped, closing its connection, before the command runs.
///
/// # Errors
///
/// Returns an [`AppError`] whose [`exit_code`](AppError::exit_code) the
/// binary reports.  A failing command is not an error; it is reported in the
/// returned [`HandoffOutcome`].
pub fn launch<P, F>(
    settings: &Settings,
    open_platform: F,
    runner: &dyn CommandRunner,
) -> Result<HandoffOutcome, AppError>
where
    P: DisplayPlatform,
    F: FnOnce() -> Result<P, PlatformError>,
{
    settings.validate()?;

    // ── Layout ────────────────────────────────────────────────────────────────
    let path = locate_layout(settings.menu.layout.as_deref())?;
    let source = read_layout(&path)?;
    let registry = load_registry(&source, settings.menu.max_buttons).map_err(|source| {
        AppError::Layout {
            path: path.clone(),
            source,
        }
    })?;
    info!(path = %path.display(), buttons = registry.len(), "layout loaded");

    // ── Display session ───────────────────────────────────────────────────────
    let mut platform = open_platform()?;
    let placement = select_placement(settings.display.protocol, platform.supports_overlay());
    let terminated = DisplaySessionController::new(
        &mut platform,
        placement,
        &registry,
        settings.session_options(),
    )
    .run()?;
    drop(platform);

    // ── Handoff ───────────────────────────────────────────────────────────────
    Ok(handoff::execute(terminated, runner))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::path::PathBuf;

    use powermenu_core::Key;
    use uuid::Uuid;

    use super::*;
    use crate::application::handoff::{CommandExit, MockCommandRunner};
    use crate::infrastructure::display::mock::{MockPlatform, ScriptedEvent};

    const LOCK: &str =
        r#"{"label": "lock", "action": "loginctl lock-session", "text": "Lock", "keybind": "l"}"#;

    /// Writes `content` as a layout file in a fresh scratch directory.
    fn scratch_layout(content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("powermenu_launch_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create scratch dir");
        let path = dir.join("layout");
        std::fs::write(&path, content).expect("write layout");
        path
    }

    fn settings_for(layout: PathBuf) -> Settings {
        let mut settings = Settings::default();
        settings.menu.layout = Some(layout);
        settings
    }

    fn idle_runner() -> MockCommandRunner {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().times(0);
        runner
    }

    #[test]
    fn test_unknown_layout_key_exits_3_without_opening_the_display() {
        // Arrange
        let path = scratch_layout(r#"{"label": "lock", "action": "true", "foo": "bar"}"#);
        let settings = settings_for(path.clone());
        let opened = Cell::new(false);

        // Act
        let result = launch(
            &settings,
            || {
                opened.set(true);
                Ok(MockPlatform::new())
            },
            &idle_runner(),
        );

        // Assert
        let err = result.expect_err("layout must be rejected");
        assert_eq!(err.exit_code(), 3);
        assert!(!opened.get(), "no window may exist for a broken layout");
        let _ = std::fs::remove_dir_all(path.parent().expect("parent"));
    }

    #[test]
    fn test_unreadable_layout_exits_2_without_opening_the_display() {
        let missing = std::env::temp_dir()
            .join(format!("powermenu_launch_{}", Uuid::new_v4()))
            .join("layout");
        let opened = Cell::new(false);

        let result = launch(
            &settings_for(missing),
            || {
                opened.set(true);
                Ok(MockPlatform::new())
            },
            &idle_runner(),
        );

        assert_eq!(result.expect_err("unreadable").exit_code(), 2);
        assert!(!opened.get());
    }

    #[test]
    fn test_invalid_settings_exit_1_before_the_layout_is_read() {
        let mut settings = settings_for(PathBuf::from("/nonexistent/powermenu/layout"));
        settings.grid.buttons_per_row = 0;

        let result = launch(&settings, || Ok(MockPlatform::new()), &idle_runner());

        assert_eq!(result.expect_err("invalid").exit_code(), 1);
    }

    #[test]
    fn test_unavailable_display_exits_1() {
        let path = scratch_layout(LOCK);

        let result = launch(
            &settings_for(path.clone()),
            || -> Result<MockPlatform, PlatformError> {
                Err(PlatformError::Unavailable("no DISPLAY".to_string()))
            },
            &idle_runner(),
        );

        assert_eq!(result.expect_err("no display").exit_code(), 1);
        let _ = std::fs::remove_dir_all(path.parent().expect("parent"));
    }

    #[test]
    fn test_keybind_runs_its_command_through_the_runner() {
        // Arrange
        let path = scratch_layout(LOCK);
        let mut runner = MockCommandRunner::new();
        runner.expect_run().times(1).returning(|command| {
            assert_eq!(command, "loginctl lock-session");
            Ok(CommandExit { code: Some(0) })
        });

        // Act
        let outcome = launch(
            &settings_for(path.clone()),
            || {
                let mut platform = MockPlatform::new();
                platform.push_events([ScriptedEvent::KeyOnPrimary(Key::Char('l'))]);
                Ok(platform)
            },
            &runner,
        )
        .expect("menu runs");

        // Assert
        assert!(matches!(outcome, HandoffOutcome::Succeeded));
        let _ = std::fs::remove_dir_all(path.parent().expect("parent"));
    }
}
