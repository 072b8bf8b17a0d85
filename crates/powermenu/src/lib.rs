//! powermenu library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does powermenu do? (for beginners)
//!
//! powermenu is the screen you see after choosing "log out" in a desktop
//! session: a grid of large buttons (lock, log out, suspend, reboot, ...)
//! covering the whole screen.
//!
//! 1. The layout file is parsed into buttons before anything is shown.
//! 2. A primary window with the buttons is opened; once the display server
//!    has drawn it twice, every other monitor is covered by a blocker window
//!    that cancels the menu when clicked.
//! 3. A keybind, a click on a button, Escape, or a click on the background
//!    closes the menu on every monitor.
//! 4. Only after every window is gone is the chosen command run with
//!    `/bin/sh -c`.

/// Application layer: the session controller, placement, and handoff.
pub mod application;

/// Exit-code mapping for the binary.
pub mod error;

/// Infrastructure layer: display backends, files, command line, shell.
pub mod infrastructure;

/// One menu run from settings to handoff.
pub mod launch;
