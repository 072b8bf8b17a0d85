//! Display backends.
//!
//! Each backend implements
//! [`DisplayPlatform`](crate::application::platform::DisplayPlatform); the
//! native one is selected at compile time and re-exported as
//! `NativePlatform`:
//!
//! | Module  | OS    | API used                                    |
//! |---------|-------|---------------------------------------------|
//! | `linux` | Linux | Xlib windows and drawing, Xinerama monitors |
//!
//! A [`MockPlatform`](mock::MockPlatform) is always compiled (not guarded by
//! `#[cfg]`) so tests on any platform can use it without a display server.

pub mod mock;

// ── Linux implementation ──────────────────────────────────────────────────────

#[cfg(target_os = "linux")]
pub mod linux;

/// Re-export the X11 backend as `NativePlatform` on Linux.
#[cfg(target_os = "linux")]
pub use linux::X11Platform as NativePlatform;
