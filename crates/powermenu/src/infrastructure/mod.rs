//! Infrastructure layer for powermenu.
//!
//! Contains the OS-facing adapters: the display backends, the settings and
//! layout files, the command line, and the shell.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `powermenu_core`, but MUST NOT be imported by the `application` layer
//! (outside of its tests).
//!
//! # Sub-modules
//!
//! - **`display`** – [`DisplayPlatform`](crate::application::platform::DisplayPlatform)
//!   implementations.  The X11 backend is selected at compile time on Linux;
//!   a `MockPlatform` is always compiled for tests.
//!
//! - **`storage`** – the TOML settings file and layout file discovery.
//!
//! - **`cli`** – `clap` flags layered on top of the settings file.
//!
//! - **`shell`** – runs the chosen action through `/bin/sh -c`.

pub mod cli;
pub mod display;
pub mod shell;
pub mod storage;
