//! # powermenu-core
//!
//! Shared library for powermenu containing the layout file parser and the
//! platform-independent pieces of a menu session.
//!
//! It has zero dependencies on display servers, UI toolkits, or process
//! spawning; the `powermenu` crate supplies those.
//!
//! # Architecture overview (for beginners)
//!
//! powermenu shows a full-screen menu of actions (lock, log out, reboot…),
//! waits for the user to pick one with the keyboard or the mouse, closes the
//! menu on every monitor, and only then runs the chosen shell command.
//!
//! - **`layout`** – reads the layout file into an ordered list of buttons.
//! - **`domain`** – the button registry, the session state machine, input
//!   dispatch, and grid/monitor geometry.

pub mod domain;
pub mod layout;

pub use domain::button::Button;
pub use domain::dispatch::{Dispatch, InputDispatcher, InputEvent, Key, PointerTarget, WindowRole};
pub use domain::caption::caption;
pub use domain::grid::{hit_test, layout_cells, GridSpec, Margins, Rect, Spacing};
pub use domain::monitor::{monitor_at, Monitor};
pub use domain::registry::{ButtonRegistry, RegistryError, DEFAULT_BUTTON_CAPACITY};
pub use domain::session::{RenderProgress, Session, SessionError, SessionState};
pub use layout::{load_registry, parse, ParseError};
