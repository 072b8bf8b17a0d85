//! Domain entities for the menu.
//!
//! Pure logic with no OS, display-server, or process dependencies, so all of
//! it can be unit-tested anywhere.
//!
//! - **`button`** / **`registry`** – the configured actions.
//! - **`session`** – the run-state machine from first window to teardown.
//! - **`dispatch`** – turns input events into cancel/activate decisions.
//! - **`monitor`** / **`grid`** – geometry shared by display backends.
//! - **`caption`** – button caption text.

pub mod button;
pub mod caption;
pub mod dispatch;
pub mod grid;
pub mod monitor;
pub mod registry;
pub mod session;
