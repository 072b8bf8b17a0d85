//! Layout file loading: text → tokens → buttons → registry.
//!
//! # The layout format (for beginners)
//!
//! A layout file lists the menu buttons as JSON-style objects, one per
//! button, in the order they should appear:
//!
//! ```text
//! {
//!     "label" : "lock",
//!     "action" : "loginctl lock-session",
//!     "text" : "Lock",
//!     "keybind" : "l"
//! }
//! {
//!     "label" : "reboot",
//!     "action" : "systemctl reboot",
//!     "text" : "Reboot",
//!     "keybind" : "r"
//! }
//! ```
//!
//! The objects may also be wrapped in one `[...]` array.  Loading happens in
//! two passes:
//!
//! - **`tokenizer`** scans the text into a flat token list, growing its token
//!   buffer on demand.
//! - **`parser`** walks the tokens and validates every field.
//!
//! [`load_registry`] chains both passes with the registry capacity check.

pub mod parser;
pub mod tokenizer;

pub use parser::{parse, ParseError};
pub use tokenizer::{tokenize, Token, TokenKind, TokenizeError};

use crate::domain::registry::ButtonRegistry;

/// Parses `source` and builds a registry holding at most `capacity` buttons.
///
/// # Errors
///
/// Returns any [`ParseError`], including [`ParseError::TooManyButtons`] when
/// the layout defines more than `capacity` buttons.
pub fn load_registry(source: &str, capacity: usize) -> Result<ButtonRegistry, ParseError> {
    let buttons = parse(source)?;
    Ok(ButtonRegistry::new(buttons, capacity)?)
}
