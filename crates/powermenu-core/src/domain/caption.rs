//! Caption composition for rendered buttons.

use super::button::Button;

/// Returns the caption to draw on `button`.
///
/// With `show_binds` set and a keybind configured, the keybind is appended in
/// brackets (`Lock[l]`).  A button without `text` has no caption.
pub fn caption(button: &Button, show_binds: bool) -> Option<String> {
    let text = button.text.as_deref()?;
    match button.keybind {
        Some(bind) if show_binds => Some(format!("{text}[{bind}]")),
        _ => Some(text.to_string()),
    }
}
