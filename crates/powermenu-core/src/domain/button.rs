//! The [`Button`] entity: one configured menu action.

/// Horizontal caption alignment used when a layout omits `width`.
pub const DEFAULT_XALIGN: f32 = 0.5;

/// Vertical caption alignment used when a layout omits `height`.
pub const DEFAULT_YALIGN: f32 = 0.9;

/// One configured action in the menu.
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    /// Opaque identifier used by renderers for styling; never displayed.
    pub label: String,
    /// Shell command run when the button is chosen.  Never empty.
    pub action: String,
    /// Caption shown on the control.
    pub text: Option<String>,
    /// Key that triggers the button from the keyboard.
    pub keybind: Option<char>,
    /// Horizontal caption alignment hint.
    pub xalign: f32,
    /// Vertical caption alignment hint.
    pub yalign: f32,
    /// Whether the control is drawn with the circular style.
    pub circular: bool,
}

impl Button {
    /// Creates a button with the given action and every other field at its
    /// default.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            label: String::new(),
            action: action.into(),
            text: None,
            keybind: None,
            xalign: DEFAULT_XALIGN,
            yalign: DEFAULT_YALIGN,
            circular: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_keybind(mut self, keybind: char) -> Self {
        self.keybind = Some(keybind);
        self
    }
}
