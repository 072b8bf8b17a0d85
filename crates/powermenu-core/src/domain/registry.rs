//! The read-only [`ButtonRegistry`].
//!
//! Built once per run from a successful parse and never mutated afterwards.
//! Order is the order of the layout file.

use thiserror::Error;

use super::button::Button;

/// Maximum number of buttons accepted from a layout unless configured
/// otherwise.
pub const DEFAULT_BUTTON_CAPACITY: usize = 100;

/// Errors raised when building a registry.
#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    /// More buttons were supplied than the registry accepts.
    #[error("too many buttons: {count} exceeds the limit of {capacity}")]
    TooManyButtons { count: usize, capacity: usize },
}

/// Ordered, capacity-checked collection of buttons.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ButtonRegistry {
    buttons: Vec<Button>,
}

impl ButtonRegistry {
    /// Builds a registry from `buttons`, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::TooManyButtons`] if `buttons.len() > capacity`.
    pub fn new(buttons: Vec<Button>, capacity: usize) -> Result<Self, RegistryError> {
        if buttons.len() > capacity {
            return Err(RegistryError::TooManyButtons {
                count: buttons.len(),
                capacity,
            });
        }
        Ok(Self { buttons })
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Button> {
        self.buttons.get(index)
    }

    /// Iterates buttons in layout order.
    pub fn iter(&self) -> std::slice::Iter<'_, Button> {
        self.buttons.iter()
    }

    /// Returns the index and button of the first entry bound to `key`.
    ///
    /// When several buttons share a keybind the earliest one wins.
    pub fn find_by_keybind(&self, key: char) -> Option<(usize, &Button)> {
        self.buttons
            .iter()
            .enumerate()
            .find(|(_, button)| button.keybind == Some(key))
    }
}

impl<'a> IntoIterator for &'a ButtonRegistry {
    type Item = &'a Button;
    type IntoIter = std::slice::Iter<'a, Button>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Button> {
        vec![
            Button::new("loginctl lock-session").with_keybind('l'),
            Button::new("systemctl reboot").with_keybind('r'),
            Button::new("echo shadowed").with_keybind('l'),
            Button::new("true"),
        ]
    }

    #[test]
    fn test_new_registry_keeps_order_and_length() {
        // Arrange / Act
        let registry = ButtonRegistry::new(sample(), DEFAULT_BUTTON_CAPACITY).expect("registry");

        // Assert
        assert_eq!(registry.len(), 4);
        let actions: Vec<_> = registry.iter().map(|b| b.action.as_str()).collect();
        assert_eq!(
            actions,
            vec!["loginctl lock-session", "systemctl reboot", "echo shadowed", "true"]
        );
    }

    #[test]
    fn test_new_registry_over_capacity_is_rejected() {
        let result = ButtonRegistry::new(sample(), 3);
        assert_eq!(
            result,
            Err(RegistryError::TooManyButtons {
                count: 4,
                capacity: 3
            })
        );
    }

    #[test]
    fn test_registry_at_exact_capacity_is_accepted() {
        assert!(ButtonRegistry::new(sample(), 4).is_ok());
    }

    #[test]
    fn test_find_by_keybind_returns_first_match() {
        let registry = ButtonRegistry::new(sample(), DEFAULT_BUTTON_CAPACITY).expect("registry");
        let (index, button) = registry.find_by_keybind('l').expect("bound");
        assert_eq!(index, 0);
        assert_eq!(button.action, "loginctl lock-session");
    }

    #[test]
    fn test_find_by_keybind_unbound_key_returns_none() {
        let registry = ButtonRegistry::new(sample(), DEFAULT_BUTTON_CAPACITY).expect("registry");
        assert!(registry.find_by_keybind('x').is_none());
    }

    #[test]
    fn test_get_out_of_range_returns_none() {
        let registry = ButtonRegistry::new(sample(), DEFAULT_BUTTON_CAPACITY).expect("registry");
        assert!(registry.get(4).is_none());
        assert_eq!(registry.get(1).map(|b| b.keybind), Some(Some('r')));
    }
}
