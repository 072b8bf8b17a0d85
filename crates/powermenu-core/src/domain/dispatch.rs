//! Input dispatch: maps one keyboard or pointer event to a session decision.
//!
//! Display backends translate their native events into [`InputEvent`]s.  The
//! [`InputDispatcher`] looks the event up against the [`ButtonRegistry`] and
//! closes the [`Session`] when the event cancels the menu or activates a
//! button.  After the first closing decision the dispatcher detaches and
//! every later event is reported as [`Dispatch::Ignore`].

use super::registry::ButtonRegistry;
use super::session::{Session, SessionError};

/// Role of the window an event was delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowRole {
    /// The interactive window hosting the buttons.
    Primary,
    /// A click-to-cancel window covering another monitor.
    Blocker,
}

/// A key press, already translated by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Char(char),
    /// Any key with no character and no special meaning.
    Other,
}

/// What a pointer press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// Empty window area outside every button.
    Background,
    /// The button at this registry index.
    Button(usize),
}

/// An input event delivered to one of the session's windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyPressed { role: WindowRole, key: Key },
    PointerPressed { role: WindowRole, target: PointerTarget },
}

/// The decision taken for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Nothing happens.
    Ignore,
    /// Close without running anything.
    Cancel,
    /// Close and run the button at this index.
    Activate(usize),
}

/// Classifies `event` without touching any session state.
pub fn classify(event: &InputEvent, registry: &ButtonRegistry) -> Dispatch {
    match *event {
        InputEvent::KeyPressed {
            role: WindowRole::Primary,
            key: Key::Escape,
        } => Dispatch::Cancel,
        InputEvent::KeyPressed {
            role: WindowRole::Primary,
            key: Key::Char(c),
        } => registry
            .find_by_keybind(c)
            .map_or(Dispatch::Ignore, |(index, _)| Dispatch::Activate(index)),
        InputEvent::KeyPressed { .. } => Dispatch::Ignore,
        InputEvent::PointerPressed {
            role: WindowRole::Blocker,
            ..
        } => Dispatch::Cancel,
        InputEvent::PointerPressed {
            role: WindowRole::Primary,
            target: PointerTarget::Background,
        } => Dispatch::Cancel,
        InputEvent::PointerPressed {
            role: WindowRole::Primary,
            target: PointerTarget::Button(index),
        } => {
            if registry.get(index).is_some() {
                Dispatch::Activate(index)
            } else {
                Dispatch::Ignore
            }
        }
    }
}

/// Routes events into a session until the first closing decision.
pub struct InputDispatcher<'r> {
    registry: &'r ButtonRegistry,
    detached: bool,
}

impl<'r> InputDispatcher<'r> {
    pub fn new(registry: &'r ButtonRegistry) -> Self {
        Self {
            registry,
            detached: false,
        }
    }

    /// Returns `true` once a closing decision has been made.
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Handles one event, moving `session` to `Closing` when it cancels or
    /// activates.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the session rejects the transition.
    pub fn handle(
        &mut self,
        event: &InputEvent,
        session: &mut Session,
    ) -> Result<Dispatch, SessionError> {
        if self.detached || !session.is_open() {
            return Ok(Dispatch::Ignore);
        }

        let decision = classify(event, self.registry);
        match decision {
            Dispatch::Ignore => {}
            Dispatch::Cancel => {
                session.begin_closing(None)?;
                self.detached = true;
            }
            Dispatch::Activate(index) => {
                let action = self.registry.get(index).map(|b| b.action.clone());
                session.begin_closing(action)?;
                self.detached = true;
            }
        }
        Ok(decision)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::button::Button;
    use crate::domain::registry::DEFAULT_BUTTON_CAPACITY;
    use crate::domain::session::SessionState;

    fn registry() -> ButtonRegistry {
        ButtonRegistry::new(
            vec![
                Button::new("loginctl lock-session").with_keybind('l'),
                Button::new("systemctl reboot").with_keybind('r'),
                Button::new("loginctl terminate-user $USER"),
            ],
            DEFAULT_BUTTON_CAPACITY,
        )
        .expect("registry")
    }

    fn open_session() -> Session {
        let mut session = Session::new();
        session.primary_window_created().expect("create");
        session
    }

    fn key(role: WindowRole, key: Key) -> InputEvent {
        InputEvent::KeyPressed { role, key }
    }

    fn click(role: WindowRole, target: PointerTarget) -> InputEvent {
        InputEvent::PointerPressed { role, target }
    }

    #[test]
    fn test_classify_escape_on_primary_cancels() {
        assert_eq!(
            classify(&key(WindowRole::Primary, Key::Escape), &registry()),
            Dispatch::Cancel
        );
    }

    #[test]
    fn test_classify_keys_on_blocker_are_ignored() {
        let registry = registry();
        assert_eq!(
            classify(&key(WindowRole::Blocker, Key::Escape), &registry),
            Dispatch::Ignore
        );
        assert_eq!(
            classify(&key(WindowRole::Blocker, Key::Char('l')), &registry),
            Dispatch::Ignore
        );
    }

    #[test]
    fn test_classify_bound_key_activates_button() {
        assert_eq!(
            classify(&key(WindowRole::Primary, Key::Char('r')), &registry()),
            Dispatch::Activate(1)
        );
    }

    #[test]
    fn test_classify_unbound_key_is_ignored() {
        let registry = registry();
        assert_eq!(
            classify(&key(WindowRole::Primary, Key::Char('z')), &registry),
            Dispatch::Ignore
        );
        assert_eq!(
            classify(&key(WindowRole::Primary, Key::Other), &registry),
            Dispatch::Ignore
        );
    }

    #[test]
    fn test_classify_pointer_presses() {
        let registry = registry();
        assert_eq!(
            classify(&click(WindowRole::Blocker, PointerTarget::Background), &registry),
            Dispatch::Cancel
        );
        assert_eq!(
            classify(&click(WindowRole::Primary, PointerTarget::Background), &registry),
            Dispatch::Cancel
        );
        assert_eq!(
            classify(&click(WindowRole::Primary, PointerTarget::Button(2)), &registry),
            Dispatch::Activate(2)
        );
        assert_eq!(
            classify(&click(WindowRole::Primary, PointerTarget::Button(9)), &registry),
            Dispatch::Ignore
        );
    }

    #[test]
    fn test_handle_activation_sets_pending_command_and_closes() {
        // Arrange
        let registry = registry();
        let mut dispatcher = InputDispatcher::new(&registry);
        let mut session = open_session();

        // Act
        let decision = dispatcher
            .handle(&key(WindowRole::Primary, Key::Char('l')), &mut session)
            .expect("handle");

        // Assert
        assert_eq!(decision, Dispatch::Activate(0));
        assert_eq!(session.state(), SessionState::Closing);
        assert_eq!(session.pending_command(), Some("loginctl lock-session"));
        assert!(dispatcher.is_detached());
    }

    #[test]
    fn test_handle_cancel_leaves_command_unset() {
        let registry = registry();
        let mut dispatcher = InputDispatcher::new(&registry);
        let mut session = open_session();

        let decision = dispatcher
            .handle(&click(WindowRole::Blocker, PointerTarget::Background), &mut session)
            .expect("handle");

        assert_eq!(decision, Dispatch::Cancel);
        assert_eq!(session.state(), SessionState::Closing);
        assert!(session.pending_command().is_none());
    }

    #[test]
    fn test_handle_ignores_events_after_first_decision() {
        // Arrange
        let registry = registry();
        let mut dispatcher = InputDispatcher::new(&registry);
        let mut session = open_session();
        dispatcher
            .handle(&key(WindowRole::Primary, Key::Char('r')), &mut session)
            .expect("first");

        // Act
        let second = dispatcher
            .handle(&key(WindowRole::Primary, Key::Char('l')), &mut session)
            .expect("second");

        // Assert
        assert_eq!(second, Dispatch::Ignore);
        assert_eq!(session.pending_command(), Some("systemctl reboot"));
    }

    #[test]
    fn test_handle_ignores_events_before_window_exists() {
        let registry = registry();
        let mut dispatcher = InputDispatcher::new(&registry);
        let mut session = Session::new();

        let decision = dispatcher
            .handle(&key(WindowRole::Primary, Key::Escape), &mut session)
            .expect("handle");

        assert_eq!(decision, Dispatch::Ignore);
        assert_eq!(session.state(), SessionState::Unstarted);
    }
}
