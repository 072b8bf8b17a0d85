//! Turns scanned layout tokens into [`Button`] records.
//!
//! The parser walks the flat token list produced by
//! [`tokenize`](super::tokenizer::tokenize) once, front to back.  Every
//! top-level object (or every object directly inside one top-level array)
//! starts a new button; every key inside that object is validated and applied
//! to the button under construction.
//!
//! Parsing is all-or-nothing: the first error aborts the walk and the buttons
//! collected so far are dropped with it.

use thiserror::Error;

use super::tokenizer::{tokenize, Token, TokenKind, TokenizeError};
use crate::domain::button::{Button, DEFAULT_XALIGN, DEFAULT_YALIGN};
use crate::domain::registry::RegistryError;

/// Errors produced while loading a layout.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    /// An object contains a key that is not part of the layout schema.
    #[error("invalid key {0:?}")]
    InvalidKey(String),

    /// A recognised key carries a value that fails validation.
    #[error("invalid value {value:?} for {field}")]
    InvalidFieldValue { field: &'static str, value: String },

    /// An object appeared where a value was expected, or a bare value where a
    /// button object was expected.
    #[error("invalid layout at byte {offset}: {reason}")]
    InvalidLayout { offset: usize, reason: &'static str },

    /// The layout defines more buttons than the registry accepts.
    #[error("too many buttons: {count} exceeds the limit of {capacity}")]
    TooManyButtons { count: usize, capacity: usize },

    /// The text is not well-formed.
    #[error("syntax error at byte {offset}: {reason}")]
    Syntax { offset: usize, reason: &'static str },

    /// The scan needed more tokens than `capacity`.  [`tokenize`] caps its
    /// growth at one token per source byte, so only a fixed-capacity scan
    /// ([`tokenize_with_capacity`](super::tokenizer::tokenize_with_capacity))
    /// can produce this.
    #[error("layout needs more than {capacity} tokens")]
    TokenLimit { capacity: usize },
}

impl From<TokenizeError> for ParseError {
    fn from(err: TokenizeError) -> Self {
        match err {
            TokenizeError::Syntax { offset, reason } => ParseError::Syntax { offset, reason },
            TokenizeError::OutOfTokens { capacity } => ParseError::TokenLimit { capacity },
        }
    }
}

impl From<RegistryError> for ParseError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::TooManyButtons { count, capacity } => {
                ParseError::TooManyButtons { count, capacity }
            }
        }
    }
}

/// Parses layout text into buttons in source order.
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered; no partial result is kept.
///
/// # Examples
///
/// ```rust
/// use powermenu_core::layout::parse;
///
/// let buttons = parse(r#"{"label": "lock", "action": "loginctl lock-session", "keybind": "l"}"#).unwrap();
/// assert_eq!(buttons.len(), 1);
/// assert_eq!(buttons[0].keybind, Some('l'));
/// assert_eq!((buttons[0].xalign, buttons[0].yalign), (0.5, 0.9));
/// ```
pub fn parse(source: &str) -> Result<Vec<Button>, ParseError> {
    let tokens = tokenize(source)?;
    let mut buttons = Vec::new();
    let mut current: Option<(usize, ButtonDraft)> = None;

    let mut index = 0;
    while index < tokens.len() {
        let token = &tokens[index];
        match token.kind {
            // A single top-level array may wrap the button objects.
            TokenKind::Array if token.parent.is_none() => index += 1,

            TokenKind::Object if is_entry(&tokens, token) => {
                if let Some((_, draft)) = current.take() {
                    buttons.push(draft.finish()?);
                }
                current = Some((index, ButtonDraft::default()));
                index += 1;
            }

            TokenKind::String => {
                let Some((object, draft)) = current.as_mut() else {
                    return Err(unexpected_value(token));
                };
                if token.parent != Some(*object) {
                    return Err(unexpected_value(token));
                }
                let value = tokens
                    .get(index + 1)
                    .filter(|value| value.parent == Some(index))
                    .ok_or(ParseError::InvalidLayout {
                        offset: token.end,
                        reason: "field without a value",
                    })?;
                if matches!(value.kind, TokenKind::Object | TokenKind::Array) {
                    return Err(ParseError::InvalidLayout {
                        offset: value.start,
                        reason: "expected a field value, found a container",
                    });
                }
                draft.apply(token.text(source), value, source)?;
                index += 2;
            }

            _ => return Err(unexpected_value(token)),
        }
    }

    if let Some((_, draft)) = current {
        buttons.push(draft.finish()?);
    }
    Ok(buttons)
}

/// Returns `true` if `token` sits where a button object belongs: at the top
/// level or directly inside a top-level array.
fn is_entry(tokens: &[Token], token: &Token) -> bool {
    match token.parent {
        None => true,
        Some(parent) => {
            let parent = &tokens[parent];
            parent.kind == TokenKind::Array && parent.parent.is_none()
        }
    }
}

fn unexpected_value(token: &Token) -> ParseError {
    ParseError::InvalidLayout {
        offset: token.start,
        reason: "expected a button object",
    }
}

fn invalid(field: &'static str, value: &str) -> ParseError {
    ParseError::InvalidFieldValue {
        field,
        value: value.to_string(),
    }
}

/// A button under construction.  Only converted into a [`Button`] once the
/// whole object has been read.
#[derive(Debug)]
struct ButtonDraft {
    label: Option<String>,
    action: Option<String>,
    text: Option<String>,
    keybind: Option<char>,
    xalign: f32,
    yalign: f32,
    circular: bool,
}

impl Default for ButtonDraft {
    fn default() -> Self {
        Self {
            label: None,
            action: None,
            text: None,
            keybind: None,
            xalign: DEFAULT_XALIGN,
            yalign: DEFAULT_YALIGN,
            circular: false,
        }
    }
}

impl ButtonDraft {
    fn apply(&mut self, key: &str, value: &Token, source: &str) -> Result<(), ParseError> {
        let raw = value.text(source);
        match key {
            "label" => self.label = Some(raw.to_string()),
            "action" => self.action = Some(raw.to_string()),
            "text" => self.text = Some(raw.to_string()),
            "keybind" => {
                let mut chars = raw.chars();
                match (chars.next(), chars.next()) {
                    (Some(bind), None) => self.keybind = Some(bind),
                    _ => return Err(invalid("keybind", raw)),
                }
            }
            "height" => {
                self.yalign = legacy_alignment(value, raw).ok_or_else(|| invalid("height", raw))?
            }
            "width" => {
                self.xalign = legacy_alignment(value, raw).ok_or_else(|| invalid("width", raw))?
            }
            "circular" => {
                self.circular = match (value.kind, raw) {
                    (TokenKind::Primitive, "true") => true,
                    (TokenKind::Primitive, "false") => false,
                    _ => return Err(invalid("circular", raw)),
                }
            }
            other => return Err(ParseError::InvalidKey(other.to_string())),
        }
        Ok(())
    }

    fn finish(self) -> Result<Button, ParseError> {
        let action = match self.action {
            Some(action) if !action.is_empty() => action,
            _ => return Err(invalid("action", "")),
        };
        Ok(Button {
            label: self.label.unwrap_or_default(),
            action,
            text: self.text,
            keybind: self.keybind,
            xalign: self.xalign,
            yalign: self.yalign,
            circular: self.circular,
        })
    }
}

/// Reads `height`/`width` the way existing layout files expect: the value
/// must be a bare primitive starting with a digit, and the alignment becomes
/// the character code of that digit (`1` → `49.0`), not its numeric value.
fn legacy_alignment(value: &Token, raw: &str) -> Option<f32> {
    if value.kind != TokenKind::Primitive {
        return None;
    }
    let first = raw.bytes().next().filter(u8::is_ascii_digit)?;
    Some(f32::from(first))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const LOCK: &str =
        r#"{"label": "lock", "action": "loginctl lock-session", "text": "Lock", "keybind": "l"}"#;

    #[test]
    fn test_parse_lock_button_applies_defaults() {
        // Act
        let buttons = parse(LOCK).expect("parse");

        // Assert
        assert_eq!(buttons.len(), 1);
        let lock = &buttons[0];
        assert_eq!(lock.label, "lock");
        assert_eq!(lock.action, "loginctl lock-session");
        assert_eq!(lock.text.as_deref(), Some("Lock"));
        assert_eq!(lock.keybind, Some('l'));
        assert_eq!(lock.xalign, 0.5);
        assert_eq!(lock.yalign, 0.9);
        assert!(!lock.circular);
    }

    #[test]
    fn test_parse_preserves_source_order() {
        let src = r#"
            {"label": "c", "action": "3"}
            {"label": "a", "action": "1"}
            {"label": "b", "action": "2"}
        "#;
        let labels: Vec<_> = parse(src)
            .expect("parse")
            .into_iter()
            .map(|b| b.label)
            .collect();
        assert_eq!(labels, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_parse_accepts_array_wrapper() {
        let src = format!("[{LOCK}, {{\"action\": \"systemctl reboot\"}}]");
        let buttons = parse(&src).expect("parse");
        assert_eq!(buttons.len(), 2);
        assert_eq!(buttons[1].action, "systemctl reboot");
    }

    #[test]
    fn test_parse_unknown_key_fails_whole_parse() {
        // Arrange: the bad key sits in the second object
        let src = format!("{LOCK}\n{{\"action\": \"x\", \"foo\": \"bar\"}}");

        // Act
        let result = parse(&src);

        // Assert
        assert_eq!(result, Err(ParseError::InvalidKey("foo".to_string())));
    }

    #[test]
    fn test_parse_keybind_must_be_one_character() {
        let result = parse(r#"{"action": "x", "keybind": "ab"}"#);
        assert_eq!(
            result,
            Err(ParseError::InvalidFieldValue {
                field: "keybind",
                value: "ab".to_string()
            })
        );
        assert!(parse(r#"{"action": "x", "keybind": ""}"#).is_err());
        assert_eq!(
            parse(r#"{"action": "x", "keybind": "é"}"#).expect("parse")[0].keybind,
            Some('é')
        );
    }

    #[test]
    fn test_parse_height_and_width_use_character_code() {
        let buttons = parse(r#"{"action": "x", "height": 1, "width": 0}"#).expect("parse");
        assert_eq!(buttons[0].yalign, f32::from(b'1'));
        assert_eq!(buttons[0].xalign, f32::from(b'0'));
    }

    #[test]
    fn test_parse_height_rejects_non_digit_and_strings() {
        assert!(matches!(
            parse(r#"{"action": "x", "height": abc}"#),
            Err(ParseError::InvalidFieldValue { field: "height", .. })
        ));
        assert!(matches!(
            parse(r#"{"action": "x", "width": "5"}"#),
            Err(ParseError::InvalidFieldValue { field: "width", .. })
        ));
    }

    #[test]
    fn test_parse_circular_requires_boolean_primitive() {
        assert!(parse(r#"{"action": "x", "circular": true}"#).expect("parse")[0].circular);
        assert!(!parse(r#"{"action": "x", "circular": false}"#).expect("parse")[0].circular);
        assert!(matches!(
            parse(r#"{"action": "x", "circular": 1}"#),
            Err(ParseError::InvalidFieldValue { field: "circular", .. })
        ));
        assert!(matches!(
            parse(r#"{"action": "x", "circular": "true"}"#),
            Err(ParseError::InvalidFieldValue { field: "circular", .. })
        ));
    }

    #[test]
    fn test_parse_nested_object_value_is_invalid_layout() {
        let result = parse(r#"{"action": {"cmd": "x"}}"#);
        assert!(matches!(result, Err(ParseError::InvalidLayout { .. })));
    }

    #[test]
    fn test_parse_top_level_value_is_invalid_layout() {
        assert!(matches!(parse(r#""lock""#), Err(ParseError::InvalidLayout { .. })));
        assert!(matches!(parse("42"), Err(ParseError::InvalidLayout { .. })));
        assert!(matches!(
            parse(r#"[[{"action": "x"}]]"#),
            Err(ParseError::InvalidLayout { .. })
        ));
    }

    #[test]
    fn test_parse_missing_action_is_rejected() {
        assert_eq!(
            parse(r#"{"label": "lock"}"#),
            Err(ParseError::InvalidFieldValue {
                field: "action",
                value: String::new()
            })
        );
        assert!(parse(r#"{"action": ""}"#).is_err());
    }

    #[test]
    fn test_parse_syntax_error_is_reported() {
        assert!(matches!(
            parse(r#"{"action": "x""#),
            Err(ParseError::Syntax { .. })
        ));
    }

    #[test]
    fn test_parse_empty_input_yields_no_buttons() {
        assert!(parse("").expect("parse").is_empty());
    }

    #[test]
    fn test_parse_primitive_action_is_copied_verbatim() {
        let buttons = parse(r#"{"action": true}"#).expect("parse");
        assert_eq!(buttons[0].action, "true");
    }

    #[test]
    fn test_fixed_capacity_exhaustion_maps_to_token_limit() {
        // Arrange
        let scan = super::super::tokenizer::tokenize_with_capacity(LOCK, 2);

        // Act
        let err = ParseError::from(scan.expect_err("capacity of two is too small"));

        // Assert
        assert_eq!(err, ParseError::TokenLimit { capacity: 2 });
        assert_eq!(err.to_string(), "layout needs more than 2 tokens");
    }

    #[test]
    fn test_parse_grows_past_initial_token_capacity() {
        // 30 buttons × 9 tokens each is well over the first scan's 100.
        let source = LOCK.repeat(30);
        let buttons = parse(&source).expect("parse");
        assert_eq!(buttons.len(), 30);
    }
}
