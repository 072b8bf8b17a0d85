//! Flat token scanner for the layout file format.
//!
//! The layout format is a relaxed JSON dialect: a file is a sequence of
//! objects (optionally wrapped in one array) whose values are strings or bare
//! primitives such as `true` or `5`.  The scanner does not build a tree.  It
//! emits a flat list of [`Token`]s, each recording a byte span into the source
//! text plus a link to its parent token, and the parser walks that list.
//!
//! # Token capacity (for beginners)
//!
//! [`tokenize_with_capacity`] refuses to produce more than `capacity` tokens
//! and reports [`TokenizeError::OutOfTokens`] instead.  [`tokenize`] wraps it
//! with a growth policy: start at [`INITIAL_TOKEN_CAPACITY`], double on every
//! failure, and rescan the whole buffer from the beginning.  The number of
//! retries is bounded because every token consumes at least one byte of
//! source, so a capacity equal to the source length always suffices.
//!
//! # Parent links
//!
//! | Token                      | `parent`                        |
//! |----------------------------|---------------------------------|
//! | top-level object / array   | `None`                          |
//! | element of an array        | the array                       |
//! | key inside an object       | the object                      |
//! | value following `key:`     | the key                         |

use thiserror::Error;
use tracing::debug;

/// Token capacity used for the first scan attempt.
pub const INITIAL_TOKEN_CAPACITY: usize = 100;

/// Kind of a scanned token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Object,
    Array,
    /// A quoted string; the span excludes the quotes.
    String,
    /// An unquoted scalar (`true`, `false`, `null`, numbers, bare words).
    Primitive,
}

/// One scanned token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first byte of the token.
    pub start: usize,
    /// Byte offset one past the last byte of the token.
    pub end: usize,
    /// Number of direct children (keys for objects, elements for arrays,
    /// 1 for a key that received its value).
    pub size: usize,
    /// Index of the enclosing token, see the module docs.
    pub parent: Option<usize>,
}

impl Token {
    /// Returns the raw source text covered by this token.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// Errors produced while scanning.
#[derive(Debug, Error, PartialEq)]
pub enum TokenizeError {
    /// More than `capacity` tokens would be required.
    #[error("token capacity of {capacity} exceeded")]
    OutOfTokens { capacity: usize },

    /// The text is not well-formed.
    #[error("syntax error at byte {offset}: {reason}")]
    Syntax { offset: usize, reason: &'static str },
}

/// Scans `source`, growing the token capacity geometrically until the scan
/// succeeds or fails for a reason other than capacity.
///
/// # Errors
///
/// Returns [`TokenizeError::Syntax`] for malformed input.
pub fn tokenize(source: &str) -> Result<Vec<Token>, TokenizeError> {
    let ceiling = source.len().max(1);
    let mut capacity = INITIAL_TOKEN_CAPACITY.min(ceiling);
    loop {
        match tokenize_with_capacity(source, capacity) {
            Err(TokenizeError::OutOfTokens { .. }) if capacity < ceiling => {
                let grown = capacity.saturating_mul(2).min(ceiling);
                debug!("token capacity {capacity} exhausted; rescanning with {grown}");
                capacity = grown;
            }
            other => return other,
        }
    }
}

/// Scans `source` producing at most `capacity` tokens.
///
/// # Errors
///
/// Returns [`TokenizeError::OutOfTokens`] when the capacity is too small and
/// [`TokenizeError::Syntax`] for malformed input.
pub fn tokenize_with_capacity(source: &str, capacity: usize) -> Result<Vec<Token>, TokenizeError> {
    Scanner::new(source, capacity).run()
}

// ── Scanner ───────────────────────────────────────────────────────────────────

struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
    capacity: usize,
    tokens: Vec<Token>,
    /// Indices of containers that have been opened but not closed.
    open: Vec<usize>,
    /// A key that has seen its `:` and is waiting for a value.
    pending_key: Option<usize>,
    /// A key that has not yet seen its `:`.
    key_awaiting_colon: Option<usize>,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str, capacity: usize) -> Self {
        Self {
            bytes: source.as_bytes(),
            pos: 0,
            capacity,
            tokens: Vec::with_capacity(capacity.min(source.len())),
            open: Vec::new(),
            pending_key: None,
            key_awaiting_colon: None,
        }
    }

    fn run(mut self) -> Result<Vec<Token>, TokenizeError> {
        while let Some(&byte) = self.bytes.get(self.pos) {
            match byte {
                b' ' | b'\t' | b'\r' | b'\n' | b',' => self.pos += 1,
                b'{' => self.open_container(TokenKind::Object)?,
                b'[' => self.open_container(TokenKind::Array)?,
                b'}' => self.close_container(TokenKind::Object)?,
                b']' => self.close_container(TokenKind::Array)?,
                b':' => self.colon()?,
                b'"' => self.string()?,
                _ => self.primitive()?,
            }
        }

        if !self.open.is_empty() || self.pending_key.is_some() || self.key_awaiting_colon.is_some()
        {
            return Err(self.syntax(self.bytes.len(), "unexpected end of input"));
        }
        Ok(self.tokens)
    }

    fn syntax(&self, offset: usize, reason: &'static str) -> TokenizeError {
        TokenizeError::Syntax { offset, reason }
    }

    /// Appends a token, wiring up its parent and bumping the parent's size.
    fn push(&mut self, kind: TokenKind, start: usize, end: usize) -> Result<usize, TokenizeError> {
        if self.tokens.len() >= self.capacity {
            return Err(TokenizeError::OutOfTokens { capacity: self.capacity });
        }
        if self.key_awaiting_colon.is_some() {
            return Err(self.syntax(start, "expected ':' after object key"));
        }

        let mut is_key = false;
        let parent = if let Some(key) = self.pending_key.take() {
            Some(key)
        } else {
            match self.open.last().copied() {
                Some(container) if self.tokens[container].kind == TokenKind::Object => {
                    if kind != TokenKind::String {
                        return Err(self.syntax(start, "object keys must be strings"));
                    }
                    is_key = true;
                    Some(container)
                }
                other => other,
            }
        };

        let index = self.tokens.len();
        self.tokens.push(Token { kind, start, end, size: 0, parent });
        if let Some(parent) = parent {
            self.tokens[parent].size += 1;
        }
        if is_key {
            self.key_awaiting_colon = Some(index);
        }
        Ok(index)
    }

    fn open_container(&mut self, kind: TokenKind) -> Result<(), TokenizeError> {
        // The end offset is patched when the matching bracket is found.
        let index = self.push(kind, self.pos, self.pos)?;
        self.open.push(index);
        self.pos += 1;
        Ok(())
    }

    fn close_container(&mut self, kind: TokenKind) -> Result<(), TokenizeError> {
        if self.pending_key.is_some() || self.key_awaiting_colon.is_some() {
            return Err(self.syntax(self.pos, "object key without a value"));
        }
        let Some(index) = self.open.pop() else {
            return Err(self.syntax(self.pos, "unmatched closing bracket"));
        };
        if self.tokens[index].kind != kind {
            return Err(self.syntax(self.pos, "mismatched closing bracket"));
        }
        self.pos += 1;
        self.tokens[index].end = self.pos;
        Ok(())
    }

    fn colon(&mut self) -> Result<(), TokenizeError> {
        match self.key_awaiting_colon.take() {
            Some(key) => {
                self.pending_key = Some(key);
                self.pos += 1;
                Ok(())
            }
            None => Err(self.syntax(self.pos, "unexpected ':'")),
        }
    }

    fn string(&mut self) -> Result<(), TokenizeError> {
        let open_quote = self.pos;
        let start = open_quote + 1;
        let mut cursor = start;

        while let Some(&byte) = self.bytes.get(cursor) {
            match byte {
                b'"' => {
                    self.push(TokenKind::String, start, cursor)?;
                    self.pos = cursor + 1;
                    return Ok(());
                }
                b'\\' => cursor = self.escape(cursor)?,
                _ => cursor += 1,
            }
        }
        Err(self.syntax(open_quote, "unterminated string"))
    }

    /// Validates the escape sequence starting at the backslash at `at` and
    /// returns the offset just past it.
    fn escape(&self, at: usize) -> Result<usize, TokenizeError> {
        match self.bytes.get(at + 1) {
            Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'r' | b'n' | b't') => Ok(at + 2),
            Some(b'u') => {
                let digits = self.bytes.get(at + 2..at + 6);
                match digits {
                    Some(hex) if hex.iter().all(u8::is_ascii_hexdigit) => Ok(at + 6),
                    _ => Err(self.syntax(at, "invalid unicode escape")),
                }
            }
            Some(_) => Err(self.syntax(at, "invalid escape sequence")),
            None => Err(self.syntax(at, "unterminated string")),
        }
    }

    fn primitive(&mut self) -> Result<(), TokenizeError> {
        let start = self.pos;
        let mut cursor = start;
        while let Some(&byte) = self.bytes.get(cursor) {
            match byte {
                b' ' | b'\t' | b'\r' | b'\n' | b',' | b':' | b']' | b'}' => break,
                0..=0x1f | 0x7f => return Err(self.syntax(cursor, "control character in value")),
                _ => cursor += 1,
            }
        }
        self.push(TokenKind::Primitive, start, cursor)?;
        self.pos = cursor;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_tokenize_single_object_links_values_to_keys() {
        // Arrange
        let src = r#"{"label": "lock", "circular": true}"#;

        // Act
        let tokens = tokenize(src).expect("tokenize");

        // Assert
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Object,
                TokenKind::String,
                TokenKind::String,
                TokenKind::String,
                TokenKind::Primitive,
            ]
        );
        assert_eq!(tokens[0].size, 2);
        assert_eq!(tokens[1].parent, Some(0));
        assert_eq!(tokens[2].parent, Some(1));
        assert_eq!(tokens[2].text(src), "lock");
        assert_eq!(tokens[4].text(src), "true");
        assert_eq!(tokens[0].end, src.len());
    }

    #[test]
    fn test_tokenize_concatenated_objects_are_all_top_level() {
        let src = "{\"action\": \"a\"}\n{\"action\": \"b\"}\n";
        let tokens = tokenize(src).expect("tokenize");
        let roots: Vec<_> = tokens.iter().filter(|t| t.parent.is_none()).collect();
        assert_eq!(roots.len(), 2);
        assert!(roots.iter().all(|t| t.kind == TokenKind::Object));
    }

    #[test]
    fn test_tokenize_string_keeps_escapes_verbatim() {
        let src = r#"{"action": "echo \"hi\""}"#;
        let tokens = tokenize(src).expect("tokenize");
        assert_eq!(tokens[2].text(src), r#"echo \"hi\""#);
    }

    #[test]
    fn test_tokenize_with_small_capacity_reports_out_of_tokens() {
        // Arrange: 5 tokens, room for 3
        let src = r#"{"a": "b", "c": "d"}"#;

        // Act
        let result = tokenize_with_capacity(src, 3);

        // Assert
        assert_eq!(result, Err(TokenizeError::OutOfTokens { capacity: 3 }));
    }

    #[test]
    fn test_tokenize_grows_past_initial_capacity() {
        // Arrange: 60 objects × 3 tokens = 180 tokens, above the initial 100
        let src: String = (0..60).map(|i| format!("{{\"action\": \"cmd{i}\"}}\n")).collect();

        // Act
        let tokens = tokenize(&src).expect("tokenize");

        // Assert
        assert_eq!(tokens.len(), 180);
    }

    #[test]
    fn test_tokenize_rejects_unterminated_string() {
        let result = tokenize(r#"{"action": "oops}"#);
        assert!(matches!(result, Err(TokenizeError::Syntax { offset: 11, .. })));
    }

    #[test]
    fn test_tokenize_rejects_mismatched_brackets() {
        assert!(matches!(tokenize(r#"{"a": "b"]"#), Err(TokenizeError::Syntax { .. })));
        assert!(matches!(tokenize("}"), Err(TokenizeError::Syntax { .. })));
    }

    #[test]
    fn test_tokenize_rejects_missing_colon() {
        let result = tokenize(r#"{"a" "b"}"#);
        assert!(matches!(
            result,
            Err(TokenizeError::Syntax { reason: "expected ':' after object key", .. })
        ));
    }

    #[test]
    fn test_tokenize_rejects_key_without_value() {
        assert!(tokenize(r#"{"a":}"#).is_err());
        assert!(tokenize(r#"{"a"}"#).is_err());
    }

    #[test]
    fn test_tokenize_rejects_unclosed_object() {
        let result = tokenize(r#"{"a": "b""#);
        assert!(matches!(
            result,
            Err(TokenizeError::Syntax { reason: "unexpected end of input", .. })
        ));
    }

    #[test]
    fn test_tokenize_rejects_bad_escape() {
        assert!(tokenize(r#"{"a": "\q"}"#).is_err());
        assert!(tokenize(r#"{"a": "\u12"}"#).is_err());
        assert!(tokenize(r#"{"a": "é"}"#).is_ok());
    }

    #[test]
    fn test_tokenize_rejects_primitive_object_key() {
        let result = tokenize("{true: 1}");
        assert!(matches!(
            result,
            Err(TokenizeError::Syntax { reason: "object keys must be strings", .. })
        ));
    }

    #[test]
    fn test_tokenize_empty_input_yields_no_tokens() {
        assert_eq!(tokenize("").expect("tokenize"), Vec::new());
        assert_eq!(tokenize("  \n").expect("tokenize"), Vec::new());
    }

    #[test]
    fn test_tokenize_array_wrapper_parents_objects() {
        let src = r#"[{"action": "a"}, {"action": "b"}]"#;
        let tokens = tokenize(src).expect("tokenize");
        assert_eq!(tokens[0].kind, TokenKind::Array);
        assert_eq!(tokens[0].size, 2);
        assert_eq!(tokens[1].parent, Some(0));
        assert_eq!(tokens[4].parent, Some(0));
    }
}
