//! Tokenization for template engine
//!
//! One forward pass recognises every directive and placeholder. Text that
//! only looks like a tag (`body { color: red }`, an unknown keyword, an
//! unterminated `{include`) is not a token and stays in the output as-is.

use crate::template::binding::is_identifier_char;

/// Token classification
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    /// {$key} or {$nested.key}
    Placeholder { path: String },

    /// {include file='path'}
    Include { file: String },

    /// {set var='name' value='literal'}
    Set { var: String, value: String },

    /// {capture name='name'}
    CaptureStart { name: String },

    /// {/capture}
    CaptureEnd,

    /// {* ... *}
    Comment,
}

/// A single recognised tag with position and classification
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    /// Token classification
    pub kind: TokenKind,
    /// Absolute byte position of the opening `{`
    pub start: usize,
    /// Total length in bytes including both delimiters
    pub length: usize,
    /// Line number where the token starts (for error messages)
    pub line: usize,
}

impl Token {
    /// Byte position just past the closing delimiter
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// Raw source text of the token
    pub fn raw<'t>(&self, text: &'t str) -> &'t str {
        &text[self.start..self.end()]
    }
}

/// Tokenization state machine
///
/// ```text
/// Normal ──{──> SeenLBrace ──$ / alpha──> InTag ──}──> [classify] → Normal
///                   │                       │
///                   │                       └── { or \n ──> Normal (reprocess)
///                   └──*──> InComment ──*──> SeenStar ──}──> [Comment] → Normal
/// ```
///
/// An unterminated `{*` is rescanned as plain text, and no later `{*` is
/// treated as a comment: if one comment never closes, none after it can.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ScanState {
    /// Regular text
    Normal,

    /// Seen `{`, next byte decides whether a tag starts
    SeenLBrace { pos: usize, line: usize },

    /// Inside `{...`, scanning for `}` on the same line
    InTag { start: usize, line: usize },

    /// Inside `{* ...`, scanning for `*}`
    InComment { start: usize, line: usize },

    /// Seen `*` inside a comment, checking for `}`
    SeenStar { start: usize, line: usize },
}

/// Iterator over tokens in a template string
pub(crate) struct TokenStream<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    state: ScanState,
    line: usize,
    comments_closed: bool,
}

impl<'a> TokenStream<'a> {
    /// Create a new TokenStream from template text
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            state: ScanState::Normal,
            line: 1,
            comments_closed: true,
        }
    }

    /// Classify the text between `{` and `}`
    ///
    /// Returns `None` when the content is not a directive we know.
    fn classify_content(content: &str) -> Option<TokenKind> {
        if let Some(path) = content.strip_prefix('$') {
            return Some(TokenKind::Placeholder {
                path: path.trim().to_string(),
            });
        }

        if let Some(rest) = content.strip_prefix('/') {
            return match rest.trim() {
                "capture" => Some(TokenKind::CaptureEnd),
                _ => None,
            };
        }

        let keyword_end = content
            .find(|c: char| !is_identifier_char(c))
            .unwrap_or(content.len());
        let (keyword, rest) = content.split_at(keyword_end);
        let attrs = parse_attributes(rest)?;

        match keyword {
            "include" => Some(TokenKind::Include {
                file: attrs.get("file")?,
            }),
            "set" => Some(TokenKind::Set {
                var: attrs.get("var")?,
                value: attrs.get("value")?,
            }),
            "capture" => Some(TokenKind::CaptureStart {
                name: attrs.get("name")?,
            }),
            _ => None,
        }
    }

    fn process_normal(&mut self, byte: u8) {
        match byte {
            b'{' => {
                self.state = ScanState::SeenLBrace {
                    pos: self.pos,
                    line: self.line,
                }
            }
            b'\n' => self.line += 1,
            _ => {}
        }
        self.pos += 1;
    }

    /// Leaves `pos` untouched when the byte must be reprocessed as text
    fn process_seen_lbrace(&mut self, byte: u8, pos: usize, line: usize) {
        match byte {
            b'*' if self.comments_closed => {
                self.state = ScanState::InComment { start: pos, line };
            }
            b'$' | b'/' => {
                self.state = ScanState::InTag { start: pos, line };
            }
            b if b.is_ascii_alphabetic() => {
                self.state = ScanState::InTag { start: pos, line };
            }
            _ => {
                self.state = ScanState::Normal;
                return;
            }
        }
        self.pos += 1;
    }

    fn process_in_tag(&mut self, byte: u8, start: usize, line: usize) -> Option<Token> {
        match byte {
            b'}' => {
                self.state = ScanState::Normal;
                self.pos += 1;
                let content = &self.text[start + 1..self.pos - 1];
                Self::classify_content(content).map(|kind| Token {
                    kind,
                    start,
                    length: self.pos - start,
                    line,
                })
            }
            // Tags never span lines or nest; drop back and rescan this byte
            b'{' | b'\n' => {
                self.state = ScanState::Normal;
                None
            }
            _ => {
                self.pos += 1;
                None
            }
        }
    }

    fn process_in_comment(&mut self, byte: u8, start: usize, line: usize) {
        if byte == b'*' {
            self.state = ScanState::SeenStar { start, line };
        } else if byte == b'\n' {
            self.line += 1;
        }
        self.pos += 1;
    }

    fn process_seen_star(&mut self, byte: u8, start: usize, line: usize) -> Option<Token> {
        match byte {
            b'}' => {
                self.state = ScanState::Normal;
                self.pos += 1;
                Some(Token {
                    kind: TokenKind::Comment,
                    start,
                    length: self.pos - start,
                    line,
                })
            }
            b'*' => {
                self.pos += 1;
                None
            }
            _ => {
                self.state = ScanState::InComment { start, line };
                None
            }
        }
    }

    /// Rewind to just after an unterminated `{*` and scan it as text
    fn recover_unclosed_comment(&mut self, start: usize, line: usize) {
        self.comments_closed = false;
        self.pos = start + 1;
        self.line = line;
        self.state = ScanState::Normal;
    }
}

impl<'a> Iterator for TokenStream<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if self.pos >= self.bytes.len() {
                match self.state {
                    ScanState::InComment { start, line } | ScanState::SeenStar { start, line } => {
                        self.recover_unclosed_comment(start, line);
                        continue;
                    }
                    _ => return None,
                }
            }

            let byte = self.bytes[self.pos];
            #[cfg(test)]
            test_counter::inc();

            let token = match self.state {
                ScanState::Normal => {
                    self.process_normal(byte);
                    None
                }
                ScanState::SeenLBrace { pos, line } => {
                    self.process_seen_lbrace(byte, pos, line);
                    None
                }
                ScanState::InTag { start, line } => self.process_in_tag(byte, start, line),
                ScanState::InComment { start, line } => {
                    self.process_in_comment(byte, start, line);
                    None
                }
                ScanState::SeenStar { start, line } => self.process_seen_star(byte, start, line),
            };

            if token.is_some() {
                return token;
            }
        }
    }
}

/// Parsed `key='value'` attributes of a directive
#[derive(Debug, Default, PartialEq)]
pub(crate) struct Attributes {
    pairs: Vec<(String, String)>,
}

impl Attributes {
    /// First value for `key`
    pub fn get(&self, key: &str) -> Option<String> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}

/// Parse whitespace separated `key='value'` / `key="value"` pairs
///
/// Returns `None` if anything other than well-formed pairs is present.
pub(crate) fn parse_attributes(input: &str) -> Option<Attributes> {
    let mut attrs = Attributes::default();
    let mut rest = input.trim_start();

    while !rest.is_empty() {
        let key_end = rest.find(|c: char| !is_identifier_char(c))?;
        if key_end == 0 {
            return None;
        }
        let key = &rest[..key_end];
        let after_key = rest[key_end..].trim_start();
        let after_eq = after_key.strip_prefix('=')?.trim_start();

        let quote = after_eq.chars().next().filter(|c| *c == '\'' || *c == '"')?;
        let body = &after_eq[1..];
        let close = body.find(quote)?;

        attrs
            .pairs
            .push((key.to_string(), body[..close].to_string()));
        rest = body[close + 1..].trim_start();
    }

    Some(attrs)
}

/// Test-only step counter for linear-time verification
///
/// Thread-local so parallel tests do not interfere.
#[cfg(test)]
pub(crate) mod test_counter {
    use std::cell::Cell;

    thread_local! {
        static TEST_STEP_COUNTER: Cell<usize> = const { Cell::new(0) };
    }

    pub(crate) fn reset() {
        TEST_STEP_COUNTER.with(|c| c.set(0));
    }

    pub(crate) fn get() -> usize {
        TEST_STEP_COUNTER.with(|c| c.get())
    }

    pub(crate) fn inc() {
        TEST_STEP_COUNTER.with(|c| c.set(c.get() + 1));
    }
}
