//! Command line tokenizer.
//!
//! A program message unit such as `SOUR:FREQ 10kHz,DEFAULT` splits into a
//! header path (`SOUR`, `FREQ`) and an argument list (`10kHz`, `DEFAULT`).
//! Tokens never copy text: each one is a byte range into the line it was
//! cut from, and the [`Tokens`] sequence borrows that line.
//!
//! # Example
//!
//! ```
//! use scpi_proto::token::{tokenize, TokenKind};
//!
//! let tokens = tokenize(b"SYST:ERR? 1,2");
//! let kinds: Vec<_> = tokens.iter().map(|t| t.kind()).collect();
//! assert_eq!(
//!     kinds,
//!     [TokenKind::Name, TokenKind::Name, TokenKind::Arg, TokenKind::Arg]
//! );
//! assert_eq!(tokens.arguments().get(1).unwrap().as_bytes(), b"2");
//! ```

use std::fmt;
use std::ops::Range;

use smallvec::SmallVec;

use crate::numeric::{parse_numeric, Numeric};

/// Inline capacity of a token sequence before it spills to the heap.
const INLINE_TOKENS: usize = 8;

/// Whether a token belongs to the header path or the argument list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// One `:`-separated element of the command header.
    Name,
    /// One `,`-separated program data element.
    Arg,
}

/// A single token: a kind plus a byte range into the tokenized line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    start: usize,
    end: usize,
}

impl Token {
    fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }

    /// Token kind.
    #[inline]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Byte range of this token within its line.
    #[inline]
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the token covers zero bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Resolve the token against the line it was produced from.
    #[inline]
    pub fn bytes<'a>(&self, line: &'a [u8]) -> &'a [u8] {
        &line[self.span()]
    }
}

/// The ordered token sequence of one program message unit.
#[derive(Clone, PartialEq, Eq)]
pub struct Tokens<'a> {
    line: &'a [u8],
    tokens: SmallVec<[Token; INLINE_TOKENS]>,
}

impl<'a> Tokens<'a> {
    /// The line these tokens view.
    #[inline]
    pub fn line(&self) -> &'a [u8] {
        self.line
    }

    /// Number of tokens (names and arguments).
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the sequence holds no tokens at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at `index`, if any.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Iterate over all tokens in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Text of the token at `index`.
    pub fn text(&self, index: usize) -> Option<&'a [u8]> {
        self.tokens.get(index).map(|t| t.bytes(self.line))
    }

    /// Header path elements, in order.
    pub fn names(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        self.tokens
            .iter()
            .take_while(|t| t.kind == TokenKind::Name)
            .map(|t| t.bytes(self.line))
    }

    /// The argument tokens only, with the header path cut off.
    pub fn arguments(&self) -> Arguments<'_> {
        let first_arg = self
            .tokens
            .iter()
            .position(|t| t.kind == TokenKind::Arg)
            .unwrap_or(self.tokens.len());
        Arguments {
            line: self.line,
            tokens: &self.tokens[first_arg..],
        }
    }
}

impl fmt::Debug for Tokens<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for token in &self.tokens {
            let text = String::from_utf8_lossy(token.bytes(self.line));
            match token.kind {
                TokenKind::Name => list.entry(&format_args!("Name({text:?})")),
                TokenKind::Arg => list.entry(&format_args!("Arg({text:?})")),
            };
        }
        list.finish()
    }
}

/// The argument list handed to a command handler.
#[derive(Debug, Clone, Copy)]
pub struct Arguments<'a> {
    line: &'a [u8],
    tokens: &'a [Token],
}

impl<'a> Arguments<'a> {
    /// An argument list with no entries.
    pub const fn empty() -> Self {
        Self {
            line: &[],
            tokens: &[],
        }
    }

    /// Number of arguments.
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether no arguments were given.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Argument at `index`, if present.
    pub fn get(&self, index: usize) -> Option<Argument<'a>> {
        self.tokens.get(index).map(|t| Argument {
            bytes: t.bytes(self.line),
        })
    }

    /// Iterate over the arguments in order.
    pub fn iter(&self) -> impl Iterator<Item = Argument<'a>> + 'a {
        let line = self.line;
        self.tokens.iter().map(move |t| Argument {
            bytes: t.bytes(line),
        })
    }
}

/// One program data element, borrowed from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argument<'a> {
    bytes: &'a [u8],
}

impl<'a> Argument<'a> {
    /// Raw bytes of the argument.
    ///
    /// Leading whitespace is already stripped; trailing bytes are kept as
    /// they appeared on the line.
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// The argument as text, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.bytes).ok()
    }

    /// The argument with trailing whitespace removed.
    pub fn trimmed(&self) -> &'a [u8] {
        self.bytes.trim_ascii_end()
    }

    /// Case-insensitive comparison with a keyword, ignoring trailing whitespace.
    pub fn eq_keyword(&self, keyword: &str) -> bool {
        self.trimmed().eq_ignore_ascii_case(keyword.as_bytes())
    }

    /// Decode the argument as a numeric value.
    ///
    /// See [`parse_numeric`] for the accepted grammar.
    pub fn numeric(&self, default: f64, min: f64, max: f64) -> Numeric<'a> {
        parse_numeric(self.bytes, default, min, max)
    }
}

/// Split a command line into header and argument tokens.
///
/// The header is split on `:` until the first space or the end of the line;
/// every segment becomes a [`TokenKind::Name`] token, empty ones included.
/// If a space was found, the rest of the line is split on `,` into
/// [`TokenKind::Arg`] tokens with leading whitespace removed. A rest that is
/// blank produces no arguments. An empty line produces no tokens.
pub fn tokenize(line: &[u8]) -> Tokens<'_> {
    let mut tokens = SmallVec::new();

    if line.is_empty() {
        return Tokens { line, tokens };
    }

    // Header path
    let mut start = 0;
    let mut args_from = None;
    for (i, &b) in line.iter().enumerate() {
        match b {
            b':' => {
                tokens.push(Token::new(TokenKind::Name, start, i));
                start = i + 1;
            }
            b' ' => {
                args_from = Some(i + 1);
                break;
            }
            _ => {}
        }
    }
    let header_end = args_from.map_or(line.len(), |from| from - 1);
    tokens.push(Token::new(TokenKind::Name, start, header_end));

    // Argument list
    if let Some(from) = args_from {
        let rest = &line[from..];
        if !rest.iter().all(u8::is_ascii_whitespace) {
            let mut seg_start = from;
            for i in from..=line.len() {
                if i == line.len() || line[i] == b',' {
                    let arg_start = line[seg_start..i]
                        .iter()
                        .position(|b| !b.is_ascii_whitespace())
                        .map_or(i, |p| seg_start + p);
                    tokens.push(Token::new(TokenKind::Arg, arg_start, i));
                    seg_start = i + 1;
                }
            }
        }
    }

    tracing::trace!(count = tokens.len(), "tokenized command");
    Tokens { line, tokens }
}
