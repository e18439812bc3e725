//! Logos-based lexer for BML expressions
//!
//! Fast tokenization using the logos crate.
//!
//! Literal disambiguation is done here, at the lexeme level: an integer
//! literal is a digit run *not* followed by `.`, `e`, or `E`, so `1.5e3` is a
//! single real literal and never integer `1` plus leftover text. The
//! lookahead set is exactly those three characters; `1x` lexes as the
//! integer `1` followed by the identifier `x`.

use logos::Logos;
use text_size::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Kind of a lexed token. `Error` marks text no rule matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Trivia
    Whitespace,
    LineComment,
    BlockComment,

    // Literals and names
    Ident,
    IntLiteral,
    RealLiteral,

    // Privileged built-in call forms; exact keyword match, never a prefix of
    // a longer identifier (maximal munch keeps `integrate_odex` an Ident).
    IntegrateOdeKw,
    IntegrateOdeCvodeKw,

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Star,
    Slash,
    Percent,
    Backslash,
    DotStar,
    DotSlash,
    Caret,
    Plus,
    Minus,
    Bang,
    Apostrophe,
    PipePipe,
    AmpAmp,
    EqEq,
    BangEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    Error,
}

impl TokenKind {
    /// Whitespace and comments: skipped before parsing.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment
        )
    }
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => TokenKind::Error,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum - maps to TokenKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    // `#` line comments are the legacy form; both are accepted.
    #[regex(r"(//|#)[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*[^/])*\*/")]
    BlockComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    // Identifiers may contain dots after the leading letter.
    #[regex(r"[a-zA-Z][a-zA-Z0-9_.]*")]
    Ident,

    // Loses to RealLiteral on `1.5`/`1e3` by maximal munch; that ordering is
    // the integer literal's negative lookahead against `.`, `e`, `E`.
    #[regex(r"[0-9]+")]
    Integer,

    #[regex(r"([0-9]+\.[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?|[0-9]+[eE][+-]?[0-9]+")]
    Real,

    // =========================================================================
    // KEYWORDS (win over Ident at equal length)
    // =========================================================================
    #[token("integrate_ode", priority = 10)]
    IntegrateOdeKw,

    #[token("integrate_ode_cvode", priority = 10)]
    IntegrateOdeCvodeKw,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION (must come before single-char)
    // =========================================================================
    #[token(".*")]
    DotStar,

    #[token("./")]
    DotSlash,

    #[token("||")]
    PipePipe,

    #[token("&&")]
    AmpAmp,

    #[token("==")]
    EqEq,

    #[token("!=")]
    BangEq,

    #[token("<=")]
    LtEq,

    #[token(">=")]
    GtEq,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("\\")]
    Backslash,
    #[token("^")]
    Caret,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("!")]
    Bang,
    #[token("'")]
    Apostrophe,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
}

impl From<LogosToken> for TokenKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            Whitespace => TokenKind::Whitespace,
            LineComment => TokenKind::LineComment,
            BlockComment => TokenKind::BlockComment,
            Ident => TokenKind::Ident,
            Integer => TokenKind::IntLiteral,
            Real => TokenKind::RealLiteral,
            IntegrateOdeKw => TokenKind::IntegrateOdeKw,
            IntegrateOdeCvodeKw => TokenKind::IntegrateOdeCvodeKw,
            DotStar => TokenKind::DotStar,
            DotSlash => TokenKind::DotSlash,
            PipePipe => TokenKind::PipePipe,
            AmpAmp => TokenKind::AmpAmp,
            EqEq => TokenKind::EqEq,
            BangEq => TokenKind::BangEq,
            LtEq => TokenKind::LtEq,
            GtEq => TokenKind::GtEq,
            LParen => TokenKind::LParen,
            RParen => TokenKind::RParen,
            LBracket => TokenKind::LBracket,
            RBracket => TokenKind::RBracket,
            Comma => TokenKind::Comma,
            Colon => TokenKind::Colon,
            Star => TokenKind::Star,
            Slash => TokenKind::Slash,
            Percent => TokenKind::Percent,
            Backslash => TokenKind::Backslash,
            Caret => TokenKind::Caret,
            Plus => TokenKind::Plus,
            Minus => TokenKind::Minus,
            Bang => TokenKind::Bang,
            Apostrophe => TokenKind::Apostrophe,
            Lt => TokenKind::Lt,
            Gt => TokenKind::Gt,
        }
    }
}
