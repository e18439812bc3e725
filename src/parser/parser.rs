//! Recursive descent parser for BML expressions
//!
//! Builds a typed expression tree directly: every grammar rule both parses
//! and type-checks, so a successful parse always yields a fully typed node.
//!
//! Control flow is explicit: each rule returns `Result<Expr, Abort>`.
//! `Abort::Backtrack` means the input did not match this alternative and the
//! caller may reset and try the next one; `Abort::Fatal` means a commit point
//! was passed (or a semantic check failed) and the failure is final. There is
//! no exception-style unwinding and backtracking cost stays bounded by the
//! ordered-choice structure of the grammar.

use text_size::TextSize;
use tracing::debug;

use super::errors::{Diagnostic, Diagnostics, ErrorCode};
use super::grammar;
use super::lexer::{Token, TokenKind, tokenize};
use crate::semantic::signatures::SignatureResolver;
use crate::semantic::symbol_table::{BlockContext, VariableMap};
use crate::syntax::Expr;

/// Parse result containing the typed expression (if one was produced) and
/// every diagnostic appended along the way.
#[derive(Debug)]
pub struct Parse {
    pub expr: Option<Expr>,
    pub errors: Vec<Diagnostic>,
}

impl Parse {
    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.expr.is_some() && self.errors.is_empty()
    }
}

/// How a failed rule propagates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Abort {
    /// The alternative did not match; the caller may try a sibling.
    Backtrack,
    /// A commit point was passed or a semantic check failed; the diagnostic
    /// is already in the sink and no sibling alternative is attempted.
    Fatal,
}

pub(crate) type ParseResult<T> = Result<T, Abort>;

/// Parse a full expression (the `||`-rooted precedence chain).
pub fn parse_expression(
    input: &str,
    symbols: &VariableMap,
    functions: &dyn SignatureResolver,
    context: BlockContext,
) -> Parse {
    run(input, symbols, functions, context, grammar::expression)
}

/// Parse a term (the multiplicative precedence level and everything tighter).
/// This is the entry the enclosing additive grammar calls.
pub fn parse_term(
    input: &str,
    symbols: &VariableMap,
    functions: &dyn SignatureResolver,
    context: BlockContext,
) -> Parse {
    run(input, symbols, functions, context, grammar::term)
}

fn run(
    input: &str,
    symbols: &VariableMap,
    functions: &dyn SignatureResolver,
    context: BlockContext,
    rule: fn(&mut Parser<'_>) -> ParseResult<Expr>,
) -> Parse {
    debug!(?context, len = input.len(), "parsing expression");
    let mut parser = Parser::new(input, symbols, functions, context);
    let result = rule(&mut parser);
    parser.finish(result)
}

/// The parser state
pub(crate) struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    end: TextSize,
    pub(crate) symbols: &'a VariableMap,
    pub(crate) functions: &'a dyn SignatureResolver,
    pub(crate) context: BlockContext,
    pub(crate) diagnostics: Diagnostics,
}

impl<'a> Parser<'a> {
    fn new(
        input: &'a str,
        symbols: &'a VariableMap,
        functions: &'a dyn SignatureResolver,
        context: BlockContext,
    ) -> Self {
        // The skipper also covers comments, so adjacency between significant
        // tokens is decided before the grammar runs.
        let tokens = tokenize(input)
            .into_iter()
            .filter(|t| !t.kind.is_trivia())
            .collect();
        Self {
            tokens,
            pos: 0,
            end: TextSize::of(input),
            symbols,
            functions,
            context,
            diagnostics: Diagnostics::new(),
        }
    }

    fn finish(mut self, result: ParseResult<Expr>) -> Parse {
        let expr = match result {
            Ok(expr) => {
                if !self.at_eof() {
                    let offset = self.current_offset();
                    self.report(offset, ErrorCode::E0206, "unexpected input after the expression");
                    None
                } else {
                    Some(expr)
                }
            }
            Err(Abort::Backtrack) => {
                let offset = self.current_offset();
                self.report(offset, ErrorCode::E0205, "expected an expression");
                None
            }
            Err(Abort::Fatal) => None,
        };
        Parse {
            expr,
            errors: self.diagnostics.into_vec(),
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    pub(crate) fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    pub(crate) fn current_kind(&self) -> Option<TokenKind> {
        self.current().map(|t| t.kind)
    }

    pub(crate) fn current_text(&self) -> &'a str {
        self.current().map(|t| t.text).unwrap_or("")
    }

    /// Offset of the current token, or of end-of-input.
    pub(crate) fn current_offset(&self) -> TextSize {
        self.current().map(|t| t.offset).unwrap_or(self.end)
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current_kind() == Some(kind)
    }

    /// Kind of the nth token ahead (0 = current).
    pub(crate) fn nth_kind(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    // =========================================================================
    // Token consumption and backtracking
    // =========================================================================

    pub(crate) fn bump(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Committed expectation: missing `kind` is a hard parse error, never a
    /// backtrack opportunity.
    pub(crate) fn expect(
        &mut self,
        kind: TokenKind,
        code: ErrorCode,
        message: impl Into<String>,
    ) -> ParseResult<()> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.fatal(self.current_offset(), code, message))
        }
    }

    /// Position marker for ordered-choice backtracking. Diagnostics are not
    /// rolled back; appends from a discarded alternative are informational.
    pub(crate) fn mark(&self) -> usize {
        self.pos
    }

    pub(crate) fn reset(&mut self, mark: usize) {
        self.pos = mark;
    }

    // =========================================================================
    // Error reporting
    // =========================================================================

    pub(crate) fn report(&mut self, offset: TextSize, code: ErrorCode, message: impl Into<String>) {
        self.diagnostics.report(offset, code, message);
    }

    /// Report and return the hard-failure abort.
    pub(crate) fn fatal(
        &mut self,
        offset: TextSize,
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Abort {
        self.report(offset, code, message);
        Abort::Fatal
    }
}
