//! Parser: Logos lexer, recursive-descent grammar, diagnostics.

pub mod errors;
pub mod lexer;
mod grammar;
#[allow(clippy::module_inception)]
mod parser;

pub use errors::{Diagnostic, Diagnostics, ErrorCode};
pub use lexer::{Lexer, Token, TokenKind, tokenize};
pub use parser::{Parse, parse_expression, parse_term};
