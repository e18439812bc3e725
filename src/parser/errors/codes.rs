//! Error code definitions for parser diagnostics
//!
//! Error codes follow a naming convention: E{category}{number}
//! - E01xx: Lexical errors (invalid characters, malformed literals)
//! - E02xx: Structural errors (parentheses, brackets, missing expressions)
//! - E03xx: Call errors (unknown functions, malformed argument lists)
//! - E04xx: Type errors (operand kinds, indexing, transpose)
//! - E05xx: Name errors (unknown variables)
//! - E06xx: Provenance errors (data-only violations)

use std::fmt;

/// Error codes for parser diagnostics
///
/// Each code represents a specific category of failure, enabling filtering
/// and stable assertions in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // E01xx: Lexical errors
    // =========================================================================
    /// Invalid or unexpected character in source
    E0101,
    /// Invalid numeric literal
    E0102,

    // =========================================================================
    // E02xx: Structural errors
    // =========================================================================
    /// Expected `(`
    E0201,
    /// Expected `)`
    E0202,
    /// Expected `]`
    E0203,
    /// Expected `,`
    E0204,
    /// Expected an expression
    E0205,
    /// Unexpected input after the expression
    E0206,

    // =========================================================================
    // E03xx: Call errors
    // =========================================================================
    /// Unknown function or no matching signature
    E0301,
    /// Malformed argument list
    E0302,
    /// Invalid ODE system function
    E0303,
    /// Function not callable in the current block
    E0304,

    // =========================================================================
    // E04xx: Type errors
    // =========================================================================
    /// Operand type mismatch
    E0401,
    /// Invalid index expression type
    E0402,
    /// Too many indexes for the expression's dimensionality
    E0403,
    /// Invalid transpose target
    E0404,
    /// Invalid ODE argument type
    E0405,

    // =========================================================================
    // E05xx: Name errors
    // =========================================================================
    /// Unknown variable
    E0501,

    // =========================================================================
    // E06xx: Provenance errors
    // =========================================================================
    /// Data-only violation
    E0601,
}

impl ErrorCode {
    /// Default message when a call site does not provide a specific one.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::E0101 => "invalid character",
            ErrorCode::E0102 => "invalid numeric literal",
            ErrorCode::E0201 => "expected `(`",
            ErrorCode::E0202 => "expected `)`",
            ErrorCode::E0203 => "expected `]`",
            ErrorCode::E0204 => "expected `,`",
            ErrorCode::E0205 => "expected an expression",
            ErrorCode::E0206 => "unexpected input after the expression",
            ErrorCode::E0301 => "unknown function",
            ErrorCode::E0302 => "malformed argument list",
            ErrorCode::E0303 => "invalid ODE system function",
            ErrorCode::E0304 => "function not callable in this block",
            ErrorCode::E0401 => "operand type mismatch",
            ErrorCode::E0402 => "invalid index expression type",
            ErrorCode::E0403 => "too many indexes",
            ErrorCode::E0404 => "invalid transpose target",
            ErrorCode::E0405 => "invalid ODE argument type",
            ErrorCode::E0501 => "unknown variable",
            ErrorCode::E0601 => "data-only violation",
        }
    }

    /// Category prefix, e.g. `"type"` for E04xx.
    pub fn category(&self) -> &'static str {
        match self {
            ErrorCode::E0101 | ErrorCode::E0102 => "lexical",
            ErrorCode::E0201
            | ErrorCode::E0202
            | ErrorCode::E0203
            | ErrorCode::E0204
            | ErrorCode::E0205
            | ErrorCode::E0206 => "structural",
            ErrorCode::E0301 | ErrorCode::E0302 | ErrorCode::E0303 | ErrorCode::E0304 => "call",
            ErrorCode::E0401
            | ErrorCode::E0402
            | ErrorCode::E0403
            | ErrorCode::E0404
            | ErrorCode::E0405 => "type",
            ErrorCode::E0501 => "name",
            ErrorCode::E0601 => "provenance",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
