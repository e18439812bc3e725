//! Parser diagnostics: error codes and the append-only diagnostic sink.

mod codes;
mod error;

pub use codes::ErrorCode;
pub use error::{Diagnostic, Diagnostics};
