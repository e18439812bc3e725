//! Diagnostics: positioned, coded error messages and the append-only sink
//! they accumulate in.
//!
//! The sink is shared by every grammar rule for the duration of a parse and
//! is consumed at the end of compilation. Rules only ever append; entries
//! written by an alternative that later failed and was backtracked over stay
//! in the sink as informational context, exactly as the surrounding compiler
//! expects.

use text_size::TextSize;

use super::codes::ErrorCode;

/// A single diagnostic: where, what category, and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Byte offset into the source the diagnostic points at.
    pub offset: TextSize,
    /// Categorized error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
}

impl Diagnostic {
    pub fn new(offset: TextSize, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            offset,
            code,
            message: message.into(),
        }
    }

    /// Format the diagnostic for display.
    pub fn format(&self) -> String {
        format!("{}: {} (at offset {})", self.code, self.message, u32::from(self.offset))
    }
}

/// Append-only ordered sequence of diagnostics.
///
/// No component may clear or reorder prior entries; the only mutation is
/// [`Diagnostics::report`].
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one diagnostic. Entries keep their insertion order.
    pub fn report(&mut self, offset: TextSize, code: ErrorCode, message: impl Into<String>) {
        self.entries.push(Diagnostic::new(offset, code, message));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Consume the sink, yielding entries in report order.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_preserves_order() {
        let mut sink = Diagnostics::new();
        sink.report(TextSize::new(5), ErrorCode::E0401, "first");
        sink.report(TextSize::new(2), ErrorCode::E0501, "second");
        let entries = sink.into_vec();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "first");
        assert_eq!(entries[1].message, "second");
        assert_eq!(entries[1].offset, TextSize::new(2));
    }

    #[test]
    fn test_format() {
        let d = Diagnostic::new(TextSize::new(3), ErrorCode::E0501, "variable `y` does not exist");
        assert!(d.format().contains("E0501"));
        assert!(d.format().contains("`y`"));
    }
}
