//! # Lintex Analysis
//!
//! Structural diagnostics for LaTeX-like documents.
//!
//! ## Overview
//!
//! Three independent passes scan the raw document text:
//!
//! - [`math::check_math`] — math-like expressions outside any
//!   recognized math region
//! - [`environments::check_environments`] — unmatched `\begin`/`\end`
//!   pairs
//! - [`commands::check_commands`] — unclosed brace arguments and
//!   commands outside the recognized vocabulary
//!
//! Every pass is a pure function of the text, never fails, and keeps
//! scanning past anything it reports. [`session::analyze`] runs all
//! three, builds the syntax tree and collects document statistics into
//! one [`Analysis`](session::Analysis) bundle.
//!
//! Diagnostics are advisory values, not errors: even maximally
//! malformed input produces a complete bundle.
//!
//! ## Ordering contract
//!
//! The session concatenates pass outputs math-pass-first, environment
//! pass second, command pass third. Within a pass, diagnostics appear
//! in document order. The sequence is pass-grouped, not globally sorted
//! by position.

pub mod commands;
pub mod environments;
pub mod math;
pub mod session;

pub use session::{analyze, Analysis, Statistics};

use serde::{Deserialize, Serialize};

/// Which pass produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// A math-like expression found outside a recognized math region.
    MathMode,
    /// An unmatched `\begin` or `\end`.
    Environment,
    /// An unterminated brace argument.
    Command,
    /// A command name outside the recognized vocabulary.
    UnknownCommand,
}

/// A single advisory finding. All fields are directly displayable; the
/// presentation layer is expected to render `message`, `explanation`
/// and `suggestion` inline at `line`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// 1-based line number.
    pub line: usize,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Byte offsets into the document, when the pass can pin them down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<(usize, usize)>,
}

/// 1-based line number of the byte offset `end` (counting newlines up
/// to and including the offset).
pub(crate) fn line_of(text: &str, end: usize) -> usize {
    text.as_bytes()[..end].iter().filter(|b| **b == b'\n').count() + 1
}
