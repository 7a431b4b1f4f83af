pub mod ast;
pub mod commands;
pub mod tokenizer;

pub use ast::{Node, NodeId, NodeKind, SyntaxTree};
pub use commands::{classify, is_recognized, CommandCategory};
pub use tokenizer::{MathDelimiter, Token, Tokenizer};

use serde::{Deserialize, Serialize};

/// Lexical category assigned to a scanned unit, for presentation.
///
/// The tokenizer never fails: a mismatched `\end` is reported through
/// [`TokenCategory::EnvironmentError`] rather than an error path, and
/// characters with no highlighting value carry no category at all
/// (`Token::category` is `None` for those).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenCategory {
    /// `%` through end of line.
    Comment,
    /// `$`, `$$`, `\[` or `\]` opening/closing a math region.
    MathDelimiter,
    /// A `\command` inside math mode.
    MathCommand,
    /// `+ - * / = < > ^ _ { } ( )` in math, `& _ ^ #` in text.
    Operator,
    /// A digit run inside math mode.
    Number,
    /// Any other single character inside math mode.
    MathLiteral,
    /// `\begin{name}` with a well-formed name.
    EnvironmentBegin,
    /// `\end{name}` matching the innermost open environment.
    EnvironmentEnd,
    /// `\end{name}` that does not match the innermost open environment.
    EnvironmentError,
    /// `\section`, `\chapter` and friends.
    StructureCommand,
    /// `\textbf`, `\emph` and friends.
    FormattingCommand,
    /// `\cite`, `\ref` and friends.
    ReferenceCommand,
    /// `\begin` or `\end` seen as a bare command.
    EnvironmentCommand,
    /// Any command outside the classifier's named buckets.
    Keyword,
    /// A single-level `{...}` argument group.
    Brace,
    /// An environment name sitting between `\begin{`/`\end{` and `}`.
    VariableName,
}
