//! Command classification policy.
//!
//! Two independent vocabularies live here:
//!
//! - the small category buckets used by the tokenizer to pick a
//!   highlighting style for a command, and
//! - the larger recognized-command vocabulary used by the command
//!   diagnostic pass to flag potentially undefined commands.
//!
//! Both are fixed at compile time and never mutated, so they are safe to
//! share across threads without locking.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Semantic bucket for a command name, used to pick a token category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandCategory {
    /// Sectioning commands: `\section`, `\chapter`, ...
    Structure,
    /// Text formatting: `\textbf`, `\emph`, ...
    Formatting,
    /// Math operators and symbols: `\frac`, `\sum`, ...
    Math,
    /// Cross references and citations: `\cite`, `\ref`, ...
    Reference,
    /// `\begin` and `\end`.
    Environment,
    /// Everything else.
    Keyword,
}

const STRUCTURE: &[&str] = &["section", "subsection", "chapter", "paragraph", "subparagraph"];
const FORMATTING: &[&str] = &["textbf", "textit", "underline", "emph", "textsc", "texttt"];
const MATH: &[&str] = &["frac", "sum", "int", "prod", "lim", "infty", "partial"];
// `herf` is intentional: documents and themes in the wild rely on it
// being highlighted as a reference command, so it stays next to the
// correctly spelled names.
const REFERENCE: &[&str] = &["cite", "ref", "herf", "pageref", "footnote"];
const ENVIRONMENT: &[&str] = &["begin", "end"];

/// Maps a command name (without the leading backslash) to its category.
///
/// Total and deterministic: any name outside the named buckets falls
/// back to [`CommandCategory::Keyword`].
pub fn classify(name: &str) -> CommandCategory {
    if STRUCTURE.contains(&name) {
        CommandCategory::Structure
    } else if FORMATTING.contains(&name) {
        CommandCategory::Formatting
    } else if MATH.contains(&name) {
        CommandCategory::Math
    } else if REFERENCE.contains(&name) {
        CommandCategory::Reference
    } else if ENVIRONMENT.contains(&name) {
        CommandCategory::Environment
    } else {
        CommandCategory::Keyword
    }
}

/// Commands accepted by the command diagnostic pass without complaint.
///
/// Spans core structure, lengths, Greek letters, relations, common math
/// functions and a handful of package commands. Deliberately incomplete;
/// the pass it backs is advisory.
const VOCABULARY: &[&str] = &[
    "section", "subsection", "textbf", "textit", "underline", "emph",
    "begin", "end", "item", "label", "ref", "cite", "usepackage",
    "documentclass", "title", "author", "date", "maketitle",
    "includegraphics", "footnote", "caption", "frac", "sum", "int",
    "textwidth", "linewidth", "columnwidth", "paperwidth", "height", "width",
    "textheight", "columnheight", "paperheight", "baselineskip",
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta",
    "iota", "kappa", "lambda", "mu", "nu", "xi", "pi", "rho", "sigma",
    "tau", "upsilon", "phi", "chi", "psi", "omega", "leq", "geq", "neq",
    "cdot", "ldots", "dots", "to", "left", "right", "sqrt", "pm", "times", "div",
    "le", "ge", "approx", "equiv", "partial", "infty", "forall", "exists", "nabla",
    "sin", "cos", "tan", "log", "ln", "exp", "lim", "max", "min", "sup", "inf",
    "centering", "hline", "href", "LaTeX", "cdots", "mathcal", "verb",
    "bibliographystyle", "bibliography", "url", "text",
    "textcolor", "addplot", "in", "mathbb",
];

static RECOGNIZED: Lazy<HashSet<&'static str>> =
    Lazy::new(|| VOCABULARY.iter().copied().collect());

/// Membership test against the recognized-command vocabulary.
pub fn is_recognized(name: &str) -> bool {
    RECOGNIZED.contains(name)
}
