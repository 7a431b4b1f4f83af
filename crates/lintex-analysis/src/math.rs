//! Math-boundary pass: subscript/superscript expressions that sit
//! outside every recognized math region.

use crate::{line_of, Diagnostic, DiagnosticKind};
use once_cell::sync::Lazy;
use regex::Regex;

static DISPLAY_MATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\$\$.*?\$\$").unwrap());
static BRACKET_MATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\\\[.*?\\\]").unwrap());

/// Environments whose body is math, with optional starred variants.
static MATH_ENV_BEGIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\\begin\{(equation\*?|align\*?|gather\*?|multline\*?|eqnarray\*?|flalign\*?|alignat\*?|math|displaymath)\}",
    )
    .unwrap()
});

/// `x_1`, `a^n` and friends: an identifier split by `_` or `^`.
static SCRIPTED_IDENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([a-zA-Z][a-zA-Z0-9]*_[a-zA-Z0-9]+|[a-zA-Z][a-zA-Z0-9]*\^[a-zA-Z0-9]+)\b")
        .unwrap()
});

/// Reference-like commands just before the match suppress it; `fig_1`
/// inside `\ref{...}` is a label, not math.
static REFERENCE_BEFORE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(label|ref|cite|href|pageref|url|input|include)\s*\{?$").unwrap()
});

/// Scans for math-like expressions outside any recognized math region.
///
/// Recognized regions are inline `$...$`, display `$$...$$`, bracket
/// `\[...\]` and the math-family environments with identically named
/// `\begin`/`\end` tags. Matches inside any of those are silent.
///
/// The exclusion rules are deliberately broad: a match whose trailing
/// part (after the `_`/`^`) contains letters reads as an ordinary
/// identifier like `page_size` and is suppressed. In practice only bare
/// `x_1`-style tokens survive.
pub fn check_math(text: &str) -> Vec<Diagnostic> {
    let ranges = math_ranges(text);
    let in_math = |pos: usize| ranges.iter().any(|&(start, end)| pos >= start && pos < end);

    let mut diagnostics = Vec::new();
    for m in SCRIPTED_IDENT.find_iter(text) {
        if in_math(m.start()) {
            continue;
        }
        if reference_before(text, m.start()) {
            continue;
        }
        if is_plain_identifier(m.as_str()) {
            continue;
        }

        diagnostics.push(Diagnostic {
            kind: DiagnosticKind::MathMode,
            line: line_of(text, m.end()),
            message: "Math expression should be enclosed in $...$".to_string(),
            explanation: None,
            suggestion: Some(format!("% CORRECT:\n${}$", m.as_str())),
            range: Some((m.start(), m.end())),
        });
    }
    diagnostics
}

/// Byte ranges of every recognized math region. Ranges may overlap;
/// only membership matters.
fn math_ranges(text: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();

    inline_ranges(text, &mut ranges);
    for m in DISPLAY_MATH.find_iter(text) {
        ranges.push((m.start(), m.end()));
    }
    for m in BRACKET_MATH.find_iter(text) {
        ranges.push((m.start(), m.end()));
    }
    math_environment_ranges(text, &mut ranges);

    ranges
}

/// `$...$` spans: a `$` not followed by another `$`, up to the next `$`.
fn inline_ranges(text: &str, ranges: &mut Vec<(usize, usize)>) {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'$' && bytes.get(i + 1) != Some(&b'$') {
            if let Some(off) = text[i + 1..].find('$') {
                let end = i + 1 + off + 1;
                ranges.push((i, end));
                i = end;
                continue;
            }
        }
        i += 1;
    }
}

/// `\begin{X}...\end{X}` spans for math-family `X`. The closing tag must
/// repeat the opening name exactly, so this is a scan rather than one
/// regex.
fn math_environment_ranges(text: &str, ranges: &mut Vec<(usize, usize)>) {
    let mut at = 0;
    while let Some(caps) = MATH_ENV_BEGIN.captures_at(text, at) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        let closing = format!("\\end{{{}}}", name.as_str());
        match text[whole.end()..].find(&closing) {
            Some(off) => {
                let end = whole.end() + off + closing.len();
                ranges.push((whole.start(), end));
                at = end;
            }
            None => at = whole.end(),
        }
    }
}

fn reference_before(text: &str, start: usize) -> bool {
    let mut from = start.saturating_sub(20);
    while !text.is_char_boundary(from) {
        from += 1;
    }
    REFERENCE_BEFORE.is_match(&text[from..start])
}

/// True when the match reads as an ordinary identifier rather than a
/// formula: either letters and underscores only, or letters after the
/// `_`/`^` (as in `page_size` or `a^n`).
fn is_plain_identifier(m: &str) -> bool {
    if m.chars().all(|c| c.is_ascii_alphabetic() || c == '_') {
        return true;
    }
    match m.find(['_', '^']) {
        Some(op) => m[op + 1..].chars().any(|c| c.is_ascii_alphabetic()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_subscript_outside_math() {
        let diagnostics = check_math("x_1 is a variable");
        assert_eq!(diagnostics.len(), 1);
        let d = &diagnostics[0];
        assert_eq!(d.kind, DiagnosticKind::MathMode);
        assert_eq!(d.line, 1);
        assert_eq!(d.suggestion.as_deref(), Some("% CORRECT:\n$x_1$"));
        assert_eq!(d.range, Some((0, 3)));
    }

    #[test]
    fn test_inline_math_is_silent() {
        assert!(check_math("$x_1$ is fine").is_empty());
    }

    #[test]
    fn test_display_math_is_silent() {
        assert!(check_math("$$x_1$$").is_empty());
        assert!(check_math(r"\[x_1\]").is_empty());
    }

    #[test]
    fn test_math_environment_is_silent() {
        assert!(check_math("\\begin{equation}\nx_1\n\\end{equation}").is_empty());
        assert!(check_math("\\begin{align*}x_1\\end{align*}").is_empty());
    }

    #[test]
    fn test_mismatched_environment_names_do_not_shield() {
        // The closing tag must repeat the opening name; `x_1` here is
        // outside any recognized region.
        let diagnostics = check_math("\\begin{align}x_1\\end{equation}");
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_reference_arguments_are_suppressed() {
        assert!(check_math(r"see \ref{fig_1}").is_empty());
        assert!(check_math(r"see \label{sec_2}").is_empty());
        assert!(check_math(r"\include{ch_1}").is_empty());
    }

    #[test]
    fn test_plain_identifiers_are_suppressed() {
        assert!(check_math("set page_size first").is_empty());
        assert!(check_math("foo_bar").is_empty());
        assert!(check_math("a^n grows").is_empty());
    }

    #[test]
    fn test_line_numbers_are_one_based() {
        let diagnostics = check_math("first line\nsecond x_1 line");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 2);
    }

    #[test]
    fn test_superscript_with_digits() {
        let diagnostics = check_math("a^2 should be math");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].suggestion.as_deref(), Some("% CORRECT:\n$a^2$"));
    }

    #[test]
    fn test_pass_is_idempotent() {
        let input = "x_1 and a^2\nplus page_size";
        assert_eq!(check_math(input), check_math(input));
    }
}
