use crate::commands::{classify, CommandCategory};
use crate::TokenCategory;
use serde::Serialize;

/// Which delimiter opened the current math region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MathDelimiter {
    /// Inline math: `$ ... $`
    Dollar,
    /// Display math: `$$ ... $$`
    DoubleDollar,
    /// Display math: `\[ ... \]`
    Bracket,
}

impl MathDelimiter {
    fn closing(self) -> &'static str {
        match self {
            MathDelimiter::Dollar => "$",
            MathDelimiter::DoubleDollar => "$$",
            MathDelimiter::Bracket => "\\]",
        }
    }
}

/// A classified lexical unit. `category` is `None` for characters that
/// carry no highlighting (skipped by the presentation layer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    pub text: &'a str,
    /// Byte offset of the first byte of the token.
    pub start: usize,
    /// Byte offset one past the last byte of the token.
    pub end: usize,
    pub category: Option<TokenCategory>,
}

/// A mode-aware tokenizer for LaTeX source code.
///
/// ## Overview
///
/// The tokenizer scans the document left to right, one token per
/// [`next_token`](Tokenizer::next_token) call, and classifies each unit
/// for presentation. Unlike a plain lexer it carries state:
///
/// - **Math mode**: entered by `$`, `$$` or `\[`, left only by the exact
///   delimiter that opened the region. Inside math the lexical rules
///   change (commands, operators, digit runs, literals).
/// - **Environment stack**: `\begin{name}` pushes, `\end{name}` pops. A
///   pop that does not match yields [`TokenCategory::EnvironmentError`].
///   This matching is best effort for inline annotation only; the
///   environment diagnostic pass performs the authoritative check.
///
/// ## Failure semantics
///
/// There is no error path. Every byte of the input is consumed; bytes
/// with no lexical interest are emitted with `category: None`.
///
/// ## Examples
///
/// ```
/// use lintex_syntax::{TokenCategory, Tokenizer};
///
/// let tokens: Vec<_> = Tokenizer::new("$x+1$").collect();
/// let cats: Vec<_> = tokens.iter().map(|t| t.category).collect();
/// assert_eq!(
///     cats,
///     vec![
///         Some(TokenCategory::MathDelimiter),
///         Some(TokenCategory::MathLiteral),
///         Some(TokenCategory::Operator),
///         Some(TokenCategory::Number),
///         Some(TokenCategory::MathDelimiter),
///     ]
/// );
/// ```
pub struct Tokenizer<'a> {
    input: &'a str,
    position: usize,
    in_math: bool,
    math_delimiter: Option<MathDelimiter>,
    environment_stack: Vec<String>,
}

const MATH_OPERATORS: &str = "+-*/=<>^_{}()";
const TEXT_OPERATORS: &str = "&_^#";

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer with fresh state. Nothing is shared between
    /// runs; tokenizing the same document twice gives the same stream.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            in_math: false,
            math_delimiter: None,
            environment_stack: Vec::new(),
        }
    }

    /// Names of environments whose `\begin` has been consumed but whose
    /// matching `\end` has not.
    pub fn open_environments(&self) -> &[String] {
        &self.environment_stack
    }

    /// Returns the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Option<Token<'a>> {
        if self.position >= self.input.len() {
            return None;
        }

        let start = self.position;
        let rest = &self.input[start..];

        // Comments win over everything, including math mode.
        if rest.starts_with('%') {
            self.consume_comment();
            return Some(self.token(start, Some(TokenCategory::Comment)));
        }

        if !self.in_math {
            if let Some(delim) = self.try_enter_math(rest) {
                self.in_math = true;
                self.math_delimiter = Some(delim);
                return Some(self.token(start, Some(TokenCategory::MathDelimiter)));
            }
        } else {
            return Some(self.math_token(start, rest));
        }

        if let Some((name, len)) = match_env_tag(rest, "\\begin{") {
            self.environment_stack.push(name.to_string());
            self.position += len;
            return Some(self.token(start, Some(TokenCategory::EnvironmentBegin)));
        }

        if let Some((name, len)) = match_env_tag(rest, "\\end{") {
            self.position += len;
            let category = match self.environment_stack.pop() {
                Some(open) if open == name => TokenCategory::EnvironmentEnd,
                _ => TokenCategory::EnvironmentError,
            };
            return Some(self.token(start, Some(category)));
        }

        if let Some(len) = command_len(rest) {
            self.position += len;
            let category = match classify(&rest[1..len]) {
                CommandCategory::Structure => TokenCategory::StructureCommand,
                CommandCategory::Formatting => TokenCategory::FormattingCommand,
                CommandCategory::Math => TokenCategory::MathCommand,
                CommandCategory::Reference => TokenCategory::ReferenceCommand,
                CommandCategory::Environment => TokenCategory::EnvironmentCommand,
                CommandCategory::Keyword => TokenCategory::Keyword,
            };
            return Some(self.token(start, Some(category)));
        }

        let first = rest.chars().next().unwrap_or_default();

        if TEXT_OPERATORS.contains(first) {
            self.position += first.len_utf8();
            return Some(self.token(start, Some(TokenCategory::Operator)));
        }

        // Single-level argument group. Groups do not cross lines: the
        // token stream stays line-local for the presentation layer.
        if first == '{' {
            if let Some(len) = brace_group_len(rest) {
                self.position += len;
                return Some(self.token(start, Some(TokenCategory::Brace)));
            }
        }

        // An environment name left dangling right after `\begin{` or
        // `\end{` still gets highlighted.
        if let Some(len) = ident_before_rbrace(rest) {
            let before = &self.input[..start];
            if before.ends_with("\\begin{") || before.ends_with("\\end{") {
                self.position += len;
                return Some(self.token(start, Some(TokenCategory::VariableName)));
            }
        }

        self.position += first.len_utf8();
        Some(self.token(start, None))
    }

    fn token(&self, start: usize, category: Option<TokenCategory>) -> Token<'a> {
        Token {
            text: &self.input[start..self.position],
            start,
            end: self.position,
            category,
        }
    }

    fn consume_comment(&mut self) {
        while let Some(c) = self.input[self.position..].chars().next() {
            if c == '\n' || c == '\r' {
                break;
            }
            self.position += c.len_utf8();
        }
    }

    fn try_enter_math(&mut self, rest: &str) -> Option<MathDelimiter> {
        if rest.starts_with("$$") {
            self.position += 2;
            Some(MathDelimiter::DoubleDollar)
        } else if rest.starts_with('$') {
            self.position += 1;
            Some(MathDelimiter::Dollar)
        } else if rest.starts_with("\\[") {
            self.position += 2;
            Some(MathDelimiter::Bracket)
        } else {
            None
        }
    }

    fn math_token(&mut self, start: usize, rest: &str) -> Token<'a> {
        // in_math is true iff math_delimiter is set.
        let closing = self
            .math_delimiter
            .map(MathDelimiter::closing)
            .unwrap_or("$");

        if rest.starts_with(closing) {
            self.position += closing.len();
            self.in_math = false;
            self.math_delimiter = None;
            return self.token(start, Some(TokenCategory::MathDelimiter));
        }

        if let Some(len) = command_len(rest) {
            self.position += len;
            return self.token(start, Some(TokenCategory::MathCommand));
        }

        let first = rest.chars().next().unwrap_or_default();

        if MATH_OPERATORS.contains(first) {
            self.position += first.len_utf8();
            return self.token(start, Some(TokenCategory::Operator));
        }

        if first.is_ascii_digit() {
            while let Some(c) = self.input[self.position..].chars().next() {
                if c.is_ascii_digit() {
                    self.position += c.len_utf8();
                } else {
                    break;
                }
            }
            return self.token(start, Some(TokenCategory::Number));
        }

        self.position += first.len_utf8();
        self.token(start, Some(TokenCategory::MathLiteral))
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Byte length of a `\command` at the start of `rest` (backslash plus at
/// least one of `[a-zA-Z@]`), or `None`.
fn command_len(rest: &str) -> Option<usize> {
    let body = rest.strip_prefix('\\')?;
    let len = body
        .bytes()
        .take_while(|b| b.is_ascii_alphabetic() || *b == b'@')
        .count();
    if len == 0 {
        None
    } else {
        Some(1 + len)
    }
}

/// Matches `prefix` + `[a-zA-Z*]+` + `}`, returning the captured name
/// and the total byte length.
fn match_env_tag<'a>(rest: &'a str, prefix: &str) -> Option<(&'a str, usize)> {
    let after = rest.strip_prefix(prefix)?;
    let name_len = after
        .bytes()
        .take_while(|b| b.is_ascii_alphabetic() || *b == b'*')
        .count();
    if name_len == 0 || !after[name_len..].starts_with('}') {
        return None;
    }
    Some((&after[..name_len], prefix.len() + name_len + 1))
}

/// Byte length of `{...}` with no nested braces and no line break, or
/// `None`.
fn brace_group_len(rest: &str) -> Option<usize> {
    debug_assert!(rest.starts_with('{'));
    for (idx, c) in rest.char_indices().skip(1) {
        match c {
            '}' => return Some(idx + 1),
            '{' | '\n' | '\r' => return None,
            _ => {}
        }
    }
    None
}

/// Byte length of `[a-zA-Z*@]+` immediately followed by `}`, or `None`.
fn ident_before_rbrace(rest: &str) -> Option<usize> {
    let len = rest
        .bytes()
        .take_while(|b| b.is_ascii_alphabetic() || *b == b'*' || *b == b'@')
        .count();
    if len > 0 && rest[len..].starts_with('}') {
        Some(len)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories(input: &str) -> Vec<Option<TokenCategory>> {
        Tokenizer::new(input).map(|t| t.category).collect()
    }

    fn classified(input: &str) -> Vec<(TokenCategory, &str)> {
        Tokenizer::new(input)
            .filter_map(|t| t.category.map(|c| (c, t.text)))
            .collect()
    }

    #[test]
    fn test_comment_stops_at_end_of_line() {
        let tokens = classified("100% complete\nnext");
        assert_eq!(tokens, vec![(TokenCategory::Comment, "% complete")]);
    }

    #[test]
    fn test_digits_outside_math_are_uncategorized() {
        let cats = categories("100");
        assert_eq!(cats, vec![None, None, None]);
    }

    #[test]
    fn test_inline_math() {
        let tokens = classified("$x+1$");
        assert_eq!(
            tokens,
            vec![
                (TokenCategory::MathDelimiter, "$"),
                (TokenCategory::MathLiteral, "x"),
                (TokenCategory::Operator, "+"),
                (TokenCategory::Number, "1"),
                (TokenCategory::MathDelimiter, "$"),
            ]
        );
    }

    #[test]
    fn test_display_math_needs_matching_delimiter() {
        // A single `$` does not close a `$$` region; it is just a math
        // literal there.
        let tokens = classified("$$x$ y$$");
        assert_eq!(tokens[0], (TokenCategory::MathDelimiter, "$$"));
        assert_eq!(tokens[1], (TokenCategory::MathLiteral, "x"));
        assert_eq!(tokens[2], (TokenCategory::MathLiteral, "$"));
        assert_eq!(*tokens.last().unwrap(), (TokenCategory::MathDelimiter, "$$"));
    }

    #[test]
    fn test_bracket_math() {
        let tokens = classified(r"\[\frac{a}{b}\]");
        assert_eq!(tokens[0], (TokenCategory::MathDelimiter, r"\["));
        assert_eq!(tokens[1], (TokenCategory::MathCommand, r"\frac"));
        assert_eq!(*tokens.last().unwrap(), (TokenCategory::MathDelimiter, r"\]"));
    }

    #[test]
    fn test_environment_begin_end() {
        let tokens = classified(r"\begin{itemize}\end{itemize}");
        assert_eq!(
            tokens,
            vec![
                (TokenCategory::EnvironmentBegin, r"\begin{itemize}"),
                (TokenCategory::EnvironmentEnd, r"\end{itemize}"),
            ]
        );
    }

    #[test]
    fn test_environment_mismatch_is_a_token() {
        let tokens = classified(r"\begin{itemize}\end{enumerate}");
        assert_eq!(tokens[0].0, TokenCategory::EnvironmentBegin);
        assert_eq!(tokens[1], (TokenCategory::EnvironmentError, r"\end{enumerate}"));
    }

    #[test]
    fn test_end_with_empty_stack_is_an_error() {
        let tokens = classified(r"\end{itemize}");
        assert_eq!(tokens, vec![(TokenCategory::EnvironmentError, r"\end{itemize}")]);
    }

    #[test]
    fn test_starred_environment() {
        let tokens = classified(r"\begin{align*}\end{align*}");
        assert_eq!(tokens[0].0, TokenCategory::EnvironmentBegin);
        assert_eq!(tokens[1].0, TokenCategory::EnvironmentEnd);
    }

    #[test]
    fn test_command_classification() {
        assert_eq!(
            classified(r"\section"),
            vec![(TokenCategory::StructureCommand, r"\section")]
        );
        assert_eq!(
            classified(r"\textbf"),
            vec![(TokenCategory::FormattingCommand, r"\textbf")]
        );
        assert_eq!(
            classified(r"\frac"),
            vec![(TokenCategory::MathCommand, r"\frac")]
        );
        assert_eq!(
            classified(r"\cite"),
            vec![(TokenCategory::ReferenceCommand, r"\cite")]
        );
        assert_eq!(
            classified(r"\unknowncmd"),
            vec![(TokenCategory::Keyword, r"\unknowncmd")]
        );
    }

    #[test]
    fn test_bare_begin_is_an_environment_command() {
        // `\begin` without a well-formed `{name}` falls through to the
        // plain command rule.
        let tokens = classified(r"\begin x");
        assert_eq!(tokens, vec![(TokenCategory::EnvironmentCommand, r"\begin")]);
    }

    #[test]
    fn test_text_operators() {
        let tokens = classified("a & b");
        assert_eq!(tokens, vec![(TokenCategory::Operator, "&")]);
    }

    #[test]
    fn test_brace_group() {
        let tokens = classified(r"\textbf{bold}");
        assert_eq!(
            tokens,
            vec![
                (TokenCategory::FormattingCommand, r"\textbf"),
                (TokenCategory::Brace, "{bold}"),
            ]
        );
    }

    #[test]
    fn test_brace_group_does_not_cross_lines() {
        let tokens = classified("{a\nb}");
        assert!(tokens.iter().all(|(c, _)| *c != TokenCategory::Brace));
    }

    #[test]
    fn test_env_tag_with_digit_falls_back_to_brace() {
        // `env2` is not a valid environment name for the tokenizer, so
        // `\begin` classifies alone and `{env2}` is a plain group. The
        // brace rule outranks the dangling-name rule.
        let tokens = classified(r"\begin{env2}");
        assert_eq!(
            tokens,
            vec![
                (TokenCategory::EnvironmentCommand, r"\begin"),
                (TokenCategory::Brace, "{env2}"),
            ]
        );
    }

    #[test]
    fn test_tokens_cover_every_byte() {
        let input = "a $x$ %c\n\\begin{itemize}\\end{itemize}";
        let mut next = 0;
        for token in Tokenizer::new(input) {
            assert_eq!(token.start, next);
            assert!(token.end > token.start);
            next = token.end;
        }
        assert_eq!(next, input.len());
    }

    #[test]
    fn test_fresh_state_per_run() {
        let input = r"\begin{itemize}";
        let first: Vec<_> = Tokenizer::new(input).collect();
        let second: Vec<_> = Tokenizer::new(input).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_multibyte_text_is_skipped_cleanly() {
        let cats = categories("Étude");
        assert_eq!(cats.len(), 5);
        assert!(cats.iter().all(Option::is_none));
    }

    #[test]
    fn test_open_environments_tracking() {
        let mut tokenizer = Tokenizer::new(r"\begin{a}\begin{b}\end{b}");
        while tokenizer.next_token().is_some() {}
        assert_eq!(tokenizer.open_environments(), ["a".to_string()]);
    }
}
