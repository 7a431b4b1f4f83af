//! Command pass: unclosed brace arguments and unrecognized commands.

use crate::{Diagnostic, DiagnosticKind};
use lintex_syntax::is_recognized;
use once_cell::sync::Lazy;
use regex::Regex;

/// A command with a brace argument, tolerating one level of nested
/// braces inside it. Capture 3 is the trailing open-without-close
/// group; when it participates, the argument never closed on this line.
static COMMAND_ARG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\[a-zA-Z@]+\{([^{}]*(\{[^{}]*\}[^{}]*)*)?([^{}]*\{)?").unwrap()
});

static COMMAND_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\([a-zA-Z@]+)").unwrap());

/// Scans each line for commands with unterminated brace groups, then
/// for command names outside the recognized vocabulary. Both checks are
/// line-local; a brace argument that closes on a later line still
/// counts as unclosed here.
pub fn check_commands(text: &str) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for (index, line) in text.split('\n').enumerate() {
        for caps in COMMAND_ARG.captures_iter(line) {
            if caps.get(3).is_none() {
                continue;
            }
            let Some(whole) = caps.get(0) else { continue };
            diagnostics.push(Diagnostic {
                kind: DiagnosticKind::Command,
                line: index + 1,
                message: "Unclosed brace in command argument".to_string(),
                explanation: Some(
                    "Commands with braced arguments must have properly closed braces."
                        .to_string(),
                ),
                suggestion: Some(format!("% CORRECT:\n{}}}  % Close the brace", whole.as_str())),
                range: None,
            });
        }

        for caps in COMMAND_NAME.captures_iter(line) {
            let Some(name) = caps.get(1) else { continue };
            if is_recognized(name.as_str()) {
                continue;
            }
            diagnostics.push(Diagnostic {
                kind: DiagnosticKind::UnknownCommand,
                line: index + 1,
                message: format!("Potentially undefined command: \\{}", name.as_str()),
                explanation: Some(
                    "This command may not be defined in standard LaTeX or may need a package."
                        .to_string(),
                ),
                suggestion: Some(
                    "% SOLUTION 1: Check spelling\n% SOLUTION 2: Include required package\n\\usepackage{package-name}  % Replace with the appropriate package"
                        .to_string(),
                ),
                range: None,
            });
        }
    }

    diagnostics
}
