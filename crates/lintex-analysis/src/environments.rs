//! Environment-balance pass: every `\begin{X}` needs an `\end{X}`.

use crate::{Diagnostic, DiagnosticKind};
use once_cell::sync::Lazy;
use regex::Regex;

static BEGIN_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\begin\{([^}]+)\}").unwrap());
static END_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\end\{([^}]+)\}").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordKind {
    Begin,
    End,
}

/// One `\begin` or `\end` occurrence, alive only for the duration of
/// the pass.
#[derive(Debug, Clone)]
struct EnvRecord {
    name: String,
    line: usize,
    /// Absolute byte offset of the tag.
    position: usize,
    kind: RecordKind,
}

/// Matches `\begin`/`\end` pairs by name and reports every unmatched
/// occurrence.
///
/// An `\end{X}` pops the *nearest* pending entry named `X`, searching
/// backward through everything still open rather than only the top of a
/// strict stack. Interleaved unrelated environments therefore pair up
/// cleanly; only genuinely missing tags are reported. Unmatched `\end`s
/// are reported as they are found; unmatched `\begin`s after the whole
/// scan.
pub fn check_environments(text: &str) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut pending: Vec<EnvRecord> = Vec::new();

    let mut offset = 0;
    for (index, line) in text.split('\n').enumerate() {
        for caps in BEGIN_TAG.captures_iter(line) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            pending.push(EnvRecord {
                name: name.as_str().to_string(),
                line: index + 1,
                position: offset + whole.start(),
                kind: RecordKind::Begin,
            });
        }

        for caps in END_TAG.captures_iter(line) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let record = EnvRecord {
                name: name.as_str().to_string(),
                line: index + 1,
                position: offset + whole.start(),
                kind: RecordKind::End,
            };
            let matching = pending
                .iter()
                .rposition(|p| p.kind == RecordKind::Begin && p.name == record.name);
            match matching {
                Some(at) => {
                    pending.remove(at);
                }
                None => diagnostics.push(unmatched(&record)),
            }
        }

        offset += line.len() + 1;
    }

    for record in &pending {
        diagnostics.push(unmatched(record));
    }

    diagnostics
}

fn unmatched(record: &EnvRecord) -> Diagnostic {
    let (found, wanted) = match record.kind {
        RecordKind::Begin => ("begin", "end"),
        RecordKind::End => ("end", "begin"),
    };
    let tag_len = format!("\\{}{{{}}}", found, record.name).len();
    Diagnostic {
        kind: DiagnosticKind::Environment,
        line: record.line,
        message: format!(
            "Unmatched \\{found}{{{name}}} without a corresponding \\{wanted}{{{name}}}",
            name = record.name,
        ),
        explanation: Some(format!(
            "Every \\{found}{{}} command must have a matching \\{wanted}{{}} command with the same environment name.",
        )),
        suggestion: Some(format!(
            "% CORRECT:\n\\begin{{{name}}}\n  Content goes here\n\\end{{{name}}}",
            name = record.name,
        )),
        range: Some((record.position, record.position + tag_len)),
    }
}
