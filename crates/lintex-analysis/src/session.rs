//! Analysis session: runs the diagnostic passes, builds the tree and
//! collects per-document statistics into one bundle.

use crate::{commands, environments, math, Diagnostic};
use lintex_syntax::{NodeKind, SyntaxTree};
use log::debug;
use serde::Serialize;

/// Aggregate counts over one document, collected from the syntax tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total_lines: usize,
    pub total_commands: usize,
    pub total_math_expressions: usize,
    pub total_environments: usize,
    pub total_comments: usize,
    /// Depth of the deepest node; the synthetic root sits at depth 0.
    pub max_nesting_depth: usize,
}

impl Statistics {
    fn collect(text: &str, tree: &SyntaxTree) -> Statistics {
        let mut stats = Statistics {
            total_lines: text.split('\n').count(),
            ..Statistics::default()
        };
        tree.walk(&mut |_, node, depth| {
            match node.kind {
                NodeKind::Command => stats.total_commands += 1,
                NodeKind::Math => stats.total_math_expressions += 1,
                NodeKind::Environment => stats.total_environments += 1,
                NodeKind::Comment => stats.total_comments += 1,
                NodeKind::Text => {}
            }
            stats.max_nesting_depth = stats.max_nesting_depth.max(depth);
        });
        stats
    }
}

/// Everything one analysis call produces. Owned by the caller; nothing
/// persists between calls.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub diagnostics: Vec<Diagnostic>,
    pub tree: SyntaxTree,
    pub statistics: Statistics,
}

/// Analyzes a whole document.
///
/// The three diagnostic passes and the tree builder each scan the text
/// independently; none reads another's output. Diagnostics are
/// concatenated in fixed pass order — math, environment, command — and
/// are in document order within each pass, not globally sorted.
pub fn analyze(text: &str) -> Analysis {
    let mut diagnostics = math::check_math(text);
    diagnostics.extend(environments::check_environments(text));
    diagnostics.extend(commands::check_commands(text));

    let tree = SyntaxTree::build(text);
    let statistics = Statistics::collect(text, &tree);

    debug!(
        "analyzed {} bytes: {} diagnostics, {} nodes, depth {}",
        text.len(),
        diagnostics.len(),
        tree.len(),
        statistics.max_nesting_depth
    );

    Analysis {
        diagnostics,
        tree,
        statistics,
    }
}
