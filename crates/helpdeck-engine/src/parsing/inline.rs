//! Inline run formatting: bold splitting and search highlighting.
//!
//! Given one block's text and the active search query, produces the
//! ordered styled runs a render sink draws. Runs are never stored;
//! they are recomputed whenever the query or the block changes.

use crate::text::find_ci;

/// A contiguous span of text sharing one bold/highlight combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineRun {
    pub text: String,
    pub bold: bool,
    pub highlighted: bool,
}

impl InlineRun {
    fn new(text: &str, bold: bool, highlighted: bool) -> Self {
        Self {
            text: text.to_string(),
            bold,
            highlighted,
        }
    }
}

/// Formats one block's text into styled inline runs.
///
/// The text is split on `**` markers, alternating plain/bold starting
/// with plain. An odd marker count leaves the trailing segment bold;
/// that is the documented policy for unbalanced markers, not an error.
/// Empty segments (adjacent markers, or markers at either end) produce
/// no runs, so runs always carry text.
///
/// Each segment is then partitioned against `query`: every
/// non-overlapping case-insensitive occurrence becomes a highlighted
/// run, the gaps stay plain. A blank query disables highlighting;
/// otherwise the query is matched as written, surrounding whitespace
/// included. Concatenating the run texts always reconstructs the
/// input.
pub fn format_inline(text: &str, query: &str) -> Vec<InlineRun> {
    let mut runs = Vec::new();

    for (index, segment) in text.split("**").enumerate() {
        if segment.is_empty() {
            continue;
        }
        let bold = index % 2 == 1;
        push_highlighted(&mut runs, segment, query, bold);
    }

    runs
}

/// Splits one bold/plain segment into highlighted and plain runs.
fn push_highlighted(runs: &mut Vec<InlineRun>, segment: &str, query: &str, bold: bool) {
    if query.trim().is_empty() {
        runs.push(InlineRun::new(segment, bold, false));
        return;
    }

    let mut rest = segment;
    while !rest.is_empty() {
        let Some((start, len)) = find_ci(rest, query) else {
            runs.push(InlineRun::new(rest, bold, false));
            break;
        };

        if start > 0 {
            runs.push(InlineRun::new(&rest[..start], bold, false));
        }
        runs.push(InlineRun::new(&rest[start..start + len], bold, true));
        rest = &rest[start + len..];
    }
}
