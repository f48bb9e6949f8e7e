//! Recovers `---<path>---` / fenced file blocks from raw LLM response text.
//!
//! The response format the providers are instructed to emit, per file:
//! a `---<path>---` marker line, an opening fence with an optional
//! language tag, the file content, and a closing fence.
//!
//! Free text may surround the blocks and file content may itself contain
//! fence-like lines, so closing a block requires lookahead. Parsing is
//! total: malformed or truncated input degrades to partial results, never
//! to an error.

use indexmap::IndexMap;

mod trace;

pub use trace::{EventLog, NullSink, ParseEvent, StdoutSink, TraceSink};


/// Delimiter that both starts and ends a path marker line.
pub const PATH_MARKER: &str = "---";

/// A line that is exactly this (after trimming) is a fence candidate.
pub const FENCE: &str = "```";

// Some providers wrap the whole reply in a tool-invocation fence. Only
// honored on the very first line.
const TOOL_PREAMBLE: &str = "```tool_code";

/// Parse `response` into an ordered map of path -> file content.
///
/// Insertion order follows the order in which blocks terminate. A path
/// that terminates twice keeps the later content and the later position.
pub fn parse(response: &str) -> IndexMap<String, String> {
    parse_with_trace(response, &mut NullSink)
}

/// Same as [`parse`], emitting a [`ParseEvent`] into `trace` for every
/// irreversible decision the state machine makes.
pub fn parse_with_trace(response: &str, trace: &mut dyn TraceSink) -> IndexMap<String, String> {
    let lines = lex(response);
    let mut files: IndexMap<String, String> = IndexMap::new();

    let mut i = 0;
    if lines.first().map(|l| l.trim()) == Some(TOOL_PREAMBLE) {
        trace.record(ParseEvent::PreambleSkipped);
        i = 1;
    }

    // None while scanning between blocks, Some(path) while inside one.
    let mut current: Option<String> = None;
    let mut pending: Vec<&str> = Vec::new();

    while i < lines.len() {
        let line = lines[i];
        match current.take() {
            None => {
                if let Some(path) = marker_payload(line) {
                    trace.record(ParseEvent::BlockOpened {
                        path: path.to_string(),
                    });
                    current = Some(path.to_string());
                    pending.clear();
                    // The opening fence (with or without a language tag) is
                    // discarded without inspection. A marker as the final
                    // line opens a block that runs straight to end of input.
                    i += 2;
                    continue;
                }
                // Free text outside any block: commentary, explanations.
            }
            Some(path) => {
                if is_fence(line) && fence_closes_block(&lines, i) {
                    let content = pending.join("\n");
                    trace.record(ParseEvent::BlockClosed {
                        path: path.clone(),
                        bytes: content.len(),
                    });
                    store(&mut files, path, content);
                    pending.clear();
                } else {
                    if is_fence(line) {
                        trace.record(ParseEvent::FenceKeptAsContent { line: i });
                    }
                    pending.push(line);
                    current = Some(path);
                }
            }
        }
        i += 1;
    }

    // Truncated responses must not silently drop the open block.
    if let Some(path) = current {
        let content = pending.join("\n");
        trace.record(ParseEvent::EofFinalized {
            path: path.clone(),
            bytes: content.len(),
        });
        store(&mut files, path, content);
    }

    files
}

// Split strictly on '\n', keeping empty lines and exact content. The empty
// string lexes to one empty line, matching the split semantics the close
// lookahead depends on.
fn lex(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// The path payload of a marker line, or `None` if `line` is not a marker.
///
/// A marker both starts and ends with `---` after trimming and is at least
/// six characters, so `------` is a marker with an empty path while a bare
/// `---` is not a marker at all.
fn marker_payload(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.len() >= PATH_MARKER.len() * 2
        && trimmed.starts_with(PATH_MARKER)
        && trimmed.ends_with(PATH_MARKER)
    {
        Some(&trimmed[PATH_MARKER.len()..trimmed.len() - PATH_MARKER.len()])
    } else {
        None
    }
}

fn is_fence(line: &str) -> bool {
    line.trim() == FENCE
}

// A fence at `idx` genuinely closes the open block iff it is the last
// line, or the next line is a marker, or the next line is blank and is
// itself last or followed by a marker. Anything else means the fence is
// part of the file content (markdown files legitimately contain them).
fn fence_closes_block(lines: &[&str], idx: usize) -> bool {
    let Some(next) = lines.get(idx + 1) else {
        return true;
    };
    if marker_payload(next).is_some() {
        return true;
    }
    if next.trim().is_empty() {
        return match lines.get(idx + 2) {
            None => true,
            Some(after) => marker_payload(after).is_some(),
        };
    }
    false
}

// Last write wins, and the overwrite's position dictates the key's place
// in the output, so the old entry is removed before re-inserting.
fn store(files: &mut IndexMap<String, String>, path: String, content: String) {
    files.shift_remove(&path);
    files.insert(path, content);
}
