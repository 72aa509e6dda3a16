//! Record Parsers
//!
//! One independent parser per source. All three share the same containment
//! policy: a malformed line is skipped and parsing continues, a malformed or
//! missing source degrades to empty output with a warning. Nothing past the
//! parser boundary ever observes a partial or error state.
//!
//! Privacy is enforced here, not downstream: prompt bodies are reduced to
//! word tokens and file paths are reduced to a language label before a
//! record leaves this module.

use crate::languages;
use crate::models::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// Words shorter than this, or containing non-letters, are not worth
/// counting for the word-frequency distribution.
const MIN_WORD_LEN: usize = 3;
/// Only the leading words of a prompt carry intent; the rest is detail.
const WORDS_PER_PROMPT: usize = 5;

/// Decodes `stats-cache.json` into a [`CacheSnapshot`].
pub struct CacheParser;

impl CacheParser {
    /// Infallible by contract: a missing or undecodable cache yields the
    /// all-zero snapshot and a warning, never an error.
    pub fn parse_file(path: Option<&Path>) -> CacheSnapshot {
        let Some(path) = path else {
            warn!("stats cache not found, cache-derived metrics will be zero");
            return CacheSnapshot::default();
        };

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read stats cache");
                return CacheSnapshot::default();
            }
        };

        match serde_json::from_str::<StatsCache>(&content) {
            Ok(raw) => raw.into(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to decode stats cache");
                CacheSnapshot::default()
            }
        }
    }
}

/// Decodes history.jsonl into a stream of [`PromptEvent`]s.
pub struct HistoryParser;

impl HistoryParser {
    /// Stream prompt events into `sink`, one per decodable line. Undecodable
    /// lines are skipped; a missing file streams nothing.
    pub fn parse(path: Option<&Path>, mut sink: impl FnMut(PromptEvent)) {
        let Some(path) = path else {
            warn!("prompt history not found, history-derived metrics will be zero");
            return;
        };

        for_each_line(path, |line| {
            if let Ok(entry) = serde_json::from_str::<HistoryEntry>(line) {
                sink(Self::normalize(entry));
            }
        });
    }

    fn normalize(entry: HistoryEntry) -> PromptEvent {
        let word_tokens = entry
            .display
            .as_deref()
            .map(word_tokens)
            .unwrap_or_default();
        // Raw prompt text ends here.
        PromptEvent {
            timestamp: entry.timestamp.and_then(|ts| ts.to_utc()),
            project_id: entry.project,
            word_tokens,
        }
    }
}

/// Lower-cased leading words of a prompt, filtered to plausible
/// intent-carrying tokens.
pub fn word_tokens(prompt: &str) -> Vec<String> {
    prompt
        .to_lowercase()
        .split_whitespace()
        .take(WORDS_PER_PROMPT)
        .filter(|w| w.len() >= MIN_WORD_LEN && w.chars().all(|c| c.is_alphabetic()))
        .map(str::to_string)
        .collect()
}

/// Decodes per-project transcript files into [`ToolInvocation`]s.
///
/// Transcript lines are heterogeneous; recognized shapes are tried in
/// priority order (nested `tool_use` content blocks, then the flat record
/// form) and everything else falls through to "ignored".
pub struct TranscriptParser;

impl TranscriptParser {
    pub fn parse(path: &Path, mut sink: impl FnMut(ToolInvocation)) {
        for_each_line(path, |line| {
            if let Ok(record) = serde_json::from_str::<TranscriptLine>(line) {
                for invocation in Self::extract(record) {
                    sink(invocation);
                }
            }
        });
    }

    fn extract(line: TranscriptLine) -> Vec<ToolInvocation> {
        let timestamp = line.timestamp.as_ref().and_then(|ts| ts.to_utc());

        // Shape 1: assistant message with tool_use content blocks. Patch
        // line counts live beside the message and belong to the first
        // Edit/Write block on the same line.
        if let Some(MessageContent::Blocks(blocks)) = line.message.map(|m| m.content) {
            let mut invocations = Vec::new();
            let (patch_added, patch_removed) = line
                .tool_use_result
                .as_ref()
                .map(patch_line_counts)
                .unwrap_or((0, 0));
            let mut patch_unclaimed = true;

            for block in blocks {
                let ContentBlock::ToolUse { name, input } = block else {
                    continue;
                };
                let operation_kind = operation_kind(&name);
                let tracks_lines = operation_kind != OperationKind::Other;

                let language = if tracks_lines {
                    input.file_path.as_deref().and_then(languages::language_for_path)
                } else {
                    None
                };

                let (lines_added, lines_removed) = if tracks_lines && patch_unclaimed {
                    patch_unclaimed = false;
                    (patch_added, patch_removed)
                } else {
                    (0, 0)
                };

                invocations.push(ToolInvocation {
                    tool_name: name,
                    timestamp,
                    language,
                    lines_added,
                    lines_removed,
                    operation_kind,
                });
            }

            if !invocations.is_empty() {
                return invocations;
            }
        }

        // Shape 2: flat tool-invocation record.
        if let Some(name) = line.tool_name {
            let operation_kind = operation_kind(&name);
            let language = if operation_kind != OperationKind::Other {
                line.file_path.as_deref().and_then(languages::language_for_path)
            } else {
                None
            };
            return vec![ToolInvocation {
                tool_name: name,
                timestamp,
                language,
                lines_added: clamp_count(line.lines_added),
                lines_removed: clamp_count(line.lines_removed),
                operation_kind,
            }];
        }

        debug!("transcript line carried no recognized tool invocation");
        Vec::new()
    }
}

fn operation_kind(tool_name: &str) -> OperationKind {
    match tool_name {
        "Write" => OperationKind::Created,
        "Edit" => OperationKind::Edited,
        _ => OperationKind::Other,
    }
}

fn clamp_count(value: Option<i64>) -> u64 {
    value.unwrap_or(0).max(0) as u64
}

fn patch_line_counts(result: &ToolUseResult) -> (u64, u64) {
    let ToolUseResult::Structured { structured_patch } = result else {
        return (0, 0);
    };
    let mut added = 0;
    let mut removed = 0;
    for hunk in structured_patch {
        for line in &hunk.lines {
            if line.starts_with('+') && !line.starts_with("+++") {
                added += 1;
            } else if line.starts_with('-') && !line.starts_with("---") {
                removed += 1;
            }
        }
    }
    (added, removed)
}

/// Iterate the non-empty lines of a file with a scoped reader. Read errors
/// stop iteration with a warning; already-delivered lines stand.
fn for_each_line(path: &Path, mut f: impl FnMut(&str)) {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to open log file");
            return;
        }
    };
    let reader = BufReader::new(file);

    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Stopped reading log file");
                return;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        f(line);
    }
}
