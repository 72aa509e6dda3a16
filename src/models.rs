//! Core Data Models
//!
//! Defines the data structures used throughout the recap pipeline, in two
//! layers:
//!
//! 1. **Wire types** - serde views of the raw log formats: the stats cache
//!    JSON ([`StatsCache`]), history.jsonl lines ([`HistoryEntry`]) and
//!    per-project transcript lines ([`TranscriptLine`]). These are lenient
//!    by construction: every field defaults or is optional, so a line either
//!    decodes or is skipped as a whole.
//! 2. **Normalized records** - what the aggregator actually consumes:
//!    [`CacheSnapshot`], [`PromptEvent`] and [`ToolInvocation`]. Prompt text
//!    and file paths never survive normalization; only word tokens and a
//!    derived language label do.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

use crate::timestamp::TimestampParser;

/// Raw view of `stats-cache.json`. Every field is optional on the wire;
/// a missing or unreadable cache degrades to `StatsCache::default()`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatsCache {
    pub total_sessions: u64,
    pub total_prompts: u64,
    pub total_tool_calls: u64,
    pub total_output_tokens: u64,
    pub project_count: u64,
    pub model_usage: HashMap<String, ModelUsage>,
    pub longest_session: Option<LongestSession>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModelUsage {
    pub output_tokens: u64,
    pub input_tokens: u64,
}

/// Longest-session record the cache maintains. `duration` is milliseconds.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LongestSession {
    pub duration: u64,
    pub message_count: u64,
}

/// Normalized snapshot of the stats cache. `model_usage` keeps the full
/// per-model token counts; "favorite model" ranks by output tokens.
#[derive(Debug, Clone, Default)]
pub struct CacheSnapshot {
    pub session_count: u64,
    pub prompt_count: u64,
    pub tool_call_count: u64,
    pub output_tokens: u64,
    pub project_count: u64,
    pub model_usage: HashMap<String, ModelUsage>,
    pub longest_session: Option<LongestSession>,
}

impl From<StatsCache> for CacheSnapshot {
    fn from(raw: StatsCache) -> Self {
        let summed: u64 = raw.model_usage.values().map(|m| m.output_tokens).sum();
        Self {
            session_count: raw.total_sessions,
            prompt_count: raw.total_prompts,
            tool_call_count: raw.total_tool_calls,
            output_tokens: if raw.total_output_tokens > 0 {
                raw.total_output_tokens
            } else {
                summed
            },
            project_count: raw.project_count,
            model_usage: raw.model_usage,
            longest_session: raw.longest_session,
        }
    }
}

/// Timestamps appear as epoch milliseconds in history.jsonl and as RFC 3339
/// strings in transcripts; accept either.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Millis(i64),
    Float(f64),
    Text(String),
}

impl RawTimestamp {
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            RawTimestamp::Millis(ms) => TimestampParser::from_epoch_millis(*ms),
            RawTimestamp::Float(ms) => TimestampParser::from_epoch_millis(*ms as i64),
            RawTimestamp::Text(s) => TimestampParser::parse(s).ok(),
        }
    }
}

/// One line of history.jsonl. `prompt_text` / `project_id` are accepted as
/// aliases for the field names Claude Code writes.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEntry {
    #[serde(alias = "prompt_text")]
    pub display: Option<String>,
    #[serde(alias = "project_id")]
    pub project: Option<String>,
    pub timestamp: Option<RawTimestamp>,
}

/// Normalized prompt record. The raw prompt body is tokenized at the parser
/// and dropped; only the tokens travel further. A prompt whose timestamp
/// fails to parse still counts toward totals, just not time buckets.
#[derive(Debug, Clone)]
pub struct PromptEvent {
    pub timestamp: Option<DateTime<Utc>>,
    pub project_id: Option<String>,
    pub word_tokens: Vec<String>,
}

/// One line of a per-project transcript. Lines are heterogeneous: assistant
/// messages with `tool_use` content blocks, flat tool-call records, and
/// plenty of event types we don't care about. All fields are optional so a
/// single lenient decode covers every recognized shape.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptLine {
    pub timestamp: Option<RawTimestamp>,
    pub message: Option<TranscriptMessage>,
    #[serde(rename = "toolUseResult")]
    pub tool_use_result: Option<ToolUseResult>,
    // Flat tool-invocation shape
    pub tool_name: Option<String>,
    pub file_path: Option<String>,
    pub lines_added: Option<i64>,
    pub lines_removed: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranscriptMessage {
    #[serde(default)]
    pub content: MessageContent,
}

/// `message.content` is either a list of typed blocks or a bare string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Blocks(Vec<ContentBlock>),
    Text(String),
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Blocks(Vec::new())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "tool_use")]
    ToolUse {
        #[serde(default)]
        name: String,
        #[serde(default)]
        input: ToolInput,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolInput {
    pub file_path: Option<String>,
}

/// `toolUseResult` may be a structured object or an opaque string depending
/// on the tool; only the structured-patch form contributes line counts.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ToolUseResult {
    Structured {
        #[serde(default, rename = "structuredPatch")]
        structured_patch: Vec<PatchHunk>,
    },
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatchHunk {
    #[serde(default)]
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Created,
    Edited,
    Other,
}

/// Normalized tool-call record. The file path has already been reduced to a
/// language label; nothing path-shaped leaves the parser.
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    pub tool_name: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub language: Option<&'static str>,
    pub lines_added: u64,
    pub lines_removed: u64,
    pub operation_kind: OperationKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_snapshot_sums_model_output_tokens() {
        let raw: StatsCache = serde_json::from_str(
            r#"{"totalSessions":12,"modelUsage":{"claude-opus-4":{"outputTokens":100,"inputTokens":5},"claude-sonnet-4":{"outputTokens":300}}}"#,
        )
        .unwrap();
        let snapshot = CacheSnapshot::from(raw);
        assert_eq!(snapshot.session_count, 12);
        assert_eq!(snapshot.output_tokens, 400);
        assert_eq!(snapshot.model_usage["claude-sonnet-4"].output_tokens, 300);
        assert_eq!(snapshot.model_usage["claude-opus-4"].input_tokens, 5);
    }

    #[test]
    fn test_longest_session_survives_normalization() {
        let raw: StatsCache = serde_json::from_str(
            r#"{"longestSession":{"duration":5400000,"messageCount":42}}"#,
        )
        .unwrap();
        let snapshot = CacheSnapshot::from(raw);
        let session = snapshot.longest_session.unwrap();
        assert_eq!(session.duration, 5_400_000);
        assert_eq!(session.message_count, 42);
    }

    #[test]
    fn test_cache_defaults_when_fields_absent() {
        let raw: StatsCache = serde_json::from_str("{}").unwrap();
        let snapshot = CacheSnapshot::from(raw);
        assert_eq!(snapshot.session_count, 0);
        assert!(snapshot.model_usage.is_empty());
    }

    #[test]
    fn test_history_entry_aliases() {
        let entry: HistoryEntry = serde_json::from_str(
            r#"{"prompt_text":"fix the bug","project_id":"/home/u/proj","timestamp":1704067200000}"#,
        )
        .unwrap();
        assert_eq!(entry.display.as_deref(), Some("fix the bug"));
        assert!(entry.timestamp.unwrap().to_utc().is_some());
    }

    #[test]
    fn test_transcript_line_with_unknown_block_types() {
        let line: TranscriptLine = serde_json::from_str(
            r#"{"timestamp":"2024-03-01T10:00:00Z","message":{"content":[{"type":"text","text":"hi"},{"type":"tool_use","name":"Edit","input":{"file_path":"/a/b.rs"}}]}}"#,
        )
        .unwrap();
        let MessageContent::Blocks(blocks) = line.message.unwrap().content else {
            panic!("expected blocks");
        };
        assert_eq!(blocks.len(), 2);
        assert!(matches!(blocks[0], ContentBlock::Other));
    }
}
