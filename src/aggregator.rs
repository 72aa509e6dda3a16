//! Streaming aggregation
//!
//! [`AggregateState`] is the single accumulator the whole pipeline folds
//! into. Records arrive one at a time and are dropped after folding; the
//! only memory proportional to anything is the per-category maps (languages,
//! tools, dates, words), which are bounded by distinct categories rather
//! than event count. All counters only ever go up.

use chrono::{DateTime, Datelike, Timelike, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::{OperationKind, PromptEvent, ToolInvocation};

#[derive(Debug, Default)]
pub struct AggregateState {
    /// Every decoded prompt, timestamped or not.
    pub prompts_total: u64,
    /// Prompts that landed in the time buckets below.
    pub prompts_with_timestamp: u64,
    /// Monday-first.
    pub weekday_prompts: [u64; 7],
    pub hourly_prompts: [u64; 24],
    /// YYYY-MM-DD date to message count (prompts plus tool invocations).
    /// BTreeMap so iteration order doubles as the lexicographic tie-break.
    pub daily_messages: BTreeMap<String, u64>,
    pub language_lines: HashMap<&'static str, u64>,
    pub tool_counts: HashMap<String, u64>,
    pub word_frequency: HashMap<String, u64>,
    pub invocations_total: u64,
    pub files_created: u64,
    pub files_edited: u64,
    pub lines_added: u64,
    pub lines_removed: u64,
    pub earliest: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,
    // Counted, never surfaced.
    projects: HashSet<String>,
}

impl AggregateState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_prompt(&mut self, event: PromptEvent) {
        self.prompts_total += 1;

        if let Some(project) = event.project_id {
            self.projects.insert(project);
        }

        for word in event.word_tokens {
            *self.word_frequency.entry(word).or_insert(0) += 1;
        }

        if let Some(ts) = event.timestamp {
            self.prompts_with_timestamp += 1;
            self.weekday_prompts[ts.weekday().num_days_from_monday() as usize] += 1;
            self.hourly_prompts[ts.hour() as usize] += 1;
            self.bump_day(ts);
            self.observe(ts);
        }
    }

    pub fn record_invocation(&mut self, invocation: ToolInvocation) {
        self.invocations_total += 1;
        *self
            .tool_counts
            .entry(invocation.tool_name)
            .or_insert(0) += 1;

        match invocation.operation_kind {
            OperationKind::Created => self.files_created += 1,
            OperationKind::Edited => self.files_edited += 1,
            OperationKind::Other => {}
        }

        self.lines_added += invocation.lines_added;
        self.lines_removed += invocation.lines_removed;

        // Unrecognized extensions stay out of the language distribution
        // entirely; no "unknown" bucket. A touch without line counts is
        // skipped too, so a patchless Edit never seeds a zero-line entry.
        if let Some(language) = invocation.language {
            let delta = invocation.lines_added + invocation.lines_removed;
            if delta > 0 {
                *self.language_lines.entry(language).or_insert(0) += delta;
            }
        }

        if let Some(ts) = invocation.timestamp {
            self.bump_day(ts);
            self.observe(ts);
        }
    }

    /// Number of distinct project identifiers seen in the history stream.
    pub fn project_count(&self) -> u64 {
        self.projects.len() as u64
    }

    /// Days with at least one timestamped message.
    pub fn active_days(&self) -> u64 {
        self.daily_messages.len() as u64
    }

    fn bump_day(&mut self, ts: DateTime<Utc>) {
        *self
            .daily_messages
            .entry(ts.format("%Y-%m-%d").to_string())
            .or_insert(0) += 1;
    }

    fn observe(&mut self, ts: DateTime<Utc>) {
        self.earliest = Some(match self.earliest {
            Some(current) => current.min(ts),
            None => ts,
        });
        self.latest = Some(match self.latest {
            Some(current) => current.max(ts),
            None => ts,
        });
    }
}
