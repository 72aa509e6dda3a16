//! Report entity and emitter
//!
//! [`Report`] is the single artifact that crosses the system boundary: a
//! JSON document combining the cache snapshot with every derived metric.
//! Emission is total - each field appears even when zero or empty so the
//! renderer can tell "no activity" from "source unavailable" - and nothing
//! in it ever contains prompt text, project identifiers or file paths.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;

use crate::aggregator::AggregateState;
use crate::metrics;
use crate::models::{CacheSnapshot, ModelUsage};

const TOP_WORDS: usize = 30;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub period: Period,
    pub summary: Summary,
    pub code_changes: CodeChanges,
    pub languages: Vec<LanguageShare>,
    pub tools: Vec<ToolShare>,
    pub models: Vec<ModelBreakdown>,
    pub weekday_activity: Vec<WeekdayActivity>,
    pub hourly_activity: Vec<HourlyActivity>,
    pub highlights: Highlights,
    pub prompt_words: Vec<WordCount>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub start: Option<String>,
    pub end: Option<String>,
    pub days: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub sessions: u64,
    pub prompts: u64,
    pub tool_calls: u64,
    pub output_tokens: u64,
    pub projects: u64,
    pub favorite_model: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeChanges {
    pub lines_added: u64,
    pub lines_removed: u64,
    pub net_lines: i64,
    pub files_created: u64,
    pub files_edited: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageShare {
    pub name: String,
    pub lines: u64,
    pub percent: u64,
    pub bar: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolShare {
    pub name: String,
    pub invocations: u64,
    pub percent: u64,
    pub bar: u64,
}

/// Per-model token usage under its display name (vendor prefix and release
/// date stripped).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelBreakdown {
    pub name: String,
    pub output_tokens: u64,
    pub input_tokens: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayActivity {
    pub weekday: String,
    pub prompts: u64,
    pub bar: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyActivity {
    pub hour: u8,
    pub prompts: u64,
    pub bar: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlights {
    pub busiest_day: BusiestDay,
    pub peak_hours: PeakHours,
    pub power_day: PowerDay,
    pub avg_prompts_per_day: f64,
    pub longest_streak_days: u64,
    pub longest_session: LongestSession,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LongestSession {
    pub hours: f64,
    pub messages: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusiestDay {
    pub date: Option<String>,
    pub messages: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakHours {
    pub start_hour: u8,
    pub end_hour: u8,
    pub prompts: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerDay {
    pub weekday: String,
    pub prompts: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordCount {
    pub word: String,
    pub count: u64,
}

impl Report {
    /// Assemble the report from the cache snapshot and the completed fold.
    /// Observed counts win over cached ones; the cache only fills in when a
    /// source produced nothing.
    pub fn build(cache: &CacheSnapshot, state: &AggregateState) -> Self {
        let prompts = if state.prompts_total > 0 {
            state.prompts_total
        } else {
            cache.prompt_count
        };
        let tool_calls = if state.invocations_total > 0 {
            state.invocations_total
        } else {
            cache.tool_call_count
        };
        let projects = if state.project_count() > 0 {
            state.project_count()
        } else {
            cache.project_count
        };

        let (busiest_date, busiest_messages) = match metrics::busiest_day(&state.daily_messages) {
            Some((date, count)) => (Some(date.to_string()), count),
            None => (None, 0),
        };

        let (peak_start, peak_sum) = metrics::peak_hours(&state.hourly_prompts);
        let (power_index, power_count) = metrics::power_day(&state.weekday_prompts);

        let weekday_max = state.weekday_prompts.iter().copied().max().unwrap_or(0);
        let hourly_max = state.hourly_prompts.iter().copied().max().unwrap_or(0);

        Report {
            period: Period {
                start: state.earliest.map(|ts| ts.format("%Y-%m-%d").to_string()),
                end: state.latest.map(|ts| ts.format("%Y-%m-%d").to_string()),
                days: match (state.earliest, state.latest) {
                    (Some(earliest), Some(latest)) => metrics::period_days(earliest, latest),
                    _ => 0,
                },
            },
            summary: Summary {
                sessions: cache.session_count,
                prompts,
                tool_calls,
                output_tokens: cache.output_tokens,
                projects,
                favorite_model: favorite_model(&cache.model_usage),
            },
            code_changes: CodeChanges {
                lines_added: state.lines_added,
                lines_removed: state.lines_removed,
                net_lines: state.lines_added as i64 - state.lines_removed as i64,
                files_created: state.files_created,
                files_edited: state.files_edited,
            },
            languages: language_shares(state),
            tools: tool_shares(state),
            models: model_breakdown(&cache.model_usage),
            weekday_activity: state
                .weekday_prompts
                .iter()
                .enumerate()
                .map(|(index, &count)| WeekdayActivity {
                    weekday: metrics::WEEKDAY_NAMES[index].to_string(),
                    prompts: count,
                    bar: metrics::bar_length(count, weekday_max),
                })
                .collect(),
            hourly_activity: state
                .hourly_prompts
                .iter()
                .enumerate()
                .map(|(hour, &count)| HourlyActivity {
                    hour: hour as u8,
                    prompts: count,
                    bar: metrics::bar_length(count, hourly_max),
                })
                .collect(),
            highlights: Highlights {
                busiest_day: BusiestDay {
                    date: busiest_date,
                    messages: busiest_messages,
                },
                peak_hours: PeakHours {
                    start_hour: peak_start,
                    end_hour: metrics::peak_window_end(peak_start),
                    prompts: peak_sum,
                },
                power_day: PowerDay {
                    weekday: metrics::WEEKDAY_NAMES[power_index].to_string(),
                    prompts: power_count,
                },
                // Averages only ever relate observed prompts to observed
                // active days; the cache fallback above has no day
                // information to divide by.
                avg_prompts_per_day: metrics::average_per_day(
                    state.prompts_total,
                    state.active_days(),
                ),
                longest_streak_days: metrics::longest_streak(&state.daily_messages),
                longest_session: match &cache.longest_session {
                    Some(session) => LongestSession {
                        hours: metrics::duration_hours(session.duration),
                        messages: session.message_count,
                    },
                    None => LongestSession {
                        hours: 0.0,
                        messages: 0,
                    },
                },
            },
            prompt_words: top_words(&state.word_frequency),
        }
    }

    /// Serialize the report for the external renderer.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

fn favorite_model(model_usage: &HashMap<String, ModelUsage>) -> Option<String> {
    model_usage
        .iter()
        // Highest output-token count wins; name order settles ties.
        .max_by(|a, b| {
            a.1.output_tokens
                .cmp(&b.1.output_tokens)
                .then_with(|| b.0.cmp(a.0))
        })
        .map(|(model, _)| clean_model_name(model))
}

fn model_breakdown(model_usage: &HashMap<String, ModelUsage>) -> Vec<ModelBreakdown> {
    let mut models: Vec<ModelBreakdown> = model_usage
        .iter()
        .map(|(name, usage)| ModelBreakdown {
            name: clean_model_name(name),
            output_tokens: usage.output_tokens,
            input_tokens: usage.input_tokens,
        })
        .collect();
    models.sort_by(|a, b| {
        b.output_tokens
            .cmp(&a.output_tokens)
            .then_with(|| a.name.cmp(&b.name))
    });
    models
}

/// Display name for a model id: drop the vendor prefix and any trailing
/// `-YYYYMMDD` release date.
fn clean_model_name(model: &str) -> String {
    let name = model.strip_prefix("claude-").unwrap_or(model);
    match name.rsplit_once('-') {
        Some((base, suffix))
            if suffix.len() == 8
                && suffix.starts_with("20")
                && suffix.bytes().all(|b| b.is_ascii_digit()) =>
        {
            base.to_string()
        }
        _ => name.to_string(),
    }
}

fn language_shares(state: &AggregateState) -> Vec<LanguageShare> {
    let total: u64 = state.language_lines.values().sum();
    let max = state.language_lines.values().copied().max().unwrap_or(0);

    let mut shares: Vec<LanguageShare> = state
        .language_lines
        .iter()
        .map(|(&name, &lines)| LanguageShare {
            name: name.to_string(),
            lines,
            percent: metrics::percentage(lines, total),
            bar: metrics::bar_length(lines, max),
        })
        .collect();
    shares.sort_by(|a, b| b.lines.cmp(&a.lines).then_with(|| a.name.cmp(&b.name)));
    shares
}

fn tool_shares(state: &AggregateState) -> Vec<ToolShare> {
    let total: u64 = state.tool_counts.values().sum();
    let max = state.tool_counts.values().copied().max().unwrap_or(0);

    let mut shares: Vec<ToolShare> = state
        .tool_counts
        .iter()
        .map(|(name, &invocations)| ToolShare {
            name: name.clone(),
            invocations,
            percent: metrics::percentage(invocations, total),
            bar: metrics::bar_length(invocations, max),
        })
        .collect();
    shares.sort_by(|a, b| {
        b.invocations
            .cmp(&a.invocations)
            .then_with(|| a.name.cmp(&b.name))
    });
    shares
}

fn top_words(word_frequency: &HashMap<String, u64>) -> Vec<WordCount> {
    let mut words: Vec<WordCount> = word_frequency
        .iter()
        .map(|(word, &count)| WordCount {
            word: word.clone(),
            count,
        })
        .collect();
    words.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    words.truncate(TOP_WORDS);
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_inputs_yield_total_emission() {
        let report = Report::build(&CacheSnapshot::default(), &AggregateState::new());

        assert_eq!(report.period.days, 0);
        assert!(report.period.start.is_none());
        assert_eq!(report.summary.prompts, 0);
        assert!(report.summary.favorite_model.is_none());
        assert_eq!(report.weekday_activity.len(), 7);
        assert_eq!(report.hourly_activity.len(), 24);
        assert!(report.weekday_activity.iter().all(|w| w.bar == 0));
        assert_eq!(report.highlights.avg_prompts_per_day, 0.0);
        assert_eq!(report.highlights.peak_hours.prompts, 0);

        // Must serialize even when everything is zero
        let json = report.to_json(true).unwrap();
        assert!(json.contains("\"busiestDay\""));
    }

    fn usage(output_tokens: u64, input_tokens: u64) -> ModelUsage {
        ModelUsage {
            output_tokens,
            input_tokens,
        }
    }

    #[test]
    fn test_favorite_model_prefers_highest_output() {
        let mut models = HashMap::new();
        models.insert("claude-opus-4".to_string(), usage(100, 0));
        models.insert("claude-sonnet-4".to_string(), usage(900, 0));
        assert_eq!(favorite_model(&models).as_deref(), Some("sonnet-4"));
    }

    #[test]
    fn test_favorite_model_tie_is_deterministic() {
        let mut models = HashMap::new();
        models.insert("model-b".to_string(), usage(10, 0));
        models.insert("model-a".to_string(), usage(10, 0));
        assert_eq!(favorite_model(&models).as_deref(), Some("model-a"));
    }

    #[test]
    fn test_clean_model_name_strips_prefix_and_date() {
        assert_eq!(clean_model_name("claude-sonnet-4-20250514"), "sonnet-4");
        assert_eq!(clean_model_name("claude-opus-4"), "opus-4");
        assert_eq!(clean_model_name("gpt-4"), "gpt-4");
        // A short numeric tail is a version, not a release date
        assert_eq!(clean_model_name("claude-3-5-haiku"), "3-5-haiku");
    }

    #[test]
    fn test_model_breakdown_sorted_by_output_tokens() {
        let mut models = HashMap::new();
        models.insert("claude-opus-4-20250514".to_string(), usage(100, 700));
        models.insert("claude-sonnet-4".to_string(), usage(900, 300));
        let breakdown = model_breakdown(&models);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].name, "sonnet-4");
        assert_eq!(breakdown[0].output_tokens, 900);
        assert_eq!(breakdown[0].input_tokens, 300);
        assert_eq!(breakdown[1].name, "opus-4");
        assert_eq!(breakdown[1].input_tokens, 700);
    }

    #[test]
    fn test_cache_fallback_when_sources_missing() {
        let cache = CacheSnapshot {
            session_count: 40,
            prompt_count: 120,
            tool_call_count: 300,
            output_tokens: 99_000,
            project_count: 6,
            ..CacheSnapshot::default()
        };
        let report = Report::build(&cache, &AggregateState::new());
        assert_eq!(report.summary.prompts, 120);
        assert_eq!(report.summary.tool_calls, 300);
        assert_eq!(report.summary.projects, 6);
        assert_eq!(report.summary.sessions, 40);
        // Fallback totals never leak into the per-day average: with no
        // observed prompts and no active days it stays at zero.
        assert_eq!(report.highlights.avg_prompts_per_day, 0.0);
    }

    #[test]
    fn test_longest_session_highlight_from_cache() {
        let cache = CacheSnapshot {
            longest_session: Some(crate::models::LongestSession {
                duration: 5_400_000,
                message_count: 42,
            }),
            ..CacheSnapshot::default()
        };
        let report = Report::build(&cache, &AggregateState::new());
        assert_eq!(report.highlights.longest_session.hours, 1.5);
        assert_eq!(report.highlights.longest_session.messages, 42);

        let empty = Report::build(&CacheSnapshot::default(), &AggregateState::new());
        assert_eq!(empty.highlights.longest_session.hours, 0.0);
        assert_eq!(empty.highlights.longest_session.messages, 0);
    }
}
