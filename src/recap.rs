//! Recap pipeline orchestrator
//!
//! Ties the stages together in strict forward order: locate the sources,
//! stream each one through its parser into the aggregate fold, derive the
//! metrics and emit the report. One pass per source, single-threaded, no
//! intermediate state survives the run.

use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::aggregator::AggregateState;
use crate::config::get_config;
use crate::discovery::LogLocator;
use crate::models::CacheSnapshot;
use crate::parser::{CacheParser, HistoryParser, TranscriptParser};
use crate::report::Report;

pub struct RecapGenerator {
    locator: LogLocator,
}

impl Default for RecapGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl RecapGenerator {
    pub fn new() -> Self {
        Self {
            locator: LogLocator::new(),
        }
    }

    /// Generator rooted at an explicit directory instead of the configured
    /// Claude home. Used by tests and callers that manage their own paths.
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            locator: LogLocator::with_base(base),
        }
    }

    /// Run the full pipeline and return the report. Infallible by design:
    /// missing or broken sources degrade to zero-valued sections.
    pub fn generate(&self) -> Report {
        let (cache, state) = self.aggregate();
        Report::build(&cache, &state)
    }

    /// Run the full pipeline and print the report document to stdout.
    pub fn run(&self) -> Result<()> {
        let report = self.generate();
        println!("{}", report.to_json(get_config().output.json_pretty)?);
        Ok(())
    }

    fn aggregate(&self) -> (CacheSnapshot, AggregateState) {
        let cache = CacheParser::parse_file(self.locator.cache_file().as_deref());

        let mut state = AggregateState::new();

        HistoryParser::parse(self.locator.history_file().as_deref(), |event| {
            state.record_prompt(event);
        });
        debug!(prompts = state.prompts_total, "history folded");

        let transcripts = self.locator.transcript_files();
        info!(files = transcripts.len(), "processing transcript files");
        for path in &transcripts {
            TranscriptParser::parse(path, |invocation| {
                state.record_invocation(invocation);
            });
        }
        debug!(invocations = state.invocations_total, "transcripts folded");

        (cache, state)
    }
}
