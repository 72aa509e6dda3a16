//! Claude Recap Library
//!
//! Extracts usage statistics from Claude Code's local activity logs and
//! renders them into a single machine-readable report for a downstream,
//! language-capable renderer. Three read-only sources feed the pipeline:
//!
//! - `stats-cache.json` - aggregate session/model counters
//! - `history.jsonl` - one line per user prompt
//! - `projects/*/*.jsonl` - per-project session transcripts
//!
//! ## Architecture Overview
//!
//! Data flows strictly forward through the modules:
//!
//! - [`discovery`] - resolves source paths, tolerating absent sources
//! - [`parser`] - decodes each format into normalized records, skipping
//!   malformed lines; prompt text and file paths never leave this layer
//! - [`aggregator`] - folds records into running counters and distributions
//! - [`metrics`] - derived statistics over the completed fold (peaks,
//!   streaks, percentages, bar ratios)
//! - [`report`] - the output document and its JSON emission
//!
//! Support modules: [`models`] (wire and normalized types), [`languages`]
//! (extension classification table), [`timestamp`] (format-tolerant
//! parsing), [`config`] and [`logging`] (runtime plumbing).
//!
//! ## Main Entry Point
//!
//! [`RecapGenerator`] runs the whole pipeline:
//!
//! ```rust,no_run
//! use claude_recap::RecapGenerator;
//!
//! let report = RecapGenerator::new().generate();
//! println!("{}", report.to_json(true).unwrap());
//! ```
//!
//! The pipeline is deliberately hard to crash: missing sources, malformed
//! lines and unreadable files all degrade to zero-valued report sections.
//! The worst case is an all-zero document, never an error.

pub mod aggregator;
pub mod config;
pub mod discovery;
pub mod languages;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod parser;
pub mod recap;
pub mod report;
pub mod timestamp;

pub use recap::RecapGenerator;
pub use report::Report;
