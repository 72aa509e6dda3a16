use anyhow::Result;
use clap::Parser;

use claude_recap::logging;
use claude_recap::RecapGenerator;

/// Generate a usage recap from Claude Code's local activity logs.
///
/// Reads ~/.claude (override with CLAUDE_HOME) and prints a JSON report
/// to stdout. Diagnostics go to stderr.
#[derive(Parser)]
#[command(name = "claude-recap", version)]
struct Cli {}

fn main() -> Result<()> {
    let _cli = Cli::parse();

    // Hold the appender guard so file-logged lines flush on exit.
    let _guard = logging::init_logging();

    RecapGenerator::new().run()
}
