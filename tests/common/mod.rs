use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create an empty mock Claude home directory.
pub fn claude_home() -> TempDir {
    TempDir::new().unwrap()
}

pub fn write_cache(base: &Path, content: &str) -> Result<()> {
    fs::write(base.join("stats-cache.json"), content)?;
    Ok(())
}

pub fn write_history(base: &Path, lines: &[&str]) -> Result<()> {
    fs::write(base.join("history.jsonl"), lines.join("\n"))?;
    Ok(())
}

/// Write one transcript file under projects/<project_dir>/.
pub fn write_transcript(base: &Path, project_dir: &str, lines: &[&str]) -> Result<PathBuf> {
    let dir = base.join("projects").join(project_dir);
    fs::create_dir_all(&dir)?;
    let path = dir.join("session.jsonl");
    fs::write(&path, lines.join("\n"))?;
    Ok(path)
}

/// A history line with an RFC 3339 timestamp.
pub fn history_line(display: &str, project: &str, timestamp: &str) -> String {
    format!(
        r#"{{"display":"{}","project":"{}","timestamp":"{}"}}"#,
        display, project, timestamp
    )
}

/// A transcript line in the nested tool_use shape.
pub fn tool_use_line(tool: &str, file_path: &str, timestamp: &str) -> String {
    format!(
        r#"{{"timestamp":"{}","message":{{"content":[{{"type":"tool_use","name":"{}","input":{{"file_path":"{}"}}}}]}}}}"#,
        timestamp, tool, file_path
    )
}
