// Output formatting for CLI

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde_json::{json, Value};

use crate::cli::config::OutputFormat;

/// Tags of one file as printed by the CLI
pub type FlatTags = BTreeMap<String, Vec<String>>;

/// Keep only the requested keys; an empty list keeps everything
pub fn filter_fields(tags: FlatTags, fields: &[String]) -> FlatTags {
    if fields.is_empty() {
        return tags;
    }
    tags.into_iter()
        .filter(|(key, _)| fields.iter().any(|f| f.trim().eq_ignore_ascii_case(key)))
        .collect()
}

/// Format and output data
pub struct OutputFormatter {
    format: OutputFormat,
    pub quiet: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    /// Output the tags of one file
    pub fn output_tags(&self, path: &Path, tags: &FlatTags, writer: &mut impl Write) -> Result<()> {
        let record = json!({
            "file": path.display().to_string(),
            "tags": tags,
        });

        match self.format {
            OutputFormat::Pretty => {
                writeln!(writer, "{}", serde_json::to_string_pretty(&record)?)?;
            }
            OutputFormat::Json => {
                writeln!(writer, "{}", serde_json::to_string(&record)?)?;
            }
            OutputFormat::KeyValue => {
                self.output_key_value(&record, writer)?;
            }
            OutputFormat::Table => {
                self.output_table(path, tags, writer)?;
            }
        }
        Ok(())
    }

    /// Output as key-value pairs
    fn output_key_value(&self, record: &Value, writer: &mut impl Write) -> Result<()> {
        writeln!(writer, "file: {}", self.format_value(&record["file"]))?;
        if let Some(obj) = record["tags"].as_object() {
            for (key, value) in obj {
                writeln!(writer, "{}: {}", key, self.format_value(value))?;
            }
        }
        writeln!(writer)?;
        Ok(())
    }

    /// Output as table
    fn output_table(&self, path: &Path, tags: &FlatTags, writer: &mut impl Write) -> Result<()> {
        let max_key_len = tags.keys().map(|k| k.len()).max().unwrap_or(0);

        writeln!(writer, "{}", path.display())?;
        writeln!(writer, "{}", "=".repeat(max_key_len + 30))?;
        for (key, values) in tags {
            writeln!(writer, "{:<width$} {}", format!("{key}:"), values.join("; "), width = max_key_len + 1)?;
        }
        writeln!(writer, "{}", "=".repeat(max_key_len + 30))?;
        Ok(())
    }

    /// Format a JSON value for display
    fn format_value(&self, value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Null => "(null)".to_string(),
            Value::Array(items) => items
                .iter()
                .map(|item| self.format_value(item))
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        }
    }

    /// Print success message
    pub fn print_success(&self, message: &str) {
        if !self.quiet {
            eprintln!("✓ {}", message);
        }
    }

    /// Print error message
    pub fn print_error(&self, message: &str) {
        eprintln!("✗ {}", message);
    }

    /// Print info message
    pub fn print_info(&self, message: &str) {
        if !self.quiet {
            eprintln!("  {}", message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FlatTags {
        let mut tags = FlatTags::new();
        tags.insert("ARTIST".to_string(), vec!["A".to_string(), "B".to_string()]);
        tags.insert("TITLE".to_string(), vec!["Song".to_string()]);
        tags.insert("duration".to_string(), vec!["240".to_string()]);
        tags.insert("type".to_string(), vec!["FLAC".to_string()]);
        tags
    }

    fn render(format: OutputFormat) -> String {
        let mut out = Vec::new();
        OutputFormatter::new(format, true)
            .output_tags(Path::new("song.flac"), &sample(), &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_json_record() {
        let value: Value = serde_json::from_str(render(OutputFormat::Json).trim()).unwrap();
        assert_eq!(value["file"], "song.flac");
        assert_eq!(value["tags"]["ARTIST"], json!(["A", "B"]));
        assert_eq!(value["tags"]["type"], json!(["FLAC"]));
    }

    #[test]
    fn test_key_value_lines() {
        let text = render(OutputFormat::KeyValue);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "file: song.flac");
        assert!(lines.contains(&"ARTIST: A; B"));
        assert!(lines.contains(&"duration: 240"));
    }

    #[test]
    fn test_table_layout() {
        let text = render(OutputFormat::Table);
        assert!(text.starts_with("song.flac\n"));
        assert!(text.contains("TITLE:    Song"));
    }

    #[test]
    fn test_filter_fields_is_case_insensitive() {
        let filtered = filter_fields(sample(), &["title".to_string(), "TYPE".to_string()]);
        assert_eq!(filtered.keys().collect::<Vec<_>>(), ["TITLE", "type"]);

        assert_eq!(filter_fields(sample(), &[]).len(), 4);
    }
}
