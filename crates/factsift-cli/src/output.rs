//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use factsift_domain::Fact;
use factsift_reducer::{RunReport, SimilarityMethod};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Longest statement shown in a table cell.
const STATEMENT_WIDTH: usize = 60;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// The selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format facts output.
    pub fn format_facts(&self, facts: &[Fact]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&facts_json(facts))?),
            OutputFormat::Table => Ok(self.format_facts_table(facts)),
            OutputFormat::Quiet => Ok(self.format_facts_quiet(facts)),
        }
    }

    /// Format facts together with the run report.
    pub fn format_reduction(&self, facts: &[Fact], report: &RunReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "facts": facts_json(facts),
                    "report": report,
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            _ => Ok(format!("{}\n\n{}", self.format_facts(facts)?, self.format_report(report))),
        }
    }

    /// Format a run report as a table.
    pub fn format_report(&self, report: &RunReport) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Stage", "In", "Out", "Dropped"]);
        if report.blank_dropped > 0 {
            let (input, output) = (report.input_count, report.input_count - report.blank_dropped);
            builder.push_record([
                "blank".to_string(),
                input.to_string(),
                output.to_string(),
                report.blank_dropped.to_string(),
            ]);
        }
        for stage in &report.stages {
            builder.push_record([
                stage.stage.clone(),
                stage.input.to_string(),
                stage.output.to_string(),
                stage.dropped().to_string(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let mut lines = vec![table.to_string()];
        lines.push(self.info(&format!(
            "{} -> {} facts in {}ms",
            report.input_count,
            report.output_count(),
            report.runtime_ms
        )));
        if report.cancelled {
            lines.push(self.warning("Run cancelled before all stages completed"));
        }
        lines.join("\n")
    }

    /// Format a pairwise similarity.
    pub fn format_similarity(&self, method: SimilarityMethod, similarity: f64) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "method": method.as_str(),
                "similarity": similarity,
            }))?),
            OutputFormat::Table => Ok(format!("{} similarity: {:.4}", method, similarity)),
            OutputFormat::Quiet => Ok(format!("{:.4}", similarity)),
        }
    }

    /// Format facts as a table.
    fn format_facts_table(&self, facts: &[Fact]) -> String {
        if facts.is_empty() {
            return self.colorize("No facts survived.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Statement", "Source", "Reliability", "Importance"]);

        for fact in facts {
            let id = fact.id.to_string();
            builder.push_record([
                id[..8].to_string(), // Truncate ID for readability
                truncate(&fact.statement, STATEMENT_WIDTH),
                fact.source.clone().unwrap_or_else(|| "-".to_string()),
                fact.reliability.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string()),
                fact.importance.map(|i| format!("{:.3}", i)).unwrap_or_else(|| "-".to_string()),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format facts in quiet mode (IDs only).
    fn format_facts_quiet(&self, facts: &[Fact]) -> String {
        let ids: Vec<String> = facts.iter().map(|f| f.id.to_string()).collect();
        ids.join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Serializable view of facts; embeddings are left out.
fn facts_json(facts: &[Fact]) -> Vec<serde_json::Value> {
    facts
        .iter()
        .map(|f| {
            serde_json::json!({
                "id": f.id.to_string(),
                "statement": f.statement,
                "source": f.source,
                "title": f.title,
                "reliability": f.reliability.map(|r| r.as_str()),
                "tags": f.tags,
                "entities": f.entities.iter().map(|e| serde_json::json!({
                    "text": e.text,
                    "category": e.category,
                })).collect::<Vec<_>>(),
                "importance": f.importance,
            })
        })
        .collect()
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}
