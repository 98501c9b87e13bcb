//! Audit trail of one pipeline run

use serde::Serialize;

/// Facts entering and leaving one stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    /// Stage name as configured (e.g. "entity-based")
    pub stage: String,

    /// Facts handed to the stage
    pub input: usize,

    /// Facts surviving the stage
    pub output: usize,
}

impl StageReport {
    /// Facts this stage removed
    pub fn dropped(&self) -> usize {
        self.input.saturating_sub(self.output)
    }
}

/// Where reduction happened during one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Facts handed to the pipeline
    pub input_count: usize,

    /// Facts dropped up front for having a blank statement
    pub blank_dropped: usize,

    /// One entry per completed stage, in execution order
    pub stages: Vec<StageReport>,

    /// True if the run stopped early on request
    pub cancelled: bool,

    /// True if surviving facts carry an importance score
    pub scored: bool,

    /// Wall-clock runtime in milliseconds
    pub runtime_ms: u64,
}

impl RunReport {
    /// Create an empty report for `input_count` facts
    pub fn new(input_count: usize) -> Self {
        Self {
            input_count,
            ..Self::default()
        }
    }

    /// Record a completed stage
    pub fn record_stage(&mut self, stage: impl Into<String>, input: usize, output: usize) {
        self.stages.push(StageReport {
            stage: stage.into(),
            input,
            output,
        });
    }

    /// Facts surviving the run
    pub fn output_count(&self) -> usize {
        match self.stages.last() {
            Some(stage) => stage.output,
            None => self.input_count.saturating_sub(self.blank_dropped),
        }
    }

    /// Facts removed by the whole run, blank statements included
    pub fn total_dropped(&self) -> usize {
        self.input_count.saturating_sub(self.output_count())
    }

    /// Generate a human-readable summary
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Reduction Summary".to_string(),
            "=================".to_string(),
            format!("Input facts: {}", self.input_count),
        ];

        if self.blank_dropped > 0 {
            lines.push(format!("Blank statements dropped: {}", self.blank_dropped));
        }

        for stage in &self.stages {
            lines.push(format!(
                "  {}: {} -> {} (-{})",
                stage.stage,
                stage.input,
                stage.output,
                stage.dropped()
            ));
        }

        lines.push(format!("Output facts: {}", self.output_count()));
        lines.push(format!("Total dropped: {}", self.total_dropped()));
        if self.cancelled {
            lines.push("Run cancelled before all stages completed".to_string());
        }
        lines.push(format!("Runtime: {}ms", self.runtime_ms));

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report() {
        let report = RunReport::new(0);
        assert_eq!(report.output_count(), 0);
        assert_eq!(report.total_dropped(), 0);
    }

    #[test]
    fn test_record_stages() {
        let mut report = RunReport::new(10);
        report.blank_dropped = 1;
        report.record_stage("length-filter", 9, 7);
        report.record_stage("entity-based", 7, 4);

        assert_eq!(report.stages[0].dropped(), 2);
        assert_eq!(report.output_count(), 4);
        assert_eq!(report.total_dropped(), 6);
    }

    #[test]
    fn test_no_stages_counts_blanks() {
        let mut report = RunReport::new(5);
        report.blank_dropped = 2;
        assert_eq!(report.output_count(), 3);
    }

    #[test]
    fn test_summary() {
        let mut report = RunReport::new(3);
        report.record_stage("similarity-based", 3, 2);
        report.cancelled = true;
        report.runtime_ms = 12;

        let summary = report.summary();
        assert!(summary.contains("Input facts: 3"));
        assert!(summary.contains("similarity-based: 3 -> 2 (-1)"));
        assert!(summary.contains("cancelled"));
        assert!(summary.contains("Runtime: 12ms"));
    }
}
