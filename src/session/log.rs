use std::fmt;

/// Named pipeline steps, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    /// Speech engine init.
    LoadEngine,
    /// Narration synthesis.
    Synthesize,
    /// Audio decode and capture.
    Render,
}

impl PipelineStep {
    /// Steps in execution order.
    pub const ALL: [PipelineStep; 3] = [Self::LoadEngine, Self::Synthesize, Self::Render];

    /// Display label; log entries are keyed by it.
    pub fn label(self) -> &'static str {
        match self {
            Self::LoadEngine => "Loading speech engine",
            Self::Synthesize => "Synthesizing narration",
            Self::Render => "Rendering video",
        }
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status of one log entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Started, not finished.
    Pending,
    /// Finished successfully.
    Done,
    /// Failed.
    Error,
}

/// One progress log entry.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LogEntry {
    /// Step label.
    pub label: String,
    /// Current status.
    pub status: StepStatus,
}

/// Ordered progress log with at most one entry per label.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PipelineLog {
    entries: Vec<LogEntry>,
}

impl PipelineLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update the entry for `label`, keeping its original position.
    pub fn upsert(&mut self, label: &str, status: StepStatus) {
        match self.entries.iter_mut().find(|e| e.label == label) {
            Some(entry) => entry.status = status,
            None => self.entries.push(LogEntry {
                label: label.to_string(),
                status,
            }),
        }
    }

    /// Upsert the entry of a pipeline step.
    pub fn mark(&mut self, step: PipelineStep, status: StepStatus) {
        self.upsert(step.label(), status);
    }

    /// Status of `label`, if logged.
    pub fn status(&self, label: &str) -> Option<StepStatus> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.status)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Whether the log has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/log.rs"]
mod tests;
