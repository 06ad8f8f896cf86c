//! Load results reported back to the caller.

use std::path::PathBuf;

use geoload_core_common::LoadTarget;

/// Result of loading one dataset into one sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkOutcome {
    /// Sink that was loaded
    pub target: LoadTarget,
    /// Table or index name
    pub sink_name: String,
    /// Rows or documents present after the load
    pub rows: u64,
    /// Documents rejected by the sink; always 0 for tables
    pub errors: u64,
}

/// Result of loading one dataset into every sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetReport {
    /// Dataset name
    pub dataset: String,
    /// One outcome per sink, in load order
    pub outcomes: Vec<SinkOutcome>,
    /// Set when the dataset had no features and no sink was touched
    pub skipped: bool,
}

impl DatasetReport {
    /// A report for a dataset that was not loaded.
    #[must_use]
    pub fn skipped(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            outcomes: Vec::new(),
            skipped: true,
        }
    }

    /// Total rejected documents across sinks.
    #[must_use]
    pub fn errors(&self) -> u64 {
        self.outcomes.iter().map(|o| o.errors).sum()
    }
}

/// Result of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Input files found, in load order
    pub inputs: Vec<PathBuf>,
    /// One report per input file
    pub datasets: Vec<DatasetReport>,
}

impl RunSummary {
    /// Number of datasets that were loaded rather than skipped.
    #[must_use]
    pub fn loaded(&self) -> usize {
        self.datasets.iter().filter(|d| !d.skipped).count()
    }
}
