//! Console output: the startup banner, progress lines and the final summary
//! table.

use tabled::{Table, Tabled};

use geoload_core::{LoadConfig, LoadTarget, RunSummary, SinkOutcome};

const RULE_WIDTH: usize = 55;

/// Table row for one dataset/sink pair of the run summary.
#[derive(Debug, Tabled)]
pub struct SummaryRow {
    #[tabled(rename = "Dataset")]
    pub dataset: String,
    #[tabled(rename = "Sink")]
    pub sink: String,
    /// Table or index name.
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Rows")]
    pub rows: String,
    /// Rejected documents; only meaningful for the search index.
    #[tabled(rename = "Errors")]
    pub errors: String,
}

/// Prints the run header.
pub fn print_banner(config: &LoadConfig, files: usize) {
    let rule = "=".repeat(RULE_WIDTH);
    println!("{rule}");
    println!(" Loading GeoJSON files into PostGIS & OpenSearch");
    println!("{rule}");
    println!("Data dir:    {}", config.data_dir.display());
    println!("PostGIS:     {}", config.postgis.endpoint());
    println!("OpenSearch:  {}", config.opensearch.base_url);
    println!("Files:       {files}");
    println!();
}

/// Completion text for one sink, e.g. `12 features (1 skipped - invalid geometry)`.
#[must_use]
pub fn outcome_line(outcome: &SinkOutcome) -> String {
    let mut line = format!("{} features", outcome.rows);
    if outcome.errors > 0 {
        line.push_str(&format!(" ({} skipped - invalid geometry)", outcome.errors));
    }
    line
}

/// Flattens a run summary into table rows. Skipped datasets get a single row.
#[must_use]
pub fn summary_rows(summary: &RunSummary) -> Vec<SummaryRow> {
    let mut rows = Vec::new();
    for report in &summary.datasets {
        if report.skipped {
            rows.push(SummaryRow {
                dataset: report.dataset.clone(),
                sink: "-".to_string(),
                name: "skipped (empty)".to_string(),
                rows: "0".to_string(),
                errors: "-".to_string(),
            });
            continue;
        }
        for outcome in &report.outcomes {
            rows.push(SummaryRow {
                dataset: report.dataset.clone(),
                sink: outcome.target.to_string(),
                name: outcome.sink_name.clone(),
                rows: outcome.rows.to_string(),
                errors: if outcome.target == LoadTarget::DocumentIndex {
                    outcome.errors.to_string()
                } else {
                    "-".to_string()
                },
            });
        }
    }
    rows
}

/// Prints the summary table.
pub fn display_summary(summary: &RunSummary) {
    println!(
        "Done: {} of {} dataset(s) loaded",
        summary.loaded(),
        summary.datasets.len()
    );
    let rows = summary_rows(summary);
    if !rows.is_empty() {
        println!("{}", Table::new(rows));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoload_core::DatasetReport;

    fn outcome(target: LoadTarget, rows: u64, errors: u64) -> SinkOutcome {
        SinkOutcome {
            target,
            sink_name: target.sink_name("roads"),
            rows,
            errors,
        }
    }

    #[test]
    fn test_outcome_line() {
        assert_eq!(outcome_line(&outcome(LoadTarget::Relational, 3, 0)), "3 features");
        assert_eq!(
            outcome_line(&outcome(LoadTarget::DocumentIndex, 2, 1)),
            "2 features (1 skipped - invalid geometry)"
        );
    }

    #[test]
    fn test_summary_rows() {
        let summary = RunSummary {
            inputs: Vec::new(),
            datasets: vec![
                DatasetReport {
                    dataset: "roads".to_string(),
                    outcomes: LoadTarget::ALL
                        .iter()
                        .map(|t| outcome(*t, 3, u64::from(*t == LoadTarget::DocumentIndex)))
                        .collect(),
                    skipped: false,
                },
                DatasetReport::skipped("empty"),
            ],
        };

        let rows = summary_rows(&summary);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].name, "geojson_roads");
        assert_eq!(rows[0].errors, "-");
        assert_eq!(rows[1].sink, "OpenSearch");
        assert_eq!(rows[1].errors, "1");
        assert_eq!(rows[2].name, "geojson_roads_lv95");
        assert_eq!(rows[3].dataset, "empty");
        assert_eq!(rows[3].name, "skipped (empty)");
    }

    #[test]
    fn test_table_renders_headers() {
        let table = Table::new(vec![SummaryRow {
            dataset: "roads".to_string(),
            sink: "PostGIS".to_string(),
            name: "geojson_roads".to_string(),
            rows: "3".to_string(),
            errors: "-".to_string(),
        }])
        .to_string();
        for header in ["Dataset", "Sink", "Name", "Rows", "Errors"] {
            assert!(table.contains(header));
        }
    }
}
