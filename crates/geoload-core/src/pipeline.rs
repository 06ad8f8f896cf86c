//! Per-dataset orchestration across the three sinks.
//!
//! Datasets are loaded one at a time, and each dataset goes to its sinks one
//! at a time, in [`LoadTarget::ALL`] order. The first failure stops the run;
//! sinks that were already loaded keep their new contents.

use std::path::PathBuf;

use geoload_core_common::{Dataset, DocumentSink, LoadTarget, RelationalSink, Reprojector};
use geoload_opensearch::{HttpIndexClient, OpenSearchSink};
use geoload_postgis::PostgisSink;
use log::info;

use crate::config::LoadConfig;
use crate::discovery::{discover_inputs, read_dataset};
use crate::error::{GeoLoadError, Result};
use crate::types::{DatasetReport, RunSummary, SinkOutcome};

/// Observer for progress reporting. All methods default to no-ops.
pub trait LoadObserver {
    /// Called once input discovery has finished.
    fn on_inputs(&mut self, _count: usize) {}

    /// Called before a sink is loaded.
    fn on_sink_start(&mut self, _dataset: &str, _target: LoadTarget, _sink_name: &str) {}

    /// Called after a sink finished loading.
    fn on_sink_done(&mut self, _dataset: &str, _outcome: &SinkOutcome) {}

    /// Called for a dataset without features.
    fn on_skipped(&mut self, _dataset: &str) {}
}

/// A [`LoadObserver`] that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl LoadObserver for NoopObserver {}

/// Loads one dataset into every sink.
///
/// Empty datasets are skipped without touching any sink.
///
/// # Errors
///
/// Returns [`GeoLoadError::Sink`] for the first sink that fails, or
/// [`GeoLoadError::Transform`] if the LV95 copy cannot be produced. Sinks
/// loaded before the failure are not rolled back.
pub async fn load_dataset<R, D>(
    dataset: &Dataset,
    relational: &mut R,
    documents: &mut D,
    reprojector: &Reprojector,
    observer: &mut dyn LoadObserver,
) -> Result<DatasetReport>
where
    R: RelationalSink + ?Sized,
    D: DocumentSink + ?Sized,
{
    if dataset.is_empty() {
        info!("Dataset {} is empty, skipping", dataset.name);
        observer.on_skipped(&dataset.name);
        return Ok(DatasetReport::skipped(&dataset.name));
    }

    let mut outcomes = Vec::with_capacity(LoadTarget::ALL.len());
    for target in LoadTarget::ALL {
        let sink_name = target.sink_name(&dataset.name);
        observer.on_sink_start(&dataset.name, target, &sink_name);

        let fail = |source| GeoLoadError::sink(target, &dataset.name, source);
        let (rows, errors) = match target {
            LoadTarget::Relational => {
                let rows = relational
                    .load(&sink_name, &dataset.features, target.crs())
                    .await
                    .map_err(fail)?;
                (rows, 0)
            },
            LoadTarget::DocumentIndex => {
                let report = documents
                    .load(&sink_name, &dataset.features)
                    .await
                    .map_err(fail)?;
                (report.indexed, report.errors)
            },
            LoadTarget::RelationalLv95 => {
                let projected = reprojector.reproject_features(&dataset.features)?;
                let rows = relational
                    .load(&sink_name, &projected, target.crs())
                    .await
                    .map_err(fail)?;
                (rows, 0)
            },
        };

        let outcome = SinkOutcome {
            target,
            sink_name,
            rows,
            errors,
        };
        observer.on_sink_done(&dataset.name, &outcome);
        outcomes.push(outcome);
    }

    Ok(DatasetReport {
        dataset: dataset.name.clone(),
        outcomes,
        skipped: false,
    })
}

/// Loads every dataset of `inputs` in order, stopping at the first failure.
///
/// # Errors
///
/// Returns the first read, parse, transform or sink error.
pub async fn load_all<R, D>(
    inputs: &[PathBuf],
    relational: &mut R,
    documents: &mut D,
    observer: &mut dyn LoadObserver,
) -> Result<Vec<DatasetReport>>
where
    R: RelationalSink + ?Sized,
    D: DocumentSink + ?Sized,
{
    let reprojector = Reprojector::wgs84_to_lv95()?;
    let mut reports = Vec::with_capacity(inputs.len());
    for path in inputs {
        let dataset = read_dataset(path)?;
        let report = load_dataset(&dataset, relational, documents, &reprojector, observer).await?;
        reports.push(report);
    }
    Ok(reports)
}

/// Runs a full load: validates the configuration, discovers inputs, connects
/// both sinks and loads every dataset.
///
/// A data directory without input files returns an empty summary without
/// connecting to anything; the caller decides how to report that.
///
/// # Errors
///
/// Returns configuration, discovery, connection and load errors.
pub async fn run(config: &LoadConfig, observer: &mut dyn LoadObserver) -> Result<RunSummary> {
    config.validate()?;

    let inputs = discover_inputs(&config.data_dir)?;
    observer.on_inputs(inputs.len());
    if inputs.is_empty() {
        return Ok(RunSummary::default());
    }

    let mut relational = PostgisSink::connect(&config.postgis)
        .await
        .map_err(|source| GeoLoadError::Connect {
            target: LoadTarget::Relational,
            source,
        })?;
    let client = HttpIndexClient::new(config.opensearch.clone())
        .map_err(|source| GeoLoadError::Connect {
            target: LoadTarget::DocumentIndex,
            source,
        })?;
    let mut documents = OpenSearchSink::new(client);

    let datasets = load_all(&inputs, &mut relational, &mut documents, observer).await?;
    info!(
        "Loaded {} of {} dataset(s)",
        datasets.iter().filter(|d| !d.skipped).count(),
        datasets.len()
    );
    Ok(RunSummary { inputs, datasets })
}
