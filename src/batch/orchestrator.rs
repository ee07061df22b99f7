use rayon::prelude::*;

use super::error::{BatchError, PairError};
use super::types::{
    BatchRequest, BatchResult, BatchSummary, PairOutcome, PairResult, SatelliteInput,
    SatelliteSource,
};
use crate::oracle::PropagationOracle;
use crate::predict::{find_access_windows, CancelToken, PredictError};
use crate::synth::{self, CatalogAllocator};
use crate::tle::{self, TwoLineElement};

/// Evaluate every satellite/site pair of `request`.
///
/// A failing pair is recorded and does not affect the others. Pairs run on
/// at most `request.workers` threads and are merged back in satellite-major,
/// site-minor order. Once `cancel` trips, no new pair starts and pairs cut
/// off mid-sweep are left out of the result.
pub fn run_batch<O: PropagationOracle + Sync + ?Sized>(
    oracle: &O,
    request: &BatchRequest,
    catalog: &dyn CatalogAllocator,
    cancel: &CancelToken,
) -> Result<BatchResult, BatchError> {
    request
        .pass
        .validate()
        .map_err(|e| BatchError::InvalidInput(e.to_string()))?;
    if request.start >= request.end {
        return Err(BatchError::InvalidInput(format!(
            "start {} is not before end {}",
            request.start, request.end
        )));
    }

    let resolved: Vec<_> = request
        .satellites
        .iter()
        .map(|satellite| resolve(satellite, catalog))
        .collect();

    let pairs: Vec<(usize, usize)> = (0..request.satellites.len())
        .flat_map(|sat| (0..request.sites.len()).map(move |site| (sat, site)))
        .collect();
    let workers = request.workers.clamp(1, pairs.len().max(1));
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()?;

    log::info!(
        "Evaluating {} pairs ({} satellites x {} sites) on {} workers",
        pairs.len(),
        request.satellites.len(),
        request.sites.len(),
        workers
    );

    let completed: Vec<Option<PairResult>> = pool.install(|| {
        pairs
            .par_iter()
            .map(|&(sat, site)| {
                if cancel.is_cancelled() {
                    return None;
                }
                let satellite = &request.satellites[sat];
                let site = &request.sites[site];
                let (catalog_number, outcome) = match &resolved[sat] {
                    Ok(tle) => (
                        Some(tle.catalog_number),
                        find_access_windows(
                            oracle,
                            tle,
                            &site.site,
                            request.start,
                            request.end,
                            &request.pass,
                            cancel,
                        )
                        .map_err(PairError::from),
                    ),
                    Err(failure) => (None, Err(failure.clone())),
                };
                let outcome = match outcome {
                    Ok(windows) => {
                        log::debug!(
                            "{} over {}: {} windows",
                            satellite.label,
                            site.label,
                            windows.len()
                        );
                        PairOutcome::Windows(windows)
                    }
                    Err(PairError::Predict(PredictError::Cancelled)) => return None,
                    Err(e) => {
                        log::warn!("{} over {} failed: {}", satellite.label, site.label, e);
                        PairOutcome::Error(e.to_failure())
                    }
                };
                Some(PairResult {
                    satellite: satellite.label.clone(),
                    site: site.label.clone(),
                    location_type: site.location_type.clone(),
                    catalog_number,
                    outcome,
                })
            })
            .collect()
    });

    let finished = completed.iter().filter(|pair| pair.is_some()).count();
    let cancelled = finished < pairs.len();
    let pairs_total = pairs.len();
    let pairs: Vec<PairResult> = completed.into_iter().flatten().collect();
    let summary = BatchSummary::from_pairs(&pairs, pairs_total);

    if cancelled {
        log::warn!(
            "Batch cancelled after {} of {} pairs",
            summary.pairs_attempted,
            summary.pairs_total
        );
    }
    log::info!(
        "Batch finished: {} succeeded, {} failed, {} windows",
        summary.succeeded,
        summary.failed,
        summary.total_windows
    );

    Ok(BatchResult {
        start: request.start,
        end: request.end,
        min_elevation_deg: request.pass.min_elevation_deg,
        pairs,
        summary,
        cancelled,
    })
}

fn resolve(
    satellite: &SatelliteInput,
    catalog: &dyn CatalogAllocator,
) -> Result<TwoLineElement, PairError> {
    match &satellite.source {
        SatelliteSource::Lines { line1, line2 } => Ok(tle::parse(line1, line2)?),
        SatelliteSource::Elements(tle) => Ok((**tle).clone()),
        SatelliteSource::Synthesize(request) => Ok(synth::synthesize(request, catalog)?.tle),
    }
}
