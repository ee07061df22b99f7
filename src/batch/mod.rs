//! Pass detection across every satellite/site pair of a request.

mod error;
mod orchestrator;
mod types;

pub use error::{BatchError, PairError, PairFailure};
pub use orchestrator::run_batch;
pub use types::{
    BatchRequest, BatchResult, BatchSummary, PairOutcome, PairResult, SatelliteInput,
    SatelliteSource, SiteInput,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{GroundSite, PropagationOracle};
    use crate::predict::testing::{at, origin, tent, ScriptedOracle, ISS_LINE1, ISS_LINE2};
    use crate::predict::{CancelToken, PassConfig};
    use crate::synth::{CatalogPool, OrbitType, OrbitalSynthesisRequest};
    use chrono::Duration;

    fn oracle() -> ScriptedOracle {
        ScriptedOracle::new(|t| tent(t, 900.0, 300.0, 40.0).max(tent(t, 2300.0, 300.0, 25.0)))
    }

    fn request(satellites: Vec<SatelliteInput>, sites: usize, workers: usize) -> BatchRequest {
        BatchRequest {
            satellites,
            sites: (0..sites)
                .map(|i| {
                    SiteInput::new(
                        format!("site-{}", i),
                        GroundSite::new(10.0 * i as f64, 0.0, 0.0),
                    )
                })
                .collect(),
            start: origin(),
            end: at(3600.0),
            pass: PassConfig {
                step: Duration::seconds(60),
                ..PassConfig::default()
            },
            workers,
        }
    }

    fn malformed() -> SatelliteInput {
        SatelliteInput::from_lines("broken", &ISS_LINE1[..60], ISS_LINE2)
    }

    fn valid(label: &str) -> SatelliteInput {
        SatelliteInput::from_lines(label, ISS_LINE1, ISS_LINE2)
    }

    fn run<O: PropagationOracle + Sync>(oracle: &O, request: &BatchRequest) -> BatchResult {
        run_batch(oracle, request, &CatalogPool::new(), &CancelToken::new()).unwrap()
    }

    #[test]
    fn test_failures_are_isolated() {
        let request = request(vec![malformed(), valid("iss")], 1, 2);
        let result = run(&oracle(), &request);

        assert_eq!(result.summary.pairs_attempted, 2);
        assert_eq!(result.summary.failed, 1);
        assert_eq!(result.summary.succeeded, 1);
        assert_eq!(result.pairs[0].error().unwrap().kind, "format");
        assert_eq!(result.pairs[0].catalog_number, None);
        assert_eq!(result.pairs[1].windows().unwrap().len(), 2);
        assert_eq!(result.pairs[1].catalog_number, Some(25544));
        assert_eq!(result.summary.total_windows, 2);
        assert!(!result.cancelled);
    }

    #[test]
    fn test_order_is_satellite_major() {
        let satellites = vec![valid("a"), malformed(), valid("c")];
        let serial = run(&oracle(), &request(satellites.clone(), 3, 1));
        let parallel = run(&oracle(), &request(satellites, 3, 8));

        let labels: Vec<_> = parallel
            .pairs
            .iter()
            .map(|p| format!("{}/{}", p.satellite, p.site))
            .collect();
        assert_eq!(
            labels,
            [
                "a/site-0", "a/site-1", "a/site-2", "broken/site-0", "broken/site-1",
                "broken/site-2", "c/site-0", "c/site-1", "c/site-2",
            ]
        );
        assert_eq!(serial, parallel);
        assert_eq!(parallel.summary.failed, 3);
        assert_eq!(parallel.summary.succeeded, 6);
    }

    #[test]
    fn test_summary_totals() {
        let result = run(&oracle(), &request(vec![valid("iss")], 2, 2));
        assert_eq!(result.summary.pairs_total, 2);
        assert_eq!(result.summary.total_windows, 4);
        assert_eq!(result.summary.total_duration_seconds, 2.0 * (420.0 + 240.0));
        assert_eq!(result.summary.max_elevation_deg, Some(40.0));
        assert_eq!(result.events().len(), 12);
    }

    #[test]
    fn test_synthesis_failure_is_a_pair_error() {
        let bad = SatelliteInput::synthesized(
            "too-high",
            OrbitalSynthesisRequest::new(OrbitType::Leo).with_altitude(9000.0),
        );
        let good =
            SatelliteInput::synthesized("sso", OrbitalSynthesisRequest::new(OrbitType::Sso));
        let result = run(&oracle(), &request(vec![bad, good], 1, 1));
        assert_eq!(result.pairs[0].error().unwrap().kind, "range");
        assert_eq!(result.pairs[1].catalog_number, Some(90_000));
    }

    #[test]
    fn test_propagation_failure_kind() {
        let failing = oracle().failing_at(at(600.0));
        let result = run(&failing, &request(vec![valid("iss")], 1, 1));
        assert_eq!(result.pairs[0].error().unwrap().kind, "propagation");
        assert_eq!(result.summary.total_windows, 0);
    }

    #[test]
    fn test_cancelled_batch_reports_only_finished_pairs() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let result =
            run_batch(&oracle(), &request(vec![valid("iss")], 3, 2), &CatalogPool::new(), &cancel)
                .unwrap();
        assert!(result.cancelled);
        assert!(result.pairs.is_empty());
        assert_eq!(result.summary.pairs_attempted, 0);
        assert_eq!(result.summary.pairs_total, 3);
    }

    #[test]
    fn test_events_carry_site_location_type() {
        let mut request = request(vec![valid("iss")], 1, 1);
        request.sites[0] = request.sites[0].clone().with_location_type("vehicle");
        let result = run(&oracle(), &request);

        let events = result.events();
        assert_eq!(events.len(), 6);
        assert!(events.iter().all(|e| e.location_type == "vehicle"));

        let points = result.influx_points();
        assert_eq!(points.len(), 6);
        assert_eq!(points[0].tags.location_type, "vehicle");
        assert_eq!(points[0].tags.location_id, "site-0");
    }

    #[test]
    fn test_rejects_empty_range() {
        let mut req = request(vec![valid("iss")], 1, 1);
        req.end = req.start;
        assert!(matches!(
            run_batch(&oracle(), &req, &CatalogPool::new(), &CancelToken::new()),
            Err(BatchError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_result_json_shape() {
        let result = run(&oracle(), &request(vec![malformed(), valid("iss")], 1, 1));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["pairs"][0]["error"]["kind"], "format");
        assert_eq!(json["pairs"][1]["windows"].as_array().unwrap().len(), 2);
        assert_eq!(
            json["pairs"][1]["windows"][0]["ground_lighting"]["condition"],
            "daylight"
        );
        assert_eq!(json["pairs"][1]["location_type"], "ground_station");
        assert_eq!(json["summary"]["failed"], 1);
    }
}
