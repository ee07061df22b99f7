mod common;

use approx::assert_abs_diff_eq;
use chrono::Duration;
use sat_access::oracle::{frames, GroundSite, SgpOracle};
use sat_access::predict::{find_access_windows, CancelToken};
use sat_access::synth::{synthesize_at, FixedCatalog, OrbitType, OrbitalSynthesisRequest};

use common::{assert_well_formed, iss, munich, step_config, utc};

#[test]
fn geostationary_object_is_one_window_for_a_day() {
    let epoch = utc(2024, 3, 20, 0, 0, 0);
    let orbit = synthesize_at(
        &OrbitalSynthesisRequest::new(OrbitType::Geo),
        &FixedCatalog(90_123),
        epoch,
    )
    .unwrap();

    // Node, perigee and anomaly are all zero, so the object starts above the
    // meridian of the vernal equinox.
    let longitude = (-frames::sidereal_angle(epoch).to_degrees() + 180.0).rem_euclid(360.0) - 180.0;
    let site = GroundSite::new(0.0, longitude, 0.0);

    let oracle = SgpOracle::new();
    let end = epoch + Duration::hours(24);
    let windows = find_access_windows(
        &oracle,
        &orbit.tle,
        &site,
        epoch,
        end,
        &step_config(300),
        &CancelToken::new(),
    )
    .unwrap();

    assert_eq!(windows.len(), 1);
    let window = &windows[0];
    assert_eq!(window.aos_time, epoch);
    assert_eq!(window.los_time, end);
    assert!(window.open_at_start && window.open_at_end);
    assert_abs_diff_eq!(window.duration_seconds, 86_400.0);
    assert!(window.max_elevation_deg > 80.0);
    assert_abs_diff_eq!(window.satellite_lighting.altitude_km, 35_786.0 - 7.0, epsilon = 60.0);
}

#[test]
fn iss_windows_over_munich() {
    let tle = iss();
    let oracle = SgpOracle::new();
    let config = step_config(30);
    let windows = find_access_windows(
        &oracle,
        &tle,
        &munich(),
        tle.epoch,
        tle.epoch + Duration::days(1),
        &config,
        &CancelToken::new(),
    )
    .unwrap();

    assert!(!windows.is_empty());
    assert_well_formed(&windows, config.min_elevation_deg);
    for w in &windows {
        assert!(w.duration_seconds > 0.0 && w.duration_seconds <= 900.0, "{:?}", w);
        assert!((300.0..450.0).contains(&w.satellite_lighting.altitude_km));
        assert!((-90.0..=90.0).contains(&w.ground_lighting.sun_elevation_deg));
        assert!((0.0..360.0).contains(&w.ground_lighting.sun_azimuth_deg));
    }
}

#[test]
fn higher_threshold_gives_subset_of_time() {
    let tle = iss();
    let oracle = SgpOracle::new();
    let start = tle.epoch;
    let end = start + Duration::days(1);
    let cancel = CancelToken::new();
    let low =
        find_access_windows(&oracle, &tle, &munich(), start, end, &step_config(30), &cancel)
            .unwrap();
    let mut strict = step_config(30);
    strict.min_elevation_deg = 30.0;
    let high =
        find_access_windows(&oracle, &tle, &munich(), start, end, &strict, &cancel).unwrap();

    assert!(high.len() <= low.len());
    for w in &high {
        assert!(low
            .iter()
            .any(|l| l.aos_time <= w.aos_time && w.los_time <= l.los_time));
    }
}
