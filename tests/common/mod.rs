#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use sat_access::oracle::GroundSite;
use sat_access::predict::{AccessWindow, PassConfig};
use sat_access::tle::{self, TwoLineElement};

pub const ISS_LINE1: &str =
    "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
pub const ISS_LINE2: &str =
    "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

pub fn iss() -> TwoLineElement {
    tle::parse(ISS_LINE1, ISS_LINE2).unwrap()
}

/// ISS line 1 with its checksum digit changed.
pub fn corrupted_iss_line1() -> String {
    format!("{}8", &ISS_LINE1[..68])
}

pub fn munich() -> GroundSite {
    GroundSite::new(48.1351, 11.5820, 520.0)
}

pub fn quito() -> GroundSite {
    GroundSite::new(-0.1807, -78.4678, 2850.0)
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

pub fn step_config(seconds: i64) -> PassConfig {
    PassConfig {
        step: Duration::seconds(seconds),
        ..PassConfig::default()
    }
}

pub fn assert_well_formed(windows: &[AccessWindow], threshold: f64) {
    for w in windows {
        assert!(w.aos_time <= w.culmination_time, "{:?}", w);
        assert!(w.culmination_time <= w.los_time, "{:?}", w);
        assert!(w.max_elevation_deg >= threshold, "{:?}", w);
        for azimuth in [w.aos_azimuth_deg, w.culmination_azimuth_deg, w.los_azimuth_deg] {
            assert!((0.0..360.0).contains(&azimuth), "{:?}", w);
        }
        assert!(w.satellite_lighting.in_sunlight != w.satellite_lighting.in_eclipse);
    }
    for pair in windows.windows(2) {
        assert!(pair[0].aos_time < pair[1].aos_time);
        assert!(pair[0].los_time <= pair[1].aos_time);
    }
}
