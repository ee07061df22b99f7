use chrono::{DateTime, Utc};
use serde::Serialize;

use super::codec::{check_structure, parse, verify_checksum};
use super::error::TleError;

/// Every problem found in a TLE pair, plus its key elements when valid.
#[derive(Debug, Clone, Serialize)]
pub struct TleReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub catalog_number: Option<u32>,
    pub classification: Option<char>,
    pub international_designator: Option<String>,
    pub epoch: Option<DateTime<Utc>>,
    pub mean_motion: Option<f64>,
    pub eccentricity: Option<f64>,
    pub inclination_deg: Option<f64>,
    pub orbital_period_minutes: Option<f64>,
}

impl TleReport {
    fn invalid(errors: Vec<TleError>) -> Self {
        Self {
            is_valid: false,
            errors: errors.iter().map(|e| e.to_string()).collect(),
            catalog_number: None,
            classification: None,
            international_designator: None,
            epoch: None,
            mean_motion: None,
            eccentricity: None,
            inclination_deg: None,
            orbital_period_minutes: None,
        }
    }
}

/// Unlike [`parse`], keeps going after the first problem so that both lines
/// are reported on.
pub fn validate(line1: &str, line2: &str) -> TleReport {
    let mut errors = Vec::new();
    for (number, line) in [(1, line1), (2, line2)] {
        let line = line.trim_end_matches(['\r', '\n']);
        if let Err(e) = check_structure(line, number) {
            errors.push(e);
            continue;
        }
        if let Err(e) = verify_checksum(line, number) {
            errors.push(e);
        }
    }
    if !errors.is_empty() {
        return TleReport::invalid(errors);
    }

    match parse(line1, line2) {
        Ok(tle) => TleReport {
            is_valid: true,
            errors: Vec::new(),
            catalog_number: Some(tle.catalog_number),
            classification: Some(tle.classification),
            international_designator: Some(tle.international_designator.clone()),
            epoch: Some(tle.epoch),
            mean_motion: Some(tle.mean_motion),
            eccentricity: Some(tle.eccentricity),
            inclination_deg: Some(tle.inclination_deg),
            orbital_period_minutes: Some(tle.period_minutes()),
        },
        Err(e) => TleReport::invalid(vec![e]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const LINE1: &str = "1 25544U 98067A   24001.12345678  .00001234  00000-0  12345-4 0  9992";
    const LINE2: &str = "2 25544  51.6400 123.4567 0001234  12.3456 347.6543 15.48919999123458";

    #[test]
    fn test_valid_report() {
        let report = validate(LINE1, LINE2);
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
        assert_eq!(report.catalog_number, Some(25544));
        assert_eq!(report.international_designator.as_deref(), Some("98067A"));
        assert_relative_eq!(
            report.orbital_period_minutes.unwrap(),
            1440.0 / 15.48919999,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_reports_problems_on_both_lines() {
        let bad1 = LINE1.replacen("9992", "9998", 1);
        let bad2 = &LINE2[..60];
        let report = validate(&bad1, bad2);
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors[0].contains("checksum"));
        assert!(report.errors[1].contains("length"));
        assert_eq!(report.catalog_number, None);
    }

    #[test]
    fn test_catalog_mismatch_is_reported() {
        let tle = parse(LINE1, LINE2).unwrap();
        let other = super::super::encode(&tle, 25545).unwrap();
        let report = validate(LINE1, &other.line2);
        assert!(!report.is_valid);
        assert!(report.errors[0].contains("catalog"));
    }
}
