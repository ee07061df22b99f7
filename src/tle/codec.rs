use super::checksum::checksum;
use super::error::TleError;
use super::fields;
use super::types::{Notation, TleLines, TwoLineElement};

pub const LINE_LENGTH: usize = 69;
pub const MAX_CATALOG_NUMBER: u32 = 99_999;

/// Parse a two-line element set.
///
/// Structure is checked first (length, line number), then both checksums,
/// then catalog-number agreement, and finally every field is converted.
pub fn parse(line1: &str, line2: &str) -> Result<TwoLineElement, TleError> {
    let line1 = strip_terminator(line1);
    let line2 = strip_terminator(line2);

    check_structure(line1, 1)?;
    check_structure(line2, 2)?;
    let checksum1 = verify_checksum(line1, 1)?;
    let checksum2 = verify_checksum(line2, 2)?;

    let catalog1 = parse_catalog(line1, 1)?;
    let catalog2 = parse_catalog(line2, 2)?;
    if catalog1 != catalog2 {
        return Err(TleError::Consistency {
            line1: catalog1,
            line2: catalog2,
        });
    }

    let l1 = |e: String| TleError::format(1, e);
    let l2 = |e: String| TleError::format(2, e);

    let classification = line1[7..8].chars().next().unwrap_or('U');
    let international_designator = line1[9..17].trim_end().to_string();
    let epoch = fields::parse_epoch(&line1[18..32]).map_err(l1)?;
    let mean_motion_dot = fields::parse_decimal(&line1[33..43]).map_err(l1)?;
    let mean_motion_ddot = fields::parse_exponential(&line1[44..52]).map_err(l1)?;
    let drag_term = fields::parse_exponential(&line1[53..61]).map_err(l1)?;
    let ephemeris_type = fields::parse_integer(&line1[62..63]).map_err(l1)?;
    let element_set_number = fields::parse_integer(&line1[64..68]).map_err(l1)?;

    let inclination_deg = fields::parse_decimal(&line2[8..16]).map_err(l2)?;
    let raan_deg = fields::parse_decimal(&line2[17..25]).map_err(l2)?;
    let eccentricity = fields::parse_eccentricity(&line2[26..33]).map_err(l2)?;
    let argument_of_perigee_deg = fields::parse_decimal(&line2[34..42]).map_err(l2)?;
    let mean_anomaly_deg = fields::parse_decimal(&line2[43..51]).map_err(l2)?;
    let mean_motion = fields::parse_decimal(&line2[52..63]).map_err(l2)?;
    let revolution_number = fields::parse_integer(&line2[63..68]).map_err(l2)?;

    let notation = Notation {
        catalog: [
            fields::padding_of(&line1[2..7]),
            fields::padding_of(&line2[2..7]),
        ],
        ephemeris_type: fields::padding_of(&line1[62..63]),
        element_set_number: fields::padding_of(&line1[64..68]),
        revolution_number: fields::padding_of(&line2[63..68]),
        zero_exponent_sign: [
            fields::zero_exponent_sign(&line1[44..52]),
            fields::zero_exponent_sign(&line1[53..61]),
        ],
    };

    let tle = TwoLineElement {
        catalog_number: catalog1,
        classification,
        international_designator,
        epoch,
        mean_motion_dot,
        mean_motion_ddot,
        drag_term,
        ephemeris_type,
        element_set_number,
        inclination_deg,
        raan_deg,
        eccentricity,
        argument_of_perigee_deg,
        mean_anomaly_deg,
        mean_motion,
        revolution_number,
        checksums: [checksum1, checksum2],
        notation,
    };
    check_ranges(&tle)?;
    Ok(tle)
}

/// Encode elements into two fixed-width lines with fresh checksums.
///
/// `catalog_number` takes precedence over the one stored in `elements`.
/// Padding and zero-exponent signs follow `elements.notation`, so lines that
/// came out of [`parse`] are reproduced exactly.
pub fn encode(elements: &TwoLineElement, catalog_number: u32) -> Result<TleLines, TleError> {
    if catalog_number > MAX_CATALOG_NUMBER {
        return Err(TleError::format(
            1,
            format!("catalog number {} exceeds {}", catalog_number, MAX_CATALOG_NUMBER),
        ));
    }
    check_ranges(elements)?;

    let l1 = |what: &str| TleError::format(1, format!("{} cannot be represented", what));
    let l2 = |what: &str| TleError::format(2, format!("{} cannot be represented", what));

    if !elements.classification.is_ascii_graphic() {
        return Err(l1("classification"));
    }
    if elements.international_designator.len() > 8 || !elements.international_designator.is_ascii()
    {
        return Err(l1("international designator"));
    }
    let notation = &elements.notation;
    let catalog = |line: usize| fields::format_padded(catalog_number, 5, notation.catalog[line]);

    let body1 = format!(
        "1 {}{} {:<8} {} {} {} {} {} {}",
        catalog(0).ok_or_else(|| l1("catalog number"))?,
        elements.classification,
        elements.international_designator,
        fields::format_epoch(elements.epoch).ok_or_else(|| l1("epoch"))?,
        fields::format_leading_decimal(elements.mean_motion_dot)
            .ok_or_else(|| l1("mean motion first derivative"))?,
        fields::format_exponential(elements.mean_motion_ddot, notation.zero_exponent_sign[0])
            .ok_or_else(|| l1("mean motion second derivative"))?,
        fields::format_exponential(elements.drag_term, notation.zero_exponent_sign[1])
            .ok_or_else(|| l1("drag term"))?,
        fields::format_padded(u32::from(elements.ephemeris_type), 1, notation.ephemeris_type)
            .ok_or_else(|| l1("ephemeris type"))?,
        fields::format_padded(
            u32::from(elements.element_set_number),
            4,
            notation.element_set_number,
        )
        .ok_or_else(|| l1("element set number"))?,
    );

    let body2 = format!(
        "2 {} {} {} {} {} {} {}{}",
        catalog(1).ok_or_else(|| l2("catalog number"))?,
        fields::format_fixed(elements.inclination_deg, 8, 4).ok_or_else(|| l2("inclination"))?,
        fields::format_fixed(elements.raan_deg, 8, 4).ok_or_else(|| l2("right ascension"))?,
        fields::format_eccentricity(elements.eccentricity).ok_or_else(|| l2("eccentricity"))?,
        fields::format_fixed(elements.argument_of_perigee_deg, 8, 4)
            .ok_or_else(|| l2("argument of perigee"))?,
        fields::format_fixed(elements.mean_anomaly_deg, 8, 4)
            .ok_or_else(|| l2("mean anomaly"))?,
        fields::format_fixed(elements.mean_motion, 11, 8).ok_or_else(|| l2("mean motion"))?,
        fields::format_padded(elements.revolution_number, 5, notation.revolution_number)
            .ok_or_else(|| l2("revolution number"))?,
    );

    Ok(TleLines {
        line1: seal(body1, 1)?,
        line2: seal(body2, 2)?,
    })
}

/// Appends the checksum digit to a 68-column body.
fn seal(body: String, line: u8) -> Result<String, TleError> {
    if body.len() != LINE_LENGTH - 1 {
        return Err(TleError::format(
            line,
            format!("encoded body is {} columns, expected {}", body.len(), LINE_LENGTH - 1),
        ));
    }
    let digit = checksum(&body);
    Ok(format!("{}{}", body, digit))
}

fn strip_terminator(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

pub(crate) fn check_structure(line: &str, number: u8) -> Result<(), TleError> {
    if !line.is_ascii() {
        return Err(TleError::format(number, "contains non-ASCII characters"));
    }
    if line.len() != LINE_LENGTH {
        return Err(TleError::format(
            number,
            format!("length {}, expected {} characters", line.len(), LINE_LENGTH),
        ));
    }
    let expected = (b'0' + number) as char;
    if !line.starts_with(expected) {
        return Err(TleError::format(
            number,
            format!("must start with '{}'", expected),
        ));
    }
    Ok(())
}

/// Returns the trailing checksum digit once it matches the computed one.
pub(crate) fn verify_checksum(line: &str, number: u8) -> Result<u8, TleError> {
    let found = match line.as_bytes().get(LINE_LENGTH - 1) {
        Some(d @ b'0'..=b'9') => d - b'0',
        _ => return Err(TleError::format(number, "checksum column is not a digit")),
    };
    let computed = checksum(line);
    if computed != found {
        return Err(TleError::Checksum {
            line: number,
            computed,
            found,
        });
    }
    Ok(found)
}

fn parse_catalog(line: &str, number: u8) -> Result<u32, TleError> {
    line[2..7]
        .trim()
        .parse()
        .map_err(|_| TleError::format(number, format!("invalid catalog number {:?}", &line[2..7])))
}

fn check_ranges(tle: &TwoLineElement) -> Result<(), TleError> {
    let out_of_range =
        |field: &str, value: f64| TleError::format(2, format!("{} {} out of range", field, value));
    if !(0.0..=180.0).contains(&tle.inclination_deg) {
        return Err(out_of_range("inclination", tle.inclination_deg));
    }
    if !(0.0..1.0).contains(&tle.eccentricity) {
        return Err(out_of_range("eccentricity", tle.eccentricity));
    }
    for (field, value) in [
        ("right ascension", tle.raan_deg),
        ("argument of perigee", tle.argument_of_perigee_deg),
        ("mean anomaly", tle.mean_anomaly_deg),
    ] {
        if !(0.0..=360.0).contains(&value) {
            return Err(out_of_range(field, value));
        }
    }
    if !(tle.mean_motion > 0.0) {
        return Err(out_of_range("mean motion", tle.mean_motion));
    }
    Ok(())
}
