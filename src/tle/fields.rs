//! Fixed-width field conversions for the two-line element format.

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};

use super::types::Padding;

pub const NANOS_PER_DAY: f64 = 86_400e9;
/// One unit of the eighth decimal place of a day, in nanoseconds.
const EPOCH_UNIT_NANOS: i64 = 864_000;
const EPOCH_UNITS_PER_DAY: i64 = 100_000_000;

/// Two-digit years below this pivot belong to the 2000s.
const YEAR_PIVOT: i32 = 57;

pub fn parse_epoch(field: &str) -> Result<DateTime<Utc>, String> {
    if field.len() != 14 {
        return Err(format!("epoch field {:?} must be 14 columns", field));
    }
    let yy: i32 = field[..2]
        .trim()
        .parse()
        .map_err(|_| format!("invalid epoch year {:?}", &field[..2]))?;
    let year = if yy < YEAR_PIVOT { 2000 + yy } else { 1900 + yy };
    let day: f64 = field[2..]
        .trim()
        .parse()
        .map_err(|_| format!("invalid epoch day {:?}", &field[2..]))?;
    if !(1.0..367.0).contains(&day) {
        return Err(format!("epoch day {} out of range", day));
    }
    let start = Utc
        .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| format!("invalid epoch year {}", year))?;
    let nanos = ((day - 1.0) * NANOS_PER_DAY).round() as i64;
    Ok(start + Duration::nanoseconds(nanos))
}

/// Formats an instant as `YYDDD.DDDDDDDD`, rounding to the eighth decimal of a day.
pub fn format_epoch(epoch: DateTime<Utc>) -> Option<String> {
    let nanos_of_day = i64::from(epoch.num_seconds_from_midnight()) * 1_000_000_000
        + i64::from(epoch.nanosecond().min(999_999_999));
    let mut units = (nanos_of_day + EPOCH_UNIT_NANOS / 2) / EPOCH_UNIT_NANOS;
    let mut date = epoch.date_naive();
    if units >= EPOCH_UNITS_PER_DAY {
        units -= EPOCH_UNITS_PER_DAY;
        date = date.succ_opt()?;
    }
    let year = date.year();
    if !(1900 + YEAR_PIVOT..2000 + YEAR_PIVOT).contains(&year) {
        return None;
    }
    Some(format!(
        "{:02}{:03}.{:08}",
        year.rem_euclid(100),
        date.ordinal(),
        units
    ))
}

/// Fractional day of year as written in the epoch field (January 1, 00:00 is 1.0).
pub fn day_of_year(epoch: DateTime<Utc>) -> f64 {
    let nanos_of_day = f64::from(epoch.num_seconds_from_midnight()) * 1e9
        + f64::from(epoch.nanosecond().min(999_999_999));
    f64::from(epoch.ordinal()) + nanos_of_day / NANOS_PER_DAY
}

pub fn parse_decimal(field: &str) -> Result<f64, String> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed
        .parse()
        .map_err(|_| format!("invalid number {:?}", field))
}

pub fn parse_integer<T: std::str::FromStr + Default>(field: &str) -> Result<T, String> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Ok(T::default());
    }
    trimmed
        .parse()
        .map_err(|_| format!("invalid integer {:?}", field))
}

/// Parses the assumed-decimal exponent notation, e.g. ` 12345-4` = 0.12345e-4.
pub fn parse_exponential(field: &str) -> Result<f64, String> {
    let bytes = field.as_bytes();
    if bytes.len() != 8 {
        return Err(format!("exponent field {:?} must be 8 columns", field));
    }
    if field.trim().is_empty() {
        return Ok(0.0);
    }
    let sign = match bytes[0] {
        b' ' | b'+' => 1.0,
        b'-' => -1.0,
        _ => return Err(format!("invalid sign in {:?}", field)),
    };
    let mantissa_digits = field[1..6].trim();
    if !mantissa_digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("invalid mantissa in {:?}", field));
    }
    let mantissa: f64 = format!("0.{}", mantissa_digits)
        .parse()
        .map_err(|_| format!("invalid mantissa in {:?}", field))?;
    let exponent_sign = match bytes[6] {
        b'-' => -1,
        b'+' | b' ' => 1,
        _ => return Err(format!("invalid exponent sign in {:?}", field)),
    };
    let exponent = match bytes[7] {
        d @ b'0'..=b'9' => i32::from(d - b'0') * exponent_sign,
        _ => return Err(format!("invalid exponent in {:?}", field)),
    };
    Ok(sign * mantissa * 10f64.powi(exponent))
}

/// Sign written in front of a `0` exponent digit, if the field has one.
pub fn zero_exponent_sign(field: &str) -> Option<char> {
    let bytes = field.as_bytes();
    match (bytes.get(6), bytes.get(7)) {
        (Some(&sign @ (b' ' | b'+' | b'-')), Some(b'0')) => Some(sign as char),
        _ => None,
    }
}

/// Inverse of [`parse_exponential`]. Zero is written as ` 00000-0` unless
/// `zero_sign` gives the sign to put in front of a `0` exponent.
pub fn format_exponential(value: f64, zero_sign: Option<char>) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    let magnitude = value.abs();
    if magnitude == 0.0 {
        return Some(format!(" 00000{}0", zero_sign.unwrap_or('-')));
    }
    let mut exponent = magnitude.log10().floor() as i32 + 1;
    let mut digits = (magnitude / 10f64.powi(exponent) * 1e5).round() as u32;
    if digits >= 100_000 {
        digits /= 10;
        exponent += 1;
    }
    if digits == 0 {
        return Some(format!(" 00000{}0", zero_sign.unwrap_or('-')));
    }
    if !(-9..=9).contains(&exponent) {
        return None;
    }
    let sign = if value < 0.0 { '-' } else { ' ' };
    let exponent_sign = match (exponent, zero_sign) {
        (0, Some(written)) => written,
        (e, _) if e < 0 => '-',
        _ => '+',
    };
    Some(format!(
        "{}{:05}{}{}",
        sign,
        digits,
        exponent_sign,
        exponent.abs()
    ))
}

/// First derivative of mean motion, written as ` .00001234` or `-.00002182`.
pub fn format_leading_decimal(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    let rendered = format!("{:.8}", value.abs());
    let fraction = rendered.strip_prefix('0')?;
    let sign = if value.is_sign_negative() { '-' } else { ' ' };
    Some(format!("{}{}", sign, fraction))
}

/// Padding style of an integer field as written.
pub fn padding_of(field: &str) -> Padding {
    if field.trim().is_empty() {
        Padding::Blank
    } else if field.len() > 1 && field.starts_with('0') {
        Padding::Zero
    } else {
        Padding::Space
    }
}

/// Right-aligned integer in `width` columns using `padding`. A blank field
/// stays blank only while the value is zero.
pub fn format_padded(value: u32, width: usize, padding: Padding) -> Option<String> {
    let rendered = match padding {
        Padding::Blank if value == 0 => " ".repeat(width),
        Padding::Zero => format!("{:0width$}", value),
        Padding::Space | Padding::Blank => format!("{:>width$}", value),
    };
    (rendered.len() == width).then_some(rendered)
}

/// Eccentricity digits with the leading `0.` implied.
pub fn parse_eccentricity(field: &str) -> Result<f64, String> {
    let trimmed = field.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("invalid eccentricity {:?}", field));
    }
    format!("0.{}", trimmed)
        .parse()
        .map_err(|_| format!("invalid eccentricity {:?}", field))
}

pub fn format_eccentricity(value: f64) -> Option<String> {
    if !(0.0..1.0).contains(&value) {
        return None;
    }
    let digits = (value * 1e7).round() as u32;
    if digits >= 10_000_000 {
        return None;
    }
    Some(format!("{:07}", digits))
}

/// Right-aligned fixed-point number that must fit `width` columns.
pub fn format_fixed(value: f64, width: usize, precision: usize) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    let rendered = format!("{:>width$.precision$}", value);
    (rendered.len() == width).then_some(rendered)
}
