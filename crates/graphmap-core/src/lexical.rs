//! Lexical forms for XSD literals the codec writes and reads.
//!
//! Formatting always produces the canonical form the parser accepts, so any
//! value this crate writes reads back unchanged. Parsing is more lenient and
//! accepts the common variants found in loaded data.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, TimeDelta};

use crate::error::CoreError;

const SECONDS_PER_DAY: i64 = 86_400;

/// Approximations used for the calendar designators of `xsd:duration`.
const DAYS_PER_YEAR: i64 = 365;
const DAYS_PER_MONTH: i64 = 30;

// ---------------------------------------------------------------------------
// Floating point
// ---------------------------------------------------------------------------

pub fn format_double(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        (if v.is_sign_positive() { "INF" } else { "-INF" }).to_string()
    } else if v != 0.0 && (v.abs() >= 1e16 || v.abs() < 1e-6) {
        format!("{:E}", v)
    } else {
        v.to_string()
    }
}

pub fn parse_double(s: &str) -> Option<f64> {
    match s.trim() {
        "NaN" => Some(f64::NAN),
        "INF" | "+INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        other => other.parse().ok(),
    }
}

pub fn format_float(v: f32) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        (if v.is_sign_positive() { "INF" } else { "-INF" }).to_string()
    } else if v != 0.0 && (v.abs() >= 1e16 || v.abs() < 1e-6) {
        format!("{:E}", v)
    } else {
        v.to_string()
    }
}

pub fn parse_float(s: &str) -> Option<f32> {
    match s.trim() {
        "NaN" => Some(f32::NAN),
        "INF" | "+INF" => Some(f32::INFINITY),
        "-INF" => Some(f32::NEG_INFINITY),
        other => other.parse().ok(),
    }
}

// ---------------------------------------------------------------------------
// Boolean
// ---------------------------------------------------------------------------

pub fn parse_boolean(s: &str) -> Option<bool> {
    match s.trim() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// dateTime
// ---------------------------------------------------------------------------

/// Checks that `v` has a lexical form [`parse_date_time`] reads back
/// unchanged: a four-digit year and an offset in whole minutes.
pub fn check_date_time(v: &DateTime<FixedOffset>) -> Result<(), CoreError> {
    let reason = if !(0..=9999).contains(&v.year()) {
        "year outside 0000-9999"
    } else if v.offset().local_minus_utc() % 60 != 0 {
        "offset is not a whole number of minutes"
    } else {
        return Ok(());
    };
    Err(CoreError::UnrepresentableValue {
        kind: "DateTime",
        value: v.to_string(),
        reason,
    })
}

/// Formats a date-time as RFC 3339 with `Z` for a zero offset and only as
/// many fractional digits as needed.
pub fn format_date_time(v: &DateTime<FixedOffset>) -> String {
    v.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parses an `xsd:dateTime` lexical form.
///
/// Accepts RFC 3339, offsets without a colon, date-times without an offset
/// (read as UTC), and bare dates (midnight UTC).
pub fn parse_date_time(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }

    for fmt in &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ndt.and_utc().fixed_offset());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc().fixed_offset())
}

// ---------------------------------------------------------------------------
// duration
// ---------------------------------------------------------------------------

/// Formats a duration as `[-]P[nD][T[nH][nM][n[.f]S]]`.
///
/// Only day and time designators are written, since a [`TimeDelta`] has no
/// calendar months or years. The zero duration is `PT0S`.
pub fn format_duration(v: TimeDelta) -> String {
    let negative = v < TimeDelta::zero();
    let v = v.abs();

    let total_secs = v.num_seconds();
    let nanos = v.subsec_nanos();
    let days = total_secs / SECONDS_PER_DAY;
    let rem = total_secs % SECONDS_PER_DAY;
    let hours = rem / 3600;
    let minutes = (rem % 3600) / 60;
    let seconds = rem % 60;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push('P');
    if days > 0 {
        out.push_str(&format!("{}D", days));
    }

    let has_time = hours > 0 || minutes > 0 || seconds > 0 || nanos > 0;
    if has_time || days == 0 {
        out.push('T');
        if hours > 0 {
            out.push_str(&format!("{}H", hours));
        }
        if minutes > 0 {
            out.push_str(&format!("{}M", minutes));
        }
        if seconds > 0 || nanos > 0 || !has_time {
            out.push_str(&seconds.to_string());
            if nanos > 0 {
                let frac = format!("{:09}", nanos);
                out.push('.');
                out.push_str(frac.trim_end_matches('0'));
            }
            out.push('S');
        }
    }
    out
}

/// Parses an `xsd:duration` lexical form.
///
/// Years count as 365 days and months as 30 days. Fractions are accepted on
/// seconds only, up to nanosecond precision.
pub fn parse_duration(s: &str) -> Option<TimeDelta> {
    let s = s.trim();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let rest = rest.strip_prefix('P')?;
    if rest.is_empty() {
        return None;
    }

    let (date_part, time_part) = match rest.split_once('T') {
        Some((_, "")) => return None,
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };

    let mut secs: i64 = 0;
    let mut nanos: u32 = 0;

    for (number, designator) in components(date_part)? {
        let n: i64 = number.parse().ok()?;
        let days = match designator {
            'Y' => n.checked_mul(DAYS_PER_YEAR)?,
            'M' => n.checked_mul(DAYS_PER_MONTH)?,
            'D' => n,
            _ => return None,
        };
        secs = secs.checked_add(days.checked_mul(SECONDS_PER_DAY)?)?;
    }

    if let Some(time_part) = time_part {
        for (number, designator) in components(time_part)? {
            match designator {
                'H' => secs = secs.checked_add(number.parse::<i64>().ok()?.checked_mul(3600)?)?,
                'M' => secs = secs.checked_add(number.parse::<i64>().ok()?.checked_mul(60)?)?,
                'S' => {
                    let (whole, frac) = match number.split_once('.') {
                        Some((whole, frac)) => (whole, frac),
                        None => (number, ""),
                    };
                    secs = secs.checked_add(whole.parse::<i64>().ok()?)?;
                    nanos = parse_nanos(frac)?;
                }
                _ => return None,
            }
        }
    }

    let delta = TimeDelta::new(secs, nanos)?;
    Some(if negative { -delta } else { delta })
}

/// Splits `12D3H` style text into `("12", 'D'), ("3", 'H')`.
fn components(s: &str) -> Option<Vec<(&str, char)>> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, c) in s.char_indices() {
        if c.is_ascii_digit() || c == '.' {
            continue;
        }
        if i == start {
            return None;
        }
        out.push((&s[start..i], c));
        start = i + c.len_utf8();
    }
    if start != s.len() {
        return None;
    }
    Some(out)
}

fn parse_nanos(frac: &str) -> Option<u32> {
    if frac.is_empty() {
        return Some(0);
    }
    if !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits: String = frac.chars().take(9).collect();
    let scale = 10u32.pow(9 - digits.len() as u32);
    digits.parse::<u32>().ok().map(|n| n * scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn double_special_values() {
        assert_eq!(format_double(f64::INFINITY), "INF");
        assert_eq!(format_double(f64::NEG_INFINITY), "-INF");
        assert_eq!(format_double(f64::NAN), "NaN");
        assert!(parse_double("NaN").unwrap().is_nan());
        assert_eq!(parse_double("-INF"), Some(f64::NEG_INFINITY));
    }

    #[test]
    #[allow(overflowing_literals)]
    fn double_exponent_forms_parse() {
        assert_eq!(parse_double("1.79769313486232E+308"), Some(1.79769313486232e308));
        assert_eq!(parse_double(&format_double(f64::MAX)), Some(f64::MAX));
        assert_eq!(parse_float("3.402823E+38"), Some(3.402823e38));
    }

    #[test]
    fn boolean_forms() {
        assert_eq!(parse_boolean("1"), Some(true));
        assert_eq!(parse_boolean("false"), Some(false));
        assert_eq!(parse_boolean("yes"), None);
    }

    #[test]
    fn date_time_variants() {
        let with_offset = parse_date_time("2024-01-15T10:30:00+05:00").unwrap();
        assert_eq!(with_offset.offset().local_minus_utc(), 5 * 3600);

        let naive = parse_date_time("9999-12-31T23:59:59.999999").unwrap();
        assert_eq!(naive.offset().local_minus_utc(), 0);

        let date_only = parse_date_time("1900-01-01").unwrap();
        assert_eq!(format_date_time(&date_only), "1900-01-01T00:00:00Z");

        assert!(parse_date_time("not a date").is_none());
    }

    #[test]
    fn date_time_range_checked() {
        let ok = DateTime::parse_from_rfc3339("9999-12-31T23:59:59+14:00").unwrap();
        assert!(check_date_time(&ok).is_ok());

        let far = NaiveDate::from_ymd_opt(10_000, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
            .fixed_offset();
        assert!(matches!(
            check_date_time(&far),
            Err(CoreError::UnrepresentableValue { kind: "DateTime", .. })
        ));

        let odd = FixedOffset::east_opt(3600 + 15)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .unwrap();
        assert!(check_date_time(&odd).is_err());
    }

    #[test]
    fn duration_format() {
        assert_eq!(format_duration(TimeDelta::zero()), "PT0S");
        assert_eq!(format_duration(TimeDelta::days(1)), "P1D");
        assert_eq!(
            format_duration(TimeDelta::new(90_061, 500_000_000).unwrap()),
            "P1DT1H1M1.5S"
        );
        assert_eq!(format_duration(-TimeDelta::minutes(2)), "-PT2M");
    }

    #[test]
    fn duration_parse() {
        assert_eq!(parse_duration("P1D"), Some(TimeDelta::days(1)));
        assert_eq!(parse_duration("PT0S"), Some(TimeDelta::zero()));
        assert_eq!(parse_duration("-PT2M"), Some(-TimeDelta::minutes(2)));
        assert_eq!(
            parse_duration("P10675199DT2H48M5.4775807S"),
            TimeDelta::new(10_675_199 * 86_400 + 2 * 3600 + 48 * 60 + 5, 477_580_700)
        );
        assert_eq!(parse_duration("P1Y"), Some(TimeDelta::days(365)));
        assert_eq!(parse_duration("P"), None);
        assert_eq!(parse_duration("P1DT"), None);
        assert_eq!(parse_duration("1D"), None);
        assert_eq!(parse_duration("PXD"), None);
    }
}
