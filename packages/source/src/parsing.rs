//! Shared parsing utilities for city feed records.
//!
//! Field access, date and time-of-day parsing, and coordinate extraction
//! used across the site adapters. Every function returns `None` instead of
//! failing so that a malformed field only degrades the one value it feeds.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use crime_harvest_crime_models::value::{as_number, is_truthy, to_text};
use serde_json::Value;

/// Returns a string field.
#[must_use]
pub fn get_str<'a>(record: &'a Value, field: &str) -> Option<&'a str> {
    record.get(field)?.as_str()
}

/// Returns a scalar field rendered as text (numbers are stringified).
#[must_use]
pub fn get_text(record: &Value, field: &str) -> Option<String> {
    record.get(field).and_then(to_text)
}

/// Returns the first non-empty text value among `fields`.
#[must_use]
pub fn first_non_empty(record: &Value, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .filter_map(|f| get_text(record, f))
        .find(|s| !s.is_empty())
}

/// Returns `true` if the field is present and truthy.
#[must_use]
pub fn has_value(record: &Value, field: &str) -> bool {
    record.get(field).is_some_and(is_truthy)
}

/// Returns the native record identifier as text, or an empty string when
/// the field is missing.
#[must_use]
pub fn native_id(record: &Value, field: &str) -> String {
    get_text(record, field).unwrap_or_default()
}

/// Copies raw fields into an extras map. Each pair is
/// `(property name, raw field name)`; absent and null fields are skipped.
#[must_use]
pub fn copy_fields(record: &Value, fields: &[(&str, &str)]) -> BTreeMap<String, Value> {
    fields
        .iter()
        .filter_map(|(property, field)| {
            record
                .get(*field)
                .filter(|v| !v.is_null())
                .map(|v| ((*property).to_string(), v.clone()))
        })
        .collect()
}

/// Parses a feed datetime string.
///
/// Accepts Socrata floating timestamps (`2024-01-15T14:30:00.000`, with or
/// without fractional seconds, interpreted as UTC), RFC 3339 timestamps with
/// an offset, and bare `2024-01-15` dates (midnight UTC).
#[must_use]
pub fn parse_feed_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    None
}

/// Parses the datetime stored in `field`.
#[must_use]
pub fn field_date(record: &Value, field: &str) -> Option<DateTime<Utc>> {
    get_str(record, field).and_then(parse_feed_date)
}

/// Replaces the time of day of `date` with `hour:minute:00`.
///
/// Returns `None` if the hour or minute is not a valid clock time.
#[must_use]
pub fn overlay_time(date: DateTime<Utc>, hour: u32, minute: u32) -> Option<DateTime<Utc>> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    Some(NaiveDateTime::new(date.date_naive(), time).and_utc())
}

/// Splits an `HHMM` time string: the first two characters are the hour and
/// the remainder the minutes. Strings of three characters or fewer are not
/// times.
#[must_use]
pub fn parse_hhmm(s: &str) -> Option<(u32, u32)> {
    if s.chars().count() <= 3 {
        return None;
    }
    let split = s.char_indices().nth(2).map(|(i, _)| i)?;
    let hour = parse_int_prefix(&s[..split])?;
    let minute = parse_int_prefix(&s[split..])?;
    Some((u32::try_from(hour).ok()?, u32::try_from(minute).ok()?))
}

/// Splits an `H:MM` (or `HH:MM:SS`) time string into hour and minute.
#[must_use]
pub fn parse_colon_time(s: &str) -> Option<(u32, u32)> {
    let mut parts = s.split(':');
    let hour = parse_int_prefix(parts.next()?)?;
    let minute = parse_int_prefix(parts.next()?)?;
    Some((u32::try_from(hour).ok()?, u32::try_from(minute).ok()?))
}

/// Parses the leading integer of `s`: optional whitespace and sign followed
/// by as many decimal digits as are present. `"0613"` is `613`, `"12ab"` is
/// `12`, and `"ab"` is `None`.
#[must_use]
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value = digits[..end].parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}

/// Returns `true` if the pair is a valid WGS84 longitude/latitude.
#[must_use]
pub fn is_valid_lng_lat(longitude: f64, latitude: f64) -> bool {
    (-180.0..=180.0).contains(&longitude) && (-90.0..=90.0).contains(&latitude)
}

/// Extracts `(longitude, latitude)` from a `GeoJSON`-style object's
/// `coordinates` array, e.g. `{"type":"Point","coordinates":[-75.1,39.9]}`.
#[must_use]
pub fn coordinates_of(object: &Value) -> Option<(f64, f64)> {
    let coords = object.get("coordinates")?.as_array()?;
    let longitude = as_number(coords.first()?)?;
    let latitude = as_number(coords.get(1)?)?;
    Some((longitude, latitude))
}

/// Extracts `(longitude, latitude)` from a Socrata location object, e.g.
/// `{"latitude":"29.95","longitude":"-90.07"}`.
#[must_use]
pub fn lng_lat_of(object: &Value) -> Option<(f64, f64)> {
    let longitude = as_number(object.get("longitude")?)?;
    let latitude = as_number(object.get("latitude")?)?;
    Some((longitude, latitude))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_socrata_date_with_fractional() {
        let dt = parse_feed_date("2024-01-15T14:30:00.000").unwrap();
        assert_eq!(dt.to_string(), "2024-01-15 14:30:00 UTC");
    }

    #[test]
    fn parses_socrata_date_without_fractional() {
        let dt = parse_feed_date("2024-01-15T14:30:00").unwrap();
        assert_eq!(dt.to_string(), "2024-01-15 14:30:00 UTC");
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let dt = parse_feed_date("2024-01-15T14:30:00-05:00").unwrap();
        assert_eq!(dt.to_string(), "2024-01-15 19:30:00 UTC");
    }

    #[test]
    fn parses_bare_date() {
        let dt = parse_feed_date("2024-01-15").unwrap();
        assert_eq!(dt.to_string(), "2024-01-15 00:00:00 UTC");
    }

    #[test]
    fn rejects_invalid_date() {
        assert!(parse_feed_date("not-a-date").is_none());
        assert!(field_date(&json!({"date": 5}), "date").is_none());
    }

    #[test]
    fn overlays_time_of_day() {
        let date = parse_feed_date("2024-01-15T00:00:00").unwrap();
        let dt = overlay_time(date, 14, 5).unwrap();
        assert_eq!(dt.to_string(), "2024-01-15 14:05:00 UTC");
        assert!(overlay_time(date, 24, 0).is_none());
    }

    #[test]
    fn splits_hhmm() {
        assert_eq!(parse_hhmm("1430"), Some((14, 30)));
        assert_eq!(parse_hhmm("0005"), Some((0, 5)));
        assert_eq!(parse_hhmm("930"), None);
        assert_eq!(parse_hhmm("ab30"), None);
    }

    #[test]
    fn splits_colon_time() {
        assert_eq!(parse_colon_time("9:05"), Some((9, 5)));
        assert_eq!(parse_colon_time("23:59:00"), Some((23, 59)));
        assert_eq!(parse_colon_time("0930"), None);
    }

    #[test]
    fn parses_integer_prefix() {
        assert_eq!(parse_int_prefix("0613"), Some(613));
        assert_eq!(parse_int_prefix("061"), Some(61));
        assert_eq!(parse_int_prefix("  12ab"), Some(12));
        assert_eq!(parse_int_prefix("-7"), Some(-7));
        assert_eq!(parse_int_prefix("ab"), None);
        assert_eq!(parse_int_prefix(""), None);
    }

    #[test]
    fn validates_lng_lat_bounds() {
        assert!(is_valid_lng_lat(-122.4194, 37.7749));
        assert!(!is_valid_lng_lat(200.0, 37.7749));
        assert!(!is_valid_lng_lat(-122.4194, -91.0));
    }

    #[test]
    fn extracts_geojson_point_coords() {
        let shape = json!({"type": "Point", "coordinates": [-75.16, 39.95]});
        assert_eq!(coordinates_of(&shape), Some((-75.16, 39.95)));
        assert_eq!(coordinates_of(&json!({"coordinates": [-75.16]})), None);
    }

    #[test]
    fn extracts_socrata_location_coords() {
        let location = json!({"latitude": "29.95", "longitude": "-90.07"});
        assert_eq!(lng_lat_of(&location), Some((-90.07, 29.95)));
        assert_eq!(lng_lat_of(&json!({"latitude": "29.95"})), None);
    }

    #[test]
    fn reads_numeric_ids_as_text() {
        let record = json!({"dc_key": 201_700_012_345_i64, "id": "42"});
        assert_eq!(native_id(&record, "dc_key"), "201700012345");
        assert_eq!(native_id(&record, "id"), "42");
        assert_eq!(native_id(&record, "missing"), "");
    }

    #[test]
    fn copies_present_fields_only() {
        let record = json!({"beat": "A1", "disposition": null});
        let extras = copy_fields(&record, &[("beat", "beat"), ("disposition", "disposition")]);
        assert_eq!(extras.len(), 1);
        assert_eq!(extras["beat"], "A1");
    }

    #[test]
    fn first_non_empty_skips_blank_values() {
        let record = json!({"type": "", "type_": "21", "initialtype": "34S"});
        assert_eq!(
            first_non_empty(&record, &["type", "type_", "initialtype"]).unwrap(),
            "21"
        );
    }
}
