//! Baton Rouge Police Department feed adapter.
//!
//! Dataset: <https://data.brla.gov/resource/5rji-ddnu.json>. The offense
//! date and time of day are published separately; the time is an `HHMM`
//! string overlaid onto the date.

use chrono::{DateTime, Utc};
use crime_harvest_crime_models::{ClassificationFlags, ClassificationRow};
use crime_harvest_source_models::{CanonicalRecord, RecordGeometry, RecordProperties};
use serde_json::Value;

use crate::CrimeSiteAdapter;
use crate::categorization::lookup;
use crate::parsing::{
    coordinates_of, copy_fields, field_date, first_non_empty, get_str, get_text, native_id,
    overlay_time, parse_hhmm,
};
use crate::site_def::SiteDefinition;

/// Classification table column holding crime categories.
const CLASSIFICATION_FIELD: &str = "CRIME";

/// Baton Rouge feed adapter.
pub struct BatonRougeAdapter;

impl BatonRougeAdapter {
    /// Creates a new Baton Rouge adapter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for BatonRougeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl CrimeSiteAdapter for BatonRougeAdapter {
    fn normalize_record(
        &self,
        site: &SiteDefinition,
        record: &Value,
        classifications: &[ClassificationRow],
        updated: i64,
    ) -> Option<CanonicalRecord> {
        let file_number = native_id(record, "file_number");
        let row = lookup(classifications, CLASSIFICATION_FIELD, record.get("crime"));

        let properties = RecordProperties {
            source: site.city.clone(),
            offense_type: get_text(record, "crime"),
            description: first_non_empty(record, &["offense_desc", "offense"]),
            timestamp: occurred_at(record).map(|dt| dt.timestamp_millis()),
            updated,
            flags: ClassificationFlags::from_row(row),
            extra: copy_fields(record, &[("compnos", "file_number")]),
        };

        let geometry = record
            .get("geolocation")
            .and_then(coordinates_of)
            .map(|(lng, lat)| RecordGeometry::point(lng, lat));

        Some(CanonicalRecord::new(&site.city, &file_number, properties).with_geometry(geometry))
    }
}

/// `offense_date` with the `offense_time` hours and minutes applied. An
/// unusable time leaves the date as published.
fn occurred_at(record: &Value) -> Option<DateTime<Utc>> {
    let date = field_date(record, "offense_date")?;
    let with_time = get_str(record, "offense_time")
        .and_then(parse_hhmm)
        .and_then(|(hour, minute)| overlay_time(date, hour, minute));
    Some(with_time.unwrap_or(date))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::registry::find_site;

    fn site() -> SiteDefinition {
        find_site("baton_rouge").unwrap()
    }

    fn codes() -> Vec<ClassificationRow> {
        vec![
            ClassificationRow::new()
                .with("CRIME", "THEFT")
                .with("CDSNV", "1")
                .with("CDSDV", "0")
                .with("CDSSTREET", "0"),
        ]
    }

    #[test]
    fn overlays_hhmm_onto_offense_date() {
        let raw = json!({
            "file_number": "17-00012345",
            "offense_date": "2017-07-03T00:00:00.000",
            "offense_time": "1430",
            "crime": "Theft",
            "offense": "14:67 THEFT",
            "geolocation": {"type": "Point", "coordinates": [-91.14, 30.45]}
        });
        let records = site().normalize(&[raw], &codes());
        let record = &records[0];

        assert_eq!(record.id, "BatonRouge17-00012345");
        let expected = chrono::DateTime::parse_from_rfc3339("2017-07-03T14:30:00Z")
            .unwrap()
            .timestamp_millis();
        assert_eq!(record.properties.timestamp, Some(expected));
        assert!(record.properties.flags.non_violent);
        assert_eq!(record.properties.description.as_deref(), Some("14:67 THEFT"));
        assert_eq!(record.properties.offense_type.as_deref(), Some("Theft"));
        assert!(record.geometry.is_some());
    }

    #[test]
    fn short_time_keeps_date_only() {
        let raw = json!({
            "file_number": "1",
            "offense_date": "2017-07-03T00:00:00.000",
            "offense_time": "930"
        });
        let records = site().normalize(&[raw], &codes());
        let expected = chrono::DateTime::parse_from_rfc3339("2017-07-03T00:00:00Z")
            .unwrap()
            .timestamp_millis();
        assert_eq!(records[0].properties.timestamp, Some(expected));
    }

    #[test]
    fn prefers_offense_description_when_present() {
        let raw = json!({
            "file_number": "2",
            "offense_desc": "SIMPLE BURGLARY",
            "offense": "14:62"
        });
        let records = site().normalize(&[raw], &codes());
        assert_eq!(
            records[0].properties.description.as_deref(),
            Some("SIMPLE BURGLARY")
        );
        assert!(records[0].geometry.is_none());
    }
}
