//! New Orleans Police Department feed adapter.
//!
//! Dataset: <https://data.nola.gov/resource/bqmt-f3jk.json>. Calls for
//! service with a missing or empty `type` fall back to their initial type
//! before classification, and calls without a usable `location` are
//! dropped.

use crime_harvest_crime_models::{ClassificationFlags, ClassificationRow};
use crime_harvest_source_models::{CanonicalRecord, RecordGeometry, RecordProperties};
use serde_json::Value;

use crate::CrimeSiteAdapter;
use crate::categorization::lookup;
use crate::parsing::{copy_fields, field_date, get_text, lng_lat_of, native_id};
use crate::site_def::SiteDefinition;

/// Classification table column holding call types.
const CLASSIFICATION_FIELD: &str = "Type";

const EXTRA_FIELDS: &[(&str, &str)] = &[
    ("nopd_item", "nopd_item"),
    ("mapx", "mapx"),
    ("mapy", "mapy"),
    ("block_address", "block_address"),
];

/// New Orleans feed adapter.
pub struct NolaAdapter;

impl NolaAdapter {
    /// Creates a new New Orleans adapter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for NolaAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl CrimeSiteAdapter for NolaAdapter {
    fn normalize_record(
        &self,
        site: &SiteDefinition,
        record: &Value,
        classifications: &[ClassificationRow],
        updated: i64,
    ) -> Option<CanonicalRecord> {
        let nopd_item = native_id(record, "nopd_item");

        let Some((longitude, latitude)) = record.get("location").and_then(lng_lat_of) else {
            log::debug!("{}: dropping {nopd_item} without location", site.city);
            return None;
        };

        let call_type = get_text(record, "type")
            .filter(|t| !t.is_empty())
            .or_else(|| get_text(record, "initialtype"));
        let code = call_type.clone().map(Value::String);
        let row = lookup(classifications, CLASSIFICATION_FIELD, code.as_ref());

        let properties = RecordProperties {
            source: site.city.clone(),
            offense_type: call_type,
            description: get_text(record, "typetext"),
            timestamp: field_date(record, "timeclosed").map(|dt| dt.timestamp_millis()),
            updated,
            flags: ClassificationFlags::from_row(row),
            extra: copy_fields(record, EXTRA_FIELDS),
        };

        Some(
            CanonicalRecord::new(&site.city, &nopd_item, properties)
                .with_geometry(Some(RecordGeometry::point(longitude, latitude))),
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::registry::find_site;

    fn site() -> SiteDefinition {
        find_site("nola").unwrap()
    }

    fn codes() -> Vec<ClassificationRow> {
        vec![
            ClassificationRow::new()
                .with("Type", "21")
                .with("CDSNV", "1")
                .with("CDSDV", "0")
                .with("CDSSTREET", "0"),
            ClassificationRow::new()
                .with("Type", "103D")
                .with("CDSNV", "0")
                .with("CDSDV", "1")
                .with("CDSSTREET", "0"),
        ]
    }

    fn location() -> Value {
        json!({"latitude": "29.9511", "longitude": "-90.0715"})
    }

    #[test]
    fn normalizes_record_with_location() {
        let raw = json!({
            "nopd_item": "G0123417",
            "type": "21",
            "typetext": "COMPLAINT OTHER",
            "initialtype": "103D",
            "timeclosed": "2017-07-03T08:15:00.000",
            "block_address": "001XX Canal St",
            "mapx": "3680000",
            "mapy": "528000",
            "location": location()
        });
        let records = site().normalize(&[raw], &codes());
        let record = &records[0];

        assert_eq!(record.id, "nolaG0123417");
        assert_eq!(record.properties.offense_type.as_deref(), Some("21"));
        assert!(record.properties.flags.non_violent);
        assert_eq!(record.properties.extra["block_address"], "001XX Canal St");
        assert_eq!(
            record.geometry.as_ref().unwrap().coordinates(),
            Some((-90.0715, 29.9511))
        );
    }

    #[test]
    fn empty_type_falls_back_to_initial_type() {
        let raw = json!({
            "nopd_item": "G1",
            "type": "",
            "initialtype": "103D",
            "location": location()
        });
        let records = site().normalize(&[raw], &codes());
        assert_eq!(records[0].properties.offense_type.as_deref(), Some("103D"));
        assert!(records[0].properties.flags.domestic_violence);
        assert!(!records[0].properties.flags.non_violent);
    }

    #[test]
    fn missing_type_ignores_socrata_type_column() {
        let raw = json!({
            "nopd_item": "G2",
            "type_": "21",
            "initialtype": "103D",
            "location": location()
        });
        let records = site().normalize(&[raw], &codes());
        let record = &records[0];

        assert_eq!(record.properties.offense_type.as_deref(), Some("103D"));
        assert!(record.properties.flags.domestic_violence);
        assert!(!record.properties.flags.non_violent);
    }

    #[test]
    fn drops_records_without_usable_location() {
        let input = [
            json!({"nopd_item": "G3", "type": "21", "location": location()}),
            json!({"nopd_item": "G4", "type": "21"}),
            json!({"nopd_item": "G5", "type": "21", "location": {"human_address": "{}"}}),
        ];
        let records = site().normalize(&input, &codes());
        assert!(records.len() < input.len());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "nolaG3");
    }
}
