//! Las Vegas Metropolitan Police Department feed adapter.
//!
//! Dataset: <https://opendata.lasvegasnevada.gov/resource/x8rh-2ghp.json>.
//! The feed's `location_1` object is attached verbatim as the geometry.
//! Calls for service without one are dropped.

use crime_harvest_crime_models::{ClassificationFlags, ClassificationRow};
use crime_harvest_source_models::{CanonicalRecord, RecordGeometry, RecordProperties};
use serde_json::Value;

use crate::CrimeSiteAdapter;
use crate::categorization::lookup;
use crate::parsing::{copy_fields, field_date, get_text, has_value, native_id};
use crate::site_def::SiteDefinition;

/// Classification table column holding call types.
const CLASSIFICATION_FIELD: &str = "code";

const EXTRA_FIELDS: &[(&str, &str)] = &[
    ("event_number", "event_number"),
    ("general_location", "general_location"),
    ("beat", "beat"),
    ("disposition", "disposition"),
    ("map_x", "map_x"),
    ("map_y", "map_y"),
];

/// Las Vegas feed adapter.
pub struct VegasAdapter;

impl VegasAdapter {
    /// Creates a new Las Vegas adapter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for VegasAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl CrimeSiteAdapter for VegasAdapter {
    fn normalize_record(
        &self,
        site: &SiteDefinition,
        record: &Value,
        classifications: &[ClassificationRow],
        updated: i64,
    ) -> Option<CanonicalRecord> {
        let event_number = native_id(record, "event_number");

        if !has_value(record, "location_1") {
            log::debug!("{}: dropping {event_number} without location", site.city);
            return None;
        }
        let location = record.get("location_1")?.clone();

        let row = lookup(classifications, CLASSIFICATION_FIELD, record.get("type"));

        let properties = RecordProperties {
            source: site.city.clone(),
            offense_type: get_text(record, "type"),
            description: get_text(record, "type_description"),
            timestamp: field_date(record, "event_date").map(|dt| dt.timestamp_millis()),
            updated,
            flags: ClassificationFlags::from_row(row),
            extra: copy_fields(record, EXTRA_FIELDS),
        };

        Some(
            CanonicalRecord::new(&site.city, &event_number, properties)
                .with_geometry(Some(RecordGeometry::Verbatim(location))),
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::registry::find_site;

    fn site() -> SiteDefinition {
        find_site("vegas").unwrap()
    }

    fn codes() -> Vec<ClassificationRow> {
        vec![
            ClassificationRow::new()
                .with("code", "415")
                .with("CDSNV", "1")
                .with("CDSDV", "0")
                .with("CDSSTREET", "1"),
        ]
    }

    #[test]
    fn attaches_location_verbatim() {
        let location = json!({"type": "Point", "coordinates": [-115.14, 36.17]});
        let raw = json!({
            "event_number": "LLV170702000123",
            "event_date": "2017-07-02T03:12:00.000",
            "type": "415",
            "type_description": "DISTURBANCE",
            "general_location": "1500 BLOCK FREMONT ST",
            "beat": "C1",
            "disposition": "CLOSED",
            "map_x": "764321",
            "map_y": "26789012",
            "location_1": location
        });
        let records = site().normalize(&[raw], &codes());
        let record = &records[0];

        assert_eq!(record.id, "VegasLLV170702000123");
        assert_eq!(
            record.geometry,
            Some(RecordGeometry::Verbatim(json!({
                "type": "Point",
                "coordinates": [-115.14, 36.17]
            })))
        );
        assert!(record.properties.flags.non_violent);
        assert_eq!(record.properties.extra["beat"], "C1");
        assert_eq!(record.properties.extra.len(), EXTRA_FIELDS.len());
    }

    #[test]
    fn drops_records_without_location() {
        let with_location = json!({
            "event_number": "1",
            "type": "415",
            "location_1": {"latitude": "36.1"}
        });
        let without_location = json!({"event_number": "2", "type": "415"});
        let empty_location = json!({"event_number": "3", "type": "415", "location_1": null});

        let input = [with_location, without_location, empty_location];
        let records = site().normalize(&input, &codes());

        assert!(records.len() < input.len());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "Vegas1");
    }
}
