//! Chicago Police Department feed adapter.
//!
//! Dataset: <https://data.cityofchicago.org/resource/6zsd-86xi.json>.
//! Offenses are classified by IUCR code, but the domestic-violence flag
//! comes from the record's own `domestic` column rather than the
//! classification table.

use crime_harvest_crime_models::{ClassificationFlags, ClassificationRow};
use crime_harvest_source_models::{CanonicalRecord, RecordGeometry, RecordProperties};
use serde_json::Value;

use crate::CrimeSiteAdapter;
use crate::categorization::lookup;
use crate::parsing::{coordinates_of, copy_fields, field_date, get_text, native_id};
use crate::site_def::SiteDefinition;

/// Classification table column holding IUCR codes.
const CLASSIFICATION_FIELD: &str = "IUCR";

/// Chicago feed adapter.
pub struct ChicagoAdapter;

impl ChicagoAdapter {
    /// Creates a new Chicago adapter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for ChicagoAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl CrimeSiteAdapter for ChicagoAdapter {
    fn normalize_record(
        &self,
        site: &SiteDefinition,
        record: &Value,
        classifications: &[ClassificationRow],
        updated: i64,
    ) -> Option<CanonicalRecord> {
        let id = native_id(record, "id");
        let row = lookup(classifications, CLASSIFICATION_FIELD, record.get("iucr"));

        let mut flags = ClassificationFlags::from_row(row);
        flags.domestic_violence = parse_domestic(record.get("domestic"));

        let properties = RecordProperties {
            source: site.city.clone(),
            offense_type: get_text(record, "fbi_code"),
            description: describe(
                get_text(record, "primary_type"),
                get_text(record, "description"),
            ),
            timestamp: field_date(record, "date").map(|dt| dt.timestamp_millis()),
            updated,
            flags,
            extra: copy_fields(record, &[("compnos", "id"), ("iucr", "iucr")]),
        };

        let geometry = record
            .get("location")
            .and_then(coordinates_of)
            .map(|(lng, lat)| RecordGeometry::point(lng, lat));

        Some(CanonicalRecord::new(&site.city, &id, properties).with_geometry(geometry))
    }
}

/// Joins primary type and description as `PRIMARY>DESCRIPTION`.
fn describe(primary_type: Option<String>, description: Option<String>) -> Option<String> {
    match (primary_type, description) {
        (Some(primary), Some(detail)) => Some(format!("{primary}>{detail}")),
        (Some(only), None) | (None, Some(only)) => Some(only),
        (None, None) => None,
    }
}

/// Reads the `domestic` column, which Socrata serves as a boolean but older
/// exports carry as `"true"`/`"false"` text.
fn parse_domestic(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::registry::find_site;

    fn site() -> SiteDefinition {
        find_site("chicago").unwrap()
    }

    fn codes() -> Vec<ClassificationRow> {
        vec![
            ClassificationRow::new()
                .with("IUCR", "0486")
                .with("CDSNV", "0")
                .with("CDSDV", "0")
                .with("CDSSTREET", "1"),
        ]
    }

    fn raw(domestic: Value) -> Value {
        json!({
            "id": "12345",
            "location": {"type": "Point", "coordinates": [-87.6298, 41.8781]},
            "date": "2017-07-01T22:10:00.000",
            "primary_type": "BATTERY",
            "fbi_code": "08B",
            "iucr": "0486",
            "description": "DOMESTIC BATTERY SIMPLE",
            "domestic": domestic
        })
    }

    #[test]
    fn normalizes_full_record() {
        let records = site().normalize(&[raw(json!(true))], &codes());
        let record = &records[0];

        assert_eq!(record.id, "Chicago12345");
        assert_eq!(record.properties.offense_type.as_deref(), Some("08B"));
        assert_eq!(
            record.properties.description.as_deref(),
            Some("BATTERY>DOMESTIC BATTERY SIMPLE")
        );
        assert_eq!(record.properties.extra["iucr"], "0486");
        assert_eq!(record.properties.extra["compnos"], "12345");
        assert!(!record.properties.flags.non_violent);
        assert!(record.properties.flags.street);
        assert!(record.geometry.is_some());
    }

    #[test]
    fn domestic_flag_comes_from_record_not_table() {
        let table_says_domestic = vec![
            ClassificationRow::new()
                .with("IUCR", "0486")
                .with("CDSDV", "1"),
        ];
        let records = site().normalize(&[raw(json!(false))], &table_says_domestic);
        assert!(!records[0].properties.flags.domestic_violence);

        let records = site().normalize(&[raw(json!(true))], &codes());
        assert!(records[0].properties.flags.domestic_violence);

        let records = site().normalize(&[raw(json!("true"))], &codes());
        assert!(records[0].properties.flags.domestic_violence);
    }

    #[test]
    fn missing_domestic_is_false() {
        let mut record = raw(json!(null));
        record.as_object_mut().unwrap().remove("domestic");
        let records = site().normalize(&[record], &codes());
        assert!(!records[0].properties.flags.domestic_violence);
    }

    #[test]
    fn describes_partial_types() {
        assert_eq!(
            describe(Some("THEFT".to_string()), None).as_deref(),
            Some("THEFT")
        );
        assert!(describe(None, None).is_none());
    }
}
