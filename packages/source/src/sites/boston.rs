//! Boston Police Department feed adapter.
//!
//! Dataset: <https://data.cityofboston.gov/resource/29yf-ye7n>. Offense
//! codes are matched against the `ucr_minus2digits` column in two steps:
//! first the full code, then, unless that match is flagged non-violent,
//! the coarser family formed by its first three characters.

use crime_harvest_crime_models::value::parse_number;
use crime_harvest_crime_models::{ClassificationFlag, ClassificationFlags, ClassificationRow};
use crime_harvest_source_models::{CanonicalRecord, RecordGeometry, RecordProperties};
use serde_json::Value;

use crate::CrimeSiteAdapter;
use crate::categorization::lookup;
use crate::parsing::{copy_fields, field_date, get_text, has_value, native_id, parse_int_prefix};
use crate::site_def::SiteDefinition;

/// Classification table column holding offense code families.
const CLASSIFICATION_FIELD: &str = "ucr_minus2digits";

/// Number of leading offense-code characters forming the coarse family.
const CODE_FAMILY_LEN: usize = 3;

/// Raw columns copied into the record properties unchanged.
const EXTRA_FIELDS: &[(&str, &str)] = &[
    ("incident_number", "incident_number"),
    ("offense_code", "offense_code"),
    ("offense_code_group", "offense_code_group"),
    ("offense_description", "offense_description"),
    ("district", "district"),
    ("reporting_area", "reporting_area"),
    ("shooting", "shooting"),
    ("occurred_on_date", "occurred_on_date"),
    ("year", "year"),
    ("month", "month"),
    ("day_of_week", "day_of_week"),
    ("ucr_part", "ucr_part"),
    ("street", "street"),
];

/// Boston feed adapter.
pub struct BostonAdapter;

impl BostonAdapter {
    /// Creates a new Boston adapter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for BostonAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl CrimeSiteAdapter for BostonAdapter {
    fn normalize_record(
        &self,
        site: &SiteDefinition,
        record: &Value,
        classifications: &[ClassificationRow],
        updated: i64,
    ) -> Option<CanonicalRecord> {
        let incident_number = native_id(record, "incident_number");
        let offense_code = get_text(record, "offense_code");
        let row = classify(classifications, offense_code.as_deref());

        let properties = RecordProperties {
            source: site.city.clone(),
            offense_type: offense_code,
            description: get_text(record, "offense_description"),
            timestamp: field_date(record, "occurred_on_date").map(|dt| dt.timestamp_millis()),
            updated,
            flags: ClassificationFlags::from_row(row),
            extra: copy_fields(record, EXTRA_FIELDS),
        };

        let geometry = if has_value(record, "lat") && has_value(record, "long") {
            let longitude = get_text(record, "long").as_deref().and_then(parse_number);
            let latitude = get_text(record, "lat").as_deref().and_then(parse_number);
            longitude
                .zip(latitude)
                .map(|(lng, lat)| RecordGeometry::point(lng, lat))
        } else {
            None
        };

        Some(
            CanonicalRecord::new(&site.city, &incident_number, properties)
                .with_geometry(geometry),
        )
    }
}

/// Two-step classification: the full offense code wins only if its row's
/// `CDSNV` value is truthy; otherwise the first-three-character family is
/// looked up and used whether or not it matches.
fn classify<'a>(
    classifications: &'a [ClassificationRow],
    offense_code: Option<&str>,
) -> Option<&'a ClassificationRow> {
    let full = offense_code.and_then(parse_int_prefix).map(Value::from);
    let row = lookup(classifications, CLASSIFICATION_FIELD, full.as_ref());
    if row.is_some_and(|row| row.flag_is_truthy(ClassificationFlag::NonViolent)) {
        return row;
    }

    let family = offense_code
        .map(|code| code.chars().take(CODE_FAMILY_LEN).collect::<String>())
        .and_then(|code| parse_int_prefix(&code))
        .map(Value::from);
    lookup(classifications, CLASSIFICATION_FIELD, family.as_ref())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::registry::find_site;

    fn site() -> SiteDefinition {
        find_site("boston").unwrap()
    }

    fn family_row() -> ClassificationRow {
        ClassificationRow::new()
            .with("ucr_minus2digits", 61)
            .with("CDSNV", 1)
            .with("CDSDV", 0)
            .with("CDSSTREET", 1)
    }

    fn raw(offense_code: &str) -> Value {
        json!({
            "incident_number": "I172052345",
            "offense_code": offense_code,
            "offense_code_group": "Larceny",
            "offense_description": "LARCENY THEFT FROM BUILDING",
            "district": "D4",
            "reporting_area": "130",
            "shooting": "",
            "occurred_on_date": "2017-07-03T11:00:00",
            "year": "2017",
            "street": "BOYLSTON ST",
            "lat": "42.3489",
            "long": "-71.0826"
        })
    }

    #[test]
    fn falls_back_to_code_family() {
        let records = site().normalize(&[raw("0613")], &[family_row()]);
        let record = &records[0];

        assert_eq!(record.id, "BostonI172052345");
        assert!(record.properties.flags.non_violent);
        assert!(record.properties.flags.street);
        assert_eq!(record.properties.offense_type.as_deref(), Some("0613"));
        assert_eq!(record.properties.extra["district"], "D4");
        assert_eq!(record.properties.extra["reporting_area"], "130");
        assert_eq!(record.properties.extra["shooting"], "");
        assert_eq!(
            record.geometry.as_ref().unwrap().coordinates(),
            Some((-71.0826, 42.3489))
        );
    }

    #[test]
    fn full_code_wins_when_non_violent_is_truthy() {
        let full = ClassificationRow::new()
            .with("ucr_minus2digits", "613")
            .with("CDSNV", "1")
            .with("CDSSTREET", "0");
        let rows = vec![full, family_row()];
        assert!(std::ptr::eq(classify(&rows, Some("0613")).unwrap(), &rows[0]));
    }

    #[test]
    fn full_code_with_falsy_non_violent_retries() {
        let full = ClassificationRow::new()
            .with("ucr_minus2digits", 613)
            .with("CDSNV", 0);
        let rows = vec![full, family_row()];
        assert!(std::ptr::eq(classify(&rows, Some("0613")).unwrap(), &rows[1]));
    }

    #[test]
    fn csv_zero_string_counts_as_truthy() {
        let full = ClassificationRow::new()
            .with("ucr_minus2digits", "613")
            .with("CDSNV", "0");
        let rows = vec![full, family_row()];
        assert!(std::ptr::eq(classify(&rows, Some("0613")).unwrap(), &rows[0]));
    }

    #[test]
    fn failed_retry_defaults_flags_to_false() {
        let records = site().normalize(&[raw("3115")], &[family_row()]);
        assert_eq!(records[0].properties.flags, ClassificationFlags::default());
    }

    #[test]
    fn missing_offense_code_does_not_panic() {
        let mut record = raw("0613");
        record.as_object_mut().unwrap().remove("offense_code");
        let records = site().normalize(&[record], &[family_row()]);
        assert_eq!(records.len(), 1);
        assert!(records[0].properties.offense_type.is_none());
        assert!(!records[0].properties.flags.non_violent);
    }

    #[test]
    fn coordinates_parse_as_finite_numbers() {
        let mut padded = raw("0613");
        let fields = padded.as_object_mut().unwrap();
        fields.insert("lat".to_string(), json!(" 42.3489 "));
        fields.insert("long".to_string(), json!(" -71.0826 "));

        let mut not_finite = raw("0613");
        let fields = not_finite.as_object_mut().unwrap();
        fields.insert("lat".to_string(), json!("NaN"));
        fields.insert("long".to_string(), json!("inf"));

        let records = site().normalize(&[padded, not_finite], &[family_row()]);
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].geometry.as_ref().unwrap().coordinates(),
            Some((-71.0826, 42.3489))
        );
        assert!(records[1].geometry.is_none());
    }
}
