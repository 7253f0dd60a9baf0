//! Philadelphia Police Department feed adapter.
//!
//! Dataset: <https://data.phila.gov/resource/sspu-uyfa.json>. Offenses are
//! classified by their general UCR code against the `UCR` column.

use crime_harvest_crime_models::{ClassificationFlags, ClassificationRow};
use crime_harvest_source_models::{CanonicalRecord, RecordGeometry, RecordProperties};
use serde_json::Value;

use crate::CrimeSiteAdapter;
use crate::categorization::lookup;
use crate::parsing::{coordinates_of, copy_fields, field_date, get_text, native_id};
use crate::site_def::SiteDefinition;

/// Classification table column holding UCR codes.
const CLASSIFICATION_FIELD: &str = "UCR";

/// Philadelphia feed adapter.
pub struct PhillyAdapter;

impl PhillyAdapter {
    /// Creates a new Philadelphia adapter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for PhillyAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl CrimeSiteAdapter for PhillyAdapter {
    fn normalize_record(
        &self,
        site: &SiteDefinition,
        record: &Value,
        classifications: &[ClassificationRow],
        updated: i64,
    ) -> Option<CanonicalRecord> {
        let dc_key = native_id(record, "dc_key");
        let row = lookup(
            classifications,
            CLASSIFICATION_FIELD,
            record.get("ucr_general"),
        );

        let properties = RecordProperties {
            source: site.city.clone(),
            offense_type: get_text(record, "ucr_general"),
            description: get_text(record, "text_general_code"),
            timestamp: field_date(record, "dispatch_date_time").map(|dt| dt.timestamp_millis()),
            updated,
            flags: ClassificationFlags::from_row(row),
            extra: copy_fields(record, &[("compnos", "dc_key")]),
        };

        let geometry = record
            .get("shape")
            .and_then(coordinates_of)
            .map(|(lng, lat)| RecordGeometry::point(lng, lat));

        Some(CanonicalRecord::new(&site.city, &dc_key, properties).with_geometry(geometry))
    }
}
