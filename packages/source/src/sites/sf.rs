//! San Francisco Police Department feed adapter.
//!
//! Dataset: <https://data.sfgov.org/resource/tmnf-yvry.json>. Coordinates
//! are published as separate `x`/`y` strings and occasionally hold
//! placeholder values outside WGS84 range, so they are bounds-checked
//! before a geometry is attached.

use chrono::{DateTime, Utc};
use crime_harvest_crime_models::value::parse_number;
use crime_harvest_crime_models::{ClassificationFlags, ClassificationRow};
use crime_harvest_source_models::{CanonicalRecord, RecordGeometry, RecordProperties};
use serde_json::Value;

use crate::CrimeSiteAdapter;
use crate::categorization::lookup;
use crate::parsing::{
    copy_fields, field_date, get_str, get_text, has_value, is_valid_lng_lat, native_id,
    overlay_time, parse_colon_time,
};
use crate::site_def::SiteDefinition;

/// Classification table column holding incident categories.
const CLASSIFICATION_FIELD: &str = "Category";

/// San Francisco feed adapter.
pub struct SfAdapter;

impl SfAdapter {
    /// Creates a new San Francisco adapter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for SfAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl CrimeSiteAdapter for SfAdapter {
    fn normalize_record(
        &self,
        site: &SiteDefinition,
        record: &Value,
        classifications: &[ClassificationRow],
        updated: i64,
    ) -> Option<CanonicalRecord> {
        let incidntnum = native_id(record, "incidntnum");
        let row = lookup(classifications, CLASSIFICATION_FIELD, record.get("category"));

        let properties = RecordProperties {
            source: site.city.clone(),
            offense_type: get_text(record, "category"),
            description: get_text(record, "descript"),
            timestamp: occurred_at(record).map(|dt| dt.timestamp_millis()),
            updated,
            flags: ClassificationFlags::from_row(row),
            extra: copy_fields(record, &[("compnos", "incidntnum")]),
        };

        let geometry = if has_value(record, "x") && has_value(record, "y") {
            let longitude = get_text(record, "x").as_deref().and_then(parse_number);
            let latitude = get_text(record, "y").as_deref().and_then(parse_number);
            match (longitude, latitude) {
                (Some(lng), Some(lat)) if is_valid_lng_lat(lng, lat) => {
                    Some(RecordGeometry::point(lng, lat))
                }
                _ => {
                    log::debug!("{}: {incidntnum} has out-of-range coordinates", site.city);
                    None
                }
            }
        } else {
            log::debug!("{}: {incidntnum} has no coordinates", site.city);
            None
        };

        Some(CanonicalRecord::new(&site.city, &incidntnum, properties).with_geometry(geometry))
    }
}

/// `date` with the `H:MM` `time` column applied. An unusable time leaves
/// the date as published.
fn occurred_at(record: &Value) -> Option<DateTime<Utc>> {
    let date = field_date(record, "date")?;
    let with_time = get_str(record, "time")
        .and_then(parse_colon_time)
        .and_then(|(hour, minute)| overlay_time(date, hour, minute));
    Some(with_time.unwrap_or(date))
}
