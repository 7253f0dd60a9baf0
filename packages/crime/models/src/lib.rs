#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime classification table rows and the standardized severity flags.
//!
//! Every city publishes its own offense code system. A per-city reference
//! table maps those codes to three flags shared by all cities:
//! non-violent (`CDSNV`), domestic violence (`CDSDV`), and street crime
//! (`CDSSTREET`). This crate defines the row type for those tables and the
//! resolved flag set attached to every normalized record.

pub mod value;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{AsRefStr, Display, EnumString};

/// One of the three standardized classification flags.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum ClassificationFlag {
    /// Non-violent crime
    #[serde(rename = "CDSNV")]
    #[strum(serialize = "CDSNV")]
    NonViolent,
    /// Domestic-violence related
    #[serde(rename = "CDSDV")]
    #[strum(serialize = "CDSDV")]
    DomesticViolence,
    /// Occurred on a public street
    #[serde(rename = "CDSSTREET")]
    #[strum(serialize = "CDSSTREET")]
    Street,
}

impl ClassificationFlag {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::NonViolent, Self::DomesticViolence, Self::Street]
    }
}

/// A single row of a city's classification table.
///
/// Rows are untyped: field names come from the table header and values may
/// be strings (CSV) or numbers (hand-built fixtures). Field order is not
/// significant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassificationRow(BTreeMap<String, Value>);

impl ClassificationRow {
    /// Creates an empty row.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns the value stored under `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Sets `field` to `value`, returning the row for chaining.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Returns `true` if the given flag column loosely equals `1`.
    #[must_use]
    pub fn flag(&self, flag: ClassificationFlag) -> bool {
        self.get(flag.as_ref())
            .is_some_and(|v| value::loose_eq_number(v, 1.0))
    }

    /// Returns the truthiness of the given flag column (see
    /// [`value::is_truthy`]). Missing columns are falsy.
    #[must_use]
    pub fn flag_is_truthy(&self, flag: ClassificationFlag) -> bool {
        self.get(flag.as_ref()).is_some_and(value::is_truthy)
    }
}

impl From<BTreeMap<String, Value>> for ClassificationRow {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ClassificationRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// The resolved classification flags for one record.
///
/// All flags are `false` when no classification row matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassificationFlags {
    /// `CDSNV`
    #[serde(rename = "CDSNV")]
    pub non_violent: bool,
    /// `CDSDV`
    #[serde(rename = "CDSDV")]
    pub domestic_violence: bool,
    /// `CDSSTREET`
    #[serde(rename = "CDSSTREET")]
    pub street: bool,
}

impl ClassificationFlags {
    /// Resolves flags from an optional matched row.
    #[must_use]
    pub fn from_row(row: Option<&ClassificationRow>) -> Self {
        row.map_or_else(Self::default, |row| Self {
            non_violent: row.flag(ClassificationFlag::NonViolent),
            domestic_violence: row.flag(ClassificationFlag::DomesticViolence),
            street: row.flag(ClassificationFlag::Street),
        })
    }

    /// Returns the value of a single flag.
    #[must_use]
    pub const fn get(self, flag: ClassificationFlag) -> bool {
        match flag {
            ClassificationFlag::NonViolent => self.non_violent,
            ClassificationFlag::DomesticViolence => self.domestic_violence,
            ClassificationFlag::Street => self.street,
        }
    }
}
