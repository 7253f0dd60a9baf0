//! Concrete city feed adapters.
//!
//! Each module implements [`CrimeSiteAdapter`] for one city's record
//! schema. [`AdapterKind`] is the closed set of adapters a
//! [`SiteDefinition`](crate::site_def::SiteDefinition) can name.

pub mod baton_rouge;
pub mod boston;
pub mod chicago;
pub mod nola;
pub mod philly;
pub mod sf;
pub mod vegas;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::CrimeSiteAdapter;

/// Which adapter normalizes a site's records.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AdapterKind {
    /// Philadelphia
    Philly,
    /// Chicago
    Chicago,
    /// Baton Rouge
    BatonRouge,
    /// San Francisco
    Sf,
    /// Boston
    Boston,
    /// Las Vegas
    Vegas,
    /// New Orleans
    Nola,
}

impl AdapterKind {
    /// Returns the adapter implementation for this kind.
    #[must_use]
    pub fn adapter(self) -> &'static dyn CrimeSiteAdapter {
        match self {
            Self::Philly => &philly::PhillyAdapter,
            Self::Chicago => &chicago::ChicagoAdapter,
            Self::BatonRouge => &baton_rouge::BatonRougeAdapter,
            Self::Sf => &sf::SfAdapter,
            Self::Boston => &boston::BostonAdapter,
            Self::Vegas => &vegas::VegasAdapter,
            Self::Nola => &nola::NolaAdapter,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Philly,
            Self::Chicago,
            Self::BatonRouge,
            Self::Sf,
            Self::Boston,
            Self::Vegas,
            Self::Nola,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_round_trip_through_names() {
        for kind in AdapterKind::all() {
            let parsed: AdapterKind = kind.as_ref().parse().unwrap();
            assert_eq!(parsed, *kind);
        }
        assert_eq!(AdapterKind::BatonRouge.to_string(), "baton_rouge");
    }
}
