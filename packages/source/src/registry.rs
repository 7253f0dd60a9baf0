//! Site registry. Loads all site definitions from embedded TOML configs.
//!
//! Each `.toml` file in `packages/source/sites/` is baked into the binary
//! at compile time via [`include_str!`]. Adding a city means writing its
//! adapter in [`crate::sites`], creating its TOML file, and adding it to
//! the list below.

use crate::site_def::{SiteDefinition, parse_site_toml};

/// TOML configs embedded at compile time, in harvest order.
const SITE_TOMLS: &[(&str, &str)] = &[
    ("philly", include_str!("../sites/philly.toml")),
    ("chicago", include_str!("../sites/chicago.toml")),
    ("baton_rouge", include_str!("../sites/baton_rouge.toml")),
    ("sf", include_str!("../sites/sf.toml")),
    ("boston", include_str!("../sites/boston.toml")),
    ("vegas", include_str!("../sites/vegas.toml")),
    ("nola", include_str!("../sites/nola.toml")),
];

/// Total number of configured sites (used in tests).
#[cfg(test)]
const EXPECTED_SITE_COUNT: usize = 7;

/// Returns all configured site definitions, parsed from embedded TOML.
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time guarantee
/// since the configs are embedded).
#[must_use]
pub fn all_sites() -> Vec<SiteDefinition> {
    SITE_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_site_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Returns the sites harvested by default, in registry order.
#[must_use]
pub fn active_sites() -> Vec<SiteDefinition> {
    all_sites().into_iter().filter(|site| site.enabled).collect()
}

/// Looks up a site by registry id, including disabled sites.
#[must_use]
pub fn find_site(id: &str) -> Option<SiteDefinition> {
    all_sites().into_iter().find(|site| site.id == id)
}
