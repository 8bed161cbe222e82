// plausible-core/src/domain/quality/relational.rs
//
// Cross-field rules: inconsistencies inside one record, independent of the
// rest of the dataset. A rule whose inputs are absent stays silent.

use super::issue::{Issue, IssueKind};
use super::severity::Severity;
use crate::domain::record::Record;

pub const WINTER_TEMP: &str = "avg_temp_winter";
pub const SUMMER_TEMP: &str = "avg_temp_summer";
pub const FEATURES: &str = "geographic_features_actual";
pub const WATER_BODIES: &str = "water_bodies";
pub const ELEVATION: &str = "elevation_meters";
pub const RENT_1BED: &str = "rent_1bed";
pub const RENT_2BED: &str = "rent_2bed";

/// Metres, same unit as the `elevation_meters` convention.
pub const MOUNTAIN_ELEVATION_M: f64 = 2000.0;

type Rule = fn(&Record) -> Option<Issue>;

pub struct RelationalChecker {
    rules: Vec<Rule>,
}

impl RelationalChecker {
    pub fn check(&self, record: &Record) -> Vec<Issue> {
        self.rules.iter().filter_map(|rule| rule(record)).collect()
    }
}

impl Default for RelationalChecker {
    fn default() -> Self {
        Self {
            rules: vec![
                winter_warmer_than_summer,
                coastal_without_sea,
                high_elevation_without_mountain,
                island_not_coastal,
                larger_rent_cheaper,
            ],
        }
    }
}

fn winter_warmer_than_summer(record: &Record) -> Option<Issue> {
    let winter = record.number(WINTER_TEMP)?;
    let summer = record.number(SUMMER_TEMP)?;
    (winter > summer).then(|| {
        Issue::new(
            WINTER_TEMP,
            IssueKind::Relational,
            Severity::Critical,
            format!("Winter temp ({winter}°C) higher than summer ({summer}°C)"),
        )
        .with_value(winter)
        .with_related(&[SUMMER_TEMP, WINTER_TEMP])
    })
}

fn coastal_without_sea(record: &Record) -> Option<Issue> {
    if !record.list_contains(FEATURES, "coastal")? {
        return None;
    }
    let water = record.string_list(WATER_BODIES)?;
    let has_sea = water.iter().any(|w| {
        let w = w.to_lowercase();
        w.contains("ocean") || w.contains("sea")
    });
    (!has_sea).then(|| {
        Issue::new(
            FEATURES,
            IssueKind::Relational,
            Severity::High,
            "Marked as coastal but no ocean/sea in water_bodies",
        )
        .with_related(&[FEATURES, WATER_BODIES])
    })
}

fn high_elevation_without_mountain(record: &Record) -> Option<Issue> {
    let elevation = record.number(ELEVATION)?;
    if elevation <= MOUNTAIN_ELEVATION_M {
        return None;
    }
    let is_mountain = record.list_contains(FEATURES, "mountain")?;
    (!is_mountain).then(|| {
        Issue::new(
            ELEVATION,
            IssueKind::Relational,
            Severity::Medium,
            format!("High elevation ({elevation}m) but not marked as mountain"),
        )
        .with_value(elevation)
        .with_related(&[ELEVATION, FEATURES])
    })
}

fn island_not_coastal(record: &Record) -> Option<Issue> {
    let is_island = record.list_contains(FEATURES, "island")?;
    let is_coastal = record.list_contains(FEATURES, "coastal")?;
    (is_island && !is_coastal).then(|| {
        Issue::new(
            FEATURES,
            IssueKind::Relational,
            Severity::High,
            "Marked as island but not marked as coastal",
        )
        .with_related(&[FEATURES])
    })
}

fn larger_rent_cheaper(record: &Record) -> Option<Issue> {
    let one_bed = record.number(RENT_1BED)?;
    let two_bed = record.number(RENT_2BED)?;
    (two_bed < one_bed).then(|| {
        Issue::new(
            RENT_2BED,
            IssueKind::Relational,
            Severity::Medium,
            format!("2BR rent ({two_bed}) is cheaper than 1BR rent ({one_bed})"),
        )
        .with_value(two_bed)
        .with_related(&[RENT_1BED, RENT_2BED])
    })
}
