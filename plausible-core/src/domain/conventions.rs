// plausible-core/src/domain/conventions.rs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::{Validate, ValidationError};

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Temperature,
    Score,
    Percentage,
    Cost,
    Distance,
    Rainfall,
    Sunshine,
    Elevation,
    Coordinate,
    Population,
}

/// Plausible range and numeric shape of one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_bounds"))]
pub struct FieldConvention {
    #[validate(length(min = 1, message = "Field name cannot be empty"))]
    pub field_name: String,
    pub min: f64,
    pub max: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub value_kind: ValueKind,
    #[serde(default)]
    pub integer_required: bool,
}

fn validate_bounds(convention: &FieldConvention) -> Result<(), ValidationError> {
    if convention.min.is_finite() && convention.max.is_finite() && convention.min <= convention.max
    {
        Ok(())
    } else {
        Err(ValidationError::new("bounds"))
    }
}

impl FieldConvention {
    pub fn new(field_name: &str, min: f64, max: f64, value_kind: ValueKind) -> Self {
        Self {
            field_name: field_name.to_string(),
            min,
            max,
            unit: None,
            value_kind,
            integer_required: false,
        }
    }

    pub fn unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    pub fn integer(mut self) -> Self {
        self.integer_required = true;
        self
    }

    /// Unit suffix for messages, empty when the field has none.
    pub fn unit_suffix(&self) -> &str {
        self.unit.as_deref().unwrap_or("")
    }
}

/// Static table of per-field conventions. Iteration follows insertion
/// order, which is also the order fields are analysed in.
#[derive(Debug, Clone)]
pub struct ConventionRegistry {
    conventions: Vec<FieldConvention>,
    index: HashMap<String, usize>,
}

impl ConventionRegistry {
    pub fn empty() -> Self {
        Self {
            conventions: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn get(&self, field_name: &str) -> Option<&FieldConvention> {
        self.index.get(field_name).map(|&i| &self.conventions[i])
    }

    /// Adds a convention, replacing any existing one for the same field
    /// (keeping its position).
    pub fn insert(&mut self, convention: FieldConvention) -> Result<(), DomainError> {
        convention.validate().map_err(|e| {
            DomainError::InvalidConvention(format!("{}: {}", convention.field_name, e))
        })?;

        match self.index.get(&convention.field_name) {
            Some(&i) => self.conventions[i] = convention,
            None => {
                self.index
                    .insert(convention.field_name.clone(), self.conventions.len());
                self.conventions.push(convention);
            }
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldConvention> {
        self.conventions.iter()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.conventions.iter().map(|c| c.field_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.conventions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conventions.is_empty()
    }
}

impl Default for ConventionRegistry {
    fn default() -> Self {
        use ValueKind::*;

        let table = [
            // Temperature (Celsius)
            FieldConvention::new("avg_temp_summer", -10.0, 50.0, Temperature).unit("°C"),
            FieldConvention::new("avg_temp_winter", -40.0, 40.0, Temperature).unit("°C"),
            FieldConvention::new("avg_temp_spring", -20.0, 40.0, Temperature).unit("°C"),
            FieldConvention::new("avg_temp_fall", -20.0, 40.0, Temperature).unit("°C"),
            // Scores (0-10)
            FieldConvention::new("healthcare_score", 0.0, 10.0, Score).integer(),
            FieldConvention::new("safety_score", 0.0, 10.0, Score).integer(),
            FieldConvention::new("walkability", 0.0, 10.0, Score).integer(),
            FieldConvention::new("expat_rating", 0.0, 10.0, Score).integer(),
            // English proficiency is a 0-100 percentage, not a 0-10 score
            FieldConvention::new("english_proficiency", 0.0, 100.0, Percentage).integer(),
            // Costs (USD)
            FieldConvention::new("cost_of_living_usd", 200.0, 10000.0, Cost).unit("USD"),
            FieldConvention::new("typical_monthly_living_cost", 200.0, 10000.0, Cost).unit("USD"),
            FieldConvention::new("rent_1bed", 100.0, 5000.0, Cost).unit("USD"),
            FieldConvention::new("rent_2bed", 150.0, 8000.0, Cost).unit("USD"),
            // Distances
            FieldConvention::new("distance_to_ocean_km", 0.0, 5000.0, Distance).unit("km"),
            FieldConvention::new("airport_distance", 0.0, 500.0, Distance).unit("km"),
            // Weather
            FieldConvention::new("annual_rainfall", 0.0, 12000.0, Rainfall).unit("mm"),
            FieldConvention::new("sunshine_hours", 800.0, 4000.0, Sunshine).unit("hours/year"),
            FieldConvention::new("humidity", 0.0, 100.0, Percentage).unit("%"),
            // Geography
            FieldConvention::new("elevation_meters", -100.0, 5000.0, Elevation).unit("m"),
            FieldConvention::new("latitude", -90.0, 90.0, Coordinate),
            FieldConvention::new("longitude", -180.0, 180.0, Coordinate),
            FieldConvention::new("population", 0.0, 50_000_000.0, Population),
        ];

        let mut registry = Self::empty();
        for convention in table {
            registry.index.insert(convention.field_name.clone(), registry.conventions.len());
            registry.conventions.push(convention);
        }
        registry
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_lookup() {
        let registry = ConventionRegistry::default();
        assert_eq!(registry.len(), 22);

        let score = registry.get("healthcare_score").unwrap();
        assert_eq!(score.value_kind, ValueKind::Score);
        assert!(score.integer_required);
        assert_eq!((score.min, score.max), (0.0, 10.0));

        let elevation = registry.get("elevation_meters").unwrap();
        assert_eq!(elevation.unit.as_deref(), Some("m"));

        assert!(registry.get("town_name").is_none());
    }

    #[test]
    fn test_iteration_keeps_table_order() {
        let registry = ConventionRegistry::default();
        let names: Vec<&str> = registry.field_names().take(2).collect();
        assert_eq!(names, vec!["avg_temp_summer", "avg_temp_winter"]);
    }

    #[test]
    fn test_insert_overrides_in_place() -> anyhow::Result<()> {
        let mut registry = ConventionRegistry::default();
        registry.insert(FieldConvention::new("avg_temp_summer", -20.0, 55.0, ValueKind::Temperature))?;
        registry.insert(FieldConvention::new("train_station_distance", 0.0, 300.0, ValueKind::Distance))?;

        assert_eq!(registry.len(), 23);
        assert_eq!(registry.get("avg_temp_summer").unwrap().max, 55.0);
        assert_eq!(registry.field_names().next(), Some("avg_temp_summer"));
        Ok(())
    }

    #[test]
    fn test_insert_rejects_inverted_bounds() {
        let mut registry = ConventionRegistry::empty();
        let res = registry.insert(FieldConvention::new("humidity", 100.0, 0.0, ValueKind::Percentage));
        assert!(matches!(res, Err(DomainError::InvalidConvention(_))));

        let res = registry.insert(FieldConvention::new("", 0.0, 1.0, ValueKind::Percentage));
        assert!(res.is_err());
        assert!(registry.is_empty());
    }
}
