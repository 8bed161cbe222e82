// plausible-core/src/infrastructure/adapters/json_source.rs

use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tracing::{info, instrument, warn};

use crate::domain::project::AnalysisConfig;
use crate::domain::record::{FieldValue, Record};
use crate::error::PlausibleError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::records::RecordSource;

/// Reads a snapshot exported as a JSON array of flat objects.
pub struct JsonRecordSource {
    path: PathBuf,
}

impl JsonRecordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn parse(content: &str, config: &AnalysisConfig) -> Result<Vec<Record>, InfrastructureError> {
        let Value::Array(items) = serde_json::from_str::<Value>(content)? else {
            return Err(InfrastructureError::RecordSource(
                "top-level value is not an array".into(),
            ));
        };

        items
            .into_iter()
            .enumerate()
            .map(|(position, item)| record_from_json(position, item, config))
            .collect()
    }
}

impl RecordSource for JsonRecordSource {
    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn load(&self, config: &AnalysisConfig) -> Result<Vec<Record>, PlausibleError> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            InfrastructureError::RecordSource(format!("cannot read {}: {e}", self.path.display()))
        })?;
        let records = Self::parse(&content, config)?;
        info!(count = records.len(), "Records loaded");
        Ok(records)
    }
}

fn record_from_json(
    position: usize,
    item: Value,
    config: &AnalysisConfig,
) -> Result<Record, InfrastructureError> {
    let Value::Object(object) = item else {
        return Err(InfrastructureError::RecordSource(format!(
            "item {position} is not an object"
        )));
    };

    let id = match object.get(&config.id_field) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => {
            return Err(InfrastructureError::RecordSource(format!(
                "item {position} has no usable '{}'",
                config.id_field
            )));
        }
    };
    let display_name = object
        .get(&config.name_field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let mut record = Record::new(id, display_name);
    for (name, value) in object {
        match field_value(value) {
            Some(value) => {
                record.fields.insert(name, value);
            }
            None => warn!(record = %record.id, field = %name, "Skipping nested object"),
        }
    }
    Ok(record)
}

/// `None` for values that have no flat representation.
fn field_value(value: Value) -> Option<FieldValue> {
    match value {
        Value::Null => Some(FieldValue::Null),
        Value::Bool(b) => Some(FieldValue::Bool(b)),
        Value::Number(n) => n.as_f64().map(FieldValue::Number),
        Value::String(s) => Some(FieldValue::String(s)),
        Value::Array(items) => Some(FieldValue::StringList(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    Value::Number(n) => Some(n.to_string()),
                    Value::Bool(b) => Some(b.to_string()),
                    _ => None,
                })
                .collect(),
        )),
        Value::Object(_) => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    const TOWNS: &str = r#"[
        {"id": "t1", "town_name": "Lagos", "country": "Portugal", "rent_1bed": 950,
         "geographic_features_actual": ["coastal", "historic"], "water_bodies": "Atlantic Ocean",
         "photos": {"hero": "lagos.jpg"}, "verified": true, "region": null},
        {"id": 17, "town_name": "Tavira", "healthcare_score": "8"}
    ]"#;

    #[test]
    fn test_parse_maps_identity_and_fields() -> Result<()> {
        let records = JsonRecordSource::parse(TOWNS, &AnalysisConfig::default())?;
        assert_eq!(records.len(), 2);

        let lagos = &records[0];
        assert_eq!(lagos.id, "t1");
        assert_eq!(lagos.display_name, "Lagos");
        assert_eq!(lagos.number("rent_1bed"), Some(950.0));
        assert_eq!(lagos.list_contains("geographic_features_actual", "coastal"), Some(true));
        assert_eq!(lagos.string_list("water_bodies"), Some(vec!["Atlantic Ocean"]));
        assert_eq!(lagos.get("verified"), Some(&FieldValue::Bool(true)));
        assert!(lagos.present("region").is_none());
        assert!(lagos.get("photos").is_none());

        assert_eq!(records[1].id, "17");
        assert_eq!(records[1].number("healthcare_score"), Some(8.0));
        Ok(())
    }

    #[test]
    fn test_custom_identity_fields() -> Result<()> {
        let config = AnalysisConfig {
            id_field: "uuid".into(),
            name_field: "name".into(),
            ..AnalysisConfig::default()
        };
        let records = JsonRecordSource::parse(r#"[{"uuid": "a-1", "name": "Évora"}]"#, &config)?;
        assert_eq!(records[0].id, "a-1");
        assert_eq!(records[0].display_name, "Évora");
        Ok(())
    }

    #[test]
    fn test_rejects_bad_shapes() {
        let config = AnalysisConfig::default();
        assert!(JsonRecordSource::parse(r#"{"id": "t1"}"#, &config).is_err());
        assert!(JsonRecordSource::parse(r#"[42]"#, &config).is_err());
        assert!(JsonRecordSource::parse(r#"[{"town_name": "No id"}]"#, &config).is_err());
        assert!(matches!(
            JsonRecordSource::parse("[{", &config),
            Err(InfrastructureError::JsonError(_))
        ));
    }

    #[test]
    fn test_load_from_disk() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("towns.json");
        fs::write(&path, TOWNS)?;

        let records = JsonRecordSource::new(&path).load(&AnalysisConfig::default())?;
        assert_eq!(records.len(), 2);

        let missing = JsonRecordSource::new(dir.path().join("nope.json"));
        assert!(missing.load(&AnalysisConfig::default()).is_err());
        Ok(())
    }
}
