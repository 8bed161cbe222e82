// plausible-core/src/domain/quality/convention.rs

use super::issue::{Issue, IssueKind};
use super::severity::Severity;
use crate::domain::conventions::{ConventionRegistry, FieldConvention};
use crate::domain::record::FieldValue;

pub struct ConventionValidator<'a> {
    registry: &'a ConventionRegistry,
}

impl<'a> ConventionValidator<'a> {
    pub fn new(registry: &'a ConventionRegistry) -> Self {
        Self { registry }
    }

    /// Checks one value against its registered convention. Returns zero,
    /// one or two issues: a range violation and an integer violation are
    /// independent.
    pub fn validate(&self, field_name: &str, value: &FieldValue) -> Vec<Issue> {
        let Some(convention) = self.registry.get(field_name) else {
            return Vec::new();
        };
        if value.is_blank() {
            return Vec::new();
        }
        let Some(number) = value.as_number() else {
            return Vec::new();
        };
        check_number(convention, number)
    }
}

pub fn check_number(convention: &FieldConvention, value: f64) -> Vec<Issue> {
    let mut issues = Vec::new();
    let unit = convention.unit_suffix();
    let field = convention.field_name.as_str();

    if value < convention.min {
        let severity = if value < critical_floor(convention) {
            Severity::Critical
        } else {
            Severity::High
        };
        issues.push(
            Issue::new(
                field,
                IssueKind::OutOfRange,
                severity,
                format!(
                    "Value {value}{unit} is below minimum ({}{unit})",
                    convention.min
                ),
            )
            .with_value(value),
        );
    }

    if value > convention.max {
        let severity = if value > critical_ceiling(convention) {
            Severity::Critical
        } else {
            Severity::High
        };
        issues.push(
            Issue::new(
                field,
                IssueKind::OutOfRange,
                severity,
                format!(
                    "Value {value}{unit} exceeds maximum ({}{unit})",
                    convention.max
                ),
            )
            .with_value(value),
        );
    }

    if convention.integer_required && value.fract() != 0.0 {
        issues.push(
            Issue::new(
                field,
                IssueKind::Convention,
                Severity::Medium,
                format!("Value should be an integer, got {value}"),
            )
            .with_value(value),
        );
    }

    issues
}

/// Below this a too-small value is critical: half the minimum. A minimum of
/// exactly zero halves to itself, so it falls back to half the range width
/// below the minimum.
fn critical_floor(convention: &FieldConvention) -> f64 {
    if convention.min != 0.0 {
        convention.min * 0.5
    } else {
        convention.min - (convention.max - convention.min) / 2.0
    }
}

/// Above this a too-large value is critical: double the maximum, with the
/// same range-width fallback for a maximum of zero.
fn critical_ceiling(convention: &FieldConvention) -> f64 {
    if convention.max != 0.0 {
        convention.max * 2.0
    } else {
        convention.max + (convention.max - convention.min) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conventions::ValueKind;

    fn registry() -> ConventionRegistry {
        ConventionRegistry::default()
    }

    fn severities(issues: &[Issue]) -> Vec<(IssueKind, Severity)> {
        issues.iter().map(|i| (i.kind, i.severity)).collect()
    }

    #[test]
    fn test_below_minimum_escalation() {
        let registry = registry();
        let validator = ConventionValidator::new(&registry);

        // cost_of_living_usd: min 200
        let issues = validator.validate("cost_of_living_usd", &FieldValue::from(50.0));
        assert_eq!(severities(&issues), vec![(IssueKind::OutOfRange, Severity::Critical)]);

        let issues = validator.validate("cost_of_living_usd", &FieldValue::from(150.0));
        assert_eq!(severities(&issues), vec![(IssueKind::OutOfRange, Severity::High)]);
        assert_eq!(issues[0].message, "Value 150USD is below minimum (200USD)");

        // exactly half the minimum is not below it
        let issues = validator.validate("cost_of_living_usd", &FieldValue::from(100.0));
        assert_eq!(issues[0].severity, Severity::High);
    }

    #[test]
    fn test_below_zero_minimum() {
        let registry = registry();
        let validator = ConventionValidator::new(&registry);

        // healthcare_score: 0..10
        let issues = validator.validate("healthcare_score", &FieldValue::from(-1.0));
        assert_eq!(severities(&issues), vec![(IssueKind::OutOfRange, Severity::High)]);

        let issues = validator.validate("healthcare_score", &FieldValue::from(-6.0));
        assert_eq!(severities(&issues), vec![(IssueKind::OutOfRange, Severity::Critical)]);
    }

    #[test]
    fn test_above_maximum_escalation() {
        let registry = registry();
        let validator = ConventionValidator::new(&registry);

        let issues = validator.validate("healthcare_score", &FieldValue::from(15.0));
        assert_eq!(severities(&issues), vec![(IssueKind::OutOfRange, Severity::High)]);

        let issues = validator.validate("healthcare_score", &FieldValue::from(20.0));
        assert_eq!(issues[0].severity, Severity::High);

        let issues = validator.validate("healthcare_score", &FieldValue::from(21.0));
        assert_eq!(issues[0].severity, Severity::Critical);
    }

    #[test]
    fn test_range_and_integer_violations_are_independent() {
        let registry = registry();
        let validator = ConventionValidator::new(&registry);

        let issues = validator.validate("safety_score", &FieldValue::from(12.5));
        assert_eq!(
            severities(&issues),
            vec![
                (IssueKind::OutOfRange, Severity::High),
                (IssueKind::Convention, Severity::Medium),
            ]
        );

        let issues = validator.validate("safety_score", &FieldValue::from(7.01));
        assert_eq!(severities(&issues), vec![(IssueKind::Convention, Severity::Medium)]);
    }

    #[test]
    fn test_skips_unknown_blank_and_non_numeric() {
        let registry = registry();
        let validator = ConventionValidator::new(&registry);

        assert!(validator.validate("town_name", &FieldValue::from(-5.0)).is_empty());
        assert!(validator.validate("safety_score", &FieldValue::Null).is_empty());
        assert!(validator.validate("safety_score", &FieldValue::from("")).is_empty());
        assert!(validator.validate("safety_score", &FieldValue::from("high")).is_empty());
        // numeric text is coerced
        assert_eq!(validator.validate("safety_score", &FieldValue::from("11")).len(), 1);
    }

    #[test]
    fn test_negative_minimum_is_critical_once_crossed() {
        let registry = registry();
        let validator = ConventionValidator::new(&registry);

        // avg_temp_summer: -10..50, half the minimum sits above it
        let issues = validator.validate("avg_temp_summer", &FieldValue::from(-15.0));
        assert_eq!(severities(&issues), vec![(IssueKind::OutOfRange, Severity::Critical)]);

        // elevation_meters: -100..5000
        let issues = validator.validate("elevation_meters", &FieldValue::from(-150.0));
        assert_eq!(severities(&issues), vec![(IssueKind::OutOfRange, Severity::Critical)]);
        assert_eq!(issues[0].message, "Value -150m is below minimum (-100m)");

        assert!(validator.validate("avg_temp_summer", &FieldValue::from(-10.0)).is_empty());
    }

    #[test]
    fn test_negative_maximum_doubles() {
        let convention = FieldConvention::new("depth", -500.0, -100.0, ValueKind::Elevation);
        // double the maximum is -200, so anything above -100 is past it
        assert_eq!(check_number(&convention, -50.0)[0].severity, Severity::Critical);
        assert_eq!(check_number(&convention, -600.0)[0].severity, Severity::Critical);
        assert!(check_number(&convention, -300.0).is_empty());
    }

    #[test]
    fn test_zero_maximum_uses_range_width() {
        let convention = FieldConvention::new("offset", -10.0, 0.0, ValueKind::Elevation);
        assert_eq!(check_number(&convention, 4.0)[0].severity, Severity::High);
        assert_eq!(check_number(&convention, 6.0)[0].severity, Severity::Critical);
    }
}
