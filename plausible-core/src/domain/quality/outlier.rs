// plausible-core/src/domain/quality/outlier.rs

use serde::{Deserialize, Serialize};

use super::issue::{Issue, IssueKind};
use super::severity::Severity;
use super::statistics::{FieldStatistics, round2};

/// z-score cut-offs. Both comparisons are strict: a value sitting exactly
/// on a threshold is not flagged at that level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierThresholds {
    #[serde(default = "default_moderate")]
    pub moderate: f64,
    #[serde(default = "default_extreme")]
    pub extreme: f64,
}

fn default_moderate() -> f64 {
    2.0
}

fn default_extreme() -> f64 {
    3.0
}

impl Default for OutlierThresholds {
    fn default() -> Self {
        Self {
            moderate: default_moderate(),
            extreme: default_extreme(),
        }
    }
}

pub struct OutlierDetector {
    thresholds: OutlierThresholds,
}

impl OutlierDetector {
    pub fn new(thresholds: OutlierThresholds) -> Self {
        Self { thresholds }
    }

    /// `|value - mean| / std_dev`, or `None` when the distribution cannot
    /// produce outliers (no data, or every value identical).
    pub fn z_score(value: f64, stats: &FieldStatistics) -> Option<f64> {
        let (mean, std_dev) = stats.mean.zip(stats.std_dev)?;
        if std_dev <= 1e-9 {
            return None;
        }
        Some(((value - mean) / std_dev).abs())
    }

    pub fn classify(
        &self,
        field: &str,
        value: f64,
        stats: &FieldStatistics,
        unit: Option<&str>,
    ) -> Option<(Issue, f64)> {
        let z = Self::z_score(value, stats)?;

        let (kind, severity) = if z > self.thresholds.extreme {
            (IssueKind::OutlierExtreme, Severity::High)
        } else if z > self.thresholds.moderate {
            (IssueKind::OutlierModerate, Severity::Medium)
        } else {
            return None;
        };

        let mean = stats.mean.map(round2).unwrap_or_default();
        let std_dev = stats.std_dev.map(round2).unwrap_or_default();
        let message = format!(
            "Statistical outlier: {}{} (mean: {}, σ: {}, z: {:.2})",
            value,
            unit.unwrap_or(""),
            mean,
            std_dev,
            z
        );

        Some((Issue::new(field, kind, severity, message).with_value(value), z))
    }
}

impl Default for OutlierDetector {
    fn default() -> Self {
        Self::new(OutlierThresholds::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn stats(mean: f64, std_dev: f64) -> FieldStatistics {
        FieldStatistics {
            field_name: "rent_1bed".into(),
            count: 50,
            min: Some(0.0),
            max: Some(1000.0),
            mean: Some(mean),
            median: Some(mean),
            std_dev: Some(std_dev),
        }
    }

    #[test]
    fn test_extreme_boundary_is_strict() {
        let detector = OutlierDetector::default();
        let s = stats(100.0, 10.0);

        // z = 3.0 exactly: moderate, not extreme
        let (issue, z) = detector.classify("rent_1bed", 130.0, &s, None).unwrap();
        assert_eq!(issue.kind, IssueKind::OutlierModerate);
        assert_eq!(issue.severity, Severity::Medium);
        assert!((z - 3.0).abs() < 1e-9);

        let (issue, _) = detector.classify("rent_1bed", 131.0, &s, None).unwrap();
        assert_eq!(issue.kind, IssueKind::OutlierExtreme);
        assert_eq!(issue.severity, Severity::High);
    }

    #[test]
    fn test_moderate_boundary_is_strict() {
        let detector = OutlierDetector::default();
        let s = stats(100.0, 10.0);
        assert!(detector.classify("rent_1bed", 120.0, &s, None).is_none());
        assert!(detector.classify("rent_1bed", 79.0, &s, None).is_some());
        assert!(detector.classify("rent_1bed", 100.0, &s, None).is_none());
    }

    #[test]
    fn test_message_embeds_context() {
        let detector = OutlierDetector::default();
        let (issue, _) = detector
            .classify("rent_1bed", 4000.0, &stats(800.0, 300.0), Some("USD"))
            .unwrap();
        assert!(issue.message.contains("4000USD"));
        assert!(issue.message.contains("mean: 800"));
        assert!(issue.message.contains("σ: 300"));
        assert_eq!(issue.value, Some(4000.0));
    }

    #[test]
    fn test_cannot_determine_without_spread() {
        let detector = OutlierDetector::default();
        assert!(detector.classify("x", 5.0, &stats(1.0, 0.0), None).is_none());
        assert!(
            detector
                .classify("x", 5.0, &FieldStatistics::no_data("x"), None)
                .is_none()
        );
    }

    #[test]
    fn test_custom_thresholds() {
        let detector = OutlierDetector::new(OutlierThresholds {
            moderate: 1.0,
            extreme: 1.5,
        });
        let (issue, _) = detector.classify("x", 116.0, &stats(100.0, 10.0), None).unwrap();
        assert_eq!(issue.kind, IssueKind::OutlierExtreme);
    }
}
