// plausible-core/src/application/analyzer.rs
//
// USE CASE: one analysis pass over a dataset snapshot.
// Pure and synchronous: same records in, same report out.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, instrument};

use crate::domain::conventions::ConventionRegistry;
use crate::domain::error::DomainError;
use crate::domain::project::AnalysisConfig;
use crate::domain::quality::{
    AnalysisReport, ConventionValidator, ConventionViolation, FieldOutlier, FieldReport,
    FieldStatistics, Issue, IssueKind, OutlierDetector, RecordReport, RelationalChecker,
    ReportSummary, Severity, SiblingPair, SuspiciousPatternDetector, sort_by_priority,
};
use crate::domain::record::Record;

pub struct DataQualityAnalyzer {
    registry: ConventionRegistry,
    outliers: OutlierDetector,
    relational: RelationalChecker,
    siblings: Vec<SiblingPair>,
    required_fields: Vec<String>,
    name_field: String,
}

impl DataQualityAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Result<Self, DomainError> {
        Ok(Self::with_registry(config.registry()?, config))
    }

    pub fn with_registry(registry: ConventionRegistry, config: &AnalysisConfig) -> Self {
        Self {
            registry,
            outliers: OutlierDetector::new(config.outliers),
            relational: RelationalChecker::default(),
            siblings: config.sibling_pairs.clone(),
            required_fields: config.required_fields.clone(),
            name_field: config.name_field.clone(),
        }
    }

    pub fn registry(&self) -> &ConventionRegistry {
        &self.registry
    }

    pub fn analyze(&self, records: &[Record]) -> AnalysisReport {
        self.analyze_at(records, Utc::now())
    }

    /// Same as [`analyze`](Self::analyze) with a fixed timestamp, so two
    /// passes over the same snapshot compare equal.
    #[instrument(skip_all, fields(records = records.len()))]
    pub fn analyze_at(&self, records: &[Record], generated_at: DateTime<Utc>) -> AnalysisReport {
        // 1. Statistics, once per registered field
        let stats: HashMap<&str, FieldStatistics> = self
            .registry
            .field_names()
            .map(|field| (field, FieldStatistics::compute(records, field)))
            .collect();

        let mut field_reports: BTreeMap<String, FieldReport> = stats
            .iter()
            .map(|(field, s)| {
                (
                    field.to_string(),
                    FieldReport {
                        stats: s.rounded(),
                        outliers: Vec::new(),
                        convention_violations: Vec::new(),
                    },
                )
            })
            .collect();

        let mut summary = ReportSummary {
            total_records: records.len(),
            ..Default::default()
        };
        let mut record_reports = Vec::new();

        // 2. Per-record checks
        for record in records {
            let issues = self.check_record(record, &stats, &mut field_reports);
            summary.tally(&issues);
            if !issues.is_empty() {
                record_reports.push(RecordReport {
                    record_id: record.id.clone(),
                    display_name: record.display_name.clone(),
                    country: record.text("country").map(str::to_string),
                    region: record.text("region").map(str::to_string),
                    issues,
                });
            }
        }

        // 3. Worst first
        sort_by_priority(&mut record_reports);

        for (rank, report) in record_reports.iter().take(10).enumerate() {
            let c = report.severity_counts();
            debug!(
                "  {}. {}: {}C, {}H, {}M, {}L (total: {})",
                rank + 1,
                report.display_name,
                c.critical,
                c.high,
                c.medium,
                c.low,
                report.issues.len()
            );
        }
        info!(
            total = summary.total_records,
            with_issues = summary.records_with_issues,
            issues = summary.total_issues,
            critical = summary.by_severity.critical,
            "Analysis pass finished"
        );

        AnalysisReport {
            generated_at,
            summary,
            field_stats: field_reports
                .iter()
                .map(|(field, r)| (field.clone(), r.stats.clone()))
                .collect(),
            record_reports,
            field_reports,
        }
    }

    fn check_record(
        &self,
        record: &Record,
        stats: &HashMap<&str, FieldStatistics>,
        field_reports: &mut BTreeMap<String, FieldReport>,
    ) -> Vec<Issue> {
        let validator = ConventionValidator::new(&self.registry);
        let suspicious = SuspiciousPatternDetector::new(&self.registry, &self.siblings);
        let mut issues = Vec::new();

        for convention in self.registry.iter() {
            let field = convention.field_name.as_str();
            let Some(value) = record.present(field) else {
                continue;
            };
            let Some(number) = value.as_number() else {
                debug!(
                    record = %record.id,
                    field,
                    value_type = value.type_name(),
                    "Skipping non-numeric value"
                );
                continue;
            };
            let field_report = field_reports.get_mut(field);

            let violations = validator.validate(field, value);
            let outlier = stats.get(field).and_then(|s| {
                self.outliers
                    .classify(field, number, s, convention.unit.as_deref())
            });

            if let Some(field_report) = field_report {
                field_report
                    .convention_violations
                    .extend(violations.iter().map(|issue| ConventionViolation {
                        record_id: record.id.clone(),
                        display_name: record.display_name.clone(),
                        value: number,
                        kind: issue.kind,
                        severity: issue.severity,
                        message: issue.message.clone(),
                    }));
                if let Some((_, z_score)) = &outlier {
                    field_report.outliers.push(FieldOutlier {
                        record_id: record.id.clone(),
                        display_name: record.display_name.clone(),
                        value: number,
                        z_score: *z_score,
                    });
                }
            }

            issues.extend(violations);
            issues.extend(outlier.map(|(issue, _)| issue));
            issues.extend(suspicious.detect(record, field, value));
        }

        issues.extend(self.relational.check(record));

        for field in &self.required_fields {
            if !self.has_required(record, field) {
                issues.push(Issue::new(
                    field.as_str(),
                    IssueKind::MissingCritical,
                    Severity::Critical,
                    format!("Missing critical field: {field}"),
                ));
            }
        }

        issues
    }

    fn has_required(&self, record: &Record, field: &str) -> bool {
        if record.present(field).is_some() {
            return true;
        }
        field == self.name_field && !record.display_name.trim().is_empty()
    }
}

impl Default for DataQualityAnalyzer {
    fn default() -> Self {
        Self::with_registry(ConventionRegistry::default(), &AnalysisConfig::default())
    }
}
