// plausible-core/src/domain/quality/report.rs
//
// Analysis output. Built once per pass, read-only afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::issue::{Issue, IssueKind};
use super::severity::{Severity, SeverityCounts};
use super::statistics::FieldStatistics;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_records: usize,
    pub records_with_issues: usize,
    pub total_issues: usize,
    pub by_severity: SeverityCounts,
    pub by_type: BTreeMap<IssueKind, usize>,
}

impl ReportSummary {
    pub fn tally(&mut self, issues: &[Issue]) {
        if issues.is_empty() {
            return;
        }
        self.records_with_issues += 1;
        self.total_issues += issues.len();
        for issue in issues {
            self.by_severity.add(issue.severity);
            *self.by_type.entry(issue.kind).or_insert(0) += 1;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordReport {
    pub record_id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub issues: Vec<Issue>,
}

impl RecordReport {
    pub fn severity_counts(&self) -> SeverityCounts {
        let mut counts = SeverityCounts::default();
        for issue in &self.issues {
            counts.add(issue.severity);
        }
        counts
    }

    /// Descending priority key: more criticals first, then highs, mediums,
    /// lows, then more issues overall.
    pub fn priority_key(&self) -> (usize, usize, usize, usize, usize) {
        let c = self.severity_counts();
        (c.critical, c.high, c.medium, c.low, self.issues.len())
    }

    /// "Name, Region, Country" with missing parts left out.
    pub fn location_label(&self) -> String {
        location_label(
            &self.display_name,
            self.region.as_deref(),
            self.country.as_deref(),
        )
    }

    /// Copy holding only the issues matching `keep`, or `None` when nothing
    /// is left.
    pub fn retain(&self, keep: impl Fn(&Issue) -> bool) -> Option<RecordReport> {
        let issues: Vec<Issue> = self.issues.iter().filter(|i| keep(i)).cloned().collect();
        (!issues.is_empty()).then(|| RecordReport {
            record_id: self.record_id.clone(),
            display_name: self.display_name.clone(),
            country: self.country.clone(),
            region: self.region.clone(),
            issues,
        })
    }
}

/// Orders record reports by descending priority. `sort_by` is stable, so
/// ties keep their input order.
pub fn sort_by_priority(reports: &mut [RecordReport]) {
    reports.sort_by(|a, b| b.priority_key().cmp(&a.priority_key()));
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOutlier {
    pub record_id: String,
    pub display_name: String,
    pub value: f64,
    pub z_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConventionViolation {
    pub record_id: String,
    pub display_name: String,
    pub value: f64,
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldReport {
    pub stats: FieldStatistics,
    pub outliers: Vec<FieldOutlier>,
    pub convention_violations: Vec<ConventionViolation>,
}

/// An issue flattened with the record it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocatedIssue<'a> {
    pub record_id: &'a str,
    pub display_name: &'a str,
    pub country: Option<&'a str>,
    pub region: Option<&'a str>,
    #[serde(flatten)]
    pub issue: &'a Issue,
}

impl LocatedIssue<'_> {
    pub fn location_label(&self) -> String {
        location_label(self.display_name, self.region, self.country)
    }

    pub fn verification_query(&self) -> String {
        verification_query(self.display_name, &self.issue.field)
    }
}

fn location_label(name: &str, region: Option<&str>, country: Option<&str>) -> String {
    let mut parts = vec![name];
    parts.extend(region);
    parts.extend(country);
    parts.join(", ")
}

/// Dashboard-style filter. Every criterion left `None` matches everything.
#[derive(Debug, Clone, Default)]
pub struct IssueFilter {
    pub severity: Option<Severity>,
    pub kind: Option<IssueKind>,
    pub field: Option<String>,
    /// Case-insensitive substring of the record display name.
    pub search: Option<String>,
}

impl IssueFilter {
    pub fn matches(&self, issue: &Issue) -> bool {
        self.severity.is_none_or(|s| issue.severity == s)
            && self.kind.is_none_or(|k| issue.kind == k)
            && self.field.as_deref().is_none_or(|f| issue.field == f)
    }

    fn matches_name(&self, name: &str) -> bool {
        self.search
            .as_deref()
            .is_none_or(|s| name.to_lowercase().contains(&s.to_lowercase()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub summary: ReportSummary,
    pub field_stats: BTreeMap<String, FieldStatistics>,
    pub record_reports: Vec<RecordReport>,
    pub field_reports: BTreeMap<String, FieldReport>,
}

impl AnalysisReport {
    /// The `n` records with the worst issue profile.
    pub fn worst_records(&self, n: usize) -> &[RecordReport] {
        &self.record_reports[..n.min(self.record_reports.len())]
    }

    pub fn critical_issues(&self) -> Vec<LocatedIssue<'_>> {
        self.located()
            .filter(|l| l.issue.severity == Severity::Critical)
            .collect()
    }

    /// Every issue raised on `field`, most severe first.
    pub fn issues_by_field(&self, field: &str) -> Vec<LocatedIssue<'_>> {
        let mut issues: Vec<LocatedIssue<'_>> =
            self.located().filter(|l| l.issue.field == field).collect();
        issues.sort_by(|a, b| b.issue.severity.cmp(&a.issue.severity));
        issues
    }

    /// Record reports narrowed to the issues matching `filter`; records
    /// left empty are dropped. Order is preserved.
    pub fn filter(&self, filter: &IssueFilter) -> Vec<RecordReport> {
        self.record_reports
            .iter()
            .filter(|r| filter.matches_name(&r.display_name))
            .filter_map(|r| r.retain(|i| filter.matches(i)))
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn located(&self) -> impl Iterator<Item = LocatedIssue<'_>> {
        self.record_reports.iter().flat_map(|r| {
            r.issues.iter().map(move |issue| LocatedIssue {
                record_id: &r.record_id,
                display_name: &r.display_name,
                country: r.country.as_deref(),
                region: r.region.as_deref(),
                issue,
            })
        })
    }
}

/// Search string a reviewer can paste into a search engine to verify a
/// flagged value, e.g. `"Lagos avg temp winter"`.
pub fn verification_query(display_name: &str, field: &str) -> String {
    format!("{} {}", display_name.trim(), field.replace('_', " "))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn issue(field: &str, kind: IssueKind, severity: Severity) -> Issue {
        Issue::new(field, kind, severity, format!("{field} {kind}"))
    }

    fn record(id: &str, issues: Vec<Issue>) -> RecordReport {
        RecordReport {
            record_id: id.into(),
            display_name: format!("Town {id}"),
            country: Some("Portugal".into()),
            region: None,
            issues,
        }
    }

    fn report(mut records: Vec<RecordReport>) -> AnalysisReport {
        let mut summary = ReportSummary {
            total_records: records.len(),
            ..Default::default()
        };
        for r in &records {
            summary.tally(&r.issues);
        }
        sort_by_priority(&mut records);
        AnalysisReport {
            generated_at: Utc::now(),
            summary,
            field_stats: BTreeMap::new(),
            record_reports: records,
            field_reports: BTreeMap::new(),
        }
    }

    #[test]
    fn test_priority_sort_is_lexicographic_and_stable() {
        let mut reports = vec![
            record("a", vec![issue("x", IssueKind::Suspicious, Severity::Low)]),
            record(
                "b",
                vec![
                    issue("x", IssueKind::OutlierModerate, Severity::Medium),
                    issue("y", IssueKind::OutlierModerate, Severity::Medium),
                ],
            ),
            record("c", vec![issue("x", IssueKind::OutOfRange, Severity::High)]),
            record("d", vec![issue("x", IssueKind::Suspicious, Severity::Low)]),
            record("e", vec![issue("x", IssueKind::MissingCritical, Severity::Critical)]),
            record("f", vec![issue("x", IssueKind::Suspicious, Severity::Low)]),
        ];
        sort_by_priority(&mut reports);
        let order: Vec<&str> = reports.iter().map(|r| r.record_id.as_str()).collect();
        assert_eq!(order, vec!["e", "c", "b", "a", "d", "f"]);
    }

    #[test]
    fn test_total_count_breaks_ties() {
        let mut reports = vec![
            record("one", vec![issue("x", IssueKind::OutOfRange, Severity::High)]),
            record(
                "two",
                vec![
                    issue("x", IssueKind::OutOfRange, Severity::High),
                    issue("y", IssueKind::Convention, Severity::Medium),
                ],
            ),
        ];
        sort_by_priority(&mut reports);
        assert_eq!(reports[0].record_id, "two");
    }

    #[test]
    fn test_summary_tally() {
        let r = report(vec![
            record(
                "a",
                vec![
                    issue("x", IssueKind::OutOfRange, Severity::High),
                    issue("y", IssueKind::OutOfRange, Severity::Critical),
                ],
            ),
            record("b", vec![issue("x", IssueKind::Suspicious, Severity::Low)]),
        ]);
        assert_eq!(r.summary.records_with_issues, 2);
        assert_eq!(r.summary.total_issues, 3);
        assert_eq!(r.summary.by_severity.critical, 1);
        assert_eq!(r.summary.by_type[&IssueKind::OutOfRange], 2);
        assert!(!r.summary.by_type.contains_key(&IssueKind::Relational));
    }

    #[test]
    fn test_queries() {
        let r = report(vec![
            record(
                "a",
                vec![
                    issue("rent_1bed", IssueKind::Suspicious, Severity::Low),
                    issue("rent_1bed", IssueKind::OutOfRange, Severity::Critical),
                ],
            ),
            record("b", vec![issue("safety_score", IssueKind::Convention, Severity::Medium)]),
        ]);

        assert_eq!(r.worst_records(1)[0].record_id, "a");
        assert_eq!(r.worst_records(10).len(), 2);

        let critical = r.critical_issues();
        assert_eq!(critical.len(), 1);
        assert_eq!(critical[0].record_id, "a");

        let by_field = r.issues_by_field("rent_1bed");
        assert_eq!(by_field.len(), 2);
        assert_eq!(by_field[0].issue.severity, Severity::Critical);
        assert!(r.issues_by_field("humidity").is_empty());
    }

    #[test]
    fn test_filter_drops_empty_records() {
        let r = report(vec![
            record("a", vec![issue("x", IssueKind::Suspicious, Severity::Low)]),
            record("b", vec![issue("y", IssueKind::Convention, Severity::Medium)]),
        ]);

        let medium = r.filter(&IssueFilter {
            severity: Some(Severity::Medium),
            ..Default::default()
        });
        assert_eq!(medium.len(), 1);
        assert_eq!(medium[0].record_id, "b");

        let searched = r.filter(&IssueFilter {
            search: Some("TOWN A".into()),
            ..Default::default()
        });
        assert_eq!(searched.len(), 1);
        assert_eq!(searched[0].record_id, "a");

        let none = r.filter(&IssueFilter {
            kind: Some(IssueKind::Relational),
            ..Default::default()
        });
        assert!(none.is_empty());
    }

    #[test]
    fn test_labels_and_queries() {
        let mut r = record("a", vec![]);
        r.region = Some("Algarve".into());
        assert_eq!(r.location_label(), "Town a, Algarve, Portugal");
        assert_eq!(verification_query("Lagos ", "avg_temp_winter"), "Lagos avg temp winter");
    }

    #[test]
    fn test_located_issue_carries_record_context() {
        let mut a = record("a", vec![issue("avg_temp_winter", IssueKind::Relational, Severity::Critical)]);
        a.region = Some("Algarve".into());
        let mut b = record("b", vec![issue("avg_temp_winter", IssueKind::OutOfRange, Severity::High)]);
        b.country = None;
        let r = report(vec![a, b]);

        let critical = r.critical_issues();
        assert_eq!(critical[0].location_label(), "Town a, Algarve, Portugal");
        assert_eq!(critical[0].verification_query(), "Town a avg temp winter");

        let by_field = r.issues_by_field("avg_temp_winter");
        assert_eq!(by_field[1].location_label(), "Town b");
    }

    #[test]
    fn test_report_serializes_to_json() -> anyhow::Result<()> {
        let r = report(vec![record("a", vec![issue("x", IssueKind::OutOfRange, Severity::High)])]);
        let json: serde_json::Value = serde_json::from_str(&r.to_json()?)?;
        assert_eq!(json["summary"]["by_severity"]["high"], 1);
        assert_eq!(json["summary"]["by_type"]["out_of_range"], 1);
        assert_eq!(json["record_reports"][0]["issues"][0]["kind"], "out_of_range");
        Ok(())
    }
}
