mod config;
use log::{debug, info};

pub mod aggregates;
pub mod builder;
pub mod filters;
pub mod manual;

pub use crate::aggregates::*;
pub use crate::config::*;
pub use crate::filters::*;

/// Runs one full dashboard pass for the given request.
///
/// Arguments:
/// * `dataset` the loaded candidate table
/// * `request` the requested region, years and view toggles. Invalid regions
/// or years are corrected, never rejected.
/// * `rules` the thresholds and policies of this dashboard
///
/// The major parties are computed once and the same list scopes every view
/// that is restricted to major parties.
pub fn run_dashboard(
    dataset: &Dataset,
    request: &DashboardRequest,
    rules: &DashboardRules,
) -> DashboardReport {
    info!(
        "Processing {:?} records, request: {:?}, rules: {:?}",
        dataset.len(),
        request,
        rules
    );

    let resolved = resolve_selection(dataset, request.region.as_deref(), &request.years);
    let subset = filter_records(
        dataset,
        &resolved.selection.region,
        &resolved.selection.years,
    );
    info!(
        "run_dashboard: selection {:?}: {} records",
        resolved.selection,
        subset.len()
    );

    let policy = rules.missing_cases;
    let summary = party_summary(&subset, policy);
    let major_parties = top_parties(
        &summary,
        rules.major_party_count,
        rules.major_party_min_total,
    );
    debug!("run_dashboard: major parties: {:?}", major_parties);

    let scope = match request.party_scope {
        PartyScopeToggle::AllParties => PartyScope::All,
        PartyScopeToggle::MajorParties => PartyScope::Only(major_parties.clone()),
    };

    let limit = rules.party_chart_limit;
    let party_charts = PartyCharts {
        by_criminal_cases: rank_parties(&summary, PartyMetric::CriminalCases, limit),
        by_candidates: rank_parties(&summary, PartyMetric::Candidates, limit),
        by_average_cases: rank_parties(&summary, PartyMetric::AverageCases, limit),
        by_assets: rank_parties(&summary, PartyMetric::Assets, limit),
    };

    DashboardReport {
        totals: subset_totals(&subset, policy),
        constituency_summary: constituency_summary(&subset, policy),
        education_breakdown: education_breakdown(
            &subset,
            &scope,
            request.education_grouping,
            rules.case_threshold,
            policy,
        ),
        facet_counts: facet_counts(&subset, &scope, rules.case_threshold, policy),
        party_charts,
        party_summary: summary,
        major_parties,
        selection: resolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use std::collections::BTreeSet;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    // Three candidates over two years of the same region.
    fn scenario() -> Dataset {
        let mut b = Builder::new();
        b.add_record_simple("RegionA", 2020, "X", "PartyA", Some(2), 100.0)
            .unwrap();
        b.add_record_simple("RegionA", 2020, "Y", "PartyA", Some(0), 50.0)
            .unwrap();
        b.add_record_simple("RegionA", 2021, "X", "PartyB", Some(5), 200.0)
            .unwrap();
        b.build().unwrap()
    }

    fn request(region: &str, years: &[i32]) -> DashboardRequest {
        DashboardRequest {
            region: Some(region.to_string()),
            years: years.to_vec(),
            party_scope: PartyScopeToggle::MajorParties,
            education_grouping: EducationGrouping::ByPartyAndEducation,
        }
    }

    #[test]
    fn end_to_end_single_year() {
        init();
        let ds = scenario();
        assert_eq!(list_years(&ds, "RegionA"), vec![2020, 2021]);

        let years: BTreeSet<i32> = [2020].iter().cloned().collect();
        let subset = filter_records(&ds, "RegionA", &years);
        assert_eq!(subset.len(), 2);

        let report = run_dashboard(
            &ds,
            &request("RegionA", &[2020]),
            &DashboardRules::DEFAULT_RULES,
        );
        assert_eq!(
            report.party_summary,
            vec![PartySummaryRow {
                party: "PartyA".to_string(),
                candidate_count: 2,
                reported_count: 2,
                criminal_case_total: 2,
                average_cases: 1.0,
                total_assets: 150.0,
            }]
        );
    }

    #[test]
    fn end_to_end_two_years() {
        init();
        let ds = scenario();
        let report = run_dashboard(
            &ds,
            &request("RegionA", &[2020, 2021]),
            &DashboardRules::DEFAULT_RULES,
        );
        let s = &report.party_summary;
        assert_eq!(s.len(), 2);
        assert_eq!(s[0].party, "PartyB");
        assert_eq!(s[0].criminal_case_total, 5);
        assert_eq!(s[0].candidate_count, 1);
        assert_eq!(s[0].average_cases, 5.0);
        assert_eq!(s[1].party, "PartyA");
        assert_eq!(s[1].criminal_case_total, 2);
        assert_eq!(s[1].candidate_count, 2);
        assert_eq!(s[1].average_cases, 1.0);
        assert_eq!(report.major_parties, vec!["PartyB", "PartyA"]);
        // Only PartyB has a candidate above 3 cases.
        assert_eq!(
            report.facet_counts,
            vec![FacetCountRow {
                party: "PartyB".to_string(),
                criminal_cases: 5,
                candidate_count: 1
            }]
        );
        assert!(report.selection.corrections.is_empty());
    }

    #[test]
    fn empty_region_scenario() {
        init();
        let ds = scenario();
        assert!(list_years(&ds, "RegionZ").is_empty());
        assert!(filter_records(&ds, "RegionA", &BTreeSet::new()).is_empty());
        assert!(party_summary(&[], MissingCasesPolicy::TreatAsZero).is_empty());

        let report = run_dashboard(
            &Dataset::default(),
            &request("RegionZ", &[2020]),
            &DashboardRules::DEFAULT_RULES,
        );
        assert!(report.party_summary.is_empty());
        assert!(report.major_parties.is_empty());
        assert!(report.party_charts.by_assets.is_empty());
        assert!(report.facet_counts.is_empty());
        assert_eq!(report.totals.candidate_count, 0);
    }

    #[test]
    fn default_selection_is_latest_year() {
        init();
        let ds = scenario();
        let report = run_dashboard(&ds, &request("RegionA", &[]), &DashboardRules::DEFAULT_RULES);
        let expected: BTreeSet<i32> = [2021].iter().cloned().collect();
        assert_eq!(report.selection.selection.years, expected);
        assert_eq!(report.totals.candidate_count, 1);
    }

    #[test]
    fn major_parties_scope_every_detail_view() {
        init();
        let mut b = Builder::new();
        for idx in 0..8u64 {
            for cases in [4, 5 + idx] {
                b.add_record(&CandidateRecord {
                    region: "R".to_string(),
                    year: 2019,
                    constituency: format!("C{}", idx),
                    party: format!("P{}", idx),
                    criminal_cases: Some(cases),
                    total_assets: 10.0,
                    education: EducationBracket::Graduate,
                })
                .unwrap();
            }
        }
        let ds = b.build().unwrap();
        let report = run_dashboard(&ds, &request("R", &[2019]), &DashboardRules::DEFAULT_RULES);
        assert_eq!(report.major_parties.len(), 6);
        assert_eq!(report.major_parties[0], "P7");
        for row in report.facet_counts.iter() {
            assert!(report.major_parties.contains(&row.party));
        }
        for row in report.education_breakdown.iter() {
            let party = row.party.clone().unwrap();
            assert!(report.major_parties.contains(&party));
        }
        let facet_parties: Vec<String> = report
            .facet_counts
            .iter()
            .map(|r| r.party.clone())
            .fold(Vec::new(), |mut acc, p| {
                if acc.last() != Some(&p) {
                    acc.push(p);
                }
                acc
            });
        assert_eq!(facet_parties, report.major_parties);
    }

    #[test]
    fn all_parties_toggle() {
        init();
        let ds = scenario();
        let mut req = request("RegionA", &[2020, 2021]);
        req.party_scope = PartyScopeToggle::AllParties;
        req.education_grouping = EducationGrouping::ByEducation;
        let rules = DashboardRules {
            case_threshold: 0,
            ..DashboardRules::DEFAULT_RULES
        };
        let report = run_dashboard(&ds, &req, &rules);
        assert_eq!(report.facet_counts.len(), 2);
        assert_eq!(report.education_breakdown.len(), 1);
        assert_eq!(report.education_breakdown[0].candidate_count, 2);
        assert_eq!(report.education_breakdown[0].party, None);
    }

    #[test]
    fn passes_are_reproducible() {
        let ds = scenario();
        let req = request("RegionA", &[2020, 2021]);
        let first = run_dashboard(&ds, &req, &DashboardRules::DEFAULT_RULES);
        let second = run_dashboard(&ds, &req, &DashboardRules::DEFAULT_RULES);
        assert_eq!(first, second);
    }
}
