//! The summary tables behind every chart.
//!
//! All the functions here are pure: the same subset always gives the same
//! rows in the same order.

use log::debug;

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

pub use crate::config::*;

#[derive(Default)]
struct Acc {
    candidates: u64,
    reported: u64,
    cases: u64,
    assets: f64,
}

impl Acc {
    fn add(&mut self, record: &CandidateRecord, policy: MissingCasesPolicy) {
        self.candidates += 1;
        self.assets += record.total_assets;
        if let Some(n) = policy.cases(record) {
            self.reported += 1;
            self.cases += n;
        }
    }
}

/// Plain ratio of cases per reported candidate, 0 for an empty party.
fn average_cases(cases: u64, reported: u64) -> f64 {
    if reported == 0 {
        0.0
    } else {
        cases as f64 / reported as f64
    }
}

/// One row per party present in the subset, most cases first.
/// Ties are ordered by party name.
pub fn party_summary(
    subset: &[&CandidateRecord],
    policy: MissingCasesPolicy,
) -> Vec<PartySummaryRow> {
    let mut map: HashMap<&str, Acc> = HashMap::new();
    for r in subset.iter() {
        map.entry(r.party.as_str()).or_default().add(r, policy);
    }
    let mut rows: Vec<PartySummaryRow> = map
        .into_iter()
        .map(|(party, acc)| PartySummaryRow {
            party: party.to_string(),
            candidate_count: acc.candidates,
            reported_count: acc.reported,
            criminal_case_total: acc.cases,
            average_cases: average_cases(acc.cases, acc.reported),
            total_assets: acc.assets,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.criminal_case_total
            .cmp(&a.criminal_case_total)
            .then_with(|| a.party.cmp(&b.party))
    });
    debug!("party_summary: {} parties", rows.len());
    rows
}

fn metric_cmp(a: &PartySummaryRow, b: &PartySummaryRow, metric: PartyMetric) -> Ordering {
    match metric {
        PartyMetric::CriminalCases => a.criminal_case_total.cmp(&b.criminal_case_total),
        PartyMetric::Candidates => a.candidate_count.cmp(&b.candidate_count),
        PartyMetric::AverageCases => a
            .average_cases
            .partial_cmp(&b.average_cases)
            .unwrap_or(Ordering::Equal),
        PartyMetric::Assets => a
            .total_assets
            .partial_cmp(&b.total_assets)
            .unwrap_or(Ordering::Equal),
    }
}

/// The `limit` first parties by the given metric, highest first.
pub fn rank_parties(
    summary: &[PartySummaryRow],
    metric: PartyMetric,
    limit: usize,
) -> Vec<PartySummaryRow> {
    let mut rows = summary.to_vec();
    rows.sort_by(|a, b| metric_cmp(b, a, metric).then_with(|| a.party.cmp(&b.party)));
    rows.truncate(limit);
    rows
}

/// The major parties: at most `k` parties with more than `min_total` cases,
/// most cases first. Parties with equal totals keep their order in the
/// summary.
pub fn top_parties(summary: &[PartySummaryRow], k: usize, min_total: u64) -> Vec<String> {
    let mut rows: Vec<&PartySummaryRow> = summary
        .iter()
        .filter(|r| r.criminal_case_total > min_total)
        .collect();
    // sort_by is stable
    rows.sort_by(|a, b| b.criminal_case_total.cmp(&a.criminal_case_total));
    rows.iter().take(k).map(|r| r.party.clone()).collect()
}

/// One row per (constituency, party), most cases first.
pub fn constituency_summary(
    subset: &[&CandidateRecord],
    policy: MissingCasesPolicy,
) -> Vec<ConstituencySummaryRow> {
    let mut map: HashMap<(&str, &str), Acc> = HashMap::new();
    for r in subset.iter() {
        map.entry((r.constituency.as_str(), r.party.as_str()))
            .or_default()
            .add(r, policy);
    }
    let mut rows: Vec<ConstituencySummaryRow> = map
        .into_iter()
        .map(|((constituency, party), acc)| ConstituencySummaryRow {
            constituency: constituency.to_string(),
            party: party.to_string(),
            candidate_count: acc.candidates,
            criminal_case_total: acc.cases,
            total_assets: acc.assets,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.criminal_case_total
            .cmp(&a.criminal_case_total)
            .then_with(|| a.constituency.cmp(&b.constituency))
            .then_with(|| a.party.cmp(&b.party))
    });
    rows
}

// Parties of an explicit scope come in scope order, otherwise by name.
fn party_order(scope: &PartyScope, a: &str, b: &str) -> Ordering {
    match scope {
        PartyScope::All => a.cmp(b),
        PartyScope::Only(parties) => {
            let pos = |p: &str| parties.iter().position(|x| x == p);
            pos(a).cmp(&pos(b))
        }
    }
}

// The case count of a record if it belongs to a detail view.
fn detail_cases(
    record: &CandidateRecord,
    scope: &PartyScope,
    case_threshold: u64,
    policy: MissingCasesPolicy,
) -> Option<u64> {
    if !scope.contains(&record.party) {
        return None;
    }
    policy.cases(record).filter(|n| *n > case_threshold)
}

fn median(mut v: Vec<f64>) -> f64 {
    if v.is_empty() {
        return 0.0;
    }
    v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = v.len() / 2;
    if v.len() % 2 == 1 {
        v[mid]
    } else {
        (v[mid - 1] + v[mid]) / 2.0
    }
}

/// Case and asset figures per education level (and per party, depending on
/// the grouping) of the candidates in scope with more than `case_threshold`
/// cases.
pub fn education_breakdown(
    subset: &[&CandidateRecord],
    scope: &PartyScope,
    grouping: EducationGrouping,
    case_threshold: u64,
    policy: MissingCasesPolicy,
) -> Vec<EducationBreakdownRow> {
    #[derive(Default)]
    struct EduAcc {
        cases: u64,
        assets: Vec<f64>,
    }
    let mut map: HashMap<(Option<&str>, EducationBracket), EduAcc> = HashMap::new();
    for r in subset.iter() {
        let Some(cases) = detail_cases(r, scope, case_threshold, policy) else {
            continue;
        };
        let party = match grouping {
            EducationGrouping::ByPartyAndEducation => Some(r.party.as_str()),
            EducationGrouping::ByEducation => None,
        };
        let e = map.entry((party, r.education)).or_default();
        e.cases += cases;
        e.assets.push(r.total_assets);
    }

    let mut rows: Vec<EducationBreakdownRow> = map
        .into_iter()
        .map(|((party, education), acc)| {
            let min_assets = acc.assets.iter().cloned().fold(f64::INFINITY, f64::min);
            let max_assets = acc.assets.iter().cloned().fold(0.0, f64::max);
            EducationBreakdownRow {
                party: party.map(|p| p.to_string()),
                education,
                candidate_count: acc.assets.len() as u64,
                criminal_case_total: acc.cases,
                total_assets: acc.assets.iter().sum(),
                min_assets,
                median_assets: median(acc.assets),
                max_assets,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        let pa = a.party.as_deref().unwrap_or("");
        let pb = b.party.as_deref().unwrap_or("");
        party_order(scope, pa, pb).then_with(|| a.education.cmp(&b.education))
    });
    debug!("education_breakdown: {} rows", rows.len());
    rows
}

/// For each party in scope, how many candidates have exactly N cases, for
/// every N above `case_threshold`. Within a party the highest N comes first.
pub fn facet_counts(
    subset: &[&CandidateRecord],
    scope: &PartyScope,
    case_threshold: u64,
    policy: MissingCasesPolicy,
) -> Vec<FacetCountRow> {
    let mut map: HashMap<(&str, u64), u64> = HashMap::new();
    for r in subset.iter() {
        if let Some(cases) = detail_cases(r, scope, case_threshold, policy) {
            *map.entry((r.party.as_str(), cases)).or_insert(0) += 1;
        }
    }
    let mut rows: Vec<FacetCountRow> = map
        .into_iter()
        .map(|((party, criminal_cases), candidate_count)| FacetCountRow {
            party: party.to_string(),
            criminal_cases,
            candidate_count,
        })
        .collect();
    rows.sort_by(|a, b| {
        party_order(scope, &a.party, &b.party).then_with(|| b.criminal_cases.cmp(&a.criminal_cases))
    });
    rows
}

/// Headline numbers of a subset.
pub fn subset_totals(subset: &[&CandidateRecord], policy: MissingCasesPolicy) -> SubsetTotals {
    let mut acc = Acc::default();
    let mut parties: HashSet<&str> = HashSet::new();
    let mut constituencies: HashSet<&str> = HashSet::new();
    for r in subset.iter() {
        acc.add(r, policy);
        parties.insert(r.party.as_str());
        constituencies.insert(r.constituency.as_str());
    }
    SubsetTotals {
        candidate_count: acc.candidates,
        reported_count: acc.reported,
        criminal_case_total: acc.cases,
        total_assets: acc.assets,
        party_count: parties.len() as u64,
        constituency_count: constituencies.len() as u64,
    }
}
