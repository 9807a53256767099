// JSON summary and table previews of the dashboard reports.

use candidate_stats::{
    ConstituencySummaryRow, DashboardReport, EducationBreakdownRow, FacetCountRow,
    PartySummaryRow, ResolvedSelection, SelectionCorrection, SubsetTotals,
};
use serde_json::json;
use serde_json::Value as JSValue;
use tabled::{settings::Style, Table, Tabled};

use crate::insights::config_reader::OutputConfig;

fn selection_to_json(resolved: &ResolvedSelection) -> JSValue {
    let years: Vec<i32> = resolved.selection.years.iter().cloned().collect();
    json!({
        "region": resolved.selection.region,
        "years": years,
    })
}

fn corrections_to_json(corrections: &[SelectionCorrection]) -> Vec<JSValue> {
    corrections
        .iter()
        .map(|c| match c {
            SelectionCorrection::RegionReplaced {
                requested,
                replacement,
            } => json!({
                "kind": "regionReplaced",
                "requested": requested,
                "replacement": replacement,
            }),
            SelectionCorrection::YearsDropped { dropped } => json!({
                "kind": "yearsDropped",
                "years": dropped,
            }),
            SelectionCorrection::YearsDefaulted { requested } => json!({
                "kind": "yearsDefaulted",
                "years": requested,
            }),
        })
        .collect()
}

fn totals_to_json(totals: &SubsetTotals) -> JSValue {
    json!({
        "candidateCount": totals.candidate_count,
        "reportedCount": totals.reported_count,
        "criminalCaseTotal": totals.criminal_case_total,
        "totalAssets": totals.total_assets,
        "partyCount": totals.party_count,
        "constituencyCount": totals.constituency_count,
    })
}

fn party_row_to_json(row: &PartySummaryRow) -> JSValue {
    json!({
        "party": row.party,
        "candidateCount": row.candidate_count,
        "reportedCount": row.reported_count,
        "criminalCaseTotal": row.criminal_case_total,
        "averageCases": row.average_cases,
        "totalAssets": row.total_assets,
    })
}

// The charts only carry the plotted value.
fn chart_to_json(rows: &[PartySummaryRow], value: fn(&PartySummaryRow) -> JSValue) -> Vec<JSValue> {
    rows.iter()
        .map(|r| json!({"party": r.party, "value": value(r)}))
        .collect()
}

fn constituency_row_to_json(row: &ConstituencySummaryRow) -> JSValue {
    json!({
        "constituency": row.constituency,
        "party": row.party,
        "candidateCount": row.candidate_count,
        "criminalCaseTotal": row.criminal_case_total,
        "totalAssets": row.total_assets,
    })
}

fn education_row_to_json(row: &EducationBreakdownRow) -> JSValue {
    json!({
        "party": row.party,
        "education": row.education.label(),
        "candidateCount": row.candidate_count,
        "criminalCaseTotal": row.criminal_case_total,
        "totalAssets": row.total_assets,
        "minAssets": row.min_assets,
        "medianAssets": row.median_assets,
        "maxAssets": row.max_assets,
    })
}

fn facet_row_to_json(row: &FacetCountRow) -> JSValue {
    json!({
        "party": row.party,
        "criminalCases": row.criminal_cases,
        "candidateCount": row.candidate_count,
    })
}

pub fn report_to_json(report: &DashboardReport) -> JSValue {
    let charts = &report.party_charts;
    let by_cases = chart_to_json(&charts.by_criminal_cases, |r| json!(r.criminal_case_total));
    let by_candidates = chart_to_json(&charts.by_candidates, |r| json!(r.candidate_count));
    let by_average = chart_to_json(&charts.by_average_cases, |r| json!(r.average_cases));
    let by_assets = chart_to_json(&charts.by_assets, |r| json!(r.total_assets));
    json!({
        "selection": selection_to_json(&report.selection),
        "corrections": corrections_to_json(&report.selection.corrections),
        "yearOptions": report.selection.year_options,
        "totals": totals_to_json(&report.totals),
        "partySummary": report.party_summary.iter().map(party_row_to_json).collect::<Vec<_>>(),
        "majorParties": report.major_parties,
        "partyCharts": {
            "byCriminalCases": by_cases,
            "byCandidates": by_candidates,
            "byAverageCases": by_average,
            "byAssets": by_assets,
        },
        "constituencySummary": report
            .constituency_summary
            .iter()
            .map(constituency_row_to_json)
            .collect::<Vec<_>>(),
        "educationBreakdown": report
            .education_breakdown
            .iter()
            .map(education_row_to_json)
            .collect::<Vec<_>>(),
        "facetCounts": report.facet_counts.iter().map(facet_row_to_json).collect::<Vec<_>>(),
    })
}

pub fn build_summary_js(config: &OutputConfig, reports: &[DashboardReport]) -> JSValue {
    json!({
        "config": config,
        "results": reports.iter().map(report_to_json).collect::<Vec<_>>(),
    })
}

// ******** Previews *********

#[derive(Debug, Tabled, Clone)]
pub struct PartyPreviewRow {
    #[tabled(rename = "Party")]
    pub party: String,
    #[tabled(rename = "Candidates")]
    pub candidates: String,
    #[tabled(rename = "CriminalCases")]
    pub criminal_cases: String,
    #[tabled(rename = "AvgCases")]
    pub average_cases: String,
    #[tabled(rename = "TotalAssets")]
    pub total_assets: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct ConstituencyPreviewRow {
    #[tabled(rename = "Constituency")]
    pub constituency: String,
    #[tabled(rename = "Party")]
    pub party: String,
    #[tabled(rename = "Candidates")]
    pub candidates: String,
    #[tabled(rename = "CriminalCases")]
    pub criminal_cases: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct EducationPreviewRow {
    #[tabled(rename = "Party")]
    pub party: String,
    #[tabled(rename = "Education")]
    pub education: String,
    #[tabled(rename = "Candidates")]
    pub candidates: String,
    #[tabled(rename = "CriminalCases")]
    pub criminal_cases: String,
    #[tabled(rename = "MedianAssets")]
    pub median_assets: String,
}

fn fmt_amount(x: f64) -> String {
    format!("{:.2}", x)
}

pub fn party_preview_rows(summary: &[PartySummaryRow]) -> Vec<PartyPreviewRow> {
    summary
        .iter()
        .map(|r| PartyPreviewRow {
            party: r.party.clone(),
            candidates: r.candidate_count.to_string(),
            criminal_cases: r.criminal_case_total.to_string(),
            average_cases: fmt_amount(r.average_cases),
            total_assets: fmt_amount(r.total_assets),
        })
        .collect()
}

pub fn constituency_preview_rows(rows: &[ConstituencySummaryRow]) -> Vec<ConstituencyPreviewRow> {
    rows.iter()
        .map(|r| ConstituencyPreviewRow {
            constituency: r.constituency.clone(),
            party: r.party.clone(),
            candidates: r.candidate_count.to_string(),
            criminal_cases: r.criminal_case_total.to_string(),
        })
        .collect()
}

pub fn education_preview_rows(rows: &[EducationBreakdownRow]) -> Vec<EducationPreviewRow> {
    rows.iter()
        .map(|r| EducationPreviewRow {
            party: r.party.clone().unwrap_or_else(|| "-".to_string()),
            education: r.education.label().to_string(),
            candidates: r.candidate_count.to_string(),
            criminal_cases: r.criminal_case_total.to_string(),
            median_assets: fmt_amount(r.median_assets),
        })
        .collect()
}

pub fn render_table<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_report(report: &DashboardReport, max_rows: usize) {
    let selection = &report.selection.selection;
    println!(
        "\nRegion: {} Years: {:?} Candidates: {}",
        selection.region, selection.years, report.totals.candidate_count
    );
    println!("\nParty summary\n");
    println!("{}\n", render_table(&party_preview_rows(&report.party_summary), max_rows));
    println!("Constituency summary\n");
    println!(
        "{}\n",
        render_table(&constituency_preview_rows(&report.constituency_summary), max_rows)
    );
    println!("Education breakdown\n");
    println!(
        "{}\n",
        render_table(&education_preview_rows(&report.education_breakdown), max_rows)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use candidate_stats::{EducationBracket, Selection};
    use std::collections::BTreeSet;

    fn party(name: &str, cases: u64) -> PartySummaryRow {
        PartySummaryRow {
            party: name.to_string(),
            candidate_count: 2,
            reported_count: 2,
            criminal_case_total: cases,
            average_cases: cases as f64 / 2.0,
            total_assets: 100.0,
        }
    }

    #[test]
    fn corrections_are_tagged() {
        let js = corrections_to_json(&[
            SelectionCorrection::RegionReplaced {
                requested: Some("Atlantis".to_string()),
                replacement: "Delhi".to_string(),
            },
            SelectionCorrection::YearsDropped { dropped: vec![1999] },
        ]);
        assert_eq!(
            js,
            vec![
                json!({"kind": "regionReplaced", "requested": "Atlantis", "replacement": "Delhi"}),
                json!({"kind": "yearsDropped", "years": [1999]}),
            ]
        );
    }

    #[test]
    fn charts_carry_the_metric() {
        let rows = vec![party("PartyA", 5), party("PartyB", 3)];
        let js = chart_to_json(&rows, |r| json!(r.criminal_case_total));
        assert_eq!(
            js,
            vec![
                json!({"party": "PartyA", "value": 5}),
                json!({"party": "PartyB", "value": 3}),
            ]
        );
    }

    #[test]
    fn education_rows_without_party() {
        let row = EducationBreakdownRow {
            party: None,
            education: EducationBracket::Graduate,
            candidate_count: 1,
            criminal_case_total: 4,
            total_assets: 10.0,
            min_assets: 10.0,
            median_assets: 10.0,
            max_assets: 10.0,
        };
        let js = education_row_to_json(&row);
        assert_eq!(js["party"], JSValue::Null);
        assert_eq!(js["education"], json!("Graduate"));
        let preview = education_preview_rows(&[row]);
        assert_eq!(preview[0].party, "-");
        assert_eq!(preview[0].median_assets, "10.00");
    }

    #[test]
    fn empty_tables_render() {
        let rows: Vec<PartyPreviewRow> = Vec::new();
        assert_eq!(render_table(&rows, 10), "(no rows)");
        let table = render_table(&party_preview_rows(&[party("PartyA", 5)]), 10);
        assert!(table.contains("| PartyA"));
    }

    #[test]
    fn selection_years_are_sorted() {
        let resolved = ResolvedSelection {
            selection: Selection {
                region: "Delhi".to_string(),
                years: [2021, 2019].iter().cloned().collect::<BTreeSet<i32>>(),
            },
            year_options: vec![2019, 2021],
            corrections: vec![],
        };
        assert_eq!(
            selection_to_json(&resolved),
            json!({"region": "Delhi", "years": [2019, 2021]})
        );
    }
}
