use crate::insights::*;

use candidate_stats::{
    DashboardRequest, DashboardRules, EducationGrouping, MissingCasesPolicy, PartyScopeToggle,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "dashboardName")]
    pub dashboard_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dashboard: String,
    #[serde(rename = "majorPartyCount")]
    pub major_party_count: usize,
    #[serde(rename = "majorPartyMinTotal")]
    pub major_party_min_total: u64,
    #[serde(rename = "caseThreshold")]
    pub case_threshold: u64,
    #[serde(rename = "partyChartLimit")]
    pub party_chart_limit: usize,
    #[serde(rename = "missingCasesPolicy")]
    pub missing_cases_policy: String,
}

/// Names of the columns (or JSON keys) holding each field.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnNames {
    pub region: Option<String>,
    pub year: Option<String>,
    pub constituency: Option<String>,
    pub party: Option<String>,
    #[serde(rename = "criminalCases")]
    pub criminal_cases: Option<String>,
    #[serde(rename = "totalAssets")]
    pub total_assets: Option<String>,
    pub education: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DataSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    pub columns: Option<ColumnNames>,
}

impl DataSource {
    /// The column names in field order: region, year, constituency, party,
    /// criminal cases, total assets, education.
    pub fn column_names(&self) -> [String; 7] {
        let c = self.columns.clone().unwrap_or_default();
        [
            c.region.unwrap_or_else(|| "State".to_string()),
            c.year.unwrap_or_else(|| "Year".to_string()),
            c.constituency.unwrap_or_else(|| "Constituency".to_string()),
            c.party.unwrap_or_else(|| "Party".to_string()),
            c.criminal_cases.unwrap_or_else(|| "Criminal_Case".to_string()),
            c.total_assets.unwrap_or_else(|| "Total_Assets".to_string()),
            c.education.unwrap_or_else(|| "Education".to_string()),
        ]
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(rename = "majorPartyCount")]
    pub major_party_count: Option<usize>,
    #[serde(rename = "majorPartyMinTotal")]
    pub major_party_min_total: Option<u64>,
    #[serde(rename = "caseThreshold")]
    pub case_threshold: Option<u64>,
    #[serde(rename = "partyChartLimit")]
    pub party_chart_limit: Option<usize>,
    #[serde(rename = "missingCasesPolicy")]
    pub missing_cases_policy: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionConfig {
    pub region: Option<String>,
    pub years: Option<Vec<i32>>,
    #[serde(rename = "partyScope")]
    pub party_scope: Option<String>,
    #[serde(rename = "educationGrouping")]
    pub education_grouping: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct InsightsConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "dataSources")]
    pub data_sources: Vec<DataSource>,
    pub rules: Option<RulesConfig>,
    #[serde(default)]
    pub selections: Vec<SelectionConfig>,
}

pub fn read_config(path: &str) -> BInsightsResult<InsightsConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: InsightsConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(config)
}

pub fn read_summary(path: &str) -> BInsightsResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(js)
}

pub fn validate_rules(rules: &Option<RulesConfig>) -> BInsightsResult<DashboardRules> {
    let d = DashboardRules::DEFAULT_RULES;
    let r = rules.clone().unwrap_or_default();
    let res = DashboardRules {
        major_party_count: r.major_party_count.unwrap_or(d.major_party_count),
        major_party_min_total: r.major_party_min_total.unwrap_or(d.major_party_min_total),
        case_threshold: r.case_threshold.unwrap_or(d.case_threshold),
        party_chart_limit: r.party_chart_limit.unwrap_or(d.party_chart_limit),
        missing_cases: match r.missing_cases_policy.as_deref() {
            None | Some("treatAsZero") => MissingCasesPolicy::TreatAsZero,
            Some("exclude") => MissingCasesPolicy::Exclude,
            Some(x) => {
                return Err(Box::new(
                    InvalidConfigSnafu {
                        field: "missingCasesPolicy",
                        value: x,
                    }
                    .build(),
                ));
            }
        },
    };
    Ok(res)
}

pub fn missing_cases_name(policy: MissingCasesPolicy) -> &'static str {
    match policy {
        MissingCasesPolicy::TreatAsZero => "treatAsZero",
        MissingCasesPolicy::Exclude => "exclude",
    }
}

pub fn validate_selection(selection: &SelectionConfig) -> BInsightsResult<DashboardRequest> {
    let res = DashboardRequest {
        region: selection.region.clone(),
        years: selection.years.clone().unwrap_or_default(),
        party_scope: match selection.party_scope.as_deref() {
            None | Some("majorParties") | Some("major") => PartyScopeToggle::MajorParties,
            Some("allParties") | Some("all") => PartyScopeToggle::AllParties,
            Some(x) => {
                return Err(Box::new(
                    InvalidConfigSnafu {
                        field: "partyScope",
                        value: x,
                    }
                    .build(),
                ));
            }
        },
        education_grouping: match selection.education_grouping.as_deref() {
            None | Some("byPartyAndEducation") | Some("party") => {
                EducationGrouping::ByPartyAndEducation
            }
            Some("byEducation") | Some("education") => EducationGrouping::ByEducation,
            Some(x) => {
                return Err(Box::new(
                    InvalidConfigSnafu {
                        field: "educationGrouping",
                        value: x,
                    }
                    .build(),
                ));
            }
        },
    };
    Ok(res)
}

pub fn output_config(config: &InsightsConfig, rules: &DashboardRules) -> OutputConfig {
    OutputConfig {
        dashboard: config.output_settings.dashboard_name.clone(),
        major_party_count: rules.major_party_count,
        major_party_min_total: rules.major_party_min_total,
        case_threshold: rules.case_threshold,
        party_chart_limit: rules.party_chart_limit,
        missing_cases_policy: missing_cases_name(rules.missing_cases).to_string(),
    }
}
