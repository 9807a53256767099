// ********* Input data structures ***********

use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::Display;

/// The declared education level of a candidate.
///
/// The declaration order is the display order used by every table that
/// groups by education.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum EducationBracket {
    Illiterate,
    Literate,
    FifthPass,
    EighthPass,
    TenthPass,
    TwelfthPass,
    Diploma,
    Graduate,
    GraduateProfessional,
    PostGraduate,
    Doctorate,
    Others,
    NotGiven,
}

impl EducationBracket {
    pub const ALL: [EducationBracket; 13] = [
        EducationBracket::Illiterate,
        EducationBracket::Literate,
        EducationBracket::FifthPass,
        EducationBracket::EighthPass,
        EducationBracket::TenthPass,
        EducationBracket::TwelfthPass,
        EducationBracket::Diploma,
        EducationBracket::Graduate,
        EducationBracket::GraduateProfessional,
        EducationBracket::PostGraduate,
        EducationBracket::Doctorate,
        EducationBracket::Others,
        EducationBracket::NotGiven,
    ];

    /// The label as it appears in the source declarations.
    pub fn label(&self) -> &'static str {
        match self {
            EducationBracket::Illiterate => "Illiterate",
            EducationBracket::Literate => "Literate",
            EducationBracket::FifthPass => "5th Pass",
            EducationBracket::EighthPass => "8th Pass",
            EducationBracket::TenthPass => "10th Pass",
            EducationBracket::TwelfthPass => "12th Pass",
            EducationBracket::Diploma => "Diploma",
            EducationBracket::Graduate => "Graduate",
            EducationBracket::GraduateProfessional => "Graduate Professional",
            EducationBracket::PostGraduate => "Post Graduate",
            EducationBracket::Doctorate => "Doctorate",
            EducationBracket::Others => "Others",
            EducationBracket::NotGiven => "Not Given",
        }
    }

    /// Parses a label, ignoring case and surrounding or repeated whitespace.
    /// An empty label is `NotGiven`. Unknown labels return `None`.
    pub fn parse(s: &str) -> Option<EducationBracket> {
        let normalized: String = s
            .split_whitespace()
            .collect::<Vec<&str>>()
            .join(" ")
            .to_lowercase();
        if normalized.is_empty() {
            return Some(EducationBracket::NotGiven);
        }
        EducationBracket::ALL
            .iter()
            .find(|b| b.label().to_lowercase() == normalized)
            .cloned()
    }
}

impl Display for EducationBracket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One candidate in one election of one constituency.
#[derive(PartialEq, Debug, Clone)]
pub struct CandidateRecord {
    pub region: String,
    pub year: i32,
    pub constituency: String,
    pub party: String,
    /// `None` when the declaration does not say.
    pub criminal_cases: Option<u64>,
    pub total_assets: f64,
    pub education: EducationBracket,
}

/// Errors that prevent a dataset from being built.
#[derive(PartialEq, Debug, Clone)]
pub enum DatasetError {
    EmptyField { index: usize, field: &'static str },
    InvalidAssets { index: usize, value: f64 },
}

impl Error for DatasetError {}

impl Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::EmptyField { index, field } => {
                write!(f, "record {}: field {} is empty", index, field)
            }
            DatasetError::InvalidAssets { index, value } => {
                write!(f, "record {}: invalid total assets {}", index, value)
            }
        }
    }
}

/// The validated, read-only candidate table.
///
/// Records keep the order in which they were loaded.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<CandidateRecord>,
}

impl Dataset {
    pub fn new(records: Vec<CandidateRecord>) -> Result<Dataset, DatasetError> {
        for (index, r) in records.iter().enumerate() {
            for (field, value) in [
                ("region", &r.region),
                ("constituency", &r.constituency),
                ("party", &r.party),
            ] {
                if value.trim().is_empty() {
                    return Err(DatasetError::EmptyField { index, field });
                }
            }
            if !r.total_assets.is_finite() || r.total_assets < 0.0 {
                return Err(DatasetError::InvalidAssets {
                    index,
                    value: r.total_assets,
                });
            }
        }
        Ok(Dataset { records })
    }

    pub fn records(&self) -> &[CandidateRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The rows of one region and a set of years, borrowed from the dataset.
pub type FilteredSubset<'a> = Vec<&'a CandidateRecord>;

// ******** Selection *********

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Selection {
    pub region: String,
    pub years: BTreeSet<i32>,
}

/// A change applied to a requested selection to make it valid.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SelectionCorrection {
    /// The requested region (if any) does not exist.
    RegionReplaced {
        requested: Option<String>,
        replacement: String,
    },
    /// Some requested years have no record for the region.
    YearsDropped { dropped: Vec<i32> },
    /// None of the requested years was valid, the latest year is used.
    YearsDefaulted { requested: Vec<i32> },
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ResolvedSelection {
    pub selection: Selection,
    /// The years available for `selection.region`, ascending.
    pub year_options: Vec<i32>,
    pub corrections: Vec<SelectionCorrection>,
}

// ******** Output data structures *********

#[derive(PartialEq, Debug, Clone)]
pub struct PartySummaryRow {
    pub party: String,
    pub candidate_count: u64,
    /// Candidates whose case count is known under the missing-cases policy.
    pub reported_count: u64,
    pub criminal_case_total: u64,
    pub average_cases: f64,
    pub total_assets: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct ConstituencySummaryRow {
    pub constituency: String,
    pub party: String,
    pub candidate_count: u64,
    pub criminal_case_total: u64,
    pub total_assets: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct EducationBreakdownRow {
    /// `None` when grouping by education only.
    pub party: Option<String>,
    pub education: EducationBracket,
    pub candidate_count: u64,
    pub criminal_case_total: u64,
    pub total_assets: f64,
    pub min_assets: f64,
    pub median_assets: f64,
    pub max_assets: f64,
}

/// Number of candidates of a party that have exactly `criminal_cases` cases.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct FacetCountRow {
    pub party: String,
    pub criminal_cases: u64,
    pub candidate_count: u64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct SubsetTotals {
    pub candidate_count: u64,
    pub reported_count: u64,
    pub criminal_case_total: u64,
    pub total_assets: f64,
    pub party_count: u64,
    pub constituency_count: u64,
}

/// The party rankings behind the dashboard bar charts.
#[derive(PartialEq, Debug, Clone)]
pub struct PartyCharts {
    pub by_criminal_cases: Vec<PartySummaryRow>,
    pub by_candidates: Vec<PartySummaryRow>,
    pub by_average_cases: Vec<PartySummaryRow>,
    pub by_assets: Vec<PartySummaryRow>,
}

/// Everything derived from one selection.
#[derive(PartialEq, Debug, Clone)]
pub struct DashboardReport {
    pub selection: ResolvedSelection,
    pub totals: SubsetTotals,
    pub party_summary: Vec<PartySummaryRow>,
    pub major_parties: Vec<String>,
    pub party_charts: PartyCharts,
    pub constituency_summary: Vec<ConstituencySummaryRow>,
    pub education_breakdown: Vec<EducationBreakdownRow>,
    pub facet_counts: Vec<FacetCountRow>,
}

// ********* Configuration **********

/// How to treat candidates whose criminal-case count is not declared.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum MissingCasesPolicy {
    /// Count them as zero cases.
    TreatAsZero,
    /// Keep them as candidates but leave them out of case totals,
    /// averages and case thresholds.
    Exclude,
}

impl MissingCasesPolicy {
    /// The case count of a record under this policy, `None` if it must not
    /// be counted.
    pub fn cases(&self, record: &CandidateRecord) -> Option<u64> {
        match (record.criminal_cases, self) {
            (Some(n), _) => Some(n),
            (None, MissingCasesPolicy::TreatAsZero) => Some(0),
            (None, MissingCasesPolicy::Exclude) => None,
        }
    }
}

/// The metric used to order the party charts.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum PartyMetric {
    CriminalCases,
    Candidates,
    AverageCases,
    Assets,
}

/// Which parties a detail view covers.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum PartyScope {
    All,
    /// Only these parties, in this order.
    Only(Vec<String>),
}

impl PartyScope {
    pub fn contains(&self, party: &str) -> bool {
        match self {
            PartyScope::All => true,
            PartyScope::Only(parties) => parties.iter().any(|p| p == party),
        }
    }
}

/// The "show all parties" / "major parties only" toggle of the detail views.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum PartyScopeToggle {
    AllParties,
    MajorParties,
}

/// The "facet by party" / "facet by education" toggle.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum EducationGrouping {
    ByPartyAndEducation,
    ByEducation,
}

/// What a caller asks for in one pass. Invalid values are corrected.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DashboardRequest {
    pub region: Option<String>,
    pub years: Vec<i32>,
    pub party_scope: PartyScopeToggle,
    pub education_grouping: EducationGrouping,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DashboardRules {
    pub major_party_count: usize,
    /// Parties need strictly more cases than this to be major.
    pub major_party_min_total: u64,
    /// Detail views only count candidates with strictly more cases.
    pub case_threshold: u64,
    pub party_chart_limit: usize,
    pub missing_cases: MissingCasesPolicy,
}

impl DashboardRules {
    pub const DEFAULT_RULES: DashboardRules = DashboardRules {
        major_party_count: 6,
        major_party_min_total: 0,
        case_threshold: 3,
        party_chart_limit: 18,
        missing_cases: MissingCasesPolicy::TreatAsZero,
    };
}
