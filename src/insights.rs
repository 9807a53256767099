use log::{debug, info, warn};

use candidate_stats::{
    list_regions, list_years, run_dashboard, CandidateRecord, DashboardReport, DashboardRequest,
    DashboardRules, Dataset, DatasetError,
};
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::insights::config_reader::*;
use crate::insights::io_common::simplify_file_name;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;
mod io_json;
pub mod output;

#[derive(Debug, Snafu)]
pub enum InsightsError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet or no header found in file {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Unexpected cell in file {path} line {lineno} column {col}: {content}"))]
    ExcelWrongCellType {
        path: String,
        lineno: usize,
        col: usize,
        content: String,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("File {path} should contain an array of objects"))]
    JsonNotAnArray { path: String },
    #[snafu(display("Entry {lineno} of file {path} is not an object"))]
    JsonEntryNotAnObject { path: String, lineno: usize },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading file {path} line {lineno}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Column {column} not found in file {path}"))]
    MissingColumn { column: String, path: String },
    #[snafu(display("Line {lineno} of file {path} is too short"))]
    LineTooShort { path: String, lineno: usize },
    #[snafu(display("File {path} line {lineno}: cannot read {column} from {content:?}"))]
    InvalidCell {
        path: String,
        lineno: usize,
        column: String,
        content: String,
    },
    #[snafu(display("Invalid value for {field}: {value:?}"))]
    InvalidConfig { field: String, value: String },
    #[snafu(display("Provider {provider:?} is not supported (csv, json or excel)"))]
    UnknownProvider { provider: String },
    #[snafu(display("No data source: pass --config or --input"))]
    MissingDataSource {},
    #[snafu(display("Cannot find the directory of {path}"))]
    MissingParentDir { path: String },
    #[snafu(display("Invalid dataset"))]
    InvalidDataset { source: DatasetError },
    #[snafu(display("Error writing summary to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error serializing the summary"))]
    SerializingSummary { source: serde_json::Error },
    #[snafu(display("Difference detected between calculated summary and reference summary"))]
    ReferenceMismatch {},
}

pub type BInsightsResult<T> = Result<T, Box<InsightsError>>;

fn read_source(root_path: &Path, cfs: &DataSource) -> BInsightsResult<Vec<CandidateRecord>> {
    let p: PathBuf = root_path.join(&cfs.file_path);
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read candidate file {:?}", p2);
    let records = match cfs.provider.as_str() {
        "csv" => io_csv::read_csv_candidates(&p2, cfs)?,
        "json" => io_json::read_json_candidates(&p2, cfs)?,
        "excel" => io_excel::read_excel_candidates(&p2, cfs)?,
        x => {
            return Err(Box::new(UnknownProviderSnafu { provider: x }.build()));
        }
    };
    info!(
        "read_source: {} records from {}",
        records.len(),
        simplify_file_name(&p2)
    );
    Ok(records)
}

/// Reads and concatenates all the sources, in order. The paths of the sources
/// are relative to `root_path`.
pub fn read_dataset(root_path: &Path, sources: &[DataSource]) -> BInsightsResult<Arc<Dataset>> {
    ensure!(!sources.is_empty(), MissingDataSourceSnafu {});
    let mut data: Vec<CandidateRecord> = Vec::new();
    for cfs in sources.iter() {
        let mut file_data = read_source(root_path, cfs)?;
        data.append(&mut file_data);
    }
    let dataset = Dataset::new(data).context(InvalidDatasetSnafu {})?;
    Ok(Arc::new(dataset))
}

/// A loaded dataset and the rules to apply to it. Every selection runs a
/// full pass over the same dataset.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    dataset: Arc<Dataset>,
    rules: DashboardRules,
}

impl DashboardSession {
    pub fn new(dataset: Arc<Dataset>, rules: DashboardRules) -> DashboardSession {
        DashboardSession { dataset, rules }
    }

    pub fn run(&self, request: &DashboardRequest) -> DashboardReport {
        run_dashboard(&self.dataset, request, &self.rules)
    }

    /// The regions and the years available in each of them.
    pub fn options(&self) -> Vec<(String, Vec<i32>)> {
        list_regions(&self.dataset)
            .into_iter()
            .map(|r| {
                let years = list_years(&self.dataset, &r);
                (r, years)
            })
            .collect()
    }
}

/// The selection described by the command line flags.
fn selection_from_args(args: &Args) -> SelectionConfig {
    SelectionConfig {
        region: args.region.clone(),
        years: if args.years.is_empty() {
            None
        } else {
            Some(args.years.clone())
        },
        party_scope: args.party_scope.clone(),
        education_grouping: args.education_grouping.clone(),
    }
}

/// The configuration to run: the config file if any, with the data sources
/// overridden by --input.
fn build_config(args: &Args) -> BInsightsResult<(InsightsConfig, PathBuf)> {
    let (mut config, root_path) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root_p = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu {
                    path: config_path.as_str(),
                })?
                .to_path_buf();
            (config, root_p)
        }
        None => {
            let input = args.input.clone().context(MissingDataSourceSnafu {})?;
            let config = InsightsConfig {
                output_settings: OutputSettings {
                    dashboard_name: simplify_file_name(&input),
                    output_directory: None,
                },
                data_sources: vec![],
                rules: None,
                selections: vec![],
            };
            (config, PathBuf::new())
        }
    };

    if let Some(input) = &args.input {
        config.data_sources = vec![DataSource {
            provider: args.input_type.clone().unwrap_or_else(|| "csv".to_string()),
            file_path: input.clone(),
            excel_worksheet_name: args.excel_worksheet_name.clone(),
            columns: None,
        }];
    }

    if config.selections.is_empty() {
        config.selections.push(selection_from_args(args));
    }
    Ok((config, root_path))
}

fn write_summary(
    args: &Args,
    config: &InsightsConfig,
    root_path: &Path,
    pretty_js_stats: &str,
) -> BInsightsResult<()> {
    let out_path: Option<PathBuf> = match (&args.out, &config.output_settings.output_directory) {
        (Some(x), _) if x == "stdout" => {
            println!("{}", pretty_js_stats);
            None
        }
        (Some(x), _) => Some(PathBuf::from(x)),
        (None, Some(dir)) => {
            let file_name = format!("{}_summary.json", config.output_settings.dashboard_name);
            Some(root_path.join(dir).join(file_name))
        }
        (None, None) => None,
    };
    if let Some(p) = out_path {
        let path = p.display().to_string();
        info!("Writing summary to {}", path);
        fs::write(&p, pretty_js_stats).context(WritingOutputSnafu { path })?;
    }
    Ok(())
}

fn check_reference(summary_path: &str, result_js: &JSValue) -> BInsightsResult<()> {
    let summary_ref = read_summary(summary_path)?;
    debug!("check_reference: summary: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(SerializingSummarySnafu {})?;
    let pretty_js_stats =
        serde_json::to_string_pretty(result_js).context(SerializingSummarySnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference string");
        print_diff(
            pretty_js_summary_ref.as_str(),
            pretty_js_stats.as_ref(),
            "\n",
        );
        return Err(Box::new(ReferenceMismatchSnafu {}.build()));
    }
    Ok(())
}

fn print_options(session: &DashboardSession) {
    for (region, years) in session.options() {
        let ys: Vec<String> = years.iter().map(|y| y.to_string()).collect();
        println!("{}: {}", region, ys.join(", "));
    }
}

pub fn run_dashboards(args: &Args) -> BInsightsResult<()> {
    let (config, root_path) = build_config(args)?;
    info!("config: {:?}", config);

    let rules = validate_rules(&config.rules)?;
    let requests: Vec<DashboardRequest> = config
        .selections
        .iter()
        .map(validate_selection)
        .collect::<BInsightsResult<Vec<_>>>()?;

    let dataset = read_dataset(&root_path, &config.data_sources)?;
    let session = DashboardSession::new(dataset, rules.clone());

    if args.list {
        print_options(&session);
        return Ok(());
    }

    let reports: Vec<DashboardReport> = requests.iter().map(|r| session.run(r)).collect();

    if args.preview {
        for report in reports.iter() {
            output::preview_report(report, 20);
        }
    }

    let result_js = output::build_summary_js(&output_config(&config, &rules), &reports);
    let pretty_js_stats =
        serde_json::to_string_pretty(&result_js).context(SerializingSummarySnafu {})?;
    write_summary(args, &config, &root_path, &pretty_js_stats)?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &args.reference {
        check_reference(summary_p, &result_js)?;
    }
    Ok(())
}

#[cfg(test)]
fn run_dashboard_test(test_name: &str, config_lpath: &str, summary_lpath: &str) {
    let test_dir = option_env!("INSIGHTS_TEST_DIR")
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("{}/tests", env!("CARGO_MANIFEST_DIR")));
    info!("Running test {}", test_name);
    let args = Args {
        config: Some(format!("{}/{}/{}", test_dir, test_name, config_lpath)),
        reference: Some(format!("{}/{}/{}", test_dir, test_name, summary_lpath)),
        ..Args::default()
    };
    let res = run_dashboards(&args);
    if let Err(e) = &res {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured {}", e);
        if let Some(bt) = snafu::ErrorCompat::backtrace(&**e) {
            eprintln!("trace: {}", bt);
        }
    }
    assert!(res.is_ok(), "test {} failed", test_name);
}

#[cfg(test)]
pub fn test_wrapper(test_name: &str) {
    run_dashboard_test(
        test_name,
        format!("{}_config.json", test_name).as_str(),
        format!("{}_expected_summary.json", test_name).as_str(),
    )
}
