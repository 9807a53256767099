use clap::Parser;

/// Criminal-record and asset statistics of election candidates, by party,
/// constituency and education.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON file describing the data sources, the rules and the selections
    /// to compute. Without it, a single selection is built from the other flags.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference file containing the expected summary in JSON format. If provided, partyinsights
    /// will check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary will be written in JSON format to the given
    /// location. Setting this option overrides the output directory that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) The candidate data. Setting this option overrides the data sources of the
    /// --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv, json or excel.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use. The first worksheet is used
    /// otherwise.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// The region (state) to select. Defaults to the first region in alphabetical order.
    #[clap(long, value_parser)]
    pub region: Option<String>,

    /// A year to select. Can be repeated. Defaults to the latest year of the region.
    #[clap(long = "year", value_parser)]
    pub years: Vec<i32>,

    /// (all or major, default major) The parties shown in the detail views.
    #[clap(long, value_parser)]
    pub party_scope: Option<String>,

    /// (party or education, default party) How the education breakdown is grouped.
    #[clap(long, value_parser)]
    pub education_grouping: Option<String>,

    // Other arguments
    /// Prints markdown tables of the main aggregates.
    #[clap(long, takes_value = false)]
    pub preview: bool,

    /// Prints the regions and their years, then exits.
    #[clap(long, takes_value = false)]
    pub list: bool,

    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
