// Primitives for reading CSV files.

use candidate_stats::CandidateRecord;

use crate::insights::{
    io_common::{get_col_index_mapping, parse_row},
    *,
};

pub fn read_csv_candidates(path: &str, cfs: &DataSource) -> BInsightsResult<Vec<CandidateRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    let header: Vec<Option<String>> = rdr
        .headers()
        .context(CsvLineParseSnafu { path, lineno: 1usize })?
        .iter()
        .map(|s| Some(s.to_string()))
        .collect();
    let cols = get_col_index_mapping(path, &cfs.column_names(), &header)?;
    debug!("read_csv_candidates: columns: {:?}", cols);

    let mut res: Vec<CandidateRecord> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        let row: Vec<Option<String>> = line
            .iter()
            .map(|s| {
                if s.trim().is_empty() {
                    None
                } else {
                    Some(s.to_string())
                }
            })
            .collect();
        let record = parse_row(path, lineno, &cols, &row)?;
        debug!("read_csv_candidates: lineno: {:?} record: {:?}", lineno, record);
        res.push(record);
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn write_tmp(name: &str, contents: &str) -> String {
        let p = env::temp_dir().join(name);
        fs::write(&p, contents).unwrap();
        p.display().to_string()
    }

    fn source() -> DataSource {
        DataSource {
            provider: "csv".to_string(),
            file_path: String::new(),
            excel_worksheet_name: None,
            columns: None,
        }
    }

    #[test]
    fn reads_records_in_order() {
        let path = write_tmp(
            "party_insights_reads_records.csv",
            "State,Year,Constituency,Candidate,Party,Criminal_Case,Education,Total_Assets\n\
             Delhi,2020,Matia Mahal,A,PartyA,2,Graduate,\"Rs 1,000 ~ 1 Thou+\"\n\
             Delhi,2020,Matia Mahal,B,PartyB,,12th Pass,Nil\n",
        );
        let records = read_csv_candidates(&path, &source()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].party, "PartyA");
        assert_eq!(records[0].criminal_cases, Some(2));
        assert_eq!(records[0].total_assets, 1000.0);
        assert_eq!(records[1].criminal_cases, None);
        assert_eq!(records[1].total_assets, 0.0);
    }

    #[test]
    fn bad_line_is_fatal() {
        let path = write_tmp(
            "party_insights_bad_line.csv",
            "State,Year,Constituency,Party,Criminal_Case,Total_Assets,Education\n\
             Delhi,2020,X,PartyA,1,10,Graduate\n\
             Delhi,20x0,X,PartyA,1,10,Graduate\n",
        );
        let err = read_csv_candidates(&path, &source()).unwrap_err();
        match *err {
            InsightsError::InvalidCell { lineno, .. } => assert_eq!(lineno, 3),
            ref e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = read_csv_candidates("/nonexistent/candidates.csv", &source()).unwrap_err();
        assert!(matches!(*err, InsightsError::CsvOpen { .. }));
    }
}
