use candidate_stats::CandidateRecord;
use serde_json::Value as JSValue;

use crate::insights::{
    io_common::{parse_row, ColumnIndexes},
    *,
};

/// Reads an array of objects, one object per candidate.
pub fn read_json_candidates(path: &str, cfs: &DataSource) -> BInsightsResult<Vec<CandidateRecord>> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    let entries = js.as_array().context(JsonNotAnArraySnafu { path })?;

    let names = cfs.column_names();
    // Rows are built in field order.
    let cols = ColumnIndexes {
        names: names.clone(),
        positions: [0, 1, 2, 3, 4, 5, 6],
    };

    let mut res: Vec<CandidateRecord> = Vec::new();
    for (idx, entry) in entries.iter().enumerate() {
        // 1-based, like the lines of the other formats.
        let lineno = idx + 1;
        let obj = entry
            .as_object()
            .context(JsonEntryNotAnObjectSnafu { path, lineno })?;
        let mut row: Vec<Option<String>> = Vec::new();
        for name in names.iter() {
            let cell = match obj.get(name) {
                Some(JSValue::String(s)) => Some(s.clone()),
                Some(JSValue::Number(n)) => Some(n.to_string()),
                Some(JSValue::Null) => None,
                Some(other) => {
                    return Err(Box::new(
                        InvalidCellSnafu {
                            path,
                            lineno,
                            column: name.as_str(),
                            content: other.to_string(),
                        }
                        .build(),
                    ));
                }
                None => {
                    return Err(Box::new(
                        MissingColumnSnafu {
                            column: name.as_str(),
                            path,
                        }
                        .build(),
                    ));
                }
            };
            row.push(cell);
        }
        res.push(parse_row(path, lineno, &cols, &row)?);
    }
    debug!("read_json_candidates: {} records from {:?}", res.len(), path);
    Ok(res)
}
