// Cell parsing shared by all the readers.

use crate::insights::*;

use candidate_stats::{CandidateRecord, EducationBracket};
use std::collections::HashMap;
use std::path::Path;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Position of each field in a row, in the order of `DataSource::column_names`.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ColumnIndexes {
    pub names: [String; 7],
    pub positions: [usize; 7],
}

/// Given the header of a file (names of each of the columns), finds the
/// column of each field.
pub fn get_col_index_mapping(
    path: &str,
    names: &[String; 7],
    header: &[Option<String>],
) -> BInsightsResult<ColumnIndexes> {
    let col_names: HashMap<&str, usize> = header
        .iter()
        .enumerate()
        .filter_map(|(idx, x)| x.as_ref().map(|s| (s.trim(), idx)))
        .collect();
    debug!("get_col_index_mapping: col_names: {:?}", col_names);

    let mut positions = [0usize; 7];
    for (pos, name) in positions.iter_mut().zip(names.iter()) {
        *pos = *col_names.get(name.as_str()).context(MissingColumnSnafu {
            column: name.as_str(),
            path,
        })?;
    }
    Ok(ColumnIndexes {
        names: names.clone(),
        positions,
    })
}

fn is_absent(s: &str) -> bool {
    matches!(
        s.to_lowercase().as_str(),
        "" | "na" | "n/a" | "nil" | "none" | "-" | "not given"
    )
}

/// Criminal case counts. Absent counts are `Ok(None)`; anything that is not
/// a non-negative whole number is an error.
pub fn parse_cases(s: &str) -> Result<Option<u64>, ()> {
    let s = s.trim();
    if is_absent(s) {
        return Ok(None);
    }
    if let Ok(n) = s.parse::<u64>() {
        return Ok(Some(n));
    }
    // Spreadsheets and JSON may store counts as floating point numbers.
    match s.parse::<f64>() {
        Ok(f) if f >= 0.0 && f.fract() == 0.0 && f.is_finite() => Ok(Some(f as u64)),
        _ => Err(()),
    }
}

/// Declared assets, such as `Rs 1,23,45,678 ~ 1 Crore+` or `250000`.
/// `Nil` and empty cells are zero.
pub fn parse_assets(s: &str) -> Option<f64> {
    // The part after `~` is a rounded reminder of the same amount.
    let s = s.split('~').next().unwrap_or("").trim();
    let s = s
        .strip_prefix("Rs.")
        .or_else(|| s.strip_prefix("Rs"))
        .unwrap_or(s)
        .trim();
    if is_absent(s) {
        return Some(0.0);
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let cleaned: String = s.chars().filter(|c| *c != ',' && *c != ' ').collect();
    // A leftover separator would shift the amount by orders of magnitude.
    if cleaned.starts_with('.') || cleaned.matches('.').count() > 1 {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

pub fn parse_year(s: &str) -> Option<i32> {
    let s = s.trim();
    if let Ok(y) = s.parse::<i32>() {
        return Some(y);
    }
    // Spreadsheets store years as floating point numbers.
    match s.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 => {
            Some(f as i32)
        }
        _ => None,
    }
}

/// Builds a record out of the cells of one line.
pub fn parse_row(
    path: &str,
    lineno: usize,
    cols: &ColumnIndexes,
    row: &[Option<String>],
) -> BInsightsResult<CandidateRecord> {
    let cell = |field: usize| -> BInsightsResult<String> {
        match row.get(cols.positions[field]) {
            Some(Some(s)) => Ok(s.trim().to_string()),
            Some(None) => Ok(String::new()),
            None => Err(Box::new(LineTooShortSnafu { path, lineno }.build())),
        }
    };
    let invalid = |field: usize, content: String| {
        Box::new(
            InvalidCellSnafu {
                path,
                lineno,
                column: cols.names[field].as_str(),
                content,
            }
            .build(),
        )
    };

    let region = cell(0)?;
    let year_s = cell(1)?;
    let year = parse_year(&year_s).ok_or_else(|| invalid(1, year_s.clone()))?;
    let constituency = cell(2)?;
    let party = cell(3)?;
    let cases_s = cell(4)?;
    let criminal_cases = parse_cases(&cases_s).map_err(|_| invalid(4, cases_s.clone()))?;
    let assets_s = cell(5)?;
    let total_assets = parse_assets(&assets_s).ok_or_else(|| invalid(5, assets_s.clone()))?;
    let education_s = cell(6)?;
    let education =
        EducationBracket::parse(&education_s).ok_or_else(|| invalid(6, education_s.clone()))?;

    Ok(CandidateRecord {
        region,
        year,
        constituency,
        party,
        criminal_cases,
        total_assets,
        education,
    })
}
