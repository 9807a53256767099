use calamine::{open_workbook, DataType, Reader, Xlsx};
use candidate_stats::CandidateRecord;

use crate::insights::{
    io_common::{get_col_index_mapping, parse_row},
    *,
};

pub fn read_excel_candidates(
    path: &str,
    cfs: &DataSource,
) -> BInsightsResult<Vec<CandidateRecord>> {
    let wrange = get_range(path, cfs)?;

    let mut iter = wrange.rows();
    let header_cells = iter.next().context(EmptyExcelSnafu { path })?;
    let header: Vec<Option<String>> = header_cells
        .iter()
        .map(|dt| match dt {
            DataType::String(s) => Some(s.clone()),
            _ => None,
        })
        .collect();
    debug!("read_excel_candidates: header: {:?}", header);
    let cols = get_col_index_mapping(path, &cfs.column_names(), &header)?;

    let mut res: Vec<CandidateRecord> = Vec::new();
    for (idx, cells) in iter.enumerate() {
        // Excel rows are 1-based and the header is row 1.
        let lineno = idx + 2;
        // Only the mapped columns are read, other columns may hold any cell type.
        let mut row: Vec<Option<String>> = vec![None; cells.len()];
        for &col in cols.positions.iter() {
            if let Some(cell) = cells.get(col) {
                row[col] = read_cell(path, lineno, col, cell)?;
            }
        }
        // Fully empty rows at the end of a worksheet are common.
        if row.iter().all(|c| c.is_none()) {
            continue;
        }
        res.push(parse_row(path, lineno, &cols, &row)?);
    }
    Ok(res)
}

fn read_cell(
    path: &str,
    lineno: usize,
    col: usize,
    cell: &DataType,
) -> BInsightsResult<Option<String>> {
    match cell {
        DataType::String(s) if s.trim().is_empty() => Ok(None),
        DataType::String(s) => Ok(Some(s.clone())),
        DataType::Float(f) => Ok(Some(f.to_string())),
        DataType::Int(i) => Ok(Some(i.to_string())),
        DataType::Empty => Ok(None),
        _ => Err(Box::new(
            ExcelWrongCellTypeSnafu {
                path,
                lineno,
                col,
                content: format!("{:?}", cell),
            }
            .build(),
        )),
    }
}

fn get_range(path: &str, cfs: &DataSource) -> BInsightsResult<calamine::Range<DataType>> {
    let worksheet_name_o = cfs.excel_worksheet_name.clone();
    debug!(
        "read_excel_candidates: path: {:?} worksheet: {:?}",
        &path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    let wrange = if let Some(worksheet_name) = worksheet_name_o {
        workbook
            .worksheet_range(&worksheet_name)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?
    } else {
        workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?
    };
    Ok(wrange)
}
