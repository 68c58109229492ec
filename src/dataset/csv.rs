use super::{parse_start_date, VersionRow, START_DATE_FIELD, VERSION_FIELD};
use crate::error::{RankError, Result};
use std::collections::BTreeMap;

/// Parses a CSV table whose header names a `version` column, an optional `start_date`
/// column, and numeric metric columns. Empty cells read as `0.0`; metric cells must be
/// finite numbers.
pub fn parse_rows(content: &str) -> Result<Vec<VersionRow>> {
    let mut records = read_records(content)?.into_iter();

    let Some((_, header)) = records.next() else {
        return Err(RankError::DatasetParse("empty CSV dataset".to_string()));
    };
    let version_column = header
        .iter()
        .position(|name| name == VERSION_FIELD)
        .ok_or_else(|| {
            RankError::DatasetParse(format!("CSV header has no '{VERSION_FIELD}' column"))
        })?;
    let date_column = header.iter().position(|name| name == START_DATE_FIELD);

    records
        .map(|(line_number, cells)| {
            if cells.len() != header.len() {
                return Err(RankError::DatasetParse(format!(
                    "line {line_number}: expected {} cells, found {}",
                    header.len(),
                    cells.len()
                )));
            }

            let mut values = BTreeMap::new();
            for (column, (name, cell)) in header.iter().zip(&cells).enumerate() {
                if column == version_column || Some(column) == date_column {
                    continue;
                }
                values.insert(name.clone(), parse_metric(line_number, name, cell)?);
            }

            let start_date = match date_column.map(|column| cells[column].as_str()) {
                Some(raw) if !raw.is_empty() => Some(parse_start_date(raw)?),
                _ => None,
            };

            Ok(VersionRow {
                version: cells[version_column].clone(),
                start_date,
                values,
            })
        })
        .collect()
}

fn parse_metric(line_number: usize, name: &str, cell: &str) -> Result<f64> {
    if cell.is_empty() {
        return Ok(0.0);
    }
    match cell.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(RankError::DatasetParse(format!(
            "line {line_number}: column '{name}' is not a finite number: {cell}"
        ))),
        Err(_) => Err(RankError::DatasetParse(format!(
            "line {line_number}: column '{name}' is not numeric: {cell}"
        ))),
    }
}

/// Splits `content` into records of trimmed cells, each tagged with the line it starts on.
/// Double-quoted cells may hold commas, `""` escapes and line breaks. A leading byte order
/// mark is ignored and blank lines are skipped.
pub(crate) fn read_records(content: &str) -> Result<Vec<(usize, Vec<String>)>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut records = Vec::new();
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => cells.push(std::mem::take(&mut current).trim().to_string()),
            '\r' if !in_quotes && chars.peek() == Some(&'\n') => {}
            '\n' if !in_quotes => {
                cells.push(std::mem::take(&mut current).trim().to_string());
                push_record(&mut records, record_line, std::mem::take(&mut cells));
                line += 1;
                record_line = line;
            }
            '\n' => {
                current.push(ch);
                line += 1;
            }
            _ => current.push(ch),
        }
    }

    if in_quotes {
        return Err(RankError::DatasetParse(format!(
            "line {record_line}: unterminated quoted cell"
        )));
    }
    cells.push(current.trim().to_string());
    push_record(&mut records, record_line, cells);
    Ok(records)
}

fn push_record(records: &mut Vec<(usize, Vec<String>)>, line: usize, cells: Vec<String>) {
    let blank = cells.len() == 1 && cells[0].is_empty();
    if !blank {
        records.push((line, cells));
    }
}
