use crate::dataset::csv::read_records;
use crate::error::{RankError, Result};
use crate::types::report::RankReport;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Quotes a field when it holds a delimiter, a quote or a line break.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// One row per alternative, best first.
pub fn to_csv(report: &RankReport) -> String {
    let mut output = String::from("alternative,closeness,weight,rank\n");
    for score in report.ranked() {
        output.push_str(&format!(
            "{},{},{},{}\n",
            escape(&score.name),
            score.closeness,
            score.weight,
            score.rank
        ));
    }
    output
}

const BATCH_LEADING_COLUMNS: [&str; 2] = ["project", "num_lines"];

/// Alternative columns of an existing batch file, or `None` when the file is missing or empty.
fn existing_batch_columns(path: &Path) -> Result<Option<Vec<String>>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    let Some((_, header)) = read_records(&content)?.into_iter().next() else {
        return Ok(None);
    };
    if header.len() < BATCH_LEADING_COLUMNS.len()
        || header[..BATCH_LEADING_COLUMNS.len()] != BATCH_LEADING_COLUMNS
    {
        return Err(RankError::BatchColumnMismatch {
            path: path.display().to_string(),
            expected: BATCH_LEADING_COLUMNS.join(", "),
            found: header.join(", "),
        });
    }
    Ok(Some(header[BATCH_LEADING_COLUMNS.len()..].to_vec()))
}

/// Appends `project,num_lines,<weight per alternative>` to `path`. Parent directories
/// are created and the header is written only for a new file. Weights are written under
/// their own column names; a report whose alternatives differ from an existing header's
/// is rejected with [`RankError::BatchColumnMismatch`] and nothing is written.
pub fn append_batch_row(
    path: &Path,
    project: &str,
    num_lines: Option<f64>,
    report: &RankReport,
) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let names = report
        .alternatives
        .iter()
        .map(|score| score.name.clone())
        .collect::<Vec<_>>();
    let existing = existing_batch_columns(path)?;
    let columns = match &existing {
        Some(columns) => {
            let mut expected = columns.clone();
            let mut found = names.clone();
            expected.sort();
            found.sort();
            if expected != found {
                return Err(RankError::BatchColumnMismatch {
                    path: path.display().to_string(),
                    expected: columns.join(", "),
                    found: names.join(", "),
                });
            }
            columns.clone()
        }
        None => names,
    };

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if existing.is_none() {
        let header = BATCH_LEADING_COLUMNS
            .iter()
            .map(|column| column.to_string())
            .chain(columns.iter().map(|name| escape(name)))
            .collect::<Vec<_>>();
        writeln!(file, "{}", header.join(","))?;
    }

    let mut row = vec![
        escape(project),
        num_lines.unwrap_or(f64::NAN).to_string(),
    ];
    row.extend(
        columns
            .iter()
            .map(|name| report.weight_of(name).unwrap_or(f64::NAN).to_string()),
    );
    writeln!(file, "{}", row.join(","))?;

    tracing::debug!(
        path = %path.display(),
        project,
        header = existing.is_none(),
        "batch row appended"
    );
    Ok(())
}
