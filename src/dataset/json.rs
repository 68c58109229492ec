use super::{parse_start_date, VersionRow, START_DATE_FIELD, VERSION_FIELD};
use crate::error::{RankError, Result};
use serde_json::Value;
use std::collections::BTreeMap;

/// Parses a JSON array of row objects. Numeric fields become metrics, `null` reads as
/// `0.0`, and any other non-reserved field is ignored.
pub fn parse_rows(content: &str) -> Result<Vec<VersionRow>> {
    let document: Value = serde_json::from_str(content)?;
    let Value::Array(entries) = document else {
        return Err(RankError::DatasetParse(
            "expected a JSON array of version rows".to_string(),
        ));
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| parse_row(index, entry))
        .collect()
}

fn parse_row(index: usize, entry: Value) -> Result<VersionRow> {
    let Value::Object(fields) = entry else {
        return Err(RankError::DatasetParse(format!(
            "row {index}: expected an object"
        )));
    };

    let version = match fields.get(VERSION_FIELD) {
        Some(Value::String(name)) => name.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => {
            return Err(RankError::DatasetParse(format!(
                "row {index}: missing '{VERSION_FIELD}'"
            )))
        }
    };

    let start_date = match fields.get(START_DATE_FIELD) {
        Some(Value::String(raw)) => Some(parse_start_date(raw)?),
        Some(Value::Null) | None => None,
        Some(other) => {
            return Err(RankError::DatasetParse(format!(
                "row {index}: '{START_DATE_FIELD}' must be a string, found {other}"
            )))
        }
    };

    let mut values = BTreeMap::new();
    for (name, value) in fields {
        if name == VERSION_FIELD || name == START_DATE_FIELD {
            continue;
        }
        match value {
            Value::Number(number) => {
                if let Some(value) = number.as_f64() {
                    values.insert(name, value);
                }
            }
            Value::Null => {
                values.insert(name, 0.0);
            }
            _ => {}
        }
    }

    Ok(VersionRow {
        version,
        start_date,
        values,
    })
}
