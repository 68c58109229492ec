use crate::types::report::RankReport;

/// Pretty JSON. Non-finite numbers (undefined weights) serialize as `null`.
pub fn to_json(report: &RankReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures;

    #[test]
    fn json_report_contains_weights_and_topsis_state() {
        let rendered = to_json(&fixtures::report()).expect("json should serialize");
        let value: serde_json::Value =
            serde_json::from_str(&rendered).expect("rendered json should parse");

        assert_eq!(value["project"], "demo");
        assert_eq!(value["correlation_method"], "pearson");
        assert_eq!(value["criteria"][0]["direction"], "benefit");
        assert_eq!(value["alternatives"].as_array().map(Vec::len), Some(3));
        assert_eq!(value["decision_matrix"]["criteria"][0], "bugs");
        assert!(value["topsis"]["closeness"].is_array());
        assert!(value["decision_matrix"].get("criteria_index").is_none());
    }

    #[test]
    fn undefined_weights_serialize_as_null() {
        let rendered = to_json(&fixtures::degenerate_report()).expect("json should serialize");
        let value: serde_json::Value =
            serde_json::from_str(&rendered).expect("rendered json should parse");
        assert!(value["alternatives"][0]["weight"].is_null());
    }
}
