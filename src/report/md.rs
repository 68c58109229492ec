use crate::types::report::RankReport;

fn cell(value: f64) -> String {
    format!("{value:.4}")
}

fn table_header(output: &mut String, columns: &[&str]) {
    output.push_str(&format!("| {} |\n", columns.join(" | ")));
    output.push_str(&format!("|{}\n", "---|".repeat(columns.len())));
}

pub fn to_markdown(report: &RankReport) -> String {
    let mut output = String::new();
    output.push_str(&format!("# Risk Ranking: {}\n\n", report.project));
    output.push_str(&format!(
        "Versions analysed: {}{}\n\n",
        report.versions.len(),
        match (report.versions.first(), report.versions.last()) {
            (Some(first), Some(last)) if first != last => format!(" ({first} .. {last})"),
            (Some(only), _) => format!(" ({only})"),
            _ => String::new(),
        }
    ));
    output.push_str(&format!(
        "Correlation method: {}\n\n",
        report.correlation_method
    ));

    output.push_str("## Criteria\n\n");
    for criterion in &report.criteria {
        output.push_str(&format!(
            "- {} (weight {}, {})\n",
            criterion.name,
            criterion.weight,
            criterion.direction.name()
        ));
    }
    output.push('\n');

    output.push_str("## Alternatives\n\n");
    if report.is_degenerate() {
        output.push_str("> Total closeness is zero; alternative weights are undefined.\n\n");
    }
    table_header(
        &mut output,
        &["Rank", "Alternative", "Weight", "Closeness", "D+", "D-"],
    );
    let distances = report.topsis.distances();
    let mut ranked = report.alternatives.iter().enumerate().collect::<Vec<_>>();
    ranked.sort_by_key(|(_, score)| score.rank);
    for (index, score) in ranked {
        let [to_ideal, to_anti_ideal] = distances.get(index).copied().unwrap_or([f64::NAN; 2]);
        output.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            score.rank,
            score.name,
            cell(score.weight),
            cell(score.closeness),
            cell(to_ideal),
            cell(to_anti_ideal)
        ));
    }
    output.push('\n');

    let criteria = report.decision_matrix.criteria();
    let mut columns = vec!["Alternative"];
    columns.extend(criteria.iter().map(String::as_str));

    output.push_str("## Decision Matrix\n\n");
    table_header(&mut output, &columns);
    for name in report.decision_matrix.alternatives() {
        let row = criteria
            .iter()
            .map(|criterion| {
                report
                    .decision_matrix
                    .get(name, criterion)
                    .unwrap_or(f64::NAN)
            })
            .collect::<Vec<_>>();
        push_row(&mut output, name, &row);
    }
    output.push('\n');

    output.push_str("## Weighted Matrix\n\n");
    table_header(&mut output, &columns);
    for (name, row) in report
        .decision_matrix
        .alternatives()
        .iter()
        .zip(report.topsis.weighted_matrix())
    {
        push_row(&mut output, name, row);
    }
    push_row(&mut output, "ideal", report.topsis.ideal());
    push_row(&mut output, "anti-ideal", report.topsis.anti_ideal());

    output
}

fn push_row(output: &mut String, label: &str, values: &[f64]) {
    let cells = values.iter().map(|value| cell(*value)).collect::<Vec<_>>();
    output.push_str(&format!("| {} | {} |\n", label, cells.join(" | ")));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures;

    #[test]
    fn markdown_report_contains_sections() {
        let rendered = to_markdown(&fixtures::report());
        assert!(rendered.contains("# Risk Ranking: demo"));
        assert!(rendered.contains("Versions analysed: 4 (v1 .. v4)"));
        assert!(rendered.contains("Correlation method: pearson"));
        assert!(rendered.contains("- bugs (weight 1, benefit)"));
        assert!(rendered.contains("## Decision Matrix"));
        assert!(rendered.contains("| Alternative | bugs |"));
        assert!(rendered.contains("| anti-ideal |"));
    }

    #[test]
    fn markdown_lists_alternatives_best_first() {
        let rendered = to_markdown(&fixtures::report());
        let first_row = rendered
            .lines()
            .find(|line| line.starts_with("| 1 |"))
            .expect("rank 1 row should exist");
        assert!(first_row.contains("bug_velocity"));
    }

    #[test]
    fn markdown_shows_undefined_weights_as_nan() {
        let rendered = to_markdown(&fixtures::degenerate_report());
        assert!(rendered.contains("weights are undefined"));
        assert!(rendered.contains("| 1 | changes | NaN |"));
    }
}
