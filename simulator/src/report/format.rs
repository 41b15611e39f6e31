use crate::workflow::runner::{ScenarioOutcome, WorkflowResult};
use std::fmt::Write;

/// Whole-dollar amount with thousands separators, e.g. `-$12,345`.
pub fn currency(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if rounded < 0.0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

pub fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}

pub fn learners(value: f64) -> String {
    format!("{:.0} learners", value)
}

const COLUMNS: [&str; 8] = [
    "Scenario",
    "Total Revenue",
    "Incentive Cost",
    "Net Revenue",
    "Retention Gain",
    "Retention Gain (%)",
    "Break-Even Learners Needed",
    "Liability Incentive",
];

fn summary_row(outcome: &ScenarioOutcome) -> [String; 8] {
    let summary = &outcome.summary;
    [
        summary.name.clone(),
        currency(summary.total_revenue),
        currency(summary.incentive_cost),
        currency(summary.net_revenue),
        learners(summary.retention_gain),
        percent(summary.retention_gain_pct),
        format!("{:.0}", summary.break_even_learners),
        currency(summary.liability),
    ]
}

/// Plain-text executive summary: one row per scenario, baseline first.
pub fn executive_summary(result: &WorkflowResult) -> String {
    let rows: Vec<[String; 8]> = std::iter::once(&result.baseline)
        .chain(result.scenarios.iter())
        .map(summary_row)
        .collect();

    let mut widths = COLUMNS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = COLUMNS
        .iter()
        .zip(widths.iter())
        .map(|(name, width)| format!("{:<width$}", name, width = *width))
        .collect();
    let _ = writeln!(out, "{}", header.join(" | "));
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(widths.iter())
            .enumerate()
            .map(|(index, (cell, width))| {
                if index == 0 {
                    format!("{:<width$}", cell, width = *width)
                } else {
                    format!("{:>width$}", cell, width = *width)
                }
            })
            .collect();
        let _ = writeln!(out, "{}", cells.join(" | "));
    }
    out
}

/// Active learners per month for every scenario.
pub fn retention_table(result: &WorkflowResult) -> String {
    let outcomes: Vec<&ScenarioOutcome> = std::iter::once(&result.baseline)
        .chain(result.scenarios.iter())
        .collect();

    let mut out = String::from("Month");
    for outcome in &outcomes {
        let _ = write!(out, "\t{}", outcome.params.name);
    }
    out.push('\n');
    for month in 0..result.config.duration_months {
        let _ = write!(out, "{}", month + 1);
        for outcome in &outcomes {
            let value = outcome.trajectory.as_slice().get(month).copied().unwrap_or(0.0);
            let _ = write!(out, "\t{:.1}", value);
        }
        out.push('\n');
    }
    out
}

pub fn recommendation_message(result: &WorkflowResult) -> Option<String> {
    let picks = result.recommendation.as_ref()?;
    let best = &result.scenarios.get(picks.best)?.summary;
    let worst = &result.scenarios.get(picks.worst)?.summary;

    let mut message = format!(
        "Recommendation: adopt {}. It delivers the highest net revenue of {}, with a retention uplift of {}. \
         This requires retaining at least {:.0} additional learners to break even.",
        best.name,
        currency(best.net_revenue),
        percent(best.retention_gain_pct),
        best.break_even_learners
    );
    if picks.best != picks.worst {
        let _ = write!(
            message,
            " Compared to {}, which yields only {} net revenue, the recommended approach is the more cost-effective incentive.",
            worst.name,
            currency(worst.net_revenue)
        );
    }
    Some(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::config::WorkflowConfig;
    use crate::workflow::runner::Runner;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(currency(0.0), "$0");
        assert_eq!(currency(999.4), "$999");
        assert_eq!(currency(1234.5), "$1,235");
        assert_eq!(currency(1_234_567.0), "$1,234,567");
        assert_eq!(currency(-45_000.0), "-$45,000");
    }

    #[test]
    fn percent_and_learners_round_for_display() {
        assert_eq!(percent(42.857), "42.9%");
        assert_eq!(learners(299.6), "300 learners");
    }

    #[test]
    fn summary_lists_baseline_then_scenarios() {
        let result = Runner::new().execute(&WorkflowConfig::default()).unwrap();
        let table = executive_summary(&result);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Scenario"));
        assert!(lines[2].starts_with("Baseline"));
        assert!(lines[4].contains("$35,000"));
    }

    #[test]
    fn retention_table_has_row_per_month() {
        let result = Runner::new().execute(&WorkflowConfig::default()).unwrap();
        assert_eq!(retention_table(&result).lines().count(), 9);
    }

    #[test]
    fn recommendation_names_best_and_worst() {
        let result = Runner::new().execute(&WorkflowConfig::default()).unwrap();
        let message = recommendation_message(&result).unwrap();
        assert!(message.contains("adopt Scenario 2"));
        assert!(message.contains("Compared to Scenario 1"));
    }
}
