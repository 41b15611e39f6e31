//! Two-column `Month,Drop-off Rate` text parsing.
//!
//! Only the first two columns are read. Rows with an unusable month are
//! dropped, unusable rates fall back to 0%, and every repair is reported
//! as a [`DataError`] next to the rows that survived.

use log::debug;

use crate::prelude::DataError;
use crate::schedule::dropoff::{DropoffSchedule, MonthRate};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSchedule {
    pub rows: Vec<MonthRate>,
    pub issues: Vec<DataError>,
}

impl ParsedSchedule {
    /// Resolves the parsed rows against a program length, appending any
    /// range/duplicate issues to the parse issues.
    pub fn into_schedule(self, duration_months: usize) -> (DropoffSchedule, Vec<DataError>) {
        let (schedule, resolve_issues) =
            DropoffSchedule::from_month_rates(&self.rows, duration_months);
        let mut issues = self.issues;
        issues.extend(resolve_issues);
        (schedule, issues)
    }
}

pub fn parse_schedule_csv(text: &str) -> ParsedSchedule {
    let mut parsed = ParsedSchedule::default();

    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let mut fields = trimmed.split(',').map(|field| field.trim().trim_matches('"'));
        let raw_month = fields.next().unwrap_or_default();
        let raw_rate = fields.next().unwrap_or_default();

        let month = match parse_month(raw_month) {
            Some(month) => month,
            None if index == 0 => {
                debug!("treating {:?} as the schedule header", trimmed);
                continue;
            }
            None => {
                parsed.issues.push(DataError::InvalidMonth {
                    line: line_number,
                    raw: excerpt(raw_month),
                });
                continue;
            }
        };

        let rate_percent = match raw_rate.trim_end_matches('%').trim().parse::<f64>() {
            Ok(rate) if rate.is_finite() => rate,
            _ => {
                parsed.issues.push(DataError::InvalidRate {
                    line: line_number,
                    raw: excerpt(raw_rate),
                });
                0.0
            }
        };

        parsed.rows.push(MonthRate {
            month,
            rate_percent,
        });
    }

    for issue in &parsed.issues {
        debug!("schedule csv: {}", issue);
    }
    parsed
}

/// Longest field text echoed back in a [`DataError`].
const MAX_ECHOED_CHARS: usize = 16;

fn excerpt(raw: &str) -> String {
    match raw.char_indices().nth(MAX_ECHOED_CHARS) {
        Some((cut, _)) => format!("{}...", &raw[..cut]),
        None => raw.to_string(),
    }
}

fn parse_month(raw: &str) -> Option<i64> {
    if let Ok(month) = raw.parse::<i64>() {
        return Some(month);
    }
    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}
