use log::debug;
use serde::{Deserialize, Serialize};

use crate::math::stats::StatsHelper;
use crate::prelude::{check_duration, check_percent, ConfigError, DataError, SimResult};

/// Three-phase drop-off profile, all values in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseRates {
    pub organic_drop_pre: f64,
    pub major_drop: f64,
    pub organic_drop_post: f64,
}

impl PhaseRates {
    pub fn validate(&self) -> SimResult<()> {
        check_percent("organic_drop_pre", self.organic_drop_pre)?;
        check_percent("major_drop", self.major_drop)?;
        check_percent("organic_drop_post", self.organic_drop_post)?;
        Ok(())
    }
}

/// One externally supplied `(month, percent)` row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthRate {
    pub month: i64,
    pub rate_percent: f64,
}

/// Monthly drop-off fractions, index 0 = month 1. Every value is in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropoffSchedule {
    rates: Vec<f64>,
}

impl DropoffSchedule {
    /// Builds the analytic schedule: `pre` before the intervention month,
    /// `major` at it, `post` afterwards.
    pub fn from_phases(
        phases: PhaseRates,
        intervention_month: usize,
        duration_months: usize,
    ) -> SimResult<Self> {
        phases.validate()?;
        check_duration(duration_months)?;
        if intervention_month < 2 || intervention_month > duration_months - 1 {
            return Err(ConfigError::InterventionMonthOutOfRange {
                month: intervention_month,
                duration: duration_months,
            });
        }

        let pre = StatsHelper::percent_to_unit(phases.organic_drop_pre);
        let major = StatsHelper::percent_to_unit(phases.major_drop);
        let post = StatsHelper::percent_to_unit(phases.organic_drop_post);
        let rates = (1..=duration_months)
            .map(|month| match month.cmp(&intervention_month) {
                std::cmp::Ordering::Less => pre,
                std::cmp::Ordering::Equal => major,
                std::cmp::Ordering::Greater => post,
            })
            .collect();
        Ok(Self { rates })
    }

    /// Wraps already-fractional rates, clamping each into `[0, 1]`.
    pub fn from_fractions(rates: impl IntoIterator<Item = f64>) -> Self {
        Self {
            rates: rates.into_iter().map(StatsHelper::clamp_unit).collect(),
        }
    }

    /// Per-month percentages in month order.
    pub fn from_percentages(percentages: &[f64]) -> SimResult<Self> {
        for &value in percentages {
            check_percent("monthly drop-off rate", value)?;
        }
        Ok(Self::from_fractions(
            percentages.iter().map(|&p| StatsHelper::percent_to_unit(p)),
        ))
    }

    /// Resolves sparse external rows into a full schedule. Months missing
    /// from `rows` default to 0%; bad rows are dropped and reported.
    pub fn from_month_rates(rows: &[MonthRate], duration_months: usize) -> (Self, Vec<DataError>) {
        let mut slots: Vec<Option<f64>> = vec![None; duration_months];
        let mut issues = Vec::new();

        for row in rows {
            let index = match usize::try_from(row.month) {
                Ok(month) if (1..=duration_months).contains(&month) => month - 1,
                _ => {
                    issues.push(DataError::MonthOutOfRange {
                        month: row.month,
                        duration: duration_months,
                    });
                    continue;
                }
            };
            let month = index + 1;
            if slots[index].is_some() {
                issues.push(DataError::DuplicateMonth { month });
                continue;
            }

            let rate = if row.rate_percent.is_nan() {
                0.0
            } else {
                row.rate_percent
            };
            if !(0.0..=100.0).contains(&rate) {
                issues.push(DataError::RateClamped { month, value: rate });
            }
            slots[index] = Some(StatsHelper::percent_to_unit(rate));
        }

        for issue in &issues {
            debug!("drop-off schedule: {}", issue);
        }

        let schedule = Self::from_fractions(slots.into_iter().map(|slot| slot.unwrap_or(0.0)));
        (schedule, issues)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Drop-off fraction for a 1-indexed month.
    pub fn rate(&self, month: usize) -> Option<f64> {
        month.checked_sub(1).and_then(|index| self.rates.get(index).copied())
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.rates
    }

    pub(crate) fn ensure_covers(&self, duration_months: usize) -> SimResult<()> {
        if self.rates.len() == duration_months {
            Ok(())
        } else {
            Err(ConfigError::ScheduleLength {
                expected: duration_months,
                actual: self.rates.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phases(pre: f64, major: f64, post: f64) -> PhaseRates {
        PhaseRates {
            organic_drop_pre: pre,
            major_drop: major,
            organic_drop_post: post,
        }
    }

    #[test]
    fn phases_place_major_drop_at_intervention_month() {
        let schedule = DropoffSchedule::from_phases(phases(5.0, 30.0, 10.0), 3, 6).unwrap();
        assert_eq!(schedule.as_slice(), &[0.05, 0.05, 0.3, 0.1, 0.1, 0.1]);
        assert_eq!(schedule.rate(3), Some(0.3));
        assert_eq!(schedule.rate(0), None);
        assert_eq!(schedule.rate(7), None);
    }

    #[test]
    fn phases_reject_out_of_range_inputs() {
        assert!(DropoffSchedule::from_phases(phases(0.0, 130.0, 0.0), 2, 4).is_err());
        assert!(matches!(
            DropoffSchedule::from_phases(phases(0.0, 30.0, 0.0), 4, 4),
            Err(ConfigError::InterventionMonthOutOfRange { .. })
        ));
        assert!(matches!(
            DropoffSchedule::from_phases(phases(0.0, 30.0, 0.0), 3, usize::MAX / 4),
            Err(ConfigError::DurationTooLong { .. })
        ));
    }

    #[test]
    fn fractions_are_clamped() {
        let schedule = DropoffSchedule::from_fractions([-0.5, 0.25, 1.5, f64::NAN]);
        assert_eq!(schedule.as_slice(), &[0.0, 0.25, 1.0, 0.0]);
    }

    #[test]
    fn missing_months_default_to_zero() {
        let rows = [
            MonthRate {
                month: 2,
                rate_percent: 20.0,
            },
            MonthRate {
                month: 4,
                rate_percent: 50.0,
            },
        ];
        let (schedule, issues) = DropoffSchedule::from_month_rates(&rows, 5);
        assert!(issues.is_empty());
        assert_eq!(schedule.as_slice(), &[0.0, 0.2, 0.0, 0.5, 0.0]);
    }

    #[test]
    fn out_of_range_and_duplicate_rows_are_discarded() {
        let rows = [
            MonthRate {
                month: 0,
                rate_percent: 10.0,
            },
            MonthRate {
                month: 9,
                rate_percent: 10.0,
            },
            MonthRate {
                month: 1,
                rate_percent: 15.0,
            },
            MonthRate {
                month: 1,
                rate_percent: 80.0,
            },
            MonthRate {
                month: 2,
                rate_percent: 140.0,
            },
        ];
        let (schedule, issues) = DropoffSchedule::from_month_rates(&rows, 3);
        assert_eq!(schedule.as_slice(), &[0.15, 1.0, 0.0]);
        assert_eq!(issues.len(), 4);
        assert!(issues.contains(&DataError::DuplicateMonth { month: 1 }));
        assert!(issues.contains(&DataError::RateClamped {
            month: 2,
            value: 140.0
        }));
    }

    #[test]
    fn length_check_reports_mismatch() {
        let schedule = DropoffSchedule::from_fractions([0.1, 0.2]);
        assert_eq!(
            schedule.ensure_covers(3),
            Err(ConfigError::ScheduleLength {
                expected: 3,
                actual: 2
            })
        );
    }
}
