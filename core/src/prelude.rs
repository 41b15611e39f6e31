use serde::{Deserialize, Serialize};

use crate::engine::LearnerTrajectory;
use crate::finance::ScenarioSummary;
use crate::schedule::DropoffSchedule;

/// Longest program the engine accepts, in months.
pub const MAX_DURATION_MONTHS: usize = 120;

/// Scalar inputs shared by every scenario of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub initial_learners: u64,
    pub duration_months: usize,
    /// 1-indexed month in which the incentive is offered.
    pub intervention_month: usize,
    pub revenue_per_learner_month: f64,
    pub incentive_cost_per_learner: f64,
    pub redeemers_stay_full: bool,
}

impl SimulationConfig {
    /// Rejects any scalar outside the ranges the engine is defined for.
    pub fn validate(&self) -> SimResult<()> {
        if self.initial_learners == 0 {
            return Err(ConfigError::EmptyCohort);
        }
        check_duration(self.duration_months)?;
        if self.intervention_month < 2 || self.intervention_month > self.duration_months - 1 {
            return Err(ConfigError::InterventionMonthOutOfRange {
                month: self.intervention_month,
                duration: self.duration_months,
            });
        }
        check_amount("revenue_per_learner_month", self.revenue_per_learner_month)?;
        check_amount("incentive_cost_per_learner", self.incentive_cost_per_learner)?;
        Ok(())
    }

    /// Months remaining after the intervention month; zero when the
    /// intervention sits on (or past) the final month.
    pub fn post_intervention_months(&self) -> usize {
        self.duration_months.saturating_sub(self.intervention_month)
    }
}

/// One intervention scenario. Both rates are percentages in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParams {
    pub name: String,
    pub effectiveness: f64,
    pub redeem_rate: f64,
}

impl ScenarioParams {
    pub fn new(name: impl Into<String>, effectiveness: f64, redeem_rate: f64) -> Self {
        Self {
            name: name.into(),
            effectiveness,
            redeem_rate,
        }
    }

    /// The no-intervention reference scenario.
    pub fn baseline() -> Self {
        Self::new("Baseline", 0.0, 0.0)
    }

    pub fn validate(&self) -> SimResult<()> {
        check_percent("effectiveness", self.effectiveness)?;
        check_percent("redeem_rate", self.redeem_rate)?;
        Ok(())
    }

    pub fn is_effective(&self) -> bool {
        self.effectiveness > 0.0
    }
}

/// Fatal parameter errors, raised before any month is simulated.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("initial cohort must contain at least one learner")]
    EmptyCohort,
    #[error("duration must be at least 2 months, got {0}")]
    DurationTooShort(usize),
    #[error("duration must be at most {max} months, got {value}")]
    DurationTooLong { value: usize, max: usize },
    #[error("intervention month {month} outside [2, {}]", .duration.saturating_sub(1))]
    InterventionMonthOutOfRange { month: usize, duration: usize },
    #[error("{name} must be a percentage in [0, 100], got {value}")]
    RateOutOfRange { name: &'static str, value: f64 },
    #[error("{name} must be a non-negative amount, got {value}")]
    NegativeAmount { name: &'static str, value: f64 },
    #[error("schedule covers {actual} months, expected {expected}")]
    ScheduleLength { expected: usize, actual: usize },
}

/// Malformed external schedule input. Always recovered locally.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataError {
    #[error("line {line}: month {raw:?} is not an integer, row discarded")]
    InvalidMonth { line: usize, raw: String },
    #[error("line {line}: drop-off rate {raw:?} is not numeric, using 0%")]
    InvalidRate { line: usize, raw: String },
    #[error("month {month} outside [1, {duration}], row discarded")]
    MonthOutOfRange { month: i64, duration: usize },
    #[error("month {month} listed more than once, keeping first value")]
    DuplicateMonth { month: usize },
    #[error("month {month}: rate {value}% clamped to [0, 100]")]
    RateClamped { month: usize, value: f64 },
}

pub type SimResult<T> = Result<T, ConfigError>;

pub(crate) fn check_duration(duration_months: usize) -> SimResult<()> {
    if duration_months < 2 {
        Err(ConfigError::DurationTooShort(duration_months))
    } else if duration_months > MAX_DURATION_MONTHS {
        Err(ConfigError::DurationTooLong {
            value: duration_months,
            max: MAX_DURATION_MONTHS,
        })
    } else {
        Ok(())
    }
}

pub(crate) fn check_percent(name: &'static str, value: f64) -> SimResult<()> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::RateOutOfRange { name, value })
    }
}

fn check_amount(name: &'static str, value: f64) -> SimResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NegativeAmount { name, value })
    }
}

/// A retention model that projects a cohort and prices its incentive.
pub trait CohortModel {
    fn name(&self) -> &'static str;

    fn project(
        &self,
        schedule: &DropoffSchedule,
        config: &SimulationConfig,
        scenario: &ScenarioParams,
    ) -> SimResult<LearnerTrajectory>;

    fn summarize(
        &self,
        trajectory: &LearnerTrajectory,
        schedule: &DropoffSchedule,
        config: &SimulationConfig,
        scenario: &ScenarioParams,
        baseline: &LearnerTrajectory,
    ) -> ScenarioSummary;

    /// Incentive payout booked in each month.
    fn monthly_liability(
        &self,
        trajectory: &LearnerTrajectory,
        schedule: &DropoffSchedule,
        config: &SimulationConfig,
        scenario: &ScenarioParams,
    ) -> Vec<f64>;
}
