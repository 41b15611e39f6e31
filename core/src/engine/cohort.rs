use log::debug;
use serde::{Deserialize, Serialize};
use std::ops::Index;

use crate::finance::series::monthly_liability;
use crate::finance::summary::{summarize, ScenarioSummary};
use crate::math::stats::StatsHelper;
use crate::prelude::{CohortModel, ScenarioParams, SimResult, SimulationConfig};
use crate::schedule::DropoffSchedule;

/// Active learners per month, index 0 = month 1 = the seed cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LearnerTrajectory {
    learners: Vec<f64>,
}

impl LearnerTrajectory {
    pub(crate) fn from_counts(learners: Vec<f64>) -> Self {
        Self { learners }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.learners
    }

    pub fn len(&self) -> usize {
        self.learners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.learners.is_empty()
    }

    /// Learners active in a 1-indexed month.
    pub fn at_month(&self, month: usize) -> Option<f64> {
        month
            .checked_sub(1)
            .and_then(|index| self.learners.get(index).copied())
    }

    /// Learners still active in the final month, zero for an empty trajectory.
    pub fn final_count(&self) -> f64 {
        self.learners.last().copied().unwrap_or(0.0)
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.learners
    }
}

impl Index<usize> for LearnerTrajectory {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.learners[index]
    }
}

/// Projects one scenario month by month.
///
/// The transition out of month `i` uses the drop rate of month `i`. At the
/// intervention month the scenario's effectiveness cuts that month's rate;
/// when redeemers stay to the end, the saved learners are instead retained
/// in proportion to the redemption rate, a one-off injection that follows
/// the ordinary schedule afterwards.
pub fn simulate(
    schedule: &DropoffSchedule,
    config: &SimulationConfig,
    scenario: &ScenarioParams,
) -> SimResult<LearnerTrajectory> {
    config.validate()?;
    scenario.validate()?;
    schedule.ensure_covers(config.duration_months)?;

    let effectiveness = StatsHelper::percent_to_unit(scenario.effectiveness);
    let redeem_rate = StatsHelper::percent_to_unit(scenario.redeem_rate);
    let rates = schedule.as_slice();

    let mut learners = Vec::with_capacity(config.duration_months);
    learners.push(config.initial_learners as f64);

    for month in 1..config.duration_months {
        let previous = learners[month - 1];
        let base_drop = StatsHelper::clamp_unit(rates[month - 1]);

        let next = if month == config.intervention_month {
            if config.redeemers_stay_full {
                let would_have_left = previous * base_drop;
                let saved = would_have_left * effectiveness;
                let redeemed = saved * redeem_rate;
                debug!(
                    "{}: month {} saved {:.2}, redeemed {:.2}",
                    scenario.name, month, saved, redeemed
                );
                previous * (1.0 - base_drop) + redeemed
            } else {
                previous * (1.0 - base_drop * (1.0 - effectiveness))
            }
        } else {
            previous * (1.0 - base_drop)
        };

        learners.push(next.max(0.0));
    }

    Ok(LearnerTrajectory::from_counts(learners))
}

/// Single incentive offered in the configured intervention month.
#[derive(Debug, Clone, Copy, Default)]
pub struct OneTimeIncentive;

impl CohortModel for OneTimeIncentive {
    fn name(&self) -> &'static str {
        "one-time incentive"
    }

    fn project(
        &self,
        schedule: &DropoffSchedule,
        config: &SimulationConfig,
        scenario: &ScenarioParams,
    ) -> SimResult<LearnerTrajectory> {
        simulate(schedule, config, scenario)
    }

    fn summarize(
        &self,
        trajectory: &LearnerTrajectory,
        _schedule: &DropoffSchedule,
        config: &SimulationConfig,
        scenario: &ScenarioParams,
        baseline: &LearnerTrajectory,
    ) -> ScenarioSummary {
        summarize(trajectory, config, scenario, baseline)
    }

    fn monthly_liability(
        &self,
        trajectory: &LearnerTrajectory,
        _schedule: &DropoffSchedule,
        config: &SimulationConfig,
        scenario: &ScenarioParams,
    ) -> Vec<f64> {
        monthly_liability(trajectory, config, scenario)
    }
}
