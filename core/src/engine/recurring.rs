use serde::{Deserialize, Serialize};

use crate::engine::cohort::LearnerTrajectory;
use crate::finance::summary::ScenarioSummary;
use crate::math::stats::StatsHelper;
use crate::prelude::{CohortModel, ScenarioParams, SimResult, SimulationConfig};
use crate::schedule::DropoffSchedule;

/// Incentive offered in every month whose drop-off rate is positive.
/// Used with externally supplied schedules that carry several spikes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RecurringIncentive;

impl RecurringIncentive {
    /// Incentive payout per month. A scenario without effect pays every
    /// redeemer; otherwise only the retained share is paid.
    pub fn monthly_cost(
        &self,
        trajectory: &LearnerTrajectory,
        schedule: &DropoffSchedule,
        config: &SimulationConfig,
        scenario: &ScenarioParams,
    ) -> Vec<f64> {
        let effectiveness = StatsHelper::percent_to_unit(scenario.effectiveness);
        let redeem_rate = StatsHelper::percent_to_unit(scenario.redeem_rate);

        trajectory
            .as_slice()
            .iter()
            .zip(schedule.as_slice())
            .map(|(&learners, &drop)| {
                if drop <= 0.0 {
                    return 0.0;
                }
                let redeemers = learners * drop * redeem_rate;
                if scenario.is_effective() {
                    redeemers * effectiveness * config.incentive_cost_per_learner
                } else {
                    redeemers * config.incentive_cost_per_learner
                }
            })
            .collect()
    }
}

impl CohortModel for RecurringIncentive {
    fn name(&self) -> &'static str {
        "recurring incentive"
    }

    fn project(
        &self,
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
            let drop = StatsHelper::clamp_unit(rates[month - 1]);
            let mut next = previous * (1.0 - drop);
            if config.redeemers_stay_full && drop > 0.0 {
                next += previous * drop * redeem_rate * effectiveness;
            }
            learners.push(next.max(0.0));
        }
        Ok(LearnerTrajectory::from_counts(learners))
    }

    fn summarize(
        &self,
        trajectory: &LearnerTrajectory,
        schedule: &DropoffSchedule,
        config: &SimulationConfig,
        scenario: &ScenarioParams,
        baseline: &LearnerTrajectory,
    ) -> ScenarioSummary {
        let monthly_cost = self.monthly_cost(trajectory, schedule, config, scenario);
        let total_cost = StatsHelper::sum(&monthly_cost);
        let redeem_rate = StatsHelper::percent_to_unit(scenario.redeem_rate);
        let redeemers: f64 = trajectory
            .as_slice()
            .iter()
            .zip(schedule.as_slice())
            .map(|(&learners, &drop)| learners * drop * redeem_rate)
            .sum();

        let total_revenue =
            StatsHelper::sum(trajectory.as_slice()) * config.revenue_per_learner_month;
        let retention_gain = trajectory.final_count() - baseline.final_count();
        let horizon = config.duration_months.saturating_sub(1) as f64;

        ScenarioSummary {
            name: scenario.name.clone(),
            total_revenue,
            redeemers,
            incentive_cost: total_cost,
            committed_spend: redeemers * config.incentive_cost_per_learner,
            liability: if scenario.is_effective() { 0.0 } else { total_cost },
            net_revenue: total_revenue - total_cost,
            final_learners: trajectory.final_count(),
            retention_gain,
            retention_gain_pct: StatsHelper::ratio_or_zero(retention_gain, baseline.final_count())
                * 100.0,
            break_even_learners: StatsHelper::ratio_or_zero(
                total_cost,
                config.revenue_per_learner_month * horizon,
            ),
        }
    }

    fn monthly_liability(
        &self,
        trajectory: &LearnerTrajectory,
        schedule: &DropoffSchedule,
        config: &SimulationConfig,
        scenario: &ScenarioParams,
    ) -> Vec<f64> {
        self.monthly_cost(trajectory, schedule, config, scenario)
    }
}
