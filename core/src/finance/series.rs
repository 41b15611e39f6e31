use crate::engine::cohort::LearnerTrajectory;
use crate::math::stats::StatsHelper;
use crate::prelude::{ScenarioParams, SimulationConfig};

/// Revenue earned in each month.
pub fn monthly_revenue(trajectory: &LearnerTrajectory, config: &SimulationConfig) -> Vec<f64> {
    trajectory
        .as_slice()
        .iter()
        .map(|learners| learners * config.revenue_per_learner_month)
        .collect()
}

/// Incentive payout per month: all of it lands in the intervention month.
pub fn monthly_liability(
    trajectory: &LearnerTrajectory,
    config: &SimulationConfig,
    scenario: &ScenarioParams,
) -> Vec<f64> {
    let mut liability = vec![0.0; trajectory.len()];
    if let Some(index) = config.intervention_month.checked_sub(1) {
        if let Some(slot) = liability.get_mut(index) {
            *slot = trajectory[index]
                * StatsHelper::percent_to_unit(scenario.redeem_rate)
                * config.incentive_cost_per_learner;
        }
    }
    liability
}
