use serde::{Deserialize, Serialize};

use crate::engine::cohort::LearnerTrajectory;
use crate::math::stats::StatsHelper;
use crate::prelude::{ScenarioParams, SimulationConfig};

/// Financial outcome of one scenario against the baseline cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub name: String,
    pub total_revenue: f64,
    /// Learners who claim the incentive.
    pub redeemers: f64,
    /// Realized incentive spend; zero when the incentive has no effect.
    pub incentive_cost: f64,
    /// Payout owed to redeemers whether or not the incentive worked.
    pub committed_spend: f64,
    /// Spend with no retention benefit behind it.
    pub liability: f64,
    pub net_revenue: f64,
    pub final_learners: f64,
    pub retention_gain: f64,
    pub retention_gain_pct: f64,
    /// Additional post-intervention learner-months needed to recover the
    /// incentive cost.
    pub break_even_learners: f64,
}

pub fn summarize(
    trajectory: &LearnerTrajectory,
    config: &SimulationConfig,
    scenario: &ScenarioParams,
    baseline: &LearnerTrajectory,
) -> ScenarioSummary {
    let total_revenue = StatsHelper::sum(trajectory.as_slice()) * config.revenue_per_learner_month;

    let learners_at_offer = trajectory.at_month(config.intervention_month).unwrap_or(0.0);
    let redeemers = learners_at_offer * StatsHelper::percent_to_unit(scenario.redeem_rate);
    let committed_spend = redeemers * config.incentive_cost_per_learner;
    let (incentive_cost, liability) = if scenario.is_effective() {
        (committed_spend, 0.0)
    } else {
        (0.0, committed_spend)
    };

    let final_learners = trajectory.final_count();
    let baseline_final = baseline.final_count();
    let retention_gain = final_learners - baseline_final;

    ScenarioSummary {
        name: scenario.name.clone(),
        total_revenue,
        redeemers,
        incentive_cost,
        committed_spend,
        liability,
        net_revenue: total_revenue - incentive_cost,
        final_learners,
        retention_gain,
        retention_gain_pct: StatsHelper::ratio_or_zero(retention_gain, baseline_final) * 100.0,
        break_even_learners: break_even_learners(incentive_cost, config),
    }
}

/// Incentive cost spread over the revenue of the months after the offer.
pub fn break_even_learners(incentive_cost: f64, config: &SimulationConfig) -> f64 {
    let horizon = config.post_intervention_months() as f64;
    StatsHelper::ratio_or_zero(incentive_cost, config.revenue_per_learner_month * horizon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::simulate;
    use crate::schedule::{DropoffSchedule, PhaseRates};

    fn config() -> SimulationConfig {
        SimulationConfig {
            initial_learners: 1000,
            duration_months: 4,
            intervention_month: 2,
            revenue_per_learner_month: 5.0,
            incentive_cost_per_learner: 5.0,
            redeemers_stay_full: true,
        }
    }

    fn schedule() -> DropoffSchedule {
        DropoffSchedule::from_phases(
            PhaseRates {
                organic_drop_pre: 0.0,
                major_drop: 30.0,
                organic_drop_post: 0.0,
            },
            2,
            4,
        )
        .unwrap()
    }

    fn run(scenario: &ScenarioParams) -> (LearnerTrajectory, LearnerTrajectory) {
        let baseline = simulate(&schedule(), &config(), &ScenarioParams::baseline()).unwrap();
        let trajectory = simulate(&schedule(), &config(), scenario).unwrap();
        (trajectory, baseline)
    }

    #[test]
    fn effective_scenario_pays_for_redeemers() {
        let scenario = ScenarioParams::new("Scenario 2", 100.0, 100.0);
        let (trajectory, baseline) = run(&scenario);
        let summary = summarize(&trajectory, &config(), &scenario, &baseline);

        assert_eq!(summary.total_revenue, 20_000.0);
        assert_eq!(summary.redeemers, 1000.0);
        assert_eq!(summary.incentive_cost, 5000.0);
        assert_eq!(summary.liability, 0.0);
        assert_eq!(summary.net_revenue, 15_000.0);
        assert_eq!(summary.retention_gain, 300.0);
        assert!((summary.retention_gain_pct - 300.0 / 700.0 * 100.0).abs() < 1e-9);
        // 5000 / (5 * 2)
        assert_eq!(summary.break_even_learners, 500.0);
    }

    #[test]
    fn zero_effect_spend_is_liability() {
        let scenario = ScenarioParams::new("Scenario 1", 0.0, 50.0);
        let (trajectory, baseline) = run(&scenario);
        let summary = summarize(&trajectory, &config(), &scenario, &baseline);

        assert_eq!(summary.incentive_cost, 0.0);
        assert_eq!(summary.committed_spend, 1000.0 * 0.5 * 5.0);
        assert_eq!(summary.liability, summary.committed_spend);
        assert_eq!(summary.net_revenue, summary.total_revenue);
        assert_eq!(summary.break_even_learners, 0.0);
        assert_eq!(summary.retention_gain, 0.0);
    }

    #[test]
    fn empty_baseline_gives_zero_gain_pct() {
        let empty = LearnerTrajectory::from_counts(vec![10.0, 0.0, 0.0, 0.0]);
        let trajectory = LearnerTrajectory::from_counts(vec![10.0, 5.0, 5.0, 5.0]);
        let summary = summarize(
            &trajectory,
            &config(),
            &ScenarioParams::new("x", 50.0, 50.0),
            &empty,
        );
        assert_eq!(summary.retention_gain, 5.0);
        assert_eq!(summary.retention_gain_pct, 0.0);
    }

    #[test]
    fn break_even_is_zero_without_post_intervention_horizon() {
        let cfg = SimulationConfig {
            intervention_month: 4,
            ..config()
        };
        assert_eq!(break_even_learners(5000.0, &cfg), 0.0);

        let free = SimulationConfig {
            revenue_per_learner_month: 0.0,
            ..config()
        };
        assert_eq!(break_even_learners(5000.0, &free), 0.0);
    }

    #[test]
    fn summary_serializes_numeric_fields() {
        let scenario = ScenarioParams::new("Scenario 2", 100.0, 100.0);
        let (trajectory, baseline) = run(&scenario);
        let summary = summarize(&trajectory, &config(), &scenario, &baseline);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["net_revenue"], 15_000.0);
        assert_eq!(json["name"], "Scenario 2");
    }
}
