use proptest::prelude::*;
use retentioncore::engine::{simulate, OneTimeIncentive, RecurringIncentive};
use retentioncore::finance::summarize;
use retentioncore::prelude::CohortModel;
use retentioncore::schedule::PhaseRates;
use retentioncore::{DropoffSchedule, ScenarioParams, SimulationConfig};

fn inputs() -> impl Strategy<Value = (SimulationConfig, DropoffSchedule, ScenarioParams)> {
    (2usize..=24)
        .prop_flat_map(|duration| {
            (
                Just(duration + 1),
                2usize..=duration,
                1u64..100_000,
                prop::collection::vec(0.0f64..=1.0, duration + 1),
                0.0f64..=100.0,
                0.0f64..=100.0,
                any::<bool>(),
            )
        })
        .prop_map(
            |(duration, month, learners, rates, effectiveness, redeem_rate, stay_full)| {
                let config = SimulationConfig {
                    initial_learners: learners,
                    duration_months: duration,
                    intervention_month: month,
                    revenue_per_learner_month: 5.0,
                    incentive_cost_per_learner: 5.0,
                    redeemers_stay_full: stay_full,
                };
                (
                    config,
                    DropoffSchedule::from_fractions(rates),
                    ScenarioParams::new("scenario", effectiveness, redeem_rate),
                )
            },
        )
}

proptest! {
    #[test]
    fn trajectory_starts_at_initial_cohort((config, schedule, scenario) in inputs()) {
        let trajectory = simulate(&schedule, &config, &scenario).unwrap();
        prop_assert_eq!(trajectory.len(), config.duration_months);
        prop_assert_eq!(trajectory[0], config.initial_learners as f64);
    }

    #[test]
    fn learner_counts_never_negative((config, schedule, scenario) in inputs()) {
        let trajectory = simulate(&schedule, &config, &scenario).unwrap();
        prop_assert!(trajectory.as_slice().iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn baseline_compounds_schedule((config, schedule, _scenario) in inputs()) {
        let trajectory = simulate(&schedule, &config, &ScenarioParams::baseline()).unwrap();
        let rates = schedule.as_slice();
        for i in 1..trajectory.len() {
            prop_assert_eq!(trajectory[i], trajectory[i - 1] * (1.0 - rates[i - 1]));
        }
    }

    #[test]
    fn simulate_is_deterministic((config, schedule, scenario) in inputs()) {
        let first = simulate(&schedule, &config, &scenario).unwrap();
        let second = simulate(&schedule, &config, &scenario).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn cohort_never_grows((config, schedule, scenario) in inputs()) {
        let trajectory = simulate(&schedule, &config, &scenario).unwrap();
        for pair in trajectory.as_slice().windows(2) {
            prop_assert!(pair[1] <= pair[0] + 1e-9 * pair[0].max(1.0));
        }
    }

    #[test]
    fn scenario_never_trails_baseline((config, schedule, scenario) in inputs()) {
        let baseline = simulate(&schedule, &config, &ScenarioParams::baseline()).unwrap();
        let trajectory = simulate(&schedule, &config, &scenario).unwrap();
        let summary = summarize(&trajectory, &config, &scenario, &baseline);
        prop_assert!(summary.retention_gain >= -1e-9 * baseline.final_count().max(1.0));
        prop_assert!(summary.break_even_learners >= 0.0);
        prop_assert!(summary.incentive_cost == 0.0 || summary.liability == 0.0);
    }

    #[test]
    fn recurring_model_keeps_seed_and_sign((config, schedule, scenario) in inputs()) {
        let trajectory = RecurringIncentive.project(&schedule, &config, &scenario).unwrap();
        prop_assert_eq!(trajectory[0], config.initial_learners as f64);
        prop_assert!(trajectory.as_slice().iter().all(|&v| v >= 0.0));
    }
}

#[test]
fn one_time_model_matches_free_functions() {
    let config = SimulationConfig {
        initial_learners: 1000,
        duration_months: 8,
        intervention_month: 3,
        revenue_per_learner_month: 5.0,
        incentive_cost_per_learner: 5.0,
        redeemers_stay_full: true,
    };
    let schedule = DropoffSchedule::from_phases(
        PhaseRates {
            organic_drop_pre: 5.0,
            major_drop: 30.0,
            organic_drop_post: 10.0,
        },
        3,
        8,
    )
    .unwrap();
    let scenario = ScenarioParams::new("Scenario 2", 100.0, 100.0);

    let baseline = simulate(&schedule, &config, &ScenarioParams::baseline()).unwrap();
    let direct = simulate(&schedule, &config, &scenario).unwrap();
    let via_model = OneTimeIncentive.project(&schedule, &config, &scenario).unwrap();
    assert_eq!(direct, via_model);
    assert_eq!(
        summarize(&direct, &config, &scenario, &baseline),
        OneTimeIncentive.summarize(&via_model, &schedule, &config, &scenario, &baseline)
    );
}
