use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use retentioncore::engine::LearnerTrajectory;
use retentioncore::finance::{monthly_revenue, recommend, Recommendation, ScenarioSummary};
use retentioncore::prelude::{CohortModel, DataError, ScenarioParams, SimulationConfig};
use retentioncore::schedule::DropoffSchedule;
use retentioncore::telemetry::{LogManager, MetricsRecorder, RunCounts};
use serde::Serialize;

/// Projection and pricing of a single scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub params: ScenarioParams,
    pub trajectory: LearnerTrajectory,
    pub summary: ScenarioSummary,
    pub monthly_revenue: Vec<f64>,
    pub monthly_liability: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowResult {
    pub model: &'static str,
    pub config: SimulationConfig,
    pub schedule: DropoffSchedule,
    pub baseline: ScenarioOutcome,
    pub scenarios: Vec<ScenarioOutcome>,
    pub recommendation: Option<Recommendation>,
    pub data_issues: Vec<DataError>,
}

/// Runs the baseline plus every declared scenario through one engine.
pub struct Runner {
    metrics: MetricsRecorder,
    logger: LogManager,
}

impl Runner {
    pub fn new() -> Self {
        Self {
            metrics: MetricsRecorder::new(),
            logger: LogManager::new("runner"),
        }
    }

    pub fn execute(&self, workflow: &WorkflowConfig) -> anyhow::Result<WorkflowResult> {
        let config = workflow.to_simulation_config();
        let validation = config.validate().context("validating simulation config");
        let validation = validation.and_then(|_| {
            workflow.scenarios.iter().try_for_each(|scenario| {
                scenario
                    .validate()
                    .with_context(|| format!("validating scenario {:?}", scenario.name))
            })
        });
        if let Err(err) = validation {
            self.metrics.record_rejection();
            return Err(err);
        }

        let (schedule, data_issues) = workflow.resolve_schedule().map_err(|err| {
            self.metrics.record_rejection();
            err
        })?;
        self.metrics.record_repairs(data_issues.len());
        for issue in &data_issues {
            self.logger.flag(&format!("schedule row repaired: {}", issue));
        }

        let model = workflow.model.build();
        let baseline_params = ScenarioParams::baseline();
        let baseline_trajectory = model
            .project(&schedule, &config, &baseline_params)
            .context("simulating baseline")?;
        let baseline = outcome(
            model.as_ref(),
            &schedule,
            &config,
            baseline_params,
            baseline_trajectory.clone(),
            &baseline_trajectory,
        );

        let scenarios = workflow
            .scenarios
            .iter()
            .map(|params| -> anyhow::Result<ScenarioOutcome> {
                let trajectory = model
                    .project(&schedule, &config, params)
                    .with_context(|| format!("simulating scenario {:?}", params.name))?;
                Ok(outcome(
                    model.as_ref(),
                    &schedule,
                    &config,
                    params.clone(),
                    trajectory,
                    &baseline_trajectory,
                ))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        self.metrics.record_scenarios(scenarios.len() + 1);

        let summaries: Vec<ScenarioSummary> =
            scenarios.iter().map(|o| o.summary.clone()).collect();
        let recommendation = recommend(&summaries);
        if let Some(picks) = &recommendation {
            self.logger.record(&format!(
                "{} run over {} months: best {}, worst {}",
                model.name(),
                config.duration_months,
                picks.best_name,
                picks.worst_name
            ));
        }

        Ok(WorkflowResult {
            model: model.name(),
            config,
            schedule,
            baseline,
            scenarios,
            recommendation,
            data_issues,
        })
    }

    pub fn metrics(&self) -> RunCounts {
        self.metrics.snapshot()
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

fn outcome(
    model: &dyn CohortModel,
    schedule: &DropoffSchedule,
    config: &SimulationConfig,
    params: ScenarioParams,
    trajectory: LearnerTrajectory,
    baseline: &LearnerTrajectory,
) -> ScenarioOutcome {
    let summary = model.summarize(&trajectory, schedule, config, &params, baseline);
    let monthly_liability = model.monthly_liability(&trajectory, schedule, config, &params);
    ScenarioOutcome {
        monthly_revenue: monthly_revenue(&trajectory, config),
        monthly_liability,
        summary,
        params,
        trajectory,
    }
}
