use anyhow::Context;
use retentioncore::engine::{OneTimeIncentive, RecurringIncentive};
use retentioncore::prelude::{CohortModel, DataError, ScenarioParams, SimulationConfig};
use retentioncore::schedule::{parse_schedule_csv, DropoffSchedule, PhaseRates};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    #[default]
    OneTime,
    Recurring,
}

impl ModelKind {
    pub fn build(self) -> Box<dyn CohortModel + Send + Sync> {
        match self {
            ModelKind::OneTime => Box::new(OneTimeIncentive),
            ModelKind::Recurring => Box::new(RecurringIncentive),
        }
    }
}

/// Where the monthly drop-off rates come from. Rates are percentages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ScheduleSource {
    Phases(PhaseRates),
    Rates { monthly: Vec<f64> },
    Csv { path: PathBuf },
    /// `Month,Drop-off Rate` rows supplied inline.
    CsvText { text: String },
}

impl ScheduleSource {
    pub fn reads_local_file(&self) -> bool {
        matches!(self, ScheduleSource::Csv { .. })
    }
}

pub const DEFAULT_PHASES: PhaseRates = PhaseRates {
    organic_drop_pre: 0.0,
    major_drop: 30.0,
    organic_drop_post: 0.0,
};

impl Default for ScheduleSource {
    fn default() -> Self {
        ScheduleSource::Phases(DEFAULT_PHASES)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub initial_learners: u64,
    pub duration_months: usize,
    pub intervention_month: usize,
    pub revenue_per_learner_month: f64,
    pub incentive_cost_per_learner: f64,
    pub redeemers_stay_full: bool,
    pub model: ModelKind,
    pub schedule: ScheduleSource,
    pub scenarios: Vec<ScenarioParams>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            initial_learners: 1000,
            duration_months: 8,
            intervention_month: 3,
            revenue_per_learner_month: 5.0,
            incentive_cost_per_learner: 5.0,
            redeemers_stay_full: true,
            model: ModelKind::OneTime,
            schedule: ScheduleSource::default(),
            scenarios: vec![
                ScenarioParams::new("Scenario 1", 0.0, 50.0),
                ScenarioParams::new("Scenario 2", 100.0, 100.0),
            ],
        }
    }
}

impl WorkflowConfig {
    /// Loads a YAML workflow. A relative CSV schedule path is resolved
    /// against the workflow file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let mut config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;

        if let ScheduleSource::Csv { path: csv_path } = &mut config.schedule {
            if csv_path.is_relative() {
                if let Some(parent) = path_ref.parent() {
                    *csv_path = parent.join(&*csv_path);
                }
            }
        }
        Ok(config)
    }

    pub fn to_simulation_config(&self) -> SimulationConfig {
        SimulationConfig {
            initial_learners: self.initial_learners,
            duration_months: self.duration_months,
            intervention_month: self.intervention_month,
            revenue_per_learner_month: self.revenue_per_learner_month,
            incentive_cost_per_learner: self.incentive_cost_per_learner,
            redeemers_stay_full: self.redeemers_stay_full,
        }
    }

    /// Builds the drop-off schedule, returning any rows that were repaired
    /// or discarded along the way.
    pub fn resolve_schedule(&self) -> anyhow::Result<(DropoffSchedule, Vec<DataError>)> {
        match &self.schedule {
            ScheduleSource::Phases(phases) => {
                let schedule = DropoffSchedule::from_phases(
                    *phases,
                    self.intervention_month,
                    self.duration_months,
                )
                .context("building phase schedule")?;
                Ok((schedule, Vec::new()))
            }
            ScheduleSource::Rates { monthly } => {
                if monthly.len() != self.duration_months {
                    anyhow::bail!(
                        "rate schedule lists {} months, program runs {}",
                        monthly.len(),
                        self.duration_months
                    );
                }
                let schedule =
                    DropoffSchedule::from_percentages(monthly).context("building rate schedule")?;
                Ok((schedule, Vec::new()))
            }
            ScheduleSource::Csv { path } => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading schedule csv {}", path.display()))?;
                Ok(parse_schedule_csv(&text).into_schedule(self.duration_months))
            }
            ScheduleSource::CsvText { text } => {
                Ok(parse_schedule_csv(text).into_schedule(self.duration_months))
            }
        }
    }
}
