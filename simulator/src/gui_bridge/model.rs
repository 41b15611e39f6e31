use crate::workflow::runner::{ScenarioOutcome, WorkflowResult};
use retentioncore::finance::{Recommendation, ScenarioSummary};
use serde::{Deserialize, Serialize};

/// Chart-ready series for one scenario.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ScenarioSeries {
    pub name: String,
    pub learners: Vec<f64>,
    pub monthly_revenue: Vec<f64>,
    pub monthly_liability: Vec<f64>,
}

/// Snapshot served to the charting front end.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct VisualizationModel {
    pub months: Vec<usize>,
    pub series: Vec<ScenarioSeries>,
    pub summaries: Vec<ScenarioSummary>,
    pub recommendation: Option<Recommendation>,
    pub notes: Vec<String>,
}

impl From<&ScenarioOutcome> for ScenarioSeries {
    fn from(outcome: &ScenarioOutcome) -> Self {
        Self {
            name: outcome.params.name.clone(),
            learners: outcome.trajectory.as_slice().to_vec(),
            monthly_revenue: outcome.monthly_revenue.clone(),
            monthly_liability: outcome.monthly_liability.clone(),
        }
    }
}

impl From<&WorkflowResult> for VisualizationModel {
    fn from(result: &WorkflowResult) -> Self {
        let outcomes = || std::iter::once(&result.baseline).chain(result.scenarios.iter());
        Self {
            months: (1..=result.config.duration_months).collect(),
            series: outcomes().map(ScenarioSeries::from).collect(),
            summaries: outcomes().map(|o| o.summary.clone()).collect(),
            recommendation: result.recommendation.clone(),
            notes: result.data_issues.iter().map(ToString::to_string).collect(),
        }
    }
}
