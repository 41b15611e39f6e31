//! Cohort retention and incentive economics engine.
//!
//! A cohort is projected month by month through a drop-off schedule, once
//! for the baseline and once per incentive scenario. Each projection is
//! then priced into revenue, incentive spend, and break-even figures, and
//! the scenarios are ranked by net revenue.

pub mod engine;
pub mod finance;
pub mod math;
pub mod prelude;
pub mod schedule;
pub mod telemetry;

pub use engine::{simulate, LearnerTrajectory};
pub use finance::{recommend, summarize, ScenarioSummary};
pub use prelude::{
    CohortModel, ConfigError, DataError, ScenarioParams, SimulationConfig, MAX_DURATION_MONTHS,
};
pub use schedule::DropoffSchedule;
