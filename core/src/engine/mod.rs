pub mod cohort;
pub mod recurring;

pub use cohort::{simulate, LearnerTrajectory, OneTimeIncentive};
pub use recurring::RecurringIncentive;
