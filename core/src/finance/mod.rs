pub mod recommend;
pub mod series;
pub mod summary;

pub use recommend::{recommend, Recommendation};
pub use series::{monthly_liability, monthly_revenue};
pub use summary::{break_even_learners, summarize, ScenarioSummary};
