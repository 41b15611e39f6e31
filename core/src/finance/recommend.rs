use serde::{Deserialize, Serialize};

use crate::finance::summary::ScenarioSummary;

/// Best and worst intervention scenarios by net revenue.
///
/// Ranking uses `net_revenue` only. A scenario with zero effectiveness
/// books its payout as `liability`, not as `incentive_cost`, so that spend
/// does not lower its rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub best: usize,
    pub best_name: String,
    pub worst: usize,
    pub worst_name: String,
}

/// Picks the highest and lowest `net_revenue` among `candidates`, which
/// must not include the baseline. On a tie the earliest scenario wins for
/// both picks.
pub fn recommend(candidates: &[ScenarioSummary]) -> Option<Recommendation> {
    let first = candidates.first()?;
    let (mut best, mut worst) = (0, 0);
    let (mut best_net, mut worst_net) = (first.net_revenue, first.net_revenue);

    for (index, summary) in candidates.iter().enumerate().skip(1) {
        if summary.net_revenue > best_net {
            best = index;
            best_net = summary.net_revenue;
        }
        if summary.net_revenue < worst_net {
            worst = index;
            worst_net = summary.net_revenue;
        }
    }

    Some(Recommendation {
        best,
        best_name: candidates[best].name.clone(),
        worst,
        worst_name: candidates[worst].name.clone(),
    })
}
