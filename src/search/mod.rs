//! Bandit-guided local search.
//!
//! - [`BanditStats`] — UCB1 operator selection statistics
//! - [`OperatorKind`] and the perturbation operators in [`operators`]
//! - [`improve_route`] / [`improve_route_with`] / [`improve_route_at`] —
//!   the improvement loop with pluggable [`RewardPolicy`]

mod bandit;
mod improve;
pub mod operators;

pub use bandit::BanditStats;
pub use improve::{
    improve_route, improve_route_at, improve_route_with, AcceptanceReward, ImprovementReward,
    RewardPolicy, SearchConfig,
};
pub use operators::OperatorKind;
