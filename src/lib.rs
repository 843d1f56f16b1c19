// Contingent planning under partial observability.
//
// The solver works on belief states (sets of states the true state may
// be) and produces branching plans: trees of actions whose branches are
// selected by the observations made along the way. Problem instances
// plug in through the `Domain` trait; three instances ship with the
// crate (weighing, mastermind, numbers).

pub mod domain;
pub mod plan;
pub mod search;

pub use crate::domain::Domain;
pub use crate::plan::Plan;
pub use crate::search::{
    applicable_actions, filter_by_observation, solve, successor_belief, BeliefState,
    SearchConfig, Solution,
};
