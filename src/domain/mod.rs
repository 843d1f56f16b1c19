// Definition of a partially observable planning domain.

pub mod weighing;
pub mod mastermind;
pub mod numbers;

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

/// A planning problem under partial observability.
///
/// A domain bundles the capability set the search engine needs (applicable
/// actions, successor and predecessor states, observation compatibility,
/// per-action observations) together with the instance itself (initial
/// states, goal states, action roster). States, actions and observations
/// are closed per-domain enums, so the engine never inspects their
/// internals and an out-of-roster action is unrepresentable.
pub trait Domain {
    type State: Clone + Eq + Hash + fmt::Display;
    type Action: Clone + Eq + Hash + fmt::Display;
    type Observation: Clone + PartialEq + fmt::Display;

    /// Actions applicable in a single concrete state.
    fn applicable(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Successor states of a state w.r.t. an action.
    fn successors(&self, state: &Self::State, action: &Self::Action) -> HashSet<Self::State>;

    /// Predecessor states of a state w.r.t. an action. Not used by the
    /// search; kept for external validators and tests. On states where
    /// `action` is applicable this inverts `successors`.
    fn predecessors(&self, state: &Self::State, action: &Self::Action) -> HashSet<Self::State>;

    /// Is the state compatible with the observation?
    fn compatible(&self, state: &Self::State, observation: &Self::Observation) -> bool;

    /// The exhaustive set of observations possible right after an action.
    fn observations(&self, action: &Self::Action) -> Vec<Self::Observation>;

    /// The set of states the true state may initially be.
    fn initial_states(&self) -> HashSet<Self::State>;

    fn goal_states(&self) -> HashSet<Self::State>;

    /// The full action roster. Informational: the search derives usable
    /// actions per belief state, it never consumes the roster directly.
    fn actions(&self) -> Vec<Self::Action>;
}
