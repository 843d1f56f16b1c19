// AND-OR search over belief states.
//
// The belief state is the set of states the true state may currently be.
// Action choice is an OR (alternatives are tried until one works out) and
// observation handling is an AND (every observation that can actually
// occur must get a sub-plan). Termination rests on two cuts: a path is
// abandoned when an earlier belief state on it is a subset of the current
// one (no information has been gained), and when it grows past a depth
// bound. Both cuts trade completeness for termination: a returned plan is
// always correct, but a failure is not a proof that no plan exists.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand_pcg::Pcg64;
use tracing::debug;

use crate::domain::Domain;
use crate::plan::Plan;

/// The set of states consistent with everything observed so far.
pub type BeliefState<S> = HashSet<S>;

/// Actions applicable in every state of the belief state. An action is
/// only safe to schedule if it is applicable no matter which member state
/// is real, so this is an intersection, not a union.
pub fn applicable_actions<D: Domain>(
    domain: &D,
    belief: &BeliefState<D::State>,
) -> Vec<D::Action> {
    let first = match belief.iter().next() {
        Some(state) => state,
        None => return Vec::new(),
    };
    domain
        .applicable(first)
        .into_iter()
        .filter(|action| belief.iter().all(|s| domain.applicable(s).contains(action)))
        .collect()
}

/// Union of the successor sets of every member state.
pub fn successor_belief<D: Domain>(
    domain: &D,
    belief: &BeliefState<D::State>,
    action: &D::Action,
) -> BeliefState<D::State> {
    let mut result = HashSet::new();
    for state in belief {
        result.extend(domain.successors(state, action));
    }
    result
}

/// The subset of the belief state compatible with an observation.
pub fn filter_by_observation<D: Domain>(
    domain: &D,
    belief: &BeliefState<D::State>,
    observation: &D::Observation,
) -> BeliefState<D::State> {
    belief
        .iter()
        .filter(|s| domain.compatible(s, observation))
        .cloned()
        .collect()
}

#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Longest path (in actions) the search will follow.
    pub max_depth: usize,
    /// Total belief-state expansions before the search gives up.
    pub max_nodes: usize,
    /// Shuffle the candidate actions at every choice point with a PRNG
    /// seeded from this value. `None` keeps the domain's enumeration
    /// order, which makes runs reproducible.
    pub shuffle_seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> SearchConfig {
        SearchConfig {
            max_depth: 30,
            max_nodes: 1_000_000,
            shuffle_seed: None,
        }
    }
}

/// Outcome of a solve. `Solved(Plan::Empty)` is a genuine success (the
/// initial belief already satisfies the goal), and running out of budget
/// is kept apart from an exhausted search: only `NoPlan` means every
/// alternative within the bounds was actually tried.
#[derive(Clone, Debug)]
pub enum Solution<A, O> {
    Solved(Plan<A, O>),
    NoPlan,
    OutOfBudget,
}

impl<A, O> Solution<A, O> {
    pub fn plan(&self) -> Option<&Plan<A, O>> {
        match self {
            Solution::Solved(plan) => Some(plan),
            _ => None,
        }
    }
}

/// Find a branching plan that drives every initial state of the domain
/// into a goal state, whichever observations come back.
pub fn solve<D: Domain>(domain: &D, config: &SearchConfig) -> Solution<D::Action, D::Observation> {
    let initial = domain.initial_states();
    let goals = domain.goal_states();
    let mut searcher = Searcher {
        domain,
        goals: &goals,
        config,
        rng: config.shuffle_seed.map(new_rng),
        expanded: 0,
        budget_hit: false,
    };
    let mut path = Vec::new();
    match searcher.construct_plan(&initial, &mut path) {
        Some(plan) => Solution::Solved(plan),
        None if searcher.budget_hit => Solution::OutOfBudget,
        None => Solution::NoPlan,
    }
}

struct Searcher<'a, D: Domain> {
    domain: &'a D,
    goals: &'a HashSet<D::State>,
    config: &'a SearchConfig,
    rng: Option<Pcg64>,
    expanded: usize,
    budget_hit: bool,
}

impl<'a, D: Domain> Searcher<'a, D> {
    fn construct_plan(
        &mut self,
        belief: &BeliefState<D::State>,
        path: &mut Vec<BeliefState<D::State>>,
    ) -> Option<Plan<D::Action, D::Observation>> {
        // An empty belief state marks a contradictory branch, never a
        // solved one.
        if belief.is_empty() {
            return None;
        }
        // Every state the true state can be is a goal state: done.
        if belief.is_subset(self.goals) {
            debug!(depth = path.len(), "goals reached");
            return Some(Plan::Empty);
        }
        // Cut the branch if an earlier belief state on this path is a
        // subset of the current one: the current point is no better
        // informed than that one was, so continuing cannot make progress.
        if path.iter().any(|earlier| earlier.is_subset(belief)) {
            debug!(depth = path.len(), "cycle cut");
            return None;
        }
        if path.len() > self.config.max_depth {
            debug!(depth = path.len(), "depth cut");
            return None;
        }
        self.expanded += 1;
        if self.expanded > self.config.max_nodes {
            self.budget_hit = true;
            return None;
        }

        let mut actions = applicable_actions(self.domain, belief);
        if let Some(rng) = self.rng.as_mut() {
            actions.shuffle(rng);
        }
        debug!(depth = path.len(), candidates = actions.len(), "expanding belief state");

        path.push(belief.clone());
        let mut found = None;
        'actions: for action in actions {
            debug!(action = %action, "trying action");
            let next = successor_belief(self.domain, belief, &action);
            let mut branches = Vec::new();
            for observation in self.domain.observations(&action) {
                let narrowed = filter_by_observation(self.domain, &next, &observation);
                // An observation no successor state is compatible with
                // cannot occur here; its branch is simply absent.
                if narrowed.is_empty() {
                    continue;
                }
                match self.construct_plan(&narrowed, path) {
                    Some(subplan) => branches.push((observation, subplan)),
                    None => continue 'actions,
                }
            }
            found = Some(Plan::Node { action, branches });
            break;
        }
        path.pop();
        found
    }
}

/// Fixed-stream Pcg64 so equal seeds give equal action orderings.
fn new_rng(seed: u64) -> Pcg64 {
    Pcg64::new(
        (0xcafef00dd15ea5e5 + seed).into(),
        0xa02bdbf7bb3c0a7ac28fa16a64abf96,
    )
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;
    use std::fmt;

    use super::{applicable_actions, filter_by_observation, solve, successor_belief};
    use super::{SearchConfig, Solution};
    use crate::domain::weighing::Weighing;
    use crate::domain::Domain;
    use crate::plan::Plan;

    // A two-state toy domain: `spin` leaves everything unchanged, `jump`
    // moves to the goal state but only exists when enabled. With `spin`
    // alone the belief state never shrinks, which exercises the cycle cut.
    struct Toy {
        jump_enabled: bool,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    struct ToyState(u8);

    impl fmt::Display for ToyState {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "s{}", self.0)
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    enum ToyAction {
        Spin,
        Jump,
    }

    impl fmt::Display for ToyAction {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            match self {
                ToyAction::Spin => write!(f, "spin"),
                ToyAction::Jump => write!(f, "jump"),
            }
        }
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Nothing;

    impl fmt::Display for Nothing {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "nothing")
        }
    }

    impl Domain for Toy {
        type State = ToyState;
        type Action = ToyAction;
        type Observation = Nothing;

        fn applicable(&self, _state: &ToyState) -> Vec<ToyAction> {
            let mut actions = vec![ToyAction::Spin];
            if self.jump_enabled {
                actions.push(ToyAction::Jump);
            }
            actions
        }

        fn successors(&self, state: &ToyState, action: &ToyAction) -> HashSet<ToyState> {
            match action {
                ToyAction::Spin => [state.clone()].iter().cloned().collect(),
                ToyAction::Jump => [ToyState(9)].iter().cloned().collect(),
            }
        }

        fn predecessors(&self, state: &ToyState, action: &ToyAction) -> HashSet<ToyState> {
            match action {
                ToyAction::Spin => [state.clone()].iter().cloned().collect(),
                ToyAction::Jump => {
                    if state.0 == 9 {
                        vec![ToyState(0), ToyState(1), ToyState(9)].into_iter().collect()
                    } else {
                        HashSet::new()
                    }
                }
            }
        }

        fn compatible(&self, _state: &ToyState, _observation: &Nothing) -> bool {
            true
        }

        fn observations(&self, _action: &ToyAction) -> Vec<Nothing> {
            vec![Nothing]
        }

        fn initial_states(&self) -> HashSet<ToyState> {
            vec![ToyState(0), ToyState(1)].into_iter().collect()
        }

        fn goal_states(&self) -> HashSet<ToyState> {
            [ToyState(9)].iter().cloned().collect()
        }

        fn actions(&self) -> Vec<ToyAction> {
            self.applicable(&ToyState(0))
        }
    }

    #[test]
    fn test_goal_already_satisfied() {
        // Initial belief inside the goal set: the empty plan, immediately.
        struct Done;
        impl Domain for Done {
            type State = ToyState;
            type Action = ToyAction;
            type Observation = Nothing;
            fn applicable(&self, _s: &ToyState) -> Vec<ToyAction> {
                vec![ToyAction::Spin]
            }
            fn successors(&self, s: &ToyState, _a: &ToyAction) -> HashSet<ToyState> {
                [s.clone()].iter().cloned().collect()
            }
            fn predecessors(&self, s: &ToyState, _a: &ToyAction) -> HashSet<ToyState> {
                [s.clone()].iter().cloned().collect()
            }
            fn compatible(&self, _s: &ToyState, _o: &Nothing) -> bool {
                true
            }
            fn observations(&self, _a: &ToyAction) -> Vec<Nothing> {
                vec![Nothing]
            }
            fn initial_states(&self) -> HashSet<ToyState> {
                [ToyState(3)].iter().cloned().collect()
            }
            fn goal_states(&self) -> HashSet<ToyState> {
                vec![ToyState(3), ToyState(4)].into_iter().collect()
            }
            fn actions(&self) -> Vec<ToyAction> {
                vec![ToyAction::Spin]
            }
        }

        match solve(&Done, &SearchConfig::default()) {
            Solution::Solved(plan) => {
                assert_eq!(plan.size(), 0);
                assert_eq!(plan.depth(), 0);
            }
            other => panic!("expected empty plan, got {:?}", other),
        }
    }

    #[test]
    fn test_cycle_cut_terminates() {
        // Only `spin` is available: no plan, and the cycle cut must stop
        // the search long before the node budget runs out.
        match solve(&Toy { jump_enabled: false }, &SearchConfig::default()) {
            Solution::NoPlan => {}
            other => panic!("expected NoPlan, got {:?}", other),
        }
    }

    #[test]
    fn test_cycle_cut_leaves_alternatives() {
        // With `jump` also available the search must still find a plan.
        let toy = Toy { jump_enabled: true };
        match solve(&toy, &SearchConfig::default()) {
            Solution::Solved(plan) => {
                let goals = toy.goal_states();
                for state in toy.initial_states() {
                    assert!(plan.validate(&toy, &state, &goals));
                }
            }
            other => panic!("expected a plan, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_budget_is_not_no_plan() {
        let config = SearchConfig { max_nodes: 1, ..SearchConfig::default() };
        match solve(&Weighing::new(3), &config) {
            Solution::OutOfBudget => {}
            other => panic!("expected OutOfBudget, got {:?}", other),
        }
    }

    #[test]
    fn test_transition_layer() {
        let toy = Toy { jump_enabled: true };
        let belief = toy.initial_states();

        let actions = applicable_actions(&toy, &belief);
        assert_eq!(actions.len(), 2);

        let next = successor_belief(&toy, &belief, &ToyAction::Jump);
        assert_eq!(next, toy.goal_states());

        let narrowed = filter_by_observation(&toy, &belief, &Nothing);
        assert_eq!(narrowed, belief);

        let empty = filter_by_observation(&toy, &HashSet::new(), &Nothing);
        assert!(empty.is_empty());
        assert!(applicable_actions(&toy, &empty).is_empty());
    }

    #[test]
    fn test_empty_initial_belief_fails() {
        struct Vacuous;
        impl Domain for Vacuous {
            type State = ToyState;
            type Action = ToyAction;
            type Observation = Nothing;
            fn applicable(&self, _s: &ToyState) -> Vec<ToyAction> {
                Vec::new()
            }
            fn successors(&self, _s: &ToyState, _a: &ToyAction) -> HashSet<ToyState> {
                HashSet::new()
            }
            fn predecessors(&self, _s: &ToyState, _a: &ToyAction) -> HashSet<ToyState> {
                HashSet::new()
            }
            fn compatible(&self, _s: &ToyState, _o: &Nothing) -> bool {
                true
            }
            fn observations(&self, _a: &ToyAction) -> Vec<Nothing> {
                vec![Nothing]
            }
            fn initial_states(&self) -> HashSet<ToyState> {
                HashSet::new()
            }
            fn goal_states(&self) -> HashSet<ToyState> {
                [ToyState(9)].iter().cloned().collect()
            }
            fn actions(&self) -> Vec<ToyAction> {
                Vec::new()
            }
        }

        // An empty belief is vacuously a subset of the goals, but it must
        // read as failure, not success.
        match solve(&Vacuous, &SearchConfig::default()) {
            Solution::NoPlan => {}
            other => panic!("expected NoPlan, got {:?}", other),
        }
    }

    #[test]
    fn test_weighing_two_packages() {
        let domain = Weighing::new(2);
        let plan = match solve(&domain, &SearchConfig::default()) {
            Solution::Solved(plan) => plan,
            other => panic!("expected a plan, got {:?}", other),
        };

        // The only working shape: compare the two packages, then choose
        // the heavier one on each branch. Three action nodes, two per
        // execution path.
        assert_eq!(plan.size(), 3);
        assert_eq!(plan.depth(), 2);
        match &plan {
            Plan::Node { branches, .. } => assert_eq!(branches.len(), 2),
            Plan::Empty => panic!("expected an action node"),
        }

        let goals = domain.goal_states();
        for state in domain.initial_states() {
            assert!(plan.validate(&domain, &state, &goals));
        }
    }

    #[test]
    fn test_shuffled_search_is_still_sound() {
        let domain = Weighing::new(3);
        for seed in 0..5 {
            let config = SearchConfig { shuffle_seed: Some(seed), ..SearchConfig::default() };
            let solution = solve(&domain, &config);
            let plan = solution.plan().expect("weighing(3) is solvable");
            let goals = domain.goal_states();
            for state in domain.initial_states() {
                assert!(plan.validate(&domain, &state, &goals));
            }
        }
    }

    #[test]
    fn test_plan_shape_invariant() {
        let domain = Weighing::new(3);
        let solution = solve(&domain, &SearchConfig::default());
        let plan = solution.plan().expect("weighing(3) is solvable");
        check_shape(&domain, plan);
    }

    fn check_shape<D: Domain>(domain: &D, plan: &Plan<D::Action, D::Observation>) {
        if let Plan::Node { action, branches } = plan {
            assert!(!branches.is_empty());
            let possible = domain.observations(action);
            for (i, (observation, subplan)) in branches.iter().enumerate() {
                assert!(possible.contains(observation));
                assert!(branches[..i].iter().all(|(o, _)| o != observation));
                check_shape(domain, subplan);
            }
        }
    }
}
