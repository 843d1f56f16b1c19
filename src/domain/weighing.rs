// Weighing domain: identify the heaviest of N packages by comparing
// pairs of packages on a balance scale, then choose it.

use std::collections::HashSet;
use std::fmt;

use super::Domain;

pub struct Weighing {
    packages: usize,
}

impl Weighing {
    pub fn new(packages: usize) -> Weighing {
        Weighing { packages }
    }
}

/// A permutation of the weights 1..=N, plus the package chosen so far.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WeighingState {
    pub weights: Vec<usize>,
    pub chosen: Option<usize>,
}

impl fmt::Display for WeighingState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let weights = self
            .weights
            .iter()
            .map(|w| w.to_string())
            .collect::<Vec<String>>()
            .join(",");
        match self.chosen {
            Some(p) => write!(f, "({}:{})", weights, p),
            None => write!(f, "({}:-)", weights),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum WeighingAction {
    /// Put packages i and j on the scale; observe which is lighter.
    Compare(usize, usize),
    /// Commit to a package. Ends the episode: nothing is applicable
    /// after a choice has been made.
    Choose(usize),
}

impl fmt::Display for WeighingAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WeighingAction::Compare(i, j) => write!(f, "compare {}-{}", i, j),
            WeighingAction::Choose(p) => write!(f, "choose {}", p),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum WeighingObs {
    /// Package i weighs less than package j.
    LessThan(usize, usize),
    Nothing,
}

impl fmt::Display for WeighingObs {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WeighingObs::LessThan(i, j) => write!(f, "{} < {}", i, j),
            WeighingObs::Nothing => write!(f, "nothing"),
        }
    }
}

impl Domain for Weighing {
    type State = WeighingState;
    type Action = WeighingAction;
    type Observation = WeighingObs;

    fn applicable(&self, state: &WeighingState) -> Vec<WeighingAction> {
        if state.chosen.is_some() {
            return Vec::new();
        }
        let n = state.weights.len();
        let mut actions = (0..n).map(WeighingAction::Choose).collect::<Vec<_>>();
        for i in 0..n {
            for j in (i + 1)..n {
                actions.push(WeighingAction::Compare(i, j));
            }
        }
        actions
    }

    fn successors(&self, state: &WeighingState, action: &WeighingAction) -> HashSet<WeighingState> {
        match action {
            WeighingAction::Choose(p) => {
                let mut next = state.clone();
                next.chosen = Some(*p);
                [next].iter().cloned().collect()
            }
            // Comparing reveals information but moves nothing.
            WeighingAction::Compare(_, _) => [state.clone()].iter().cloned().collect(),
        }
    }

    fn predecessors(&self, state: &WeighingState, action: &WeighingAction) -> HashSet<WeighingState> {
        match action {
            WeighingAction::Choose(p) => {
                if state.chosen == Some(*p) {
                    let mut prev = state.clone();
                    prev.chosen = None;
                    [prev].iter().cloned().collect()
                } else {
                    HashSet::new()
                }
            }
            WeighingAction::Compare(_, _) => {
                if state.chosen.is_none() {
                    [state.clone()].iter().cloned().collect()
                } else {
                    HashSet::new()
                }
            }
        }
    }

    fn compatible(&self, state: &WeighingState, observation: &WeighingObs) -> bool {
        match observation {
            WeighingObs::LessThan(i, j) => state.weights[*i] < state.weights[*j],
            WeighingObs::Nothing => true,
        }
    }

    fn observations(&self, action: &WeighingAction) -> Vec<WeighingObs> {
        match action {
            WeighingAction::Compare(i, j) => {
                vec![WeighingObs::LessThan(*i, *j), WeighingObs::LessThan(*j, *i)]
            }
            WeighingAction::Choose(_) => vec![WeighingObs::Nothing],
        }
    }

    // One initial state per ordering of the packages, nothing chosen yet.
    fn initial_states(&self) -> HashSet<WeighingState> {
        permutations(self.packages)
            .into_iter()
            .map(|weights| WeighingState { weights, chosen: None })
            .collect()
    }

    // Goal: the chosen package is the one with the maximum weight N.
    // With zero packages no weight equals N, so the goal set is empty.
    fn goal_states(&self) -> HashSet<WeighingState> {
        let n = self.packages;
        permutations(n)
            .into_iter()
            .filter_map(|weights| {
                let heaviest = weights.iter().position(|w| *w == n)?;
                Some(WeighingState { weights, chosen: Some(heaviest) })
            })
            .collect()
    }

    fn actions(&self) -> Vec<WeighingAction> {
        self.applicable(&WeighingState {
            weights: (1..=self.packages).collect(),
            chosen: None,
        })
    }
}

/// All orderings of the weights 1..=n.
fn permutations(n: usize) -> Vec<Vec<usize>> {
    let mut result = Vec::new();
    let mut current = Vec::with_capacity(n);
    let mut used = vec![false; n + 1];
    extend(n, &mut current, &mut used, &mut result);
    result
}

fn extend(n: usize, current: &mut Vec<usize>, used: &mut Vec<bool>, result: &mut Vec<Vec<usize>>) {
    if current.len() == n {
        result.push(current.clone());
        return;
    }
    for w in 1..=n {
        if !used[w] {
            used[w] = true;
            current.push(w);
            extend(n, current, used, result);
            current.pop();
            used[w] = false;
        }
    }
}
