// Numbers domain: a hidden number drawn from 0..=5 must be driven to
// exactly 1. The three moves carry different side information: after
// Minus1 the number's primality is revealed, after Plus2 its parity,
// after Mod2 nothing.

use std::collections::HashSet;
use std::fmt;

use super::Domain;

// Every value reachable from 0..=5 stays within 0..=7, and the
// prime/composite classes below partition exactly that range (0 and 1
// count as prime here).
const PRIMES: [i64; 6] = [0, 1, 2, 3, 5, 7];
const COMPOSITES: [i64; 2] = [4, 6];

pub struct Numbers;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NumberState(pub i64);

impl fmt::Display for NumberState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NumberAction {
    Minus1,
    Plus2,
    Mod2,
}

impl fmt::Display for NumberAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NumberAction::Minus1 => write!(f, "minus 1"),
            NumberAction::Plus2 => write!(f, "plus 2"),
            NumberAction::Mod2 => write!(f, "mod 2"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NumberObs {
    Prime,
    Composite,
    Odd,
    Even,
    Nothing,
}

impl fmt::Display for NumberObs {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NumberObs::Prime => write!(f, "prime"),
            NumberObs::Composite => write!(f, "composite"),
            NumberObs::Odd => write!(f, "odd"),
            NumberObs::Even => write!(f, "even"),
            NumberObs::Nothing => write!(f, "nothing"),
        }
    }
}

impl Domain for Numbers {
    type State = NumberState;
    type Action = NumberAction;
    type Observation = NumberObs;

    fn applicable(&self, state: &NumberState) -> Vec<NumberAction> {
        let n = state.0;
        let mut actions = Vec::new();
        if (1..=7).contains(&n) {
            actions.push(NumberAction::Minus1);
        }
        if (0..=5).contains(&n) {
            actions.push(NumberAction::Plus2);
        }
        if (1..=7).contains(&n) {
            actions.push(NumberAction::Mod2);
        }
        actions
    }

    fn successors(&self, state: &NumberState, action: &NumberAction) -> HashSet<NumberState> {
        let next = match action {
            NumberAction::Minus1 => state.0 - 1,
            NumberAction::Plus2 => state.0 + 2,
            NumberAction::Mod2 => state.0 % 2,
        };
        [NumberState(next)].iter().cloned().collect()
    }

    fn predecessors(&self, state: &NumberState, action: &NumberAction) -> HashSet<NumberState> {
        match action {
            NumberAction::Minus1 => {
                if state.0 > 6 {
                    HashSet::new()
                } else {
                    [NumberState(state.0 + 1)].iter().cloned().collect()
                }
            }
            NumberAction::Plus2 => {
                if state.0 < 2 {
                    HashSet::new()
                } else {
                    [NumberState(state.0 - 2)].iter().cloned().collect()
                }
            }
            NumberAction::Mod2 => {
                let sources = if state.0 == 0 { [0, 2, 4, 6] } else { [1, 3, 5, 7] };
                sources.iter().map(|n| NumberState(*n)).collect()
            }
        }
    }

    fn compatible(&self, state: &NumberState, observation: &NumberObs) -> bool {
        match observation {
            NumberObs::Prime => PRIMES.contains(&state.0),
            NumberObs::Composite => COMPOSITES.contains(&state.0),
            NumberObs::Odd => state.0 % 2 == 1,
            NumberObs::Even => state.0 % 2 == 0,
            NumberObs::Nothing => true,
        }
    }

    fn observations(&self, action: &NumberAction) -> Vec<NumberObs> {
        match action {
            NumberAction::Minus1 => vec![NumberObs::Prime, NumberObs::Composite],
            NumberAction::Plus2 => vec![NumberObs::Odd, NumberObs::Even],
            NumberAction::Mod2 => vec![NumberObs::Nothing],
        }
    }

    fn initial_states(&self) -> HashSet<NumberState> {
        (0..=5).map(NumberState).collect()
    }

    fn goal_states(&self) -> HashSet<NumberState> {
        [NumberState(1)].iter().cloned().collect()
    }

    fn actions(&self) -> Vec<NumberAction> {
        vec![NumberAction::Minus1, NumberAction::Plus2, NumberAction::Mod2]
    }
}
