// Mastermind domain: break a hidden color code by building guesses one
// position at a time and scoring complete guesses against the code.
// https://en.wikipedia.org/wiki/Mastermind_(board_game)

use std::collections::HashSet;
use std::fmt;

use super::Domain;

pub struct Mastermind {
    code_len: usize,
    colors: u8,
}

impl Mastermind {
    pub fn new(code_len: usize, colors: u8) -> Mastermind {
        Mastermind { code_len, colors }
    }

    fn all_codes(&self) -> Vec<Vec<u8>> {
        let mut result = Vec::new();
        let mut current = Vec::with_capacity(self.code_len);
        self.extend_codes(&mut current, &mut result);
        result
    }

    fn extend_codes(&self, current: &mut Vec<u8>, result: &mut Vec<Vec<u8>>) {
        if current.len() == self.code_len {
            result.push(current.clone());
            return;
        }
        for color in 1..=self.colors {
            current.push(color);
            self.extend_codes(current, result);
            current.pop();
        }
    }

    /// Standard Mastermind scoring: exact-position matches, then
    /// right-color-wrong-position matches among the rest.
    fn score(&self, state: &MastermindState) -> (usize, usize) {
        let exact = state
            .code
            .iter()
            .zip(&state.guess)
            .filter(|(c, g)| **g == Some(**c))
            .count();
        let mut misplaced = 0;
        for color in 1..=self.colors {
            let mut in_code = 0;
            let mut in_guess = 0;
            for (c, g) in state.code.iter().zip(&state.guess) {
                if *g == Some(*c) {
                    continue;
                }
                if *c == color {
                    in_code += 1;
                }
                if *g == Some(color) {
                    in_guess += 1;
                }
            }
            misplaced += in_code.min(in_guess);
        }
        (exact, misplaced)
    }
}

/// Hidden code, the guess built so far (left to right), and whether the
/// current guess has been scored.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MastermindState {
    pub code: Vec<u8>,
    pub guess: Vec<Option<u8>>,
    pub checked: bool,
}

impl fmt::Display for MastermindState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let code = self
            .code
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<String>>()
            .join(" ");
        let guess = self
            .guess
            .iter()
            .map(|g| match g {
                Some(c) => c.to_string(),
                None => String::from("-"),
            })
            .collect::<Vec<String>>()
            .join(" ");
        write!(f, "({} : {} : {})", code, guess, if self.checked { 1 } else { 0 })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MastermindAction {
    /// Write a color into one position of the guess. Position 0 starts a
    /// fresh round: it clears the rest of the guess and is only
    /// applicable once the previous guess has been scored.
    Set(usize, u8),
    /// Score a complete guess against the hidden code.
    Check,
}

impl fmt::Display for MastermindAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MastermindAction::Set(i, c) => write!(f, "set [{}] = {}", i, c),
            MastermindAction::Check => write!(f, "check guess"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum MastermindObs {
    /// Exact-position and right-color-wrong-position counts.
    Score(usize, usize),
    Nothing,
}

impl fmt::Display for MastermindObs {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MastermindObs::Score(r, w) => write!(f, "R{}W{}", r, w),
            MastermindObs::Nothing => write!(f, "nothing"),
        }
    }
}

impl Domain for Mastermind {
    type State = MastermindState;
    type Action = MastermindAction;
    type Observation = MastermindObs;

    fn applicable(&self, state: &MastermindState) -> Vec<MastermindAction> {
        let mut actions = Vec::new();
        if state.guess[self.code_len - 1].is_some() && !state.checked {
            actions.push(MastermindAction::Check);
        }
        for i in 1..self.code_len {
            if state.guess[i].is_none() && state.guess[i - 1].is_some() {
                for color in 1..=self.colors {
                    actions.push(MastermindAction::Set(i, color));
                }
            }
        }
        if state.checked {
            for color in 1..=self.colors {
                actions.push(MastermindAction::Set(0, color));
            }
        }
        actions
    }

    fn successors(&self, state: &MastermindState, action: &MastermindAction) -> HashSet<MastermindState> {
        match action {
            MastermindAction::Set(i, color) => {
                let mut next = state.clone();
                next.guess[*i] = Some(*color);
                next.checked = false;
                if *i == 0 {
                    for g in next.guess.iter_mut().skip(1) {
                        *g = None;
                    }
                }
                [next].iter().cloned().collect()
            }
            MastermindAction::Check => {
                let mut next = state.clone();
                next.checked = true;
                [next].iter().cloned().collect()
            }
        }
    }

    fn predecessors(&self, state: &MastermindState, action: &MastermindAction) -> HashSet<MastermindState> {
        match action {
            MastermindAction::Set(i, color) => {
                let filled_here = state.guess[*i] == Some(*color);
                let next_unfilled = *i == self.code_len - 1 || state.guess[*i + 1].is_none();
                if !(filled_here && next_unfilled && !state.checked) {
                    return HashSet::new();
                }
                if *i == 0 {
                    // Setting position 0 wiped the previous round, so the
                    // predecessor's guess can be any scored guess (or the
                    // blank one).
                    let mut guesses: Vec<Vec<Option<u8>>> = self
                        .all_codes()
                        .into_iter()
                        .map(|code| code.into_iter().map(Some).collect())
                        .collect();
                    guesses.push(vec![None; self.code_len]);
                    guesses
                        .into_iter()
                        .map(|guess| MastermindState {
                            code: state.code.clone(),
                            guess,
                            checked: true,
                        })
                        .collect()
                } else {
                    let mut prev = state.clone();
                    prev.guess[*i] = None;
                    [prev].iter().cloned().collect()
                }
            }
            MastermindAction::Check => {
                if state.guess[self.code_len - 1].is_some() && state.checked {
                    let mut prev = state.clone();
                    prev.checked = false;
                    [prev].iter().cloned().collect()
                } else {
                    HashSet::new()
                }
            }
        }
    }

    fn compatible(&self, state: &MastermindState, observation: &MastermindObs) -> bool {
        match observation {
            MastermindObs::Score(exact, misplaced) => self.score(state) == (*exact, *misplaced),
            MastermindObs::Nothing => true,
        }
    }

    fn observations(&self, action: &MastermindAction) -> Vec<MastermindObs> {
        match action {
            MastermindAction::Set(_, _) => vec![MastermindObs::Nothing],
            MastermindAction::Check => {
                let n = self.code_len;
                let mut result = Vec::new();
                for exact in 0..=n {
                    for misplaced in 0..=(n - exact) {
                        result.push(MastermindObs::Score(exact, misplaced));
                    }
                }
                result
            }
        }
    }

    // One initial state per possible code; the guess starts blank and
    // counts as checked so that a first round can begin.
    fn initial_states(&self) -> HashSet<MastermindState> {
        self.all_codes()
            .into_iter()
            .map(|code| MastermindState {
                code,
                guess: vec![None; self.code_len],
                checked: true,
            })
            .collect()
    }

    // Goal: the guess spells out the code, scored or not.
    fn goal_states(&self) -> HashSet<MastermindState> {
        self.all_codes()
            .into_iter()
            .flat_map(|code| {
                let guess: Vec<Option<u8>> = code.iter().cloned().map(Some).collect();
                vec![
                    MastermindState { code: code.clone(), guess: guess.clone(), checked: false },
                    MastermindState { code, guess, checked: true },
                ]
            })
            .collect()
    }

    fn actions(&self) -> Vec<MastermindAction> {
        let mut actions = Vec::new();
        for i in 0..self.code_len {
            for color in 1..=self.colors {
                actions.push(MastermindAction::Set(i, color));
            }
        }
        actions.push(MastermindAction::Check);
        actions
    }
}
