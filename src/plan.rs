// Branching (contingent) plans.
//
// A plan is a tree with two kinds of nodes: the empty plan, where
// execution ends, and an action node carrying one sub-plan per
// observation that can actually occur after the action. Branch keys are
// exactly the possible observations, minus those no reachable state is
// compatible with.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::domain::Domain;

#[derive(Clone, Debug)]
pub enum Plan<A, O> {
    Empty,
    Node {
        action: A,
        branches: Vec<(O, Plan<A, O>)>,
    },
}

impl<A, O> Plan<A, O> {
    /// Number of action nodes in the plan.
    pub fn size(&self) -> usize {
        match self {
            Plan::Empty => 0,
            Plan::Node { branches, .. } => {
                1 + branches.iter().map(|(_, p)| p.size()).sum::<usize>()
            }
        }
    }

    /// Highest number of actions on any path through the plan.
    pub fn depth(&self) -> usize {
        match self {
            Plan::Empty => 0,
            Plan::Node { branches, .. } => {
                1 + branches.iter().map(|(_, p)| p.depth()).max().unwrap_or(0)
            }
        }
    }
}

impl<A: fmt::Display, O: fmt::Display> Plan<A, O> {
    /// Indented text rendering, one line per entry. The observation label
    /// is omitted when a node has a single branch, since it cannot
    /// discriminate anything there.
    pub fn to_lines(&self) -> Vec<String> {
        match self {
            Plan::Empty => Vec::new(),
            Plan::Node { action, branches } => {
                let mut lines = vec![action.to_string()];
                for (observation, subplan) in branches {
                    if branches.len() > 1 {
                        lines.push(format!("  {}", observation));
                    }
                    for line in subplan.to_lines() {
                        lines.push(format!("    {}", line));
                    }
                }
                lines
            }
        }
    }
}

impl<A, O> Plan<A, O>
where
    A: Clone + Eq + std::hash::Hash + fmt::Display,
    O: Clone + PartialEq + fmt::Display,
{
    /// Replay the plan from a concrete state and test that every possible
    /// execution ends in a goal state. This is the ground-truth
    /// correctness criterion: a plan solves an instance iff `validate`
    /// holds for every initial state.
    pub fn validate<D>(&self, domain: &D, state: &D::State, goals: &HashSet<D::State>) -> bool
    where
        D: Domain<Action = A, Observation = O>,
    {
        match self {
            Plan::Empty => goals.contains(state),
            Plan::Node { action, branches } => {
                for next in domain.successors(state, action) {
                    let mut covered = false;
                    for (observation, subplan) in branches {
                        if domain.compatible(&next, observation) {
                            if !subplan.validate(domain, &next, goals) {
                                return false;
                            }
                            covered = true;
                        }
                    }
                    if !covered {
                        debug!(state = %next, action = %action,
                               "plan covers no observation for this outcome");
                        return false;
                    }
                }
                true
            }
        }
    }
}
