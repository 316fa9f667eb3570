// Copyright 2026 the ssp authors
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Backward graph analyses: connectivity to a target set, minimum edge-step
//! distance, and the fixed-point sub-MDP pruning that identifies the states
//! from which the target is reached with probability 1.

use std::collections::VecDeque;

use fxhash::FxHashSet;
use log::{debug, trace};

use crate::model::Mdp;

/// The result of the Pr^max(diamond T) = 1 fixed point: the surviving
/// states, and for each of them the actions that stay entirely inside the
/// surviving sub-MDP.
#[derive(Debug, Clone)]
pub struct AlmostSureOne {
    survives: Vec<bool>,
    /// `safe_actions[s]` lists the *positions* in `mdp.act(s)` (not raw
    /// action ids) whose every successor still survives, mirroring how
    /// [`crate::model::Mdp::alpha_predecessors`] addresses enablings.
    safe_actions: Vec<Vec<usize>>,
}

impl AlmostSureOne {
    /// Whether `s` belongs to the Pr^max = 1 set.
    pub fn contains(&self, s: usize) -> bool {
        self.survives[s]
    }

    /// The positions within `A(s)` whose actions keep every successor in the
    /// surviving set, i.e. the "safe" actions used as `act_max(s)` for
    /// states already known to have probability 1.
    pub fn safe_actions(&self, s: usize) -> &[usize] {
        &self.safe_actions[s]
    }

    /// The number of states in the set.
    pub fn len(&self) -> usize {
        self.survives.iter().filter(|&&b| b).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Backward BFS from `targets`: which states can reach the target set, and
/// via how many graph edges (ignoring probabilities and weights) at
/// minimum.
///
/// Returns `(reachable, distance)` where `distance[s]` is only meaningful
/// when `reachable[s]` is true.
pub fn backward_reachability(mdp: &Mdp, targets: &[usize]) -> (Vec<bool>, Vec<usize>) {
    let n = mdp.number_of_states();
    let mut reachable = vec![false; n];
    let mut distance = vec![usize::MAX; n];
    let mut queue = VecDeque::new();

    for &t in targets {
        if !reachable[t] {
            reachable[t] = true;
            distance[t] = 0;
            queue.push_back(t);
        }
    }

    trace!("backward_reachability: seeded frontier with {} target state(s)", queue.len());
    while let Some(s) = queue.pop_front() {
        for &p in mdp.pred(s) {
            if !reachable[p] {
                reachable[p] = true;
                distance[p] = distance[s] + 1;
                queue.push_back(p);
            }
        }
        trace!("backward_reachability: frontier size {} after expanding state {}", queue.len(), s);
    }

    debug!(
        "backward_reachability: {} of {} state(s) reach the target set",
        reachable.iter().filter(|&&b| b).count(),
        n
    );
    (reachable, distance)
}

/// Computes the Pr^max(diamond T) = 1 set via iterative sub-MDP pruning
/// (§4.3): a state survives if it is a target or has at least one action
/// all of whose successors survive, and the candidate set is seeded by
/// backward connectivity to T and shrunk until stable.
pub fn almost_sure_reachability(mdp: &Mdp, targets: &[usize]) -> AlmostSureOne {
    let n = mdp.number_of_states();
    let target_set: FxHashSet<usize> = targets.iter().copied().collect();

    let (mut connected, _) = backward_reachability(mdp, targets);

    loop {
        let mut removed_this_pass = Vec::new();
        let mut state_has_safe_action = vec![false; n];
        for s in 0..n {
            if !connected[s] {
                continue;
            }
            let safe = mdp
                .alpha_successors(s)
                .any(|(_, distribution)| distribution.iter().all(|&(succ, _)| connected[succ]));
            state_has_safe_action[s] = safe;
        }

        for s in 0..n {
            if connected[s] && !target_set.contains(&s) && !state_has_safe_action[s] {
                connected[s] = false;
                removed_this_pass.push(s);
            }
        }

        debug!(
            "almost_sure_reachability: removed {} state(s) as unsafe in this pass",
            removed_this_pass.len()
        );

        if removed_this_pass.is_empty() {
            break;
        }

        // Removing states can disconnect others entirely (no path to T at
        // all anymore); re-run plain connectivity before the next safety
        // pass so `connected` only ever shrinks towards the true fixed
        // point.
        let reduced_targets: Vec<usize> = targets.iter().copied().filter(|&t| connected[t]).collect();
        let (recomputed, _) = backward_reachability(mdp, &reduced_targets);
        for s in 0..n {
            connected[s] = connected[s] && recomputed[s];
        }
    }

    let mut safe_actions = vec![Vec::new(); n];
    for s in 0..n {
        if !connected[s] {
            continue;
        }
        for (position, (_, distribution)) in mdp.alpha_successors(s).enumerate() {
            if distribution.iter().all(|&(succ, _)| connected[succ]) {
                safe_actions[s].push(position);
            }
        }
    }

    debug!(
        "almost_sure_reachability: fixed point reached, {} of {} state(s) survive",
        connected.iter().filter(|&&b| b).count(),
        n
    );
    AlmostSureOne { survives: connected, safe_actions }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn absorbing_pair() -> Mdp {
        let mut mdp = Mdp::new(2, vec![1, 1]);
        mdp.enable(0, 0, vec![(0, 0.5), (1, 0.5)]).unwrap();
        mdp.enable(1, 1, vec![(1, 1.0)]).unwrap();
        mdp
    }

    #[test]
    fn backward_reachability_finds_both_states() {
        let mdp = absorbing_pair();
        let (reachable, distance) = backward_reachability(&mdp, &[1]);
        assert!(reachable.iter().all(|&b| b));
        assert_eq!(distance[1], 0);
        assert_eq!(distance[0], 1);
    }

    #[test]
    fn almost_sure_set_includes_both_states_of_s1_scenario() {
        let mdp = absorbing_pair();
        let set = almost_sure_reachability(&mdp, &[1]);
        assert!(set.contains(0));
        assert!(set.contains(1));
    }

    /// S2: branching to dead end. Only the action avoiding the dead end is
    /// almost-sure safe at s0.
    #[test]
    fn dead_end_is_excluded_and_safe_action_is_detected() {
        let mut mdp = Mdp::new(3, vec![1, 1, 1]);
        // action 0: to dead end and target with equal probability
        mdp.enable(0, 0, vec![(1, 0.5), (2, 0.5)]).unwrap();
        // action 1: straight to target
        mdp.enable(0, 1, vec![(2, 1.0)]).unwrap();
        mdp.enable(1, 2, vec![(1, 1.0)]).unwrap(); // dead end self-loops
        mdp.enable(2, 2, vec![(2, 1.0)]).unwrap(); // target self-loops

        let set = almost_sure_reachability(&mdp, &[2]);
        assert!(set.contains(0));
        assert!(!set.contains(1));
        assert!(set.contains(2));
        // only the second enabling (position 1, action 1) is safe at s0
        assert_eq!(set.safe_actions(0), &[1]);
    }

    /// S5: a cycle where only one action inside the cycle leaves to T; the
    /// fixed point must not admit the cycle until a genuine leaving action
    /// is confirmed at every state in it.
    #[test]
    fn cycle_without_guaranteed_exit_is_excluded() {
        let mut mdp = Mdp::new(3, vec![1, 1]);
        // s0 -> s1 (only option, no escape)
        mdp.enable(0, 0, vec![(1, 1.0)]).unwrap();
        // s1 -> s0 (cycles back, no escape either)
        mdp.enable(1, 0, vec![(0, 1.0)]).unwrap();
        mdp.enable(2, 1, vec![(2, 1.0)]).unwrap();

        let set = almost_sure_reachability(&mdp, &[2]);
        assert!(!set.contains(0));
        assert!(!set.contains(1));
        assert!(set.contains(2));
    }

    /// A state is only safe if *every* successor of the chosen action
    /// survives — reaching one connected successor via a stochastic action
    /// is not enough if another branch of the same distribution dead-ends.
    #[test]
    fn action_with_one_doomed_branch_is_unsafe() {
        let mut mdp = Mdp::new(4, vec![1, 1]);
        mdp.enable(0, 0, vec![(3, 1.0)]).unwrap(); // s0 -> target directly
        mdp.enable(1, 1, vec![(0, 0.5), (2, 0.5)]).unwrap(); // s1: half safe, half doomed
        // s2 is a true dead end: no enabled actions at all.

        let set = almost_sure_reachability(&mdp, &[3]);
        assert!(set.contains(0));
        assert!(!set.contains(1));
        assert!(!set.contains(2));
    }

    #[test]
    fn cycle_with_guaranteed_exit_is_included() {
        let mut mdp = Mdp::new(3, vec![1, 1, 1]);
        // s0: only safe action leads to s1 which can only go to target
        mdp.enable(0, 0, vec![(1, 1.0)]).unwrap();
        mdp.enable(1, 1, vec![(2, 1.0)]).unwrap();
        mdp.enable(2, 2, vec![(2, 1.0)]).unwrap();

        let set = almost_sure_reachability(&mdp, &[2]);
        assert!(set.contains(0));
        assert!(set.contains(1));
        assert!(set.contains(2));
    }
}
