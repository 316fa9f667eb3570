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

//! Bounded-length percentile reachability solver (C7): reduces "does a
//! strategy exist achieving Pr(length <= l reaches T) >= beta from s0" to
//! ordinary reachability on the unfolded MDP, and extracts a finite-memory
//! strategy keyed by (state, accumulated weight).

use fxhash::FxHashMap;
use log::debug;

use crate::config::SspConfig;
use crate::error::Result;
use crate::model::{Mdp, Unfolding};
use crate::solvers::reach;

/// The result of [`solve`] or [`Scheduler::solve`]: whether the threshold is
/// met from `s0`, the achieved probability, and, when it is met, a
/// finite-memory strategy indexed by `(state, accumulated weight
/// remaining)`.
#[derive(Debug, Clone)]
pub struct SsppResult {
    pub probability: f64,
    pub meets_threshold: bool,
    pub unfolding: Unfolding,
    /// `strategy[(s, v)]` is the position within `A(s)` in the *original*
    /// MDP chosen when `v` steps of budget remain.
    pub strategy: FxHashMap<(usize, usize), usize>,
}

/// Answers a single SSPP decision from `s0` with length bound `l` and
/// threshold `beta`, per §4.7. Builds one scheduler and discards it; callers
/// that will ask several queries against the same MDP (e.g. a binary search
/// over `l`, or a CLI batch) should keep a [`Scheduler`] around instead, so
/// that probabilities already derived at a smaller horizon are reused
/// rather than re-solved.
pub fn solve(
    mdp: &Mdp,
    s0: usize,
    targets: &[usize],
    l: usize,
    beta: f64,
    config: &SspConfig,
) -> Result<SsppResult> {
    Scheduler::new(mdp, config.clone()).solve(s0, targets, l, beta)
}

/// An incremental SSPP scheduler: memoizes `Pr(s, v)` (the probability of
/// reaching the target within `v` remaining steps of budget from `s`)
/// across calls, keyed by `(state, steps_remaining)`. Since that value
/// depends only on the remaining budget and not on the original horizon `l`
/// it was first asked about, a later query with a larger `l` passes every
/// already-known `(s, v)` pair into [`reach::solve_with_known`] as a pinned
/// value, shrinking the LP the reach solver has to build instead of
/// rebuilding the whole unfolded Bellman system from scratch.
pub struct Scheduler<'a> {
    mdp: &'a Mdp,
    config: SspConfig,
    known: FxHashMap<(usize, usize), f64>,
}

impl<'a> Scheduler<'a> {
    /// Starts a scheduler over `mdp` with an empty memo.
    pub fn new(mdp: &'a Mdp, config: SspConfig) -> Self {
        Scheduler { mdp, config, known: FxHashMap::default() }
    }

    /// The number of `(state, steps_remaining)` probabilities memoized so
    /// far.
    pub fn memoized_len(&self) -> usize {
        self.known.len()
    }

    /// Answers the SSPP decision from `s0` with length bound `l` and
    /// threshold `beta`, reusing whatever this scheduler has already
    /// memoized for smaller horizons against the same target set.
    pub fn solve(&mut self, s0: usize, targets: &[usize], l: usize, beta: f64) -> Result<SsppResult> {
        let unfolding = Unfolding::build(self.mdp, [(s0, l)], l, targets);

        let mut known_by_index = FxHashMap::default();
        for index in 0..unfolding.mdp().number_of_states() {
            if let Some((s, v)) = unfolding.convert(index) {
                if let Some(&p) = self.known.get(&(s, v)) {
                    known_by_index.insert(index, p);
                }
            }
        }
        debug!(
            "sspp::Scheduler::solve: reusing {} memoized value(s) out of {} unfolded state(s)",
            known_by_index.len(),
            unfolding.mdp().number_of_states()
        );

        let target_states: Vec<usize> = unfolding.target_states().collect();
        let result =
            reach::solve_with_known(unfolding.mdp(), &target_states, &known_by_index, &self.config)?;

        for index in 0..unfolding.mdp().number_of_states() {
            if let Some((s, v)) = unfolding.convert(index) {
                self.known.entry((s, v)).or_insert(result.probability[index]);
            }
        }

        let root = unfolding
            .index_of(s0, l)
            .expect("the root (s0, l) is always interned by Unfolding::build");
        let probability = result.probability[root];
        let meets_threshold = probability >= beta;

        let mdp = self.mdp;
        let mut strategy = FxHashMap::default();
        if meets_threshold {
            for index in 0..unfolding.mdp().number_of_states() {
                if let (Some((s, v)), Some(position)) = (unfolding.convert(index), result.strategy[index]) {
                    let alpha = unfolding.mdp().act(index)[position];
                    if alpha < mdp.number_of_actions() {
                        // find the position of this action id within A(s) in
                        // the *original* MDP, since the unfolded MDP mirrors
                        // insertion order 1:1 for non-synthetic actions.
                        if let Some(original_position) = mdp.act(s).iter().position(|&a| a == alpha) {
                            strategy.insert((s, v), original_position);
                        }
                    }
                }
            }
        }

        Ok(SsppResult { probability, meets_threshold, unfolding, strategy })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// S3: percentile gating. a: s0 -w3-> s1, b: s1 -w4-> t. l=6 -> no;
    /// l=7 -> yes with probability 1.
    fn chain_mdp() -> Mdp {
        let mut mdp = Mdp::new(3, vec![3, 4]);
        mdp.enable(0, 0, vec![(1, 1.0)]).unwrap();
        mdp.enable(1, 1, vec![(2, 1.0)]).unwrap();
        mdp.enable(2, 1, vec![(2, 1.0)]).unwrap();
        mdp
    }

    #[test]
    fn insufficient_budget_rejects_threshold() {
        let mdp = chain_mdp();
        let result = solve(&mdp, 0, &[2], 6, 0.5, &SspConfig::default()).unwrap();
        assert_eq!(result.probability, 0.0);
        assert!(!result.meets_threshold);
    }

    #[test]
    fn sufficient_budget_meets_threshold() {
        let mdp = chain_mdp();
        let result = solve(&mdp, 0, &[2], 7, 0.5, &SspConfig::default()).unwrap();
        assert_eq!(result.probability, 1.0);
        assert!(result.meets_threshold);
        assert!(result.strategy.contains_key(&(0, 7)));
    }

    #[test]
    fn reach_is_monotone_in_l() {
        let mdp = chain_mdp();
        let low = solve(&mdp, 0, &[2], 6, 0.0, &SspConfig::default()).unwrap();
        let high = solve(&mdp, 0, &[2], 7, 0.0, &SspConfig::default()).unwrap();
        assert!(high.probability >= low.probability);
    }

    /// A scheduler asked about an increasing sequence of horizons should
    /// memoize every `(state, steps_remaining)` pair it has already solved
    /// and reuse it on the next, larger query.
    #[test]
    fn scheduler_memoizes_across_increasing_horizons() {
        let mdp = chain_mdp();
        let mut scheduler = Scheduler::new(&mdp, SspConfig::default());

        let first = scheduler.solve(0, &[2], 6, 0.5).unwrap();
        assert!(!first.meets_threshold);
        let memoized_after_first = scheduler.memoized_len();
        assert!(memoized_after_first > 0);

        let second = scheduler.solve(0, &[2], 7, 0.5).unwrap();
        assert!(second.meets_threshold);
        // every pair already known after the first call must still be
        // known (memoization only grows, never forgets).
        assert!(scheduler.memoized_len() >= memoized_after_first);
    }
}
