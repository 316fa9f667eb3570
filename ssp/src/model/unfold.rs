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

//! Length-bounded unfolding: the product construction `S x {0..l} U {Bot}`
//! used to reduce percentile/bounded-horizon reachability to ordinary
//! reachability on an auxiliary MDP.

use fxhash::FxHashMap;

use crate::model::mdp::Mdp;

/// A state of the unfolded MDP: either a live `(state, steps_remaining)`
/// pair or the absorbing sink reached once the step budget is exhausted
/// without hitting the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnfoldedState {
    Live { state: usize, steps_remaining: usize },
    Bot,
}

/// The unfolded MDP together with the bookkeeping needed to map its dense
/// indices back to the `(state, steps_remaining)` pairs they represent.
///
/// Construction is a DFS over reachable `(state, steps_remaining)` pairs
/// starting from the given roots, driven by an explicit stack rather than
/// recursion: unfolding depth is bounded by the requested horizon, which
/// callers may set in the thousands, and a native call stack of that depth
/// is not something to risk.
#[derive(Debug)]
pub struct Unfolding {
    mdp: Mdp,
    index_of: FxHashMap<UnfoldedState, usize>,
    state_of: Vec<UnfoldedState>,
    targets: std::collections::HashSet<usize>,
    bot: usize,
}

impl Unfolding {
    /// Builds the unfolded MDP reachable from `roots` (each paired with its
    /// own starting step budget) within `source` over at most `horizon`
    /// steps, treating any state in `targets` as absorbing (self-looped with
    /// probability 1 regardless of remaining steps).
    pub fn build(
        source: &Mdp,
        roots: impl IntoIterator<Item = (usize, usize)>,
        horizon: usize,
        targets: &[usize],
    ) -> Self {
        let targets: std::collections::HashSet<usize> = targets.iter().copied().collect();
        let mut index_of = FxHashMap::default();
        let mut state_of = Vec::new();
        let mut weights = Vec::new();
        let mut enablings: Vec<Vec<(usize, Vec<(usize, f64)>)>> = Vec::new();

        let bot = Unfolding::intern(UnfoldedState::Bot, &mut index_of, &mut state_of, &mut enablings);

        let mut stack: Vec<(usize, usize)> = Vec::new();
        for (root, budget) in roots {
            let steps_remaining = budget.min(horizon);
            let root_state = UnfoldedState::Live { state: root, steps_remaining };
            let root_index =
                Unfolding::intern(root_state, &mut index_of, &mut state_of, &mut enablings);
            stack.push((root, steps_remaining));
            let _ = root_index;
        }

        let mut target_indices = std::collections::HashSet::new();
        let mut visited: std::collections::HashSet<(usize, usize)> = stack.iter().copied().collect();
        while let Some((s, steps_remaining)) = stack.pop() {
            let here = UnfoldedState::Live { state: s, steps_remaining };
            let here_index =
                Unfolding::intern(here, &mut index_of, &mut state_of, &mut enablings);

            if targets.contains(&s) {
                target_indices.insert(here_index);
                if enablings[here_index].is_empty() {
                    enablings[here_index].push((usize::MAX, vec![(here_index, 1.0)]));
                }
                continue;
            }

            for (alpha, distribution) in source.alpha_successors(s) {
                let weight = source.w(alpha) as usize;
                if weight > steps_remaining {
                    // budget exceeded: the whole action collapses to the
                    // sink, regardless of where its successors would have
                    // led (§3 unfolding invariants)
                    enablings[here_index].push((alpha, vec![(bot, 1.0)]));
                    continue;
                }
                let next_steps = steps_remaining - weight;
                let mut lowered = Vec::with_capacity(distribution.len());
                for &(successor, probability) in distribution.iter() {
                    let next_state = UnfoldedState::Live { state: successor, steps_remaining: next_steps };
                    let next_index =
                        Unfolding::intern(next_state, &mut index_of, &mut state_of, &mut enablings);
                    lowered.push((next_index, probability));
                    if visited.insert((successor, next_steps)) {
                        stack.push((successor, next_steps));
                    }
                }
                enablings[here_index].push((alpha, lowered));
            }
        }

        enablings[bot].push((usize::MAX, vec![(bot, 1.0)]));

        weights.resize(source.number_of_actions() + 1, 1);
        for alpha in 0..source.number_of_actions() {
            weights[alpha] = source.w(alpha);
        }
        let loop_action = source.number_of_actions();

        let mut mdp = Mdp::new(state_of.len(), weights);
        for (here_index, acts) in enablings.into_iter().enumerate() {
            for (alpha, distribution) in acts {
                let alpha = if alpha == usize::MAX { loop_action } else { alpha };
                mdp.enable_unchecked(here_index, alpha, distribution);
            }
        }

        Unfolding { mdp, index_of, state_of, targets: target_indices, bot }
    }

    fn intern(
        state: UnfoldedState,
        index_of: &mut FxHashMap<UnfoldedState, usize>,
        state_of: &mut Vec<UnfoldedState>,
        enablings: &mut Vec<Vec<(usize, Vec<(usize, f64)>)>>,
    ) -> usize {
        *index_of.entry(state).or_insert_with(|| {
            state_of.push(state);
            enablings.push(Vec::new());
            state_of.len() - 1
        })
    }

    /// The unfolded MDP itself, ready for the ordinary reachability and
    /// SSPE solvers.
    pub fn mdp(&self) -> &Mdp {
        &self.mdp
    }

    /// The index assigned to the absorbing "ran out of budget" sink.
    pub fn bot(&self) -> usize {
        self.bot
    }

    /// Maps an unfolded state index back to its `(state, steps_remaining)`
    /// pair, or `None` for the sink.
    pub fn convert(&self, index: usize) -> Option<(usize, usize)> {
        match self.state_of[index] {
            UnfoldedState::Live { state, steps_remaining } => Some((state, steps_remaining)),
            UnfoldedState::Bot => None,
        }
    }

    /// The unfolded index for `(state, steps_remaining)`, if it was
    /// reachable from the configured roots.
    pub fn index_of(&self, state: usize, steps_remaining: usize) -> Option<usize> {
        self.index_of.get(&UnfoldedState::Live { state, steps_remaining }).copied()
    }

    /// The unfolded indices that correspond to a target state at any
    /// remaining budget, the set the reachability solver should aim at.
    pub fn target_states(&self) -> impl Iterator<Item = usize> + '_ {
        self.targets.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin_flip_mdp() -> Mdp {
        let mut mdp = Mdp::new(3, vec![1]);
        mdp.enable(0, 0, vec![(1, 0.5), (2, 0.5)]).unwrap();
        mdp.enable(1, 0, vec![(1, 1.0)]).unwrap();
        mdp.enable(2, 0, vec![(2, 1.0)]).unwrap();
        mdp
    }

    #[test]
    fn horizon_zero_sends_everything_to_bot_unless_already_target() {
        let mdp = coin_flip_mdp();
        let unfolding = Unfolding::build(&mdp, [(0, 0)], 0, &[2]);
        let root = unfolding.index_of(0, 0).unwrap();
        // the only action at s0 has weight 1, which already exceeds the
        // budget of 0, so it collapses straight to the sink
        let (_, dist) = unfolding.mdp().alpha_successors(root).next().unwrap();
        assert_eq!(dist[0].0, unfolding.bot());
    }

    #[test]
    fn target_state_self_loops_regardless_of_budget() {
        let mdp = coin_flip_mdp();
        let unfolding = Unfolding::build(&mdp, [(0, 3)], 3, &[2]);
        let target_index = unfolding.index_of(2, 2).unwrap();
        let (_, dist) = unfolding.mdp().alpha_successors(target_index).next().unwrap();
        assert_eq!(dist[0].0, target_index);
    }

    #[test]
    fn unfolded_successors_decrement_steps_remaining() {
        let mdp = coin_flip_mdp();
        let unfolding = Unfolding::build(&mdp, [(0, 2)], 2, &[2]);
        let root = unfolding.index_of(0, 2).unwrap();
        let (_, dist) = unfolding.mdp().alpha_successors(root).next().unwrap();
        for &(succ, _) in dist.iter() {
            let (_, steps) = unfolding.convert(succ).unwrap();
            assert_eq!(steps, 1);
        }
    }
}
