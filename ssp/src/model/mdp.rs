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

//! The finite MDP store (states, weighted actions, transition distributions)
//! and its derived predecessor indexes.

use fxhash::{FxHashMap, FxHashSet};

use crate::config::SspConfig;
use crate::error::{Result, SspError};
use crate::model::distribution::Distribution;

/// A finite Markov decision process with nonnegative integer action weights.
///
/// States and actions are dense integer ranges `[0, number_of_states)` and
/// `[0, number_of_actions)`. Enabling an action appends it to the ordered
/// list of actions available at its source state and updates the
/// predecessor indexes (`pred`, `alpha_pred`) that the graph analyses in
/// [`crate::graph`] walk backward from the target set.
///
/// The MDP is append-only: there is no supported way to retract an enabled
/// action, because doing so would require repairing the predecessor indexes
/// of every successor it touched (see `DESIGN.md`). Treat an `Mdp` as
/// logically immutable for the duration of any solver call.
#[derive(Debug, Clone)]
pub struct Mdp {
    state_names: Vec<Option<String>>,
    action_names: Vec<Option<String>>,
    name_to_state: FxHashMap<String, usize>,
    name_to_action: FxHashMap<String, usize>,
    weights: Vec<u64>,
    /// `enabled[s] = (action ids in insertion order, their distributions)`.
    /// The two vectors are always the same length; position `k` is the
    /// `k`-th enabling at state `s`, which is what strategies index into
    /// (not the action id itself, since the same action may be enabled more
    /// than once at a state via distinct enablings).
    enabled: Vec<(Vec<usize>, Vec<Distribution>)>,
    pred: Vec<FxHashSet<usize>>,
    alpha_pred: Vec<Vec<(usize, usize)>>,
    tolerance: f64,
}

impl Mdp {
    /// Builds an MDP with `number_of_states` states and the given action
    /// weights, all states and actions left unnamed.
    pub fn new(number_of_states: usize, weights: Vec<u64>) -> Self {
        Self::with_names(vec![None; number_of_states], vec![None; weights.len()], weights)
    }

    /// Builds an MDP with explicit, optional display names for states and
    /// actions.
    pub fn with_names(
        state_names: Vec<Option<String>>,
        action_names: Vec<Option<String>>,
        weights: Vec<u64>,
    ) -> Self {
        Self::with_config(state_names, action_names, weights, &SspConfig::default())
    }

    /// Builds an MDP using the probability tolerance from `config` instead
    /// of the crate default.
    pub fn with_config(
        state_names: Vec<Option<String>>,
        action_names: Vec<Option<String>>,
        weights: Vec<u64>,
        config: &SspConfig,
    ) -> Self {
        let n = state_names.len();
        let name_to_state = state_names
            .iter()
            .enumerate()
            .filter_map(|(i, name)| name.clone().map(|name| (name, i)))
            .collect();
        let name_to_action = action_names
            .iter()
            .enumerate()
            .filter_map(|(i, name)| name.clone().map(|name| (name, i)))
            .collect();
        Mdp {
            state_names,
            action_names,
            name_to_state,
            name_to_action,
            weights,
            enabled: vec![(Vec::new(), Vec::new()); n],
            pred: vec![FxHashSet::default(); n],
            alpha_pred: vec![Vec::new(); n],
            tolerance: config.probability_tolerance,
        }
    }

    /// Appends `alpha` to `A(s)` with the given distribution, validating
    /// that it is a proper probability distribution (§3 invariants).
    pub fn enable(
        &mut self,
        s: usize,
        alpha: usize,
        distribution: impl IntoIterator<Item = (usize, f64)>,
    ) -> Result<()> {
        let pairs: Vec<(usize, f64)> = distribution.into_iter().collect();
        let sum: f64 = pairs.iter().map(|(_, p)| p).sum();
        if (sum - 1.0).abs() > self.tolerance {
            return Err(SspError::InvalidDistribution { state: s, action: alpha, sum });
        }
        for &(successor, probability) in &pairs {
            if !(probability > 0.0 && probability <= 1.0) {
                return Err(SspError::InvalidProbability {
                    state: s,
                    action: alpha,
                    successor,
                    probability,
                });
            }
        }
        self.enable_unchecked(s, alpha, pairs);
        Ok(())
    }

    /// Appends `alpha` to `A(s)` without validating the distribution.
    /// Reserved for trusted bulk construction, such as the unfolding
    /// builder, which derives its transitions from an already-validated
    /// MDP.
    pub fn enable_unchecked(&mut self, s: usize, alpha: usize, distribution: Vec<(usize, f64)>) {
        let position = self.enabled[s].0.len();
        self.enabled[s].0.push(alpha);
        for &(successor, _) in &distribution {
            self.pred[successor].insert(s);
            self.alpha_pred[successor].push((s, position));
        }
        self.enabled[s].1.push(Distribution::new(distribution));
    }

    /// The number of states, i.e. the size of `[0, number_of_states)`.
    pub fn number_of_states(&self) -> usize {
        self.enabled.len()
    }

    /// The number of distinct actions, i.e. the size of `[0,
    /// number_of_actions)`. Not every action need be enabled anywhere.
    pub fn number_of_actions(&self) -> usize {
        self.weights.len()
    }

    /// The weight of action `alpha`.
    pub fn w(&self, alpha: usize) -> u64 {
        self.weights[alpha]
    }

    /// The ordered sequence of action ids enabled at `s` (one entry per
    /// enabling; an action id may repeat).
    pub fn act(&self, s: usize) -> &[usize] {
        &self.enabled[s].0
    }

    /// The ordered sequence of `(action, distribution)` pairs enabled at
    /// `s`, in insertion order. Backed by a slice: restartable, not a
    /// single-use iterator.
    pub fn alpha_successors(&self, s: usize) -> impl Iterator<Item = (usize, &Distribution)> + '_ {
        self.enabled[s].0.iter().copied().zip(self.enabled[s].1.iter())
    }

    /// The distribution for the `position`-th enabling at `s`.
    pub fn distribution_at(&self, s: usize, position: usize) -> &Distribution {
        &self.enabled[s].1[position]
    }

    /// The set of states with at least one action leading to `s`.
    pub fn pred(&self, s: usize) -> &FxHashSet<usize> {
        &self.pred[s]
    }

    /// The reverse relation used for backward graph walks: every
    /// `(predecessor, action)` pair such that `action` assigns positive
    /// probability to `s` when enabled at `predecessor`.
    pub fn alpha_predecessors(&self, s: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.alpha_pred[s]
            .iter()
            .map(move |&(pred, position)| (pred, self.enabled[pred].0[position]))
    }

    /// The `(predecessor, position-in-A(predecessor))` pairs backing
    /// [`Mdp::alpha_predecessors`], used by the Pr^max=1 pruning fixed
    /// point, which needs to disable a specific enabling rather than an
    /// action id.
    pub(crate) fn alpha_pred_positions(&self, s: usize) -> &[(usize, usize)] {
        &self.alpha_pred[s]
    }

    /// The display name of state `s`, synthesized as `"s<i>"` if none was
    /// given.
    pub fn state_name(&self, s: usize) -> String {
        self.state_names[s].clone().unwrap_or_else(|| format!("s{s}"))
    }

    /// The display name of action `alpha`, synthesized as `"a<alpha>"` if
    /// none was given.
    pub fn act_name(&self, alpha: usize) -> String {
        self.action_names
            .get(alpha)
            .and_then(|n| n.clone())
            .unwrap_or_else(|| format!("a{alpha}"))
    }

    /// Looks up a state index by its explicit display name.
    pub fn state_index(&self, name: &str) -> Result<usize> {
        self.name_to_state
            .get(name)
            .copied()
            .ok_or_else(|| SspError::UnknownEntity(name.to_string()))
    }

    /// Looks up an action index by its explicit display name.
    pub fn action_index(&self, name: &str) -> Result<usize> {
        self.name_to_action
            .get(name)
            .copied()
            .ok_or_else(|| SspError::UnknownEntity(name.to_string()))
    }
}
