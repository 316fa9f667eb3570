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

//! Maximum reachability probability solver (C5): Pr_s^max(diamond T) for
//! every state, plus a maximizing memoryless strategy.

use fxhash::FxHashMap;
use log::{debug, trace};

use crate::config::SspConfig;
use crate::error::Result;
use crate::graph::{almost_sure_reachability, backward_reachability};
use crate::lp::{LpProblem, Relation, Sense, Term};
use crate::model::Mdp;

/// The result of [`solve`]: the probability vector and, if requested, a
/// maximizing memoryless strategy.
#[derive(Debug, Clone)]
pub struct ReachResult {
    /// `probability[s] = Pr_s^max(diamond T)`.
    pub probability: Vec<f64>,
    /// `strategy[s]` is the position within `A(s)` chosen by the
    /// maximizing strategy, absent for `s` with no enabled actions.
    pub strategy: Vec<Option<usize>>,
}

/// Computes `Pr_s^max(diamond T)` for every state and a maximizing
/// memoryless strategy, per §4.5.
pub fn solve(mdp: &Mdp, targets: &[usize], config: &SspConfig) -> Result<ReachResult> {
    solve_with_known(mdp, targets, &FxHashMap::default(), config)
}

/// Same as [`solve`], but `known` supplies probabilities for states whose
/// value is already fixed by the caller (used by
/// [`crate::solvers::sspp`]'s incremental scheduler to avoid re-deriving a
/// value already computed at a smaller horizon). A state in `known` is
/// never turned into an LP variable; its value feeds the Bellman
/// constraints of the states that still need to be solved as a
/// `Term::Fixed`.
pub fn solve_with_known(
    mdp: &Mdp,
    targets: &[usize],
    known: &FxHashMap<usize, f64>,
    config: &SspConfig,
) -> Result<ReachResult> {
    let n = mdp.number_of_states();
    let (reachable, _) = backward_reachability(mdp, targets);
    let almost_sure = almost_sure_reachability(mdp, targets);

    let mut probability = vec![0.0; n];
    for s in 0..n {
        if almost_sure.contains(s) {
            probability[s] = 1.0;
        } else if let Some(&p) = known.get(&s) {
            probability[s] = p;
        }
    }

    // U: states that are backward-reachable but not already known to be 0,
    // 1, or pinned by the caller. These get LP variables; everything else
    // is a boundary constant fed into the Bellman constraints as
    // `Term::Fixed`.
    let undetermined: Vec<usize> = (0..n)
        .filter(|&s| reachable[s] && !almost_sure.contains(s) && !known.contains_key(&s))
        .collect();

    if !undetermined.is_empty() {
        let mut problem = LpProblem::new(Sense::Minimize);
        let mut var_of: FxHashMap<usize, _> = FxHashMap::default();
        for &s in &undetermined {
            let v = problem.add_variable(
                &format!("x_{}", mdp.state_name(s)),
                0.0,
                Some(config.reach_variable_upper_bound),
            );
            var_of.insert(s, v);
        }

        problem.set_objective(undetermined.iter().map(|&s| (1.0, Term::Var(var_of[&s]))).collect());

        let term_for = |s: usize| -> Term {
            if let Some(&v) = var_of.get(&s) {
                Term::Var(v)
            } else if almost_sure.contains(s) {
                Term::Fixed(1.0)
            } else if let Some(&p) = known.get(&s) {
                Term::Fixed(p)
            } else {
                Term::Fixed(0.0)
            }
        };

        let mut constraint_count = 0;
        for &s in &undetermined {
            for (_, distribution) in mdp.alpha_successors(s) {
                let terms: Vec<(f64, Term)> = distribution
                    .iter()
                    .map(|&(succ, p)| (p, term_for(succ)))
                    .collect();
                let mut constraint_terms = vec![(1.0, Term::Var(var_of[&s]))];
                for (coeff, term) in terms {
                    constraint_terms.push((-coeff, term));
                }
                problem.add_constraint(constraint_terms, Relation::Ge, 0.0);
                constraint_count += 1;
            }
        }

        debug!(
            "reach::solve: LP has {} variable(s) and {} constraint(s) ({} state(s) pinned by the caller)",
            undetermined.len(),
            constraint_count,
            known.len()
        );
        let values = problem.solve()?;
        for &s in &undetermined {
            probability[s] = values[var_of[&s].index()];
        }
    }

    let strategy = extract_strategy(mdp, targets, &probability, &almost_sure);

    Ok(ReachResult { probability, strategy })
}

fn extract_strategy(
    mdp: &Mdp,
    targets: &[usize],
    probability: &[f64],
    almost_sure: &crate::graph::AlmostSureOne,
) -> Vec<Option<usize>> {
    let n = mdp.number_of_states();
    let target_set: fxhash::FxHashSet<usize> = targets.iter().copied().collect();

    // act_max(s): positions in A(s) attaining the maximal expected-next
    // value, restricted to the safe set when s is already Pr^max = 1.
    let mut act_max: Vec<Vec<usize>> = vec![Vec::new(); n];
    for s in 0..n {
        if mdp.act(s).is_empty() {
            continue;
        }
        if almost_sure.contains(s) && !target_set.contains(&s) {
            act_max[s] = almost_sure.safe_actions(s).to_vec();
            continue;
        }
        let q: Vec<f64> = mdp
            .alpha_successors(s)
            .map(|(_, distribution)| {
                distribution.iter().map(|&(succ, p)| p * probability[succ]).sum::<f64>()
            })
            .collect();
        let best = q.iter().cloned().fold(f64::MIN, f64::max);
        act_max[s] = q
            .iter()
            .enumerate()
            .filter(|&(_, &qa)| (qa - best).abs() <= 1e-9)
            .map(|(position, _)| position)
            .collect();
    }

    // Restrict to M^max and compute minimum edge-steps to T within it, to
    // break ties towards progress (§4.5).
    let mut restricted = Mdp::new(n, (0..mdp.number_of_actions()).map(|a| mdp.w(a)).collect());
    for s in 0..n {
        for &position in &act_max[s] {
            let (alpha, distribution) = mdp.alpha_successors(s).nth(position).unwrap();
            restricted.enable_unchecked(s, alpha, distribution.to_vec());
        }
    }
    let (_, distance) = backward_reachability(&restricted, targets);

    let mut strategy = vec![None; n];
    for s in 0..n {
        if act_max[s].is_empty() {
            continue;
        }
        if probability[s] == 0.0 || target_set.contains(&s) {
            strategy[s] = Some(act_max[s][0]);
            continue;
        }
        let progressing = act_max[s].iter().copied().find(|&position| {
            let (_, distribution) = mdp.alpha_successors(s).nth(position).unwrap();
            distribution.iter().any(|&(succ, _)| {
                distance.get(succ).copied().unwrap_or(usize::MAX) < distance.get(s).copied().unwrap_or(usize::MAX)
            })
        });
        strategy[s] = Some(progressing.unwrap_or(act_max[s][0]));
    }

    for s in 0..n {
        if let Some(position) = strategy[s] {
            trace!("reach::extract_strategy: state {} chooses action position {}", s, position);
        }
    }

    strategy
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    /// S1: two-state absorbing.
    #[test]
    fn two_state_absorbing_has_probability_one_everywhere() {
        let mut mdp = Mdp::new(2, vec![1]);
        mdp.enable(0, 0, vec![(0, 0.5), (1, 0.5)]).unwrap();
        mdp.enable(1, 0, vec![(1, 1.0)]).unwrap();
        let result = solve(&mdp, &[1], &SspConfig::default()).unwrap();
        assert_approx_eq!(result.probability[0], 1.0, 1e-9);
        assert_approx_eq!(result.probability[1], 1.0, 1e-9);
    }

    /// S2: branching to dead end; strategy must pick the direct action.
    #[test]
    fn branch_to_dead_end_picks_safe_action() {
        let mut mdp = Mdp::new(3, vec![1, 1, 1]);
        mdp.enable(0, 0, vec![(1, 0.5), (2, 0.5)]).unwrap();
        mdp.enable(0, 1, vec![(2, 1.0)]).unwrap();
        mdp.enable(1, 2, vec![(1, 1.0)]).unwrap();
        mdp.enable(2, 2, vec![(2, 1.0)]).unwrap();

        let result = solve(&mdp, &[2], &SspConfig::default()).unwrap();
        assert_approx_eq!(result.probability[0], 1.0, 1e-9);
        assert_approx_eq!(result.probability[1], 0.0, 1e-9);
        assert_approx_eq!(result.probability[2], 1.0, 1e-9);
        assert_eq!(result.strategy[0], Some(1));
    }
}
