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

//! Minimum expected accumulated weight solver (C6): E_s^min(diamond T) for
//! every state, plus a minimizing memoryless strategy.

use fxhash::FxHashMap;
use log::{debug, trace};

use crate::config::SspConfig;
use crate::error::Result;
use crate::graph::almost_sure_reachability;
use crate::lp::{LpProblem, Relation, Sense, Term};
use crate::model::Mdp;

/// The result of [`solve`]: the expected-weight vector (using `f64::INFINITY`
/// for states outside the Pr^max = 1 set) and a minimizing memoryless
/// strategy where one exists.
#[derive(Debug, Clone)]
pub struct SspeResult {
    pub expected_weight: Vec<f64>,
    pub strategy: Vec<Option<usize>>,
}

/// Computes `E_s^min(diamond T)` for every state and a minimizing
/// memoryless strategy, per §4.6.
pub fn solve(mdp: &Mdp, targets: &[usize], config: &SspConfig) -> Result<SspeResult> {
    let n = mdp.number_of_states();
    let target_set: fxhash::FxHashSet<usize> = targets.iter().copied().collect();
    let almost_sure = almost_sure_reachability(mdp, targets);

    let mut expected_weight = vec![f64::INFINITY; n];
    for &t in targets {
        expected_weight[t] = 0.0;
    }

    // F \ T: states with Pr^max = 1 that are not themselves targets.
    let unsolved: Vec<usize> =
        (0..n).filter(|&s| almost_sure.contains(s) && !target_set.contains(&s)).collect();

    if !unsolved.is_empty() {
        let mut problem = LpProblem::new(Sense::Maximize);
        let mut var_of: FxHashMap<usize, _> = FxHashMap::default();
        for &s in &unsolved {
            let v = problem.add_variable(&format!("e_{}", mdp.state_name(s)), 0.0, None);
            var_of.insert(s, v);
        }
        problem.set_objective(unsolved.iter().map(|&s| (1.0, Term::Var(var_of[&s]))).collect());

        let term_for = |s: usize| -> Term {
            if target_set.contains(&s) {
                Term::Fixed(0.0)
            } else {
                Term::Var(var_of[&s])
            }
        };

        let mut constraint_count = 0;
        for &s in &unsolved {
            for (alpha, distribution) in mdp.alpha_successors(s) {
                let all_finite = distribution
                    .iter()
                    .all(|&(succ, _)| target_set.contains(&succ) || almost_sure.contains(succ));
                if !all_finite {
                    continue;
                }
                // x_s <= w(alpha) + sum p * X(s')
                let mut terms = vec![(1.0, Term::Var(var_of[&s])), (-1.0, Term::Fixed(mdp.w(alpha) as f64))];
                for &(succ, p) in distribution.iter() {
                    terms.push((-p, term_for(succ)));
                }
                problem.add_constraint(terms, Relation::Le, 0.0);
                constraint_count += 1;
            }
        }

        debug!(
            "sspe::solve: LP has {} variable(s) and {} constraint(s)",
            unsolved.len(),
            constraint_count
        );
        let values = problem.solve()?;
        for &s in &unsolved {
            expected_weight[s] = values[var_of[&s].index()];
        }
    }

    let strategy = extract_strategy(mdp, targets, &expected_weight, &almost_sure);

    Ok(SspeResult { expected_weight, strategy })
}

fn extract_strategy(
    mdp: &Mdp,
    targets: &[usize],
    expected_weight: &[f64],
    almost_sure: &crate::graph::AlmostSureOne,
) -> Vec<Option<usize>> {
    let n = mdp.number_of_states();
    let target_set: fxhash::FxHashSet<usize> = targets.iter().copied().collect();
    let mut strategy = vec![None; n];

    for s in 0..n {
        if target_set.contains(&s) || !almost_sure.contains(s) || mdp.act(s).is_empty() {
            continue;
        }
        // additive form treated as canonical (see DESIGN.md for the
        // deviation from the reference's multiplicative scoring)
        let mut best: Option<(usize, f64)> = None;
        for (position, (alpha, distribution)) in mdp.alpha_successors(s).enumerate() {
            let all_finite =
                distribution.iter().all(|&(succ, _)| target_set.contains(&succ) || almost_sure.contains(succ));
            if !all_finite {
                continue;
            }
            let expected_next: f64 =
                distribution.iter().map(|&(succ, p)| p * expected_weight[succ]).sum();
            let score = mdp.w(alpha) as f64 + expected_next;
            if best.map(|(_, b)| score < b).unwrap_or(true) {
                best = Some((position, score));
            }
        }
        strategy[s] = best.map(|(position, _)| position);
    }

    for s in 0..n {
        if let Some(position) = strategy[s] {
            trace!("sspe::extract_strategy: state {} chooses action position {}", s, position);
        }
    }

    strategy
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    /// S1: two-state absorbing, w(a) = 1. Expected cost [2, 0].
    #[test]
    fn two_state_absorbing_expected_cost() {
        let mut mdp = Mdp::new(2, vec![1]);
        mdp.enable(0, 0, vec![(0, 0.5), (1, 0.5)]).unwrap();
        mdp.enable(1, 0, vec![(1, 1.0)]).unwrap();
        let result = solve(&mdp, &[1], &SspConfig::default()).unwrap();
        assert_approx_eq!(result.expected_weight[0], 2.0, 1e-6);
        assert_approx_eq!(result.expected_weight[1], 0.0, 1e-9);
    }

    /// S2: branching to dead end, all weights 1. Expected cost [1, inf, 0].
    #[test]
    fn branch_to_dead_end_expected_cost() {
        let mut mdp = Mdp::new(3, vec![1, 1, 1]);
        mdp.enable(0, 0, vec![(1, 0.5), (2, 0.5)]).unwrap();
        mdp.enable(0, 1, vec![(2, 1.0)]).unwrap();
        mdp.enable(1, 2, vec![(1, 1.0)]).unwrap();
        mdp.enable(2, 2, vec![(2, 1.0)]).unwrap();

        let result = solve(&mdp, &[2], &SspConfig::default()).unwrap();
        assert_approx_eq!(result.expected_weight[0], 1.0, 1e-6);
        assert!(result.expected_weight[1].is_infinite());
        assert_approx_eq!(result.expected_weight[2], 0.0, 1e-9);
        assert_eq!(result.strategy[0], Some(1));
    }
}
