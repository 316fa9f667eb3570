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

//! A thin abstraction over an external LP solver: variables, objective
//! sense, affine constraints, and primal value extraction.
//!
//! Backed by `good_lp` with the pure-Rust `microlp` backend, so solving
//! never shells out to, or links against, a system LP library. Nothing
//! above this module touches `good_lp` types directly, which keeps a future
//! backend swap to a one-file change.

use good_lp::{variable, Expression, ProblemVariables, Solution, SolverModel, Variable};

use crate::error::{Result, SspError};

/// Whether the objective should be minimized or maximized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

/// The relational operator of an affine constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Le,
    Ge,
    Eq,
}

/// A term that participates in an affine expression without collapsing to a
/// float early: either a numeric constant or a reference to an LP variable.
/// Keeping the two apart is what lets a Bellman-style constraint such as
/// `x_s >= sum(p * X(s'))` be built once whether `X(s')` is a free variable
/// or a known 0/1 boundary value (§9 design note).
#[derive(Debug, Clone, Copy)]
pub enum Term {
    Fixed(f64),
    Var(LpVar),
}

impl Term {
    fn into_expression(self, vars: &[Variable]) -> Expression {
        match self {
            Term::Fixed(c) => Expression::from(c),
            Term::Var(v) => Expression::from(vars[v.0]),
        }
    }
}

/// A handle to a variable created on a [`LpProblem`]. Opaque outside this
/// module; indexes into the problem's internal variable table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LpVar(usize);

impl LpVar {
    /// The position of this variable in the vector returned by
    /// [`LpProblem::solve`]. Stable since variables are never removed.
    pub fn index(&self) -> usize {
        self.0
    }
}

struct Constraint {
    terms: Vec<(f64, Term)>,
    relation: Relation,
    rhs: f64,
}

/// A linear program under construction: variables, an objective, and a list
/// of affine constraints, solved all at once by [`LpProblem::solve`].
pub struct LpProblem {
    sense: Sense,
    builder: ProblemVariables,
    var_handles: Vec<Variable>,
    objective: Vec<(f64, Term)>,
    constraints: Vec<Constraint>,
}

impl LpProblem {
    /// Starts a new problem with the given objective sense.
    pub fn new(sense: Sense) -> Self {
        LpProblem {
            sense,
            builder: ProblemVariables::new(),
            var_handles: Vec::new(),
            objective: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Creates a variable with the given lower bound and optional upper
    /// bound (`None` means unbounded above). The `name` is used only for
    /// diagnostics.
    pub fn add_variable(&mut self, name: &str, low_bound: f64, up_bound: Option<f64>) -> LpVar {
        let mut def = variable().min(low_bound).name(name);
        if let Some(up) = up_bound {
            def = def.max(up);
        }
        let handle = self.builder.add(def);
        self.var_handles.push(handle);
        LpVar(self.var_handles.len() - 1)
    }

    /// Sets the objective to `sum(coefficient * term)`.
    pub fn set_objective(&mut self, terms: Vec<(f64, Term)>) {
        self.objective = terms;
    }

    /// Appends the constraint `sum(coefficient * term) <relation> rhs`.
    pub fn add_constraint(&mut self, terms: Vec<(f64, Term)>, relation: Relation, rhs: f64) {
        self.constraints.push(Constraint { terms, relation, rhs });
    }

    /// Solves the problem and returns the primal value of every variable
    /// created on it, indexed by [`LpVar`].
    pub fn solve(self) -> Result<Vec<f64>> {
        let objective_expr: Expression = self
            .objective
            .iter()
            .map(|&(coeff, term)| coeff * term.into_expression(&self.var_handles))
            .sum();

        let mut model = match self.sense {
            Sense::Minimize => self.builder.minimise(objective_expr),
            Sense::Maximize => self.builder.maximise(objective_expr),
        }
        .using(good_lp::microlp);

        for constraint in &self.constraints {
            let lhs: Expression = constraint
                .terms
                .iter()
                .map(|&(coeff, term)| coeff * term.into_expression(&self.var_handles))
                .sum();
            let built = match constraint.relation {
                Relation::Le => lhs.leq(constraint.rhs),
                Relation::Ge => lhs.geq(constraint.rhs),
                Relation::Eq => lhs.eq(constraint.rhs),
            };
            model = model.with(built);
        }

        let solution = model
            .solve()
            .map_err(|e| SspError::LpFailure(e.to_string()))?;

        Ok(self.var_handles.iter().map(|&v| solution.value(v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn solves_trivial_bound_minimization() {
        let mut problem = LpProblem::new(Sense::Minimize);
        let x = problem.add_variable("x", 0.0, Some(1.0));
        problem.set_objective(vec![(1.0, Term::Var(x))]);
        problem.add_constraint(vec![(1.0, Term::Var(x))], Relation::Ge, 0.25);
        let values = problem.solve().unwrap();
        assert_approx_eq!(values[0], 0.25, 1e-9);
    }

    #[test]
    fn mixes_fixed_and_variable_terms() {
        let mut problem = LpProblem::new(Sense::Maximize);
        let x = problem.add_variable("x", 0.0, Some(1.0));
        problem.set_objective(vec![(1.0, Term::Var(x))]);
        // x <= 0.5 * 1.0 + 0.5 * 0.0, mixing a Fixed(1.0) and Fixed(0.0)
        problem.add_constraint(
            vec![(1.0, Term::Var(x)), (-0.5, Term::Fixed(1.0)), (-0.5, Term::Fixed(0.0))],
            Relation::Le,
            0.0,
        );
        let values = problem.solve().unwrap();
        assert_approx_eq!(values[0], 0.5, 1e-9);
    }
}
