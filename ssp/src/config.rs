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

//! Runtime configuration for the solvers in this crate.
//!
//! There is no persistent state and no configuration file: every knob is a
//! field on [`SspConfig`], which is cheap to construct and passed explicitly
//! to the solver entry points rather than kept in a global.

use derive_builder::Builder;

/// Tunable tolerances and policy knobs shared by the graph analyses and the
/// LP-based solvers.
#[derive(Debug, Clone, Builder)]
pub struct SspConfig {
    /// Absolute tolerance used when checking that an enabled action's
    /// transition probabilities sum to 1.
    #[builder(default = "1e-12")]
    pub probability_tolerance: f64,

    /// Upper bound given to the reachability-probability LP variables of
    /// [`crate::solvers::reach`]. The Bellman formulation is valid for any
    /// bound ≥ 1; tightening it to 1 shrinks the feasible region without
    /// changing the optimum.
    #[builder(default = "1.0")]
    pub reach_variable_upper_bound: f64,
}

impl Default for SspConfig {
    fn default() -> Self {
        SspConfigBuilder::default()
            .build()
            .expect("all fields of SspConfig have defaults")
    }
}
