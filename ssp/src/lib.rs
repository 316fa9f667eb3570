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

//! Quantitative reachability and stochastic shortest-path analysis over
//! finite Markov decision processes.
//!
//! Given an MDP with nonnegative integer action weights and a target set
//! `T`, this crate computes:
//!
//! - `Pr_s^max(diamond T)`, the maximum probability of eventually reaching
//!   `T` from `s` ([`solvers::reach`]);
//! - `E_s^min(diamond T)`, the minimum expected accumulated weight to reach
//!   `T` ([`solvers::sspe`]);
//! - for a source, length bound and probability threshold, whether a
//!   strategy exists reaching `T` within the bound with at least that
//!   probability ([`solvers::sspp`]), by unfolding the MDP into a larger
//!   acyclic-ish MDP and reducing to the first problem.
//!
//! All three reduce to backward graph analyses ([`graph`]) and a small
//! number of linear programs solved through [`lp`]. Solvers are pure
//! functions of their inputs: no shared mutable state lives between calls.

pub mod config;
pub mod error;
pub mod graph;
pub mod io;
pub mod lp;
pub mod model;
pub mod solvers;

pub use config::SspConfig;
pub use error::{Result, SspError};
pub use model::{Distribution, Mdp, UnfoldedState, Unfolding};
