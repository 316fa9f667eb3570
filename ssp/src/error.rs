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

//! Crate-wide error taxonomy.
//!
//! Every fallible operation in this crate, from MDP construction to YAML
//! import and LP solving, returns a [`Result<T, SspError>`]. No operation
//! recovers locally: malformed input or solver failure is always surfaced to
//! the caller rather than rounded or silently dropped.

use thiserror::Error;

/// The error type shared by construction, graph analysis, LP solving and I/O.
#[derive(Debug, Error)]
pub enum SspError {
    /// The probabilities attached to an enabled action do not sum to 1
    /// within the tolerance configured for the MDP (see
    /// [`crate::config::SspConfig`]).
    #[error("action {action} at state {state} has a distribution summing to {sum}, not 1")]
    InvalidDistribution {
        state: usize,
        action: usize,
        sum: f64,
    },

    /// A probability outside of `(0, 1]` was supplied for a transition.
    #[error("action {action} at state {state} assigns probability {probability} to successor {successor}, which is not in (0, 1]")]
    InvalidProbability {
        state: usize,
        action: usize,
        successor: usize,
        probability: f64,
    },

    /// An action weight that was not a strictly positive integer.
    #[error("action {action} has non-positive weight {weight}")]
    NonPositiveWeight { action: String, weight: i64 },

    /// A name, state index or action index that does not exist in the MDP.
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    /// The LP solver did not return an optimal solution.
    #[error("linear program did not solve to optimality: {0}")]
    LpFailure(String),

    /// Malformed YAML document or numeric literal.
    #[error("parse error: {0}")]
    ParseError(String),

    /// Propagated I/O failure while reading or writing a model file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SspError>;
