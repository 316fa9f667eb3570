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

//! The discrete probability distribution attached to an enabled action.

use std::ops::Deref;

/// A discrete distribution over successor states, stored as the ordered list
/// of `(successor, probability)` pairs it was enabled with.
///
/// Ordering is preserved rather than normalized into a map: it is what the
/// Graphviz exporter and the `__str__`-style debug rendering iterate over,
/// and there is no reason to pay for a hash map when most actions have a
/// handful of successors.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution(pub(crate) Vec<(usize, f64)>);

impl Distribution {
    pub(crate) fn new(pairs: Vec<(usize, f64)>) -> Self {
        Distribution(pairs)
    }

    /// The probability mass this distribution places on `successor`, or 0 if
    /// `successor` is not among its support.
    pub fn probability_of(&self, successor: usize) -> f64 {
        self.0
            .iter()
            .find(|(s, _)| *s == successor)
            .map(|(_, p)| *p)
            .unwrap_or(0.0)
    }
}

impl Deref for Distribution {
    type Target = [(usize, f64)];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Distribution {
    type Item = &'a (usize, f64);
    type IntoIter = std::slice::Iter<'a, (usize, f64)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
