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

//! End-to-end scenarios exercising the public API: import an MDP (or build
//! one directly) and check the reachability, SSPE and SSPP solvers against
//! known answers.

use assert_approx_eq::assert_approx_eq;
use ssp::{io, solvers::reach, solvers::sspe, solvers::sspp, Mdp, SspConfig};

/// S1: two-state absorbing. Pr^max = [1, 1], E^min = [2, 0] with w(a) = 1.
#[test]
fn s1_two_state_absorbing() {
    let mut mdp = Mdp::new(2, vec![1]);
    mdp.enable(0, 0, vec![(0, 0.5), (1, 0.5)]).unwrap();
    mdp.enable(1, 0, vec![(1, 1.0)]).unwrap();

    let config = SspConfig::default();
    let reach_result = reach::solve(&mdp, &[1], &config).unwrap();
    assert_approx_eq!(reach_result.probability[0], 1.0, 1e-6);
    assert_approx_eq!(reach_result.probability[1], 1.0, 1e-6);

    let sspe_result = sspe::solve(&mdp, &[1], &config).unwrap();
    assert_approx_eq!(sspe_result.expected_weight[0], 2.0, 1e-6);
    assert_approx_eq!(sspe_result.expected_weight[1], 0.0, 1e-9);
}

/// S2: branching to dead end. Pr^max = [1, 0, 1]; strategy picks the direct
/// action at s0; E^min = [1, inf, 0].
#[test]
fn s2_branching_to_dead_end() {
    let mut mdp = Mdp::new(3, vec![1, 1, 1]);
    mdp.enable(0, 0, vec![(1, 0.5), (2, 0.5)]).unwrap();
    mdp.enable(0, 1, vec![(2, 1.0)]).unwrap();
    mdp.enable(1, 2, vec![(1, 1.0)]).unwrap();
    mdp.enable(2, 2, vec![(2, 1.0)]).unwrap();

    let config = SspConfig::default();
    let reach_result = reach::solve(&mdp, &[2], &config).unwrap();
    assert_approx_eq!(reach_result.probability[0], 1.0, 1e-6);
    assert_approx_eq!(reach_result.probability[1], 0.0, 1e-6);
    assert_approx_eq!(reach_result.probability[2], 1.0, 1e-6);
    assert_eq!(reach_result.strategy[0], Some(1));

    let sspe_result = sspe::solve(&mdp, &[2], &config).unwrap();
    assert_approx_eq!(sspe_result.expected_weight[0], 1.0, 1e-6);
    assert!(sspe_result.expected_weight[1].is_infinite());
    assert_approx_eq!(sspe_result.expected_weight[2], 0.0, 1e-9);
}

/// S3: percentile gating. a: s0 -w3-> s1, b: s1 -w4-> t. l=6 answers no;
/// l=7 answers yes with probability 1.
#[test]
fn s3_percentile_gating() {
    let mut mdp = Mdp::new(3, vec![3, 4]);
    mdp.enable(0, 0, vec![(1, 1.0)]).unwrap();
    mdp.enable(1, 1, vec![(2, 1.0)]).unwrap();
    mdp.enable(2, 1, vec![(2, 1.0)]).unwrap();

    let config = SspConfig::default();
    let no = sspp::solve(&mdp, 0, &[2], 6, 0.5, &config).unwrap();
    assert_approx_eq!(no.probability, 0.0, 1e-9);
    assert!(!no.meets_threshold);

    let yes = sspp::solve(&mdp, 0, &[2], 7, 0.5, &config).unwrap();
    assert_approx_eq!(yes.probability, 1.0, 1e-6);
    assert!(yes.meets_threshold);
}

/// S4: two equal-probability paths to T of different edge lengths; the
/// maximizing strategy should prefer the shorter one once it reaches a
/// fork where both remain equally likely to succeed.
#[test]
fn s4_ties_broken_by_edge_distance() {
    let mut mdp = Mdp::new(4, vec![1, 1, 1]);
    // s0 can go short (direct to t) or long (via s2) with identical Pr^max.
    mdp.enable(0, 0, vec![(1, 1.0)]).unwrap(); // short hop to near-target
    mdp.enable(0, 1, vec![(2, 1.0)]).unwrap(); // long hop via relay
    mdp.enable(1, 2, vec![(3, 1.0)]).unwrap(); // near-target -> t
    mdp.enable(2, 2, vec![(1, 1.0)]).unwrap(); // relay -> near-target (longer)
    mdp.enable(3, 2, vec![(3, 1.0)]).unwrap(); // t self-loops

    let result = reach::solve(&mdp, &[3], &SspConfig::default()).unwrap();
    // both choices at s0 reach t with certainty, but the tie-break should
    // favor the action whose successor is strictly closer to T.
    assert_eq!(result.strategy[0], Some(0));
}

/// S5: a cycle where only one action inside it leaves to T; the Pr^max=1
/// fixed point must not admit the cycle until a genuine exit is found.
#[test]
fn s5_almost_sure_fixed_point_rejects_unconfirmed_cycle() {
    let mut mdp = Mdp::new(3, vec![1, 1]);
    mdp.enable(0, 0, vec![(1, 1.0)]).unwrap();
    mdp.enable(1, 0, vec![(0, 1.0)]).unwrap();
    mdp.enable(2, 1, vec![(2, 1.0)]).unwrap();

    let result = reach::solve(&mdp, &[2], &SspConfig::default()).unwrap();
    assert_approx_eq!(result.probability[0], 0.0, 1e-9);
    assert_approx_eq!(result.probability[1], 0.0, 1e-9);
}

/// S6: distribution validation at the YAML import boundary.
#[test]
fn s6_distribution_validation_at_import() {
    let ok = r#"
mdp:
  states:
    - name: s0
      enabled actions:
        - name: a
          transitions:
            - { target: s0, probability: 0.5 }
            - { target: s1, probability: 0.4999999 }
    - name: s1
      enabled actions: []
  actions:
    - { name: a, weight: 1 }
"#;
    io::import(ok).unwrap();

    let bad = ok.replace("0.4999999", "0.499");
    let err = io::import(&bad).unwrap_err();
    assert!(matches!(err, ssp::SspError::InvalidDistribution { .. }));
}
