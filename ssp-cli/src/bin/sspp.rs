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

//! `sspp <mdp.yaml> s0 l beta t1 .. tn` — answers the existence of a
//! strategy with Pr(length <= l reaches T) >= beta from s0, and exports a
//! DOT of the unfolded MDP with the strategy when the answer is yes.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use ssp::{io, solvers::sspp, SspConfig};
use ssp_viz::{render, VizConfig};

/// Answers the bounded-length percentile reachability decision.
#[derive(Debug, Parser)]
#[command(name = "sspp")]
struct Args {
    /// Path to the MDP in YAML form.
    mdp: PathBuf,
    /// Source state name.
    s0: String,
    /// Length (accumulated weight) bound.
    l: usize,
    /// Probability threshold in [0, 1].
    beta: f64,
    /// Target state names.
    #[arg(required = true)]
    targets: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let text = std::fs::read_to_string(&args.mdp)
        .with_context(|| format!("reading {}", args.mdp.display()))?;
    let mdp = io::import(&text).context("importing MDP")?;
    info!("loaded {} state(s) from {}", mdp.number_of_states(), args.mdp.display());

    let s0 = mdp.state_index(&args.s0)?;
    let targets: Vec<usize> = args
        .targets
        .iter()
        .map(|name| mdp.state_index(name).map_err(anyhow::Error::from))
        .collect::<Result<_>>()?;

    let result =
        sspp::solve(&mdp, s0, &targets, args.l, args.beta, &SspConfig::default()).context("solving SSPP")?;

    println!(
        "Pr(length <= {} reaches T from {}) = {:.6}",
        args.l, args.s0, result.probability
    );
    println!("meets threshold {} = {}", args.beta, result.meets_threshold);

    if result.meets_threshold {
        let n = result.unfolding.mdp().number_of_states();
        let mut strategy = vec![None; n];
        for index in 0..n {
            if let Some((s, v)) = result.unfolding.convert(index) {
                strategy[index] = result.strategy.get(&(s, v)).copied();
            }
        }
        let dot = render(result.unfolding.mdp(), Some(&strategy), &VizConfig::default());
        println!("{dot}");
    }

    Ok(())
}
