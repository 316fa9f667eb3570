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

//! `reachability <mdp.yaml> t1 .. tn` — prints Pr^max to the target set per
//! state and exports a DOT rendering with the maximizing strategy.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use ssp::{io, solvers::reach, SspConfig};
use ssp_viz::{render, VizConfig};

/// Computes the maximum reachability probability to a target set.
#[derive(Debug, Parser)]
#[command(name = "reachability")]
struct Args {
    /// Path to the MDP in YAML form.
    mdp: PathBuf,
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

    let targets: Vec<usize> = args
        .targets
        .iter()
        .map(|name| mdp.state_index(name).map_err(anyhow::Error::from))
        .collect::<Result<_>>()?;

    let result = reach::solve(&mdp, &targets, &SspConfig::default()).context("solving reachability")?;

    for s in 0..mdp.number_of_states() {
        println!("Pr^max[{}] = {:.6}", mdp.state_name(s), result.probability[s]);
    }

    let dot = render(&mdp, Some(&result.strategy), &VizConfig::default());
    println!("{dot}");

    Ok(())
}
