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

//! Graphviz rendering of MDPs and, optionally, the strategies computed over
//! them.
//!
//! The output is a plain DOT string built with `push_str`/`format!`, the
//! same way as every other hand-rolled exporter in this family of crates:
//! no graph-rendering crate sits between this code and the `dot` CLI.

use ssp::Mdp;

/// A strategy to overlay on the rendering: for each state, which position
/// within `A(s)` is chosen (absent entries are left unstyled).
pub type Strategy = [Option<usize>];

/// Configures which parts of the rendering are drawn.
#[derive(Debug, Clone, derive_builder::Builder)]
pub struct VizConfig {
    /// Whether the probability/weight label is attached to each
    /// action-node.
    #[builder(default = "true")]
    pub show_weights: bool,
}

impl Default for VizConfig {
    fn default() -> Self {
        VizConfigBuilder::default().build().expect("all fields of VizConfig have defaults")
    }
}

/// Renders `mdp` as a DOT digraph: circular nodes for states, point nodes
/// for `(state, action)` pairs labelled `"alpha | w(alpha)"`, edges from
/// state to action-node and from action-node to successor labelled with
/// the transition probability rounded to 4 decimals. When `strategy` is
/// supplied, the chosen action nodes and their incoming edges are colored
/// red.
pub fn render(mdp: &Mdp, strategy: Option<&Strategy>, config: &VizConfig) -> String {
    let mut out = String::new();
    out.push_str("digraph {\n\trankdir = LR;\n\n");

    for s in 0..mdp.number_of_states() {
        out.push_str(&state_node(mdp, s));

        let chosen = strategy.and_then(|s_strategy| s_strategy.get(s).copied().flatten());
        for (position, (alpha, distribution)) in mdp.alpha_successors(s).enumerate() {
            let is_chosen = chosen == Some(position);
            let action_id = format!("s{s}_a{position}");
            out.push_str(&action_node(mdp, &action_id, alpha, config, is_chosen));
            out.push_str(&format!(
                "\t\"s{s}\" -> \"{action_id}\" [color={}];\n",
                if is_chosen { "red" } else { "black" }
            ));
            for &(succ, probability) in distribution.iter() {
                out.push_str(&format!(
                    "\t\"{action_id}\" -> \"s{succ}\" [label=\"{:.4}\"];\n",
                    probability
                ));
            }
        }
    }

    out.push_str("}\n");
    out
}

fn state_node(mdp: &Mdp, s: usize) -> String {
    format!(
        "\t\"s{s}\" [shape=circle,label=\"{}\"];\n",
        mdp.state_name(s)
    )
}

fn action_node(mdp: &Mdp, action_id: &str, alpha: usize, config: &VizConfig, is_chosen: bool) -> String {
    let label = if config.show_weights {
        format!("{} | {}", mdp.act_name(alpha), mdp.w(alpha))
    } else {
        mdp.act_name(alpha)
    };
    let color = if is_chosen { "red" } else { "black" };
    format!("\t\"{action_id}\" [shape=point,label=\"{label}\",color={color},xlabel=\"{label}\"];\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_two_state_absorbing_scenario() {
        let mut mdp = Mdp::new(2, vec![1]);
        mdp.enable(0, 0, vec![(0, 0.5), (1, 0.5)]).unwrap();
        mdp.enable(1, 0, vec![(1, 1.0)]).unwrap();

        let dot = render(&mdp, None, &VizConfig::default());
        assert!(dot.starts_with("digraph {"));
        assert!(dot.contains("\"s0\" [shape=circle"));
        assert!(dot.contains("label=\"0.5000\""));
    }

    #[test]
    fn colors_chosen_action_red() {
        let mut mdp = Mdp::new(2, vec![1, 1]);
        mdp.enable(0, 0, vec![(1, 1.0)]).unwrap();
        mdp.enable(0, 1, vec![(0, 1.0)]).unwrap();
        mdp.enable(1, 0, vec![(1, 1.0)]).unwrap();

        let strategy = vec![Some(0), None];
        let dot = render(&mdp, Some(&strategy), &VizConfig::default());
        assert!(dot.contains("\"s0_a0\" [shape=point,label=\"a0 | 1\",color=red"));
        assert!(dot.contains("\"s0_a1\" [shape=point,label=\"a1 | 1\",color=black"));
    }
}
