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

//! YAML import/export of MDPs, per the grammar in the external-interfaces
//! section: a top-level `mdp:` mapping with `states:` and `actions:`.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SspError};
use crate::model::Mdp;

#[derive(Debug, Deserialize, Serialize)]
struct Document {
    mdp: MdpDoc,
}

#[derive(Debug, Deserialize, Serialize)]
struct MdpDoc {
    states: Vec<StateDoc>,
    actions: Vec<ActionDoc>,
}

#[derive(Debug, Deserialize, Serialize)]
struct StateDoc {
    name: String,
    #[serde(rename = "enabled actions")]
    enabled_actions: Vec<EnabledActionDoc>,
}

#[derive(Debug, Deserialize, Serialize)]
struct EnabledActionDoc {
    name: String,
    transitions: Vec<TransitionDoc>,
}

#[derive(Debug, Deserialize, Serialize)]
struct TransitionDoc {
    target: String,
    probability: ProbabilityLiteral,
}

#[derive(Debug, Deserialize, Serialize)]
struct ActionDoc {
    name: String,
    weight: i64,
}

/// A `probability:` scalar, which may be written as a decimal literal or an
/// `a/b` rational. Serialized back out as the plain decimal it evaluates
/// to, per the export grammar ("float probabilities are serialized
/// verbatim").
#[derive(Debug, Clone, Copy)]
struct ProbabilityLiteral(f64);

impl<'de> Deserialize<'de> for ProbabilityLiteral {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = serde_yaml::Value::deserialize(deserializer)?;
        let text = match &raw {
            serde_yaml::Value::String(s) => s.clone(),
            serde_yaml::Value::Number(n) => n.to_string(),
            other => {
                return Err(serde::de::Error::custom(format!(
                    "expected a probability literal, found {other:?}"
                )))
            }
        };
        parse_probability(&text).map(ProbabilityLiteral).map_err(serde::de::Error::custom)
    }
}

impl Serialize for ProbabilityLiteral {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_f64(self.0)
    }
}

fn parse_probability(text: &str) -> std::result::Result<f64, String> {
    if let Some(stripped) = text.strip_prefix('-') {
        return Err(format!("probability literal '-{stripped}' has a leading '-', which is rejected"));
    }
    if let Some((num, den)) = text.split_once('/') {
        let numerator: f64 = num.trim().parse().map_err(|_| format!("malformed rational '{text}'"))?;
        let denominator: f64 = den.trim().parse().map_err(|_| format!("malformed rational '{text}'"))?;
        if denominator == 0.0 {
            return Err(format!("rational '{text}' has a zero denominator"));
        }
        let value = numerator / denominator;
        if value <= 0.0 {
            return Err(format!("probability literal '{text}' is not strictly positive"));
        }
        return Ok(value);
    }
    let value: f64 = text.parse().map_err(|_| format!("malformed probability literal '{text}'"))?;
    if value <= 0.0 {
        return Err(format!("probability literal '{text}' is not strictly positive"));
    }
    Ok(value)
}

/// Parses an MDP from a YAML document's text.
pub fn import(text: &str) -> Result<Mdp> {
    let document: Document =
        serde_yaml::from_str(text).map_err(|e| SspError::ParseError(e.to_string()))?;

    for action in &document.mdp.actions {
        if action.weight <= 0 {
            return Err(SspError::NonPositiveWeight {
                action: action.name.clone(),
                weight: action.weight,
            });
        }
    }

    let state_names: Vec<Option<String>> =
        document.mdp.states.iter().map(|s| Some(s.name.clone())).collect();
    let action_names: Vec<Option<String>> =
        document.mdp.actions.iter().map(|a| Some(a.name.clone())).collect();
    let weights: Vec<u64> = document.mdp.actions.iter().map(|a| a.weight as u64).collect();

    let mut state_index = std::collections::HashMap::new();
    for (i, state) in document.mdp.states.iter().enumerate() {
        state_index.insert(state.name.clone(), i);
    }
    let mut action_index = std::collections::HashMap::new();
    for (i, action) in document.mdp.actions.iter().enumerate() {
        action_index.insert(action.name.clone(), i);
    }

    let mut mdp = Mdp::with_names(state_names, action_names, weights);

    for (s, state) in document.mdp.states.iter().enumerate() {
        for enabled in &state.enabled_actions {
            let alpha = *action_index
                .get(&enabled.name)
                .ok_or_else(|| SspError::UnknownEntity(enabled.name.clone()))?;
            let mut distribution = Vec::with_capacity(enabled.transitions.len());
            for transition in &enabled.transitions {
                let target = *state_index
                    .get(&transition.target)
                    .ok_or_else(|| SspError::UnknownEntity(transition.target.clone()))?;
                distribution.push((target, transition.probability.0));
            }
            mdp.enable(s, alpha, distribution)?;
        }
    }

    Ok(mdp)
}

/// Serializes an MDP back into the YAML grammar described above.
pub fn export(mdp: &Mdp) -> Result<String> {
    let actions: Vec<ActionDoc> = (0..mdp.number_of_actions())
        .map(|a| ActionDoc { name: mdp.act_name(a), weight: mdp.w(a) as i64 })
        .collect();

    let states: Vec<StateDoc> = (0..mdp.number_of_states())
        .map(|s| {
            let enabled_actions = mdp
                .alpha_successors(s)
                .map(|(alpha, distribution)| EnabledActionDoc {
                    name: mdp.act_name(alpha),
                    transitions: distribution
                        .iter()
                        .map(|&(target, probability)| TransitionDoc {
                            target: mdp.state_name(target),
                            probability: ProbabilityLiteral(probability),
                        })
                        .collect(),
                })
                .collect();
            StateDoc { name: mdp.state_name(s), enabled_actions }
        })
        .collect();

    let document = Document { mdp: MdpDoc { states, actions } };
    serde_yaml::to_string(&document).map_err(|e| SspError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const S1: &str = r#"
mdp:
  states:
    - name: s0
      enabled actions:
        - name: a
          transitions:
            - { target: s0, probability: 0.5 }
            - { target: s1, probability: 0.5 }
    - name: s1
      enabled actions:
        - name: loop
          transitions:
            - { target: s1, probability: 1.0 }
  actions:
    - { name: a, weight: 1 }
    - { name: loop, weight: 1 }
"#;

    #[test]
    fn imports_two_state_absorbing_scenario() {
        let mdp = import(S1).unwrap();
        assert_eq!(mdp.number_of_states(), 2);
        let s1 = mdp.state_index("s1").unwrap();
        assert_eq!(mdp.act(s1).len(), 1);
    }

    #[test]
    fn rejects_unknown_target() {
        let text = S1.replace("target: s1", "target: missing");
        let err = import(&text).unwrap_err();
        assert!(matches!(err, SspError::UnknownEntity(_)));
    }

    #[test]
    fn rejects_non_positive_weight() {
        let text = S1.replace("weight: 1}\n    - { name: loop, weight: 1", "weight: 0}\n    - { name: loop, weight: 1");
        let err = import(&text).unwrap_err();
        assert!(matches!(err, SspError::NonPositiveWeight { .. }));
    }

    /// S6: distribution validation at the import boundary.
    #[test]
    fn rejects_distribution_summing_to_0_999_but_accepts_0_9999999() {
        let accepted = S1.replace("probability: 0.5 }\n            - { target: s1, probability: 0.5", "probability: 0.5 }\n            - { target: s1, probability: 0.4999999");
        import(&accepted).unwrap();

        let rejected = S1.replace("probability: 0.5 }\n            - { target: s1, probability: 0.5", "probability: 0.5 }\n            - { target: s1, probability: 0.499");
        let err = import(&rejected).unwrap_err();
        assert!(matches!(err, SspError::InvalidDistribution { .. }));
    }

    #[test]
    fn parses_rational_probability() {
        assert_eq!(parse_probability("1/2").unwrap(), 0.5);
        assert!(parse_probability("-1/2").is_err());
        assert!(parse_probability("-0.5").is_err());
    }

    #[test]
    fn export_then_import_round_trips_structure() {
        let mdp = import(S1).unwrap();
        let text = export(&mdp).unwrap();
        let reimported = import(&text).unwrap();
        assert_eq!(reimported.number_of_states(), mdp.number_of_states());
        assert_eq!(reimported.number_of_actions(), mdp.number_of_actions());
    }
}
