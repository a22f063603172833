//! Composite score resolution.
//!
//! Turns one partially-populated analysis result into one fully-populated,
//! bounded [`ResolvedScore`]. Pure and stateless: no I/O, no input mutation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::scoring::precedence::{
    BreakdownKey, GRAMMAR_COMPONENT, SEMANTIC_COMPONENT, STRUCTURAL_COMPONENT,
};
use crate::scoring::raw::RawAnalysisResult;
use crate::scoring::clamp_score;

/// Composite weights as integer percentages: semantic, structural, grammar.
/// Integer weights keep the weighted sum exact for integer components.
pub const COMPOSITE_WEIGHTS: CompositeWeights = CompositeWeights {
    semantic: 45.0,
    structural: 35.0,
    grammar: 20.0,
};

#[derive(Debug, Clone, Copy)]
pub struct CompositeWeights {
    pub semantic: f64,
    pub structural: f64,
    pub grammar: f64,
}

impl CompositeWeights {
    pub fn total(&self) -> f64 {
        self.semantic + self.structural + self.grammar
    }

    fn apply(&self, semantic: f64, structural: f64, grammar: f64) -> f64 {
        (self.semantic * semantic + self.structural * structural + self.grammar * grammar)
            / self.total()
    }
}

/// Canonical score handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedScore {
    pub final_score: u32,
    pub breakdown: Breakdown,
    pub suggestions: Vec<String>,
}

/// Six named sub-scores, each 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Breakdown {
    pub skills: u32,
    pub experience: u32,
    pub achievements: u32,
    pub structure: u32,
    pub grammar: u32,
    pub relevance: u32,
}

impl Breakdown {
    fn set(&mut self, key: BreakdownKey, value: u32) {
        let slot = match key {
            BreakdownKey::Skills => &mut self.skills,
            BreakdownKey::Experience => &mut self.experience,
            BreakdownKey::Achievements => &mut self.achievements,
            BreakdownKey::Structure => &mut self.structure,
            BreakdownKey::Grammar => &mut self.grammar,
            BreakdownKey::Relevance => &mut self.relevance,
        };
        *slot = value;
    }
}

/// Resolves a raw JSON payload. Non-object payloads resolve as `{}`.
pub fn resolve_value(value: &Value) -> ResolvedScore {
    resolve(&RawAnalysisResult::from_value(value))
}

pub fn resolve(raw: &RawAnalysisResult) -> ResolvedScore {
    ResolvedScore {
        final_score: resolve_final_score(raw),
        breakdown: resolve_breakdown(raw),
        suggestions: resolve_suggestions(raw),
    }
}

/// The service-supplied final score is authoritative; the composite is only
/// computed when it is absent.
pub fn resolve_final_score(raw: &RawAnalysisResult) -> u32 {
    match raw.final_score() {
        Some(score) => clamp_score(score),
        None => clamp_score(derived_composite(raw)),
    }
}

fn derived_composite(raw: &RawAnalysisResult) -> f64 {
    COMPOSITE_WEIGHTS.apply(
        SEMANTIC_COMPONENT.resolve(raw),
        STRUCTURAL_COMPONENT.resolve(raw),
        GRAMMAR_COMPONENT.resolve(raw),
    )
}

/// Pre-computed entries win per key; missing or non-numeric ones are derived.
pub fn resolve_breakdown(raw: &RawAnalysisResult) -> Breakdown {
    let mut breakdown = Breakdown::default();
    for key in BreakdownKey::ALL {
        let value = raw
            .breakdown_entry(key.as_str())
            .unwrap_or_else(|| key.chain().resolve(raw));
        breakdown.set(key, clamp_score(value));
    }
    breakdown
}

fn resolve_suggestions(raw: &RawAnalysisResult) -> Vec<String> {
    raw.suggestions.clone().unwrap_or_default()
}
