//! Precedence chains: ordered lists of typed accessors, first present value wins.
//!
//! Each accessor reads one candidate source from a [`RawAnalysisResult`] and
//! returns it already on the 0-100 scale. A chain ends in a fixed literal, so
//! resolving a chain always yields a value.

use crate::scoring::raw::RawAnalysisResult;
use crate::scoring::round_half_up;

/// One candidate source for a score.
pub type Source = fn(&RawAnalysisResult) -> Option<f64>;

/// An ordered list of sources plus the literal used when none is present.
#[derive(Clone, Copy)]
pub struct Chain {
    pub sources: &'static [Source],
    pub fallback: f64,
}

impl Chain {
    /// Value of the first present source, or the fallback literal.
    pub fn resolve(&self, raw: &RawAnalysisResult) -> f64 {
        self.first_present(raw).unwrap_or(self.fallback)
    }

    pub fn first_present(&self, raw: &RawAnalysisResult) -> Option<f64> {
        self.sources.iter().find_map(|source| source(raw))
    }
}

/// The six named sub-scores of a breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakdownKey {
    Skills,
    Experience,
    Achievements,
    Structure,
    Grammar,
    Relevance,
}

impl BreakdownKey {
    pub const ALL: [BreakdownKey; 6] = [
        BreakdownKey::Skills,
        BreakdownKey::Experience,
        BreakdownKey::Achievements,
        BreakdownKey::Structure,
        BreakdownKey::Grammar,
        BreakdownKey::Relevance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BreakdownKey::Skills => "skills",
            BreakdownKey::Experience => "experience",
            BreakdownKey::Achievements => "achievements",
            BreakdownKey::Structure => "structure",
            BreakdownKey::Grammar => "grammar",
            BreakdownKey::Relevance => "relevance",
        }
    }

    /// Derivation used when the pre-computed breakdown lacks this key.
    pub fn chain(self) -> Chain {
        match self {
            BreakdownKey::Skills => SKILLS,
            BreakdownKey::Experience => EXPERIENCE,
            BreakdownKey::Achievements => ACHIEVEMENTS,
            BreakdownKey::Structure => STRUCTURE,
            BreakdownKey::Grammar => GRAMMAR,
            BreakdownKey::Relevance => RELEVANCE,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Breakdown chains
// ────────────────────────────────────────────────────────────────────────────

pub const SKILLS: Chain = Chain {
    sources: &[section_skills_pct, skill_match_pct],
    fallback: 80.0,
};

pub const EXPERIENCE: Chain = Chain {
    sources: &[section_experience_pct, years_score],
    fallback: 70.0,
};

pub const ACHIEVEMENTS: Chain = Chain {
    sources: &[achievements_score],
    fallback: 60.0,
};

pub const STRUCTURE: Chain = Chain {
    sources: &[structure_score],
    fallback: 80.0,
};

/// Always resolves through its source; the literal matches zero issues.
pub const GRAMMAR: Chain = Chain {
    sources: &[grammar_breakdown],
    fallback: 100.0,
};

pub const RELEVANCE: Chain = Chain {
    sources: &[similarity_pct],
    fallback: 78.0,
};

// ────────────────────────────────────────────────────────────────────────────
// Final-score component chains
// ────────────────────────────────────────────────────────────────────────────

/// Semantic component. Missing similarity counts as zero here, unlike `RELEVANCE`.
pub const SEMANTIC_COMPONENT: Chain = Chain {
    sources: &[similarity_pct],
    fallback: 0.0,
};

/// Structural component. 70 is a neutral prior for an unscored resume.
pub const STRUCTURAL_COMPONENT: Chain = Chain {
    sources: &[structure_score, layout_score, experience_score_scaled],
    fallback: 70.0,
};

pub const GRAMMAR_COMPONENT: Chain = Chain {
    sources: &[grammar_component],
    fallback: 95.0,
};

// ────────────────────────────────────────────────────────────────────────────
// Accessors
// ────────────────────────────────────────────────────────────────────────────

fn pct(ratio: f64) -> f64 {
    round_half_up(100.0 * ratio)
}

/// Overall similarity, `semantic` block first, legacy feature location second.
pub fn similarity_ratio(raw: &RawAnalysisResult) -> Option<f64> {
    raw.semantic_overall()
        .or_else(|| raw.feature(|f| f.semantic_overall_similarity))
}

fn similarity_pct(raw: &RawAnalysisResult) -> Option<f64> {
    similarity_ratio(raw).map(pct)
}

fn section_skills_pct(raw: &RawAnalysisResult) -> Option<f64> {
    raw.feature(|f| f.section_similarity("skills")).map(pct)
}

fn skill_match_pct(raw: &RawAnalysisResult) -> Option<f64> {
    raw.feature(|f| f.skill_match).map(pct)
}

fn section_experience_pct(raw: &RawAnalysisResult) -> Option<f64> {
    raw.feature(|f| f.section_similarity("experience")).map(pct)
}

fn years_score(raw: &RawAnalysisResult) -> Option<f64> {
    raw.feature(|f| f.years_score)
}

fn achievements_score(raw: &RawAnalysisResult) -> Option<f64> {
    raw.feature(|f| f.achievements_score)
}

fn structure_score(raw: &RawAnalysisResult) -> Option<f64> {
    raw.feature(|f| f.structure_score)
}

fn layout_score(raw: &RawAnalysisResult) -> Option<f64> {
    raw.feature(|f| f.layout_score)
}

/// `experience_score` is reported on a 0-10 scale.
fn experience_score_scaled(raw: &RawAnalysisResult) -> Option<f64> {
    raw.feature(|f| f.experience_score)
        .map(|score| round_half_up(10.0 * score))
}

fn issues(raw: &RawAnalysisResult) -> f64 {
    raw.total_issues().unwrap_or(0.0)
}

/// 5 points per issue off a 100 ceiling, floored at 0.
fn grammar_breakdown(raw: &RawAnalysisResult) -> Option<f64> {
    Some((100.0 - 5.0 * issues(raw)).max(0.0))
}

/// 5 points per issue off a 95 ceiling, floored at 30.
fn grammar_component(raw: &RawAnalysisResult) -> Option<f64> {
    let issues = issues(raw);
    if issues == 0.0 {
        Some(95.0)
    } else {
        Some((95.0 - 5.0 * issues).max(30.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn raw(value: Value) -> RawAnalysisResult {
        RawAnalysisResult::from_value(&value)
    }

    #[test]
    fn test_skills_prefers_section_similarity() {
        let r = raw(json!({
            "features": {
                "semantic_per_section_similarity": { "skills": 0.62 },
                "skill_match": 0.9
            }
        }));
        assert_eq!(SKILLS.resolve(&r), 62.0);
    }

    #[test]
    fn test_skills_falls_back_to_skill_match_then_literal() {
        let r = raw(json!({ "features": { "skill_match": 0.455 } }));
        assert_eq!(SKILLS.resolve(&r), 46.0);
        assert_eq!(SKILLS.resolve(&raw(json!({}))), 80.0);
    }

    #[test]
    fn test_zero_similarity_is_present() {
        let r = raw(json!({
            "features": {
                "semantic_per_section_similarity": { "skills": 0.0 },
                "skill_match": 0.9
            }
        }));
        assert_eq!(SKILLS.resolve(&r), 0.0);
    }

    #[test]
    fn test_experience_chain_order() {
        let r = raw(json!({ "features": { "years_score": 55 } }));
        assert_eq!(EXPERIENCE.resolve(&r), 55.0);

        let r = raw(json!({
            "features": {
                "semantic_per_section_similarity": { "experience": 0.33 },
                "years_score": 55
            }
        }));
        assert_eq!(EXPERIENCE.resolve(&r), 33.0);
        assert_eq!(EXPERIENCE.resolve(&raw(json!({}))), 70.0);
    }

    #[test]
    fn test_structural_component_order() {
        let all = raw(json!({
            "features": { "structure_score": 81, "layout_score": 50, "experience_score": 4 }
        }));
        assert_eq!(STRUCTURAL_COMPONENT.resolve(&all), 81.0);

        let layout = raw(json!({ "features": { "layout_score": 50, "experience_score": 4 } }));
        assert_eq!(STRUCTURAL_COMPONENT.resolve(&layout), 50.0);

        let experience = raw(json!({ "features": { "experience_score": 4.26 } }));
        assert_eq!(STRUCTURAL_COMPONENT.resolve(&experience), 43.0);

        assert_eq!(STRUCTURAL_COMPONENT.resolve(&raw(json!({}))), 70.0);
    }

    #[test]
    fn test_similarity_prefers_semantic_block() {
        let r = raw(json!({
            "semantic": { "overall_similarity": 0.4 },
            "features": { "semantic_overall_similarity": 0.9 }
        }));
        assert_eq!(RELEVANCE.resolve(&r), 40.0);
        assert_eq!(SEMANTIC_COMPONENT.resolve(&r), 40.0);
    }

    #[test]
    fn test_missing_similarity_differs_between_relevance_and_component() {
        let empty = raw(json!({}));
        assert_eq!(RELEVANCE.resolve(&empty), 78.0);
        assert_eq!(SEMANTIC_COMPONENT.resolve(&empty), 0.0);
    }

    #[test]
    fn test_grammar_formulas() {
        let none = raw(json!({}));
        assert_eq!(GRAMMAR.resolve(&none), 100.0);
        assert_eq!(GRAMMAR_COMPONENT.resolve(&none), 95.0);

        let three = raw(json!({ "quality": { "total_issues_count": 3 } }));
        assert_eq!(GRAMMAR.resolve(&three), 85.0);
        assert_eq!(GRAMMAR_COMPONENT.resolve(&three), 80.0);

        let many = raw(json!({ "quality": { "total_issues_count": 20 } }));
        assert_eq!(GRAMMAR.resolve(&many), 0.0);
        assert_eq!(GRAMMAR_COMPONENT.resolve(&many), 30.0);
    }

    #[test]
    fn test_every_key_has_a_chain() {
        for key in BreakdownKey::ALL {
            let value = key.chain().resolve(&raw(json!({})));
            assert!((0.0..=100.0).contains(&value), "{} = {value}", key.as_str());
        }
    }
}
