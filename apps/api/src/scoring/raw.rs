//! Typed view over the untrusted payload returned by the analysis service.
//!
//! Every field is optional and is read by name out of the JSON object. A field
//! may be spelled in camelCase or snake_case; when both spellings carry a
//! usable value the camelCase one wins. A value with the wrong JSON type is
//! absent, and it never hides the fields next to it.

use serde_json::{Map, Value};

type Object = Map<String, Value>;

const FINAL_SCORE: &[&str] = &["finalScore", "final_score"];
const FEATURE_BLOCKS: &[&str] = &["features", "featuresEnhanced", "features_enhanced"];

#[derive(Debug, Clone, Default)]
pub struct RawAnalysisResult {
    pub final_score: Option<f64>,
    pub semantic: Option<SemanticBlock>,
    /// Feature blocks in lookup order. `features_enhanced` is the name the
    /// analysis service actually emits.
    pub feature_blocks: Vec<FeatureBlock>,
    pub quality: Option<QualityBlock>,
    pub breakdown: Option<Object>,
    pub suggestions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct SemanticBlock {
    pub overall_similarity: Option<f64>,
}

impl SemanticBlock {
    fn from_object(obj: &Object) -> Self {
        Self {
            overall_similarity: number(obj, &["overallSimilarity", "overall_similarity"]),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeatureBlock {
    pub semantic_overall_similarity: Option<f64>,
    pub semantic_per_section_similarity: Vec<Object>,
    pub skill_match: Option<f64>,
    pub years_score: Option<f64>,
    pub achievements_score: Option<f64>,
    pub structure_score: Option<f64>,
    pub layout_score: Option<f64>,
    pub experience_score: Option<f64>,
}

impl FeatureBlock {
    fn from_object(obj: &Object) -> Self {
        Self {
            semantic_overall_similarity: number(
                obj,
                &["semanticOverallSimilarity", "semantic_overall_similarity"],
            ),
            semantic_per_section_similarity: objects(
                obj,
                &["semanticPerSectionSimilarity", "semantic_per_section_similarity"],
            )
            .cloned()
            .collect(),
            skill_match: number(obj, &["skillMatch", "skill_match"]),
            years_score: number(obj, &["yearsScore", "years_score"]),
            achievements_score: number(obj, &["achievementsScore", "achievements_score"]),
            structure_score: number(obj, &["structureScore", "structure_score"]),
            layout_score: number(obj, &["layoutScore", "layout_score"]),
            experience_score: number(obj, &["experienceScore", "experience_score"]),
        }
    }

    /// Similarity ratio for one named resume section, if it is a number.
    pub fn section_similarity(&self, section: &str) -> Option<f64> {
        self.semantic_per_section_similarity
            .iter()
            .find_map(|sections| sections.get(section).and_then(as_number))
    }
}

#[derive(Debug, Clone, Default)]
pub struct QualityBlock {
    pub total_issues_count: Option<f64>,
}

impl QualityBlock {
    fn from_object(obj: &Object) -> Self {
        Self {
            total_issues_count: number(obj, &["totalIssuesCount", "total_issues_count"]),
        }
    }
}

impl RawAnalysisResult {
    /// Builds a result from any JSON value. Anything that is not an object
    /// (including `null`) yields the empty record.
    pub fn from_value(value: &Value) -> Self {
        value.as_object().map(Self::from_object).unwrap_or_default()
    }

    fn from_object(obj: &Object) -> Self {
        Self {
            final_score: number(obj, FINAL_SCORE),
            semantic: objects(obj, &["semantic"]).next().map(SemanticBlock::from_object),
            feature_blocks: objects(obj, FEATURE_BLOCKS)
                .map(FeatureBlock::from_object)
                .collect(),
            quality: objects(obj, &["quality"]).next().map(QualityBlock::from_object),
            breakdown: objects(obj, &["breakdown"]).next().cloned(),
            suggestions: obj.get("suggestions").and_then(strings),
        }
    }

    /// Reads a numeric field from the first feature block that carries it.
    pub fn feature(&self, field: impl Fn(&FeatureBlock) -> Option<f64>) -> Option<f64> {
        self.feature_blocks.iter().find_map(field)
    }

    pub fn semantic_overall(&self) -> Option<f64> {
        self.semantic.as_ref()?.overall_similarity
    }

    /// Issue count, with negative counts read as zero.
    pub fn total_issues(&self) -> Option<f64> {
        self.quality
            .as_ref()?
            .total_issues_count
            .map(|n| n.max(0.0))
    }

    pub fn final_score(&self) -> Option<f64> {
        self.final_score
    }

    /// Numeric entry of the pre-computed breakdown, if any.
    pub fn breakdown_entry(&self, key: &str) -> Option<f64> {
        self.breakdown.as_ref()?.get(key).and_then(as_number)
    }
}

fn as_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

/// The first of `names` that holds a number.
fn number(obj: &Object, names: &[&str]) -> Option<f64> {
    names
        .iter()
        .find_map(|name| obj.get(*name).and_then(as_number))
}

/// Every one of `names` that holds an object, in order.
fn objects<'a>(obj: &'a Object, names: &'a [&'a str]) -> impl Iterator<Item = &'a Object> + 'a {
    names
        .iter()
        .filter_map(move |name| obj.get(*name).and_then(Value::as_object))
}

/// An array of strings; any other shape is absent.
fn strings(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_object_input_is_empty_record() {
        for value in [json!(null), json!([1, 2, 3]), json!(42), json!("text")] {
            let raw = RawAnalysisResult::from_value(&value);
            assert!(raw.final_score().is_none());
            assert!(raw.feature_blocks.is_empty());
            assert!(raw.suggestions.is_none());
        }
    }

    #[test]
    fn test_reads_snake_case_service_payload() {
        let raw = RawAnalysisResult::from_value(&json!({
            "semantic": { "overall_similarity": 0.71, "per_section_similarity": {} },
            "quality": { "total_issues_count": 4, "issues_preview": [] },
            "features_enhanced": {
                "semantic_overall_similarity": 0.7,
                "semantic_per_section_similarity": { "skills": 0.64 }
            }
        }));
        assert_eq!(raw.semantic_overall(), Some(0.71));
        assert_eq!(raw.total_issues(), Some(4.0));
        assert_eq!(raw.feature(|f| f.section_similarity("skills")), Some(0.64));
        assert_eq!(raw.feature(|f| f.semantic_overall_similarity), Some(0.7));
    }

    #[test]
    fn test_reads_camel_case_names() {
        let raw = RawAnalysisResult::from_value(&json!({
            "finalScore": 61,
            "features": { "semanticOverallSimilarity": 0.5, "structureScore": 77 },
            "quality": { "totalIssuesCount": 2 }
        }));
        assert_eq!(raw.final_score(), Some(61.0));
        assert_eq!(raw.feature(|f| f.structure_score), Some(77.0));
        assert_eq!(raw.total_issues(), Some(2.0));
    }

    #[test]
    fn test_both_spellings_keep_the_rest_of_the_record() {
        let raw = RawAnalysisResult::from_value(&json!({
            "finalScore": 90,
            "final_score": 90,
            "suggestions": ["Add metrics"],
            "breakdown": { "skills": 12 },
            "features": { "structureScore": 50, "structure_score": 50, "skillMatch": 0.3 }
        }));
        assert_eq!(raw.final_score(), Some(90.0));
        assert_eq!(raw.suggestions, Some(vec!["Add metrics".to_string()]));
        assert_eq!(raw.breakdown_entry("skills"), Some(12.0));
        assert_eq!(raw.feature(|f| f.structure_score), Some(50.0));
        assert_eq!(raw.feature(|f| f.skill_match), Some(0.3));
    }

    #[test]
    fn test_camel_case_wins_over_snake_case() {
        let raw = RawAnalysisResult::from_value(&json!({
            "finalScore": 81,
            "final_score": 12,
            "quality": { "totalIssuesCount": 1, "total_issues_count": 9 }
        }));
        assert_eq!(raw.final_score(), Some(81.0));
        assert_eq!(raw.total_issues(), Some(1.0));
    }

    #[test]
    fn test_unusable_spelling_falls_through_to_the_other() {
        let raw = RawAnalysisResult::from_value(&json!({
            "finalScore": "ninety",
            "final_score": 72,
            "features": { "layoutScore": null, "layout_score": 48 }
        }));
        assert_eq!(raw.final_score(), Some(72.0));
        assert_eq!(raw.feature(|f| f.layout_score), Some(48.0));
    }

    #[test]
    fn test_wrong_types_are_absent_not_fatal() {
        let raw = RawAnalysisResult::from_value(&json!({
            "final_score": "ninety",
            "semantic": 3,
            "features": { "skill_match": "high", "years_score": 55 },
            "quality": { "total_issues_count": null },
            "suggestions": "rewrite it"
        }));
        assert!(raw.final_score().is_none());
        assert!(raw.semantic.is_none());
        assert!(raw.feature(|f| f.skill_match).is_none());
        assert_eq!(raw.feature(|f| f.years_score), Some(55.0));
        assert!(raw.total_issues().is_none());
        assert!(raw.suggestions.is_none());
    }

    #[test]
    fn test_mixed_suggestion_array_is_absent() {
        let raw = RawAnalysisResult::from_value(&json!({ "suggestions": ["ok", 3] }));
        assert!(raw.suggestions.is_none());
    }

    #[test]
    fn test_features_block_takes_precedence_per_field() {
        let raw = RawAnalysisResult::from_value(&json!({
            "features": { "layout_score": 40 },
            "features_enhanced": { "layout_score": 90, "structure_score": 66 }
        }));
        assert_eq!(raw.feature(|f| f.layout_score), Some(40.0));
        assert_eq!(raw.feature(|f| f.structure_score), Some(66.0));
    }

    #[test]
    fn test_negative_issue_count_reads_as_zero() {
        let raw = RawAnalysisResult::from_value(&json!({ "quality": { "total_issues_count": -3 } }));
        assert_eq!(raw.total_issues(), Some(0.0));
    }

    #[test]
    fn test_breakdown_entry_ignores_non_numeric_values() {
        let raw = RawAnalysisResult::from_value(&json!({
            "breakdown": { "skills": 42, "grammar": "n/a" }
        }));
        assert_eq!(raw.breakdown_entry("skills"), Some(42.0));
        assert!(raw.breakdown_entry("grammar").is_none());
        assert!(raw.breakdown_entry("relevance").is_none());
    }
}
