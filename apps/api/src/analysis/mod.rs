// Analysis pipeline: upload → remote analysis service → score resolution → optional history row.
// The remote call goes through analysis_client; scoring stays pure.

pub mod handlers;
pub mod upload;

use serde_json::Value;
use tracing::info;

use crate::analysis_client::{ResumeAnalyzer, ResumeUpload};
use crate::errors::AppError;
use crate::scoring::{resolve_value, ResolvedScore};

/// Raw service payload alongside the score resolved from it.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub raw: Value,
    pub score: ResolvedScore,
}

pub async fn run_analysis(
    analyzer: &dyn ResumeAnalyzer,
    upload: &ResumeUpload,
) -> Result<AnalysisOutcome, AppError> {
    info!(
        "Analyzing {} ({} bytes, job description: {})",
        upload.filename,
        upload.data.len(),
        upload.jd_text.is_some()
    );

    let raw = analyzer.analyze(upload).await?;
    let score = resolve_value(&raw);

    info!(
        "Resolved {}: final score {}, {} suggestions",
        upload.filename,
        score.final_score,
        score.suggestions.len()
    );

    Ok(AnalysisOutcome { raw, score })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use serde_json::json;
    use std::sync::Mutex;

    use crate::analysis_client::AnalysisError;

    /// Returns a canned payload and remembers what it was asked to analyze.
    struct StubAnalyzer {
        payload: Result<Value, u16>,
        seen: Mutex<Vec<String>>,
    }

    impl StubAnalyzer {
        fn returning(payload: Value) -> Self {
            Self {
                payload: Ok(payload),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                payload: Err(status),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ResumeAnalyzer for StubAnalyzer {
        async fn analyze(&self, upload: &ResumeUpload) -> Result<Value, AnalysisError> {
            self.seen.lock().unwrap().push(upload.filename.clone());
            match &self.payload {
                Ok(value) => Ok(value.clone()),
                Err(status) => Err(AnalysisError::Api {
                    status: *status,
                    message: "analysis failed".to_string(),
                }),
            }
        }
    }

    fn upload() -> ResumeUpload {
        ResumeUpload {
            filename: "cv.pdf".to_string(),
            content_type: None,
            data: Bytes::from_static(b"%PDF"),
            jd_text: None,
        }
    }

    #[tokio::test]
    async fn test_run_analysis_resolves_service_payload() {
        let analyzer = StubAnalyzer::returning(json!({
            "final_score": 66.5,
            "suggestions": ["Consider adding more detail to your resume"],
            "quality": { "total_issues_count": 1 }
        }));

        let outcome = run_analysis(&analyzer, &upload()).await.unwrap();

        assert_eq!(outcome.score.final_score, 67);
        assert_eq!(outcome.score.breakdown.grammar, 95);
        assert_eq!(outcome.score.suggestions.len(), 1);
        assert_eq!(outcome.raw["final_score"], 66.5);
        assert_eq!(*analyzer.seen.lock().unwrap(), vec!["cv.pdf"]);
    }

    #[tokio::test]
    async fn test_run_analysis_handles_non_object_payload() {
        let analyzer = StubAnalyzer::returning(Value::Null);

        let outcome = run_analysis(&analyzer, &upload()).await.unwrap();

        assert_eq!(outcome.score.final_score, 44);
        assert_eq!(outcome.score.breakdown.relevance, 78);
    }

    #[tokio::test]
    async fn test_run_analysis_surfaces_upstream_failure() {
        let analyzer = StubAnalyzer::failing(500);

        let err = run_analysis(&analyzer, &upload()).await.unwrap_err();

        assert!(matches!(err, AppError::Upstream(AnalysisError::Api { status: 500, .. })));
    }
}
