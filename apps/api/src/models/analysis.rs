use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::scoring::Breakdown;

/// One saved analysis, as stored in `resume_analyses`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalysisRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub filename: String,
    pub resume_text: String,
    pub job_description: String,
    pub match_score: i32,
    pub breakdown: Json<Breakdown>,
    pub extracted_skills: Vec<String>,
    pub suggestions: Vec<String>,
    pub created_at: DateTime<Utc>,
}
