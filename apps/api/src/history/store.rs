use serde_json::Value;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::analysis::AnalysisRow;
use crate::scoring::ResolvedScore;

/// Schema for the history table, embedded from `apps/api/migrations`.
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 50;

/// Creates the PostgreSQL connection pool backing the history table.
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Brings the history schema up to date. Already-applied migrations are skipped.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

/// Everything needed to save one analysis.
pub struct NewAnalysis<'a> {
    pub user_id: Uuid,
    pub filename: &'a str,
    pub job_description: &'a str,
    pub raw: &'a Value,
    pub score: &'a ResolvedScore,
}

pub async fn insert_analysis(pool: &PgPool, new: NewAnalysis<'_>) -> Result<Uuid, sqlx::Error> {
    let NewAnalysis {
        user_id,
        filename,
        job_description,
        raw,
        score,
    } = new;

    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO resume_analyses
            (id, user_id, filename, resume_text, job_description,
             match_score, breakdown, extracted_skills, suggestions)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(filename)
    .bind(resume_text(raw))
    .bind(job_description)
    .bind(score.final_score as i32)
    .bind(Json(score.breakdown))
    .bind(extracted_skills(raw))
    .bind(&score.suggestions)
    .execute(pool)
    .await?;

    info!("Saved analysis {id} for user {user_id}");
    Ok(id)
}

/// Most recent analyses first.
pub async fn list_analyses(
    pool: &PgPool,
    user_id: Uuid,
    limit: Option<i64>,
) -> Result<Vec<AnalysisRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM resume_analyses WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
    )
    .bind(user_id)
    .bind(page_size(limit))
    .fetch_all(pool)
    .await
}

pub async fn get_analysis(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<Option<AnalysisRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM resume_analyses WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Returns whether a row was deleted.
pub async fn delete_analysis(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM resume_analyses WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

fn page_size(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Plain resume text from the service payload, if it sent any.
fn resume_text(raw: &Value) -> &str {
    ["/parsed_resume/text", "/parsed_resume/resume_text"]
        .iter()
        .find_map(|path| raw.pointer(path).and_then(Value::as_str))
        .unwrap_or_default()
}

/// Skill names from the service payload; non-string entries are skipped.
fn extracted_skills(raw: &Value) -> Vec<String> {
    raw.pointer("/parsed_resume/skills")
        .and_then(Value::as_array)
        .map(|skills| {
            skills
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
