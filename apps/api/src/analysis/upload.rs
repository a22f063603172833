use axum::extract::Multipart;
use bytes::Bytes;
use uuid::Uuid;

use crate::analysis_client::ResumeUpload;
use crate::errors::AppError;

/// Field names accepted for each form part. The second name in each list is
/// the one older front ends send.
const FILE_FIELDS: &[&str] = &["file", "resume"];
const JD_FIELDS: &[&str] = &["jd_text", "job_description"];
const USER_FIELD: &str = "user_id";

const DEFAULT_FILENAME: &str = "resume";

/// A parsed analysis form: the upload plus who, if anyone, to save it for.
#[derive(Debug)]
pub struct AnalyzeForm {
    pub upload: ResumeUpload,
    pub user_id: Option<Uuid>,
}

pub async fn read_analyze_form(mut multipart: Multipart) -> Result<AnalyzeForm, AppError> {
    let mut file: Option<(String, Option<String>, Bytes)> = None;
    let mut jd_text: Option<String> = None;
    let mut user_id: Option<Uuid> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if FILE_FIELDS.contains(&name.as_str()) {
            let filename = field
                .file_name()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or(DEFAULT_FILENAME)
                .to_string();
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Could not read resume file: {e}")))?;
            file = Some((filename, content_type, data));
        } else if JD_FIELDS.contains(&name.as_str()) {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Could not read job description: {e}")))?;
            jd_text = normalize_jd(text);
        } else if name == USER_FIELD {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Could not read user_id: {e}")))?;
            user_id = parse_user_id(&text)?;
        }
    }

    let (filename, content_type, data) =
        file.ok_or_else(|| AppError::Validation("A resume file is required".to_string()))?;
    if data.is_empty() {
        return Err(AppError::Validation("The resume file is empty".to_string()));
    }

    Ok(AnalyzeForm {
        upload: ResumeUpload {
            filename,
            content_type,
            data,
            jd_text,
        },
        user_id,
    })
}

/// Blank job descriptions count as absent.
fn normalize_jd(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Blank is anonymous; anything else must be a UUID.
fn parse_user_id(text: &str) -> Result<Option<Uuid>, AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    Uuid::parse_str(text)
        .map(Some)
        .map_err(|_| AppError::Validation(format!("user_id '{text}' is not a valid UUID")))
}
