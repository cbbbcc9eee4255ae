//! Axum route handlers for the Resume Analysis API.

use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::engine::classify::CategoryPrediction;
use crate::engine::skills::ExtractedSkillSet;
use crate::engine::MatchAnalysis;
use crate::errors::AppError;
use crate::extraction::{extract_text, DocumentFormat};
use crate::models::resume::{CategoryCount, ResumeRow, ResumeSkillRow};
use crate::resumes::store;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub resume: ResumeRow,
    pub prediction: CategoryPrediction,
    pub skills: ExtractedSkillSet,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    /// Exact category filter.
    pub category: Option<String>,
    /// Case-insensitive filename/content search term.
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResumeDetailResponse {
    pub resume: ResumeRow,
    pub skills: Vec<ResumeSkillRow>,
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub jd_text: String,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub match_id: Uuid,
    pub analysis: MatchAnalysis,
}

#[derive(Debug, Deserialize)]
pub struct CategorizeRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeMatchRequest {
    pub resume_text: String,
    pub jd_text: String,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_resumes: i64,
    pub by_category: Vec<CategoryCount>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes
///
/// Multipart upload of a PDF or DOCX resume. Extracts text, categorizes it,
/// extracts skills, and persists the lot.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let filename = field
                .file_name()
                .ok_or_else(|| AppError::Validation("file field has no filename".to_string()))?
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
            upload = Some((filename, data.to_vec()));
        }
    }

    let (filename, bytes) =
        upload.ok_or_else(|| AppError::Validation("missing 'file' field".to_string()))?;

    if bytes.is_empty() {
        return Err(AppError::Validation("uploaded file is empty".to_string()));
    }
    if bytes.len() > state.config.max_upload_bytes() {
        return Err(AppError::Validation(format!(
            "file exceeds {} MB limit",
            state.config.max_upload_mb
        )));
    }

    let format = DocumentFormat::from_filename(&filename)
        .ok_or_else(|| AppError::UnsupportedFormat(filename.clone()))?;
    let raw_text = extract_text(&bytes, format)?;

    let prediction = state.engine.categorize(&raw_text);
    let skills = state.engine.extract_skills(&raw_text);

    let resume = store::insert_resume(&state.db, &filename, &raw_text, &prediction).await?;
    store::insert_resume_skills(&state.db, resume.id, &skills).await?;

    info!(
        resume_id = %resume.id,
        format = format.as_str(),
        category = %prediction.category,
        skill_count = skills.len(),
        "resume analyzed"
    );

    Ok(Json(UploadResponse {
        resume,
        prediction,
        skills,
    }))
}

/// GET /api/v1/resumes
///
/// Optional `category` (exact) and `q` (filename/content search) filters;
/// `category` wins when both are given.
pub async fn handle_list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    let limit = params.limit.unwrap_or(100).clamp(1, 500);
    let resumes = match (&params.category, &params.q) {
        (Some(category), _) => {
            store::get_resumes_by_category(&state.db, category, limit).await?
        }
        (None, Some(q)) => store::search_resumes(&state.db, q, limit).await?,
        (None, None) => store::list_resumes(&state.db, limit).await?,
    };
    Ok(Json(resumes))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<ResumeDetailResponse>, AppError> {
    let resume = store::get_resume(&state.db, resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;
    let skills = store::get_resume_skills(&state.db, resume_id).await?;
    Ok(Json(ResumeDetailResponse { resume, skills }))
}

/// POST /api/v1/resumes/:id/match
///
/// Scores a stored resume against a job description and persists the match.
/// An empty job description is a valid zero-score analysis, not an error.
pub async fn handle_match_stored(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    let resume = store::get_resume(&state.db, resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;

    let analysis = state.engine.match_against_job(&resume.raw_text, &request.jd_text);
    let row = store::insert_jd_match(&state.db, resume_id, &request.jd_text, &analysis).await?;

    info!(
        resume_id = %resume_id,
        score = analysis.result.match_score,
        degraded = analysis.degraded,
        "job match computed"
    );

    Ok(Json(MatchResponse {
        match_id: row.id,
        analysis,
    }))
}

/// POST /api/v1/analyze/categorize
///
/// Stateless categorization of raw text; nothing is persisted.
pub async fn handle_categorize(
    State(state): State<AppState>,
    Json(request): Json<CategorizeRequest>,
) -> Result<Json<CategoryPrediction>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }
    Ok(Json(state.engine.categorize(&request.text)))
}

/// POST /api/v1/analyze/match
///
/// Stateless resume-vs-job-description scoring; nothing is persisted.
/// `jd_text` may be empty (yields a zero-score result); `resume_text` may not.
pub async fn handle_analyze_match(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeMatchRequest>,
) -> Result<Json<MatchAnalysis>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }
    Ok(Json(
        state
            .engine
            .match_against_job(&request.resume_text, &request.jd_text),
    ))
}

/// GET /api/v1/stats
pub async fn handle_stats(
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, AppError> {
    let total_resumes = store::count_resumes(&state.db).await?;
    let by_category = store::category_stats(&state.db).await?;
    Ok(Json(StatsResponse {
        total_resumes,
        by_category,
    }))
}
