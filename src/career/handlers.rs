use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart},
    routing::{get, post},
    Json, Router,
};
use tracing::{debug, instrument, warn};

use super::dto::{
    InterviewAnswer, InterviewFeedback, InterviewQuestion, InterviewStartRequest,
    JobRecommendation, JobRecommendationRequest, ProgressResponse, QuizQuestion, QuizRequest,
    QuizResult, QuizSubmission, ResumeAnalysis, SkillEvaluationRequest,
    SkillEvaluationResponse, TrainingPlanRequest, TrainingPlanResponse,
};
use super::services::{self, MAX_PLAN_WEEKS};
use crate::{errors::AppError, extractors::ValidatedJson, state::AppState};

const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;

// The web client calls the bare paths; the trailing-slash forms are kept for
// older callers.
pub fn career_routes() -> Router<AppState> {
    Router::new()
        .route("/resume/parse", post(parse_resume))
        .layer(DefaultBodyLimit::max(MAX_RESUME_BYTES))
        .route("/evaluate", post(evaluate_skills))
        .route("/evaluate/", post(evaluate_skills))
        .route("/plan", post(generate_plan))
        .route("/plan/", post(generate_plan))
        .route("/quiz/generate", post(generate_quiz))
        .route("/quiz/submit", post(submit_quiz))
        .route("/interview/start", post(start_interview))
        .route("/interview/feedback", post(interview_feedback))
        .route("/jobs", post(recommend_jobs))
        .route("/jobs/", post(recommend_jobs))
        .route("/progress", get(get_progress))
        .route("/progress/", get(get_progress))
}

/// POST /resume/parse (multipart, field `file`)
#[instrument(skip(upload))]
pub async fn parse_resume(
    upload: Result<Multipart, MultipartRejection>,
) -> Result<Json<ResumeAnalysis>, AppError> {
    let mut mp = upload?;
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            break;
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        debug!(%filename, bytes = data.len(), "resume uploaded");

        let content = String::from_utf8_lossy(&data);
        let text: &str = if content.trim().is_empty() {
            "Empty resume content"
        } else {
            &content
        };
        return Ok(Json(services::analyze_resume(text)));
    }

    warn!("resume upload without a file");
    Err(AppError::BadRequest("No file uploaded".into()))
}

#[instrument(skip(payload), fields(role = %payload.target_role))]
pub async fn evaluate_skills(
    ValidatedJson(payload): ValidatedJson<SkillEvaluationRequest>,
) -> Json<SkillEvaluationResponse> {
    debug!(
        skills = payload.current_skills.len(),
        experience_years = payload.experience_years,
        "evaluating skills"
    );
    Json(services::evaluate_skills(&payload))
}

#[instrument(skip(payload), fields(role = %payload.target_role))]
pub async fn generate_plan(
    ValidatedJson(payload): ValidatedJson<TrainingPlanRequest>,
) -> Result<Json<TrainingPlanResponse>, AppError> {
    if payload.weeks_available > MAX_PLAN_WEEKS {
        return Err(AppError::Validation(format!(
            "weeks_available must be at most {MAX_PLAN_WEEKS}"
        )));
    }
    Ok(Json(services::generate_plan(&payload)))
}

#[instrument(skip(payload))]
pub async fn generate_quiz(
    ValidatedJson(payload): ValidatedJson<QuizRequest>,
) -> Json<Vec<QuizQuestion>> {
    Json(services::generate_quiz(&payload))
}

#[instrument(skip(submission))]
pub async fn submit_quiz(
    ValidatedJson(submission): ValidatedJson<QuizSubmission>,
) -> Json<QuizResult> {
    Json(services::score_quiz(&submission.answers))
}

#[instrument(skip(payload), fields(role = %payload.target_role))]
pub async fn start_interview(
    ValidatedJson(payload): ValidatedJson<InterviewStartRequest>,
) -> Json<Vec<InterviewQuestion>> {
    debug!(experience_years = payload.experience_years, "starting interview");
    Json(services::start_interview(&payload))
}

#[instrument(skip(answers))]
pub async fn interview_feedback(
    ValidatedJson(answers): ValidatedJson<Vec<InterviewAnswer>>,
) -> Json<InterviewFeedback> {
    Json(services::interview_feedback(&answers))
}

#[instrument(skip(payload), fields(role = %payload.target_role))]
pub async fn recommend_jobs(
    ValidatedJson(payload): ValidatedJson<JobRecommendationRequest>,
) -> Json<Vec<JobRecommendation>> {
    Json(services::recommend_jobs(&payload))
}

#[instrument]
pub async fn get_progress() -> Json<ProgressResponse> {
    Json(services::progress())
}
