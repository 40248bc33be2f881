use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumeAnalysis {
    pub summary: String,
    pub detected_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub suggested_improvements: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SkillEvaluationRequest {
    pub target_role: String,
    pub current_skills: Vec<String>,
    pub experience_years: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillGap {
    pub skill: String,
    pub level: String,
    pub priority: String,
}

#[derive(Debug, Serialize)]
pub struct SkillEvaluationResponse {
    pub role: String,
    pub strengths: Vec<String>,
    pub gaps: Vec<SkillGap>,
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct TrainingPlanRequest {
    pub target_role: String,
    #[serde(default)]
    pub gaps: Vec<String>,
    pub weeks_available: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanItem {
    pub week: u32,
    pub focus: String,
    pub resources: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TrainingPlanResponse {
    pub role: String,
    pub duration_weeks: u32,
    pub plan: Vec<PlanItem>,
}

#[derive(Debug, Deserialize)]
pub struct QuizRequest {
    pub domain: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default = "default_num_questions")]
    pub num_questions: i64,
}
fn default_difficulty() -> String {
    "medium".into()
}
fn default_num_questions() -> i64 {
    5
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizQuestion {
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

#[derive(Debug, Deserialize)]
pub struct QuizSubmission {
    pub answers: Vec<i64>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct QuizResult {
    pub score: usize,
    pub total: usize,
    pub feedback: String,
}

#[derive(Debug, Deserialize)]
pub struct InterviewStartRequest {
    pub target_role: String,
    pub experience_years: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterviewQuestion {
    pub id: u32,
    pub question: String,
    pub hint: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InterviewAnswer {
    pub question_id: u32,
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct InterviewFeedback {
    pub score: u8,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct JobRecommendationRequest {
    pub target_role: String,
    pub location_preference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobRecommendation {
    pub title: String,
    pub company: String,
    pub location: String,
    pub match_score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressItem {
    pub module: String,
    pub completed: u32,
    pub total: u32,
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub items: Vec<ProgressItem>,
}
