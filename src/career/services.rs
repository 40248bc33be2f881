//! Rule-based stand-ins for the career tools. Everything here is pure and
//! deterministic; no model or external API is called.

use tracing::debug;

use crate::career::dto::{
    InterviewAnswer, InterviewFeedback, InterviewQuestion, InterviewStartRequest,
    JobRecommendation, JobRecommendationRequest, PlanItem, ProgressItem, ProgressResponse,
    QuizQuestion, QuizRequest, QuizResult, ResumeAnalysis, SkillEvaluationRequest,
    SkillEvaluationResponse, SkillGap, TrainingPlanRequest, TrainingPlanResponse,
};

/// Upper bound on `weeks_available` for a training plan.
pub const MAX_PLAN_WEEKS: u32 = 104;

const CORE_SKILLS: [&str; 3] = ["python", "react", "sql"];
const DEFAULT_PLAN_TOPICS: [&str; 3] = ["Foundations", "Projects", "Interview Prep"];
const QUIZ_ANSWER_KEY: [usize; 2] = [2, 2];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn analyze_resume(text: &str) -> ResumeAnalysis {
    debug!(chars = text.chars().count(), "analyzing resume");
    ResumeAnalysis {
        summary: "AI analysis placeholder. Connect OpenAI to enable deep resume feedback."
            .into(),
        detected_skills: strings(&["Python", "React", "SQL"]),
        missing_skills: strings(&["Data Visualization", "Cloud Fundamentals"]),
        suggested_improvements: strings(&[
            "Quantify your achievements with metrics.",
            "Showcase cloud or DevOps exposure if available.",
        ]),
    }
}

pub fn evaluate_skills(req: &SkillEvaluationRequest) -> SkillEvaluationResponse {
    let strengths: Vec<String> = req
        .current_skills
        .iter()
        .filter(|skill| CORE_SKILLS.contains(&skill.to_lowercase().as_str()))
        .cloned()
        .collect();

    let gaps = vec![
        SkillGap {
            skill: "Data Visualization".into(),
            level: "beginner".into(),
            priority: "high".into(),
        },
        SkillGap {
            skill: "Cloud Fundamentals".into(),
            level: "beginner".into(),
            priority: "medium".into(),
        },
    ];

    let foundations = if strengths.is_empty() {
        "general programming".to_string()
    } else {
        strengths.join(", ")
    };
    let summary = format!(
        "For the role {}, you have strong foundations in {} but should focus on \
         visualization and cloud concepts to be more market-ready.",
        req.target_role, foundations
    );

    SkillEvaluationResponse {
        role: req.target_role.clone(),
        strengths,
        gaps,
        summary,
    }
}

/// One item per week, cycling through the requested gaps.
pub fn generate_plan(req: &TrainingPlanRequest) -> TrainingPlanResponse {
    let topics: Vec<&str> = if req.gaps.is_empty() {
        DEFAULT_PLAN_TOPICS.to_vec()
    } else {
        req.gaps.iter().map(String::as_str).collect()
    };

    let plan = (1..=req.weeks_available)
        .zip(topics.iter().cycle())
        .map(|(week, topic)| PlanItem {
            week,
            focus: format!("Deep dive into {topic}"),
            resources: vec![
                format!("Read top 3 tutorials on {topic}"),
                format!("Build a mini-project applying {topic}"),
            ],
        })
        .collect();

    TrainingPlanResponse {
        role: req.target_role.clone(),
        duration_weeks: req.weeks_available,
        plan,
    }
}

pub fn generate_quiz(req: &QuizRequest) -> Vec<QuizQuestion> {
    debug!(domain = %req.domain, difficulty = %req.difficulty, "generating quiz");
    let questions = [
        QuizQuestion {
            id: 1,
            question: format!(
                "Which data structure is best for LRU cache in {}?",
                req.domain
            ),
            options: strings(&["Queue", "Stack", "LinkedHashMap / OrderedDict", "Array"]),
            correct_index: QUIZ_ANSWER_KEY[0],
        },
        QuizQuestion {
            id: 2,
            question: "What does Big-O notation describe?".into(),
            options: strings(&[
                "Exact runtime",
                "Average memory usage",
                "Asymptotic performance",
                "Compiler speed",
            ]),
            correct_index: QUIZ_ANSWER_KEY[1],
        },
    ];
    let count = usize::try_from(req.num_questions).unwrap_or(0);
    questions.into_iter().take(count).collect()
}

/// Scores against the fixed answer key. Answers beyond the key are ignored;
/// negative answers never match.
pub fn score_quiz(answers: &[i64]) -> QuizResult {
    let total = answers.len().min(QUIZ_ANSWER_KEY.len());
    let score = answers
        .iter()
        .zip(QUIZ_ANSWER_KEY.iter())
        .filter(|(given, expected)| usize::try_from(**given).ok() == Some(**expected))
        .count();

    let feedback = if score == total {
        "Great work!"
    } else {
        "Review the explanations and try again."
    };
    QuizResult {
        score,
        total,
        feedback: feedback.into(),
    }
}

pub fn start_interview(req: &InterviewStartRequest) -> Vec<InterviewQuestion> {
    vec![
        InterviewQuestion {
            id: 1,
            question: format!(
                "Tell me about a project where you used {} skills.",
                req.target_role
            ),
            hint: Some("Focus on impact, metrics, and your specific contribution.".into()),
        },
        InterviewQuestion {
            id: 2,
            question: "Describe a time you handled a difficult technical challenge.".into(),
            hint: None,
        },
    ]
}

pub fn interview_feedback(answers: &[InterviewAnswer]) -> InterviewFeedback {
    let answered = answers.iter().filter(|a| !a.answer.trim().is_empty()).count();
    let question_ids: Vec<u32> = answers.iter().map(|a| a.question_id).collect();
    debug!(?question_ids, answered, "interview feedback");
    InterviewFeedback {
        score: 8,
        strengths: strings(&["Clear structure", "Relevant examples"]),
        improvements: strings(&[
            "Add more measurable outcomes",
            "Highlight your specific responsibilities",
        ]),
    }
}

pub fn recommend_jobs(req: &JobRecommendationRequest) -> Vec<JobRecommendation> {
    let location = req
        .location_preference
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or("Remote");

    vec![
        JobRecommendation {
            title: req.target_role.clone(),
            company: "Vidyamitra Labs".into(),
            location: location.into(),
            match_score: 87,
        },
        JobRecommendation {
            title: format!("Junior {}", req.target_role),
            company: "Future Careers Inc.".into(),
            location: location.into(),
            match_score: 79,
        },
    ]
}

pub fn progress() -> ProgressResponse {
    let item = |module: &str, completed, total| ProgressItem {
        module: module.into(),
        completed,
        total,
    };
    ProgressResponse {
        items: vec![
            item("Resume Evaluation", 1, 1),
            item("Skill Mapping", 2, 5),
            item("Training Planner", 1, 3),
            item("Quizzes", 3, 10),
            item("Mock Interviews", 1, 4),
        ],
    }
}
