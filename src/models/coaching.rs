// Data models for the coaching collaborator and the merged analysis report

use crate::models::pose::{PoseError, Skeleton};
use serde::{Deserialize, Serialize};

// ==============================================================================
// Coaching Analysis (produced by the external coaching collaborator)
// ==============================================================================

/// Scores out of 10
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub stability: f32,
    pub extension: f32,
    pub posture: f32,
}

impl Scores {
    /// Overall rating shown next to the radar chart
    pub fn average(&self) -> f32 {
        (self.stability + self.extension + self.posture) / 3.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExercise {
    pub title: String,
    pub description: String,
}

/// Structured coaching feedback comparing a reference and a learner image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachingAnalysis {
    pub pose_name: String,
    pub scores: Scores,
    pub feedback: Vec<String>,
    pub angle_differences: Vec<String>,
    pub required_muscles: Vec<String>,
    pub training_exercises: Vec<TrainingExercise>,
}

// ==============================================================================
// Analysis Report (coaching + both skeletons)
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub pose_name: String,
    pub scores: Scores,
    pub feedback: Vec<String>,
    pub angle_differences: Vec<String>,
    pub required_muscles: Vec<String>,
    pub training_exercises: Vec<TrainingExercise>,
    pub expert_skeleton: Skeleton,
    pub learner_skeleton: Skeleton,
    pub analyzed_at: i64,
}

impl AnalysisReport {
    pub fn merge(
        coaching: CoachingAnalysis,
        expert_skeleton: Skeleton,
        learner_skeleton: Skeleton,
        analyzed_at: i64,
    ) -> Self {
        Self {
            pose_name: coaching.pose_name,
            scores: coaching.scores,
            feedback: coaching.feedback,
            angle_differences: coaching.angle_differences,
            required_muscles: coaching.required_muscles,
            training_exercises: coaching.training_exercises,
            expert_skeleton,
            learner_skeleton,
            analyzed_at,
        }
    }
}

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CoachingError {
    #[error("Coaching request failed: {0}")]
    Request(String),

    #[error("No response from coaching service")]
    EmptyResponse,

    #[error("Invalid coaching response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

/// Which stage of an analysis session failed
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Skeleton detection failed: {0}")]
    Skeleton(#[from] PoseError),

    #[error("Coaching analysis failed: {0}")]
    Coaching(#[from] CoachingError),
}

impl AnalysisError {
    pub fn guidance(&self) -> &'static str {
        match self {
            AnalysisError::Skeleton(e) => e.guidance(),
            AnalysisError::Coaching(_) => "AI analysis failed. Check that the API key is valid.",
        }
    }
}

pub type CoachingResult<T> = Result<T, CoachingError>;
