// Expert/learner comparison session: two skeletons plus one coaching result

use crate::core::image_loader::ImageSource;
use crate::core::pose_detector::PoseDetector;
use crate::models::coaching::{AnalysisError, AnalysisReport, CoachingAnalysis, CoachingResult};
use crate::platform::pose::{DefaultMediaPipe, MediaPipeBridge};
use async_trait::async_trait;
use std::sync::Arc;

/// External coaching collaborator (generative-AI feedback on an image pair)
#[async_trait]
pub trait CoachingAnalyzer: Send + Sync {
    /// First image is the reference pose, second the learner's attempt
    async fn analyze(&self, expert: &ImageSource, learner: &ImageSource) -> CoachingResult<CoachingAnalysis>;
}

pub struct AnalysisSession<C: CoachingAnalyzer, B: MediaPipeBridge = DefaultMediaPipe> {
    detector: Arc<PoseDetector<B>>,
    coach: C,
}

impl<C: CoachingAnalyzer, B: MediaPipeBridge + 'static> AnalysisSession<C, B> {
    pub fn new(detector: Arc<PoseDetector<B>>, coach: C) -> Self {
        Self { detector, coach }
    }

    pub fn detector(&self) -> &Arc<PoseDetector<B>> {
        &self.detector
    }

    /// Detect both skeletons, then ask for coaching and merge everything.
    ///
    /// The two detections run concurrently through the shared detector. A
    /// skeleton failure stops the session before the coaching call is made.
    pub async fn analyze(&self, expert: &ImageSource, learner: &ImageSource) -> Result<AnalysisReport, AnalysisError> {
        let (expert_skeleton, learner_skeleton) =
            tokio::join!(self.detector.detect(expert), self.detector.detect(learner));
        let expert_skeleton = expert_skeleton?;
        let learner_skeleton = learner_skeleton?;

        if !expert_skeleton.has_subject() || !learner_skeleton.has_subject() {
            tracing::warn!(
                expert_points = expert_skeleton.points.len(),
                learner_points = learner_skeleton.points.len(),
                "no person found in at least one image"
            );
        }

        let coaching = self.coach.analyze(expert, learner).await?;
        tracing::info!(pose = %coaching.pose_name, score = coaching.scores.average(), "coaching analysis complete");

        Ok(AnalysisReport::merge(
            coaching,
            expert_skeleton,
            learner_skeleton,
            chrono::Utc::now().timestamp_millis(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::image_loader::tests::png_bytes;
    use crate::core::pose_detector::tests::{upper_body_landmarks, MockBridge};
    use crate::core::pose_detector::DetectorContext;
    use crate::models::coaching::{CoachingError, Scores, TrainingExercise};
    use crate::models::pose::{PoseConfig, PoseError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct FixedCoach {
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CoachingAnalyzer for FixedCoach {
        async fn analyze(&self, _expert: &ImageSource, _learner: &ImageSource) -> CoachingResult<CoachingAnalysis> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(CoachingError::EmptyResponse);
            }
            Ok(CoachingAnalysis {
                pose_name: "Penche".to_string(),
                scores: Scores {
                    stability: 7.0,
                    extension: 8.0,
                    posture: 6.0,
                },
                feedback: vec!["Keep the supporting knee locked".to_string()],
                angle_differences: vec!["Trunk leans 15 degrees further forward".to_string()],
                required_muscles: vec!["iliopsoas".to_string()],
                training_exercises: vec![TrainingExercise {
                    title: "Leg raises".to_string(),
                    description: "3 sets of 10".to_string(),
                }],
            })
        }
    }

    fn session(landmarks: Option<Vec<crate::models::pose::RawLandmark>>, fail: bool) -> AnalysisSession<FixedCoach, MockBridge> {
        let context = DetectorContext::with_factory(PoseConfig::default(), move |_| {
            Ok(MockBridge::scripted(Duration::from_millis(10), landmarks.clone()))
        });
        let detector = Arc::new(PoseDetector::with_context(context));
        AnalysisSession::new(
            detector,
            FixedCoach {
                fail,
                calls: AtomicUsize::new(0),
            },
        )
    }

    #[tokio::test]
    async fn test_analyze_merges_skeletons_and_coaching() {
        let session = session(Some(upper_body_landmarks()), false);
        let image = ImageSource::Bytes(png_bytes());

        let report = session.analyze(&image, &image).await.unwrap();
        assert_eq!(report.pose_name, "Penche");
        assert_eq!(report.expert_skeleton.points.len(), 4);
        assert_eq!(report.learner_skeleton.points.len(), 4);
        assert!(report.expert_skeleton.cog.is_some());
        assert!(report.analyzed_at > 0);
    }

    #[tokio::test]
    async fn test_no_person_is_not_an_error() {
        let session = session(None, false);
        let image = ImageSource::Bytes(png_bytes());

        let report = session.analyze(&image, &image).await.unwrap();
        assert!(!report.expert_skeleton.has_subject());
        assert!(report.learner_skeleton.cog.is_none());
    }

    #[tokio::test]
    async fn test_skeleton_failure_skips_coaching() {
        let session = session(Some(upper_body_landmarks()), false);
        let good = ImageSource::Bytes(png_bytes());
        let bad = ImageSource::Bytes(vec![0, 1, 2]);

        let result = session.analyze(&good, &bad).await;
        assert!(matches!(result, Err(AnalysisError::Skeleton(PoseError::ImageLoadError(_)))));
        assert_eq!(session.coach.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_coaching_failure_is_reported_as_coaching_stage() {
        let session = session(Some(upper_body_landmarks()), true);
        let image = ImageSource::Bytes(png_bytes());

        let result = session.analyze(&image, &image).await;
        assert!(matches!(result, Err(AnalysisError::Coaching(CoachingError::EmptyResponse))));
    }
}
