// Skeleton assembly from normalized points and the center-of-gravity estimate

use crate::core::cog_estimator::estimate_center_of_gravity;
use crate::core::landmark_normalizer::normalize_landmarks;
use crate::models::pose::{Point, PoseConfig, RawLandmark, Skeleton};

/// Combine normalized points and an optional center of gravity. No filtering happens here.
pub fn assemble_skeleton(points: Vec<Point>, cog: Option<Point>) -> Skeleton {
    Skeleton { points, cog }
}

/// Run the normalizer and the estimator over one frame and assemble the result
pub fn skeleton_from_landmarks(landmarks: &[RawLandmark], config: &PoseConfig) -> Skeleton {
    let points = normalize_landmarks(landmarks, config.point_visibility_threshold);
    let cog = estimate_center_of_gravity(landmarks, config.segment_visibility_threshold);
    assemble_skeleton(points, cog)
}
