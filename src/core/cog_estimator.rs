// Center-of-gravity estimation from weighted body segments
//
// A coarse fixed model for coaching visualization: four segments with constant
// mass fractions, not a subject-specific biomechanical measurement.

use crate::models::pose::{BodyLandmark, BodySegment, Point, RawLandmark, COG_LABEL};

/// Pelvis, upper trunk, thighs and calves. Weights sum to 1.0.
pub const BODY_SEGMENTS: [BodySegment; 4] = [
    BodySegment {
        name: "pelvis",
        landmarks: [BodyLandmark::LeftHip, BodyLandmark::RightHip],
        weight: 0.40,
    },
    BodySegment {
        name: "upper trunk",
        landmarks: [BodyLandmark::LeftShoulder, BodyLandmark::RightShoulder],
        weight: 0.30,
    },
    BodySegment {
        name: "thighs",
        landmarks: [BodyLandmark::LeftKnee, BodyLandmark::RightKnee],
        weight: 0.20,
    },
    BodySegment {
        name: "calves",
        landmarks: [BodyLandmark::LeftAnkle, BodyLandmark::RightAnkle],
        weight: 0.10,
    },
];

/// Mean position of the segment's visible landmarks, in unit space
fn segment_center(
    segment: &BodySegment,
    landmarks: &[RawLandmark],
    threshold: f32,
) -> Option<(f32, f32)> {
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut count = 0u32;

    for landmark in segment.landmarks {
        if let Some(raw) = landmarks.get(landmark.index()) {
            if raw.is_visible(threshold) {
                sum_x += raw.x;
                sum_y += raw.y;
                count += 1;
            }
        }
    }

    if count == 0 {
        return None;
    }
    Some((sum_x / count as f32, sum_y / count as f32))
}

/// Estimate the whole-body center of gravity in percentage space.
///
/// The weighted sum is divided by the weight of the segments that actually
/// contributed, so a hidden segment shifts the estimate toward the visible
/// ones instead of toward the origin. Returns `None` when no segment has a
/// visible landmark.
pub fn estimate_center_of_gravity(landmarks: &[RawLandmark], threshold: f32) -> Option<Point> {
    let mut total_x = 0.0;
    let mut total_y = 0.0;
    let mut total_weight = 0.0;

    for segment in &BODY_SEGMENTS {
        match segment_center(segment, landmarks, threshold) {
            Some((x, y)) => {
                total_x += x * segment.weight;
                total_y += y * segment.weight;
                total_weight += segment.weight;
            }
            None => tracing::debug!(segment = segment.name, "segment not visible, left out of center of gravity"),
        }
    }

    if total_weight == 0.0 {
        return None;
    }

    Some(Point::new(
        total_x / total_weight * 100.0,
        total_y / total_weight * 100.0,
        COG_LABEL,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pose::LANDMARK_COUNT;

    const EPS: f32 = 1e-3;

    fn hidden_landmarks() -> Vec<RawLandmark> {
        vec![RawLandmark::new(0.0, 0.0, 0.0); LANDMARK_COUNT]
    }

    fn set(landmarks: &mut [RawLandmark], landmark: BodyLandmark, x: f32, y: f32) {
        landmarks[landmark.index()] = RawLandmark::new(x, y, 0.9);
    }

    #[test]
    fn test_segment_weights_sum_to_one() {
        let total: f32 = BODY_SEGMENTS.iter().map(|s| s.weight).sum();
        assert!((total - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_segment_names_follow_weight_order() {
        let names: Vec<&str> = BODY_SEGMENTS.iter().map(|s| s.name).collect();
        assert_eq!(names, ["pelvis", "upper trunk", "thighs", "calves"]);
        assert!(BODY_SEGMENTS.windows(2).all(|w| w[0].weight > w[1].weight));
    }

    #[test]
    fn test_all_hidden_yields_none() {
        assert!(estimate_center_of_gravity(&hidden_landmarks(), 0.5).is_none());
        assert!(estimate_center_of_gravity(&[], 0.5).is_none());
    }

    #[test]
    fn test_full_body_weighted_average() {
        let mut landmarks = hidden_landmarks();
        set(&mut landmarks, BodyLandmark::LeftHip, 0.4, 0.5);
        set(&mut landmarks, BodyLandmark::RightHip, 0.6, 0.5);
        set(&mut landmarks, BodyLandmark::LeftShoulder, 0.4, 0.3);
        set(&mut landmarks, BodyLandmark::RightShoulder, 0.6, 0.3);
        set(&mut landmarks, BodyLandmark::LeftKnee, 0.4, 0.7);
        set(&mut landmarks, BodyLandmark::RightKnee, 0.6, 0.7);
        set(&mut landmarks, BodyLandmark::LeftAnkle, 0.4, 0.9);
        set(&mut landmarks, BodyLandmark::RightAnkle, 0.6, 0.9);

        let cog = estimate_center_of_gravity(&landmarks, 0.5).unwrap();
        // 0.4*0.5 + 0.3*0.3 + 0.2*0.7 + 0.1*0.9 = 0.52
        assert!((cog.x - 50.0).abs() < EPS);
        assert!((cog.y - 52.0).abs() < EPS);
        assert_eq!(cog.label, COG_LABEL);
    }

    #[test]
    fn test_single_visible_landmark_stands_for_its_segment() {
        let mut landmarks = hidden_landmarks();
        set(&mut landmarks, BodyLandmark::RightHip, 0.3, 0.6);

        let cog = estimate_center_of_gravity(&landmarks, 0.5).unwrap();
        assert!((cog.x - 30.0).abs() < EPS);
        assert!((cog.y - 60.0).abs() < EPS);
    }

    #[test]
    fn test_missing_segment_renormalizes_over_remaining_weight() {
        let mut landmarks = hidden_landmarks();
        set(&mut landmarks, BodyLandmark::LeftHip, 0.5, 0.5);
        set(&mut landmarks, BodyLandmark::RightHip, 0.5, 0.5);
        set(&mut landmarks, BodyLandmark::LeftKnee, 0.5, 0.7);
        set(&mut landmarks, BodyLandmark::RightKnee, 0.5, 0.7);
        set(&mut landmarks, BodyLandmark::LeftAnkle, 0.5, 0.9);
        set(&mut landmarks, BodyLandmark::RightAnkle, 0.5, 0.9);

        // Trunk hidden: (0.4*0.5 + 0.2*0.7 + 0.1*0.9) / 0.70
        let expected_y = (0.4 * 0.5 + 0.2 * 0.7 + 0.1 * 0.9) / 0.70 * 100.0;
        let cog = estimate_center_of_gravity(&landmarks, 0.5).unwrap();
        assert!((cog.y - expected_y).abs() < EPS);
        assert!((cog.x - 50.0).abs() < EPS);
    }

    #[test]
    fn test_missing_pelvis_divides_by_point_six() {
        let mut landmarks = hidden_landmarks();
        set(&mut landmarks, BodyLandmark::LeftShoulder, 0.2, 0.3);
        set(&mut landmarks, BodyLandmark::RightShoulder, 0.2, 0.3);
        set(&mut landmarks, BodyLandmark::LeftKnee, 0.5, 0.7);
        set(&mut landmarks, BodyLandmark::RightKnee, 0.5, 0.7);
        set(&mut landmarks, BodyLandmark::LeftAnkle, 0.8, 0.9);
        set(&mut landmarks, BodyLandmark::RightAnkle, 0.8, 0.9);

        let expected_x = (0.3 * 0.2 + 0.2 * 0.5 + 0.1 * 0.8) / 0.60 * 100.0;
        let expected_y = (0.3 * 0.3 + 0.2 * 0.7 + 0.1 * 0.9) / 0.60 * 100.0;
        let cog = estimate_center_of_gravity(&landmarks, 0.5).unwrap();
        assert!((cog.x - expected_x).abs() < EPS);
        assert!((cog.y - expected_y).abs() < EPS);
    }

    #[test]
    fn test_threshold_boundary_excludes_segment() {
        let mut landmarks = hidden_landmarks();
        landmarks[BodyLandmark::LeftHip.index()] = RawLandmark::new(0.5, 0.5, 0.5);
        assert!(estimate_center_of_gravity(&landmarks, 0.5).is_none());
    }
}
