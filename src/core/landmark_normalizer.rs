// Landmark normalizer: raw detector output to labeled percentage-space points

use crate::models::pose::{BodyLandmark, Point, RawLandmark};

/// Map raw landmarks into labeled points, dropping anything at or below `threshold`.
///
/// Points are emitted in the order of [`BodyLandmark::TRACKED`], one per label.
/// Missing or low-confidence landmarks are omitted, never interpolated. An empty
/// or short input simply yields fewer points.
pub fn normalize_landmarks(landmarks: &[RawLandmark], threshold: f32) -> Vec<Point> {
    BodyLandmark::TRACKED
        .iter()
        .filter_map(|&landmark| {
            let raw = landmarks.get(landmark.index())?;
            raw.is_visible(threshold)
                .then(|| Point::new(raw.x * 100.0, raw.y * 100.0, landmark.label()))
        })
        .collect()
}
