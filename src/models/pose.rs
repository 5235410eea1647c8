// Data models for skeletal landmark processing and center-of-gravity estimation

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Label carried by every center-of-gravity point
pub const COG_LABEL: &str = "Center of Gravity";

/// Number of landmarks in the canonical MediaPipe body ordering
pub const LANDMARK_COUNT: usize = 33;

// ==============================================================================
// Body Landmarks (33 keypoints)
// ==============================================================================

/// MediaPipe Pose Landmark indices (33 total)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BodyLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl BodyLandmark {
    /// The 13 landmarks used downstream, in emission order
    pub const TRACKED: [BodyLandmark; 13] = [
        BodyLandmark::Nose,
        BodyLandmark::LeftShoulder,
        BodyLandmark::RightShoulder,
        BodyLandmark::LeftElbow,
        BodyLandmark::RightElbow,
        BodyLandmark::LeftWrist,
        BodyLandmark::RightWrist,
        BodyLandmark::LeftHip,
        BodyLandmark::RightHip,
        BodyLandmark::LeftKnee,
        BodyLandmark::RightKnee,
        BodyLandmark::LeftAnkle,
        BodyLandmark::RightAnkle,
    ];

    /// Position in the detector's landmark array
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stable lowercase label, never localized
    pub fn label(self) -> &'static str {
        match self {
            BodyLandmark::Nose => "nose",
            BodyLandmark::LeftEyeInner => "left eye inner",
            BodyLandmark::LeftEye => "left eye",
            BodyLandmark::LeftEyeOuter => "left eye outer",
            BodyLandmark::RightEyeInner => "right eye inner",
            BodyLandmark::RightEye => "right eye",
            BodyLandmark::RightEyeOuter => "right eye outer",
            BodyLandmark::LeftEar => "left ear",
            BodyLandmark::RightEar => "right ear",
            BodyLandmark::MouthLeft => "mouth left",
            BodyLandmark::MouthRight => "mouth right",
            BodyLandmark::LeftShoulder => "left shoulder",
            BodyLandmark::RightShoulder => "right shoulder",
            BodyLandmark::LeftElbow => "left elbow",
            BodyLandmark::RightElbow => "right elbow",
            BodyLandmark::LeftWrist => "left wrist",
            BodyLandmark::RightWrist => "right wrist",
            BodyLandmark::LeftPinky => "left pinky",
            BodyLandmark::RightPinky => "right pinky",
            BodyLandmark::LeftIndex => "left index",
            BodyLandmark::RightIndex => "right index",
            BodyLandmark::LeftThumb => "left thumb",
            BodyLandmark::RightThumb => "right thumb",
            BodyLandmark::LeftHip => "left hip",
            BodyLandmark::RightHip => "right hip",
            BodyLandmark::LeftKnee => "left knee",
            BodyLandmark::RightKnee => "right knee",
            BodyLandmark::LeftAnkle => "left ankle",
            BodyLandmark::RightAnkle => "right ankle",
            BodyLandmark::LeftHeel => "left heel",
            BodyLandmark::RightHeel => "right heel",
            BodyLandmark::LeftFootIndex => "left foot index",
            BodyLandmark::RightFootIndex => "right foot index",
        }
    }
}

/// One detected landmark as reported by the pose detector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawLandmark {
    pub x: f32,          // Normalized [0, 1] for image coordinates
    pub y: f32,          // Normalized [0, 1] for image coordinates
    #[serde(default)]
    pub visibility: f32, // Detector confidence [0, 1]; missing means not visible
}

impl RawLandmark {
    pub fn new(x: f32, y: f32, visibility: f32) -> Self {
        Self { x, y, visibility }
    }

    /// Strictly above the threshold; a landmark exactly at it is rejected
    pub fn is_visible(&self, threshold: f32) -> bool {
        self.visibility > threshold
    }
}

// ==============================================================================
// Skeleton (renderer-ready output)
// ==============================================================================

/// A landmark rescaled to percentage space [0, 100]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub label: String,
}

impl Point {
    pub fn new(x: f32, y: f32, label: impl Into<String>) -> Self {
        Self {
            x,
            y,
            label: label.into(),
        }
    }
}

/// Filtered points plus an optional center of gravity for one image
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    pub points: Vec<Point>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cog: Option<Point>,
}

impl Skeleton {
    /// Skeleton for an image in which no person was found
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_subject(&self) -> bool {
        !self.points.is_empty()
    }

    /// Vertical reference line from the center of gravity to the image's bottom edge
    pub fn gravity_line(&self) -> Option<Bone> {
        self.cog.as_ref().map(|cog| Bone {
            x1: cog.x,
            y1: cog.y,
            x2: cog.x,
            y2: 100.0,
        })
    }
}

/// Line segment between two named points, in percentage space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Bone {
    pub fn between(from: &Point, to: &Point) -> Self {
        Self {
            x1: from.x,
            y1: from.y,
            x2: to.x,
            y2: to.y,
        }
    }
}

// ==============================================================================
// Body Segments (center-of-gravity model)
// ==============================================================================

/// A group of landmarks with a fixed mass-fraction weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySegment {
    pub name: &'static str,
    pub landmarks: [BodyLandmark; 2],
    pub weight: f32,
}

// ==============================================================================
// Configuration
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseConfig {
    pub model_complexity: ModelComplexity,
    pub smooth_landmarks: bool,
    pub min_detection_confidence: f32,     // Passed to the detector (default: 0.6)
    pub min_tracking_confidence: f32,      // Passed to the detector (default: 0.6)
    pub point_visibility_threshold: f32,   // Skeleton points (default: 0.5)
    pub segment_visibility_threshold: f32, // Center-of-gravity segments (default: 0.5)
    pub detection_timeout_ms: u64,         // Wall-clock budget per detect call (default: 20000)
    pub python_module_dir: Option<PathBuf>, // Extra sys.path entry for the Python backend
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelComplexity {
    Lite = 0,  // Fastest, less accurate
    Full = 1,  // Balanced
    Heavy = 2, // Slowest, most accurate
}

impl ModelComplexity {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            // Still images, so precision wins over latency
            model_complexity: ModelComplexity::Heavy,
            smooth_landmarks: true,
            min_detection_confidence: 0.6,
            min_tracking_confidence: 0.6,
            point_visibility_threshold: 0.5,
            segment_visibility_threshold: 0.5,
            detection_timeout_ms: 20_000,
            python_module_dir: None,
        }
    }
}

impl PoseConfig {
    pub fn detection_timeout(&self) -> Duration {
        Duration::from_millis(self.detection_timeout_ms)
    }

    pub fn validate(&self) -> PoseResult<()> {
        let unit_fields = [
            ("min_detection_confidence", self.min_detection_confidence),
            ("min_tracking_confidence", self.min_tracking_confidence),
            ("point_visibility_threshold", self.point_visibility_threshold),
            ("segment_visibility_threshold", self.segment_visibility_threshold),
        ];
        for (name, value) in unit_fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(PoseError::InvalidConfig(format!(
                    "{}: {}. Must be between 0.0 and 1.0",
                    name, value
                )));
            }
        }

        if self.detection_timeout_ms == 0 || self.detection_timeout_ms > 300_000 {
            return Err(PoseError::InvalidConfig(format!(
                "detection_timeout_ms: {}. Must be between 1 and 300000",
                self.detection_timeout_ms
            )));
        }

        Ok(())
    }
}

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PoseError {
    #[error("Pose detector unavailable: {0}")]
    DetectorUnavailable(String),

    #[error("Skeleton detection timed out ({}s)", .0.as_secs_f32())]
    DetectionTimeout(Duration),

    #[error("Failed to load image for skeleton detection: {0}")]
    ImageLoadError(String),

    #[error("Inference failed: {0}")]
    InferenceFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PoseError {
    /// What the user should do next
    pub fn guidance(&self) -> &'static str {
        match self {
            PoseError::DetectorUnavailable(_) => {
                "The pose detector is not loaded yet. Please wait a moment or reload."
            }
            PoseError::DetectionTimeout(_) => "Detection took too long. Try again with a smaller image.",
            PoseError::ImageLoadError(_) => "The image could not be read. Choose a different photo.",
            PoseError::InferenceFailed(_) => {
                "Skeleton detection failed. Choose an image where the person is clearly visible."
            }
            PoseError::InvalidConfig(_) => "Check the pose detection settings.",
        }
    }
}

pub type PoseResult<T> = Result<T, PoseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_threshold_is_strict() {
        let landmark = RawLandmark::new(0.5, 0.5, 0.5);
        assert!(!landmark.is_visible(0.5));
        assert!(landmark.is_visible(0.49));
    }

    #[test]
    fn test_tracked_landmarks_indices() {
        let indices: Vec<usize> = BodyLandmark::TRACKED.iter().map(|l| l.index()).collect();
        assert_eq!(indices, vec![0, 11, 12, 13, 14, 15, 16, 23, 24, 25, 26, 27, 28]);
        assert_eq!(BodyLandmark::RightFootIndex.index(), LANDMARK_COUNT - 1);
    }

    #[test]
    fn test_labels_are_lowercase_with_spaces() {
        for landmark in BodyLandmark::TRACKED {
            let label = landmark.label();
            assert_eq!(label, label.to_lowercase());
            assert!(!label.contains('_'));
        }
        assert_eq!(BodyLandmark::LeftShoulder.label(), "left shoulder");
    }

    #[test]
    fn test_gravity_line() {
        let mut skeleton = Skeleton::empty();
        assert!(skeleton.gravity_line().is_none());
        assert!(!skeleton.has_subject());

        skeleton.cog = Some(Point::new(42.0, 55.0, COG_LABEL));
        let line = skeleton.gravity_line().unwrap();
        assert_eq!(line, Bone { x1: 42.0, y1: 55.0, x2: 42.0, y2: 100.0 });
    }

    #[test]
    fn test_pose_config_default() {
        let config = PoseConfig::default();
        assert_eq!(config.model_complexity, ModelComplexity::Heavy);
        assert_eq!(config.point_visibility_threshold, 0.5);
        assert_eq!(config.detection_timeout(), Duration::from_secs(20));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_pose_config_validation() {
        let mut config = PoseConfig::default();

        config.point_visibility_threshold = 1.5;
        assert!(matches!(config.validate(), Err(PoseError::InvalidConfig(_))));
        config.point_visibility_threshold = 0.5;

        config.detection_timeout_ms = 0;
        assert!(config.validate().is_err());
        config.detection_timeout_ms = 400_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_timeout_message() {
        let err = PoseError::DetectionTimeout(Duration::from_secs(20));
        assert_eq!(err.to_string(), "Skeleton detection timed out (20s)");
    }

    #[test]
    fn test_skeleton_serialization_omits_missing_cog() {
        let skeleton = Skeleton {
            points: vec![Point::new(10.0, 20.0, "nose")],
            cog: None,
        };
        let json = serde_json::to_string(&skeleton).unwrap();
        assert!(!json.contains("cog"));
        let back: Skeleton = serde_json::from_str(&json).unwrap();
        assert_eq!(back, skeleton);
    }
}
