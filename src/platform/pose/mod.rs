// Pose estimation platform integration
// Provides the MediaPipe bridge and its backends

pub mod mediapipe_bridge;

pub use mediapipe_bridge::{parse_detector_output, DefaultMediaPipe, MediaPipeBridge};
