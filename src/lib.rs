//! Skeletal landmark processing and center-of-gravity estimation for
//! comparing a reference pose photo against a learner's attempt.
//!
//! Raw detector landmarks are filtered and relabeled into a [`Skeleton`],
//! the body's center of gravity is estimated from weighted segments, and
//! [`resolve_bones`] derives the line segments a renderer draws.

pub mod core;
pub mod models;
pub mod platform;

pub use crate::core::analysis_session::{AnalysisSession, CoachingAnalyzer};
pub use crate::core::bone_resolver::resolve_bones;
pub use crate::core::cog_estimator::estimate_center_of_gravity;
pub use crate::core::config::Config;
pub use crate::core::image_loader::ImageSource;
pub use crate::core::landmark_normalizer::normalize_landmarks;
pub use crate::core::logging::init_logging;
pub use crate::core::pose_detector::{DetectorContext, PoseDetector};
pub use crate::core::skeleton_assembler::{assemble_skeleton, skeleton_from_landmarks};
pub use crate::models::pose::{Bone, Point, PoseConfig, PoseError, PoseResult, RawLandmark, Skeleton};
pub use crate::platform::pose::{DefaultMediaPipe, MediaPipeBridge};
