pub mod config;
pub mod logging;

// Landmark processing (pure)
pub mod landmark_normalizer;
pub mod cog_estimator;
pub mod skeleton_assembler;
pub mod bone_resolver;

// Detection orchestration
pub mod image_loader;
pub mod pose_detector;
pub mod analysis_session;
