// Data models for pose landmarks, skeletons and coaching analysis

pub mod pose;
pub mod coaching;
