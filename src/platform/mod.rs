// Bridges to external runtimes

pub mod pose;
