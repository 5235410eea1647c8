// MediaPipe integration bridge
// Narrow capability interface over the external pose detector: one image in,
// the raw 33-landmark array (or nothing) out. Backends are selected by feature.

use crate::models::pose::{PoseConfig, PoseError, PoseResult, RawLandmark};
use async_trait::async_trait;
use image::DynamicImage;
use serde::Deserialize;

/// MediaPipe bridge trait
/// Implement this for each detector runtime
#[async_trait]
pub trait MediaPipeBridge: Send + Sync {
    /// Initialize the detector. Fails with `DetectorUnavailable` when the runtime is missing.
    fn new(config: &PoseConfig) -> PoseResult<Self>
    where
        Self: Sized;

    /// Run inference on one still image.
    /// `Ok(None)` means the detector completed but found no person.
    async fn detect(&self, image: &DynamicImage) -> PoseResult<Option<Vec<RawLandmark>>>;

    /// Check if models are loaded
    fn is_initialized(&self) -> bool;

    /// Get model info
    fn get_model_info(&self) -> String;
}

#[derive(Debug, Deserialize)]
struct DetectorOutput {
    #[serde(default)]
    landmarks: Option<Vec<RawLandmark>>,
}

/// Parse the JSON document a detector runtime hands back.
///
/// Accepts `{"landmarks": [...]}`, `{"landmarks": null}` and `{}`; an empty
/// array is treated the same as no person found.
pub fn parse_detector_output(json: &str) -> PoseResult<Option<Vec<RawLandmark>>> {
    let output: DetectorOutput = serde_json::from_str(json)
        .map_err(|e| PoseError::InferenceFailed(format!("Failed to parse detector output: {}", e)))?;
    Ok(output.landmarks.filter(|l| !l.is_empty()))
}

// ==============================================================================
// PyO3 Implementation (Python MediaPipe)
// ==============================================================================

#[cfg(feature = "ml-pyo3")]
pub mod pyo3_backend {
    use super::*;
    use pyo3::prelude::*;
    use pyo3::types::{PyBytes, PyDict, PyModule};
    use std::sync::Arc;

    /// Python module expected on `sys.path`
    pub const PYTHON_MODULE: &str = "mediapipe_pose";

    pub struct PyO3MediaPipe {
        inference_module: Arc<Py<PyModule>>,
        config: PoseConfig,
    }

    impl PyO3MediaPipe {
        fn call_detector(
            module: &Py<PyModule>,
            frame: &[u8],
            width: u32,
            height: u32,
            config: &PoseConfig,
        ) -> PoseResult<String> {
            let failed = |what: &str, e: PyErr| PoseError::InferenceFailed(format!("{}: {}", what, e));

            Python::with_gil(|py| {
                let module = module.bind(py);
                let detect_fn = module
                    .getattr("detect_landmarks")
                    .map_err(|e| failed("Failed to get detect_landmarks", e))?;

                let kwargs = PyDict::new_bound(py);
                kwargs
                    .set_item("image_bytes", PyBytes::new_bound(py, frame))
                    .map_err(|e| failed("Failed to set image_bytes", e))?;
                kwargs.set_item("width", width).map_err(|e| failed("Failed to set width", e))?;
                kwargs.set_item("height", height).map_err(|e| failed("Failed to set height", e))?;
                kwargs
                    .set_item("model_complexity", config.model_complexity.as_u8())
                    .map_err(|e| failed("Failed to set model_complexity", e))?;
                kwargs
                    .set_item("smooth_landmarks", config.smooth_landmarks)
                    .map_err(|e| failed("Failed to set smooth_landmarks", e))?;
                kwargs
                    .set_item("min_detection_confidence", config.min_detection_confidence)
                    .map_err(|e| failed("Failed to set min_detection_confidence", e))?;
                kwargs
                    .set_item("min_tracking_confidence", config.min_tracking_confidence)
                    .map_err(|e| failed("Failed to set min_tracking_confidence", e))?;

                let result = detect_fn
                    .call((), Some(&kwargs))
                    .map_err(|e| failed("MediaPipe inference failed", e))?;

                result.extract::<String>().map_err(|e| failed("Failed to extract JSON", e))
            })
        }
    }

    #[async_trait]
    impl MediaPipeBridge for PyO3MediaPipe {
        fn new(config: &PoseConfig) -> PoseResult<Self> {
            let unavailable = |what: &str, e: PyErr| PoseError::DetectorUnavailable(format!("{}: {}", what, e));

            let inference_module = Python::with_gil(|py| -> PoseResult<Py<PyModule>> {
                if let Some(dir) = &config.python_module_dir {
                    let sys = py.import_bound("sys").map_err(|e| unavailable("Failed to import sys", e))?;
                    let path_list = sys
                        .getattr("path")
                        .map_err(|e| unavailable("Failed to get sys.path", e))?;
                    path_list
                        .call_method1("insert", (0, dir.to_string_lossy().into_owned()))
                        .map_err(|e| unavailable("Failed to add python dir to path", e))?;
                }

                let module = py.import_bound(PYTHON_MODULE).map_err(|e| {
                    unavailable(
                        &format!(
                            "Failed to import {}. Make sure the mediapipe Python package is installed",
                            PYTHON_MODULE
                        ),
                        e,
                    )
                })?;
                Ok(module.unbind())
            })?;

            tracing::info!(
                complexity = ?config.model_complexity,
                min_detection_confidence = config.min_detection_confidence,
                "PyO3 MediaPipe backend initialized"
            );

            Ok(Self {
                inference_module: Arc::new(inference_module),
                config: config.clone(),
            })
        }

        async fn detect(&self, image: &DynamicImage) -> PoseResult<Option<Vec<RawLandmark>>> {
            let rgb = image.to_rgb8();
            let (width, height) = rgb.dimensions();
            let frame = rgb.into_raw();
            let module = self.inference_module.clone();
            let config = self.config.clone();

            // The GIL call blocks, keep it off the async workers
            let json = tokio::task::spawn_blocking(move || {
                Self::call_detector(&module, &frame, width, height, &config)
            })
            .await
            .map_err(|e| PoseError::InferenceFailed(format!("Detector task failed: {}", e)))??;

            parse_detector_output(&json)
        }

        fn is_initialized(&self) -> bool {
            true
        }

        fn get_model_info(&self) -> String {
            format!(
                "PyO3 MediaPipe Bridge (Python backend) - complexity: {:?}, smoothing: {}",
                self.config.model_complexity, self.config.smooth_landmarks
            )
        }
    }
}

// ==============================================================================
// Fallback (no detector runtime compiled in)
// ==============================================================================

#[cfg(not(feature = "ml-pyo3"))]
pub struct UnavailableMediaPipe;

#[cfg(not(feature = "ml-pyo3"))]
const UNAVAILABLE_REASON: &str = "no MediaPipe runtime compiled in - enable the 'ml-pyo3' feature";

#[cfg(not(feature = "ml-pyo3"))]
#[async_trait]
impl MediaPipeBridge for UnavailableMediaPipe {
    fn new(_config: &PoseConfig) -> PoseResult<Self> {
        Err(PoseError::DetectorUnavailable(UNAVAILABLE_REASON.to_string()))
    }

    async fn detect(&self, _image: &DynamicImage) -> PoseResult<Option<Vec<RawLandmark>>> {
        Err(PoseError::DetectorUnavailable(UNAVAILABLE_REASON.to_string()))
    }

    fn is_initialized(&self) -> bool {
        false
    }

    fn get_model_info(&self) -> String {
        format!("Unavailable MediaPipe ({})", UNAVAILABLE_REASON)
    }
}

// ==============================================================================
// Default Backend Selection
// ==============================================================================

#[cfg(feature = "ml-pyo3")]
pub type DefaultMediaPipe = pyo3_backend::PyO3MediaPipe;

#[cfg(not(feature = "ml-pyo3"))]
pub type DefaultMediaPipe = UnavailableMediaPipe;
