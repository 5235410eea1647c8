use crate::core::image_loader::{load_image, ImageSource};
use crate::core::skeleton_assembler::skeleton_from_landmarks;
use crate::models::pose::{PoseConfig, PoseError, PoseResult, Skeleton};
use crate::platform::pose::{DefaultMediaPipe, MediaPipeBridge};
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tokio::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

type BridgeFactory<B> = Arc<dyn Fn(&PoseConfig) -> PoseResult<B> + Send + Sync>;

// ==============================================================================
// Detector Context
// ==============================================================================

/// Owns the one detector instance shared by every detection call.
///
/// The instance is created on the first `acquire` and kept until `release`.
/// A failed creation is not cached, so a later call tries again. Creation
/// runs on the blocking pool since backends load models synchronously.
pub struct DetectorContext<B: MediaPipeBridge> {
    config: PoseConfig,
    factory: BridgeFactory<B>,
    instance: OnceCell<Arc<B>>,
}

impl<B: MediaPipeBridge + 'static> DetectorContext<B> {
    pub fn new(config: PoseConfig) -> Self {
        Self::with_factory(config, |config| B::new(config))
    }

    pub fn with_factory<F>(config: PoseConfig, factory: F) -> Self
    where
        F: Fn(&PoseConfig) -> PoseResult<B> + Send + Sync + 'static,
    {
        Self {
            config,
            factory: Arc::new(factory),
            instance: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &PoseConfig {
        &self.config
    }

    /// Get the detector, creating it on first use
    pub async fn acquire(&self) -> PoseResult<Arc<B>> {
        self.instance
            .get_or_try_init(|| async {
                let factory = self.factory.clone();
                let config = self.config.clone();
                let bridge = tokio::task::spawn_blocking(move || factory(&config))
                    .await
                    .map_err(|e| PoseError::DetectorUnavailable(format!("detector creation task failed: {}", e)))??;
                tracing::info!(model = %bridge.get_model_info(), "pose detector created");
                Ok::<_, PoseError>(Arc::new(bridge))
            })
            .await
            .cloned()
    }

    pub fn is_acquired(&self) -> bool {
        self.instance.initialized()
    }

    /// Drop the held detector. Calls still holding an `Arc` finish normally.
    pub fn release(&mut self) -> Option<Arc<B>> {
        let released = self.instance.take();
        if released.is_some() {
            tracing::info!("pose detector released");
        }
        released
    }
}

// ==============================================================================
// Pose Detector (orchestrator)
// ==============================================================================

/// Drives single images through the shared detector with a hard deadline.
///
/// Concurrent `detect` calls share one detector, but only one image is
/// submitted at a time: the next submission waits until the previous one
/// returned or its caller gave up at the deadline.
pub struct PoseDetector<B: MediaPipeBridge = DefaultMediaPipe> {
    context: DetectorContext<B>,
    send_lock: Mutex<()>,
}

impl<B: MediaPipeBridge + 'static> PoseDetector<B> {
    pub fn new(config: PoseConfig) -> PoseResult<Self> {
        config.validate()?;
        Ok(Self::with_context(DetectorContext::new(config)))
    }

    pub fn with_context(context: DetectorContext<B>) -> Self {
        Self {
            context,
            send_lock: Mutex::new(()),
        }
    }

    pub fn context(&self) -> &DetectorContext<B> {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut DetectorContext<B> {
        &mut self.context
    }

    /// Detect the skeleton in one image.
    ///
    /// Resolves with an empty skeleton when no person is found. The deadline is
    /// measured from the start of the call and covers detector creation, image
    /// loading, queueing behind other calls and inference. Once it passes the
    /// call fails with `DetectionTimeout`; the in-flight work is abandoned and
    /// whatever it produces later is discarded.
    pub async fn detect(&self, source: &ImageSource) -> PoseResult<Skeleton> {
        let timeout = self.context.config().detection_timeout();
        let started = Instant::now();
        let span = tracing::info_span!("detect", request_id = %Uuid::new_v4());

        async {
            tracing::debug!(source = %source.describe(), "skeleton detection started");

            match tokio::time::timeout_at(started + timeout, self.run(source)).await {
                Ok(Ok(skeleton)) => {
                    tracing::info!(
                        points = skeleton.points.len(),
                        cog = skeleton.cog.is_some(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "skeleton detected"
                    );
                    Ok(skeleton)
                }
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "skeleton detection failed");
                    Err(e)
                }
                Err(_) => {
                    tracing::warn!(timeout_ms = timeout.as_millis() as u64, "skeleton detection timed out");
                    Err(PoseError::DetectionTimeout(timeout))
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run(&self, source: &ImageSource) -> PoseResult<Skeleton> {
        let bridge = self.context.acquire().await?;
        let image = load_image(source).await?;

        let landmarks = {
            let _guard = self.send_lock.lock().await;
            bridge.detect(&image).await?
        };

        match landmarks {
            Some(landmarks) => Ok(skeleton_from_landmarks(&landmarks, self.context.config())),
            None => {
                tracing::debug!("no person detected");
                Ok(Skeleton::empty())
            }
        }
    }
}
