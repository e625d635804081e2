use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use anyhow::{anyhow, Context};
use crate::common::{ModelConfig, YoloItem};
use crate::data::send_channels::{detection_channels, DetectionRequest, DetectionState, SendState};
use crate::data::TimeCalc;
use crate::detection_runners::darknet_ffi::DetectorBackend;
use crate::detection_runners::yolo_wrapper::YoloWrapper;
use crate::{utils, Result};

pub const CHANNEL_CAPACITY: usize = 4;

/// Owns a detector on a dedicated thread and serves frames sent over channels in order.
/// Dropping the worker closes the channels and joins the thread.
pub struct DetectionWorker {
    send_state: Option<SendState>,
    handle: Option<JoinHandle<()>>,
}

impl DetectionWorker {
    pub fn spawn(config: ModelConfig) -> anyhow::Result<Self> {
        Self::spawn_with(move || YoloWrapper::from_config(&config))
    }

    /// Builds the detector on the worker thread with `factory` and waits until it is ready.
    pub fn spawn_with<B, F>(factory: F) -> anyhow::Result<Self>
    where
        B: DetectorBackend + 'static,
        F: FnOnce() -> Result<YoloWrapper<B>> + Send + 'static,
    {
        let (send_state, detection_state) = detection_channels(CHANNEL_CAPACITY);
        let (ready_tx, ready_rx) = crossbeam_channel::bounded::<Result<()>>(1);

        let handle = std::thread::Builder::new()
            .name("fast_yolo-detector".to_string())
            .spawn(move || {
                let yolo = match factory() {
                    Ok(yolo) => {
                        let _ = ready_tx.send(Ok(()));
                        yolo
                    }
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };
                detection_loop(yolo, detection_state);
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self { send_state: Some(send_state), handle: Some(handle) }),
            Ok(Err(err)) => {
                let _ = handle.join();
                Err(anyhow::Error::new(err).context("Failed to initialize detector"))
            }
            Err(_) => {
                let _ = handle.join();
                Err(anyhow!("Detector thread exited during initialization"))
            }
        }
    }

    /// Queues a frame without waiting for its result. Blocks only while the request queue is full
    /// and the worker is still busy with earlier frames.
    pub fn submit(&self, request: DetectionRequest) -> anyhow::Result<()> {
        let state = self.state()?;
        state.opt_tx.send(Box::new(request)).context("Detection worker is gone")?;
        Ok(())
    }

    /// Next result, in submission order.
    pub fn receive(&self) -> anyhow::Result<Vec<YoloItem>> {
        let state = self.state()?;
        let response = state.det_rx.recv().context("Detection worker is gone")?;
        Ok((*response)?)
    }

    pub fn detect(&self, request: DetectionRequest) -> anyhow::Result<Vec<YoloItem>> {
        self.submit(request)?;
        self.receive()
    }

    fn state(&self) -> anyhow::Result<&SendState> {
        self.send_state.as_ref().ok_or_else(|| anyhow!("Detection worker is stopped"))
    }
}

impl Drop for DetectionWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the loop.
        self.send_state.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Detection worker panicked");
            }
        }
    }
}

fn detection_loop<B: DetectorBackend>(mut yolo: YoloWrapper<B>, detection_state: DetectionState) {
    let mut time_calc = TimeCalc::default();

    while let Ok(request) = detection_state.opt_rx.recv() {
        let detect_time = Instant::now();

        let result = if request.track {
            yolo.track_color_image(&request.image, request.channels)
        } else {
            yolo.detect_color_image(&request.image, request.channels)
        };
        if let Err(err) = &result {
            log::error!("fast_yolo: Detection failed: {}", err);
        }

        time_calc.add_or_push(0, utils::trace("TIME", "Detection run", detect_time, Duration::ZERO));

        if detection_state.det_tx.send(Box::new(result)).is_err() {
            log::warn!("fast_yolo: Result receiver dropped, stopping detection worker");
            break;
        }
    }

    log::info!("Detection worker stopped after {} frames, average {:.2?} per frame", time_calc.n(), time_calc.avg());
}
