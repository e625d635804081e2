use crate::common::{ColorImage, YoloItem};

/// A frame handed to the detection worker.
#[derive(Debug, Clone)]
pub struct DetectionRequest {
    pub image: ColorImage,
    pub channels: usize,
    /// Use the native tracker instead of plain detection.
    pub track: bool,
}

impl DetectionRequest {
    pub fn detect(image: ColorImage) -> Self {
        Self { image, channels: 3, track: false }
    }

    pub fn track(image: ColorImage) -> Self {
        Self { image, channels: 3, track: true }
    }

    pub fn with_channels(mut self, channels: usize) -> Self {
        self.channels = channels;
        self
    }
}

pub type DetectionResponse = crate::Result<Vec<YoloItem>>;

/// Worker side of the channels.
#[derive(Debug)]
pub struct DetectionState {
    pub opt_rx: crossbeam_channel::Receiver<Box<DetectionRequest>>,
    pub det_tx: crossbeam_channel::Sender<Box<DetectionResponse>>,
}

/// Caller side of the channels.
#[derive(Debug)]
pub struct SendState {
    pub opt_tx: crossbeam_channel::Sender<Box<DetectionRequest>>,
    pub det_rx: crossbeam_channel::Receiver<Box<DetectionResponse>>,
}

/// Creates both ends. Requests are bounded to `capacity` queued frames; results are unbounded so
/// the worker never waits on a caller that has not started receiving yet.
pub fn detection_channels(capacity: usize) -> (SendState, DetectionState) {
    let (opt_tx, opt_rx) = crossbeam_channel::bounded(capacity);
    let (det_tx, det_rx) = crossbeam_channel::unbounded();
    (SendState { opt_tx, det_rx }, DetectionState { opt_rx, det_tx })
}
