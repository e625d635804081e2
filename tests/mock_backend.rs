use std::ffi::{c_void, CStr};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use parking_lot::Mutex;
use fast_yolo::common::{BboxContainer, BboxT, YoloConfiguration};
use fast_yolo::detection_runners::DetectorBackend;

/// What the mock saw, shared with the test after the backend moved into a wrapper.
#[derive(Debug, Default)]
pub struct MockLog {
    pub init: Option<(String, String, i32, i32)>,
    pub files: Vec<String>,
    pub encoded_len: Vec<usize>,
    pub inputs: Vec<(Vec<f32>, i32, i32, i32)>,
    pub cuda_calls: usize,
    pub tracked: usize,
    pub disposed: usize,
}

/// Stand-in for the darknet binary that returns canned boxes.
pub struct MockBackend {
    pub devices: i32,
    pub network: (i32, i32),
    pub init_code: i32,
    pub mat_code: i32,
    pub boxes: Vec<BboxT>,
    pub log: Arc<Mutex<MockLog>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            devices: 1,
            network: (416, 416),
            init_code: 1,
            mat_code: 1,
            boxes: Vec::new(),
            log: Arc::new(Mutex::new(MockLog::default())),
        }
    }
}

impl MockBackend {
    pub fn with_boxes(boxes: Vec<BboxT>) -> Self {
        Self { boxes, ..Self::default() }
    }

    fn fill(&self, container: &mut BboxContainer) -> i32 {
        for (slot, bbox) in container.candidates.iter_mut().zip(&self.boxes) {
            *slot = *bbox;
        }
        self.boxes.len() as i32
    }
}

impl DetectorBackend for MockBackend {
    fn name(&self) -> &str {
        "mock_darknet"
    }

    fn device_count(&self) -> i32 {
        self.devices
    }

    fn device_name(&self, gpu: i32) -> String {
        format!("Mock GPU {}", gpu)
    }

    fn init(&mut self, config_file: &CStr, weights_file: &CStr, gpu: i32, batch_size: i32) -> i32 {
        self.log.lock().init = Some((
            config_file.to_string_lossy().into_owned(),
            weights_file.to_string_lossy().into_owned(),
            gpu,
            batch_size,
        ));
        self.init_code
    }

    fn detect_image(&mut self, filename: &CStr, container: &mut BboxContainer) -> i32 {
        self.log.lock().files.push(filename.to_string_lossy().into_owned());
        self.fill(container)
    }

    fn detect_mat(&mut self, data: &[u8], container: &mut BboxContainer) -> i32 {
        self.log.lock().encoded_len.push(data.len());
        if self.mat_code < 0 {
            return self.mat_code;
        }
        self.fill(container)
    }

    unsafe fn detect_objects(&mut self, data: *const f32, width: i32, height: i32, channels: i32,
                             container: &mut BboxContainer) -> i32 {
        let len = (width * height * channels) as usize;
        let values = std::slice::from_raw_parts(data, len).to_vec();
        self.log.lock().inputs.push((values, width, height, channels));
        self.fill(container)
    }

    unsafe fn detect_objects_cuda(&mut self, _data: *const c_void, _width: i32, _height: i32, _channels: i32,
                                  container: &mut BboxContainer) -> i32 {
        self.log.lock().cuda_calls += 1;
        self.fill(container)
    }

    unsafe fn track_objects(&mut self, data: *const f32, width: i32, height: i32, channels: i32,
                            container: &mut BboxContainer) -> i32 {
        self.log.lock().tracked += 1;
        let code = self.detect_objects(data, width, height, channels, container);
        for (n, slot) in container.candidates.iter_mut().take(self.boxes.len()).enumerate() {
            slot.track_id = n as u32 + 1;
            slot.frames_counter = 7;
        }
        code
    }

    fn network_width(&self) -> i32 {
        self.network.0
    }

    fn network_height(&self) -> i32 {
        self.network.1
    }

    fn dispose(&mut self) -> i32 {
        self.log.lock().disposed += 1;
        1
    }
}

pub fn bbox(x: u32, y: u32, w: u32, h: u32, obj_id: u32, prob: f32) -> BboxT {
    BboxT { x, y, w, h, obj_id, prob, ..BboxT::default() }
}

pub fn assets_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("assets")
}

pub fn asset_configuration() -> YoloConfiguration {
    let assets = assets_dir();
    YoloConfiguration::new(
        assets.join("yolov3-tiny.cfg"),
        assets.join("yolov3-tiny.weights"),
        assets.join("coco.names"),
    )
}
