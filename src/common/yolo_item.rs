use serde::{Deserialize, Serialize};

/// Shape classification reported by shape-aware darknet builds.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeType {
    #[default] None,
    Triangle,
    Rectangle,
    Penta,
    Hexa,
    HalfCircle,
    Circle,
}

impl From<u32> for ShapeType {
    fn from(code: u32) -> Self {
        match code {
            1 => ShapeType::Triangle,
            2 => ShapeType::Rectangle,
            3 => ShapeType::Penta,
            4 => ShapeType::Hexa,
            5 => ShapeType::HalfCircle,
            6 => ShapeType::Circle,
            _ => ShapeType::None,
        }
    }
}

/// One detected or tracked object, in pixel coordinates of the input image.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YoloItem {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub class_id: u32,
    pub label: String,
    pub confidence: f64,
    pub track_id: i32,
    pub frame_id: i32,
    pub shape: ShapeType,
}

impl YoloItem {
    pub fn new(x: i32, y: i32, width: i32, height: i32, label: &str, confidence: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            label: label.to_string(),
            confidence,
            ..Default::default()
        }
    }

    pub fn with_class_id(mut self, class_id: u32) -> Self {
        self.class_id = class_id;
        self
    }

    pub fn with_track_id(mut self, track_id: i32) -> Self {
        self.track_id = track_id;
        self
    }

    /// Center of the bounding box.
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.,
            self.y as f64 + self.height as f64 / 2.,
        )
    }

    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    pub fn print_item(&self) {
        println!(
            "Frame: {} Found: {} ID: {} BB: [{},{},{},{}] Confidence: {:.2}",
            self.frame_id, self.label, self.track_id, self.x, self.y, self.width, self.height, self.confidence
        );
    }
}

/// An item tagged with the running index assigned by the object tracker.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YoloTrackingItem {
    pub item: YoloItem,
    pub index: usize,
}

impl YoloTrackingItem {
    pub fn new(item: YoloItem, index: usize) -> Self {
        Self { item, index }
    }
}

impl std::ops::Deref for YoloTrackingItem {
    type Target = YoloItem;

    fn deref(&self) -> &Self::Target {
        &self.item
    }
}
