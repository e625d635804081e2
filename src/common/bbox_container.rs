use crate::common::{ShapeType, YoloItem};
use crate::data::ClassNames;

/// Capacity of the result array the native library fills per call.
pub const MAX_OBJECTS: usize = 30;

/// Raw detection record, laid out exactly as darknet's `bbox_t`.
#[repr(C)]
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct BboxT {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    pub prob: f32,
    pub obj_id: u32,
    pub track_id: u32,
    pub frames_counter: u32,
    pub x_3d: f32,
    pub y_3d: f32,
    pub z_3d: f32,
    pub shape: u32,
}

/// Fixed-size result buffer handed to every detect/track entry point.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BboxContainer {
    pub candidates: [BboxT; MAX_OBJECTS],
}

impl Default for BboxContainer {
    fn default() -> Self {
        Self { candidates: [BboxT::default(); MAX_OBJECTS] }
    }
}

impl BboxContainer {
    pub fn clear(&mut self) {
        self.candidates = [BboxT::default(); MAX_OBJECTS];
    }

    /// Maps the filled candidates to items; empty slots have zero width and height.
    pub fn to_items(&self, names: &ClassNames) -> Vec<YoloItem> {
        self.candidates
            .iter()
            .filter(|c| c.w > 0 || c.h > 0)
            .map(|c| YoloItem {
                x: c.x as i32,
                y: c.y as i32,
                width: c.w as i32,
                height: c.h as i32,
                class_id: c.obj_id,
                label: names.resolve(c.obj_id as usize).to_string(),
                confidence: c.prob as f64,
                track_id: c.track_id as i32,
                frame_id: c.frames_counter as i32,
                shape: ShapeType::from(c.shape),
            })
            .collect()
    }
}
