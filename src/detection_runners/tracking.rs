use crate::common::{YoloItem, YoloTrackingItem};

pub const DEFAULT_MAX_DISTANCE: f64 = 1000.;

/// Follows one object across frames by picking the detection whose center is closest to the
/// last known position.
#[derive(Debug, Clone)]
pub struct ObjectTracker {
    max_distance: f64,
    tracking_point: (f64, f64),
    index: usize,
}

impl Default for ObjectTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DISTANCE)
    }
}

impl ObjectTracker {
    pub fn new(max_distance: f64) -> Self {
        Self {
            max_distance,
            tracking_point: (0., 0.),
            index: 0,
        }
    }

    pub fn tracking_point(&self) -> (f64, f64) {
        self.tracking_point
    }

    pub fn set_tracking_point(&mut self, point: (f64, f64)) {
        self.tracking_point = point;
    }

    pub fn set_tracking_item(&mut self, item: &YoloItem) {
        self.tracking_point = item.center();
    }

    /// Closest item within `max_distance` of the tracked point, if any.
    pub fn best_match<'a>(&self, items: &'a [YoloItem]) -> Option<&'a YoloItem> {
        items
            .iter()
            .map(|item| (distance(item.center(), self.tracking_point), item))
            .filter(|(d, _)| *d <= self.max_distance)
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, item)| item)
    }

    /// Tags every item with a running index and moves the tracked point to this frame's best match.
    pub fn analyse(&mut self, items: Vec<YoloItem>) -> Vec<YoloTrackingItem> {
        if let Some(center) = self.best_match(&items).map(YoloItem::center) {
            self.tracking_point = center;
        }

        items
            .into_iter()
            .map(|item| {
                let tracked = YoloTrackingItem::new(item, self.index);
                self.index += 1;
                tracked
            })
            .collect()
    }
}

fn distance(p1: (f64, f64), p2: (f64, f64)) -> f64 {
    ((p2.0 - p1.0).powi(2) + (p2.1 - p1.1).powi(2)).sqrt()
}
