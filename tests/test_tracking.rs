use fast_yolo::common::YoloItem;
use fast_yolo::detection_runners::ObjectTracker;

fn item(x: i32, y: i32, label: &str) -> YoloItem {
    YoloItem::new(x, y, 10, 10, label, 0.9)
}

#[test]
fn best_match_is_the_closest_center() {
    let mut tracker = ObjectTracker::new(100.);
    tracker.set_tracking_point((50., 50.));

    let items = vec![item(0, 0, "far"), item(40, 40, "near"), item(80, 80, "middle")];

    assert_eq!(tracker.best_match(&items).unwrap().label, "near");
}

#[test]
fn items_beyond_max_distance_are_ignored() {
    let mut tracker = ObjectTracker::new(5.);
    tracker.set_tracking_item(&item(0, 0, "start"));

    assert_eq!(tracker.tracking_point(), (5., 5.));
    assert!(tracker.best_match(&[item(100, 100, "away")]).is_none());
}

#[test]
fn analyse_follows_the_object() {
    let mut tracker = ObjectTracker::default();
    tracker.set_tracking_point((0., 0.));

    let first = tracker.analyse(vec![item(10, 10, "a"), item(300, 300, "b")]);
    assert_eq!(first.iter().map(|t| t.index).collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(tracker.tracking_point(), (15., 15.));

    let second = tracker.analyse(vec![item(20, 20, "a")]);
    assert_eq!(second[0].index, 2);
    assert_eq!(second[0].label, "a");
    assert_eq!(tracker.tracking_point(), (25., 25.));
}

#[test]
fn empty_frame_keeps_tracking_point() {
    let mut tracker = ObjectTracker::default();
    tracker.set_tracking_point((7., 8.));

    assert!(tracker.analyse(Vec::new()).is_empty());
    assert_eq!(tracker.tracking_point(), (7., 8.));
}
