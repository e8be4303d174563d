use crate::coordinates::RenderPoint;
use crate::field::FieldObject;
use crate::pose::{Pose, StartConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    pub start: StartConfig,
    pub pose: Pose,
    pub path: Vec<RenderPoint>,
    pub objects: Vec<FieldObject>,
}

impl FieldSnapshot {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::field::ObjectColor;
    use crate::tracker::PoseTracker;

    use super::*;

    #[test]
    fn snapshot_survives_json() {
        let mut tracker = PoseTracker::new();
        tracker.apply_motion(24.0, 90.0);
        tracker.place_object(40.0, 40.0, ObjectColor::Green);

        let snapshot = tracker.snapshot();
        let json = snapshot.to_json_pretty().unwrap();
        assert!(json.contains("\"green\""));
        assert_eq!(serde_json::from_str::<FieldSnapshot>(&json).unwrap(), snapshot);
    }
}
