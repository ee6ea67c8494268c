// src/landmarks.rs - Pose landmark frames as delivered by the pose engine
use crate::error::FrameError;
use crate::geometry::{JointTriple, Point2D};
use serde::{Deserialize, Serialize};

/// MediaPipe pose topology, 33 points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoseLandmark {
    Nose,
    LeftEyeInner,
    LeftEye,
    LeftEyeOuter,
    RightEyeInner,
    RightEye,
    RightEyeOuter,
    LeftEar,
    RightEar,
    MouthLeft,
    MouthRight,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftPinky,
    RightPinky,
    LeftIndex,
    RightIndex,
    LeftThumb,
    RightThumb,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftHeel,
    RightHeel,
    LeftFootIndex,
    RightFootIndex,
}

pub const POSE_LANDMARK_COUNT: usize = 33;

impl PoseLandmark {
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default = "full_visibility")]
    pub visibility: f64,
}

fn full_visibility() -> f64 {
    1.0
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0, visibility: 1.0 }
    }

    pub fn with_visibility(mut self, visibility: f64) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

/// One pose-engine result. An empty landmark list means nobody was detected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    pub timestamp: f64,
    pub landmarks: Vec<Landmark>,
}

impl PoseFrame {
    pub fn new(timestamp: f64, landmarks: Vec<Landmark>) -> Self {
        Self { timestamp, landmarks }
    }

    pub fn empty(timestamp: f64) -> Self {
        Self { timestamp, landmarks: Vec::new() }
    }

    pub fn get(&self, landmark: PoseLandmark) -> Option<&Landmark> {
        self.landmarks.get(landmark.index())
    }

    /// Position of `landmark`, or `MissingLandmark` if it is absent, has
    /// non-finite coordinates or is less visible than `min_visibility`.
    pub fn point(&self, landmark: PoseLandmark, min_visibility: f64) -> Result<Point2D, FrameError> {
        match self.get(landmark) {
            Some(lm) if lm.x.is_finite() && lm.y.is_finite() && lm.visibility >= min_visibility => {
                Ok(lm.position())
            }
            _ => Err(FrameError::MissingLandmark { landmark }),
        }
    }
}

/// Which three landmarks form the measured joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedJoint {
    pub proximal: PoseLandmark,
    pub vertex: PoseLandmark,
    pub distal: PoseLandmark,
}

impl TrackedJoint {
    pub const LEFT_KNEE: TrackedJoint = TrackedJoint {
        proximal: PoseLandmark::LeftHip,
        vertex: PoseLandmark::LeftKnee,
        distal: PoseLandmark::LeftAnkle,
    };

    pub const RIGHT_KNEE: TrackedJoint = TrackedJoint {
        proximal: PoseLandmark::RightHip,
        vertex: PoseLandmark::RightKnee,
        distal: PoseLandmark::RightAnkle,
    };

    pub fn landmarks(&self) -> [PoseLandmark; 3] {
        [self.proximal, self.vertex, self.distal]
    }

    /// A repeated landmark makes every frame degenerate.
    pub fn is_distinct(&self) -> bool {
        self.proximal != self.vertex && self.vertex != self.distal && self.proximal != self.distal
    }

    pub fn resolve(&self, frame: &PoseFrame, min_visibility: f64) -> Result<JointTriple, FrameError> {
        Ok(JointTriple::new(
            frame.point(self.proximal, min_visibility)?,
            frame.point(self.vertex, min_visibility)?,
            frame.point(self.distal, min_visibility)?,
        ))
    }

    /// Mean visibility of the three joints; absent joints count as zero.
    pub fn mean_visibility(&self, frame: &PoseFrame) -> f64 {
        self.landmarks()
            .iter()
            .map(|lm| frame.get(*lm).map(|l| l.visibility).unwrap_or(0.0))
            .sum::<f64>()
            / 3.0
    }
}

impl Default for TrackedJoint {
    fn default() -> Self {
        Self::LEFT_KNEE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_frame() -> PoseFrame {
        let landmarks = (0..POSE_LANDMARK_COUNT)
            .map(|i| Landmark::new(i as f64 / 100.0, 0.5))
            .collect();
        PoseFrame::new(0.0, landmarks)
    }

    #[test]
    fn test_mediapipe_indices() {
        assert_eq!(PoseLandmark::Nose.index(), 0);
        assert_eq!(PoseLandmark::LeftShoulder.index(), 11);
        assert_eq!(PoseLandmark::LeftHip.index(), 23);
        assert_eq!(PoseLandmark::LeftKnee.index(), 25);
        assert_eq!(PoseLandmark::LeftAnkle.index(), 27);
        assert_eq!(PoseLandmark::RightFootIndex.index(), POSE_LANDMARK_COUNT - 1);
    }

    #[test]
    fn test_resolve_left_knee() {
        let frame = full_frame();
        let triple = TrackedJoint::LEFT_KNEE.resolve(&frame, 0.0).unwrap();
        assert_eq!(triple.proximal, Point2D::new(0.23, 0.5));
        assert_eq!(triple.vertex, Point2D::new(0.25, 0.5));
        assert_eq!(triple.distal, Point2D::new(0.27, 0.5));
    }

    #[test]
    fn test_empty_frame_is_missing() {
        let frame = PoseFrame::empty(1.0);
        assert_eq!(
            TrackedJoint::LEFT_KNEE.resolve(&frame, 0.0),
            Err(FrameError::MissingLandmark { landmark: PoseLandmark::LeftHip })
        );
    }

    #[test]
    fn test_truncated_frame_reports_first_absent_joint() {
        let mut frame = full_frame();
        frame.landmarks.truncate(PoseLandmark::LeftAnkle.index());
        assert_eq!(
            TrackedJoint::LEFT_KNEE.resolve(&frame, 0.0),
            Err(FrameError::MissingLandmark { landmark: PoseLandmark::LeftAnkle })
        );
    }

    #[test]
    fn test_visibility_gate() {
        let mut frame = full_frame();
        frame.landmarks[PoseLandmark::LeftKnee.index()].visibility = 0.3;

        assert!(TrackedJoint::LEFT_KNEE.resolve(&frame, 0.0).is_ok());
        assert!(TrackedJoint::LEFT_KNEE.resolve(&frame, 0.3).is_ok());
        assert_eq!(
            TrackedJoint::LEFT_KNEE.resolve(&frame, 0.5),
            Err(FrameError::MissingLandmark { landmark: PoseLandmark::LeftKnee })
        );
    }

    #[test]
    fn test_nan_coordinates_are_missing() {
        let mut frame = full_frame();
        frame.landmarks[PoseLandmark::LeftHip.index()].y = f64::NAN;
        assert!(matches!(
            TrackedJoint::LEFT_KNEE.resolve(&frame, 0.0),
            Err(FrameError::MissingLandmark { .. })
        ));
    }

    #[test]
    fn test_mean_visibility() {
        let mut frame = full_frame();
        frame.landmarks[PoseLandmark::RightHip.index()].visibility = 0.4;
        frame.landmarks[PoseLandmark::RightKnee.index()].visibility = 0.5;
        frame.landmarks[PoseLandmark::RightAnkle.index()].visibility = 0.6;
        let mean = TrackedJoint::RIGHT_KNEE.mean_visibility(&frame);
        assert!((mean - 0.5).abs() < 1e-9);

        assert_eq!(TrackedJoint::LEFT_KNEE.mean_visibility(&PoseFrame::empty(0.0)), 0.0);
    }

    #[test]
    fn test_joint_landmarks_must_differ() {
        assert!(TrackedJoint::LEFT_KNEE.is_distinct());
        let folded = TrackedJoint { distal: PoseLandmark::LeftHip, ..TrackedJoint::LEFT_KNEE };
        assert!(!folded.is_distinct());
    }

    #[test]
    fn test_landmark_json_defaults() {
        let lm: Landmark = serde_json::from_str(r#"{"x":0.1,"y":0.2}"#).unwrap();
        assert_eq!(lm.z, 0.0);
        assert_eq!(lm.visibility, 1.0);
    }
}
