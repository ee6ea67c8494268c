// src/pose_source.rs - Pose engine boundary plus a synthetic squatter for demo mode
use crate::landmarks::{Landmark, PoseFrame, PoseLandmark, POSE_LANDMARK_COUNT};
use anyhow::Result;
use std::collections::VecDeque;
use std::f64::consts::TAU;

/// Anything that turns camera frames into pose landmarks.
///
/// `now` is the caller's clock in seconds. Frames may arrive at any rate;
/// `Ok(None)` means no new result is ready yet.
pub trait PoseSource {
    fn next_frame(&mut self, now: f64) -> Result<Option<PoseFrame>>;

    fn name(&self) -> &str;
}

/// Figure doing squats in place, left side facing the camera.
pub struct SimulatedSquatter {
    pub period_secs: f64,
    pub standing_angle: f64,
    pub bottom_angle: f64,
    /// Peak landmark noise, expressed as knee-angle degrees.
    pub jitter_degrees: f64,
    /// Every n-th frame comes back with no person detected.
    pub dropout_every: Option<u32>,
    frame_counter: u32,
}

impl SimulatedSquatter {
    pub fn new() -> Self {
        Self {
            period_secs: 3.0,
            standing_angle: 175.0,
            bottom_angle: 70.0,
            jitter_degrees: 0.0,
            dropout_every: None,
            frame_counter: 0,
        }
    }

    pub fn with_jitter(mut self, degrees: f64) -> Self {
        self.jitter_degrees = degrees;
        self
    }

    pub fn with_dropout(mut self, every: u32) -> Self {
        self.dropout_every = Some(every.max(1));
        self
    }

    /// Knee angle the figure is holding at time `t`. Starts fully standing.
    pub fn knee_angle_at(&self, t: f64) -> f64 {
        let mid = (self.standing_angle + self.bottom_angle) / 2.0;
        let amplitude = (self.standing_angle - self.bottom_angle) / 2.0;
        let noise = self.jitter_degrees * (t * 37.0).sin() * (t * 11.0).cos();
        mid + amplitude * (TAU * t / self.period_secs).cos() + noise
    }

    pub fn frame_at(&self, t: f64) -> PoseFrame {
        let depth = (1.0 - (TAU * t / self.period_secs).cos()) / 2.0;
        let knee: (f64, f64) = (0.52, 0.70);
        let hip = (0.50 - 0.06 * depth, 0.50 + 0.12 * depth);
        let shoulder = (0.50 + 0.04 * depth, 0.28 + 0.12 * depth);

        // Place the ankle so the hip-knee-ankle angle equals the target.
        let thigh_heading = (hip.1 - knee.1).atan2(hip.0 - knee.0);
        let shin_heading = thigh_heading + self.knee_angle_at(t).to_radians();
        let ankle = (knee.0 + 0.2 * shin_heading.cos(), knee.1 + 0.2 * shin_heading.sin());

        let mut landmarks = vec![Landmark::new(shoulder.0, shoulder.1 - 0.1).with_visibility(0.9); POSE_LANDMARK_COUNT];
        let mut place = |lm: PoseLandmark, p: (f64, f64), visibility: f64| {
            landmarks[lm.index()] = Landmark::new(p.0, p.1).with_visibility(visibility);
        };

        place(PoseLandmark::LeftShoulder, shoulder, 0.98);
        place(PoseLandmark::RightShoulder, (shoulder.0 + 0.02, shoulder.1), 0.6);
        place(PoseLandmark::LeftHip, hip, 0.95);
        place(PoseLandmark::RightHip, (hip.0 + 0.02, hip.1), 0.6);
        place(PoseLandmark::LeftKnee, knee, 0.93);
        place(PoseLandmark::RightKnee, (knee.0 + 0.02, knee.1), 0.6);
        place(PoseLandmark::LeftAnkle, ankle, 0.9);
        place(PoseLandmark::RightAnkle, (ankle.0 + 0.02, ankle.1), 0.6);

        PoseFrame::new(t, landmarks)
    }
}

impl Default for SimulatedSquatter {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseSource for SimulatedSquatter {
    fn next_frame(&mut self, now: f64) -> Result<Option<PoseFrame>> {
        self.frame_counter = self.frame_counter.wrapping_add(1);

        if let Some(every) = self.dropout_every {
            if self.frame_counter % every == 0 {
                return Ok(Some(PoseFrame::empty(now)));
            }
        }

        Ok(Some(self.frame_at(now)))
    }

    fn name(&self) -> &str {
        "simulation"
    }
}

/// Plays back pre-recorded frames in order, ignoring the clock.
pub struct ReplaySource {
    frames: VecDeque<PoseFrame>,
}

impl ReplaySource {
    pub fn new(frames: impl IntoIterator<Item = PoseFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl PoseSource for ReplaySource {
    fn next_frame(&mut self, _now: f64) -> Result<Option<PoseFrame>> {
        Ok(self.frames.pop_front())
    }

    fn name(&self) -> &str {
        "replay"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::TrackedJoint;

    #[test]
    fn test_simulated_angle_matches_target() {
        let sim = SimulatedSquatter::new();
        for i in 0..90 {
            let t = i as f64 / 30.0;
            let frame = sim.frame_at(t);
            let angle = TrackedJoint::LEFT_KNEE.resolve(&frame, 0.0).unwrap().angle().unwrap();
            let expected = sim.knee_angle_at(t).round() as i32;
            assert!((angle.degrees() as i32 - expected).abs() <= 1, "t={t} got {angle}");
        }
    }

    #[test]
    fn test_starts_standing_and_reaches_depth() {
        let sim = SimulatedSquatter::new();
        assert!((sim.knee_angle_at(0.0) - 175.0).abs() < 1e-9);
        assert!((sim.knee_angle_at(sim.period_secs / 2.0) - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_dropout_frames_are_empty() {
        let mut sim = SimulatedSquatter::new().with_dropout(3);
        let frames: Vec<PoseFrame> = (0..6)
            .map(|i| sim.next_frame(i as f64 * 0.1).unwrap().unwrap())
            .collect();
        let empty: Vec<bool> = frames.iter().map(|f| f.landmarks.is_empty()).collect();
        assert_eq!(empty, vec![false, false, true, false, false, true]);
    }

    #[test]
    fn test_replay_source_drains_in_order() {
        let mut source = ReplaySource::new(vec![PoseFrame::empty(1.0), PoseFrame::empty(2.0)]);
        assert_eq!(source.next_frame(0.0).unwrap().unwrap().timestamp, 1.0);
        assert_eq!(source.next_frame(0.0).unwrap().unwrap().timestamp, 2.0);
        assert!(source.next_frame(0.0).unwrap().is_none());
        assert_eq!(source.remaining(), 0);
    }
}
