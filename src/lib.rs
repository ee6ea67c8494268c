//! Squat repetition counting from pose landmarks.
//!
//! Per frame: landmarks -> knee angle -> up/down phase machine -> rep count
//! and a coaching cue for the front end.

pub mod app;
pub mod config;
pub mod error;
pub mod geometry;
pub mod landmarks;
pub mod metrics;
pub mod pose_source;
pub mod rep_counter;
pub mod session;
pub mod ui;

pub use config::{ExerciseConfig, StopPolicy};
pub use error::{ConfigError, FrameError};
pub use geometry::{compute_angle, Angle, JointTriple, Point2D};
pub use landmarks::{Landmark, PoseFrame, PoseLandmark, TrackedJoint};
pub use pose_source::{PoseSource, ReplaySource, SimulatedSquatter};
pub use rep_counter::{Feedback, Phase, RepCounter, RepCounterState, Thresholds, Tone, Transition};
pub use session::{FrameOutcome, FrameOutput, SessionCommand, SessionSnapshot, WorkoutSession};
