// src/session.rs - Workout session lifecycle and per-frame processing
use crate::config::{ExerciseConfig, StopPolicy};
use crate::error::{ConfigError, FrameError};
use crate::geometry::Angle;
use crate::landmarks::PoseFrame;
use crate::metrics::PerformanceMetrics;
use crate::rep_counter::{Feedback, Phase, RepCounter, Transition};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

/// What the renderer shows for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameOutput {
    pub timestamp: f64,
    /// `None` when the joint geometry was degenerate.
    pub angle: Option<Angle>,
    pub phase: Phase,
    pub rep_count: u32,
    /// `None` renders as a neutral, empty label.
    pub feedback: Option<Feedback>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Updated,
    Skipped(FrameError),
    /// Session not running, frame ignored.
    Idle,
}

#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub id: Option<Uuid>,
    pub started_at: Option<DateTime<Local>>,
    pub exercise: String,
    pub rep_count: u32,
    pub frames_processed: u64,
    pub frames_skipped: u64,
    pub elapsed_secs: f64,
}

pub struct WorkoutSession {
    config: ExerciseConfig,
    counter: RepCounter,
    running: bool,
    id: Option<Uuid>,
    started_at: Option<DateTime<Local>>,
    stopped_at: Option<DateTime<Local>>,
    last_output: Option<FrameOutput>,
    metrics: PerformanceMetrics,
    frame_budget: Duration,
}

impl WorkoutSession {
    pub fn new(config: ExerciseConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let frame_budget = config.frame_budget()?;

        Ok(Self {
            counter: RepCounter::new(config.thresholds),
            config,
            running: false,
            id: None,
            started_at: None,
            stopped_at: None,
            last_output: None,
            metrics: PerformanceMetrics::new(),
            frame_budget,
        })
    }

    /// Begins a fresh workout: count back to zero, phase back to up.
    pub fn start(&mut self) {
        self.counter.reset();
        self.last_output = None;
        self.metrics.reset();
        self.id = Some(Uuid::new_v4());
        self.started_at = Some(Local::now());
        self.stopped_at = None;
        self.running = true;

        info!(
            session = %self.id.unwrap_or_default(),
            exercise = %self.config.name,
            "Workout started"
        );
    }

    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.stopped_at = Some(Local::now());

        if self.config.stop_policy == StopPolicy::Reset {
            self.counter.reset();
            self.last_output = None;
        }

        info!(
            reps = self.counter.rep_count(),
            processed = self.metrics.frames_processed,
            skipped = self.metrics.frames_skipped,
            "Workout stopped"
        );
    }

    pub fn process_frame(&mut self, frame: &PoseFrame) -> FrameOutcome {
        if !self.running {
            return FrameOutcome::Idle;
        }

        let start = Instant::now();
        let joint = self.config.joint;
        let confidence = joint.mean_visibility(frame);

        let outcome = match joint
            .resolve(frame, self.config.min_visibility)
            .and_then(|triple| triple.angle())
        {
            Ok(angle) => {
                self.apply_angle(angle, frame.timestamp);
                self.metrics.record_processed(confidence);
                FrameOutcome::Updated
            }
            Err(err @ FrameError::MissingLandmark { .. }) => {
                trace!(t = frame.timestamp, "Skipping frame: {}", err);
                self.metrics.record_skipped(confidence);
                FrameOutcome::Skipped(err)
            }
            Err(err @ FrameError::DegenerateGeometry) => {
                warn!(t = frame.timestamp, "Skipping frame: {}", err);
                self.neutralize_display(frame.timestamp);
                self.metrics.record_skipped(confidence);
                FrameOutcome::Skipped(err)
            }
        };

        let elapsed = start.elapsed();
        if self.metrics.record_frame(elapsed, self.frame_budget) {
            warn!(
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                budget_ms = self.config.frame_budget_ms,
                "Frame over budget"
            );
        }

        outcome
    }

    /// A frame the pose source failed to deliver; nothing about the state changes.
    pub fn note_dropped_frame(&mut self) {
        if self.running {
            self.metrics.record_skipped(0.0);
        }
    }

    fn apply_angle(&mut self, angle: Angle, timestamp: f64) {
        match self.counter.update(angle) {
            Some(Transition::WentDown) => debug!(%angle, "Phase -> DOWN"),
            Some(Transition::RepCompleted { rep_count }) => {
                info!(rep_count, %angle, "Rep completed")
            }
            None => {}
        }

        let feedback = self.counter.feedback(angle);
        debug!(t = timestamp, %angle, phase = self.counter.phase().name(), feedback = feedback.label());

        self.last_output = Some(FrameOutput {
            timestamp,
            angle: Some(angle),
            phase: self.counter.phase(),
            rep_count: self.counter.rep_count(),
            feedback: Some(feedback),
        });
    }

    fn neutralize_display(&mut self, timestamp: f64) {
        self.last_output = Some(FrameOutput {
            timestamp,
            angle: None,
            phase: self.counter.phase(),
            rep_count: self.counter.rep_count(),
            feedback: None,
        });
    }

    /// Last rendered state; persists across skipped frames.
    pub fn display(&self) -> Option<&FrameOutput> {
        self.last_output.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn rep_count(&self) -> u32 {
        self.counter.rep_count()
    }

    pub fn phase(&self) -> Phase {
        self.counter.phase()
    }

    pub fn config(&self) -> &ExerciseConfig {
        &self.config
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.metrics
    }

    pub fn summary(&self) -> SessionSummary {
        // The clock stops with the workout.
        let end = self.stopped_at.unwrap_or_else(Local::now);
        let elapsed_secs = self
            .started_at
            .map(|start| {
                end.signed_duration_since(start)
                    .to_std()
                    .unwrap_or_default()
                    .as_secs_f64()
            })
            .unwrap_or(0.0);

        SessionSummary {
            id: self.id,
            started_at: self.started_at,
            exercise: self.config.name.clone(),
            rep_count: self.counter.rep_count(),
            frames_processed: self.metrics.frames_processed,
            frames_skipped: self.metrics.frames_skipped,
            elapsed_secs,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            running: self.running,
            phase: self.counter.phase(),
            rep_count: self.counter.rep_count(),
            output: self.last_output.clone(),
            frames_processed: self.metrics.frames_processed,
            frames_skipped: self.metrics.frames_skipped,
        }
    }
}

// ============================================================================
// MESSAGE-PASSING BOUNDARY
// ============================================================================

#[derive(Debug, Clone)]
pub enum SessionCommand {
    Start,
    Stop,
    Frame(PoseFrame),
}

/// State published after every command the worker handles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub running: bool,
    pub phase: Phase,
    pub rep_count: u32,
    pub output: Option<FrameOutput>,
    pub frames_processed: u64,
    pub frames_skipped: u64,
}

/// Consumes commands one at a time until the sender side is dropped, then
/// hands the session back.
pub async fn run_session(
    mut session: WorkoutSession,
    mut commands: mpsc::Receiver<SessionCommand>,
    snapshots: watch::Sender<SessionSnapshot>,
) -> WorkoutSession {
    while let Some(command) = commands.recv().await {
        match command {
            SessionCommand::Start => session.start(),
            SessionCommand::Stop => session.stop(),
            SessionCommand::Frame(frame) => {
                session.process_frame(&frame);
            }
        }
        // Nobody listening is fine, keep consuming.
        snapshots.send_replace(session.snapshot());
    }

    debug!("Command channel closed, session worker exiting");
    session
}

pub struct SessionHandle {
    pub commands: mpsc::Sender<SessionCommand>,
    pub snapshots: watch::Receiver<SessionSnapshot>,
    pub task: JoinHandle<WorkoutSession>,
}

/// Spawns `run_session` on the current tokio runtime.
pub fn spawn_session(session: WorkoutSession, capacity: usize) -> SessionHandle {
    let (commands, rx) = mpsc::channel(capacity);
    let (tx, snapshots) = watch::channel(session.snapshot());
    let task = tokio::spawn(run_session(session, rx, tx));

    SessionHandle { commands, snapshots, task }
}
