// src/rep_counter.rs - Up/Down phase machine with hysteresis and rep counting
use crate::error::ConfigError;
use crate::geometry::Angle;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DOWN_THRESHOLD: u16 = 90;
pub const DEFAULT_UP_THRESHOLD: u16 = 160;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Joint extended, the starting posture.
    #[default]
    Up,
    /// Joint flexed past the down threshold.
    Down,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Up => "UP",
            Phase::Down => "DOWN",
        }
    }
}

/// Hysteresis band. Going down requires `angle < down`, coming back up
/// requires `angle > up`; anything in between keeps the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawThresholds")]
pub struct Thresholds {
    down: u16,
    up: u16,
}

#[derive(Deserialize)]
struct RawThresholds {
    down: u16,
    up: u16,
}

impl TryFrom<RawThresholds> for Thresholds {
    type Error = ConfigError;

    fn try_from(raw: RawThresholds) -> Result<Self, Self::Error> {
        Thresholds::new(raw.down, raw.up)
    }
}

impl Thresholds {
    pub fn new(down: u16, up: u16) -> Result<Self, ConfigError> {
        if down >= up || up >= 360 {
            return Err(ConfigError::InvalidThresholdConfiguration { down, up });
        }
        Ok(Self { down, up })
    }

    pub fn down(&self) -> u16 {
        self.down
    }

    pub fn up(&self) -> u16 {
        self.up
    }

    fn is_below_down(&self, angle: Angle) -> bool {
        angle.degrees() < self.down
    }

    fn is_above_up(&self, angle: Angle) -> bool {
        angle.degrees() > self.up
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            down: DEFAULT_DOWN_THRESHOLD,
            up: DEFAULT_UP_THRESHOLD,
        }
    }
}

/// Phase change produced by one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    WentDown,
    RepCompleted { rep_count: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RepCounterState {
    pub phase: Phase,
    pub rep_count: u32,
}

impl RepCounterState {
    /// Applies one frame's angle. A rep is counted on the way back up only.
    pub fn step(self, angle: Angle, thresholds: &Thresholds) -> (RepCounterState, Option<Transition>) {
        match self.phase {
            Phase::Up if thresholds.is_below_down(angle) => (
                RepCounterState { phase: Phase::Down, ..self },
                Some(Transition::WentDown),
            ),
            Phase::Down if thresholds.is_above_up(angle) => {
                let rep_count = self.rep_count + 1;
                (
                    RepCounterState { phase: Phase::Up, rep_count },
                    Some(Transition::RepCompleted { rep_count }),
                )
            }
            _ => (self, None),
        }
    }
}

/// Owns the phase/count state for one workout session.
#[derive(Debug, Clone, Default)]
pub struct RepCounter {
    state: RepCounterState,
    thresholds: Thresholds,
}

impl RepCounter {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            state: RepCounterState::default(),
            thresholds,
        }
    }

    pub fn update(&mut self, angle: Angle) -> Option<Transition> {
        let (next, transition) = self.state.step(angle, &self.thresholds);
        self.state = next;
        transition
    }

    pub fn feedback(&self, angle: Angle) -> Feedback {
        Feedback::from_angle(angle, &self.thresholds)
    }

    pub fn state(&self) -> RepCounterState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn rep_count(&self) -> u32 {
        self.state.rep_count
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn reset(&mut self) {
        self.state = RepCounterState::default();
    }
}

/// Per-frame coaching cue, derived from the angle alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    StandUp,
    GoodSquat,
    GoLower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Affirmative,
    Corrective,
}

impl Feedback {
    pub fn from_angle(angle: Angle, thresholds: &Thresholds) -> Self {
        if thresholds.is_above_up(angle) {
            Feedback::StandUp
        } else if thresholds.is_below_down(angle) {
            Feedback::GoodSquat
        } else {
            Feedback::GoLower
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Feedback::StandUp => "Stand Up",
            Feedback::GoodSquat => "Good Squat!",
            Feedback::GoLower => "Go Lower",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Feedback::GoodSquat => Tone::Affirmative,
            Feedback::StandUp | Feedback::GoLower => Tone::Corrective,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(counter: &mut RepCounter, angles: &[u16]) -> Vec<Transition> {
        angles
            .iter()
            .filter_map(|a| counter.update(Angle::new(*a)))
            .collect()
    }

    #[test]
    fn test_initial_state() {
        let counter = RepCounter::default();
        assert_eq!(counter.phase(), Phase::Up);
        assert_eq!(counter.rep_count(), 0);
    }

    #[test]
    fn test_single_full_cycle() {
        let mut counter = RepCounter::default();
        let transitions = feed(&mut counter, &[170, 100, 80, 170]);

        assert_eq!(
            transitions,
            vec![Transition::WentDown, Transition::RepCompleted { rep_count: 1 }]
        );
        assert_eq!(
            counter.state(),
            RepCounterState { phase: Phase::Up, rep_count: 1 }
        );
    }

    #[test]
    fn test_hysteresis_prevents_double_count() {
        let mut counter = RepCounter::default();
        feed(&mut counter, &[170, 85, 95, 85, 95, 170]);
        assert_eq!(counter.rep_count(), 1);
        assert_eq!(counter.phase(), Phase::Up);
    }

    #[test]
    fn test_hovering_inside_band_never_counts() {
        let mut counter = RepCounter::default();
        feed(&mut counter, &[170, 80, 155, 159, 160, 120, 160, 100]);
        assert_eq!(counter.rep_count(), 0);
        assert_eq!(counter.phase(), Phase::Down);
    }

    #[test]
    fn test_threshold_boundaries_are_strict() {
        let mut counter = RepCounter::default();
        assert_eq!(counter.update(Angle::new(90)), None);
        assert_eq!(counter.phase(), Phase::Up);
        assert_eq!(counter.update(Angle::new(89)), Some(Transition::WentDown));
        assert_eq!(counter.update(Angle::new(160)), None);
        assert_eq!(counter.phase(), Phase::Down);
        assert_eq!(
            counter.update(Angle::new(161)),
            Some(Transition::RepCompleted { rep_count: 1 })
        );
    }

    #[test]
    fn test_repeated_angle_changes_state_at_most_once() {
        let mut counter = RepCounter::default();
        let transitions = feed(&mut counter, &[45; 20]);
        assert_eq!(transitions, vec![Transition::WentDown]);

        let transitions = feed(&mut counter, &[175; 20]);
        assert_eq!(transitions, vec![Transition::RepCompleted { rep_count: 1 }]);
        assert_eq!(counter.rep_count(), 1);
    }

    #[test]
    fn test_count_is_monotonic_over_many_reps() {
        let mut counter = RepCounter::default();
        let mut last = 0;
        for _ in 0..25 {
            feed(&mut counter, &[175, 120, 70, 120, 175]);
            assert_eq!(counter.rep_count(), last + 1);
            last = counter.rep_count();
        }
    }

    #[test]
    fn test_step_is_pure() {
        let thresholds = Thresholds::default();
        let start = RepCounterState::default();
        let (down, t) = start.step(Angle::new(60), &thresholds);
        assert_eq!(t, Some(Transition::WentDown));
        assert_eq!(start, RepCounterState::default());
        assert_eq!(down.phase, Phase::Down);
        assert_eq!(down.rep_count, 0);
    }

    #[test]
    fn test_reset() {
        let mut counter = RepCounter::default();
        feed(&mut counter, &[170, 80, 170, 80]);
        assert_eq!(counter.phase(), Phase::Down);
        counter.reset();
        assert_eq!(counter.state(), RepCounterState::default());
    }

    #[test]
    fn test_feedback_labels() {
        let t = Thresholds::default();
        assert_eq!(Feedback::from_angle(Angle::new(170), &t).label(), "Stand Up");
        assert_eq!(Feedback::from_angle(Angle::new(80), &t).label(), "Good Squat!");
        assert_eq!(Feedback::from_angle(Angle::new(120), &t).label(), "Go Lower");
        assert_eq!(Feedback::from_angle(Angle::new(90), &t), Feedback::GoLower);
        assert_eq!(Feedback::from_angle(Angle::new(160), &t), Feedback::GoLower);
    }

    #[test]
    fn test_feedback_ignores_phase_history() {
        let mut counter = RepCounter::default();
        let fresh = counter.feedback(Angle::new(120));
        feed(&mut counter, &[170, 60, 100]);
        assert_eq!(counter.phase(), Phase::Down);
        assert_eq!(counter.feedback(Angle::new(120)), fresh);
    }

    #[test]
    fn test_tone() {
        assert_eq!(Feedback::GoodSquat.tone(), Tone::Affirmative);
        assert_eq!(Feedback::StandUp.tone(), Tone::Corrective);
        assert_eq!(Feedback::GoLower.tone(), Tone::Corrective);
    }

    #[test]
    fn test_threshold_validation() {
        assert!(Thresholds::new(90, 160).is_ok());
        assert!(matches!(
            Thresholds::new(160, 90),
            Err(ConfigError::InvalidThresholdConfiguration { down: 160, up: 90 })
        ));
        assert!(Thresholds::new(120, 120).is_err());
        assert!(Thresholds::new(90, 360).is_err());
    }

    #[test]
    fn test_thresholds_deserialize_validates() {
        let ok: Thresholds = serde_json::from_str(r#"{"down":80,"up":150}"#).unwrap();
        assert_eq!((ok.down(), ok.up()), (80, 150));
        assert!(serde_json::from_str::<Thresholds>(r#"{"down":150,"up":80}"#).is_err());
    }

    #[test]
    fn test_custom_thresholds() {
        let mut counter = RepCounter::new(Thresholds::new(100, 150).unwrap());
        feed(&mut counter, &[170, 95, 155]);
        assert_eq!(counter.rep_count(), 1);
    }
}
