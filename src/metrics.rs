// src/metrics.rs
use std::collections::VecDeque;
use std::time::Duration;

const FRAME_WINDOW: usize = 30;

/// Rolling per-frame processing statistics for the live readout.
#[derive(Debug, Clone)]
pub struct PerformanceMetrics {
    pub avg_fps: f32,
    pub avg_processing_time: f32,
    pub tracking_confidence: f32,
    pub frames_processed: u64,
    pub frames_skipped: u64,
    pub budget_overruns: u64,
    frame_times: VecDeque<f32>,
}

impl PerformanceMetrics {
    pub fn new() -> Self {
        Self {
            avg_fps: 0.0,
            avg_processing_time: 0.0,
            tracking_confidence: 0.0,
            frames_processed: 0,
            frames_skipped: 0,
            budget_overruns: 0,
            frame_times: VecDeque::with_capacity(FRAME_WINDOW),
        }
    }

    /// Records how long one frame took. Returns true if it blew the budget.
    pub fn record_frame(&mut self, elapsed: Duration, budget: Duration) -> bool {
        let secs = elapsed.as_secs_f32();
        self.frame_times.push_front(secs);
        if self.frame_times.len() > FRAME_WINDOW {
            self.frame_times.pop_back();
        }

        self.avg_processing_time =
            self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        self.avg_fps = if self.avg_processing_time > 0.0 {
            1.0 / self.avg_processing_time
        } else {
            0.0
        };

        let over = elapsed > budget;
        if over {
            self.budget_overruns += 1;
        }
        over
    }

    pub fn record_processed(&mut self, confidence: f64) {
        self.frames_processed += 1;
        self.tracking_confidence = confidence as f32;
    }

    pub fn record_skipped(&mut self, confidence: f64) {
        self.frames_skipped += 1;
        self.tracking_confidence = confidence as f32;
    }

    pub fn window_len(&self) -> usize {
        self.frame_times.len()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_average() {
        let mut metrics = PerformanceMetrics::new();
        let budget = Duration::from_millis(33);
        metrics.record_frame(Duration::from_millis(10), budget);
        metrics.record_frame(Duration::from_millis(30), budget);
        assert!((metrics.avg_processing_time - 0.020).abs() < 1e-6);
        assert!((metrics.avg_fps - 50.0).abs() < 1e-2);
    }

    #[test]
    fn test_window_is_bounded() {
        let mut metrics = PerformanceMetrics::new();
        for _ in 0..100 {
            metrics.record_frame(Duration::from_millis(1), Duration::from_millis(33));
        }
        assert_eq!(metrics.window_len(), FRAME_WINDOW);
    }

    #[test]
    fn test_budget_overruns() {
        let mut metrics = PerformanceMetrics::new();
        let budget = Duration::from_millis(33);
        assert!(!metrics.record_frame(Duration::from_millis(33), budget));
        assert!(metrics.record_frame(Duration::from_millis(50), budget));
        assert_eq!(metrics.budget_overruns, 1);
    }

    #[test]
    fn test_counters_and_reset() {
        let mut metrics = PerformanceMetrics::new();
        metrics.record_processed(0.9);
        metrics.record_skipped(0.1);
        assert_eq!(metrics.frames_processed, 1);
        assert_eq!(metrics.frames_skipped, 1);
        assert!((metrics.tracking_confidence - 0.1).abs() < 1e-6);

        metrics.reset();
        assert_eq!(metrics.frames_processed, 0);
        assert_eq!(metrics.window_len(), 0);
    }
}
