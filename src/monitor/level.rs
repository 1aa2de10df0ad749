//! Rolling-average threshold detection over decibel levels.
//!
//! The monitor keeps the newest `window_size` levels in a FIFO window and
//! compares their average against a fixed threshold. A partially filled
//! window never alerts, so the first `window_size - 1` samples after
//! construction (or reset) are warm-up only.

use std::collections::VecDeque;

/// Convert a raw non-negative amplitude sample to a decibel-like level.
///
/// Zero amplitude maps to 0.0 rather than negative infinity so a silent
/// input reads as the quiet floor of this scale.
pub fn amplitude_to_db(amplitude: u32) -> f64 {
    if amplitude == 0 {
        return 0.0;
    }
    20.0 * f64::from(amplitude).log10()
}

/// Tunable parameters for the level monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Alert trigger level in dB. The comparison is inclusive.
    pub threshold_db: f64,
    /// Number of most-recent samples averaged. Clamped to at least 1.
    pub window_size: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            threshold_db: 80.0,
            window_size: 10,
        }
    }
}

/// One observation: the level of the sample just consumed and whether the
/// windowed average currently meets the threshold.
///
/// `alert` is a level, not an edge. It is recomputed on every call and can
/// hold true across consecutive observations while the average stays high.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelReading {
    pub level_db: f64,
    pub alert: bool,
}

/// Converts amplitude samples to levels and evaluates the rolling-average
/// alert condition.
///
/// Plain synchronous state machine: drive it from a single logical stream
/// of samples, one `observe` call in flight at a time.
#[derive(Debug, Clone)]
pub struct LevelMonitor {
    threshold_db: f64,
    window_size: usize,
    window: VecDeque<f64>,
    last_level_db: Option<f64>,
}

impl LevelMonitor {
    pub fn new(threshold_db: f64, window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            threshold_db,
            window_size,
            window: VecDeque::with_capacity(window_size),
            last_level_db: None,
        }
    }

    pub fn from_config(cfg: &MonitorConfig) -> Self {
        Self::new(cfg.threshold_db, cfg.window_size)
    }

    /// Consume one amplitude sample and return its level plus the current
    /// alert decision.
    ///
    /// The oldest level is evicted once the window is full, so the average
    /// always reflects the newest `window_size` samples.
    pub fn observe(&mut self, amplitude: u32) -> LevelReading {
        let level_db = amplitude_to_db(amplitude);
        if self.window.len() >= self.window_size {
            self.window.pop_front();
        }
        self.window.push_back(level_db);
        self.last_level_db = Some(level_db);

        let average = self.window.iter().sum::<f64>() / self.window.len() as f64;
        let alert = self.window.len() == self.window_size && average >= self.threshold_db;
        LevelReading { level_db, alert }
    }

    /// Level of the most recently observed sample, if any.
    pub fn last_level_db(&self) -> Option<f64> {
        self.last_level_db
    }

    /// Average over the current window contents, if any sample has arrived.
    /// Defined for partial windows too; only the alert decision requires a
    /// full window.
    pub fn average_db(&self) -> Option<f64> {
        if self.window.is_empty() {
            return None;
        }
        Some(self.window.iter().sum::<f64>() / self.window.len() as f64)
    }

    /// True once the window holds `window_size` samples and alerts can fire.
    pub fn is_warmed_up(&self) -> bool {
        self.window.len() == self.window_size
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn threshold_db(&self) -> f64 {
        self.threshold_db
    }

    /// Drop all accumulated samples, returning to the freshly constructed
    /// state. Threshold and window size are fixed for the monitor's lifetime.
    pub fn reset(&mut self) {
        self.window.clear();
        self.last_level_db = None;
    }
}
