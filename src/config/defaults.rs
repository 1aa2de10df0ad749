//! Default tuning values for the monitor and countdown.

/// Windowed-average alert threshold in dB.
pub const DEFAULT_THRESHOLD_DB: f64 = 80.0;

/// Amplitude sampling cadence.
pub const DEFAULT_SAMPLE_PERIOD_MS: u64 = 200;

/// Averaging horizon; window size is horizon / sampling period.
pub const DEFAULT_AVERAGE_WINDOW_MS: u64 = 2_000;

/// Total countdown duration before the capture fires.
pub const DEFAULT_COUNTDOWN_MS: u64 = 3_000;

/// Countdown tick cadence (one user-visible second per tick).
pub const DEFAULT_COUNTDOWN_TICK_MS: u64 = 1_000;

/// Delay between session start and arming the countdown.
pub const DEFAULT_TRIGGER_DELAY_MS: u64 = 1_000;

/// Peak amplitude of the built-in synthetic burst.
pub const DEFAULT_SYNTHETIC_PEAK: u32 = 40_000;

pub(super) const MAX_SAMPLE_PERIOD_MS: u64 = 10_000;
pub(super) const MAX_COUNTDOWN_MS: u64 = 600_000;
pub(super) const MAX_TRIGGER_DELAY_MS: u64 = 600_000;
pub(super) const MAX_WINDOW_SAMPLES: u64 = 10_000;

// 20 * log10(u32::MAX) is just under 193 dB; anything above that can never
// trigger on integer amplitudes.
pub(super) const MAX_THRESHOLD_DB: f64 = 193.0;
