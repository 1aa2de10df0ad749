//! Command-line parsing and validation helpers.

mod defaults;
mod validation;

use clap::Parser;
use std::path::PathBuf;

pub use defaults::{
    DEFAULT_AVERAGE_WINDOW_MS, DEFAULT_COUNTDOWN_MS, DEFAULT_COUNTDOWN_TICK_MS,
    DEFAULT_SAMPLE_PERIOD_MS, DEFAULT_SYNTHETIC_PEAK, DEFAULT_THRESHOLD_DB,
    DEFAULT_TRIGGER_DELAY_MS,
};

/// CLI options for the soundshot demo driver. Validated values keep the
/// derived monitor and countdown configurations well-formed.
#[derive(Debug, Parser, Clone)]
#[command(about = "Sound-level monitor with countdown capture", author, version)]
pub struct AppConfig {
    /// Alert trigger level for the windowed average (decibels)
    #[arg(long = "threshold-db", default_value_t = DEFAULT_THRESHOLD_DB, allow_negative_numbers = true)]
    pub threshold_db: f64,

    /// Amplitude sampling period (milliseconds)
    #[arg(long = "sample-period-ms", default_value_t = DEFAULT_SAMPLE_PERIOD_MS)]
    pub sample_period_ms: u64,

    /// Averaging horizon for the rolling window (milliseconds)
    #[arg(long = "average-window-ms", default_value_t = DEFAULT_AVERAGE_WINDOW_MS)]
    pub average_window_ms: u64,

    /// Total countdown duration before capture (milliseconds)
    #[arg(long = "countdown-ms", default_value_t = DEFAULT_COUNTDOWN_MS)]
    pub countdown_ms: u64,

    /// Countdown tick interval (milliseconds)
    #[arg(long = "countdown-tick-ms", default_value_t = DEFAULT_COUNTDOWN_TICK_MS)]
    pub countdown_tick_ms: u64,

    /// Delay before the countdown is armed (milliseconds)
    #[arg(long = "trigger-after-ms", default_value_t = DEFAULT_TRIGGER_DELAY_MS)]
    pub trigger_after_ms: u64,

    /// Read amplitude samples from a file (one non-negative integer per line)
    #[arg(long = "amplitude-file")]
    pub amplitude_file: Option<PathBuf>,

    /// Peak amplitude of the built-in synthetic burst
    #[arg(long = "synthetic-peak", default_value_t = DEFAULT_SYNTHETIC_PEAK)]
    pub synthetic_peak: u32,

    /// Emit newline-delimited JSON events instead of text
    #[arg(long = "json", default_value_t = false)]
    pub json: bool,

    /// Enable file logging (debug)
    #[arg(long = "logs", env = "SOUNDSHOT_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs and log env vars)
    #[arg(long = "no-logs", env = "SOUNDSHOT_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,
}
