use super::defaults::{
    MAX_COUNTDOWN_MS, MAX_SAMPLE_PERIOD_MS, MAX_THRESHOLD_DB, MAX_TRIGGER_DELAY_MS,
    MAX_WINDOW_SAMPLES,
};
use super::AppConfig;
use crate::countdown::CountdownConfig;
use crate::monitor::MonitorConfig;
use crate::session::SessionConfig;
use anyhow::{bail, Context, Result};
use clap::Parser;

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let mut config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values and normalize paths.
    pub fn validate(&mut self) -> Result<()> {
        if !self.threshold_db.is_finite() || !(0.0..=MAX_THRESHOLD_DB).contains(&self.threshold_db)
        {
            bail!(
                "--threshold-db must be between 0.0 and {MAX_THRESHOLD_DB} dB, got {}",
                self.threshold_db
            );
        }
        if !(1..=MAX_SAMPLE_PERIOD_MS).contains(&self.sample_period_ms) {
            bail!(
                "--sample-period-ms must be between 1 and {MAX_SAMPLE_PERIOD_MS}, got {}",
                self.sample_period_ms
            );
        }
        if self.average_window_ms < self.sample_period_ms {
            bail!(
                "--average-window-ms ({}) must be at least --sample-period-ms ({})",
                self.average_window_ms,
                self.sample_period_ms
            );
        }
        let window_samples = self.average_window_ms / self.sample_period_ms;
        if window_samples > MAX_WINDOW_SAMPLES {
            bail!(
                "--average-window-ms / --sample-period-ms yields {window_samples} window samples (max {MAX_WINDOW_SAMPLES})"
            );
        }
        if !(1..=MAX_COUNTDOWN_MS).contains(&self.countdown_ms) {
            bail!(
                "--countdown-ms must be between 1 and {MAX_COUNTDOWN_MS}, got {}",
                self.countdown_ms
            );
        }
        if self.countdown_tick_ms == 0 || self.countdown_tick_ms > self.countdown_ms {
            bail!(
                "--countdown-tick-ms must be between 1 and --countdown-ms ({}), got {}",
                self.countdown_ms,
                self.countdown_tick_ms
            );
        }
        if self.trigger_after_ms > MAX_TRIGGER_DELAY_MS {
            bail!(
                "--trigger-after-ms must be at most {MAX_TRIGGER_DELAY_MS}, got {}",
                self.trigger_after_ms
            );
        }
        if self.synthetic_peak == 0 {
            bail!("--synthetic-peak must be positive");
        }

        if let Some(path) = &mut self.amplitude_file {
            // Store a canonical absolute path so later reads are unambiguous.
            let canonical = path.canonicalize().with_context(|| {
                format!("failed to canonicalize amplitude file '{}'", path.display())
            })?;
            if !canonical.is_file() {
                bail!("amplitude file '{}' is not a file", canonical.display());
            }
            *path = canonical;
        }

        Ok(())
    }

    /// Snapshot the monitor tuning for downstream consumers.
    pub fn monitor_config(&self) -> MonitorConfig {
        let window_samples = (self.average_window_ms / self.sample_period_ms).max(1);
        MonitorConfig {
            threshold_db: self.threshold_db,
            window_size: window_samples as usize,
        }
    }

    /// Snapshot the countdown timing for downstream consumers.
    pub fn countdown_config(&self) -> CountdownConfig {
        CountdownConfig {
            total_ms: self.countdown_ms,
            tick_interval_ms: self.countdown_tick_ms,
        }
    }

    /// Full session configuration combining both components.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            monitor: self.monitor_config(),
            countdown: self.countdown_config(),
            sample_period_ms: self.sample_period_ms,
            trigger_after_ms: Some(self.trigger_after_ms),
        }
    }
}
