//! Offline demo driver for the level monitor and countdown capture core.
//!
//! Feeds amplitude samples from a file or a built-in synthetic burst through
//! a full session and prints the resulting event stream, either as human
//! readable lines or newline-delimited JSON.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use soundshot::config::AppConfig;
use soundshot::session::{offline_session_from_samples, NullSink, SessionEvent, SessionResult};
use soundshot::init_tracing;

fn main() -> Result<()> {
    let config = AppConfig::parse_args()?;
    init_tracing(&config);

    let samples = match &config.amplitude_file {
        Some(path) => load_amplitudes(path)?,
        None => synthetic_burst(&config),
    };

    let session_cfg = config.session_config();
    let result = offline_session_from_samples(&samples, &session_cfg, &mut NullSink)?;

    if config.json {
        print_json(&result)?;
    } else {
        print_text(&result);
    }
    Ok(())
}

/// One non-negative integer amplitude per line; blank lines are skipped.
fn load_amplitudes(path: &Path) -> Result<Vec<u32>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read amplitude file '{}'", path.display()))?;
    let mut samples = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let amplitude: u32 = line.parse().with_context(|| {
            format!(
                "invalid amplitude '{line}' on line {} of '{}'",
                index + 1,
                path.display()
            )
        })?;
        samples.push(amplitude);
    }
    if samples.is_empty() {
        anyhow::bail!("amplitude file '{}' contains no samples", path.display());
    }
    Ok(samples)
}

/// Quiet lead-in, a loud burst long enough to fill the averaging window,
/// then quiet again. Sized in samples from the configured cadence so the
/// burst spans the averaging horizon regardless of tuning.
fn synthetic_burst(config: &AppConfig) -> Vec<u32> {
    let window = (config.average_window_ms / config.sample_period_ms).max(1) as usize;
    let mut samples = Vec::with_capacity(window * 4);
    samples.extend(std::iter::repeat(100u32).take(window));
    samples.extend(std::iter::repeat(config.synthetic_peak).take(window * 2));
    samples.extend(std::iter::repeat(100u32).take(window));
    samples
}

fn print_json(result: &SessionResult) -> Result<()> {
    for event in &result.events {
        println!("{}", serde_json::to_string(event).context("serialize event")?);
    }
    Ok(())
}

fn print_text(result: &SessionResult) {
    for event in &result.events {
        match event {
            SessionEvent::Level { level_db, alert } => {
                let marker = if *alert { " [alert]" } else { "" };
                println!("level: {level_db:.1} dB{marker}");
            }
            SessionEvent::CountdownTick { remaining_ms } => {
                println!("countdown: {remaining_ms} ms remaining");
            }
            SessionEvent::Captured => println!("captured"),
        }
    }
    let metrics = &result.metrics;
    println!(
        "done: {} samples, {} alerts, {} countdown ticks, captured={}",
        metrics.samples_seen, metrics.alerts_raised, metrics.countdown_ticks, metrics.captured
    );
}
