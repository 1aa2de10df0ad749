//! Wires the level monitor and the countdown into one capture session.
//!
//! A session watches the amplitude stream, arms the countdown at a trigger
//! point (a configured delay or an external signal), and performs the
//! terminal capture action exactly once when the countdown fires. The two
//! components keep independent cadences but are serialized inside a single
//! driver loop, so neither sees overlapping calls.

use crate::countdown::{
    CountdownConfig, CountdownError, CountdownEvent, CountdownSequencer, CountdownState,
};
use crate::monitor::{LevelMonitor, LevelReading, LiveLevel, MonitorConfig};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Timing and tuning for a full session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub monitor: MonitorConfig,
    pub countdown: CountdownConfig,
    /// Cadence of the amplitude sampling driver.
    pub sample_period_ms: u64,
    /// Arm the countdown once this much session time has elapsed.
    /// `None` leaves arming to an external trigger only.
    pub trigger_after_ms: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            monitor: MonitorConfig::default(),
            countdown: CountdownConfig::default(),
            sample_period_ms: 200,
            trigger_after_ms: Some(1_000),
        }
    }
}

/// Events emitted by a session, in order.
///
/// Serialized as JSON with an `"event"` tag field for type discrimination.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    Level { level_db: f64, alert: bool },
    CountdownTick { remaining_ms: u64 },
    Captured,
}

/// Collaborator actions the session triggers. The capture action fires
/// exactly once per session; the alert action fires on every alerting
/// sample (the alert is level-triggered, not edge-triggered).
pub trait CaptureSink {
    fn on_alert(&mut self, reading: &LevelReading) {
        let _ = reading;
    }
    fn on_capture(&mut self);
}

/// Sink that discards all actions. Useful for offline runs that only
/// inspect the returned events.
pub struct NullSink;

impl CaptureSink for NullSink {
    fn on_capture(&mut self) {}
}

/// Counters collected while a session runs, for observability and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionMetrics {
    pub samples_seen: usize,
    pub alerts_raised: usize,
    pub countdown_ticks: usize,
    pub captured: bool,
}

/// Everything a session produced: the ordered event stream plus counters.
#[derive(Debug, Clone)]
pub struct SessionResult {
    pub events: Vec<SessionEvent>,
    pub metrics: SessionMetrics,
}

/// Deterministic session state machine over logical time.
///
/// Drivers advance it one sampling period at a time, either with a fresh
/// sample (`on_sample`) or without one (`on_idle`). The countdown keeps
/// ticking at its own cadence in both cases.
pub struct Session {
    monitor: LevelMonitor,
    countdown: CountdownSequencer,
    sample_period_ms: u64,
    trigger_after_ms: Option<u64>,
    armed: bool,
    now_ms: u64,
    next_tick_at_ms: Option<u64>,
    events: Vec<SessionEvent>,
    metrics: SessionMetrics,
}

impl Session {
    pub fn from_config(cfg: &SessionConfig) -> Result<Self, CountdownError> {
        Ok(Self {
            monitor: LevelMonitor::from_config(&cfg.monitor),
            countdown: CountdownSequencer::from_config(&cfg.countdown)?,
            sample_period_ms: cfg.sample_period_ms.max(1),
            trigger_after_ms: cfg.trigger_after_ms,
            armed: false,
            now_ms: 0,
            next_tick_at_ms: None,
            events: Vec::new(),
            metrics: SessionMetrics::default(),
        })
    }

    /// Advance one sampling period and feed a fresh amplitude sample.
    pub fn on_sample(&mut self, amplitude: u32, sink: &mut dyn CaptureSink) -> LevelReading {
        self.now_ms += self.sample_period_ms;
        let reading = self.monitor.observe(amplitude);
        self.metrics.samples_seen += 1;
        if reading.alert {
            self.metrics.alerts_raised += 1;
            sink.on_alert(&reading);
        }
        self.events.push(SessionEvent::Level {
            level_db: reading.level_db,
            alert: reading.alert,
        });
        self.drive_countdown(sink);
        reading
    }

    /// Advance one sampling period with no sample (driver timeout or the
    /// amplitude stream ended). The countdown still makes progress.
    pub fn on_idle(&mut self, sink: &mut dyn CaptureSink) {
        self.now_ms += self.sample_period_ms;
        self.drive_countdown(sink);
    }

    /// Request the countdown to start on the next advance, regardless of the
    /// configured trigger delay. Corresponds to the external "user action".
    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// True once the terminal capture action has run.
    pub fn is_complete(&self) -> bool {
        self.metrics.captured
    }

    /// True while further idle advances can still lead to a capture.
    pub fn capture_pending(&self) -> bool {
        if self.metrics.captured {
            return false;
        }
        match self.countdown.state() {
            CountdownState::Running => true,
            CountdownState::Idle => self.armed || self.trigger_after_ms.is_some(),
            CountdownState::Fired => false,
        }
    }

    pub fn monitor(&self) -> &LevelMonitor {
        &self.monitor
    }

    pub fn countdown(&self) -> &CountdownSequencer {
        &self.countdown
    }

    pub fn finish(self) -> SessionResult {
        SessionResult {
            events: self.events,
            metrics: self.metrics,
        }
    }

    fn drive_countdown(&mut self, sink: &mut dyn CaptureSink) {
        if self.countdown.state() == CountdownState::Idle && !self.metrics.captured {
            let delay_reached = self
                .trigger_after_ms
                .map(|t| self.now_ms >= t)
                .unwrap_or(false);
            if (self.armed || delay_reached) && self.countdown.start().is_ok() {
                self.next_tick_at_ms = Some(self.now_ms + self.countdown.tick_interval_ms());
                debug!(at_ms = self.now_ms, "countdown armed");
            }
        }

        while self.countdown.state() == CountdownState::Running
            && self.next_tick_at_ms.map(|t| self.now_ms >= t).unwrap_or(false)
        {
            match self.countdown.tick() {
                Ok(CountdownEvent::Tick { remaining_ms }) => {
                    self.metrics.countdown_ticks += 1;
                    self.events.push(SessionEvent::CountdownTick { remaining_ms });
                    self.next_tick_at_ms = self
                        .next_tick_at_ms
                        .map(|t| t + self.countdown.tick_interval_ms());
                }
                Ok(CountdownEvent::Fired) => {
                    self.metrics.captured = true;
                    self.events.push(SessionEvent::Captured);
                    self.next_tick_at_ms = None;
                    debug!(at_ms = self.now_ms, "countdown fired, capturing");
                    sink.on_capture();
                }
                // State is checked Running above, so tick cannot be rejected.
                Err(_) => break,
            }
        }
    }
}

/// Run a full session over a synthetic amplitude slice with no timers or
/// devices. Used by the CLI demo and tests so timing behavior stays
/// reproducible.
///
/// After the slice is exhausted the countdown driver keeps advancing until
/// it fires, mirroring the two independent cadences of a live run.
pub fn offline_session_from_samples(
    samples: &[u32],
    cfg: &SessionConfig,
    sink: &mut dyn CaptureSink,
) -> Result<SessionResult, CountdownError> {
    let mut session = Session::from_config(cfg)?;
    for &amplitude in samples {
        session.on_sample(amplitude, sink);
        if session.is_complete() {
            break;
        }
    }
    while session.capture_pending() {
        session.on_idle(sink);
    }
    Ok(session.finish())
}

/// Drive a session from a channel of amplitude samples.
///
/// The loop blocks up to one sampling period per iteration; a timeout still
/// advances logical time so the countdown cannot stall on a slow sampler.
/// Setting `trigger` arms the countdown (the "user action"); the loop ends
/// after the capture fires or the sender disconnects.
pub fn run_session(
    receiver: &Receiver<u32>,
    cfg: &SessionConfig,
    trigger: Option<Arc<AtomicBool>>,
    live: Option<LiveLevel>,
    sink: &mut dyn CaptureSink,
) -> Result<SessionResult, CountdownError> {
    let mut session = Session::from_config(cfg)?;
    let wait_time = Duration::from_millis(cfg.sample_period_ms.max(1));

    loop {
        if session.is_complete() {
            break;
        }
        if let Some(flag) = &trigger {
            if flag.load(Ordering::Relaxed) {
                session.arm();
            }
        }
        match receiver.recv_timeout(wait_time) {
            Ok(amplitude) => {
                let reading = session.on_sample(amplitude, sink);
                if let Some(live) = &live {
                    live.set_db(reading.level_db);
                }
            }
            Err(RecvTimeoutError::Timeout) => session.on_idle(sink),
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    // Sender may disconnect while the countdown is mid-flight; let it finish.
    while session.capture_pending() {
        session.on_idle(sink);
    }
    Ok(session.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    struct CountingSink {
        alerts: usize,
        captures: usize,
    }

    impl CountingSink {
        fn new() -> Self {
            Self {
                alerts: 0,
                captures: 0,
            }
        }
    }

    impl CaptureSink for CountingSink {
        fn on_alert(&mut self, _reading: &LevelReading) {
            self.alerts += 1;
        }
        fn on_capture(&mut self) {
            self.captures += 1;
        }
    }

    fn fast_config() -> SessionConfig {
        SessionConfig {
            monitor: MonitorConfig {
                threshold_db: 80.0,
                window_size: 3,
            },
            countdown: CountdownConfig {
                total_ms: 1_000,
                tick_interval_ms: 500,
            },
            sample_period_ms: 200,
            trigger_after_ms: Some(400),
        }
    }

    #[test]
    fn captures_exactly_once() {
        let mut sink = CountingSink::new();
        let samples = vec![20_000u32; 40];
        let result =
            offline_session_from_samples(&samples, &fast_config(), &mut sink).expect("session");
        assert!(result.metrics.captured);
        assert_eq!(sink.captures, 1);
        let captured_events = result
            .events
            .iter()
            .filter(|e| matches!(e, SessionEvent::Captured))
            .count();
        assert_eq!(captured_events, 1);
    }

    #[test]
    fn countdown_events_report_remaining_time() {
        let mut sink = NullSink;
        let samples = vec![100u32; 40];
        let result =
            offline_session_from_samples(&samples, &fast_config(), &mut sink).expect("session");
        // Armed at 400ms; one intermediate tick at 500ms remaining, then fire.
        let ticks: Vec<_> = result
            .events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::CountdownTick { remaining_ms } => Some(*remaining_ms),
                _ => None,
            })
            .collect();
        assert_eq!(ticks, vec![500]);
        assert_eq!(result.metrics.countdown_ticks, 1);
        assert!(result.metrics.captured);
    }

    #[test]
    fn alerts_fire_on_every_loud_sample_once_warm() {
        let mut sink = CountingSink::new();
        let mut cfg = fast_config();
        cfg.trigger_after_ms = None; // monitor-only run
        let samples = vec![20_000u32; 10];
        let result = offline_session_from_samples(&samples, &cfg, &mut sink).expect("session");
        // Window of 3: samples 3..=10 alert.
        assert_eq!(sink.alerts, 8);
        assert_eq!(result.metrics.alerts_raised, 8);
        assert_eq!(sink.captures, 0);
        assert!(!result.metrics.captured);
    }

    #[test]
    fn quiet_run_without_trigger_produces_level_events_only() {
        let mut sink = CountingSink::new();
        let mut cfg = fast_config();
        cfg.trigger_after_ms = None;
        let samples = vec![10u32; 6];
        let result = offline_session_from_samples(&samples, &cfg, &mut sink).expect("session");
        assert_eq!(result.events.len(), 6);
        assert!(result
            .events
            .iter()
            .all(|e| matches!(e, SessionEvent::Level { alert: false, .. })));
        assert_eq!(sink.captures, 0);
    }

    #[test]
    fn countdown_completes_after_samples_run_out() {
        let mut sink = CountingSink::new();
        // Only two samples (400ms): countdown arms on the last one and must
        // still run to completion on idle advances.
        let samples = vec![100u32, 100];
        let result =
            offline_session_from_samples(&samples, &fast_config(), &mut sink).expect("session");
        assert!(result.metrics.captured);
        assert_eq!(sink.captures, 1);
        assert_eq!(result.metrics.samples_seen, 2);
    }

    #[test]
    fn accessors_expose_component_state() {
        let mut session = Session::from_config(&fast_config()).expect("session");
        assert_eq!(session.countdown().state(), CountdownState::Idle);
        assert_eq!(session.monitor().window_len(), 0);

        let mut sink = NullSink;
        // Two samples reach the 400ms trigger point and arm the countdown.
        session.on_sample(500, &mut sink);
        session.on_sample(500, &mut sink);
        assert_eq!(session.monitor().window_len(), 2);
        assert_eq!(session.countdown().state(), CountdownState::Running);
        assert_eq!(session.countdown().remaining_ms(), 1_000);
        assert!(!session.is_complete());
    }

    #[test]
    fn external_arm_overrides_trigger_delay() {
        let mut cfg = fast_config();
        cfg.trigger_after_ms = None;
        let mut session = Session::from_config(&cfg).expect("session");
        let mut sink = CountingSink::new();

        session.on_sample(500, &mut sink);
        assert_eq!(session.countdown().state(), CountdownState::Idle);

        session.arm();
        session.on_sample(500, &mut sink);
        assert_eq!(session.countdown().state(), CountdownState::Running);

        while session.capture_pending() {
            session.on_idle(&mut sink);
        }
        assert_eq!(sink.captures, 1);
    }

    #[test]
    fn session_events_serialize_with_event_tag() {
        let level = SessionEvent::Level {
            level_db: 85.0,
            alert: true,
        };
        let json = serde_json::to_string(&level).expect("serialize");
        assert_eq!(json, r#"{"event":"level","level_db":85.0,"alert":true}"#);

        let captured = serde_json::to_string(&SessionEvent::Captured).expect("serialize");
        assert_eq!(captured, r#"{"event":"captured"}"#);
    }

    #[test]
    fn run_session_drains_channel_and_captures() {
        let (sender, receiver) = bounded::<u32>(64);
        let mut cfg = fast_config();
        cfg.sample_period_ms = 1;
        cfg.countdown = CountdownConfig {
            total_ms: 10,
            tick_interval_ms: 5,
        };
        cfg.trigger_after_ms = None;

        let trigger = Arc::new(AtomicBool::new(true));
        let producer = std::thread::spawn(move || {
            for _ in 0..32 {
                if sender.send(15_000).is_err() {
                    break;
                }
            }
            // Sender drops here; the session finishes the countdown on idle.
        });

        let mut sink = CountingSink::new();
        let result = run_session(&receiver, &cfg, Some(trigger), None, &mut sink).expect("session");
        producer.join().expect("producer thread");

        assert!(result.metrics.captured);
        assert_eq!(sink.captures, 1);
    }

    #[test]
    fn run_session_publishes_live_level() {
        let (sender, receiver) = bounded::<u32>(8);
        let mut cfg = fast_config();
        cfg.sample_period_ms = 1;
        cfg.trigger_after_ms = Some(1);

        let live = LiveLevel::new();
        let reader = live.clone();
        sender.send(10_000).expect("send");
        drop(sender);

        let mut sink = NullSink;
        let result =
            run_session(&receiver, &cfg, None, Some(live), &mut sink).expect("session");
        assert!(result.metrics.samples_seen >= 1);
        let expected = crate::monitor::amplitude_to_db(10_000);
        assert_eq!(reader.level_db(), expected);
    }
}
