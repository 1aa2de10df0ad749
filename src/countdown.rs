//! Fixed-cadence countdown with an exactly-once terminal event.
//!
//! The sequencer is a plain synchronous state machine driven by an external
//! periodic tick source. Remaining time is clamped at zero and the
//! Running -> Fired transition happens exactly once, so a late or bursty
//! driver cannot double-trigger the terminal action.

use thiserror::Error;

/// Where the sequencer is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    Idle,
    Running,
    Fired,
}

/// Outcome of one `tick` call.
///
/// `Fired` is returned on the terminal transition and again on every tick
/// afterwards; only the transition itself should trigger external action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    Tick { remaining_ms: u64 },
    Fired,
}

/// Contract violations raised by the sequencer. Misuse fails loudly rather
/// than silently advancing state, which would corrupt the exactly-once
/// guarantee.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CountdownError {
    #[error("countdown has not been started")]
    NotStarted,
    #[error("countdown is already running")]
    AlreadyStarted,
    #[error("countdown already fired")]
    AlreadyFired,
    #[error("invalid countdown configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// Immutable countdown timing parameters.
#[derive(Debug, Clone)]
pub struct CountdownConfig {
    pub total_ms: u64,
    pub tick_interval_ms: u64,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            total_ms: 3_000,
            tick_interval_ms: 1_000,
        }
    }
}

/// Deterministic countdown-to-action state machine.
///
/// Lifecycle: Idle -> (`start`) -> Running -> (tick exhausts the budget)
/// -> Fired. `cancel` returns a started sequencer to Idle for reuse.
#[derive(Debug, Clone)]
pub struct CountdownSequencer {
    total_ms: u64,
    tick_interval_ms: u64,
    remaining_ms: u64,
    state: CountdownState,
}

impl CountdownSequencer {
    pub fn new(total_ms: u64, tick_interval_ms: u64) -> Result<Self, CountdownError> {
        if total_ms == 0 {
            return Err(CountdownError::InvalidConfig {
                reason: "total duration must be positive".to_string(),
            });
        }
        if tick_interval_ms == 0 {
            return Err(CountdownError::InvalidConfig {
                reason: "tick interval must be positive".to_string(),
            });
        }
        Ok(Self {
            total_ms,
            tick_interval_ms,
            remaining_ms: total_ms,
            state: CountdownState::Idle,
        })
    }

    pub fn from_config(cfg: &CountdownConfig) -> Result<Self, CountdownError> {
        Self::new(cfg.total_ms, cfg.tick_interval_ms)
    }

    /// Idle -> Running. Starting a sequencer that is already running or has
    /// fired is a caller bug and reported as such.
    pub fn start(&mut self) -> Result<(), CountdownError> {
        match self.state {
            CountdownState::Idle => {
                self.remaining_ms = self.total_ms;
                self.state = CountdownState::Running;
                Ok(())
            }
            CountdownState::Running => Err(CountdownError::AlreadyStarted),
            CountdownState::Fired => Err(CountdownError::AlreadyFired),
        }
    }

    /// Advance one tick interval.
    ///
    /// While time remains the event carries the clamped remaining duration.
    /// The tick that exhausts the budget transitions to Fired and returns
    /// `Fired`; every later tick is a no-op that returns `Fired` again.
    /// Ticking before `start` is a contract violation.
    pub fn tick(&mut self) -> Result<CountdownEvent, CountdownError> {
        match self.state {
            CountdownState::Idle => Err(CountdownError::NotStarted),
            CountdownState::Fired => Ok(CountdownEvent::Fired),
            CountdownState::Running => {
                self.remaining_ms = self.remaining_ms.saturating_sub(self.tick_interval_ms);
                if self.remaining_ms == 0 {
                    self.state = CountdownState::Fired;
                    Ok(CountdownEvent::Fired)
                } else {
                    Ok(CountdownEvent::Tick {
                        remaining_ms: self.remaining_ms,
                    })
                }
            }
        }
    }

    /// Abandon the countdown and return to Idle with the full budget
    /// restored, so the sequencer can be started again.
    pub fn cancel(&mut self) -> Result<(), CountdownError> {
        match self.state {
            CountdownState::Idle => Err(CountdownError::NotStarted),
            CountdownState::Running | CountdownState::Fired => {
                self.remaining_ms = self.total_ms;
                self.state = CountdownState::Idle;
                Ok(())
            }
        }
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ms
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }
}
