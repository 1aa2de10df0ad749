pub mod config;
pub mod countdown;
pub mod monitor;
pub mod session;
mod telemetry;

pub use countdown::{
    CountdownConfig, CountdownError, CountdownEvent, CountdownSequencer, CountdownState,
};
pub use monitor::{amplitude_to_db, LevelMonitor, LevelReading, LiveLevel, MonitorConfig};
pub use session::{
    offline_session_from_samples, run_session, CaptureSink, NullSink, Session, SessionConfig,
    SessionEvent, SessionMetrics, SessionResult,
};
pub use telemetry::init_tracing;
