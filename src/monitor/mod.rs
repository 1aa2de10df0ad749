//! Sound level monitoring: amplitude to decibel conversion plus a
//! rolling-average alert detector.
//!
//! Raw amplitude samples arrive from an external driver at a fixed cadence,
//! get converted to a logarithmic level, and are smoothed over a fixed-size
//! sliding window. The detector reports an alert on every sample whose
//! windowed average meets the configured threshold.

mod level;
mod meter;

pub use level::{amplitude_to_db, LevelMonitor, LevelReading, MonitorConfig};
pub use meter::LiveLevel;
