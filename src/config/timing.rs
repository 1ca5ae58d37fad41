//! Loop pacing configuration

use crate::orchestrator::LoopTiming;
use serde::Deserialize;
use std::time::Duration;

/// Pauses between loop phases
#[derive(Debug, Clone, PartialEq)]
pub struct TimingConfig {
    /// Pause after the plans are logged, before production
    pub settle_delay_ms: u64,
    /// Pause after each produced asset
    pub generation_pause_ms: u64,
    /// Wait between the end of one cycle and the start of the next
    pub cycle_interval_secs: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 1500,
            generation_pause_ms: 800,
            cycle_interval_secs: 15,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileTiming {
    pub settle_delay_ms: Option<u64>,
    pub generation_pause_ms: Option<u64>,
    pub cycle_interval_secs: Option<u64>,
}

impl TimingConfig {
    pub fn from_file(file: Option<FileTiming>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            settle_delay_ms: file.settle_delay_ms.unwrap_or(defaults.settle_delay_ms),
            generation_pause_ms: file
                .generation_pause_ms
                .unwrap_or(defaults.generation_pause_ms),
            // Zero would spin the backend; one second is the floor
            cycle_interval_secs: file
                .cycle_interval_secs
                .unwrap_or(defaults.cycle_interval_secs)
                .max(1),
        }
    }

    pub fn loop_timing(&self) -> LoopTiming {
        LoopTiming {
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            generation_pause: Duration::from_millis(self.generation_pause_ms),
            cycle_interval: Duration::from_secs(self.cycle_interval_secs),
        }
    }
}
