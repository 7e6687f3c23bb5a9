use tracing_subscriber::{fmt, EnvFilter};

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Timing record for one snapshot-broadcast tick.
#[derive(Debug, Clone)]
pub struct SnapshotMetrics {
    pub tick_number: u64,
    pub duration_us: u128,
    pub player_count: usize,
    /// Serialized gameUpdate frame size.
    pub snapshot_bytes: usize,
}

impl SnapshotMetrics {
    /// Budget matches the 30 Hz snapshot interval.
    pub const BUDGET_US: u128 = 33_000;

    /// Ticks between periodic debug summaries (10s at 30 Hz).
    pub const SUMMARY_EVERY: u64 = 300;

    pub fn log(&self) {
        if self.duration_us > Self::BUDGET_US {
            tracing::warn!(
                tick = self.tick_number,
                duration_us = self.duration_us,
                players = self.player_count,
                bytes = self.snapshot_bytes,
                "snapshot tick exceeded budget ({}us > {}us)",
                self.duration_us,
                Self::BUDGET_US
            );
        } else if self.tick_number % Self::SUMMARY_EVERY == 0 {
            tracing::debug!(
                tick = self.tick_number,
                duration_us = self.duration_us,
                players = self.player_count,
                bytes = self.snapshot_bytes,
                "snapshot tick summary"
            );
        } else {
            tracing::trace!(
                tick = self.tick_number,
                duration_us = self.duration_us,
                players = self.player_count,
                bytes = self.snapshot_bytes,
                "snapshot tick completed"
            );
        }
    }
}
