//! The periodic sampling loop.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::data::monitor::LevelSnapshot;
use crate::data::writer::{CsvAppender, WriterError};
use crate::data::{BatteryData, BatteryReading};

#[derive(Debug, thiserror::Error)]
pub enum SamplerError {
    #[error("Write error: {0}")]
    Write(#[from] WriterError),

    #[error("Battery error: {0}")]
    Battery(String),
}

/// Reads battery properties on a fixed cadence and appends one CSV record per
/// tick. Per-tick failures are logged and the loop keeps going; only the
/// shutdown signal or the sample limit ends the run.
pub struct Sampler {
    battery: BatteryData,
    appender: CsvAppender,
    level_rx: watch::Receiver<LevelSnapshot>,
    interval: Duration,
    /// Stop after this many records; zero means unbounded.
    max_samples: u64,
}

impl Sampler {
    pub fn new(
        battery: BatteryData,
        appender: CsvAppender,
        level_rx: watch::Receiver<LevelSnapshot>,
        interval: Duration,
        max_samples: u64,
    ) -> Self {
        Self {
            battery,
            appender,
            level_rx,
            interval,
            max_samples,
        }
    }

    /// Run until shutdown or the sample limit. Returns the number of records
    /// written.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> u64 {
        let mut tick = tokio::time::interval(self.interval);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        info!(
            output = %self.appender.path().display(),
            interval_ms = self.interval.as_millis() as u64,
            max_samples = self.max_samples,
            "Sampler started"
        );

        let mut count: u64 = 0;
        loop {
            tokio::select! {
                _ = tick.tick() => {
                    match self.sample() {
                        Ok(reading) => {
                            count += 1;
                            debug!(count, line = %reading.to_csv_line(), "Wrote sample");
                            if self.max_samples > 0 && count >= self.max_samples {
                                info!(count, "Sample limit reached");
                                break;
                            }
                        }
                        Err(e) => {
                            error!(error = %e, "Error taking sample");
                        }
                    }
                }
                res = shutdown.changed() => {
                    if res.is_err() || *shutdown.borrow() {
                        info!(count, "Sampler stopping");
                        break;
                    }
                }
            }
        }

        count
    }

    /// Take one reading and append it to the output file.
    pub fn sample(&mut self) -> Result<BatteryReading, SamplerError> {
        self.battery
            .refresh()
            .map_err(|e| SamplerError::Battery(e.to_string()))?;

        let cached = *self.level_rx.borrow();
        let reading = BatteryReading::compute(Utc::now().timestamp_millis(), self.battery.props(), cached);
        self.appender.append(&reading.to_csv_line())?;
        Ok(reading)
    }
}
