//! Background watcher for battery change notifications.
//!
//! The sampling loop wants the most recent voltage and charge level without
//! reading them on its own tick. A `watch` channel holds the latest
//! observation; the monitor task overwrites it whenever the value changes and
//! the sampler reads whatever is current. This replaces an unsynchronized
//! shared cache with an explicit single-producer holder.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, trace};

use crate::data::BatteryData;

/// Latest voltage/level observation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LevelSnapshot {
    /// Battery voltage in millivolts.
    pub voltage_mv: i32,
    /// Charge level as a percentage of the full-charge reference.
    pub level_percent: f64,
}

pub fn channel() -> (watch::Sender<LevelSnapshot>, watch::Receiver<LevelSnapshot>) {
    watch::channel(LevelSnapshot::default())
}

pub struct LevelMonitor {
    battery: BatteryData,
    tx: watch::Sender<LevelSnapshot>,
    poll_interval: Duration,
}

impl LevelMonitor {
    pub fn new(
        battery: BatteryData,
        tx: watch::Sender<LevelSnapshot>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            battery,
            tx,
            poll_interval,
        }
    }

    /// Poll until the shutdown signal flips or every receiver is gone.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let mut tick = tokio::time::interval(self.poll_interval);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        debug!(poll_interval_ms = self.poll_interval.as_millis() as u64, "Level monitor started");

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    if self.publish_latest() {
                        break;
                    }
                }
                res = shutdown.changed() => {
                    if res.is_err() || *shutdown.borrow() {
                        debug!("Level monitor stopping");
                        break;
                    }
                }
            }
        }
    }

    /// Returns true when the channel is closed and polling should stop.
    fn publish_latest(&mut self) -> bool {
        if let Err(e) = self.battery.refresh() {
            debug!(error = %e, "Level monitor refresh failed");
            return false;
        }

        let props = self.battery.props();
        let snapshot = LevelSnapshot {
            voltage_mv: props.voltage_mv,
            level_percent: props.level_percent(),
        };

        if self.tx.is_closed() {
            return true;
        }

        let changed = self.tx.send_if_modified(|current| {
            if *current != snapshot {
                *current = snapshot;
                true
            } else {
                false
            }
        });

        if changed {
            trace!(
                voltage_mv = snapshot.voltage_mv,
                level_percent = snapshot.level_percent,
                "Level changed"
            );
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use voltlog_platform::linux::LinuxBattery;

    use super::*;

    fn fake_battery(dir: &std::path::Path, voltage_uv: &str) -> LinuxBattery {
        let bat = dir.join("BAT0");
        fs::create_dir_all(&bat).unwrap();
        fs::write(bat.join("type"), "Battery\n").unwrap();
        fs::write(bat.join("status"), "Discharging\n").unwrap();
        fs::write(bat.join("voltage_now"), voltage_uv).unwrap();
        fs::write(bat.join("charge_now"), "1000000\n").unwrap();
        fs::write(bat.join("charge_full"), "2000000\n").unwrap();
        fs::write(bat.join("capacity"), "50\n").unwrap();
        LinuxBattery::with_path(bat)
    }

    #[tokio::test]
    async fn test_monitor_publishes_changes() {
        let tmp = tempfile::tempdir().unwrap();
        let battery = BatteryData::from_provider(fake_battery(tmp.path(), "12000000\n"));
        let (tx, mut rx) = channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let monitor = LevelMonitor::new(battery, tx, Duration::from_millis(5));
        let task = tokio::spawn(monitor.run(shutdown_rx));

        rx.changed().await.unwrap();
        let snapshot = *rx.borrow();
        assert_eq!(snapshot.voltage_mv, 12_000);
        assert_eq!(snapshot.level_percent, 50.0);

        shutdown_tx.send(true).unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_monitor_stops_when_receiver_dropped() {
        let tmp = tempfile::tempdir().unwrap();
        let battery = BatteryData::from_provider(fake_battery(tmp.path(), "12000000\n"));
        let (tx, rx) = channel();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        drop(rx);
        let monitor = LevelMonitor::new(battery, tx, Duration::from_millis(5));
        // Completes on its own once the channel has no receivers.
        monitor.run(shutdown_rx).await;
    }
}
