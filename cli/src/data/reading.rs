//! Derived battery metrics and the CSV record format.

use serde::Serialize;
use voltlog_platform::{BatteryProperties, ChargeState};

use crate::data::monitor::LevelSnapshot;

/// Force reported current negative while discharging.
///
/// Some models report discharge current with an inverted sign; the charging
/// state is the authoritative direction signal.
pub fn normalize_current(state: ChargeState, raw_ua: i64) -> i64 {
    if state.is_discharging() {
        -raw_ua.abs()
    } else {
        raw_ua
    }
}

/// Instantaneous discharge power in watts.
///
/// Only negative current means discharging; anything else draws from external
/// power and reads as zero.
pub fn discharge_watts(voltage_mv: i32, current_ua: i64) -> f64 {
    if current_ua >= 0 {
        0.0
    } else {
        (voltage_mv as f64 / 1000.0) * (current_ua.abs() as f64 / 1000.0 / 1000.0)
    }
}

/// Estimated remaining lifetime as (whole hours, fractional minutes).
///
/// `|charge / current|` with both sides scaled to milliamp terms. A zero
/// current reading would divide to infinity and estimates nothing useful, so
/// it maps to zero.
pub fn estimated_lifetime(charge_uah: i64, current_ua: i64) -> (u64, f64) {
    if current_ua == 0 {
        return (0, 0.0);
    }
    let estimate = ((charge_uah as f64 / 1000.0) / (current_ua as f64 / 1000.0)).abs();
    let hours = estimate.floor();
    let minutes = (estimate - hours) * 60.0;
    (hours as u64, minutes)
}

/// One battery sample, produced once per sampling tick.
#[derive(Debug, Clone, Serialize)]
pub struct BatteryReading {
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
    /// Normalized instantaneous current in microamperes.
    pub current_now_ua: i64,
    /// Numeric charging status code.
    pub status_code: i32,
    /// Average current in microamperes. Zero on most hardware.
    pub current_average_ua: i64,
    /// Last voltage observed by the monitor, in millivolts.
    pub last_known_voltage_mv: i32,
    /// Discharge power in watts.
    pub watts: f64,
    /// Remaining energy in nanowatt-hours. Zero on most hardware.
    pub energy_nwh: i64,
    /// Remaining charge in microampere-hours.
    pub charge_counter_uah: i64,
    /// Platform-reported capacity percentage.
    pub capacity_percent: i64,
    /// Estimated lifetime, whole hours.
    pub hours: u64,
    /// Estimated lifetime, fractional minutes past the whole hours.
    pub minutes: f64,
}

impl BatteryReading {
    pub fn compute(timestamp_ms: i64, props: &BatteryProperties, cached: LevelSnapshot) -> Self {
        let current_now_ua = normalize_current(props.state, props.current_now_ua);
        let watts = discharge_watts(cached.voltage_mv, current_now_ua);
        let (hours, minutes) = estimated_lifetime(props.charge_counter_uah, current_now_ua);

        Self {
            timestamp_ms,
            current_now_ua,
            status_code: props.state.code(),
            current_average_ua: props.current_average_ua,
            last_known_voltage_mv: cached.voltage_mv,
            watts,
            energy_nwh: props.energy_nwh,
            charge_counter_uah: props.charge_counter_uah,
            capacity_percent: props.capacity_percent,
            hours,
            minutes,
        }
    }

    /// Serialize as one CSV record, without the trailing newline.
    ///
    /// Field order is fixed:
    /// `timestamp,current_now,status,current_average,last_known_voltage,watts,energy,capacity,capacity_percentage,hours,minutes`.
    /// There is no header row.
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{},{}",
            self.timestamp_ms,
            self.current_now_ua,
            self.status_code,
            self.current_average_ua,
            self.last_known_voltage_mv,
            self.watts,
            self.energy_nwh,
            self.charge_counter_uah,
            self.capacity_percent,
            self.hours,
            self.minutes
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn discharging_props() -> BatteryProperties {
        BatteryProperties {
            current_now_ua: 500_000,
            current_average_ua: 0,
            state: ChargeState::Discharging,
            voltage_mv: 4000,
            energy_nwh: 0,
            charge_counter_uah: 2_000_000,
            charge_full_uah: 3_000_000,
            capacity_percent: 66,
        }
    }

    #[test]
    fn test_normalize_current_negates_while_discharging() {
        assert_eq!(
            normalize_current(ChargeState::Discharging, 500_000),
            -500_000
        );
        assert_eq!(
            normalize_current(ChargeState::Discharging, -500_000),
            -500_000
        );
    }

    #[test]
    fn test_normalize_current_unchanged_otherwise() {
        assert_eq!(normalize_current(ChargeState::Charging, 500_000), 500_000);
        assert_eq!(normalize_current(ChargeState::Full, -200_000), -200_000);
        assert_eq!(normalize_current(ChargeState::Unknown, 123), 123);
    }

    #[test]
    fn test_watts_zero_for_non_negative_current() {
        assert_eq!(discharge_watts(4000, 0), 0.0);
        assert_eq!(discharge_watts(4000, 500_000), 0.0);
    }

    #[test]
    fn test_watts_positive_for_negative_current() {
        let watts = discharge_watts(4000, -500_000);
        assert!(watts > 0.0);
        assert_eq!(watts, 2.0);
    }

    #[test]
    fn test_estimated_lifetime_floor_and_remainder() {
        // 2_000_000 uAh at 800_000 uA -> 2.5 hours
        let (hours, minutes) = estimated_lifetime(2_000_000, -800_000);
        assert_eq!(hours, 2);
        assert_eq!(minutes, 30.0);
    }

    #[test]
    fn test_estimated_lifetime_non_negative() {
        let (hours, minutes) = estimated_lifetime(2_000_000, 800_000);
        assert_eq!(hours, 2);
        assert!(minutes >= 0.0);

        let (hours, minutes) = estimated_lifetime(0, -800_000);
        assert_eq!(hours, 0);
        assert_eq!(minutes, 0.0);
    }

    #[test]
    fn test_estimated_lifetime_zero_current() {
        assert_eq!(estimated_lifetime(2_000_000, 0), (0, 0.0));
    }

    #[test]
    fn test_end_to_end_reading() {
        let props = discharging_props();
        let cached = LevelSnapshot {
            voltage_mv: 4000,
            level_percent: 66.6,
        };

        let reading = BatteryReading::compute(1_700_000_000_000, &props, cached);

        assert_eq!(reading.current_now_ua, -500_000);
        assert_eq!(reading.watts, 2.0);
        assert_eq!(reading.hours, 4);
        assert_eq!(reading.minutes, 0.0);
        assert_eq!(reading.status_code, 3);
        assert_eq!(reading.last_known_voltage_mv, 4000);
    }

    #[test]
    fn test_csv_field_order() {
        let props = discharging_props();
        let cached = LevelSnapshot {
            voltage_mv: 4000,
            level_percent: 66.6,
        };

        let reading = BatteryReading::compute(1_700_000_000_000, &props, cached);
        let line = reading.to_csv_line();
        let fields: Vec<&str> = line.split(',').collect();

        assert_eq!(fields.len(), 11);
        assert_eq!(fields[0], "1700000000000");
        assert_eq!(fields[1], "-500000");
        assert_eq!(fields[2], "3");
        assert_eq!(fields[3], "0");
        assert_eq!(fields[4], "4000");
        assert_eq!(fields[5], "2");
        assert_eq!(fields[6], "0");
        assert_eq!(fields[7], "2000000");
        assert_eq!(fields[8], "66");
        assert_eq!(fields[9], "4");
        assert_eq!(fields[10], "0");
    }
}
