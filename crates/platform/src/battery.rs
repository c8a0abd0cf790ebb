//! Battery property traits and types.

use color_eyre::eyre::Result;

use crate::types::ChargeState;

/// Raw battery properties snapshot.
///
/// Values are the integer counters as reported by the platform at the time of
/// the last refresh. Counters the hardware does not implement read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatteryProperties {
    /// Instantaneous battery current in microamperes.
    ///
    /// The sign convention varies between drivers; some report positive
    /// current while discharging. Callers that need a consistent sign must
    /// normalize against [`BatteryProperties::state`].
    pub current_now_ua: i64,

    /// Average battery current in microamperes. Zero on most hardware.
    pub current_average_ua: i64,

    /// Current charging state.
    pub state: ChargeState,

    /// Battery voltage in millivolts.
    pub voltage_mv: i32,

    /// Remaining energy in nanowatt-hours. Zero on most hardware.
    pub energy_nwh: i64,

    /// Remaining charge in microampere-hours.
    pub charge_counter_uah: i64,

    /// Full-charge reference in microampere-hours (the level scale).
    pub charge_full_uah: i64,

    /// Remaining capacity as a platform-reported integer percentage.
    pub capacity_percent: i64,
}

impl BatteryProperties {
    /// Charge level as a percentage of the full-charge reference.
    ///
    /// Computed as `charge_counter * 100 / charge_full` when the scale is
    /// positive; falls back to the platform-reported percentage otherwise.
    pub fn level_percent(&self) -> f64 {
        if self.charge_full_uah > 0 {
            (self.charge_counter_uah * 100) as f64 / self.charge_full_uah as f64
        } else {
            self.capacity_percent as f64
        }
    }
}

/// Trait for platform-specific battery providers.
pub trait BatteryProvider {
    /// Create a new battery provider instance.
    fn new() -> Result<Self>
    where
        Self: Sized;

    /// Refresh battery properties from the system.
    fn refresh(&mut self) -> Result<()>;

    /// Get the properties read by the last refresh.
    fn props(&self) -> &BatteryProperties;

    /// Check if battery monitoring is supported on this system.
    fn is_supported() -> bool
    where
        Self: Sized,
    {
        true
    }

    /// Check if a battery is available on this system.
    fn is_available() -> bool
    where
        Self: Sized,
    {
        use starship_battery::Manager;
        Manager::new()
            .ok()
            .and_then(|m| m.batteries().ok())
            .and_then(|mut b| b.next())
            .and_then(|b| b.ok())
            .is_some()
    }
}
