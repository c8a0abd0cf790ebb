use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{eyre, Result};

use crate::battery::{BatteryProperties, BatteryProvider};
use crate::types::ChargeState;

const POWER_SUPPLY_PATH: &str = "/sys/class/power_supply";

pub struct LinuxBattery {
    props: BatteryProperties,
    battery_path: PathBuf,
}

impl BatteryProvider for LinuxBattery {
    fn new() -> Result<Self> {
        let battery_path =
            find_battery_path(Path::new(POWER_SUPPLY_PATH)).ok_or_else(|| eyre!("No battery found"))?;
        let mut provider = Self {
            props: BatteryProperties::default(),
            battery_path,
        };
        provider.refresh()?;
        Ok(provider)
    }

    fn refresh(&mut self) -> Result<()> {
        self.props = BatteryProperties {
            current_now_ua: self.read_attr("current_now"),
            current_average_ua: self.read_attr("current_avg"),
            state: self.read_status(),
            // sysfs reports microvolts
            voltage_mv: (self.read_attr("voltage_now") / 1000) as i32,
            // sysfs reports microwatt-hours
            energy_nwh: self.read_attr("energy_now") * 1000,
            charge_counter_uah: self.read_attr("charge_now"),
            charge_full_uah: self.read_attr("charge_full"),
            capacity_percent: self.read_attr("capacity"),
        };
        Ok(())
    }

    fn props(&self) -> &BatteryProperties {
        &self.props
    }

    fn is_supported() -> bool {
        Path::new(POWER_SUPPLY_PATH).exists()
    }
}

impl LinuxBattery {
    /// Create a provider rooted at an explicit battery directory.
    pub fn with_path(battery_path: PathBuf) -> Self {
        Self {
            props: BatteryProperties::default(),
            battery_path,
        }
    }

    /// Read an integer attribute, treating missing or unparsable files as
    /// zero. Counters like `current_avg` and `energy_now` are simply absent
    /// on most hardware.
    fn read_attr(&self, name: &str) -> i64 {
        fs::read_to_string(self.battery_path.join(name))
            .ok()
            .and_then(|content| content.trim().parse::<i64>().ok())
            .unwrap_or(0)
    }

    fn read_status(&self) -> ChargeState {
        fs::read_to_string(self.battery_path.join("status"))
            .map(|status| ChargeState::from_sysfs(&status))
            .unwrap_or(ChargeState::Unknown)
    }
}

fn find_battery_path(power_supply: &Path) -> Option<PathBuf> {
    if !power_supply.exists() {
        return None;
    }

    if let Ok(entries) = fs::read_dir(power_supply) {
        for entry in entries.flatten() {
            let path = entry.path();
            let type_path = path.join("type");
            if let Ok(type_content) = fs::read_to_string(type_path) {
                if type_content.trim() == "Battery" {
                    return Some(path);
                }
            }
        }
    }
    None
}
