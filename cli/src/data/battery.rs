use color_eyre::eyre::Result;
use voltlog_platform::{BatteryProperties, BatteryProvider};

#[cfg(target_os = "linux")]
type PlatformBattery = voltlog_platform::linux::LinuxBattery;

#[cfg(not(target_os = "linux"))]
compile_error!("BatteryData (PlatformBattery) is only supported on Linux targets.");

pub struct BatteryData {
    provider: PlatformBattery,
}

impl BatteryData {
    pub fn new() -> Result<Self> {
        let provider = PlatformBattery::new()?;
        Ok(Self { provider })
    }

    pub fn from_provider(provider: PlatformBattery) -> Self {
        Self { provider }
    }

    pub fn refresh(&mut self) -> Result<()> {
        self.provider.refresh()
    }

    pub fn props(&self) -> &BatteryProperties {
        self.provider.props()
    }

    pub fn is_available() -> bool {
        PlatformBattery::is_supported() && PlatformBattery::is_available()
    }
}
