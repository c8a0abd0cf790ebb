//! Linux battery access via the sysfs power_supply class.

mod battery;

pub use battery::LinuxBattery;
