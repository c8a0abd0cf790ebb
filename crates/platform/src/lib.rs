//! Battery property access for voltlog.
//!
//! This crate provides a platform-agnostic trait and types for reading the
//! raw integer battery properties voltlog records, with platform-specific
//! implementations behind feature flags.
//!
//! # Features
//!
//! - `linux` - Enable Linux support (sysfs power_supply class)
//!
//! # Example
//!
//! ```ignore
//! use voltlog_platform::BatteryProvider;
//!
//! #[cfg(target_os = "linux")]
//! use voltlog_platform::linux::LinuxBattery;
//!
//! let mut battery = LinuxBattery::new()?;
//! battery.refresh()?;
//! println!("Current: {} uA", battery.props().current_now_ua);
//! ```

mod battery;
mod types;

pub use battery::{BatteryProperties, BatteryProvider};
pub use types::ChargeState;

#[cfg(target_os = "linux")]
#[cfg(feature = "linux")]
pub mod linux;
