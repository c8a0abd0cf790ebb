pub mod battery;
pub mod monitor;
pub mod reading;
pub mod sampler;
pub mod writer;

pub use battery::BatteryData;
pub use monitor::{LevelMonitor, LevelSnapshot};
pub use reading::BatteryReading;
pub use sampler::Sampler;
pub use writer::CsvAppender;
