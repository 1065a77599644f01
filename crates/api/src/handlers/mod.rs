pub mod conversions;
pub mod device_data;
pub mod devices;
pub mod thresholds;
