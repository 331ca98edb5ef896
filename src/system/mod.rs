//! System utilities
//!
//! GPU detection, host resource discovery, and device placement.

pub mod device;
pub mod gpu;
pub mod resources;

pub use device::{select_device, DevicePreference, Placement};
pub use gpu::{detect_gpu, GpuInfo};
pub use resources::{system_info, SystemInfo};
