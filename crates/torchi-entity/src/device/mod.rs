//! Push device credential entities.

pub mod model;

pub use model::{DeviceCredential, NewDeviceCredential, PushTarget};
