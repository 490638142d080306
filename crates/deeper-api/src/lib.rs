// deeper-api: Async Rust client for the Deeper device admin REST API

pub mod crypto;
pub mod device;
pub mod error;
pub mod probe;
pub mod transport;

pub use crypto::PasswordEncryptor;
pub use device::models::{
    AccessControlDevice, AccessControlList, AccessControlUpdate, AdsCategoryChanges,
    AdsCategoryStates, AdsFilterStatus, CategoryChanges, CategoryStates, DpnMode, DpnModeStatus,
    SharingConfig, SharingConfigKey, Tunnel,
};
pub use device::{DEFAULT_HOST, DeviceClient, is_expected_disconnect};
pub use error::Error;
pub use probe::{Prober, SystemPing};
pub use transport::TransportConfig;
