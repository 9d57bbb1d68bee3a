//! BlueSense - BLE GATT sessions for a fixed sensor/counter profile
//!
//! This library implements the central and peripheral halves of a GATT
//! session against a known pair of services: an environmental-sensing
//! service (temperature + humidity) and a counter service (counter value +
//! control switch). The radio itself is not part of the crate; a platform
//! driver implements the [`LinkLayer`] trait and feeds [`LinkEvent`]s into
//! the session objects, which run the scan/connect/discover/serve state
//! machines and route data-plane traffic through owner-supplied callbacks.

pub mod adv;
pub mod error;
pub mod gap;
pub mod gatt;
pub mod link;
pub mod uuid;

// Re-export common types for convenience
pub use adv::{advertising_payload, decode_name, decode_services};
pub use error::LinkError;
pub use gap::{AddressType, AdvKind, BdAddr};
pub use gatt::{
    CentralError, CharacteristicHandles, CharacteristicProps, GattCentral, GattPeripheral,
    NotifyChannel, PeerIdentity, PeripheralError, ServiceRange, SessionState,
};
pub use link::{ConnHandle, LinkEvent, LinkLayer};
pub use uuid::Uuid;
