//! GATT session state machines for the sensor/counter profile
//!
//! [`GattCentral`] drives the client side (scan, connect, discovery, data
//! exchange) and [`GattPeripheral`] the server side (advertise, accept,
//! serve). Both are fed by a single stream of [`LinkEvent`](crate::link::LinkEvent)s.

pub mod central;
pub mod peripheral;
pub mod types;


pub use central::{CentralError, DiscoveryPhase, GattCentral, PeerIdentity, SessionState};
pub use peripheral::{GattPeripheral, PeripheralError};
pub use types::{
    sensor_counter_services, CharacteristicDefinition, CharacteristicHandles, CharacteristicProps,
    NotifyChannel, ServiceDefinition, ServiceRange,
};
