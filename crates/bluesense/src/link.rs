//! The link-layer driver boundary
//!
//! The radio stack is external to this crate. A platform driver implements
//! [`LinkLayer`] for the outbound requests and delivers inbound traffic as
//! [`LinkEvent`] values on a single serialized channel. Events for one
//! connection are assumed to arrive in the order the controller issued
//! them; the sessions do not buffer or reorder.

use std::fmt;

use crate::error::LinkError;
use crate::gap::{AddressType, AdvKind, BdAddr};
use crate::gatt::types::{CharacteristicProps, ServiceDefinition, ServiceRange};
use crate::uuid::Uuid;

/// Opaque identifier for one active link, assigned by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnHandle(pub u16);

impl fmt::Display for ConnHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04x}", self.0)
    }
}

/// Outbound requests a session issues to the radio driver.
///
/// Every operation is a non-blocking request; completion and results come
/// back later as [`LinkEvent`]s. `read_characteristic` is the exception:
/// it reads a locally stored value and returns synchronously.
pub trait LinkLayer {
    /// Start a time-bounded scan.
    fn scan(&mut self, duration_ms: u32, interval_us: u32, window_us: u32)
        -> Result<(), LinkError>;

    /// Stop an in-progress scan. The driver still delivers a final
    /// [`LinkEvent::ScanDone`].
    fn stop_scan(&mut self) -> Result<(), LinkError>;

    /// Initiate a connection to the given peer.
    fn connect(&mut self, addr_type: AddressType, addr: BdAddr) -> Result<(), LinkError>;

    /// Tear down the given connection.
    fn disconnect(&mut self, conn: ConnHandle) -> Result<(), LinkError>;

    /// Discover primary services on the peer.
    fn discover_services(&mut self, conn: ConnHandle) -> Result<(), LinkError>;

    /// Discover characteristics within a handle range. Only one discovery
    /// operation may be in flight per connection.
    fn discover_characteristics(
        &mut self,
        conn: ConnHandle,
        range: ServiceRange,
    ) -> Result<(), LinkError>;

    /// Write a remote characteristic value, with or without acknowledgment.
    fn write_characteristic(
        &mut self,
        conn: ConnHandle,
        value_handle: u16,
        value: &[u8],
        with_response: bool,
    ) -> Result<(), LinkError>;

    /// Read the locally stored value of a server-side characteristic.
    fn read_characteristic(&mut self, value_handle: u16) -> Result<Vec<u8>, LinkError>;

    /// Register local services, returning one value-handle list per
    /// service, in declaration order.
    fn register_services(&mut self, defs: &[ServiceDefinition]) -> Result<Vec<Vec<u16>>, LinkError>;

    /// Start advertising the given payload at a fixed interval.
    fn advertise(&mut self, interval_us: u32, payload: &[u8]) -> Result<(), LinkError>;

    /// Push a characteristic value to a connected central.
    fn notify(&mut self, conn: ConnHandle, value_handle: u16, value: &[u8])
        -> Result<(), LinkError>;
}

/// Inbound events delivered by the driver.
///
/// One closed union over every event kind; each variant carries its fields
/// strongly typed. Address bytes are owned copies, never views into driver
/// buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// A single advertisement observed during a scan.
    ScanResult {
        addr_type: AddressType,
        addr: BdAddr,
        kind: AdvKind,
        rssi: i8,
        adv_data: Vec<u8>,
    },
    /// The scan finished, by timeout or an explicit stop.
    ScanDone,
    /// A connection this central requested was established.
    PeripheralConnect {
        conn: ConnHandle,
        addr_type: AddressType,
        addr: BdAddr,
    },
    /// A central-side connection was torn down, by either end.
    PeripheralDisconnect {
        conn: ConnHandle,
        addr_type: AddressType,
        addr: BdAddr,
    },
    /// One primary service reported during service discovery.
    ServiceResult {
        conn: ConnHandle,
        range: ServiceRange,
        uuid: Uuid,
    },
    /// Service discovery finished.
    ServiceDone { conn: ConnHandle },
    /// One characteristic reported during characteristic discovery.
    CharacteristicResult {
        conn: ConnHandle,
        decl_handle: u16,
        value_handle: u16,
        props: CharacteristicProps,
        uuid: Uuid,
    },
    /// Characteristic discovery finished for the requested range.
    CharacteristicDone { conn: ConnHandle },
    /// An acknowledged write completed.
    WriteDone {
        conn: ConnHandle,
        value_handle: u16,
        status: u8,
    },
    /// The peer pushed a characteristic value.
    Notify {
        conn: ConnHandle,
        value_handle: u16,
        value: Vec<u8>,
    },
    /// A connected central wrote one of our characteristics.
    GattsWrite { conn: ConnHandle, value_handle: u16 },
    /// A central connected to this peripheral.
    CentralConnect {
        conn: ConnHandle,
        addr_type: AddressType,
        addr: BdAddr,
    },
    /// A central disconnected from this peripheral.
    CentralDisconnect {
        conn: ConnHandle,
        addr_type: AddressType,
        addr: BdAddr,
    },
}
