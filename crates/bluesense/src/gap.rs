//! GAP-level types: device addresses, address types, advertisement kinds
//! and the fixed scan/advertise timing used by the sessions.

use std::fmt;

pub const PUBLIC_DEVICE_ADDRESS: u8 = 0x00;
pub const RANDOM_DEVICE_ADDRESS: u8 = 0x01;
pub const PUBLIC_IDENTITY_ADDRESS: u8 = 0x02;
pub const RANDOM_IDENTITY_ADDRESS: u8 = 0x03;

/// Scan duration used by [`GattCentral::scan`](crate::gatt::GattCentral::scan)
pub const SCAN_DURATION_MS: u32 = 2000;
/// Scan interval in microseconds
pub const SCAN_INTERVAL_US: u32 = 30000;
/// Scan window in microseconds
pub const SCAN_WINDOW_US: u32 = 30000;
/// Advertising interval used by the peripheral, in microseconds
pub const ADVERTISE_INTERVAL_US: u32 = 500000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressType {
    Public,
    Random,
    PublicIdentity,
    RandomIdentity,
}

impl From<u8> for AddressType {
    fn from(value: u8) -> Self {
        match value {
            PUBLIC_DEVICE_ADDRESS => AddressType::Public,
            RANDOM_DEVICE_ADDRESS => AddressType::Random,
            PUBLIC_IDENTITY_ADDRESS => AddressType::PublicIdentity,
            RANDOM_IDENTITY_ADDRESS => AddressType::RandomIdentity,
            _ => AddressType::Public,
        }
    }
}

impl From<AddressType> for u8 {
    fn from(value: AddressType) -> Self {
        match value {
            AddressType::Public => PUBLIC_DEVICE_ADDRESS,
            AddressType::Random => RANDOM_DEVICE_ADDRESS,
            AddressType::PublicIdentity => PUBLIC_IDENTITY_ADDRESS,
            AddressType::RandomIdentity => RANDOM_IDENTITY_ADDRESS,
        }
    }
}

/// A Bluetooth device address.
///
/// Owns its six bytes; scan results must be copied into a `BdAddr` because
/// the driver's advertisement buffer is transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BdAddr {
    pub bytes: [u8; 6],
}

impl BdAddr {
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self { bytes }
    }

    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() >= 6 {
            let mut bytes = [0u8; 6];
            bytes.copy_from_slice(&slice[0..6]);
            Some(Self { bytes })
        } else {
            None
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for BdAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            self.bytes[5],
            self.bytes[4],
            self.bytes[3],
            self.bytes[2],
            self.bytes[1],
            self.bytes[0]
        )
    }
}

/// Advertisement PDU kind as reported in a scan result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvKind {
    /// Connectable undirected advertising (ADV_IND)
    Ind,
    /// Connectable directed advertising (ADV_DIRECT_IND)
    DirectInd,
    /// Scannable undirected advertising (ADV_SCAN_IND)
    ScanInd,
    /// Non-connectable undirected advertising (ADV_NONCONN_IND)
    NonconnInd,
    /// Scan response
    ScanRsp,
}

impl AdvKind {
    /// Whether a connection request may be sent to the advertiser.
    pub fn is_connectable(&self) -> bool {
        matches!(self, AdvKind::Ind | AdvKind::DirectInd)
    }
}

impl From<u8> for AdvKind {
    fn from(value: u8) -> Self {
        match value {
            0x00 => AdvKind::Ind,
            0x01 => AdvKind::DirectInd,
            0x02 => AdvKind::ScanInd,
            0x03 => AdvKind::NonconnInd,
            _ => AdvKind::ScanRsp,
        }
    }
}
