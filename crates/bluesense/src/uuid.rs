//! UUID values and the fixed identity set for the sensor/counter profile
//!
//! GATT attributes are identified by 16-bit SIG-assigned values or full
//! 128-bit vendor UUIDs. Both sides of this crate match on exact UUID
//! equality against the constants defined here.

use std::fmt;

/// UUID for GATT attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Uuid {
    /// 16-bit SIG-assigned UUID
    Uuid16(u16),
    /// 32-bit SIG-assigned UUID
    Uuid32(u32),
    /// Full 128-bit UUID, stored little-endian as it appears on the wire
    Uuid128([u8; 16]),
}

impl Uuid {
    /// Convert raw little-endian bytes to a UUID based on length
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match bytes.len() {
            2 => {
                let uuid = u16::from_le_bytes([bytes[0], bytes[1]]);
                Some(Uuid::Uuid16(uuid))
            }
            4 => {
                let uuid = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
                Some(Uuid::Uuid32(uuid))
            }
            16 => {
                let mut uuid = [0u8; 16];
                uuid.copy_from_slice(bytes);
                Some(Uuid::Uuid128(uuid))
            }
            _ => None,
        }
    }

    /// Create a UUID from a 16-bit value
    pub const fn from_u16(uuid: u16) -> Self {
        Uuid::Uuid16(uuid)
    }

    /// Get the little-endian byte representation of this UUID
    pub fn as_bytes(&self) -> Vec<u8> {
        match self {
            Uuid::Uuid16(uuid) => uuid.to_le_bytes().to_vec(),
            Uuid::Uuid32(uuid) => uuid.to_le_bytes().to_vec(),
            Uuid::Uuid128(uuid) => uuid.to_vec(),
        }
    }

}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Uuid::Uuid16(uuid) => write!(f, "{:04x}", uuid),
            Uuid::Uuid32(uuid) => write!(f, "{:08x}", uuid),
            Uuid::Uuid128(uuid) => {
                write!(
                    f,
                    "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
                    uuid[15], uuid[14], uuid[13], uuid[12],
                    uuid[11], uuid[10],
                    uuid[9], uuid[8],
                    uuid[7], uuid[6],
                    uuid[5], uuid[4], uuid[3], uuid[2], uuid[1], uuid[0]
                )
            }
        }
    }
}

/// Environmental Sensing service
pub const SENSOR_SERVICE: Uuid = Uuid::Uuid16(0x181A);
/// Counter service (User Data)
pub const COUNTER_SERVICE: Uuid = Uuid::Uuid16(0x181C);

/// Temperature characteristic
pub const TEMPERATURE: Uuid = Uuid::Uuid16(0x2A6E);
/// Humidity characteristic
pub const HUMIDITY: Uuid = Uuid::Uuid16(0x2A6F);
/// Counter-value characteristic
pub const COUNTER_VALUE: Uuid = Uuid::Uuid16(0x2B90);
/// Control characteristic, 6E400002-B5A3-F393-E0A9-E50E24DCCA9E
pub const CONTROL: Uuid = Uuid::Uuid128([
    0x9E, 0xCA, 0xDC, 0x24, 0x0E, 0xE5, 0xA9, 0xE0, 0x93, 0xF3, 0xA3, 0xB5, 0x02, 0x00, 0x40, 0x6E,
]);
