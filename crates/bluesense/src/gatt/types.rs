//! Common types for the GATT sessions

use bitflags::bitflags;

use crate::uuid::{self, Uuid};

/// Attribute handle range covering one discovered service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceRange {
    pub start_handle: u16,
    pub end_handle: u16,
}

impl ServiceRange {
    pub const fn new(start_handle: u16, end_handle: u16) -> Self {
        Self {
            start_handle,
            end_handle,
        }
    }
}

bitflags! {
    /// Characteristic property flags as declared in the service table and
    /// reported during discovery.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CharacteristicProps: u8 {
        const BROADCAST = 0x01;
        const READ = 0x02;
        const WRITE_WITHOUT_RESPONSE = 0x04;
        const WRITE = 0x08;
        const NOTIFY = 0x10;
        const INDICATE = 0x20;
    }
}

/// One characteristic declaration in a local service definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacteristicDefinition {
    pub uuid: Uuid,
    pub props: CharacteristicProps,
}

/// One local service: a UUID plus its characteristics in declaration order.
///
/// Fixed at startup, read-only thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDefinition {
    pub uuid: Uuid,
    pub characteristics: Vec<CharacteristicDefinition>,
}

/// The fixed service table served by the peripheral: environmental sensing
/// (temperature, humidity) and the counter service (counter value, control).
pub fn sensor_counter_services() -> Vec<ServiceDefinition> {
    vec![
        ServiceDefinition {
            uuid: uuid::SENSOR_SERVICE,
            characteristics: vec![
                CharacteristicDefinition {
                    uuid: uuid::TEMPERATURE,
                    props: CharacteristicProps::READ | CharacteristicProps::NOTIFY,
                },
                CharacteristicDefinition {
                    uuid: uuid::HUMIDITY,
                    props: CharacteristicProps::READ | CharacteristicProps::NOTIFY,
                },
            ],
        },
        ServiceDefinition {
            uuid: uuid::COUNTER_SERVICE,
            characteristics: vec![
                CharacteristicDefinition {
                    uuid: uuid::COUNTER_VALUE,
                    props: CharacteristicProps::READ | CharacteristicProps::NOTIFY,
                },
                CharacteristicDefinition {
                    uuid: uuid::CONTROL,
                    props: CharacteristicProps::WRITE
                        | CharacteristicProps::WRITE_WITHOUT_RESPONSE,
                },
            ],
        },
    ]
}

/// Value-handle table for the four characteristics of interest, filled in
/// during discovery. The session is ready only once every slot is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharacteristicHandles {
    pub temperature: Option<u16>,
    pub humidity: Option<u16>,
    pub counter: Option<u16>,
    pub control: Option<u16>,
}

impl CharacteristicHandles {
    /// Record a discovered value-handle if the UUID is one of the four of
    /// interest. Unrecognized UUIDs are ignored.
    pub fn record(&mut self, uuid: &Uuid, value_handle: u16) {
        match *uuid {
            uuid::TEMPERATURE => self.temperature = Some(value_handle),
            uuid::HUMIDITY => self.humidity = Some(value_handle),
            uuid::COUNTER_VALUE => self.counter = Some(value_handle),
            uuid::CONTROL => self.control = Some(value_handle),
            _ => {}
        }
    }

    /// All four slots populated.
    pub fn is_complete(&self) -> bool {
        self.temperature.is_some()
            && self.humidity.is_some()
            && self.counter.is_some()
            && self.control.is_some()
    }

    /// The notify channel a value-handle maps to, if any.
    pub fn channel_of(&self, value_handle: u16) -> Option<NotifyChannel> {
        if self.temperature == Some(value_handle) {
            Some(NotifyChannel::Temperature)
        } else if self.humidity == Some(value_handle) {
            Some(NotifyChannel::Humidity)
        } else if self.counter == Some(value_handle) {
            Some(NotifyChannel::Counter)
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Logical channel for notify traffic, tagging which characteristic a
/// payload belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NotifyChannel {
    Temperature = 1,
    Humidity = 2,
    Counter = 3,
}

impl NotifyChannel {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(NotifyChannel::Temperature),
            2 => Some(NotifyChannel::Humidity),
            3 => Some(NotifyChannel::Counter),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_known_and_unknown() {
        let mut handles = CharacteristicHandles::default();
        handles.record(&uuid::TEMPERATURE, 10);
        handles.record(&Uuid::Uuid16(0x2902), 11);
        assert_eq!(handles.temperature, Some(10));
        assert_eq!(handles.humidity, None);
        assert!(!handles.is_complete());
    }

    #[test]
    fn test_completeness_requires_all_four() {
        let mut handles = CharacteristicHandles::default();
        handles.record(&uuid::TEMPERATURE, 10);
        handles.record(&uuid::HUMIDITY, 12);
        handles.record(&uuid::COUNTER_VALUE, 20);
        assert!(!handles.is_complete());
        handles.record(&uuid::CONTROL, 22);
        assert!(handles.is_complete());
    }

    #[test]
    fn test_channel_mapping() {
        let mut handles = CharacteristicHandles::default();
        handles.record(&uuid::HUMIDITY, 12);
        assert_eq!(handles.channel_of(12), Some(NotifyChannel::Humidity));
        assert_eq!(handles.channel_of(13), None);
    }

    #[test]
    fn test_service_table_shape() {
        let defs = sensor_counter_services();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].uuid, uuid::SENSOR_SERVICE);
        assert_eq!(defs[0].characteristics.len(), 2);
        assert_eq!(defs[1].characteristics[1].uuid, uuid::CONTROL);
        assert!(defs[1].characteristics[1]
            .props
            .contains(CharacteristicProps::WRITE));
    }
}
