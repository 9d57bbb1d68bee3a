//! Advertising payload codec
//!
//! Builds legacy advertising payloads (flags + local name + service UUID
//! lists) and decodes the fields the central cares about out of raw
//! advertisement data. Payload layout is a sequence of length-prefixed AD
//! structures: `len, type, data[len-1]`.

use byteorder::{LittleEndian, WriteBytesExt};
use thiserror::Error;

use crate::uuid::Uuid;

pub const AD_TYPE_FLAGS: u8 = 0x01;
pub const AD_TYPE_UUID16_INCOMPLETE: u8 = 0x02;
pub const AD_TYPE_UUID16_COMPLETE: u8 = 0x03;
pub const AD_TYPE_UUID32_INCOMPLETE: u8 = 0x04;
pub const AD_TYPE_UUID32_COMPLETE: u8 = 0x05;
pub const AD_TYPE_UUID128_INCOMPLETE: u8 = 0x06;
pub const AD_TYPE_UUID128_COMPLETE: u8 = 0x07;
pub const AD_TYPE_NAME_SHORT: u8 = 0x08;
pub const AD_TYPE_NAME_COMPLETE: u8 = 0x09;

/// General discoverable, BR/EDR not supported
const ADV_FLAGS_GENERAL: u8 = 0x06;

/// Legacy advertising payloads are capped at 31 bytes
pub const ADV_MAX_PAYLOAD: usize = 31;

#[derive(Error, Debug)]
pub enum AdvError {
    #[error("advertising payload too long: {0} bytes (max {ADV_MAX_PAYLOAD})")]
    PayloadTooLong(usize),
}

/// Build an advertising payload carrying flags, a complete local name and
/// the given service UUIDs.
pub fn advertising_payload(name: &str, services: &[Uuid]) -> Result<Vec<u8>, AdvError> {
    let mut payload = Vec::with_capacity(ADV_MAX_PAYLOAD);

    append_field(&mut payload, AD_TYPE_FLAGS, &[ADV_FLAGS_GENERAL]);

    if !name.is_empty() {
        append_field(&mut payload, AD_TYPE_NAME_COMPLETE, name.as_bytes());
    }

    for service in services {
        let mut data = Vec::new();
        match service {
            Uuid::Uuid16(value) => {
                data.write_u16::<LittleEndian>(*value).unwrap();
                append_field(&mut payload, AD_TYPE_UUID16_COMPLETE, &data);
            }
            Uuid::Uuid32(value) => {
                data.write_u32::<LittleEndian>(*value).unwrap();
                append_field(&mut payload, AD_TYPE_UUID32_COMPLETE, &data);
            }
            Uuid::Uuid128(bytes) => {
                append_field(&mut payload, AD_TYPE_UUID128_COMPLETE, bytes);
            }
        }
    }

    if payload.len() > ADV_MAX_PAYLOAD {
        return Err(AdvError::PayloadTooLong(payload.len()));
    }
    Ok(payload)
}

fn append_field(payload: &mut Vec<u8>, ad_type: u8, data: &[u8]) {
    payload.push((data.len() + 1) as u8);
    payload.push(ad_type);
    payload.extend_from_slice(data);
}

/// Extract every occurrence of the given AD type from raw advertisement
/// data. Truncated trailing structures are ignored.
pub fn decode_field<'a>(adv_data: &'a [u8], ad_type: u8) -> Vec<&'a [u8]> {
    let mut result = Vec::new();
    let mut i = 0;

    while i + 1 < adv_data.len() {
        let length = adv_data[i] as usize;
        if length == 0 || i + 1 + length > adv_data.len() {
            break;
        }
        if adv_data[i + 1] == ad_type {
            result.push(&adv_data[i + 2..i + 1 + length]);
        }
        i += 1 + length;
    }

    result
}

/// Decode the advertised service UUIDs (complete and incomplete lists, all
/// three widths).
pub fn decode_services(adv_data: &[u8]) -> Vec<Uuid> {
    let mut services = Vec::new();

    for (ad_type, width) in [
        (AD_TYPE_UUID16_INCOMPLETE, 2usize),
        (AD_TYPE_UUID16_COMPLETE, 2),
        (AD_TYPE_UUID32_INCOMPLETE, 4),
        (AD_TYPE_UUID32_COMPLETE, 4),
        (AD_TYPE_UUID128_INCOMPLETE, 16),
        (AD_TYPE_UUID128_COMPLETE, 16),
    ] {
        for field in decode_field(adv_data, ad_type) {
            for chunk in field.chunks_exact(width) {
                if let Some(uuid) = Uuid::from_bytes(chunk) {
                    services.push(uuid);
                }
            }
        }
    }

    services
}

/// Decode the advertised local name, preferring the complete form.
pub fn decode_name(adv_data: &[u8]) -> Option<String> {
    for ad_type in [AD_TYPE_NAME_COMPLETE, AD_TYPE_NAME_SHORT] {
        if let Some(field) = decode_field(adv_data, ad_type).first() {
            return Some(String::from_utf8_lossy(field).into_owned());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uuid::{CONTROL, SENSOR_SERVICE};

    #[test]
    fn test_payload_decodes_back() {
        let payload = advertising_payload("BLE-TEST", &[SENSOR_SERVICE]).unwrap();
        assert!(payload.len() <= ADV_MAX_PAYLOAD);
        assert_eq!(decode_name(&payload).as_deref(), Some("BLE-TEST"));
        assert_eq!(decode_services(&payload), vec![SENSOR_SERVICE]);
    }

    #[test]
    fn test_payload_too_long() {
        let err = advertising_payload("a-name-well-beyond-the-31-byte-limit", &[CONTROL]);
        assert!(matches!(err, Err(AdvError::PayloadTooLong(_))));
    }

    #[test]
    fn test_decode_incomplete_uuid_list() {
        // len=3, incomplete 16-bit list, 0x181A
        let data = [0x03, AD_TYPE_UUID16_INCOMPLETE, 0x1A, 0x18];
        assert_eq!(decode_services(&data), vec![SENSOR_SERVICE]);
    }

    #[test]
    fn test_decode_tolerates_truncation() {
        // Claims 5 data bytes but only 2 follow
        let data = [0x06, AD_TYPE_NAME_COMPLETE, b'h', b'i'];
        assert_eq!(decode_name(&data), None);
        assert!(decode_services(&data).is_empty());
    }

    #[test]
    fn test_decode_name_missing() {
        let payload = advertising_payload("", &[SENSOR_SERVICE]).unwrap();
        assert_eq!(decode_name(&payload), None);
    }
}
